//! Formatting and normalization helpers shared by the classifier, the
//! interpreter and the display layer.
//!
//! Every function here is a pure function of its arguments.

use serde_json::Value;

/// Distances at or above this many meters are shown in kilometers
pub const KILOMETER_THRESHOLD: f64 = 1000.0;

/// Render a distance in meters
///
/// Values of 1000 m or more render as kilometers with two decimals
/// (`2345.6` -> `"2.35 km"`), smaller values as whole meters (`950` -> `"950 m"`).
pub fn format_distance(meters: f64) -> String {
    if meters >= KILOMETER_THRESHOLD {
        format!("{:.2} km", meters / KILOMETER_THRESHOLD)
    } else {
        format!("{:.0} m", meters)
    }
}

pub fn format_speed(kmh: f64) -> String {
    format!("{:.1} km/h", kmh)
}

pub fn format_heart_rate(bpm: u16) -> String {
    format!("{} bpm", bpm)
}

/// Render a 0-10 score, e.g. `"7.5/10"`
pub fn format_score(score: f64) -> String {
    format!("{:.1}/10", score)
}

pub fn format_ratio(ratio: f64) -> String {
    format!("{:.2}", ratio)
}

/// Render a value that is already a percentage with one decimal
pub fn format_percent(percent: f64) -> String {
    format!("{:.1}%", percent)
}

/// Render a [0,1] fraction as a percentage with one decimal (`0.723` -> `"72.3%"`)
pub fn format_fraction_percent(fraction: f64) -> String {
    format_percent(fraction * 100.0)
}

/// Clamp a percentage into the [0,100] range used by progress indicators
///
/// NaN collapses to zero.
pub fn clamp_progress(percent: f64) -> f64 {
    if percent.is_nan() {
        return 0.0;
    }
    percent.clamp(0.0, 100.0)
}

/// Clamp a model confidence into [0,1]; non-finite values become 0
pub fn clamp_confidence(confidence: f64) -> f64 {
    if confidence.is_nan() {
        return 0.0;
    }
    confidence.clamp(0.0, 1.0)
}

/// Whole-number confidence percentage, `round(confidence * 100)`
pub fn confidence_percent(confidence: f64) -> u8 {
    (clamp_confidence(confidence) * 100.0).round() as u8
}

/// Confidence label, e.g. `0.847` -> `"85%"`
pub fn format_confidence(confidence: f64) -> String {
    format!("{}%", confidence_percent(confidence))
}

/// Turn a camelCase target key into a label
///
/// A leading `target` token is stripped when an uppercase letter or digit
/// follows it, and a space is inserted at every word boundary:
/// `"targetSprintSpeed"` -> `"Sprint Speed"`, `"targetVO2Max"` -> `"VO2 Max"`,
/// `"targetsHit"` -> `"Targets Hit"`.
pub fn humanize_metric_key(key: &str) -> String {
    let stripped = match key.strip_prefix("target") {
        Some(rest)
            if rest
                .chars()
                .next()
                .map_or(false, |c| c.is_uppercase() || c.is_ascii_digit()) =>
        {
            rest
        }
        _ => key,
    };

    let chars: Vec<char> = stripped.chars().collect();
    let mut label = String::with_capacity(stripped.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && c.is_uppercase() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).map_or(false, |n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower)
            {
                label.push(' ');
            }
        }
        if i == 0 {
            label.extend(c.to_uppercase());
        } else {
            label.push(c);
        }
    }

    label
}

/// Render a target value: numbers with one decimal, anything else verbatim
pub fn format_target_value(value: &Value) -> String {
    match value {
        Value::Number(n) => match n.as_f64() {
            Some(v) => format!("{:.1}", v),
            None => n.to_string(),
        },
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
