//! Terminal rendering of assessments and interpretation results
//!
//! Rendering functions return strings so the caller decides where they go.
//! Colour is applied only when requested; tables are always plain text.

use colored::{Color, Colorize};
use std::fmt::Write;
use tabled::{settings::Style, Table, Tabled};

use crate::classifier::Advisory;
use crate::dashboard::LoadView;
use crate::format::{
    clamp_progress, format_distance, format_heart_rate, format_percent, format_ratio,
    format_score, format_speed,
};
use crate::interpreter::InterpretationResult;
use crate::models::{Player, SeverityClass};
use crate::squad::{RowStatus, SquadOverview};

const PROGRESS_WIDTH: usize = 20;

pub fn severity_color(class: SeverityClass) -> Color {
    match class {
        SeverityClass::Info => Color::Cyan,
        SeverityClass::Green => Color::Green,
        SeverityClass::Blue => Color::Blue,
        SeverityClass::Yellow => Color::Yellow,
        SeverityClass::Orange => Color::TrueColor {
            r: 255,
            g: 140,
            b: 0,
        },
        SeverityClass::Red => Color::Red,
    }
}

fn paint(text: &str, class: SeverityClass, color: bool) -> String {
    if color {
        text.color(severity_color(class)).bold().to_string()
    } else {
        text.to_string()
    }
}

/// Text progress bar for a percentage, clamped to [0,100]
pub fn progress_bar(percent: f64) -> String {
    let filled = (clamp_progress(percent) / 100.0 * PROGRESS_WIDTH as f64).round() as usize;
    format!(
        "[{}{}]",
        "#".repeat(filled),
        "-".repeat(PROGRESS_WIDTH - filled)
    )
}

fn write_advisory(out: &mut String, advisory: &Advisory, color: bool) {
    let _ = writeln!(out, "  {}", paint(&advisory.title, advisory.severity, color));
    let _ = writeln!(out, "    {}", advisory.detail);
}

/// Render the overview, movement, performance and load sections of a view
pub fn render_load_view(view: &LoadView, player: Option<&Player>, color: bool) -> String {
    let m = &view.metrics;
    let a = &view.assessment;
    let mut out = String::new();

    if let Some(p) = player {
        let _ = writeln!(out, "#{} {} ({})", p.jersey_number, p.name, p.position);
    }

    let _ = writeln!(out, "Overview");
    let _ = writeln!(
        out,
        "  Total distance   {} (sprint {})",
        format_distance(m.movement.total_distance),
        format_distance(m.movement.sprint_distance)
    );
    let _ = writeln!(
        out,
        "  Max speed        {} (avg {})",
        format_speed(m.movement.max_speed),
        format_speed(m.movement.average_speed)
    );
    let _ = writeln!(
        out,
        "  Heart rate       {} (avg {})",
        format_heart_rate(m.performance.max_heart_rate),
        format_heart_rate(m.performance.average_heart_rate)
    );
    let _ = writeln!(
        out,
        "  Readiness        {}",
        paint(&format_score(a.readiness_score), a.readiness.class(), color)
    );

    let _ = writeln!(out, "Performance");
    let _ = writeln!(
        out,
        "  Work rate        {} {}",
        format_percent(m.performance.work_rate),
        progress_bar(m.performance.work_rate)
    );
    let _ = writeln!(
        out,
        "  Intensity        {} {}",
        format_score(m.performance.intensity_score),
        progress_bar(m.performance.intensity_score * 10.0)
    );
    let _ = writeln!(out, "  Sprint count     {}", m.movement.sprint_count);

    let _ = writeln!(out, "Load Management");
    let _ = writeln!(
        out,
        "  Acute:Chronic    {} [{}]",
        paint(&format_ratio(a.acute_chronic_ratio), a.injury_risk.class(), color),
        a.injury_risk
    );
    let _ = writeln!(out, "  Optimal range    0.8 - 1.3");

    if let Some(alert) = &a.alert {
        let _ = writeln!(out, "Alert");
        write_advisory(&mut out, alert, color);
    }

    let _ = writeln!(out, "Recovery Recommendations");
    for advisory in a.recommendations() {
        write_advisory(&mut out, &advisory, color);
    }

    out
}

/// Render one interpreted prediction
pub fn render_interpretation(result: &InterpretationResult, color: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}  ({})", result.title, result.confidence_label());

    if let Some(headline) = &result.headline {
        let _ = writeln!(out, "  Level: {}", paint(headline, result.severity, color));
    }

    if let Some(progress) = result.progress {
        let _ = writeln!(out, "  {}", progress_bar(progress));
    }

    for section in &result.sections {
        let _ = writeln!(out, "  {}:", section.heading);
        for item in &section.items {
            let _ = writeln!(out, "    - {}", item);
        }
    }

    if !result.targets.is_empty() {
        let _ = writeln!(out, "  Target Improvements:");
        for target in &result.targets {
            let _ = writeln!(out, "    {}: {}", target.label, target.value);
        }
    }

    if let Some(eta) = &result.estimated_recovery_time {
        let _ = writeln!(out, "  Estimated Recovery Time: {}", eta);
    }

    out
}

#[derive(Tabled)]
struct PlayerRow {
    #[tabled(rename = "#")]
    jersey: u16,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Position")]
    position: String,
    #[tabled(rename = "ID")]
    id: String,
}

/// Roster table
pub fn render_players(players: &[Player]) -> String {
    let rows: Vec<PlayerRow> = players
        .iter()
        .map(|p| PlayerRow {
            jersey: p.jersey_number,
            name: p.name.clone(),
            position: p.position.clone(),
            id: p.id.clone(),
        })
        .collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

#[derive(Tabled)]
struct SquadTableRow {
    #[tabled(rename = "#")]
    jersey: u16,
    #[tabled(rename = "Player")]
    name: String,
    #[tabled(rename = "A:C Ratio")]
    ratio: String,
    #[tabled(rename = "Risk")]
    risk: String,
    #[tabled(rename = "Readiness")]
    readiness: String,
    #[tabled(rename = "Recommendation")]
    recommendation: String,
}

/// Squad overview table
pub fn render_squad(overview: &SquadOverview) -> String {
    let rows: Vec<SquadTableRow> = overview
        .rows
        .iter()
        .map(|row| {
            let (ratio, risk, readiness, recommendation) = match &row.status {
                RowStatus::Assessed(a) => (
                    format_ratio(a.acute_chronic_ratio),
                    a.injury_risk.to_string(),
                    format!("{} ({})", format_score(a.readiness_score), a.readiness),
                    a.recommendation.title().to_string(),
                ),
                RowStatus::NoData => dash_row("no data"),
                RowStatus::Failed(e) => dash_row(&e.to_string()),
            };
            SquadTableRow {
                jersey: row.player.jersey_number,
                name: row.player.name.clone(),
                ratio,
                risk,
                readiness,
                recommendation,
            }
        })
        .collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

fn dash_row(reason: &str) -> (String, String, String, String) {
    ("-".to_string(), "-".to_string(), "-".to_string(), reason.to_string())
}
