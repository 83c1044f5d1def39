use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use std::path::PathBuf;

use squadpulse::config::AppConfig;
use squadpulse::dashboard::{self, AnalysisRequest};
use squadpulse::display;
use squadpulse::logging::{init_logging, LogFormat};
use squadpulse::services::{JsonFileStore, RosterService};
use squadpulse::squad;
use squadpulse::SquadPulseError;

/// SquadPulse - Athlete load and ML prediction interpretation CLI
///
/// Classifies the latest GPS/heart-rate workload snapshot of each player and
/// interprets stored ML predictions (injury risk, performance optimization,
/// fatigue) into severity tiers and recommendations.
#[derive(Parser)]
#[command(name = "squadpulse")]
#[command(version)]
#[command(about = "Athlete load and prediction interpretation CLI", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory holding players.json, metrics.json and predictions.json
    #[arg(short, long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Log output format (pretty, json, compact)
    #[arg(long)]
    log_format: Option<LogFormat>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List active players
    Players,

    /// Classify the latest load snapshot of a player
    Load {
        /// Player ID
        #[arg(short, long)]
        player: String,
    },

    /// Load and readiness overview of the whole active squad
    Squad,

    /// Interpret a player's prediction history, most recent first
    Predictions {
        /// Player ID
        #[arg(short, long)]
        player: String,

        /// Number of predictions to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Run an ML analysis for a player and show it on top of the history
    Analyze {
        /// Player ID
        #[arg(short, long)]
        player: String,

        /// Analysis to run
        #[arg(short, long, value_enum)]
        kind: AnalysisKind,

        /// Session for fatigue detection (defaults to display.default_session_id)
        #[arg(short, long)]
        session: Option<String>,
    },

    /// Manage configuration
    Config {
        /// Write the default configuration file
        #[arg(long)]
        init: bool,

        /// Print the effective configuration
        #[arg(long)]
        show: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum AnalysisKind {
    Injury,
    Performance,
    Fatigue,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let initialising = matches!(cli.command, Commands::Config { init: true, .. });
    let mut config = match &cli.config {
        Some(path) if initialising && !path.exists() => AppConfig::default(),
        Some(path) => AppConfig::load_from_file(path)?,
        None => AppConfig::load_or_default(),
    };

    config.logging.level = config.logging.level.raised_by(cli.verbose);
    if let Some(format) = cli.log_format {
        config.logging.format = format;
    }
    if let Some(dir) = &cli.data_dir {
        config.data.data_dir = dir.clone();
    }
    let color = config.display.color && !cli.no_color;
    if !color {
        colored::control::set_override(false);
    }

    init_logging(&config.logging)?;

    let store = JsonFileStore::new(&config.data.data_dir);

    match cli.command {
        Commands::Players => {
            let players = store.active_players().map_err(report)?;
            println!("{}", "Active Players".green().bold());
            println!("{}", display::render_players(&players));
        }

        Commands::Load { player } => {
            let roster = store.active_players().map_err(report)?;
            let profile = roster.iter().find(|p| p.id == player);

            match dashboard::load_view(&store, &player).map_err(report)? {
                Some(view) => print!("{}", display::render_load_view(&view, profile, color)),
                None => println!("{}", format!("No metrics recorded for {}", player).yellow()),
            }
        }

        Commands::Squad => {
            let overview = squad::overview(&store, &store).map_err(report)?;
            println!("{}", "Squad Load Overview".cyan().bold());
            println!("{}", display::render_squad(&overview));

            let alerts = overview.alerts().count();
            if alerts > 0 {
                println!(
                    "{}",
                    format!("{} player(s) above 1.30 acute:chronic ratio", alerts)
                        .yellow()
                        .bold()
                );
            }
        }

        Commands::Predictions { player, limit } => {
            let history = dashboard::prediction_history(&store, &player).map_err(report)?;
            if history.is_empty() {
                println!("{}", format!("No predictions recorded for {}", player).yellow());
                return Ok(());
            }

            let results = history.interpretations();
            let shown = limit.unwrap_or(results.len());
            println!(
                "{}",
                format!("Predictions for {} (most recent first)", player)
                    .magenta()
                    .bold()
            );
            for result in results.iter().take(shown) {
                println!("{}", display::render_interpretation(result, color));
            }
        }

        Commands::Analyze {
            player,
            kind,
            session,
        } => {
            let request = match kind {
                AnalysisKind::Injury => AnalysisRequest::InjuryRisk,
                AnalysisKind::Performance => AnalysisRequest::PerformanceOptimization,
                AnalysisKind::Fatigue => AnalysisRequest::FatigueDetection {
                    session_id: session
                        .unwrap_or_else(|| config.display.default_session_id.clone()),
                },
            };

            let history = dashboard::prediction_history(&store, &player).map_err(report)?;
            let (history, result) =
                dashboard::run_analysis(&store, &history, &request).map_err(report)?;

            println!(
                "{}",
                format!("{} for {}", request.name(), player).magenta().bold()
            );
            println!("{}", display::render_interpretation(&result, color));
            println!("{} prediction(s) in history", history.len());
        }

        Commands::Config { init, show } => {
            let path = cli
                .config
                .clone()
                .unwrap_or_else(AppConfig::default_config_path);

            if init {
                let mut fresh = AppConfig::default();
                fresh
                    .save_to_file(&path)
                    .with_context(|| format!("Failed to initialise {}", path.display()))?;
                println!("{} {}", "✓ Wrote".green(), path.display());
            }

            if show || !init {
                println!("{}", format!("Configuration ({})", path.display()).white().bold());
                println!("{}", toml::to_string_pretty(&config)?);
            }
        }
    }

    Ok(())
}

/// Log the error at its severity and turn it into a user-facing message
fn report(err: SquadPulseError) -> anyhow::Error {
    if err.severity().to_tracing_level() == tracing::Level::WARN {
        tracing::warn!(error = %err, "Command failed");
    } else {
        tracing::error!(error = %err, "Command failed");
    }
    anyhow::anyhow!(err.user_message())
}
