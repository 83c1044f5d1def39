//! Squad-wide load overview
//!
//! Classifies the latest snapshot of every active player in parallel using
//! rayon. A failure for one player is recorded on that player's row and does
//! not abort the overview. Rows keep roster order.

use rayon::prelude::*;
use std::time::Instant;
use tracing::{info, warn};

use crate::classifier::LoadAssessment;
use crate::dashboard::load_view;
use crate::error::{Result, SquadPulseError};
use crate::models::Player;
use crate::services::{MetricsService, RosterService};

/// Overview row for one player
#[derive(Debug)]
pub struct SquadRow {
    pub player: Player,
    pub status: RowStatus,
}

#[derive(Debug)]
pub enum RowStatus {
    Assessed(LoadAssessment),
    NoData,
    Failed(SquadPulseError),
}

/// Summary of a squad overview
#[derive(Debug)]
pub struct SquadOverview {
    pub rows: Vec<SquadRow>,
    pub duration_ms: u128,
}

impl SquadOverview {
    /// Players whose alert banner is raised
    pub fn alerts(&self) -> impl Iterator<Item = &SquadRow> {
        self.rows.iter().filter(|row| {
            matches!(&row.status, RowStatus::Assessed(a) if a.alert.is_some())
        })
    }

    pub fn failed_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| matches!(row.status, RowStatus::Failed(_)))
            .count()
    }
}

/// Build the overview for the active roster
///
/// Only a roster failure is returned as an error.
pub fn overview<R, M>(roster: &R, metrics: &M) -> Result<SquadOverview>
where
    R: RosterService + ?Sized,
    M: MetricsService + Sync + ?Sized,
{
    let start = Instant::now();
    let players = roster.active_players()?;

    let rows: Vec<SquadRow> = players
        .into_par_iter()
        .map(|player| {
            let status = match load_view(metrics, &player.id) {
                Ok(Some(view)) => RowStatus::Assessed(view.assessment),
                Ok(None) => RowStatus::NoData,
                Err(e) => {
                    warn!(player_id = %player.id, error = %e, "Could not classify player");
                    RowStatus::Failed(e)
                }
            };
            SquadRow { player, status }
        })
        .collect();

    let duration_ms = start.elapsed().as_millis();
    info!(players = rows.len(), duration_ms, "Squad overview complete");

    Ok(SquadOverview { rows, duration_ms })
}
