use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::aggregate::{
    MedianPosition, PassTotals, ThreatPredicate, average_threat_gained, median_origin_positions,
    pairwise_pass_counts, total_and_successful_passes,
};
use crate::matrix::AdjacencyMatrix;
use crate::model::{PlayerId, Roster};
use crate::pass_filter::StartingPass;

pub type PlayerNames = BTreeMap<PlayerId, String>;

/// Adjacency matrix with a display name per row, ready for export.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamTable {
    pub team: String,
    pub names: Vec<Option<String>>,
    pub matrix: AdjacencyMatrix,
}

impl TeamTable {
    pub fn players(&self) -> &[PlayerId] {
        self.matrix.players()
    }
}

/// Per-player aggregate row. Absent medians and threat stay `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSummary {
    pub player_id: PlayerId,
    pub name: Option<String>,
    pub totals: PassTotals,
    pub median_position: Option<MedianPosition>,
    pub average_pass_value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeamReport {
    pub table: TeamTable,
    pub players: Vec<PlayerSummary>,
    pub intra_team_passes: usize,
    pub missing_names: Vec<PlayerId>,
}

/// Builds the finished table for one team.
///
/// A roster player without an entry in `names` keeps an empty name; the
/// rest of the table is unaffected.
pub fn process_team(
    passes: &[StartingPass],
    roster: &Roster,
    names: &PlayerNames,
    predicate: ThreatPredicate,
) -> TeamReport {
    let players = roster.ordered_ids();

    let intra_team_passes = passes
        .iter()
        .filter(|p| roster.contains(p.passer()) && p.receiver().is_some_and(|r| roster.contains(r)))
        .count();

    let pairs = pairwise_pass_counts(passes, roster);
    let totals = total_and_successful_passes(passes, roster);
    let matrix = AdjacencyMatrix::build(&players, &pairs, &totals);

    let mut missing_names = Vec::new();
    let row_names: Vec<Option<String>> = players
        .iter()
        .map(|id| {
            let name = names.get(id).cloned();
            if name.is_none() {
                warn!(team = %roster.team, player_id = id, "no display name for starter");
                missing_names.push(*id);
            }
            name
        })
        .collect();

    let medians = median_origin_positions(passes, roster);
    let threat = average_threat_gained(passes, roster, predicate);
    let summaries = players
        .iter()
        .zip(&row_names)
        .map(|(id, name)| PlayerSummary {
            player_id: *id,
            name: name.clone(),
            totals: totals.get(id).copied().unwrap_or_default(),
            median_position: medians.get(id).copied(),
            average_pass_value: threat.get(id).copied(),
        })
        .collect();

    debug!(
        team = %roster.team,
        players = players.len(),
        intra_team_passes,
        "built team pass network"
    );

    TeamReport {
        table: TeamTable {
            team: roster.team.clone(),
            names: row_names,
            matrix,
        },
        players: summaries,
        intra_team_passes,
        missing_names,
    }
}
