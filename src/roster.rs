use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::error::{PipelineError, Result};
use crate::model::{ParticipationRow, PlayerId, Roster, SubstitutionRecord};
use crate::sub_markers::parse_sub_markers;

pub const PARTICIPATION_SOURCE: &str = "participation table";

/// Starting elevens of the two sides of one match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRosters {
    pub team_a: Roster,
    pub team_b: Roster,
}

impl MatchRosters {
    /// Every starter of either team; the pass log is filtered against this.
    pub fn union(&self) -> BTreeSet<PlayerId> {
        self.team_a
            .players
            .union(&self.team_b.players)
            .copied()
            .collect()
    }
}

pub fn parse_participation(row: &ParticipationRow) -> Result<SubstitutionRecord> {
    let sub_on = parse_sub_markers(&row.sub_on).map_err(|err| {
        PipelineError::input_format(PARTICIPATION_SOURCE, row.line, &row.sub_on, err.to_string())
    })?;
    Ok(SubstitutionRecord {
        player_id: row.player_id,
        team: row.team.clone(),
        sub_on,
    })
}

/// Partitions the starters of `team_a` and `team_b`.
///
/// Every row is parsed before any classification happens, so one
/// malformed `Sub on` cell aborts the whole resolution.
pub fn resolve_starters(
    rows: &[ParticipationRow],
    team_a: &str,
    team_b: &str,
) -> Result<MatchRosters> {
    let records = rows
        .iter()
        .map(parse_participation)
        .collect::<Result<Vec<_>>>()?;

    let mut a = BTreeSet::new();
    let mut b = BTreeSet::new();
    for record in records.iter().filter(|r| r.started()) {
        if record.team == team_a {
            a.insert(record.player_id);
        } else if record.team == team_b {
            b.insert(record.player_id);
        } else {
            debug!(player_id = record.player_id, team = %record.team, "starter for unrelated team");
        }
    }

    if a.is_empty() {
        return Err(PipelineError::EmptyRoster {
            team: team_a.to_string(),
        });
    }
    if b.is_empty() {
        return Err(PipelineError::EmptyRoster {
            team: team_b.to_string(),
        });
    }
    if let Some(player_id) = a.intersection(&b).next() {
        return Err(PipelineError::RosterOverlap {
            player_id: *player_id,
        });
    }

    info!(
        team_a = team_a,
        starters_a = a.len(),
        team_b = team_b,
        starters_b = b.len(),
        "resolved starting rosters"
    );

    Ok(MatchRosters {
        team_a: Roster::new(team_a, a),
        team_b: Roster::new(team_b, b),
    })
}
