use tracing::info;

use crate::aggregate::ThreatPredicate;
use crate::error::Result;
use crate::model::{ParticipationRow, PassEvent};
use crate::pass_filter::filter_starting_passes;
use crate::roster::{MatchRosters, resolve_starters};
use crate::team::{PlayerNames, TeamReport, process_team};

/// Everything one run reads, already loaded into memory.
#[derive(Debug, Clone, Default)]
pub struct MatchInputs {
    pub passes: Vec<PassEvent>,
    pub participation: Vec<ParticipationRow>,
    pub team_a_names: PlayerNames,
    pub team_b_names: PlayerNames,
}

#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    pub team_a: String,
    pub team_b: String,
    pub threat_predicate: ThreatPredicate,
}

#[derive(Debug, Clone)]
pub struct MatchAnalysis {
    pub rosters: MatchRosters,
    pub threat_predicate: ThreatPredicate,
    pub passes_kept: usize,
    pub passes_dropped: usize,
    pub team_a: TeamReport,
    pub team_b: TeamReport,
}

/// Resolves rosters, filters the log once and builds both team networks.
pub fn analyze(inputs: MatchInputs, options: &AnalysisOptions) -> Result<MatchAnalysis> {
    let MatchInputs {
        passes,
        participation,
        team_a_names,
        team_b_names,
    } = inputs;

    let rosters = resolve_starters(&participation, &options.team_a, &options.team_b)?;
    let filtered = filter_starting_passes(passes, &rosters.union());
    let predicate = options.threat_predicate;

    // The teams share nothing mutable, so they are built side by side.
    let (team_a, team_b) = rayon::join(
        || process_team(&filtered.passes, &rosters.team_a, &team_a_names, predicate),
        || process_team(&filtered.passes, &rosters.team_b, &team_b_names, predicate),
    );

    info!(
        intra_a = team_a.intra_team_passes,
        intra_b = team_b.intra_team_passes,
        "pass networks ready"
    );

    Ok(MatchAnalysis {
        passes_kept: filtered.passes.len(),
        passes_dropped: filtered.dropped,
        rosters,
        threat_predicate: predicate,
        team_a,
        team_b,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use crate::model::RawSuccess;

    fn participation(line: usize, id: u32, team: &str, sub_on: &str) -> ParticipationRow {
        ParticipationRow {
            line,
            player_id: id,
            team: team.to_string(),
            sub_on: sub_on.to_string(),
        }
    }

    fn pass(passer: u32, receiver: u32, success: &str) -> PassEvent {
        PassEvent {
            passer: Some(passer),
            receiver: Some(receiver),
            origin_x: Some(40.0),
            origin_y: Some(30.0),
            raw_success: RawSuccess::parse(success),
            xt_gained: Some(0.02),
        }
    }

    fn options() -> AnalysisOptions {
        AnalysisOptions {
            team_a: "TeamA".to_string(),
            team_b: "TeamB".to_string(),
            threat_predicate: ThreatPredicate::StrictNumeric,
        }
    }

    fn inputs() -> MatchInputs {
        MatchInputs {
            passes: vec![
                pass(7, 9, "1.0"),
                pass(7, 9, "False"),
                pass(9, 20, "0.0"),
                pass(20, 21, "True"),
                pass(30, 7, "1.0"),
            ],
            participation: vec![
                participation(2, 7, "TeamA", "[0, 34]"),
                participation(3, 9, "TeamA", "[0]"),
                participation(4, 30, "TeamA", "[12]"),
                participation(5, 20, "TeamB", "[0]"),
                participation(6, 21, "TeamB", "[0.0]"),
            ],
            team_a_names: PlayerNames::from([(7, "Seven".to_string()), (9, "Nine".to_string())]),
            team_b_names: PlayerNames::from([(20, "Twenty".to_string())]),
        }
    }

    #[test]
    fn scenario_counts_and_totals() {
        let analysis = analyze(inputs(), &options()).unwrap();
        assert_eq!(analysis.passes_dropped, 1);
        assert_eq!(analysis.passes_kept, 4);

        let a = &analysis.team_a.table.matrix;
        assert_eq!(a.players(), &[7, 9]);
        assert_eq!(a.get(7, 9), Some(2));
        assert_eq!(a.total_passes(0), 2);
        assert_eq!(a.total_successful_passes(0), 1);
        // Player 9 only passed across to the other team.
        assert_eq!(a.row(1), &[0, 0]);
        assert_eq!(a.total_passes(1), 1);
        assert_eq!(a.cell_sum(), analysis.team_a.intra_team_passes as u64);

        let b = &analysis.team_b;
        assert_eq!(b.table.matrix.get(20, 21), Some(1));
        assert_eq!(b.missing_names, vec![21]);
    }

    #[test]
    fn reruns_are_identical() {
        let first = analyze(inputs(), &options()).unwrap();
        let second = analyze(inputs(), &options()).unwrap();
        assert_eq!(first.team_a, second.team_a);
        assert_eq!(first.team_b, second.team_b);
    }

    #[test]
    fn bad_markers_stop_the_run() {
        let mut bad = inputs();
        bad.participation.push(participation(7, 40, "TeamB", "[0, x]"));
        assert!(matches!(
            analyze(bad, &options()),
            Err(PipelineError::InputFormat { line: 7, .. })
        ));
    }
}
