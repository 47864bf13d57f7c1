//! Per-player and per-pair statistics over the filtered pass log.
//!
//! Every query takes one team's roster and only reads passes whose passer
//! belongs to it, so results for a team never mention the other team.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::{PlayerId, Roster};
use crate::pass_filter::StartingPass;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PassTotals {
    pub total: u32,
    pub successful: u32,
}

/// Median pass origin, computed per axis. An axis is `None` when none of
/// the player's passes recorded it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MedianPosition {
    pub x: Option<f64>,
    pub y: Option<f64>,
}

/// Which rows count as successful when averaging threat gained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThreatPredicate {
    /// The raw flag must be the number `1.0`; a textual `True` is ignored.
    #[default]
    StrictNumeric,
    /// Uses the canonical success flag.
    Canonical,
}

impl ThreatPredicate {
    fn accepts(self, pass: &StartingPass) -> bool {
        match self {
            ThreatPredicate::StrictNumeric => pass.event.raw_success.is_numeric_one(),
            ThreatPredicate::Canonical => pass.succeeded,
        }
    }
}

impl fmt::Display for ThreatPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThreatPredicate::StrictNumeric => f.write_str("strict-numeric"),
            ThreatPredicate::Canonical => f.write_str("canonical"),
        }
    }
}

impl FromStr for ThreatPredicate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict-numeric" | "strict" => Ok(ThreatPredicate::StrictNumeric),
            "canonical" => Ok(ThreatPredicate::Canonical),
            other => Err(format!(
                "unknown threat predicate {other:?} (expected strict-numeric or canonical)"
            )),
        }
    }
}

fn passes_by<'a>(
    passes: &'a [StartingPass],
    roster: &'a Roster,
) -> impl Iterator<Item = &'a StartingPass> + 'a {
    passes.iter().filter(|p| roster.contains(p.passer()))
}

/// Attempts and completions per passer. Players with attempts but no
/// completion report `successful = 0`.
pub fn total_and_successful_passes(
    passes: &[StartingPass],
    roster: &Roster,
) -> BTreeMap<PlayerId, PassTotals> {
    let mut out: BTreeMap<PlayerId, PassTotals> = BTreeMap::new();
    for pass in passes_by(passes, roster) {
        let entry = out.entry(pass.passer()).or_default();
        entry.total += 1;
        if pass.succeeded {
            entry.successful += 1;
        }
    }
    out
}

pub fn median_origin_positions(
    passes: &[StartingPass],
    roster: &Roster,
) -> BTreeMap<PlayerId, MedianPosition> {
    let mut samples: BTreeMap<PlayerId, (Vec<f64>, Vec<f64>)> = BTreeMap::new();
    for pass in passes_by(passes, roster) {
        let (xs, ys) = samples.entry(pass.passer()).or_default();
        xs.extend(pass.event.origin_x);
        ys.extend(pass.event.origin_y);
    }
    samples
        .into_iter()
        .map(|(id, (mut xs, mut ys))| {
            let position = MedianPosition {
                x: median(&mut xs),
                y: median(&mut ys),
            };
            (id, position)
        })
        .collect()
}

/// Attempts between two starters of the same team, keyed by
/// `(passer, receiver)`. Completion does not matter here.
pub fn pairwise_pass_counts(
    passes: &[StartingPass],
    roster: &Roster,
) -> BTreeMap<(PlayerId, PlayerId), u32> {
    let mut out = BTreeMap::new();
    for pass in passes_by(passes, roster) {
        let Some(receiver) = pass.receiver() else {
            continue;
        };
        if !roster.contains(receiver) {
            continue;
        }
        *out.entry((pass.passer(), receiver)).or_insert(0) += 1;
    }
    out
}

/// Mean threat gained by the receiver on qualifying passes.
///
/// A player with no qualifying pass, or none with a recorded value, has
/// no entry at all.
pub fn average_threat_gained(
    passes: &[StartingPass],
    roster: &Roster,
    predicate: ThreatPredicate,
) -> BTreeMap<PlayerId, f64> {
    let mut sums: BTreeMap<PlayerId, (f64, u32)> = BTreeMap::new();
    for pass in passes_by(passes, roster).filter(|p| predicate.accepts(p)) {
        let Some(value) = pass.event.xt_gained else {
            continue;
        };
        let (sum, n) = sums.entry(pass.passer()).or_insert((0.0, 0));
        *sum += value;
        *n += 1;
    }
    sums.into_iter()
        .map(|(id, (sum, n))| (id, sum / f64::from(n)))
        .collect()
}

fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}
