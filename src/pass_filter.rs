use std::collections::BTreeSet;

use tracing::info;

use crate::model::{PassEvent, PlayerId};

/// A pass by a starter, with the success flag normalised once.
#[derive(Debug, Clone, PartialEq)]
pub struct StartingPass {
    pub passer: PlayerId,
    pub event: PassEvent,
    pub succeeded: bool,
}

impl StartingPass {
    pub fn passer(&self) -> PlayerId {
        self.passer
    }

    pub fn receiver(&self) -> Option<PlayerId> {
        self.event.receiver
    }
}

#[derive(Debug, Clone, Default)]
pub struct FilteredPasses {
    pub passes: Vec<StartingPass>,
    pub dropped: usize,
}

/// Keeps only passes whose passer started for either team.
///
/// Rows without a passer id count as dropped.
pub fn filter_starting_passes(
    events: Vec<PassEvent>,
    starters: &BTreeSet<PlayerId>,
) -> FilteredPasses {
    let total = events.len();
    let passes: Vec<StartingPass> = events
        .into_iter()
        .filter_map(|event| {
            let passer = event.passer.filter(|id| starters.contains(id))?;
            let succeeded = event.raw_success.is_success();
            Some(StartingPass {
                passer,
                event,
                succeeded,
            })
        })
        .collect();
    let dropped = total - passes.len();
    info!(kept = passes.len(), dropped, "filtered pass log to starters");
    FilteredPasses { passes, dropped }
}
