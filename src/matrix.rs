use std::collections::{BTreeMap, HashMap};

use tracing::warn;

use crate::aggregate::PassTotals;
use crate::model::PlayerId;

/// Square pass-count matrix over one roster, plus per-player totals.
///
/// Rows are passers, columns receivers; both follow `players` order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacencyMatrix {
    players: Vec<PlayerId>,
    cells: Vec<u32>,
    total_successful_passes: Vec<u32>,
    total_passes: Vec<u32>,
}

impl AdjacencyMatrix {
    /// Allocates a zero matrix over `players` and writes each pair count
    /// into its cell. Totals come from `totals`, missing players get 0.
    pub fn build(
        players: &[PlayerId],
        pair_counts: &BTreeMap<(PlayerId, PlayerId), u32>,
        totals: &BTreeMap<PlayerId, PassTotals>,
    ) -> Self {
        let n = players.len();
        let index: HashMap<PlayerId, usize> =
            players.iter().enumerate().map(|(i, id)| (*id, i)).collect();

        let mut cells = vec![0u32; n * n];
        for (&(passer, receiver), &count) in pair_counts {
            let (Some(&row), Some(&col)) = (index.get(&passer), index.get(&receiver)) else {
                warn!(passer, receiver, "pair outside the matrix players skipped");
                continue;
            };
            cells[row * n + col] = count;
        }

        let lookup = |id: &PlayerId| totals.get(id).copied().unwrap_or_default();
        Self {
            players: players.to_vec(),
            cells,
            total_successful_passes: players.iter().map(|id| lookup(id).successful).collect(),
            total_passes: players.iter().map(|id| lookup(id).total).collect(),
        }
    }

    pub fn players(&self) -> &[PlayerId] {
        &self.players
    }

    pub fn dimension(&self) -> usize {
        self.players.len()
    }

    pub fn row(&self, i: usize) -> &[u32] {
        let n = self.dimension();
        &self.cells[i * n..(i + 1) * n]
    }

    pub fn get(&self, passer: PlayerId, receiver: PlayerId) -> Option<u32> {
        let row = self.position(passer)?;
        let col = self.position(receiver)?;
        Some(self.cells[row * self.dimension() + col])
    }

    pub fn total_successful_passes(&self, i: usize) -> u32 {
        self.total_successful_passes[i]
    }

    pub fn total_passes(&self, i: usize) -> u32 {
        self.total_passes[i]
    }

    /// Sum of all pair cells, diagonal included.
    pub fn cell_sum(&self) -> u64 {
        self.cells.iter().map(|c| u64::from(*c)).sum()
    }

    fn position(&self, id: PlayerId) -> Option<usize> {
        self.players.iter().position(|p| *p == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_cells_and_defaults_totals() {
        let players = vec![4, 7, 9];
        let pairs = BTreeMap::from([((7, 9), 2), ((9, 7), 1), ((7, 7), 1)]);
        let totals = BTreeMap::from([
            (
                7,
                PassTotals {
                    total: 4,
                    successful: 3,
                },
            ),
            (
                4,
                PassTotals {
                    total: 2,
                    successful: 0,
                },
            ),
        ]);

        let m = AdjacencyMatrix::build(&players, &pairs, &totals);
        assert_eq!(m.dimension(), 3);
        assert_eq!(m.get(7, 9), Some(2));
        assert_eq!(m.get(9, 7), Some(1));
        assert_eq!(m.get(7, 7), Some(1));
        assert_eq!(m.get(7, 11), None);
        assert_eq!(m.cell_sum(), 4);

        // Player 4 has passes but none to team-mates: a zero row with totals.
        assert_eq!(m.row(0), &[0, 0, 0]);
        assert_eq!(m.total_passes(0), 2);
        assert_eq!(m.total_successful_passes(0), 0);
        // Player 9 has no totals entry at all.
        assert_eq!(m.total_passes(2), 0);
        assert_eq!(m.total_successful_passes(2), 0);
    }

    #[test]
    fn empty_player_list_is_a_zero_by_zero_matrix() {
        let m = AdjacencyMatrix::build(&[], &BTreeMap::new(), &BTreeMap::new());
        assert_eq!(m.dimension(), 0);
        assert_eq!(m.cell_sum(), 0);
    }
}
