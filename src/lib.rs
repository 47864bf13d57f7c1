//! Passing networks for the two starting elevens of one match.
//!
//! Starters are resolved from substitution markers, the pass log is cut
//! down to their passes, and each team gets an adjacency matrix of pass
//! counts plus per-player totals, median pass origin and mean threat
//! gained.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod export;
pub mod ingest;
pub mod logging;
pub mod matrix;
pub mod model;
pub mod pass_filter;
pub mod pipeline;
pub mod roster;
pub mod sub_markers;
pub mod team;
