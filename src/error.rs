use std::path::PathBuf;

use crate::model::PlayerId;

/// Errors raised while loading match data or building pass networks.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    /// A field could not be parsed into the shape the pipeline needs.
    #[error("{source_name} line {line}: cannot parse {value:?}: {reason}")]
    InputFormat {
        source_name: String,
        line: usize,
        value: String,
        reason: String,
    },

    /// No starter was found for a team label.
    #[error("no starting players found for team {team:?}")]
    EmptyRoster { team: String },

    /// The same player id started for both teams.
    #[error("player {player_id} is listed as a starter for both teams")]
    RosterOverlap { player_id: PlayerId },

    /// An input table lacks one of its contract columns.
    #[error("{source_name}: missing column {column:?}")]
    MissingColumn { source_name: String, column: String },

    #[error("csv error in {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("spreadsheet error in {path}: {reason}")]
    Spreadsheet { path: PathBuf, reason: String },

    #[error("xlsx export to {path} failed: {source}")]
    Xlsx {
        path: PathBuf,
        source: rust_xlsxwriter::XlsxError,
    },

    #[error("json export to {path} failed: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl PipelineError {
    pub fn input_format(
        source_name: impl Into<String>,
        line: usize,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        PipelineError::InputFormat {
            source_name: source_name.into(),
            line,
            value: value.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
