use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::aggregate::ThreatPredicate;
use crate::export::OutputPlan;
use crate::pipeline::AnalysisOptions;

pub const DEFAULT_PASSES_FILE: &str =
    "1484684C-0AFC-4383-B792-55FB5FBDFAFE_adjusted_passes_inverted.csv";
pub const DEFAULT_STATS_FILE: &str = "1484684C-0AFC-4383-B792-55FB5FBDFAFE_adjusted_OverallStats.csv";
pub const DEFAULT_TEAM_A: &str = "Go Ahead Eagles MA 15-16";
pub const DEFAULT_TEAM_B: &str = "Go Ahead Eagles MB 15-16";
pub const DEFAULT_TEAM_A_NAMES: &str = "The data report of Go Ahead Eagles MA 15-1620220426.xls";
pub const DEFAULT_TEAM_B_NAMES: &str = "The data report of Go Ahead Eagles MB 15-1620220426.xls";
// Player names live on the second sheet of the report workbooks.
pub const DEFAULT_NAMES_SHEET: usize = 1;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamConfig {
    pub label: String,
    pub names_file: PathBuf,
    pub output_stem: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineConfig {
    pub data_dir: PathBuf,
    pub passes_file: PathBuf,
    pub stats_file: PathBuf,
    pub team_a: TeamConfig,
    pub team_b: TeamConfig,
    pub names_sheet_index: usize,
    pub output_dir: PathBuf,
    pub workbook: bool,
    pub threat_predicate: ThreatPredicate,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            passes_file: PathBuf::from(DEFAULT_PASSES_FILE),
            stats_file: PathBuf::from(DEFAULT_STATS_FILE),
            team_a: TeamConfig {
                label: DEFAULT_TEAM_A.to_string(),
                names_file: PathBuf::from(DEFAULT_TEAM_A_NAMES),
                output_stem: "teama".to_string(),
            },
            team_b: TeamConfig {
                label: DEFAULT_TEAM_B.to_string(),
                names_file: PathBuf::from(DEFAULT_TEAM_B_NAMES),
                output_stem: "teamb".to_string(),
            },
            names_sheet_index: DEFAULT_NAMES_SHEET,
            output_dir: PathBuf::from("."),
            workbook: false,
            threat_predicate: ThreatPredicate::default(),
        }
    }
}

impl PipelineConfig {
    /// Defaults overridden by `PASSNET_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut cfg = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = var("PASSNET_DATA_DIR") {
            cfg.data_dir = PathBuf::from(v);
        }
        if let Some(v) = var("PASSNET_PASSES_FILE") {
            cfg.passes_file = PathBuf::from(v);
        }
        if let Some(v) = var("PASSNET_STATS_FILE") {
            cfg.stats_file = PathBuf::from(v);
        }
        if let Some(v) = var("PASSNET_TEAM_A") {
            cfg.team_a.label = v;
        }
        if let Some(v) = var("PASSNET_TEAM_B") {
            cfg.team_b.label = v;
        }
        if let Some(v) = var("PASSNET_TEAM_A_NAMES") {
            cfg.team_a.names_file = PathBuf::from(v);
        }
        if let Some(v) = var("PASSNET_TEAM_B_NAMES") {
            cfg.team_b.names_file = PathBuf::from(v);
        }
        if let Some(v) = var("PASSNET_NAMES_SHEET") {
            cfg.names_sheet_index = v
                .trim()
                .parse::<usize>()
                .with_context(|| format!("PASSNET_NAMES_SHEET={v:?} is not a sheet index"))?;
        }
        if let Some(v) = var("PASSNET_OUTPUT_DIR") {
            cfg.output_dir = PathBuf::from(v);
        }
        if let Some(v) = var("PASSNET_WORKBOOK") {
            cfg.workbook = parse_flag(&v)
                .with_context(|| format!("PASSNET_WORKBOOK={v:?} is not a boolean"))?;
        }
        if let Some(v) = var("PASSNET_THREAT_PREDICATE") {
            cfg.threat_predicate = v
                .parse::<ThreatPredicate>()
                .map_err(anyhow::Error::msg)
                .context("PASSNET_THREAT_PREDICATE")?;
        }
        Ok(cfg)
    }

    pub fn passes_path(&self) -> PathBuf {
        self.data_dir.join(&self.passes_file)
    }

    pub fn stats_path(&self) -> PathBuf {
        self.data_dir.join(&self.stats_file)
    }

    /// Name workbooks are looked up in the data dir first, then next to
    /// the outputs.
    pub fn names_path(&self, team: &TeamConfig) -> PathBuf {
        let in_data = self.data_dir.join(&team.names_file);
        if in_data.exists() {
            in_data
        } else {
            self.output_dir.join(&team.names_file)
        }
    }

    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            team_a: self.team_a.label.clone(),
            team_b: self.team_b.label.clone(),
            threat_predicate: self.threat_predicate,
        }
    }

    pub fn output_plan(&self) -> OutputPlan {
        OutputPlan {
            output_dir: self.output_dir.clone(),
            team_a_stem: self.team_a.output_stem.clone(),
            team_b_stem: self.team_b.output_stem.clone(),
            workbook: self.workbook,
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Loads `.env.local` then `.env` from the working directory, if present.
pub fn load_dotenv() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
}
