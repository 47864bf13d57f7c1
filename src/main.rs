use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use pass_network::aggregate::ThreatPredicate;
use pass_network::config::{PipelineConfig, load_dotenv};
use pass_network::export::export_analysis;
use pass_network::ingest::{load_participation, load_pass_events, load_player_names};
use pass_network::logging;
use pass_network::pipeline::{MatchInputs, analyze};
use pass_network::team::TeamReport;

/// Builds passing networks for the starting elevens of one match.
///
/// Every option falls back to the matching PASSNET_* environment
/// variable (also read from .env / .env.local) and then to the
/// built-in default.
#[derive(Parser, Debug)]
#[command(about, long_about = None)]
struct Args {
    /// Directory holding the pass log and participation table.
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Pass event CSV, relative to the data dir.
    #[arg(long = "passes", value_name = "FILE")]
    passes_file: Option<PathBuf>,

    /// Participation ("OverallStats") CSV, relative to the data dir.
    #[arg(long = "stats", value_name = "FILE")]
    stats_file: Option<PathBuf>,

    /// Team label of the first side, as written in the "Match Team" column.
    #[arg(long, value_name = "LABEL")]
    team_a: Option<String>,

    /// Team label of the second side.
    #[arg(long, value_name = "LABEL")]
    team_b: Option<String>,

    /// Name table (xls/xlsx/csv) for the first side.
    #[arg(long, value_name = "FILE")]
    team_a_names: Option<PathBuf>,

    /// Name table (xls/xlsx/csv) for the second side.
    #[arg(long, value_name = "FILE")]
    team_b_names: Option<PathBuf>,

    /// Zero-based sheet index of the name tables in workbooks.
    #[arg(long = "names-sheet", value_name = "INDEX")]
    names_sheet_index: Option<usize>,

    /// Directory the result tables are written to.
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Also write all tables into one xlsx workbook.
    #[arg(long, overrides_with = "no_workbook")]
    workbook: bool,

    /// Skip the xlsx workbook even when PASSNET_WORKBOOK is set.
    #[arg(long, overrides_with = "workbook")]
    no_workbook: bool,

    /// Rows counted when averaging threat gained: strict-numeric or canonical.
    #[arg(long, value_name = "MODE")]
    threat_predicate: Option<ThreatPredicate>,

    /// Print the resolved configuration as JSON and exit.
    #[arg(long)]
    print_config: bool,

    /// More log output (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    /// The last of `--workbook` / `--no-workbook` wins.
    fn workbook_override(&self) -> Option<bool> {
        match (self.workbook, self.no_workbook) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }

    fn apply(self, cfg: &mut PipelineConfig) {
        let workbook_override = self.workbook_override();
        if let Some(v) = self.data_dir {
            cfg.data_dir = v;
        }
        if let Some(v) = self.passes_file {
            cfg.passes_file = v;
        }
        if let Some(v) = self.stats_file {
            cfg.stats_file = v;
        }
        if let Some(v) = self.team_a {
            cfg.team_a.label = v;
        }
        if let Some(v) = self.team_b {
            cfg.team_b.label = v;
        }
        if let Some(v) = self.team_a_names {
            cfg.team_a.names_file = v;
        }
        if let Some(v) = self.team_b_names {
            cfg.team_b.names_file = v;
        }
        if let Some(v) = self.names_sheet_index {
            cfg.names_sheet_index = v;
        }
        if let Some(v) = self.output_dir {
            cfg.output_dir = v;
        }
        if let Some(v) = workbook_override {
            cfg.workbook = v;
        }
        if let Some(v) = self.threat_predicate {
            cfg.threat_predicate = v;
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    load_dotenv();
    logging::init(args.verbose)?;

    let print_config = args.print_config;
    let mut cfg = PipelineConfig::from_env()?;
    args.apply(&mut cfg);

    if print_config {
        println!(
            "{}",
            serde_json::to_string_pretty(&cfg).context("serialize config")?
        );
        return Ok(());
    }

    let inputs = MatchInputs {
        passes: load_pass_events(&cfg.passes_path())?,
        participation: load_participation(&cfg.stats_path())?,
        team_a_names: load_player_names(&cfg.names_path(&cfg.team_a), cfg.names_sheet_index)
            .with_context(|| format!("load names for {}", cfg.team_a.label))?,
        team_b_names: load_player_names(&cfg.names_path(&cfg.team_b), cfg.names_sheet_index)
            .with_context(|| format!("load names for {}", cfg.team_b.label))?,
    };

    let analysis = analyze(inputs, &cfg.analysis_options()).context("pass network analysis")?;
    let exported = export_analysis(&analysis, &cfg.output_plan()).context("write result tables")?;

    println!("Pass networks complete");
    println!(
        "Passes: kept {} dropped {}",
        analysis.passes_kept, analysis.passes_dropped
    );
    print_team(&analysis.team_a);
    print_team(&analysis.team_b);
    println!("Files:");
    for path in &exported.files {
        println!("   - {}", path.display());
    }

    Ok(())
}

fn print_team(report: &TeamReport) {
    println!(
        "{}: starters={} intra-team passes={}",
        report.table.team,
        report.table.players().len(),
        report.intra_team_passes
    );
    if !report.missing_names.is_empty() {
        println!("  missing names: {:?}", report.missing_names);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_after(argv: &[&str], env_workbook: bool) -> PipelineConfig {
        let mut cfg = PipelineConfig {
            workbook: env_workbook,
            ..PipelineConfig::default()
        };
        let args = Args::try_parse_from(std::iter::once("pass_network").chain(argv.iter().copied()))
            .expect("arguments parse");
        args.apply(&mut cfg);
        cfg
    }

    #[test]
    fn workbook_flags_override_environment() {
        assert!(config_after(&[], true).workbook);
        assert!(!config_after(&[], false).workbook);
        assert!(config_after(&["--workbook"], false).workbook);
        assert!(!config_after(&["--no-workbook"], true).workbook);
        assert!(!config_after(&["--workbook", "--no-workbook"], false).workbook);
        assert!(config_after(&["--no-workbook", "--workbook"], true).workbook);
    }

    #[test]
    fn cli_values_replace_configured_ones() {
        let cfg = config_after(
            &["--team-a", "Home", "--threat-predicate", "canonical", "--names-sheet", "0"],
            false,
        );
        assert_eq!(cfg.team_a.label, "Home");
        assert_eq!(cfg.threat_predicate, ThreatPredicate::Canonical);
        assert_eq!(cfg.names_sheet_index, 0);
    }
}
