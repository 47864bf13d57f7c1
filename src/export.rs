use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use rust_xlsxwriter::{DocProperties, ExcelDateTime, Workbook, Worksheet, XlsxError};
use serde::Serialize;
use tracing::info;

use crate::aggregate::ThreatPredicate;
use crate::error::{PipelineError, Result};
use crate::model::PlayerId;
use crate::pipeline::MatchAnalysis;
use crate::team::{TeamReport, TeamTable};

pub const TOTAL_SUCCESSFUL_COLUMN: &str = "total_suc_pass";
pub const TOTAL_PASSES_COLUMN: &str = "total_num_of_pass";
pub const WORKBOOK_FILE: &str = "pass_networks.xlsx";
pub const RUN_REPORT_FILE: &str = "run_report.json";

/// Where and how one run's tables are written.
#[derive(Debug, Clone)]
pub struct OutputPlan {
    pub output_dir: PathBuf,
    pub team_a_stem: String,
    pub team_b_stem: String,
    pub workbook: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ExportReport {
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub threat_predicate: ThreatPredicate,
    pub passes_kept: usize,
    pub passes_dropped: usize,
    pub teams: Vec<TeamRunSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamRunSummary {
    pub team: String,
    pub starters: Vec<PlayerId>,
    pub intra_team_passes: usize,
    pub missing_names: Vec<PlayerId>,
}

impl RunReport {
    pub fn from_analysis(analysis: &MatchAnalysis) -> Self {
        let team = |report: &TeamReport| TeamRunSummary {
            team: report.table.team.clone(),
            starters: report.table.players().to_vec(),
            intra_team_passes: report.intra_team_passes,
            missing_names: report.missing_names.clone(),
        };
        Self {
            threat_predicate: analysis.threat_predicate,
            passes_kept: analysis.passes_kept,
            passes_dropped: analysis.passes_dropped,
            teams: vec![team(&analysis.team_a), team(&analysis.team_b)],
        }
    }
}

/// Header plus one row per player: index, `Player`, one pass-count column
/// per roster id, then the two totals.
pub fn matrix_rows(table: &TeamTable) -> Vec<Vec<String>> {
    let players = table.players();
    let mut header = Vec::with_capacity(players.len() + 4);
    header.push(String::new());
    header.push("Player".to_string());
    header.extend(players.iter().map(|id| id.to_string()));
    header.push(TOTAL_SUCCESSFUL_COLUMN.to_string());
    header.push(TOTAL_PASSES_COLUMN.to_string());

    let mut rows = vec![header];
    for (i, id) in players.iter().enumerate() {
        let mut row = Vec::with_capacity(players.len() + 4);
        row.push(id.to_string());
        row.push(table.names[i].clone().unwrap_or_default());
        row.extend(table.matrix.row(i).iter().map(|count| count.to_string()));
        row.push(table.matrix.total_successful_passes(i).to_string());
        row.push(table.matrix.total_passes(i).to_string());
        rows.push(row);
    }
    rows
}

pub fn player_rows(report: &TeamReport) -> Vec<Vec<String>> {
    let mut rows = vec![
        [
            "id",
            "Player",
            "num_of_pass",
            "suc_pass",
            "x",
            "y",
            "average_pass_value",
        ]
        .map(str::to_string)
        .to_vec(),
    ];
    for player in &report.players {
        let position = player.median_position.unwrap_or_default();
        rows.push(vec![
            player.player_id.to_string(),
            player.name.clone().unwrap_or_default(),
            player.totals.total.to_string(),
            player.totals.successful.to_string(),
            optional_number(position.x),
            optional_number(position.y),
            optional_number(player.average_pass_value),
        ]);
    }
    rows
}

fn optional_number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

pub fn write_team_matrix<W: Write>(wtr: W, table: &TeamTable) -> csv::Result<()> {
    write_csv_rows(wtr, &matrix_rows(table))
}

pub fn write_player_summary<W: Write>(wtr: W, report: &TeamReport) -> csv::Result<()> {
    write_csv_rows(wtr, &player_rows(report))
}

fn write_csv_rows<W: Write>(wtr: W, rows: &[Vec<String>]) -> csv::Result<()> {
    let mut writer = csv::Writer::from_writer(wtr);
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// One xlsx with a matrix sheet and a players sheet per team.
///
/// The document creation time is pinned so reruns write identical bytes.
pub fn write_workbook(path: &Path, teams: &[(&str, &TeamReport)]) -> Result<()> {
    let xlsx_error = |source: XlsxError| PipelineError::Xlsx {
        path: path.to_path_buf(),
        source,
    };
    let created = ExcelDateTime::from_ymd(2000, 1, 1).map_err(xlsx_error)?;
    let mut workbook = Workbook::new();
    workbook.set_properties(&DocProperties::new().set_creation_datetime(&created));
    for (stem, report) in teams {
        {
            let sheet = workbook.add_worksheet();
            sheet
                .set_name(format!("{stem}_matrix"))
                .map_err(xlsx_error)?;
            write_rows(sheet, &matrix_rows(&report.table)).map_err(xlsx_error)?;
        }
        {
            let sheet = workbook.add_worksheet();
            sheet
                .set_name(format!("{stem}_players"))
                .map_err(xlsx_error)?;
            write_rows(sheet, &player_rows(report)).map_err(xlsx_error)?;
        }
    }
    workbook.save(path).map_err(xlsx_error)?;
    Ok(())
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> std::result::Result<(), XlsxError> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            let (r, c) = (row_idx as u32, col_idx as u16);
            // Header cells and names stay text; counts and stats become numbers.
            match value.parse::<f64>() {
                Ok(number) if row_idx > 0 && col_idx != 1 => {
                    worksheet.write_number(r, c, number)?;
                }
                _ => {
                    worksheet.write_string(r, c, value)?;
                }
            }
        }
    }
    Ok(())
}

pub fn write_run_report(path: &Path, report: &RunReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report).map_err(|source| PipelineError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    write_file(path, |w| w.write_all(json.as_bytes()))
}

/// Writes every table of `analysis` under `plan.output_dir`.
pub fn export_analysis(analysis: &MatchAnalysis, plan: &OutputPlan) -> Result<ExportReport> {
    fs::create_dir_all(&plan.output_dir).map_err(|source| PipelineError::Io {
        path: plan.output_dir.clone(),
        source,
    })?;

    let teams = [
        (plan.team_a_stem.as_str(), &analysis.team_a),
        (plan.team_b_stem.as_str(), &analysis.team_b),
    ];
    let mut report = ExportReport::default();

    for (stem, team) in &teams {
        let matrix_path = plan.output_dir.join(format!("{stem}_matrix.csv"));
        write_csv_file(&matrix_path, |w| write_team_matrix(w, &team.table))?;
        report.files.push(matrix_path);

        let players_path = plan.output_dir.join(format!("{stem}_players.csv"));
        write_csv_file(&players_path, |w| write_player_summary(w, team))?;
        report.files.push(players_path);
    }

    if plan.workbook {
        let path = plan.output_dir.join(WORKBOOK_FILE);
        write_workbook(&path, &teams)?;
        report.files.push(path);
    }

    let report_path = plan.output_dir.join(RUN_REPORT_FILE);
    write_run_report(&report_path, &RunReport::from_analysis(analysis))?;
    report.files.push(report_path);

    for file in &report.files {
        info!(path = %file.display(), "wrote output");
    }
    Ok(report)
}

fn write_csv_file(
    path: &Path,
    write: impl FnOnce(&mut BufWriter<File>) -> csv::Result<()>,
) -> Result<()> {
    let csv_error = |source| PipelineError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let tmp = path.with_extension("csv.tmp");
    let file = File::create(&tmp).map_err(|source| io_error(&tmp, source))?;
    let mut writer = BufWriter::new(file);
    write(&mut writer).map_err(csv_error)?;
    writer.flush().map_err(|source| io_error(&tmp, source))?;
    fs::rename(&tmp, path).map_err(|source| io_error(path, source))
}

fn write_file(path: &Path, write: impl FnOnce(&mut BufWriter<File>) -> io::Result<()>) -> Result<()> {
    let tmp = path.with_extension("tmp");
    let file = File::create(&tmp).map_err(|source| io_error(&tmp, source))?;
    let mut writer = BufWriter::new(file);
    write(&mut writer).map_err(|source| io_error(&tmp, source))?;
    writer.flush().map_err(|source| io_error(&tmp, source))?;
    fs::rename(&tmp, path).map_err(|source| io_error(path, source))
}

fn io_error(path: &Path, source: io::Error) -> PipelineError {
    PipelineError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::aggregate::{MedianPosition, PassTotals};
    use crate::matrix::AdjacencyMatrix;
    use crate::team::PlayerSummary;

    fn report() -> TeamReport {
        let players = vec![7, 9];
        let totals = BTreeMap::from([(
            7,
            PassTotals {
                total: 2,
                successful: 1,
            },
        )]);
        let matrix = AdjacencyMatrix::build(&players, &BTreeMap::from([((7, 9), 2)]), &totals);
        TeamReport {
            table: TeamTable {
                team: "TeamA".to_string(),
                names: vec![Some("Seven".to_string()), None],
                matrix,
            },
            players: vec![
                PlayerSummary {
                    player_id: 7,
                    name: Some("Seven".to_string()),
                    totals: totals[&7],
                    median_position: Some(MedianPosition {
                        x: Some(20.0),
                        y: Some(30.5),
                    }),
                    average_pass_value: Some(0.05),
                },
                PlayerSummary {
                    player_id: 9,
                    name: None,
                    totals: PassTotals::default(),
                    median_position: None,
                    average_pass_value: None,
                },
            ],
            intra_team_passes: 2,
            missing_names: vec![9],
        }
    }

    #[test]
    fn matrix_csv_has_name_first_and_totals_last() {
        let mut out = Vec::new();
        write_team_matrix(&mut out, &report().table).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            ",Player,7,9,total_suc_pass,total_num_of_pass\n7,Seven,0,2,1,2\n9,,0,0,0,0\n"
        );
    }

    #[test]
    fn player_summary_leaves_absent_values_blank() {
        let mut out = Vec::new();
        write_player_summary(&mut out, &report()).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "id,Player,num_of_pass,suc_pass,x,y,average_pass_value");
        assert_eq!(lines[1], "7,Seven,2,1,20,30.5,0.05");
        assert_eq!(lines[2], "9,,0,0,,,");
    }
}
