use std::path::{Path, PathBuf};

use rust_xlsxwriter::Workbook;

use pass_network::config::PipelineConfig;
use pass_network::error::PipelineError;
use pass_network::ingest::load_player_names;

/// Report-style workbook: a cover sheet first, the name table on sheet 1.
fn write_names_workbook(path: &Path) {
    let mut workbook = Workbook::new();
    let cover = workbook.add_worksheet();
    cover.set_name("Summary").expect("sheet name");
    cover.write_string(0, 0, "Match report").expect("cell");
    cover.write_string(1, 0, "id").expect("cell");

    let table = workbook.add_worksheet();
    table.set_name("Players").expect("sheet name");
    for (col, header) in ["id", "Name", "Minutes"].iter().enumerate() {
        table.write_string(0, col as u16, *header).expect("cell");
    }
    let rows: [(f64, &str, f64); 3] = [(7.0, "Alpha", 90.0), (9.0, " Bravo ", 90.0), (14.0, "Delta", 44.0)];
    for (i, (id, name, minutes)) in rows.iter().enumerate() {
        let r = i as u32 + 1;
        table.write_number(r, 0, *id).expect("cell");
        table.write_string(r, 1, *name).expect("cell");
        table.write_number(r, 2, *minutes).expect("cell");
    }
    table.write_string(4, 0, "Total").expect("cell");
    table.write_number(4, 2, 224.0).expect("cell");

    workbook.save(path).expect("workbook saves");
}

fn config(data_dir: PathBuf, output_dir: PathBuf) -> PipelineConfig {
    let mut cfg = PipelineConfig {
        data_dir,
        output_dir,
        ..PipelineConfig::default()
    };
    cfg.team_a.names_file = PathBuf::from("team_a_names.xlsx");
    cfg
}

#[test]
fn names_sheet_is_read_by_index() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("names.xlsx");
    write_names_workbook(&path);

    let names = load_player_names(&path, 1).expect("names load");
    assert_eq!(names.len(), 3);
    assert_eq!(names.get(&7).map(String::as_str), Some("Alpha"));
    assert_eq!(names.get(&9).map(String::as_str), Some("Bravo"));
    assert_eq!(names.get(&14).map(String::as_str), Some("Delta"));
}

#[test]
fn cover_sheet_without_name_column_is_rejected() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("names.xlsx");
    write_names_workbook(&path);

    let err = load_player_names(&path, 0).unwrap_err();
    assert!(
        matches!(err, PipelineError::MissingColumn { ref column, .. } if column == "id" || column == "Name"),
        "{err}"
    );
}

#[test]
fn missing_sheet_index_is_a_spreadsheet_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("names.xlsx");
    write_names_workbook(&path);

    let err = load_player_names(&path, 5).unwrap_err();
    assert!(matches!(err, PipelineError::Spreadsheet { .. }), "{err}");
}

#[test]
fn names_fall_back_to_output_dir() {
    let data = tempfile::tempdir().expect("temp dir");
    let output = tempfile::tempdir().expect("temp dir");
    let cfg = config(data.path().to_path_buf(), output.path().to_path_buf());
    write_names_workbook(&output.path().join("team_a_names.xlsx"));

    let path = cfg.names_path(&cfg.team_a);
    assert_eq!(path, output.path().join("team_a_names.xlsx"));
    let names = load_player_names(&path, cfg.names_sheet_index).expect("names load");
    assert_eq!(names.get(&7).map(String::as_str), Some("Alpha"));
}

#[test]
fn data_dir_names_win_over_output_dir() {
    let data = tempfile::tempdir().expect("temp dir");
    let output = tempfile::tempdir().expect("temp dir");
    let cfg = config(data.path().to_path_buf(), output.path().to_path_buf());
    write_names_workbook(&data.path().join("team_a_names.xlsx"));
    write_names_workbook(&output.path().join("team_a_names.xlsx"));

    assert_eq!(
        cfg.names_path(&cfg.team_a),
        data.path().join("team_a_names.xlsx")
    );
}
