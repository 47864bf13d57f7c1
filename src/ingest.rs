//! Readers for the three match tables.
//!
//! Each table has a `read_*` function over any `io::Read` plus a `load_*`
//! wrapper that opens a file. `origin` only labels error messages.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{PipelineError, Result};
use crate::model::{
    ParticipationRow, PassEvent, PlayerId, RawSuccess, parse_optional_f64, parse_player_id,
};
use crate::team::PlayerNames;

const PASS_COLUMNS: [&str; 6] = [
    "passedPlayerId",
    "receivedPlayerId",
    "passedPlayerPosX",
    "passedPlayerPosY",
    "isSucceeded",
    "receivedPlayer_xT_gained",
];
const PARTICIPATION_COLUMNS: [&str; 3] = ["id", "Match Team", "Sub on"];
const NAME_ID_COLUMN: &str = "id";
const NAME_COLUMN: &str = "Name";

#[derive(Debug, Deserialize)]
struct PassRow {
    #[serde(rename = "passedPlayerId")]
    passer: Option<String>,
    #[serde(rename = "receivedPlayerId")]
    receiver: Option<String>,
    #[serde(rename = "passedPlayerPosX")]
    pos_x: Option<String>,
    #[serde(rename = "passedPlayerPosY")]
    pos_y: Option<String>,
    #[serde(rename = "isSucceeded")]
    succeeded: Option<String>,
    #[serde(rename = "receivedPlayer_xT_gained")]
    xt_gained: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ParticipationCsvRow {
    id: String,
    #[serde(rename = "Match Team")]
    team: String,
    #[serde(rename = "Sub on")]
    sub_on: Option<String>,
}

pub fn load_pass_events(path: &Path) -> Result<Vec<PassEvent>> {
    let events = read_pass_events(open(path)?, path)?;
    info!(path = %path.display(), rows = events.len(), "loaded pass events");
    Ok(events)
}

pub fn read_pass_events<R: Read>(rdr: R, origin: &Path) -> Result<Vec<PassEvent>> {
    read_rows(rdr, origin, &PASS_COLUMNS, |line, row: PassRow| {
        let name = origin.display().to_string();
        let id = |raw: Option<&str>, reason: &str| -> Result<Option<PlayerId>> {
            match raw.map(str::trim) {
                None | Some("") => Ok(None),
                Some(raw) if raw.eq_ignore_ascii_case("nan") => Ok(None),
                Some(raw) => parse_player_id(raw)
                    .map(Some)
                    .ok_or_else(|| PipelineError::input_format(&name, line, raw, reason)),
            }
        };
        let passer = id(row.passer.as_deref(), "passer id is not an integer")?;
        let receiver = id(row.receiver.as_deref(), "receiver id is not an integer")?;
        let number = |raw: Option<String>| -> Result<Option<f64>> {
            let raw = raw.unwrap_or_default();
            parse_optional_f64(&raw)
                .map_err(|reason| PipelineError::input_format(&name, line, &raw, reason))
        };
        Ok(PassEvent {
            passer,
            receiver,
            origin_x: number(row.pos_x)?,
            origin_y: number(row.pos_y)?,
            raw_success: RawSuccess::parse(row.succeeded.as_deref().unwrap_or_default()),
            xt_gained: number(row.xt_gained)?,
        })
    })
}

pub fn load_participation(path: &Path) -> Result<Vec<ParticipationRow>> {
    let rows = read_participation(open(path)?, path)?;
    info!(path = %path.display(), rows = rows.len(), "loaded participation table");
    Ok(rows)
}

/// `Sub on` stays text here; roster resolution parses it.
pub fn read_participation<R: Read>(rdr: R, origin: &Path) -> Result<Vec<ParticipationRow>> {
    read_rows(
        rdr,
        origin,
        &PARTICIPATION_COLUMNS,
        |line, row: ParticipationCsvRow| {
            let player_id = parse_player_id(&row.id).ok_or_else(|| {
                PipelineError::input_format(
                    origin.display().to_string(),
                    line,
                    &row.id,
                    "player id is not an integer",
                )
            })?;
            Ok(ParticipationRow {
                line,
                player_id,
                team: row.team,
                sub_on: row.sub_on.unwrap_or_default(),
            })
        },
    )
}

/// Loads an `id` -> `Name` table from a workbook sheet or a CSV file.
///
/// `sheet_index` is zero-based and ignored for CSV input.
pub fn load_player_names(path: &Path, sheet_index: usize) -> Result<PlayerNames> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    let names = if is_csv {
        read_player_names_csv(open(path)?, path)?
    } else {
        read_player_names_workbook(path, sheet_index)?
    };
    info!(path = %path.display(), players = names.len(), "loaded player names");
    Ok(names)
}

pub fn read_player_names_csv<R: Read>(rdr: R, origin: &Path) -> Result<PlayerNames> {
    let mut reader = csv::Reader::from_reader(rdr);
    let headers: Vec<String> = reader
        .headers()
        .map_err(|source| csv_error(origin, source))?
        .iter()
        .map(str::to_string)
        .collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| csv_error(origin, source))?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    collect_names(origin, &headers, rows)
}

fn read_player_names_workbook(path: &Path, sheet_index: usize) -> Result<PlayerNames> {
    let spreadsheet_error = |reason: String| PipelineError::Spreadsheet {
        path: path.to_path_buf(),
        reason,
    };
    let mut workbook = open_workbook_auto(path).map_err(|err| spreadsheet_error(err.to_string()))?;
    let range = workbook
        .worksheet_range_at(sheet_index)
        .ok_or_else(|| spreadsheet_error(format!("no sheet at index {sheet_index}")))?
        .map_err(|err| spreadsheet_error(err.to_string()))?;

    let mut rows = range
        .rows()
        .map(|cells| cells.iter().map(cell_text).collect::<Vec<String>>());
    let headers = rows
        .next()
        .ok_or_else(|| spreadsheet_error(format!("sheet {sheet_index} is empty")))?;
    collect_names(path, &headers, rows)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        other => other.to_string(),
    }
}

fn collect_names(
    origin: &Path,
    headers: &[String],
    rows: impl IntoIterator<Item = Vec<String>>,
) -> Result<PlayerNames> {
    let id_col = column_index(origin, headers, NAME_ID_COLUMN)?;
    let name_col = column_index(origin, headers, NAME_COLUMN)?;

    let mut names = PlayerNames::new();
    for row in rows {
        let raw_id = row.get(id_col).map(String::as_str).unwrap_or_default();
        // Report sheets carry footer and subtotal rows without a numeric id.
        let Some(id) = parse_player_id(raw_id) else {
            if !raw_id.trim().is_empty() {
                debug!(value = raw_id, "skipping name row without player id");
            }
            continue;
        };
        let name = row.get(name_col).map(|n| n.trim()).unwrap_or_default();
        if !name.is_empty() {
            names.insert(id, name.to_string());
        }
    }
    Ok(names)
}

fn column_index(origin: &Path, headers: &[String], column: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim() == column)
        .ok_or_else(|| PipelineError::MissingColumn {
            source_name: origin.display().to_string(),
            column: column.to_string(),
        })
}

fn read_rows<R, Row, T, F>(rdr: R, origin: &Path, required: &[&str], mut convert: F) -> Result<Vec<T>>
where
    R: Read,
    Row: for<'de> Deserialize<'de>,
    F: FnMut(usize, Row) -> Result<T>,
{
    let mut reader = csv::Reader::from_reader(rdr);
    let headers = reader
        .headers()
        .map_err(|source| csv_error(origin, source))?
        .clone();
    let header_names: Vec<String> = headers.iter().map(str::to_string).collect();
    for column in required {
        column_index(origin, &header_names, column)?;
    }

    let mut out = Vec::new();
    let mut record = csv::StringRecord::new();
    while reader
        .read_record(&mut record)
        .map_err(|source| csv_error(origin, source))?
    {
        let line = record.position().map_or(0, |pos| pos.line() as usize);
        let row: Row = record
            .deserialize(Some(&headers))
            .map_err(|source| csv_error(origin, source))?;
        out.push(convert(line, row)?);
    }
    Ok(out)
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn csv_error(origin: &Path, source: csv::Error) -> PipelineError {
    PipelineError::Csv {
        path: origin.to_path_buf(),
        source,
    }
}
