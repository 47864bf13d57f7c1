use std::collections::BTreeSet;

use serde::Serialize;

pub type PlayerId = u32;

/// `isSucceeded` exactly as the event log recorded it.
///
/// Exports mix float flags (`1.0` / `0.0`) with text flags (`True` /
/// `False`), so the original cell is kept next to the canonical boolean.
#[derive(Debug, Clone, PartialEq)]
pub enum RawSuccess {
    Numeric(f64),
    Text(String),
}

impl RawSuccess {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<f64>() {
            Ok(value) if value.is_finite() => RawSuccess::Numeric(value),
            _ => RawSuccess::Text(trimmed.to_string()),
        }
    }

    /// Canonical success: numeric `1.0` or the text `True`. Anything else failed.
    pub fn is_success(&self) -> bool {
        match self {
            RawSuccess::Numeric(value) => *value == 1.0,
            RawSuccess::Text(text) => text == "True",
        }
    }

    /// Strict numeric equality with `1.0`; a textual `True` does not qualify.
    pub fn is_numeric_one(&self) -> bool {
        matches!(self, RawSuccess::Numeric(value) if *value == 1.0)
    }
}

/// One directed pass attempt from the event log.
#[derive(Debug, Clone, PartialEq)]
pub struct PassEvent {
    /// `None` when the log row carries no passer id.
    pub passer: Option<PlayerId>,
    pub receiver: Option<PlayerId>,
    pub origin_x: Option<f64>,
    pub origin_y: Option<f64>,
    pub raw_success: RawSuccess,
    pub xt_gained: Option<f64>,
}

/// Participation row as read from the stats table, `Sub on` still unparsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipationRow {
    pub line: usize,
    pub player_id: PlayerId,
    pub team: String,
    pub sub_on: String,
}

/// One player's participation with the substitution markers parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct SubstitutionRecord {
    pub player_id: PlayerId,
    pub team: String,
    pub sub_on: Vec<f64>,
}

impl SubstitutionRecord {
    /// A zero marker means the player was on the pitch at kickoff.
    pub fn started(&self) -> bool {
        self.sub_on.iter().any(|marker| *marker == 0.0)
    }
}

/// Starters of one team. Iteration is ascending by id, which also fixes
/// the row and column order of the adjacency matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Roster {
    pub team: String,
    pub players: BTreeSet<PlayerId>,
}

impl Roster {
    pub fn new(team: impl Into<String>, players: impl IntoIterator<Item = PlayerId>) -> Self {
        Self {
            team: team.into(),
            players: players.into_iter().collect(),
        }
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.players.contains(&id)
    }

    pub fn ordered_ids(&self) -> Vec<PlayerId> {
        self.players.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

/// Parses a player id, accepting float-typed exports such as `123.0`.
pub fn parse_player_id(raw: &str) -> Option<PlayerId> {
    let trimmed = raw.trim();
    if let Ok(id) = trimmed.parse::<PlayerId>() {
        return Some(id);
    }
    let value = trimmed.parse::<f64>().ok()?;
    if !value.is_finite() || value.fract() != 0.0 || value < 0.0 || value > PlayerId::MAX as f64 {
        return None;
    }
    Some(value as PlayerId)
}

/// Blank cells and `nan` count as missing.
pub fn parse_optional_f64(raw: &str) -> Result<Option<f64>, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_nan() => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(err) => Err(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_success_recognises_both_encodings() {
        assert!(RawSuccess::parse("1.0").is_success());
        assert!(RawSuccess::parse("True").is_success());
        assert!(!RawSuccess::parse("0.0").is_success());
        assert!(!RawSuccess::parse("False").is_success());
        assert!(!RawSuccess::parse("true").is_success());
        assert!(!RawSuccess::parse("").is_success());
    }

    #[test]
    fn strict_numeric_ignores_text_true() {
        assert!(RawSuccess::parse("1.0").is_numeric_one());
        assert!(RawSuccess::parse(" 1 ").is_numeric_one());
        assert!(!RawSuccess::parse("True").is_numeric_one());
    }

    #[test]
    fn player_id_accepts_float_exports() {
        assert_eq!(parse_player_id("42"), Some(42));
        assert_eq!(parse_player_id("42.0"), Some(42));
        assert_eq!(parse_player_id("42.5"), None);
        assert_eq!(parse_player_id("-1"), None);
        assert_eq!(parse_player_id(""), None);
        assert_eq!(parse_player_id("abc"), None);
    }

    #[test]
    fn optional_f64_treats_nan_as_missing() {
        assert_eq!(parse_optional_f64(""), Ok(None));
        assert_eq!(parse_optional_f64("NaN"), Ok(None));
        assert_eq!(parse_optional_f64("12.5"), Ok(Some(12.5)));
        assert!(parse_optional_f64("twelve").is_err());
    }

    #[test]
    fn starter_needs_zero_marker() {
        let starter = SubstitutionRecord {
            player_id: 7,
            team: "TeamA".to_string(),
            sub_on: vec![0.0, 34.0],
        };
        let bench = SubstitutionRecord {
            sub_on: vec![12.0],
            ..starter.clone()
        };
        assert!(starter.started());
        assert!(!bench.started());
    }
}
