//! Parser for the `Sub on` column.
//!
//! The stats export stores substitution minutes as a bracketed list
//! literal, e.g. `[0, 34]` or `[]`. Only that shape is accepted: a list
//! of plain decimal numbers, optionally with a trailing comma.

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MarkerParseError {
    #[error("expected a bracketed list such as [0, 34]")]
    NotAList,
    #[error("empty element at position {0}")]
    EmptyElement(usize),
    #[error("element {index} ({token:?}) is not a number")]
    NotANumber { index: usize, token: String },
}

pub fn parse_sub_markers(raw: &str) -> Result<Vec<f64>, MarkerParseError> {
    let inner = raw
        .trim()
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or(MarkerParseError::NotAList)?;

    if inner.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut tokens: Vec<&str> = inner.split(',').map(str::trim).collect();
    if tokens.len() > 1 && tokens.last().is_some_and(|t| t.is_empty()) {
        tokens.pop();
    }

    tokens
        .into_iter()
        .enumerate()
        .map(|(index, token)| parse_marker(index, token))
        .collect()
}

fn parse_marker(index: usize, token: &str) -> Result<f64, MarkerParseError> {
    if token.is_empty() {
        return Err(MarkerParseError::EmptyElement(index));
    }
    // `f64::from_str` also takes `inf` and `NaN`; the list literal never does.
    let numeric_chars = token
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | 'e' | 'E'));
    let has_digit = token.chars().any(|c| c.is_ascii_digit());
    if !numeric_chars || !has_digit {
        return Err(MarkerParseError::NotANumber {
            index,
            token: token.to_string(),
        });
    }
    token.parse::<f64>().map_err(|_| MarkerParseError::NotANumber {
        index,
        token: token.to_string(),
    })
}
