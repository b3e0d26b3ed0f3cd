use super::error::{ParseError, ParseErrorKind};
use crate::core::chemistry;

/// Parses a finite float; `line` is 1-based and only used for the error.
pub(crate) fn parse_f64(token: &str, field: &'static str, line: usize) -> Result<f64, ParseError> {
    let value: f64 = token.trim().parse().map_err(|_| {
        ParseError::at(
            line,
            ParseErrorKind::InvalidFloat {
                field,
                value: token.trim().to_string(),
            },
        )
    })?;
    if !value.is_finite() {
        return Err(ParseError::at(
            line,
            ParseErrorKind::NonFiniteCoordinate {
                field,
                value: token.trim().to_string(),
            },
        ));
    }
    Ok(value)
}

pub(crate) fn parse_u64(token: &str, field: &'static str, line: usize) -> Result<u64, ParseError> {
    token.trim().parse().map_err(|_| {
        ParseError::at(
            line,
            ParseErrorKind::InvalidInt {
                field,
                value: token.trim().to_string(),
            },
        )
    })
}

pub(crate) fn parse_usize(token: &str, field: &'static str, line: usize) -> Result<usize, ParseError> {
    token.trim().parse().map_err(|_| {
        ParseError::at(
            line,
            ParseErrorKind::InvalidInt {
                field,
                value: token.trim().to_string(),
            },
        )
    })
}

/// Parses a strictly positive type id.
pub(crate) fn parse_type_id(token: &str, line: usize) -> Result<u32, ParseError> {
    match token.trim().parse::<u32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ParseError::at(
            line,
            ParseErrorKind::InvalidTypeId {
                value: token.trim().to_string(),
            },
        )),
    }
}

/// Returns `true` if the token reads as a float but not as an integer (`0.5`, `1.0`, `1e-3`).
pub(crate) fn is_non_integer_float(token: &str) -> bool {
    token.parse::<i64>().is_err() && token.parse::<f64>().is_ok()
}

/// Maps a free-form label to an element symbol.
///
/// Tries the label as-is, then its leading letters (two, then one). Returns
/// `None` if nothing matches.
pub(crate) fn guess_element(label: &str) -> Option<&'static str> {
    let label = label.trim();
    if let Some(symbol) = chemistry::canonical_symbol(label) {
        return Some(symbol);
    }
    let letters: String = label.chars().take_while(|c| c.is_ascii_alphabetic()).collect();
    if letters.len() >= 2 {
        if let Some(symbol) = chemistry::canonical_symbol(&letters[..2]) {
            return Some(symbol);
        }
    }
    letters.get(..1).and_then(chemistry::canonical_symbol)
}

/// Splits off an inline `#` comment, returning `(content, comment)`.
pub(crate) fn strip_comment(line: &str) -> (&str, Option<&str>) {
    match line.split_once('#') {
        Some((content, comment)) => (content, Some(comment.trim())),
        None => (line, None),
    }
}

/// Byte-range slice that tolerates short lines, trimmed.
pub(crate) fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    let end = end.min(line.len());
    if start >= end {
        return "";
    }
    line.get(start..end).unwrap_or("").trim()
}
