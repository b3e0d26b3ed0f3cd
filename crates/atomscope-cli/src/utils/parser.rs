use atomscope::core::chemistry;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid assignment '{0}'. Expected KEY=VALUE.")]
    MissingEquals(String),

    #[error("Invalid type id '{0}'. Expected a positive integer.")]
    InvalidTypeId(String),

    #[error("Unknown element symbol '{0}'.")]
    UnknownElement(String),
}

/// Splits `key=value` at the first `=`; both sides are trimmed.
pub fn parse_key_value(raw: &str) -> Result<(&str, &str), ParseError> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim(), value.trim())),
        _ => Err(ParseError::MissingEquals(raw.to_string())),
    }
}

pub fn parse_type_id(raw: &str) -> Result<u32, ParseError> {
    match raw.trim().parse::<u32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ParseError::InvalidTypeId(raw.to_string())),
    }
}

/// Canonical symbol for `raw`; the placeholder is accepted to mark a type as unresolved.
pub fn parse_element(raw: &str) -> Result<String, ParseError> {
    let raw = raw.trim();
    if chemistry::is_placeholder(raw) {
        return Ok(chemistry::PLACEHOLDER_SYMBOL.to_string());
    }
    chemistry::canonical_symbol(raw)
        .map(str::to_string)
        .ok_or_else(|| ParseError::UnknownElement(raw.to_string()))
}

/// Parses a `--type 3=Si` assignment.
pub fn parse_type_assignment(raw: &str) -> Result<(u32, String), ParseError> {
    let (id, element) = parse_key_value(raw)?;
    Ok((parse_type_id(id)?, parse_element(element)?))
}
