use crate::core::chemistry;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use thiserror::Error;

/// Identifies a group of atoms (or bond halves) drawn with one color.
///
/// Usually just the element symbol. When several type ids resolve to the same
/// element the key becomes `element#typeId` so each type can be colored on
/// its own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColorKey(String);

impl ColorKey {
    pub fn element(element: &str) -> Self {
        Self(element.to_string())
    }

    pub fn typed(element: &str, type_id: u32) -> Self {
        Self(format!("{}#{}", element, type_id))
    }

    /// Picks the key for an atom. `shared_elements` lists the elements that
    /// more than one type id maps to.
    pub fn for_atom(element: &str, type_id: Option<u32>, shared_elements: &BTreeSet<String>) -> Self {
        match type_id {
            Some(type_id) if shared_elements.contains(element) => Self::typed(element, type_id),
            _ => Self::element(element),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The element part of the key.
    pub fn element_symbol(&self) -> &str {
        self.0.split('#').next().unwrap_or(&self.0)
    }

    /// The type id part of the key, if the key is type-qualified.
    pub fn type_id(&self) -> Option<u32> {
        self.0.split_once('#').and_then(|(_, id)| id.parse().ok())
    }
}

impl fmt::Display for ColorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ColorKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ColorError {
    #[error("Invalid color '{0}': expected #RRGGBB")]
    InvalidHex(String),
}

/// Parses `#RRGGBB` (the leading `#` is optional) into linear 0..1 channels.
pub fn parse_hex_color(hex: &str) -> Result<[f32; 3], ColorError> {
    let digits = hex.trim().trim_start_matches('#');
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ColorError::InvalidHex(hex.to_string()));
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16)
            .map(|v| v as f32 / 255.0)
            .map_err(|_| ColorError::InvalidHex(hex.to_string()))
    };
    Ok([channel(0..2)?, channel(2..4)?, channel(4..6)?])
}

/// One entry of the color map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorEntry {
    pub element: String,
    pub type_id: Option<u32>,
    /// `#RRGGBB`, upper case.
    pub color: String,
    /// `true` when the user replaced the table default.
    pub is_custom: bool,
}

/// Colors per [`ColorKey`]; defaults come from the chemistry table.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    entries: BTreeMap<ColorKey, ColorEntry>,
}

impl ColorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the color for `key`, inserting the element default on first use.
    pub fn resolve(&mut self, key: &ColorKey) -> &ColorEntry {
        self.entries.entry(key.clone()).or_insert_with(|| ColorEntry {
            element: key.element_symbol().to_string(),
            type_id: key.type_id(),
            color: chemistry::default_color(key.element_symbol()).to_string(),
            is_custom: false,
        })
    }

    pub fn get(&self, key: &ColorKey) -> Option<&ColorEntry> {
        self.entries.get(key)
    }

    /// Replaces the color for `key` with a user choice.
    pub fn set_custom(&mut self, key: &ColorKey, hex: &str) -> Result<&ColorEntry, ColorError> {
        parse_hex_color(hex)?;
        let digits = hex.trim().trim_start_matches('#').to_ascii_uppercase();
        let entry = self.entries.entry(key.clone()).or_insert_with(|| ColorEntry {
            element: key.element_symbol().to_string(),
            type_id: key.type_id(),
            color: String::new(),
            is_custom: true,
        });
        entry.color = format!("#{}", digits);
        entry.is_custom = true;
        Ok(entry)
    }

    /// Drops a custom color so the table default applies again.
    pub fn reset(&mut self, key: &ColorKey) {
        self.entries.remove(key);
    }

    pub fn entries(&self) -> impl Iterator<Item = (&ColorKey, &ColorEntry)> {
        self.entries.iter()
    }
}
