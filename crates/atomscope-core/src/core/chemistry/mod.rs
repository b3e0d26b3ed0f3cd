//! # Chemistry Module
//!
//! Static per-element data used across the library: atomic number, default
//! display color and covalent radius.
//!
//! The table is a compile-time [`phf`] map, so lookups never allocate and the
//! data can be shared freely between threads. There is no mutation API; any
//! per-session customisation (custom colors, radius overrides) lives in the
//! engine layer and only reads from here.
//!
//! Symbols coming from files are rarely in canonical case (`CL`, `fe`), so
//! every public lookup goes through [`canonical_symbol`] first.

mod elements;

pub use elements::ElementData;

use elements::ELEMENTS;

/// Sentinel element symbol for atoms whose type id has not been mapped yet.
pub const PLACEHOLDER_SYMBOL: &str = "E";

/// Display color used for the placeholder and for unknown symbols.
pub const PLACEHOLDER_COLOR: &str = "#FF1493";

/// Radius used for the placeholder and for unknown symbols (carbon-like).
pub const PLACEHOLDER_RADIUS: f64 = 0.77;

/// Returns `true` for the empty string and for the [`PLACEHOLDER_SYMBOL`].
pub fn is_placeholder(symbol: &str) -> bool {
    let trimmed = symbol.trim();
    trimmed.is_empty() || trimmed == PLACEHOLDER_SYMBOL
}

/// Normalizes a raw symbol (`"CL"`, `" fe "`) to the canonical table key.
///
/// Returns `None` when the input is not a known element. The placeholder is
/// not an element and also yields `None`.
pub fn canonical_symbol(raw: &str) -> Option<&'static str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.len() > 2 || !trimmed.chars().all(|c| c.is_ascii_alphabetic())
    {
        return None;
    }
    let mut normalized = String::with_capacity(2);
    for (i, c) in trimmed.chars().enumerate() {
        if i == 0 {
            normalized.push(c.to_ascii_uppercase());
        } else {
            normalized.push(c.to_ascii_lowercase());
        }
    }
    ELEMENTS.get_entry(normalized.as_str()).map(|(key, _)| *key)
}

/// Looks up the static data for an element symbol in any case.
pub fn element(symbol: &str) -> Option<&'static ElementData> {
    canonical_symbol(symbol).and_then(|key| ELEMENTS.get(key))
}

/// Covalent radius in Ångström, falling back to [`PLACEHOLDER_RADIUS`].
pub fn covalent_radius(symbol: &str) -> f64 {
    element(symbol).map_or(PLACEHOLDER_RADIUS, |e| e.covalent_radius)
}

/// Default `#RRGGBB` display color, falling back to [`PLACEHOLDER_COLOR`].
pub fn default_color(symbol: &str) -> &'static str {
    element(symbol).map_or(PLACEHOLDER_COLOR, |e| e.color)
}

/// Atomic number, or `0` for the placeholder and unknown symbols.
pub fn atomic_number(symbol: &str) -> u8 {
    element(symbol).map_or(0, |e| e.atomic_number)
}

/// Reverse lookup by atomic number, for formats that write `6` instead of `C`.
pub fn symbol_for_number(atomic_number: u8) -> Option<&'static str> {
    ELEMENTS
        .entries()
        .find(|(_, data)| data.atomic_number == atomic_number)
        .map(|(symbol, _)| *symbol)
}
