use crate::core::chemistry;
use serde::{Deserialize, Serialize};

/// One row of the type id → element table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeMapRow {
    pub type_id: u32,
    pub element: String,
}

impl TypeMapRow {
    /// Known symbols are stored in canonical case (`"CL"` → `"Cl"`); other
    /// text is kept trimmed.
    pub fn new(type_id: u32, element: &str) -> Self {
        let trimmed = element.trim();
        Self {
            type_id,
            element: chemistry::canonical_symbol(trimmed)
                .unwrap_or(trimmed)
                .to_string(),
        }
    }

    /// Row mapped to the placeholder element.
    pub fn unresolved(type_id: u32) -> Self {
        Self::new(type_id, chemistry::PLACEHOLDER_SYMBOL)
    }

    /// Returns `true` if the element is empty or the placeholder.
    pub fn is_unresolved(&self) -> bool {
        chemistry::is_placeholder(&self.element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_trims_element() {
        let row = TypeMapRow::new(3, " Si ");
        assert_eq!(row.element, "Si");
        assert!(!row.is_unresolved());
    }

    #[test]
    fn new_canonicalizes_known_symbols() {
        assert_eq!(TypeMapRow::new(1, "si").element, "Si");
        assert_eq!(TypeMapRow::new(2, " CL ").element, "Cl");
        assert_eq!(TypeMapRow::new(3, "Xx").element, "Xx");
        assert!(TypeMapRow::new(4, "E").is_unresolved());
    }

    #[test]
    fn empty_and_placeholder_rows_are_unresolved() {
        assert!(TypeMapRow::unresolved(1).is_unresolved());
        assert!(TypeMapRow::new(1, "").is_unresolved());
    }
}
