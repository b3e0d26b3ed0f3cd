use crate::core::chemistry;
use nalgebra::Point3;

/// A single atom of one frame.
///
/// `element` is never empty; atoms whose type id has not been mapped carry the
/// [`chemistry::PLACEHOLDER_SYMBOL`]. `id` is the per-particle identity used to
/// keep instance slots stable between frames, and `type_id` is only set by the
/// lattice-simulation formats.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Element symbol, canonical case when recognised (e.g. "C", "Cl").
    pub element: String,
    /// Cartesian position in Ångström.
    pub position: Point3<f64>,
    /// Stable particle identity, if the format provides one.
    pub id: Option<u64>,
    /// Positive simulation type identifier, if the format provides one.
    pub type_id: Option<u32>,
}

impl Atom {
    /// Creates an atom without identity or type information.
    ///
    /// An empty `element` is replaced by the placeholder symbol so the
    /// non-empty invariant always holds.
    pub fn new(element: &str, position: Point3<f64>) -> Self {
        let element = element.trim();
        Self {
            element: if element.is_empty() {
                chemistry::PLACEHOLDER_SYMBOL.to_string()
            } else {
                element.to_string()
            },
            position,
            id: None,
            type_id: None,
        }
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_type_id(mut self, type_id: u32) -> Self {
        self.type_id = Some(type_id);
        self
    }

    /// Returns `true` while the atom still carries the placeholder element.
    pub fn is_unresolved(&self) -> bool {
        chemistry::is_placeholder(&self.element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_atom_has_no_identity_or_type() {
        let atom = Atom::new("C", Point3::new(1.0, 2.0, 3.0));
        assert_eq!(atom.element, "C");
        assert_eq!(atom.position, Point3::new(1.0, 2.0, 3.0));
        assert_eq!(atom.id, None);
        assert_eq!(atom.type_id, None);
        assert!(!atom.is_unresolved());
    }

    #[test]
    fn empty_element_becomes_placeholder() {
        let atom = Atom::new("  ", Point3::origin());
        assert_eq!(atom.element, chemistry::PLACEHOLDER_SYMBOL);
        assert!(atom.is_unresolved());
    }

    #[test]
    fn builder_methods_set_optional_fields() {
        let atom = Atom::new("E", Point3::origin()).with_id(7).with_type_id(2);
        assert_eq!(atom.id, Some(7));
        assert_eq!(atom.type_id, Some(2));
        assert!(atom.is_unresolved());
    }
}
