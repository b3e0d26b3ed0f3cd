/// An undirected bond between two atoms of the same frame.
///
/// Indices always satisfy `i < j`. Bonds are derived from geometry for the
/// frame being displayed and are never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bond {
    pub i: usize,
    pub j: usize,
    /// Bond length in Ångström at the time the bond was inferred.
    pub length: f64,
}

impl Bond {
    /// Creates a bond, ordering the two indices.
    pub fn new(a: usize, b: usize, length: f64) -> Self {
        let (i, j) = if a < b { (a, b) } else { (b, a) };
        Self { i, j, length }
    }

    pub fn contains(&self, atom_index: usize) -> bool {
        self.i == atom_index || self.j == atom_index
    }

    /// Returns the partner of `atom_index`, or `None` if it is not an endpoint.
    pub fn other(&self, atom_index: usize) -> Option<usize> {
        if self.i == atom_index {
            Some(self.j)
        } else if self.j == atom_index {
            Some(self.i)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_orders_indices() {
        let bond = Bond::new(5, 2, 1.4);
        assert_eq!((bond.i, bond.j), (2, 5));
        assert_eq!(bond.length, 1.4);
    }

    #[test]
    fn contains_and_other_work_for_both_endpoints() {
        let bond = Bond::new(1, 3, 1.0);
        assert!(bond.contains(1));
        assert!(bond.contains(3));
        assert!(!bond.contains(2));
        assert_eq!(bond.other(1), Some(3));
        assert_eq!(bond.other(3), Some(1));
        assert_eq!(bond.other(0), None);
    }
}
