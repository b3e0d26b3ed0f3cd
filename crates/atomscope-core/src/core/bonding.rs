//! # Bond Inference
//!
//! Geometric bond detection for one frame from positions and covalent radii.
//!
//! A pair `(i, j)` is bonded when its distance is at most
//! `(r_i + r_j) * bond_factor` and above [`MIN_BOND_LENGTH`]. The search is a
//! plain pairwise scan with per-axis rejection before the full distance is
//! computed; it runs once per displayed frame rebuild, never per animation
//! tick. Output is ordered by `i` then `j`.

use crate::core::chemistry;
use crate::core::models::atom::Atom;
use crate::core::models::topology::Bond;
use thiserror::Error;
use tracing::{debug, instrument};

/// Pairs closer than this are coincident coordinates, not bonds.
pub const MIN_BOND_LENGTH: f64 = 1e-7;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BondingError {
    #[error("Bond factor must be a positive finite number (value: {0})")]
    InvalidFactor(f64),
}

/// Computes every bonded pair of `atoms`.
///
/// # Errors
///
/// Returns [`BondingError::InvalidFactor`] for a non-positive or non-finite
/// `bond_factor`.
#[instrument(skip_all, name = "compute_bonds", fields(atoms = atoms.len(), bond_factor = bond_factor))]
pub fn compute_bonds(atoms: &[Atom], bond_factor: f64) -> Result<Vec<Bond>, BondingError> {
    if !bond_factor.is_finite() || bond_factor <= 0.0 {
        return Err(BondingError::InvalidFactor(bond_factor));
    }

    let radii: Vec<f64> = atoms.iter().map(|a| chemistry::covalent_radius(&a.element)).collect();
    let min_sq = MIN_BOND_LENGTH * MIN_BOND_LENGTH;
    let mut bonds = Vec::new();

    for (i, a) in atoms.iter().enumerate() {
        for (j, b) in atoms.iter().enumerate().skip(i + 1) {
            let cutoff = (radii[i] + radii[j]) * bond_factor;
            let delta = b.position - a.position;
            if delta.x.abs() > cutoff || delta.y.abs() > cutoff || delta.z.abs() > cutoff {
                continue;
            }
            let dist_sq = delta.norm_squared();
            if dist_sq <= cutoff * cutoff && dist_sq > min_sq {
                bonds.push(Bond::new(i, j, dist_sq.sqrt()));
            }
        }
    }

    debug!(bonds = bonds.len(), "Inferred bonds.");
    Ok(bonds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;
    use std::collections::HashSet;

    fn atom(element: &str, x: f64, y: f64, z: f64) -> Atom {
        Atom::new(element, Point3::new(x, y, z))
    }

    #[test]
    fn carbon_oxygen_pair_within_cutoff_is_bonded() {
        let atoms = vec![atom("C", 0.0, 0.0, 0.0), atom("O", 1.2, 0.0, 0.0)];
        let bonds = compute_bonds(&atoms, 1.05).unwrap();
        assert_eq!(bonds.len(), 1);
        assert_eq!((bonds[0].i, bonds[0].j), (0, 1));
        assert!((bonds[0].length - 1.2).abs() < 1e-12);
    }

    #[test]
    fn pair_beyond_cutoff_is_not_bonded() {
        let atoms = vec![atom("C", 0.0, 0.0, 0.0), atom("O", 1.6, 0.0, 0.0)];
        assert!(compute_bonds(&atoms, 1.05).unwrap().is_empty());
    }

    #[test]
    fn diagonal_pair_passing_axis_checks_is_still_distance_tested() {
        // Each axis differs by 1.0 (< 1.49 cutoff) but the distance is ~1.73.
        let atoms = vec![atom("C", 0.0, 0.0, 0.0), atom("O", 1.0, 1.0, 1.0)];
        assert!(compute_bonds(&atoms, 1.05).unwrap().is_empty());
    }

    #[test]
    fn coincident_atoms_are_not_bonded() {
        let atoms = vec![atom("C", 1.0, 1.0, 1.0), atom("C", 1.0, 1.0, 1.0)];
        assert!(compute_bonds(&atoms, 1.2).unwrap().is_empty());
    }

    #[test]
    fn bonds_are_ordered_unique_and_repeatable() {
        let atoms = vec![
            atom("O", 0.0, 0.0, 0.0),
            atom("H", 0.96, 0.0, 0.0),
            atom("H", -0.24, 0.93, 0.0),
            atom("C", 5.0, 0.0, 0.0),
        ];
        let first = compute_bonds(&atoms, 1.15).unwrap();
        let second = compute_bonds(&atoms, 1.15).unwrap();
        assert_eq!(first, second);

        let pairs: Vec<(usize, usize)> = first.iter().map(|b| (b.i, b.j)).collect();
        assert_eq!(pairs, vec![(0, 1), (0, 2)]);
        let unique: HashSet<(usize, usize)> = pairs.iter().copied().collect();
        assert_eq!(unique.len(), pairs.len());
        assert!(pairs.iter().all(|(i, j)| i < j && !unique.contains(&(*j, *i))));
    }

    #[test]
    fn placeholder_atoms_use_placeholder_radius() {
        let atoms = vec![atom("E", 0.0, 0.0, 0.0), atom("E", 1.5, 0.0, 0.0)];
        assert_eq!(compute_bonds(&atoms, 1.0).unwrap().len(), 1);
    }

    #[test]
    fn invalid_factor_is_rejected() {
        let atoms = vec![atom("C", 0.0, 0.0, 0.0)];
        assert!(matches!(compute_bonds(&atoms, 0.0), Err(BondingError::InvalidFactor(_))));
        assert!(matches!(compute_bonds(&atoms, f64::NAN), Err(BondingError::InvalidFactor(_))));
        assert!(compute_bonds(&[], 1.0).unwrap().is_empty());
    }
}
