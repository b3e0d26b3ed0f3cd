//! # Type-Map Resolver
//!
//! Pure functions that maintain the type id → element table used by the
//! LAMMPS formats.
//!
//! Three sources feed the table: labels declared by the file itself, the
//! mapping the user already confirmed, and the numeric type ids detected in
//! the loaded frames. [`merge`] combines them without ever downgrading a
//! resolved row, and [`has_unresolved`] tells the caller whether it should ask
//! the user for input. Nothing here fails; unresolved ids are reported, not
//! raised.

use crate::core::chemistry;
use crate::core::models::frame::Frame;
use crate::core::models::type_map::TypeMapRow;
use std::collections::{BTreeMap, BTreeSet};

/// Largest detected type id for which the whole range `1..=max` is offered.
pub const DENSE_RANGE_LIMIT: u32 = 2000;

/// De-duplicates rows by type id (first occurrence wins), canonicalizes
/// their elements and sorts them.
pub fn normalize(rows: &[TypeMapRow]) -> Vec<TypeMapRow> {
    let mut seen = BTreeMap::new();
    for row in rows {
        seen.entry(row.type_id)
            .or_insert_with(|| TypeMapRow::new(row.type_id, &row.element));
    }
    seen.into_values().collect()
}

fn usable_default(defaults: &BTreeMap<u32, String>, type_id: u32) -> Option<&str> {
    defaults
        .get(&type_id)
        .map(|s| s.trim())
        .filter(|s| !chemistry::is_placeholder(s))
}

/// Adds detected ids to `existing` and upgrades placeholder rows.
///
/// New ids take their file-declared default or the placeholder. Rows that are
/// already resolved are never changed. The result is normalized, so calling
/// `merge` twice with the same inputs is a no-op the second time.
pub fn merge(
    existing: &[TypeMapRow],
    detected: &BTreeSet<u32>,
    defaults: &BTreeMap<u32, String>,
) -> Vec<TypeMapRow> {
    let mut table: BTreeMap<u32, TypeMapRow> = normalize(existing).into_iter().map(|r| (r.type_id, r)).collect();
    for &type_id in detected {
        let default = usable_default(defaults, type_id);
        match table.get_mut(&type_id) {
            Some(row) if row.is_unresolved() => {
                if let Some(element) = default {
                    *row = TypeMapRow::new(type_id, element);
                }
            }
            Some(_) => {}
            None => {
                let row = default
                    .map(|element| TypeMapRow::new(type_id, element))
                    .unwrap_or_else(|| TypeMapRow::unresolved(type_id));
                table.insert(type_id, row);
            }
        }
    }
    table.into_values().collect()
}

/// Returns `true` if any row for one of `type_ids` still carries the placeholder.
pub fn has_unresolved(rows: &[TypeMapRow], type_ids: &BTreeSet<u32>) -> bool {
    rows.iter().any(|r| type_ids.contains(&r.type_id) && r.is_unresolved())
}

/// The ids among `type_ids` whose rows still carry the placeholder, ascending.
pub fn unresolved_ids(rows: &[TypeMapRow], type_ids: &BTreeSet<u32>) -> Vec<u32> {
    normalize(rows)
        .into_iter()
        .filter(|r| type_ids.contains(&r.type_id) && r.is_unresolved())
        .map(|r| r.type_id)
        .collect()
}

/// Collects the type ids present in `frame`.
///
/// When the largest id is at most [`DENSE_RANGE_LIMIT`], the full range
/// `1..=max` is returned so the caller can show a complete table.
pub fn detect_type_ids(frame: &Frame) -> BTreeSet<u32> {
    let present: BTreeSet<u32> = frame.iter().filter_map(|a| a.type_id).collect();
    match present.last() {
        Some(&max) if max <= DENSE_RANGE_LIMIT => (1..=max).collect(),
        _ => present,
    }
}

/// Re-derives the element of every typed atom from `rows`.
///
/// A typed atom whose id has no row, or an unresolved one, gets the
/// placeholder. Atoms without a type id keep their element.
pub fn apply_type_map(frames: &mut [Frame], rows: &[TypeMapRow]) {
    let resolved: BTreeMap<u32, String> = normalize(rows)
        .into_iter()
        .filter(|r| !r.is_unresolved())
        .map(|r| (r.type_id, r.element))
        .collect();

    for atom in frames.iter_mut().flat_map(|f| f.atoms.iter_mut()) {
        let Some(type_id) = atom.type_id else {
            continue;
        };
        let element = resolved
            .get(&type_id)
            .map_or(chemistry::PLACEHOLDER_SYMBOL, String::as_str);
        if atom.element != element {
            atom.element = element.to_string();
        }
    }
}

/// Elements that two or more type ids resolve to.
///
/// Atoms of these elements are colored per type id rather than per element.
pub fn shared_elements(rows: &[TypeMapRow]) -> BTreeSet<String> {
    let rows = normalize(rows);
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for row in rows.iter().filter(|r| !r.is_unresolved()) {
        *counts.entry(row.element.as_str()).or_default() += 1;
    }
    counts
        .into_iter()
        .filter(|&(_, n)| n > 1)
        .map(|(element, _)| element.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use nalgebra::Point3;

    fn ids(values: &[u32]) -> BTreeSet<u32> {
        values.iter().copied().collect()
    }

    fn defaults(pairs: &[(u32, &str)]) -> BTreeMap<u32, String> {
        pairs.iter().map(|&(id, el)| (id, el.to_string())).collect()
    }

    fn typed_frame(type_ids: &[u32]) -> Frame {
        Frame::new(
            type_ids
                .iter()
                .map(|&t| Atom::new("E", Point3::origin()).with_type_id(t))
                .collect(),
        )
    }

    #[test]
    fn normalize_keeps_first_occurrence_and_sorts() {
        let rows = vec![TypeMapRow::new(2, "O"), TypeMapRow::new(1, "Si"), TypeMapRow::new(2, "N")];
        assert_eq!(normalize(&rows), vec![TypeMapRow::new(1, "Si"), TypeMapRow::new(2, "O")]);
    }

    #[test]
    fn normalize_canonicalizes_rows_built_directly() {
        let rows = vec![TypeMapRow { type_id: 1, element: " fe ".into() }];
        assert_eq!(normalize(&rows), vec![TypeMapRow::new(1, "Fe")]);
    }

    #[test]
    fn merge_inserts_new_ids_with_defaults_or_placeholder() {
        let merged = merge(&[], &ids(&[1, 2, 3]), &defaults(&[(1, "Si"), (2, "E")]));
        assert_eq!(
            merged,
            vec![TypeMapRow::new(1, "Si"), TypeMapRow::unresolved(2), TypeMapRow::unresolved(3)]
        );
    }

    #[test]
    fn merge_upgrades_placeholders_but_never_downgrades() {
        let existing = vec![TypeMapRow::unresolved(1), TypeMapRow::new(2, "C"), TypeMapRow::new(3, "")];
        let merged = merge(&existing, &ids(&[1, 2, 3]), &defaults(&[(1, "Si"), (2, "O"), (3, "H")]));
        assert_eq!(
            merged,
            vec![TypeMapRow::new(1, "Si"), TypeMapRow::new(2, "C"), TypeMapRow::new(3, "H")]
        );
    }

    #[test]
    fn merge_keeps_rows_for_ids_not_detected() {
        let merged = merge(&[TypeMapRow::new(9, "Fe")], &ids(&[1]), &BTreeMap::new());
        assert_eq!(merged, vec![TypeMapRow::unresolved(1), TypeMapRow::new(9, "Fe")]);
    }

    #[test]
    fn merge_is_idempotent() {
        let existing = vec![TypeMapRow::new(3, "C"), TypeMapRow::unresolved(1)];
        let detected = ids(&[1, 2, 3, 4]);
        let file_defaults = defaults(&[(2, "O"), (4, "E")]);
        let once = merge(&existing, &detected, &file_defaults);
        let twice = merge(&once, &detected, &file_defaults);
        assert_eq!(once, twice);
    }

    #[test]
    fn has_unresolved_is_false_when_defaults_cover_every_detected_id() {
        let detected = ids(&[1, 2]);
        let merged = merge(&[TypeMapRow::unresolved(1)], &detected, &defaults(&[(1, "Si"), (2, "O")]));
        assert!(!has_unresolved(&merged, &detected));
    }

    #[test]
    fn has_unresolved_only_considers_requested_ids() {
        let rows = vec![TypeMapRow::new(1, "Si"), TypeMapRow::unresolved(2)];
        assert!(has_unresolved(&rows, &ids(&[1, 2])));
        assert!(!has_unresolved(&rows, &ids(&[1])));
        assert_eq!(unresolved_ids(&rows, &ids(&[1, 2, 3])), vec![2]);
    }

    #[test]
    fn detection_fills_dense_range_up_to_the_limit() {
        assert_eq!(detect_type_ids(&typed_frame(&[1, 4])), ids(&[1, 2, 3, 4]));
        assert_eq!(detect_type_ids(&typed_frame(&[3, 5000])), ids(&[3, 5000]));
        assert!(detect_type_ids(&Frame::new(vec![Atom::new("C", Point3::origin())])).is_empty());
    }

    #[test]
    fn apply_type_map_rewrites_typed_atoms_in_every_frame() {
        let mut frames = vec![typed_frame(&[1, 2, 3]), typed_frame(&[1, 2, 3])];
        frames[0].atoms.push(Atom::new("H", Point3::origin()));
        frames[1].atoms.push(Atom::new("H", Point3::origin()));
        apply_type_map(&mut frames, &[TypeMapRow::new(1, "Si"), TypeMapRow::new(2, "")]);

        for frame in &frames {
            let elements: Vec<&str> = frame.iter().map(|a| a.element.as_str()).collect();
            assert_eq!(elements, vec!["Si", "E", "E", "H"]);
        }
    }

    #[test]
    fn apply_type_map_resets_typed_atoms_without_a_row() {
        let mut frames = vec![Frame::new(vec![
            Atom::new("C", Point3::origin()).with_type_id(1),
            Atom::new("O", Point3::origin()).with_type_id(2),
            Atom::new("N", Point3::origin()),
        ])];
        apply_type_map(&mut frames, &[TypeMapRow::new(2, "S")]);

        let elements: Vec<&str> = frames[0].iter().map(|a| a.element.as_str()).collect();
        assert_eq!(elements, vec!["E", "S", "N"]);
    }

    #[test]
    fn shared_elements_lists_elements_of_several_type_ids() {
        let rows = vec![
            TypeMapRow::new(1, "C"),
            TypeMapRow::new(2, "C"),
            TypeMapRow::new(3, "O"),
            TypeMapRow::unresolved(4),
            TypeMapRow::unresolved(5),
        ];
        assert_eq!(shared_elements(&rows), ["C".to_string()].into_iter().collect());
    }
}
