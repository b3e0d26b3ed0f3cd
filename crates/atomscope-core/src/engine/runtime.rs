use super::backend::InstanceBackend;
use super::batch::{AtomBatch, BatchSet, BatchView, BondBatch, BondEnd, HalfBond};
use super::config::{ViewerConfig, ensure_positive};
use super::error::RuntimeError;
use crate::core::bonding;
use crate::core::chemistry;
use crate::core::models::color::{ColorKey, ColorMap, parse_hex_color};
use crate::core::models::frame::Frame;
use crate::core::models::topology::Bond;
use crate::core::models::type_map::TypeMapRow;
use crate::core::typemap;
use crate::core::utils::geometry;
use nalgebra::Point3;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

/// Camera framing for a freshly rendered model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewFit {
    pub center: Point3<f64>,
    /// Radius enclosing every atom sphere of the first frame.
    pub radius: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSummary {
    pub frame_count: usize,
    pub has_animation: bool,
    pub view: Option<ViewFit>,
}

/// Owns the instanced draw batches of the loaded model.
///
/// The runtime is either empty or holds batches for the current frame.
/// [`render_model`](Self::render_model) and the rebuild operations destroy
/// every batch before creating new ones; [`apply_frame`](Self::apply_frame)
/// only rewrites instance transforms. Except for `render_model`, every
/// operation is a no-op while the runtime is empty.
pub struct ModelRuntime<B: InstanceBackend> {
    backend: B,
    config: ViewerConfig,
    colors: ColorMap,
    frames: Vec<Frame>,
    type_map: Vec<TypeMapRow>,
    bonds: Vec<Bond>,
    batches: BatchSet<B::Buffer>,
    reference_center: Option<Point3<f64>>,
    current_frame: usize,
    /// Drift-corrected positions of the current frame, reused between frames.
    positions: Vec<Point3<f64>>,
}

impl<B: InstanceBackend> ModelRuntime<B> {
    pub fn new(backend: B, config: ViewerConfig) -> Self {
        Self {
            backend,
            config,
            colors: ColorMap::new(),
            frames: Vec::new(),
            type_map: Vec::new(),
            bonds: Vec::new(),
            batches: BatchSet::new(),
            reference_center: None,
            current_frame: 0,
            positions: Vec::new(),
        }
    }

    /// Replaces the loaded model.
    ///
    /// Frame sizes are validated, the type map applied and bonds computed
    /// before anything is destroyed, so a failure leaves the previous model
    /// in place.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::InconsistentFrameSize`] when any frame's atom
    /// count differs from the first frame's, and [`RuntimeError::NoFrames`]
    /// for an empty frame list.
    #[instrument(skip_all, name = "render_model", fields(frames = frames.len()))]
    pub fn render_model(&mut self, frames: Vec<Frame>, rows: &[TypeMapRow]) -> Result<RenderSummary, RuntimeError> {
        let mut frames = frames;
        let expected = frames.first().ok_or(RuntimeError::NoFrames)?.len();
        if let Some((frame, found)) = frames
            .iter()
            .map(Frame::len)
            .enumerate()
            .find(|&(_, len)| len != expected)
        {
            return Err(RuntimeError::InconsistentFrameSize {
                frame,
                expected,
                found,
            });
        }

        let rows = typemap::normalize(rows);
        typemap::apply_type_map(&mut frames, &rows);
        let bonds = bonding::compute_bonds(&frames[0].atoms, self.config.bonding.bond_factor)?;
        let reference = frames[0].centroid().unwrap_or_else(Point3::origin);

        self.batches.destroy_all(&mut self.backend);
        self.frames = frames;
        self.type_map = rows;
        self.bonds = bonds;
        self.reference_center = Some(reference);
        self.current_frame = 0;
        self.positions = self.frames[0].atoms.iter().map(|a| a.position).collect();

        self.build_batches()?;
        self.write_frame(0);

        let summary = RenderSummary {
            frame_count: self.frames.len(),
            has_animation: self.frames.len() > 1,
            view: self.view_fit(),
        };
        info!(
            atoms = expected,
            frames = summary.frame_count,
            bonds = self.bonds.len(),
            batches = self.batches.len(),
            "Model rendered."
        );
        Ok(summary)
    }

    /// Moves every atom (and bond half) to its drift-corrected position in
    /// frame `index`. Batch membership, colors and radii are untouched.
    pub fn apply_frame(&mut self, index: usize) {
        if self.batches.is_empty() || index >= self.frames.len() {
            return;
        }
        self.write_frame(index);
        self.current_frame = index;
    }

    /// Re-derives every atom's element from `rows` and rebuilds all batches.
    pub fn on_type_map_changed(&mut self, rows: &[TypeMapRow]) -> Result<(), RuntimeError> {
        if self.frames.is_empty() {
            return Ok(());
        }
        self.type_map = typemap::normalize(rows);
        typemap::apply_type_map(&mut self.frames, &self.type_map);
        self.rebuild_visuals()
    }

    /// Destroys all batches, recomputes bonds for the current frame and
    /// builds the batches again.
    #[instrument(skip_all, name = "rebuild_visuals")]
    pub fn rebuild_visuals(&mut self) -> Result<(), RuntimeError> {
        if self.frames.is_empty() {
            return Ok(());
        }
        let bonds = bonding::compute_bonds(
            &self.frames[self.current_frame].atoms,
            self.config.bonding.bond_factor,
        )?;
        self.batches.destroy_all(&mut self.backend);
        self.bonds = bonds;
        self.build_batches()?;
        self.write_frame(self.current_frame);
        debug!(bonds = self.bonds.len(), batches = self.batches.len(), "Visuals rebuilt.");
        Ok(())
    }

    /// Destroys every batch and forgets the model.
    pub fn clear_model(&mut self) {
        self.batches.destroy_all(&mut self.backend);
        self.frames.clear();
        self.type_map.clear();
        self.bonds.clear();
        self.positions.clear();
        self.reference_center = None;
        self.current_frame = 0;
    }

    /// Replaces the color of one key; batches using it are recolored in place.
    pub fn set_custom_color(&mut self, key: &ColorKey, hex: &str) -> Result<(), RuntimeError> {
        let entry = self.colors.set_custom(key, hex)?;
        let color = entry.color.clone();
        let rgb = parse_hex_color(&color)?;
        if let Some(batch) = self.batches.atom_batch_mut(key) {
            batch.color.clone_from(&color);
            self.backend.set_color(&mut batch.buffer, rgb);
        }
        if let Some(batch) = self.batches.bond_batch_mut(key) {
            batch.color = color;
            self.backend.set_color(&mut batch.buffer, rgb);
        }
        Ok(())
    }

    /// Sets (or with `None` clears) the sphere radius for `element` and rebuilds.
    pub fn set_radius_override(&mut self, element: &str, radius: Option<f64>) -> Result<(), RuntimeError> {
        let element = chemistry::canonical_symbol(element).unwrap_or(element.trim());
        let overrides = &mut self.config.style.radius_overrides;
        match radius {
            Some(r) => {
                overrides.insert(element.to_string(), ensure_positive("radius_override", r)?);
            }
            None => {
                overrides.remove(element);
            }
        }
        self.rebuild_visuals()
    }

    /// Changes the bond cutoff multiplier and rebuilds.
    pub fn set_bond_factor(&mut self, factor: f64) -> Result<(), RuntimeError> {
        self.config.bonding.bond_factor = ensure_positive("bond_factor", factor)?;
        self.rebuild_visuals()
    }

    /// Bounding sphere of the first frame, centered on the reference center.
    pub fn view_fit(&self) -> Option<ViewFit> {
        let center = self.reference_center?;
        let first = self.frames.first()?;
        if first.is_empty() {
            return None;
        }
        let radius = geometry::enclosing_radius(
            &center,
            first.iter().map(|a| (&a.position, self.display_radius(&a.element))),
        );
        Some(ViewFit { center, radius })
    }

    pub fn is_loaded(&self) -> bool {
        !self.batches.is_empty()
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn has_any_type_id(&self) -> bool {
        self.frames.first().is_some_and(Frame::has_any_type_id)
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    pub fn type_map_rows(&self) -> &[TypeMapRow] {
        &self.type_map
    }

    pub fn reference_center(&self) -> Option<Point3<f64>> {
        self.reference_center
    }

    /// Drift-corrected positions of the current frame.
    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    pub fn visible_batches(&self) -> Vec<BatchView<'_, B::Buffer>> {
        self.batches.views()
    }

    /// Color key → atom indices of every atom batch.
    pub fn batch_membership(&self) -> BTreeMap<ColorKey, Vec<usize>> {
        self.batches.membership()
    }

    pub fn color_map(&self) -> &ColorMap {
        &self.colors
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn display_radius(&self, element: &str) -> f64 {
        let canonical = chemistry::canonical_symbol(element).unwrap_or(element);
        self.config
            .style
            .radius_overrides
            .get(canonical)
            .copied()
            .unwrap_or_else(|| chemistry::covalent_radius(element) * self.config.style.atom_scale)
    }

    fn build_batches(&mut self) -> Result<(), RuntimeError> {
        let frame = &self.frames[self.current_frame];
        let shared = typemap::shared_elements(&self.type_map);
        let keys: Vec<ColorKey> = frame
            .iter()
            .map(|a| ColorKey::for_atom(&a.element, a.type_id, &shared))
            .collect();

        let mut atom_groups: BTreeMap<&ColorKey, Vec<usize>> = BTreeMap::new();
        for (index, key) in keys.iter().enumerate() {
            atom_groups.entry(key).or_default().push(index);
        }
        let mut bond_groups: BTreeMap<&ColorKey, Vec<HalfBond>> = BTreeMap::new();
        for (index, bond) in self.bonds.iter().enumerate() {
            for (atom, end) in [(bond.i, BondEnd::First), (bond.j, BondEnd::Second)] {
                bond_groups
                    .entry(&keys[atom])
                    .or_default()
                    .push(HalfBond { bond: index, end });
            }
        }

        for (key, atom_indices) in atom_groups {
            let color = self.colors.resolve(key).color.clone();
            let rgb = parse_hex_color(&color)?;
            let mut buffer = self
                .backend
                .create_buffer(&format!("atoms:{}", key), atom_indices.len());
            self.backend.set_color(&mut buffer, rgb);
            let radius = self.display_radius(key.element_symbol());
            self.batches.insert_atoms(AtomBatch {
                key: key.clone(),
                color,
                radius,
                atom_indices,
                buffer,
            });
        }
        for (key, halves) in bond_groups {
            let color = self.colors.resolve(key).color.clone();
            let rgb = parse_hex_color(&color)?;
            let mut buffer = self
                .backend
                .create_buffer(&format!("bonds:{}", key), halves.len());
            self.backend.set_color(&mut buffer, rgb);
            self.batches.insert_bonds(BondBatch {
                key: key.clone(),
                color,
                halves,
                buffer,
            });
        }
        Ok(())
    }

    /// Writes drift-corrected transforms for frame `index` into the existing
    /// batches. Allocates nothing.
    fn write_frame(&mut self, index: usize) {
        let Self {
            backend,
            config,
            frames,
            bonds,
            batches,
            reference_center,
            positions,
            ..
        } = self;
        let frame = &frames[index];
        let reference = reference_center.unwrap_or_else(Point3::origin);
        let drift = frame.centroid().map_or_else(nalgebra::Vector3::zeros, |c| c - reference);

        for (slot, atom) in positions.iter_mut().zip(frame.iter()) {
            *slot = atom.position - drift;
        }

        for batch in batches.atom_batches_mut() {
            for (slot, &atom) in batch.atom_indices.iter().enumerate() {
                let transform = geometry::sphere_transform(&positions[atom], batch.radius);
                backend.write_instance(&mut batch.buffer, slot, &transform);
            }
        }

        let bond_radius = config.style.bond_radius;
        for batch in batches.bond_batches_mut() {
            for (slot, half) in batch.halves.iter().enumerate() {
                let bond = &bonds[half.bond];
                let midpoint = nalgebra::center(&positions[bond.i], &positions[bond.j]);
                let start = match half.end {
                    BondEnd::First => positions[bond.i],
                    BondEnd::Second => positions[bond.j],
                };
                let transform = geometry::cylinder_transform(&start, &midpoint, bond_radius);
                backend.write_instance(&mut batch.buffer, slot, &transform);
            }
        }
    }
}

impl<B: InstanceBackend> Drop for ModelRuntime<B> {
    fn drop(&mut self) {
        self.batches.destroy_all(&mut self.backend);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::engine::backend::HostBackend;
    use crate::engine::batch::BatchKind;

    fn runtime() -> ModelRuntime<HostBackend> {
        ModelRuntime::new(HostBackend::new(), ViewerConfig::default())
    }

    fn frame(atoms: &[(&str, f64, f64, f64)]) -> Frame {
        Frame::new(
            atoms
                .iter()
                .map(|&(el, x, y, z)| Atom::new(el, Point3::new(x, y, z)))
                .collect(),
        )
    }

    fn typed_frame(types: &[(u32, f64)]) -> Frame {
        Frame::new(
            types
                .iter()
                .map(|&(t, x)| Atom::new("E", Point3::new(x, 0.0, 0.0)).with_type_id(t))
                .collect(),
        )
    }

    fn translation_of(m: &nalgebra::Matrix4<f32>) -> Point3<f32> {
        Point3::new(m[(0, 3)], m[(1, 3)], m[(2, 3)])
    }

    fn water(offset: f64) -> Frame {
        frame(&[
            ("O", offset, 0.0, 0.0),
            ("H", offset + 0.96, 0.0, 0.0),
            ("H", offset - 0.24, 0.93, 0.0),
        ])
    }

    #[test]
    fn render_model_builds_one_batch_per_color_key() {
        let mut rt = runtime();
        let summary = rt.render_model(vec![water(0.0)], &[]).unwrap();
        assert_eq!(summary.frame_count, 1);
        assert!(!summary.has_animation);
        assert_eq!(rt.bond_count(), 2);

        let membership = rt.batch_membership();
        assert_eq!(membership[&ColorKey::from("H")], vec![1, 2]);
        assert_eq!(membership[&ColorKey::from("O")], vec![0]);

        let views = rt.visible_batches();
        let atom_views = views.iter().filter(|v| v.kind == BatchKind::Atoms).count();
        let bond_views: Vec<_> = views.iter().filter(|v| v.kind == BatchKind::Bonds).collect();
        assert_eq!(atom_views, 2);
        assert_eq!(bond_views.iter().map(|v| v.instance_count).sum::<usize>(), 4);
        assert_eq!(rt.backend().live_buffers(), 4);
    }

    #[test]
    fn inconsistent_frame_size_fails_before_touching_batches() {
        let mut rt = runtime();
        rt.render_model(vec![water(0.0)], &[]).unwrap();
        let before = rt.batch_membership();
        let created = rt.backend().created();

        let mut frames: Vec<Frame> = (0..5).map(|i| water(i as f64)).collect();
        frames[3].atoms.pop();
        let err = rt.render_model(frames, &[]).unwrap_err();

        assert_eq!(
            err,
            RuntimeError::InconsistentFrameSize {
                frame: 3,
                expected: 3,
                found: 2
            }
        );
        assert_eq!(rt.batch_membership(), before);
        assert_eq!(rt.backend().created(), created);
        assert_eq!(rt.frame_count(), 1);
    }

    #[test]
    fn failed_first_render_leaves_runtime_empty() {
        let mut rt = runtime();
        let frames = vec![water(0.0), frame(&[("O", 0.0, 0.0, 0.0)])];
        assert!(rt.render_model(frames, &[]).is_err());
        assert!(!rt.is_loaded());
        assert_eq!(rt.backend().created(), 0);
        assert!(matches!(rt.render_model(Vec::new(), &[]), Err(RuntimeError::NoFrames)));
    }

    #[test]
    fn render_model_replaces_previous_batches() {
        let mut rt = runtime();
        rt.render_model(vec![water(0.0)], &[]).unwrap();
        rt.render_model(vec![frame(&[("C", 0.0, 0.0, 0.0)])], &[]).unwrap();
        assert_eq!(rt.backend().live_buffers(), 1);
        assert_eq!(rt.batch_membership().len(), 1);
    }

    #[test]
    fn apply_frame_removes_bulk_drift_but_keeps_relative_motion() {
        let mut rt = runtime();
        let frames = vec![
            frame(&[("C", 0.0, 0.0, 0.0), ("C", 2.0, 0.0, 0.0)]),
            frame(&[("C", 10.0, 0.0, 0.0), ("C", 13.0, 0.0, 0.0)]),
        ];
        let summary = rt.render_model(frames, &[]).unwrap();
        assert!(summary.has_animation);
        assert_eq!(rt.reference_center(), Some(Point3::new(1.0, 0.0, 0.0)));

        rt.apply_frame(1);
        assert_eq!(rt.current_frame(), 1);
        let positions = rt.positions();
        assert!((positions[0] - Point3::new(-0.5, 0.0, 0.0)).norm() < 1e-12);
        assert!((positions[1] - Point3::new(2.5, 0.0, 0.0)).norm() < 1e-12);
        assert_eq!(rt.reference_center(), Some(Point3::new(1.0, 0.0, 0.0)));

        let views = rt.visible_batches();
        let carbon = views.iter().find(|v| v.kind == BatchKind::Atoms).unwrap();
        let written = translation_of(&carbon.buffer.instances[1]);
        assert!((written - Point3::new(2.5, 0.0, 0.0)).norm() < 1e-5);
    }

    #[test]
    fn apply_frame_never_changes_membership_or_allocates() {
        let mut rt = runtime();
        let frames: Vec<Frame> = (0..4).map(|i| water(i as f64 * 0.1)).collect();
        rt.render_model(frames, &[]).unwrap();
        let membership = rt.batch_membership();
        let created = rt.backend().created();

        for k in [1, 3, 0, 2] {
            rt.apply_frame(k);
            assert_eq!(rt.batch_membership(), membership);
        }
        assert_eq!(rt.backend().created(), created);
        assert_eq!(rt.backend().destroyed(), 0);
    }

    #[test]
    fn bond_halves_end_at_the_bond_midpoint() {
        let mut rt = runtime();
        rt.render_model(vec![frame(&[("C", 0.0, 0.0, 0.0), ("O", 1.2, 0.0, 0.0)])], &[])
            .unwrap();
        let views = rt.visible_batches();
        let oxygen_half = views
            .iter()
            .find(|v| v.kind == BatchKind::Bonds && v.key.as_str() == "O")
            .unwrap();
        // Unit cylinder center lands halfway between the oxygen and the midpoint.
        let center = translation_of(&oxygen_half.buffer.instances[0]);
        assert!((center - Point3::new(0.9, 0.0, 0.0)).norm() < 1e-5);
    }

    #[test]
    fn operations_on_empty_runtime_are_no_ops() {
        let mut rt = runtime();
        rt.apply_frame(3);
        assert!(rt.on_type_map_changed(&[TypeMapRow::new(1, "C")]).is_ok());
        assert!(rt.rebuild_visuals().is_ok());
        assert!(rt.view_fit().is_none());
        rt.clear_model();
        assert_eq!(rt.backend().created(), 0);
    }

    #[test]
    fn apply_frame_out_of_range_is_ignored() {
        let mut rt = runtime();
        rt.render_model(vec![water(0.0)], &[]).unwrap();
        let writes = rt.backend().writes();
        rt.apply_frame(7);
        assert_eq!(rt.current_frame(), 0);
        assert_eq!(rt.backend().writes(), writes);
    }

    #[test]
    fn type_map_change_rebuilds_with_new_color_keys() {
        let mut rt = runtime();
        let frames = vec![typed_frame(&[(1, 0.0), (2, 1.5), (3, 3.0)])];
        rt.render_model(frames, &[TypeMapRow::new(1, "Si")]).unwrap();
        assert!(rt.has_any_type_id());
        let keys: Vec<String> = rt.batch_membership().keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["E", "Si"]);

        rt.on_type_map_changed(&[TypeMapRow::new(1, "C"), TypeMapRow::new(2, "C"), TypeMapRow::new(3, "O")])
            .unwrap();
        let keys: Vec<String> = rt.batch_membership().keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["C#1", "C#2", "O"]);
        assert!(rt.frames()[0].iter().all(|a| !a.is_unresolved()));
        assert_eq!(rt.backend().live_buffers(), rt.visible_batches().len());
    }

    #[test]
    fn custom_color_updates_batch_in_place() {
        let mut rt = runtime();
        rt.render_model(vec![water(0.0)], &[]).unwrap();
        let created = rt.backend().created();

        rt.set_custom_color(&ColorKey::from("O"), "#00ff00").unwrap();
        assert_eq!(rt.backend().created(), created);
        let views = rt.visible_batches();
        let oxygen = views
            .iter()
            .find(|v| v.kind == BatchKind::Atoms && v.key.as_str() == "O")
            .unwrap();
        assert_eq!(oxygen.color, "#00FF00");
        assert_eq!(oxygen.buffer.color, [0.0, 1.0, 0.0]);
        assert!(rt.set_custom_color(&ColorKey::from("O"), "green").is_err());
    }

    #[test]
    fn radius_override_and_bond_factor_trigger_rebuild() {
        let mut rt = runtime();
        rt.render_model(vec![frame(&[("C", 0.0, 0.0, 0.0), ("C", 1.7, 0.0, 0.0)])], &[])
            .unwrap();
        assert_eq!(rt.bond_count(), 1);
        let created = rt.backend().created();

        rt.set_radius_override("C", Some(0.5)).unwrap();
        assert!(rt.backend().created() > created);
        let view = rt.view_fit().unwrap();
        assert!((view.radius - 1.35).abs() < 1e-12);

        rt.set_bond_factor(1.0).unwrap();
        assert_eq!(rt.bond_count(), 0);
        assert!(rt.set_bond_factor(-1.0).is_err());
        assert!(rt.set_radius_override("C", Some(0.0)).is_err());
    }

    #[test]
    fn clear_model_destroys_everything() {
        let mut rt = runtime();
        rt.render_model(vec![water(0.0), water(1.0)], &[]).unwrap();
        rt.clear_model();
        assert!(!rt.is_loaded());
        assert_eq!(rt.frame_count(), 0);
        assert_eq!(rt.backend().live_buffers(), 0);
        assert!(rt.reference_center().is_none());
    }
}
