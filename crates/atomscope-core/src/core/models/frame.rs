use super::atom::Atom;
use crate::core::io::format::FileFormat;
use nalgebra::Point3;
use std::collections::BTreeMap;

/// One snapshot of a structure: an ordered list of atoms.
///
/// Every frame of a loaded model has the same length, and the k-th atom of
/// each frame is the same particle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub atoms: Vec<Atom>,
    /// Simulation timestep, when the source format records one.
    pub timestep: Option<u64>,
}

impl Frame {
    pub fn new(atoms: Vec<Atom>) -> Self {
        Self {
            atoms,
            timestep: None,
        }
    }

    pub fn with_timestep(mut self, timestep: u64) -> Self {
        self.timestep = Some(timestep);
        self
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Atom> {
        self.atoms.iter()
    }

    /// Unweighted mean of all atom positions, or `None` for an empty frame.
    pub fn centroid(&self) -> Option<Point3<f64>> {
        crate::core::utils::geometry::centroid(self.atoms.iter().map(|a| &a.position))
    }

    pub fn has_any_type_id(&self) -> bool {
        self.atoms.iter().any(|a| a.type_id.is_some())
    }
}

/// Where a model was loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceInfo {
    pub filename: String,
    pub format: FileFormat,
}

/// The normalized result of parsing one structure file.
///
/// Always holds at least one frame; the first frame is the primary structure
/// and any further frames form an animation.
#[derive(Debug, Clone, PartialEq)]
pub struct StructureModel {
    frames: Vec<Frame>,
    pub comment: Option<String>,
    pub source: Option<SourceInfo>,
    /// Element labels declared by the file itself, keyed by type id.
    pub element_defaults: BTreeMap<u32, String>,
}

impl StructureModel {
    /// Creates a single-frame model.
    pub fn new(primary: Frame) -> Self {
        Self::with_frames(primary, Vec::new())
    }

    /// Creates a model whose first frame is `primary`, followed by `rest`.
    pub fn with_frames(primary: Frame, rest: Vec<Frame>) -> Self {
        let mut frames = Vec::with_capacity(rest.len() + 1);
        frames.push(primary);
        frames.extend(rest);
        Self {
            frames,
            comment: None,
            source: None,
            element_defaults: BTreeMap::new(),
        }
    }

    /// Builds a model from a non-empty frame list.
    ///
    /// Returns `None` when `frames` is empty.
    pub fn from_frames(mut frames: Vec<Frame>) -> Option<Self> {
        if frames.is_empty() {
            return None;
        }
        let rest = frames.split_off(1);
        let primary = frames.pop()?;
        Some(Self::with_frames(primary, rest))
    }

    /// The first (primary) frame.
    pub fn primary(&self) -> &Frame {
        &self.frames[0]
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn frames_mut(&mut self) -> &mut [Frame] {
        &mut self.frames
    }

    pub fn into_frames(self) -> Vec<Frame> {
        self.frames
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn atom_count(&self) -> usize {
        self.primary().len()
    }

    pub fn has_any_type_id(&self) -> bool {
        self.primary().has_any_type_id()
    }
}
