use super::backend::InstanceBackend;
use crate::core::models::color::ColorKey;
use crate::core::models::ids::{AtomBatchId, BondBatchId};
use slotmap::SlotMap;
use std::collections::BTreeMap;

/// Instanced spheres for every atom sharing one color key.
#[derive(Debug)]
pub struct AtomBatch<Buf> {
    pub key: ColorKey,
    /// `#RRGGBB`.
    pub color: String,
    pub radius: f64,
    /// Batch-local slot → global atom index.
    pub atom_indices: Vec<usize>,
    pub buffer: Buf,
}

/// Which endpoint of a bond a half-segment starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BondEnd {
    First,
    Second,
}

/// One half of a bond: from an endpoint atom to the bond midpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HalfBond {
    /// Index into the runtime's bond list.
    pub bond: usize,
    pub end: BondEnd,
}

/// Instanced half-cylinders colored like the atom they start from.
#[derive(Debug)]
pub struct BondBatch<Buf> {
    pub key: ColorKey,
    pub color: String,
    pub halves: Vec<HalfBond>,
    pub buffer: Buf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchKind {
    Atoms,
    Bonds,
}

/// Read-only handle on one batch for the render host.
#[derive(Debug)]
pub struct BatchView<'a, Buf> {
    pub kind: BatchKind,
    pub key: &'a ColorKey,
    pub color: &'a str,
    pub instance_count: usize,
    pub buffer: &'a Buf,
}

/// Every live batch, keyed by color key.
///
/// The set is only ever filled after being emptied; it is never partially
/// rebuilt.
#[derive(Debug)]
pub struct BatchSet<Buf> {
    atoms: SlotMap<AtomBatchId, AtomBatch<Buf>>,
    bonds: SlotMap<BondBatchId, BondBatch<Buf>>,
    atom_keys: BTreeMap<ColorKey, AtomBatchId>,
    bond_keys: BTreeMap<ColorKey, BondBatchId>,
}

impl<Buf> Default for BatchSet<Buf> {
    fn default() -> Self {
        Self {
            atoms: SlotMap::with_key(),
            bonds: SlotMap::with_key(),
            atom_keys: BTreeMap::new(),
            bond_keys: BTreeMap::new(),
        }
    }
}

impl<Buf> BatchSet<Buf> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty() && self.bonds.is_empty()
    }

    pub fn len(&self) -> usize {
        self.atoms.len() + self.bonds.len()
    }

    pub fn insert_atoms(&mut self, batch: AtomBatch<Buf>) -> AtomBatchId {
        let key = batch.key.clone();
        let id = self.atoms.insert(batch);
        self.atom_keys.insert(key, id);
        id
    }

    pub fn insert_bonds(&mut self, batch: BondBatch<Buf>) -> BondBatchId {
        let key = batch.key.clone();
        let id = self.bonds.insert(batch);
        self.bond_keys.insert(key, id);
        id
    }

    pub fn atom_batch(&self, key: &ColorKey) -> Option<&AtomBatch<Buf>> {
        self.atom_keys.get(key).and_then(|id| self.atoms.get(*id))
    }

    pub fn atom_batch_mut(&mut self, key: &ColorKey) -> Option<&mut AtomBatch<Buf>> {
        self.atom_keys.get(key).and_then(|id| self.atoms.get_mut(*id))
    }

    pub fn bond_batch(&self, key: &ColorKey) -> Option<&BondBatch<Buf>> {
        self.bond_keys.get(key).and_then(|id| self.bonds.get(*id))
    }

    pub fn bond_batch_mut(&mut self, key: &ColorKey) -> Option<&mut BondBatch<Buf>> {
        self.bond_keys.get(key).and_then(|id| self.bonds.get_mut(*id))
    }

    pub fn atom_batches(&self) -> impl Iterator<Item = &AtomBatch<Buf>> {
        self.atom_keys.values().filter_map(|id| self.atoms.get(*id))
    }

    pub fn bond_batches(&self) -> impl Iterator<Item = &BondBatch<Buf>> {
        self.bond_keys.values().filter_map(|id| self.bonds.get(*id))
    }

    pub fn atom_batches_mut(&mut self) -> impl Iterator<Item = &mut AtomBatch<Buf>> {
        self.atoms.values_mut()
    }

    pub fn bond_batches_mut(&mut self) -> impl Iterator<Item = &mut BondBatch<Buf>> {
        self.bonds.values_mut()
    }

    /// Color key → atom indices, in key order.
    pub fn membership(&self) -> BTreeMap<ColorKey, Vec<usize>> {
        self.atom_batches()
            .map(|b| (b.key.clone(), b.atom_indices.clone()))
            .collect()
    }

    /// Atom batches first, then bond batches, each in key order.
    pub fn views(&self) -> Vec<BatchView<'_, Buf>> {
        let atoms = self.atom_batches().map(|b| BatchView {
            kind: BatchKind::Atoms,
            key: &b.key,
            color: &b.color,
            instance_count: b.atom_indices.len(),
            buffer: &b.buffer,
        });
        let bonds = self.bond_batches().map(|b| BatchView {
            kind: BatchKind::Bonds,
            key: &b.key,
            color: &b.color,
            instance_count: b.halves.len(),
            buffer: &b.buffer,
        });
        atoms.chain(bonds).collect()
    }

    /// Destroys every batch through `backend`, leaving the set empty.
    pub fn destroy_all<B>(&mut self, backend: &mut B)
    where
        B: InstanceBackend<Buffer = Buf>,
    {
        self.atom_keys.clear();
        self.bond_keys.clear();
        for (_, batch) in self.atoms.drain() {
            backend.destroy_buffer(batch.buffer);
        }
        for (_, batch) in self.bonds.drain() {
            backend.destroy_buffer(batch.buffer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::backend::{HostBackend, HostBuffer};

    fn atom_batch(backend: &mut HostBackend, key: &str, indices: Vec<usize>) -> AtomBatch<HostBuffer> {
        AtomBatch {
            key: ColorKey::from(key),
            color: "#909090".into(),
            radius: 0.3,
            buffer: backend.create_buffer(key, indices.len()),
            atom_indices: indices,
        }
    }

    #[test]
    fn membership_and_views_follow_key_order() {
        let mut backend = HostBackend::new();
        let mut set = BatchSet::new();
        set.insert_atoms(atom_batch(&mut backend, "O", vec![1]));
        set.insert_atoms(atom_batch(&mut backend, "C", vec![0, 2]));
        set.insert_bonds(BondBatch {
            key: ColorKey::from("C"),
            color: "#909090".into(),
            halves: vec![HalfBond { bond: 0, end: BondEnd::First }],
            buffer: backend.create_buffer("bonds:C", 1),
        });

        let membership = set.membership();
        assert_eq!(membership.keys().map(|k| k.as_str()).collect::<Vec<_>>(), vec!["C", "O"]);
        assert_eq!(membership[&ColorKey::from("C")], vec![0, 2]);

        let views = set.views();
        assert_eq!(views.len(), 3);
        assert_eq!(views[0].kind, BatchKind::Atoms);
        assert_eq!(views[0].instance_count, 2);
        assert_eq!(views[2].kind, BatchKind::Bonds);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn destroy_all_releases_every_buffer() {
        let mut backend = HostBackend::new();
        let mut set = BatchSet::new();
        set.insert_atoms(atom_batch(&mut backend, "C", vec![0]));
        set.insert_atoms(atom_batch(&mut backend, "H", vec![1, 2]));
        assert_eq!(backend.live_buffers(), 2);

        set.destroy_all(&mut backend);
        assert!(set.is_empty());
        assert!(set.atom_batch(&ColorKey::from("C")).is_none());
        assert_eq!(backend.live_buffers(), 0);
    }
}
