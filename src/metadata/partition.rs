// src/metadata/partition.rs
use crate::types::{PartitionKind, PartitionSelector};

/// Raw partition record as reported by a decoder.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionEntry {
    pub kind: PartitionKind,
    /// `None`, empty, or an "Unnamed..." placeholder when the source has no name.
    pub name: Option<String>,
    pub id: i64,
}

impl PartitionEntry {
    pub fn new(kind: PartitionKind, name: impl Into<String>, id: i64) -> Self {
        PartitionEntry { kind, name: Some(name.into()), id }
    }

    pub fn unnamed(kind: PartitionKind, id: i64) -> Self {
        PartitionEntry { kind, name: None, id }
    }
}

/// One element block, side set, node set (or other container partition).
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionDescriptor {
    pub kind: PartitionKind,
    pub name: String,
    pub id: i64,
    /// Index within its kind.
    pub index: usize,
    /// Slot in the combined multi-partition container.
    pub slot: usize,
    pub active: bool,
}

impl PartitionDescriptor {
    /// True if `selector` names this partition by name, id, or stringified id.
    pub fn matches(&self, selector: &PartitionSelector) -> bool {
        match selector {
            PartitionSelector::Id(id) => *id == self.id,
            PartitionSelector::Name(name) => *name == self.name || *name == self.id.to_string(),
        }
    }
}

fn display_name(entry: &PartitionEntry) -> String {
    match entry.name.as_deref() {
        Some(name) if !name.is_empty() && !name.starts_with("Unnamed") => name.to_string(),
        _ => entry.id.to_string(),
    }
}

/// Build the partition catalog from decoder entries.
///
/// Slots count one header per kind plus one per object, walking kinds in
/// container order, so the first element block sits in slot 2.
pub fn build_partition_catalog(entries: &[PartitionEntry]) -> Vec<PartitionDescriptor> {
    let mut catalog = Vec::with_capacity(entries.len());
    let mut slot = 0;
    for kind in PartitionKind::CONTAINER_ORDER {
        slot += 1;
        for (index, entry) in entries.iter().filter(|e| e.kind == kind).enumerate() {
            slot += 1;
            catalog.push(PartitionDescriptor {
                kind,
                name: display_name(entry),
                id: entry.id,
                index,
                slot,
                active: true,
            });
        }
    }
    catalog
}
