// src/decoder/mod.rs
//! The per-file decoding capability consumed by the reader.
//!
//! The on-disk container format lives behind [`FileDecoder`]; the reader only
//! indexes steps and forwards selection state. [`memory`] provides an
//! implementation backed by in-memory meshes.

pub mod memory;

use crate::dataset::Dataset;
use crate::error::Result;
use crate::metadata::{PartitionDescriptor, PartitionEntry, VariableDescriptor, VariableEntry};
use crate::types::{Association, DisplayOptions, PartitionKind};
use std::path::Path;

/// An open handle on one physical file.
pub trait FileDecoder: Send {
    /// Number of time steps written; zero for geometry-only output.
    fn step_count(&self) -> usize;

    fn time_at(&self, step: usize) -> Option<f64>;

    fn partition_catalog(&self) -> Result<Vec<PartitionEntry>>;

    fn variable_catalog(&self) -> Result<Vec<VariableEntry>>;

    fn extract(&mut self, step: usize, selection: &ActiveSelection, options: &DisplayOptions) -> Result<Dataset>;

    fn extract_scalar(&mut self, step: usize, variable: &str, component: usize) -> Result<f64>;
}

/// Opens decoders for paths in a file family.
pub trait DecoderFactory: Send + Sync {
    fn open(&self, path: &Path) -> Result<Box<dyn FileDecoder>>;
}

/// Snapshot of the active flags, handed to a decoder for one extraction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActiveSelection {
    partitions: Vec<(PartitionKind, usize)>,
    variables: Vec<(String, Association)>,
}

impl ActiveSelection {
    pub fn from_catalogs(partitions: &[PartitionDescriptor], variables: &[VariableDescriptor]) -> Self {
        ActiveSelection {
            partitions: partitions
                .iter()
                .filter(|p| p.active)
                .map(|p| (p.kind, p.index))
                .collect(),
            variables: variables
                .iter()
                .filter(|v| v.active)
                .map(|v| (v.name.clone(), v.association))
                .collect(),
        }
    }

    pub fn is_partition_active(&self, kind: PartitionKind, index: usize) -> bool {
        self.partitions.contains(&(kind, index))
    }

    pub fn is_variable_active(&self, name: &str, association: Association) -> bool {
        self.variables.iter().any(|(n, a)| n == name && *a == association)
    }

    pub fn active_partition_count(&self) -> usize {
        self.partitions.len()
    }

    pub fn active_variable_count(&self) -> usize {
        self.variables.len()
    }
}
