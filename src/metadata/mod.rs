// src/metadata/mod.rs
mod cache;
mod file_record;
mod partition;
mod variable;

pub use cache::{MetadataCache, Snapshot};
pub use file_record::{build_global_steps, FileRecord, GlobalStep, StepInfo, TimeIndex};
pub use partition::{build_partition_catalog, PartitionDescriptor, PartitionEntry};
pub use variable::{build_variable_catalog, VariableDescriptor, VariableEntry};

#[cfg(test)]
pub(crate) use file_record::record_for_tests;
