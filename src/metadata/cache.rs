// src/metadata/cache.rs
use crate::decoder::DecoderFactory;
use crate::error::{ReaderError, Result};
use crate::family::FamilyMember;
use crate::metadata::file_record::{build_global_steps, FileRecord, GlobalStep, TimeIndex};
use crate::metadata::partition::{build_partition_catalog, PartitionDescriptor, PartitionEntry};
use crate::metadata::variable::{build_variable_catalog, VariableDescriptor, VariableEntry};
use crate::types::{emit, PartitionKind, Warning};
use crate::utils::SharedLock;
use std::path::{Path, PathBuf};

/// Everything known about one resolved family, replaced as a unit.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub members: Vec<FamilyMember>,
    pub files: Vec<FileRecord>,
    pub steps: Vec<GlobalStep>,
    pub time_index: TimeIndex,
    pub partitions: Vec<PartitionDescriptor>,
    pub variables: Vec<VariableDescriptor>,
}

/// Holds the current [`Snapshot`] and rebuilds it when the family on disk changes.
///
/// Partition and variable catalogs come from the base file only; continuation
/// files are assumed to share its schema. A continuation whose partitions or
/// variables differ, or whose catalogs cannot be read, is reported with
/// [`Warning::SchemaMismatch`].
#[derive(Debug)]
pub struct MetadataCache {
    base: PathBuf,
    snapshot: Option<Snapshot>,
}

impl MetadataCache {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        MetadataCache {
            base: base.into(),
            snapshot: None,
        }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    pub(crate) fn snapshot_mut(&mut self) -> Option<&mut Snapshot> {
        self.snapshot.as_mut()
    }

    /// Rebuild if `members` differs from the cached family. Returns whether a rebuild happened.
    ///
    /// On error the previous snapshot is left in place.
    pub fn rebuild_if_needed(
        &mut self,
        members: &[FamilyMember],
        factory: &dyn DecoderFactory,
        warnings: &mut Vec<Warning>,
    ) -> Result<bool> {
        if let Some(current) = &self.snapshot {
            if current.members == members {
                return Ok(false);
            }
        }

        let Some(first) = members.first() else {
            return Err(ReaderError::unavailable(&self.base, "file does not exist"));
        };

        tracing::debug!(base = %self.base.display(), files = members.len(), "update file information");
        let previous: &[FileRecord] = self.snapshot.as_ref().map(|s| s.files.as_slice()).unwrap_or(&[]);
        let mut files = Vec::with_capacity(members.len());
        let mut opened = Vec::new();
        for (index, member) in members.iter().enumerate() {
            match previous.iter().find(|r| r.is_current(member)) {
                Some(record) => files.push(record.clone()),
                None => {
                    tracing::debug!(path = %member.path.display(), "open decoder");
                    files.push(FileRecord::open(member, factory)?);
                    opened.push(index);
                }
            }
        }

        tracing::debug!("update time information");
        let steps = build_global_steps(&files);
        let time_index = TimeIndex::new(&steps);

        let (partition_entries, variable_entries) =
            read_catalogs(&files[0]).map_err(|e| match e {
                ReaderError::SourceUnavailable { .. } => e,
                other => ReaderError::unavailable(&first.path, other),
            })?;

        tracing::debug!("update partition information");
        let partitions = build_partition_catalog(&partition_entries);

        tracing::debug!("update variable information");
        let variables = build_variable_catalog(&variable_entries);

        for index in opened.into_iter().filter(|&i| i > 0) {
            let record = &files[index];
            let consistent = match read_catalogs(record) {
                Ok((p, v)) => {
                    partition_keys(&partitions) == partition_keys(&build_partition_catalog(&p))
                        && same_variables(&variables, &build_variable_catalog(&v))
                }
                Err(e) => {
                    tracing::debug!(path = %record.path.display(), error = %e, "catalog read failed");
                    false
                }
            };
            if !consistent {
                emit(warnings, Warning::SchemaMismatch { path: record.path.clone() });
            }
        }

        self.snapshot = Some(Snapshot {
            members: members.to_vec(),
            files,
            steps,
            time_index,
            partitions,
            variables,
        });
        Ok(true)
    }
}

/// Partition and variable catalogs of `record`, read under a shared lock.
fn read_catalogs(record: &FileRecord) -> Result<(Vec<PartitionEntry>, Vec<VariableEntry>)> {
    let _lock = SharedLock::acquire(&record.path).map_err(|e| ReaderError::unavailable(&record.path, e))?;
    let decoder = record.decoder();
    Ok((decoder.partition_catalog()?, decoder.variable_catalog()?))
}

fn partition_keys(catalog: &[PartitionDescriptor]) -> Vec<(PartitionKind, i64)> {
    let mut keys: Vec<_> = catalog.iter().map(|p| (p.kind, p.id)).collect();
    keys.sort();
    keys
}

fn same_variables(a: &[VariableDescriptor], b: &[VariableDescriptor]) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b)
            .all(|(x, y)| x.name == y.name && x.association == y.association && x.components == y.components)
}
