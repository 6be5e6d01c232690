// src/metadata/file_record.rs
use crate::decoder::{DecoderFactory, FileDecoder};
use crate::error::{ReaderError, Result};
use crate::family::FamilyMember;
use crate::utils::SharedLock;
use parking_lot::{Mutex, MutexGuard};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;

/// One physical file of the family, with its decoder handle.
///
/// The handle is shared between snapshots so an unchanged file keeps its
/// decoder across rebuilds.
#[derive(Clone)]
pub struct FileRecord {
    pub path: PathBuf,
    /// One entry per local step; `[None]` for geometry-only output.
    pub times: Vec<Option<f64>>,
    pub modified: SystemTime,
    decoder: Arc<Mutex<Box<dyn FileDecoder>>>,
}

impl fmt::Debug for FileRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileRecord")
            .field("path", &self.path)
            .field("times", &self.times)
            .field("modified", &self.modified)
            .finish_non_exhaustive()
    }
}

impl FileRecord {
    /// Open `member` under a shared lock and read its time values.
    pub fn open(member: &FamilyMember, factory: &dyn DecoderFactory) -> Result<Self> {
        let _lock = SharedLock::acquire(&member.path).map_err(|e| ReaderError::unavailable(&member.path, e))?;

        let decoder = factory.open(&member.path).map_err(|e| match e {
            ReaderError::SourceUnavailable { .. } => e,
            other => ReaderError::unavailable(&member.path, other),
        })?;

        let steps = decoder.step_count();
        let times = if steps == 0 {
            vec![None]
        } else {
            (0..steps).map(|i| decoder.time_at(i)).collect()
        };

        Ok(FileRecord {
            path: member.path.clone(),
            times,
            modified: member.modified,
            decoder: Arc::new(Mutex::new(decoder)),
        })
    }

    /// True if this record still describes `member` as it is on disk.
    pub fn is_current(&self, member: &FamilyMember) -> bool {
        self.path == member.path && self.modified == member.modified
    }

    pub fn step_count(&self) -> usize {
        self.times.len()
    }

    /// Both records share one decoder handle.
    pub fn same_decoder(&self, other: &FileRecord) -> bool {
        Arc::ptr_eq(&self.decoder, &other.decoder)
    }

    pub(crate) fn decoder(&self) -> MutexGuard<'_, Box<dyn FileDecoder>> {
        self.decoder.lock()
    }
}

/// One entry on the logical time axis.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalStep {
    /// Dense, 0-based position on the axis.
    pub step: usize,
    pub time: Option<f64>,
    pub path: PathBuf,
    /// Index of the owning record in the snapshot's file list.
    pub file: usize,
    /// Step index within the owning file.
    pub local: usize,
}

/// Caller-facing name for a resolved step.
pub type StepInfo = GlobalStep;

/// Concatenate local steps of `files` in order.
pub fn build_global_steps(files: &[FileRecord]) -> Vec<GlobalStep> {
    let mut steps = Vec::with_capacity(files.iter().map(FileRecord::step_count).sum());
    for (file, record) in files.iter().enumerate() {
        for (local, time) in record.times.iter().enumerate() {
            steps.push(GlobalStep {
                step: steps.len(),
                time: *time,
                path: record.path.clone(),
                file,
                local,
            });
        }
    }
    steps
}

/// Steps that carry a time, in axis order, for bisection by time.
///
/// Built once per snapshot. Times are non-decreasing along the axis, so the
/// `times` column is sorted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeIndex {
    times: Vec<f64>,
    positions: Vec<usize>,
}

impl TimeIndex {
    pub fn new(steps: &[GlobalStep]) -> Self {
        let (times, positions) = steps
            .iter()
            .filter_map(|s| s.time.map(|t| (t, s.step)))
            .unzip();
        TimeIndex { times, positions }
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Smallest and largest time, `None` when no step has a time.
    pub fn range(&self) -> Option<(f64, f64)> {
        Some((*self.times.first()?, *self.times.last()?))
    }

    /// Index of the first entry whose time is not below `time`.
    pub fn lower_bound(&self, time: f64) -> usize {
        self.times.partition_point(|t| *t < time)
    }

    pub fn time(&self, index: usize) -> f64 {
        self.times[index]
    }

    /// Global step number of entry `index`.
    pub fn position(&self, index: usize) -> usize {
        self.positions[index]
    }
}

#[cfg(test)]
pub(crate) fn record_for_tests(path: &str, times: &[Option<f64>]) -> FileRecord {
    use crate::decoder::memory::MemoryFile;

    let dense: Vec<f64> = times.iter().flatten().copied().collect();
    let decoder: Box<dyn FileDecoder> = Box::new(MemoryFile::new(&dense));
    FileRecord {
        path: PathBuf::from(path),
        times: times.to_vec(),
        modified: SystemTime::UNIX_EPOCH,
        decoder: Arc::new(Mutex::new(decoder)),
    }
}
