// src/reader/family_reader.rs
use crate::dataset::Dataset;
use crate::decoder::DecoderFactory;
use crate::error::{ReaderError, Result};
use crate::family::resolve_family;
use crate::metadata::{FileRecord, GlobalStep, MetadataCache, PartitionDescriptor, Snapshot, StepInfo, VariableDescriptor};
use crate::reader::fetch::{fetch, fetch_scalar};
use crate::reader::options::ReaderOptions;
use crate::reader::selection::apply_selection;
use crate::reader::time::{resolve_time, Resolution};
use crate::types::{emit, Association, Warning};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Where a reader is in the describe/fetch cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderState {
    Uninitialized,
    Described,
    Fetched,
}

/// Time-indexed reader over a base file and its adaptivity continuations.
///
/// Use is two-phase: [`update_information`](Self::update_information) resolves
/// the file family, refreshes metadata when the family changed, and applies the
/// active selection; [`update_data`](Self::update_data) resolves the requested
/// time and extracts the dataset. Call both, in order, after any change.
///
/// ```no_run
/// use meshfamily_rs::decoder::memory::{MemoryDecoderFactory, MemoryFile};
/// use meshfamily_rs::{FamilyReader, ReaderOptions, Result};
/// use std::sync::Arc;
///
/// fn main() -> Result<()> {
///     let factory = Arc::new(MemoryDecoderFactory::new());
///     factory.insert("run.e", MemoryFile::new(&[0.0, 1.0]).with_global("energy", vec![1.0, 2.0]));
///
///     let mut reader = FamilyReader::new("run.e", factory)
///         .with_options(ReaderOptions::default().with_time(0.5));
///     reader.update_information()?;
///     reader.update_data()?;
///     println!("energy = {}", reader.global_scalar("energy")?);
///     Ok(())
/// }
/// ```
pub struct FamilyReader {
    path: PathBuf,
    options: ReaderOptions,
    factory: Arc<dyn DecoderFactory>,
    cache: MetadataCache,
    state: ReaderState,
    dataset: Option<Dataset>,
    warnings: Vec<Warning>,
}

impl FamilyReader {
    pub fn new(path: impl Into<PathBuf>, factory: Arc<dyn DecoderFactory>) -> Self {
        let path = path.into();
        FamilyReader {
            cache: MetadataCache::new(&path),
            path,
            options: ReaderOptions::default(),
            factory,
            state: ReaderState::Uninitialized,
            dataset: None,
            warnings: Vec::new(),
        }
    }

    pub fn with_options(mut self, options: ReaderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn options(&self) -> &ReaderOptions {
        &self.options
    }

    /// Changes take effect on the next `update_information()`/`update_data()`.
    pub fn options_mut(&mut self) -> &mut ReaderOptions {
        &mut self.options
    }

    pub fn set_options(&mut self, options: ReaderOptions) {
        self.options = options;
    }

    pub fn state(&self) -> ReaderState {
        self.state
    }

    /// Warnings raised by the most recent update or getter call.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Resolve the family, rebuild metadata if it changed, and apply the active selection.
    ///
    /// On error the previous metadata stays in place.
    #[tracing::instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
    pub fn update_information(&mut self) -> Result<()> {
        self.warnings.clear();

        let members = resolve_family(&self.path, self.options.adaptive);
        self.cache
            .rebuild_if_needed(&members, self.factory.as_ref(), &mut self.warnings)?;

        let snapshot = self.cache.snapshot_mut().ok_or(ReaderError::NotInitialized)?;
        apply_selection(&self.options, snapshot, &mut self.warnings);

        self.state = ReaderState::Described;
        Ok(())
    }

    /// Resolve the requested time and extract its dataset.
    #[tracing::instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
    pub fn update_data(&mut self) -> Result<()> {
        self.warnings.clear();
        let resolution = self.resolve()?;
        let snapshot = self.snapshot()?;
        let dataset = fetch(&resolution, snapshot, &self.options.display)?;

        self.dataset = Some(dataset);
        self.state = ReaderState::Fetched;
        Ok(())
    }

    fn snapshot(&self) -> Result<&Snapshot> {
        match self.state {
            ReaderState::Uninitialized => Err(ReaderError::NotInitialized),
            _ => self.cache.snapshot().ok_or(ReaderError::NotInitialized),
        }
    }

    fn resolve(&mut self) -> Result<Resolution> {
        let snapshot = self.snapshot()?;
        let resolution = resolve_time(
            self.options.request,
            self.options.interpolate,
            &snapshot.steps,
            &snapshot.time_index,
        )?;
        if let Some(warning) = &resolution.warning {
            emit(&mut self.warnings, warning.clone());
        }
        Ok(resolution)
    }

    /// The dataset from the last successful `update_data()`.
    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    /// Time of every global step, `None` for steps without time information.
    pub fn times(&self) -> Vec<Option<f64>> {
        self.time_steps().iter().map(|s| s.time).collect()
    }

    pub fn time_steps(&self) -> &[GlobalStep] {
        self.cache.snapshot().map(|s| s.steps.as_slice()).unwrap_or(&[])
    }

    pub fn file_records(&self) -> &[FileRecord] {
        self.cache.snapshot().map(|s| s.files.as_slice()).unwrap_or(&[])
    }

    pub fn partition_catalog(&self) -> &[PartitionDescriptor] {
        self.cache.snapshot().map(|s| s.partitions.as_slice()).unwrap_or(&[])
    }

    pub fn variable_catalog(&self) -> &[VariableDescriptor] {
        self.cache.snapshot().map(|s| s.variables.as_slice()).unwrap_or(&[])
    }

    /// The step for the current options, and its upper bracket when interpolating.
    pub fn current_time_info(&mut self) -> Result<(StepInfo, Option<StepInfo>)> {
        self.warnings.clear();
        let resolution = self.resolve()?;
        Ok((resolution.first, resolution.second))
    }

    /// True if a variable with this short or qualified name exists for `association`.
    pub fn has_variable(&self, name: &str, association: Association) -> bool {
        self.variable_catalog()
            .iter()
            .any(|v| v.association == association && v.matches(name))
    }

    /// First component of a global variable at the current time, interpolated when bracketed.
    pub fn global_scalar(&mut self, name: &str) -> Result<f64> {
        if !self.has_variable(name, Association::Global) {
            return Err(ReaderError::VariableNotFound {
                name: name.to_string(),
                association: Association::Global,
            });
        }
        self.warnings.clear();
        let resolution = self.resolve()?;
        let short = name.strip_suffix("::GLOBAL").unwrap_or(name);
        fetch_scalar(&resolution, self.snapshot()?, short, 0)
    }
}
