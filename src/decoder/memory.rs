// src/decoder/memory.rs
use crate::dataset::{Dataset, FieldArray, PartitionData};
use crate::decoder::{ActiveSelection, DecoderFactory, FileDecoder};
use crate::error::{ReaderError, Result};
use crate::metadata::{build_partition_catalog, PartitionEntry, VariableEntry};
use crate::types::{Association, DisplayOptions};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const DISPLACEMENT_FIELDS: [&str; 3] = ["disp_x", "disp_y", "disp_z"];

#[derive(Debug, Clone)]
struct MemoryPartition {
    entry: PartitionEntry,
    points: Vec<[f64; 3]>,
}

/// Per-step values of one variable. Global variables have `partition == None`.
#[derive(Debug, Clone)]
struct MemoryField {
    variable: VariableEntry,
    partition: Option<i64>,
    steps: Vec<Vec<f64>>,
}

/// Contents of one file held in memory.
///
/// ```
/// use meshfamily_rs::decoder::memory::MemoryFile;
/// use meshfamily_rs::{Association, PartitionEntry, PartitionKind};
///
/// let file = MemoryFile::new(&[0.0, 1.0])
///     .with_partition(PartitionEntry::new(PartitionKind::ElementBlock, "solid", 1), vec![[0.0; 3]])
///     .with_field(1, "u", Association::Nodal, 1, vec![vec![0.0], vec![1.0]])
///     .with_global("energy", vec![10.0, 20.0]);
/// assert_eq!(file.step_count(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryFile {
    times: Vec<f64>,
    partitions: Vec<MemoryPartition>,
    fields: Vec<MemoryField>,
}

impl MemoryFile {
    /// An empty `times` slice describes geometry-only output.
    pub fn new(times: &[f64]) -> Self {
        MemoryFile {
            times: times.to_vec(),
            ..Default::default()
        }
    }

    pub fn step_count(&self) -> usize {
        self.times.len()
    }

    pub fn with_partition(mut self, entry: PartitionEntry, points: Vec<[f64; 3]>) -> Self {
        self.partitions.push(MemoryPartition { entry, points });
        self
    }

    /// Nodal or elemental values on the partition with id `partition`, one `Vec` per step.
    pub fn with_field(
        mut self,
        partition: i64,
        name: impl Into<String>,
        association: Association,
        components: usize,
        steps: Vec<Vec<f64>>,
    ) -> Self {
        self.fields.push(MemoryField {
            variable: VariableEntry::new(name, association, components),
            partition: Some(partition),
            steps,
        });
        self
    }

    /// A single-component global value per step.
    pub fn with_global(mut self, name: impl Into<String>, steps: Vec<f64>) -> Self {
        self.fields.push(MemoryField {
            variable: VariableEntry::new(name, Association::Global, 1),
            partition: None,
            steps: steps.into_iter().map(|v| vec![v]).collect(),
        });
        self
    }

    fn check_step(&self, step: usize) -> Result<()> {
        // Geometry-only files still expose step 0.
        if step < self.times.len().max(1) {
            Ok(())
        } else {
            Err(ReaderError::Decoder(format!(
                "step {} out of range for {} steps",
                step,
                self.times.len()
            )))
        }
    }

    fn step_values<'a>(&self, field: &'a MemoryField, step: usize) -> Option<&'a Vec<f64>> {
        field.steps.get(step)
    }

    fn partition_fields(
        &self,
        partition: i64,
        association: Association,
        step: usize,
        selection: &ActiveSelection,
    ) -> Vec<FieldArray> {
        self.fields
            .iter()
            .filter(|f| f.partition == Some(partition) && f.variable.association == association)
            .filter(|f| selection.is_variable_active(&f.variable.name, association))
            .filter_map(|f| {
                self.step_values(f, step)
                    .map(|v| FieldArray::new(f.variable.name.clone(), f.variable.components, v.clone()))
            })
            .collect()
    }

    fn displaced_points(&self, partition: &MemoryPartition, step: usize, options: &DisplayOptions) -> Vec<[f64; 3]> {
        let mut points = partition.points.clone();
        if !options.displacements {
            return points;
        }
        for (axis, name) in DISPLACEMENT_FIELDS.iter().enumerate() {
            let field = self.fields.iter().find(|f| {
                f.partition == Some(partition.entry.id)
                    && f.variable.association == Association::Nodal
                    && f.variable.name == *name
            });
            if let Some(values) = field.and_then(|f| self.step_values(f, step)) {
                for (point, d) in points.iter_mut().zip(values) {
                    point[axis] += options.displacement_magnitude * d;
                }
            }
        }
        points
    }
}

impl FileDecoder for MemoryFile {
    fn step_count(&self) -> usize {
        self.times.len()
    }

    fn time_at(&self, step: usize) -> Option<f64> {
        self.times.get(step).copied()
    }

    fn partition_catalog(&self) -> Result<Vec<PartitionEntry>> {
        Ok(self.partitions.iter().map(|p| p.entry.clone()).collect())
    }

    fn variable_catalog(&self) -> Result<Vec<VariableEntry>> {
        Ok(self.fields.iter().map(|f| f.variable.clone()).collect())
    }

    // Squeezing is a no-op: in-memory meshes carry no unreferenced points.
    fn extract(&mut self, step: usize, selection: &ActiveSelection, options: &DisplayOptions) -> Result<Dataset> {
        self.check_step(step)?;

        let entries: Vec<PartitionEntry> = self.partitions.iter().map(|p| p.entry.clone()).collect();
        let catalog = build_partition_catalog(&entries);

        let mut partitions = Vec::new();
        for descriptor in catalog {
            if !selection.is_partition_active(descriptor.kind, descriptor.index) {
                continue;
            }
            let Some(source) = self
                .partitions
                .iter()
                .find(|p| p.entry.kind == descriptor.kind && p.entry.id == descriptor.id)
            else {
                continue;
            };
            partitions.push(PartitionData {
                kind: descriptor.kind,
                name: descriptor.name,
                slot: descriptor.slot,
                points: self.displaced_points(source, step, options),
                point_fields: self.partition_fields(descriptor.id, Association::Nodal, step, selection),
                cell_fields: self.partition_fields(descriptor.id, Association::Elemental, step, selection),
            });
        }

        let global_fields = self
            .fields
            .iter()
            .filter(|f| f.partition.is_none())
            .filter(|f| selection.is_variable_active(&f.variable.name, Association::Global))
            .filter_map(|f| {
                self.step_values(f, step)
                    .map(|v| FieldArray::new(f.variable.name.clone(), f.variable.components, v.clone()))
            })
            .collect();

        Ok(Dataset {
            time: self.time_at(step),
            partitions,
            global_fields,
        })
    }

    fn extract_scalar(&mut self, step: usize, variable: &str, component: usize) -> Result<f64> {
        self.check_step(step)?;
        let field = self
            .fields
            .iter()
            .find(|f| f.partition.is_none() && f.variable.name == variable)
            .ok_or_else(|| ReaderError::VariableNotFound {
                name: variable.to_string(),
                association: Association::Global,
            })?;

        self.step_values(field, step)
            .and_then(|values| values.get(component).copied())
            .ok_or_else(|| {
                ReaderError::Decoder(format!(
                    "no value for '{}' component {} at step {}",
                    variable, component, step
                ))
            })
    }
}

/// Serves [`MemoryFile`]s by path and counts how often a decoder was opened.
#[derive(Debug, Default)]
pub struct MemoryDecoderFactory {
    files: RwLock<HashMap<PathBuf, Arc<MemoryFile>>>,
    opens: AtomicUsize,
}

impl MemoryDecoderFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: impl Into<PathBuf>, file: MemoryFile) {
        self.files.write().insert(path.into(), Arc::new(file));
    }

    pub fn remove(&self, path: &Path) {
        self.files.write().remove(path);
    }

    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }
}

impl DecoderFactory for MemoryDecoderFactory {
    fn open(&self, path: &Path) -> Result<Box<dyn FileDecoder>> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        let files = self.files.read();
        let file = files
            .get(path)
            .ok_or_else(|| ReaderError::unavailable(path, "no decoder content registered"))?;
        Ok(Box::new(file.as_ref().clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{build_variable_catalog, build_partition_catalog};
    use crate::types::PartitionKind;

    fn two_block_file() -> MemoryFile {
        MemoryFile::new(&[0.0, 1.0])
            .with_partition(
                PartitionEntry::new(PartitionKind::ElementBlock, "solid", 1),
                vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]],
            )
            .with_partition(PartitionEntry::unnamed(PartitionKind::ElementBlock, 2), vec![[5.0, 5.0, 5.0]])
            .with_field(1, "u", Association::Nodal, 1, vec![vec![0.0, 1.0], vec![2.0, 3.0]])
            .with_field(1, "disp_x", Association::Nodal, 1, vec![vec![0.0, 0.0], vec![0.5, 0.5]])
            .with_field(2, "u", Association::Nodal, 1, vec![vec![9.0], vec![8.0]])
            .with_field(1, "stress", Association::Elemental, 1, vec![vec![7.0], vec![6.0]])
            .with_global("energy", vec![10.0, 20.0])
    }

    fn all_active(file: &MemoryFile) -> ActiveSelection {
        let partitions = build_partition_catalog(&file.partition_catalog().unwrap());
        let variables = build_variable_catalog(&file.variable_catalog().unwrap());
        ActiveSelection::from_catalogs(&partitions, &variables)
    }

    #[test]
    fn test_extract_all_active() {
        let mut file = two_block_file();
        let selection = all_active(&file);
        let data = file.extract(1, &selection, &DisplayOptions::default()).unwrap();

        assert_eq!(data.time, Some(1.0));
        assert_eq!(data.partitions.len(), 2);
        let solid = data.partition("solid").unwrap();
        assert_eq!(solid.point_field("u").unwrap().values, vec![2.0, 3.0]);
        assert_eq!(solid.cell_field("stress").unwrap().values, vec![6.0]);
        assert_eq!(data.partition("2").unwrap().point_field("u").unwrap().values, vec![8.0]);
        assert_eq!(data.global_field("energy").unwrap().values, vec![20.0]);
    }

    #[test]
    fn test_displacement_magnitude() {
        let mut file = two_block_file();
        let selection = all_active(&file);

        let options = DisplayOptions {
            displacement_magnitude: 2.0,
            ..Default::default()
        };
        let data = file.extract(1, &selection, &options).unwrap();
        assert_eq!(data.partition("solid").unwrap().points, vec![[1.0, 0.0, 0.0], [2.0, 0.0, 0.0]]);

        let options = DisplayOptions {
            displacements: false,
            ..Default::default()
        };
        let data = file.extract(1, &selection, &options).unwrap();
        assert_eq!(data.partition("solid").unwrap().points, vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]);
    }

    #[test]
    fn test_extract_respects_selection() {
        let mut file = two_block_file();
        let mut partitions = build_partition_catalog(&file.partition_catalog().unwrap());
        let mut variables = build_variable_catalog(&file.variable_catalog().unwrap());
        partitions[1].active = false;
        for v in variables.iter_mut() {
            v.active = v.name == "u";
        }
        let selection = ActiveSelection::from_catalogs(&partitions, &variables);

        let data = file.extract(0, &selection, &DisplayOptions::default()).unwrap();
        assert_eq!(data.partitions.len(), 1);
        let solid = &data.partitions[0];
        assert_eq!(solid.name, "solid");
        assert_eq!(solid.point_fields.len(), 1);
        assert!(solid.cell_fields.is_empty());
        assert!(data.global_fields.is_empty());
    }

    #[test]
    fn test_extract_scalar() {
        let mut file = two_block_file();
        assert_eq!(file.extract_scalar(0, "energy", 0).unwrap(), 10.0);
        assert_eq!(file.extract_scalar(1, "energy", 0).unwrap(), 20.0);
        assert!(matches!(
            file.extract_scalar(0, "missing", 0),
            Err(ReaderError::VariableNotFound { .. })
        ));
        assert!(file.extract_scalar(0, "energy", 1).is_err());
        assert!(file.extract_scalar(2, "energy", 0).is_err());
    }

    #[test]
    fn test_geometry_only_file_exposes_step_zero() {
        let mut file = MemoryFile::new(&[])
            .with_partition(PartitionEntry::new(PartitionKind::ElementBlock, "solid", 1), vec![[0.0; 3]]);
        assert_eq!(FileDecoder::step_count(&file), 0);
        assert_eq!(file.time_at(0), None);

        let selection = all_active(&file);
        let data = file.extract(0, &selection, &DisplayOptions::default()).unwrap();
        assert_eq!(data.time, None);
        assert_eq!(data.partitions.len(), 1);
        assert!(file.extract(1, &selection, &DisplayOptions::default()).is_err());
    }

    #[test]
    fn test_factory_counts_opens() {
        let factory = MemoryDecoderFactory::new();
        factory.insert("run.e", MemoryFile::new(&[0.0]));

        assert!(factory.open(Path::new("run.e")).is_ok());
        assert!(matches!(
            factory.open(Path::new("other.e")),
            Err(ReaderError::SourceUnavailable { .. })
        ));
        assert_eq!(factory.open_count(), 2);
    }
}
