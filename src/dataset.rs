// src/dataset.rs
use crate::error::{ReaderError, Result};
use crate::types::PartitionKind;
use crate::utils::lerp;

/// A named array of `components`-wide tuples stored flat.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldArray {
    pub name: String,
    pub components: usize,
    pub values: Vec<f64>,
}

impl FieldArray {
    pub fn new(name: impl Into<String>, components: usize, values: Vec<f64>) -> Self {
        FieldArray {
            name: name.into(),
            components,
            values,
        }
    }

    pub fn scalar(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self::new(name, 1, values)
    }

    pub fn tuple_count(&self) -> usize {
        if self.components == 0 {
            0
        } else {
            self.values.len() / self.components
        }
    }

    pub fn component(&self, tuple: usize, component: usize) -> Option<f64> {
        if component >= self.components {
            return None;
        }
        self.values.get(tuple * self.components + component).copied()
    }

    fn interpolate(&self, other: &FieldArray, fraction: f64) -> Result<FieldArray> {
        if self.name != other.name || self.components != other.components || self.values.len() != other.values.len() {
            return Err(ReaderError::IncompatibleSteps(format!(
                "field '{}' has shape {}x{} vs '{}' {}x{}",
                self.name,
                self.tuple_count(),
                self.components,
                other.name,
                other.tuple_count(),
                other.components
            )));
        }
        let values = self
            .values
            .iter()
            .zip(&other.values)
            .map(|(&a, &b)| lerp(a, b, fraction))
            .collect();
        Ok(FieldArray::new(self.name.clone(), self.components, values))
    }
}

fn interpolate_fields(a: &[FieldArray], b: &[FieldArray], fraction: f64) -> Result<Vec<FieldArray>> {
    if a.len() != b.len() {
        return Err(ReaderError::IncompatibleSteps(format!(
            "field count differs ({} vs {})",
            a.len(),
            b.len()
        )));
    }
    a.iter().zip(b).map(|(x, y)| x.interpolate(y, fraction)).collect()
}

/// Geometry and fields of one active partition.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionData {
    pub kind: PartitionKind,
    pub name: String,
    pub slot: usize,
    pub points: Vec<[f64; 3]>,
    pub point_fields: Vec<FieldArray>,
    pub cell_fields: Vec<FieldArray>,
}

impl PartitionData {
    pub fn point_field(&self, name: &str) -> Option<&FieldArray> {
        self.point_fields.iter().find(|f| f.name == name)
    }

    pub fn cell_field(&self, name: &str) -> Option<&FieldArray> {
        self.cell_fields.iter().find(|f| f.name == name)
    }

    fn interpolate(&self, other: &PartitionData, fraction: f64) -> Result<PartitionData> {
        if self.slot != other.slot || self.points.len() != other.points.len() {
            return Err(ReaderError::IncompatibleSteps(format!(
                "partition '{}' differs between steps",
                self.name
            )));
        }
        let points = self
            .points
            .iter()
            .zip(&other.points)
            .map(|(p, q)| {
                [
                    lerp(p[0], q[0], fraction),
                    lerp(p[1], q[1], fraction),
                    lerp(p[2], q[2], fraction),
                ]
            })
            .collect();

        Ok(PartitionData {
            kind: self.kind,
            name: self.name.clone(),
            slot: self.slot,
            points,
            point_fields: interpolate_fields(&self.point_fields, &other.point_fields, fraction)?,
            cell_fields: interpolate_fields(&self.cell_fields, &other.cell_fields, fraction)?,
        })
    }
}

/// The extracted content of one time step (or an interpolation between two).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub time: Option<f64>,
    pub partitions: Vec<PartitionData>,
    pub global_fields: Vec<FieldArray>,
}

impl Dataset {
    pub fn partition(&self, name: &str) -> Option<&PartitionData> {
        self.partitions.iter().find(|p| p.name == name)
    }

    pub fn global_field(&self, name: &str) -> Option<&FieldArray> {
        self.global_fields.iter().find(|f| f.name == name)
    }

    /// Field-wise linear interpolation from `self` towards `other`.
    pub fn interpolate(&self, other: &Dataset, fraction: f64, time: Option<f64>) -> Result<Dataset> {
        if self.partitions.len() != other.partitions.len() {
            return Err(ReaderError::IncompatibleSteps(format!(
                "partition count differs ({} vs {})",
                self.partitions.len(),
                other.partitions.len()
            )));
        }
        let partitions = self
            .partitions
            .iter()
            .zip(&other.partitions)
            .map(|(a, b)| a.interpolate(b, fraction))
            .collect::<Result<Vec<_>>>()?;

        Ok(Dataset {
            time,
            partitions,
            global_fields: interpolate_fields(&self.global_fields, &other.global_fields, fraction)?,
        })
    }
}
