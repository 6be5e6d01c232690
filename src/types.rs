// src/types.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Partition kinds in the order the combined multi-partition container stores them.
///
/// The discriminant order matters: slot indices are assigned by walking the
/// kinds in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PartitionKind {
    ElementBlock,
    FaceBlock,
    EdgeBlock,
    ElementSet,
    SideSet,
    FaceSet,
    EdgeSet,
    NodeSet,
}

impl PartitionKind {
    pub const CONTAINER_ORDER: [PartitionKind; 8] = [
        PartitionKind::ElementBlock,
        PartitionKind::FaceBlock,
        PartitionKind::EdgeBlock,
        PartitionKind::ElementSet,
        PartitionKind::SideSet,
        PartitionKind::FaceSet,
        PartitionKind::EdgeSet,
        PartitionKind::NodeSet,
    ];

    /// The kinds a caller can select by name or id.
    pub const SELECTABLE: [PartitionKind; 3] = [
        PartitionKind::ElementBlock,
        PartitionKind::SideSet,
        PartitionKind::NodeSet,
    ];

    pub fn is_selectable(&self) -> bool {
        Self::SELECTABLE.contains(self)
    }

    /// Name of the option that selects this kind.
    pub fn selector_name(&self) -> &'static str {
        match self {
            PartitionKind::ElementBlock => "blocks",
            PartitionKind::SideSet => "sidesets",
            PartitionKind::NodeSet => "nodesets",
            PartitionKind::FaceBlock => "face_blocks",
            PartitionKind::EdgeBlock => "edge_blocks",
            PartitionKind::ElementSet => "element_sets",
            PartitionKind::FaceSet => "face_sets",
            PartitionKind::EdgeSet => "edge_sets",
        }
    }
}

/// Where a field variable lives.
///
/// Ordering (elemental, nodal, global) is the catalog tie-break after the
/// case-insensitive name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Association {
    Elemental,
    Nodal,
    Global,
}

impl Association {
    pub const ALL: [Association; 3] = [Association::Elemental, Association::Nodal, Association::Global];

    pub fn name(&self) -> &'static str {
        match self {
            Association::Elemental => "ELEMENTAL",
            Association::Nodal => "NODAL",
            Association::Global => "GLOBAL",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ELEMENTAL" => Some(Association::Elemental),
            "NODAL" => Some(Association::Nodal),
            "GLOBAL" => Some(Association::Global),
            _ => None,
        }
    }
}

impl fmt::Display for Association {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One entry of a partition selector: a name, or a numeric id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PartitionSelector {
    Id(i64),
    Name(String),
}

impl fmt::Display for PartitionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartitionSelector::Id(id) => write!(f, "{}", id),
            PartitionSelector::Name(name) => f.write_str(name),
        }
    }
}

impl From<&str> for PartitionSelector {
    fn from(value: &str) -> Self {
        PartitionSelector::Name(value.to_string())
    }
}

impl From<String> for PartitionSelector {
    fn from(value: String) -> Self {
        PartitionSelector::Name(value)
    }
}

impl From<i64> for PartitionSelector {
    fn from(value: i64) -> Self {
        PartitionSelector::Id(value)
    }
}

/// Which point on the time axis a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeRequest {
    /// Absolute simulation time; may resolve to a bracketing pair.
    Time(f64),
    /// Global step index, `-1` for the latest.
    Step(i64),
}

impl TimeRequest {
    pub const LATEST: TimeRequest = TimeRequest::Step(-1);
}

impl Default for TimeRequest {
    fn default() -> Self {
        TimeRequest::LATEST
    }
}

/// Geometry options forwarded to the decoder on every extraction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayOptions {
    pub displacements: bool,
    pub displacement_magnitude: f64,
    pub squeeze: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        DisplayOptions {
            displacements: true,
            displacement_magnitude: 1.0,
            squeeze: false,
        }
    }
}

/// Recoverable conditions. Processing continues after each of these.
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    TimeOutOfRange { requested: f64, min: f64, max: f64 },
    StepOutOfRange { requested: i64, last: usize },
    UnknownPartitions { selector: &'static str, entries: Vec<String> },
    AmbiguousVariable { name: String, qualified: Vec<String> },
    UnknownAssociation { entry: String },
    SchemaMismatch { path: PathBuf },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::TimeOutOfRange { requested, min, max } => write!(
                f,
                "Time out of range, {} not in [{}, {}], using the latest timestep",
                requested, min, max
            ),
            Warning::StepOutOfRange { requested, last } => {
                write!(f, "Timestep out of range: {} not in [0, {}]", requested, last)
            }
            Warning::UnknownPartitions { selector, entries } => write!(
                f,
                "The following items in '{}' do not exist: {}",
                selector,
                entries.join(", ")
            ),
            Warning::AmbiguousVariable { name, qualified } => write!(
                f,
                "The variable name '{}' exists with multiple data types, use a qualified name ({}) to limit loading to one type",
                name,
                qualified.join(", ")
            ),
            Warning::UnknownAssociation { entry } => write!(
                f,
                "Unknown variable suffix in '{}', must be 'NODAL', 'ELEMENTAL', or 'GLOBAL'",
                entry
            ),
            Warning::SchemaMismatch { path } => write!(
                f,
                "Catalogs in {} differ from the base file or cannot be read; the base file catalog is used",
                path.display()
            ),
        }
    }
}

/// Log a warning and keep it for the caller.
pub(crate) fn emit(warnings: &mut Vec<Warning>, warning: Warning) {
    tracing::warn!("{}", warning);
    warnings.push(warning);
}
