// src/reader/options.rs
use crate::types::{DisplayOptions, PartitionKind, PartitionSelector, TimeRequest};
use serde::{Deserialize, Serialize};

/// What the caller wants from the next update.
///
/// Deserializable so a host application can keep these in its own
/// configuration; missing fields take the defaults below.
///
/// ```
/// use meshfamily_rs::{ReaderOptions, TimeRequest};
///
/// let options = ReaderOptions::default()
///     .with_time(2.5)
///     .with_variables(["u", "energy::GLOBAL"])
///     .with_blocks(["solid"]);
/// assert_eq!(options.request, TimeRequest::Time(2.5));
/// assert!(options.interpolate);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderOptions {
    /// Time or step to load; the latest step by default.
    pub request: TimeRequest,
    /// Load `<file>-s*` continuation files.
    pub adaptive: bool,
    /// Interpolate between bracketing steps when a time falls between them.
    pub interpolate: bool,
    #[serde(flatten)]
    pub display: DisplayOptions,
    /// Short (`u`) or qualified (`u::NODAL`) names; `None` loads every variable.
    pub variables: Option<Vec<String>>,
    pub blocks: Vec<PartitionSelector>,
    pub sidesets: Vec<PartitionSelector>,
    pub nodesets: Vec<PartitionSelector>,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        ReaderOptions {
            request: TimeRequest::LATEST,
            adaptive: true,
            interpolate: true,
            display: DisplayOptions::default(),
            variables: None,
            blocks: Vec::new(),
            sidesets: Vec::new(),
            nodesets: Vec::new(),
        }
    }
}

impl ReaderOptions {
    pub fn with_time(mut self, time: f64) -> Self {
        self.request = TimeRequest::Time(time);
        self
    }

    pub fn with_step(mut self, step: i64) -> Self {
        self.request = TimeRequest::Step(step);
        self
    }

    pub fn with_adaptive(mut self, adaptive: bool) -> Self {
        self.adaptive = adaptive;
        self
    }

    pub fn with_interpolation(mut self, interpolate: bool) -> Self {
        self.interpolate = interpolate;
        self
    }

    pub fn with_displacements(mut self, displacements: bool) -> Self {
        self.display.displacements = displacements;
        self
    }

    pub fn with_displacement_magnitude(mut self, magnitude: f64) -> Self {
        self.display.displacement_magnitude = magnitude;
        self
    }

    pub fn with_squeeze(mut self, squeeze: bool) -> Self {
        self.display.squeeze = squeeze;
        self
    }

    pub fn with_variables<I, S>(mut self, variables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.variables = Some(variables.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_all_variables(mut self) -> Self {
        self.variables = None;
        self
    }

    pub fn with_blocks<I, S>(mut self, blocks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PartitionSelector>,
    {
        self.blocks = blocks.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_sidesets<I, S>(mut self, sidesets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PartitionSelector>,
    {
        self.sidesets = sidesets.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_nodesets<I, S>(mut self, nodesets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PartitionSelector>,
    {
        self.nodesets = nodesets.into_iter().map(Into::into).collect();
        self
    }

    /// Selector list for a selectable kind; empty for the others.
    pub fn selector(&self, kind: PartitionKind) -> &[PartitionSelector] {
        match kind {
            PartitionKind::ElementBlock => &self.blocks,
            PartitionKind::SideSet => &self.sidesets,
            PartitionKind::NodeSet => &self.nodesets,
            _ => &[],
        }
    }

    /// True if any selectable kind has a non-empty selector.
    pub fn has_partition_selection(&self) -> bool {
        PartitionKind::SELECTABLE.iter().any(|&k| !self.selector(k).is_empty())
    }
}
