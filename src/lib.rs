// src/lib.rs
//! # meshfamily-rs
//!
//! A time-indexed reader for simulation output written as a *file family*: a
//! base mesh file plus the continuation files an adaptive run writes whenever
//! its mesh changes (`run.e`, `run.e-s002`, `run.e-s003`, ...).
//!
//! ## Features
//!
//! - **One time axis**: steps from every file in the family are concatenated
//!   into a single dense, ordered index
//! - **Change-driven metadata**: files are re-opened only when the family on
//!   disk changes
//! - **Time interpolation**: requests between two steps of the same file are
//!   linearly interpolated
//! - **Selection**: element blocks, side sets, node sets and variables can be
//!   restricted by name or id
//! - **Pluggable decoding**: the container format lives behind [`FileDecoder`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use meshfamily_rs::decoder::memory::{MemoryDecoderFactory, MemoryFile};
//! use meshfamily_rs::*;
//! use std::sync::Arc;
//!
//! fn main() -> Result<()> {
//!     let factory = Arc::new(MemoryDecoderFactory::new());
//!     factory.insert("run.e", MemoryFile::new(&[0.0, 1.0, 2.0]).with_global("energy", vec![0.0, 5.0, 7.0]));
//!
//!     let options = ReaderOptions::default()
//!         .with_time(1.5)
//!         .with_variables(["energy"]);
//!     let mut reader = FamilyReader::new("run.e", factory).with_options(options);
//!
//!     // Phase one: family, metadata and selection.
//!     reader.update_information()?;
//!     for step in reader.time_steps() {
//!         println!("step {} at {:?} in {}", step.step, step.time, step.path.display());
//!     }
//!
//!     // Phase two: the data for the requested time.
//!     reader.update_data()?;
//!     println!("energy = {}", reader.global_scalar("energy")?);
//!
//!     for warning in reader.warnings() {
//!         eprintln!("warning: {}", warning);
//!     }
//!     Ok(())
//! }
//! ```

// Modules
pub mod dataset;
pub mod decoder;
pub mod error;
pub mod family;
pub mod metadata;
pub mod reader;
pub mod types;

mod utils;

// Re-export commonly used types at the crate root for convenience
pub use error::{ReaderError, Result};

// Type exports
pub use types::{
    Association,
    DisplayOptions,
    PartitionKind,
    PartitionSelector,
    TimeRequest,
    Warning,
};

pub use dataset::{Dataset, FieldArray, PartitionData};

// Metadata exports
pub use metadata::{
    FileRecord,
    GlobalStep,
    MetadataCache,
    PartitionDescriptor,
    PartitionEntry,
    StepInfo,
    TimeIndex,
    VariableDescriptor,
    VariableEntry,
};

pub use family::{resolve_family, FamilyMember};

pub use decoder::{ActiveSelection, DecoderFactory, FileDecoder};

// Reader exports
pub use reader::{
    FamilyReader,
    ReaderHandle,
    ReaderOptions,
    ReaderState,
};

// Prelude module for glob imports
pub mod prelude {
    //! Convenient imports for common use cases.
    //!
    //! ```rust
    //! use meshfamily_rs::prelude::*;
    //! ```

    pub use crate::error::{ReaderError, Result};
    pub use crate::reader::{FamilyReader, ReaderHandle, ReaderOptions};
    pub use crate::types::{Association, TimeRequest, Warning};
}

/// The library version
pub const LIBRARY_VERSION: &str = env!("CARGO_PKG_VERSION");
