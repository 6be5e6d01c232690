// src/error.rs
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::types::Association;

#[derive(Error, Debug)]
pub enum ReaderError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Source unavailable: {}: {reason}", .path.display())]
    SourceUnavailable { path: PathBuf, reason: String },

    #[error(
        "Time interpolation across adaptive files is not supported ({} -> {})",
        .first.display(),
        .second.display()
    )]
    CrossFileInterpolationUnsupported { first: PathBuf, second: PathBuf },

    #[error("Reader not initialized: call update_information() first")]
    NotInitialized,

    #[error("Cannot resolve a step against an empty time axis")]
    EmptyTimeAxis,

    #[error("Time requested but no step carries time information")]
    NoTimeInformation,

    #[error("Variable not found: {name} ({association})")]
    VariableNotFound { name: String, association: Association },

    #[error("Bracketing steps are incompatible: {0}")]
    IncompatibleSteps(String),

    #[error("Decoder error: {0}")]
    Decoder(String),
}

impl ReaderError {
    pub(crate) fn unavailable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        ReaderError::SourceUnavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReaderError>;
