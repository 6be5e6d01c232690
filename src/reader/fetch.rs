// src/reader/fetch.rs
use crate::dataset::Dataset;
use crate::decoder::ActiveSelection;
use crate::error::{ReaderError, Result};
use crate::metadata::{FileRecord, GlobalStep, Snapshot};
use crate::reader::time::Resolution;
use crate::types::DisplayOptions;
use crate::utils::{fraction, lerp};

/// How a resolution is read from disk.
enum Plan<'a> {
    Single(&'a GlobalStep),
    Bracket {
        first: &'a GlobalStep,
        second: &'a GlobalStep,
        fraction: f64,
    },
}

fn plan(resolution: &Resolution) -> Result<Plan<'_>> {
    let first = &resolution.first;
    let Some(second) = &resolution.second else {
        return Ok(Plan::Single(first));
    };

    if first.file != second.file {
        return Err(ReaderError::CrossFileInterpolationUnsupported {
            first: first.path.clone(),
            second: second.path.clone(),
        });
    }

    match (resolution.time, first.time, second.time) {
        (Some(t), Some(t0), Some(t1)) => match fraction(t, t0, t1) {
            Some(fraction) => Ok(Plan::Bracket { first, second, fraction }),
            None => Ok(Plan::Single(first)),
        },
        _ => Ok(Plan::Single(first)),
    }
}

fn owning_file<'a>(snapshot: &'a Snapshot, step: &GlobalStep) -> Result<&'a FileRecord> {
    snapshot
        .files
        .get(step.file)
        .ok_or_else(|| ReaderError::Decoder(format!("no file record for step {}", step.step)))
}

/// Extract the dataset for `resolution` with the snapshot's current active flags.
pub fn fetch(resolution: &Resolution, snapshot: &Snapshot, options: &DisplayOptions) -> Result<Dataset> {
    let selection = ActiveSelection::from_catalogs(&snapshot.partitions, &snapshot.variables);

    match plan(resolution)? {
        Plan::Single(step) => {
            let record = owning_file(snapshot, step)?;
            tracing::debug!(path = %record.path.display(), step = step.local, "extract step");
            record.decoder().extract(step.local, &selection, options)
        }
        Plan::Bracket { first, second, fraction } => {
            let record = owning_file(snapshot, first)?;
            tracing::debug!(
                path = %record.path.display(),
                first = first.local,
                second = second.local,
                fraction,
                "interpolate steps"
            );
            let mut decoder = record.decoder();
            let a = decoder.extract(first.local, &selection, options)?;
            let b = decoder.extract(second.local, &selection, options)?;
            a.interpolate(&b, fraction, resolution.time)
        }
    }
}

/// Read one component of a global variable for `resolution`, interpolating when bracketed.
pub fn fetch_scalar(resolution: &Resolution, snapshot: &Snapshot, variable: &str, component: usize) -> Result<f64> {
    match plan(resolution)? {
        Plan::Single(step) => {
            let record = owning_file(snapshot, step)?;
            record.decoder().extract_scalar(step.local, variable, component)
        }
        Plan::Bracket { first, second, fraction } => {
            let record = owning_file(snapshot, first)?;
            let mut decoder = record.decoder();
            let a = decoder.extract_scalar(first.local, variable, component)?;
            let b = decoder.extract_scalar(second.local, variable, component)?;
            Ok(lerp(a, b, fraction))
        }
    }
}
