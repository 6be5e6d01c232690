// src/reader/selection.rs
//! Active flags for partitions and variables.
//!
//! Every call recomputes every flag from the options alone, so applying the
//! same options twice is a no-op and nothing carries over between requests.

use crate::metadata::{PartitionDescriptor, Snapshot, VariableDescriptor};
use crate::reader::options::ReaderOptions;
use crate::types::{emit, Association, PartitionKind, Warning};
use smallvec::SmallVec;

/// Apply `options` to the catalogs in `snapshot`.
pub fn apply_selection(options: &ReaderOptions, snapshot: &mut Snapshot, warnings: &mut Vec<Warning>) {
    update_active_partitions(options, &mut snapshot.partitions, warnings);
    update_active_variables(options, &mut snapshot.variables, warnings);
}

/// Per selectable kind: a non-empty selector activates exactly what it names;
/// an empty one deactivates the kind when another kind is selected, otherwise
/// activates it. Kinds without a selector stay active.
pub fn update_active_partitions(
    options: &ReaderOptions,
    partitions: &mut [PartitionDescriptor],
    warnings: &mut Vec<Warning>,
) {
    tracing::debug!("update active partitions");
    let any_selected = options.has_partition_selection();

    for kind in PartitionKind::SELECTABLE {
        let selector = options.selector(kind);
        if !selector.is_empty() {
            let unknown: Vec<String> = selector
                .iter()
                .filter(|s| !partitions.iter().any(|p| p.kind == kind && p.matches(s)))
                .map(|s| s.to_string())
                .collect();
            if !unknown.is_empty() {
                emit(
                    warnings,
                    Warning::UnknownPartitions {
                        selector: kind.selector_name(),
                        entries: unknown,
                    },
                );
            }
        }

        for p in partitions.iter_mut().filter(|p| p.kind == kind) {
            p.active = if !selector.is_empty() {
                selector.iter().any(|s| p.matches(s))
            } else {
                !any_selected
            };
        }
    }

    for p in partitions.iter_mut().filter(|p| !p.kind.is_selectable()) {
        p.active = true;
    }
}

/// A variable is active if its short or qualified name is requested, or if no list is given.
pub fn update_active_variables(
    options: &ReaderOptions,
    variables: &mut [VariableDescriptor],
    warnings: &mut Vec<Warning>,
) {
    tracing::debug!("update active variables");
    let Some(requested) = &options.variables else {
        for v in variables.iter_mut() {
            v.active = true;
        }
        return;
    };

    check_requested_variables(requested, variables, warnings);
    for v in variables.iter_mut() {
        v.active = requested.iter().any(|name| v.matches(name));
    }
}

fn check_requested_variables(requested: &[String], variables: &[VariableDescriptor], warnings: &mut Vec<Warning>) {
    for entry in requested {
        if let Some((_, suffix)) = entry.split_once("::") {
            if Association::from_name(suffix).is_none() {
                emit(warnings, Warning::UnknownAssociation { entry: entry.clone() });
            }
            continue;
        }

        let matches: SmallVec<[&VariableDescriptor; 3]> = variables.iter().filter(|v| v.name == *entry).collect();
        if matches.len() > 1 {
            emit(
                warnings,
                Warning::AmbiguousVariable {
                    name: entry.clone(),
                    qualified: matches.iter().map(|v| v.full_name()).collect(),
                },
            );
        }
    }
}
