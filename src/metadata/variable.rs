// src/metadata/variable.rs
use crate::types::Association;
use std::collections::BTreeMap;

/// Raw variable record as reported by a decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableEntry {
    pub name: String,
    pub association: Association,
    pub components: usize,
}

impl VariableEntry {
    pub fn new(name: impl Into<String>, association: Association, components: usize) -> Self {
        VariableEntry {
            name: name.into(),
            association,
            components,
        }
    }
}

/// One field variable and its active flag.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDescriptor {
    pub name: String,
    pub association: Association,
    pub components: usize,
    pub active: bool,
}

impl VariableDescriptor {
    /// `name::ASSOCIATION`
    pub fn full_name(&self) -> String {
        format!("{}::{}", self.name, self.association)
    }

    pub fn matches(&self, name: &str) -> bool {
        self.name == name || self.full_name() == name
    }
}

/// Deduplicate by (name, association) and order by lowercased name, then association.
pub fn build_variable_catalog(entries: &[VariableEntry]) -> Vec<VariableDescriptor> {
    let mut unique: BTreeMap<(String, Association, String), usize> = BTreeMap::new();
    for entry in entries {
        unique
            .entry((entry.name.to_lowercase(), entry.association, entry.name.clone()))
            .or_insert(entry.components);
    }

    unique
        .into_iter()
        .map(|((_, association, name), components)| VariableDescriptor {
            name,
            association,
            components,
            active: true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_dedup_and_order() {
        let catalog = build_variable_catalog(&[
            VariableEntry::new("u", Association::Nodal, 1),
            VariableEntry::new("Temp", Association::Global, 1),
            VariableEntry::new("u", Association::Nodal, 1),
            VariableEntry::new("temp", Association::Elemental, 1),
            VariableEntry::new("disp", Association::Nodal, 3),
            VariableEntry::new("u", Association::Elemental, 1),
        ]);

        let names: Vec<String> = catalog.iter().map(|v| v.full_name()).collect();
        assert_eq!(
            names,
            vec![
                "disp::NODAL",
                "temp::ELEMENTAL",
                "Temp::GLOBAL",
                "u::ELEMENTAL",
                "u::NODAL",
            ]
        );
        assert_eq!(catalog[0].components, 3);
        assert!(catalog.iter().all(|v| v.active));
    }

    #[test]
    fn test_matches_short_and_full_name() {
        let v = VariableDescriptor {
            name: "u".into(),
            association: Association::Nodal,
            components: 1,
            active: true,
        };
        assert!(v.matches("u"));
        assert!(v.matches("u::NODAL"));
        assert!(!v.matches("u::GLOBAL"));
        assert!(!v.matches("U"));
    }
}
