//! Cross-database pathway equivalence mappings
//!
//! Loaded once per merge run from a ComPath-style mapping table. Only
//! `equivalentTo` rows contribute; part-of relations between pathways are
//! ignored here.

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::Result;
use crate::pathway::source::{PathwayKey, PathwaySource};

/// Mapping type of interest in the ComPath table
pub const EQUIVALENT_TO: &str = "equivalentTo";

#[derive(Debug, Deserialize)]
struct MappingRecord {
    resource_1: String,
    pathway_id_1: String,
    #[allow(dead_code)]
    pathway_name_1: String,
    mapping_type: String,
    resource_2: String,
    pathway_id_2: String,
    #[allow(dead_code)]
    pathway_name_2: String,
}

/// Read-only lookup from a pathway to its cross-database equivalents
#[derive(Debug, Default)]
pub struct EquivalenceMapping {
    map: HashMap<PathwayKey, Vec<PathwayKey>>,
}

impl EquivalenceMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load equivalence pairs from a ComPath-style CSV file with columns
    /// `resource_1,pathway_id_1,pathway_name_1,mapping_type,resource_2,
    /// pathway_id_2,pathway_name_2`.
    pub fn from_csv_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut mapping = Self::new();

        for record in reader.deserialize() {
            let record: MappingRecord = record?;
            if record.mapping_type != EQUIVALENT_TO {
                continue;
            }
            let left = match PathwaySource::from_str(&record.resource_1) {
                Ok(source) => (source, record.pathway_id_1.clone()),
                Err(e) => {
                    log::warn!("Skipping mapping row: {}", e);
                    continue;
                }
            };
            let right = match PathwaySource::from_str(&record.resource_2) {
                Ok(source) => (source, record.pathway_id_2.clone()),
                Err(e) => {
                    log::warn!("Skipping mapping row: {}", e);
                    continue;
                }
            };
            mapping.add_equivalence(left, right);
        }

        Ok(mapping)
    }

    /// Record that two pathways are equivalent, in both directions
    pub fn add_equivalence(&mut self, a: PathwayKey, b: PathwayKey) {
        if a == b {
            return;
        }
        let forward = self.map.entry(a.clone()).or_default();
        if !forward.contains(&b) {
            forward.push(b.clone());
        }
        let backward = self.map.entry(b).or_default();
        if !backward.contains(&a) {
            backward.push(a);
        }
    }

    /// Equivalents of a pathway, in mapping-entry order
    pub fn equivalents(&self, key: &PathwayKey) -> Option<&[PathwayKey]> {
        self.map.get(key).map(|v| v.as_slice())
    }

    /// Number of pathways with at least one equivalent
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
