//! Reactome pathway hierarchy lookup
//!
//! Reactome pathways nest: a parent pathway's graph is only complete once
//! the graphs of all its descendant pathways are unioned in. The hierarchy
//! itself lives outside the graph files, in a metadata store exposed
//! through the [`PathwayHierarchy`] trait.

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::Path;

use crate::error::Result;

/// Parent-to-children lookup over pathway identifiers
pub trait PathwayHierarchy {
    /// Whether the store knows this pathway at all
    fn pathway_known(&self, pathway_id: &str) -> bool;

    /// Direct children of a pathway; empty for unknown or leaf pathways
    fn children_of(&self, pathway_id: &str) -> Vec<String>;

    /// Whether the store holds any entries
    fn is_populated(&self) -> bool;

    /// All descendants of a pathway in breadth-first order, excluding the
    /// pathway itself. Cycles in the store are visited once.
    fn descendants_of(&self, pathway_id: &str) -> Vec<String> {
        let mut seen: HashSet<String> = HashSet::new();
        seen.insert(pathway_id.to_string());
        let mut queue: VecDeque<String> = self.children_of(pathway_id).into();
        let mut descendants = Vec::new();

        while let Some(child) = queue.pop_front() {
            if !seen.insert(child.clone()) {
                continue;
            }
            queue.extend(self.children_of(&child));
            descendants.push(child);
        }
        descendants
    }
}

/// File-backed hierarchy store: a JSON object mapping each parent pathway
/// identifier to the list of its direct children
#[derive(Debug, Default)]
pub struct FileHierarchy {
    children: HashMap<String, Vec<String>>,
}

impl FileHierarchy {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let children = serde_json::from_reader(std::io::BufReader::new(file))?;
        Ok(Self { children })
    }
}

impl PathwayHierarchy for FileHierarchy {
    fn pathway_known(&self, pathway_id: &str) -> bool {
        self.children.contains_key(pathway_id)
            || self.children.values().any(|v| v.iter().any(|c| c == pathway_id))
    }

    fn children_of(&self, pathway_id: &str) -> Vec<String> {
        self.children.get(pathway_id).cloned().unwrap_or_default()
    }

    fn is_populated(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Hierarchy store with no entries, used when no store is configured.
/// Every lookup logs nothing here; the loader reports unknown pathways.
#[derive(Debug, Default)]
pub struct EmptyHierarchy;

impl PathwayHierarchy for EmptyHierarchy {
    fn pathway_known(&self, _pathway_id: &str) -> bool {
        false
    }

    fn children_of(&self, _pathway_id: &str) -> Vec<String> {
        Vec::new()
    }

    fn is_populated(&self) -> bool {
        false
    }
}
