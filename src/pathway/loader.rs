//! Per-source pathway graph loading

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::pathway::graph::PathwayGraph;
use crate::pathway::hierarchy::PathwayHierarchy;
use crate::pathway::normalize::normalize_graph_names;
use crate::pathway::source::{PathwaySource, GRAPH_EXTENSION};

/// Loads pathway graphs by `(source, id)`, applying the source-specific
/// loading policy: KEGG and WikiPathways graphs load as-is, Reactome
/// graphs additionally union in every descendant pathway's graph before
/// normalization.
pub struct PathwayLoader<'a> {
    kegg_dir: &'a Path,
    reactome_dir: &'a Path,
    wikipathways_dir: &'a Path,
    hierarchy: &'a dyn PathwayHierarchy,
}

impl<'a> PathwayLoader<'a> {
    pub fn new(
        kegg_dir: &'a Path,
        reactome_dir: &'a Path,
        wikipathways_dir: &'a Path,
        hierarchy: &'a dyn PathwayHierarchy,
    ) -> Self {
        Self {
            kegg_dir,
            reactome_dir,
            wikipathways_dir,
            hierarchy,
        }
    }

    /// Load and normalize one pathway graph
    pub fn load(&self, source: PathwaySource, pathway_id: &str) -> Result<PathwayGraph> {
        match source {
            PathwaySource::Kegg => self.load_flat(self.kegg_dir, source, pathway_id),
            PathwaySource::WikiPathways => {
                self.load_flat(self.wikipathways_dir, source, pathway_id)
            }
            PathwaySource::Reactome => self.load_reactome(pathway_id),
        }
    }

    fn load_flat(
        &self,
        dir: &Path,
        source: PathwaySource,
        pathway_id: &str,
    ) -> Result<PathwayGraph> {
        let mut graph = PathwayGraph::from_json_file(self.resolve_path(dir, source, pathway_id))?;
        normalize_graph_names(&mut graph, source);
        Ok(graph)
    }

    fn load_reactome(&self, pathway_id: &str) -> Result<PathwayGraph> {
        let path = self.resolve_path(self.reactome_dir, PathwaySource::Reactome, pathway_id);
        let mut graph = PathwayGraph::from_json_file(path)?;

        if !self.hierarchy.pathway_known(pathway_id) {
            log::warn!("{} not found in pathway hierarchy store", pathway_id);
        }

        for child in self.hierarchy.descendants_of(pathway_id) {
            let child_path = graph_path(self.reactome_dir, &child);
            if !child_path.is_file() {
                log::warn!("{} graph file does not exist", child);
                continue;
            }
            let child_graph = PathwayGraph::from_json_file(&child_path)?;
            graph.union_with(&child_graph);
        }

        normalize_graph_names(&mut graph, PathwaySource::Reactome);
        Ok(graph)
    }

    /// KEGG graphs may be stored under the exporter's `_unflatten` stem
    fn resolve_path(&self, dir: &Path, source: PathwaySource, pathway_id: &str) -> PathBuf {
        let path = graph_path(dir, pathway_id);
        if source == PathwaySource::Kegg && !path.is_file() {
            let unflatten = graph_path(dir, &format!("{}_unflatten", pathway_id));
            if unflatten.is_file() {
                return unflatten;
            }
        }
        path
    }
}

fn graph_path(dir: &Path, pathway_id: &str) -> PathBuf {
    dir.join(format!("{}.{}", pathway_id, GRAPH_EXTENSION))
}
