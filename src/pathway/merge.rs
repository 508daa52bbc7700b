//! Pathway resolution and merging
//!
//! Walks every discovered pathway graph, unions in its cross-database
//! equivalents, runs the normalization pipeline and exports one workbook
//! per merged or standalone pathway. Equivalence groups are merged exactly
//! once: whichever member is visited first seeds the merge and all members
//! are marked consumed.

use std::collections::HashSet;
use std::path::PathBuf;

use crate::error::Result;
use crate::pathway::graph::PathwayGraph;
use crate::pathway::hierarchy::PathwayHierarchy;
use crate::pathway::loader::PathwayLoader;
use crate::pathway::mappings::EquivalenceMapping;
use crate::pathway::source::{discover_pathways, PathwayKey};
use crate::pathway::spia::build_spia_matrices;
use crate::pathway::export::spia_matrices_to_xlsx;

/// Input and output locations of one merge run
#[derive(Debug, Clone)]
pub struct MergeConfig {
    pub kegg_dir: PathBuf,
    pub reactome_dir: PathBuf,
    pub wikipathways_dir: PathBuf,
    pub output_dir: PathBuf,
}

/// Merge bookkeeping threaded through the run: the set of pathways already
/// consumed as part of some equivalence-group merge. Owned by the merge
/// loop for the duration of one run and rebuilt from scratch on the next.
#[derive(Debug, Default)]
pub struct MergeState {
    consumed: HashSet<PathwayKey>,
}

impl MergeState {
    pub fn is_consumed(&self, key: &PathwayKey) -> bool {
        self.consumed.contains(key)
    }

    pub fn mark_consumed(&mut self, key: PathwayKey) {
        self.consumed.insert(key);
    }

    pub fn n_consumed(&self) -> usize {
        self.consumed.len()
    }
}

/// Counters reported at the end of a merge run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MergeSummary {
    /// Pathway graph files found across the three source directories
    pub discovered: usize,
    /// Equivalence groups merged into a composite pathway
    pub merged_groups: usize,
    /// Workbooks written
    pub written: usize,
    /// Workbooks skipped because the file already existed
    pub skipped_existing: usize,
}

/// Run the full merge pipeline over the three source directories.
///
/// Re-running over an unchanged input set writes nothing: merge
/// bookkeeping repeats, but the export gate skips every existing workbook.
pub fn merge_spia_files(
    config: &MergeConfig,
    mappings: &EquivalenceMapping,
    hierarchy: &dyn PathwayHierarchy,
) -> Result<MergeSummary> {
    let discovered = discover_pathways(
        &config.kegg_dir,
        &config.reactome_dir,
        &config.wikipathways_dir,
    )?;
    log::info!("A total of {} pathway files will be exported", discovered.len());

    if !hierarchy.is_populated() {
        log::warn!("Pathway hierarchy store is empty");
    }

    std::fs::create_dir_all(&config.output_dir)?;

    let loader = PathwayLoader::new(
        &config.kegg_dir,
        &config.reactome_dir,
        &config.wikipathways_dir,
        hierarchy,
    );

    let mut state = MergeState::default();
    let mut summary = MergeSummary {
        discovered: discovered.len(),
        ..Default::default()
    };

    for pathway in &discovered {
        let key: PathwayKey = (pathway.source, pathway.pathway_id.clone());
        if state.is_consumed(&key) {
            log::debug!("{} {} already merged, skipping", key.0, key.1);
            continue;
        }

        let mut graph = loader.load(pathway.source, &pathway.pathway_id)?;
        let composite_id = resolve_equivalents(&key, &mut graph, mappings, &loader, &mut state)?;
        if composite_id != pathway.pathway_id {
            summary.merged_groups += 1;
            log::info!("Merged equivalence group: {}", composite_id);
        }

        // Flattening must run before collapsing: collapsing assumes
        // atomic nodes.
        graph.flatten_complexes();
        graph.collapse_variants();
        graph.collapse_to_genes();

        let output_file = config.output_dir.join(format!("{}.xlsx", composite_id));
        if output_file.is_file() {
            log::debug!("Export already exists, skipping: {}", output_file.display());
            summary.skipped_existing += 1;
            continue;
        }

        let matrices = build_spia_matrices(&graph);
        spia_matrices_to_xlsx(&matrices, &output_file)?;
        summary.written += 1;
    }

    log::info!(
        "Merge finished: {} files discovered, {} groups merged, {} workbooks written, {} skipped",
        summary.discovered,
        summary.merged_groups,
        summary.written,
        summary.skipped_existing
    );
    Ok(summary)
}

/// Union every mapped equivalent of `seed` into `graph`, marking the whole
/// group consumed. Returns the composite identifier: the seed id, plus
/// each merged id appended with a `|` separator in mapping-entry order.
fn resolve_equivalents(
    seed: &PathwayKey,
    graph: &mut PathwayGraph,
    mappings: &EquivalenceMapping,
    loader: &PathwayLoader<'_>,
    state: &mut MergeState,
) -> Result<String> {
    let mut composite_id = seed.1.clone();

    if let Some(equivalents) = mappings.equivalents(seed) {
        for equivalent in equivalents {
            if equivalent == seed {
                continue;
            }
            let equivalent_graph = loader.load(equivalent.0, &equivalent.1)?;
            graph.union_with(&equivalent_graph);
            composite_id.push('|');
            composite_id.push_str(&equivalent.1);
            state.mark_consumed(equivalent.clone());
        }
        state.mark_consumed(seed.clone());
    }

    Ok(composite_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pathway::graph::{Entity, RelationKind};
    use crate::pathway::hierarchy::EmptyHierarchy;
    use crate::pathway::source::PathwaySource;
    use std::path::Path;
    use tempfile::TempDir;

    struct Fixture {
        _root: TempDir,
        config: MergeConfig,
    }

    fn fixture() -> Fixture {
        let root = TempDir::new().unwrap();
        let config = MergeConfig {
            kegg_dir: root.path().join("kegg"),
            reactome_dir: root.path().join("reactome"),
            wikipathways_dir: root.path().join("wikipathways"),
            output_dir: root.path().join("spia"),
        };
        for dir in [&config.kegg_dir, &config.reactome_dir, &config.wikipathways_dir] {
            std::fs::create_dir(dir).unwrap();
        }
        Fixture {
            _root: root,
            config,
        }
    }

    fn write_graph(dir: &Path, name: &str, source_gene: &str, target_gene: &str) {
        let mut g = PathwayGraph::new();
        g.add_relation(
            Entity::gene(source_gene),
            Entity::gene(target_gene),
            RelationKind::Activation,
        );
        g.to_json_file(dir.join(name)).unwrap();
    }

    fn glycolysis_mapping() -> EquivalenceMapping {
        let mut mappings = EquivalenceMapping::new();
        mappings.add_equivalence(
            (PathwaySource::Kegg, "hsa00010".to_string()),
            (PathwaySource::Reactome, "R-HSA-1".to_string()),
        );
        mappings.add_equivalence(
            (PathwaySource::Kegg, "hsa00010".to_string()),
            (PathwaySource::WikiPathways, "WP1".to_string()),
        );
        mappings
    }

    #[test]
    fn test_equivalence_group_merged_once() {
        let fx = fixture();
        write_graph(&fx.config.kegg_dir, "hsa00010_unflatten.json", "HK1", "GPI");
        write_graph(&fx.config.reactome_dir, "R-HSA-1.json", "GPI", "PFKL");
        write_graph(&fx.config.wikipathways_dir, "WP1.json", "PFKL", "ALDOA");

        let mappings = glycolysis_mapping();
        let summary = merge_spia_files(&fx.config, &mappings, &EmptyHierarchy).unwrap();

        assert_eq!(summary.discovered, 3);
        assert_eq!(summary.merged_groups, 1);
        assert_eq!(summary.written, 1);
        assert_eq!(summary.skipped_existing, 0);

        // One workbook for the whole group, under the composite identifier
        assert!(fx
            .config
            .output_dir
            .join("hsa00010|R-HSA-1|WP1.xlsx")
            .is_file());
        let outputs: Vec<_> = std::fs::read_dir(&fx.config.output_dir)
            .unwrap()
            .collect();
        assert_eq!(outputs.len(), 1);
    }

    #[test]
    fn test_rerun_writes_nothing() {
        let fx = fixture();
        write_graph(&fx.config.kegg_dir, "hsa00010_unflatten.json", "HK1", "GPI");
        write_graph(&fx.config.reactome_dir, "R-HSA-1.json", "GPI", "PFKL");
        write_graph(&fx.config.wikipathways_dir, "WP1.json", "PFKL", "ALDOA");

        let mappings = glycolysis_mapping();
        let first = merge_spia_files(&fx.config, &mappings, &EmptyHierarchy).unwrap();
        assert_eq!(first.written, 1);

        let second = merge_spia_files(&fx.config, &mappings, &EmptyHierarchy).unwrap();
        assert_eq!(second.written, 0);
        assert_eq!(second.skipped_existing, 1);
        assert_eq!(second.merged_groups, 1);
    }

    #[test]
    fn test_unmapped_pathway_exported_standalone() {
        let fx = fixture();
        write_graph(&fx.config.wikipathways_dir, "WP554.json", "ACE", "AGT");

        let summary =
            merge_spia_files(&fx.config, &EquivalenceMapping::new(), &EmptyHierarchy).unwrap();

        assert_eq!(summary.merged_groups, 0);
        assert_eq!(summary.written, 1);
        assert!(fx.config.output_dir.join("WP554.xlsx").is_file());
    }

    #[test]
    fn test_unknown_files_skipped() {
        let fx = fixture();
        write_graph(&fx.config.kegg_dir, "hsa00020.json", "CS", "ACO2");
        std::fs::write(fx.config.kegg_dir.join("README.md"), "not a graph").unwrap();

        let summary =
            merge_spia_files(&fx.config, &EquivalenceMapping::new(), &EmptyHierarchy).unwrap();

        assert_eq!(summary.discovered, 1);
        assert_eq!(summary.written, 1);
    }

    #[test]
    fn test_merged_graph_contains_all_members() {
        let fx = fixture();
        write_graph(&fx.config.kegg_dir, "hsa00010_unflatten.json", "HK1", "GPI");
        write_graph(&fx.config.reactome_dir, "R-HSA-1.json", "GPI", "PFKL");
        write_graph(&fx.config.wikipathways_dir, "WP1.json", "PFKL", "ALDOA");

        let loader = PathwayLoader::new(
            &fx.config.kegg_dir,
            &fx.config.reactome_dir,
            &fx.config.wikipathways_dir,
            &EmptyHierarchy,
        );
        let mappings = glycolysis_mapping();
        let seed: PathwayKey = (PathwaySource::Kegg, "hsa00010".to_string());
        let mut graph = loader.load(seed.0, &seed.1).unwrap();
        let mut state = MergeState::default();

        let composite =
            resolve_equivalents(&seed, &mut graph, &mappings, &loader, &mut state).unwrap();

        assert_eq!(composite, "hsa00010|R-HSA-1|WP1");
        assert_eq!(state.n_consumed(), 3);
        assert_eq!(graph.gene_names(), vec!["ALDOA", "GPI", "HK1", "PFKL"]);
    }
}
