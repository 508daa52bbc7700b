//! Connectivity matrices for topology-based enrichment
//!
//! SPIA consumes one gene-by-gene matrix per relation kind. Entry
//! `(target, source)` is the relation's sign when the column gene acts on
//! the row gene. Gene order is sorted so workbooks are deterministic for a
//! given graph.

use std::collections::{BTreeMap, HashMap};

use ndarray::Array2;

use crate::pathway::graph::{PathwayGraph, RelationKind};

/// One matrix per relation kind over the graph's gene nodes
#[derive(Debug, Clone)]
pub struct SpiaMatrices {
    /// Sorted gene names, the row and column order of every matrix
    pub genes: Vec<String>,
    /// Relation label -> genes x genes signed matrix
    pub matrices: BTreeMap<&'static str, Array2<f64>>,
}

impl SpiaMatrices {
    pub fn n_genes(&self) -> usize {
        self.genes.len()
    }
}

/// Build the full set of connectivity matrices for a normalized graph.
/// Relations touching non-gene entities are ignored; the normalization
/// pipeline is expected to have collapsed everything onto genes already.
pub fn build_spia_matrices(graph: &PathwayGraph) -> SpiaMatrices {
    let genes = graph.gene_names();
    let n = genes.len();

    let index: HashMap<&str, usize> = genes
        .iter()
        .enumerate()
        .map(|(i, name)| (name.as_str(), i))
        .collect();

    let mut matrices: BTreeMap<&'static str, Array2<f64>> = RelationKind::ALL
        .iter()
        .map(|kind| (kind.label(), Array2::zeros((n, n))))
        .collect();

    for (source, target, kind) in graph.relations() {
        if !source.is_gene() || !target.is_gene() {
            continue;
        }
        let row = index[target.name.as_str()];
        let col = index[source.name.as_str()];
        if let Some(matrix) = matrices.get_mut(kind.label()) {
            matrix[[row, col]] = kind.sign();
        }
    }

    SpiaMatrices { genes, matrices }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pathway::graph::Entity;

    #[test]
    fn test_signs_and_placement() {
        let mut g = PathwayGraph::new();
        g.add_relation(Entity::gene("A"), Entity::gene("B"), RelationKind::Activation);
        g.add_relation(Entity::gene("B"), Entity::gene("C"), RelationKind::Inhibition);

        let matrices = build_spia_matrices(&g);
        assert_eq!(matrices.genes, vec!["A", "B", "C"]);

        let activation = &matrices.matrices["activation"];
        // A (column 0) activates B (row 1)
        assert_eq!(activation[[1, 0]], 1.0);
        assert_eq!(activation.sum(), 1.0);

        let inhibition = &matrices.matrices["inhibition"];
        // B (column 1) inhibits C (row 2)
        assert_eq!(inhibition[[2, 1]], -1.0);
    }

    #[test]
    fn test_all_relation_kinds_present() {
        let g = PathwayGraph::new();
        let matrices = build_spia_matrices(&g);
        assert_eq!(matrices.matrices.len(), RelationKind::ALL.len());
        assert!(matrices.matrices.contains_key("association"));
    }

    #[test]
    fn test_non_gene_relations_ignored() {
        let mut g = PathwayGraph::new();
        g.add_relation(
            Entity::protein("A"),
            Entity::gene("B"),
            RelationKind::Activation,
        );

        let matrices = build_spia_matrices(&g);
        assert_eq!(matrices.genes, vec!["B"]);
        assert_eq!(matrices.matrices["activation"].sum(), 0.0);
    }
}
