//! PathwayForte: differential expression orchestration and pathway-graph
//! merging for topology-based enrichment
//!
//! Two independent pipelines share this crate:
//!
//! - the expression-analysis pipeline loads a count matrix and a design
//!   matrix, fits a DESeq2 model through an external R engine and writes
//!   a per-gene results table;
//! - the pathway-merge pipeline combines serialized pathway graphs from
//!   KEGG, Reactome and WikiPathways, merges cross-database equivalence
//!   groups and exports SPIA connectivity workbooks.
//!
//! # Example
//!
//! ```ignore
//! use pathway_forte::prelude::*;
//!
//! // Differential expression through DESeq2
//! let engine = DeseqRscriptEngine::new("Rscript")?;
//! let results = run_expression_analysis(
//!     &engine, "counts.csv", "design.csv", "gene_symbol", "results.csv",
//! )?;
//!
//! // Merge pathway graphs and export SPIA matrices
//! let mappings = EquivalenceMapping::from_csv_file("mappings.csv")?;
//! let summary = merge_spia_files(&config, &mappings, &EmptyHierarchy)?;
//! ```

pub mod cli;
pub mod data;
pub mod error;
pub mod expression;
pub mod io;
pub mod pathway;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::data::{CountMatrix, DesignMatrix};
    pub use crate::error::{ForteError, Result};
    pub use crate::expression::{
        run_expression_analysis, DeseqRscriptEngine, DiffExpressionResults,
        DifferentialExpressionEngine, EngineOutput, ResultsTable, DESIGN_FORMULA,
    };
    pub use crate::io::{read_count_matrix, read_design_matrix, write_results};
    pub use crate::pathway::{
        build_spia_matrices, discover_pathways, merge_spia_files, normalize_graph_names,
        spia_matrices_to_xlsx, EmptyHierarchy, Entity, EntityKind, EquivalenceMapping,
        FileHierarchy, MergeConfig, MergeState, MergeSummary, PathwayGraph, PathwayHierarchy,
        PathwayKey, PathwayLoader, PathwaySource, RelationKind, SpiaMatrices,
    };
}
