//! Pathway graph merging and SPIA matrix export
//!
//! Combines serialized pathway graphs from KEGG, Reactome and
//! WikiPathways, resolves cross-database equivalence groups, normalizes
//! the merged graphs down to gene nodes and exports one connectivity
//! workbook per pathway.

pub mod export;
pub mod graph;
pub mod hierarchy;
pub mod loader;
pub mod mappings;
pub mod merge;
pub mod normalize;
pub mod source;
pub mod spia;

pub use export::spia_matrices_to_xlsx;
pub use graph::{Entity, EntityKind, PathwayGraph, RelationKind};
pub use hierarchy::{EmptyHierarchy, FileHierarchy, PathwayHierarchy};
pub use loader::PathwayLoader;
pub use mappings::EquivalenceMapping;
pub use merge::{merge_spia_files, MergeConfig, MergeState, MergeSummary};
pub use normalize::normalize_graph_names;
pub use source::{discover_pathways, DiscoveredPathway, PathwayKey, PathwaySource};
pub use spia::{build_spia_matrices, SpiaMatrices};
