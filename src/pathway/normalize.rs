//! Database-specific entity name normalization
//!
//! Each exporter labels entities differently: KEGG nodes carry
//! comma-separated synonym lists with database prefixes, Reactome appends
//! cellular compartments in brackets, WikiPathways labels keep authoring
//! artifacts like quotes and line breaks. Names are harmonized right after
//! a graph is loaded so that equivalent entities from different databases
//! merge into a single node when graphs are unioned.

use crate::pathway::graph::{Entity, EntityKind, PathwayGraph};
use crate::pathway::source::PathwaySource;

/// Normalize every entity name in the graph according to the conventions
/// of its source database
pub fn normalize_graph_names(graph: &mut PathwayGraph, source: PathwaySource) {
    graph.map_entities(|entity| normalize_entity(entity, source));
}

fn normalize_entity(entity: &Entity, source: PathwaySource) -> Entity {
    let kind = match &entity.kind {
        EntityKind::Complex { members } => EntityKind::Complex {
            members: members
                .iter()
                .map(|m| normalize_entity(m, source))
                .collect(),
        },
        EntityKind::Variant { base } => EntityKind::Variant {
            base: Box::new(normalize_entity(base, source)),
        },
        other => other.clone(),
    };
    Entity {
        name: normalize_name(&entity.name, source),
        kind,
    }
}

fn normalize_name(name: &str, source: PathwaySource) -> String {
    let name = collapse_whitespace(name);
    match source {
        // KEGG labels are synonym lists ("TP53, BCC7, LFS1") with
        // occasional organism-prefixed identifiers ("hsa:7157")
        PathwaySource::Kegg => {
            let first = name.split(',').next().unwrap_or(&name).trim();
            first
                .strip_prefix("hsa:")
                .unwrap_or(first)
                .to_string()
        }
        // Reactome appends the compartment: "TP53 [nucleoplasm]"
        PathwaySource::Reactome => match name.rfind(" [") {
            Some(pos) if name.ends_with(']') => name[..pos].to_string(),
            _ => name,
        },
        // WikiPathways labels sometimes keep authoring quotes
        PathwaySource::WikiPathways => name.trim_matches('"').to_string(),
    }
}

fn collapse_whitespace(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pathway::graph::RelationKind;

    #[test]
    fn test_kegg_synonym_list() {
        assert_eq!(normalize_name("TP53, BCC7, LFS1", PathwaySource::Kegg), "TP53");
        assert_eq!(normalize_name("hsa:7157", PathwaySource::Kegg), "7157");
    }

    #[test]
    fn test_reactome_compartment() {
        assert_eq!(
            normalize_name("TP53 [nucleoplasm]", PathwaySource::Reactome),
            "TP53"
        );
        assert_eq!(normalize_name("TP53", PathwaySource::Reactome), "TP53");
    }

    #[test]
    fn test_wikipathways_quotes_and_line_breaks() {
        assert_eq!(
            normalize_name("\"TP53\"", PathwaySource::WikiPathways),
            "TP53"
        );
        assert_eq!(
            normalize_name("cyclin\nD1", PathwaySource::WikiPathways),
            "cyclin D1"
        );
    }

    #[test]
    fn test_normalization_merges_nodes() {
        let mut g = PathwayGraph::new();
        g.add_relation(
            Entity::gene("TP53, BCC7"),
            Entity::gene("MDM2"),
            RelationKind::Activation,
        );
        g.add_relation(
            Entity::gene("TP53"),
            Entity::gene("MDM2"),
            RelationKind::Activation,
        );
        assert_eq!(g.node_count(), 3);

        normalize_graph_names(&mut g, PathwaySource::Kegg);
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn test_complex_members_normalized() {
        let mut g = PathwayGraph::new();
        g.add_entity(Entity::complex(
            "p53 complex [nucleoplasm]",
            vec![Entity::protein("TP53 [nucleoplasm]")],
        ));

        normalize_graph_names(&mut g, PathwaySource::Reactome);
        assert!(g.contains_entity(&Entity::complex(
            "p53 complex",
            vec![Entity::protein("TP53")],
        )));
    }
}
