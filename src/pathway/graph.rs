//! Labeled pathway graphs over biological entities
//!
//! A [`PathwayGraph`] is a directed graph whose nodes are molecular
//! entities (genes, RNAs, proteins, complexes, variants) and whose edges
//! are signed regulatory relations. Graphs are deserialized from JSON
//! files produced by the upstream database exporters, merged by union and
//! normalized in place before matrix export.

use std::collections::HashMap;
use std::path::Path;

use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences};
use petgraph::Direction;
use serde::{Deserialize, Serialize};

use crate::error::{ForteError, Result};

/// The molecular species a node stands for
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntityKind {
    Gene,
    Rna,
    Protein,
    /// Composite entity made up of member entities
    Complex { members: Vec<Entity> },
    /// Sequence or modification variant of a base entity
    Variant { base: Box<Entity> },
}

/// One node of a pathway graph
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    #[serde(flatten)]
    pub kind: EntityKind,
}

impl Entity {
    pub fn gene(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: EntityKind::Gene,
        }
    }

    pub fn rna(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: EntityKind::Rna,
        }
    }

    pub fn protein(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: EntityKind::Protein,
        }
    }

    pub fn complex(name: &str, members: Vec<Entity>) -> Self {
        Self {
            name: name.to_string(),
            kind: EntityKind::Complex { members },
        }
    }

    pub fn variant(name: &str, base: Entity) -> Self {
        Self {
            name: name.to_string(),
            kind: EntityKind::Variant {
                base: Box::new(base),
            },
        }
    }

    pub fn is_gene(&self) -> bool {
        matches!(self.kind, EntityKind::Gene)
    }
}

/// Signed relation kinds understood by the SPIA export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    Activation,
    Inhibition,
    Expression,
    Repression,
    Association,
}

impl RelationKind {
    pub const ALL: [RelationKind; 5] = [
        RelationKind::Activation,
        RelationKind::Inhibition,
        RelationKind::Expression,
        RelationKind::Repression,
        RelationKind::Association,
    ];

    /// Worksheet / matrix label
    pub fn label(&self) -> &'static str {
        match self {
            RelationKind::Activation => "activation",
            RelationKind::Inhibition => "inhibition",
            RelationKind::Expression => "expression",
            RelationKind::Repression => "repression",
            RelationKind::Association => "association",
        }
    }

    /// Entry written into the relation's connectivity matrix
    pub fn sign(&self) -> f64 {
        match self {
            RelationKind::Inhibition | RelationKind::Repression => -1.0,
            _ => 1.0,
        }
    }
}

/// On-disk representation: a node table plus index-based edges
#[derive(Serialize, Deserialize)]
struct GraphFile {
    nodes: Vec<Entity>,
    edges: Vec<GraphFileEdge>,
}

#[derive(Serialize, Deserialize)]
struct GraphFileEdge {
    source: usize,
    target: usize,
    relation: RelationKind,
}

/// A labeled directed graph over biological entities.
/// Nodes are deduplicated by entity identity; parallel edges with the same
/// relation kind are collapsed.
#[derive(Debug, Clone, Default)]
pub struct PathwayGraph {
    graph: StableDiGraph<Entity, RelationKind>,
    indices: HashMap<Entity, NodeIndex>,
}

impl PathwayGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Find or insert a node for `entity`
    pub fn add_entity(&mut self, entity: Entity) -> NodeIndex {
        if let Some(&idx) = self.indices.get(&entity) {
            return idx;
        }
        let idx = self.graph.add_node(entity.clone());
        self.indices.insert(entity, idx);
        idx
    }

    /// Add a relation between two entities, inserting nodes as needed
    pub fn add_relation(&mut self, source: Entity, target: Entity, kind: RelationKind) {
        let a = self.add_entity(source);
        let b = self.add_entity(target);
        self.add_relation_by_index(a, b, kind);
    }

    fn add_relation_by_index(&mut self, a: NodeIndex, b: NodeIndex, kind: RelationKind) {
        let exists = self
            .graph
            .edges_connecting(a, b)
            .any(|e| *e.weight() == kind);
        if !exists {
            self.graph.add_edge(a, b, kind);
        }
    }

    pub fn contains_entity(&self, entity: &Entity) -> bool {
        self.indices.contains_key(entity)
    }

    /// Iterate over all node entities
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.graph.node_weights()
    }

    /// Iterate over all relations as (source, target, kind) triples
    pub fn relations(&self) -> impl Iterator<Item = (&Entity, &Entity, RelationKind)> {
        self.graph
            .edge_references()
            .map(move |e| (&self.graph[e.source()], &self.graph[e.target()], *e.weight()))
    }

    /// Union another graph into this one. Shared entities merge into a
    /// single node; duplicate relations are dropped.
    pub fn union_with(&mut self, other: &PathwayGraph) {
        for entity in other.graph.node_weights() {
            self.add_entity(entity.clone());
        }
        for (source, target, kind) in other.relations() {
            self.add_relation(source.clone(), target.clone(), kind);
        }
    }

    /// Rebuild the graph with every entity replaced by `f(entity)`.
    /// Entities that map to the same value merge into one node.
    pub fn map_entities<F>(&mut self, f: F)
    where
        F: Fn(&Entity) -> Entity,
    {
        let mut mapped = PathwayGraph::new();
        for entity in self.graph.node_weights() {
            mapped.add_entity(f(entity));
        }
        for (source, target, kind) in self.relations() {
            mapped.add_relation(f(source), f(target), kind);
        }
        *self = mapped;
    }

    /// Replace every complex node by its member entities. Each member
    /// inherits all of the complex's relations. Nested complexes are
    /// flattened until none remain.
    pub fn flatten_complexes(&mut self) {
        loop {
            let Some(idx) = self
                .graph
                .node_indices()
                .find(|&i| matches!(self.graph[i].kind, EntityKind::Complex { .. }))
            else {
                break;
            };

            let members = match &self.graph[idx].kind {
                EntityKind::Complex { members } => members.clone(),
                _ => unreachable!(),
            };

            let incoming: Vec<(NodeIndex, RelationKind)> = self
                .graph
                .edges_directed(idx, Direction::Incoming)
                .filter(|e| e.source() != idx)
                .map(|e| (e.source(), *e.weight()))
                .collect();
            let outgoing: Vec<(NodeIndex, RelationKind)> = self
                .graph
                .edges_directed(idx, Direction::Outgoing)
                .filter(|e| e.target() != idx)
                .map(|e| (e.target(), *e.weight()))
                .collect();

            let entity = self.graph[idx].clone();
            self.indices.remove(&entity);
            self.graph.remove_node(idx);

            for member in members {
                let member_idx = self.add_entity(member);
                for &(source, kind) in &incoming {
                    self.add_relation_by_index(source, member_idx, kind);
                }
                for &(target, kind) in &outgoing {
                    self.add_relation_by_index(member_idx, target, kind);
                }
            }
        }
    }

    /// Collapse every variant node onto its base entity
    pub fn collapse_variants(&mut self) {
        self.map_entities(resolve_variant);
    }

    /// Collapse RNAs, proteins and remaining variants onto gene nodes
    pub fn collapse_to_genes(&mut self) {
        self.map_entities(to_gene);
    }

    /// Sorted, deduplicated names of all gene nodes
    pub fn gene_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .graph
            .node_weights()
            .filter(|e| e.is_gene())
            .map(|e| e.name.clone())
            .collect();
        names.sort();
        names.dedup();
        names
    }

    /// Deserialize a graph from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let parsed: GraphFile = serde_json::from_reader(std::io::BufReader::new(file))?;

        let mut graph = PathwayGraph::new();
        let mut node_indices = Vec::with_capacity(parsed.nodes.len());
        for node in parsed.nodes {
            node_indices.push(graph.add_entity(node));
        }
        for edge in parsed.edges {
            let (Some(&a), Some(&b)) = (node_indices.get(edge.source), node_indices.get(edge.target))
            else {
                return Err(ForteError::InvalidGraph {
                    path: path.display().to_string(),
                    reason: format!(
                        "edge ({}, {}) references a node outside the node table",
                        edge.source, edge.target
                    ),
                });
            };
            graph.add_relation_by_index(a, b, edge.relation);
        }
        Ok(graph)
    }

    /// Serialize the graph to a JSON file
    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut positions: HashMap<NodeIndex, usize> = HashMap::new();
        let mut nodes = Vec::with_capacity(self.graph.node_count());
        for (position, idx) in self.graph.node_indices().enumerate() {
            positions.insert(idx, position);
            nodes.push(self.graph[idx].clone());
        }
        let edges = self
            .graph
            .edge_references()
            .map(|e| GraphFileEdge {
                source: positions[&e.source()],
                target: positions[&e.target()],
                relation: *e.weight(),
            })
            .collect();

        let file = std::fs::File::create(path)?;
        serde_json::to_writer(std::io::BufWriter::new(file), &GraphFile { nodes, edges })?;
        Ok(())
    }
}

fn resolve_variant(entity: &Entity) -> Entity {
    match &entity.kind {
        EntityKind::Variant { base } => resolve_variant(base),
        EntityKind::Complex { members } => Entity {
            name: entity.name.clone(),
            kind: EntityKind::Complex {
                members: members.iter().map(resolve_variant).collect(),
            },
        },
        _ => entity.clone(),
    }
}

fn to_gene(entity: &Entity) -> Entity {
    match &entity.kind {
        EntityKind::Gene => entity.clone(),
        EntityKind::Rna | EntityKind::Protein => Entity::gene(&entity.name),
        EntityKind::Variant { base } => to_gene(base),
        EntityKind::Complex { members } => Entity {
            name: entity.name.clone(),
            kind: EntityKind::Complex {
                members: members.iter().map(to_gene).collect(),
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_merges_shared_entities() {
        let mut a = PathwayGraph::new();
        a.add_relation(Entity::gene("TP53"), Entity::gene("MDM2"), RelationKind::Activation);

        let mut b = PathwayGraph::new();
        b.add_relation(Entity::gene("TP53"), Entity::gene("MDM2"), RelationKind::Activation);
        b.add_relation(Entity::gene("TP53"), Entity::gene("CDKN1A"), RelationKind::Expression);

        a.union_with(&b);
        assert_eq!(a.node_count(), 3);
        assert_eq!(a.edge_count(), 2);
    }

    #[test]
    fn test_flatten_complex_inherits_relations() {
        let mut g = PathwayGraph::new();
        let complex = Entity::complex(
            "AP-1",
            vec![Entity::protein("JUN"), Entity::protein("FOS")],
        );
        g.add_relation(Entity::protein("MAPK1"), complex.clone(), RelationKind::Activation);
        g.add_relation(complex, Entity::gene("CCND1"), RelationKind::Expression);

        g.flatten_complexes();

        assert!(g.contains_entity(&Entity::protein("JUN")));
        assert!(g.contains_entity(&Entity::protein("FOS")));
        assert!(!g
            .entities()
            .any(|e| matches!(e.kind, EntityKind::Complex { .. })));
        // MAPK1 -> JUN, MAPK1 -> FOS, JUN -> CCND1, FOS -> CCND1
        assert_eq!(g.edge_count(), 4);
    }

    #[test]
    fn test_full_normalization_leaves_only_genes() {
        let mut g = PathwayGraph::new();
        let phospho_jun = Entity::variant("JUN phosphorylated", Entity::protein("JUN"));
        let complex = Entity::complex("AP-1", vec![phospho_jun, Entity::protein("FOS")]);
        g.add_relation(complex, Entity::rna("CCND1"), RelationKind::Expression);

        g.flatten_complexes();
        g.collapse_variants();
        g.collapse_to_genes();

        assert!(g.entities().all(|e| e.is_gene()));
        assert_eq!(g.gene_names(), vec!["CCND1", "FOS", "JUN"]);
    }

    #[test]
    fn test_collapse_variants_merges_onto_base() {
        let mut g = PathwayGraph::new();
        let variant = Entity::variant("TP53 R175H", Entity::protein("TP53"));
        g.add_relation(variant, Entity::protein("MDM2"), RelationKind::Inhibition);
        g.add_relation(
            Entity::protein("TP53"),
            Entity::protein("MDM2"),
            RelationKind::Inhibition,
        );

        g.collapse_variants();

        assert_eq!(g.node_count(), 2);
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn test_json_round_trip() {
        let mut g = PathwayGraph::new();
        g.add_relation(
            Entity::gene("EGFR"),
            Entity::complex("GRB2:SOS1", vec![Entity::protein("GRB2"), Entity::protein("SOS1")]),
            RelationKind::Association,
        );

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.json");
        g.to_json_file(&path).unwrap();
        let loaded = PathwayGraph::from_json_file(&path).unwrap();

        assert_eq!(loaded.node_count(), g.node_count());
        assert_eq!(loaded.edge_count(), g.edge_count());
        assert!(loaded.contains_entity(&Entity::gene("EGFR")));
    }

    #[test]
    fn test_out_of_range_edge_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(
            &path,
            r#"{"nodes":[{"name":"A","type":"gene"}],"edges":[{"source":0,"target":5,"relation":"activation"}]}"#,
        )
        .unwrap();

        let err = PathwayGraph::from_json_file(&path).unwrap_err();
        assert!(matches!(err, ForteError::InvalidGraph { .. }));
    }
}
