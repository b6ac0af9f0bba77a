// Cypher Graph - Property-graph import and export for Cypher databases
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Merging decoded record values into a graph.

use crate::config::AttributeMapping;
use crate::cypher::CypherValue;
use crate::error::Result;
use crate::graph::GraphStore;
use crate::mapping::record::{Node, Path, RecordValue, Relationship};

/// Number of node and relationship merges performed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Node merges (a node seen twice counts twice).
    pub nodes: usize,
    /// Relationship merges.
    pub relationships: usize,
}

impl MergeStats {
    /// Add another set of counts to this one.
    pub fn absorb(&mut self, other: MergeStats) {
        self.nodes += other.nodes;
        self.relationships += other.relationships;
    }
}

/// Upsert a node keyed by its identity.
///
/// The vertex attributes are the node's properties plus the identity and
/// label list under the mapping's keys; re-merging overlays them.
pub fn merge_node<G>(graph: &mut G, node: Node, mapping: &AttributeMapping)
where
    G: GraphStore + ?Sized,
{
    let Node {
        identity,
        labels,
        mut properties,
    } = node;
    properties.insert(mapping.id_key.clone(), CypherValue::String(identity.clone()));
    properties.insert(mapping.labels_key.clone(), CypherValue::from(labels));
    graph.merge_node(&identity, properties);
}

/// Upsert a directed edge keyed by the relationship identity.
pub fn merge_relationship<G>(graph: &mut G, rel: Relationship, mapping: &AttributeMapping) -> Result<()>
where
    G: GraphStore + ?Sized,
{
    let Relationship {
        identity,
        rel_type,
        start,
        end,
        mut properties,
    } = rel;
    properties.insert(mapping.id_key.clone(), CypherValue::String(identity.clone()));
    properties.insert(mapping.type_key.clone(), CypherValue::String(rel_type));
    graph.merge_edge_with_key(&identity, &start, &end, properties)
}

/// Flatten a path into its nodes and relationships.
///
/// A path of N segments performs N + 1 node merges and N relationship
/// merges; a segment start equal to the previous node is not merged again.
pub fn merge_path<G>(graph: &mut G, path: Path, mapping: &AttributeMapping) -> Result<MergeStats>
where
    G: GraphStore + ?Sized,
{
    let mut stats = MergeStats::default();
    let mut previous = path.start.identity.clone();
    merge_node(graph, path.start, mapping);
    stats.nodes += 1;

    for segment in path.segments {
        if segment.start.identity != previous {
            merge_node(graph, segment.start, mapping);
            stats.nodes += 1;
        }
        merge_relationship(graph, segment.relationship, mapping)?;
        stats.relationships += 1;
        previous = segment.end.identity.clone();
        merge_node(graph, segment.end, mapping);
        stats.nodes += 1;
    }

    Ok(stats)
}

/// Merge every node and relationship found in a value, recursing into
/// sequences and mappings. Scalars contribute nothing.
pub fn merge_value<G>(graph: &mut G, value: RecordValue, mapping: &AttributeMapping) -> Result<MergeStats>
where
    G: GraphStore + ?Sized,
{
    let mut stats = MergeStats::default();
    match value {
        RecordValue::Node(node) => {
            merge_node(graph, node, mapping);
            stats.nodes += 1;
        }
        RecordValue::Relationship(rel) => {
            merge_relationship(graph, rel, mapping)?;
            stats.relationships += 1;
        }
        RecordValue::Path(path) => stats.absorb(merge_path(graph, path, mapping)?),
        RecordValue::Sequence(items) => {
            for item in items {
                stats.absorb(merge_value(graph, item, mapping)?);
            }
        }
        RecordValue::Mapping(map) => {
            for item in map.into_values() {
                stats.absorb(merge_value(graph, item, mapping)?);
            }
        }
        RecordValue::Scalar(_) => {}
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Properties, PropertyGraph};
    use crate::mapping::record::PathSegment;
    use std::collections::BTreeMap;

    fn node(id: &str, labels: &[&str]) -> Node {
        Node {
            identity: id.to_string(),
            labels: labels.iter().map(|l| l.to_string()).collect(),
            properties: [("name".to_string(), CypherValue::from(format!("node {}", id)))]
                .into_iter()
                .collect(),
        }
    }

    fn rel(id: &str, start: &str, end: &str) -> Relationship {
        Relationship {
            identity: id.to_string(),
            rel_type: "KNOWS".to_string(),
            start: start.to_string(),
            end: end.to_string(),
            properties: Properties::new(),
        }
    }

    #[test]
    fn test_merge_node_sets_metadata() {
        let mut graph = PropertyGraph::new();
        merge_node(&mut graph, node("1", &["Person"]), &AttributeMapping::default());

        let attrs = graph.node("1").unwrap();
        assert_eq!(attrs["@id"], CypherValue::from("1"));
        assert_eq!(attrs["@labels"], CypherValue::from(vec!["Person"]));
        assert_eq!(attrs["name"], CypherValue::from("node 1"));
    }

    #[test]
    fn test_merge_node_labels_replaced_not_unioned() {
        let mut graph = PropertyGraph::new();
        let mapping = AttributeMapping::default();
        merge_node(&mut graph, node("1", &["Person", "Actor"]), &mapping);
        merge_node(&mut graph, node("1", &["Person"]), &mapping);

        assert_eq!(graph.order(), 1);
        assert_eq!(graph.node("1").unwrap()["@labels"], CypherValue::from(vec!["Person"]));
    }

    #[test]
    fn test_metadata_wins_over_properties() {
        let mut graph = PropertyGraph::new();
        let mut n = node("1", &[]);
        n.properties.insert("@id".to_string(), CypherValue::from("spoofed"));
        merge_node(&mut graph, n, &AttributeMapping::default());
        assert_eq!(graph.node("1").unwrap()["@id"], CypherValue::from("1"));
    }

    #[test]
    fn test_merge_relationship_custom_mapping() {
        let mut graph = PropertyGraph::new();
        let mapping = AttributeMapping::new("_id", "_labels", "_type");
        merge_relationship(&mut graph, rel("9", "1", "2"), &mapping).unwrap();

        let attrs = graph.edge("9").unwrap();
        assert_eq!(attrs["_id"], CypherValue::from("9"));
        assert_eq!(attrs["_type"], CypherValue::from("KNOWS"));
        assert!(!attrs.contains_key("@type"));
        assert_eq!(graph.edge_endpoints("9"), Some(("1", "2")));
    }

    #[test]
    fn test_merge_path_counts() {
        let mut graph = PropertyGraph::new();
        let path = Path {
            start: node("1", &["A"]),
            end: node("3", &["A"]),
            segments: vec![
                PathSegment {
                    start: node("1", &["A"]),
                    relationship: rel("r1", "1", "2"),
                    end: node("2", &["A"]),
                },
                PathSegment {
                    start: node("2", &["A"]),
                    relationship: rel("r2", "2", "3"),
                    end: node("3", &["A"]),
                },
            ],
        };

        let stats = merge_path(&mut graph, path, &AttributeMapping::default()).unwrap();
        assert_eq!(stats, MergeStats { nodes: 3, relationships: 2 });
        assert_eq!(graph.order(), 3);
        assert_eq!(graph.size(), 2);
    }

    #[test]
    fn test_merge_empty_path() {
        let mut graph = PropertyGraph::new();
        let path = Path {
            start: node("1", &["A"]),
            end: node("1", &["A"]),
            segments: vec![],
        };
        let stats = merge_path(&mut graph, path, &AttributeMapping::default()).unwrap();
        assert_eq!(stats.nodes, 1);
        assert_eq!(graph.order(), 1);
    }

    #[test]
    fn test_merge_value_recurses() {
        let mut graph = PropertyGraph::new();
        let mut map = BTreeMap::new();
        map.insert("who".to_string(), RecordValue::Node(node("2", &["B"])));
        map.insert("count".to_string(), RecordValue::Scalar(CypherValue::Int(1)));
        let value = RecordValue::Sequence(vec![
            RecordValue::Node(node("1", &["A"])),
            RecordValue::Mapping(map),
            RecordValue::Relationship(rel("r", "1", "2")),
        ]);

        let stats = merge_value(&mut graph, value, &AttributeMapping::default()).unwrap();
        assert_eq!(stats, MergeStats { nodes: 2, relationships: 1 });
        assert_eq!(graph.order(), 2);
        assert_eq!(graph.size(), 1);
    }

    #[test]
    fn test_merge_value_propagates_conflict() {
        let mut graph = PropertyGraph::new();
        let mapping = AttributeMapping::default();
        merge_relationship(&mut graph, rel("r", "1", "2"), &mapping).unwrap();

        let value = RecordValue::Sequence(vec![RecordValue::Relationship(rel("r", "2", "1"))]);
        assert!(merge_value(&mut graph, value, &mapping).is_err());
    }
}
