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

//! Labeled multigraph storage.
//!
//! The importers write through the [`GraphStore`] capability so callers can
//! plug in their own storage; [`PropertyGraph`] is the bundled in-memory
//! implementation: directed, parallel edges and self-loops allowed, and
//! iteration in insertion order.

use std::collections::{BTreeMap, HashMap};

use crate::cypher::CypherValue;
use crate::error::{GraphError, Result};

/// Attribute map of a node or edge.
pub type Properties = BTreeMap<String, CypherValue>;

/// A node as seen while iterating a graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeEntry<'a> {
    /// The node key.
    pub key: &'a str,
    /// The node attributes.
    pub properties: &'a Properties,
}

/// An edge as seen while iterating a graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeEntry<'a> {
    /// The edge key.
    pub key: &'a str,
    /// The edge attributes.
    pub properties: &'a Properties,
    /// Key of the source node.
    pub source: &'a str,
    /// Key of the target node.
    pub target: &'a str,
}

/// Storage capability required by the importers and the exporter.
pub trait GraphStore {
    /// Create the node, or overlay `properties` onto the existing one.
    fn merge_node(&mut self, key: &str, properties: Properties);

    /// Create the directed edge `source -> target`, or overlay `properties`
    /// onto the existing edge with the same key.
    ///
    /// Missing endpoints are created with no attributes. Re-merging a key
    /// with different endpoints fails with
    /// [`GraphError::EdgeEndpointConflict`].
    fn merge_edge_with_key(
        &mut self,
        key: &str,
        source: &str,
        target: &str,
        properties: Properties,
    ) -> Result<()>;

    /// Iterate all nodes.
    fn node_entries(&self) -> Box<dyn Iterator<Item = NodeEntry<'_>> + '_>;

    /// Iterate all edges.
    fn edge_entries(&self) -> Box<dyn Iterator<Item = EdgeEntry<'_>> + '_>;

    /// Number of nodes.
    fn order(&self) -> usize;

    /// Number of edges.
    fn size(&self) -> usize;
}

#[derive(Debug, Clone)]
struct NodeData {
    key: String,
    properties: Properties,
    outgoing: Vec<usize>,
    incoming: Vec<usize>,
}

#[derive(Debug, Clone)]
struct EdgeData {
    key: String,
    source: usize,
    target: usize,
    properties: Properties,
}

/// In-memory directed multigraph keyed by strings.
///
/// # Examples
///
/// ```
/// # use cypher_graph::{GraphStore, PropertyGraph, Properties};
/// let mut graph = PropertyGraph::new();
/// graph.merge_node("1", Properties::new());
/// graph.merge_edge_with_key("r1", "1", "2", Properties::new()).unwrap();
/// graph.merge_edge_with_key("r2", "1", "2", Properties::new()).unwrap();
/// assert_eq!(graph.order(), 2);
/// assert_eq!(graph.size(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PropertyGraph {
    nodes: Vec<NodeData>,
    node_index: HashMap<String, usize>,
    edges: Vec<EdgeData>,
    edge_index: HashMap<String, usize>,
}

impl PropertyGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether a node exists.
    pub fn has_node(&self, key: &str) -> bool {
        self.node_index.contains_key(key)
    }

    /// Check whether an edge exists.
    pub fn has_edge(&self, key: &str) -> bool {
        self.edge_index.contains_key(key)
    }

    /// Attributes of a node.
    pub fn node(&self, key: &str) -> Option<&Properties> {
        self.node_index.get(key).map(|&i| &self.nodes[i].properties)
    }

    /// Mutable attributes of a node.
    pub fn node_mut(&mut self, key: &str) -> Option<&mut Properties> {
        let i = *self.node_index.get(key)?;
        Some(&mut self.nodes[i].properties)
    }

    /// Attributes of an edge.
    pub fn edge(&self, key: &str) -> Option<&Properties> {
        self.edge_index.get(key).map(|&i| &self.edges[i].properties)
    }

    /// Mutable attributes of an edge.
    pub fn edge_mut(&mut self, key: &str) -> Option<&mut Properties> {
        let i = *self.edge_index.get(key)?;
        Some(&mut self.edges[i].properties)
    }

    /// Source and target node keys of an edge.
    pub fn edge_endpoints(&self, key: &str) -> Option<(&str, &str)> {
        self.edge_index.get(key).map(|&i| {
            let edge = &self.edges[i];
            (
                self.nodes[edge.source].key.as_str(),
                self.nodes[edge.target].key.as_str(),
            )
        })
    }

    /// Edges leaving a node, in insertion order.
    pub fn out_edges(&self, key: &str) -> Vec<EdgeEntry<'_>> {
        self.node_index
            .get(key)
            .map(|&i| self.nodes[i].outgoing.iter().map(|&e| self.entry(e)).collect())
            .unwrap_or_default()
    }

    /// Edges entering a node, in insertion order.
    pub fn in_edges(&self, key: &str) -> Vec<EdgeEntry<'_>> {
        self.node_index
            .get(key)
            .map(|&i| self.nodes[i].incoming.iter().map(|&e| self.entry(e)).collect())
            .unwrap_or_default()
    }

    fn entry(&self, index: usize) -> EdgeEntry<'_> {
        let edge = &self.edges[index];
        EdgeEntry {
            key: &edge.key,
            properties: &edge.properties,
            source: &self.nodes[edge.source].key,
            target: &self.nodes[edge.target].key,
        }
    }

    fn ensure_node(&mut self, key: &str) -> usize {
        if let Some(&i) = self.node_index.get(key) {
            return i;
        }
        let i = self.nodes.len();
        self.nodes.push(NodeData {
            key: key.to_string(),
            properties: Properties::new(),
            outgoing: Vec::new(),
            incoming: Vec::new(),
        });
        self.node_index.insert(key.to_string(), i);
        i
    }
}

impl GraphStore for PropertyGraph {
    fn merge_node(&mut self, key: &str, properties: Properties) {
        let i = self.ensure_node(key);
        self.nodes[i].properties.extend(properties);
    }

    fn merge_edge_with_key(
        &mut self,
        key: &str,
        source: &str,
        target: &str,
        properties: Properties,
    ) -> Result<()> {
        if let Some(&i) = self.edge_index.get(key) {
            let edge = &self.edges[i];
            let (current_source, current_target) =
                (&self.nodes[edge.source].key, &self.nodes[edge.target].key);
            if current_source != source || current_target != target {
                return Err(GraphError::EdgeEndpointConflict {
                    edge: key.to_string(),
                    expected: format!("{}->{}", current_source, current_target),
                    found: format!("{}->{}", source, target),
                });
            }
            self.edges[i].properties.extend(properties);
            return Ok(());
        }

        let s = self.ensure_node(source);
        let t = self.ensure_node(target);
        let i = self.edges.len();
        self.edges.push(EdgeData {
            key: key.to_string(),
            source: s,
            target: t,
            properties,
        });
        self.edge_index.insert(key.to_string(), i);
        self.nodes[s].outgoing.push(i);
        self.nodes[t].incoming.push(i);
        Ok(())
    }

    fn node_entries(&self) -> Box<dyn Iterator<Item = NodeEntry<'_>> + '_> {
        Box::new(self.nodes.iter().map(|node| NodeEntry {
            key: &node.key,
            properties: &node.properties,
        }))
    }

    fn edge_entries(&self) -> Box<dyn Iterator<Item = EdgeEntry<'_>> + '_> {
        Box::new((0..self.edges.len()).map(move |i| self.entry(i)))
    }

    fn order(&self) -> usize {
        self.nodes.len()
    }

    fn size(&self) -> usize {
        self.edges.len()
    }
}
