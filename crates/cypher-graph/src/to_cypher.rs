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

//! Export a graph as a Cypher `CREATE` script.
//!
//! Every node becomes `CREATE (n_<key>:Label {props})` and every edge
//! becomes `CREATE (n_<source>)-[:TYPE {props}]->(n_<target>)`, nodes
//! first, each clause on its own line. The clauses form one query, so run
//! the script as a single statement against the target database.
//!
//! # Security Features
//!
//! - Variables, labels, relationship types and property keys are escaped
//!   with [`escape_identifier`], [`escape_label`] and
//!   [`escape_relationship_type`]
//! - String values are double-quoted with every special character escaped
//! - String sizes are bounded by [`ExportConfig::max_string_length`]

use std::collections::HashSet;
use std::io::Write;
use tracing::{debug, warn};

use crate::config::{AttributeMapping, ExportConfig, ObjectHandling};
use crate::cypher::{
    escape_identifier, escape_label, escape_relationship_type, quote_string,
    validate_string_length, CypherScript, CypherStatement, CypherValue,
};
use crate::error::{GraphError, Result};
use crate::graph::{EdgeEntry, GraphStore, NodeEntry, Properties};

/// Convert a graph to a Cypher script.
///
/// Convenience wrapper around [`export_to_cypher_statements`] that renders
/// the script into one string.
///
/// # Errors
///
/// Returns `GraphError::MissingEdgeType` for an edge without a type and
/// `GraphError::StringLengthExceeded` for oversized strings. No partial
/// output is returned.
///
/// # Examples
///
/// ```
/// use cypher_graph::{export_to_cypher, CypherValue, ExportConfig, GraphStore, Properties, PropertyGraph};
///
/// let mut graph = PropertyGraph::new();
/// let mut props = Properties::new();
/// props.insert("name".to_string(), CypherValue::from("Neo"));
/// props.insert("@labels".to_string(), CypherValue::from(vec!["Person"]));
/// graph.merge_node("1", props);
///
/// let cypher = export_to_cypher(&graph, &ExportConfig::default()).unwrap();
/// assert_eq!(cypher, "CREATE (n_1:Person {name: \"Neo\"})\n");
/// ```
pub fn export_to_cypher<G>(graph: &G, config: &ExportConfig) -> Result<String>
where
    G: GraphStore + ?Sized,
{
    Ok(export_to_cypher_statements(graph, config)?.render())
}

/// Convert a graph to structured Cypher statements.
///
/// Statements come in the graph's node iteration order followed by its edge
/// iteration order. Each statement records the key of the element it
/// recreates.
///
/// # Arguments
///
/// * `graph` - The graph to export
/// * `config` - Attribute mapping and literal formatting options
///
/// # Errors
///
/// Same as [`export_to_cypher`].
pub fn export_to_cypher_statements<G>(graph: &G, config: &ExportConfig) -> Result<CypherScript>
where
    G: GraphStore + ?Sized,
{
    let mut script = CypherScript::new();
    if config.include_comments {
        for line in header_comments(graph) {
            script.add_comment(line);
        }
    }
    for node in graph.node_entries() {
        script.add(node_statement(node, config)?);
    }
    for edge in graph.edge_entries() {
        script.add(edge_statement(edge, config)?);
    }
    debug!(statements = script.len(), "exported graph to cypher");
    Ok(script)
}

/// Write the Cypher script for a graph to `writer`, one clause at a time.
///
/// Every edge is checked for a type before anything is written. A
/// `StringLengthExceeded` error can still stop the export midway, leaving
/// the clauses before the offending element in `writer`.
///
/// # Errors
///
/// Same as [`export_to_cypher`], plus `GraphError::Io` from the writer.
pub fn export_to_cypher_stream<G, W>(graph: &G, config: &ExportConfig, writer: &mut W) -> Result<()>
where
    G: GraphStore + ?Sized,
    W: Write,
{
    for edge in graph.edge_entries() {
        edge_type(&edge, &config.mapping)?;
    }
    if config.include_comments {
        for line in header_comments(graph) {
            writeln!(writer, "// {}", line)?;
        }
    }
    for node in graph.node_entries() {
        writeln!(writer, "{}", node_statement(node, config)?.query)?;
    }
    for edge in graph.edge_entries() {
        writeln!(writer, "{}", edge_statement(edge, config)?.query)?;
    }
    writer.flush()?;
    Ok(())
}

fn header_comments<G>(graph: &G) -> [String; 2]
where
    G: GraphStore + ?Sized,
{
    [
        format!("Nodes: {}", graph.order()),
        format!("Relationships: {}", graph.size()),
    ]
}

/// Script-local variable bound to a node; distinct keys give distinct
/// variables.
fn node_variable(key: &str) -> String {
    escape_identifier(&format!("n_{}", key))
}

fn node_statement(node: NodeEntry<'_>, config: &ExportConfig) -> Result<CypherStatement> {
    let labels = label_clause(node.properties.get(&config.mapping.labels_key));
    let props = property_map(node.properties, config)?;
    let query = format!(
        "CREATE ({}{}{})",
        node_variable(node.key),
        labels,
        with_leading_space(props)
    );
    Ok(CypherStatement::create_node(query, node.key))
}

fn edge_statement(edge: EdgeEntry<'_>, config: &ExportConfig) -> Result<CypherStatement> {
    let rel_type = edge_type(&edge, &config.mapping)?;
    let props = property_map(edge.properties, config)?;
    let query = format!(
        "CREATE ({})-[{}{}]->({})",
        node_variable(edge.source),
        escape_relationship_type(&rel_type),
        with_leading_space(props),
        node_variable(edge.target)
    );
    Ok(CypherStatement::create_relationship(query, edge.key))
}

fn edge_type(edge: &EdgeEntry<'_>, mapping: &AttributeMapping) -> Result<String> {
    edge.properties
        .get(&mapping.type_key)
        .filter(|value| !value.is_falsy())
        .map(CypherValue::to_key_string)
        .ok_or_else(|| GraphError::MissingEdgeType {
            edge: edge.key.to_string(),
        })
}

/// `:A:B` from a label list or a single label string.
fn label_clause(labels: Option<&CypherValue>) -> String {
    match labels {
        Some(CypherValue::List(items)) => items
            .iter()
            .filter(|label| !label.is_falsy())
            .map(|label| escape_label(&label.to_key_string()))
            .collect(),
        Some(CypherValue::String(label)) if !label.is_empty() => escape_label(label),
        _ => String::new(),
    }
}

fn with_leading_space(props: String) -> String {
    if props.is_empty() {
        props
    } else {
        format!(" {}", props)
    }
}

/// `{key: literal, ...}` for the non-reserved properties, or "" when none.
///
/// A flattened map whose dotted keys would repeat a key already in the
/// literal (or any attribute name) is written as a JSON string instead.
fn property_map(properties: &Properties, config: &ExportConfig) -> Result<String> {
    let mut written: HashSet<String> = HashSet::new();
    let mut pairs = Vec::new();
    for (key, value) in properties {
        if config.mapping.is_reserved(key) {
            continue;
        }
        if let (CypherValue::Map(map), ObjectHandling::Flatten) = (value, config.object_handling) {
            let mut flat = Vec::new();
            flatten_into(key, map, &mut flat);
            let clashes = flat
                .iter()
                .any(|(path, _)| properties.contains_key(path) || written.contains(path));
            if !clashes {
                for (path, leaf) in flat {
                    pairs.push(property_pair(&path, leaf, config)?);
                    written.insert(path);
                }
                continue;
            }
            warn!(property = %key, "flattened keys clash with existing properties, writing map as JSON");
        }
        pairs.push(property_pair(key, value, config)?);
        written.insert(key.clone());
    }
    if pairs.is_empty() {
        Ok(String::new())
    } else {
        Ok(format!("{{{}}}", pairs.join(", ")))
    }
}

fn property_pair(key: &str, value: &CypherValue, config: &ExportConfig) -> Result<String> {
    Ok(format!("{}: {}", escape_identifier(key), literal(value, key, config)?))
}

/// Collect the `prefix.key` leaves of a nested map.
fn flatten_into<'a>(prefix: &str, map: &'a Properties, leaves: &mut Vec<(String, &'a CypherValue)>) {
    for (key, value) in map {
        let path = format!("{}.{}", prefix, key);
        match value {
            CypherValue::Map(inner) => flatten_into(&path, inner, leaves),
            _ => leaves.push((path, value)),
        }
    }
}

/// Cypher literal for a property value.
///
/// Maps only reach this point as JSON strings: either `JsonString` is
/// selected or the map sits inside a list, where Cypher properties cannot
/// hold maps.
fn literal(value: &CypherValue, property: &str, config: &ExportConfig) -> Result<String> {
    match value {
        CypherValue::String(s) => {
            validate_string_length(s, property, config)?;
            Ok(quote_string(s))
        }
        CypherValue::List(items) => {
            let inner = items
                .iter()
                .map(|item| literal(item, property, config))
                .collect::<Result<Vec<_>>>()?;
            Ok(format!("[{}]", inner.join(", ")))
        }
        CypherValue::Map(_) => {
            let json = serde_json::to_string(value)?;
            validate_string_length(&json, property, config)?;
            Ok(quote_string(&json))
        }
        _ => Ok(value.to_cypher_literal()),
    }
}
