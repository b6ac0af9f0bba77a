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

//! Build a graph from a projection query pair.
//!
//! The node query returns one row per vertex with a required `id` column
//! and an optional `labels` column. The edge query returns one row per
//! edge with required `source` and `target` columns and optional `id` and
//! `type` columns. Every other column becomes a property.
//!
//! Both queries run on one read session, nodes first. Rows missing a
//! required column are handled per [`MissingFieldPolicy`].

use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, trace, warn};

use crate::config::{AttributeMapping, ImportConfig, MissingFieldPolicy};
use crate::cypher::CypherValue;
use crate::error::{GraphError, Result};
use crate::from_cypher::ImportStats;
use crate::graph::{GraphStore, Properties, PropertyGraph};
use crate::mapping::json_to_cypher;
use crate::session::{
    finish_session, Params, QueryExecutor, QuerySession, Row, RowStream, SessionConfig,
};

const NODE_FIELDS: &str = "an `id` field";
const EDGE_FIELDS: &str = "a `source` & `target` field";

/// A vertex built from one node-query row.
#[derive(Debug, Clone, PartialEq)]
struct ProjectedNode {
    key: String,
    properties: Properties,
}

/// An edge built from one edge-query row.
#[derive(Debug, Clone, PartialEq)]
struct ProjectedEdge {
    key: String,
    source: String,
    target: String,
    properties: Properties,
}

/// Run `node_query` then `edge_query` and build a new [`PropertyGraph`].
///
/// Node keys are the key-string of the `id` column; the `id` attribute
/// keeps the value as returned. Edges without an `id` (or with a falsy one)
/// are keyed `"<source>-><target>"`.
///
/// # Example
///
/// ```no_run
/// # async fn demo<E: cypher_graph::QueryExecutor>(driver: &E) -> cypher_graph::Result<()> {
/// use cypher_graph::{cypher_projection_to_graph, GraphStore, ImportConfig, Params};
///
/// let colleagues = cypher_projection_to_graph(
///     driver,
///     "MATCH (n:Person) RETURN id(n) AS id, labels(n) AS labels, n.name AS name",
///     "MATCH (a:Person)-->(:Movie)<--(b:Person) \
///      RETURN id(a) AS source, id(b) AS target, 'COLLEAGUE' AS type",
///     &Params::new(),
///     &ImportConfig::default(),
/// )
/// .await?;
/// assert!(colleagues.edge_entries().all(|e| e.key.contains("->")));
/// # Ok(())
/// # }
/// ```
pub async fn cypher_projection_to_graph<E>(
    executor: &E,
    node_query: &str,
    edge_query: &str,
    params: &Params,
    config: &ImportConfig,
) -> Result<PropertyGraph>
where
    E: QueryExecutor + ?Sized,
{
    let mut graph = PropertyGraph::new();
    cypher_projection_to_graph_into(executor, &mut graph, node_query, edge_query, params, config)
        .await?;
    Ok(graph)
}

/// Like [`cypher_projection_to_graph`], merging into an existing graph.
pub async fn cypher_projection_to_graph_into<E, G>(
    executor: &E,
    graph: &mut G,
    node_query: &str,
    edge_query: &str,
    params: &Params,
    config: &ImportConfig,
) -> Result<ImportStats>
where
    E: QueryExecutor + ?Sized,
    G: GraphStore + ?Sized,
{
    debug!(
        database = ?config.database,
        policy = ?config.missing_field_policy,
        "importing projection"
    );
    let mut session = executor
        .session(SessionConfig::read(config.database.clone()))
        .await?;
    let outcome = load_projection(&mut session, graph, node_query, edge_query, params, config).await;
    let stats = finish_session(&mut session, outcome).await?;
    debug!(
        rows = stats.rows,
        skipped = stats.skipped_rows,
        nodes = graph.order(),
        edges = graph.size(),
        "projection import complete"
    );
    Ok(stats)
}

async fn load_projection<S, G>(
    session: &mut S,
    graph: &mut G,
    node_query: &str,
    edge_query: &str,
    params: &Params,
    config: &ImportConfig,
) -> Result<ImportStats>
where
    S: QuerySession,
    G: GraphStore + ?Sized,
{
    let mut stats = ImportStats::default();
    let policy = config.missing_field_policy;

    let mut rows = session.run(node_query, params).await?;
    while let Some(row) = rows.next().await? {
        stats.rows += 1;
        match project_node(row, &config.mapping) {
            Ok(node) => {
                trace!(node = %node.key, "merging projected node");
                graph.merge_node(&node.key, node.properties);
                stats.nodes += 1;
            }
            Err(err) => skip_or_fail(err, policy, &mut stats)?,
        }
    }

    let mut rows = session.run(edge_query, params).await?;
    while let Some(row) = rows.next().await? {
        stats.rows += 1;
        match project_edge(row, &config.mapping) {
            Ok(edge) => {
                trace!(edge = %edge.key, "merging projected edge");
                graph.merge_edge_with_key(&edge.key, &edge.source, &edge.target, edge.properties)?;
                stats.relationships += 1;
            }
            Err(err) => skip_or_fail(err, policy, &mut stats)?,
        }
    }

    Ok(stats)
}

fn skip_or_fail(err: GraphError, policy: MissingFieldPolicy, stats: &mut ImportStats) -> Result<()> {
    match policy {
        MissingFieldPolicy::FailFast => Err(err),
        MissingFieldPolicy::SkipRow => {
            warn!(row = stats.rows, error = %err, "skipping malformed row");
            stats.skipped_rows += 1;
            Ok(())
        }
    }
}

/// Remove a required column; null counts as missing.
fn take_required(fields: &mut BTreeMap<String, Value>, column: &str) -> Option<CypherValue> {
    match fields.remove(column) {
        None | Some(Value::Null) => None,
        Some(value) => Some(json_to_cypher(&value)),
    }
}

/// Remove an optional column, mapping falsy values to `None`.
fn take_optional(fields: &mut BTreeMap<String, Value>, column: &str) -> Option<CypherValue> {
    fields
        .remove(column)
        .map(|value| json_to_cypher(&value))
        .filter(|value| !value.is_falsy())
}

fn into_properties(fields: BTreeMap<String, Value>) -> Properties {
    fields
        .into_iter()
        .map(|(key, value)| (key, json_to_cypher(&value)))
        .collect()
}

fn project_node(row: Row, mapping: &AttributeMapping) -> Result<ProjectedNode> {
    let mut fields = row.into_fields();
    let id = take_required(&mut fields, "id").ok_or(GraphError::MissingField {
        query: "Node",
        expected: NODE_FIELDS,
    })?;
    let labels = take_optional(&mut fields, "labels").unwrap_or(CypherValue::List(Vec::new()));

    let key = id.to_key_string();
    let mut properties = into_properties(fields);
    properties.insert(mapping.id_key.clone(), id);
    properties.insert(mapping.labels_key.clone(), labels);
    Ok(ProjectedNode { key, properties })
}

fn project_edge(row: Row, mapping: &AttributeMapping) -> Result<ProjectedEdge> {
    let mut fields = row.into_fields();
    let missing = || GraphError::MissingField {
        query: "Relationship",
        expected: EDGE_FIELDS,
    };
    let source = take_required(&mut fields, "source").ok_or_else(missing)?;
    let target = take_required(&mut fields, "target").ok_or_else(missing)?;
    let (source, target) = (source.to_key_string(), target.to_key_string());

    let id = take_optional(&mut fields, "id")
        .unwrap_or_else(|| CypherValue::String(format!("{}->{}", source, target)));
    let rel_type = take_optional(&mut fields, "type").unwrap_or(CypherValue::String(String::new()));

    let key = id.to_key_string();
    let mut properties = into_properties(fields);
    properties.insert(mapping.id_key.clone(), id);
    properties.insert(mapping.type_key.clone(), rel_type);
    Ok(ProjectedEdge {
        key,
        source,
        target,
        properties,
    })
}
