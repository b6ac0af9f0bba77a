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

//! Build a graph from the results of an arbitrary Cypher query.
//!
//! Every column of every row is classified and merged: nodes become
//! vertices, relationships become edges, paths are flattened, and lists or
//! maps are searched recursively. Scalar columns are ignored.

use tracing::{debug, trace};

use crate::config::{AttributeMapping, ImportConfig};
use crate::error::Result;
use crate::graph::{GraphStore, PropertyGraph};
use crate::mapping::{merge_value, MergeStats, RecordValue};
use crate::session::{finish_session, Params, QueryExecutor, QuerySession, RowStream, SessionConfig};

/// Counters reported by the `*_into` importers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportStats {
    /// Rows consumed across all queries.
    pub rows: usize,
    /// Rows skipped for missing required fields.
    pub skipped_rows: usize,
    /// Node merges performed.
    pub nodes: usize,
    /// Edge merges performed.
    pub relationships: usize,
}

impl ImportStats {
    fn absorb(&mut self, merges: MergeStats) {
        self.nodes += merges.nodes;
        self.relationships += merges.relationships;
    }
}

/// Run `query` in a read session and build a new [`PropertyGraph`] from
/// every node, relationship and path in the results.
///
/// On failure the partially built graph is dropped and the error returned.
/// The session is closed in every case.
///
/// # Example
///
/// ```no_run
/// # async fn demo<E: cypher_graph::QueryExecutor>(driver: &E) -> cypher_graph::Result<()> {
/// use cypher_graph::{cypher_to_graph, GraphStore, ImportConfig, Params};
///
/// let graph = cypher_to_graph(
///     driver,
///     "MATCH (m:Movie)<-[r:ACTED_IN]-(p:Person) RETURN *",
///     &Params::new(),
///     &ImportConfig::default(),
/// )
/// .await?;
/// println!("{} nodes, {} edges", graph.order(), graph.size());
/// # Ok(())
/// # }
/// ```
pub async fn cypher_to_graph<E>(
    executor: &E,
    query: &str,
    params: &Params,
    config: &ImportConfig,
) -> Result<PropertyGraph>
where
    E: QueryExecutor + ?Sized,
{
    let mut graph = PropertyGraph::new();
    cypher_to_graph_into(executor, &mut graph, query, params, config).await?;
    Ok(graph)
}

/// Like [`cypher_to_graph`], merging into an existing graph.
///
/// On error `graph` keeps whatever was merged before the failure.
pub async fn cypher_to_graph_into<E, G>(
    executor: &E,
    graph: &mut G,
    query: &str,
    params: &Params,
    config: &ImportConfig,
) -> Result<ImportStats>
where
    E: QueryExecutor + ?Sized,
    G: GraphStore + ?Sized,
{
    debug!(query, database = ?config.database, "importing query results");
    let mut session = executor
        .session(SessionConfig::read(config.database.clone()))
        .await?;
    let outcome = scan_rows(&mut session, graph, query, params, &config.mapping).await;
    let stats = finish_session(&mut session, outcome).await?;
    debug!(
        rows = stats.rows,
        nodes = graph.order(),
        edges = graph.size(),
        "query import complete"
    );
    Ok(stats)
}

async fn scan_rows<S, G>(
    session: &mut S,
    graph: &mut G,
    query: &str,
    params: &Params,
    mapping: &AttributeMapping,
) -> Result<ImportStats>
where
    S: QuerySession,
    G: GraphStore + ?Sized,
{
    let mut rows = session.run(query, params).await?;
    let mut stats = ImportStats::default();
    while let Some(row) = rows.next().await? {
        stats.rows += 1;
        for value in row.values() {
            stats.absorb(merge_value(graph, RecordValue::decode(value), mapping)?);
        }
        trace!(row = stats.rows, columns = row.len(), "merged row");
    }
    Ok(stats)
}
