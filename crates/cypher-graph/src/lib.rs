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

//! Property-graph import and export for Cypher databases.
//!
//! This crate provides functionality to:
//! - Build an in-memory graph from the results of any Cypher query
//! - Build a graph from a projection query pair (a node table and an edge table)
//! - Export a graph as a Cypher `CREATE` script
//!
//! # Mapping Strategy
//!
//! ## Query results → graph
//!
//! | Cypher value | Graph representation |
//! |--------------|----------------------|
//! | Node | Vertex keyed by its identity |
//! | Node labels | List under the `@labels` attribute (configurable) |
//! | Relationship | Directed edge keyed by its identity |
//! | Relationship type | String under the `@type` attribute (configurable) |
//! | Identity | String under the `@id` attribute (configurable) |
//! | Path | Its nodes and relationships, shared endpoints merged once |
//! | List / map | Searched recursively |
//! | Scalar | Ignored |
//!
//! ## Graph → Cypher
//!
//! | Graph concept | Cypher |
//! |---------------|--------|
//! | Vertex `k` | `CREATE (n_k:Label {props})` |
//! | Edge `s -> t` | `CREATE (n_s)-[:TYPE {props}]->(n_t)` |
//! | Map property | `parent.child` keys, or a JSON string |
//!
//! # Query Execution
//!
//! Importers talk to the database through the [`QueryExecutor`],
//! [`QuerySession`] and [`RowStream`] traits; wrap your driver in them.
//! Rows are plain [`serde_json::Value`]s, with nodes, relationships and
//! paths in the shape drivers serialize them:
//!
//! ```json
//! {"identity": 1, "labels": ["Person"], "properties": {"name": "Neo"}}
//! {"identity": 7, "type": "ACTED_IN", "start": 1, "end": 2, "properties": {}}
//! {"start": {...}, "end": {...}, "segments": [{"start": {...}, "relationship": {...}, "end": {...}}]}
//! ```
//!
//! Identities may be numbers, strings, or `{"low": .., "high": ..}` split
//! 64-bit integers.
//!
//! # Example: Export to Cypher
//!
//! ```rust
//! use cypher_graph::{export_to_cypher, CypherValue, ExportConfig, GraphStore, Properties, PropertyGraph};
//!
//! let mut graph = PropertyGraph::new();
//! let mut neo = Properties::new();
//! neo.insert("@labels".to_string(), CypherValue::from(vec!["Person"]));
//! neo.insert("name".to_string(), CypherValue::from("Neo"));
//! graph.merge_node("1", neo);
//!
//! let mut matrix = Properties::new();
//! matrix.insert("@labels".to_string(), CypherValue::from(vec!["Movie"]));
//! graph.merge_node("2", matrix);
//!
//! let mut acted = Properties::new();
//! acted.insert("@type".to_string(), CypherValue::from("ACTED_IN"));
//! graph.merge_edge_with_key("10", "1", "2", acted)?;
//!
//! let cypher = export_to_cypher(&graph, &ExportConfig::default())?;
//! assert_eq!(
//!     cypher,
//!     "CREATE (n_1:Person {name: \"Neo\"})\nCREATE (n_2:Movie)\nCREATE (n_1)-[:ACTED_IN]->(n_2)\n"
//! );
//! # Ok::<(), cypher_graph::GraphError>(())
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod config;
pub mod cypher;
pub mod error;
pub mod from_cypher;
pub mod graph;
pub mod mapping;
pub mod projection;
pub mod session;
pub mod to_cypher;

// Re-export main types at crate root for convenience
pub use config::{
    AccessMode, AttributeMapping, ExportConfig, ExportConfigBuilder, ImportConfig,
    ImportConfigBuilder, MissingFieldPolicy, ObjectHandling, DEFAULT_ID_KEY, DEFAULT_LABELS_KEY,
    DEFAULT_MAX_STRING_LENGTH, DEFAULT_TYPE_KEY,
};
pub use cypher::{CypherScript, CypherStatement, CypherValue, StatementType};
pub use error::{GraphError, Result};
pub use from_cypher::{cypher_to_graph, cypher_to_graph_into, ImportStats};
pub use graph::{EdgeEntry, GraphStore, NodeEntry, Properties, PropertyGraph};
pub use mapping::RecordValue;
pub use projection::{cypher_projection_to_graph, cypher_projection_to_graph_into};
pub use session::{Params, QueryExecutor, QuerySession, Row, RowStream, SessionConfig};
pub use to_cypher::{export_to_cypher, export_to_cypher_statements, export_to_cypher_stream};
