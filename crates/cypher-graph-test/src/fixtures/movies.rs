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

//! A movie, its cast, and the collaborations between cast members.

use cypher_graph::Row;
use serde_json::json;

use super::builders::{node_json, path_json, relationship_json, segment_json};

/// Row-scan query returning the movie, each actor and each `ACTED_IN`.
pub const MATRIX_QUERY: &str =
    "MATCH (m:Movie {title: 'The Matrix'})<-[r:ACTED_IN]-(p:Person) RETURN m, r, p";

/// Row-scan query returning collected lists.
pub const MATRIX_COLLECT_QUERY: &str = "MATCH (m:Movie {title: 'The Matrix'})<-[r:ACTED_IN]-(p:Person) \
     RETURN m, collect(r) AS roles, collect(p) AS cast, count(p) AS total";

/// Row-scan query returning paths.
pub const MATRIX_PATH_QUERY: &str =
    "MATCH path = (:Movie {title: 'The Matrix'})<-[:ACTED_IN]-(:Person) RETURN path";

/// Projection node query.
pub const PERSON_NODE_QUERY: &str =
    "MATCH (p:Person) RETURN id(p) AS id, labels(p) AS labels, p.name AS name";

/// Projection edge query pairing actors of the same movie.
pub const COLLEAGUE_EDGE_QUERY: &str = "MATCH (a:Person)-[:ACTED_IN]->(:Movie)<-[:ACTED_IN]-(b:Person) \
     WHERE id(a) < id(b) RETURN id(a) AS source, id(b) AS target, 'COLLEAGUE' AS type";

/// Identity of The Matrix.
pub const MATRIX_ID: i64 = 100;

/// Cast of The Matrix: `(identity, name, born, role)`.
pub const CAST: [(i64, &str, i64, &str); 5] = [
    (1, "Keanu Reeves", 1964, "Neo"),
    (2, "Carrie-Anne Moss", 1967, "Trinity"),
    (3, "Laurence Fishburne", 1961, "Morpheus"),
    (4, "Hugo Weaving", 1960, "Agent Smith"),
    (5, "Emil Eifrem", 1978, "Emil"),
];

/// Identity of the `ACTED_IN` relationship of the given cast member.
pub fn acted_in_id(actor: i64) -> i64 {
    200 + actor
}

/// The Matrix as a raw node.
pub fn matrix_node() -> serde_json::Value {
    node_json(
        MATRIX_ID,
        &["Movie"],
        json!({"title": "The Matrix", "released": 1999, "tagline": "Welcome to the Real World"}),
    )
}

/// A cast member as a raw node.
pub fn actor_node(index: usize) -> serde_json::Value {
    let (id, name, born, _) = CAST[index];
    node_json(id, &["Person"], json!({"name": name, "born": born}))
}

/// A cast member's `ACTED_IN` relationship as a raw value.
pub fn acted_in(index: usize) -> serde_json::Value {
    let (id, _, _, role) = CAST[index];
    relationship_json(acted_in_id(id), "ACTED_IN", id, MATRIX_ID, json!({"roles": [role]}))
}

/// Rows for [`MATRIX_QUERY`]: one row per actor.
pub fn matrix_rows() -> Vec<Row> {
    (0..CAST.len())
        .map(|i| {
            Row::new()
                .with("m", matrix_node())
                .with("r", acted_in(i))
                .with("p", actor_node(i))
        })
        .collect()
}

/// Rows for [`MATRIX_COLLECT_QUERY`]: a single row of collected lists.
pub fn matrix_collect_rows() -> Vec<Row> {
    vec![Row::new()
        .with("m", matrix_node())
        .with("roles", (0..CAST.len()).map(acted_in).collect::<Vec<_>>())
        .with("cast", (0..CAST.len()).map(actor_node).collect::<Vec<_>>())
        .with("total", CAST.len())]
}

/// Rows for [`MATRIX_PATH_QUERY`]: one single-hop path per actor.
///
/// The paths walk from the movie, so each hop runs against the
/// relationship direction.
pub fn matrix_path_rows() -> Vec<Row> {
    (0..CAST.len())
        .map(|i| {
            Row::new().with(
                "path",
                path_json(vec![segment_json(matrix_node(), acted_in(i), actor_node(i))]),
            )
        })
        .collect()
}

/// Rows for [`PERSON_NODE_QUERY`].
pub fn person_rows() -> Vec<Row> {
    CAST.iter()
        .map(|(id, name, _, _)| {
            Row::new()
                .with("id", *id)
                .with("labels", json!(["Person"]))
                .with("name", *name)
        })
        .collect()
}

/// Rows for [`COLLEAGUE_EDGE_QUERY`]: every unordered pair of cast members.
pub fn colleague_rows() -> Vec<Row> {
    let mut rows = Vec::new();
    for (i, (a, ..)) in CAST.iter().enumerate() {
        for (b, ..) in &CAST[i + 1..] {
            rows.push(
                Row::new()
                    .with("source", *a)
                    .with("target", *b)
                    .with("type", "COLLEAGUE"),
            );
        }
    }
    rows
}
