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

//! Builders for raw record values in the shape drivers produce.

use serde_json::{json, Value};

/// A raw node.
///
/// # Examples
///
/// ```
/// use cypher_graph_test::fixtures::builders::node_json;
/// use serde_json::json;
///
/// let node = node_json(1, &["Person"], json!({"name": "Neo"}));
/// assert_eq!(node["labels"], json!(["Person"]));
/// ```
pub fn node_json(identity: impl Into<Value>, labels: &[&str], properties: Value) -> Value {
    json!({
        "identity": identity.into(),
        "labels": labels,
        "properties": properties,
    })
}

/// A raw relationship from `start` to `end`.
pub fn relationship_json(
    identity: impl Into<Value>,
    rel_type: &str,
    start: impl Into<Value>,
    end: impl Into<Value>,
    properties: Value,
) -> Value {
    json!({
        "identity": identity.into(),
        "type": rel_type,
        "start": start.into(),
        "end": end.into(),
        "properties": properties,
    })
}

/// One path segment.
pub fn segment_json(start: Value, relationship: Value, end: Value) -> Value {
    json!({
        "start": start,
        "relationship": relationship,
        "end": end,
    })
}

/// A raw path walking `segments` in order.
///
/// # Panics
///
/// Panics if `segments` is empty.
pub fn path_json(segments: Vec<Value>) -> Value {
    let start = segments.first().expect("path needs a segment")["start"].clone();
    let end = segments.last().expect("path needs a segment")["end"].clone();
    json!({
        "start": start,
        "end": end,
        "segments": segments,
    })
}

/// An integer in split `{low, high}` form.
pub fn split_integer(value: i64) -> Value {
    json!({
        "low": value as i32,
        "high": (value >> 32) as i32,
    })
}

/// A chain of `len` hops `0 -[:NEXT]-> 1 -[:NEXT]-> ... -> len`.
///
/// Node `i` has identity `i` and label `Stop`; hop `i` has identity
/// `1000 + i`.
pub fn chain_path(len: usize) -> Value {
    let stop = |i: usize| node_json(i as i64, &["Stop"], json!({"index": i}));
    let segments = (0..len)
        .map(|i| {
            segment_json(
                stop(i),
                relationship_json(1000 + i as i64, "NEXT", i as i64, i as i64 + 1, json!({})),
                stop(i + 1),
            )
        })
        .collect();
    path_json(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_integer_halves() {
        assert_eq!(split_integer(5), json!({"low": 5, "high": 0}));
        assert_eq!(split_integer(1 << 32), json!({"low": 0, "high": 1}));
        assert_eq!(split_integer(-1), json!({"low": -1, "high": -1}));
    }

    #[test]
    fn test_chain_path_shape() {
        let path = chain_path(3);
        assert_eq!(path["segments"].as_array().unwrap().len(), 3);
        assert_eq!(path["start"]["identity"], json!(0));
        assert_eq!(path["end"]["identity"], json!(3));
    }
}
