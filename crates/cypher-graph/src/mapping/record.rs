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

//! Structural decoding of raw record values.
//!
//! Drivers hand back record values as loosely shaped data. This module
//! decodes them once, at the boundary, into the closed [`RecordValue`]
//! variant. Shapes are recognized by field presence, tried in order:
//!
//! 1. Node: `identity` and `labels`
//! 2. Relationship: `identity`, `type`, `start` and `end`
//! 3. Path: `start`, `end` and `segments`
//! 4. Sequence: any array
//! 5. Mapping: any other object
//! 6. Scalar: everything else
//!
//! An object that has a shape's fields but unusable contents (labels that
//! are not strings, an identity that cannot be rendered as a key) fails
//! that rule and falls through to the next one.

use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;

use crate::cypher::CypherValue;
use crate::graph::Properties;

/// A node returned by a query.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Database identity, rendered as a key.
    pub identity: String,
    /// Labels in database order.
    pub labels: Vec<String>,
    /// Node properties.
    pub properties: Properties,
}

/// A relationship returned by a query.
#[derive(Debug, Clone, PartialEq)]
pub struct Relationship {
    /// Database identity, rendered as a key.
    pub identity: String,
    /// Relationship type.
    pub rel_type: String,
    /// Identity of the start node.
    pub start: String,
    /// Identity of the end node.
    pub end: String,
    /// Relationship properties.
    pub properties: Properties,
}

/// One hop of a path.
#[derive(Debug, Clone, PartialEq)]
pub struct PathSegment {
    /// Node the hop starts from.
    pub start: Node,
    /// The relationship traversed.
    pub relationship: Relationship,
    /// Node the hop ends at.
    pub end: Node,
}

/// A traversal result; consecutive segments share their boundary node.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    /// First node of the path.
    pub start: Node,
    /// Last node of the path.
    pub end: Node,
    /// Hops in traversal order.
    pub segments: Vec<PathSegment>,
}

/// A decoded record value.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    /// A node.
    Node(Node),
    /// A relationship.
    Relationship(Relationship),
    /// A path.
    Path(Path),
    /// An ordered collection of values.
    Sequence(Vec<RecordValue>),
    /// A keyed collection of values.
    Mapping(BTreeMap<String, RecordValue>),
    /// Anything without graph structure.
    Scalar(CypherValue),
}

impl RecordValue {
    /// Decode a raw value.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cypher_graph::mapping::RecordValue;
    /// let raw = serde_json::json!({
    ///     "identity": 1,
    ///     "labels": ["Person"],
    ///     "properties": {"name": "Neo"}
    /// });
    /// match RecordValue::decode(&raw) {
    ///     RecordValue::Node(node) => assert_eq!(node.identity, "1"),
    ///     other => panic!("not a node: {:?}", other),
    /// }
    /// ```
    pub fn decode(value: &Value) -> RecordValue {
        match value {
            Value::Array(items) => RecordValue::Sequence(items.iter().map(Self::decode).collect()),
            Value::Object(map) => {
                if let Some(node) = decode_node(map) {
                    RecordValue::Node(node)
                } else if let Some(rel) = decode_relationship(map) {
                    RecordValue::Relationship(rel)
                } else if let Some(path) = decode_path(map) {
                    RecordValue::Path(path)
                } else {
                    RecordValue::Mapping(
                        map.iter()
                            .map(|(k, v)| (k.clone(), Self::decode(v)))
                            .collect(),
                    )
                }
            }
            scalar => RecordValue::Scalar(json_to_cypher(scalar)),
        }
    }

    /// Whether the value is, or contains, any node or relationship.
    pub fn has_graph_elements(&self) -> bool {
        match self {
            RecordValue::Node(_) | RecordValue::Relationship(_) | RecordValue::Path(_) => true,
            RecordValue::Sequence(items) => items.iter().any(Self::has_graph_elements),
            RecordValue::Mapping(map) => map.values().any(Self::has_graph_elements),
            RecordValue::Scalar(_) => false,
        }
    }
}

/// Render an identity as a graph key.
///
/// Accepts integers, strings (element ids) and split 64-bit integers of
/// the form `{"low": i32, "high": i32}`. Integral floats key the same as
/// the matching integer, so `1.0` and `1` name one element.
pub fn identity_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(number_key(n)),
        Value::Object(map) => split_integer(map).map(|i| i.to_string()),
        _ => None,
    }
}

fn number_key(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        i.to_string()
    } else if let Some(u) = n.as_u64() {
        u.to_string()
    } else {
        n.as_f64().map_or_else(|| n.to_string(), |f| f.to_string())
    }
}

/// Convert a raw value to a property value.
///
/// Split 64-bit integer objects are joined back into `Int`.
pub fn json_to_cypher(value: &Value) -> CypherValue {
    match value {
        Value::Null => CypherValue::Null,
        Value::Bool(b) => CypherValue::Bool(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => CypherValue::Int(i),
            None => CypherValue::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(s) => CypherValue::String(s.clone()),
        Value::Array(items) => CypherValue::List(items.iter().map(json_to_cypher).collect()),
        Value::Object(map) => match split_integer(map) {
            Some(i) => CypherValue::Int(i),
            None => CypherValue::Map(
                map.iter()
                    .map(|(k, v)| (k.clone(), json_to_cypher(v)))
                    .collect(),
            ),
        },
    }
}

/// Convert a raw property object; a missing or null object is empty.
fn decode_properties(value: Option<&Value>) -> Option<Properties> {
    match value {
        None | Some(Value::Null) => Some(Properties::new()),
        Some(Value::Object(map)) => Some(
            map.iter()
                .map(|(k, v)| (k.clone(), json_to_cypher(v)))
                .collect(),
        ),
        Some(_) => None,
    }
}

fn split_integer(map: &Map<String, Value>) -> Option<i64> {
    if map.len() != 2 {
        return None;
    }
    let low = map.get("low")?.as_i64()?;
    let high = map.get("high")?.as_i64()?;
    let word = i64::from(i32::MIN)..=i64::from(i32::MAX);
    if !word.contains(&low) || !word.contains(&high) {
        return None;
    }
    Some((high << 32) | (low & 0xFFFF_FFFF))
}

fn decode_node(map: &Map<String, Value>) -> Option<Node> {
    let identity = identity_key(map.get("identity")?)?;
    let labels = map
        .get("labels")?
        .as_array()?
        .iter()
        .map(|label| label.as_str().map(str::to_string))
        .collect::<Option<Vec<_>>>()?;
    let properties = decode_properties(map.get("properties"))?;

    Some(Node {
        identity,
        labels,
        properties,
    })
}

fn decode_relationship(map: &Map<String, Value>) -> Option<Relationship> {
    let identity = identity_key(map.get("identity")?)?;
    let rel_type = map.get("type")?.as_str()?.to_string();
    let start = identity_key(map.get("start")?)?;
    let end = identity_key(map.get("end")?)?;
    let properties = decode_properties(map.get("properties"))?;

    Some(Relationship {
        identity,
        rel_type,
        start,
        end,
        properties,
    })
}

fn decode_path(map: &Map<String, Value>) -> Option<Path> {
    let start = decode_node(map.get("start")?.as_object()?)?;
    let end = decode_node(map.get("end")?.as_object()?)?;
    let segments = map
        .get("segments")?
        .as_array()?
        .iter()
        .map(|segment| {
            let segment = segment.as_object()?;
            Some(PathSegment {
                start: decode_node(segment.get("start")?.as_object()?)?,
                relationship: decode_relationship(segment.get("relationship")?.as_object()?)?,
                end: decode_node(segment.get("end")?.as_object()?)?,
            })
        })
        .collect::<Option<Vec<_>>>()?;

    Some(Path {
        start,
        end,
        segments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(id: i64, label: &str) -> Value {
        json!({"identity": id, "labels": [label], "properties": {"name": format!("n{}", id)}})
    }

    fn rel(id: i64, start: i64, end: i64) -> Value {
        json!({"identity": id, "start": start, "end": end, "type": "ACTED_IN", "properties": {}})
    }

    #[test]
    fn test_decode_node() {
        let decoded = RecordValue::decode(&node(4, "Person"));
        let expected = Node {
            identity: "4".to_string(),
            labels: vec!["Person".to_string()],
            properties: [("name".to_string(), CypherValue::from("n4"))]
                .into_iter()
                .collect(),
        };
        assert_eq!(decoded, RecordValue::Node(expected));
    }

    #[test]
    fn test_decode_node_without_properties() {
        let decoded = RecordValue::decode(&json!({"identity": "4:x:1", "labels": []}));
        match decoded {
            RecordValue::Node(n) => {
                assert_eq!(n.identity, "4:x:1");
                assert!(n.labels.is_empty());
                assert!(n.properties.is_empty());
            }
            other => panic!("Expected node, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_relationship() {
        match RecordValue::decode(&rel(10, 1, 2)) {
            RecordValue::Relationship(r) => {
                assert_eq!(r.identity, "10");
                assert_eq!(r.rel_type, "ACTED_IN");
                assert_eq!(r.start, "1");
                assert_eq!(r.end, "2");
            }
            other => panic!("Expected relationship, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_relationship_with_float_endpoints() {
        let raw = json!({
            "identity": 10.0,
            "type": "ACTED_IN",
            "start": 1.0,
            "end": 2,
            "properties": {}
        });
        match RecordValue::decode(&raw) {
            RecordValue::Relationship(r) => {
                assert_eq!(r.identity, "10");
                assert_eq!(r.start, "1");
                assert_eq!(r.end, "2");
            }
            other => panic!("Expected relationship, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_path() {
        let raw = json!({
            "start": node(1, "Movie"),
            "end": node(3, "Person"),
            "segments": [
                {"start": node(1, "Movie"), "relationship": rel(10, 2, 1), "end": node(2, "Person")},
                {"start": node(2, "Person"), "relationship": rel(11, 2, 3), "end": node(3, "Person")}
            ]
        });
        match RecordValue::decode(&raw) {
            RecordValue::Path(p) => {
                assert_eq!(p.start.identity, "1");
                assert_eq!(p.end.identity, "3");
                assert_eq!(p.segments.len(), 2);
                assert_eq!(p.segments[1].relationship.identity, "11");
            }
            other => panic!("Expected path, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_nested_collections() {
        let raw = json!([node(1, "A"), {"friend": node(2, "B"), "score": 3}, 7]);
        let decoded = RecordValue::decode(&raw);
        assert!(decoded.has_graph_elements());
        match decoded {
            RecordValue::Sequence(items) => {
                assert!(matches!(items[0], RecordValue::Node(_)));
                match &items[1] {
                    RecordValue::Mapping(map) => {
                        assert!(matches!(map["friend"], RecordValue::Node(_)));
                        assert_eq!(map["score"], RecordValue::Scalar(CypherValue::Int(3)));
                    }
                    other => panic!("Expected mapping, got {:?}", other),
                }
                assert_eq!(items[2], RecordValue::Scalar(CypherValue::Int(7)));
            }
            other => panic!("Expected sequence, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_node_falls_through() {
        // Labels that are not strings do not make a node.
        let raw = json!({"identity": 1, "labels": [1, 2]});
        assert!(matches!(RecordValue::decode(&raw), RecordValue::Mapping(_)));

        // Missing `labels` but relationship fields present: a relationship.
        let raw = json!({"identity": 1, "type": "T", "start": 1, "end": 2});
        assert!(matches!(
            RecordValue::decode(&raw),
            RecordValue::Relationship(_)
        ));
    }

    #[test]
    fn test_scalars_have_no_graph_elements() {
        for raw in [json!(null), json!(true), json!(1.5), json!("x"), json!({"a": [1, 2]})] {
            assert!(!RecordValue::decode(&raw).has_graph_elements());
        }
    }

    #[test]
    fn test_identity_key_forms() {
        assert_eq!(identity_key(&json!(42)), Some("42".to_string()));
        assert_eq!(identity_key(&json!("4:abc:0")), Some("4:abc:0".to_string()));
        assert_eq!(
            identity_key(&json!({"low": 5, "high": 0})),
            Some("5".to_string())
        );
        assert_eq!(
            identity_key(&json!({"low": 0, "high": 1})),
            Some("4294967296".to_string())
        );
        assert_eq!(
            identity_key(&json!({"low": -1, "high": 0})),
            Some("4294967295".to_string())
        );
        assert_eq!(identity_key(&json!(1.0)), Some("1".to_string()));
        assert_eq!(identity_key(&json!(-3.0)), Some("-3".to_string()));
        assert_eq!(identity_key(&json!(1.5)), Some("1.5".to_string()));
        assert_eq!(identity_key(&json!(u64::MAX)), Some(u64::MAX.to_string()));
        assert_eq!(identity_key(&json!(null)), None);
        assert_eq!(identity_key(&json!([1])), None);
    }

    #[test]
    fn test_json_to_cypher() {
        assert_eq!(json_to_cypher(&json!(3)), CypherValue::Int(3));
        assert_eq!(json_to_cypher(&json!(2.5)), CypherValue::Float(2.5));
        assert_eq!(
            json_to_cypher(&json!({"low": 1999, "high": 0})),
            CypherValue::Int(1999)
        );
        assert_eq!(
            json_to_cypher(&json!(["Neo", 1])),
            CypherValue::List(vec![CypherValue::from("Neo"), CypherValue::Int(1)])
        );
        match json_to_cypher(&json!({"city": "Zion"})) {
            CypherValue::Map(m) => assert_eq!(m["city"], CypherValue::from("Zion")),
            other => panic!("Expected map, got {:?}", other),
        }
    }
}
