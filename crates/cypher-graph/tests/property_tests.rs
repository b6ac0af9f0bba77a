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

//! Property-based tests for decoding, merging and escaping.
//!
//! Test coverage:
//! - Path flattening counts
//! - Identity stored under the id attribute
//! - Split 64-bit identities
//! - String literal escaping
//! - Identifier quoting

use cypher_graph::{
    cypher::{escape_identifier, escape_label, escape_string, is_valid_identifier, quote_string},
    export_to_cypher,
    mapping::{identity_key, merge_value, RecordValue},
    AttributeMapping, CypherValue, ExportConfig, GraphStore, Properties, PropertyGraph,
};
use cypher_graph_test::fixtures::builders::{chain_path, node_json, split_integer};
use proptest::prelude::*;
use serde_json::json;

// ============================================================================
// Merge Properties
// ============================================================================

proptest! {
    /// A path of N hops merges N + 1 nodes and N relationships, sharing
    /// every interior node.
    #[test]
    fn prop_path_flattening(len in 1usize..24) {
        let mut graph = PropertyGraph::new();
        let stats = merge_value(
            &mut graph,
            RecordValue::decode(&chain_path(len)),
            &AttributeMapping::default(),
        )
        .unwrap();

        prop_assert_eq!(stats.nodes, len + 1);
        prop_assert_eq!(stats.relationships, len);
        prop_assert_eq!(graph.order(), len + 1);
        prop_assert_eq!(graph.size(), len);
        for i in 0..len {
            let key = (1000 + i).to_string();
            let expected = (i.to_string(), (i + 1).to_string());
            prop_assert_eq!(
                graph.edge_endpoints(&key),
                Some((expected.0.as_str(), expected.1.as_str()))
            );
        }
    }

    /// Every merged node carries its own key under the id attribute.
    #[test]
    fn prop_node_identity_attribute(ids in prop::collection::vec(any::<i64>(), 1..16)) {
        let mut graph = PropertyGraph::new();
        let raw = json!(ids.iter().map(|id| node_json(*id, &["N"], json!({}))).collect::<Vec<_>>());
        merge_value(&mut graph, RecordValue::decode(&raw), &AttributeMapping::default()).unwrap();

        for node in graph.node_entries() {
            prop_assert_eq!(&node.properties["@id"], &CypherValue::from(node.key));
        }
    }

    /// Merging the same record twice leaves the graph unchanged.
    #[test]
    fn prop_merge_idempotent(len in 1usize..12) {
        let path = RecordValue::decode(&chain_path(len));
        let mut graph = PropertyGraph::new();
        merge_value(&mut graph, path.clone(), &AttributeMapping::default()).unwrap();
        let before = export_to_cypher(&graph, &ExportConfig::default()).unwrap();
        merge_value(&mut graph, path, &AttributeMapping::default()).unwrap();

        prop_assert_eq!(export_to_cypher(&graph, &ExportConfig::default()).unwrap(), before);
    }

    /// Split `{low, high}` identities decode to the integer they encode.
    #[test]
    fn prop_split_integer_identity(value in any::<i64>()) {
        prop_assert_eq!(identity_key(&split_integer(value)), Some(value.to_string()));
    }
}

// ============================================================================
// Escaping Properties
// ============================================================================

proptest! {
    /// Quoted strings are double-quoted and contain no bare quote or newline.
    #[test]
    fn prop_quote_string_is_closed(s in ".*") {
        let quoted = quote_string(&s);
        prop_assert!(quoted.starts_with('"'));
        prop_assert!(quoted.ends_with('"'));
        prop_assert!(!quoted.contains('\n'));

        let inner = &quoted[1..quoted.len() - 1];
        let mut escaped = false;
        for c in inner.chars() {
            if !escaped {
                prop_assert!(c != '"', "bare quote in {}", quoted);
            }
            escaped = !escaped && c == '\\';
        }
        prop_assert!(!escaped, "dangling backslash in {}", quoted);
    }

    /// Strings without special characters pass through unchanged.
    #[test]
    fn prop_escape_safe_string_unchanged(s in "[a-zA-Z0-9 _.,-]*") {
        let escaped = escape_string(&s);
        prop_assert_eq!(escaped.as_ref(), s.as_str());
    }

    /// Plain identifiers are left alone unless they are keywords.
    #[test]
    fn prop_plain_identifier_unquoted(s in "x_[a-zA-Z0-9_]{0,12}") {
        prop_assert!(is_valid_identifier(&s));
        prop_assert_eq!(escape_identifier(&s), s);
    }

    /// Escaped names are either plain identifiers or fully backtick-quoted.
    #[test]
    fn prop_escape_identifier_quoted(s in ".+") {
        let escaped = escape_identifier(&s);
        if !is_valid_identifier(&escaped) {
            prop_assert!(escaped.starts_with('`'));
            prop_assert!(escaped.ends_with('`'));
            let inner = &escaped[1..escaped.len() - 1];
            prop_assert!(!inner.replace("``", "").contains('`'));
        }
    }

    /// Labels always carry their leading colon.
    #[test]
    fn prop_label_prefix(s in "[a-zA-Z][a-zA-Z0-9 -]{0,10}") {
        prop_assert!(escape_label(&s).starts_with(':'));
    }

    /// Any string property exports as a single line.
    #[test]
    fn prop_exported_string_single_line(s in ".*") {
        let mut graph = PropertyGraph::new();
        let mut props = Properties::new();
        props.insert("text".to_string(), CypherValue::from(s));
        graph.merge_node("1", props);

        let cypher = export_to_cypher(&graph, &ExportConfig::default()).unwrap();
        prop_assert_eq!(cypher.lines().count(), 1);
    }
}
