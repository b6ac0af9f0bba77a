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

//! Cypher values, statements and scripts.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::escape::{escape_identifier, quote_string};

/// A property or parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CypherValue {
    /// Null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating-point value.
    Float(f64),
    /// String value.
    String(String),
    /// List value.
    List(Vec<CypherValue>),
    /// Map/object value.
    Map(BTreeMap<String, CypherValue>),
}

impl From<bool> for CypherValue {
    fn from(v: bool) -> Self {
        CypherValue::Bool(v)
    }
}

impl From<i64> for CypherValue {
    fn from(v: i64) -> Self {
        CypherValue::Int(v)
    }
}

impl From<i32> for CypherValue {
    fn from(v: i32) -> Self {
        CypherValue::Int(v as i64)
    }
}

impl From<f64> for CypherValue {
    fn from(v: f64) -> Self {
        CypherValue::Float(v)
    }
}

impl From<String> for CypherValue {
    fn from(v: String) -> Self {
        CypherValue::String(v)
    }
}

impl From<&str> for CypherValue {
    fn from(v: &str) -> Self {
        CypherValue::String(v.to_string())
    }
}

impl<T: Into<CypherValue>> From<Vec<T>> for CypherValue {
    fn from(v: Vec<T>) -> Self {
        CypherValue::List(v.into_iter().map(|x| x.into()).collect())
    }
}

impl<T: Into<CypherValue>> From<Option<T>> for CypherValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(x) => x.into(),
            None => CypherValue::Null,
        }
    }
}

impl CypherValue {
    /// Convert to Cypher literal syntax.
    ///
    /// Strings are double-quoted with every special character escaped.
    pub fn to_cypher_literal(&self) -> String {
        match self {
            CypherValue::Null => "null".to_string(),
            CypherValue::Bool(b) => if *b { "true" } else { "false" }.to_string(),
            CypherValue::Int(i) => i.to_string(),
            CypherValue::Float(f) => float_literal(*f),
            CypherValue::String(s) => quote_string(s),
            CypherValue::List(items) => {
                let inner: Vec<String> = items.iter().map(|v| v.to_cypher_literal()).collect();
                format!("[{}]", inner.join(", "))
            }
            CypherValue::Map(map) => {
                let pairs: Vec<String> = map
                    .iter()
                    .map(|(k, v)| format!("{}: {}", escape_identifier(k), v.to_cypher_literal()))
                    .collect();
                format!("{{{}}}", pairs.join(", "))
            }
        }
    }

    /// Render the value as a graph key.
    ///
    /// Strings are used verbatim and numbers print in decimal, so the key
    /// of id `42` is `"42"` whether it arrived as a string or an integer.
    pub fn to_key_string(&self) -> String {
        match self {
            CypherValue::Null => "null".to_string(),
            CypherValue::Bool(b) => b.to_string(),
            CypherValue::Int(i) => i.to_string(),
            CypherValue::Float(f) => f.to_string(),
            CypherValue::String(s) => s.clone(),
            CypherValue::List(_) | CypherValue::Map(_) => self.to_cypher_literal(),
        }
    }

    /// Whether the value counts as absent: null, `false`, zero, NaN or "".
    pub fn is_falsy(&self) -> bool {
        match self {
            CypherValue::Null => true,
            CypherValue::Bool(b) => !b,
            CypherValue::Int(i) => *i == 0,
            CypherValue::Float(f) => *f == 0.0 || f.is_nan(),
            CypherValue::String(s) => s.is_empty(),
            CypherValue::List(_) | CypherValue::Map(_) => false,
        }
    }

    /// Check if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, CypherValue::Null)
    }

    /// Try to get as a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CypherValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            CypherValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get as a float.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            CypherValue::Float(f) => Some(*f),
            CypherValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Try to get as a list.
    pub fn as_list(&self) -> Option<&[CypherValue]> {
        match self {
            CypherValue::List(items) => Some(items),
            _ => None,
        }
    }
}

fn float_literal(f: f64) -> String {
    if f.is_nan() {
        "0.0/0.0".to_string()
    } else if f.is_infinite() {
        if f > 0.0 {
            "1.0/0.0".to_string()
        } else {
            "-1.0/0.0".to_string()
        }
    } else {
        let s = f.to_string();
        if s.contains('.') || s.contains('e') || s.contains('E') {
            s
        } else {
            format!("{}.0", s)
        }
    }
}

/// The kind of clause a statement holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatementType {
    /// `CREATE` of a single node.
    CreateNode,
    /// `CREATE` of a single relationship between two node variables.
    CreateRelationship,
}

/// A single Cypher clause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CypherStatement {
    /// The Cypher text.
    pub query: String,
    /// Type of statement.
    pub statement_type: StatementType,
    /// Key of the graph element the statement recreates.
    pub element: String,
}

impl CypherStatement {
    /// Create a new Cypher statement.
    pub fn new(
        query: impl Into<String>,
        statement_type: StatementType,
        element: impl Into<String>,
    ) -> Self {
        Self {
            query: query.into(),
            statement_type,
            element: element.into(),
        }
    }

    /// Create a node creation statement.
    pub fn create_node(query: impl Into<String>, element: impl Into<String>) -> Self {
        Self::new(query, StatementType::CreateNode, element)
    }

    /// Create a relationship creation statement.
    pub fn create_relationship(query: impl Into<String>, element: impl Into<String>) -> Self {
        Self::new(query, StatementType::CreateRelationship, element)
    }
}

/// An ordered collection of clauses forming one Cypher query.
///
/// Clauses are rendered one per line without `;` separators: relationship
/// clauses refer to node variables bound by earlier node clauses, which only
/// works while everything stays in the same query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CypherScript {
    /// Comment lines written before the first clause.
    pub header: Vec<String>,
    /// The statements in this script.
    pub statements: Vec<CypherStatement>,
}

impl CypherScript {
    /// Create a new empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a statement to the script.
    pub fn add(&mut self, statement: CypherStatement) {
        self.statements.push(statement);
    }

    /// Add a header comment line.
    pub fn add_comment(&mut self, comment: impl Into<String>) {
        self.header.push(comment.into());
    }

    /// Get all statements of a specific type.
    pub fn statements_of_type(&self, statement_type: StatementType) -> Vec<&CypherStatement> {
        self.statements
            .iter()
            .filter(|s| s.statement_type == statement_type)
            .collect()
    }

    /// Render the script, each line terminated by a newline.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for comment in &self.header {
            out.push_str("// ");
            out.push_str(comment);
            out.push('\n');
        }
        for statement in &self.statements {
            out.push_str(&statement.query);
            out.push('\n');
        }
        out
    }

    /// Get the number of statements.
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    /// Check if the script is empty.
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

impl IntoIterator for CypherScript {
    type Item = CypherStatement;
    type IntoIter = std::vec::IntoIter<CypherStatement>;

    fn into_iter(self) -> Self::IntoIter {
        self.statements.into_iter()
    }
}

impl<'a> IntoIterator for &'a CypherScript {
    type Item = &'a CypherStatement;
    type IntoIter = std::slice::Iter<'a, CypherStatement>;

    fn into_iter(self) -> Self::IntoIter {
        self.statements.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cypher_value_literals() {
        assert_eq!(CypherValue::Null.to_cypher_literal(), "null");
        assert_eq!(CypherValue::Bool(true).to_cypher_literal(), "true");
        assert_eq!(CypherValue::Bool(false).to_cypher_literal(), "false");
        assert_eq!(CypherValue::Int(42).to_cypher_literal(), "42");
        assert_eq!(CypherValue::Int(-7).to_cypher_literal(), "-7");
        assert_eq!(CypherValue::Float(3.25).to_cypher_literal(), "3.25");
        assert_eq!(CypherValue::Float(3.0).to_cypher_literal(), "3.0");
        assert_eq!(
            CypherValue::String("Neo".to_string()).to_cypher_literal(),
            "\"Neo\""
        );
    }

    #[test]
    fn test_cypher_value_string_escaping() {
        assert_eq!(
            CypherValue::from(r#"the "One" said "hi""#).to_cypher_literal(),
            r#""the \"One\" said \"hi\"""#
        );
    }

    #[test]
    fn test_cypher_value_nested_list() {
        let list = CypherValue::List(vec![
            CypherValue::Int(1),
            CypherValue::from("two"),
            CypherValue::List(vec![CypherValue::Bool(true), CypherValue::Null]),
        ]);
        assert_eq!(list.to_cypher_literal(), "[1, \"two\", [true, null]]");
    }

    #[test]
    fn test_cypher_value_map() {
        let mut map = BTreeMap::new();
        map.insert("name".to_string(), CypherValue::from("Alice"));
        map.insert("born in".to_string(), CypherValue::Int(1967));
        let value = CypherValue::Map(map);
        assert_eq!(value.to_cypher_literal(), "{`born in`: 1967, name: \"Alice\"}");
    }

    #[test]
    fn test_cypher_value_float_edge_cases() {
        assert_eq!(CypherValue::Float(f64::NAN).to_cypher_literal(), "0.0/0.0");
        assert_eq!(CypherValue::Float(f64::INFINITY).to_cypher_literal(), "1.0/0.0");
        assert_eq!(
            CypherValue::Float(f64::NEG_INFINITY).to_cypher_literal(),
            "-1.0/0.0"
        );
    }

    #[test]
    fn test_key_string() {
        assert_eq!(CypherValue::Int(42).to_key_string(), "42");
        assert_eq!(CypherValue::from("4:abc:1").to_key_string(), "4:abc:1");
        assert_eq!(CypherValue::Float(1.5).to_key_string(), "1.5");
        assert_eq!(CypherValue::Bool(true).to_key_string(), "true");
    }

    #[test]
    fn test_is_falsy() {
        assert!(CypherValue::Null.is_falsy());
        assert!(CypherValue::Bool(false).is_falsy());
        assert!(CypherValue::Int(0).is_falsy());
        assert!(CypherValue::Float(0.0).is_falsy());
        assert!(CypherValue::from("").is_falsy());
        assert!(!CypherValue::Int(7).is_falsy());
        assert!(!CypherValue::from("x").is_falsy());
        assert!(!CypherValue::List(vec![]).is_falsy());
    }

    #[test]
    fn test_cypher_value_from_impls() {
        assert_eq!(CypherValue::from(true), CypherValue::Bool(true));
        assert_eq!(CypherValue::from(42i64), CypherValue::Int(42));
        assert_eq!(CypherValue::from(42i32), CypherValue::Int(42));
        assert_eq!(CypherValue::from(3.25f64), CypherValue::Float(3.25));
        assert_eq!(
            CypherValue::from(vec!["a", "b"]),
            CypherValue::List(vec![CypherValue::from("a"), CypherValue::from("b")])
        );
        assert_eq!(CypherValue::from(None::<i64>), CypherValue::Null);
    }

    #[test]
    fn test_cypher_value_accessors() {
        assert!(CypherValue::Null.is_null());
        assert_eq!(CypherValue::from("hi").as_str(), Some("hi"));
        assert_eq!(CypherValue::Int(42).as_str(), None);
        assert_eq!(CypherValue::Int(42).as_int(), Some(42));
        assert_eq!(CypherValue::Int(42).as_float(), Some(42.0));
        assert_eq!(
            CypherValue::List(vec![CypherValue::Int(1)]).as_list().map(|l| l.len()),
            Some(1)
        );
    }

    #[test]
    fn test_script_render() {
        let mut script = CypherScript::new();
        assert!(script.is_empty());
        script.add_comment("Nodes: 1");
        script.add(CypherStatement::create_node("CREATE (n_1:Person)", "1"));
        script.add(CypherStatement::create_relationship(
            "CREATE (n_1)-[:KNOWS]->(n_1)",
            "9",
        ));

        assert_eq!(script.len(), 2);
        assert_eq!(
            script.render(),
            "// Nodes: 1\nCREATE (n_1:Person)\nCREATE (n_1)-[:KNOWS]->(n_1)\n"
        );
        assert!(!script.render().contains(';'));
    }

    #[test]
    fn test_script_statements_of_type() {
        let mut script = CypherScript::new();
        script.add(CypherStatement::create_node("N1", "1"));
        script.add(CypherStatement::create_relationship("R1", "r"));
        script.add(CypherStatement::create_node("N2", "2"));

        let nodes = script.statements_of_type(StatementType::CreateNode);
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[1].element, "2");
    }
}
