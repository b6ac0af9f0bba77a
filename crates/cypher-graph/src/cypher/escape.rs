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

//! Cypher string escaping and identifier quoting.
//!
//! Everything the exporter writes into a script passes through this module.
//! String literals are fully escaped. Variables and property keys are kept
//! verbatim and backtick-quoted whenever they are not plain identifiers, so
//! distinct names stay distinct. Labels and relationship types are also
//! NFC-normalized and stripped of invisible or control code points.

use crate::config::ExportConfig;
use crate::error::{GraphError, Result};
use std::borrow::Cow;
use std::fmt::Write;
use unicode_normalization::UnicodeNormalization;

/// Validate string length against the export limit.
///
/// # Examples
///
/// ```
/// # use cypher_graph::cypher::validate_string_length;
/// # use cypher_graph::ExportConfig;
/// let config = ExportConfig::default().with_max_string_length(1000);
/// assert!(validate_string_length("test", "name", &config).is_ok());
///
/// let huge_string = "x".repeat(10_000);
/// assert!(validate_string_length(&huge_string, "bio", &config).is_err());
/// ```
pub fn validate_string_length(s: &str, property: &str, config: &ExportConfig) -> Result<()> {
    if let Some(max_length) = config.max_string_length {
        let length = s.len();
        if length > max_length {
            return Err(GraphError::StringLengthExceeded {
                length,
                max_length,
                property: property.to_string(),
            });
        }
    }
    Ok(())
}

#[inline]
fn needs_escaping(s: &str) -> bool {
    s.chars()
        .any(|ch| matches!(ch, '\\' | '\'' | '"') || ch.is_control())
}

/// Escape a string value for use inside a Cypher string literal.
///
/// Backslashes and both quote characters are escaped everywhere in the
/// string, so the result is safe inside either single or double quotes.
/// Control characters use their short escape where Cypher has one and
/// `\uXXXX` otherwise.
///
/// Returns `Cow::Borrowed` when nothing needs escaping.
///
/// # Examples
///
/// ```
/// # use cypher_graph::cypher::escape_string;
/// let clean = escape_string("user_name");
/// assert!(matches!(clean, std::borrow::Cow::Borrowed(_)));
///
/// let dirty = escape_string(r#"say "hi" and "bye""#);
/// assert_eq!(dirty, r#"say \"hi\" and \"bye\""#);
/// ```
pub fn escape_string(s: &str) -> Cow<'_, str> {
    if !needs_escaping(s) {
        return Cow::Borrowed(s);
    }

    let mut escaped = String::with_capacity(s.len() + 10);
    for c in s.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\'' => escaped.push_str("\\'"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c if c.is_control() => {
                // Writing to a String cannot fail.
                let _ = write!(escaped, "\\u{:04X}", c as u32);
            }
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

/// Quote a string value as a double-quoted Cypher literal.
pub fn quote_string(s: &str) -> String {
    format!("\"{}\"", escape_string(s))
}

/// Check if a string is a plain Cypher identifier.
///
/// Plain identifiers start with a letter or underscore, and contain only
/// letters, digits, and underscores.
pub fn is_valid_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    let first = match chars.next() {
        Some(c) => c,
        None => return false,
    };

    if !first.is_ascii_alphabetic() && first != '_' {
        return false;
    }

    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Normalize a string to NFC (Canonical Composition) form.
///
/// # Examples
///
/// ```
/// # use cypher_graph::cypher::normalize_unicode;
/// let composed = "caf\u{e9}";
/// let decomposed = "cafe\u{301}";
/// assert_eq!(normalize_unicode(composed), normalize_unicode(decomposed));
/// ```
pub fn normalize_unicode(s: &str) -> String {
    s.nfc().collect()
}

/// Control, zero-width, bidi and other invisible format characters.
fn is_dangerous_unicode(c: char) -> bool {
    c.is_control()
        || matches!(
            c,
            '\u{200B}'
                | '\u{200C}'
                | '\u{200D}'
                | '\u{FEFF}'
                | '\u{202A}'
                | '\u{202B}'
                | '\u{202C}'
                | '\u{202D}'
                | '\u{202E}'
                | '\u{2066}'
                | '\u{2067}'
                | '\u{2068}'
                | '\u{2069}'
                | '\u{00AD}'
                | '\u{061C}'
                | '\u{180E}'
        )
}

/// Backtick-quote `s` unless it is a plain, non-keyword identifier.
fn backtick_quote(s: &str) -> String {
    if is_valid_identifier(s) && !is_cypher_keyword(s) {
        s.to_string()
    } else {
        format!("`{}`", s.replace('`', "``"))
    }
}

/// Normalize, strip dangerous code points, and backtick-quote if needed.
fn quote_name(s: &str) -> String {
    let sanitized: String = normalize_unicode(s)
        .chars()
        .filter(|c| !is_dangerous_unicode(*c))
        .collect();
    backtick_quote(&sanitized)
}

/// Escape an identifier (variable or property key) for Cypher.
///
/// The name is never altered, only quoted: two different inputs always
/// give two different outputs.
///
/// # Examples
///
/// ```
/// # use cypher_graph::cypher::escape_identifier;
/// assert_eq!(escape_identifier("name"), "name");
/// assert_eq!(escape_identifier("n_4:abc:12"), "`n_4:abc:12`");
/// assert_eq!(escape_identifier("MATCH"), "`MATCH`");
/// assert_ne!(escape_identifier("ab"), escape_identifier("a\u{200B}b"));
/// ```
pub fn escape_identifier(s: &str) -> String {
    backtick_quote(s)
}

/// Escape a label name for Cypher, including the leading `:`.
///
/// # Examples
///
/// ```
/// # use cypher_graph::cypher::escape_label;
/// assert_eq!(escape_label("Person"), ":Person");
/// assert_eq!(escape_label("My-Label"), ":`My-Label`");
/// ```
pub fn escape_label(s: &str) -> String {
    format!(":{}", quote_name(s))
}

/// Escape a relationship type for Cypher, including the leading `:`.
///
/// # Examples
///
/// ```
/// # use cypher_graph::cypher::escape_relationship_type;
/// assert_eq!(escape_relationship_type("ACTED_IN"), ":ACTED_IN");
/// assert_eq!(escape_relationship_type("knows-about"), ":`knows-about`");
/// ```
pub fn escape_relationship_type(s: &str) -> String {
    format!(":{}", quote_name(s))
}

/// Check if a string is a Cypher reserved keyword.
fn is_cypher_keyword(s: &str) -> bool {
    matches!(
        s.to_uppercase().as_str(),
        "ALL"
            | "AND"
            | "ANY"
            | "AS"
            | "ASC"
            | "ASCENDING"
            | "BY"
            | "CALL"
            | "CASE"
            | "CONTAINS"
            | "COUNT"
            | "CREATE"
            | "DELETE"
            | "DESC"
            | "DESCENDING"
            | "DETACH"
            | "DISTINCT"
            | "DO"
            | "DROP"
            | "ELSE"
            | "END"
            | "ENDS"
            | "EXISTS"
            | "FALSE"
            | "FILTER"
            | "FOREACH"
            | "IN"
            | "IS"
            | "LIMIT"
            | "MANDATORY"
            | "MATCH"
            | "MERGE"
            | "NODE"
            | "NONE"
            | "NOT"
            | "NULL"
            | "OF"
            | "ON"
            | "OPTIONAL"
            | "OR"
            | "ORDER"
            | "REDUCE"
            | "RELATIONSHIP"
            | "REMOVE"
            | "RETURN"
            | "SET"
            | "SINGLE"
            | "SKIP"
            | "SOME"
            | "STARTS"
            | "THEN"
            | "TRUE"
            | "UNION"
            | "UNIQUE"
            | "UNWIND"
            | "USING"
            | "WHEN"
            | "WHERE"
            | "WITH"
            | "XOR"
            | "YIELD"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_string_basic() {
        assert_eq!(escape_string("hello").as_ref(), "hello");
        assert!(matches!(escape_string("hello world"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_escape_string_every_quote() {
        // Every quote is escaped, not only the first one.
        assert_eq!(
            escape_string(r#"a "b" "c""#).as_ref(),
            r#"a \"b\" \"c\""#
        );
        assert_eq!(escape_string("it's Neo's").as_ref(), "it\\'s Neo\\'s");
    }

    #[test]
    fn test_escape_string_backslash() {
        assert_eq!(escape_string(r"path\to\file").as_ref(), r"path\\to\\file");
        // A trailing backslash must not swallow the closing quote.
        assert_eq!(quote_string("end\\"), r#""end\\""#);
    }

    #[test]
    fn test_escape_string_control_characters() {
        assert_eq!(escape_string("line1\nline2").as_ref(), r"line1\nline2");
        assert_eq!(escape_string("a\r\nb").as_ref(), r"a\r\nb");
        assert_eq!(escape_string("col1\tcol2").as_ref(), r"col1\tcol2");
        assert_eq!(escape_string("before\x00after").as_ref(), r"before\u0000after");
        assert_eq!(escape_string("bell\x07").as_ref(), r"bell\u0007");
    }

    #[test]
    fn test_quote_string_injection() {
        let quoted = quote_string(r#"x"}) DETACH DELETE n //"#);
        assert_eq!(quoted, r#""x\"}) DETACH DELETE n //""#);
    }

    #[test]
    fn test_is_valid_identifier() {
        assert!(is_valid_identifier("name"));
        assert!(is_valid_identifier("_private"));
        assert!(is_valid_identifier("n_42"));
        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("42"));
        assert!(!is_valid_identifier("has space"));
        assert!(!is_valid_identifier("@id"));
    }

    #[test]
    fn test_escape_identifier() {
        assert_eq!(escape_identifier("title"), "title");
        assert_eq!(escape_identifier("@id"), "`@id`");
        assert_eq!(escape_identifier("with`tick"), "`with``tick`");
        assert_eq!(escape_identifier("return"), "`return`");
    }

    #[test]
    fn test_escape_identifier_keeps_every_code_point() {
        assert_eq!(escape_identifier("na\u{200B}me"), "`na\u{200B}me`");
        assert_eq!(escape_identifier("a\u{202E}b"), "`a\u{202E}b`");
        assert_eq!(escape_identifier("x\ny"), "`x\ny`");
        assert_ne!(escape_identifier("caf\u{e9}"), escape_identifier("cafe\u{301}"));
    }

    #[test]
    fn test_escape_label_strips_dangerous_unicode() {
        assert_eq!(escape_label("Per\u{200B}son"), ":Person");
        assert_eq!(escape_relationship_type("A\u{202E}B"), ":AB");
        assert_eq!(escape_label("cafe\u{301}"), escape_label("caf\u{e9}"));
    }

    #[test]
    fn test_escape_label_and_type() {
        assert_eq!(escape_label("Movie"), ":Movie");
        assert_eq!(escape_label("Sci Fi"), ":`Sci Fi`");
        assert_eq!(escape_relationship_type("DIRECTED"), ":DIRECTED");
        assert_eq!(escape_relationship_type("ORDER"), ":`ORDER`");
    }

    #[test]
    fn test_validate_string_length() {
        let config = ExportConfig::default().with_max_string_length(3);
        assert!(validate_string_length("abc", "p", &config).is_ok());
        match validate_string_length("abcd", "p", &config) {
            Err(GraphError::StringLengthExceeded {
                length,
                max_length,
                property,
            }) => {
                assert_eq!(length, 4);
                assert_eq!(max_length, 3);
                assert_eq!(property, "p");
            }
            other => panic!("Expected StringLengthExceeded, got {:?}", other),
        }

        let unlimited = ExportConfig::default().without_string_length_limit();
        assert!(validate_string_length(&"x".repeat(10_000), "p", &unlimited).is_ok());
    }
}
