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

//! Query-execution capability consumed by the importers.
//!
//! Connection handling, query execution and result streaming belong to the
//! database driver. The importers only need the three traits below: open a
//! session, run a query to get a stream of [`Row`]s, and close the session.
//! Implementations convert driver errors with [`crate::GraphError::execution`].

use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

use crate::config::AccessMode;
use crate::cypher::CypherValue;
use crate::error::Result;

/// Query parameters.
pub type Params = BTreeMap<String, CypherValue>;

/// One result row: column name to raw value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    fields: BTreeMap<String, Value>,
}

impl Row {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column, builder style.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(column, value);
        self
    }

    /// Set a column value.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(column.into(), value.into());
    }

    /// Value of a column.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields.get(column)
    }

    /// Whether the row has a column.
    pub fn has(&self, column: &str) -> bool {
        self.fields.contains_key(column)
    }

    /// Column names.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Column values.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.fields.values()
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Take the columns out of the row.
    pub fn into_fields(self) -> BTreeMap<String, Value> {
        self.fields
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl From<serde_json::Map<String, Value>> for Row {
    fn from(map: serde_json::Map<String, Value>) -> Self {
        map.into_iter().collect()
    }
}

/// Options for opening a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionConfig {
    /// Requested access mode.
    pub access_mode: AccessMode,
    /// Database name; `None` selects the server default.
    pub database: Option<String>,
}

impl SessionConfig {
    /// A read session against `database`.
    pub fn read(database: Option<String>) -> Self {
        Self {
            access_mode: AccessMode::Read,
            database,
        }
    }
}

/// Rows produced by one query, delivered in order.
#[async_trait]
pub trait RowStream: Send {
    /// The next row, `Ok(None)` once the query completed, or the error the
    /// query failed with.
    async fn next(&mut self) -> Result<Option<Row>>;
}

/// An open session.
#[async_trait]
pub trait QuerySession: Send {
    /// Stream type returned by [`QuerySession::run`].
    type Rows: RowStream;

    /// Execute `query` with `params`.
    async fn run(&mut self, query: &str, params: &Params) -> Result<Self::Rows>;

    /// Release the session. Calling it more than once must be harmless.
    async fn close(&mut self) -> Result<()>;
}

/// Source of sessions, typically wrapping a driver.
#[async_trait]
pub trait QueryExecutor: Sync {
    /// Session type.
    type Session: QuerySession;

    /// Open a session.
    async fn session(&self, config: SessionConfig) -> Result<Self::Session>;
}

/// Close `session` and hand back `outcome`.
///
/// Close failures are logged and never replace `outcome`.
pub(crate) async fn finish_session<S, T>(session: &mut S, outcome: Result<T>) -> Result<T>
where
    S: QuerySession,
{
    if let Err(close_err) = session.close().await {
        match &outcome {
            Ok(_) => warn!(error = %close_err, "failed to close session after import"),
            Err(err) => warn!(
                error = %close_err,
                import_error = %err,
                "failed to close session after failed import"
            ),
        }
    }
    outcome
}
