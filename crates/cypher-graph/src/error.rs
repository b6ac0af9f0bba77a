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

//! Error types for cypher-graph conversions.

use thiserror::Error;

/// Error type for graph import and export operations.
#[derive(Debug, Error)]
pub enum GraphError {
    /// A projection query row is missing a column required by its contract.
    #[error("{query}'s query must return {expected}")]
    MissingField {
        /// Which projection query produced the row ("Node" or "Relationship").
        query: &'static str,
        /// The required columns, phrased for the message.
        expected: &'static str,
    },

    /// An edge has no relationship type and cannot be written as Cypher.
    #[error("edge {edge} has no type defined")]
    MissingEdgeType {
        /// Key of the offending edge.
        edge: String,
    },

    /// An edge key was merged again with different endpoints.
    #[error("edge {edge} already connects {expected}, cannot re-merge it as {found}")]
    EdgeEndpointConflict {
        /// Key of the edge.
        edge: String,
        /// Endpoints recorded for the existing edge, as `source->target`.
        expected: String,
        /// Endpoints of the rejected merge, as `source->target`.
        found: String,
    },

    /// The query-execution capability reported an error.
    #[error("query execution failed: {0}")]
    Execution(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// String length limit exceeded.
    #[error("String length {length} exceeds maximum allowed length {max_length} for property '{property}'")]
    StringLengthExceeded {
        /// Actual length of the string.
        length: usize,
        /// Maximum allowed length.
        max_length: usize,
        /// Property name where the violation occurred.
        property: String,
    },

    /// Serialization error from serde_json.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failure writing an exported script.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GraphError {
    /// Wrap an error raised by a query executor implementation.
    pub fn execution<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        GraphError::Execution(error.into())
    }
}

/// Result type alias for graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;
