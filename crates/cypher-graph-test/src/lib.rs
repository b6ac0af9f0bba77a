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

//! Shared test fixtures for cypher-graph.
//!
//! # Features
//!
//! - **Scripted executor**: [`MockExecutor`] answers queries with canned
//!   rows or errors and records every session it hands out
//! - **Record builders**: raw node, relationship and path values in the
//!   shape drivers produce
//! - **Movie fixtures**: a small movie graph in row-scan and projection form
//!
//! # Quick Start
//!
//! ```rust
//! use cypher_graph_test::{fixtures, MockExecutor};
//!
//! let executor = MockExecutor::new()
//!     .with_rows(fixtures::MATRIX_QUERY, fixtures::matrix_rows());
//! assert_eq!(executor.sessions_opened(), 0);
//! ```

pub mod executor;
pub mod fixtures;

pub use executor::MockExecutor;

use std::sync::Once;

static TRACING: Once = Once::new();

/// Install a test-friendly tracing subscriber once per process.
///
/// The filter comes from `RUST_LOG`, defaulting to `cypher_graph=debug`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("cypher_graph=debug"));
        // Another harness may already own the global subscriber.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}
