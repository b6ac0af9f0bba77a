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

//! A scripted [`QueryExecutor`] for exercising the importers without a
//! database.

use async_trait::async_trait;
use cypher_graph::{
    GraphError, Params, QueryExecutor, QuerySession, Result, Row, RowStream, SessionConfig,
};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone)]
enum Response {
    Rows(Vec<Row>),
    StreamError { rows: Vec<Row>, message: String },
    RunError(String),
}

#[derive(Debug, Default)]
struct State {
    responses: HashMap<String, Response>,
    session_error: Option<String>,
    fail_close: bool,
    configs: Vec<SessionConfig>,
    queries: Vec<(String, Params)>,
    sessions_closed: usize,
    close_calls: usize,
}

/// Executor answering each query with a scripted response.
///
/// Queries without a script fail with an execution error. Clones share
/// their script and their recorded history.
///
/// # Examples
///
/// ```
/// use cypher_graph::Row;
/// use cypher_graph_test::MockExecutor;
///
/// let executor = MockExecutor::new()
///     .with_rows("RETURN 1 AS x", vec![Row::new().with("x", 1)])
///     .with_run_error("RETURN broken", "syntax error");
/// assert!(executor.executed_queries().is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockExecutor {
    state: Arc<Mutex<State>>,
}

impl MockExecutor {
    /// Create an executor with no scripted queries.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `query` with `rows`.
    pub fn with_rows(self, query: impl Into<String>, rows: Vec<Row>) -> Self {
        self.script(query, Response::Rows(rows))
    }

    /// Deliver `rows`, then fail the stream with `message`.
    pub fn with_stream_error(
        self,
        query: impl Into<String>,
        rows: Vec<Row>,
        message: impl Into<String>,
    ) -> Self {
        self.script(
            query,
            Response::StreamError {
                rows,
                message: message.into(),
            },
        )
    }

    /// Reject `query` when it is run.
    pub fn with_run_error(self, query: impl Into<String>, message: impl Into<String>) -> Self {
        self.script(query, Response::RunError(message.into()))
    }

    /// Refuse to open sessions.
    pub fn failing_session(self, message: impl Into<String>) -> Self {
        self.lock().session_error = Some(message.into());
        self
    }

    /// Make every `close` call fail (after marking the session closed).
    pub fn failing_close(self) -> Self {
        self.lock().fail_close = true;
        self
    }

    /// Number of sessions handed out.
    pub fn sessions_opened(&self) -> usize {
        self.lock().configs.len()
    }

    /// Number of sessions closed at least once.
    pub fn sessions_closed(&self) -> usize {
        self.lock().sessions_closed
    }

    /// Total `close` calls, repeats included.
    pub fn close_calls(&self) -> usize {
        self.lock().close_calls
    }

    /// Configurations sessions were opened with.
    pub fn session_configs(&self) -> Vec<SessionConfig> {
        self.lock().configs.clone()
    }

    /// Queries run so far, in order.
    pub fn executed_queries(&self) -> Vec<String> {
        self.lock().queries.iter().map(|(q, _)| q.clone()).collect()
    }

    /// Parameters each query was run with, in order.
    pub fn executed_params(&self) -> Vec<Params> {
        self.lock().queries.iter().map(|(_, p)| p.clone()).collect()
    }

    fn script(self, query: impl Into<String>, response: Response) -> Self {
        self.lock().responses.insert(query.into(), response);
        self
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("mock executor state poisoned")
    }
}

#[async_trait]
impl QueryExecutor for MockExecutor {
    type Session = MockSession;

    async fn session(&self, config: SessionConfig) -> Result<MockSession> {
        let mut state = self.lock();
        if let Some(message) = &state.session_error {
            return Err(GraphError::execution(message.clone()));
        }
        state.configs.push(config);
        Ok(MockSession {
            state: Arc::clone(&self.state),
            closed: false,
        })
    }
}

/// Session handed out by [`MockExecutor`].
#[derive(Debug)]
pub struct MockSession {
    state: Arc<Mutex<State>>,
    closed: bool,
}

impl MockSession {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("mock executor state poisoned")
    }
}

#[async_trait]
impl QuerySession for MockSession {
    type Rows = MockRows;

    async fn run(&mut self, query: &str, params: &Params) -> Result<MockRows> {
        if self.closed {
            return Err(GraphError::execution("session already closed"));
        }
        let mut state = self.lock();
        state.queries.push((query.to_string(), params.clone()));
        match state.responses.get(query).cloned() {
            Some(Response::Rows(rows)) => Ok(MockRows::new(rows, None)),
            Some(Response::StreamError { rows, message }) => Ok(MockRows::new(rows, Some(message))),
            Some(Response::RunError(message)) => Err(GraphError::execution(message)),
            None => Err(GraphError::execution(format!("no scripted response for `{}`", query))),
        }
    }

    async fn close(&mut self) -> Result<()> {
        let first = !self.closed;
        self.closed = true;
        let mut state = self.lock();
        state.close_calls += 1;
        if first {
            state.sessions_closed += 1;
        }
        if state.fail_close {
            return Err(GraphError::execution("connection reset while closing"));
        }
        Ok(())
    }
}

/// Rows delivered by [`MockSession::run`].
#[derive(Debug)]
pub struct MockRows {
    rows: VecDeque<Row>,
    error: Option<String>,
}

impl MockRows {
    fn new(rows: Vec<Row>, error: Option<String>) -> Self {
        Self {
            rows: rows.into(),
            error,
        }
    }
}

#[async_trait]
impl RowStream for MockRows {
    async fn next(&mut self) -> Result<Option<Row>> {
        if let Some(row) = self.rows.pop_front() {
            return Ok(Some(row));
        }
        match self.error.take() {
            Some(message) => Err(GraphError::execution(message)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_rows_and_close() {
        let executor = MockExecutor::new().with_rows("Q", vec![Row::new().with("x", 1)]);
        let mut session = executor.session(SessionConfig::default()).await.unwrap();
        let mut rows = session.run("Q", &Params::new()).await.unwrap();

        assert_eq!(rows.next().await.unwrap().unwrap().get("x"), Some(&serde_json::json!(1)));
        assert!(rows.next().await.unwrap().is_none());

        session.close().await.unwrap();
        session.close().await.unwrap();
        assert_eq!(executor.sessions_opened(), 1);
        assert_eq!(executor.sessions_closed(), 1);
        assert_eq!(executor.close_calls(), 2);
        assert_eq!(executor.executed_queries(), vec!["Q".to_string()]);
    }

    #[tokio::test]
    async fn test_stream_error_after_rows() {
        let executor =
            MockExecutor::new().with_stream_error("Q", vec![Row::new().with("x", 1)], "boom");
        let mut session = executor.session(SessionConfig::default()).await.unwrap();
        let mut rows = session.run("Q", &Params::new()).await.unwrap();

        assert!(rows.next().await.unwrap().is_some());
        let err = rows.next().await.unwrap_err();
        assert!(err.to_string().contains("boom"));
    }

    #[tokio::test]
    async fn test_unscripted_query_fails() {
        let executor = MockExecutor::new();
        let mut session = executor.session(SessionConfig::default()).await.unwrap();
        assert!(session.run("MATCH (n) RETURN n", &Params::new()).await.is_err());
    }
}
