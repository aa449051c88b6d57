//! Driver boundary consumed by the call executor.
//!
//! The repository never talks to a database directly; it drives these traits.
//! An implementation wraps a concrete driver (its connection handle, command
//! execution and cursor) and surfaces failures as [`crate::Error::Driver`]
//! values, which the executor propagates unchanged.
//!
//! A connection is capacity one: opened for a single call, used strictly
//! sequentially (open, execute, read, close) and never reused. Pooling and
//! retries, if any, belong to the driver beneath this boundary.

use crate::command::Command;
use crate::error::Result;
use crate::types::{Row, SqlValue};
use futures::Stream;
use std::future::Future;

/// Factory for per-call connections.
///
/// Connection-string acquisition and driver configuration live inside the
/// implementor; the executor only asks for a fresh connection per call.
pub trait Connector: Send + Sync {
    /// Connection type opened by this connector.
    type Connection: Connection;

    /// Open a fresh connection.
    fn open(&self) -> impl Future<Output = Result<Self::Connection>> + Send;
}

/// One exclusively-owned connection for the duration of a single call.
pub trait Connection: Send {
    /// Forward-only cursor over a query result. Borrows the connection, so
    /// at most one cursor is active per connection.
    type Rows<'conn>: Cursor + Send
    where
        Self: 'conn;

    /// Execute a command and return a cursor over its result rows.
    fn query<'conn>(
        &'conn mut self,
        command: &Command,
    ) -> impl Future<Output = Result<Self::Rows<'conn>>> + Send;

    /// Execute a command and read a single scalar value.
    ///
    /// `None` means the command produced no value; a NULL scalar is reported
    /// as `Some(SqlValue::Null)`. The executor turns both into a fault.
    fn scalar(&mut self, command: &Command)
        -> impl Future<Output = Result<Option<SqlValue>>> + Send;

    /// Execute a command without reading rows, returning the values of its
    /// output parameters.
    fn non_query(&mut self, command: &Command) -> impl Future<Output = Result<Outputs>> + Send;

    /// Close the connection. Called exactly once per call, on every exit
    /// path.
    fn close(&mut self) -> impl Future<Output = Result<()>> + Send;
}

/// Forward-only row cursor.
pub trait Cursor {
    /// Get the next row, or `None` when the result is exhausted.
    fn next(&mut self) -> impl Future<Output = Result<Option<Row>>> + Send;
}

/// Output-parameter values read back after a non-query execution.
#[derive(Debug, Clone, Default)]
pub struct Outputs {
    values: Vec<(String, SqlValue)>,
}

impl Outputs {
    /// Create an empty output set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an output parameter's value.
    pub fn set(&mut self, name: impl Into<String>, value: SqlValue) {
        self.values.push((name.into(), value));
    }

    /// Look up an output value by parameter name, ignoring case and the `@`
    /// prefix.
    pub fn get(&self, name: &str) -> Option<&SqlValue> {
        let wanted = name.trim_start_matches('@');
        self.values
            .iter()
            .find(|(n, _)| n.trim_start_matches('@').eq_ignore_ascii_case(wanted))
            .map(|(_, v)| v)
    }

    /// Number of recorded outputs.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if no outputs were recorded.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Extension trait for converting a [`Cursor`] into a [`Stream`].
pub trait CursorStreamExt: Cursor + Sized {
    /// Convert this cursor into a stream yielding `Result<Row>`.
    ///
    /// The stream takes ownership of the cursor; each `poll_next` drives
    /// `cursor.next()` internally.
    fn into_stream(self) -> impl Stream<Item = Result<Row>>;
}

impl<C: Cursor + Unpin> CursorStreamExt for C {
    fn into_stream(self) -> impl Stream<Item = Result<Row>> {
        use futures::stream;

        stream::unfold(Some(self), |opt_cursor| async move {
            let mut cursor = opt_cursor?;
            match cursor.next().await {
                Ok(Some(row)) => Some((Ok(row), Some(cursor))),
                Ok(None) => None,
                Err(e) => Some((Err(e), Some(cursor))),
            }
        })
    }
}
