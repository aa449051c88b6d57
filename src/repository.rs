//! Call executor: owns the connection lifecycle for each procedure call.
//!
//! Every call shape follows one discipline: build the command from the
//! argument plan, open a fresh connection, execute, read, and close the
//! connection on every exit path. A failure during execution or reading is
//! re-raised unchanged once the connection is closed; nothing is retried,
//! wrapped or logged on the error path.

use crate::command::Command;
use crate::driver::{Connection, Connector, Cursor};
use crate::error::{Error, Result};
use crate::mapping::{bind_args, from_row, FieldRole, FieldSpec, FromProcRow, ProcArgs};
use crate::types::{FromSqlScalar, SqlType, SqlValue};

/// Stored-procedure repository over a driver connector.
///
/// Holds no mutable state: each call opens its own connection, so concurrent
/// calls through one `Repository` are independent.
pub struct Repository<C: Connector> {
    connector: C,
}

impl<C: Connector> Repository<C> {
    /// Create a repository over the given connector.
    pub fn new(connector: C) -> Self {
        Self { connector }
    }

    /// The underlying connector.
    pub fn connector(&self) -> &C {
        &self.connector
    }

    fn build_command<A: ProcArgs>(args: &A, procedure: &str) -> Command {
        let mut command = Command::procedure(procedure);
        bind_args(args, command.params_mut());
        command
    }

    /// Call a procedure and materialize every result row, in order.
    ///
    /// An empty result yields an empty vector.
    pub async fn call_for_list<A, T>(&self, args: &A, procedure: &str) -> Result<Vec<T>>
    where
        A: ProcArgs,
        T: FromProcRow,
    {
        let command = Self::build_command(args, procedure);
        let mut conn = self.connector.open().await?;
        let result = fetch_all::<_, T>(&mut conn, &command).await;
        let rows = finish(conn, result).await?;
        tracing::debug!(procedure, rows = rows.len(), "procedure returned row list");
        Ok(rows)
    }

    /// Call a procedure and materialize only the first result row.
    ///
    /// An empty result yields `Ok(None)`, not a fault.
    pub async fn call_for_first_row<A, T>(&self, args: &A, procedure: &str) -> Result<Option<T>>
    where
        A: ProcArgs,
        T: FromProcRow,
    {
        let command = Self::build_command(args, procedure);
        let mut conn = self.connector.open().await?;
        let result = fetch_first::<_, T>(&mut conn, &command).await;
        let row = finish(conn, result).await?;
        tracing::debug!(procedure, found = row.is_some(), "procedure first-row call");
        Ok(row)
    }

    /// Call a procedure and read a single scalar value.
    ///
    /// A missing or NULL scalar is [`Error::ScalarMissing`]; a scalar the
    /// requested type cannot represent is [`Error::ScalarConversion`].
    pub async fn call_for_scalar<A, V>(&self, args: &A, procedure: &str) -> Result<V>
    where
        A: ProcArgs,
        V: FromSqlScalar,
    {
        let command = Self::build_command(args, procedure);
        let mut conn = self.connector.open().await?;
        let result = fetch_scalar(&mut conn, &command).await;
        let value = finish(conn, result).await?;
        tracing::debug!(procedure, "procedure scalar call");
        V::from_scalar(&value).ok_or_else(|| Error::scalar_conversion(V::TYPE_NAME, &value))
    }

    /// Execute a procedure and read back a single-bit boolean output
    /// parameter.
    ///
    /// The argument type must declare exactly one output-role field; its name
    /// becomes the output parameter name. A missing output field fails before
    /// any driver interaction.
    pub async fn call_non_query_with_bool_output<A>(&self, args: &A, procedure: &str) -> Result<bool>
    where
        A: ProcArgs,
    {
        let output = output_field::<A>()?;
        let value = self
            .run_with_output(args, procedure, output.name, SqlType::Bit)
            .await?;
        value
            .to_bool()
            .ok_or_else(|| Error::output_conversion(output.name, "bool", &value))
    }

    /// Execute a procedure and read back a 32-bit integer output parameter.
    ///
    /// Same output-field contract as
    /// [`call_non_query_with_bool_output`](Self::call_non_query_with_bool_output).
    pub async fn call_non_query_with_int_output<A>(&self, args: &A, procedure: &str) -> Result<i32>
    where
        A: ProcArgs,
    {
        let output = output_field::<A>()?;
        let value = self
            .run_with_output(args, procedure, output.name, SqlType::Int)
            .await?;
        value
            .to_i32()
            .ok_or_else(|| Error::output_conversion(output.name, "i32", &value))
    }

    /// Execute a procedure without reading any result.
    pub async fn call_non_query<A>(&self, args: &A, procedure: &str) -> Result<()>
    where
        A: ProcArgs,
    {
        let command = Self::build_command(args, procedure);
        let mut conn = self.connector.open().await?;
        let result = fetch_unit(&mut conn, &command).await;
        finish(conn, result).await?;
        tracing::debug!(procedure, "procedure non-query call");
        Ok(())
    }

    async fn run_with_output<A>(
        &self,
        args: &A,
        procedure: &str,
        output_name: &str,
        output_type: SqlType,
    ) -> Result<SqlValue>
    where
        A: ProcArgs,
    {
        let mut command = Self::build_command(args, procedure);
        command.params_mut().add_output(output_name, output_type);

        let mut conn = self.connector.open().await?;
        let result = fetch_output(&mut conn, &command, output_name).await;
        let value = finish(conn, result).await?;
        tracing::debug!(procedure, output = output_name, "procedure output call");
        Ok(value)
    }
}

/// Locate the single output-role field of the argument plan.
fn output_field<A: ProcArgs>() -> Result<&'static FieldSpec> {
    A::fields()
        .iter()
        .find(|spec| spec.role == FieldRole::Output)
        .ok_or(Error::MissingOutputField {
            type_name: std::any::type_name::<A>(),
        })
}

/// Close the connection, then surface the call's result.
///
/// The original failure wins: a close failure is only reported when the call
/// itself succeeded.
async fn finish<C: Connection, T>(mut conn: C, result: Result<T>) -> Result<T> {
    let closed = conn.close().await;
    let value = result?;
    closed?;
    Ok(value)
}

async fn fetch_all<C: Connection, T: FromProcRow>(
    conn: &mut C,
    command: &Command,
) -> Result<Vec<T>> {
    let mut cursor = conn.query(command).await?;
    let mut items = Vec::new();
    while let Some(row) = cursor.next().await? {
        items.push(from_row::<T>(&row));
    }
    Ok(items)
}

async fn fetch_first<C: Connection, T: FromProcRow>(
    conn: &mut C,
    command: &Command,
) -> Result<Option<T>> {
    let mut cursor = conn.query(command).await?;
    Ok(cursor.next().await?.map(|row| from_row::<T>(&row)))
}

async fn fetch_unit<C: Connection>(conn: &mut C, command: &Command) -> Result<()> {
    conn.non_query(command).await?;
    Ok(())
}

async fn fetch_scalar<C: Connection>(conn: &mut C, command: &Command) -> Result<SqlValue> {
    match conn.scalar(command).await? {
        None | Some(SqlValue::Null) => Err(Error::ScalarMissing {
            procedure: command.name().to_string(),
        }),
        Some(value) => Ok(value),
    }
}

async fn fetch_output<C: Connection>(
    conn: &mut C,
    command: &Command,
    output_name: &str,
) -> Result<SqlValue> {
    let outputs = conn.non_query(command).await?;
    match outputs.get(output_name) {
        None | Some(SqlValue::Null) => Err(Error::OutputValueMissing {
            name: output_name.to_string(),
        }),
        Some(value) => Ok(value.clone()),
    }
}
