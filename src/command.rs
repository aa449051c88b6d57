//! Command and parameter set for one procedure invocation.
//!
//! A `Command` is built fresh per call, owns its parameters exclusively, and
//! is discarded after execution. The typed `add_*` methods on [`ParamSet`]
//! are the binder half of the coercion library: each one fixes the wire type,
//! size and null handling for its semantic type.
//!
//! Null handling follows two deliberate policies:
//! - nullable numeric/boolean/date/time parameters bind an explicit NULL
//!   marker that still carries the wire type and size, so the procedure's
//!   parameter signature matches;
//! - text parameters bind a null or whitespace-only string as empty text,
//!   never as a missing parameter. Callers cannot distinguish "not provided"
//!   from "provided blank" (documented limitation, kept for compatibility
//!   with call sites that rely on it).

use crate::types::{SqlType, SqlValue, TableValue};
use chrono::{NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use uuid::Uuid;

/// How the driver should interpret the command text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// The text names a stored procedure.
    Procedure,
    /// The text is a raw SQL batch.
    Text,
}

/// Direction of a call parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Supplied by the caller.
    Input,
    /// Set by the procedure and read back after execution.
    Output,
}

/// A single bound call parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlParam {
    /// Parameter name, `@`-prefixed per the driver convention.
    pub name: String,
    /// Declared wire type (carries bounded length / precision where needed).
    pub sql_type: SqlType,
    /// Input or output.
    pub direction: Direction,
    /// Whether the parameter may carry NULL.
    pub nullable: bool,
    /// Bound value, or [`SqlValue::Null`] as the explicit NULL marker.
    pub value: SqlValue,
}

/// The ordered, named parameter set of one command.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamSet {
    params: Vec<SqlParam>,
}

fn at(name: &str) -> String {
    format!("@{}", name)
}

/// Null or whitespace-only strings collapse to empty text.
fn empty_when_null(value: Option<&str>) -> String {
    match value {
        Some(s) if !s.trim().is_empty() => s.to_string(),
        _ => String::new(),
    }
}

impl ParamSet {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an already-built parameter.
    pub fn add(&mut self, param: SqlParam) {
        self.params.push(param);
    }

    fn add_input(&mut self, name: &str, sql_type: SqlType, nullable: bool, value: SqlValue) {
        self.add(SqlParam {
            name: at(name),
            sql_type,
            direction: Direction::Input,
            nullable,
            value,
        });
    }

    /// Bind a 32-bit integer.
    pub fn add_int(&mut self, name: &str, value: i32) {
        self.add_input(name, SqlType::Int, false, SqlValue::Int(value));
    }

    /// Bind a nullable 32-bit integer; NULL keeps the INT wire type.
    pub fn add_nullable_int(&mut self, name: &str, value: Option<i32>) {
        let wire = value.map_or(SqlValue::Null, SqlValue::Int);
        self.add_input(name, SqlType::Int, true, wire);
    }

    /// Bind an INT parameter whose value arrives as text.
    pub fn add_int_from_text(&mut self, name: &str, value: &str) {
        self.add_input(name, SqlType::Int, false, SqlValue::Text(value.to_string()));
    }

    /// Bind a 16-bit integer.
    pub fn add_small_int(&mut self, name: &str, value: i16) {
        self.add_input(name, SqlType::SmallInt, false, SqlValue::SmallInt(value));
    }

    /// Bind a nullable 16-bit integer; NULL keeps the SMALLINT wire type.
    pub fn add_nullable_small_int(&mut self, name: &str, value: Option<i16>) {
        let wire = value.map_or(SqlValue::Null, SqlValue::SmallInt);
        self.add_input(name, SqlType::SmallInt, true, wire);
    }

    /// Bind a 64-bit integer.
    pub fn add_big_int(&mut self, name: &str, value: i64) {
        self.add_input(name, SqlType::BigInt, false, SqlValue::BigInt(value));
    }

    /// Bind a single-bit boolean.
    pub fn add_bit(&mut self, name: &str, value: bool) {
        self.add_input(name, SqlType::Bit, false, SqlValue::Bit(value));
    }

    /// Bind a nullable boolean; NULL keeps the BIT wire type.
    pub fn add_nullable_bit(&mut self, name: &str, value: Option<bool>) {
        let wire = value.map_or(SqlValue::Null, SqlValue::Bit);
        self.add_input(name, SqlType::Bit, true, wire);
    }

    /// Bind a boolean, substituting `default` when the value is absent.
    ///
    /// The substituted parameter is bound non-nullable: the procedure sees a
    /// concrete bit either way.
    pub fn add_bit_with_default(&mut self, name: &str, value: Option<bool>, default: bool) {
        self.add_input(name, SqlType::Bit, false, SqlValue::Bit(value.unwrap_or(default)));
    }

    /// Bind a date-time.
    pub fn add_datetime(&mut self, name: &str, value: NaiveDateTime) {
        self.add_input(name, SqlType::DateTime, false, SqlValue::DateTime(value));
    }

    /// Bind a nullable date-time; NULL keeps the DATETIME wire type.
    pub fn add_nullable_datetime(&mut self, name: &str, value: Option<NaiveDateTime>) {
        let wire = value.map_or(SqlValue::Null, SqlValue::DateTime);
        self.add_input(name, SqlType::DateTime, true, wire);
    }

    /// Bind a time of day.
    pub fn add_time(&mut self, name: &str, value: NaiveTime) {
        self.add_input(name, SqlType::Time, false, SqlValue::Time(value));
    }

    /// Bind a nullable time of day; NULL keeps the TIME wire type.
    pub fn add_nullable_time(&mut self, name: &str, value: Option<NaiveTime>) {
        let wire = value.map_or(SqlValue::Null, SqlValue::Time);
        self.add_input(name, SqlType::Time, true, wire);
    }

    /// Bind a fixed-point money value.
    pub fn add_money(&mut self, name: &str, value: Decimal) {
        self.add_input(name, SqlType::Money, false, SqlValue::Money(value));
    }

    /// Bind a nullable money value; NULL keeps the MONEY wire type.
    pub fn add_nullable_money(&mut self, name: &str, value: Option<Decimal>) {
        let wire = value.map_or(SqlValue::Null, SqlValue::Money);
        self.add_input(name, SqlType::Money, true, wire);
    }

    /// Bind a nullable decimal with explicit precision and scale.
    pub fn add_nullable_decimal(
        &mut self,
        name: &str,
        value: Option<Decimal>,
        precision: u8,
        scale: u8,
    ) {
        let wire = value.map_or(SqlValue::Null, SqlValue::Money);
        self.add_input(name, SqlType::Decimal { precision, scale }, true, wire);
    }

    /// Bind bounded text. Null and whitespace-only strings bind as empty text.
    pub fn add_nvarchar(&mut self, name: &str, value: Option<&str>, max_length: u32) {
        self.add_input(
            name,
            SqlType::NVarChar {
                max_length: Some(max_length),
            },
            false,
            SqlValue::Text(empty_when_null(value)),
        );
    }

    /// Bind unbounded text. Null and whitespace-only strings bind as empty text.
    pub fn add_nvarchar_max(&mut self, name: &str, value: Option<&str>) {
        self.add_input(
            name,
            SqlType::NVarChar { max_length: None },
            false,
            SqlValue::Text(empty_when_null(value)),
        );
    }

    /// Bind text where an empty or absent string becomes a true NULL.
    ///
    /// Never chosen by the field binder (which always collapses to empty
    /// text); available for call sites that need the distinction.
    pub fn add_nullable_text(&mut self, name: &str, value: Option<&str>) {
        let wire = match value {
            Some(s) if !s.is_empty() => SqlValue::Text(s.to_string()),
            _ => SqlValue::Null,
        };
        self.add_input(name, SqlType::NVarChar { max_length: None }, true, wire);
    }

    /// Bind a GUID.
    pub fn add_guid(&mut self, name: &str, value: Uuid) {
        self.add_input(name, SqlType::UniqueIdentifier, false, SqlValue::Guid(value));
    }

    /// Bind a nullable GUID; NULL keeps the UNIQUEIDENTIFIER wire type.
    pub fn add_nullable_guid(&mut self, name: &str, value: Option<Uuid>) {
        let wire = value.map_or(SqlValue::Null, SqlValue::Guid);
        self.add_input(name, SqlType::UniqueIdentifier, true, wire);
    }

    /// Bind a structured table-valued parameter, passed through unmodified.
    pub fn add_table(&mut self, name: &str, value: TableValue) {
        self.add_input(name, SqlType::Structured, false, SqlValue::Table(value));
    }

    /// Generic fallback bind: whatever value is present, no declared size or
    /// precision.
    pub fn add_value(&mut self, name: &str, value: SqlValue) {
        let nullable = value.is_null();
        self.add_input(name, SqlType::Variant, nullable, value);
    }

    /// Append an output parameter of the given wire type.
    pub fn add_output(&mut self, name: &str, sql_type: SqlType) {
        self.add(SqlParam {
            name: at(name),
            sql_type,
            direction: Direction::Output,
            nullable: false,
            value: SqlValue::Null,
        });
    }

    /// Look up a parameter by name, ignoring case and the `@` prefix.
    pub fn get(&self, name: &str) -> Option<&SqlParam> {
        let wanted = name.trim_start_matches('@');
        self.params
            .iter()
            .find(|p| p.name.trim_start_matches('@').eq_ignore_ascii_case(wanted))
    }

    /// Iterate over parameters in bind order.
    pub fn iter(&self) -> impl Iterator<Item = &SqlParam> {
        self.params.iter()
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl<'a> IntoIterator for &'a ParamSet {
    type Item = &'a SqlParam;
    type IntoIter = std::slice::Iter<'a, SqlParam>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.iter()
    }
}

/// One procedure invocation: name, call kind and owned parameter set.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    text: String,
    kind: CommandKind,
    params: ParamSet,
}

impl Command {
    /// Create a stored-procedure command.
    pub fn procedure(name: impl Into<String>) -> Self {
        Self {
            text: name.into(),
            kind: CommandKind::Procedure,
            params: ParamSet::new(),
        }
    }

    /// Create a raw-text command.
    pub fn text(sql: impl Into<String>) -> Self {
        Self {
            text: sql.into(),
            kind: CommandKind::Text,
            params: ParamSet::new(),
        }
    }

    /// Procedure name or SQL text.
    pub fn name(&self) -> &str {
        &self.text
    }

    /// Call kind.
    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    /// Bound parameters.
    pub fn params(&self) -> &ParamSet {
        &self.params
    }

    /// Mutable access for binding.
    pub fn params_mut(&mut self) -> &mut ParamSet {
        &mut self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_prefixed() {
        let mut params = ParamSet::new();
        params.add_int("Id", 5);
        assert_eq!(params.iter().next().unwrap().name, "@Id");
        assert!(params.get("Id").is_some());
        assert!(params.get("@id").is_some());
    }

    #[test]
    fn test_nullable_binds_keep_wire_type() {
        let mut params = ParamSet::new();
        params.add_nullable_int("A", None);
        params.add_nullable_small_int("B", None);
        params.add_nullable_bit("C", None);
        params.add_nullable_money("D", None);

        for param in &params {
            assert_eq!(param.value, SqlValue::Null, "{}", param.name);
            assert!(param.nullable, "{}", param.name);
        }
        assert_eq!(params.get("A").unwrap().sql_type, SqlType::Int);
        assert_eq!(params.get("B").unwrap().sql_type, SqlType::SmallInt);
        assert_eq!(params.get("C").unwrap().sql_type, SqlType::Bit);
        assert_eq!(params.get("D").unwrap().sql_type, SqlType::Money);
    }

    #[test]
    fn test_text_collapses_null_to_empty() {
        let mut params = ParamSet::new();
        params.add_nvarchar("Name", None, 50);
        params.add_nvarchar_max("Note", Some("   "));

        let name = params.get("Name").unwrap();
        assert_eq!(name.value, SqlValue::Text(String::new()));
        assert_eq!(
            name.sql_type,
            SqlType::NVarChar { max_length: Some(50) }
        );

        let note = params.get("Note").unwrap();
        assert_eq!(note.value, SqlValue::Text(String::new()));
        assert_eq!(note.sql_type, SqlType::NVarChar { max_length: None });
    }

    #[test]
    fn test_nullable_text_binds_true_null() {
        let mut params = ParamSet::new();
        params.add_nullable_text("A", None);
        params.add_nullable_text("B", Some(""));
        params.add_nullable_text("C", Some("x"));

        assert_eq!(params.get("A").unwrap().value, SqlValue::Null);
        assert_eq!(params.get("B").unwrap().value, SqlValue::Null);
        assert_eq!(params.get("C").unwrap().value, SqlValue::Text("x".to_string()));
    }

    #[test]
    fn test_bit_with_default() {
        let mut params = ParamSet::new();
        params.add_bit_with_default("A", None, true);
        params.add_bit_with_default("B", Some(false), true);

        assert_eq!(params.get("A").unwrap().value, SqlValue::Bit(true));
        assert_eq!(params.get("B").unwrap().value, SqlValue::Bit(false));
    }

    #[test]
    fn test_output_param() {
        let mut params = ParamSet::new();
        params.add_output("Success", SqlType::Bit);

        let out = params.get("Success").unwrap();
        assert_eq!(out.direction, Direction::Output);
        assert_eq!(out.sql_type, SqlType::Bit);
        assert_eq!(out.name, "@Success");
    }

    #[test]
    fn test_supplemental_adders() {
        let mut params = ParamSet::new();
        params.add_big_int("RowVersion", 1 << 40);
        params.add_guid("Key", uuid::Uuid::nil());
        params.add_nullable_guid("Parent", None);
        params.add_nullable_decimal("Rate", "0.0750".parse().ok(), 18, 4);
        params.add_int_from_text("LegacyId", "812");

        assert_eq!(params.get("RowVersion").unwrap().sql_type, SqlType::BigInt);
        assert_eq!(
            params.get("Key").unwrap().value,
            SqlValue::Guid(uuid::Uuid::nil())
        );
        assert_eq!(params.get("Parent").unwrap().value, SqlValue::Null);
        assert_eq!(
            params.get("Rate").unwrap().sql_type,
            SqlType::Decimal {
                precision: 18,
                scale: 4
            }
        );
        assert_eq!(
            params.get("LegacyId").unwrap().value,
            SqlValue::Text("812".to_string())
        );
        assert_eq!(params.get("LegacyId").unwrap().sql_type, SqlType::Int);
    }

    #[test]
    fn test_command_kinds() {
        let proc = Command::procedure("usp_GetUsers");
        assert_eq!(proc.kind(), CommandKind::Procedure);
        assert_eq!(proc.name(), "usp_GetUsers");

        let text = Command::text("SELECT 1");
        assert_eq!(text.kind(), CommandKind::Text);
    }
}
