//! Row materializer: populates typed values from result rows.
//!
//! Coercion is best-effort by contract. A missing column, a NULL value and an
//! unparsable value all degrade to the target type's zero value (or `None`
//! for nullable kinds); no reader ever fails. Internally every read passes
//! through [`Coerced`], which distinguishes "was absent" from "failed to
//! parse" so the degradation policy stays observable to tests.

use super::field::{FieldKind, FieldRole, FieldValue};
use super::FromProcRow;
use crate::types::{Row, SqlValue};
use chrono::{NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Outcome of one column coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Coerced<T> {
    /// The column held a value the target type could represent.
    Value(T),
    /// The column was missing or held NULL.
    Null,
    /// The column held a value the target type could not represent.
    Unparsable,
}

impl<T> Coerced<T> {
    pub(crate) fn or_zero(self) -> T
    where
        T: Default,
    {
        match self {
            Coerced::Value(v) => v,
            Coerced::Null | Coerced::Unparsable => T::default(),
        }
    }

    pub(crate) fn or_none(self) -> Option<T> {
        match self {
            Coerced::Value(v) => Some(v),
            Coerced::Null | Coerced::Unparsable => None,
        }
    }
}

fn coerce<T>(row: &Row, column: &str, convert: impl Fn(&SqlValue) -> Option<T>) -> Coerced<T> {
    match row.get_by_name(column) {
        None | Some(SqlValue::Null) => Coerced::Null,
        Some(value) => convert(value).map_or(Coerced::Unparsable, Coerced::Value),
    }
}

pub(crate) fn coerce_int(row: &Row, column: &str) -> Coerced<i32> {
    coerce(row, column, SqlValue::to_i32)
}

pub(crate) fn coerce_bool(row: &Row, column: &str) -> Coerced<bool> {
    coerce(row, column, SqlValue::to_bool)
}

pub(crate) fn coerce_datetime(row: &Row, column: &str) -> Coerced<NaiveDateTime> {
    coerce(row, column, SqlValue::to_datetime)
}

pub(crate) fn coerce_time(row: &Row, column: &str) -> Coerced<NaiveTime> {
    coerce(row, column, SqlValue::to_time)
}

pub(crate) fn coerce_money(row: &Row, column: &str) -> Coerced<Decimal> {
    coerce(row, column, SqlValue::to_decimal)
}

/// Read a 32-bit integer column; missing, NULL and unparsable yield 0.
pub fn read_int(row: &Row, column: &str) -> i32 {
    coerce_int(row, column).or_zero()
}

/// Read a nullable 32-bit integer column.
pub fn read_nullable_int(row: &Row, column: &str) -> Option<i32> {
    coerce_int(row, column).or_none()
}

/// Read a 64-bit integer column; missing, NULL and unparsable yield 0.
pub fn read_big_int(row: &Row, column: &str) -> i64 {
    coerce(row, column, SqlValue::to_i64).or_zero()
}

/// Read an 8-bit integer column; missing, NULL and unparsable yield 0.
pub fn read_tiny_int(row: &Row, column: &str) -> u8 {
    coerce(row, column, SqlValue::to_u8).or_zero()
}

/// Read a boolean column; missing, NULL and unparsable yield `false`.
pub fn read_bool(row: &Row, column: &str) -> bool {
    coerce_bool(row, column).or_zero()
}

/// Read a nullable boolean column.
pub fn read_nullable_bool(row: &Row, column: &str) -> Option<bool> {
    coerce_bool(row, column).or_none()
}

/// Read a text column; missing and NULL yield the empty string.
pub fn read_text(row: &Row, column: &str) -> String {
    match row.get_by_name(column) {
        None | Some(SqlValue::Null) => String::new(),
        Some(value) => value.to_string(),
    }
}

/// Read a text column, keeping the NULL/empty distinction.
pub fn read_nullable_text(row: &Row, column: &str) -> Option<String> {
    match row.get_by_name(column) {
        None | Some(SqlValue::Null) => None,
        Some(value) => Some(value.to_string()),
    }
}

/// Read a date-time column; missing, NULL and unparsable yield the epoch.
pub fn read_datetime(row: &Row, column: &str) -> NaiveDateTime {
    coerce_datetime(row, column).or_zero()
}

/// Read a nullable date-time column.
pub fn read_nullable_datetime(row: &Row, column: &str) -> Option<NaiveDateTime> {
    coerce_datetime(row, column).or_none()
}

/// Read a time column; missing, NULL and unparsable yield midnight.
pub fn read_time(row: &Row, column: &str) -> NaiveTime {
    coerce_time(row, column).or_zero()
}

/// Read a nullable time column.
pub fn read_nullable_time(row: &Row, column: &str) -> Option<NaiveTime> {
    coerce_time(row, column).or_none()
}

/// Read a money column; missing, NULL and unparsable yield zero.
pub fn read_money(row: &Row, column: &str) -> Decimal {
    coerce_money(row, column).or_zero()
}

/// Read a nullable money column.
pub fn read_nullable_money(row: &Row, column: &str) -> Option<Decimal> {
    coerce_money(row, column).or_none()
}

/// Read a nullable GUID column.
pub fn read_nullable_guid(row: &Row, column: &str) -> Option<Uuid> {
    coerce(row, column, SqlValue::to_guid).or_none()
}

/// Materialize one typed value from the row.
///
/// Walks the type's plan table: output and excluded fields are skipped, as
/// are kinds with no registered coercion; a field whose column is missing is
/// left at its default. A row missing expected columns therefore yields a
/// partially populated value, never an error.
pub fn from_row<T: FromProcRow>(row: &Row) -> T {
    let mut target = T::default();
    for spec in T::fields() {
        if spec.role != FieldRole::Input {
            continue;
        }
        if !row.has_column(spec.name) {
            continue;
        }
        if let Some(value) = read_field(spec.kind, row, spec.name) {
            target.assign(spec.name, value);
        }
    }
    target
}

fn read_field(kind: FieldKind, row: &Row, column: &str) -> Option<FieldValue> {
    match kind {
        FieldKind::Int => Some(FieldValue::Int(read_int(row, column))),
        FieldKind::NullableInt => Some(FieldValue::NullableInt(read_nullable_int(row, column))),
        FieldKind::Bool => Some(FieldValue::Bool(read_bool(row, column))),
        FieldKind::NullableBool => Some(FieldValue::NullableBool(read_nullable_bool(row, column))),
        FieldKind::Text => Some(FieldValue::Text(Some(read_text(row, column)))),
        FieldKind::DateTime => Some(FieldValue::DateTime(read_datetime(row, column))),
        FieldKind::NullableDateTime => Some(FieldValue::NullableDateTime(read_nullable_datetime(
            row, column,
        ))),
        FieldKind::Time => Some(FieldValue::Time(read_time(row, column))),
        FieldKind::NullableTime => Some(FieldValue::NullableTime(read_nullable_time(row, column))),
        FieldKind::Money => Some(FieldValue::Money(read_money(row, column))),
        FieldKind::NullableMoney => Some(FieldValue::NullableMoney(read_nullable_money(
            row, column,
        ))),
        // No registered materializer; the field stays at its default even
        // when a matching column exists.
        FieldKind::SmallInt
        | FieldKind::NullableSmallInt
        | FieldKind::Table
        | FieldKind::Other => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::FieldSpec;
    use crate::types::Columns;
    use std::sync::Arc;

    fn row(columns: &[&str], values: Vec<SqlValue>) -> Row {
        let columns = Arc::new(Columns::new(
            columns.iter().map(|c| c.to_string()).collect(),
        ));
        Row::new(columns, values)
    }

    #[derive(Default, Debug, PartialEq)]
    struct User {
        id: i32,
        name: String,
        active: Option<bool>,
        balance: Decimal,
        last_seen: Option<NaiveDateTime>,
        shard: i16,
    }

    impl FromProcRow for User {
        fn fields() -> &'static [FieldSpec] {
            const FIELDS: &[FieldSpec] = &[
                FieldSpec::input("Id", FieldKind::Int),
                FieldSpec::input("Name", FieldKind::Text),
                FieldSpec::input("Active", FieldKind::NullableBool),
                FieldSpec::input("Balance", FieldKind::Money),
                FieldSpec::input("LastSeen", FieldKind::NullableDateTime),
                FieldSpec::input("Shard", FieldKind::SmallInt),
            ];
            FIELDS
        }

        fn assign(&mut self, name: &str, value: FieldValue) {
            match (name, value) {
                ("Id", FieldValue::Int(v)) => self.id = v,
                ("Name", FieldValue::Text(v)) => self.name = v.unwrap_or_default(),
                ("Active", FieldValue::NullableBool(v)) => self.active = v,
                ("Balance", FieldValue::Money(v)) => self.balance = v,
                ("LastSeen", FieldValue::NullableDateTime(v)) => self.last_seen = v,
                ("Shard", FieldValue::SmallInt(v)) => self.shard = v,
                _ => {}
            }
        }
    }

    #[test]
    fn test_coerced_outcomes() {
        let row = row(
            &["A", "B", "C"],
            vec![
                SqlValue::Int(3),
                SqlValue::Null,
                SqlValue::Text("junk".to_string()),
            ],
        );

        assert_eq!(coerce_int(&row, "A"), Coerced::Value(3));
        assert_eq!(coerce_int(&row, "B"), Coerced::Null);
        assert_eq!(coerce_int(&row, "C"), Coerced::Unparsable);
        assert_eq!(coerce_int(&row, "Missing"), Coerced::Null);

        // Null and Unparsable degrade identically through the public readers.
        assert_eq!(read_int(&row, "B"), 0);
        assert_eq!(read_int(&row, "C"), 0);
        assert_eq!(read_nullable_int(&row, "B"), None);
        assert_eq!(read_nullable_int(&row, "C"), None);
    }

    #[test]
    fn test_text_readers() {
        let row = row(
            &["Name", "Note"],
            vec![SqlValue::Text("x".to_string()), SqlValue::Null],
        );
        assert_eq!(read_text(&row, "name"), "x");
        assert_eq!(read_text(&row, "Note"), "");
        assert_eq!(read_text(&row, "Missing"), "");
        assert_eq!(read_nullable_text(&row, "Note"), None);
        assert_eq!(read_nullable_text(&row, "name"), Some("x".to_string()));
    }

    #[test]
    fn test_lenient_cross_type_reads() {
        let row = row(
            &["N", "B", "D"],
            vec![
                SqlValue::Text("41".to_string()),
                SqlValue::Int(1),
                SqlValue::Text("2024-03-01 10:00:00".to_string()),
            ],
        );
        assert_eq!(read_int(&row, "N"), 41);
        assert_eq!(read_nullable_bool(&row, "B"), Some(true));
        assert!(read_nullable_datetime(&row, "D").is_some());
    }

    #[test]
    fn test_supplemental_readers() {
        let row = row(
            &["Version", "Kind", "Key"],
            vec![
                SqlValue::BigInt(1 << 40),
                SqlValue::TinyInt(3),
                SqlValue::Text("6f9619ff-8b86-d011-b42d-00c04fc964ff".to_string()),
            ],
        );

        assert_eq!(read_big_int(&row, "version"), 1 << 40);
        assert_eq!(read_tiny_int(&row, "kind"), 3);
        assert_eq!(
            read_nullable_guid(&row, "key"),
            Uuid::parse_str("6f9619ff-8b86-d011-b42d-00c04fc964ff").ok()
        );
        assert_eq!(read_big_int(&row, "missing"), 0);
        assert_eq!(read_nullable_guid(&row, "version"), None);
    }

    #[test]
    fn test_from_row_populates_matching_fields() {
        let row = row(
            &["Id", "Name", "Active", "Balance"],
            vec![
                SqlValue::Int(7),
                SqlValue::Text("Ada".to_string()),
                SqlValue::Null,
                SqlValue::Money("10.50".parse().unwrap()),
            ],
        );

        let user: User = from_row(&row);
        assert_eq!(user.id, 7);
        assert_eq!(user.name, "Ada");
        assert_eq!(user.active, None);
        assert_eq!(user.balance, "10.50".parse().unwrap());
        // No LastSeen column: left at its default.
        assert_eq!(user.last_seen, None);
    }

    #[test]
    fn test_from_row_missing_columns_yield_partial_object() {
        let row = row(&["Id"], vec![SqlValue::Int(1)]);
        let user: User = from_row(&row);
        assert_eq!(
            user,
            User {
                id: 1,
                ..User::default()
            }
        );
    }

    #[test]
    fn test_from_row_unparsable_degrades_silently() {
        let row = row(
            &["Id", "Balance", "LastSeen"],
            vec![
                SqlValue::Text("junk".to_string()),
                SqlValue::Text("junk".to_string()),
                SqlValue::Text("junk".to_string()),
            ],
        );
        let user: User = from_row(&row);
        assert_eq!(user.id, 0);
        assert_eq!(user.balance, Decimal::ZERO);
        assert_eq!(user.last_seen, None);
    }

    #[test]
    fn test_smallint_has_no_registered_materializer() {
        let row = row(&["Shard"], vec![SqlValue::SmallInt(3)]);
        let user: User = from_row(&row);
        assert_eq!(user.shard, 0);
    }

    #[test]
    fn test_case_insensitive_column_match() {
        let row = row(
            &["ID", "NAME"],
            vec![SqlValue::Int(2), SqlValue::Text("b".to_string())],
        );
        let user: User = from_row(&row);
        assert_eq!(user.id, 2);
        assert_eq!(user.name, "b");
    }
}
