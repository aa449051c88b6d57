//! Field descriptors: the per-type binding and materialization plan.
//!
//! A mapped type exposes a `&'static [FieldSpec]` plan table built with the
//! `const` constructors below. The plan is derived once at compile time and
//! shared by every call, replacing per-call runtime introspection.

use crate::types::{SqlValue, TableValue};
use chrono::{NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;

/// Binding role of a field. A field holds exactly one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRole {
    /// Bound as an input parameter and populated from result columns.
    Input,
    /// Read back as an output parameter; never bound, never materialized.
    Output,
    /// Ignored by both the binder and the materializer.
    Excluded,
}

/// Declared semantic type of a field.
///
/// `SmallInt` variants are bindable but have no registered materializer, and
/// `Table`/`Other` are skipped by the materializer even when a matching
/// column exists; see [`crate::mapping::from_row`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Int,
    NullableInt,
    SmallInt,
    NullableSmallInt,
    Bool,
    NullableBool,
    Text,
    DateTime,
    NullableDateTime,
    Time,
    NullableTime,
    Money,
    NullableMoney,
    Table,
    Other,
}

/// One entry of a type's plan table: field name, semantic type, role and
/// markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field name; also the parameter name (before `@`-prefixing) and the
    /// column name matched case-insensitively on the materializer side.
    pub name: &'static str,
    /// Declared semantic type.
    pub kind: FieldKind,
    /// Binding role.
    pub role: FieldRole,
    /// Bounded text length marker; `None` binds unbounded text.
    pub max_length: Option<u32>,
    /// Substitute for an absent nullable boolean.
    pub default_if_null: Option<bool>,
}

impl FieldSpec {
    /// An input-bindable value field.
    pub const fn input(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            role: FieldRole::Input,
            max_length: None,
            default_if_null: None,
        }
    }

    /// An output-parameter field.
    pub const fn output(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            role: FieldRole::Output,
            max_length: None,
            default_if_null: None,
        }
    }

    /// A field excluded from binding and materialization.
    pub const fn excluded(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            role: FieldRole::Excluded,
            max_length: None,
            default_if_null: None,
        }
    }

    /// Constrain a text field to a bounded length.
    pub const fn with_max_length(self, max_length: u32) -> Self {
        Self {
            max_length: Some(max_length),
            ..self
        }
    }

    /// Substitute a default when a nullable boolean is absent.
    pub const fn with_default_if_null(self, default: bool) -> Self {
        Self {
            default_if_null: Some(default),
            ..self
        }
    }
}

/// An in-memory field value moving through the binder or materializer.
///
/// One variant per [`FieldKind`]; nullable kinds carry `Option`, text always
/// carries `Option` because a null string collapses to empty text at bind
/// time and is never null after materialization.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Int(i32),
    NullableInt(Option<i32>),
    SmallInt(i16),
    NullableSmallInt(Option<i16>),
    Bool(bool),
    NullableBool(Option<bool>),
    Text(Option<String>),
    DateTime(NaiveDateTime),
    NullableDateTime(Option<NaiveDateTime>),
    Time(NaiveTime),
    NullableTime(Option<NaiveTime>),
    Money(Decimal),
    NullableMoney(Option<Decimal>),
    Table(TableValue),
    Other(Option<SqlValue>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_const_plan_table() {
        const FIELDS: &[FieldSpec] = &[
            FieldSpec::input("Id", FieldKind::Int),
            FieldSpec::input("Name", FieldKind::Text).with_max_length(50),
            FieldSpec::input("Active", FieldKind::NullableBool).with_default_if_null(true),
            FieldSpec::output("Success", FieldKind::Bool),
            FieldSpec::excluded("Cache", FieldKind::Other),
        ];

        assert_eq!(FIELDS[0].role, FieldRole::Input);
        assert_eq!(FIELDS[1].max_length, Some(50));
        assert_eq!(FIELDS[2].default_if_null, Some(true));
        assert_eq!(FIELDS[3].role, FieldRole::Output);
        assert_eq!(FIELDS[4].role, FieldRole::Excluded);
    }
}
