//! Wire value enum for parameters and result columns.

use super::table::TableValue;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use std::fmt;
use uuid::Uuid;

/// A single wire-level value: a bound parameter or one column of a result row.
///
/// The lenient `to_*` accessors accept the matching typed variant directly and
/// otherwise fall back to parsing the value's text form, mirroring the way
/// heterogeneous legacy columns are tolerated on the materializer side.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// Database NULL.
    Null,
    /// BIT value.
    Bit(bool),
    /// TINYINT value.
    TinyInt(u8),
    /// SMALLINT value.
    SmallInt(i16),
    /// INT value.
    Int(i32),
    /// BIGINT value.
    BigInt(i64),
    /// FLOAT value.
    Float(f64),
    /// MONEY / DECIMAL value.
    Money(Decimal),
    /// Text value (NVARCHAR and friends).
    Text(String),
    /// DATETIME value.
    DateTime(NaiveDateTime),
    /// TIME value.
    Time(NaiveTime),
    /// UNIQUEIDENTIFIER value.
    Guid(Uuid),
    /// Table-valued parameter payload.
    Table(TableValue),
}

impl SqlValue {
    /// Check if the value is NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// Try to get the value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SqlValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Try to read as i16.
    pub fn to_i16(&self) -> Option<i16> {
        match self {
            SqlValue::SmallInt(v) => Some(*v),
            SqlValue::TinyInt(v) => Some(i16::from(*v)),
            SqlValue::Int(v) => i16::try_from(*v).ok(),
            SqlValue::BigInt(v) => i16::try_from(*v).ok(),
            SqlValue::Null => None,
            other => other.to_string().trim().parse().ok(),
        }
    }

    /// Try to read as i32.
    pub fn to_i32(&self) -> Option<i32> {
        match self {
            SqlValue::Int(v) => Some(*v),
            SqlValue::SmallInt(v) => Some(i32::from(*v)),
            SqlValue::TinyInt(v) => Some(i32::from(*v)),
            SqlValue::BigInt(v) => i32::try_from(*v).ok(),
            SqlValue::Null => None,
            other => other.to_string().trim().parse().ok(),
        }
    }

    /// Try to read as i64.
    pub fn to_i64(&self) -> Option<i64> {
        match self {
            SqlValue::BigInt(v) => Some(*v),
            SqlValue::Int(v) => Some(i64::from(*v)),
            SqlValue::SmallInt(v) => Some(i64::from(*v)),
            SqlValue::TinyInt(v) => Some(i64::from(*v)),
            SqlValue::Null => None,
            other => other.to_string().trim().parse().ok(),
        }
    }

    /// Try to read as u8.
    pub fn to_u8(&self) -> Option<u8> {
        match self {
            SqlValue::TinyInt(v) => Some(*v),
            SqlValue::SmallInt(v) => u8::try_from(*v).ok(),
            SqlValue::Int(v) => u8::try_from(*v).ok(),
            SqlValue::Null => None,
            other => other.to_string().trim().parse().ok(),
        }
    }

    /// Try to read as bool.
    ///
    /// Accepts the BIT variant, the words `true`/`false` in any case, and the
    /// digits `1`/`0`.
    pub fn to_bool(&self) -> Option<bool> {
        match self {
            SqlValue::Bit(v) => Some(*v),
            SqlValue::Null => None,
            other => match other.to_string().trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => None,
            },
        }
    }

    /// Try to read as a fixed-point decimal.
    pub fn to_decimal(&self) -> Option<Decimal> {
        match self {
            SqlValue::Money(v) => Some(*v),
            SqlValue::Int(v) => Some(Decimal::from(*v)),
            SqlValue::SmallInt(v) => Some(Decimal::from(*v)),
            SqlValue::TinyInt(v) => Some(Decimal::from(*v)),
            SqlValue::BigInt(v) => Some(Decimal::from(*v)),
            SqlValue::Null => None,
            other => other.to_string().trim().parse().ok(),
        }
    }

    /// Try to read as a date-time.
    pub fn to_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            SqlValue::DateTime(v) => Some(*v),
            SqlValue::Null => None,
            other => parse_datetime(other.to_string().trim()),
        }
    }

    /// Try to read as a time of day.
    pub fn to_time(&self) -> Option<NaiveTime> {
        match self {
            SqlValue::Time(v) => Some(*v),
            SqlValue::Null => None,
            other => parse_time(other.to_string().trim()),
        }
    }

    /// Try to read as a GUID.
    pub fn to_guid(&self) -> Option<Uuid> {
        match self {
            SqlValue::Guid(v) => Some(*v),
            SqlValue::Null => None,
            other => Uuid::parse_str(other.to_string().trim()).ok(),
        }
    }
}

fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::default()))
        })
}

fn parse_time(text: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(text, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M"))
        .ok()
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => write!(f, "NULL"),
            SqlValue::Bit(v) => write!(f, "{}", v),
            SqlValue::TinyInt(v) => write!(f, "{}", v),
            SqlValue::SmallInt(v) => write!(f, "{}", v),
            SqlValue::Int(v) => write!(f, "{}", v),
            SqlValue::BigInt(v) => write!(f, "{}", v),
            SqlValue::Float(v) => write!(f, "{}", v),
            SqlValue::Money(v) => write!(f, "{}", v),
            SqlValue::Text(v) => write!(f, "{}", v),
            SqlValue::DateTime(v) => write!(f, "{}", v.format("%Y-%m-%d %H:%M:%S%.f")),
            SqlValue::Time(v) => write!(f, "{}", v.format("%H:%M:%S%.f")),
            SqlValue::Guid(v) => write!(f, "{}", v),
            SqlValue::Table(t) => write!(f, "<TVP {}: {} rows>", t.type_name(), t.len()),
        }
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Bit(v)
    }
}

impl From<u8> for SqlValue {
    fn from(v: u8) -> Self {
        SqlValue::TinyInt(v)
    }
}

impl From<i16> for SqlValue {
    fn from(v: i16) -> Self {
        SqlValue::SmallInt(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::Int(v)
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::BigInt(v)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::Float(v)
    }
}

impl From<Decimal> for SqlValue {
    fn from(v: Decimal) -> Self {
        SqlValue::Money(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<NaiveDateTime> for SqlValue {
    fn from(v: NaiveDateTime) -> Self {
        SqlValue::DateTime(v)
    }
}

impl From<NaiveTime> for SqlValue {
    fn from(v: NaiveTime) -> Self {
        SqlValue::Time(v)
    }
}

impl From<Uuid> for SqlValue {
    fn from(v: Uuid) -> Self {
        SqlValue::Guid(v)
    }
}

impl From<TableValue> for SqlValue {
    fn from(v: TableValue) -> Self {
        SqlValue::Table(v)
    }
}

/// Conversion of a scalar call result into a caller type.
///
/// Unlike row materialization, scalar conversion is strict: a value the
/// requested type cannot represent is reported as a fault by the executor
/// rather than degraded to a default.
pub trait FromSqlScalar: Sized {
    /// Name of the target type, used in conversion faults.
    const TYPE_NAME: &'static str;

    /// Convert the scalar, or `None` when the value has the wrong shape.
    fn from_scalar(value: &SqlValue) -> Option<Self>;
}

impl FromSqlScalar for i16 {
    const TYPE_NAME: &'static str = "i16";

    fn from_scalar(value: &SqlValue) -> Option<Self> {
        value.to_i16()
    }
}

impl FromSqlScalar for i32 {
    const TYPE_NAME: &'static str = "i32";

    fn from_scalar(value: &SqlValue) -> Option<Self> {
        value.to_i32()
    }
}

impl FromSqlScalar for i64 {
    const TYPE_NAME: &'static str = "i64";

    fn from_scalar(value: &SqlValue) -> Option<Self> {
        value.to_i64()
    }
}

impl FromSqlScalar for bool {
    const TYPE_NAME: &'static str = "bool";

    fn from_scalar(value: &SqlValue) -> Option<Self> {
        value.to_bool()
    }
}

impl FromSqlScalar for String {
    const TYPE_NAME: &'static str = "String";

    fn from_scalar(value: &SqlValue) -> Option<Self> {
        Some(value.to_string())
    }
}

impl FromSqlScalar for Decimal {
    const TYPE_NAME: &'static str = "Decimal";

    fn from_scalar(value: &SqlValue) -> Option<Self> {
        value.to_decimal()
    }
}

impl FromSqlScalar for NaiveDateTime {
    const TYPE_NAME: &'static str = "NaiveDateTime";

    fn from_scalar(value: &SqlValue) -> Option<Self> {
        value.to_datetime()
    }
}

impl FromSqlScalar for Uuid {
    const TYPE_NAME: &'static str = "Uuid";

    fn from_scalar(value: &SqlValue) -> Option<Self> {
        value.to_guid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null() {
        let val = SqlValue::Null;
        assert!(val.is_null());
        assert_eq!(val.to_i32(), None);
        assert_eq!(val.to_bool(), None);
        assert_eq!(format!("{}", val), "NULL");
    }

    #[test]
    fn test_integer_widening() {
        assert_eq!(SqlValue::SmallInt(7).to_i32(), Some(7));
        assert_eq!(SqlValue::Int(7).to_i64(), Some(7));
        assert_eq!(SqlValue::BigInt(i64::from(i32::MAX) + 1).to_i32(), None);
    }

    #[test]
    fn test_text_form_parse() {
        assert_eq!(SqlValue::Text("42".to_string()).to_i32(), Some(42));
        assert_eq!(SqlValue::Text("42.5".to_string()).to_i32(), None);
        assert_eq!(SqlValue::Text("12.50".to_string()).to_decimal(), "12.50".parse().ok());
        assert_eq!(SqlValue::Float(3.0).to_i32(), Some(3));
    }

    #[test]
    fn test_bool_leniency() {
        assert_eq!(SqlValue::Bit(true).to_bool(), Some(true));
        assert_eq!(SqlValue::Text("True".to_string()).to_bool(), Some(true));
        assert_eq!(SqlValue::Text("0".to_string()).to_bool(), Some(false));
        assert_eq!(SqlValue::Int(1).to_bool(), Some(true));
        assert_eq!(SqlValue::Text("yes".to_string()).to_bool(), None);
    }

    #[test]
    fn test_datetime_parse() {
        let dt = SqlValue::Text("2024-03-01 13:30:00".to_string()).to_datetime();
        assert_eq!(
            dt,
            Some(
                NaiveDate::from_ymd_opt(2024, 3, 1)
                    .unwrap()
                    .and_hms_opt(13, 30, 0)
                    .unwrap()
            )
        );
        let date_only = SqlValue::Text("2024-03-01".to_string()).to_datetime();
        assert!(date_only.is_some());
        assert_eq!(SqlValue::Text("not a date".to_string()).to_datetime(), None);
    }

    #[test]
    fn test_time_parse() {
        let t = SqlValue::Text("08:15:30".to_string()).to_time();
        assert_eq!(t, NaiveTime::from_hms_opt(8, 15, 30));
        assert_eq!(
            SqlValue::Text("08:15".to_string()).to_time(),
            NaiveTime::from_hms_opt(8, 15, 0)
        );
    }

    #[test]
    fn test_display_round_trip() {
        let dt = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(13, 30, 5)
            .unwrap();
        let text = format!("{}", SqlValue::DateTime(dt));
        assert_eq!(SqlValue::Text(text).to_datetime(), Some(dt));
    }

    #[test]
    fn test_scalar_conversions() {
        assert_eq!(i32::from_scalar(&SqlValue::Int(9)), Some(9));
        assert_eq!(bool::from_scalar(&SqlValue::Bit(false)), Some(false));
        assert_eq!(i32::from_scalar(&SqlValue::Text("abc".to_string())), None);
        assert_eq!(
            String::from_scalar(&SqlValue::Int(9)),
            Some("9".to_string())
        );
    }
}
