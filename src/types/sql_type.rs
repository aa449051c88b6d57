//! Wire-level SQL data types with type-specific attributes.
//!
//! Each parameter declares one of these so the procedure's signature is
//! matched even when the bound value is NULL. Fixed-width types carry their
//! wire size; bounded text carries its maximum length.

/// Wire type of a call parameter or column value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    /// BIT - single-bit boolean.
    Bit,
    /// TINYINT - 8-bit unsigned integer.
    TinyInt,
    /// SMALLINT - 16-bit signed integer.
    SmallInt,
    /// INT - 32-bit signed integer.
    Int,
    /// BIGINT - 64-bit signed integer.
    BigInt,
    /// MONEY - fixed-point currency.
    Money,
    /// DECIMAL(precision, scale) - fixed-point numeric.
    Decimal { precision: u8, scale: u8 },
    /// NVARCHAR(max_length), or NVARCHAR(MAX) when unbounded.
    NVarChar { max_length: Option<u32> },
    /// DATETIME - date and time of day.
    DateTime,
    /// TIME - time of day.
    Time,
    /// UNIQUEIDENTIFIER - 128-bit GUID.
    UniqueIdentifier,
    /// Structured table-valued parameter.
    Structured,
    /// SQL_VARIANT - untyped fallback, value determines the wire form.
    Variant,
}

impl SqlType {
    /// Fixed wire size in bytes, for types that have one.
    ///
    /// Text, structured and variant parameters have no fixed size and
    /// return `None`.
    pub fn fixed_size(&self) -> Option<u32> {
        match self {
            SqlType::Bit | SqlType::TinyInt => Some(1),
            SqlType::SmallInt => Some(2),
            SqlType::Int => Some(4),
            SqlType::BigInt | SqlType::Money | SqlType::DateTime => Some(8),
            SqlType::Time => Some(5),
            SqlType::UniqueIdentifier => Some(16),
            SqlType::Decimal { .. }
            | SqlType::NVarChar { .. }
            | SqlType::Structured
            | SqlType::Variant => None,
        }
    }

    /// Whether this type carries a bounded length or precision.
    pub fn is_bounded(&self) -> bool {
        matches!(
            self,
            SqlType::Decimal { .. }
                | SqlType::NVarChar {
                    max_length: Some(_)
                }
        )
    }
}

impl std::fmt::Display for SqlType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SqlType::Bit => write!(f, "BIT"),
            SqlType::TinyInt => write!(f, "TINYINT"),
            SqlType::SmallInt => write!(f, "SMALLINT"),
            SqlType::Int => write!(f, "INT"),
            SqlType::BigInt => write!(f, "BIGINT"),
            SqlType::Money => write!(f, "MONEY"),
            SqlType::Decimal { precision, scale } => write!(f, "DECIMAL({},{})", precision, scale),
            SqlType::NVarChar { max_length: Some(n) } => write!(f, "NVARCHAR({})", n),
            SqlType::NVarChar { max_length: None } => write!(f, "NVARCHAR(MAX)"),
            SqlType::DateTime => write!(f, "DATETIME"),
            SqlType::Time => write!(f, "TIME"),
            SqlType::UniqueIdentifier => write!(f, "UNIQUEIDENTIFIER"),
            SqlType::Structured => write!(f, "STRUCTURED"),
            SqlType::Variant => write!(f, "SQL_VARIANT"),
        }
    }
}
