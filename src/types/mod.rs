//! Wire-level data types for parameters and result rows.

mod row;
mod sql_type;
mod table;
mod value;

pub use row::{Columns, Row};
pub use sql_type::SqlType;
pub use table::TableValue;
pub use value::{FromSqlScalar, SqlValue};
