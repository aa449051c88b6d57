//! Stored-procedure repository for Rust
//!
//! A generic data-access layer that maps typed values to and from a
//! relational stored-procedure interface. Argument types declare a static
//! plan table of field descriptors; the binder derives typed, nullable-aware
//! call parameters from it, and the materializer populates result types via
//! case-insensitive column matching with best-effort coercion (failed parses
//! degrade to zero/`None`, never to an error).
//!
//! The database driver sits behind the [`Connector`]/[`Connection`] traits;
//! each call opens one fresh connection, executes, reads, and closes the
//! connection on every exit path before propagating any failure unchanged.
//!
//! # Example
//!
//! ```no_run
//! use sproc_repo::{
//!     Connector, FieldKind, FieldSpec, FieldValue, FromProcRow, ProcArgs, Repository, Result,
//! };
//!
//! struct UserQuery {
//!     min_age: i32,
//!     name_filter: Option<String>,
//! }
//!
//! impl ProcArgs for UserQuery {
//!     fn fields() -> &'static [FieldSpec] {
//!         const FIELDS: &[FieldSpec] = &[
//!             FieldSpec::input("MinAge", FieldKind::Int),
//!             FieldSpec::input("NameFilter", FieldKind::Text).with_max_length(50),
//!         ];
//!         FIELDS
//!     }
//!
//!     fn field_value(&self, name: &str) -> FieldValue {
//!         match name {
//!             "MinAge" => FieldValue::Int(self.min_age),
//!             "NameFilter" => FieldValue::Text(self.name_filter.clone()),
//!             _ => FieldValue::Other(None),
//!         }
//!     }
//! }
//!
//! #[derive(Default)]
//! struct User {
//!     id: i32,
//!     name: String,
//! }
//!
//! impl FromProcRow for User {
//!     fn fields() -> &'static [FieldSpec] {
//!         const FIELDS: &[FieldSpec] = &[
//!             FieldSpec::input("Id", FieldKind::Int),
//!             FieldSpec::input("Name", FieldKind::Text),
//!         ];
//!         FIELDS
//!     }
//!
//!     fn assign(&mut self, name: &str, value: FieldValue) {
//!         match (name, value) {
//!             ("Id", FieldValue::Int(v)) => self.id = v,
//!             ("Name", FieldValue::Text(v)) => self.name = v.unwrap_or_default(),
//!             _ => {}
//!         }
//!     }
//! }
//!
//! async fn adult_users<C: Connector>(repo: &Repository<C>) -> Result<Vec<User>> {
//!     let args = UserQuery {
//!         min_age: 18,
//!         name_filter: None,
//!     };
//!     repo.call_for_list(&args, "usp_GetUsers").await
//! }
//! ```

pub mod command;
pub mod driver;
pub mod error;
pub mod mapping;
pub mod repository;
pub mod types;

// Re-export main types
pub use command::{Command, CommandKind, Direction, ParamSet, SqlParam};
pub use driver::{Connection, Connector, Cursor, CursorStreamExt, Outputs};
pub use error::{Error, Result};
pub use mapping::{
    bind_args, from_row, FieldKind, FieldRole, FieldSpec, FieldValue, FromProcRow, ProcArgs,
};
pub use repository::Repository;
pub use types::{Columns, FromSqlScalar, Row, SqlType, SqlValue, TableValue};
