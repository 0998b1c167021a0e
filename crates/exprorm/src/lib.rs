//! # exprorm
//!
//! Compile typed Rust expressions over entity fields into SQL for several
//! database dialects.
//!
//! ## Features
//!
//! - **Typed predicates**: closures receive field handles; only operations
//!   valid for the field's type exist (`+` on numbers, `starts_with` on text)
//! - **Many dialects**: PostgreSQL, SQLite, MySQL/MariaDB, SQL Server, Oracle
//! - **Parameters by default**: literals become placeholders in order, with
//!   an option to inline dialect-quoted literals instead
//! - **Deferred errors**: builder chains never need `?`; the first compile
//!   error surfaces when a statement is emitted
//! - **Safe defaults**: `DELETE` without `WHERE` matches nothing unless
//!   explicitly allowed
//!
//! ## Query builder
//!
//! ```ignore
//! use exprorm::prelude::*;
//!
//! #[derive(Entity)]
//! #[orm(table = "people")]
//! struct Person {
//!     #[orm(id)]
//!     id: i64,
//!     name: String,
//!     age: i32,
//! }
//!
//! let built = exprorm::from::<Person>(DialectKind::Postgres.build())
//!     .where_(|p| p.age.gte(18) & p.name.starts_with("A"))
//!     .order_by(|p| p.age.desc())
//!     .limit(10)
//!     .to_select_statement()?;
//!
//! assert_eq!(
//!     built.sql,
//!     r#"SELECT "id", "name", "age" FROM "people" WHERE ("age" >= $1) AND (UPPER("name") LIKE $2) ORDER BY "age" DESC LIMIT 10"#,
//! );
//! ```

extern crate self as exprorm;

pub mod config;
pub mod dialect;
pub mod error;
pub mod expr;
pub mod func;
pub mod ident;
pub mod meta;
pub mod prelude;
pub mod qb;
pub mod sql;
pub mod value;
pub mod visitor;

mod log;

#[cfg(test)]
mod testing;

pub use config::{QueryConfig, Settings};
pub use dialect::{Dialect, DialectKind, MatchCase};
pub use error::{OrmError, OrmResult};
pub use expr::{Expr, Field, Operand, Projection};
pub use ident::Ident;
pub use meta::{ColumnDef, Entity, TableDef};
pub use qb::{BuiltQuery, JoinKind, SqlExpression, StatementKind, from, with_settings};
pub use sql::{ParamList, Sql};
pub use value::{EnumRepr, EnumValue, SqlType, Value, ValueKind};
pub use visitor::ExprVisitor;

#[cfg(feature = "derive")]
pub use exprorm_derive::{Entity, SqlEnum};
