//! Per-entity query builder.
//!
//! [`SqlExpression`] accumulates clauses for one entity type and emits
//! `SELECT`, `COUNT`, scalar, `INSERT`, `UPDATE` and `DELETE` statements as
//! [`BuiltQuery`] values.
//!
//! ```ignore
//! use exprorm::prelude::*;
//!
//! let dialect = DialectKind::Postgres.build();
//! let built = exprorm::from::<Person>(dialect)
//!     .where_(|p| p.age.gte(18))
//!     .order_by(|p| p.name)
//!     .limit(20)
//!     .to_select_statement()?;
//!
//! let rows = client.query(&built.sql, &built.params_ref()).await?;
//! ```

mod built;
mod emit;
mod expression;


pub use built::{BuiltQuery, StatementKind};
pub use expression::{JoinKind, SqlExpression};

use crate::config::Settings;
use crate::dialect::Dialect;
use crate::meta::Entity;
use std::sync::Arc;

/// Start a query over `E` with the default configuration.
///
/// # Example
/// ```ignore
/// let q = exprorm::from::<Person>(DialectKind::Sqlite.build());
/// ```
pub fn from<E: Entity>(dialect: Arc<dyn Dialect>) -> SqlExpression<E> {
    SqlExpression::new(dialect)
}

/// Start a query over `E` using loaded settings.
pub fn with_settings<E: Entity>(settings: &Settings) -> SqlExpression<E> {
    SqlExpression::from_settings(settings)
}
