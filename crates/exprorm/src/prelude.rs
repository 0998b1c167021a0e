//! Convenient imports for typical `exprorm` usage.
//!
//! ```ignore
//! use exprorm::prelude::*;
//! ```
//!
//! Brings the expression traits into scope, which closures need for
//! `p.age.gt(1)`, `p.name.starts_with("A")` and friends.

pub use crate::expr::{BoolExpr, NumericExpr, SqlExpr, TextExpr};
pub use crate::{
    BuiltQuery, Dialect, DialectKind, Entity, Expr, Field, MatchCase, OrmError, OrmResult,
    QueryConfig, Settings, SqlExpression, SqlType, Value, func,
};

#[cfg(feature = "derive")]
pub use crate::SqlEnum;
