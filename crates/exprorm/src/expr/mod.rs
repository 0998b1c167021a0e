//! Typed expression trees.
//!
//! Closures passed to the query builder receive typed [`Field`] handles and
//! build an [`Expr`] with ordinary method calls and operators:
//!
//! ```ignore
//! use exprorm::prelude::*;
//!
//! let q = exprorm::from::<Person>(dialect)
//!     .where_(|p| (p.age.gte(18) & p.city.eq("Paris")) | p.name.starts_with("A"));
//! ```
//!
//! Types decide which operations exist: `+` is only defined for numeric
//! expressions, string functions only for text, `&`/`|`/`!` only for
//! booleans. The resulting [`Node`] tree is what the visitor compiles.

mod node;
mod ops;
mod projection;
mod typed;

pub use node::{BinaryOp, MemberRef, Method, MethodCall, Node, ProjectionMember, UnaryOp};
pub use ops::{BoolExpr, BoolType, NumericExpr, NumericType, SqlExpr, TextExpr, TextType};
pub use projection::Projection;
pub use typed::{Expr, Field, Operand};
