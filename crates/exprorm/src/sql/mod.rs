//! SQL fragments and parameters.
//!
//! Compiled clauses are kept as [`Sql`] fragments: raw text, bound values and
//! column references. A fragment only becomes a string when a statement is
//! emitted, at which point the dialect numbers placeholders and quotes
//! identifiers.
//!
//! ```ignore
//! use exprorm::{Sql, PostgresDialect, RenderOptions};
//!
//! let mut q = Sql::new("SELECT * FROM t WHERE a = ");
//! q.push_bind(1).push(" AND b = ").push_bind("x");
//! let (text, params) = q.render(RenderOptions { dialect: &PostgresDialect::new(), prefix_columns: false });
//! assert_eq!(text, "SELECT * FROM t WHERE a = $1 AND b = $2");
//! ```

mod builder;
mod params;
mod parts;


pub use builder::{RenderOptions, Sql};
pub(crate) use builder::push_usize;
pub use params::ParamList;
