//! Safe SQL identifier handling.
//!
//! [`Ident`] is a validated, possibly schema-qualified name that is always
//! emitted quoted in the target dialect's style. Any character except NUL is
//! allowed in a part; embedded closing quotes are escaped by the dialect.
//!
//! # Example
//! ```ignore
//! use exprorm::{Ident, PostgresDialect};
//!
//! let alias = Ident::quoted("Full Name")?;
//! assert_eq!(alias.to_sql(&PostgresDialect::new()), r#""Full Name""#);
//! # Ok::<(), exprorm::OrmError>(())
//! ```

use crate::dialect::Dialect;
use crate::error::{OrmError, OrmResult};
use crate::meta::TableDef;

/// A SQL identifier (alias, table, or schema-qualified table).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    parts: Vec<String>,
}

impl Ident {
    /// Create a single-part identifier.
    pub fn quoted(name: &str) -> OrmResult<Self> {
        validate_part(name)?;
        Ok(Self {
            parts: vec![name.to_string()],
        })
    }

    /// Create a `schema.name` identifier.
    pub fn qualified(schema: &str, name: &str) -> OrmResult<Self> {
        validate_part(schema)?;
        validate_part(name)?;
        Ok(Self {
            parts: vec![schema.to_string(), name.to_string()],
        })
    }

    /// The identifier of a mapped table, schema-qualified when a schema is set.
    pub fn table(table: &TableDef) -> OrmResult<Self> {
        match table.schema {
            Some(schema) => Self::qualified(schema, table.name),
            None => Self::quoted(table.name),
        }
    }

    /// The unqualified (last) part.
    pub fn name(&self) -> &str {
        self.parts.last().map(String::as_str).unwrap_or_default()
    }

    /// Render the identifier quoted for `dialect`.
    pub fn to_sql(&self, dialect: &dyn Dialect) -> String {
        let mut out = String::with_capacity(self.parts.iter().map(|p| p.len() + 3).sum());
        self.write_sql(dialect, &mut out);
        out
    }

    pub(crate) fn write_sql(&self, dialect: &dyn Dialect, out: &mut String) {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            out.push_str(&dialect.quote_ident(part));
        }
    }
}

fn validate_part(name: &str) -> OrmResult<()> {
    if name.is_empty() {
        return Err(OrmError::validation("Identifier cannot be empty"));
    }
    if name.contains('\0') {
        return Err(OrmError::validation(
            "Identifier cannot contain NUL character",
        ));
    }
    Ok(())
}

/// Quote `name` by wrapping it in `open`/`close`, doubling any embedded `close`.
pub(crate) fn quote_with(name: &str, open: char, close: char) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    out.push(open);
    for ch in name.chars() {
        if ch == close {
            out.push(close);
        }
        out.push(ch);
    }
    out.push(close);
    out
}
