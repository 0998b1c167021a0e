//! SQL dialect capabilities.
//!
//! The compiler is written once against [`Dialect`]; everything that differs
//! between databases (identifier and literal quoting, placeholder syntax,
//! string functions, paging) is asked of the dialect.
//!
//! ```ignore
//! use exprorm::{DialectKind, MatchCase};
//!
//! let pg = DialectKind::Postgres.build();
//! let sqlite = DialectKind::Sqlite.build_with(MatchCase::Sensitive);
//! ```

mod mysql;
mod oracle;
mod postgres;
mod sqlite;
mod sqlserver;

#[cfg(test)]
mod tests;

pub use mysql::MySqlDialect;
pub use oracle::OracleDialect;
pub use postgres::PostgresDialect;
pub use sqlite::SqliteDialect;
pub use sqlserver::SqlServerDialect;

use crate::error::{OrmError, OrmResult};
use crate::ident::quote_with;
use crate::sql::Sql;
use crate::value::{EnumRepr, EnumValue, Value};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Case sensitivity of `starts_with`/`ends_with`/`contains`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchCase {
    /// Compare upper-cased receiver and pattern.
    #[default]
    Insensitive,
    /// Compare as stored.
    Sensitive,
}

/// Supported databases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectKind {
    Postgres,
    Sqlite,
    #[serde(alias = "mariadb")]
    MySql,
    #[serde(alias = "mssql")]
    SqlServer,
    Oracle,
}

impl DialectKind {
    /// Build the dialect with its default options.
    pub fn build(self) -> Arc<dyn Dialect> {
        self.build_with(MatchCase::default())
    }

    /// Build the dialect with an explicit string-match default.
    pub fn build_with(self, string_match: MatchCase) -> Arc<dyn Dialect> {
        match self {
            DialectKind::Postgres => {
                Arc::new(PostgresDialect::new().with_string_match(string_match))
            }
            DialectKind::Sqlite => Arc::new(SqliteDialect::new().with_string_match(string_match)),
            DialectKind::MySql => Arc::new(MySqlDialect::new().with_string_match(string_match)),
            DialectKind::SqlServer => {
                Arc::new(SqlServerDialect::new().with_string_match(string_match))
            }
            DialectKind::Oracle => Arc::new(OracleDialect::new().with_string_match(string_match)),
        }
    }
}

impl fmt::Display for DialectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DialectKind::Postgres => "postgres",
            DialectKind::Sqlite => "sqlite",
            DialectKind::MySql => "mysql",
            DialectKind::SqlServer => "sqlserver",
            DialectKind::Oracle => "oracle",
        };
        f.write_str(name)
    }
}

/// Database-specific SQL syntax.
///
/// Default methods follow ANSI SQL; implementations override what differs.
pub trait Dialect: fmt::Debug + Send + Sync {
    fn kind(&self) -> DialectKind;

    /// Default case sensitivity of string matching.
    fn string_match(&self) -> MatchCase;

    // ---- identifiers and placeholders ----

    /// Opening and closing identifier quote characters.
    fn identifier_quotes(&self) -> (char, char) {
        ('"', '"')
    }

    fn quote_ident(&self, name: &str) -> String {
        let (open, close) = self.identifier_quotes();
        quote_with(name, open, close)
    }

    /// Write the placeholder for the 1-based parameter `index`.
    fn write_placeholder(&self, out: &mut String, index: usize);

    // ---- literals ----

    fn null_literal(&self) -> &'static str {
        "NULL"
    }

    fn bool_literal(&self, value: bool) -> &'static str {
        if value { "1" } else { "0" }
    }

    fn quote_string(&self, s: &str) -> String {
        quote_with(s, '\'', '\'')
    }

    fn quote_float(&self, v: f64) -> OrmResult<String> {
        if !v.is_finite() {
            return Err(OrmError::invalid_value(format!(
                "{v} cannot be written as a SQL literal"
            )));
        }
        Ok(format!("{v:?}"))
    }

    fn quote_date(&self, v: &NaiveDate) -> String {
        format!("'{}'", v.format("%Y-%m-%d"))
    }

    fn quote_time(&self, v: &NaiveTime) -> String {
        format!("'{}'", v.format("%H:%M:%S%.f"))
    }

    fn quote_datetime(&self, v: &NaiveDateTime) -> String {
        format!("'{}'", v.format("%Y-%m-%d %H:%M:%S%.f"))
    }

    fn quote_timestamp(&self, v: &DateTime<Utc>) -> String {
        format!("'{}'", v.format("%Y-%m-%d %H:%M:%S%.f+00:00"))
    }

    fn quote_uuid(&self, v: &Uuid) -> String {
        format!("'{}'", v.hyphenated())
    }

    fn quote_bytes(&self, v: &[u8]) -> String {
        format!("X'{}'", hex(v))
    }

    fn quote_enum(&self, v: &EnumValue) -> String {
        match v.repr {
            EnumRepr::Int => v.ordinal.to_string(),
            EnumRepr::Text => self.quote_string(v.name),
        }
    }

    /// Render a value inline as a literal.
    fn quote_value(&self, value: &Value) -> OrmResult<String> {
        let literal = match value {
            Value::Null => self.null_literal().to_string(),
            Value::Bool(v) => self.bool_literal(*v).to_string(),
            Value::Int(v) => v.to_string(),
            Value::Float(v) => self.quote_float(*v)?,
            Value::Text(v) => self.quote_string(v),
            Value::Date(v) => self.quote_date(v),
            Value::Time(v) => self.quote_time(v),
            Value::DateTime(v) => self.quote_datetime(v),
            Value::Timestamp(v) => self.quote_timestamp(v),
            Value::Uuid(v) => self.quote_uuid(v),
            Value::Enum(v) => self.quote_enum(v),
            Value::Bytes(v) => self.quote_bytes(v),
            Value::Json(v) => self.quote_string(&v.to_string()),
            Value::List(_) => {
                return Err(OrmError::invalid_value(
                    "a list can only appear on the right-hand side of IN",
                ));
            }
        };
        Ok(literal)
    }

    // ---- string matching ----

    /// Characters that must be escaped inside a `LIKE` pattern.
    fn like_wildcards(&self) -> &'static [char] {
        &['%', '_']
    }

    fn like_escape_char(&self) -> char {
        '\\'
    }

    /// Suffix appended after a pattern that contains escapes.
    fn like_escape_clause(&self) -> String {
        format!(" ESCAPE {}", self.quote_string(&self.like_escape_char().to_string()))
    }

    // ---- functions ----

    /// Concatenate string expressions.
    fn concat(&self, parts: Vec<Sql>) -> Sql {
        Sql::join(parts, " || ").wrap("(", ")")
    }

    /// Substring with a 1-based `start`.
    fn substring(&self, expr: Sql, start: Sql, length: Option<Sql>) -> Sql {
        let mut args = vec![expr, start];
        args.extend(length);
        Sql::function("SUBSTRING", args)
    }

    fn length_function(&self) -> &'static str {
        "LENGTH"
    }

    fn ceiling_function(&self) -> &'static str {
        "CEILING"
    }

    fn modulo(&self, left: Sql, right: Sql) -> Sql {
        let mut sql = Sql::new("(");
        sql.push_sql(left).push(" % ").push_sql(right).push(")");
        sql
    }

    // ---- paging ----

    /// Whether paging is only valid after an `ORDER BY`.
    fn paging_requires_order_by(&self) -> bool {
        false
    }

    /// Paging clause (with its leading space) for `rows`/`skip`.
    fn limit_clause(&self, rows: Option<u64>, skip: Option<u64>, _has_order_by: bool) -> Option<String> {
        match (rows, skip) {
            (None, None) => None,
            (Some(rows), None) => Some(format!(" LIMIT {rows}")),
            (Some(rows), Some(skip)) => Some(format!(" LIMIT {rows} OFFSET {skip}")),
            (None, Some(skip)) => Some(format!(" OFFSET {skip}")),
        }
    }
}

/// `OFFSET n ROWS FETCH NEXT m ROWS ONLY`, shared by SQL Server and Oracle.
pub(crate) fn offset_fetch(rows: Option<u64>, skip: Option<u64>) -> Option<String> {
    if rows.is_none() && skip.is_none() {
        return None;
    }
    let mut out = format!(" OFFSET {} ROWS", skip.unwrap_or(0));
    if let Some(rows) = rows {
        out.push_str(&format!(" FETCH NEXT {rows} ROWS ONLY"));
    }
    Some(out)
}

pub(crate) fn hex(bytes: &[u8]) -> String {
    const DIGITS: &[u8; 16] = b"0123456789ABCDEF";
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        out.push(DIGITS[(b >> 4) as usize] as char);
        out.push(DIGITS[(b & 0x0f) as usize] as char);
    }
    out
}

/// Generates the constructor and option setters every dialect shares.
macro_rules! dialect_options {
    ($ty:ident) => {
        impl $ty {
            pub fn new() -> Self {
                Self::default()
            }

            /// Override the default case sensitivity of string matching.
            pub fn with_string_match(mut self, string_match: $crate::dialect::MatchCase) -> Self {
                self.string_match = string_match;
                self
            }
        }
    };
}
pub(crate) use dialect_options;
