//! Query compilation settings.
//!
//! [`QueryConfig`] is carried by every query builder. [`Settings`] bundles
//! it with a dialect choice and can be loaded from TOML:
//!
//! ```toml
//! dialect = "postgres"
//!
//! [query]
//! parameterize = true
//! prefix_field_with_table_name = false
//! string_match = "sensitive"
//! max_logged_sql_length = 500
//! ```

use crate::dialect::{Dialect, DialectKind, MatchCase};
use crate::error::{OrmError, OrmResult};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

/// Options controlling how expressions are compiled and statements logged.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QueryConfig {
    /// Bind literals as parameters (`true`) or inline them quoted by the
    /// dialect (`false`). `NULL` is always inlined.
    pub parameterize: bool,
    /// Qualify every column with its table name, even without joins.
    pub prefix_field_with_table_name: bool,
    /// Overrides the dialect's default case sensitivity of string matching.
    pub string_match: Option<MatchCase>,
    /// Maximum SQL length (bytes) in log events; `None` logs it whole.
    pub max_logged_sql_length: Option<usize>,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            parameterize: true,
            prefix_field_with_table_name: false,
            string_match: None,
            max_logged_sql_length: Some(200),
        }
    }
}

impl QueryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parameterize(mut self, parameterize: bool) -> Self {
        self.parameterize = parameterize;
        self
    }

    /// Inline literals instead of binding them.
    pub fn inline_literals(self) -> Self {
        self.parameterize(false)
    }

    pub fn prefix_field_with_table_name(mut self, prefix: bool) -> Self {
        self.prefix_field_with_table_name = prefix;
        self
    }

    pub fn string_match(mut self, case: MatchCase) -> Self {
        self.string_match = Some(case);
        self
    }

    pub fn max_logged_sql_length(mut self, max: Option<usize>) -> Self {
        self.max_logged_sql_length = max;
        self
    }
}

/// Dialect choice plus query options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    pub dialect: DialectKind,
    #[serde(default)]
    pub query: QueryConfig,
}

impl Settings {
    pub fn new(dialect: DialectKind) -> Self {
        Self {
            dialect,
            query: QueryConfig::default(),
        }
    }

    /// Parse settings from a TOML document.
    pub fn from_toml_str(s: &str) -> OrmResult<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Read and parse a TOML settings file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> OrmResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| OrmError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Build the configured dialect.
    pub fn build_dialect(&self) -> Arc<dyn Dialect> {
        self.dialect.build()
    }
}
