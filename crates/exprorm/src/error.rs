//! Error types for exprorm

use thiserror::Error;

/// Result type alias for exprorm operations
pub type OrmResult<T> = Result<T, OrmError>;

/// Errors raised while compiling expressions into SQL.
///
/// Every failure is local to the compile step and reported synchronously.
/// Compilation is deterministic, so none of these are worth retrying.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OrmError {
    /// The expression tree contains a shape the compiler does not translate
    /// (unknown method, wrong arity, non-boolean predicate, ...).
    #[error("Unsupported expression: {0}")]
    UnsupportedExpression(String),

    /// A member access did not resolve to a mapped column.
    #[error("Column not found: '{member}' is not a mapped column of '{table}'")]
    ColumnNotFound { table: String, member: String },

    /// A value could not be rendered by the dialect.
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// Builder misuse or invalid input (identifiers, missing WHERE, ...).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl OrmError {
    /// Create an unsupported expression error
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::UnsupportedExpression(message.into())
    }

    /// Create a column not found error
    pub fn column_not_found(table: impl Into<String>, member: impl Into<String>) -> Self {
        Self::ColumnNotFound {
            table: table.into(),
            member: member.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(message: impl Into<String>) -> Self {
        Self::InvalidValue(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Check if this is an unsupported expression error
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::UnsupportedExpression(_))
    }

    /// Check if this is a column not found error
    pub fn is_column_not_found(&self) -> bool {
        matches!(self, Self::ColumnNotFound { .. })
    }
}

impl From<toml::de::Error> for OrmError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}
