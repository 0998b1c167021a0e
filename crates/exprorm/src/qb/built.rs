use crate::sql::ParamList;
use std::fmt;

/// Which statement a [`BuiltQuery`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    Select,
    Count,
    Scalar,
    Insert,
    Update,
    Delete,
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StatementKind::Select => "select",
            StatementKind::Count => "count",
            StatementKind::Scalar => "scalar",
            StatementKind::Insert => "insert",
            StatementKind::Update => "update",
            StatementKind::Delete => "delete",
        };
        f.write_str(s)
    }
}

/// A rendered statement and its parameters, in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    pub kind: StatementKind,
    pub sql: String,
    pub params: ParamList,
}

impl BuiltQuery {
    /// Parameter refs compatible with `tokio-postgres`.
    #[cfg(feature = "postgres")]
    pub fn params_ref(&self) -> Vec<&(dyn tokio_postgres::types::ToSql + Sync)> {
        self.params.as_refs()
    }
}

impl fmt::Display for BuiltQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}
