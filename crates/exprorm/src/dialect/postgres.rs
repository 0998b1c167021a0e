use super::{Dialect, DialectKind, MatchCase, dialect_options, hex};
use crate::sql::{Sql, push_usize};

/// PostgreSQL: `$n` placeholders, native booleans.
#[derive(Debug, Clone, Default)]
pub struct PostgresDialect {
    string_match: MatchCase,
}

dialect_options!(PostgresDialect);

impl Dialect for PostgresDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::Postgres
    }

    fn string_match(&self) -> MatchCase {
        self.string_match
    }

    fn write_placeholder(&self, out: &mut String, index: usize) {
        out.push('$');
        push_usize(out, index);
    }

    fn bool_literal(&self, value: bool) -> &'static str {
        if value { "TRUE" } else { "FALSE" }
    }

    fn quote_bytes(&self, v: &[u8]) -> String {
        format!("'\\x{}'::bytea", hex(v))
    }

    fn substring(&self, expr: Sql, start: Sql, length: Option<Sql>) -> Sql {
        let mut sql = Sql::new("SUBSTRING(");
        sql.push_sql(expr).push(" FROM ").push_sql(start);
        if let Some(length) = length {
            sql.push(" FOR ").push_sql(length);
        }
        sql.push(")");
        sql
    }
}
