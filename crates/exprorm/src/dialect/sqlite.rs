use super::{Dialect, DialectKind, MatchCase, dialect_options};
use crate::sql::Sql;

/// SQLite: `?` placeholders, integer booleans.
#[derive(Debug, Clone, Default)]
pub struct SqliteDialect {
    string_match: MatchCase,
}

dialect_options!(SqliteDialect);

impl Dialect for SqliteDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::Sqlite
    }

    fn string_match(&self) -> MatchCase {
        self.string_match
    }

    fn write_placeholder(&self, out: &mut String, _index: usize) {
        out.push('?');
    }

    fn substring(&self, expr: Sql, start: Sql, length: Option<Sql>) -> Sql {
        let mut args = vec![expr, start];
        args.extend(length);
        Sql::function("SUBSTR", args)
    }

    fn ceiling_function(&self) -> &'static str {
        "CEIL"
    }

    fn limit_clause(&self, rows: Option<u64>, skip: Option<u64>, _has_order_by: bool) -> Option<String> {
        match (rows, skip) {
            (None, None) => None,
            (Some(rows), None) => Some(format!(" LIMIT {rows}")),
            (Some(rows), Some(skip)) => Some(format!(" LIMIT {rows} OFFSET {skip}")),
            // OFFSET is only valid after LIMIT.
            (None, Some(skip)) => Some(format!(" LIMIT -1 OFFSET {skip}")),
        }
    }
}
