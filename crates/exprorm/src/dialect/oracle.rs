use super::{Dialect, DialectKind, MatchCase, dialect_options, hex, offset_fetch};
use crate::sql::{Sql, push_usize};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Oracle: `:N` placeholders, `MOD`, `SUBSTR`, typed date literals.
#[derive(Debug, Clone, Default)]
pub struct OracleDialect {
    string_match: MatchCase,
}

dialect_options!(OracleDialect);

impl Dialect for OracleDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::Oracle
    }

    fn string_match(&self) -> MatchCase {
        self.string_match
    }

    fn write_placeholder(&self, out: &mut String, index: usize) {
        out.push(':');
        push_usize(out, index);
    }

    fn quote_date(&self, v: &NaiveDate) -> String {
        format!("DATE '{}'", v.format("%Y-%m-%d"))
    }

    fn quote_datetime(&self, v: &NaiveDateTime) -> String {
        format!("TIMESTAMP '{}'", v.format("%Y-%m-%d %H:%M:%S%.f"))
    }

    fn quote_timestamp(&self, v: &DateTime<Utc>) -> String {
        format!("TIMESTAMP '{}'", v.format("%Y-%m-%d %H:%M:%S%.f +00:00"))
    }

    fn quote_bytes(&self, v: &[u8]) -> String {
        format!("HEXTORAW('{}')", hex(v))
    }

    fn substring(&self, expr: Sql, start: Sql, length: Option<Sql>) -> Sql {
        let mut args = vec![expr, start];
        args.extend(length);
        Sql::function("SUBSTR", args)
    }

    fn ceiling_function(&self) -> &'static str {
        "CEIL"
    }

    fn modulo(&self, left: Sql, right: Sql) -> Sql {
        Sql::function("MOD", [left, right])
    }

    fn limit_clause(&self, rows: Option<u64>, skip: Option<u64>, _has_order_by: bool) -> Option<String> {
        offset_fetch(rows, skip)
    }
}
