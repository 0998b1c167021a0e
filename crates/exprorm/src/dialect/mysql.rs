use super::{Dialect, DialectKind, MatchCase, dialect_options};
use crate::sql::Sql;

/// MySQL / MariaDB: backtick identifiers, `?` placeholders, backslash
/// escapes inside string literals.
#[derive(Debug, Clone, Default)]
pub struct MySqlDialect {
    string_match: MatchCase,
}

dialect_options!(MySqlDialect);

impl Dialect for MySqlDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::MySql
    }

    fn string_match(&self) -> MatchCase {
        self.string_match
    }

    fn identifier_quotes(&self) -> (char, char) {
        ('`', '`')
    }

    fn write_placeholder(&self, out: &mut String, _index: usize) {
        out.push('?');
    }

    fn quote_string(&self, s: &str) -> String {
        let mut out = String::with_capacity(s.len() + 2);
        out.push('\'');
        for ch in s.chars() {
            match ch {
                '\'' => out.push_str("''"),
                '\\' => out.push_str("\\\\"),
                '\0' => out.push_str("\\0"),
                c => out.push(c),
            }
        }
        out.push('\'');
        out
    }

    fn concat(&self, parts: Vec<Sql>) -> Sql {
        Sql::function("CONCAT", parts)
    }

    fn limit_clause(&self, rows: Option<u64>, skip: Option<u64>, _has_order_by: bool) -> Option<String> {
        match (rows, skip) {
            (None, None) => None,
            (Some(rows), None) => Some(format!(" LIMIT {rows}")),
            (Some(rows), Some(skip)) => Some(format!(" LIMIT {rows} OFFSET {skip}")),
            (None, Some(skip)) => Some(format!(" LIMIT {} OFFSET {skip}", u64::MAX)),
        }
    }
}
