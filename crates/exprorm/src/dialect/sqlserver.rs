use super::{Dialect, DialectKind, MatchCase, dialect_options, hex, offset_fetch};
use crate::sql::{Sql, push_usize};

/// SQL Server: bracket identifiers, `@pN` placeholders, `OFFSET ... FETCH`
/// paging.
#[derive(Debug, Clone, Default)]
pub struct SqlServerDialect {
    string_match: MatchCase,
}

dialect_options!(SqlServerDialect);

impl Dialect for SqlServerDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::SqlServer
    }

    fn string_match(&self) -> MatchCase {
        self.string_match
    }

    fn identifier_quotes(&self) -> (char, char) {
        ('[', ']')
    }

    fn write_placeholder(&self, out: &mut String, index: usize) {
        out.push_str("@p");
        push_usize(out, index);
    }

    fn quote_string(&self, s: &str) -> String {
        format!("N{}", crate::ident::quote_with(s, '\'', '\''))
    }

    fn quote_bytes(&self, v: &[u8]) -> String {
        format!("0x{}", hex(v))
    }

    fn like_wildcards(&self) -> &'static [char] {
        &['%', '_', '[']
    }

    fn concat(&self, parts: Vec<Sql>) -> Sql {
        Sql::function("CONCAT", parts)
    }

    fn substring(&self, expr: Sql, start: Sql, length: Option<Sql>) -> Sql {
        // SUBSTRING requires a length; LEN of the receiver is always enough.
        let length = match length {
            Some(length) => length,
            None => Sql::function("LEN", [expr.clone()]),
        };
        Sql::function("SUBSTRING", [expr, start, length])
    }

    fn length_function(&self) -> &'static str {
        "LEN"
    }

    fn paging_requires_order_by(&self) -> bool {
        true
    }

    fn limit_clause(&self, rows: Option<u64>, skip: Option<u64>, has_order_by: bool) -> Option<String> {
        let paging = offset_fetch(rows, skip)?;
        if has_order_by {
            Some(paging)
        } else {
            Some(format!(" ORDER BY (SELECT NULL){paging}"))
        }
    }
}
