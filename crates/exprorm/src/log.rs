//! `tracing` events for compiled statements.
//!
//! All events use the `exprorm::sql` target, so they can be enabled on their
//! own with e.g. `RUST_LOG=exprorm::sql=debug`.

use crate::config::QueryConfig;
use crate::error::OrmError;
use crate::qb::BuiltQuery;

/// Cut `sql` to at most `max_bytes`, on a char boundary.
pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

fn display_sql(sql: &str, max: Option<usize>) -> String {
    match max {
        Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
        _ => sql.to_string(),
    }
}

pub(crate) fn statement_built(built: &BuiltQuery, config: &QueryConfig) {
    tracing::debug!(
        target: "exprorm::sql",
        kind = %built.kind,
        param_count = built.params.len(),
        sql = %display_sql(&built.sql, config.max_logged_sql_length),
        "statement built",
    );
}

pub(crate) fn clause_compiled(clause: &'static str, table: &str) {
    tracing::trace!(target: "exprorm::sql", clause, table, "clause compiled");
}

pub(crate) fn clause_failed(clause: &'static str, table: &str, error: &OrmError) {
    tracing::warn!(
        target: "exprorm::sql",
        clause,
        table,
        error = %error,
        "clause failed to compile; error deferred to emission",
    );
}
