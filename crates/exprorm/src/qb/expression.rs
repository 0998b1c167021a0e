//! Per-query clause state.

use crate::config::{QueryConfig, Settings};
use crate::dialect::Dialect;
use crate::error::{OrmError, OrmResult};
use crate::expr::{BoolType, Projection, ProjectionMember, SqlExpr};
use crate::log;
use crate::meta::{ColumnDef, Entity, TableDef};
use crate::sql::Sql;
use crate::value::Value;
use crate::visitor::{ExprVisitor, OrderKey};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
}

impl JoinKind {
    pub(crate) fn as_sql(self) -> &'static str {
        match self {
            JoinKind::Inner => " INNER JOIN ",
            JoinKind::Left => " LEFT JOIN ",
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Join {
    pub(crate) kind: JoinKind,
    pub(crate) table: &'static TableDef,
    pub(crate) on: Sql,
}

#[derive(Debug, Clone)]
pub(crate) struct SelectList {
    pub(crate) distinct: bool,
    pub(crate) columns: Vec<Sql>,
}

/// Clause accumulator for queries over entity `E`.
///
/// Every clause method consumes and returns the builder. Predicates and
/// selectors are compiled as soon as they are added; the first failure is
/// kept and reported by [`validate`](Self::validate) and by every
/// `to_*_statement` method, so chains never need intermediate `?`.
///
/// ```ignore
/// let q = exprorm::from::<Person>(dialect)
///     .where_(|p| p.age.gte(18))
///     .and(|p| p.city.eq("Paris"))
///     .order_by(|p| (p.name, p.age.desc()))
///     .limit_skip(20, 10);
/// let built = q.to_select_statement()?;
/// ```
pub struct SqlExpression<E: Entity> {
    pub(crate) dialect: Arc<dyn Dialect>,
    pub(crate) config: QueryConfig,
    /// The queried table first, then joined tables.
    pub(crate) tables: Vec<&'static TableDef>,
    pub(crate) joins: Vec<Join>,
    pub(crate) where_clause: Option<Sql>,
    pub(crate) order_by: Vec<OrderKey>,
    pub(crate) select: Option<SelectList>,
    pub(crate) group_by: Vec<Sql>,
    pub(crate) having: Option<Sql>,
    pub(crate) insert_fields: Vec<&'static ColumnDef>,
    pub(crate) update_fields: Vec<&'static ColumnDef>,
    pub(crate) rows: Option<u64>,
    pub(crate) skip: Option<u64>,
    pub(crate) allow_delete_all: bool,
    build_error: Option<OrmError>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> Clone for SqlExpression<E> {
    fn clone(&self) -> Self {
        Self {
            dialect: Arc::clone(&self.dialect),
            config: self.config.clone(),
            tables: self.tables.clone(),
            joins: self.joins.clone(),
            where_clause: self.where_clause.clone(),
            order_by: self.order_by.clone(),
            select: self.select.clone(),
            group_by: self.group_by.clone(),
            having: self.having.clone(),
            insert_fields: self.insert_fields.clone(),
            update_fields: self.update_fields.clone(),
            rows: self.rows,
            skip: self.skip,
            allow_delete_all: self.allow_delete_all,
            build_error: self.build_error.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> fmt::Debug for SqlExpression<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqlExpression")
            .field("table", &E::table_def().name)
            .field("dialect", &self.dialect.kind())
            .field("where_clause", &self.where_clause)
            .field("order_by", &self.order_by)
            .field("rows", &self.rows)
            .field("skip", &self.skip)
            .field("build_error", &self.build_error)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Copy)]
enum Combine {
    Replace,
    And,
    Or,
}

impl<E: Entity> SqlExpression<E> {
    /// Create an empty query with the default configuration.
    pub fn new(dialect: Arc<dyn Dialect>) -> Self {
        Self::with_config(dialect, QueryConfig::default())
    }

    pub fn with_config(dialect: Arc<dyn Dialect>, config: QueryConfig) -> Self {
        Self {
            dialect,
            config,
            tables: vec![E::table_def()],
            joins: Vec::new(),
            where_clause: None,
            order_by: Vec::new(),
            select: None,
            group_by: Vec::new(),
            having: None,
            insert_fields: Vec::new(),
            update_fields: Vec::new(),
            rows: None,
            skip: None,
            allow_delete_all: false,
            build_error: None,
            _entity: PhantomData,
        }
    }

    /// Create an empty query from loaded settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::with_config(settings.build_dialect(), settings.query.clone())
    }

    pub fn dialect(&self) -> &dyn Dialect {
        self.dialect.as_ref()
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// The first deferred compile error, if any.
    pub fn build_error(&self) -> Option<&OrmError> {
        self.build_error.as_ref()
    }

    /// Fail with the first error recorded while adding clauses.
    pub fn validate(&self) -> OrmResult<()> {
        match &self.build_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    /// Compile with a visitor over the current tables and store the result,
    /// or record the first error.
    fn compile<R>(
        mut self,
        clause: &'static str,
        compile: impl FnOnce(&ExprVisitor<'_>) -> OrmResult<R>,
        apply: impl FnOnce(&mut Self, R),
    ) -> Self {
        if self.build_error.is_some() {
            return self;
        }
        let table = E::table_def().name;
        let result = {
            let visitor = ExprVisitor::new(self.dialect.as_ref(), &self.config, &self.tables);
            compile(&visitor)
        };
        match result {
            Ok(value) => {
                log::clause_compiled(clause, table);
                apply(&mut self, value);
            }
            Err(err) => {
                log::clause_failed(clause, table, &err);
                self.build_error = Some(err);
            }
        }
        self
    }

    fn set_where(&mut self, combine: Combine, predicate: Sql) {
        self.where_clause = Some(match (combine, self.where_clause.take()) {
            (Combine::And, Some(existing)) => combine_sql(existing, "AND", predicate),
            (Combine::Or, Some(existing)) => combine_sql(existing, "OR", predicate),
            _ => predicate,
        });
    }

    fn add_where<R>(self, clause: &'static str, combine: Combine, f: impl FnOnce(E::Fields) -> R) -> Self
    where
        R: SqlExpr<Ty: BoolType>,
    {
        self.compile(
            clause,
            |v| v.compile_predicate(&f(E::fields()).into_node()),
            |q, sql| q.set_where(combine, sql),
        )
    }

    fn add_where_with<J: Entity, R>(
        self,
        clause: &'static str,
        combine: Combine,
        f: impl FnOnce(E::Fields, J::Fields) -> R,
    ) -> Self
    where
        R: SqlExpr<Ty: BoolType>,
    {
        self.compile(
            clause,
            |v| v.compile_predicate(&f(E::fields(), J::fields()).into_node()),
            |q, sql| q.set_where(combine, sql),
        )
    }

    // ==================== WHERE ====================

    /// Replace the WHERE clause.
    pub fn where_<R: SqlExpr<Ty: BoolType>>(self, f: impl FnOnce(E::Fields) -> R) -> Self {
        self.add_where("where", Combine::Replace, f)
    }

    /// `(existing) AND (predicate)`; same as `where_` when there is no WHERE yet.
    pub fn and<R: SqlExpr<Ty: BoolType>>(self, f: impl FnOnce(E::Fields) -> R) -> Self {
        self.add_where("where", Combine::And, f)
    }

    /// `(existing) OR (predicate)`; same as `where_` when there is no WHERE yet.
    pub fn or<R: SqlExpr<Ty: BoolType>>(self, f: impl FnOnce(E::Fields) -> R) -> Self {
        self.add_where("where", Combine::Or, f)
    }

    /// Replace the WHERE clause with a predicate over `E` and joined `J`.
    pub fn where_with<J: Entity, R: SqlExpr<Ty: BoolType>>(
        self,
        f: impl FnOnce(E::Fields, J::Fields) -> R,
    ) -> Self {
        self.add_where_with::<J, R>("where", Combine::Replace, f)
    }

    pub fn and_with<J: Entity, R: SqlExpr<Ty: BoolType>>(
        self,
        f: impl FnOnce(E::Fields, J::Fields) -> R,
    ) -> Self {
        self.add_where_with::<J, R>("where", Combine::And, f)
    }

    pub fn or_with<J: Entity, R: SqlExpr<Ty: BoolType>>(
        self,
        f: impl FnOnce(E::Fields, J::Fields) -> R,
    ) -> Self {
        self.add_where_with::<J, R>("where", Combine::Or, f)
    }

    /// Replace the WHERE clause with a raw condition; `?` placeholders are
    /// bound to `values` in order.
    ///
    /// ```ignore
    /// q.where_template("age BETWEEN ? AND ?", [18, 65])
    /// ```
    pub fn where_template<V: Into<Value>>(self, template: &str, values: impl IntoIterator<Item = V>) -> Self {
        self.add_template(Combine::Replace, template, values)
    }

    /// AND a raw condition onto the WHERE clause.
    pub fn and_template<V: Into<Value>>(self, template: &str, values: impl IntoIterator<Item = V>) -> Self {
        self.add_template(Combine::And, template, values)
    }

    fn add_template<V: Into<Value>>(
        mut self,
        combine: Combine,
        template: &str,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        if self.build_error.is_some() {
            return self;
        }
        let values = values.into_iter().map(Into::into).collect();
        match Sql::template(template, values) {
            Ok(sql) => {
                log::clause_compiled("where", E::table_def().name);
                self.set_where(combine, sql);
            }
            Err(err) => {
                log::clause_failed("where", E::table_def().name, &err);
                self.build_error = Some(err);
            }
        }
        self
    }

    pub fn clear_where(mut self) -> Self {
        self.where_clause = None;
        self
    }

    // ==================== ORDER BY ====================

    fn add_order<P: Projection>(
        self,
        replace: bool,
        descending: bool,
        f: impl FnOnce(E::Fields) -> P,
    ) -> Self {
        self.compile(
            "order_by",
            |v| v.compile_order_keys(&f(E::fields()).into_members(), descending),
            |q, keys| {
                if replace {
                    q.order_by = keys;
                } else {
                    q.order_by.extend(keys);
                }
            },
        )
    }

    /// Replace the ordering; single key or a tuple of keys, ascending unless
    /// a key is marked `desc()`.
    pub fn order_by<P: Projection>(self, f: impl FnOnce(E::Fields) -> P) -> Self {
        self.add_order(true, false, f)
    }

    pub fn order_by_descending<P: Projection>(self, f: impl FnOnce(E::Fields) -> P) -> Self {
        self.add_order(true, true, f)
    }

    /// Append ascending keys.
    pub fn then_by<P: Projection>(self, f: impl FnOnce(E::Fields) -> P) -> Self {
        self.add_order(false, false, f)
    }

    /// Append descending keys.
    pub fn then_by_descending<P: Projection>(self, f: impl FnOnce(E::Fields) -> P) -> Self {
        self.add_order(false, true, f)
    }

    pub fn clear_order_by(mut self) -> Self {
        self.order_by.clear();
        self
    }

    // ==================== SELECT ====================

    fn set_select(self, distinct: bool, members: impl FnOnce() -> Vec<ProjectionMember>) -> Self {
        self.compile(
            "select",
            |v| v.compile_projection(&members()),
            |q, columns| q.select = Some(SelectList { distinct, columns }),
        )
    }

    /// Replace the select list.
    pub fn select<P: Projection>(self, f: impl FnOnce(E::Fields) -> P) -> Self {
        self.set_select(false, || f(E::fields()).into_members())
    }

    /// Replace the select list with `SELECT DISTINCT`.
    pub fn select_distinct<P: Projection>(self, f: impl FnOnce(E::Fields) -> P) -> Self {
        self.set_select(true, || f(E::fields()).into_members())
    }

    /// Replace the select list with columns of `E` and joined `J`.
    pub fn select_with<J: Entity, P: Projection>(
        self,
        f: impl FnOnce(E::Fields, J::Fields) -> P,
    ) -> Self {
        self.set_select(false, || f(E::fields(), J::fields()).into_members())
    }

    /// Select all mapped columns again.
    pub fn clear_select(mut self) -> Self {
        self.select = None;
        self
    }

    // ==================== GROUP BY / HAVING ====================

    pub fn group_by<P: Projection>(self, f: impl FnOnce(E::Fields) -> P) -> Self {
        self.compile(
            "group_by",
            |v| v.compile_group_keys(&f(E::fields()).into_members()),
            |q, keys| q.group_by = keys,
        )
    }

    pub fn having<R: SqlExpr<Ty: BoolType>>(self, f: impl FnOnce(E::Fields) -> R) -> Self {
        self.compile(
            "having",
            |v| v.compile_predicate(&f(E::fields()).into_node()),
            |q, sql| q.having = Some(sql),
        )
    }

    // ==================== JOIN ====================

    fn add_join<J: Entity, R: SqlExpr<Ty: BoolType>>(
        mut self,
        kind: JoinKind,
        on: impl FnOnce(E::Fields, J::Fields) -> R,
    ) -> Self {
        if self.build_error.is_some() {
            return self;
        }
        let table = J::table_def();
        if self.tables.iter().any(|t| t.same_table(table)) {
            let err = OrmError::validation(format!("table '{}' is already part of the query", table.name));
            log::clause_failed("join", E::table_def().name, &err);
            self.build_error = Some(err);
            return self;
        }
        self.tables.push(table);
        self.compile(
            "join",
            |v| v.compile_predicate(&on(E::fields(), J::fields()).into_node()),
            |q, on| q.joins.push(Join { kind, table, on }),
        )
    }

    /// `INNER JOIN J ON ...`
    pub fn join<J: Entity, R: SqlExpr<Ty: BoolType>>(
        self,
        on: impl FnOnce(E::Fields, J::Fields) -> R,
    ) -> Self {
        self.add_join::<J, R>(JoinKind::Inner, on)
    }

    /// `LEFT JOIN J ON ...`
    pub fn left_join<J: Entity, R: SqlExpr<Ty: BoolType>>(
        self,
        on: impl FnOnce(E::Fields, J::Fields) -> R,
    ) -> Self {
        self.add_join::<J, R>(JoinKind::Left, on)
    }

    // ==================== field whitelists ====================

    /// Restrict INSERT statements to these fields.
    pub fn insert_fields<P: Projection>(self, f: impl FnOnce(E::Fields) -> P) -> Self {
        self.compile(
            "insert_fields",
            |v| v.compile_columns(&f(E::fields()).into_members()),
            |q, columns| q.insert_fields = columns,
        )
    }

    /// Restrict UPDATE statements to these fields.
    pub fn update_fields<P: Projection>(self, f: impl FnOnce(E::Fields) -> P) -> Self {
        self.compile(
            "update_fields",
            |v| v.compile_columns(&f(E::fields()).into_members()),
            |q, columns| q.update_fields = columns,
        )
    }

    pub fn clear_insert_fields(mut self) -> Self {
        self.insert_fields.clear();
        self
    }

    pub fn clear_update_fields(mut self) -> Self {
        self.update_fields.clear();
        self
    }

    // ==================== paging ====================

    /// Return at most `rows` rows.
    pub fn limit(mut self, rows: u64) -> Self {
        self.rows = Some(rows);
        self
    }

    /// Skip `skip` rows, then return at most `rows` rows.
    pub fn limit_skip(mut self, skip: u64, rows: u64) -> Self {
        self.skip = Some(skip);
        self.rows = Some(rows);
        self
    }

    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = Some(skip);
        self
    }

    /// Same as [`limit`](Self::limit).
    pub fn take(self, rows: u64) -> Self {
        self.limit(rows)
    }

    pub fn clear_limit(mut self) -> Self {
        self.rows = None;
        self.skip = None;
        self
    }

    // ==================== DELETE safety ====================

    /// Allow `to_delete_statement` without a WHERE clause to delete every row.
    pub fn allow_delete_all(mut self, allow: bool) -> Self {
        self.allow_delete_all = allow;
        self
    }
}

fn combine_sql(existing: Sql, op: &str, predicate: Sql) -> Sql {
    let mut sql = existing.wrap("(", ")");
    sql.push(" ")
        .push(op)
        .push(" ")
        .push_sql(predicate.wrap("(", ")"));
    sql
}
