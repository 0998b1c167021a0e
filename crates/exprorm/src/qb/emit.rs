//! Statement emission.

use super::built::{BuiltQuery, StatementKind};
use super::expression::SqlExpression;
use crate::error::{OrmError, OrmResult};
use crate::expr::SqlExpr;
use crate::ident::Ident;
use crate::log;
use crate::meta::{ColumnDef, Entity, TableDef};
use crate::sql::{RenderOptions, Sql};
use crate::value::Value;
use crate::visitor::ExprVisitor;

impl<E: Entity> SqlExpression<E> {
    /// `SELECT ... FROM ...` with every clause set so far.
    pub fn to_select_statement(&self) -> OrmResult<BuiltQuery> {
        self.validate()?;
        let paged = self.rows.is_some() || self.skip.is_some();
        let distinct = self.select.as_ref().is_some_and(|s| s.distinct);
        if paged && distinct && self.order_by.is_empty() && self.dialect.paging_requires_order_by() {
            // The placeholder ordering is not part of a DISTINCT select list.
            return Err(OrmError::validation(format!(
                "paging a SELECT DISTINCT on {} requires order_by",
                self.dialect.kind()
            )));
        }
        let mut sql = self.select_head()?;
        self.push_filters(&mut sql, true);
        self.push_order_by(&mut sql);
        if let Some(paging) =
            self.dialect
                .limit_clause(self.rows, self.skip, !self.order_by.is_empty())
        {
            sql.push(&paging);
        }
        Ok(self.finish(StatementKind::Select, &sql))
    }

    /// `SELECT COUNT(*)` over the filtered rows.
    ///
    /// Grouped or distinct queries are counted through a derived table so the
    /// count is the number of result rows. Ordering and paging are ignored.
    pub fn to_count_statement(&self) -> OrmResult<BuiltQuery> {
        self.validate()?;
        let distinct = self.select.as_ref().is_some_and(|s| s.distinct);
        let mut sql = Sql::new("SELECT COUNT(*)");
        if distinct || !self.group_by.is_empty() || self.having.is_some() {
            let mut inner = if distinct {
                self.select_head()?
            } else {
                let mut inner = Sql::new("SELECT 1");
                self.push_from(&mut inner)?;
                inner
            };
            self.push_filters(&mut inner, true);
            sql.push(" FROM ").push_sql(inner.wrap("(", ") counted"));
        } else {
            self.push_from(&mut sql)?;
            self.push_filters(&mut sql, false);
        }
        Ok(self.finish(StatementKind::Count, &sql))
    }

    /// `SELECT <expr>` over the filtered rows, e.g. an aggregate.
    ///
    /// ```ignore
    /// let q = q.to_scalar_statement(|p| p.age.max())?;
    /// ```
    pub fn to_scalar_statement<X: SqlExpr>(&self, f: impl FnOnce(E::Fields) -> X) -> OrmResult<BuiltQuery> {
        self.validate()?;
        let expr = self.visitor().compile_scalar(&f(E::fields()).into_node())?;
        let mut sql = Sql::new("SELECT ");
        sql.push_sql(expr);
        self.push_from(&mut sql)?;
        self.push_filters(&mut sql, true);
        Ok(self.finish(StatementKind::Scalar, &sql))
    }

    /// `INSERT INTO ... VALUES ...` for one entity.
    ///
    /// Uses the `insert_fields` whitelist when set; otherwise every column the
    /// database does not assign itself.
    pub fn to_insert_statement(&self, entity: &E) -> OrmResult<BuiltQuery> {
        self.validate()?;
        let table = E::table_def();
        let columns: Vec<&'static ColumnDef> = if self.insert_fields.is_empty() {
            table.columns.iter().filter(|c| !c.auto_increment).collect()
        } else {
            self.insert_fields.clone()
        };
        if columns.is_empty() {
            return Err(OrmError::validation(format!(
                "no columns to insert into '{}'",
                table.name
            )));
        }

        let visitor = self.visitor();
        let names: Vec<String> = columns
            .iter()
            .map(|c| self.dialect.quote_ident(c.name))
            .collect();
        let values = columns
            .iter()
            .map(|c| visitor.bind(self.column_value(entity, c)?))
            .collect::<OrmResult<Vec<_>>>()?;

        let mut sql = Sql::new("INSERT INTO ");
        sql.push(&self.table_name(table)?)
            .push(" (")
            .push(&names.join(", "))
            .push(") VALUES (")
            .push_joined(values, ", ")
            .push(")");
        Ok(self.finish(StatementKind::Insert, &sql))
    }

    /// `UPDATE ... SET ...` for one entity.
    ///
    /// Sets the `update_fields` whitelist when given, else every non-key
    /// column. Rows are selected by the WHERE clause when one is set,
    /// otherwise by the entity's primary key.
    pub fn to_update_statement(&self, entity: &E) -> OrmResult<BuiltQuery> {
        self.validate()?;
        self.reject_joins("UPDATE")?;
        let table = E::table_def();
        let columns: Vec<&'static ColumnDef> = if self.update_fields.is_empty() {
            table
                .columns
                .iter()
                .filter(|c| !c.primary_key && !c.auto_increment)
                .collect()
        } else {
            self.update_fields.clone()
        };
        if columns.is_empty() {
            return Err(OrmError::validation(format!(
                "no columns to update in '{}'",
                table.name
            )));
        }

        let visitor = self.visitor();
        let assignments = columns
            .iter()
            .map(|c| {
                let mut sql = Sql::new(self.dialect.quote_ident(c.name));
                sql.push(" = ")
                    .push_sql(visitor.bind(self.column_value(entity, c)?)?);
                Ok(sql)
            })
            .collect::<OrmResult<Vec<_>>>()?;

        let filter = match &self.where_clause {
            Some(filter) => filter.clone(),
            None => {
                let keys = table
                    .primary_keys()
                    .map(|c| {
                        let mut sql = Sql::column(table, c.name);
                        sql.push(" = ")
                            .push_sql(visitor.bind(self.column_value(entity, c)?)?);
                        Ok(sql)
                    })
                    .collect::<OrmResult<Vec<_>>>()?;
                if keys.is_empty() {
                    return Err(OrmError::validation(format!(
                        "'{}' has no primary key; add a WHERE clause to update it",
                        table.name
                    )));
                }
                Sql::join(keys, " AND ")
            }
        };

        let mut sql = Sql::new("UPDATE ");
        sql.push(&self.table_name(table)?)
            .push(" SET ")
            .push_joined(assignments, ", ")
            .push(" WHERE ")
            .push_sql(filter);
        Ok(self.finish(StatementKind::Update, &sql))
    }

    /// `DELETE FROM ...` restricted by the WHERE clause.
    ///
    /// Without a WHERE clause the statement deletes nothing (`WHERE 1=0`)
    /// unless [`allow_delete_all`](Self::allow_delete_all) was set.
    pub fn to_delete_statement(&self) -> OrmResult<BuiltQuery> {
        self.validate()?;
        self.reject_joins("DELETE")?;
        let table = E::table_def();
        let mut sql = Sql::new("DELETE FROM ");
        sql.push(&self.table_name(table)?);
        match &self.where_clause {
            Some(filter) => {
                sql.push(" WHERE ").push_sql(filter.clone());
            }
            None if self.allow_delete_all => {}
            None => {
                tracing::warn!(
                    target: "exprorm::sql",
                    table = table.name,
                    "DELETE without WHERE; emitting a statement that matches no rows",
                );
                sql.push(" WHERE 1=0");
            }
        }
        Ok(self.finish(StatementKind::Delete, &sql))
    }

    fn visitor(&self) -> ExprVisitor<'_> {
        ExprVisitor::new(self.dialect.as_ref(), &self.config, &self.tables)
    }

    fn table_name(&self, table: &TableDef) -> OrmResult<String> {
        Ok(Ident::table(table)?.to_sql(self.dialect.as_ref()))
    }

    fn column_value(&self, entity: &E, column: &ColumnDef) -> OrmResult<Value> {
        entity
            .value_of(column.field)
            .map(|v| v.coerce_to(column.kind))
            .ok_or_else(|| OrmError::column_not_found(E::table_def().name, column.field))
    }

    fn reject_joins(&self, statement: &str) -> OrmResult<()> {
        if self.joins.is_empty() {
            Ok(())
        } else {
            Err(OrmError::validation(format!(
                "joins are not supported in {statement} statements"
            )))
        }
    }

    /// `SELECT [DISTINCT] <columns> FROM <tables>`
    fn select_head(&self) -> OrmResult<Sql> {
        let mut sql = Sql::new("SELECT ");
        match &self.select {
            Some(select) => {
                if select.distinct {
                    sql.push("DISTINCT ");
                }
                sql.push_joined(select.columns.iter().cloned(), ", ");
            }
            None => {
                let table = E::table_def();
                let columns = table.columns.iter().map(|c| Sql::column(table, c.name));
                sql.push_joined(columns, ", ");
            }
        }
        self.push_from(&mut sql)?;
        Ok(sql)
    }

    fn push_from(&self, sql: &mut Sql) -> OrmResult<()> {
        sql.push(" FROM ").push(&self.table_name(E::table_def())?);
        for join in &self.joins {
            sql.push(join.kind.as_sql())
                .push(&self.table_name(join.table)?)
                .push(" ON ")
                .push_sql(join.on.clone());
        }
        Ok(())
    }

    fn push_filters(&self, sql: &mut Sql, grouping: bool) {
        if let Some(filter) = &self.where_clause {
            sql.push(" WHERE ").push_sql(filter.clone());
        }
        if !grouping {
            return;
        }
        if !self.group_by.is_empty() {
            sql.push(" GROUP BY ")
                .push_joined(self.group_by.iter().cloned(), ", ");
        }
        if let Some(having) = &self.having {
            sql.push(" HAVING ").push_sql(having.clone());
        }
    }

    fn push_order_by(&self, sql: &mut Sql) {
        if self.order_by.is_empty() {
            return;
        }
        let keys = self.order_by.iter().map(|key| {
            let mut sql = key.sql.clone();
            if key.descending {
                sql.push(" DESC");
            }
            sql
        });
        sql.push(" ORDER BY ").push_joined(keys, ", ");
    }

    fn finish(&self, kind: StatementKind, sql: &Sql) -> BuiltQuery {
        let (sql, params) = sql.render(RenderOptions {
            dialect: self.dialect.as_ref(),
            prefix_columns: self.config.prefix_field_with_table_name || !self.joins.is_empty(),
        });
        let built = BuiltQuery { kind, sql, params };
        log::statement_built(&built, &self.config);
        built
    }
}
