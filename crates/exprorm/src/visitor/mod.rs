//! Expression tree to SQL fragment compilation.
//!
//! [`ExprVisitor`] walks a [`Node`] tree and returns a [`Fragment`] per node:
//! either SQL that is already valid in place (`Raw`) or a value that still
//! has to be bound or quoted (`Literal`). Keeping literals unresolved until
//! their context is known is what lets comparisons coerce a literal to the
//! column it is compared with, and lets `== NULL` become `IS NULL`.

mod methods;


use crate::config::QueryConfig;
use crate::dialect::{Dialect, MatchCase};
use crate::error::{OrmError, OrmResult};
use crate::expr::{BinaryOp, MemberRef, Method, Node, ProjectionMember, UnaryOp};
use crate::ident::Ident;
use crate::meta::{ColumnDef, TableDef};
use crate::sql::Sql;
use crate::value::{Value, ValueKind};

/// What a piece of raw SQL evaluates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// A column of the given declared kind.
    Column(ValueKind),
    /// A boolean condition, valid in `WHERE` as is.
    Predicate,
    /// Any other expression, with its kind when known.
    Scalar(Option<ValueKind>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawSql {
    pub sql: Sql,
    pub shape: Shape,
}

/// Result of visiting one node.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    Raw(RawSql),
    Literal(Value),
}

impl Fragment {
    pub(crate) fn raw(sql: Sql, shape: Shape) -> Self {
        Fragment::Raw(RawSql { sql, shape })
    }

    /// Declared or literal kind, when known.
    pub fn kind(&self) -> Option<ValueKind> {
        match self {
            Fragment::Raw(RawSql {
                shape: Shape::Column(kind),
                ..
            }) => Some(*kind),
            Fragment::Raw(RawSql {
                shape: Shape::Scalar(kind),
                ..
            }) => *kind,
            Fragment::Raw(RawSql {
                shape: Shape::Predicate,
                ..
            }) => Some(ValueKind::Bool),
            Fragment::Literal(value) => value.kind(),
        }
    }

    fn is_text(&self) -> bool {
        self.kind().is_some_and(ValueKind::is_text)
    }

    fn is_null(&self) -> bool {
        matches!(self, Fragment::Literal(Value::Null))
    }

    /// Coerce a literal to `kind`; raw SQL is unchanged.
    fn coerce_to(self, kind: Option<ValueKind>) -> Self {
        match (self, kind) {
            (Fragment::Literal(value), Some(kind)) => Fragment::Literal(value.coerce_to(kind)),
            (fragment, _) => fragment,
        }
    }
}

/// One compiled `ORDER BY` key.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderKey {
    pub sql: Sql,
    pub descending: bool,
}

/// Compiles expression trees against a set of tables for one dialect.
#[derive(Debug, Clone, Copy)]
pub struct ExprVisitor<'a> {
    dialect: &'a dyn Dialect,
    config: &'a QueryConfig,
    tables: &'a [&'static TableDef],
}

impl<'a> ExprVisitor<'a> {
    /// `tables[0]` is the queried entity; the rest are joined tables.
    pub fn new(dialect: &'a dyn Dialect, config: &'a QueryConfig, tables: &'a [&'static TableDef]) -> Self {
        Self {
            dialect,
            config,
            tables,
        }
    }

    pub fn dialect(&self) -> &'a dyn Dialect {
        self.dialect
    }

    /// Compile a node in predicate position (`WHERE`, `HAVING`, `ON`).
    pub fn compile_predicate(&self, node: &Node) -> OrmResult<Sql> {
        let fragment = self.visit(node)?;
        self.predicate(fragment)
    }

    /// Compile a node as a value expression.
    pub fn compile_scalar(&self, node: &Node) -> OrmResult<Sql> {
        let fragment = self.visit(node)?;
        self.resolve(fragment)
    }

    /// Compile the members of a select list, in declaration order.
    pub fn compile_projection(&self, members: &[ProjectionMember]) -> OrmResult<Vec<Sql>> {
        members.iter().map(|m| self.compile_member(m)).collect()
    }

    /// Compile ordering keys; a `desc()` key is descending regardless of
    /// `descending`.
    pub fn compile_order_keys(
        &self,
        members: &[ProjectionMember],
        descending: bool,
    ) -> OrmResult<Vec<OrderKey>> {
        members
            .iter()
            .map(|m| match &m.node {
                Node::Call(call) if call.method == Method::Desc => {
                    let [key] = methods::operands::<1>(call)?;
                    Ok(OrderKey {
                        sql: self.compile_scalar(key)?,
                        descending: true,
                    })
                }
                node => Ok(OrderKey {
                    sql: self.compile_scalar(node)?,
                    descending,
                }),
            })
            .collect()
    }

    /// Compile `GROUP BY` keys; keys cannot carry an alias.
    pub fn compile_group_keys(&self, members: &[ProjectionMember]) -> OrmResult<Vec<Sql>> {
        members
            .iter()
            .map(|m| match &m.alias {
                Some(alias) => Err(OrmError::unsupported(format!(
                    "grouping key cannot be aliased as '{alias}'"
                ))),
                None => self.compile_scalar(&m.node),
            })
            .collect()
    }

    /// Resolve a field whitelist to columns of the queried table.
    pub fn compile_columns(&self, members: &[ProjectionMember]) -> OrmResult<Vec<&'static ColumnDef>> {
        let main = self.main_table()?;
        members
            .iter()
            .map(|m| match &m.node {
                Node::Member(member) if member.table.same_table(main) => self.column(member),
                Node::Member(member) => Err(OrmError::column_not_found(main.name, member.field)),
                _ => Err(OrmError::unsupported(
                    "field lists may only name fields of the queried entity",
                )),
            })
            .collect()
    }

    pub fn visit(&self, node: &Node) -> OrmResult<Fragment> {
        match node {
            Node::Constant(value) => Ok(Fragment::Literal(value.clone())),
            Node::Member(member) => {
                let column = self.column(member)?;
                Ok(Fragment::raw(
                    Sql::column(member.table, column.name),
                    Shape::Column(column.kind),
                ))
            }
            Node::Unary { op, operand } => self.visit_unary(*op, operand),
            Node::Binary { op, left, right } => self.visit_binary(*op, left, right),
            Node::Coalesce { left, right } => {
                let left = self.visit(left)?;
                let right = self.visit(right)?;
                let kind = left.kind().or(right.kind());
                let args = [
                    self.resolve(left.coerce_to(kind))?,
                    self.resolve(right.coerce_to(kind))?,
                ];
                Ok(Fragment::raw(Sql::function("COALESCE", args), Shape::Scalar(kind)))
            }
            Node::Conditional {
                test,
                if_true,
                if_false,
            } => {
                let test = self.compile_predicate(test)?;
                let if_true = self.visit(if_true)?;
                let if_false = self.visit(if_false)?;
                let kind = if_true.kind().or(if_false.kind());

                let mut sql = Sql::new("CASE WHEN ");
                sql.push_sql(test)
                    .push(" THEN ")
                    .push_sql(self.resolve(if_true.coerce_to(kind))?)
                    .push(" ELSE ")
                    .push_sql(self.resolve(if_false.coerce_to(kind))?)
                    .push(" END");
                Ok(Fragment::raw(sql, Shape::Scalar(kind)))
            }
            Node::Call(call) => methods::translate(self, call),
            Node::List(_) => Err(OrmError::unsupported(
                "a list can only appear on the right-hand side of IN",
            )),
            Node::New(members) => {
                let columns = self.compile_projection(members)?;
                Ok(Fragment::raw(Sql::join(columns, ", "), Shape::Scalar(None)))
            }
        }
    }

    fn visit_unary(&self, op: UnaryOp, operand: &Node) -> OrmResult<Fragment> {
        let fragment = self.visit(operand)?;
        match op {
            UnaryOp::Not => match fragment {
                Fragment::Literal(Value::Bool(b)) => Ok(Fragment::Literal(Value::Bool(!b))),
                // A bare boolean column is not a condition on every database.
                Fragment::Raw(RawSql {
                    sql: mut column,
                    shape: Shape::Column(ValueKind::Bool),
                }) => {
                    column.push(" = ").push(self.dialect.bool_literal(false));
                    Ok(Fragment::raw(column, Shape::Predicate))
                }
                fragment => {
                    let inner = self.predicate(fragment)?;
                    Ok(Fragment::raw(inner.wrap("NOT (", ")"), Shape::Predicate))
                }
            },
            UnaryOp::Negate => match fragment {
                Fragment::Literal(Value::Int(n)) => n
                    .checked_neg()
                    .map(|n| Fragment::Literal(Value::Int(n)))
                    .ok_or_else(|| OrmError::invalid_value(format!("cannot negate {n}"))),
                Fragment::Literal(Value::Float(f)) => Ok(Fragment::Literal(Value::Float(-f))),
                Fragment::Literal(other) => Err(OrmError::unsupported(format!(
                    "cannot negate literal {other:?}"
                ))),
                Fragment::Raw(raw) if raw.shape == Shape::Predicate => Err(OrmError::unsupported(
                    "cannot negate a condition arithmetically; use `!`",
                )),
                fragment => {
                    let kind = fragment.kind();
                    let sql = self.resolve(fragment)?;
                    Ok(Fragment::raw(sql.wrap("-(", ")"), Shape::Scalar(kind)))
                }
            },
        }
    }

    fn visit_binary(&self, op: BinaryOp, left: &Node, right: &Node) -> OrmResult<Fragment> {
        if op.is_logical() {
            let left = self.compile_predicate(left)?;
            let right = self.compile_predicate(right)?;
            let mut sql = left.wrap("(", ")");
            sql.push(" ")
                .push(op.as_sql())
                .push(" ")
                .push_sql(right.wrap("(", ")"));
            return Ok(Fragment::raw(sql, Shape::Predicate));
        }

        let left = self.visit(left)?;
        let right = self.visit(right)?;
        if op.is_comparison() {
            self.comparison(op, left, right)
        } else {
            self.arithmetic(op, left, right)
        }
    }

    fn comparison(&self, op: BinaryOp, left: Fragment, right: Fragment) -> OrmResult<Fragment> {
        if left.is_null() && right.is_null() {
            return Err(OrmError::unsupported("comparison between two NULL literals"));
        }
        if left.is_null() || right.is_null() {
            let subject = if left.is_null() { right } else { left };
            let test = match op {
                BinaryOp::Eq => " IS NULL",
                BinaryOp::Ne => " IS NOT NULL",
                _ => {
                    return Err(OrmError::unsupported(format!(
                        "'{}' against NULL; only equality tests are allowed",
                        op.as_sql()
                    )));
                }
            };
            let mut sql = self.operand(subject)?;
            sql.push(test);
            return Ok(Fragment::raw(sql, Shape::Predicate));
        }

        let (left, right) = coerce_pair(left, right);
        let mut sql = self.operand(left)?;
        sql.push(" ")
            .push(op.as_sql())
            .push(" ")
            .push_sql(self.operand(right)?);
        Ok(Fragment::raw(sql, Shape::Predicate))
    }

    fn arithmetic(&self, op: BinaryOp, left: Fragment, right: Fragment) -> OrmResult<Fragment> {
        if left.is_text() || right.is_text() {
            return Err(OrmError::unsupported(format!(
                "'{}' on text operands; use concat for strings",
                op.as_sql()
            )));
        }
        if let Some(kind) = [left.kind(), right.kind()]
            .into_iter()
            .flatten()
            .find(|kind| !kind.is_numeric())
        {
            return Err(OrmError::unsupported(format!(
                "'{}' on a non-numeric {kind:?} operand",
                op.as_sql()
            )));
        }

        let (left, right) = coerce_pair(left, right);
        let kind = left.kind().or(right.kind());
        let left = self.operand(left)?;
        let right = self.operand(right)?;
        let sql = if op == BinaryOp::Rem {
            self.dialect.modulo(left, right)
        } else {
            let mut sql = left.wrap("(", "");
            sql.push(" ")
                .push(op.as_sql())
                .push(" ")
                .push_sql(right)
                .push(")");
            sql
        };
        Ok(Fragment::raw(sql, Shape::Scalar(kind)))
    }

    fn compile_member(&self, member: &ProjectionMember) -> OrmResult<Sql> {
        let (node, alias) = match &member.node {
            Node::Call(call) if call.method == Method::As => {
                let [x, alias] = methods::operands::<2>(call)?;
                let Node::Constant(Value::Text(alias)) = alias else {
                    return Err(OrmError::unsupported("alias must be a string literal"));
                };
                (x, Some(alias.as_str()))
            }
            node => (node, member.alias.as_deref()),
        };
        let mut sql = self.compile_scalar(node)?;
        if let Some(alias) = alias {
            sql.push(" AS ")
                .push(&Ident::quoted(alias)?.to_sql(self.dialect));
        }
        Ok(sql)
    }

    /// Resolve a fragment to SQL; conditions used as operands are parenthesized.
    fn operand(&self, fragment: Fragment) -> OrmResult<Sql> {
        match fragment {
            Fragment::Raw(RawSql {
                sql,
                shape: Shape::Predicate,
            }) => Ok(sql.wrap("(", ")")),
            fragment => self.resolve(fragment),
        }
    }

    /// Turn a fragment into SQL, binding or quoting literals.
    pub(crate) fn resolve(&self, fragment: Fragment) -> OrmResult<Sql> {
        match fragment {
            Fragment::Raw(raw) => Ok(raw.sql),
            Fragment::Literal(value) => self.bind(value),
        }
    }

    /// Bind a value as a parameter, or inline it when parameterization is off.
    ///
    /// `NULL` is always inlined.
    pub(crate) fn bind(&self, value: Value) -> OrmResult<Sql> {
        match value {
            Value::Null => Ok(Sql::new(self.dialect.null_literal())),
            Value::List(_) => Err(OrmError::unsupported(
                "a list can only appear on the right-hand side of IN",
            )),
            value if self.config.parameterize => Ok(Sql::bind(value)),
            value => Ok(Sql::new(self.dialect.quote_value(&value)?)),
        }
    }

    /// Coerce a fragment to a condition.
    fn predicate(&self, fragment: Fragment) -> OrmResult<Sql> {
        match fragment {
            Fragment::Raw(RawSql {
                sql,
                shape: Shape::Predicate,
            }) => Ok(sql),
            Fragment::Raw(RawSql {
                mut sql,
                shape: Shape::Column(ValueKind::Bool) | Shape::Scalar(Some(ValueKind::Bool)),
            }) => {
                sql.push(" = ").push(self.dialect.bool_literal(true));
                Ok(sql)
            }
            Fragment::Literal(Value::Bool(b)) => Ok(Sql::new(if b { "1=1" } else { "1=0" })),
            Fragment::Raw(_) => Err(OrmError::unsupported(
                "expression is not a boolean condition",
            )),
            Fragment::Literal(value) => Err(OrmError::unsupported(format!(
                "literal {value:?} is not a boolean condition"
            ))),
        }
    }

    /// Effective case sensitivity for a string-matching call.
    fn match_case(&self, per_call: Option<MatchCase>) -> MatchCase {
        per_call
            .or(self.config.string_match)
            .unwrap_or_else(|| self.dialect.string_match())
    }

    fn main_table(&self) -> OrmResult<&'static TableDef> {
        self.tables
            .first()
            .copied()
            .ok_or_else(|| OrmError::validation("no table to compile against"))
    }

    fn column(&self, member: &MemberRef) -> OrmResult<&'static ColumnDef> {
        let table = self
            .tables
            .iter()
            .find(|t| t.same_table(member.table))
            .ok_or_else(|| OrmError::column_not_found(member.table.name, member.field))?;
        if table.is_reference(member.field) {
            return Err(OrmError::column_not_found(table.name, member.field));
        }
        table
            .column_for_field(member.field)
            .ok_or_else(|| OrmError::column_not_found(table.name, member.field))
    }
}

/// Coerce a literal side to the kind of the other side.
fn coerce_pair(left: Fragment, right: Fragment) -> (Fragment, Fragment) {
    match (&left, &right) {
        (Fragment::Literal(_), Fragment::Raw(_)) => {
            let kind = right.kind();
            (left.coerce_to(kind), right)
        }
        (Fragment::Raw(_), Fragment::Literal(_)) => {
            let kind = left.kind();
            (left, right.coerce_to(kind))
        }
        _ => (left, right),
    }
}
