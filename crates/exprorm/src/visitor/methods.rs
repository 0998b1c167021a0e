//! Method-call translation table.
//!
//! Receiver and arguments are treated as one operand list, so
//! `p.name.to_upper()` and `func::upper(p.name)` translate identically.
//! Every rule binds or quotes its own operands.

use super::{ExprVisitor, Fragment, RawSql, Shape};
use crate::dialect::MatchCase;
use crate::error::{OrmError, OrmResult};
use crate::expr::{Method, MethodCall, Node};
use crate::sql::Sql;
use crate::value::{Value, ValueKind};

pub(super) fn translate(v: &ExprVisitor<'_>, call: &MethodCall) -> OrmResult<Fragment> {
    match &call.method {
        Method::ToUpper => text_function(v, call, "UPPER"),
        Method::ToLower => text_function(v, call, "LOWER"),
        Method::Trim => text_function(v, call, "TRIM"),
        Method::TrimStart => text_function(v, call, "LTRIM"),
        Method::TrimEnd => text_function(v, call, "RTRIM"),
        Method::Length => {
            let [x] = operands::<1>(call)?;
            let x = v.compile_scalar(x)?;
            Ok(scalar(
                Sql::function(v.dialect().length_function(), [x]),
                Some(ValueKind::Int),
            ))
        }
        Method::StartsWith => like(v, call, "", "%"),
        Method::EndsWith => like(v, call, "%", ""),
        Method::Contains => like(v, call, "%", "%"),
        Method::Substring => substring(v, call),
        Method::Round => math_function(v, call, "ROUND"),
        Method::Floor => math_function(v, call, "FLOOR"),
        Method::Ceiling => math_function(v, call, v.dialect().ceiling_function()),
        Method::Abs => math_function(v, call, "ABS"),
        Method::Concat => {
            let parts = call
                .operands()
                .into_iter()
                .map(|node| v.compile_scalar(node))
                .collect::<OrmResult<Vec<_>>>()?;
            if parts.is_empty() {
                return Err(arity(call));
            }
            Ok(scalar(v.dialect().concat(parts), Some(ValueKind::Text)))
        }
        Method::In => in_list(v, call),
        // Both are handled by the ordering and select-list compilers.
        Method::Desc => Err(OrmError::unsupported(
            "desc() is only valid as an ordering key",
        )),
        Method::As => Err(OrmError::unsupported(
            "alias() is only valid as a select list member",
        )),
        Method::Sum => aggregate(v, call, "SUM", None),
        Method::Min => aggregate(v, call, "MIN", None),
        Method::Max => aggregate(v, call, "MAX", None),
        Method::Avg => aggregate(v, call, "AVG", Some(ValueKind::Float)),
        Method::Count if call.operands().is_empty() => {
            Ok(scalar(Sql::new("COUNT(*)"), Some(ValueKind::Int)))
        }
        Method::Count => aggregate(v, call, "COUNT", Some(ValueKind::Int)),
        Method::CountDistinct => {
            let [x] = operands::<1>(call)?;
            let mut sql = Sql::new("COUNT(DISTINCT ");
            sql.push_sql(v.compile_scalar(x)?).push(")");
            Ok(scalar(sql, Some(ValueKind::Int)))
        }
        Method::Other(name) => Err(OrmError::unsupported(format!(
            "method '{name}' has no SQL translation"
        ))),
    }
}

/// Exactly `N` operands (receiver included).
pub(super) fn operands<const N: usize>(call: &MethodCall) -> OrmResult<[&Node; N]> {
    <[&Node; N]>::try_from(call.operands()).map_err(|_| arity(call))
}

/// `min..=max` operands (receiver included).
fn operands_between(call: &MethodCall, min: usize, max: usize) -> OrmResult<Vec<&Node>> {
    let ops = call.operands();
    if ops.len() < min || ops.len() > max {
        return Err(arity(call));
    }
    Ok(ops)
}

fn arity(call: &MethodCall) -> OrmError {
    OrmError::unsupported(format!(
        "'{}' with {} operand(s) has no SQL translation",
        call.method.name(),
        call.operands().len()
    ))
}

fn scalar(sql: Sql, kind: Option<ValueKind>) -> Fragment {
    Fragment::raw(sql, Shape::Scalar(kind))
}

fn text_function(v: &ExprVisitor<'_>, call: &MethodCall, function: &str) -> OrmResult<Fragment> {
    let [x] = operands::<1>(call)?;
    let x = v.compile_scalar(x)?;
    Ok(scalar(Sql::function(function, [x]), Some(ValueKind::Text)))
}

/// Extra numeric arguments: integral literals are written inline.
fn extra_argument(v: &ExprVisitor<'_>, node: &Node) -> OrmResult<Sql> {
    match v.visit(node)? {
        Fragment::Literal(value @ Value::Int(_)) => Ok(Sql::new(v.dialect().quote_value(&value)?)),
        fragment => v.resolve(fragment),
    }
}

fn math_function(v: &ExprVisitor<'_>, call: &MethodCall, function: &str) -> OrmResult<Fragment> {
    let max = if call.method == Method::Round { 2 } else { 1 };
    let ops = operands_between(call, 1, max)?;
    let x = v.visit(ops[0])?;
    let kind = x.kind();
    let mut args = vec![v.resolve(x)?];
    for extra in &ops[1..] {
        args.push(extra_argument(v, extra)?);
    }
    Ok(scalar(Sql::function(function, args), kind))
}

fn aggregate(
    v: &ExprVisitor<'_>,
    call: &MethodCall,
    function: &str,
    kind: Option<ValueKind>,
) -> OrmResult<Fragment> {
    let ops = operands_between(call, 1, 2)?;
    let x = v.visit(ops[0])?;
    let kind = kind.or(x.kind());
    let mut args = vec![v.resolve(x)?];
    for extra in &ops[1..] {
        args.push(extra_argument(v, extra)?);
    }
    Ok(scalar(Sql::function(function, args), kind))
}

/// `LIKE` with the literal or computed pattern between `prefix` and `suffix`
/// wildcards.
fn like(v: &ExprVisitor<'_>, call: &MethodCall, prefix: &str, suffix: &str) -> OrmResult<Fragment> {
    let [subject, pattern] = operands::<2>(call)?;
    let dialect = v.dialect();
    let insensitive = v.match_case(call.match_case) == MatchCase::Insensitive;

    let mut sql = v.compile_scalar(subject)?;
    if insensitive && !subject.is_call(&Method::ToUpper) {
        sql = Sql::function("UPPER", [sql]);
    }
    sql.push(" LIKE ");

    match v.visit(pattern)? {
        Fragment::Literal(value) => {
            let text = match &value {
                Value::Null => return Err(OrmError::unsupported("LIKE pattern cannot be NULL")),
                value => value.as_str().ok_or_else(|| {
                    OrmError::unsupported(format!("LIKE pattern must be text, got {value:?}"))
                })?,
            };
            let text = if insensitive {
                text.to_uppercase()
            } else {
                text.to_string()
            };
            let (escaped, has_escapes) = escape_like(&text, dialect.like_wildcards(), dialect.like_escape_char());
            sql.push_sql(v.bind(Value::Text(format!("{prefix}{escaped}{suffix}")))?);
            if has_escapes {
                sql.push(&dialect.like_escape_clause());
            }
        }
        Fragment::Raw(RawSql { sql: mut computed, .. }) => {
            if insensitive && !pattern.is_call(&Method::ToUpper) {
                computed = Sql::function("UPPER", [computed]);
            }
            let mut parts = Vec::with_capacity(3);
            if !prefix.is_empty() {
                parts.push(Sql::new(dialect.quote_string(prefix)));
            }
            parts.push(computed);
            if !suffix.is_empty() {
                parts.push(Sql::new(dialect.quote_string(suffix)));
            }
            sql.push_sql(dialect.concat(parts));
        }
    }
    Ok(Fragment::raw(sql, Shape::Predicate))
}

/// Escape `LIKE` wildcards and the escape character itself.
fn escape_like(text: &str, wildcards: &[char], escape: char) -> (String, bool) {
    let mut out = String::with_capacity(text.len());
    let mut escaped = false;
    for ch in text.chars() {
        if ch == escape || wildcards.contains(&ch) {
            out.push(escape);
            escaped = true;
        }
        out.push(ch);
    }
    (out, escaped)
}

fn substring(v: &ExprVisitor<'_>, call: &MethodCall) -> OrmResult<Fragment> {
    let ops = operands_between(call, 2, 3)?;
    let subject = v.compile_scalar(ops[0])?;

    // Callers count from 0, SQL from 1.
    let start = match v.visit(ops[1])? {
        Fragment::Literal(Value::Int(n)) => {
            let n = n
                .checked_add(1)
                .ok_or_else(|| OrmError::invalid_value("substring start out of range"))?;
            v.bind(Value::Int(n))?
        }
        Fragment::Literal(other) => {
            return Err(OrmError::unsupported(format!(
                "substring start must be an integer, got {other:?}"
            )));
        }
        Fragment::Raw(raw) => {
            let mut sql = raw.sql.wrap("(", ")");
            sql.push(" + 1");
            sql
        }
    };
    let length = ops.get(2).map(|node| v.compile_scalar(node)).transpose()?;

    Ok(scalar(
        v.dialect().substring(subject, start, length),
        Some(ValueKind::Text),
    ))
}

fn in_list(v: &ExprVisitor<'_>, call: &MethodCall) -> OrmResult<Fragment> {
    let [subject, list] = operands::<2>(call)?;
    let subject = v.visit(subject)?;
    let kind = subject.kind();
    let mut sql = v.resolve(subject)?;

    let mut items = Vec::new();
    match list {
        Node::List(nodes) => {
            for node in nodes {
                match node {
                    Node::Constant(Value::List(inner)) => {
                        items.extend(inner.iter().cloned().map(Fragment::Literal));
                    }
                    node => items.push(v.visit(node)?),
                }
            }
        }
        node => match v.visit(node)? {
            Fragment::Literal(Value::List(values)) => {
                for value in values {
                    match value {
                        // One level of nesting is flattened.
                        Value::List(inner) => items.extend(inner.into_iter().map(Fragment::Literal)),
                        value => items.push(Fragment::Literal(value)),
                    }
                }
            }
            fragment => items.push(fragment),
        },
    }

    sql.push(" IN (");
    if items.is_empty() {
        sql.push("NULL");
    } else {
        let items = items
            .into_iter()
            .map(|item| v.resolve(item.coerce_to(kind)))
            .collect::<OrmResult<Vec<_>>>()?;
        sql.push_joined(items, ", ");
    }
    sql.push(")");
    Ok(Fragment::raw(sql, Shape::Predicate))
}
