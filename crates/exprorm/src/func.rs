//! Free-standing SQL functions for use inside expression closures.
//!
//! ```ignore
//! use exprorm::func;
//!
//! q.select(|p| (p.id, func::concat((p.name, " ", p.city)).alias("label")))
//! ```

use crate::expr::{
    BoolType, Expr, Method, Node, NumericType, Operand, Projection, SqlExpr, TextType, UnaryOp,
};
use crate::value::Value;

/// A typed literal.
pub fn lit<T: Into<Value>>(value: T) -> Expr<T> {
    Expr::value(value)
}

/// `x IN (values...)`.
pub fn in_list<X: SqlExpr>(x: X, values: impl Into<Operand>) -> Expr<bool> {
    x.in_list(values)
}

/// Descending ordering key.
pub fn desc<X: SqlExpr>(x: X) -> Expr<X::Ty> {
    x.desc()
}

/// `x AS "name"`.
pub fn alias<X: SqlExpr>(x: X, name: &str) -> Expr<X::Ty> {
    x.alias(name)
}

/// Concatenate the members of `parts` in order.
pub fn concat(parts: impl Projection) -> Expr<String> {
    let args = parts.into_members().into_iter().map(|m| m.node).collect();
    Expr::from_node(Node::function(Method::Concat, args))
}

pub fn coalesce<X: SqlExpr>(x: X, fallback: impl Into<Operand>) -> Expr<X::Ty> {
    x.coalesce(fallback)
}

/// `CASE WHEN test THEN if_true ELSE if_false END`.
pub fn iif<T, C: SqlExpr<Ty: BoolType>>(
    test: C,
    if_true: impl Into<Operand>,
    if_false: impl Into<Operand>,
) -> Expr<T> {
    Expr::from_node(Node::Conditional {
        test: Box::new(test.into_node()),
        if_true: Box::new(if_true.into().into_node()),
        if_false: Box::new(if_false.into().into_node()),
    })
}

pub fn not<C: SqlExpr<Ty: BoolType>>(test: C) -> Expr<bool> {
    Expr::from_node(Node::unary(UnaryOp::Not, test.into_node()))
}

pub fn sum<X: SqlExpr<Ty: NumericType>>(x: X) -> Expr<X::Ty> {
    Expr::from_node(Node::function(Method::Sum, vec![x.into_node()]))
}

pub fn avg<X: SqlExpr<Ty: NumericType>>(x: X) -> Expr<f64> {
    Expr::from_node(Node::function(Method::Avg, vec![x.into_node()]))
}

pub fn min<X: SqlExpr>(x: X) -> Expr<X::Ty> {
    x.min()
}

pub fn max<X: SqlExpr>(x: X) -> Expr<X::Ty> {
    x.max()
}

/// `COUNT(x)`.
pub fn count<X: SqlExpr>(x: X) -> Expr<i64> {
    x.count()
}

/// `COUNT(*)`.
pub fn count_all() -> Expr<i64> {
    Expr::from_node(Node::function(Method::Count, vec![]))
}

/// `COUNT(DISTINCT x)`.
pub fn count_distinct<X: SqlExpr>(x: X) -> Expr<i64> {
    x.count_distinct()
}

pub fn round<X: SqlExpr<Ty: NumericType>>(x: X) -> Expr<X::Ty> {
    Expr::from_node(Node::function(Method::Round, vec![x.into_node()]))
}

pub fn round_to<X: SqlExpr<Ty: NumericType>>(x: X, digits: i32) -> Expr<X::Ty> {
    Expr::from_node(Node::function(
        Method::Round,
        vec![x.into_node(), Node::constant(digits)],
    ))
}

pub fn floor<X: SqlExpr<Ty: NumericType>>(x: X) -> Expr<X::Ty> {
    Expr::from_node(Node::function(Method::Floor, vec![x.into_node()]))
}

pub fn ceiling<X: SqlExpr<Ty: NumericType>>(x: X) -> Expr<X::Ty> {
    Expr::from_node(Node::function(Method::Ceiling, vec![x.into_node()]))
}

pub fn abs<X: SqlExpr<Ty: NumericType>>(x: X) -> Expr<X::Ty> {
    Expr::from_node(Node::function(Method::Abs, vec![x.into_node()]))
}

pub fn upper<X: SqlExpr<Ty: TextType>>(x: X) -> Expr<X::Ty> {
    Expr::from_node(Node::method(Method::ToUpper, x.into_node(), vec![]))
}

pub fn lower<X: SqlExpr<Ty: TextType>>(x: X) -> Expr<X::Ty> {
    Expr::from_node(Node::method(Method::ToLower, x.into_node(), vec![]))
}

/// A call to a method with no SQL translation.
///
/// Compiling it always fails with `UnsupportedExpression`.
pub fn call<T>(name: &str, args: impl Projection) -> Expr<T> {
    let args = args.into_members().into_iter().map(|m| m.node).collect();
    Expr::from_node(Node::function(Method::Other(name.to_string()), args))
}
