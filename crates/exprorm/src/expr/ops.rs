use super::node::{BinaryOp, Method, MethodCall, Node, UnaryOp};
use super::typed::{Expr, Field, Operand};
use crate::dialect::MatchCase;
use crate::meta::Entity;
use crate::value::Value;
use std::ops::{Add, BitAnd, BitOr, Div, Mul, Neg, Not, Rem, Sub};

/// Types that string functions and `LIKE` apply to.
pub trait TextType {}

/// Types that arithmetic and math functions apply to.
pub trait NumericType {}

/// Types usable as predicates.
pub trait BoolType {}

macro_rules! mark {
    ($marker:ident: $($ty:ty),* $(,)?) => {
        $(
            impl $marker for $ty {}
            impl $marker for Option<$ty> {}
        )*
    };
}

mark!(TextType: String, &'static str);
mark!(NumericType: i8, i16, i32, i64, u8, u16, u32, f32, f64);
mark!(BoolType: bool);

/// Operations every expression supports.
pub trait SqlExpr: Sized {
    /// Rust type of the values the expression produces.
    type Ty;

    fn into_expr(self) -> Expr<Self::Ty>;

    fn into_node(self) -> Node {
        self.into_expr().into_node()
    }

    fn eq(self, other: impl Into<Operand>) -> Expr<bool> {
        compare(BinaryOp::Eq, self, other)
    }

    fn ne(self, other: impl Into<Operand>) -> Expr<bool> {
        compare(BinaryOp::Ne, self, other)
    }

    fn lt(self, other: impl Into<Operand>) -> Expr<bool> {
        compare(BinaryOp::Lt, self, other)
    }

    fn lte(self, other: impl Into<Operand>) -> Expr<bool> {
        compare(BinaryOp::Le, self, other)
    }

    fn gt(self, other: impl Into<Operand>) -> Expr<bool> {
        compare(BinaryOp::Gt, self, other)
    }

    fn gte(self, other: impl Into<Operand>) -> Expr<bool> {
        compare(BinaryOp::Ge, self, other)
    }

    fn is_null(self) -> Expr<bool> {
        compare(BinaryOp::Eq, self, Value::Null)
    }

    fn is_not_null(self) -> Expr<bool> {
        compare(BinaryOp::Ne, self, Value::Null)
    }

    /// `self IN (values...)`. `values` is usually a `Vec` or array.
    fn in_list(self, values: impl Into<Operand>) -> Expr<bool> {
        Expr::from_node(Node::function(
            Method::In,
            vec![self.into_node(), values.into().into_node()],
        ))
    }

    /// Descending ordering key; only valid in `order_by` and friends.
    fn desc(self) -> Expr<Self::Ty> {
        Expr::from_node(Node::method(Method::Desc, self.into_node(), vec![]))
    }

    /// `self AS "name"`; only valid as a select list member.
    fn alias(self, name: &str) -> Expr<Self::Ty> {
        Expr::from_node(Node::method(
            Method::As,
            self.into_node(),
            vec![Node::constant(name)],
        ))
    }

    /// `COALESCE(self, other)`.
    fn coalesce(self, other: impl Into<Operand>) -> Expr<Self::Ty> {
        Expr::from_node(Node::Coalesce {
            left: Box::new(self.into_node()),
            right: Box::new(other.into().into_node()),
        })
    }

    fn count(self) -> Expr<i64> {
        Expr::from_node(Node::function(Method::Count, vec![self.into_node()]))
    }

    fn count_distinct(self) -> Expr<i64> {
        Expr::from_node(Node::function(Method::CountDistinct, vec![self.into_node()]))
    }

    fn min(self) -> Expr<Self::Ty> {
        Expr::from_node(Node::function(Method::Min, vec![self.into_node()]))
    }

    fn max(self) -> Expr<Self::Ty> {
        Expr::from_node(Node::function(Method::Max, vec![self.into_node()]))
    }
}

fn compare<L: SqlExpr>(op: BinaryOp, left: L, right: impl Into<Operand>) -> Expr<bool> {
    Expr::from_node(Node::binary(op, left.into_node(), right.into().into_node()))
}

impl<T> SqlExpr for Expr<T> {
    type Ty = T;

    fn into_expr(self) -> Expr<T> {
        self
    }
}

impl<E, T> SqlExpr for Field<E, T> {
    type Ty = T;

    fn into_expr(self) -> Expr<T> {
        Expr::from_node(self.to_node())
    }
}

fn text_call<S: SqlExpr>(method: Method, receiver: S, args: Vec<Node>) -> Expr<S::Ty> {
    Expr::from_node(Node::method(method, receiver.into_node(), args))
}

fn like_call<S: SqlExpr>(
    method: Method,
    receiver: S,
    pattern: Operand,
    case: Option<MatchCase>,
) -> Expr<bool> {
    Expr::from_node(Node::Call(MethodCall {
        method,
        receiver: Some(Box::new(receiver.into_node())),
        args: vec![pattern.into_node()],
        match_case: case,
    }))
}

/// String functions.
pub trait TextExpr: SqlExpr<Ty: TextType> {
    fn to_upper(self) -> Expr<Self::Ty> {
        text_call(Method::ToUpper, self, vec![])
    }

    fn to_lower(self) -> Expr<Self::Ty> {
        text_call(Method::ToLower, self, vec![])
    }

    fn trim(self) -> Expr<Self::Ty> {
        text_call(Method::Trim, self, vec![])
    }

    fn trim_start(self) -> Expr<Self::Ty> {
        text_call(Method::TrimStart, self, vec![])
    }

    fn trim_end(self) -> Expr<Self::Ty> {
        text_call(Method::TrimEnd, self, vec![])
    }

    fn length(self) -> Expr<i64> {
        Expr::from_node(Node::method(Method::Length, self.into_node(), vec![]))
    }

    fn starts_with(self, pattern: impl Into<Operand>) -> Expr<bool> {
        like_call(Method::StartsWith, self, pattern.into(), None)
    }

    fn ends_with(self, pattern: impl Into<Operand>) -> Expr<bool> {
        like_call(Method::EndsWith, self, pattern.into(), None)
    }

    fn contains(self, pattern: impl Into<Operand>) -> Expr<bool> {
        like_call(Method::Contains, self, pattern.into(), None)
    }

    fn starts_with_case(self, pattern: impl Into<Operand>, case: MatchCase) -> Expr<bool> {
        like_call(Method::StartsWith, self, pattern.into(), Some(case))
    }

    fn ends_with_case(self, pattern: impl Into<Operand>, case: MatchCase) -> Expr<bool> {
        like_call(Method::EndsWith, self, pattern.into(), Some(case))
    }

    fn contains_case(self, pattern: impl Into<Operand>, case: MatchCase) -> Expr<bool> {
        like_call(Method::Contains, self, pattern.into(), Some(case))
    }

    /// Characters from the 0-based `start` to the end.
    fn substring(self, start: impl Into<Operand>) -> Expr<Self::Ty> {
        text_call(Method::Substring, self, vec![start.into().into_node()])
    }

    /// `length` characters from the 0-based `start`.
    fn substring_len(self, start: impl Into<Operand>, length: impl Into<Operand>) -> Expr<Self::Ty> {
        text_call(
            Method::Substring,
            self,
            vec![start.into().into_node(), length.into().into_node()],
        )
    }

    /// String concatenation; `+` is not defined for text.
    fn concat(self, other: impl Into<Operand>) -> Expr<String> {
        Expr::from_node(Node::function(
            Method::Concat,
            vec![self.into_node(), other.into().into_node()],
        ))
    }
}

impl<X: SqlExpr<Ty: TextType>> TextExpr for X {}

/// Math functions and numeric aggregates.
pub trait NumericExpr: SqlExpr<Ty: NumericType> {
    fn round(self) -> Expr<Self::Ty> {
        Expr::from_node(Node::function(Method::Round, vec![self.into_node()]))
    }

    fn round_to(self, digits: i32) -> Expr<Self::Ty> {
        Expr::from_node(Node::function(
            Method::Round,
            vec![self.into_node(), Node::constant(digits)],
        ))
    }

    fn floor(self) -> Expr<Self::Ty> {
        Expr::from_node(Node::function(Method::Floor, vec![self.into_node()]))
    }

    fn ceiling(self) -> Expr<Self::Ty> {
        Expr::from_node(Node::function(Method::Ceiling, vec![self.into_node()]))
    }

    fn abs(self) -> Expr<Self::Ty> {
        Expr::from_node(Node::function(Method::Abs, vec![self.into_node()]))
    }

    fn sum(self) -> Expr<Self::Ty> {
        Expr::from_node(Node::function(Method::Sum, vec![self.into_node()]))
    }

    fn avg(self) -> Expr<f64> {
        Expr::from_node(Node::function(Method::Avg, vec![self.into_node()]))
    }
}

impl<X: SqlExpr<Ty: NumericType>> NumericExpr for X {}

/// Logical connectives.
pub trait BoolExpr: SqlExpr<Ty: BoolType> {
    fn and<R: SqlExpr<Ty: BoolType>>(self, other: R) -> Expr<bool> {
        Expr::from_node(Node::binary(BinaryOp::And, self.into_node(), other.into_node()))
    }

    fn or<R: SqlExpr<Ty: BoolType>>(self, other: R) -> Expr<bool> {
        Expr::from_node(Node::binary(BinaryOp::Or, self.into_node(), other.into_node()))
    }
}

impl<X: SqlExpr<Ty: BoolType>> BoolExpr for X {}

macro_rules! impl_arith {
    ($($trait:ident $method:ident $op:ident),*) => {
        $(
            impl<T: NumericType, R: Into<Operand>> $trait<R> for Expr<T> {
                type Output = Expr<T>;

                fn $method(self, rhs: R) -> Expr<T> {
                    Expr::from_node(Node::binary(BinaryOp::$op, self.into_node(), rhs.into().into_node()))
                }
            }

            impl<E: Entity, T: NumericType, R: Into<Operand>> $trait<R> for Field<E, T> {
                type Output = Expr<T>;

                fn $method(self, rhs: R) -> Expr<T> {
                    Expr::from_node(Node::binary(BinaryOp::$op, self.to_node(), rhs.into().into_node()))
                }
            }
        )*
    };
}

impl_arith!(Add add Add, Sub sub Sub, Mul mul Mul, Div div Div, Rem rem Rem);

impl<T: NumericType> Neg for Expr<T> {
    type Output = Expr<T>;

    fn neg(self) -> Expr<T> {
        Expr::from_node(Node::unary(UnaryOp::Negate, self.into_node()))
    }
}

impl<E: Entity, T: NumericType> Neg for Field<E, T> {
    type Output = Expr<T>;

    fn neg(self) -> Expr<T> {
        Expr::from_node(Node::unary(UnaryOp::Negate, self.to_node()))
    }
}

impl<T: BoolType> Not for Expr<T> {
    type Output = Expr<bool>;

    fn not(self) -> Expr<bool> {
        Expr::from_node(Node::unary(UnaryOp::Not, self.into_node()))
    }
}

impl<E: Entity, T: BoolType> Not for Field<E, T> {
    type Output = Expr<bool>;

    fn not(self) -> Expr<bool> {
        Expr::from_node(Node::unary(UnaryOp::Not, self.to_node()))
    }
}

impl<T: BoolType, R: SqlExpr<Ty: BoolType>> BitAnd<R> for Expr<T> {
    type Output = Expr<bool>;

    fn bitand(self, rhs: R) -> Expr<bool> {
        self.and(rhs)
    }
}

impl<T: BoolType, R: SqlExpr<Ty: BoolType>> BitOr<R> for Expr<T> {
    type Output = Expr<bool>;

    fn bitor(self, rhs: R) -> Expr<bool> {
        self.or(rhs)
    }
}

impl<E: Entity, T: BoolType, R: SqlExpr<Ty: BoolType>> BitAnd<R> for Field<E, T> {
    type Output = Expr<bool>;

    fn bitand(self, rhs: R) -> Expr<bool> {
        self.and(rhs)
    }
}

impl<E: Entity, T: BoolType, R: SqlExpr<Ty: BoolType>> BitOr<R> for Field<E, T> {
    type Output = Expr<bool>;

    fn bitor(self, rhs: R) -> Expr<bool> {
        self.or(rhs)
    }
}
