use super::node::{MemberRef, Node};
use crate::meta::Entity;
use crate::value::Value;
use std::fmt;
use std::marker::PhantomData;

/// A mapped field of entity `E` holding values of type `T`.
///
/// Field handles are produced by `#[derive(Entity)]` and handed to predicate
/// and selector closures.
pub struct Field<E, T> {
    member: MemberRef,
    _marker: PhantomData<fn() -> (E, T)>,
}

impl<E: Entity, T> Field<E, T> {
    pub fn new(field: &'static str) -> Self {
        Self {
            member: MemberRef {
                table: E::table_def(),
                field,
            },
            _marker: PhantomData,
        }
    }
}

impl<E, T> Field<E, T> {
    /// Rust field name.
    pub fn name(&self) -> &'static str {
        self.member.field
    }

    pub fn member(&self) -> MemberRef {
        self.member
    }

    pub fn to_node(&self) -> Node {
        Node::Member(self.member)
    }
}

impl<E, T> Clone for Field<E, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E, T> Copy for Field<E, T> {}

impl<E, T> fmt::Debug for Field<E, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("table", &self.member.table.name)
            .field("field", &self.member.field)
            .finish()
    }
}

/// An expression producing values of type `T`.
pub struct Expr<T> {
    node: Node,
    _ty: PhantomData<fn() -> T>,
}

impl<T> Expr<T> {
    /// Wrap an untyped node.
    pub fn from_node(node: Node) -> Self {
        Self {
            node,
            _ty: PhantomData,
        }
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    pub fn into_node(self) -> Node {
        self.node
    }
}

impl<T: Into<Value>> Expr<T> {
    /// A literal value.
    pub fn value(value: T) -> Self {
        Self::from_node(Node::Constant(value.into()))
    }
}

impl<T> Clone for Expr<T> {
    fn clone(&self) -> Self {
        Self::from_node(self.node.clone())
    }
}

impl<T> fmt::Debug for Expr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Expr").field(&self.node).finish()
    }
}

/// Anything usable as the operand of an expression: fields, expressions,
/// and plain values (which become constants).
#[derive(Debug, Clone, PartialEq)]
pub struct Operand(Node);

impl Operand {
    pub fn into_node(self) -> Node {
        self.0
    }
}

impl<T> From<Expr<T>> for Operand {
    fn from(expr: Expr<T>) -> Self {
        Operand(expr.node)
    }
}

impl<E, T> From<Field<E, T>> for Operand {
    fn from(field: Field<E, T>) -> Self {
        Operand(field.to_node())
    }
}

impl From<Node> for Operand {
    fn from(node: Node) -> Self {
        Operand(node)
    }
}

impl<V: Into<Value>> From<V> for Operand {
    fn from(value: V) -> Self {
        Operand(Node::Constant(value.into()))
    }
}
