use super::node::{Node, ProjectionMember};
use super::typed::{Expr, Field, Operand};

/// A list of expressions: select lists, ordering keys, field whitelists,
/// grouping keys and concatenation arguments.
///
/// Implemented for single fields and expressions, tuples of operands, and
/// vectors built at runtime.
pub trait Projection {
    fn into_members(self) -> Vec<ProjectionMember>;

    /// The projection as an anonymous-object node.
    fn into_object_node(self) -> Node
    where
        Self: Sized,
    {
        Node::New(self.into_members())
    }
}

fn unnamed(node: Node) -> ProjectionMember {
    ProjectionMember { alias: None, node }
}

impl<T> Projection for Expr<T> {
    fn into_members(self) -> Vec<ProjectionMember> {
        vec![unnamed(self.into_node())]
    }
}

impl<E, T> Projection for Field<E, T> {
    fn into_members(self) -> Vec<ProjectionMember> {
        vec![unnamed(self.to_node())]
    }
}

impl Projection for Vec<Operand> {
    fn into_members(self) -> Vec<ProjectionMember> {
        self.into_iter().map(|o| unnamed(o.into_node())).collect()
    }
}

impl Projection for Vec<ProjectionMember> {
    fn into_members(self) -> Vec<ProjectionMember> {
        self
    }
}

macro_rules! impl_tuple_projection {
    ($($name:ident),+) => {
        impl<$($name: Into<Operand>),+> Projection for ($($name,)+) {
            #[allow(non_snake_case)]
            fn into_members(self) -> Vec<ProjectionMember> {
                let ($($name,)+) = self;
                vec![$(unnamed($name.into().into_node())),+]
            }
        }
    };
}

impl_tuple_projection!(A);
impl_tuple_projection!(A, B);
impl_tuple_projection!(A, B, C);
impl_tuple_projection!(A, B, C, D);
impl_tuple_projection!(A, B, C, D, F);
impl_tuple_projection!(A, B, C, D, F, G);
impl_tuple_projection!(A, B, C, D, F, G, H);
impl_tuple_projection!(A, B, C, D, F, G, H, I);
impl_tuple_projection!(A, B, C, D, F, G, H, I, J);
impl_tuple_projection!(A, B, C, D, F, G, H, I, J, K);
