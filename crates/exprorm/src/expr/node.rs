use crate::dialect::MatchCase;
use crate::meta::TableDef;
use crate::value::Value;

/// A node of a compiled-to-be expression tree.
///
/// The set is closed: every variant is handled by the visitor and anything
/// the compiler cannot express is represented as a [`Method::Other`] call,
/// which fails with `UnsupportedExpression`.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Constant(Value),
    Member(MemberRef),
    Unary {
        op: UnaryOp,
        operand: Box<Node>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Node>,
        right: Box<Node>,
    },
    Coalesce {
        left: Box<Node>,
        right: Box<Node>,
    },
    Conditional {
        test: Box<Node>,
        if_true: Box<Node>,
        if_false: Box<Node>,
    },
    Call(MethodCall),
    List(Vec<Node>),
    New(Vec<ProjectionMember>),
}

impl Node {
    pub fn constant(value: impl Into<Value>) -> Self {
        Node::Constant(value.into())
    }

    pub fn member(table: &'static TableDef, field: &'static str) -> Self {
        Node::Member(MemberRef { table, field })
    }

    pub fn unary(op: UnaryOp, operand: Node) -> Self {
        Node::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn binary(op: BinaryOp, left: Node, right: Node) -> Self {
        Node::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// A call in receiver form: `receiver.method(args)`.
    pub fn method(method: Method, receiver: Node, args: Vec<Node>) -> Self {
        Node::Call(MethodCall {
            method,
            receiver: Some(Box::new(receiver)),
            args,
            match_case: None,
        })
    }

    /// A call in static form: `method(args)`.
    pub fn function(method: Method, args: Vec<Node>) -> Self {
        Node::Call(MethodCall {
            method,
            receiver: None,
            args,
            match_case: None,
        })
    }

    /// Whether this node is a call to `method`.
    pub fn is_call(&self, method: &Method) -> bool {
        matches!(self, Node::Call(call) if &call.method == method)
    }
}

/// Access to a mapped field of an entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemberRef {
    pub table: &'static TableDef,
    pub field: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Negate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl BinaryOp {
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge
        )
    }

    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }

    /// SQL spelling of the operator.
    pub fn as_sql(self) -> &'static str {
        match self {
            BinaryOp::Eq => "=",
            BinaryOp::Ne => "<>",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "AND",
            BinaryOp::Or => "OR",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
        }
    }
}

/// Methods the translation table knows, plus an escape hatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    ToUpper,
    ToLower,
    Trim,
    TrimStart,
    TrimEnd,
    Length,
    StartsWith,
    EndsWith,
    Contains,
    Substring,
    Round,
    Floor,
    Ceiling,
    Abs,
    Concat,
    In,
    Desc,
    As,
    Sum,
    Count,
    CountDistinct,
    Min,
    Max,
    Avg,
    /// Any method without a translation.
    Other(String),
}

impl Method {
    pub fn name(&self) -> &str {
        match self {
            Method::ToUpper => "to_upper",
            Method::ToLower => "to_lower",
            Method::Trim => "trim",
            Method::TrimStart => "trim_start",
            Method::TrimEnd => "trim_end",
            Method::Length => "length",
            Method::StartsWith => "starts_with",
            Method::EndsWith => "ends_with",
            Method::Contains => "contains",
            Method::Substring => "substring",
            Method::Round => "round",
            Method::Floor => "floor",
            Method::Ceiling => "ceiling",
            Method::Abs => "abs",
            Method::Concat => "concat",
            Method::In => "in",
            Method::Desc => "desc",
            Method::As => "as",
            Method::Sum => "sum",
            Method::Count => "count",
            Method::CountDistinct => "count_distinct",
            Method::Min => "min",
            Method::Max => "max",
            Method::Avg => "avg",
            Method::Other(name) => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodCall {
    pub method: Method,
    /// `None` for the static (function) form.
    pub receiver: Option<Box<Node>>,
    pub args: Vec<Node>,
    /// Per-call case sensitivity for string matching.
    pub match_case: Option<MatchCase>,
}

impl MethodCall {
    /// Receiver followed by arguments, as a single operand list.
    pub fn operands(&self) -> Vec<&Node> {
        self.receiver
            .as_deref()
            .into_iter()
            .chain(self.args.iter())
            .collect()
    }
}

/// One member of an anonymous projection.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionMember {
    pub alias: Option<String>,
    pub node: Node,
}
