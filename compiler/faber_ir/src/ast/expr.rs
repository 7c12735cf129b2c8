//! Expression nodes.

use super::{AssignOp, BinaryOp, Block, Param, TypeExpr, UnaryOp};
use crate::{SemanticType, Span};

/// An expression node.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
    /// Type attached by semantic analysis, if it resolved one.
    pub resolved: Option<SemanticType>,
}

/// Literal values.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Literal {
    Integer(i64),
    Float(f64),
    String(String),
    Bool(bool),
    /// `nihil`
    Nil,
    /// Arbitrary-precision decimal, kept as its source digits.
    Decimal(String),
}

/// A piece of a template string.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TemplatePart {
    Text(String),
    Expr(Expr),
}

/// An entry in an object literal.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ObjectEntry {
    Field { key: String, value: Expr },
    Spread(Expr),
}

/// How a member is accessed.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MemberAccess {
    /// `a.b`
    Plain,
    /// `a?.b`
    Optional,
    /// `a!.b`
    NonNull,
}

/// Body of a lambda.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LambdaBody {
    Expr(Box<Expr>),
    Block(Block),
}

/// `pro x, y: body`
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Lambda {
    pub params: Vec<Param>,
    pub ret: Option<TypeExpr>,
    pub body: LambdaBody,
    pub is_async: bool,
}

/// How `novum` initialises the new instance.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NewInit {
    /// `novum Foo(a, b)`
    Args(Vec<Expr>),
    /// `novum Foo { a: 1, b: 2 }`
    Fields(Vec<(String, Expr)>),
}

/// Either form of `praefixum`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ComptimeBody {
    /// `praefixum(expr)`
    Expr(Box<Expr>),
    /// `praefixum { ... redde value }`
    Block(Block),
}

/// Expression kinds.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExprKind {
    Literal(Literal),
    /// `` `Salve, ${nomen}` ``
    Template(Vec<TemplatePart>),
    Ident(String),
    /// `ego`
    SelfRef,
    Array(Vec<Expr>),
    Object(Vec<ObjectEntry>),
    /// `a..b`, `a usque b`, optionally `per step`
    Range {
        start: Box<Expr>,
        end: Box<Expr>,
        step: Option<Box<Expr>>,
        inclusive: bool,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Assign {
        op: AssignOp,
        target: Box<Expr>,
        value: Box<Expr>,
    },
    /// `cond sic a secus b`
    Conditional {
        cond: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    /// `receiver.method(args)`; the collection registries key off these.
    MethodCall {
        receiver: Box<Expr>,
        method: String,
        args: Vec<Expr>,
        optional: bool,
    },
    Member {
        object: Box<Expr>,
        property: String,
        access: MemberAccess,
    },
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
    },
    Lambda(Lambda),
    /// `novum Class ...`
    New {
        class: String,
        init: NewInit,
    },
    /// `cede expr`: await or yield depending on the enclosing function.
    Cede(Box<Expr>),
    /// `x est T`
    TypeCheck {
        expr: Box<Expr>,
        ty: TypeExpr,
        negated: bool,
    },
    /// `x qua T`
    Cast {
        expr: Box<Expr>,
        ty: TypeExpr,
    },
    /// `[] innatum lista<T>`: literal built as a native container.
    Native {
        expr: Box<Expr>,
        ty: TypeExpr,
    },
    /// `praefixum`
    Comptime(ComptimeBody),
    /// `sparge x`; valid only inside array, object and argument lists.
    Spread(Box<Expr>),
    Paren(Box<Expr>),
}

impl ExprKind {
    /// Stable node-kind name used in diagnostics.
    pub const fn name(&self) -> &'static str {
        match self {
            ExprKind::Literal(_) => "Literal",
            ExprKind::Template(_) => "Template",
            ExprKind::Ident(_) => "Ident",
            ExprKind::SelfRef => "SelfRef",
            ExprKind::Array(_) => "Array",
            ExprKind::Object(_) => "Object",
            ExprKind::Range { .. } => "Range",
            ExprKind::Binary { .. } => "Binary",
            ExprKind::Unary { .. } => "Unary",
            ExprKind::Assign { .. } => "Assign",
            ExprKind::Conditional { .. } => "Conditional",
            ExprKind::Call { .. } => "Call",
            ExprKind::MethodCall { .. } => "MethodCall",
            ExprKind::Member { .. } => "Member",
            ExprKind::Index { .. } => "Index",
            ExprKind::Lambda(_) => "Lambda",
            ExprKind::New { .. } => "New",
            ExprKind::Cede(_) => "Cede",
            ExprKind::TypeCheck { .. } => "TypeCheck",
            ExprKind::Cast { .. } => "Cast",
            ExprKind::Native { .. } => "Native",
            ExprKind::Comptime(_) => "Comptime",
            ExprKind::Spread(_) => "Spread",
            ExprKind::Paren(_) => "Paren",
        }
    }
}

impl Expr {
    /// Create an expression with no resolved type.
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr {
            kind,
            span,
            resolved: None,
        }
    }

    /// Attach a resolved type.
    #[must_use]
    pub fn with_type(mut self, ty: SemanticType) -> Self {
        self.resolved = Some(ty);
        self
    }

    pub fn int(value: i64) -> Self {
        Expr::new(ExprKind::Literal(Literal::Integer(value)), Span::DUMMY)
    }

    pub fn float(value: f64) -> Self {
        Expr::new(ExprKind::Literal(Literal::Float(value)), Span::DUMMY)
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expr::new(ExprKind::Literal(Literal::String(value.into())), Span::DUMMY)
    }

    pub fn bool(value: bool) -> Self {
        Expr::new(ExprKind::Literal(Literal::Bool(value)), Span::DUMMY)
    }

    pub fn nil() -> Self {
        Expr::new(ExprKind::Literal(Literal::Nil), Span::DUMMY)
    }

    pub fn ident(name: impl Into<String>) -> Self {
        Expr::new(ExprKind::Ident(name.into()), Span::DUMMY)
    }

    pub fn array(elements: Vec<Expr>) -> Self {
        Expr::new(ExprKind::Array(elements), Span::DUMMY)
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::new(
            ExprKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            Span::DUMMY,
        )
    }

    pub fn call(callee: Expr, args: Vec<Expr>) -> Self {
        Expr::new(
            ExprKind::Call {
                callee: Box::new(callee),
                args,
            },
            Span::DUMMY,
        )
    }

    pub fn method_call(receiver: Expr, method: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::new(
            ExprKind::MethodCall {
                receiver: Box::new(receiver),
                method: method.into(),
                args,
                optional: false,
            },
            Span::DUMMY,
        )
    }

    pub fn member(object: Expr, property: impl Into<String>) -> Self {
        Expr::new(
            ExprKind::Member {
                object: Box::new(object),
                property: property.into(),
                access: MemberAccess::Plain,
            },
            Span::DUMMY,
        )
    }

    pub fn cede(inner: Expr) -> Self {
        Expr::new(ExprKind::Cede(Box::new(inner)), Span::DUMMY)
    }

    pub fn assign(target: Expr, value: Expr) -> Self {
        Expr::new(
            ExprKind::Assign {
                op: AssignOp::Assign,
                target: Box::new(target),
                value: Box::new(value),
            },
            Span::DUMMY,
        )
    }

    pub fn lambda(params: Vec<Param>, body: Expr) -> Self {
        Expr::new(
            ExprKind::Lambda(Lambda {
                params,
                ret: None,
                body: LambdaBody::Expr(Box::new(body)),
                is_async: false,
            }),
            Span::DUMMY,
        )
    }

    /// The expression with any redundant parentheses removed.
    pub fn unparen(&self) -> &Expr {
        let mut e = self;
        while let ExprKind::Paren(inner) = &e.kind {
            e = inner;
        }
        e
    }
}
