//! Statement and declaration nodes.

use super::{Expr, Literal, TypeExpr};
use crate::{Comment, Comments, Span};

/// A statement node.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
    pub comments: Comments,
}

/// A braced sequence of statements.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

impl Block {
    pub fn new(stmts: Vec<Stmt>) -> Self {
        Block {
            stmts,
            span: Span::DUMMY,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stmts.is_empty()
    }
}

/// `importa { a, b ut c } ex "path"` or `importa * ut ns ex "path"`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImportDecl {
    pub source: String,
    pub items: ImportItems,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ImportItems {
    Named(Vec<ImportName>),
    Namespace(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImportName {
    pub name: String,
    pub alias: Option<String>,
}

/// What a variable declaration binds.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BindingTarget {
    Ident(String),
    /// `fixum { a, b ut c } = obj`: (field, local alias)
    Object(Vec<(String, Option<String>)>),
    /// `fixum [a, b] = list`
    Array(Vec<String>),
}

/// `varia` (mutable) or `fixum` (immutable) declaration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VarDecl {
    pub mutable: bool,
    pub target: BindingTarget,
    pub ty: Option<TypeExpr>,
    pub init: Option<Expr>,
}

/// A function or lambda parameter.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Param {
    pub name: String,
    pub ty: Option<TypeExpr>,
    pub default: Option<Expr>,
    pub rest: bool,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: Option<TypeExpr>) -> Self {
        Param {
            name: name.into(),
            ty,
            default: None,
            rest: false,
        }
    }
}

/// The four function modes.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FunctionMode {
    #[default]
    Sync,
    /// `futura`
    Async,
    /// `cursor`
    Generator,
    /// `futura cursor`
    AsyncGenerator,
}

impl FunctionMode {
    #[inline]
    pub const fn is_async(self) -> bool {
        matches!(self, FunctionMode::Async | FunctionMode::AsyncGenerator)
    }

    #[inline]
    pub const fn is_generator(self) -> bool {
        matches!(self, FunctionMode::Generator | FunctionMode::AsyncGenerator)
    }
}

/// `functio name(params) -> ret { body }`. A missing body is abstract.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FunctionDecl {
    pub name: String,
    pub type_params: Vec<String>,
    pub params: Vec<Param>,
    pub ret: Option<TypeExpr>,
    pub mode: FunctionMode,
    pub body: Option<Block>,
}

impl FunctionDecl {
    pub fn new(name: impl Into<String>, params: Vec<Param>, body: Block) -> Self {
        FunctionDecl {
            name: name.into(),
            type_params: Vec::new(),
            params,
            ret: None,
            mode: FunctionMode::Sync,
            body: Some(body),
        }
    }

    #[must_use]
    pub fn returning(mut self, ret: TypeExpr) -> Self {
        self.ret = Some(ret);
        self
    }

    #[must_use]
    pub fn with_mode(mut self, mode: FunctionMode) -> Self {
        self.mode = mode;
        self
    }
}

/// A class field.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldDecl {
    pub name: String,
    pub ty: TypeExpr,
    pub init: Option<Expr>,
}

/// `genus Name implet A, B { fields; creo { ... } methods }`
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassDecl {
    pub name: String,
    pub type_params: Vec<String>,
    pub implements: Vec<String>,
    pub fields: Vec<FieldDecl>,
    /// `creo` block, run after field initialisation.
    pub constructor: Option<Block>,
    pub methods: Vec<FunctionDecl>,
}

/// A method signature in a `pactum`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MethodSig {
    pub name: String,
    pub params: Vec<Param>,
    pub ret: Option<TypeExpr>,
    pub mode: FunctionMode,
}

/// `pactum Name { signatures }`
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InterfaceDecl {
    pub name: String,
    pub type_params: Vec<String>,
    pub methods: Vec<MethodSig>,
}

/// `ordo Name { a, b = 2 }`
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnumDecl {
    pub name: String,
    pub members: Vec<EnumMember>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnumMember {
    pub name: String,
    pub value: Option<Literal>,
}

/// `discretio Name { Variant { field: T } ... }`
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnionDecl {
    pub name: String,
    pub type_params: Vec<String>,
    pub variants: Vec<Variant>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Variant {
    pub name: String,
    pub fields: Vec<VariantField>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VariantField {
    pub name: String,
    pub ty: TypeExpr,
}

/// `typus Name = T`
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeAliasDecl {
    pub name: String,
    pub ty: TypeExpr,
}

/// `si cond { } sin cond { } secus { }`
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IfStmt {
    pub cond: Expr,
    pub then: Block,
    pub otherwise: Option<ElseBranch>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ElseBranch {
    /// `sin`
    If(Box<IfStmt>),
    /// `secus`
    Block(Block),
}

/// Which side of an iterable a `for` loop binds.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ForKind {
    /// `ex items pro x`
    Values,
    /// `de obj pro k`
    Keys,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ForStmt {
    pub kind: ForKind,
    pub binding: String,
    pub iterable: Expr,
    /// `ex stream fiet x`: iterate an async stream.
    pub is_async: bool,
    pub body: Block,
}

/// `elige x { casu 1, 2 { } ceterum { } }`
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SwitchStmt {
    pub discriminant: Expr,
    pub cases: Vec<SwitchCase>,
    pub default: Option<Block>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SwitchCase {
    pub values: Vec<Expr>,
    pub body: Block,
}

/// How a `discerne` arm binds the variant's payload.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VariantBinding {
    None,
    /// `casu Circulus ut c`
    Alias(String),
    /// `casu Punctum pro x, y`: positional field names
    Fields(Vec<String>),
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchArm {
    pub variant: String,
    pub binding: VariantBinding,
    pub body: Block,
}

/// `discerne subject { casu Variant ... }`
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchStmt {
    pub subject: Expr,
    pub arms: Vec<MatchArm>,
    pub default: Option<Block>,
}

/// One `si cond { exit }` clause of `custodi`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GuardClause {
    pub cond: Expr,
    pub body: Block,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CatchClause {
    pub param: String,
    pub body: Block,
}

/// `tempta { } cape err { } demum { }`
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TryStmt {
    pub body: Block,
    pub catch: Option<CatchClause>,
    pub finally: Option<Block>,
}

/// Severity of a raise.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RaiseKind {
    /// `iace`: recoverable
    Error,
    /// `mori`: unrecoverable, aborts
    Fatal,
}

/// Output channel of a print statement.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PrintLevel {
    /// `scribe`
    Log,
    /// `vide`
    Debug,
    /// `mone`
    Warn,
}

impl PrintLevel {
    pub const fn keyword(self) -> &'static str {
        match self {
            PrintLevel::Log => "scribe",
            PrintLevel::Debug => "vide",
            PrintLevel::Warn => "mone",
        }
    }
}

/// What a `cura` block acquires.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResourceKind {
    /// `cura arena fit a { }`
    Arena,
    /// `cura page fit a { }`
    Page,
    /// `cura expr fit r { }`: any disposable resource
    Acquire(Expr),
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceStmt {
    pub kind: ResourceKind,
    pub binding: String,
    pub body: Block,
}

/// Statement kinds.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StmtKind {
    Import(ImportDecl),
    Var(VarDecl),
    Function(FunctionDecl),
    Class(ClassDecl),
    Interface(InterfaceDecl),
    Enum(EnumDecl),
    Union(UnionDecl),
    TypeAlias(TypeAliasDecl),
    If(IfStmt),
    While { cond: Expr, body: Block },
    For(ForStmt),
    Switch(SwitchStmt),
    Match(MatchStmt),
    /// `custodi { clauses }`
    Guard(Vec<GuardClause>),
    Try(TryStmt),
    Raise { kind: RaiseKind, value: Expr },
    Return(Option<Expr>),
    Break,
    Continue,
    Block(Block),
    Expr(Expr),
    Print { level: PrintLevel, args: Vec<Expr> },
    /// `adfirma cond, message`
    Assert { cond: Expr, message: Option<Expr> },
    Resource(ResourceStmt),
    /// `incipit { }` or `incipiet { }` (async)
    Entry { is_async: bool, body: Block },
}

impl StmtKind {
    /// Stable node-kind name used in diagnostics.
    pub const fn name(&self) -> &'static str {
        match self {
            StmtKind::Import(_) => "Import",
            StmtKind::Var(_) => "Var",
            StmtKind::Function(_) => "Function",
            StmtKind::Class(_) => "Class",
            StmtKind::Interface(_) => "Interface",
            StmtKind::Enum(_) => "Enum",
            StmtKind::Union(_) => "Union",
            StmtKind::TypeAlias(_) => "TypeAlias",
            StmtKind::If(_) => "If",
            StmtKind::While { .. } => "While",
            StmtKind::For(_) => "For",
            StmtKind::Switch(_) => "Switch",
            StmtKind::Match(_) => "Match",
            StmtKind::Guard(_) => "Guard",
            StmtKind::Try(_) => "Try",
            StmtKind::Raise { .. } => "Raise",
            StmtKind::Return(_) => "Return",
            StmtKind::Break => "Break",
            StmtKind::Continue => "Continue",
            StmtKind::Block(_) => "Block",
            StmtKind::Expr(_) => "Expr",
            StmtKind::Print { .. } => "Print",
            StmtKind::Assert { .. } => "Assert",
            StmtKind::Resource(_) => "Resource",
            StmtKind::Entry { .. } => "Entry",
        }
    }
}

impl Stmt {
    /// Create a statement with no comments.
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Stmt {
            kind,
            span,
            comments: Comments::default(),
        }
    }

    /// Attach a leading comment.
    #[must_use]
    pub fn with_leading(mut self, comment: Comment) -> Self {
        self.comments.leading.push(comment);
        self
    }

    /// Attach a trailing comment.
    #[must_use]
    pub fn with_trailing(mut self, comment: Comment) -> Self {
        self.comments.trailing.push(comment);
        self
    }

    pub fn expr(expr: Expr) -> Self {
        Stmt::new(StmtKind::Expr(expr), Span::DUMMY)
    }

    /// `varia name = init`
    pub fn varia(name: impl Into<String>, init: Expr) -> Self {
        Stmt::var(true, name, init)
    }

    /// `fixum name = init`
    pub fn fixum(name: impl Into<String>, init: Expr) -> Self {
        Stmt::var(false, name, init)
    }

    fn var(mutable: bool, name: impl Into<String>, init: Expr) -> Self {
        Stmt::new(
            StmtKind::Var(VarDecl {
                mutable,
                target: BindingTarget::Ident(name.into()),
                ty: None,
                init: Some(init),
            }),
            Span::DUMMY,
        )
    }

    pub fn function(decl: FunctionDecl) -> Self {
        Stmt::new(StmtKind::Function(decl), Span::DUMMY)
    }

    pub fn ret(value: Option<Expr>) -> Self {
        Stmt::new(StmtKind::Return(value), Span::DUMMY)
    }

    pub fn raise(kind: RaiseKind, value: Expr) -> Self {
        Stmt::new(StmtKind::Raise { kind, value }, Span::DUMMY)
    }

    pub fn print(args: Vec<Expr>) -> Self {
        Stmt::new(
            StmtKind::Print {
                level: PrintLevel::Log,
                args,
            },
            Span::DUMMY,
        )
    }
}
