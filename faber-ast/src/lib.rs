#![forbid(unsafe_code)]

use faber_types::SemanticType;
use miette::SourceSpan;

pub type Span = SourceSpan;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Spanned<T> {
    pub span: Span,
    pub node: T,
}

impl<T> Spanned<T> {
    pub fn new(span: Span, node: T) -> Self {
        Self { span, node }
    }
}

pub fn span(start: usize, len: usize) -> Span {
    SourceSpan::new(start.into(), len)
}

pub type Ident = Spanned<String>;

#[derive(Clone, Debug, PartialEq)]
pub struct Program {
    pub stmts: Vec<Stmt>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    /// `ex norma importa scribe, lege`
    Import(ImportDecl),
    /// `varia x = 5`, `fixum textus nomen = "Marcus"`
    Varia(VariaDecl),
    /// `functio salve(textus nomen) -> textus { ... }`
    Functio(FunctioDecl),
    /// `typus Nomen = textus`
    Typus(TypeAliasDecl),
    If(IfStmt),
    While(WhileStmt),
    ForOf(ForOfStmt),
    Switch(SwitchStmt),
    Try(TryStmt),
    Return(ReturnStmt),
    Throw(ThrowStmt),
    Break(Span),
    Continue(Span),
    Block(Block),
    ExprStmt(Expr),
}

/// A name introduced by a declaration; carries its resolved type after analysis.
#[derive(Clone, Debug, PartialEq)]
pub struct Binding {
    pub span: Span,
    pub name: String,
    pub resolved_type: SemanticType,
}

impl Binding {
    pub fn new(span: Span, name: impl Into<String>) -> Self {
        Binding {
            span,
            name: name.into(),
            resolved_type: SemanticType::unknown(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VariaKind {
    /// `varia`: reassignable.
    Varia,
    /// `fixum`: bound once.
    Fixum,
}

impl VariaKind {
    pub fn is_mutable(&self) -> bool {
        matches!(self, VariaKind::Varia)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Pattern {
    Name(Binding),
    /// `fixum { nomen, aetas } = persona`
    Destructure { span: Span, bindings: Vec<Binding> },
}

#[derive(Clone, Debug, PartialEq)]
pub struct VariaDecl {
    pub span: Span,
    pub kind: VariaKind,
    pub pattern: Pattern,
    pub annotation: Option<TypeAnnotation>,
    pub init: Option<Expr>,
    pub resolved_type: SemanticType,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub span: Span,
    pub name: Binding,
    pub annotation: Option<TypeAnnotation>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctioDecl {
    pub span: Span,
    pub name: Binding,
    pub params: Vec<Param>,
    pub returns: Option<TypeAnnotation>,
    /// `futura functio`
    pub is_async: bool,
    pub body: Block,
    pub resolved_type: SemanticType,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TypeAliasDecl {
    pub span: Span,
    pub name: Ident,
    pub target: TypeAnnotation,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ImportDecl {
    pub span: Span,
    /// Module name (`norma`) or quoted path (`"lorem"`), without quotes.
    pub source: Ident,
    pub specifiers: ImportSpecifiers,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ImportSpecifiers {
    /// `ex norma importa *`
    Wildcard { span: Span },
    Named(Vec<ImportSpecifier>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ImportSpecifier {
    pub span: Span,
    pub imported: Ident,
    /// `ut` alias: `ex norma importa scribe ut dic`
    pub local: Option<Ident>,
}

impl ImportSpecifier {
    pub fn local_name(&self) -> &Ident {
        self.local.as_ref().unwrap_or(&self.imported)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    pub span: Span,
    pub stmts: Vec<Stmt>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct IfStmt {
    pub span: Span,
    pub cond: Expr,
    pub then_block: Block,
    pub else_branch: Option<ElseBranch>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ElseBranch {
    Block(Block),
    /// `secus si ...`
    If(Box<IfStmt>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct WhileStmt {
    pub span: Span,
    pub cond: Expr,
    pub body: Block,
}

/// `ex numeri pro n { ... }`
#[derive(Clone, Debug, PartialEq)]
pub struct ForOfStmt {
    pub span: Span,
    pub binding: Binding,
    pub iterable: Expr,
    pub body: Block,
}

/// `elige x { casu 1 { ... } ceterum { ... } }`
#[derive(Clone, Debug, PartialEq)]
pub struct SwitchStmt {
    pub span: Span,
    pub discriminant: Expr,
    pub cases: Vec<SwitchCase>,
    pub default: Option<Block>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SwitchCase {
    pub span: Span,
    pub test: Expr,
    pub body: Block,
}

/// `tempta { ... } cape err { ... } demum { ... }`
#[derive(Clone, Debug, PartialEq)]
pub struct TryStmt {
    pub span: Span,
    pub body: Block,
    pub catch: Option<CatchClause>,
    pub finally: Option<Block>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CatchClause {
    pub span: Span,
    pub param: Option<Binding>,
    pub body: Block,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReturnStmt {
    pub span: Span,
    pub value: Option<Expr>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ThrowStmt {
    pub span: Span,
    pub value: Expr,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TypeAnnotation {
    pub span: Span,
    pub kind: TypeAnnotationKind,
    /// Trailing `?`.
    pub nullable: bool,
}

impl TypeAnnotation {
    pub fn named(span: Span, name: impl Into<String>) -> Self {
        TypeAnnotation {
            span,
            kind: TypeAnnotationKind::Named {
                name: Ident::new(span, name.into()),
                args: Vec::new(),
            },
            nullable: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum TypeAnnotationKind {
    /// `numerus`, `lista<textus>`, `numerus<32, Naturalis>`
    Named { name: Ident, args: Vec<TypeArg> },
    /// `textus | nihil`
    Union(Vec<TypeAnnotation>),
    /// `(numerus, numerus) -> bivalens`, optionally `futura`.
    Function {
        params: Vec<TypeAnnotation>,
        returns: Box<TypeAnnotation>,
        is_async: bool,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub enum TypeArg {
    Type(Box<TypeAnnotation>),
    /// Bit width: `numerus<64>`.
    Size(u32),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub span: Span,
    pub kind: ExprKind,
    /// `Unknown` until the analyzer visits the node.
    pub resolved_type: SemanticType,
}

impl Expr {
    pub fn new(span: Span, kind: ExprKind) -> Self {
        Expr {
            span,
            kind,
            resolved_type: SemanticType::unknown(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    Ident(Ident),
    Literal(Literal),
    /// `[1, 2, 3]`
    List(Vec<Expr>),
    /// `{ nomen: "Marcus" }`
    Object(Vec<(Ident, Expr)>),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        left: Box<Expr>,
        op: BinOp,
        right: Box<Expr>,
    },
    Assign {
        target: Box<Expr>,
        op: AssignOp,
        value: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    Member {
        object: Box<Expr>,
        property: MemberProperty,
    },
    /// `cede expr`
    Await(Box<Expr>),
    /// `novum Persona(...)`
    New {
        callee: Ident,
        args: Vec<Expr>,
    },
    /// `cond sic a secus b`
    Conditional {
        test: Box<Expr>,
        consequent: Box<Expr>,
        alternate: Box<Expr>,
    },
    /// `pro x: x * 2`
    Lambda(Box<Lambda>),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Textus(String),
    Numerus(f64),
    /// `verum` / `falsum`
    Bivalens(bool),
    Nihil,
}

#[derive(Clone, Debug, PartialEq)]
pub enum MemberProperty {
    /// `persona.nomen`
    Named(Ident),
    /// `tabula[clavis]`
    Computed(Box<Expr>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Lambda {
    pub params: Vec<Param>,
    pub returns: Option<TypeAnnotation>,
    pub is_async: bool,
    pub body: LambdaBody,
}

#[derive(Clone, Debug, PartialEq)]
pub enum LambdaBody {
    Expr(Expr),
    Block(Block),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    /// `non` / `!`
    Not,
    Neg,
    Plus,
    BitNot,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,

    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,

    /// `et` / `&&`
    And,
    /// `aut` / `||`
    Or,
}

impl BinOp {
    pub fn is_arithmetic(&self) -> bool {
        matches!(self, BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Rem)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
}

impl AssignOp {
    /// The arithmetic operator a compound assignment applies, if any.
    pub fn binary_op(&self) -> Option<BinOp> {
        match self {
            AssignOp::Assign => None,
            AssignOp::AddAssign => Some(BinOp::Add),
            AssignOp::SubAssign => Some(BinOp::Sub),
            AssignOp::MulAssign => Some(BinOp::Mul),
            AssignOp::DivAssign => Some(BinOp::Div),
        }
    }
}
