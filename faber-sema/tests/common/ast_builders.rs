//! Hand-built ASTs. The parser lives outside this workspace, so tests spell
//! out the trees it would produce.

use faber_ast::{
    span, AssignOp, BinOp, Binding, Block, Expr, ExprKind, FunctioDecl, Ident, ImportDecl, ImportSpecifier,
    ImportSpecifiers, Lambda, LambdaBody, Literal, MemberProperty, Param, Pattern, Program, ReturnStmt,
    Span, Stmt, TypeAliasDecl, TypeAnnotation, TypeAnnotationKind, TypeArg, UnaryOp, VariaDecl, VariaKind,
};
use faber_types::SemanticType;

use faber_sema::SemanticError;

pub fn at(start: usize) -> Span {
    span(start, 1)
}

fn id(name: &str) -> Ident {
    Ident::new(at(0), name.to_string())
}

pub fn program(stmts: Vec<Stmt>) -> Program {
    Program { stmts }
}

pub fn block(stmts: Vec<Stmt>) -> Block {
    Block { span: at(0), stmts }
}

// -------------------------------------------------------------------------
// types
// -------------------------------------------------------------------------

pub fn ty(name: &str) -> TypeAnnotation {
    TypeAnnotation::named(at(0), name)
}

pub fn generic_ty(name: &str, args: Vec<TypeAnnotation>) -> TypeAnnotation {
    TypeAnnotation {
        span: at(0),
        kind: TypeAnnotationKind::Named {
            name: id(name),
            args: args.into_iter().map(|a| TypeArg::Type(Box::new(a))).collect(),
        },
        nullable: false,
    }
}

pub fn nullable(mut ann: TypeAnnotation) -> TypeAnnotation {
    ann.nullable = true;
    ann
}

// -------------------------------------------------------------------------
// expressions
// -------------------------------------------------------------------------

pub fn ident(name: &str) -> Expr {
    Expr::new(at(0), ExprKind::Ident(id(name)))
}

pub fn ident_at(name: &str, start: usize) -> Expr {
    Expr::new(at(start), ExprKind::Ident(Ident::new(at(start), name.to_string())))
}

pub fn num(v: f64) -> Expr {
    Expr::new(at(0), ExprKind::Literal(Literal::Numerus(v)))
}

pub fn text(s: &str) -> Expr {
    Expr::new(at(0), ExprKind::Literal(Literal::Textus(s.to_string())))
}

pub fn boolean(b: bool) -> Expr {
    Expr::new(at(0), ExprKind::Literal(Literal::Bivalens(b)))
}

pub fn nihil() -> Expr {
    Expr::new(at(0), ExprKind::Literal(Literal::Nihil))
}

pub fn list(items: Vec<Expr>) -> Expr {
    Expr::new(at(0), ExprKind::List(items))
}

pub fn object(fields: Vec<(&str, Expr)>) -> Expr {
    Expr::new(
        at(0),
        ExprKind::Object(fields.into_iter().map(|(k, v)| (id(k), v)).collect()),
    )
}

pub fn unary(op: UnaryOp, operand: Expr) -> Expr {
    Expr::new(
        at(0),
        ExprKind::Unary {
            op,
            operand: Box::new(operand),
        },
    )
}

pub fn binary(left: Expr, op: BinOp, right: Expr) -> Expr {
    Expr::new(
        at(0),
        ExprKind::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        },
    )
}

pub fn assign_op(target: Expr, op: AssignOp, value: Expr) -> Expr {
    Expr::new(
        at(0),
        ExprKind::Assign {
            target: Box::new(target),
            op,
            value: Box::new(value),
        },
    )
}

pub fn assign(name: &str, value: Expr) -> Expr {
    assign_op(ident(name), AssignOp::Assign, value)
}

pub fn call(callee: Expr, args: Vec<Expr>) -> Expr {
    Expr::new(
        at(0),
        ExprKind::Call {
            callee: Box::new(callee),
            args,
        },
    )
}

pub fn call_named(name: &str, args: Vec<Expr>) -> Expr {
    call(ident(name), args)
}

pub fn member(object: Expr, property: &str) -> Expr {
    Expr::new(
        at(0),
        ExprKind::Member {
            object: Box::new(object),
            property: MemberProperty::Named(id(property)),
        },
    )
}

pub fn index(object: Expr, key: Expr) -> Expr {
    Expr::new(
        at(0),
        ExprKind::Member {
            object: Box::new(object),
            property: MemberProperty::Computed(Box::new(key)),
        },
    )
}

pub fn cede(inner: Expr) -> Expr {
    Expr::new(at(0), ExprKind::Await(Box::new(inner)))
}

pub fn novum(name: &str, args: Vec<Expr>) -> Expr {
    Expr::new(at(0), ExprKind::New { callee: id(name), args })
}

pub fn conditional(test: Expr, consequent: Expr, alternate: Expr) -> Expr {
    Expr::new(
        at(0),
        ExprKind::Conditional {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
        },
    )
}

pub fn lambda(params: Vec<Param>, returns: Option<TypeAnnotation>, body: Expr) -> Expr {
    Expr::new(
        at(0),
        ExprKind::Lambda(Box::new(Lambda {
            params,
            returns,
            is_async: false,
            body: LambdaBody::Expr(body),
        })),
    )
}

pub fn lambda_block(params: Vec<Param>, returns: Option<TypeAnnotation>, body: Vec<Stmt>) -> Expr {
    Expr::new(
        at(0),
        ExprKind::Lambda(Box::new(Lambda {
            params,
            returns,
            is_async: false,
            body: LambdaBody::Block(block(body)),
        })),
    )
}

// -------------------------------------------------------------------------
// statements
// -------------------------------------------------------------------------

fn decl(kind: VariaKind, name: &str, annotation: Option<TypeAnnotation>, init: Option<Expr>) -> Stmt {
    Stmt::Varia(VariaDecl {
        span: at(0),
        kind,
        pattern: Pattern::Name(Binding::new(at(0), name)),
        annotation,
        init,
        resolved_type: SemanticType::unknown(),
    })
}

pub fn varia(name: &str, annotation: Option<TypeAnnotation>, init: Option<Expr>) -> Stmt {
    decl(VariaKind::Varia, name, annotation, init)
}

pub fn fixum(name: &str, annotation: Option<TypeAnnotation>, init: Option<Expr>) -> Stmt {
    decl(VariaKind::Fixum, name, annotation, init)
}

pub fn destructure(names: &[&str], init: Expr) -> Stmt {
    Stmt::Varia(VariaDecl {
        span: at(0),
        kind: VariaKind::Fixum,
        pattern: Pattern::Destructure {
            span: at(0),
            bindings: names.iter().map(|n| Binding::new(at(0), *n)).collect(),
        },
        annotation: None,
        init: Some(init),
        resolved_type: SemanticType::unknown(),
    })
}

pub fn param(name: &str, annotation: Option<TypeAnnotation>) -> Param {
    Param {
        span: at(0),
        name: Binding::new(at(0), name),
        annotation,
    }
}

pub fn functio(name: &str, params: Vec<Param>, returns: Option<TypeAnnotation>, body: Vec<Stmt>) -> Stmt {
    Stmt::Functio(FunctioDecl {
        span: at(0),
        name: Binding::new(at(0), name),
        params,
        returns,
        is_async: false,
        body: block(body),
        resolved_type: SemanticType::unknown(),
    })
}

pub fn redde(value: Option<Expr>) -> Stmt {
    Stmt::Return(ReturnStmt { span: at(0), value })
}

pub fn expr_stmt(e: Expr) -> Stmt {
    Stmt::ExprStmt(e)
}

pub fn typus(name: &str, target: TypeAnnotation) -> Stmt {
    Stmt::Typus(TypeAliasDecl {
        span: at(0),
        name: id(name),
        target,
    })
}

pub fn import_named(source: &str, names: &[&str]) -> Stmt {
    Stmt::Import(ImportDecl {
        span: at(0),
        source: id(source),
        specifiers: ImportSpecifiers::Named(
            names
                .iter()
                .map(|n| ImportSpecifier {
                    span: at(0),
                    imported: id(n),
                    local: None,
                })
                .collect(),
        ),
    })
}

pub fn import_as(source: &str, name: &str, local: &str) -> Stmt {
    Stmt::Import(ImportDecl {
        span: at(0),
        source: id(source),
        specifiers: ImportSpecifiers::Named(vec![ImportSpecifier {
            span: at(0),
            imported: id(name),
            local: Some(id(local)),
        }]),
    })
}

pub fn import_all(source: &str) -> Stmt {
    Stmt::Import(ImportDecl {
        span: at(0),
        source: id(source),
        specifiers: ImportSpecifiers::Wildcard { span: at(0) },
    })
}

// -------------------------------------------------------------------------
// inspection
// -------------------------------------------------------------------------

pub fn messages(errors: &[SemanticError]) -> Vec<String> {
    errors.iter().map(|e| e.message.clone()).collect()
}

/// Resolved type of the declaration at `program.stmts[i]`.
pub fn decl_type(program: &Program, i: usize) -> &SemanticType {
    match &program.stmts[i] {
        Stmt::Varia(d) => &d.resolved_type,
        Stmt::Functio(f) => &f.resolved_type,
        other => panic!("statement {i} is not a declaration: {other:?}"),
    }
}

/// Resolved type of the expression statement at `program.stmts[i]`.
pub fn expr_type(program: &Program, i: usize) -> &SemanticType {
    match &program.stmts[i] {
        Stmt::ExprStmt(e) => &e.resolved_type,
        other => panic!("statement {i} is not an expression: {other:?}"),
    }
}

/// Resolved type of the declaration at `block.stmts[i]`.
pub fn block_decl_type(block: &Block, i: usize) -> &SemanticType {
    match &block.stmts[i] {
        Stmt::Varia(d) => &d.resolved_type,
        other => panic!("statement {i} is not a declaration: {other:?}"),
    }
}
