#![forbid(unsafe_code)]

use std::collections::HashSet;

use faber_ast::{
    span, AssignOp, BinOp, Block, ElseBranch, Expr, ExprKind, ForOfStmt, FunctioDecl, Ident, IfStmt,
    ImportDecl, ImportSpecifiers, Lambda, LambdaBody, Literal, MemberProperty, Param, Pattern, Program,
    ReturnStmt, Stmt, SwitchStmt, TryStmt, TypeAliasDecl, TypeAnnotation, UnaryOp, VariaDecl,
};
use faber_norma::Registry;
use faber_types::{is_assignable_to, types_equal, PrimitiveName, SemanticType};

use crate::config::SemaConfig;
use crate::error::SemanticError;
use crate::resolve::resolve_type_with;
use crate::scope::{Scope, ScopeKind, Symbol, SymbolKind};

/// Compiler intrinsics bound in the global scope before user code.
fn intrinsics() -> Vec<(&'static str, SemanticType)> {
    let unary = |p: SemanticType, r: SemanticType| SemanticType::function(vec![p], r, false);
    vec![
        ("_scribe", unary(SemanticType::unknown(), SemanticType::vacuum())),
        ("_vide", unary(SemanticType::unknown(), SemanticType::vacuum())),
        ("_mone", unary(SemanticType::unknown(), SemanticType::vacuum())),
        ("_lege", SemanticType::function(vec![], SemanticType::textus(), false)),
        ("_fortuitus", SemanticType::function(vec![], SemanticType::numerus(), false)),
        ("_pavimentum", unary(SemanticType::numerus(), SemanticType::numerus())),
        ("_tectum", unary(SemanticType::numerus(), SemanticType::numerus())),
        ("_radix", unary(SemanticType::numerus(), SemanticType::numerus())),
        (
            "_potentia",
            SemanticType::function(
                vec![SemanticType::numerus(), SemanticType::numerus()],
                SemanticType::numerus(),
                false,
            ),
        ),
    ]
}

fn literal_type(lit: &Literal) -> SemanticType {
    match lit {
        Literal::Textus(_) => SemanticType::textus(),
        Literal::Numerus(_) => SemanticType::numerus(),
        Literal::Bivalens(_) => SemanticType::bivalens(),
        Literal::Nihil => SemanticType::nihil(),
    }
}

/// Arithmetic never fails: anything that is not string concatenation is
/// treated as `numerus`.
fn binary_type(op: BinOp, left: &SemanticType, right: &SemanticType) -> SemanticType {
    if !op.is_arithmetic() {
        return SemanticType::bivalens();
    }
    let concat = op == BinOp::Add
        && (left.is_primitive(PrimitiveName::Textus) || right.is_primitive(PrimitiveName::Textus));
    if concat {
        SemanticType::textus()
    } else {
        SemanticType::numerus()
    }
}

fn assigned_type(op: AssignOp, target: &SemanticType, value: SemanticType) -> SemanticType {
    match op.binary_op() {
        Some(bin) => binary_type(bin, target, &value),
        None => value,
    }
}

fn generic_param<'t>(ty: &'t SemanticType, names: &[&str]) -> Option<&'t SemanticType> {
    match ty.generic_parts() {
        Some((name, [param])) if names.iter().any(|n| n.eq_ignore_ascii_case(name)) => Some(param),
        _ => None,
    }
}

fn pattern_label(pattern: &Pattern) -> String {
    match pattern {
        Pattern::Name(b) => b.name.clone(),
        Pattern::Destructure { bindings, .. } => {
            let names: Vec<&str> = bindings.iter().map(|b| b.name.as_str()).collect();
            format!("{{ {} }}", names.join(", "))
        }
    }
}

/// Single-pass type checker. Annotates the program in place and collects
/// every error it finds instead of stopping at the first.
pub struct Analyzer<'r> {
    registry: &'r Registry,
    config: SemaConfig,
    scope: Scope,
    errors: Vec<SemanticError>,
    /// Declared return types of the enclosing functions and lambdas.
    return_types: Vec<SemanticType>,
}

impl<'r> Analyzer<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self::with_config(registry, SemaConfig::default())
    }

    pub fn with_config(registry: &'r Registry, config: SemaConfig) -> Self {
        let mut scope = Scope::global();
        if config.register_intrinsics {
            for (name, ty) in intrinsics() {
                // Names are distinct, so a fresh scope never rejects them.
                let _ = scope.define(Symbol::new(name, ty, SymbolKind::Function, false, span(0, 0)));
            }
        }
        Analyzer {
            registry,
            config,
            scope,
            errors: Vec::new(),
            return_types: Vec::new(),
        }
    }

    #[tracing::instrument(skip_all, fields(stmts = program.stmts.len()))]
    pub fn analyze(mut self, program: &mut Program) -> Vec<SemanticError> {
        self.check_stmts(&mut program.stmts);
        tracing::debug!(errors = self.errors.len(), "analysis finished");
        self.errors
    }

    fn error(&mut self, message: impl Into<String>, span: faber_ast::Span) {
        self.errors.push(SemanticError::new(message, span));
    }

    fn define(&mut self, symbol: Symbol) {
        if let Err(e) = self.scope.define(symbol) {
            self.errors.push(e);
        }
    }

    fn enter_scope(&mut self, kind: ScopeKind) {
        let parent = std::mem::take(&mut self.scope);
        self.scope = Scope::with_parent(parent, kind);
        tracing::debug!(?kind, depth = self.scope.depth(), "enter scope");
    }

    fn exit_scope(&mut self) {
        let scope = std::mem::take(&mut self.scope);
        self.scope = scope.exit();
        tracing::debug!(depth = self.scope.depth(), "exit scope");
    }

    fn alias(&self, name: &str) -> Option<SemanticType> {
        self.scope
            .lookup(name)
            .filter(|s| s.kind == SymbolKind::Type)
            .map(|s| s.ty.clone())
    }

    fn resolve(&self, annotation: &TypeAnnotation) -> SemanticType {
        resolve_type_with(annotation, &|name| self.alias(name))
    }

    fn param_type(&self, param: &Param) -> SemanticType {
        param
            .annotation
            .as_ref()
            .map_or_else(SemanticType::unknown, |a| self.resolve(a))
    }

    fn signature(&self, f: &FunctioDecl) -> SemanticType {
        let params = f.params.iter().map(|p| self.param_type(p)).collect();
        let ret = f
            .returns
            .as_ref()
            .map_or_else(SemanticType::vacuum, |r| self.resolve(r));
        SemanticType::function(params, ret, f.is_async)
    }

    // ---------------------------------------------------------------------
    // statements
    // ---------------------------------------------------------------------

    fn check_stmts(&mut self, stmts: &mut [Stmt]) {
        let in_place = self.hoist(stmts);
        for (i, stmt) in stmts.iter_mut().enumerate() {
            if in_place.contains(&i) {
                self.declare(stmt);
            }
            self.check_stmt(stmt);
        }
    }

    /// Binds the block's type aliases, then its function signatures, so
    /// annotations and calls can refer to them before their declaration.
    ///
    /// A declaration whose name an earlier statement of the same block
    /// already binds is left out and declared in place instead, so the later
    /// one takes the duplicate error. Returns the indices of those.
    fn hoist(&mut self, stmts: &mut [Stmt]) -> HashSet<usize> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut in_place = HashSet::new();
        for (i, stmt) in stmts.iter().enumerate() {
            let declared = match stmt {
                Stmt::Typus(alias) => Some(&alias.name.node),
                Stmt::Functio(f) => Some(&f.name.name),
                _ => None,
            };
            match declared {
                Some(name) => {
                    if !seen.insert(name.clone()) {
                        in_place.insert(i);
                    }
                }
                None => seen.extend(self.bound_names(stmt)),
            }
        }

        for (i, stmt) in stmts.iter_mut().enumerate() {
            if let Stmt::Typus(alias) = stmt {
                if !in_place.contains(&i) {
                    self.define_alias(alias);
                }
            }
        }
        for (i, stmt) in stmts.iter_mut().enumerate() {
            if let Stmt::Functio(f) = stmt {
                if !in_place.contains(&i) {
                    self.define_function(f);
                }
            }
        }
        in_place
    }

    /// Names a non-hoisted statement binds in the current scope.
    fn bound_names(&self, stmt: &Stmt) -> Vec<String> {
        match stmt {
            Stmt::Varia(decl) => match &decl.pattern {
                Pattern::Name(b) => vec![b.name.clone()],
                Pattern::Destructure { bindings, .. } => bindings.iter().map(|b| b.name.clone()).collect(),
            },
            Stmt::Import(import) if import.source.node == self.config.stdlib_module => match &import.specifiers {
                ImportSpecifiers::Wildcard { .. } => self.registry.exports().map(|e| e.name.clone()).collect(),
                ImportSpecifiers::Named(specs) => specs
                    .iter()
                    .filter(|s| self.registry.export(&s.imported.node).is_some())
                    .map(|s| s.local_name().node.clone())
                    .collect(),
            },
            _ => Vec::new(),
        }
    }

    fn declare(&mut self, stmt: &mut Stmt) {
        match stmt {
            Stmt::Typus(alias) => self.define_alias(alias),
            Stmt::Functio(f) => self.define_function(f),
            _ => {}
        }
    }

    fn define_alias(&mut self, alias: &TypeAliasDecl) {
        let ty = self.resolve(&alias.target);
        self.define(Symbol::new(
            alias.name.node.clone(),
            ty,
            SymbolKind::Type,
            false,
            alias.name.span,
        ));
    }

    fn define_function(&mut self, f: &mut FunctioDecl) {
        let ty = self.signature(f);
        tracing::debug!(name = %f.name.name, ty = %ty, "declared function");
        f.resolved_type = ty.clone();
        f.name.resolved_type = ty.clone();
        self.define(Symbol::new(
            f.name.name.clone(),
            ty,
            SymbolKind::Function,
            false,
            f.name.span,
        ));
    }

    fn check_stmt(&mut self, stmt: &mut Stmt) {
        match stmt {
            Stmt::Import(import) => self.check_import(import),
            Stmt::Varia(decl) => self.check_varia(decl),
            Stmt::Functio(f) => self.check_function(f),
            Stmt::Typus(_) => {}
            Stmt::If(s) => self.check_if(s),
            Stmt::While(w) => {
                let _ = self.infer(&mut w.cond);
                self.check_block(&mut w.body, ScopeKind::Block);
            }
            Stmt::ForOf(f) => self.check_for_of(f),
            Stmt::Switch(s) => self.check_switch(s),
            Stmt::Try(t) => self.check_try(t),
            Stmt::Return(r) => self.check_return(r),
            Stmt::Throw(t) => {
                let _ = self.infer(&mut t.value);
            }
            Stmt::Break(_) | Stmt::Continue(_) => {}
            Stmt::Block(b) => self.check_block(b, ScopeKind::Block),
            Stmt::ExprStmt(e) => {
                let _ = self.infer(e);
            }
        }
    }

    fn check_block(&mut self, block: &mut Block, kind: ScopeKind) {
        self.enter_scope(kind);
        self.check_stmts(&mut block.stmts);
        self.exit_scope();
    }

    fn check_import(&mut self, import: &ImportDecl) {
        let registry = self.registry;
        let source = import.source.node.as_str();

        if source != self.config.stdlib_module {
            if let ImportSpecifiers::Named(specs) = &import.specifiers {
                for s in specs {
                    self.scope.mark_foreign(s.local_name().node.clone());
                }
            }
            tracing::debug!(source, "untyped import");
            return;
        }

        match &import.specifiers {
            ImportSpecifiers::Wildcard { span } => {
                for export in registry.exports() {
                    self.define(Symbol::new(
                        export.name.clone(),
                        export.ty.clone(),
                        SymbolKind::Function,
                        false,
                        *span,
                    ));
                }
            }
            ImportSpecifiers::Named(specs) => {
                for s in specs {
                    let name = &s.imported.node;
                    match registry.export(name) {
                        Some(export) => {
                            let local = s.local_name();
                            self.define(Symbol::new(
                                local.node.clone(),
                                export.ty.clone(),
                                SymbolKind::Function,
                                false,
                                local.span,
                            ));
                        }
                        None => self.error(
                            format!("'{name}' is not exported from '{}'", self.config.stdlib_module),
                            s.imported.span,
                        ),
                    }
                }
            }
        }
        tracing::debug!(source, "resolved stdlib import");
    }

    fn check_varia(&mut self, decl: &mut VariaDecl) {
        let declared = decl.annotation.as_ref().map(|a| self.resolve(a));
        let init_ty = decl.init.as_mut().map(|e| self.infer(e));

        let ty = match (declared, init_ty) {
            (Some(declared), Some(init_ty)) => {
                if !is_assignable_to(&init_ty, &declared) {
                    let at = decl.init.as_ref().map_or(decl.span, |e| e.span);
                    self.error(
                        format!("Type '{init_ty}' is not assignable to type '{declared}'"),
                        at,
                    );
                }
                declared
            }
            (Some(declared), None) => declared,
            (None, Some(init_ty)) => init_ty,
            (None, None) => {
                self.error(
                    format!(
                        "Variable '{}' has no type annotation or initializer",
                        pattern_label(&decl.pattern)
                    ),
                    decl.span,
                );
                SemanticType::unknown()
            }
        };

        decl.resolved_type = ty.clone();
        let mutable = decl.kind.is_mutable();
        match &mut decl.pattern {
            Pattern::Name(b) => {
                b.resolved_type = ty.clone();
                self.define(Symbol::new(b.name.clone(), ty, SymbolKind::Variable, mutable, b.span));
            }
            // Field types are not tracked.
            Pattern::Destructure { bindings, .. } => {
                for b in bindings.iter_mut() {
                    b.resolved_type = SemanticType::unknown();
                    self.define(Symbol::new(
                        b.name.clone(),
                        SemanticType::unknown(),
                        SymbolKind::Variable,
                        mutable,
                        b.span,
                    ));
                }
            }
        }
    }

    fn bind_params(&mut self, params: &mut [Param]) {
        for p in params.iter_mut() {
            let ty = self.param_type(p);
            p.name.resolved_type = ty.clone();
            self.define(Symbol::new(
                p.name.name.clone(),
                ty,
                SymbolKind::Parameter,
                false,
                p.name.span,
            ));
        }
    }

    fn check_function(&mut self, f: &mut FunctioDecl) {
        let ret = match &f.resolved_type {
            SemanticType::Function(sig) => (*sig.return_type).clone(),
            _ => SemanticType::vacuum(),
        };
        self.enter_scope(ScopeKind::Function);
        self.bind_params(&mut f.params);
        self.return_types.push(ret);
        self.check_stmts(&mut f.body.stmts);
        self.return_types.pop();
        self.exit_scope();
    }

    fn check_return(&mut self, ret: &mut ReturnStmt) {
        let Some(value) = ret.value.as_mut() else {
            return;
        };
        let ty = self.infer(value);
        let Some(expected) = self.return_types.last() else {
            return;
        };
        if !is_assignable_to(&ty, expected) {
            let message = format!("Return type '{ty}' is not assignable to declared return type '{expected}'");
            self.error(message, value.span);
        }
    }

    fn check_if(&mut self, stmt: &mut IfStmt) {
        let _ = self.infer(&mut stmt.cond);
        self.check_block(&mut stmt.then_block, ScopeKind::Block);
        match &mut stmt.else_branch {
            Some(ElseBranch::Block(b)) => self.check_block(b, ScopeKind::Block),
            Some(ElseBranch::If(nested)) => self.check_if(nested),
            None => {}
        }
    }

    fn check_for_of(&mut self, stmt: &mut ForOfStmt) {
        let iterable = self.infer(&mut stmt.iterable);
        let elem = generic_param(&iterable, &["lista", "copia"])
            .cloned()
            .unwrap_or_else(SemanticType::unknown);

        self.enter_scope(ScopeKind::Block);
        stmt.binding.resolved_type = elem.clone();
        self.define(Symbol::new(
            stmt.binding.name.clone(),
            elem,
            SymbolKind::Variable,
            false,
            stmt.binding.span,
        ));
        self.check_stmts(&mut stmt.body.stmts);
        self.exit_scope();
    }

    fn check_switch(&mut self, stmt: &mut SwitchStmt) {
        let _ = self.infer(&mut stmt.discriminant);
        for case in stmt.cases.iter_mut() {
            let _ = self.infer(&mut case.test);
            self.check_block(&mut case.body, ScopeKind::Block);
        }
        if let Some(default) = &mut stmt.default {
            self.check_block(default, ScopeKind::Block);
        }
    }

    fn check_try(&mut self, stmt: &mut TryStmt) {
        self.check_block(&mut stmt.body, ScopeKind::Block);
        if let Some(catch) = &mut stmt.catch {
            self.enter_scope(ScopeKind::Block);
            if let Some(param) = &mut catch.param {
                param.resolved_type = SemanticType::unknown();
                self.define(Symbol::new(
                    param.name.clone(),
                    SemanticType::unknown(),
                    SymbolKind::Variable,
                    false,
                    param.span,
                ));
            }
            self.check_stmts(&mut catch.body.stmts);
            self.exit_scope();
        }
        if let Some(finally) = &mut stmt.finally {
            self.check_block(finally, ScopeKind::Block);
        }
    }

    // ---------------------------------------------------------------------
    // expressions
    // ---------------------------------------------------------------------

    fn infer(&mut self, expr: &mut Expr) -> SemanticType {
        let ty = match &mut expr.kind {
            ExprKind::Ident(id) => self.lookup_ident(id),
            ExprKind::Literal(lit) => literal_type(lit),
            ExprKind::List(items) => {
                let types: Vec<SemanticType> = items.iter_mut().map(|e| self.infer(e)).collect();
                let elem = match types.split_first() {
                    Some((first, rest)) if rest.iter().all(|t| types_equal(t, first)) => first.clone(),
                    _ => SemanticType::unknown(),
                };
                SemanticType::lista(elem)
            }
            ExprKind::Object(fields) => {
                for (_, value) in fields.iter_mut() {
                    let _ = self.infer(value);
                }
                SemanticType::unknown()
            }
            ExprKind::Unary { op, operand } => {
                let operand_ty = self.infer(operand);
                match op {
                    UnaryOp::Not => SemanticType::bivalens(),
                    UnaryOp::Neg => SemanticType::numerus(),
                    UnaryOp::Plus | UnaryOp::BitNot => operand_ty,
                }
            }
            ExprKind::Binary { left, op, right } => {
                let l = self.infer(left);
                let r = self.infer(right);
                binary_type(*op, &l, &r)
            }
            ExprKind::Assign { target, op, value } => self.infer_assign(target, *op, value),
            ExprKind::Call { callee, args } => {
                let callee_ty = self.infer(callee);
                for arg in args.iter_mut() {
                    let _ = self.infer(arg);
                }
                match callee_ty {
                    SemanticType::Function(f) => *f.return_type,
                    _ => SemanticType::unknown(),
                }
            }
            // Property types are not modelled.
            ExprKind::Member { object, property } => {
                let _ = self.infer(object);
                if let MemberProperty::Computed(index) = property {
                    let _ = self.infer(index);
                }
                SemanticType::unknown()
            }
            ExprKind::Await(inner) => {
                let inner_ty = self.infer(inner);
                generic_param(&inner_ty, &["promissum"]).cloned().unwrap_or(inner_ty)
            }
            ExprKind::New { callee, args } => {
                for arg in args.iter_mut() {
                    let _ = self.infer(arg);
                }
                SemanticType::user(callee.node.clone())
            }
            ExprKind::Conditional {
                test,
                consequent,
                alternate,
            } => {
                let _ = self.infer(test);
                let c = self.infer(consequent);
                let a = self.infer(alternate);
                match (c.primitive_name(), a.primitive_name()) {
                    (Some(x), Some(y)) if x == y => c,
                    _ => SemanticType::union(vec![c, a]),
                }
            }
            ExprKind::Lambda(lambda) => self.infer_lambda(lambda),
        };
        expr.resolved_type = ty.clone();
        ty
    }

    fn lookup_ident(&mut self, id: &Ident) -> SemanticType {
        if let Some(sym) = self.scope.lookup(&id.node) {
            return sym.ty.clone();
        }
        if !self.scope.is_foreign(&id.node) {
            self.error(format!("Undefined variable '{}'", id.node), id.span);
        }
        SemanticType::unknown()
    }

    fn infer_assign(&mut self, target: &mut Expr, op: AssignOp, value: &mut Expr) -> SemanticType {
        let value_ty = self.infer(value);

        let ident = match &target.kind {
            ExprKind::Ident(id) => Some((id.node.clone(), id.span)),
            _ => None,
        };
        // Member and index targets are typed but not checked.
        let Some((name, at)) = ident else {
            let target_ty = self.infer(target);
            return assigned_type(op, &target_ty, value_ty);
        };

        let Some(sym) = self.scope.lookup(&name).cloned() else {
            if !self.scope.is_foreign(&name) {
                self.error(format!("Undefined variable '{name}'"), at);
            }
            target.resolved_type = SemanticType::unknown();
            return assigned_type(op, &SemanticType::unknown(), value_ty);
        };

        target.resolved_type = sym.ty.clone();
        let assigned = assigned_type(op, &sym.ty, value_ty);
        if !sym.mutable {
            self.error(format!("Cannot assign to immutable variable '{name}'"), at);
        }
        if !is_assignable_to(&assigned, &sym.ty) {
            self.error(
                format!(
                    "Type '{assigned}' is not assignable to variable '{name}' of type '{}'",
                    sym.ty
                ),
                value.span,
            );
        }
        assigned
    }

    fn infer_lambda(&mut self, lambda: &mut Lambda) -> SemanticType {
        self.enter_scope(ScopeKind::Function);
        self.bind_params(&mut lambda.params);
        let params = lambda
            .params
            .iter()
            .map(|p| p.name.resolved_type.clone())
            .collect();
        let declared = lambda.returns.as_ref().map(|r| self.resolve(r));

        let ret = match &mut lambda.body {
            LambdaBody::Expr(body) => {
                let body_ty = self.infer(body);
                match declared {
                    Some(declared) => {
                        if !is_assignable_to(&body_ty, &declared) {
                            self.error(
                                format!(
                                    "Return type '{body_ty}' is not assignable to declared return type '{declared}'"
                                ),
                                body.span,
                            );
                        }
                        declared
                    }
                    None => body_ty,
                }
            }
            LambdaBody::Block(block) => {
                let expected = declared.unwrap_or_else(SemanticType::unknown);
                self.return_types.push(expected.clone());
                self.check_stmts(&mut block.stmts);
                self.return_types.pop();
                expected
            }
        };

        self.exit_scope();
        SemanticType::function(params, ret, lambda.is_async)
    }
}
