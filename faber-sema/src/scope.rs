#![forbid(unsafe_code)]

use std::collections::{HashMap, HashSet};

use faber_ast::Span;
use faber_types::SemanticType;

use crate::error::SemanticError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScopeKind {
    Global,
    Function,
    Block,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    Parameter,
    Function,
    Type,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub ty: SemanticType,
    pub kind: SymbolKind,
    pub mutable: bool,
    pub span: Span,
}

impl Symbol {
    pub fn new(name: impl Into<String>, ty: SemanticType, kind: SymbolKind, mutable: bool, span: Span) -> Self {
        Symbol {
            name: name.into(),
            ty,
            kind,
            mutable,
            span,
        }
    }
}

/// One lexical scope. Owns its parent, so entering a scope moves the current
/// chain into the new node and exiting hands it back.
#[derive(Debug)]
pub struct Scope {
    kind: ScopeKind,
    symbols: HashMap<String, Symbol>,
    /// Names imported from untyped modules. They have no symbol but are not
    /// undefined either.
    foreign: HashSet<String>,
    parent: Option<Box<Scope>>,
}

impl Default for Scope {
    fn default() -> Self {
        Self::global()
    }
}

impl Scope {
    pub fn global() -> Self {
        Scope {
            kind: ScopeKind::Global,
            symbols: HashMap::new(),
            foreign: HashSet::new(),
            parent: None,
        }
    }

    pub fn with_parent(parent: Scope, kind: ScopeKind) -> Self {
        Scope {
            kind,
            symbols: HashMap::new(),
            foreign: HashSet::new(),
            parent: Some(Box::new(parent)),
        }
    }

    /// Drops this scope's symbols and returns the parent. The root scope has
    /// no parent and is returned unchanged.
    pub fn exit(self) -> Scope {
        match self.parent {
            Some(parent) => *parent,
            None => self,
        }
    }

    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    pub fn depth(&self) -> usize {
        self.parent.as_ref().map_or(0, |p| p.depth() + 1)
    }

    /// Adds `symbol` to this scope. A name already defined here is an error
    /// and the first definition is kept; shadowing an outer name is fine.
    pub fn define(&mut self, symbol: Symbol) -> Result<(), SemanticError> {
        if self.symbols.contains_key(&symbol.name) {
            return Err(SemanticError::new(
                format!("'{}' is already defined in this scope", symbol.name),
                symbol.span,
            ));
        }
        self.symbols.insert(symbol.name.clone(), symbol);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.symbols
            .get(name)
            .or_else(|| self.parent.as_ref().and_then(|p| p.lookup(name)))
    }

    pub fn lookup_local(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    pub fn mark_foreign(&mut self, name: impl Into<String>) {
        self.foreign.insert(name.into());
    }

    pub fn is_foreign(&self, name: &str) -> bool {
        self.foreign.contains(name) || self.parent.as_ref().is_some_and(|p| p.is_foreign(name))
    }
}
