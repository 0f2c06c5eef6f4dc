#![forbid(unsafe_code)]

//! Semantic analysis for Faber programs: scopes, annotation resolution and
//! the type-annotating checker that code generators rely on.

pub mod analyzer;
pub mod config;
pub mod error;
pub mod resolve;
pub mod scope;

use faber_ast::Program;
use faber_norma::Registry;
use rayon::prelude::*;

pub use analyzer::Analyzer;
pub use config::SemaConfig;
pub use error::SemanticError;
pub use resolve::{resolve_type, resolve_type_with};
pub use scope::{Scope, ScopeKind, Symbol, SymbolKind};

/// Analyzes `program` with the default configuration, annotating it in place.
pub fn analyze(program: &mut Program, registry: &Registry) -> Vec<SemanticError> {
    Analyzer::new(registry).analyze(program)
}

pub fn analyze_with_config(program: &mut Program, registry: &Registry, config: &SemaConfig) -> Vec<SemanticError> {
    Analyzer::with_config(registry, config.clone()).analyze(program)
}

/// Analyzes independent programs concurrently; each gets its own scope chain.
/// Results are in input order.
pub fn analyze_parallel(
    programs: &mut [Program],
    registry: &Registry,
    config: &SemaConfig,
) -> Vec<Vec<SemanticError>> {
    programs
        .par_iter_mut()
        .map(|program| analyze_with_config(program, registry, config))
        .collect()
}
