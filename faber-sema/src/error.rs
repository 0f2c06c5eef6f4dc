#![forbid(unsafe_code)]
#![allow(unused_assignments)]

use faber_ast::Span;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Clone, Debug, Error, Diagnostic, PartialEq, Eq)]
#[error("semantic error: {message}")]
#[diagnostic(code(faber::sema))]
#[allow(unused_assignments)]
pub struct SemanticError {
    pub message: String,
    #[label]
    pub span: Span,
}

impl SemanticError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        SemanticError {
            message: message.into(),
            span,
        }
    }
}
