#![forbid(unsafe_code)]
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

/// Failure to load or validate the stdlib registry data.
#[derive(Debug, Error, Diagnostic)]
pub enum RegistryError {
    #[error("registry data is not valid TOML: {0}")]
    #[diagnostic(code(faber::norma::toml))]
    Toml(#[from] toml::de::Error),

    #[error("cannot read registry data: {0}")]
    #[diagnostic(code(faber::norma::io))]
    Io(#[from] std::io::Error),

    #[error("{collection}:{method}: unknown morphological form '{form}'")]
    #[diagnostic(
        code(faber::norma::form),
        help("forms are imperativus, perfectum, futurum_indicativum, futurum_activum, praesens_participium")
    )]
    UnknownForm {
        collection: String,
        method: String,
        form: String,
    },

    #[error("{collection}:{method}: radix must start with a stem")]
    #[diagnostic(code(faber::norma::radix))]
    EmptyRadix { collection: String, method: String },

    #[error("{collection}:{method}:{target}: placeholder §{index} has no matching param")]
    #[diagnostic(code(faber::norma::template))]
    TemplateParam {
        collection: String,
        method: String,
        target: String,
        index: usize,
    },

    #[error("export '{export}': {message}")]
    #[diagnostic(code(faber::norma::signature))]
    Signature { export: String, message: String },

    #[error("invalid registry key '{key}'")]
    #[diagnostic(
        code(faber::norma::key),
        help("keys are `collection`, `collection:method` or `collection:method:target`")
    )]
    InvalidKey { key: String },
}

/// Why a stdlib method call could not be translated.
///
/// These are surfaced by code generators, not by semantic analysis.
#[derive(Clone, Debug, Error, Diagnostic, PartialEq, Eq)]
pub enum DispatchError {
    #[error("{0}")]
    #[diagnostic(code(faber::norma::morphology))]
    Morphology(String),

    #[error(
        "method '{method}' looks like a stdlib call on {} but the receiver type is unresolved",
        .candidates.join(", ")
    )]
    #[diagnostic(
        code(faber::norma::unresolved_receiver),
        help("add a type annotation to the receiver")
    )]
    UnresolvedReceiver { method: String, candidates: Vec<String> },

    #[error("'{collection}.{method}' has no translation for {target}")]
    #[diagnostic(code(faber::norma::no_translation))]
    NoTranslation {
        collection: String,
        method: String,
        target: String,
    },

    #[error("'{method}' is not a method of '{collection}'")]
    #[diagnostic(code(faber::norma::unknown_method))]
    UnknownMethod { collection: String, method: String },
}
