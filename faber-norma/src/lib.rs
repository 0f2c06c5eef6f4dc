#![forbid(unsafe_code)]

//! Stdlib method registry for the `norma` module: verb morphology,
//! per-target translations and template substitution.

pub mod dispatch;
pub mod error;
pub mod morphology;
pub mod registry;
pub mod signature;
mod source;
pub mod template;

use std::path::{Path, PathBuf};

pub use dispatch::{collection_for_type, ResolvedCall};
pub use error::{DispatchError, RegistryError};
pub use morphology::{
    parse_methodum_with_stem, Forma, FormaFlags, Morphology, ParsedMethodum, ReceiverOwnership,
};
pub use registry::{
    Collection, MorphologyValidation, NormaExport, RadixForms, Registry, RegistryEntry, RegistryKey,
    StdlibMethod, Target, Translation,
};
pub use template::{apply_template, apply_template_with_curator};

/// Absolute path to the bundled registry table (`norma.toml`).
pub fn norma_toml_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data").join("norma.toml")
}
