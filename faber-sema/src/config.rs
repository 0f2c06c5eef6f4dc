#![forbid(unsafe_code)]

use serde::Deserialize;

/// Analyzer settings, usually read from the `[sema]` table of a project file.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SemaConfig {
    /// Module whose exports the analyzer types (`ex norma importa ...`).
    pub stdlib_module: String,
    /// Bind `_scribe`, `_lege`, ... in the global scope.
    pub register_intrinsics: bool,
}

impl Default for SemaConfig {
    fn default() -> Self {
        SemaConfig {
            stdlib_module: "norma".to_string(),
            register_intrinsics: true,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    sema: SemaConfig,
}

impl SemaConfig {
    /// Reads the `[sema]` table; a missing table yields the defaults and other
    /// tables are ignored.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        let file: ConfigFile = toml::from_str(content)?;
        Ok(file.sema)
    }
}
