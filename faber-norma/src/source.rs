#![forbid(unsafe_code)]

//! Raw TOML shape of the registry table, before validation.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::registry::Target;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RegistrySource {
    #[serde(default)]
    pub exports: BTreeMap<String, ExportSource>,
    #[serde(default)]
    pub collections: BTreeMap<String, BTreeMap<String, MethodSource>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ExportSource {
    #[serde(default)]
    pub params: Vec<String>,
    pub returns: String,
    #[serde(default)]
    pub futura: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct MethodSource {
    /// `[stem, form, form, ...]`
    #[serde(default)]
    pub radix: Option<Vec<String>>,
    #[serde(default)]
    pub ts: Option<TranslationSource>,
    #[serde(default)]
    pub zig: Option<TranslationSource>,
    #[serde(default)]
    pub py: Option<TranslationSource>,
    #[serde(default)]
    pub rs: Option<TranslationSource>,
    #[serde(default)]
    pub cpp: Option<TranslationSource>,
}

impl MethodSource {
    pub fn translations(self) -> impl Iterator<Item = (Target, TranslationSource)> {
        [
            (Target::Ts, self.ts),
            (Target::Zig, self.zig),
            (Target::Py, self.py),
            (Target::Rs, self.rs),
            (Target::Cpp, self.cpp),
        ]
        .into_iter()
        .filter_map(|(target, t)| t.map(|t| (target, t)))
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum TranslationSource {
    Method {
        method: String,
    },
    Template {
        template: String,
        #[serde(default)]
        params: Vec<String>,
    },
}
