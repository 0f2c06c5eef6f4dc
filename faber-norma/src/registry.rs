#![forbid(unsafe_code)]

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use faber_types::SemanticType;

use crate::error::RegistryError;
use crate::morphology::{parse_methodum_with_stem, Forma, Morphology, ReceiverOwnership};
use crate::signature::parse_type_str;
use crate::source::{ExportSource, MethodSource, RegistrySource, TranslationSource};
use crate::template::{apply_template, placeholder_indices};

const BUILTIN_TABLE: &str = include_str!("../data/norma.toml");

/// Code generation target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Target {
    Ts,
    Zig,
    Py,
    Rs,
    Cpp,
}

impl Target {
    pub const ALL: [Target; 5] = [Target::Ts, Target::Zig, Target::Py, Target::Rs, Target::Cpp];

    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Ts => "ts",
            Target::Zig => "zig",
            Target::Py => "py",
            Target::Rs => "rs",
            Target::Cpp => "cpp",
        }
    }

    pub fn from_name(name: &str) -> Option<Target> {
        Target::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Translation {
    /// Plain rename: `recv.method(args...)`.
    Method { method: String },
    /// Placeholder template, see [`crate::template`].
    Template { template: String, params: Vec<String> },
}

impl Translation {
    /// Target-language call text for `receiver` applied to `args`.
    pub fn render(&self, receiver: &str, args: &[String]) -> String {
        match self {
            Translation::Method { method } => format!("{receiver}.{method}({})", args.join(", ")),
            Translation::Template { template, params } => apply_template(template, params, receiver, args),
        }
    }
}

/// Verb stem plus the forms a method declares for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RadixForms {
    pub stem: String,
    pub forms: Vec<Forma>,
}

#[derive(Clone, Debug)]
pub struct StdlibMethod {
    pub name: String,
    pub radix_forms: Option<RadixForms>,
    pub translations: HashMap<Target, Translation>,
}

impl StdlibMethod {
    pub fn translation(&self, target: Target) -> Option<&Translation> {
        self.translations.get(&target)
    }
}

#[derive(Clone, Debug)]
pub struct Collection {
    name: String,
    methods: BTreeMap<String, StdlibMethod>,
    morphology: Morphology,
}

impl Collection {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn method(&self, name: &str) -> Option<&StdlibMethod> {
        self.methods.get(name)
    }

    /// Methods in name order.
    pub fn methods(&self) -> impl Iterator<Item = &StdlibMethod> {
        self.methods.values()
    }

    pub fn morphology(&self) -> &Morphology {
        &self.morphology
    }
}

/// A function exported by the stdlib module.
#[derive(Clone, Debug, PartialEq)]
pub struct NormaExport {
    pub name: String,
    pub ty: SemanticType,
}

/// Outcome of checking a method name against its declared verb forms.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MorphologyValidation {
    pub valid: bool,
    pub error: Option<String>,
    pub stem: Option<String>,
    pub form: Option<Forma>,
}

impl MorphologyValidation {
    fn pass() -> Self {
        MorphologyValidation {
            valid: true,
            ..Default::default()
        }
    }

    fn fail(error: String, stem: Option<String>, form: Option<Forma>) -> Self {
        MorphologyValidation {
            valid: false,
            error: Some(error),
            stem,
            form,
        }
    }
}

/// Composite lookup key: `collection`, `collection:method` or
/// `collection:method:target`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RegistryKey {
    pub collection: String,
    pub method: Option<String>,
    pub target: Option<Target>,
}

impl RegistryKey {
    pub fn collection(collection: impl Into<String>) -> Self {
        RegistryKey {
            collection: collection.into(),
            method: None,
            target: None,
        }
    }

    pub fn method(collection: impl Into<String>, method: impl Into<String>) -> Self {
        RegistryKey {
            method: Some(method.into()),
            ..RegistryKey::collection(collection)
        }
    }

    pub fn translation(collection: impl Into<String>, method: impl Into<String>, target: Target) -> Self {
        RegistryKey {
            target: Some(target),
            ..RegistryKey::method(collection, method)
        }
    }
}

impl FromStr for RegistryKey {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RegistryError::InvalidKey { key: s.to_string() };
        let parts: Vec<&str> = s.split(':').collect();
        if parts.iter().any(|p| p.is_empty()) {
            return Err(invalid());
        }
        match parts.as_slice() {
            [c] => Ok(RegistryKey::collection(*c)),
            [c, m] => Ok(RegistryKey::method(*c, *m)),
            [c, m, t] => {
                let target = Target::from_name(t).ok_or_else(invalid)?;
                Ok(RegistryKey::translation(*c, *m, target))
            }
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for RegistryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.collection)?;
        if let Some(m) = &self.method {
            write!(f, ":{m}")?;
            if let Some(t) = self.target {
                write!(f, ":{t}")?;
            }
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug)]
pub enum RegistryEntry<'r> {
    Collection(&'r Collection),
    Method(&'r StdlibMethod),
    Translation(&'r Translation),
}

/// Frozen stdlib fact base: collection methods with their per-target
/// translations, plus the functions exported by the stdlib module.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    collections: BTreeMap<String, Collection>,
    exports: BTreeMap<String, NormaExport>,
}

impl Registry {
    /// The table bundled with this crate.
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::from_toml_str(BUILTIN_TABLE)
    }

    pub fn from_path(path: &Path) -> Result<Self, RegistryError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, RegistryError> {
        let source: RegistrySource = toml::from_str(content)?;

        let mut exports = BTreeMap::new();
        for (name, export) in source.exports {
            let ty = export_type(&name, export)?;
            exports.insert(name.clone(), NormaExport { name, ty });
        }

        let mut collections = BTreeMap::new();
        for (coll_name, methods) in source.collections {
            let mut built = BTreeMap::new();
            for (method_name, method) in methods {
                let m = build_method(&coll_name, &method_name, method)?;
                built.insert(method_name, m);
            }
            let morphology = Morphology::new(
                built
                    .values()
                    .filter_map(|m| m.radix_forms.as_ref().map(|r| r.stem.clone())),
            );
            collections.insert(
                coll_name.clone(),
                Collection {
                    name: coll_name,
                    methods: built,
                    morphology,
                },
            );
        }

        tracing::debug!(
            collections = collections.len(),
            exports = exports.len(),
            "loaded stdlib registry"
        );
        Ok(Registry { collections, exports })
    }

    pub fn has_collection(&self, collection: &str) -> bool {
        self.collections.contains_key(collection)
    }

    pub fn collection(&self, collection: &str) -> Option<&Collection> {
        self.collections.get(collection)
    }

    pub fn collections(&self) -> impl Iterator<Item = &Collection> {
        self.collections.values()
    }

    pub fn get_method(&self, collection: &str, method: &str) -> Option<&StdlibMethod> {
        self.collections.get(collection)?.method(method)
    }

    pub fn get_translation(&self, target: Target, collection: &str, method: &str) -> Option<&Translation> {
        self.get_method(collection, method)?.translation(target)
    }

    pub fn entry(&self, key: &RegistryKey) -> Option<RegistryEntry<'_>> {
        let coll = self.collections.get(&key.collection)?;
        let Some(method) = &key.method else {
            return Some(RegistryEntry::Collection(coll));
        };
        let m = coll.method(method)?;
        match key.target {
            None => Some(RegistryEntry::Method(m)),
            Some(t) => m.translation(t).map(RegistryEntry::Translation),
        }
    }

    /// Collections that define `method` with a translation for `target`,
    /// in name order.
    pub fn get_receiver_collections_for_method(&self, target: Target, method: &str) -> Vec<&str> {
        self.collections
            .values()
            .filter(|c| c.method(method).is_some_and(|m| m.translation(target).is_some()))
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Checks that `method` is inflected with a form its stem declares.
    ///
    /// Names outside the registry are not stdlib symbols and pass.
    pub fn validate_morphology(&self, collection: &str, method: &str) -> MorphologyValidation {
        let Some(coll) = self.collections.get(collection) else {
            return MorphologyValidation::pass();
        };

        if let Some(m) = coll.method(method) {
            return match &m.radix_forms {
                Some(radix) => validate_declared(collection, method, radix, &coll.morphology),
                None => MorphologyValidation::pass(),
            };
        }

        // Not a method, but it may still inflect a known stem.
        for radix in coll.methods().filter_map(|m| m.radix_forms.as_ref()) {
            let Some(p) = parse_methodum_with_stem(method, &radix.stem) else {
                continue;
            };
            if !radix.forms.contains(&p.form) {
                return MorphologyValidation::fail(
                    format!(
                        "'{method}' is the {} form of stem '{}', which {collection} does not declare (declared: {})",
                        p.form,
                        p.stem,
                        join_forms(&radix.forms)
                    ),
                    Some(p.stem),
                    Some(p.form),
                );
            }
        }
        MorphologyValidation::pass()
    }

    /// `In` for mutating forms, `De` otherwise; `None` when the method has no
    /// valid declared form.
    pub fn get_receiver_ownership(&self, collection: &str, method: &str) -> Option<ReceiverOwnership> {
        let v = self.validate_morphology(collection, method);
        if !v.valid {
            return None;
        }
        v.form.map(|f| f.receiver_ownership())
    }

    pub fn export(&self, name: &str) -> Option<&NormaExport> {
        self.exports.get(name)
    }

    /// Exports in name order.
    pub fn exports(&self) -> impl Iterator<Item = &NormaExport> {
        self.exports.values()
    }
}

/// Validates a method that declares a radix. The parse against its own stem
/// decides whenever it recognises a suffix, declared or not; the greedy
/// parse over all stems of the collection is only consulted when the own
/// stem yields nothing, and only if it lands on a declared form.
fn validate_declared(
    collection: &str,
    method: &str,
    radix: &RadixForms,
    morphology: &Morphology,
) -> MorphologyValidation {
    let parsed = parse_methodum_with_stem(method, &radix.stem).or_else(|| {
        morphology
            .parse_methodum(method)
            .filter(|p| radix.forms.contains(&p.form))
    });
    match parsed {
        Some(p) if radix.forms.contains(&p.form) => MorphologyValidation {
            valid: true,
            error: None,
            stem: Some(p.stem),
            form: Some(p.form),
        },
        Some(p) => MorphologyValidation::fail(
            format!(
                "'{method}' is the {} form of stem '{}', but {collection}.{method} declares only {}",
                p.form,
                p.stem,
                join_forms(&radix.forms)
            ),
            Some(p.stem),
            Some(p.form),
        ),
        None => MorphologyValidation::fail(
            format!("'{method}' is not an inflection of its declared stem '{}'", radix.stem),
            Some(radix.stem.clone()),
            None,
        ),
    }
}

fn join_forms(forms: &[Forma]) -> String {
    forms.iter().map(Forma::as_str).collect::<Vec<_>>().join(", ")
}

fn export_type(name: &str, export: ExportSource) -> Result<SemanticType, RegistryError> {
    let sig = |message: String| RegistryError::Signature {
        export: name.to_string(),
        message,
    };
    let params = export
        .params
        .iter()
        .map(|p| parse_type_str(p))
        .collect::<Result<Vec<_>, _>>()
        .map_err(sig)?;
    let ret = parse_type_str(&export.returns).map_err(sig)?;
    Ok(SemanticType::function(params, ret, export.futura))
}

fn build_method(collection: &str, name: &str, source: MethodSource) -> Result<StdlibMethod, RegistryError> {
    let radix_forms = match &source.radix {
        None => None,
        Some(radix) => {
            let Some((stem, forms)) = radix.split_first().filter(|(stem, _)| !stem.is_empty()) else {
                return Err(RegistryError::EmptyRadix {
                    collection: collection.to_string(),
                    method: name.to_string(),
                });
            };
            let forms = forms
                .iter()
                .map(|f| {
                    Forma::from_name(f).ok_or_else(|| RegistryError::UnknownForm {
                        collection: collection.to_string(),
                        method: name.to_string(),
                        form: f.clone(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            Some(RadixForms {
                stem: stem.clone(),
                forms,
            })
        }
    };

    let mut translations = HashMap::new();
    for (target, t) in source.translations() {
        let translation = match t {
            TranslationSource::Method { method } => Translation::Method { method },
            TranslationSource::Template { template, params } => {
                if let Some(index) = placeholder_indices(&template)
                    .into_iter()
                    .find(|i| *i >= params.len())
                {
                    return Err(RegistryError::TemplateParam {
                        collection: collection.to_string(),
                        method: name.to_string(),
                        target: target.to_string(),
                        index,
                    });
                }
                Translation::Template { template, params }
            }
        };
        translations.insert(target, translation);
    }

    Ok(StdlibMethod {
        name: name.to_string(),
        radix_forms,
        translations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = r#"
        [exports.scribe]
        params = ["ignotum"]
        returns = "vacuum"

        [collections.lista.adde]
        radix = ["add", "imperativus", "perfectum"]
        ts = { method = "push" }
        zig = { template = "§0.append(§1, §2)", params = ["ego", "curator", "elem"] }

        [collections.lista.addita]
        radix = ["add", "imperativus", "perfectum"]
        ts = { template = "[...§, §]", params = ["ego", "elem"] }

        [collections.copia.adde]
        radix = ["add", "imperativus"]
        ts = { method = "add" }
    "#;

    #[test]
    fn loads_translations_and_exports() {
        let reg = Registry::from_toml_str(SMALL).expect("load");
        assert_eq!(
            reg.get_translation(Target::Ts, "lista", "adde"),
            Some(&Translation::Method {
                method: "push".to_string()
            })
        );
        assert!(reg.get_translation(Target::Py, "lista", "adde").is_none());
        assert_eq!(
            reg.export("scribe").map(|e| e.ty.to_string()).as_deref(),
            Some("(ignotum) -> vacuum")
        );
    }

    #[test]
    fn rejects_unknown_form_names() {
        let err = Registry::from_toml_str(
            r#"
            [collections.lista.adde]
            radix = ["add", "gerundium"]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, RegistryError::UnknownForm { ref form, .. } if form == "gerundium"));
    }

    #[test]
    fn rejects_placeholders_without_params() {
        let err = Registry::from_toml_str(
            r#"
            [collections.lista.addita]
            ts = { template = "[...§0, §1]", params = ["ego"] }
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, RegistryError::TemplateParam { index: 1, .. }));
    }

    #[test]
    fn rejects_empty_radix_and_bad_signatures() {
        let err = Registry::from_toml_str("[collections.lista.adde]\nradix = []\n").unwrap_err();
        assert!(matches!(err, RegistryError::EmptyRadix { .. }));

        let err = Registry::from_toml_str("[exports.f]\nreturns = \"lista<\"\n").unwrap_err();
        assert!(matches!(err, RegistryError::Signature { .. }));
    }

    #[test]
    fn composite_keys_round_trip_and_resolve() {
        let reg = Registry::from_toml_str(SMALL).expect("load");

        let key: RegistryKey = "lista:adde:zig".parse().expect("key");
        assert_eq!(key.to_string(), "lista:adde:zig");
        assert!(matches!(reg.entry(&key), Some(RegistryEntry::Translation(_))));

        let key: RegistryKey = "lista:addita".parse().expect("key");
        assert!(matches!(reg.entry(&key), Some(RegistryEntry::Method(m)) if m.name == "addita"));

        let key: RegistryKey = "copia".parse().expect("key");
        assert!(matches!(reg.entry(&key), Some(RegistryEntry::Collection(c)) if c.name() == "copia"));

        assert!(reg.entry(&RegistryKey::collection("tabula")).is_none());
        assert!("lista::ts".parse::<RegistryKey>().is_err());
        assert!("lista:adde:cobol".parse::<RegistryKey>().is_err());
        assert!("a:b:ts:d".parse::<RegistryKey>().is_err());
    }

    #[test]
    fn receiver_collections_are_sorted_and_target_aware() {
        let reg = Registry::from_toml_str(SMALL).expect("load");
        assert_eq!(reg.get_receiver_collections_for_method(Target::Ts, "adde"), vec!["copia", "lista"]);
        assert_eq!(reg.get_receiver_collections_for_method(Target::Zig, "adde"), vec!["lista"]);
        assert!(reg.get_receiver_collections_for_method(Target::Ts, "pone").is_empty());
    }

    #[test]
    fn morphology_validation() {
        let reg = Registry::from_toml_str(SMALL).expect("load");

        let v = reg.validate_morphology("lista", "addita");
        assert!(v.valid);
        assert_eq!(v.stem.as_deref(), Some("add"));
        assert_eq!(v.form, Some(Forma::Perfectum));

        let v = reg.validate_morphology("lista", "addet");
        assert!(!v.valid);
        assert_eq!(v.form, Some(Forma::FuturumIndicativum));
        assert!(v.error.expect("error").contains("does not declare"));

        let v = reg.validate_morphology("copia", "addita");
        assert!(!v.valid, "copia declares only imperativus for 'add'");

        assert!(reg.validate_morphology("tabula", "quidlibet").valid);
        assert!(reg.validate_morphology("lista", "longitudo").valid);
    }

    #[test]
    fn own_stem_decides_even_when_greedy_would_pass() {
        let reg = Registry::from_toml_str(
            r#"
            [collections.tabula.selecta]
            radix = ["selec", "imperativus"]

            [collections.tabula.selige]
            radix = ["select", "imperativus"]
            "#,
        )
        .expect("load");

        // `select` + `a` would be a declared imperativus, but `selec` + `ta`
        // is the method's own reading.
        let v = reg.validate_morphology("tabula", "selecta");
        assert!(!v.valid);
        assert_eq!(v.stem.as_deref(), Some("selec"));
        assert_eq!(v.form, Some(Forma::Perfectum));
    }

    #[test]
    fn receiver_ownership_follows_form() {
        let reg = Registry::from_toml_str(SMALL).expect("load");
        assert_eq!(reg.get_receiver_ownership("lista", "adde"), Some(ReceiverOwnership::In));
        assert_eq!(reg.get_receiver_ownership("lista", "addita"), Some(ReceiverOwnership::De));
        assert_eq!(reg.get_receiver_ownership("lista", "addet"), None);
        assert_eq!(reg.get_receiver_ownership("tabula", "pone"), None);
    }

    #[test]
    fn translations_render_calls() {
        let reg = Registry::from_toml_str(SMALL).expect("load");
        let args = vec!["3".to_string()];
        let ts = reg.get_translation(Target::Ts, "lista", "adde").expect("ts");
        assert_eq!(ts.render("xs", &args), "xs.push(3)");
        let zig = reg.get_translation(Target::Zig, "lista", "adde").expect("zig");
        assert_eq!(zig.render("xs", &args), "xs.append(curator, 3)");
    }
}
