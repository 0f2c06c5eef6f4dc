#![forbid(unsafe_code)]

//! Codegen-facing method resolution: receiver type + method name to a
//! concrete translation.

use faber_types::{PrimitiveName, SemanticType};

use crate::error::DispatchError;
use crate::morphology::ReceiverOwnership;
use crate::registry::{Registry, StdlibMethod, Target, Translation};

/// Registry collection backing a receiver type, if any.
///
/// `lista`, `tabula` and `copia` generics map to themselves; `textus` maps to
/// the `textus` collection.
pub fn collection_for_type(ty: &SemanticType) -> Option<String> {
    match ty {
        SemanticType::Generic(g) => Some(g.name.to_ascii_lowercase()),
        SemanticType::Primitive(p) if p.name == PrimitiveName::Textus => Some("textus".to_string()),
        _ => None,
    }
}

#[derive(Clone, Debug)]
pub struct ResolvedCall<'r> {
    pub collection: String,
    pub method: &'r StdlibMethod,
    pub translation: &'r Translation,
    pub ownership: Option<ReceiverOwnership>,
}

impl Registry {
    pub fn resolve_method_call(
        &self,
        target: Target,
        receiver: &SemanticType,
        method: &str,
    ) -> Result<ResolvedCall<'_>, DispatchError> {
        let Some(collection) = collection_for_type(receiver).filter(|c| self.has_collection(c)) else {
            let candidates: Vec<String> = self
                .get_receiver_collections_for_method(target, method)
                .into_iter()
                .map(str::to_string)
                .collect();
            if receiver.is_unknown() && !candidates.is_empty() {
                return Err(DispatchError::UnresolvedReceiver {
                    method: method.to_string(),
                    candidates,
                });
            }
            return Err(DispatchError::UnknownMethod {
                collection: receiver.to_string(),
                method: method.to_string(),
            });
        };

        let validation = self.validate_morphology(&collection, method);
        if !validation.valid {
            let message = validation
                .error
                .unwrap_or_else(|| format!("'{method}' has an undeclared form on {collection}"));
            return Err(DispatchError::Morphology(message));
        }

        let Some(m) = self.get_method(&collection, method) else {
            return Err(DispatchError::UnknownMethod { collection, method: method.to_string() });
        };
        let Some(translation) = m.translation(target) else {
            return Err(DispatchError::NoTranslation {
                collection,
                method: method.to_string(),
                target: target.to_string(),
            });
        };

        tracing::trace!(%collection, method, %target, "resolved stdlib call");
        Ok(ResolvedCall {
            ownership: validation.form.map(|f| f.receiver_ownership()),
            collection,
            method: m,
            translation,
        })
    }
}
