//! Extension `messages.json` documents.

use crate::error::BuildError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

/// The subset of a locale's translations the browser reads from `_locales`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionMessages {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension_name: Option<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension_description: Option<Message>,
}

impl ExtensionMessages {
    /// Project the name and description keys out of a translation document.
    ///
    /// Missing, non-string and empty values are all treated as absent.
    pub fn project(document: &Value, name_key: &str, description_key: &str) -> Self {
        let pick = |key: &str| {
            document
                .get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(|s| Message {
                    message: s.to_string(),
                })
        };
        Self {
            extension_name: pick(name_key),
            extension_description: pick(description_key),
        }
    }
}

/// Give every locale without a name the fallback locale's name.
///
/// Returns the backfilled locales. Fails only when some locale needs a name
/// and the fallback locale has none to give.
pub fn backfill_names(
    translations: &mut BTreeMap<String, ExtensionMessages>,
    fallback: &str,
) -> Result<Vec<String>, BuildError> {
    let missing: Vec<String> = translations
        .iter()
        .filter(|(_, messages)| messages.extension_name.is_none())
        .map(|(locale, _)| locale.clone())
        .collect();
    if missing.is_empty() {
        return Ok(missing);
    }

    let name = translations
        .get(fallback)
        .and_then(|messages| messages.extension_name.clone())
        .ok_or_else(|| BuildError::MissingFallback {
            locale: fallback.to_string(),
            missing: missing.clone(),
        })?;

    for locale in &missing {
        if let Some(messages) = translations.get_mut(locale) {
            messages.extension_name = Some(name.clone());
        }
    }
    Ok(missing)
}
