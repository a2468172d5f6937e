//! Localized validation messages for the price filter.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::PageContext;
use crate::error::PageError;

#[derive(Debug, Deserialize)]
struct RawDictionary {
    #[serde(default)]
    translations: serde_json::Map<String, serde_json::Value>,
}

/// Translations keyed by the last segment of their dotted key
/// (`validation_messages.price_min_evaluation` becomes `price_min_evaluation`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationDictionary {
    entries: HashMap<String, String>,
}

impl TranslationDictionary {
    /// Pick the first non-empty dictionary among the active, fallback and
    /// default locale dictionaries of the page context.
    pub fn from_context(context: &PageContext) -> Result<Self, PageError> {
        let candidates = [
            &context.validation_dictionary_json,
            &context.validation_fallback_dictionary_json,
            &context.validation_default_dictionary_json,
        ];

        for json in candidates.into_iter().flatten() {
            let raw: RawDictionary = serde_json::from_str(json)?;
            if !raw.translations.is_empty() {
                return Ok(Self::from_translations(raw.translations));
            }
        }

        tracing::warn!("no validation dictionary with translations in page context");
        Ok(Self::default())
    }

    fn from_translations(translations: serde_json::Map<String, serde_json::Value>) -> Self {
        let entries = translations
            .into_iter()
            .filter_map(|(key, value)| {
                let short = key.rsplit('.').next().unwrap_or(&key).to_string();
                match value {
                    serde_json::Value::String(text) => Some((short, text)),
                    _ => None,
                }
            })
            .collect();
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    fn text(&self, key: &str) -> String {
        self.get(key).unwrap_or_default().to_string()
    }
}

/// The five price-filter messages handed to faceted search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationMessageSet {
    pub on_min_price_error: String,
    pub on_max_price_error: String,
    pub min_price_not_entered: String,
    pub max_price_not_entered: String,
    pub on_invalid_price: String,
}

impl ValidationMessageSet {
    pub fn from_dictionary(dictionary: &TranslationDictionary) -> Self {
        Self {
            on_min_price_error: dictionary.text("price_min_evaluation"),
            on_max_price_error: dictionary.text("price_max_evaluation"),
            min_price_not_entered: dictionary.text("price_min_not_entered"),
            max_price_not_entered: dictionary.text("price_max_not_entered"),
            on_invalid_price: dictionary.text("price_invalid_value"),
        }
    }
}
