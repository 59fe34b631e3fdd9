use std::collections::HashMap;

use crate::error::DedupError;

const EN: &str = include_str!("../locales/en.toml");
const FR: &str = include_str!("../locales/fr.toml");

/// Renders a message by key, substituting `{name}` placeholders from `args`.
pub trait Translator {
    fn translate(&self, key: &str, args: &[(&str, String)]) -> String;
}

/// A flat `key = "template"` message table for one language.
#[derive(Debug, Clone)]
pub struct Catalog {
    lang: String,
    messages: HashMap<String, String>,
}

impl Catalog {
    pub fn from_toml(lang: &str, input: &str) -> Result<Self, DedupError> {
        let messages: HashMap<String, String> =
            toml::from_str(input).map_err(|e| DedupError::Locale(format!("{lang}: {e}")))?;
        Ok(Self { lang: lang.to_string(), messages })
    }

    pub fn english() -> Self {
        Self::builtin("en", EN)
    }

    pub fn french() -> Self {
        Self::builtin("fr", FR)
    }

    fn builtin(lang: &str, source: &str) -> Self {
        // Built-in catalogs are covered by `builtin_catalogs_parse`.
        Self::from_toml(lang, source).unwrap_or_else(|e| {
            log::error!("{e}");
            Self { lang: lang.to_string(), messages: HashMap::new() }
        })
    }

    /// Built-in catalog for a language code such as `fr` or `fr-CA`.
    /// Unknown languages fall back to English.
    pub fn for_locale(code: &str) -> Self {
        let primary = code.split(['-', '_']).next().unwrap_or("").to_ascii_lowercase();
        match primary.as_str() {
            "fr" => Self::french(),
            "en" => Self::english(),
            _ => {
                log::warn!("no message catalog for locale '{code}', using English");
                Self::english()
            }
        }
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.messages.keys().map(String::as_str)
    }
}

impl Translator for Catalog {
    fn translate(&self, key: &str, args: &[(&str, String)]) -> String {
        match self.messages.get(key) {
            Some(template) => render(template, args),
            None => format!("[missing translation: {key}]"),
        }
    }
}

/// Single-pass substitution; values are never re-scanned for placeholders.
/// Unknown placeholders are left as written.
fn render(template: &str, args: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let name = &after[..close];
                match args.iter().find(|(k, _)| *k == name) {
                    Some((_, value)) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}
