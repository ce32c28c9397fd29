// src/common/i18n.rs

use std::collections::HashMap;

use anyhow::Context;

pub const DEFAULT_LANG: &str = "en";

// Catálogos embutidos no binário
const CATALOGS: [(&str, &str); 2] = [
    ("en", include_str!("../../locales/en.json")),
    ("pt", include_str!("../../locales/pt.json")),
];

/// Mensagens de erro por idioma. Chaves ausentes caem para o inglês e,
/// em último caso, para a própria chave.
#[derive(Debug, Clone)]
pub struct I18nStore {
    catalogs: HashMap<String, HashMap<String, String>>,
}

impl I18nStore {
    pub fn load() -> anyhow::Result<Self> {
        let mut catalogs = HashMap::new();
        for (lang, raw) in CATALOGS {
            let messages: HashMap<String, String> = serde_json::from_str(raw)
                .with_context(|| format!("catálogo de mensagens inválido: {}", lang))?;
            catalogs.insert(lang.to_string(), messages);
        }
        Ok(Self { catalogs })
    }

    pub fn supports(&self, lang: &str) -> bool {
        self.catalogs.contains_key(lang)
    }

    pub fn translate(&self, lang: &str, key: &str, args: &[(&str, &str)]) -> String {
        let template = self
            .lookup(lang, key)
            .or_else(|| self.lookup(DEFAULT_LANG, key))
            .unwrap_or(key);

        args.iter().fold(template.to_string(), |msg, (name, value)| {
            msg.replace(&format!("{{{}}}", name), value)
        })
    }

    pub fn resource_name(&self, lang: &str, resource: &str) -> String {
        self.translate(lang, &format!("resource.{}", resource), &[])
    }

    fn lookup(&self, lang: &str, key: &str) -> Option<&str> {
        self.catalogs.get(lang)?.get(key).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogs_have_the_same_keys() {
        let store = I18nStore::load().unwrap();
        let en = &store.catalogs["en"];
        let pt = &store.catalogs["pt"];
        for key in en.keys() {
            assert!(pt.contains_key(key), "missing pt key {key}");
        }
        assert_eq!(en.len(), pt.len());
    }

    #[test]
    fn interpolates_arguments() {
        let store = I18nStore::load().unwrap();
        assert_eq!(
            store.translate("en", "invalid_parameter", &[("param", "id")]),
            "Invalid or missing parameter: id"
        );
    }

    #[test]
    fn falls_back_to_english_then_key() {
        let store = I18nStore::load().unwrap();
        assert_eq!(store.translate("de", "required", &[]), "This field is required.");
        assert_eq!(store.translate("en", "no_such_key", &[]), "no_such_key");
        assert!(!store.supports("de"));
    }
}
