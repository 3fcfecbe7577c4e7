use std::collections::BTreeMap;

use crate::error::ServiceError;
use crate::services::Translator;

/// The name→code table of languages the translation collaborator supports.
/// Loaded once at startup; every page resolves its language selection here.
#[derive(Debug, Clone)]
pub struct LanguageCatalog {
    codes: BTreeMap<String, String>,
}

impl LanguageCatalog {
    /// Fetches the table from the translation collaborator. A failure here
    /// is fatal to the application: no page can render without the catalog.
    pub fn load<T: Translator + ?Sized>(translator: &T) -> Result<Self, ServiceError> {
        let raw = translator.supported_languages()?;
        let mut codes = BTreeMap::new();
        for (name, code) in raw {
            codes.insert(name.trim().to_lowercase(), code);
        }
        if codes.is_empty() {
            return Err(ServiceError::unavailable(
                "translation",
                "empty supported-language table",
            ));
        }
        Ok(LanguageCatalog { codes })
    }

    /// Resolves a display name to its service code. Names are normalized to
    /// lowercase before lookup, so selection is case-insensitive.
    pub fn resolve_code(&self, name: &str) -> Result<&str, ServiceError> {
        let key = name.trim().to_lowercase();
        self.codes.get(&key).map(String::as_str).ok_or_else(|| {
            ServiceError::unsupported(format!("unknown language '{}'", name.trim()))
        })
    }

    /// Display names, sorted. Ordering is presentational only.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.codes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Maps a translation-service language code onto the code whisper.cpp
/// expects. Most codes pass through as their two-letter base; the handful
/// of service-specific spellings are rewritten.
pub fn map_code_for_whisper(code: &str) -> Option<String> {
    let lower = code.trim().to_lowercase();
    if lower.is_empty() || lower == "auto" {
        return None;
    }
    if lower.starts_with("zh") {
        return Some("zh".to_string());
    }
    let base = lower.split('-').next().unwrap_or(&lower);
    let mapped = match base {
        "iw" => "he",
        "jw" => "jv",
        "fil" => "tl",
        other => other,
    };
    if mapped.len() == 2 || mapped.len() == 3 {
        Some(mapped.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ServiceFuture;
    use std::collections::BTreeMap;

    struct TableTranslator {
        table: BTreeMap<String, String>,
    }

    impl Translator for TableTranslator {
        fn supported_languages(&self) -> Result<BTreeMap<String, String>, ServiceError> {
            Ok(self.table.clone())
        }

        fn translate(&self, text: String, _target_code: String) -> ServiceFuture<String> {
            Box::pin(async move { Ok(text) })
        }
    }

    fn catalog() -> LanguageCatalog {
        let mut table = BTreeMap::new();
        table.insert("French".to_string(), "fr".to_string());
        table.insert("spanish".to_string(), "es".to_string());
        table.insert("german".to_string(), "de".to_string());
        LanguageCatalog::load(&TableTranslator { table }).unwrap()
    }

    #[test]
    fn resolve_code_is_total_over_catalog_names() {
        let catalog = catalog();
        for name in catalog.names().map(str::to_string).collect::<Vec<_>>() {
            let code = catalog.resolve_code(&name).unwrap();
            assert!(!code.is_empty());
        }
    }

    #[test]
    fn resolve_code_normalizes_case_and_whitespace() {
        let catalog = catalog();
        assert_eq!(catalog.resolve_code("  FRENCH ").unwrap(), "fr");
        assert_eq!(catalog.resolve_code("Spanish").unwrap(), "es");
    }

    #[test]
    fn unknown_name_is_a_lookup_error() {
        let err = catalog().resolve_code("klingon").unwrap_err();
        assert!(matches!(err, ServiceError::UnsupportedInput(_)));
    }

    #[test]
    fn names_are_sorted_for_display() {
        let names: Vec<&str> = catalog().names().collect();
        assert_eq!(names, vec!["french", "german", "spanish"]);
    }

    #[test]
    fn empty_table_fails_to_load() {
        let err = LanguageCatalog::load(&TableTranslator {
            table: BTreeMap::new(),
        })
        .unwrap_err();
        assert!(matches!(err, ServiceError::ServiceUnavailable { .. }));
    }

    #[test]
    fn whisper_code_mapping() {
        assert_eq!(map_code_for_whisper("es").as_deref(), Some("es"));
        assert_eq!(map_code_for_whisper("zh-CN").as_deref(), Some("zh"));
        assert_eq!(map_code_for_whisper("zh-TW").as_deref(), Some("zh"));
        assert_eq!(map_code_for_whisper("iw").as_deref(), Some("he"));
        assert_eq!(map_code_for_whisper("jw").as_deref(), Some("jv"));
        assert_eq!(map_code_for_whisper("fil").as_deref(), Some("tl"));
        assert_eq!(map_code_for_whisper("auto"), None);
        assert_eq!(map_code_for_whisper("mni-Mtei").as_deref(), Some("mni"));
    }
}
