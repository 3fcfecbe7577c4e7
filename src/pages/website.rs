use crate::catalog::LanguageCatalog;
use crate::error::ServiceError;

const PROXY_ENDPOINT: &str = "https://translate.google.com/translate";

/// Builds the proxy link for a website translation. The link is only
/// constructed; nothing is fetched.
pub fn build_link(
    catalog: &LanguageCatalog,
    url: &str,
    language_name: &str,
) -> Result<String, ServiceError> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::unsupported("website URL is empty"));
    }
    let code = catalog.resolve_code(language_name)?;
    let normalized = normalize_url(trimmed);
    Ok(format!(
        "{}?sl=auto&tl={}&u={}",
        PROXY_ENDPOINT,
        code,
        encode_embedded_url(&normalized)
    ))
}

/// Prefixes `http://` when the input carries no scheme prefix.
fn normalize_url(url: &str) -> String {
    if url.starts_with("http") {
        url.to_string()
    } else {
        format!("http://{}", url)
    }
}

/// Percent-encodes the bytes that would break or extend the proxy query
/// string. Unreserved characters plus `:` and `/` pass through, so ordinary
/// URLs stay readable.
fn encode_embedded_url(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    for byte in url.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b':' | b'/' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{ServiceFuture, Translator};
    use insta::assert_snapshot;
    use std::collections::BTreeMap;

    struct TwoLanguages;

    impl Translator for TwoLanguages {
        fn supported_languages(&self) -> Result<BTreeMap<String, String>, ServiceError> {
            let mut table = BTreeMap::new();
            table.insert("spanish".to_string(), "es".to_string());
            table.insert("french".to_string(), "fr".to_string());
            Ok(table)
        }

        fn translate(&self, text: String, _target_code: String) -> ServiceFuture<String> {
            Box::pin(async move { Ok(text) })
        }
    }

    fn catalog() -> LanguageCatalog {
        LanguageCatalog::load(&TwoLanguages).unwrap()
    }

    #[test]
    fn bare_host_gets_an_http_prefix() {
        let link = build_link(&catalog(), "example.com", "spanish").unwrap();
        assert!(link.contains("u=http://example.com"));
    }

    #[test]
    fn existing_scheme_is_not_double_prefixed() {
        let link = build_link(&catalog(), "http://example.com", "spanish").unwrap();
        assert!(link.contains("u=http://example.com"));
        assert!(!link.contains("http://http://"));

        let link = build_link(&catalog(), "https://example.com", "french").unwrap();
        assert!(link.contains("u=https://example.com"));
    }

    #[test]
    fn proxy_link_has_the_fixed_form() {
        let link = build_link(&catalog(), "test.com", "spanish").unwrap();
        assert_snapshot!(
            link,
            @"https://translate.google.com/translate?sl=auto&tl=es&u=http://test.com"
        );
    }

    #[test]
    fn query_breaking_characters_are_escaped() {
        let link = build_link(&catalog(), "example.com/a?x=1&y=2", "spanish").unwrap();
        assert!(link.ends_with("u=http://example.com/a%3Fx%3D1%26y%3D2"));

        let link = build_link(&catalog(), "example.com/a b", "spanish").unwrap();
        assert!(link.ends_with("u=http://example.com/a%20b"));
    }

    #[test]
    fn empty_url_and_unknown_language_are_refused() {
        let err = build_link(&catalog(), "   ", "spanish").unwrap_err();
        assert!(matches!(err, ServiceError::UnsupportedInput(_)));

        let err = build_link(&catalog(), "example.com", "latin").unwrap_err();
        assert!(matches!(err, ServiceError::UnsupportedInput(_)));
    }
}
