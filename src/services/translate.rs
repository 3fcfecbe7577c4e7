use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

use super::{ServiceFuture, Translator};
use crate::error::ServiceError;
use crate::settings::Settings;

/// Client for the unauthenticated Google Translate web endpoint
/// (`translate_a/single` with `client=gtx`). Source language is always
/// auto-detected; the caller supplies only the target code.
#[derive(Debug, Clone)]
pub struct GoogleTranslate {
    client: reqwest::Client,
    endpoint: String,
}

impl GoogleTranslate {
    pub fn new(settings: &Settings) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.http_timeout_secs))
            .build()
            .map_err(|err| ServiceError::unavailable("translation", err))?;
        Ok(GoogleTranslate {
            client,
            endpoint: settings.translate_endpoint.clone(),
        })
    }
}

impl Translator for GoogleTranslate {
    fn supported_languages(&self) -> Result<BTreeMap<String, String>, ServiceError> {
        let raw = include_str!("languages.json");
        let parsed: LanguageData = serde_json::from_str(raw)
            .map_err(|err| ServiceError::unavailable("translation", err))?;
        Ok(parsed.languages)
    }

    fn translate(&self, text: String, target_code: String) -> ServiceFuture<String> {
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        Box::pin(async move {
            debug!("translating {} chars to {}", text.chars().count(), target_code);
            let response = client
                .get(&endpoint)
                .query(&[
                    ("client", "gtx"),
                    ("sl", "auto"),
                    ("tl", target_code.as_str()),
                    ("dt", "t"),
                    ("q", text.as_str()),
                ])
                .send()
                .await
                .map_err(|err| ServiceError::unavailable("translation", err))?;

            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|err| ServiceError::unavailable("translation", err))?;
            if !status.is_success() {
                return Err(ServiceError::TranslationFailed(format!(
                    "endpoint returned {}: {}",
                    status,
                    body.trim()
                )));
            }
            parse_gtx_payload(&body)
        })
    }
}

#[derive(Debug, Deserialize)]
struct LanguageData {
    languages: BTreeMap<String, String>,
}

/// The gtx payload is a nested array; the first element lists translated
/// segments, each segment an array whose first element is the text.
fn parse_gtx_payload(body: &str) -> Result<String, ServiceError> {
    let value: serde_json::Value = serde_json::from_str(body).map_err(|err| {
        ServiceError::TranslationFailed(format!("unparseable response: {}", err))
    })?;
    let segments = value
        .get(0)
        .and_then(|value| value.as_array())
        .ok_or_else(|| {
            ServiceError::TranslationFailed("response carries no translation segments".to_string())
        })?;

    let mut translated = String::new();
    for segment in segments {
        if let Some(text) = segment.get(0).and_then(|value| value.as_str()) {
            translated.push_str(text);
        }
    }

    if translated.trim().is_empty() {
        return Err(ServiceError::TranslationFailed(
            "response carries no translated text".to_string(),
        ));
    }
    Ok(translated)
}
