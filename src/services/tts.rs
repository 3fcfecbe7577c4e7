use std::time::Duration;
use tracing::debug;

use super::{ServiceFuture, SpeechSynthesizer};
use crate::error::ServiceError;
use crate::settings::Settings;

/// The unauthenticated endpoint truncates longer inputs instead of failing,
/// so reject anything past this limit up front.
const MAX_TTS_CHARS: usize = 200;

/// Client for the Google Translate speech endpoint (`translate_tts` with
/// `client=tw-ob`), returning MP3 bytes.
#[derive(Debug, Clone)]
pub struct GoogleSpeech {
    client: reqwest::Client,
    endpoint: String,
}

impl GoogleSpeech {
    pub fn new(settings: &Settings) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.http_timeout_secs))
            .build()
            .map_err(|err| ServiceError::unavailable("speech synthesis", err))?;
        Ok(GoogleSpeech {
            client,
            endpoint: settings.tts_endpoint.clone(),
        })
    }
}

impl SpeechSynthesizer for GoogleSpeech {
    fn synthesize(&self, text: String, language_code: String) -> ServiceFuture<Vec<u8>> {
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        Box::pin(async move {
            let text = text.replace('\n', " ");
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Err(ServiceError::unsupported("nothing to synthesize"));
            }
            if trimmed.chars().count() > MAX_TTS_CHARS {
                return Err(ServiceError::unsupported(format!(
                    "text too long for speech synthesis (limit {} characters)",
                    MAX_TTS_CHARS
                )));
            }

            debug!("synthesizing {} chars as {}", trimmed.chars().count(), language_code);
            let response = client
                .get(&endpoint)
                .query(&[
                    ("ie", "UTF-8"),
                    ("client", "tw-ob"),
                    ("tl", language_code.as_str()),
                    ("q", trimmed),
                ])
                .send()
                .await
                .map_err(|err| ServiceError::unavailable("speech synthesis", err))?;

            let status = response.status();
            if !status.is_success() {
                return Err(ServiceError::SynthesisFailed(format!(
                    "endpoint returned {}",
                    status
                )));
            }
            let bytes = response
                .bytes()
                .await
                .map_err(|err| ServiceError::unavailable("speech synthesis", err))?;
            if bytes.is_empty() {
                return Err(ServiceError::SynthesisFailed(
                    "endpoint returned no audio".to_string(),
                ));
            }
            Ok(bytes.to_vec())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(endpoint: String) -> GoogleSpeech {
        let settings = Settings {
            tts_endpoint: endpoint,
            http_timeout_secs: 5,
            ..Settings::default()
        };
        GoogleSpeech::new(&settings).unwrap()
    }

    #[tokio::test]
    async fn synthesize_returns_audio_bytes() {
        let server = MockServer::start().await;
        let mp3 = vec![0x49, 0x44, 0x33, 0x04, 0x00];
        Mock::given(method("GET"))
            .and(path("/translate_tts"))
            .and(query_param("tl", "fr"))
            .and(query_param("q", "Bonjour"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(mp3.clone(), "audio/mpeg"))
            .mount(&server)
            .await;

        let client = client_for(format!("{}/translate_tts", server.uri()));
        let audio = client
            .synthesize("Bonjour".to_string(), "fr".to_string())
            .await
            .unwrap();
        assert_eq!(audio, mp3);
    }

    #[tokio::test]
    async fn synthesize_rejects_http_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/translate_tts"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = client_for(format!("{}/translate_tts", server.uri()));
        let err = client
            .synthesize("Bonjour".to_string(), "fr".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::SynthesisFailed(_)));
    }

    #[tokio::test]
    async fn synthesize_rejects_empty_and_oversized_text() {
        let client = client_for("http://unused.invalid/translate_tts".to_string());

        let err = client
            .synthesize("   ".to_string(), "fr".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::UnsupportedInput(_)));

        let long = "a".repeat(MAX_TTS_CHARS + 1);
        let err = client.synthesize(long, "fr".to_string()).await.unwrap_err();
        assert!(matches!(err, ServiceError::UnsupportedInput(_)));
    }
}
