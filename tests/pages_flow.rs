//! End-to-end page flows against stub collaborators: the catalog is built
//! from the stub translation service, and every page operation runs exactly
//! as the surfaces drive it.

use std::collections::BTreeMap;

use nova_translate::ServiceError;
use nova_translate::catalog::LanguageCatalog;
use nova_translate::data::{AudioUpload, ImageUpload};
use nova_translate::pages;
use nova_translate::services::{
    ServiceFuture, SpeechRecognizer, SpeechSynthesizer, TextRecognizer, Translator,
};
use nova_translate::session::{Page, Session};

struct StubTranslator;

impl Translator for StubTranslator {
    fn supported_languages(&self) -> Result<BTreeMap<String, String>, ServiceError> {
        let mut table = BTreeMap::new();
        table.insert("english".to_string(), "en".to_string());
        table.insert("french".to_string(), "fr".to_string());
        table.insert("spanish".to_string(), "es".to_string());
        Ok(table)
    }

    fn translate(&self, text: String, target_code: String) -> ServiceFuture<String> {
        Box::pin(async move {
            let translated = match (text.as_str(), target_code.as_str()) {
                ("Hello", "fr") => "Bonjour".to_string(),
                (other, code) => format!("{}:{}", code, other),
            };
            Ok(translated)
        })
    }
}

struct StubOcr;

impl TextRecognizer for StubOcr {
    fn extract_text(&self, _image: &ImageUpload) -> Result<String, ServiceError> {
        Ok("Hello\n".to_string())
    }
}

struct StubSynthesizer;

impl SpeechSynthesizer for StubSynthesizer {
    fn synthesize(&self, text: String, _language_code: String) -> ServiceFuture<Vec<u8>> {
        Box::pin(async move { Ok(text.into_bytes()) })
    }
}

struct StubRecognizer;

impl SpeechRecognizer for StubRecognizer {
    fn transcribe(&self, _audio: &AudioUpload, _language_code: &str) -> Result<String, ServiceError> {
        Ok("  hello there".to_string())
    }
}

fn catalog() -> LanguageCatalog {
    LanguageCatalog::load(&StubTranslator).unwrap()
}

fn png_upload() -> ImageUpload {
    let mut bytes = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.extend_from_slice(&[0u8; 16]);
    ImageUpload::from_bytes(bytes, Some("hello.png".to_string())).unwrap()
}

fn wav_upload() -> AudioUpload {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&36u32.to_le_bytes());
    bytes.extend_from_slice(b"WAVE");
    bytes.extend_from_slice(&[0u8; 16]);
    AudioUpload::from_bytes(bytes, Some("clip.wav".to_string())).unwrap()
}

#[tokio::test]
async fn ocr_page_extracts_then_translates() {
    let catalog = catalog();
    let session = Session::new().navigate(Page::Ocr);
    assert_eq!(session.current_page(), Page::Ocr);

    let text = pages::ocr::extract_text(&StubOcr, &png_upload()).unwrap();
    assert_eq!(text, "Hello");

    let translated = pages::ocr::translate_extracted(&StubTranslator, &catalog, &text, "french")
        .await
        .unwrap();
    assert!(!translated.is_empty());
    assert_ne!(translated, "Hello");
    assert_eq!(translated, "Bonjour");
}

#[tokio::test]
async fn translate_page_produces_text_and_audio() {
    let catalog = catalog();
    let spoken = pages::translate::submit(
        &StubTranslator,
        &StubSynthesizer,
        &catalog,
        "Hello",
        "french",
    )
    .await
    .unwrap();
    assert_eq!(spoken.text, "Bonjour");
    assert_eq!(spoken.audio_mp3, b"Bonjour".to_vec());
}

#[test]
fn practice_page_matches_trimmed_lowercase_substring() {
    let catalog = catalog();
    let report = pages::practice::submit(
        &StubRecognizer,
        &catalog,
        "Hello",
        &wav_upload(),
        "english",
    )
    .unwrap();
    assert_eq!(report.recognized, "  hello there");
    assert!(report.matched);

    let report = pages::practice::submit(
        &StubRecognizer,
        &catalog,
        "Hello World",
        &wav_upload(),
        "english",
    )
    .unwrap();
    assert!(!report.matched);
}

#[test]
fn website_page_builds_the_exact_proxy_link() {
    let catalog = catalog();
    let link = pages::website::build_link(&catalog, "test.com", "spanish").unwrap();
    assert_eq!(
        link,
        "https://translate.google.com/translate?sl=auto&tl=es&u=http://test.com"
    );
}

#[test]
fn navigation_covers_every_page_and_returns_home() {
    let mut session = Session::new();
    assert_eq!(session.current_page(), Page::Home);
    for page in [Page::Ocr, Page::Translate, Page::Practice, Page::Website] {
        session = session.navigate(page);
        assert_eq!(session.current_page(), page);
        session = session.navigate(Page::Home);
        assert_eq!(session.current_page(), Page::Home);
    }
}
