use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;

use crate::data::{AudioUpload, ImageUpload};
use crate::error::ServiceError;

mod ocr;
mod stt;
mod translate;
mod tts;

pub use ocr::TesseractOcr;
pub use stt::WhisperRecognizer;
pub use translate::GoogleTranslate;
pub use tts::GoogleSpeech;

pub type ServiceFuture<T> = Pin<Box<dyn Future<Output = Result<T, ServiceError>> + Send>>;

/// Extracts text from an uploaded image. Best effort: an image with no
/// readable text yields an empty string, not an error.
pub trait TextRecognizer: Send + Sync {
    fn extract_text(&self, image: &ImageUpload) -> Result<String, ServiceError>;
}

/// Translates text into a target language and knows which languages the
/// backing service supports. The supported-language table is the source of
/// the application-wide catalog.
pub trait Translator: Send + Sync {
    fn supported_languages(&self) -> Result<BTreeMap<String, String>, ServiceError>;
    fn translate(&self, text: String, target_code: String) -> ServiceFuture<String>;
}

/// Synthesizes speech for a piece of text, returning MP3 bytes.
pub trait SpeechSynthesizer: Send + Sync {
    fn synthesize(&self, text: String, language_code: String) -> ServiceFuture<Vec<u8>>;
}

/// Transcribes an uploaded audio clip spoken in the given language.
pub trait SpeechRecognizer: Send + Sync {
    fn transcribe(&self, audio: &AudioUpload, language_code: &str) -> Result<String, ServiceError>;
}
