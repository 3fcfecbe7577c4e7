use crate::catalog::LanguageCatalog;
use crate::data::AudioUpload;
use crate::error::ServiceError;
use crate::services::SpeechRecognizer;

/// Result of one pronunciation attempt. The recognized text is always
/// reported; a non-match is a normal outcome, never an error.
#[derive(Debug, Clone)]
pub struct PracticeReport {
    pub recognized: String,
    pub matched: bool,
}

/// One attempt: transcribe the clip in the selected spoken language and
/// compare against the expected phrase.
pub fn submit<R>(
    recognizer: &R,
    catalog: &LanguageCatalog,
    expected: &str,
    audio: &AudioUpload,
    language_name: &str,
) -> Result<PracticeReport, ServiceError>
where
    R: SpeechRecognizer + ?Sized,
{
    if expected.trim().is_empty() {
        return Err(ServiceError::unsupported("expected phrase is empty"));
    }
    let code = catalog.resolve_code(language_name)?;
    let recognized = recognizer.transcribe(audio, code)?;
    let matched = phrase_matches(expected, &recognized);
    Ok(PracticeReport {
        recognized,
        matched,
    })
}

/// Case-insensitive, whitespace-trimmed substring containment of the
/// expected phrase within the transcription.
pub fn phrase_matches(expected: &str, recognized: &str) -> bool {
    let needle = expected.trim().to_lowercase();
    if needle.is_empty() {
        return false;
    }
    recognized.to_lowercase().contains(&needle)
}
