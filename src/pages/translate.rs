use crate::catalog::LanguageCatalog;
use crate::error::ServiceError;
use crate::services::{SpeechSynthesizer, Translator};

/// Result of one text-translation submission: the translated text and the
/// synthesized MP3 of it. Surfaces stream the audio through a scoped temp
/// resource released after the render cycle.
#[derive(Debug, Clone)]
pub struct SpokenTranslation {
    pub text: String,
    pub audio_mp3: Vec<u8>,
}

/// One submission: translate, then synthesize the translation. A failure in
/// either step aborts the submission with a single error; in particular a
/// translation failure never reaches the synthesizer.
pub async fn submit<T, S>(
    translator: &T,
    synthesizer: &S,
    catalog: &LanguageCatalog,
    text: &str,
    language_name: &str,
) -> Result<SpokenTranslation, ServiceError>
where
    T: Translator + ?Sized,
    S: SpeechSynthesizer + ?Sized,
{
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::unsupported("text is empty"));
    }
    let code = catalog.resolve_code(language_name)?;

    let translated = translator
        .translate(trimmed.to_string(), code.to_string())
        .await?;
    let audio_mp3 = synthesizer
        .synthesize(translated.clone(), code.to_string())
        .await?;

    Ok(SpokenTranslation {
        text: translated,
        audio_mp3,
    })
}
