use crate::catalog::LanguageCatalog;
use crate::data::ImageUpload;
use crate::error::ServiceError;
use crate::services::{TextRecognizer, Translator};

/// Runs OCR over the upload. An image with no readable text yields an empty
/// string; that is a normal outcome and keeps the translate action hidden.
pub fn extract_text<O>(ocr: &O, image: &ImageUpload) -> Result<String, ServiceError>
where
    O: TextRecognizer + ?Sized,
{
    let text = ocr.extract_text(image)?;
    Ok(text.trim().to_string())
}

/// Translates previously extracted text. The action is gated on non-empty
/// text; an empty submission is refused rather than sent to the service.
pub async fn translate_extracted<T>(
    translator: &T,
    catalog: &LanguageCatalog,
    text: &str,
    language_name: &str,
) -> Result<String, ServiceError>
where
    T: Translator + ?Sized,
{
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::unsupported("no extracted text to translate"));
    }
    let code = catalog.resolve_code(language_name)?;
    translator
        .translate(trimmed.to_string(), code.to_string())
        .await
}
