use std::io::ErrorKind;
use std::process::Command;
use tracing::debug;

use super::TextRecognizer;
use crate::data::ImageUpload;
use crate::error::ServiceError;
use crate::settings::Settings;

/// OCR through the tesseract CLI: the upload is decoded, re-encoded as PNG
/// into a scoped temp directory and handed to the engine, whose stdout is
/// the extracted text.
#[derive(Debug, Clone)]
pub struct TesseractOcr {
    command: String,
    languages: Option<String>,
}

impl TesseractOcr {
    pub fn new(settings: &Settings) -> Self {
        TesseractOcr {
            command: settings.tesseract_command.clone(),
            languages: settings.ocr_languages.clone(),
        }
    }
}

impl TextRecognizer for TesseractOcr {
    fn extract_text(&self, image: &ImageUpload) -> Result<String, ServiceError> {
        let decoded = image::load_from_memory(&image.bytes).map_err(|err| {
            ServiceError::unsupported(format!("cannot decode image: {}", err))
        })?;

        let dir = tempfile::tempdir().map_err(|err| ServiceError::unavailable("ocr", err))?;
        let input_path = dir.path().join("input.png");
        decoded
            .save_with_format(&input_path, image::ImageFormat::Png)
            .map_err(|err| ServiceError::unavailable("ocr", err))?;

        let mut command = Command::new(&self.command);
        command.arg(&input_path).arg("stdout");
        if let Some(languages) = self.languages.as_deref() {
            command.arg("-l").arg(languages);
        }

        debug!("running {} on {}", self.command, input_path.display());
        let output = command.output().map_err(|err| {
            if err.kind() == ErrorKind::NotFound {
                ServiceError::unavailable(
                    "ocr",
                    format!("'{}' not found (install tesseract)", self.command),
                )
            } else {
                ServiceError::unavailable("ocr", err)
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ServiceError::RecognitionFailed(format!(
                "tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout);
        Ok(text.trim().to_string())
    }
}
