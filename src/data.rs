use crate::error::ServiceError;
use std::path::Path;

pub const PNG_MIME: &str = "image/png";
pub const JPEG_MIME: &str = "image/jpeg";
pub const WAV_MIME: &str = "audio/wav";
pub const MP3_MIME: &str = "audio/mpeg";

/// An image submitted to the OCR page. Construction sniffs the magic number
/// and rejects anything that is not PNG or JPEG.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub mime: String,
    pub name: Option<String>,
}

impl ImageUpload {
    pub fn from_bytes(bytes: Vec<u8>, name: Option<String>) -> Result<Self, ServiceError> {
        let mime = sniff_image_mime(&bytes)?;
        Ok(ImageUpload {
            bytes,
            mime: mime.to_string(),
            name,
        })
    }

    pub fn from_path(path: &Path) -> Result<Self, ServiceError> {
        let bytes = std::fs::read(path).map_err(|err| {
            ServiceError::unsupported(format!("failed to read {}: {}", path.display(), err))
        })?;
        Self::from_bytes(bytes, file_name(path))
    }
}

/// An audio clip submitted to the pronunciation page, constrained to WAV or
/// MP3 containers.
#[derive(Debug, Clone)]
pub struct AudioUpload {
    pub bytes: Vec<u8>,
    pub mime: String,
    pub name: Option<String>,
}

impl AudioUpload {
    pub fn from_bytes(bytes: Vec<u8>, name: Option<String>) -> Result<Self, ServiceError> {
        let mime = sniff_audio_mime(&bytes)?;
        Ok(AudioUpload {
            bytes,
            mime: mime.to_string(),
            name,
        })
    }

    pub fn from_path(path: &Path) -> Result<Self, ServiceError> {
        let bytes = std::fs::read(path).map_err(|err| {
            ServiceError::unsupported(format!("failed to read {}: {}", path.display(), err))
        })?;
        Self::from_bytes(bytes, file_name(path))
    }

    /// File extension matching the container, used when handing the clip to
    /// decoders that key off the suffix.
    pub fn extension(&self) -> &'static str {
        if self.mime == WAV_MIME { "wav" } else { "mp3" }
    }
}

fn sniff_image_mime(bytes: &[u8]) -> Result<&'static str, ServiceError> {
    match infer::get(bytes).map(|kind| kind.mime_type()) {
        Some("image/png") => Ok(PNG_MIME),
        Some("image/jpeg") => Ok(JPEG_MIME),
        Some(other) => Err(ServiceError::unsupported(format!(
            "expected a PNG or JPEG image (detected '{}')",
            other
        ))),
        None => Err(ServiceError::unsupported(
            "expected a PNG or JPEG image (unrecognized data)",
        )),
    }
}

fn sniff_audio_mime(bytes: &[u8]) -> Result<&'static str, ServiceError> {
    match infer::get(bytes).map(|kind| kind.mime_type()) {
        Some("audio/wav" | "audio/x-wav") => Ok(WAV_MIME),
        Some("audio/mpeg") => Ok(MP3_MIME),
        Some(other) => Err(ServiceError::unsupported(format!(
            "expected a WAV or MP3 clip (detected '{}')",
            other
        ))),
        None => Err(ServiceError::unsupported(
            "expected a WAV or MP3 clip (unrecognized data)",
        )),
    }
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|value| value.to_str())
        .map(|value| value.to_string())
}
