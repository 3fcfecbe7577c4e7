use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub(crate) struct SessionQuery {
    pub(crate) session: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SessionResponse {
    pub(crate) session: String,
    pub(crate) page: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NavigateRequest {
    pub(crate) session: Option<String>,
    pub(crate) page: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct LanguageOption {
    pub(crate) name: String,
    pub(crate) code: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OcrRequest {
    pub(crate) image_base64: String,
    pub(crate) image_name: Option<String>,
    pub(crate) lang: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct OcrResponse {
    pub(crate) text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) translated: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TranslateRequest {
    pub(crate) text: String,
    pub(crate) lang: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct TranslateResponse {
    pub(crate) translated: String,
    pub(crate) audio_base64: String,
    pub(crate) audio_mime: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PracticeRequest {
    pub(crate) phrase: String,
    pub(crate) audio_base64: String,
    pub(crate) audio_name: Option<String>,
    pub(crate) lang: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct PracticeResponse {
    pub(crate) recognized: String,
    pub(crate) matched: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WebsiteRequest {
    pub(crate) url: String,
    pub(crate) lang: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct WebsiteResponse {
    pub(crate) link: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ErrorResponse {
    pub(crate) error: String,
}
