use anyhow::{Context, Result};
use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, HeaderValue, Method, Request, Response, StatusCode};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use std::sync::Arc;
use tracing::info;

use super::models::{
    ErrorResponse, LanguageOption, NavigateRequest, OcrRequest, OcrResponse, PracticeRequest,
    PracticeResponse, SessionQuery, SessionResponse, TranslateRequest, TranslateResponse,
    WebsiteRequest, WebsiteResponse,
};
use super::state::ServerState;
use crate::data::{AudioUpload, ImageUpload, MP3_MIME};
use crate::error::ServiceError;
use crate::pages;
use crate::session::Page;
use crate::settings::Settings;

type ApiError = (StatusCode, Json<ErrorResponse>);

pub async fn run_server(settings: Settings, addr: String) -> Result<()> {
    let services = crate::bootstrap(&settings)?;
    let state = Arc::new(ServerState::new(services));
    let app = Router::new()
        .route("/health", get(health))
        .route("/languages", get(languages))
        .route("/session", get(session))
        .route("/navigate", post(navigate))
        .route("/ocr", post(ocr))
        .route("/translate", post(translate))
        .route("/practice", post(practice))
        .route("/website", post(website))
        .with_state(state)
        .layer(axum::middleware::from_fn(cors_middleware));
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| "failed to bind server address")?;
    info!("listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}

async fn cors_middleware(req: Request<Body>, next: Next) -> Result<Response<Body>, StatusCode> {
    if req.method() == Method::OPTIONS {
        let mut response = Response::new(Body::empty());
        *response.status_mut() = StatusCode::NO_CONTENT;
        apply_cors_headers(response.headers_mut());
        return Ok(response);
    }
    let mut response = next.run(req).await;
    apply_cors_headers(response.headers_mut());
    Ok(response)
}

fn apply_cors_headers(headers: &mut HeaderMap) {
    headers.insert("access-control-allow-origin", HeaderValue::from_static("*"));
    headers.insert(
        "access-control-allow-methods",
        HeaderValue::from_static("GET,POST,OPTIONS"),
    );
    headers.insert(
        "access-control-allow-headers",
        HeaderValue::from_static("content-type"),
    );
}

fn error_response(err: ServiceError) -> ApiError {
    let status = match err {
        ServiceError::UnsupportedInput(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::BAD_GATEWAY,
    };
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

fn bad_request(message: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

fn internal(message: impl Into<String>) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

fn decode_base64(payload: &str) -> Result<Vec<u8>, ApiError> {
    BASE64
        .decode(payload.trim())
        .map_err(|err| bad_request(format!("invalid base64 payload: {}", err)))
}

fn session_id(requested: Option<String>) -> String {
    requested
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| "default".to_string())
}

async fn languages(State(state): State<Arc<ServerState>>) -> Json<Vec<LanguageOption>> {
    let options = state
        .catalog
        .names()
        .filter_map(|name| {
            state.catalog.resolve_code(name).ok().map(|code| LanguageOption {
                name: name.to_string(),
                code: code.to_string(),
            })
        })
        .collect();
    Json(options)
}

async fn session(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<SessionQuery>,
) -> Json<SessionResponse> {
    let id = session_id(query.session);
    let page = state.current_page(&id);
    Json(SessionResponse {
        session: id,
        page: page.to_string(),
    })
}

async fn navigate(
    State(state): State<Arc<ServerState>>,
    Json(payload): Json<NavigateRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let page: Page = payload.page.parse().map_err(|err: String| bad_request(err))?;
    let id = session_id(payload.session);
    let page = state.navigate(&id, page);
    Ok(Json(SessionResponse {
        session: id,
        page: page.to_string(),
    }))
}

async fn ocr(
    State(state): State<Arc<ServerState>>,
    Json(payload): Json<OcrRequest>,
) -> Result<Json<OcrResponse>, ApiError> {
    let bytes = decode_base64(&payload.image_base64)?;
    let upload = ImageUpload::from_bytes(bytes, payload.image_name).map_err(error_response)?;

    let engine = state.ocr.clone();
    let text = tokio::task::spawn_blocking(move || pages::ocr::extract_text(&engine, &upload))
        .await
        .map_err(|err| internal(format!("ocr task failed: {}", err)))?
        .map_err(error_response)?;

    // The translate action only fires once there is text to translate.
    let translated = match payload.lang {
        Some(lang) if !text.is_empty() => Some(
            pages::ocr::translate_extracted(&state.translator, &state.catalog, &text, &lang)
                .await
                .map_err(error_response)?,
        ),
        _ => None,
    };

    Ok(Json(OcrResponse { text, translated }))
}

async fn translate(
    State(state): State<Arc<ServerState>>,
    Json(payload): Json<TranslateRequest>,
) -> Result<Json<TranslateResponse>, ApiError> {
    let spoken = pages::translate::submit(
        &state.translator,
        &state.synthesizer,
        &state.catalog,
        &payload.text,
        &payload.lang,
    )
    .await
    .map_err(error_response)?;

    Ok(Json(TranslateResponse {
        translated: spoken.text,
        audio_base64: BASE64.encode(&spoken.audio_mp3),
        audio_mime: MP3_MIME.to_string(),
    }))
}

async fn practice(
    State(state): State<Arc<ServerState>>,
    Json(payload): Json<PracticeRequest>,
) -> Result<Json<PracticeResponse>, ApiError> {
    let bytes = decode_base64(&payload.audio_base64)?;
    let upload = AudioUpload::from_bytes(bytes, payload.audio_name).map_err(error_response)?;

    let recognizer = state.recognizer.clone();
    let catalog = state.catalog.clone();
    let phrase = payload.phrase.clone();
    let lang = payload.lang.clone();
    let report = tokio::task::spawn_blocking(move || {
        pages::practice::submit(&recognizer, &catalog, &phrase, &upload, &lang)
    })
    .await
    .map_err(|err| internal(format!("recognition task failed: {}", err)))?
    .map_err(error_response)?;

    Ok(Json(PracticeResponse {
        recognized: report.recognized,
        matched: report.matched,
    }))
}

async fn website(
    State(state): State<Arc<ServerState>>,
    Json(payload): Json<WebsiteRequest>,
) -> Result<Json<WebsiteResponse>, ApiError> {
    let link = pages::website::build_link(&state.catalog, &payload.url, &payload.lang)
        .map_err(error_response)?;
    Ok(Json(WebsiteResponse { link }))
}
