use anyhow::{Context, Result};

pub mod catalog;
pub mod data;
pub mod error;
pub mod logging;
pub mod pages;
pub mod server;
pub mod services;
pub mod session;
pub mod settings;

pub use error::ServiceError;

use catalog::LanguageCatalog;
use services::{GoogleSpeech, GoogleTranslate, TesseractOcr, WhisperRecognizer};
use settings::Settings;

/// The production collaborator set plus the catalog built from it. Every
/// surface (interactive loop, HTTP server) starts from one of these.
pub struct AppServices {
    pub catalog: LanguageCatalog,
    pub translator: GoogleTranslate,
    pub synthesizer: GoogleSpeech,
    pub ocr: TesseractOcr,
    pub recognizer: WhisperRecognizer,
}

/// Builds the collaborators and loads the language catalog. Catalog load
/// failure propagates: without it no page can render.
pub fn bootstrap(settings: &Settings) -> Result<AppServices> {
    let translator =
        GoogleTranslate::new(settings).context("failed to build translation client")?;
    let catalog =
        LanguageCatalog::load(&translator).context("failed to load language catalog")?;
    let synthesizer =
        GoogleSpeech::new(settings).context("failed to build speech synthesis client")?;
    let ocr = TesseractOcr::new(settings);
    let recognizer = WhisperRecognizer::new(settings);

    Ok(AppServices {
        catalog,
        translator,
        synthesizer,
        ocr,
        recognizer,
    })
}
