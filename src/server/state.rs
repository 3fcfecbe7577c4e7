use std::collections::HashMap;
use std::sync::Mutex;

use crate::catalog::LanguageCatalog;
use crate::services::{GoogleSpeech, GoogleTranslate, TesseractOcr, WhisperRecognizer};
use crate::session::{Page, Session};

pub(crate) struct ServerState {
    pub(crate) catalog: LanguageCatalog,
    pub(crate) translator: GoogleTranslate,
    pub(crate) synthesizer: GoogleSpeech,
    pub(crate) ocr: TesseractOcr,
    pub(crate) recognizer: WhisperRecognizer,
    sessions: Mutex<HashMap<String, Session>>,
}

impl ServerState {
    pub(crate) fn new(services: crate::AppServices) -> Self {
        ServerState {
            catalog: services.catalog,
            translator: services.translator,
            synthesizer: services.synthesizer,
            ocr: services.ocr,
            recognizer: services.recognizer,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) fn current_page(&self, session_id: &str) -> Page {
        let sessions = self.sessions.lock().expect("session map poisoned");
        sessions
            .get(session_id)
            .copied()
            .unwrap_or_default()
            .current_page()
    }

    pub(crate) fn navigate(&self, session_id: &str, page: Page) -> Page {
        let mut sessions = self.sessions.lock().expect("session map poisoned");
        let session = sessions
            .entry(session_id.to_string())
            .or_insert_with(Session::new);
        *session = session.navigate(page);
        session.current_page()
    }
}
