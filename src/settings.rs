use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_SETTINGS_TOML: &str = include_str!("../settings.toml");

#[derive(Debug, Clone)]
pub struct Settings {
    pub http_timeout_secs: u64,
    pub translate_endpoint: String,
    pub tts_endpoint: String,
    pub tesseract_command: String,
    pub ocr_languages: Option<String>,
    pub whisper_model: Option<String>,
    pub audio_player: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            http_timeout_secs: 30,
            translate_endpoint: "https://translate.googleapis.com/translate_a/single".to_string(),
            tts_endpoint: "https://translate.google.com/translate_tts".to_string(),
            tesseract_command: "tesseract".to_string(),
            ocr_languages: None,
            whisper_model: None,
            audio_player: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    http: Option<HttpSettings>,
    translate: Option<TranslateSettings>,
    tts: Option<TtsSettings>,
    ocr: Option<OcrSettings>,
    whisper: Option<WhisperSettings>,
    audio: Option<AudioSettings>,
}

#[derive(Debug, Default, Deserialize)]
struct HttpSettings {
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct TranslateSettings {
    endpoint: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct TtsSettings {
    endpoint: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct OcrSettings {
    command: Option<String>,
    languages: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct WhisperSettings {
    model: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct AudioSettings {
    player: Option<String>,
}

/// Loads layered settings: project files first, then the home directory,
/// then an explicit extra file; later files win per field.
pub fn load_settings(extra_path: Option<&Path>) -> Result<Settings> {
    let mut settings = Settings::default();
    ensure_home_settings_file()?;

    let mut ordered_paths = Vec::new();
    ordered_paths.push(PathBuf::from("settings.toml"));
    ordered_paths.push(PathBuf::from("settings.local.toml"));

    if let Some(home) = home_dir() {
        ordered_paths.push(home.join("settings.toml"));
        ordered_paths.push(home.join("settings.local.toml"));
    }

    if let Some(extra) = extra_path {
        if !extra.exists() {
            return Err(anyhow!("settings file not found: {}", extra.display()));
        }
        ordered_paths.push(extra.to_path_buf());
    }

    for path in ordered_paths {
        if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("failed to read settings: {}", path.display()))?;
            let parsed: SettingsFile = toml::from_str(&content)
                .with_context(|| format!("failed to parse settings: {}", path.display()))?;
            settings.merge(parsed);
        }
    }

    Ok(settings)
}

impl Settings {
    fn merge(&mut self, incoming: SettingsFile) {
        if let Some(http) = incoming.http {
            if let Some(timeout) = http.timeout_secs {
                if timeout > 0 {
                    self.http_timeout_secs = timeout;
                }
            }
        }
        if let Some(translate) = incoming.translate {
            if let Some(endpoint) = translate.endpoint {
                if !endpoint.trim().is_empty() {
                    self.translate_endpoint = endpoint;
                }
            }
        }
        if let Some(tts) = incoming.tts {
            if let Some(endpoint) = tts.endpoint {
                if !endpoint.trim().is_empty() {
                    self.tts_endpoint = endpoint;
                }
            }
        }
        if let Some(ocr) = incoming.ocr {
            if let Some(command) = ocr.command {
                if !command.trim().is_empty() {
                    self.tesseract_command = command;
                }
            }
            if let Some(languages) = ocr.languages {
                if !languages.trim().is_empty() {
                    self.ocr_languages = Some(languages);
                }
            }
        }
        if let Some(whisper) = incoming.whisper {
            if let Some(model) = whisper.model {
                if !model.trim().is_empty() {
                    self.whisper_model = Some(model);
                }
            }
        }
        if let Some(audio) = incoming.audio {
            if let Some(player) = audio.player {
                if !player.trim().is_empty() {
                    self.audio_player = Some(player);
                }
            }
        }
    }
}

fn ensure_home_settings_file() -> Result<()> {
    let Some(home) = home_dir() else {
        return Ok(());
    };
    fs::create_dir_all(&home)
        .with_context(|| format!("failed to create settings directory: {}", home.display()))?;
    let path = home.join("settings.toml");
    if !path.exists() {
        fs::write(&path, DEFAULT_SETTINGS_TOML)
            .with_context(|| format!("failed to write settings: {}", path.display()))?;
    }
    Ok(())
}

fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME").ok().and_then(|home| {
        let home = home.trim();
        if home.is_empty() {
            None
        } else {
            Some(Path::new(home).join(".nova-translate"))
        }
    })
}
