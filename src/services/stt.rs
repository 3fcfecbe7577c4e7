use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use super::SpeechRecognizer;
use crate::catalog::map_code_for_whisper;
use crate::data::AudioUpload;
use crate::error::ServiceError;
use crate::settings::Settings;

const MODEL_ENV_VAR: &str = "NOVA_TRANSLATE_WHISPER_MODEL";
const DEFAULT_MODEL: &str = "base";

/// Speech recognition through whisper.cpp. The uploaded clip is persisted
/// into a scoped temp directory (released on every exit path), decoded to
/// 16 kHz mono WAV with ffmpeg, and transcribed with the spoken-language
/// hint mapped to a whisper code.
#[derive(Debug, Clone)]
pub struct WhisperRecognizer {
    model: Option<String>,
}

impl WhisperRecognizer {
    pub fn new(settings: &Settings) -> Self {
        WhisperRecognizer {
            model: settings.whisper_model.clone(),
        }
    }

    fn resolve_model_path(&self) -> Result<PathBuf, ServiceError> {
        let configured = self
            .model
            .clone()
            .or_else(|| std::env::var(MODEL_ENV_VAR).ok())
            .filter(|value| !value.trim().is_empty());

        let path = match configured {
            Some(value) => {
                let trimmed = value.trim().to_string();
                let as_path = PathBuf::from(&trimmed);
                if as_path.exists() {
                    return Ok(as_path);
                }
                if trimmed.contains(std::path::MAIN_SEPARATOR) {
                    // An explicit path that is not there; do not fall back.
                    as_path
                } else {
                    default_model_path(&trimmed)
                }
            }
            None => default_model_path(DEFAULT_MODEL),
        };

        if path.exists() {
            return Ok(path);
        }
        Err(ServiceError::unavailable(
            "speech recognition",
            format!(
                "whisper model not found at {} (fetch a ggml model from huggingface.co/ggerganov/whisper.cpp, or set [whisper] model in settings)",
                path.display()
            ),
        ))
    }
}

impl SpeechRecognizer for WhisperRecognizer {
    fn transcribe(&self, audio: &AudioUpload, language_code: &str) -> Result<String, ServiceError> {
        let model_path = self.resolve_model_path()?;

        let dir = tempfile::tempdir()
            .map_err(|err| ServiceError::unavailable("speech recognition", err))?;
        let input_path = dir.path().join(format!("input.{}", audio.extension()));
        std::fs::write(&input_path, &audio.bytes)
            .map_err(|err| ServiceError::unavailable("speech recognition", err))?;

        let wav_path = dir.path().join("input.wav");
        run_ffmpeg(&[
            "-y",
            "-i",
            input_path.to_string_lossy().as_ref(),
            "-ar",
            "16000",
            "-ac",
            "1",
            wav_path.to_string_lossy().as_ref(),
        ])?;

        let samples = read_wav_mono_f32(&wav_path)?;
        let transcript = run_whisper(&model_path, &samples, language_code)?;
        if transcript.trim().is_empty() {
            return Err(ServiceError::RecognitionFailed(
                "no speech detected in audio".to_string(),
            ));
        }
        info!("transcribed {} chars", transcript.chars().count());
        Ok(transcript)
    }
}

fn default_model_path(model: &str) -> PathBuf {
    let file = format!("ggml-{}.bin", model.trim_start_matches("ggml-").trim_end_matches(".bin"));
    match std::env::var("HOME") {
        Ok(home) if !home.trim().is_empty() => Path::new(home.trim())
            .join(".nova-translate/models")
            .join(file),
        _ => Path::new(".nova-translate/models").join(file),
    }
}

fn run_ffmpeg(args: &[&str]) -> Result<(), ServiceError> {
    let output = Command::new("ffmpeg").args(args).output().map_err(|err| {
        if err.kind() == ErrorKind::NotFound {
            ServiceError::unavailable("speech recognition", "ffmpeg not found (install ffmpeg)")
        } else {
            ServiceError::unavailable("speech recognition", err)
        }
    })?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ServiceError::unsupported(format!(
            "could not decode audio: {}",
            last_line(&stderr)
        )));
    }
    Ok(())
}

fn last_line(text: &str) -> &str {
    text.lines().rev().find(|line| !line.trim().is_empty()).unwrap_or("").trim()
}

fn run_whisper(
    model_path: &Path,
    samples: &[f32],
    language_code: &str,
) -> Result<String, ServiceError> {
    let model = model_path.to_string_lossy();
    let ctx = WhisperContext::new_with_params(model.as_ref(), WhisperContextParameters::default())
        .map_err(|err| {
            ServiceError::unavailable("speech recognition", format!("failed to load whisper model: {}", err))
        })?;
    let mut state = ctx
        .create_state()
        .map_err(|err| ServiceError::RecognitionFailed(err.to_string()))?;

    let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
    params.set_n_threads(num_cpus::get() as i32);
    params.set_translate(false);
    let whisper_lang = map_code_for_whisper(language_code);
    match whisper_lang.as_deref() {
        Some(lang) => params.set_language(Some(lang)),
        None => params.set_detect_language(true),
    }
    debug!(
        "whisper: {} samples, language {}",
        samples.len(),
        whisper_lang.as_deref().unwrap_or("auto")
    );

    state
        .full(params, samples)
        .map_err(|err| ServiceError::RecognitionFailed(err.to_string()))?;

    let num_segments = state
        .full_n_segments()
        .map_err(|err| ServiceError::RecognitionFailed(err.to_string()))?;
    let mut parts = Vec::new();
    for idx in 0..num_segments {
        let text = state
            .full_get_segment_text(idx)
            .map_err(|err| ServiceError::RecognitionFailed(err.to_string()))?;
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            parts.push(trimmed.to_string());
        }
    }
    Ok(parts.join(" "))
}

fn read_wav_mono_f32(path: &Path) -> Result<Vec<f32>, ServiceError> {
    let mut reader = hound::WavReader::open(path)
        .map_err(|err| ServiceError::unsupported(format!("cannot read decoded wav: {}", err)))?;
    let spec = reader.spec();
    let channels = spec.channels as usize;
    if channels == 0 {
        return Err(ServiceError::unsupported("wav has no channels"));
    }

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader.samples::<f32>().map(|s| s.unwrap_or(0.0)).collect(),
        hound::SampleFormat::Int => {
            let bits = spec.bits_per_sample;
            let max = (1i64 << (bits - 1)) as f32;
            if bits <= 16 {
                reader
                    .samples::<i16>()
                    .map(|s| s.unwrap_or(0) as f32 / max)
                    .collect()
            } else {
                reader
                    .samples::<i32>()
                    .map(|s| s.unwrap_or(0) as f32 / max)
                    .collect()
            }
        }
    };

    if channels == 1 {
        return Ok(samples);
    }

    let mut mono = Vec::with_capacity(samples.len() / channels);
    for chunk in samples.chunks(channels) {
        let sum: f32 = chunk.iter().sum();
        mono.push(sum / channels as f32);
    }
    Ok(mono)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_wav_averages_stereo_to_mono() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 16000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for (left, right) in [(8192i16, 8192i16), (-8192, 8192), (0, 0)] {
            writer.write_sample(left).unwrap();
            writer.write_sample(right).unwrap();
        }
        writer.finalize().unwrap();

        let samples = read_wav_mono_f32(&path).unwrap();
        assert_eq!(samples.len(), 3);
        assert!((samples[0] - 0.25).abs() < 1e-3);
        assert!(samples[1].abs() < 1e-3);
        assert!(samples[2].abs() < 1e-6);
    }

    #[test]
    fn read_wav_rejects_non_wav_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not-audio.wav");
        std::fs::write(&path, b"definitely not audio").unwrap();
        let err = read_wav_mono_f32(&path).unwrap_err();
        assert!(matches!(err, ServiceError::UnsupportedInput(_)));
    }

    #[test]
    fn missing_model_is_service_unavailable() {
        let settings = Settings {
            whisper_model: Some("/no/such/model.bin".to_string()),
            ..Settings::default()
        };
        let recognizer = WhisperRecognizer::new(&settings);
        let err = recognizer.resolve_model_path().unwrap_err();
        assert!(matches!(err, ServiceError::ServiceUnavailable { .. }));
    }

    #[test]
    fn last_line_picks_the_final_nonempty_line() {
        assert_eq!(last_line("first\nsecond\n\n"), "second");
        assert_eq!(last_line(""), "");
    }
}
