use std::io::{self, Write};
use std::path::Path;

use anyhow::Result;
use clap::Parser;

use nova_translate::catalog::LanguageCatalog;
use nova_translate::data::{AudioUpload, ImageUpload};
use nova_translate::pages;
use nova_translate::session::{Page, Session};
use nova_translate::settings::{self, Settings};
use nova_translate::{AppServices, bootstrap};

#[derive(Parser, Debug)]
#[command(
    name = "nova-translate",
    version,
    about = "OCR, translation, pronunciation practice, and website translation links"
)]
struct Cli {
    /// Run the HTTP server instead of the interactive loop
    #[arg(long = "serve")]
    serve: bool,

    /// Address to bind in server mode
    #[arg(long = "addr", default_value = "127.0.0.1:8787")]
    addr: String,

    /// Read extra settings from a local TOML file
    #[arg(short = 'r', long = "read-settings")]
    read_settings: Option<String>,

    /// Enable verbose logging
    #[arg(long = "verbose")]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    nova_translate::logging::init(cli.verbose)?;
    let settings = settings::load_settings(cli.read_settings.as_deref().map(Path::new))?;

    if cli.serve {
        return nova_translate::server::run_server(settings, cli.addr).await;
    }
    run_interactive(settings).await
}

/// One loop iteration is one render cycle of the active page: read the
/// page's inputs, invoke its handler on submit, print the result or the
/// error inline, then follow the navigation the user asked for.
async fn run_interactive(settings: Settings) -> Result<()> {
    let services = bootstrap(&settings)?;
    println!("Nova Translate: smart assistant for OCR, translation, pronunciation, and websites.");
    println!(
        "{} languages available. Type 'back' on any page to return home.",
        services.catalog.len()
    );

    let mut session = Session::new();
    loop {
        let next = match session.current_page() {
            Page::Home => render_home()?,
            Page::Ocr => render_ocr(&services).await?,
            Page::Translate => render_translate(&services, &settings).await?,
            Page::Practice => render_practice(&services)?,
            Page::Website => render_website(&services)?,
        };
        match next {
            Some(page) => session = session.navigate(page),
            None => break,
        }
    }
    Ok(())
}

enum Input {
    Value(String),
    Back,
    Eof,
}

fn read_line(label: &str) -> Result<Option<String>> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn read_input(label: &str) -> Result<Input> {
    loop {
        let Some(line) = read_line(label)? else {
            return Ok(Input::Eof);
        };
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("back") {
            return Ok(Input::Back);
        }
        return Ok(Input::Value(line));
    }
}

fn ask_language(catalog: &LanguageCatalog, label: &str) -> Result<Input> {
    loop {
        match read_input(label)? {
            Input::Value(value) if value.eq_ignore_ascii_case("languages") => {
                let names: Vec<&str> = catalog.names().collect();
                println!("{}", names.join(", "));
            }
            other => return Ok(other),
        }
    }
}

fn render_home() -> Result<Option<Page>> {
    println!();
    println!("Home");
    println!("  1) image text translate");
    println!("  2) text translation");
    println!("  3) pronunciation practice");
    println!("  4) translate website");
    println!("  q) quit");
    loop {
        let Some(choice) = read_line("> ")? else {
            return Ok(None);
        };
        match choice.to_lowercase().as_str() {
            "1" | "ocr" => return Ok(Some(Page::Ocr)),
            "2" | "translate" => return Ok(Some(Page::Translate)),
            "3" | "practice" => return Ok(Some(Page::Practice)),
            "4" | "website" => return Ok(Some(Page::Website)),
            "q" | "quit" | "exit" => return Ok(None),
            "" => continue,
            other => println!("unknown choice: {}", other),
        }
    }
}

async fn render_ocr(services: &AppServices) -> Result<Option<Page>> {
    println!();
    println!("Image Text Scanner & Translator ('back' to return home)");
    let path = match read_input("image path (png/jpeg)> ")? {
        Input::Eof => return Ok(None),
        Input::Back => return Ok(Some(Page::Home)),
        Input::Value(value) => value,
    };

    let upload = match ImageUpload::from_path(Path::new(&path)) {
        Ok(upload) => upload,
        Err(err) => {
            println!("{}", err);
            return Ok(Some(Page::Ocr));
        }
    };
    println!("uploaded {} ({} bytes)", upload.mime, upload.bytes.len());

    let text = match pages::ocr::extract_text(&services.ocr, &upload) {
        Ok(text) => text,
        Err(err) => {
            println!("{}", err);
            return Ok(Some(Page::Ocr));
        }
    };
    if text.is_empty() {
        println!("no text found in image");
        return Ok(Some(Page::Ocr));
    }
    println!("extracted text:");
    println!("{}", text);

    match ask_language(&services.catalog, "translate to ('languages' to list)> ")? {
        Input::Eof => Ok(None),
        Input::Back => Ok(Some(Page::Home)),
        Input::Value(lang) => {
            match pages::ocr::translate_extracted(
                &services.translator,
                &services.catalog,
                &text,
                &lang,
            )
            .await
            {
                Ok(translated) => {
                    println!("translation:");
                    println!("{}", translated);
                }
                Err(err) => println!("{}", err),
            }
            Ok(Some(Page::Ocr))
        }
    }
}

async fn render_translate(services: &AppServices, settings: &Settings) -> Result<Option<Page>> {
    println!();
    println!("Text Translation ('back' to return home)");
    let text = match read_input("text> ")? {
        Input::Eof => return Ok(None),
        Input::Back => return Ok(Some(Page::Home)),
        Input::Value(value) => value,
    };
    let lang = match ask_language(&services.catalog, "translate to ('languages' to list)> ")? {
        Input::Eof => return Ok(None),
        Input::Back => return Ok(Some(Page::Home)),
        Input::Value(value) => value,
    };

    match pages::translate::submit(
        &services.translator,
        &services.synthesizer,
        &services.catalog,
        &text,
        &lang,
    )
    .await
    {
        Ok(spoken) => {
            println!("translation: {}", spoken.text);
            if let Err(err) = play_audio(&spoken.audio_mp3, settings) {
                println!("audio playback failed: {}", err);
            }
        }
        Err(err) => println!("{}", err),
    }
    Ok(Some(Page::Translate))
}

/// Streams the synthesized MP3 through a scoped temp file; the file is
/// released when this returns, on success and on every failure path.
fn play_audio(audio: &[u8], settings: &Settings) -> Result<()> {
    let file = tempfile::Builder::new()
        .prefix("nova-translate-")
        .suffix(".mp3")
        .tempfile()?;
    std::fs::write(file.path(), audio)?;

    match settings.audio_player.as_deref() {
        Some(player) => {
            let mut parts = player.split_whitespace();
            let program = parts.next().unwrap_or(player);
            let status = std::process::Command::new(program)
                .args(parts)
                .arg(file.path())
                .status()?;
            if !status.success() {
                println!("audio player exited with {}", status);
            }
        }
        None => {
            println!("no audio player configured ([audio] player in settings); skipping playback");
        }
    }
    Ok(())
}

fn render_practice(services: &AppServices) -> Result<Option<Page>> {
    println!();
    println!("Pronunciation Practice ('back' to return home)");
    let phrase = match read_input("expected phrase> ")? {
        Input::Eof => return Ok(None),
        Input::Back => return Ok(Some(Page::Home)),
        Input::Value(value) => value,
    };
    let path = match read_input("audio path (wav/mp3)> ")? {
        Input::Eof => return Ok(None),
        Input::Back => return Ok(Some(Page::Home)),
        Input::Value(value) => value,
    };
    let lang = match ask_language(&services.catalog, "language spoken ('languages' to list)> ")? {
        Input::Eof => return Ok(None),
        Input::Back => return Ok(Some(Page::Home)),
        Input::Value(value) => value,
    };

    let upload = match AudioUpload::from_path(Path::new(&path)) {
        Ok(upload) => upload,
        Err(err) => {
            println!("{}", err);
            return Ok(Some(Page::Practice));
        }
    };

    match pages::practice::submit(
        &services.recognizer,
        &services.catalog,
        &phrase,
        &upload,
        &lang,
    ) {
        Ok(report) => {
            println!("you said: {}", report.recognized);
            if report.matched {
                println!("great job!");
            } else {
                println!("try again!");
            }
        }
        Err(err) => println!("{}", err),
    }
    Ok(Some(Page::Practice))
}

fn render_website(services: &AppServices) -> Result<Option<Page>> {
    println!();
    println!("Website Translator ('back' to return home)");
    let url = match read_input("website URL> ")? {
        Input::Eof => return Ok(None),
        Input::Back => return Ok(Some(Page::Home)),
        Input::Value(value) => value,
    };
    let lang = match ask_language(&services.catalog, "translate to ('languages' to list)> ")? {
        Input::Eof => return Ok(None),
        Input::Back => return Ok(Some(Page::Home)),
        Input::Value(value) => value,
    };

    match pages::website::build_link(&services.catalog, &url, &lang) {
        Ok(link) => {
            println!("open the translated site at:");
            println!("{}", link);
        }
        Err(err) => println!("{}", err),
    }
    Ok(Some(Page::Website))
}
