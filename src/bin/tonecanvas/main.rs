//! tonecanvas - type a melody, hear it, watch it draw
//!
//! Run with: cargo run
//! Offline:  cargo run -- bounce CDEC -o melody.wav

mod app;
mod ui;

use std::{
    fs::{self, File},
    path::{Path, PathBuf},
    sync::Mutex,
};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use tracing_subscriber::EnvFilter;

use tonecanvas::{
    config::{Settings, APP_DIR},
    engine::offline,
    io::{capture::FrameLog, write_wav, Preferences, CAPTURE_FPS},
};

use ui::App;

#[derive(Parser)]
#[command(name = "tonecanvas")]
#[command(about = "Type a melody, hear it and watch its waveform draw itself")]
#[command(version)]
struct Cli {
    /// Settings file (default: <config dir>/tonecanvas/settings.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a melody to a WAV file without opening the audio device
    Bounce {
        /// Notes to play, e.g. CDEC
        notes: String,

        #[arg(short, long, default_value = "out.wav")]
        output: PathBuf,

        /// Also write the final canvas as a one-frame frame log
        #[arg(long)]
        frames: Option<PathBuf>,
    },
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let settings_path = cli.config.or_else(Settings::default_path);
    let settings = Settings::load_or_default(settings_path.as_deref());

    match cli.command {
        Some(Commands::Bounce {
            notes,
            output,
            frames,
        }) => {
            init_logging_stderr();
            bounce(&notes, &output, frames.as_deref(), &settings)
        }
        None => {
            init_logging_file()?;
            let prefs = match Preferences::default_path() {
                Some(path) => Preferences::open(path).unwrap_or_else(|err| {
                    tracing::warn!(%err, "preferences unreadable, starting fresh");
                    Preferences::in_memory()
                }),
                None => Preferences::in_memory(),
            };

            let mut app = App::new(settings, settings_path, prefs)?;
            let mut terminal = ratatui::init();
            let result = app.run(&mut terminal);
            ratatui::restore();
            result
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn init_logging_stderr() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .init();
}

/// The terminal belongs to the UI, so logs go to a file next to the settings.
fn init_logging_file() -> EyreResult<()> {
    let dir = dirs::config_dir()
        .map(|d| d.join(APP_DIR))
        .unwrap_or_else(std::env::temp_dir);
    fs::create_dir_all(&dir).wrap_err("failed to create log directory")?;
    let file = File::create(dir.join("tonecanvas.log")).wrap_err("failed to open log file")?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn bounce(notes: &str, output: &Path, frames: Option<&Path>, settings: &Settings) -> EyreResult<()> {
    let rendered = offline::bounce(notes, settings.play_options(), settings)
        .wrap_err_with(|| format!("cannot play {notes:?}"))?;

    write_wav(output, &rendered.samples, rendered.sample_rate as u32)
        .wrap_err_with(|| format!("failed to write {}", output.display()))?;
    eprintln!(
        "{}: {:.2}s, peak {:.2}",
        output.display(),
        rendered.duration_secs(),
        rendered.peak()
    );

    if let Some(path) = frames {
        let log = FrameLog {
            fps: CAPTURE_FPS,
            width: rendered.canvas.width,
            height: rendered.canvas.height,
            gradient: rendered.canvas.gradient,
            frames: vec![rendered.canvas.path],
        };
        let file = File::create(path).wrap_err_with(|| format!("failed to create {}", path.display()))?;
        serde_json::to_writer(file, &log)?;
    }
    Ok(())
}
