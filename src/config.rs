//! User settings, persisted as JSON under the platform config directory.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    dsp::Waveform,
    engine::PlayOptions,
    error::StoreError,
    render::{Gradient, Rgb},
    synth::Volume,
};

pub const APP_DIR: &str = "tonecanvas";
pub const SETTINGS_FILE: &str = "settings.json";

pub const MIN_NOTE_DURATION_SECS: f64 = 0.1;
pub const MAX_NOTE_DURATION_SECS: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Seconds per note
    pub note_duration_secs: f64,
    pub volume: Volume,
    /// Shape drawn on the canvas
    pub wave_shape: Waveform,
    /// Waveform of the audible tone
    pub tone_waveform: Waveform,
    pub colors: [Rgb; 3],
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub recordings_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            note_duration_secs: 1.0,
            volume: Volume::default(),
            wave_shape: Waveform::Sine,
            tone_waveform: Waveform::Sine,
            colors: Gradient::default().stops,
            canvas_width: 300,
            canvas_height: 150,
            recordings_dir: None,
        }
    }
}

impl Settings {
    /// `<config_dir>/tonecanvas/settings.json`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(SETTINGS_FILE))
    }

    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let text = fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&text)?;
        Ok(settings.normalized())
    }

    /// Load from `path` (or the default location), falling back to defaults
    /// when the file is missing or unreadable.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Some(p) => p,
                None => return Self::default(),
            },
        };
        if !path.exists() {
            return Self::default();
        }
        Self::load(&path).unwrap_or_else(|err| {
            tracing::warn!(path = %path.display(), %err, "unreadable settings, using defaults");
            Self::default()
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)?;
        Ok(())
    }

    /// Clamp out-of-range values loaded from disk.
    pub fn normalized(mut self) -> Self {
        self.set_note_duration_secs(self.note_duration_secs);
        self.canvas_width = self.canvas_width.max(1);
        self.canvas_height = self.canvas_height.max(1);
        self
    }

    pub fn set_note_duration_secs(&mut self, secs: f64) {
        self.note_duration_secs = if secs.is_finite() {
            secs.clamp(MIN_NOTE_DURATION_SECS, MAX_NOTE_DURATION_SECS)
        } else {
            1.0
        };
    }

    pub fn note_duration_ms(&self) -> f64 {
        self.note_duration_secs * 1000.0
    }

    pub fn gradient(&self) -> Gradient {
        let [start, middle, end] = self.colors;
        Gradient::new(start, middle, end)
    }

    pub fn play_options(&self) -> PlayOptions {
        PlayOptions {
            note_duration_ms: self.note_duration_ms(),
            wave_shape: self.wave_shape,
            gradient: self.gradient(),
        }
    }

    /// Where recordings go: the configured dir, else the platform audio dir,
    /// else the working directory.
    pub fn recordings_dir(&self) -> PathBuf {
        self.recordings_dir
            .clone()
            .or_else(|| dirs::audio_dir().map(|d| d.join(APP_DIR)))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_form() {
        let s = Settings::default();
        assert_eq!(s.note_duration_ms(), 1000.0);
        assert_eq!(s.volume.value(), 50);
        assert_eq!((s.canvas_width, s.canvas_height), (300, 150));
        assert_eq!(s.play_options().gradient, Gradient::default());
    }

    #[test]
    fn note_duration_is_clamped() {
        let mut s = Settings::default();
        s.set_note_duration_secs(0.01);
        assert_eq!(s.note_duration_secs, MIN_NOTE_DURATION_SECS);
        s.set_note_duration_secs(60.0);
        assert_eq!(s.note_duration_secs, MAX_NOTE_DURATION_SECS);
        s.set_note_duration_secs(f64::NAN);
        assert_eq!(s.note_duration_secs, 1.0);
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let s: Settings =
            serde_json::from_str(r##"{ "volume": 80, "waveShape": "square", "colors": ["#000000", "#ffffff", "#ff0000"] }"##)
                .unwrap();
        assert_eq!(s.volume.value(), 80);
        assert_eq!(s.wave_shape, Waveform::Square);
        assert_eq!(s.colors[2], Rgb(255, 0, 0));
        assert_eq!(s.canvas_width, 300);
    }

    #[test]
    fn save_then_load() {
        let path = std::env::temp_dir()
            .join(format!("tonecanvas-settings-{}", std::process::id()))
            .join(SETTINGS_FILE);
        let mut s = Settings::default();
        s.set_note_duration_secs(0.5);
        s.tone_waveform = Waveform::Triangle;
        s.save(&path).unwrap();

        let back = Settings::load(&path).unwrap();
        assert_eq!(back, s);
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("tonecanvas-does-not-exist.json");
        assert_eq!(Settings::load_or_default(Some(&path)), Settings::default());
    }
}
