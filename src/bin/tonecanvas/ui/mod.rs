//! TUI module for tonecanvas
//!
//! One thread runs the form, the player's timers and the drawing; the audio
//! device callback renders the shared voice and feeds the tap.

mod canvas;
mod form;
mod theme;
mod transport;

use std::{
    cell::Cell,
    path::PathBuf,
    rc::Rc,
    time::{Duration, Instant},
};

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    text::Span,
    widgets::Paragraph,
    DefaultTerminal, Frame,
};

use tonecanvas::{
    config::Settings,
    io::{audio_tap, Preferences, Recorder, TapReader},
    synth::{lock, SharedVoice, Voice},
    NoteChange, PlaybackState, Player,
};

use crate::app::{default_sample_rate, AudioOutput};

use canvas::render_canvas;
use form::{Form, FormAction};
use theme::Theme;
use transport::{render_transport, AudioStats, TransportStatus};

/// Audio visualization buffer size
const VIS_BUFFER_SIZE: usize = 1024;
/// Tap capacity: a bit over a second at 48 kHz
const TAP_CAPACITY: usize = 1 << 16;

/// UI application state
pub struct App {
    settings: Settings,
    settings_path: Option<PathBuf>,
    prefs: Preferences,
    form: Form,
    player: Player,
    voice: SharedVoice,
    /// Held for its drop; the stream stops with the app
    _output: Option<AudioOutput>,
    sample_rate: f32,
    tap: TapReader,
    /// Latest samples for the meters
    audio_buffer: Vec<f32>,
    drain_buf: Vec<f32>,
    recorder: Recorder,
    last_note: Rc<Cell<Option<NoteChange>>>,
    song_started: Instant,
    clock_origin: Instant,
    should_quit: bool,
}

impl App {
    pub fn new(settings: Settings, settings_path: Option<PathBuf>, prefs: Preferences) -> EyreResult<Self> {
        let sample_rate = default_sample_rate()?;
        let mut voice = Voice::new(sample_rate, settings.tone_waveform);
        let (tap_writer, tap) = audio_tap(TAP_CAPACITY);
        voice.attach_tap(tap_writer);
        let voice = voice.into_shared();

        let mut player = Player::new(voice.clone(), settings.canvas_width, settings.canvas_height);
        player.set_volume(settings.volume);
        player.set_wave_shape(settings.wave_shape);

        let last_note = Rc::new(Cell::new(None));
        let sink = last_note.clone();
        player.subscribe(move |change: &NoteChange| sink.set(Some(*change)));

        let recorder = Recorder::new(settings.recordings_dir(), sample_rate as u32);
        let now = Instant::now();

        Ok(Self {
            settings,
            settings_path,
            prefs,
            form: Form::new(),
            player,
            voice,
            _output: None,
            sample_rate,
            tap,
            audio_buffer: vec![0.0; VIS_BUFFER_SIZE],
            drain_buf: Vec::with_capacity(TAP_CAPACITY),
            recorder,
            last_note,
            song_started: now,
            clock_origin: now,
            should_quit: false,
        })
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        let output = AudioOutput::start(self.voice.clone())?;
        self.sample_rate = output.sample_rate;
        self._output = Some(output);

        while !self.should_quit {
            self.tick();
            self.poll_audio();

            terminal.draw(|frame| self.render(frame))?;

            // Handle keyboard input (non-blocking, ~60fps)
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }
        }

        self.shutdown();
        Ok(())
    }

    fn now_ms(&self) -> f64 {
        self.clock_origin.elapsed().as_secs_f64() * 1000.0
    }

    /// Fire whatever playback timers came due since the last frame.
    fn tick(&mut self) {
        let now = self.now_ms();
        self.player.run_until(now);
        self.recorder.offer_frame(now, self.player.canvas());
    }

    /// Drain the tap into the meters and the recorder
    fn poll_audio(&mut self) {
        self.drain_buf.clear();
        if self.tap.drain_into(&mut self.drain_buf) == 0 {
            return;
        }
        self.recorder.push_audio(&self.drain_buf);

        // Append new samples and keep only the last VIS_BUFFER_SIZE
        self.audio_buffer.extend_from_slice(&self.drain_buf);
        if self.audio_buffer.len() > VIS_BUFFER_SIZE {
            let excess = self.audio_buffer.len() - VIS_BUFFER_SIZE;
            self.audio_buffer.drain(0..excess);
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') | KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Char('s') => self.player.stop(),
                KeyCode::Char('r') => self.toggle_recording(),
                KeyCode::Char('d') => self.toggle_dark_mode(),
                _ => {}
            }
            return;
        }
        if key.code == KeyCode::Esc {
            self.should_quit = true;
            return;
        }

        match self.form.handle_key(key.code, &mut self.settings) {
            FormAction::Play => self.play(),
            FormAction::Volume(volume) => self.player.set_volume(volume),
            FormAction::Shape(shape) => self.player.set_wave_shape(shape),
            FormAction::Changed | FormAction::None => {}
        }
    }

    fn play(&mut self) {
        // keep the player's clock on wall time before anything is armed
        self.tick();
        match self.player.play(&self.form.notes, self.settings.play_options()) {
            Ok(()) => {
                self.form.error = None;
                self.song_started = Instant::now();
            }
            Err(err) => self.form.error = Some(err.to_string()),
        }
    }

    fn toggle_recording(&mut self) {
        let now = self.now_ms();
        match self.recorder.toggle(now, self.player.canvas()) {
            Ok(Some(recording)) => {
                self.form.error = Some(format!("saved {}", recording.wav.display()));
            }
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(%err, "recording failed");
                self.form.error = Some(format!("recording failed: {err}"));
            }
        }
    }

    fn toggle_dark_mode(&mut self) {
        let on = !self.prefs.dark_mode();
        if let Err(err) = self.prefs.set_dark_mode(on) {
            tracing::warn!(%err, "could not persist dark mode");
        }
    }

    fn shutdown(&mut self) {
        self.player.stop();
        lock(&self.voice).detach_tap();
        if self.recorder.is_recording() {
            if let Err(err) = self.recorder.stop() {
                tracing::warn!(%err, "recording lost on exit");
            }
        }
        if let Some(path) = &self.settings_path {
            if let Err(err) = self.settings.save(path) {
                tracing::warn!(%err, path = %path.display(), "settings not saved");
            }
        }
    }

    /// Render the UI
    fn render(&self, frame: &mut Frame) {
        let theme = Theme::new(self.prefs.dark_mode(), self.settings.colors);
        let area = frame.area();
        frame.render_widget(ratatui::widgets::Block::default().style(theme.base()), area);

        // Main layout: transport, form, canvas, help
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Transport bar
                Constraint::Length(6), // Form
                Constraint::Min(8),    // Canvas
                Constraint::Length(1), // Help bar
            ])
            .split(area);

        let state = self.player.state();
        let status = TransportStatus {
            state,
            note: self.last_note.get(),
            song_len: self.player.session().map_or(0, |s| s.song().len()),
            elapsed_ms: match state {
                PlaybackState::PlayingNote(_) => self.song_started.elapsed().as_secs_f64() * 1000.0,
                _ => 0.0,
            },
            sample_rate: self.sample_rate,
            recording: self.recorder.is_recording(),
        };
        let stats = AudioStats::from_buffer(&self.audio_buffer);
        render_transport(frame, chunks[0], &status, &stats, &theme);

        self.form.render(frame, chunks[1], &self.settings, &theme);

        render_canvas(frame, chunks[2], self.player.canvas(), &theme);

        let help = Paragraph::new(Span::styled(
            " [Enter] Play  [Tab] Next field  [←/→] Adjust  [^S] Stop  [^R] Record  [^D] Dark mode  [Esc] Quit",
            theme.muted(),
        ));
        frame.render_widget(help, chunks[3]);
    }
}
