//! Song scheduler - turns a melody into timed note changes
//!
//! The `Player` is the only owner of playback state. It holds the timer
//! queue, the live `PlaybackSession`, the envelope driver, the renderer and a
//! handle to the shared voice. A note change fans out to both the envelope
//! driver and the renderer, so sound and drawing stay in lockstep.
//!
//! State machine:
//!
//! ```text
//!            play(ok)              NoteAdvance
//!   Idle ───────────────→ PlayingNote(0) ───→ PlayingNote(1) ─→ ...
//!    ↑                          │                                │
//!    │ play(invalid) / stop     └────────────── SongStop ────────┴─→ Stopped
//!    └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `play` always cancels every timer of the outgoing session before arming a
//! single new one. A stale callback from a replaced song can therefore never
//! touch the voice or the canvas.

use crate::{
    dsp::Waveform,
    engine::{
        timer::{TimerId, MIN_INTERVAL_MS},
        PlaybackEvent, TimerQueue,
    },
    error::PlayError,
    render::{Canvas, Gradient, WaveformRenderer},
    sequencing::{Note, Song},
    synth::{lock, EnvelopeDriver, SharedVoice, Volume},
};

/// Settings captured when `play` is called.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayOptions {
    pub note_duration_ms: f64,
    pub wave_shape: Waveform,
    pub gradient: Gradient,
}

impl Default for PlayOptions {
    fn default() -> Self {
        Self {
            note_duration_ms: 1000.0,
            wave_shape: Waveform::Sine,
            gradient: Gradient::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    PlayingNote(usize),
    Stopped,
}

/// Emitted to listeners on every note change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteChange {
    pub index: usize,
    pub note: Note,
    pub frequency: f32,
    /// Playback clock when the note started
    pub at_ms: f64,
}

/// Live state of one song in progress.
#[derive(Debug)]
pub struct PlaybackSession {
    pub(crate) song: Song,
    pub(crate) note_duration_ms: f64,
    /// Index of the next note to start
    pub(crate) next_index: usize,
    pub(crate) frequency: f32,
    /// Canvas needs a fresh path (only true before the first note)
    pub(crate) reset: bool,
    pub(crate) note_advance: Option<TimerId>,
    pub(crate) stop: Option<TimerId>,
    pub(crate) draw_tick: Option<TimerId>,
}

impl PlaybackSession {
    fn new(song: Song, note_duration_ms: f64) -> Self {
        Self {
            song,
            note_duration_ms,
            next_index: 0,
            frequency: 0.0,
            reset: true,
            note_advance: None,
            stop: None,
            draw_tick: None,
        }
    }

    pub fn song(&self) -> &Song {
        &self.song
    }

    pub fn note_duration_ms(&self) -> f64 {
        self.note_duration_ms
    }

    pub fn song_duration_ms(&self) -> f64 {
        self.song.duration_ms(self.note_duration_ms)
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Disarm the note-advance, stop and draw-tick timers.
    fn cancel(&mut self, timers: &mut TimerQueue<PlaybackEvent>) {
        timers.cancel_handle(&mut self.note_advance);
        timers.cancel_handle(&mut self.stop);
        timers.cancel_handle(&mut self.draw_tick);
    }

    fn is_drawing(&self) -> bool {
        self.draw_tick.is_some()
    }
}

type NoteListener = Box<dyn FnMut(&NoteChange)>;

pub struct Player {
    timers: TimerQueue<PlaybackEvent>,
    voice: SharedVoice,
    envelope: EnvelopeDriver,
    renderer: WaveformRenderer,
    session: Option<PlaybackSession>,
    state: PlaybackState,
    volume: Volume,
    listeners: Vec<NoteListener>,
}

impl Player {
    pub fn new(voice: SharedVoice, canvas_width: u32, canvas_height: u32) -> Self {
        Self {
            timers: TimerQueue::new(),
            voice,
            envelope: EnvelopeDriver::new(),
            renderer: WaveformRenderer::new(canvas_width, canvas_height),
            session: None,
            state: PlaybackState::Idle,
            volume: Volume::default(),
            listeners: Vec::new(),
        }
    }

    /// Start a new song, replacing whatever is playing.
    ///
    /// The outgoing song is cancelled and silenced before the input is even
    /// validated, so invalid input also stops playback.
    pub fn play(&mut self, input: &str, options: PlayOptions) -> Result<(), PlayError> {
        self.cancel_session();
        lock(&self.voice).reset_oscillator();
        self.state = PlaybackState::Idle;

        let song = Song::parse(input).inspect_err(|err| {
            tracing::warn!(%err, "rejected melody");
        })?;

        // same floor the interval gets, so the stop lands after the last note
        let note_duration_ms = options.note_duration_ms.max(MIN_INTERVAL_MS);
        let song_duration_ms = song.duration_ms(note_duration_ms);
        tracing::info!(
            notes = song.len(),
            note_ms = note_duration_ms,
            song_ms = song_duration_ms,
            shape = %options.wave_shape,
            "play"
        );

        self.renderer.set_shape(options.wave_shape);
        self.renderer.set_gradient(options.gradient);
        self.session = Some(PlaybackSession::new(song, note_duration_ms));

        self.change_note();

        if let Some(session) = self.session.as_mut() {
            if session.next_index < session.song.len() {
                session.note_advance = Some(
                    self.timers
                        .set_interval(note_duration_ms, PlaybackEvent::NoteAdvance),
                );
            }
            session.stop = Some(self.timers.set_timeout(song_duration_ms, PlaybackEvent::SongStop));
        }

        Ok(())
    }

    /// Cancel the current song and silence the output.
    pub fn stop(&mut self) {
        self.cancel_session();
        lock(&self.voice).silence();
        if self.state != PlaybackState::Idle {
            self.state = PlaybackState::Stopped;
        }
        tracing::info!("stopped");
    }

    /// Live volume control. Reaches the gain directly only inside the
    /// manual volume window; the draw loop always uses the latest value.
    pub fn set_volume(&mut self, volume: Volume) {
        self.volume = volume;
        let applied = self.envelope.set_volume(&mut lock(&self.voice), volume);
        tracing::trace!(volume = volume.value(), applied, "volume");
    }

    pub fn volume(&self) -> Volume {
        self.volume
    }

    /// Shape used by the draw loop; effective immediately.
    pub fn set_wave_shape(&mut self, shape: Waveform) {
        self.renderer.set_shape(shape);
    }

    /// Register a note-change listener.
    pub fn subscribe(&mut self, listener: impl FnMut(&NoteChange) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Advance the playback clock by `elapsed_ms`, firing due timers.
    pub fn advance(&mut self, elapsed_ms: f64) {
        let until = self.timers.now() + elapsed_ms.max(0.0);
        self.run_until(until);
    }

    /// Fire every timer due up to `until_ms`, in order.
    pub fn run_until(&mut self, until_ms: f64) {
        while let Some((_, event)) = self.timers.pop_due(until_ms) {
            self.dispatch(event);
        }
        self.timers.advance_to(until_ms);
    }

    /// Playback clock in milliseconds
    pub fn now(&self) -> f64 {
        self.timers.now()
    }

    /// When the next timer fires, if any is armed.
    pub fn next_due(&self) -> Option<f64> {
        self.timers.next_due()
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn session(&self) -> Option<&PlaybackSession> {
        self.session.as_ref()
    }

    pub fn is_manual_volume_active(&self) -> bool {
        self.envelope.is_manual_volume_active()
    }

    /// Number of armed timers across session, envelope and draw loop
    pub fn armed_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn renderer(&self) -> &WaveformRenderer {
        &self.renderer
    }

    /// The canvas, attachable as a video source.
    pub fn canvas(&self) -> &Canvas {
        self.renderer.canvas()
    }

    /// The voice, attachable as an audio source.
    pub fn voice(&self) -> SharedVoice {
        self.voice.clone()
    }

    fn cancel_session(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.cancel(&mut self.timers);
            tracing::debug!("previous session cancelled");
        }
        self.envelope.cancel(&mut self.timers);
    }

    fn dispatch(&mut self, event: PlaybackEvent) {
        match event {
            PlaybackEvent::NoteAdvance => self.change_note(),
            PlaybackEvent::SongStop => self.finish_song(),
            PlaybackEvent::DrawTick => self.draw_tick(),
            PlaybackEvent::ManualVolumeOn => self.envelope.enable_manual_volume(),
            PlaybackEvent::FadeOutStart => self.envelope.begin_fade_out(&mut lock(&self.voice)),
        }
    }

    /// Start the session's next note on both the voice and the canvas.
    fn change_note(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let index = session.next_index;
        let Some(note) = session.song.get(index) else {
            self.timers.cancel_handle(&mut session.note_advance);
            return;
        };

        let frequency = note.frequency();
        session.frequency = frequency;
        session.next_index = index + 1;

        self.envelope.play_note(
            &mut lock(&self.voice),
            &mut self.timers,
            frequency,
            session.note_duration_ms,
            self.volume,
        );
        self.renderer.restart_draw(session, &mut self.timers);

        if session.next_index >= session.song.len() {
            self.timers.cancel_handle(&mut session.note_advance);
        }

        self.state = PlaybackState::PlayingNote(index);
        let change = NoteChange {
            index,
            note,
            frequency,
            at_ms: self.timers.now(),
        };
        tracing::debug!(index, %note, frequency, at_ms = change.at_ms, "note change");
        for listener in self.listeners.iter_mut() {
            listener(&change);
        }
    }

    fn finish_song(&mut self) {
        lock(&self.voice).silence();
        self.state = PlaybackState::Stopped;
        if let Some(session) = self.session.as_mut() {
            session.stop = None;
            if !session.is_drawing() {
                self.session = None;
            }
        }
        tracing::info!("song finished");
    }

    fn draw_tick(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if self.renderer.draw_tick(self.volume) {
            self.timers.cancel_handle(&mut session.draw_tick);
            if self.state == PlaybackState::Stopped {
                self.session = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::Voice;
    use std::{cell::RefCell, rc::Rc};

    fn player() -> Player {
        let voice = Voice::new(1_000.0, Waveform::Sine).into_shared();
        Player::new(voice, 300, 150)
    }

    fn options(note_duration_ms: f64) -> PlayOptions {
        PlayOptions {
            note_duration_ms,
            ..Default::default()
        }
    }

    fn record(player: &mut Player) -> Rc<RefCell<Vec<NoteChange>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        player.subscribe(move |c| sink.borrow_mut().push(*c));
        log
    }

    #[test]
    fn first_note_fires_immediately() {
        let mut p = player();
        let log = record(&mut p);
        p.play("CDE", options(1000.0)).unwrap();

        assert_eq!(log.borrow().len(), 1);
        assert_eq!(log.borrow()[0].note, Note::C);
        assert_eq!(log.borrow()[0].at_ms, 0.0);
        assert_eq!(p.state(), PlaybackState::PlayingNote(0));
    }

    #[test]
    fn invalid_input_arms_nothing() {
        let mut p = player();
        let log = record(&mut p);

        let err = p.play("CDX", options(1000.0)).unwrap_err();
        assert!(matches!(err, PlayError::InvalidInput(_)));
        assert_eq!(p.armed_timers(), 0);
        assert!(log.borrow().is_empty());
        assert_eq!(p.state(), PlaybackState::Idle);
    }

    #[test]
    fn invalid_input_still_cancels_running_song() {
        let mut p = player();
        p.play("CDEFG", options(500.0)).unwrap();
        p.advance(700.0);
        assert!(p.armed_timers() > 0);

        assert!(p.play("hello", options(500.0)).is_err());
        assert_eq!(p.armed_timers(), 0);
        assert!(p.session().is_none());
    }

    #[test]
    fn single_note_song_arms_no_interval() {
        let mut p = player();
        p.play("A", options(400.0)).unwrap();
        let session = p.session().unwrap();
        assert!(session.note_advance.is_none());
        assert!(session.stop.is_some());
        assert!(session.draw_tick.is_some());
    }

    #[test]
    fn song_is_discarded_after_stop_and_final_draw() {
        let mut p = player();
        p.play("CD", options(100.0)).unwrap();

        p.advance(200.0);
        assert_eq!(p.state(), PlaybackState::Stopped);
        // the last note's draw loop still runs past the song end
        assert!(p.session().is_some());

        p.advance(200.0);
        assert!(p.session().is_none());
        assert_eq!(p.armed_timers(), 0);
    }

    #[test]
    fn zero_length_notes_still_reach_stopped() {
        let mut p = player();
        let log = record(&mut p);
        p.play("CDE", options(0.0)).unwrap();

        p.run_until(10.0);
        assert_eq!(log.borrow().len(), 3);
        assert_eq!(p.state(), PlaybackState::Stopped);
        assert!(p.session().is_none());
        assert_eq!(p.armed_timers(), 0);

        // the stop never overtakes the last note change
        let last = log.borrow()[2].at_ms;
        assert!(last < 3.0 * MIN_INTERVAL_MS);
    }

    #[test]
    fn explicit_stop_silences_and_disarms() {
        let mut p = player();
        p.play("CDEF", options(250.0)).unwrap();
        p.advance(300.0);

        p.stop();
        assert_eq!(p.state(), PlaybackState::Stopped);
        assert_eq!(p.armed_timers(), 0);
        assert!(!p.is_manual_volume_active());
    }
}
