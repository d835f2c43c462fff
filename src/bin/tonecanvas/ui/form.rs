//! Input form - notes, duration, volume, wave shape and the three colours

use crossterm::event::KeyCode;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use tonecanvas::{config::Settings, dsp::Waveform, synth::Volume};

use super::theme::{color, cycle, Theme};

const DURATION_STEP_SECS: f64 = 0.1;
const VOLUME_STEP: i16 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Notes,
    Duration,
    Volume,
    Shape,
    Color(usize),
}

impl Field {
    const ORDER: [Field; 7] = [
        Field::Notes,
        Field::Duration,
        Field::Volume,
        Field::Shape,
        Field::Color(0),
        Field::Color(1),
        Field::Color(2),
    ];

    fn step(self, forward: bool) -> Field {
        let n = Self::ORDER.len();
        let i = Self::ORDER.iter().position(|&f| f == self).unwrap_or(0);
        let next = if forward { (i + 1) % n } else { (i + n - 1) % n };
        Self::ORDER[next]
    }
}

/// What the app should do after a key reached the form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormAction {
    None,
    Play,
    Volume(Volume),
    Shape(Waveform),
    /// A setting that only applies to the next `play`
    Changed,
}

#[derive(Debug)]
pub struct Form {
    pub notes: String,
    pub focus: Field,
    pub error: Option<String>,
}

impl Form {
    pub fn new() -> Self {
        Self {
            notes: String::new(),
            focus: Field::Notes,
            error: None,
        }
    }

    pub fn handle_key(&mut self, key: KeyCode, settings: &mut Settings) -> FormAction {
        match key {
            KeyCode::Enter => return FormAction::Play,
            KeyCode::Tab | KeyCode::Down => {
                self.focus = self.focus.step(true);
                return FormAction::None;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = self.focus.step(false);
                return FormAction::None;
            }
            _ => {}
        }

        match (self.focus, key) {
            (Field::Notes, KeyCode::Char(c)) => {
                self.notes.push(c);
                self.error = None;
                FormAction::None
            }
            (Field::Notes, KeyCode::Backspace) => {
                self.notes.pop();
                self.error = None;
                FormAction::None
            }
            (Field::Duration, KeyCode::Left | KeyCode::Right) => {
                let delta = if key == KeyCode::Right { DURATION_STEP_SECS } else { -DURATION_STEP_SECS };
                let secs = ((settings.note_duration_secs + delta) * 10.0).round() / 10.0;
                settings.set_note_duration_secs(secs);
                FormAction::Changed
            }
            (Field::Volume, KeyCode::Left | KeyCode::Right) => {
                let delta = if key == KeyCode::Right { VOLUME_STEP } else { -VOLUME_STEP };
                settings.volume = settings.volume.saturating_add(delta);
                FormAction::Volume(settings.volume)
            }
            (Field::Shape, KeyCode::Left) => {
                settings.wave_shape = settings.wave_shape.previous();
                FormAction::Shape(settings.wave_shape)
            }
            (Field::Shape, KeyCode::Right) => {
                settings.wave_shape = settings.wave_shape.next();
                FormAction::Shape(settings.wave_shape)
            }
            (Field::Color(i), KeyCode::Left | KeyCode::Right) => {
                settings.colors[i] = cycle(settings.colors[i], key == KeyCode::Right);
                FormAction::Changed
            }
            _ => FormAction::None,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, settings: &Settings, theme: &Theme) {
        let block = Block::default()
            .title(Span::styled(" Melody ", theme.title(0)))
            .borders(Borders::ALL)
            .border_style(theme.accent(0))
            .style(theme.base());

        let label = |field: Field, text: &'static str| {
            let style = if self.focus == field { theme.focused() } else { theme.muted() };
            Span::styled(text, style)
        };

        let mut lines = vec![
            Line::from(vec![
                label(Field::Notes, " Notes "),
                Span::raw(" "),
                Span::styled(format!("{}_", self.notes), theme.base()),
            ]),
            Line::from(vec![
                label(Field::Duration, " Duration "),
                Span::raw(format!(" {:.1}s   ", settings.note_duration_secs)),
                label(Field::Volume, " Volume "),
                Span::raw(format!(" {:>3}   ", settings.volume.value())),
                label(Field::Shape, " Shape "),
                Span::raw(format!(" {}", settings.wave_shape)),
            ]),
        ];

        let mut colours = Vec::new();
        for (i, rgb) in settings.colors.iter().enumerate() {
            colours.push(label(Field::Color(i), [" Colour 1 ", " Colour 2 ", " Colour 3 "][i]));
            colours.push(Span::styled(format!(" ██ {rgb}  "), theme.base().fg(color(*rgb))));
        }
        lines.push(Line::from(colours));

        if let Some(err) = &self.error {
            lines.push(Line::from(Span::styled(format!(" {err}"), theme.error())));
        }

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}

impl Default for Form {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_goes_to_notes_until_focus_moves() {
        let mut form = Form::new();
        let mut settings = Settings::default();
        for c in "CDE".chars() {
            form.handle_key(KeyCode::Char(c), &mut settings);
        }
        form.handle_key(KeyCode::Backspace, &mut settings);
        assert_eq!(form.notes, "CD");

        form.handle_key(KeyCode::Tab, &mut settings);
        assert_eq!(form.focus, Field::Duration);
        form.handle_key(KeyCode::Char('x'), &mut settings);
        assert_eq!(form.notes, "CD");
    }

    #[test]
    fn volume_steps_and_clamps() {
        let mut form = Form::new();
        let mut settings = Settings::default();
        form.focus = Field::Volume;
        for _ in 0..20 {
            form.handle_key(KeyCode::Right, &mut settings);
        }
        assert_eq!(settings.volume, Volume::MAX);
        assert_eq!(
            form.handle_key(KeyCode::Left, &mut settings),
            FormAction::Volume(Volume::new(95))
        );
    }

    #[test]
    fn duration_respects_bounds() {
        let mut form = Form::new();
        let mut settings = Settings::default();
        form.focus = Field::Duration;
        for _ in 0..30 {
            form.handle_key(KeyCode::Left, &mut settings);
        }
        assert!((settings.note_duration_secs - 0.1).abs() < 1e-9);
    }

    #[test]
    fn focus_wraps_backwards() {
        let mut form = Form::new();
        let mut settings = Settings::default();
        form.handle_key(KeyCode::BackTab, &mut settings);
        assert_eq!(form.focus, Field::Color(2));
        assert_eq!(form.handle_key(KeyCode::Enter, &mut settings), FormAction::Play);
    }
}
