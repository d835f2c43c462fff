//! Transport bar widget - shows play state, note, position, and audio stats

use ratatui::{
    layout::Rect,
    style::Color,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use tonecanvas::{NoteChange, PlaybackState};

use super::theme::Theme;

/// Audio statistics for display
pub struct AudioStats {
    pub peak: f32,
    pub rms: f32,
}

impl AudioStats {
    /// Compute audio stats from a buffer
    pub fn from_buffer(buffer: &[f32]) -> Self {
        if buffer.is_empty() {
            return Self { peak: 0.0, rms: 0.0 };
        }
        let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        let rms = (buffer.iter().map(|&x| x * x).sum::<f32>() / buffer.len() as f32).sqrt();
        Self { peak, rms }
    }
}

pub struct TransportStatus {
    pub state: PlaybackState,
    pub note: Option<NoteChange>,
    pub song_len: usize,
    /// Time since the song started
    pub elapsed_ms: f64,
    pub sample_rate: f32,
    pub recording: bool,
}

/// Render the transport bar
pub fn render_transport(
    frame: &mut Frame,
    area: Rect,
    status: &TransportStatus,
    audio_stats: &AudioStats,
    theme: &Theme,
) {
    let block = Block::default()
        .title(Span::styled(" tonecanvas ", theme.title(1)))
        .borders(Borders::ALL)
        .border_style(theme.accent(1))
        .style(theme.base());

    let (play_symbol, play_state_str, play_color) = match status.state {
        PlaybackState::PlayingNote(_) => ("▶", "Playing", Color::Green),
        PlaybackState::Stopped => ("■", "Stopped", Color::Yellow),
        PlaybackState::Idle => ("·", "Idle", Color::DarkGray),
    };

    let note = match (status.state, status.note) {
        (PlaybackState::PlayingNote(i), Some(change)) => format!(
            "Note {} ({}/{}) {:.1} Hz  ",
            change.note,
            i + 1,
            status.song_len,
            change.frequency
        ),
        _ => "Note -  ".to_string(),
    };

    // Format sample rate nicely (e.g., 48000 -> "48kHz")
    let sample_rate_khz = status.sample_rate / 1000.0;

    let mut spans = vec![
        Span::styled(
            format!(" {} {}  ", play_symbol, play_state_str),
            theme.base().fg(play_color),
        ),
        Span::styled(note, theme.base()),
        Span::styled(
            format!("{:.2}s  ", status.elapsed_ms / 1000.0),
            theme.muted(),
        ),
        Span::styled(format!("{:.1}kHz  ", sample_rate_khz), theme.muted()),
        Span::styled(
            format!("Peak: {:.2}  RMS: {:.2}", audio_stats.peak, audio_stats.rms),
            theme.accent(0),
        ),
    ];
    if status.recording {
        spans.push(Span::styled("  ● REC", theme.error()));
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_of_a_square() {
        let stats = AudioStats::from_buffer(&[0.5, -0.5, 0.5, -0.5]);
        assert!((stats.peak - 0.5).abs() < 1e-6);
        assert!((stats.rms - 0.5).abs() < 1e-6);
        assert_eq!(AudioStats::from_buffer(&[]).peak, 0.0);
    }
}
