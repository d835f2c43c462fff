//! Colours: the three stroke colours double as accent colours for the chrome

use ratatui::style::{Color, Modifier, Style};
use tonecanvas::render::Rgb;

/// Colours offered by the colour fields, cycled with ←/→.
pub const PALETTE: [Rgb; 10] = [
    Rgb(0x8a, 0x2b, 0xe2),
    Rgb(0xff, 0x14, 0x93),
    Rgb(0x00, 0xbf, 0xff),
    Rgb(0xff, 0x45, 0x00),
    Rgb(0xff, 0xd7, 0x00),
    Rgb(0x32, 0xcd, 0x32),
    Rgb(0x40, 0xe0, 0xd0),
    Rgb(0xff, 0xff, 0xff),
    Rgb(0x70, 0x80, 0x90),
    Rgb(0x00, 0x00, 0x00),
];

/// Next (or previous) palette entry after `current`. Colours not in the
/// palette jump to its first entry.
pub fn cycle(current: Rgb, forward: bool) -> Rgb {
    let n = PALETTE.len();
    match PALETTE.iter().position(|&c| c == current) {
        Some(i) if forward => PALETTE[(i + 1) % n],
        Some(i) => PALETTE[(i + n - 1) % n],
        None => PALETTE[0],
    }
}

pub fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub dark: bool,
    pub accents: [Rgb; 3],
}

impl Theme {
    pub fn new(dark: bool, accents: [Rgb; 3]) -> Self {
        Self { dark, accents }
    }

    pub fn base(&self) -> Style {
        if self.dark {
            Style::default().bg(Color::Rgb(0x12, 0x12, 0x12)).fg(Color::Rgb(0xe0, 0xe0, 0xe0))
        } else {
            Style::default().bg(Color::Rgb(0xfa, 0xfa, 0xfa)).fg(Color::Rgb(0x20, 0x20, 0x20))
        }
    }

    pub fn muted(&self) -> Style {
        self.base().fg(if self.dark { Color::Gray } else { Color::DarkGray })
    }

    pub fn accent(&self, i: usize) -> Style {
        self.base().fg(color(self.accents[i % 3]))
    }

    pub fn title(&self, i: usize) -> Style {
        self.accent(i).add_modifier(Modifier::BOLD)
    }

    pub fn focused(&self) -> Style {
        self.accent(1).add_modifier(Modifier::REVERSED)
    }

    pub fn error(&self) -> Style {
        self.base().fg(Color::Red)
    }
}
