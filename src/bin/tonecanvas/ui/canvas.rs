//! Canvas widget - the drawn waveform, one braille line per path segment

use ratatui::{
    layout::Rect,
    symbols,
    text::Span,
    widgets::{
        canvas::{Canvas as CanvasWidget, Line},
        Block, Borders,
    },
    Frame,
};

use tonecanvas::render::Canvas;

use super::theme::{color, Theme};

pub fn render_canvas(frame: &mut Frame, area: Rect, canvas: &Canvas, theme: &Theme) {
    let block = Block::default()
        .title(Span::styled(" Waveform ", theme.title(2)))
        .borders(Borders::ALL)
        .border_style(theme.accent(2))
        .style(theme.base());

    let height = canvas.height() as f64;
    let widget = CanvasWidget::default()
        .block(block)
        .marker(symbols::Marker::Braille)
        .background_color(theme.base().bg.unwrap_or_default())
        .x_bounds([0.0, canvas.width() as f64])
        .y_bounds([0.0, height])
        .paint(move |ctx| {
            // canvas y grows downward, the widget's grows upward
            for (a, b, rgb) in canvas.segments() {
                ctx.draw(&Line {
                    x1: a.x,
                    y1: height - a.y,
                    x2: b.x,
                    y2: height - b.y,
                    color: color(rgb),
                });
            }
        });

    frame.render_widget(widget, area);
}
