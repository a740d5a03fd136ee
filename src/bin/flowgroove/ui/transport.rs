//! Transport bar widget - play state, tempo, position and pulse

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::super::app::App;

pub fn render_transport(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().title(" flowgroove ").borders(Borders::ALL);
    let status = &app.status;
    let playing = app.is_playing();

    let (play_symbol, play_state) = if playing {
        ("▶", "Playing")
    } else {
        ("■", "Stopped")
    };

    // pulse lamp: brightest on the quarter note
    let lamp = if status.pulse > 0.6 {
        "●"
    } else if status.pulse > 0.2 {
        "◉"
    } else {
        "○"
    };

    let line = Line::from(vec![
        Span::styled(
            format!(" BPM: {:.0}  ", status.bpm),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("{} {}  ", play_symbol, play_state),
            Style::default().fg(if playing { Color::Green } else { Color::Yellow }),
        ),
        Span::styled(
            format!("Bar {} | Step {:2}  ", status.bar + 1, status.step + 1),
            Style::default().fg(Color::White),
        ),
        Span::styled(format!("{}  ", lamp), Style::default().fg(Color::LightRed)),
        Span::styled(
            format!("{:.1}kHz  ", app.sample_rate / 1000.0),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!(
                "skipped {}  dropped {}",
                status.skipped_steps, status.dropped_messages
            ),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    frame.render_widget(Paragraph::new(line).block(block), area);
}
