//! Step timeline widget - the current bar's pattern with a playhead

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use flowgroove::sequencing::patterns::{StepMask, STEPS_PER_BAR};
use flowgroove::EngineStatus;

/// Characters per step
const CELL: usize = 3;

pub fn render_timeline(frame: &mut Frame, area: Rect, status: &EngineStatus) {
    let block = Block::default().title(" Steps ").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height < 2 || inner.width < (8 + CELL * STEPS_PER_BAR) as u16 {
        return;
    }

    let tracks: [(&str, StepMask, Color); 5] = [
        ("kick", status.kick, Color::LightRed),
        ("snare", status.snare, Color::LightYellow),
        ("hats", status.hats, Color::LightCyan),
        ("bass", status.bass, Color::LightBlue),
        ("melody", status.melody, Color::LightGreen),
    ];

    let mut lines = Vec::with_capacity(tracks.len() + 1);
    for (name, mask, color) in tracks {
        let mut spans = vec![Span::styled(
            format!("{:6}  ", name),
            Style::default().fg(Color::DarkGray),
        )];
        for step in 0..STEPS_PER_BAR {
            let on = mask.contains(step);
            let cell = if on { "▓▓ " } else { "░░ " };
            let style = if step == status.step && status.running {
                Style::default().fg(Color::White)
            } else if on {
                Style::default().fg(color)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            spans.push(Span::styled(cell, style));
        }
        lines.push(Line::from(spans));
    }

    // Playhead row
    let mut playhead = " ".repeat(8);
    for step in 0..STEPS_PER_BAR {
        playhead.push_str(if step == status.step { "▲  " } else { "   " });
    }
    lines.push(Line::from(Span::styled(
        playhead,
        Style::default().fg(Color::Yellow),
    )));

    frame.render_widget(Paragraph::new(lines), inner);
}
