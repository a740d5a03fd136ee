//! Activity meters widget

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Gauge},
    Frame,
};

use flowgroove::analysis::ActivityMeters;
use flowgroove::synth::ActivityVoice;

const VOICE_COLORS: [Color; ActivityVoice::COUNT] = [
    Color::LightRed,
    Color::LightYellow,
    Color::LightCyan,
    Color::LightGreen,
    Color::LightMagenta,
    Color::LightBlue,
    Color::Gray,
];

pub fn render_meters(frame: &mut Frame, area: Rect, meters: &ActivityMeters) {
    let block = Block::default().title(" Activity ").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1); ActivityVoice::COUNT])
        .split(inner);

    for ((voice, level), row) in meters.iter().zip(rows.iter()) {
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(VOICE_COLORS[voice.index()]))
            .label(format!("{:<6}", voice.name()))
            .ratio(level.clamp(0.0, 1.0) as f64);
        frame.render_widget(gauge, *row);
    }
}
