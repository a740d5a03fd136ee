//! Scope widget - the last window of master output, mono

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

/// Peak above which the trace turns red; the limiter sits just above it.
const HOT: f32 = 0.9;

pub fn render_waveform(frame: &mut Frame, area: Rect, scope: &[f32]) {
    let peak = scope.iter().fold(0.0f32, |m, s| m.max(s.abs()));
    let block = Block::default()
        .title(format!(" Scope  peak {:.2} ", peak))
        .borders(Borders::ALL);

    let step = 1.0 / scope.len().max(1) as f64;
    let points: Vec<(f64, f64)> = scope
        .iter()
        .enumerate()
        .map(|(i, &s)| (i as f64 * step, s as f64))
        .collect();

    let color = if peak > HOT { Color::LightRed } else { Color::Cyan };
    let trace = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(color))
        .data(&points);

    let chart = Chart::new(vec![trace])
        .block(block)
        .x_axis(Axis::default().bounds([0.0, 1.0]))
        .y_axis(
            Axis::default()
                .bounds([-1.0, 1.0])
                .labels(vec!["-1", "0", "1"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
