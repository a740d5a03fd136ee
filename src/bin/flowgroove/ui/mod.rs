//! HUD layout.

mod arrangement;
mod meters;
mod spectrum;
mod timeline;
mod transport;
mod waveform;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

use super::app::App;

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Transport bar
            Constraint::Length(9), // Arrangement + meters
            Constraint::Length(8), // Step timeline
            Constraint::Min(8),    // Waveform + spectrum
            Constraint::Length(1), // Help bar
        ])
        .split(area);

    transport::render_transport(frame, rows[0], app);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[1]);
    arrangement::render_arrangement(frame, middle[0], &app.status, &app.control);
    meters::render_meters(frame, middle[1], &app.meters);

    timeline::render_timeline(frame, rows[2], &app.status);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[3]);
    waveform::render_waveform(frame, bottom[0], &app.scope);
    spectrum::render_spectrum(frame, bottom[1], app.spectrum.data());

    let help = match &app.message {
        Some(msg) => format!(" {}", msg),
        None => " [Space] Play/Stop  [A/D] Tempo  [W/S] Filter  [J/L][I/K] Hats  [+/-] Build  \
                 [Z/X] Pinch  [C] Flick  [H] Hands  [M] Kill  [1-3] Macros  [5-9] Drums  [Q] Quit"
            .to_string(),
    };
    frame.render_widget(
        Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
        rows[4],
    );
}
