//! Arrangement panel - stage, groove, variant and macro levels

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use flowgroove::io::ControlState;
use flowgroove::EngineStatus;

fn row(label: &str, value: String, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<10}", label), Style::default().fg(Color::DarkGray)),
        Span::styled(value, Style::default().fg(color)),
    ])
}

pub fn render_arrangement(
    frame: &mut Frame,
    area: Rect,
    status: &EngineStatus,
    control: &ControlState,
) {
    let block = Block::default().title(" Arrangement ").borders(Borders::ALL);

    let variant_color = if status.variant.name() == "normal" {
        Color::White
    } else {
        Color::LightMagenta
    };
    let m = status.macros;

    let mut lines = vec![
        row(
            "stage",
            format!("{}  section {}  scene {}", status.stage.name(), status.section, status.flow_scene),
            Color::Cyan,
        ),
        row(
            "groove",
            format!("{}  chord {} ({})", status.groove.name(), status.chord, status.harmony_index),
            Color::White,
        ),
        row(
            "variant",
            format!(
                "{}  fill {}{}",
                status.variant.name(),
                status.fill.name(),
                if status.breakdown { "  BREAKDOWN" } else { "" }
            ),
            variant_color,
        ),
        row(
            "macros",
            format!("lift {:.2}  perc {:.2}  fx {:.2}", m.pad_lift, m.perc_boost, m.fx_blast),
            Color::LightYellow,
        ),
        row(
            "hands",
            format!(
                "{}  L({:.2},{:.2})  R({:.2},{:.2})  build {:.1}{}",
                control.hand_count,
                control.left_x,
                control.left_y,
                control.right_x,
                control.right_y,
                control.build,
                if control.kill { "  KILL" } else { "" }
            ),
            Color::Gray,
        ),
    ];

    if !status.unavailable_voices.is_empty() {
        lines.push(row(
            "missing",
            status.unavailable_voices.join(", "),
            Color::LightRed,
        ));
    }
    if let Some(err) = &status.last_error {
        lines.push(row("error", err.clone(), Color::LightRed));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
