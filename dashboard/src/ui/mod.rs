pub mod detail;
pub mod map;

use chrono::Local;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use shared::classify::MarkerColor;
use shared::types::SignalState;

use crate::app::App;
use crate::router::Route;

pub fn draw(f: &mut Frame, app: &App) {
    match app.route {
        Route::Map => map::draw(f, app),
        Route::Junction(_) => detail::draw(f, app),
    }
}

pub(crate) fn hue_color(color: MarkerColor) -> Color {
    match color {
        MarkerColor::Green => Color::Green,
        MarkerColor::Amber => Color::Yellow,
        MarkerColor::Red => Color::Red,
    }
}

pub(crate) fn signal_color(signal: SignalState) -> Color {
    match signal {
        SignalState::Green => Color::Green,
        SignalState::Amber => Color::Yellow,
        SignalState::Red => Color::Red,
    }
}

pub(crate) fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let mode = if app.is_live() { "live" } else { "static" };
    let updated = app
        .last_update
        .map_or_else(|| "--:--:--".to_string(), |t| t.format("%H:%M:%S").to_string());
    let clock = Local::now().format("%H:%M:%S");

    let header = Paragraph::new(TextLine::from(vec![
        Span::styled(
            " GOVERNMENT OF ODISHA · TRAFFIC JUNCTIONS ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("| {mode} "), Style::default().fg(Color::DarkGray)),
        Span::styled(format!("| {} ", app.route.path()), Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("| updated {updated} | {clock}"),
            Style::default().fg(Color::DarkGray),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(header, area);
}

pub(crate) fn draw_footer(f: &mut Frame, hints: &str, area: Rect) {
    let footer = Paragraph::new(TextLine::from(Span::styled(
        hints.to_string(),
        Style::default().fg(Color::DarkGray),
    )))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, area);
}

#[cfg(test)]
pub(crate) mod testing {
    use super::draw;
    use crate::app::App;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    /// Renders a full frame into a test backend and flattens it to plain
    /// text for substring assertions.
    pub fn render_to_text(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(110, 32)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();

        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }
}
