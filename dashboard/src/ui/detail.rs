use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Row, Table};
use ratatui::Frame;
use shared::cards::{assemble, LaneReading, SignalCard};
use shared::classify::{classify, MarkerColor, Treatment};
use shared::types::{Junction, SignalState};

use crate::app::App;
use crate::router::Route;

use super::{draw_footer, draw_header, hue_color, signal_color};

pub fn draw(f: &mut Frame, app: &App) {
    let rows = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(10),
        Constraint::Length(3),
    ])
    .split(f.area());

    draw_header(f, app, rows[0]);
    draw_footer(f, " b/Esc back to map · q quit ", rows[2]);

    let Route::Junction(id) = &app.route else {
        return;
    };

    if app.is_live() && !app.connected {
        let waiting = Paragraph::new(format!("Connecting... waiting for junction {id}"))
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title(" Junction details "));
        f.render_widget(waiting, rows[1]);
        return;
    }

    let Some(junction) = app.current_junction() else {
        let missing = Paragraph::new("Junction not found")
            .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
            .block(Block::default().borders(Borders::ALL).title(" Junction details "));
        f.render_widget(missing, rows[1]);
        return;
    };

    let sections = Layout::vertical([
        Constraint::Length(8),
        Constraint::Length(7),
        Constraint::Min(4),
    ])
    .split(rows[1]);

    draw_attributes(f, junction, sections[0]);
    draw_signal_cards(f, app, junction, sections[1]);
    draw_device_table(f, junction, sections[2]);
}

fn draw_attributes(f: &mut Frame, junction: &Junction, area: Rect) {
    let treatment = classify(junction.congestion);
    let accent = hue_color(treatment.accent);

    let mut congestion_line = vec![
        Span::raw("Congestion Level: "),
        Span::styled(junction.congestion.to_string(), Style::default().fg(accent)),
        Span::raw("   "),
    ];
    congestion_line.extend(lamp_legend(treatment));

    let lines = vec![
        TextLine::from(Span::styled(
            format!("{} (JID-{})", junction.name, junction.id),
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        )),
        TextLine::from(congestion_line),
        TextLine::from(format!("Vehicle count: {}", junction.vehicle_count)),
        TextLine::from(format!("Latitude: {}", junction.lat)),
        TextLine::from(format!("Longitude: {}", junction.lng)),
    ];

    let block = Block::default().borders(Borders::ALL).title(" Junction details ");
    f.render_widget(Paragraph::new(lines).block(block), area);
}

// Three-lamp legend; only the classified lamp glows.
fn lamp_legend(treatment: Treatment) -> Vec<Span<'static>> {
    [MarkerColor::Red, MarkerColor::Amber, MarkerColor::Green]
        .into_iter()
        .map(|color| {
            let style = if treatment.lit_lamp == color {
                Style::default().fg(hue_color(color)).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Span::styled("● ", style)
        })
        .collect()
}

fn draw_signal_cards(f: &mut Frame, app: &App, junction: &Junction, area: Rect) {
    let cards = assemble(junction, &app.lanes);
    let columns = Layout::horizontal([
        Constraint::Percentage(25),
        Constraint::Percentage(25),
        Constraint::Percentage(25),
        Constraint::Percentage(25),
    ])
    .split(area);

    for (card, column) in cards.iter().zip(columns.iter()) {
        draw_card(f, card, *column);
    }
}

fn draw_card(f: &mut Frame, card: &SignalCard, area: Rect) {
    let title = format!(" {} · {} veh ", card.direction, card.total_vehicles());
    let lines = vec![
        movement_line("Left", card.left),
        movement_line("Straight", card.straight),
        movement_line("Right", card.right),
    ];
    let block = Block::default().borders(Borders::ALL).title(title);
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn movement_line(label: &str, reading: LaneReading) -> TextLine<'static> {
    let count = reading
        .vehicle_count
        .map_or_else(|| "N/A".to_string(), |c| c.to_string());

    let mut light = Style::default().fg(signal_color(reading.signal));
    if reading.signal == SignalState::Green {
        light = light.add_modifier(Modifier::BOLD);
    }

    TextLine::from(vec![
        Span::raw(format!("{label:<9}")),
        Span::styled("● ", light),
        Span::styled(format!("{:<6}", reading.signal.to_string()), light),
        Span::raw(format!("{count:>4}")),
    ])
}

fn draw_device_table(f: &mut Frame, junction: &Junction, area: Rect) {
    let header = Row::new(["Device ID", "Current Signal", "Signal Timer", "Vehicles"])
        .style(Style::default().add_modifier(Modifier::BOLD));

    let rows = junction.iot.iter().map(|device| {
        Row::new([
            device.iot_id.clone(),
            device.current_signal.to_string(),
            device.current_signal_timer.to_string(),
            device.vehicle_count.to_string(),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(14),
            Constraint::Length(16),
            Constraint::Length(14),
            Constraint::Length(10),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title(" Associated IoT devices "));
    f.render_widget(table, area);
}

#[cfg(test)]
mod tests {
    use super::super::testing::render_to_text;
    use crate::app::App;
    use crate::router::Route;
    use shared::feed::bundled_junctions;

    #[test]
    fn renders_attributes_cards_and_devices() {
        let app = App::with_dataset(bundled_junctions().unwrap(), Route::Junction("t".into()));
        let text = render_to_text(&app);

        assert!(text.contains("Mylapore Signal (JID-t)"));
        assert!(text.contains("Congestion Level: Medium"));
        assert!(text.contains("North"));
        assert!(text.contains("West"));
        assert!(text.contains("N/A"));
        assert!(text.contains("n_t_0"));
    }

    #[test]
    fn unknown_id_renders_not_found_and_nothing_else() {
        let app = App::with_dataset(bundled_junctions().unwrap(), Route::Junction("zzz".into()));
        let text = render_to_text(&app);

        assert!(text.contains("Junction not found"));
        assert!(!text.contains("Device ID"));
        assert!(!text.contains("Straight"));
    }

    #[tokio::test]
    async fn live_detail_waits_for_its_junction() {
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        let mut app = App::live(client, "http://127.0.0.1:9".to_string(), Route::Junction("t".into()));
        let text = render_to_text(&app);

        assert!(text.contains("waiting for junction t"));
        app.shutdown();
    }
}
