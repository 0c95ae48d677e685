use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::canvas::{Canvas, Line as GridLine};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph};
use ratatui::Frame;
use shared::classify::classify;
use shared::constants::{map_span_lng, ALERT_SLOT_ROWS, MAP_CENTER_LAT, MAP_CENTER_LNG};

use crate::app::{App, Focus};

use super::{draw_footer, draw_header, hue_color};

pub fn draw(f: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(10), Constraint::Length(3)])
        .split(f.area());

    draw_header(f, app, rows[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(68), Constraint::Percentage(32)])
        .split(rows[1]);

    if app.is_live() && !app.connected {
        draw_connecting(f, body[0]);
    } else {
        draw_canvas(f, app, body[0]);
    }
    draw_side_panel(f, app, body[1]);
    draw_alert_stack(f, app, body[0]);

    let hints = match app.focus {
        Focus::Markers => " ↑/↓ select junction · Enter open · Tab alerts · q quit ",
        Focus::Alerts => " ↑/↓ select alert · Enter open junction · d dismiss · Tab markers · q quit ",
    };
    draw_footer(f, hints, rows[2]);
}

fn draw_connecting(f: &mut Frame, area: Rect) {
    let placeholder = Paragraph::new("Connecting to live traffic data...")
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL).title(" Junction Map "));
    f.render_widget(placeholder, area);
}

fn draw_canvas(f: &mut Frame, app: &App, area: Rect) {
    let span_lng = map_span_lng();
    let span_lat = span_lng * 0.55;
    let x_bounds = [MAP_CENTER_LNG - span_lng / 2.0, MAP_CENTER_LNG + span_lng / 2.0];
    let y_bounds = [MAP_CENTER_LAT - span_lat / 2.0, MAP_CENTER_LAT + span_lat / 2.0];

    let canvas = Canvas::default()
        .block(Block::default().borders(Borders::ALL).title(" Junction Map "))
        .marker(Marker::Braille)
        .x_bounds(x_bounds)
        .y_bounds(y_bounds)
        .paint(|ctx| {
            // Graticule standing in for the tile layer.
            for step in 1..4 {
                let x = x_bounds[0] + span_lng * f64::from(step) / 4.0;
                let y = y_bounds[0] + span_lat * f64::from(step) / 4.0;
                ctx.draw(&GridLine {
                    x1: x,
                    y1: y_bounds[0],
                    x2: x,
                    y2: y_bounds[1],
                    color: Color::DarkGray,
                });
                ctx.draw(&GridLine {
                    x1: x_bounds[0],
                    y1: y,
                    x2: x_bounds[1],
                    y2: y,
                    color: Color::DarkGray,
                });
            }

            ctx.layer();

            for (index, junction) in app.junctions.iter().enumerate() {
                let treatment = classify(junction.congestion);
                let selected = app.focus == Focus::Markers && index == app.marker_cursor;
                let style = if selected {
                    Style::default()
                        .fg(hue_color(treatment.marker))
                        .add_modifier(Modifier::BOLD | Modifier::REVERSED)
                } else {
                    Style::default().fg(hue_color(treatment.marker))
                };

                let mut spans = vec![Span::styled("◉", style)];
                if selected {
                    spans.push(Span::styled(
                        format!(" {}", junction.name),
                        Style::default().fg(Color::White),
                    ));
                }
                ctx.print(junction.lng, junction.lat, TextLine::from(spans));
            }
        });
    f.render_widget(canvas, area);
}

fn draw_side_panel(f: &mut Frame, app: &App, area: Rect) {
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(8)])
        .split(area);

    let items: Vec<ListItem> = app
        .junctions
        .iter()
        .map(|junction| {
            let treatment = classify(junction.congestion);
            ListItem::new(TextLine::from(vec![
                Span::styled("■ ", Style::default().fg(hue_color(treatment.marker))),
                Span::raw(junction.name.clone()),
            ]))
        })
        .collect();

    let mut state = ListState::default();
    if !app.junctions.is_empty() && app.focus == Focus::Markers {
        state.select(Some(app.marker_cursor));
    }

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" Junctions "))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("» ");
    f.render_stateful_widget(list, parts[0], &mut state);

    draw_tooltip(f, app, parts[1]);
}

// The marker tooltip: name, id, congestion, vehicle count for whichever
// junction is selected.
fn draw_tooltip(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Selected junction ");

    let Some(junction) = app.selected_junction() else {
        let empty = Paragraph::new("No junctions on the map yet.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(empty, area);
        return;
    };

    let treatment = classify(junction.congestion);
    let lines = vec![
        TextLine::from(Span::styled(
            junction.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        TextLine::from(format!("Junction ID: {}", junction.id)),
        TextLine::from(vec![
            Span::raw("Congestion: "),
            Span::styled(
                junction.congestion.to_string(),
                Style::default().fg(hue_color(treatment.accent)),
            ),
        ]),
        TextLine::from(format!("Vehicles count: {}", junction.vehicle_count)),
    ];
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_alert_stack(f: &mut Frame, app: &App, area: Rect) {
    let width = area.width.saturating_sub(6).min(44);
    if width < 10 {
        return;
    }

    for (index, alert) in app.alerts.alerts().iter().enumerate() {
        let y = area.y + 1 + index as u16 * ALERT_SLOT_ROWS;
        if y + 3 >= area.bottom() {
            break;
        }
        let slot = Rect {
            x: area.right().saturating_sub(width + 2),
            y,
            width,
            height: 3,
        };

        let focused = app.focus == Focus::Alerts && index == app.alert_cursor;
        let border = if focused {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Red)
        };

        f.render_widget(Clear, slot);
        let body = Paragraph::new(alert.message.clone())
            .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border)
                    .title(" ALERT "),
            );
        f.render_widget(body, slot);
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::render_to_text;
    use crate::app::App;
    use crate::router::Route;
    use shared::feed::bundled_junctions;

    #[test]
    fn static_map_lists_junctions_and_raises_the_alert_stack() {
        let app = App::with_dataset(bundled_junctions().unwrap(), Route::Map);
        let text = render_to_text(&app);

        assert!(text.contains("Junction Map"));
        assert!(text.contains("Anna Salai Junction"));
        assert!(text.contains("Mylapore Signal"));
        assert!(text.contains("ALERT"));
        assert!(text.contains("High congestion at Anna Salai Junction"));
    }

    #[test]
    fn tooltip_shows_the_selected_junction() {
        let app = App::with_dataset(bundled_junctions().unwrap(), Route::Map);
        let text = render_to_text(&app);

        assert!(text.contains("Junction ID: 1"));
        assert!(text.contains("Vehicles count: 94"));
    }

    #[tokio::test]
    async fn live_map_shows_the_connecting_placeholder_first() {
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        let mut app = App::live(client, "http://127.0.0.1:9".to_string(), Route::Map);
        let text = render_to_text(&app);

        assert!(text.contains("Connecting to live traffic data"));
        app.shutdown();
    }
}
