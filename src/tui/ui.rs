//! UI rendering functions for the TUI.
//!
//! Search bar on top, note list on the left, and a detail panel on the right
//! made of a summary with the color swatch, the radar chart and the comments.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span, Text},
    widgets::{
        Block, Borders, List, ListItem, ListState, Paragraph, Wrap,
        canvas::{Canvas, Circle, Line as CanvasLine, Points},
    },
};

use super::app::{App, Focus};
use crate::color::{self, Rgb};
use crate::models::TastingNote;
use crate::radar::{LABEL_DISTANCE, RadarChart};
use crate::utils::format_date;

/// Canvas bounds leave room for the labels outside the unit circle.
const CHART_BOUNDS: f64 = LABEL_DISTANCE + 0.35;

/// Main rendering function for the TUI.
pub fn draw(frame: &mut Frame, app: &App) {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search input
            Constraint::Min(0),    // Content area
            Constraint::Length(1), // Shortcut bar
        ])
        .split(frame.area());

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(main_chunks[1]);

    render_search_input(frame, app, main_chunks[0]);
    render_note_list(frame, app, content_chunks[0]);
    render_detail_view(frame, app, content_chunks[1]);
    render_shortcut_bar(frame, app, main_chunks[2]);
}

fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

fn render_search_input(frame: &mut Frame, app: &App, area: Rect) {
    let is_focused = matches!(app.focus(), Focus::SearchInput);

    let connectivity = if app.is_online() {
        Span::styled(" online ", Style::default().fg(Color::Green))
    } else {
        Span::styled(" offline ", Style::default().fg(Color::DarkGray))
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Search")
        .title_top(Line::from(connectivity).right_aligned())
        .border_style(border_style(is_focused));

    let mut content = app.search_input().to_string();
    if is_focused {
        content.push('█');
    }

    frame.render_widget(Paragraph::new(content).block(block), area);
}

/// One list row: color badge, name, date and score, plus a dot for notes
/// that are not synced yet.
fn note_list_line(note: &TastingNote) -> Line<'static> {
    let badge = color::badge(note.color);
    let mut spans = vec![
        Span::styled("■ ", Style::default().fg(to_color(badge.rgb()))),
        Span::raw(note.display_name().to_string()),
        Span::raw(" "),
        Span::styled(
            format!("[{} | {}]", format_date(note.date), score_label(note)),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ),
    ];
    if !note.is_synced {
        spans.push(Span::styled(" •", Style::default().fg(Color::Yellow)));
    }
    Line::from(spans)
}

fn score_label(note: &TastingNote) -> String {
    if note.score.trim().is_empty() {
        "no score".to_string()
    } else {
        format!("{} pts", note.score)
    }
}

fn render_note_list(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Notes ({})", app.notes().len()))
        .border_style(border_style(matches!(app.focus(), Focus::NoteList)));

    let items: Vec<ListItem> = app
        .notes()
        .iter()
        .map(|note| ListItem::new(note_list_line(note)))
        .collect();

    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::REVERSED),
    );

    let mut list_state = ListState::default();
    list_state.select(app.selected_index());

    frame.render_stateful_widget(list, area, &mut list_state);
}

fn render_detail_view(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Detail")
        .border_style(border_style(matches!(app.focus(), Focus::DetailView)));

    let Some(note) = app.selected_note() else {
        frame.render_widget(Paragraph::new("No note selected").block(block), area);
        return;
    };

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),      // Summary
            Constraint::Percentage(55), // Radar chart
            Constraint::Min(0),         // Comments
        ])
        .split(inner);

    frame.render_widget(Paragraph::new(summary_text(note)), sections[0]);
    render_radar(frame, app, note, sections[1]);
    frame.render_widget(
        Paragraph::new(comments_text(note))
            .wrap(Wrap { trim: false })
            .scroll((app.detail_scroll(), 0)),
        sections[2],
    );
}

fn summary_text(note: &TastingNote) -> Text<'static> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let stop = color::closest_stop(note.color);

    Text::from(vec![
        Line::from(Span::styled(note.display_name().to_string(), bold)),
        Line::from(vec![
            Span::styled("Date: ", bold),
            Span::raw(format_date(note.date)),
            Span::styled("  ABV: ", bold),
            Span::raw(note.abv.clone()),
            Span::styled("  Score: ", bold),
            Span::raw(note.score.clone()),
        ]),
        Line::from(vec![
            Span::styled("Color: ", bold),
            Span::styled("████", Style::default().fg(to_color(stop.rgb))),
            Span::raw(format!(" {} ({:.1})", stop.label, note.color)),
        ]),
        Line::from(vec![
            Span::styled("Character: ", bold),
            Span::raw(
                note.characters
                    .iter()
                    .map(|c| format!("{}/{} {}", c.left_label, c.right_label, c.value))
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
        ]),
        Line::from(vec![
            Span::styled("Synced: ", bold),
            Span::raw(if note.is_synced { "yes" } else { "no" }),
        ]),
    ])
}

fn comments_text(note: &TastingNote) -> Text<'static> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let c = &note.comments;
    let mut text = Text::default();

    for (label, body) in [
        ("Nose", &c.nose),
        ("Palate", &c.palate),
        ("Finish", &c.finish),
        ("Overall", &c.overall),
    ] {
        if body.is_empty() {
            continue;
        }
        text.lines.push(Line::from(Span::styled(format!("{label}:"), bold)));
        text.lines.push(Line::from(body.clone()));
    }

    if text.lines.is_empty() {
        text.lines.push(Line::from(Span::styled(
            "No comments",
            Style::default().fg(Color::DarkGray),
        )));
    }
    text
}

/// Draws the radar chart for the selected intensity group.
///
/// Layout geometry is y-down; the canvas is y-up, so every `y` is negated.
fn render_radar(frame: &mut Frame, app: &App, note: &TastingNote, area: Rect) {
    let (values, tags) = app.chart().values(note);
    let layout = RadarChart::default().layout(&values, tags);

    let canvas = Canvas::default()
        .block(
            Block::default()
                .borders(Borders::TOP)
                .title(format!("{} (c: switch)", app.chart().title())),
        )
        .marker(Marker::Braille)
        .x_bounds([-CHART_BOUNDS, CHART_BOUNDS])
        .y_bounds([-CHART_BOUNDS, CHART_BOUNDS])
        .paint(move |ctx| {
            for ring in &layout.rings {
                ctx.draw(&Circle {
                    x: 0.0,
                    y: 0.0,
                    radius: ring.radius,
                    color: Color::DarkGray,
                });
            }
            for axis in &layout.axes {
                ctx.draw(&CanvasLine::new(0.0, 0.0, axis.end.x, -axis.end.y, Color::Gray));
            }
            ctx.layer();

            for (from, to) in layout.edges() {
                ctx.draw(&CanvasLine::new(from.x, -from.y, to.x, -to.y, Color::Cyan));
            }
            let markers: Vec<(f64, f64)> = layout.markers.iter().map(|p| (p.x, -p.y)).collect();
            ctx.draw(&Points {
                coords: &markers,
                color: Color::White,
            });

            for axis in &layout.axes {
                let label = match &axis.annotation {
                    Some(tags) => format!("{} ({tags})", axis.label),
                    None => axis.label.clone(),
                };
                ctx.print(
                    axis.label_anchor.x,
                    -axis.label_anchor.y,
                    Span::styled(label, Style::default().fg(Color::Yellow)),
                );
            }
        });

    frame.render_widget(canvas, area);
}

fn render_shortcut_bar(frame: &mut Frame, app: &App, area: Rect) {
    let key_style = Style::default().fg(Color::Cyan);
    let sep_style = Style::default().fg(Color::DarkGray);

    let mut shortcuts = vec![("Ctrl+C", "quit"), ("Tab", "next panel"), ("Esc", "reset")];
    match app.focus() {
        Focus::SearchInput => shortcuts.push(("Enter", "to list")),
        Focus::NoteList | Focus::DetailView => shortcuts.extend([
            ("j/k", "navigate"),
            ("c", "chart"),
            ("s", "mark synced"),
            ("d", "delete"),
            ("o", "online"),
        ]),
    }

    let mut spans = Vec::new();
    for (i, (key, action)) in shortcuts.into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", sep_style));
        }
        spans.push(Span::styled(key, key_style));
        spans.push(Span::raw(format!(": {action}")));
    }
    if let Some(status) = app.status() {
        spans.push(Span::styled(" | ", sep_style));
        spans.push(Span::styled(status.to_string(), Style::default().fg(Color::Yellow)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NoteId;
    use ratatui::{Terminal, backend::TestBackend};

    fn create_test_app() -> App {
        let mut app = App::new();

        let mut talisker = TastingNote::new("Talisker 10");
        talisker.id = NoteId::new(1);
        talisker.score = "88".to_string();
        talisker.color = 1.5;
        talisker.comments.nose = "sea spray".to_string();

        let mut blank = TastingNote::new("");
        blank.id = NoteId::new(2);
        blank.is_synced = true;

        app.set_notes(vec![talisker, blank]);
        app
    }

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();

        let buffer = terminal.backend().buffer();
        let mut screen = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                screen.push_str(buffer[(x, y)].symbol());
            }
            screen.push('\n');
        }
        screen
    }

    #[test]
    fn list_shows_names_and_count() {
        let screen = render(&create_test_app());

        assert!(screen.contains("Notes (2)"));
        assert!(screen.contains("Talisker 10"));
        assert!(screen.contains("Untitled"));
        assert!(screen.contains("88 pts"));
        assert!(screen.contains("offline"));
    }

    #[test]
    fn detail_shows_placeholder_without_selection() {
        let screen = render(&create_test_app());
        assert!(screen.contains("No note selected"));
    }

    #[test]
    fn detail_shows_summary_chart_and_comments() {
        let mut app = create_test_app();
        app.select_next();

        let screen = render(&app);

        assert!(screen.contains("Color:"));
        assert!(screen.contains("Amber"));
        assert!(screen.contains("Aroma (c: switch)"));
        assert!(screen.contains("Spice"));
        assert!(screen.contains("sea spray"));
    }

    #[test]
    fn chart_title_follows_selected_group() {
        let mut app = create_test_app();
        app.select_next();
        app.cycle_chart();

        let screen = render(&app);
        assert!(screen.contains("Palate (c: switch)"));
        assert!(screen.contains("Umami"));
    }

    #[test]
    fn list_line_marks_unsynced_notes() {
        let app = create_test_app();

        let unsynced = note_list_line(&app.notes()[0]);
        let synced = note_list_line(&app.notes()[1]);

        assert!(unsynced.spans.iter().any(|s| s.content.contains('•')));
        assert!(!synced.spans.iter().any(|s| s.content.contains('•')));
    }

    #[test]
    fn status_message_appears_in_shortcut_bar() {
        let mut app = create_test_app();
        app.set_status("Deleted Talisker 10");

        assert!(render(&app).contains("Deleted Talisker 10"));
    }
}
