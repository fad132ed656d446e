//! UI rendering

use super::app::App;
use booksearch_core::{DetailState, EmptyState, Highlighter};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};
use std::time::{Duration, Instant};
use unicode_width::UnicodeWidthStr;

/// Render the entire UI
pub fn render(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search input
            Constraint::Min(5),    // Results + detail
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[1]);

    render_search_input(frame, app, chunks[0]);
    render_results(frame, app, body[0]);
    render_detail(frame, app, body[1]);
    render_status_bar(frame, app, chunks[2]);
}

fn render_search_input(frame: &mut Frame, app: &App, area: Rect) {
    let cursor_style = Style::default().fg(Color::White).bg(Color::DarkGray);
    let text_style = Style::default().fg(Color::White);

    // Split the input at cursor position
    let (before, after) = app.search_input.text.split_at(app.search_input.cursor);
    let cursor_char = after.chars().next();
    let after_cursor = cursor_char.map_or("", |c| &after[c.len_utf8()..]);

    let mut spans = vec![Span::styled("▌ ", Style::default().fg(Color::Yellow))];
    if !before.is_empty() {
        spans.push(Span::styled(before, text_style));
    }
    // Block cursor on the character under it, or a bar at the end
    match cursor_char {
        Some(c) => spans.push(Span::styled(c.to_string(), cursor_style)),
        None => spans.push(Span::styled("█", text_style)),
    }
    if !after_cursor.is_empty() {
        spans.push(Span::styled(after_cursor, text_style));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Search ");
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_results(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Results ");

    let controller = &app.controller;
    if let Some(empty) = controller.empty_state() {
        let line = match empty {
            EmptyState::Loading => Line::from(vec![
                Span::styled(
                    format!("{} ", spinner_frame(app.started_at)),
                    Style::default().fg(Color::Yellow),
                ),
                Span::styled(empty.message(), Style::default().fg(Color::DarkGray)),
            ]),
            EmptyState::NoResults => {
                Line::styled(empty.message(), Style::default().fg(Color::DarkGray))
            }
        };
        frame.render_widget(Paragraph::new(line).block(block), area);
        return;
    }

    let highlighter = Highlighter::new(&controller.highlight_term());
    let selected_id = controller.selected().and_then(|m| m.record_id);
    let match_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let items: Vec<ListItem> = controller
        .results()
        .iter()
        .map(|m| {
            let mut spans: Vec<Span> = highlighter
                .segments(&m.original_entry)
                .into_iter()
                .map(|s| {
                    if s.highlighted {
                        Span::styled(s.text.to_string(), match_style)
                    } else {
                        Span::raw(s.text.to_string())
                    }
                })
                .collect();
            if !m.attribute.is_empty() {
                spans.push(Span::styled(
                    format!("  {}", m.attribute),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            if selected_id.is_some() && m.record_id == selected_id {
                spans.push(Span::styled(" ●", Style::default().fg(Color::Green)));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");

    app.list_state.select(app.controller.cursor());
    frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn render_detail(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Detail ");
    let dim = Style::default().fg(Color::DarkGray);

    let lines: Vec<Line> = match app.controller.detail() {
        DetailState::Idle => vec![Line::styled("Press Enter to load the selected result", dim)],
        DetailState::Loading { id } => vec![Line::from(vec![
            Span::styled(
                format!("{} ", spinner_frame(app.started_at)),
                Style::default().fg(Color::Yellow),
            ),
            Span::styled(format!("Loading record {id}..."), dim),
        ])],
        DetailState::Failed { id, message } => vec![
            Line::styled(
                format!("Could not load record {id}"),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Line::styled(message.clone(), Style::default().fg(Color::Red)),
        ],
        DetailState::Loaded { record, .. } => {
            let width = record.keys().map(|k| k.width()).max().unwrap_or(0);
            record
                .iter()
                .map(|(key, value)| {
                    let pad = " ".repeat(width - key.width());
                    Line::from(vec![
                        Span::styled(key.clone(), Style::default().add_modifier(Modifier::BOLD)),
                        Span::raw(format!("{pad}  {value}")),
                    ])
                })
                .collect()
        }
    };

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let dim = Style::default().fg(Color::DarkGray);
    let bracket = Style::default().fg(Color::DarkGray);
    let controller = &app.controller;

    let count = controller.results().len();
    let mut spans = vec![Span::styled(
        format!(" {} result{}", count, if count == 1 { "" } else { "s" }),
        Style::default().fg(Color::Cyan),
    )];

    if let Some(duration) = controller.last_duration() {
        spans.push(Span::styled(format!(" │ {}", format_duration(duration)), dim));
    }

    spans.extend([
        Span::styled(" [", bracket),
        Span::styled("↑↓ move", dim),
        Span::styled("] [", bracket),
        Span::styled("Enter select", dim),
        Span::styled("] [", bracket),
        Span::styled("Esc quit", dim),
        Span::styled("]", bracket),
    ]);

    match controller.last_error() {
        Some(error) => spans.push(Span::styled(
            format!(" {error}"),
            Style::default().fg(Color::Red),
        )),
        None => spans.push(Span::styled(format!(" {}", app.api_url), dim)),
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn spinner_frame(started_at: Instant) -> &'static str {
    const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
    let elapsed = started_at.elapsed().as_millis() / 80;
    FRAMES[(elapsed as usize) % FRAMES.len()]
}

fn format_duration(d: Duration) -> String {
    let micros = d.as_micros();
    if micros < 1000 {
        format!("{}µs", micros)
    } else {
        format!("{:.1}ms", micros as f64 / 1000.0)
    }
}
