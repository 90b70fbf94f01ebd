use chrono::Utc;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};

use super::app::{App, DisplayItem, InputField, InputMode};
use crate::api::DeadlineApi;
use crate::commands::EMPTY_SCALE_MESSAGE;
use crate::models::{format_date_for_showing, format_time_left};
use crate::timescale::{calculate_time_scale, TimeScale};

pub fn ui<A>(f: &mut Frame, app: &mut App<A>)
where
    A: DeadlineApi + Clone + 'static,
{
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Table
            Constraint::Length(5), // Selected card
            Constraint::Length(3), // Help
        ])
        .split(f.area());

    let now = Utc::now();
    let rows: Vec<Row> = app
        .display_items
        .iter()
        .map(|item| match item {
            DisplayItem::ScaleHeader(scale, count) => Row::new(vec![
                Cell::from(format!("{} ({})", scale.label(), count)),
            ])
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            DisplayItem::Empty => Row::new(vec![Cell::from(format!("  {EMPTY_SCALE_MESSAGE}"))])
                .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC)),
            DisplayItem::Deadline(d) => Row::new(vec![
                Cell::from(format!("  {}", d.title)),
                Cell::from(d.description.clone()),
                Cell::from(format_date_for_showing(d.end_date)),
                Cell::from(format_time_left(d.end_date, now)),
            ])
            .style(scale_style(calculate_time_scale(d.end_date, now))),
        })
        .collect();

    let widths = [
        Constraint::Min(24),
        Constraint::Min(20),
        Constraint::Length(32),
        Constraint::Length(10),
    ];

    let title = if app.is_busy() {
        "Deadlines (syncing...)"
    } else {
        "Deadlines"
    };
    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["Title", "Description", "Due", "Time Left"])
                .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                .bottom_margin(1),
        )
        .block(Block::default().borders(Borders::ALL).title(title))
        .row_highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
        .highlight_symbol(">> ");

    f.render_stateful_widget(table, chunks[0], &mut app.state);

    let card = match app.selected_deadline() {
        Some(d) => format!(
            "{}\n{}\nDeadline for this goal is {}.",
            d.title,
            d.description,
            format_date_for_showing(d.end_date)
        ),
        None => String::new(),
    };
    let card = Paragraph::new(card)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Selected"));
    f.render_widget(card, chunks[1]);

    let (help_text, help_style) = match (&app.notification, app.input_mode) {
        (Some(message), _) => (message.as_str(), Style::default().fg(Color::Red)),
        (None, InputMode::Normal) => (
            "q: Quit | a: Add | e: Edit | d: Delete | r: Reload | j/k: Move",
            Style::default().fg(Color::Gray),
        ),
        (None, _) => ("Enter: Next / Submit | Esc: Cancel", Style::default().fg(Color::Gray)),
    };
    let help = Paragraph::new(help_text)
        .style(help_style)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);

    if app.input_mode != InputMode::Normal {
        let area = centered_rect(60, 3, f.area());
        f.render_widget(Clear, area);

        let action = if app.input_mode == InputMode::Adding {
            "Create a new deadline"
        } else {
            "Update deadline"
        };
        let prompt = match app.input_field {
            InputField::Title => "Deadline name",
            InputField::Description => "Deadline description",
            InputField::Due => "Due (YYYY-MM-DD, today, tomorrow, 3d, week)",
        };
        let input = Paragraph::new(app.input_buffer.as_str())
            .style(Style::default().fg(Color::Yellow))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("{action}: {prompt}")),
            );
        f.render_widget(input, area);
    }
}

fn scale_style(scale: TimeScale) -> Style {
    let color = match scale {
        TimeScale::Finished => Color::DarkGray,
        TimeScale::Day | TimeScale::ThreeDays => Color::Red,
        TimeScale::Week => Color::Yellow,
        TimeScale::Month | TimeScale::Year | TimeScale::LongerThanYear => Color::Green,
    };
    Style::default().fg(color)
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let margin = r.height.saturating_sub(height) / 2;
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(margin),
            Constraint::Length(height),
            Constraint::Length(margin),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
