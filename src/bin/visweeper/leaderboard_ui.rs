//! The leaderboard renderer functions.

use crate::app::AppLeaderboard;
use crate::game_ui::{format_duration, number_color};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    prelude::Frame,
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Row, Table},
};
use visweeper::config::BoardSize;
use visweeper::leaderboard::Entry;

const UNFOCUSED_COLOR: Color = Color::DarkGray;
const PLACEHOLDER_COLOR: Color = Color::DarkGray;
const REJECTED_COLOR: Color = Color::LightRed;
const LEGEND_COLOR: Color = Color::DarkGray;

const PLACEHOLDER_TEXT: &str = "Player name";
const REJECTED_PLACEHOLDER_TEXT: &str = "Please enter a name";
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const TABLE_WIDTH: u16 = 64;
/// The name box: the borders, two lines of the message and the input line.
const NAME_BOX_HEIGHT: u16 = 5;
const LEGEND_TEXT: &str = "[tab] focus  [space] size  [r] play  [ctrl+d] clear  [q] quit";

pub fn render_leaderboard(app: &mut AppLeaderboard, frame: &mut Frame) {
    let root = frame.size();
    let name_box_height = if app.pending_time.is_some() { NAME_BOX_HEIGHT } else { 0 };

    let container = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(TABLE_WIDTH), Constraint::Min(0)])
        .split(root)[1];

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(name_box_height),
            Constraint::Length(1),
        ])
        .split(container);

    let accent = size_color(app.size);
    let table_color = if app.name_focused { UNFOCUSED_COLOR } else { accent };

    let block = Block::default()
        .title(Line::from(vec![
            Span::raw("High scores: "),
            Span::raw(app.size.to_string()).fg(accent),
        ]))
        .borders(Borders::ALL)
        .border_type(BorderType::Thick)
        .border_style(Style::default().fg(table_color));

    match &app.entries {
        Ok(entries) => {
            let table = build_table(entries, table_color, !app.name_focused).block(block);
            frame.render_stateful_widget(table, layout[0], &mut app.table_state);
        }
        Err(err) => {
            let table = Table::new(
                [Row::new([format!("Error getting leaderboard: {err}")])],
                [Constraint::Percentage(100)],
            )
            .header(Row::new(["Error"]).style(Style::default().add_modifier(Modifier::BOLD)))
            .block(block);
            frame.render_widget(table, layout[0]);
        }
    }

    if app.pending_time.is_some() {
        render_name_box(app, frame, layout[1], accent);
    }

    frame.render_widget(Paragraph::new(LEGEND_TEXT).fg(LEGEND_COLOR), layout[2]);
}

fn build_table(entries: &[Entry], color: Color, focused: bool) -> Table<'static> {
    let rows = entries.iter().map(|entry| {
        Row::new([
            Line::from(Span::styled(
                entry.rank.to_string(),
                Style::default().fg(number_color(entry.rank)),
            )),
            Line::from(entry.name.clone()),
            Line::from(format_duration(entry.time)),
            Line::from(entry.recorded_at.format(DATE_FORMAT).to_string()),
        ])
    });

    let highlight = if focused {
        Style::default().fg(Color::Black).bg(Color::White)
    } else {
        Style::default().bg(UNFOCUSED_COLOR)
    };

    Table::new(
        rows,
        [
            Constraint::Length(8),
            Constraint::Length(20),
            Constraint::Length(10),
            Constraint::Length(20),
        ],
    )
    .header(
        Row::new(["Rank", "Player", "Time", "Date"]).style(Style::default().fg(color).add_modifier(Modifier::BOLD)),
    )
    .highlight_style(highlight)
}

fn render_name_box(app: &AppLeaderboard, frame: &mut Frame, container: Rect, accent: Color) {
    let color = if app.name_focused { accent } else { UNFOCUSED_COLOR };
    let time = app.pending_time.map(format_duration).unwrap_or_default();

    let input = if app.name.is_empty() {
        let (text, color) = if app.name_rejected {
            (REJECTED_PLACEHOLDER_TEXT, REJECTED_COLOR)
        } else {
            (PLACEHOLDER_TEXT, PLACEHOLDER_COLOR)
        };

        Line::from(Span::raw(text).fg(color))
    } else {
        Line::from(app.name.clone())
    };

    let input = if app.name_focused {
        let mut spans = input.spans;
        spans.insert(0, Span::raw("> "));
        Line::from(spans)
    } else {
        input
    };

    let lines = vec![
        Line::from(format!("Your time: {time}")),
        Line::from("Type your name and press enter to submit!"),
        input,
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Thick)
        .border_style(Style::default().fg(color));

    frame.render_widget(Paragraph::new(lines).block(block), container);
}

fn size_color(size: BoardSize) -> Color {
    match size {
        BoardSize::Small => Color::LightGreen,
        BoardSize::Medium => Color::LightYellow,
        BoardSize::Large => Color::LightRed,
        BoardSize::ExtraLarge => Color::LightMagenta,
    }
}
