//! The game renderer functions.

use crate::app::AppGame;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    prelude::Frame,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use std::time::Duration;
use visweeper::{field::cell::Cell, MinesweeperStatus};

const HIDDEN_CELL_SYMBOL: &str = "·";
const FLAG_SYMBOL: &str = "⚑";
const MINE_SYMBOL: &str = "⁘";
const DEFUSED_MINE_SYMBOL: &str = "◎";
const VICTORY_TEXT: &str = "Win!";
const LOSS_TEXT: &str = "Game Over";

const DEFAULT_FRAME_COLOR: Color = Color::DarkGray;
const VICTORY_COLOR: Color = Color::LightGreen;
const LOSS_COLOR: Color = Color::LightRed;
const HIDDEN_CELL_COLOR: Color = Color::DarkGray;
const FLAG_COLOR: Color = Color::LightYellow;
const HIGHLIGHT_COLOR: Color = Color::LightYellow;
const CHEAT_HIGHLIGHT_COLOR: Color = Color::LightCyan;
const PROGRESS_DONE_COLOR: Color = Color::LightYellow;
const PROGRESS_LEFT_COLOR: Color = Color::DarkGray;

/// The frame's borders, the two lines of the banner and the line separating the banner from the field.
const FRAME_OVERHEAD_HEIGHT: u16 = 5;
/// The frame's borders and the space in front of the first column.
const FRAME_OVERHEAD_WIDTH: u16 = 3;
/// Every cell takes its symbol and a space.
const CELL_WIDTH: u16 = 2;

/// The help entries: the highlighted key and the rest of the word.
const HELP: [(&str, &str); 5] = [("d", "etonate"), ("f", "lag"), ("r", "estart"), ("q", "uit"), ("?", " help")];
const CHEAT_HELP: [(&str, &str); 2] = [("s", "how mines"), ("w", "in")];

pub fn render_game(app: &mut AppGame, frame: &mut Frame) {
    let root = frame.size();
    let status = app.game.get_status();
    let is_over = app.game.is_game_over();

    let help = if app.show_help || is_over {
        build_help_lines(app.config.cheat)
    } else {
        vec![]
    };

    // fit as much of the field as the terminal allows, leaving the room for the help
    app.set_visible_size(
        root.height
            .saturating_sub(FRAME_OVERHEAD_HEIGHT + help.len() as u16)
            .min(u8::MAX as u16) as u8,
        (root.width.saturating_sub(FRAME_OVERHEAD_WIDTH) / CELL_WIDTH).min(u8::MAX as u16) as u8,
    );

    let (visible_rows_amount, visible_columns_amount) = app.visible_size;
    let banner_width = visible_columns_amount as u16 * CELL_WIDTH + 1;

    let frame_container = centered(
        root,
        banner_width + 2,
        visible_rows_amount as u16 + FRAME_OVERHEAD_HEIGHT + help.len() as u16,
    );

    let [frame_container, help_container] = split_vertically(
        frame_container,
        [
            Constraint::Length(visible_rows_amount as u16 + FRAME_OVERHEAD_HEIGHT),
            Constraint::Min(0),
        ],
    );

    let frame_color = match status {
        MinesweeperStatus::End(true) => VICTORY_COLOR,
        MinesweeperStatus::End(false) => LOSS_COLOR,
        _ => DEFAULT_FRAME_COLOR,
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(frame_color));
    let inner = block.inner(frame_container);
    frame.render_widget(block, frame_container);

    let [banner_container, separator_container, field_container] = split_vertically(
        inner,
        [Constraint::Length(2), Constraint::Length(1), Constraint::Min(0)],
    );

    let banner = if is_over {
        build_game_over_banner(app)
    } else {
        build_banner(app, banner_width as usize)
    };

    frame.render_widget(Paragraph::new(banner), banner_container);
    frame.render_widget(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(frame_color)),
        separator_container,
    );
    frame.render_widget(Paragraph::new(build_field_lines(app)), field_container);
    frame.render_widget(Paragraph::new(help), help_container);
}

fn split_vertically<const N: usize>(container: Rect, constraints: [Constraint; N]) -> [Rect; N] {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(container);

    std::array::from_fn(|i| layout[i])
}

/// A rectangle of the given size (or smaller, if it doesn't fit) in the middle of the container.
fn centered(container: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(container.width);
    let height = height.min(container.height);

    Rect::new(
        container.x + (container.width - width) / 2,
        container.y + (container.height - height) / 2,
        width,
        height,
    )
}

/// The first line shows the flags and the mines on the left and the clock on the right. The second one is the progress
/// bar with the count prefix written in it, unless there's a message to flash.
fn build_banner(app: &mut AppGame, width: usize) -> Vec<Line<'static>> {
    let game = &app.game;

    let flags = format!("{}/{}", game.flags_amount(), game.mines_amount());
    let clock = format_duration(game.elapsed_time());
    let gap = width.saturating_sub(flags.chars().count() + clock.chars().count());
    let first_line = Line::from(format!("{flags}{}{clock}", " ".repeat(gap)));

    let second_line = match app.message.take() {
        Some(message) => Line::from(Span::styled(message, Style::default().fg(LOSS_COLOR).bg(Color::White)))
            .alignment(Alignment::Center),
        None => {
            let safe_cells = game.rows() as u32 * game.columns() as u32 - game.mines_amount() as u32;
            let progress = if safe_cells > 0 {
                game.revealed_cells() as f64 / safe_cells as f64
            } else {
                0.0
            };

            let done_width = ((progress * width as f64) as usize).min(width);
            let text: Vec<char> = format!("{:<width$}", app.count_prefix).chars().collect();
            let (done, left) = text.split_at(done_width.min(text.len()));

            Line::from(vec![
                Span::styled(
                    done.iter().collect::<String>(),
                    Style::default().fg(Color::Black).bg(PROGRESS_DONE_COLOR),
                ),
                Span::styled(
                    left.iter().collect::<String>(),
                    Style::default().fg(Color::Black).bg(PROGRESS_LEFT_COLOR),
                ),
            ])
        }
    };

    vec![first_line, second_line]
}

fn build_game_over_banner(app: &AppGame) -> Vec<Line<'static>> {
    let (text, color) = if app.game.is_game_won() {
        (VICTORY_TEXT, VICTORY_COLOR)
    } else {
        (LOSS_TEXT, LOSS_COLOR)
    };

    vec![
        Line::from(Span::styled(text, Style::default().fg(color))).alignment(Alignment::Center),
        Line::from(format_duration(app.game.elapsed_time())).alignment(Alignment::Right),
    ]
}

/// The visible part of the field, a line per row.
fn build_field_lines(app: &AppGame) -> Vec<Line<'static>> {
    let (visible_rows_amount, visible_columns_amount) = app.visible_size;
    let (row_offset, column_offset) = app.window_offset;

    (row_offset..row_offset + visible_rows_amount)
        .map(|row_index| {
            let mut spans = vec![Span::raw(" ")];

            for column_index in column_offset..column_offset + visible_columns_amount {
                let Some(cell) = app.game.get_field().get_cell((row_index, column_index)) else {
                    continue;
                };

                let mut span = build_cell_span(cell, app);
                if app.cursor_position == (row_index, column_index) {
                    span = Span::styled(span.content, Style::default().fg(Color::Black).bg(Color::White));
                }

                spans.push(span);
                spans.push(Span::raw(" "));
            }

            Line::from(spans)
        })
        .collect()
}

/// Mines are shown once the game is over or when peeking at them. The flags that turn out to be right go green.
fn build_cell_span(cell: &Cell, app: &AppGame) -> Span<'static> {
    let is_over = app.game.is_game_over();

    if cell.is_flagged() {
        let color = if is_over && cell.is_mine() {
            VICTORY_COLOR
        } else {
            FLAG_COLOR
        };

        return Span::styled(FLAG_SYMBOL, Style::default().fg(color));
    }

    if (app.show_mines || is_over) && cell.is_mine() {
        return if app.game.is_game_won() {
            Span::styled(DEFUSED_MINE_SYMBOL, Style::default().fg(Color::White))
        } else {
            Span::styled(MINE_SYMBOL, Style::default().fg(LOSS_COLOR))
        };
    }

    if cell.is_revealed() {
        return match cell.neighbor_mines() {
            0 => Span::raw(" "),
            n => Span::styled(n.to_string(), Style::default().fg(number_color(n as usize))),
        };
    }

    Span::styled(HIDDEN_CELL_SYMBOL, Style::default().fg(HIDDEN_CELL_COLOR))
}

fn build_help_lines(cheat: bool) -> Vec<Line<'static>> {
    let cheat_help: &[(&str, &str)] = if cheat { &CHEAT_HELP } else { &[] };

    HELP.iter()
        .map(|entry| (entry, HIGHLIGHT_COLOR))
        .chain(cheat_help.iter().map(|entry| (entry, CHEAT_HIGHLIGHT_COLOR)))
        .map(|((key, rest), color)| Line::from(vec![Span::raw(*key).fg(color), Span::raw(*rest)]))
        .collect()
}

/// The colors of the numbers of mines around, also used for the ranks.
pub fn number_color(n: usize) -> Color {
    match n {
        1 => Color::LightBlue,
        2 => Color::LightGreen,
        3 => Color::LightRed,
        4 => Color::LightMagenta,
        5 => Color::LightCyan,
        6 => Color::LightYellow,
        7 => Color::White,
        8 => Color::LightRed,
        _ => Color::DarkGray,
    }
}

/// Formats the duration as `MM:SS`.
pub fn format_duration(duration: Duration) -> String {
    let seconds = duration.as_secs();
    format!("{:0>2}:{:0>2}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod test {
    use super::{centered, format_duration, number_color};
    use ratatui::{layout::Rect, style::Color};
    use std::time::Duration;

    #[test]
    fn durations_are_formatted_as_minutes_and_seconds() {
        assert_eq!(format_duration(Duration::ZERO), "00:00");
        assert_eq!(format_duration(Duration::from_millis(59_999)), "00:59");
        assert_eq!(format_duration(Duration::from_secs(61)), "01:01");
        assert_eq!(format_duration(Duration::from_secs(100 * 60 + 5)), "100:05");
    }

    #[test]
    fn unknown_numbers_are_grey() {
        assert_eq!(number_color(1), Color::LightBlue);
        assert_eq!(number_color(0), Color::DarkGray);
        assert_eq!(number_color(42), Color::DarkGray);
    }

    #[test]
    fn centered_never_leaves_the_container() {
        let container = Rect::new(0, 0, 80, 24);

        assert_eq!(centered(container, 20, 10), Rect::new(30, 7, 20, 10));
        assert_eq!(centered(container, 100, 30), container);
    }
}
