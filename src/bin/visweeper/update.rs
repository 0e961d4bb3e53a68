//! The terminal application updater.

use crate::app::{App, AppGame, AppLeaderboard, AppVariant};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use visweeper::MinesweeperError;

/// The available directions to move the cursor to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MoveCursorDirection {
    Up,
    Left,
    Down,
    Right,
}

/// What a key means during the game.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameControl {
    Move(MoveCursorDirection),
    Arrow(MoveCursorDirection),
    Count(char),
    Reveal,
    Flag,
    Restart,
    ToggleHelp,
    ToggleMines,
    ForceWin,
    Quit,
}

/// What a key means on the leaderboard.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LeaderboardControl {
    SwitchFocus,
    Type(char),
    Erase,
    Submit,
    SelectNext,
    SelectPrevious,
    CycleSize,
    Clear,
    Restart,
    Quit,
}

fn is_ctrl(key_event: &KeyEvent, c: char) -> bool {
    key_event.modifiers.contains(KeyModifiers::CONTROL) && key_event.code == KeyCode::Char(c)
}

pub fn game_control(key_event: KeyEvent) -> Option<GameControl> {
    use GameControl::*;
    use MoveCursorDirection::*;

    if is_ctrl(&key_event, 'c') {
        return Some(Quit);
    }

    let control = match key_event.code {
        KeyCode::Char('h') => Move(Left),
        KeyCode::Char('j') => Move(Down),
        KeyCode::Char('k') => Move(Up),
        KeyCode::Char('l') => Move(Right),
        KeyCode::Left => Arrow(Left),
        KeyCode::Down => Arrow(Down),
        KeyCode::Up => Arrow(Up),
        KeyCode::Right => Arrow(Right),
        KeyCode::Char(digit @ '0'..='9') => Count(digit),
        KeyCode::Char('d') | KeyCode::Char(' ') => Reveal,
        KeyCode::Char('f') => Flag,
        KeyCode::Char('r') => Restart,
        KeyCode::Char('?') => ToggleHelp,
        KeyCode::Char('s') => ToggleMines,
        KeyCode::Char('w') => ForceWin,
        KeyCode::Char('q') | KeyCode::Esc => Quit,
        _ => return None,
    };

    Some(control)
}

/// The name box takes all the printable characters, so the table's single-letter keys only work while the table is focused.
pub fn leaderboard_control(key_event: KeyEvent, name_focused: bool) -> Option<LeaderboardControl> {
    use LeaderboardControl::*;

    if is_ctrl(&key_event, 'c') || key_event.code == KeyCode::Esc {
        return Some(Quit);
    }

    if key_event.code == KeyCode::Tab {
        return Some(SwitchFocus);
    }

    if name_focused {
        return match key_event.code {
            KeyCode::Enter => Some(Submit),
            KeyCode::Backspace => Some(Erase),
            KeyCode::Char(c) if !key_event.modifiers.contains(KeyModifiers::CONTROL) => Some(Type(c)),
            _ => None,
        };
    }

    if is_ctrl(&key_event, 'd') {
        return Some(Clear);
    }

    match key_event.code {
        KeyCode::Char('q') => Some(Quit),
        KeyCode::Char(' ') => Some(CycleSize),
        KeyCode::Char('r') => Some(Restart),
        KeyCode::Down | KeyCode::Char('j') => Some(SelectNext),
        KeyCode::Up | KeyCode::Char('k') => Some(SelectPrevious),
        _ => None,
    }
}

pub fn update(app: &mut App, key_event: KeyEvent) -> Result<(), MinesweeperError> {
    match &mut app.variant {
        AppVariant::InGame(game) => {
            if let Some(control) = game_control(key_event) {
                update_game(game, control)?;
            }
        }
        AppVariant::InLeaderboard(board) => {
            if let Some(control) = leaderboard_control(key_event, board.name_focused) {
                update_leaderboard(board, control);
            }
        }
    };

    Ok(())
}

fn update_game(game: &mut AppGame, control: GameControl) -> Result<(), MinesweeperError> {
    match control {
        GameControl::Move(direction) => game.move_cursor(direction),
        GameControl::Arrow(direction) => game.move_cursor_with_arrow(direction),
        GameControl::Count(digit) => game.push_count_digit(digit),
        GameControl::Reveal => game.reveal(),
        GameControl::Flag => game.flag(),
        GameControl::Restart => game.restart()?,
        GameControl::ToggleHelp => game.toggle_help(),
        GameControl::ToggleMines => game.toggle_mines(),
        GameControl::ForceWin => game.force_win(),
        GameControl::Quit => game.quit(),
    };

    Ok(())
}

fn update_leaderboard(board: &mut AppLeaderboard, control: LeaderboardControl) {
    match control {
        LeaderboardControl::SwitchFocus => board.switch_focus(),
        LeaderboardControl::Type(c) => board.push_name_char(c),
        LeaderboardControl::Erase => board.pop_name_char(),
        LeaderboardControl::Submit => board.submit(),
        LeaderboardControl::SelectNext => board.select_next(),
        LeaderboardControl::SelectPrevious => board.select_previous(),
        LeaderboardControl::CycleSize => board.cycle_size(),
        LeaderboardControl::Clear => board.clear(),
        LeaderboardControl::Restart => board.restart(),
        LeaderboardControl::Quit => board.quit(),
    }
}

#[cfg(test)]
mod test {
    use super::MoveCursorDirection::*;
    use super::{game_control, leaderboard_control, GameControl, LeaderboardControl};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn vim_keys_move_the_cursor() {
        assert_eq!(game_control(key(KeyCode::Char('h'))), Some(GameControl::Move(Left)));
        assert_eq!(game_control(key(KeyCode::Char('j'))), Some(GameControl::Move(Down)));
        assert_eq!(game_control(key(KeyCode::Char('k'))), Some(GameControl::Move(Up)));
        assert_eq!(game_control(key(KeyCode::Char('l'))), Some(GameControl::Move(Right)));
    }

    #[test]
    fn arrows_are_told_apart() {
        assert_eq!(game_control(key(KeyCode::Left)), Some(GameControl::Arrow(Left)));
        assert_eq!(game_control(key(KeyCode::Up)), Some(GameControl::Arrow(Up)));
    }

    #[test]
    fn game_actions_are_mapped() {
        assert_eq!(game_control(key(KeyCode::Char('d'))), Some(GameControl::Reveal));
        assert_eq!(game_control(key(KeyCode::Char(' '))), Some(GameControl::Reveal));
        assert_eq!(game_control(key(KeyCode::Char('f'))), Some(GameControl::Flag));
        assert_eq!(game_control(key(KeyCode::Char('r'))), Some(GameControl::Restart));
        assert_eq!(game_control(key(KeyCode::Char('?'))), Some(GameControl::ToggleHelp));
        assert_eq!(game_control(key(KeyCode::Char('7'))), Some(GameControl::Count('7')));
        assert_eq!(game_control(key(KeyCode::Char('x'))), None);
    }

    #[test]
    fn every_quit_key_quits_the_game() {
        for event in [key(KeyCode::Char('q')), key(KeyCode::Esc), ctrl('c')] {
            assert_eq!(game_control(event), Some(GameControl::Quit));
        }
    }

    #[test]
    fn the_name_box_takes_the_letters() {
        assert_eq!(
            leaderboard_control(key(KeyCode::Char('q')), true),
            Some(LeaderboardControl::Type('q'))
        );
        assert_eq!(
            leaderboard_control(key(KeyCode::Char(' ')), true),
            Some(LeaderboardControl::Type(' '))
        );
        assert_eq!(leaderboard_control(key(KeyCode::Enter), true), Some(LeaderboardControl::Submit));
        assert_eq!(leaderboard_control(key(KeyCode::Backspace), true), Some(LeaderboardControl::Erase));
        assert_eq!(leaderboard_control(ctrl('d'), true), None);
    }

    #[test]
    fn the_table_takes_the_commands() {
        assert_eq!(leaderboard_control(key(KeyCode::Char('q')), false), Some(LeaderboardControl::Quit));
        assert_eq!(
            leaderboard_control(key(KeyCode::Char(' ')), false),
            Some(LeaderboardControl::CycleSize)
        );
        assert_eq!(leaderboard_control(key(KeyCode::Char('r')), false), Some(LeaderboardControl::Restart));
        assert_eq!(leaderboard_control(ctrl('d'), false), Some(LeaderboardControl::Clear));
        assert_eq!(leaderboard_control(key(KeyCode::Down), false), Some(LeaderboardControl::SelectNext));
    }

    #[test]
    fn tab_and_escape_work_everywhere() {
        for name_focused in [true, false] {
            assert_eq!(
                leaderboard_control(key(KeyCode::Tab), name_focused),
                Some(LeaderboardControl::SwitchFocus)
            );
            assert_eq!(leaderboard_control(key(KeyCode::Esc), name_focused), Some(LeaderboardControl::Quit));
            assert_eq!(leaderboard_control(ctrl('c'), name_focused), Some(LeaderboardControl::Quit));
        }
    }
}
