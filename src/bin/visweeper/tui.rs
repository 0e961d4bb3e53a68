//! The terminal user interface lifecycle.

use crate::event::EventHandler;
use color_eyre::Result;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::{Frame, Terminal};
use std::{io, panic};

pub type CrosstermTerminal = Terminal<CrosstermBackend<io::Stderr>>;

/// Anything that can draw itself into a frame.
pub trait Render {
    fn render(&mut self, frame: &mut Frame);
}

/// Representation of a terminal user interface.
///
/// It is responsible for setting up the terminal, initializing the interface and handling the draw events.
pub struct Tui {
    /// Interface to the Terminal.
    terminal: CrosstermTerminal,
    /// Terminal event handler.
    pub events: EventHandler,
}

impl Tui {
    pub fn new(terminal: CrosstermTerminal, events: EventHandler) -> Self {
        Self { terminal, events }
    }

    /// Enables the raw mode and the alternate screen. The terminal gets restored on panics too.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        crossterm::execute!(io::stderr(), EnterAlternateScreen)?;

        let panic_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic| {
            // nothing else to do if even the reset fails
            let _ = Self::reset();
            panic_hook(panic);
        }));

        self.terminal.hide_cursor()?;
        self.terminal.clear()?;
        Ok(())
    }

    fn reset() -> Result<()> {
        terminal::disable_raw_mode()?;
        crossterm::execute!(io::stderr(), LeaveAlternateScreen)?;
        Ok(())
    }

    /// Restores the terminal to the state it's been in before [`Tui::enter`].
    pub fn exit(&mut self) -> Result<()> {
        Self::reset()?;
        self.terminal.show_cursor()?;
        Ok(())
    }

    pub fn draw<R: Render>(&mut self, app: &mut R) -> Result<()> {
        self.terminal.draw(|frame| app.render(frame))?;
        Ok(())
    }
}
