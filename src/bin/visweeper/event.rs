//! The terminal events, read on a separate thread and interleaved with the ticks.

use color_eyre::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::error;

/// Terminal events.
#[derive(Clone, Copy, Debug)]
pub enum Event {
    /// Emitted every `tick_rate` milliseconds, keeps the clock on the screen running.
    Tick,
    /// Key press.
    Key(KeyEvent),
    /// Terminal resize.
    Resize(u16, u16),
}

/// Terminal event handler.
#[derive(Debug)]
pub struct EventHandler {
    receiver: mpsc::Receiver<Event>,
    #[allow(dead_code)]
    handler: thread::JoinHandle<()>,
}

impl EventHandler {
    /// Spawns the polling thread. The thread stops as soon as the terminal can't be read or the receiving end is gone.
    pub fn new(tick_rate: u64) -> Self {
        let tick_rate = Duration::from_millis(tick_rate);
        let (sender, receiver) = mpsc::channel();

        let handler = thread::spawn(move || {
            let mut last_tick = Instant::now();

            loop {
                let timeout = tick_rate.checked_sub(last_tick.elapsed()).unwrap_or(tick_rate);

                let polled = match event::poll(timeout) {
                    Ok(true) => event::read().map(Some),
                    Ok(false) => Ok(None),
                    Err(err) => Err(err),
                };

                let event = match polled {
                    // only presses, the releases and repeats are reported on some platforms as well
                    Ok(Some(CrosstermEvent::Key(e))) if e.kind == KeyEventKind::Press => Some(Event::Key(e)),
                    Ok(Some(CrosstermEvent::Resize(w, h))) => Some(Event::Resize(w, h)),
                    Ok(_) => None,
                    Err(err) => {
                        error!(%err, "Unable to read the terminal events");
                        break;
                    }
                };

                if let Some(event) = event {
                    if sender.send(event).is_err() {
                        break;
                    }
                }

                if last_tick.elapsed() >= tick_rate {
                    if sender.send(Event::Tick).is_err() {
                        break;
                    }
                    last_tick = Instant::now();
                }
            }
        });

        Self { receiver, handler }
    }

    /// Receive the next event from the handler thread.
    ///
    /// This function will always block the current thread if there is no data available and it's possible for more
    /// data to be sent.
    pub fn next(&self) -> Result<Event> {
        Ok(self.receiver.recv()?)
    }
}
