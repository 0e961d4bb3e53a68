pub mod app;
pub mod event;
pub mod game_ui;
pub mod leaderboard_ui;
pub mod tui;
pub mod update;

use app::App;
use clap::Parser;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use event::{Event, EventHandler};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tui::Tui;
use update::update;
use visweeper::config::{BoardSize, GameConfig, DEFAULT_MINE_PERCENT};
use visweeper::leaderboard::Leaderboard;

const LOG_FILE: &str = "visweeper.log";

/// Minesweeper in the terminal. Move with h/j/k/l, press ? for the rest of the keys.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Small (10x10), the default
    #[arg(short = 'S', group = "size")]
    small: bool,
    /// Medium (16x16)
    #[arg(short = 'M', group = "size")]
    medium: bool,
    /// Large (16x30)
    #[arg(short = 'L', group = "size")]
    large: bool,
    /// XL (36x36)
    #[arg(short = 'X', group = "size")]
    extra_large: bool,
    /// Override the percentage of mines (no score)
    #[arg(long, value_name = "PERCENT", default_value_t = DEFAULT_MINE_PERCENT)]
    mine_percent: u8,
    /// Allow showing the mines and winning on demand (no score)
    #[arg(long)]
    cheat: bool,
    /// Allow moving with the arrow keys (no score)
    #[arg(long)]
    arrow_keys: bool,
    /// Show the leaderboard instead of starting a game
    #[arg(long)]
    scores: bool,
    /// The leaderboard database [default: ~/.visweeper/leaderboard.db]
    #[arg(long, value_name = "PATH")]
    db: Option<PathBuf>,
}

impl Args {
    fn game_config(&self) -> GameConfig {
        let size = if self.medium {
            BoardSize::Medium
        } else if self.large {
            BoardSize::Large
        } else if self.extra_large {
            BoardSize::ExtraLarge
        } else {
            BoardSize::Small
        };

        GameConfig {
            size,
            mine_percent: self.mine_percent,
            cheat: self.cheat,
            arrow_keys: self.arrow_keys,
        }
    }
}

/// Logs go to a file next to the database, the terminal is taken by the interface.
fn init_logging(db_path: &Path) -> Result<()> {
    let log_path = db_path.with_file_name(LOG_FILE);

    if let Some(dir) = log_path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }

    let log_file = OpenOptions::new().create(true).append(true).open(&log_path)?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| eyre!(err))?;

    Ok(())
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let config = args.game_config();
    config.validate()?;

    let db_path = match args.db {
        Some(path) => path,
        None => Leaderboard::default_path()
            .ok_or_else(|| eyre!("couldn't find the home directory, pass the database path with --db"))?,
    };

    init_logging(&db_path)?;
    info!(?config, db = %db_path.display(), "Starting");

    // The leaderboard has to be usable before the terminal is taken over.
    let leaderboard = Leaderboard::open(&db_path)?;

    // Create the terminal application.
    let mut app = App::new(config, leaderboard, args.scores)?;

    // Initialize the terminal user interface.
    let backend = CrosstermBackend::new(std::io::stderr());
    let terminal = Terminal::new(backend)?;
    let events = EventHandler::new(250);
    let mut tui = Tui::new(terminal, events);
    tui.enter()?;

    // Start the main loop.
    let result = run(&mut app, &mut tui);

    // Exit the user interface.
    tui.exit()?;
    info!("Bye");

    result
}

fn run(app: &mut App, tui: &mut Tui) -> Result<()> {
    while !app.should_quit {
        // Render the user interface.
        tui.draw(app)?;
        // Handle events.
        match tui.events.next()? {
            Event::Tick => app.tick()?,
            Event::Key(key_event) => update(app, key_event)?,
            Event::Resize(_, _) => {}
        };
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::Args;
    use clap::Parser;
    use visweeper::config::BoardSize;

    #[test]
    fn the_small_board_is_the_default() {
        let args = Args::parse_from(["visweeper"]);
        let config = args.game_config();

        assert_eq!(config.size, BoardSize::Small);
        assert_eq!(config.mine_percent, 16);
        assert!(config.is_score_eligible());
    }

    #[test]
    fn size_flags_pick_the_board() {
        for (flag, size) in [
            ("-S", BoardSize::Small),
            ("-M", BoardSize::Medium),
            ("-L", BoardSize::Large),
            ("-X", BoardSize::ExtraLarge),
        ] {
            assert_eq!(Args::parse_from(["visweeper", flag]).game_config().size, size);
        }
    }

    #[test]
    fn size_flags_are_mutually_exclusive() {
        assert!(Args::try_parse_from(["visweeper", "-M", "-L"]).is_err());
    }

    #[test]
    fn assisted_games_are_not_eligible() {
        let args = Args::parse_from(["visweeper", "-X", "--cheat", "--mine-percent", "30", "--db", "/tmp/x.db"]);
        let config = args.game_config();

        assert!(config.cheat);
        assert_eq!(config.mine_percent, 30);
        assert!(!config.is_score_eligible());
        assert_eq!(args.db.as_deref(), Some(std::path::Path::new("/tmp/x.db")));
    }

    #[test]
    fn clap_configuration_is_valid() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
