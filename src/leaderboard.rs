//! The best times, kept in a local SQLite database and partitioned by the board size.

mod models;
mod schema;

use crate::config::BoardSize;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use models::{NewScore, Score};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, instrument};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// No more than this many entries are read per board size.
pub const MAX_ENTRIES: i64 = 1000;

const DB_DIR: &str = ".visweeper";
const DB_FILE: &str = "leaderboard.db";

/// Everything that can go wrong with the scores storage.
#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("failed to create the directory {}", path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to connect to the database: {0}")]
    Connection(#[from] diesel::ConnectionError),
    #[error("database query failed: {0}")]
    Query(#[from] diesel::result::Error),
    #[error("failed to prepare the database: {0}")]
    Migration(String),
}

/// A ranked result as shown on the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// The position in the board size's table, starting from 1.
    pub rank: usize,
    pub name: String,
    pub time: Duration,
    pub recorded_at: NaiveDateTime,
}

/// The leaderboard repository. A connection is opened for every operation and dropped at its end.
#[derive(Debug, Clone)]
pub struct Leaderboard {
    db_path: String,
}

impl Leaderboard {
    /// `$HOME/.visweeper/leaderboard.db`, or [`None`] when the home directory is unknown.
    pub fn default_path() -> Option<PathBuf> {
        std::env::var_os("HOME").map(|home| PathBuf::from(home).join(DB_DIR).join(DB_FILE))
    }

    /// Opens the database at the given path, creating it along with its directory if needed, and brings the schema
    /// up to date.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LeaderboardError> {
        let path = path.as_ref();

        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|source| LeaderboardError::Directory {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let leaderboard = Leaderboard {
            db_path: path.to_string_lossy().into_owned(),
        };

        let mut conn = leaderboard.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| LeaderboardError::Migration(e.to_string()))?;

        info!(migrations = applied.len(), "Leaderboard opened");
        Ok(leaderboard)
    }

    fn connection(&self) -> Result<SqliteConnection, LeaderboardError> {
        debug!(path = %self.db_path, "Establishing connection");
        Ok(SqliteConnection::establish(&self.db_path)?)
    }

    /// Records a result for the board size.
    #[instrument(skip(self, size, name), fields(size = size.label()))]
    pub fn insert(&self, size: BoardSize, name: &str, time: Duration) -> Result<(), LeaderboardError> {
        let mut conn = self.connection()?;

        let new_score = NewScore {
            category: size.label(),
            name,
            millis: time.as_millis() as i64,
        };

        let score = diesel::insert_into(schema::scores::table)
            .values(&new_score)
            .returning(Score::as_returning())
            .get_result(&mut conn)?;

        info!(id = score.id, millis = score.millis, "Score recorded");
        Ok(())
    }

    /// The best results for the board size, fastest first. Equal times keep the order they have been recorded in.
    #[instrument(skip(self, size), fields(size = size.label()))]
    pub fn get_all(&self, size: BoardSize) -> Result<Vec<Entry>, LeaderboardError> {
        use schema::scores::dsl::*;

        let mut conn = self.connection()?;

        let rows = scores
            .filter(category.eq(size.label()))
            .order((millis.asc(), id.asc()))
            .limit(MAX_ENTRIES)
            .select(Score::as_select())
            .load(&mut conn)?;

        debug!(count = rows.len(), "Scores loaded");

        Ok(rows
            .into_iter()
            .enumerate()
            .map(|(index, score)| Entry {
                rank: index + 1,
                name: score.name,
                time: Duration::from_millis(score.millis.max(0) as u64),
                recorded_at: score.recorded_at,
            })
            .collect())
    }

    /// Removes all the results of the board size and returns how many there were.
    #[instrument(skip(self, size), fields(size = size.label()))]
    pub fn clear(&self, size: BoardSize) -> Result<usize, LeaderboardError> {
        use schema::scores::dsl::*;

        let mut conn = self.connection()?;
        let deleted = diesel::delete(scores.filter(category.eq(size.label()))).execute(&mut conn)?;

        info!(deleted, "Scores cleared");
        Ok(deleted)
    }
}
