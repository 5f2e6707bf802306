use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{anyhow, Context, Result};
use log::info;
use rusqlite::{Connection, OpenFlags};

use super::migrations::run_migrations;
use crate::log_warn;

const ENABLE_LOGS: bool = true;

/// Handle to the SQLite history database.
///
/// Each operation opens its own connection on the blocking pool and drops it
/// when the task returns, whether it succeeded or not.
#[derive(Clone)]
pub struct Database {
    db_path: Arc<PathBuf>,
}

impl Database {
    pub fn new(db_path: PathBuf) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create database directory {}", parent.display())
            })?;
        }

        let mut conn = Connection::open(&db_path).context("failed to open SQLite database")?;

        if let Err(err) = conn.pragma_update(None, "journal_mode", "WAL") {
            log_warn!("Failed to enable WAL mode: {err}");
        }
        enable_foreign_keys(&conn)?;

        run_migrations(&mut conn).context("failed to run database migrations")?;

        info!("Database initialized at {}", db_path.display());

        Ok(Self {
            db_path: Arc::new(db_path),
        })
    }

    pub fn path(&self) -> &Path {
        self.db_path.as_path()
    }

    pub async fn execute<F, T>(&self, task: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db_path = Arc::clone(&self.db_path);

        tokio::task::spawn_blocking(move || {
            let mut conn = open_existing(&db_path)?;
            task(&mut conn)
        })
        .await
        .map_err(|err| anyhow!("database task terminated unexpectedly: {err}"))?
    }
}

/// Opens a connection to an already-initialised database. A missing file is
/// an error rather than a fresh, schema-less database.
fn open_existing(path: &Path) -> Result<Connection> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .with_context(|| format!("failed to connect to history database {}", path.display()))?;

    enable_foreign_keys(&conn)?;
    Ok(conn)
}

fn enable_foreign_keys(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "foreign_keys", "ON")
        .context("failed to enable foreign keys")
}
