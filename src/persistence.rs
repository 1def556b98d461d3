/**
 * Key-value storage for the application's durable state, and the location of the
 * application's data directory in the filesystem.
 */
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::{Connection, OptionalExtension};

use super::common::{DrillError, Result};


/// A minimal string-to-string store. Every write is durable by the time it returns.
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}


/// Storage backed by a single SQLite table.
pub struct SqliteStorage {
    connection: Connection,
}


impl SqliteStorage {
    pub fn open(path: &Path) -> Result<Self> {
        let connection = Connection::open(path).map_err(DrillError::Sql)?;
        Self::init(connection)
    }

    pub fn open_in_memory() -> Result<Self> {
        let connection = Connection::open_in_memory().map_err(DrillError::Sql)?;
        Self::init(connection)
    }

    fn init(connection: Connection) -> Result<Self> {
        connection
            .execute(
                "
            CREATE TABLE IF NOT EXISTS storage(
              key TEXT NOT NULL PRIMARY KEY,
              value TEXT NOT NULL
            )
            ",
                [],
            )
            .map_err(DrillError::Sql)?;
        Ok(SqliteStorage { connection })
    }
}


impl Storage for SqliteStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.connection
            .query_row(
                "SELECT value FROM storage WHERE key = ?1",
                [key],
                |row| row.get::<usize, String>(0),
            )
            .optional()
            .map_err(DrillError::Sql)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.connection
            .execute(
                "
            INSERT INTO storage(key, value) VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            ",
                [key, value],
            )
            .map_err(DrillError::Sql)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.connection
            .execute("DELETE FROM storage WHERE key = ?1", [key])
            .map_err(DrillError::Sql)?;
        Ok(())
    }
}


/// Storage that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}


impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}


impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}


/// Return the path to the application directory: `override_dir` if given, otherwise a
/// `quizdrill` directory under the platform's data directory.
pub fn get_app_dir_path(override_dir: Option<&Path>) -> PathBuf {
    if let Some(dir) = override_dir {
        return dir.to_path_buf();
    }

    let mut dirpath = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    dirpath.push("quizdrill");
    dirpath
}


/// Return the path to the application directory, creating it if it doesn't exist.
pub fn require_app_dir_path(override_dir: Option<&Path>) -> Result<PathBuf> {
    let dirpath = get_app_dir_path(override_dir);
    if !dirpath.exists() {
        fs::create_dir_all(&dirpath).or(Err(DrillError::CannotMakeAppDir(dirpath.clone())))?;
    }
    Ok(dirpath)
}


pub fn get_storage_path(app_dir: &Path) -> PathBuf {
    app_dir.join("storage.sqlite3")
}
