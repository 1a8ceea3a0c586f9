//! Settings repository implementation

use crate::error::Result;
use crate::util::parse_flag;
use libsql::Connection;

/// Key under which the list/grid layout preference is stored
pub const LIST_MODE_KEY: &str = "list_mode_enabled";

/// Layout used when no preference has been stored yet
pub const DEFAULT_LIST_MODE: bool = true;

/// Trait for settings storage operations (async)
#[allow(async_fn_in_trait)]
pub trait SettingsRepository {
    /// Load the layout preference, falling back to list mode when unset
    async fn load_list_mode(&self) -> Result<bool>;

    /// Save the layout preference
    async fn save_list_mode(&self, is_list_mode: bool) -> Result<()>;
}

/// libSQL implementation of `SettingsRepository`
pub struct LibSqlSettingsRepository<'a> {
    conn: &'a Connection,
}

impl<'a> LibSqlSettingsRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl SettingsRepository for LibSqlSettingsRepository<'_> {
    async fn load_list_mode(&self) -> Result<bool> {
        let value = self.get_setting(LIST_MODE_KEY).await?;
        Ok(value
            .as_deref()
            .and_then(parse_flag)
            .unwrap_or(DEFAULT_LIST_MODE))
    }

    async fn save_list_mode(&self, is_list_mode: bool) -> Result<()> {
        self.set_setting(LIST_MODE_KEY, if is_list_mode { "true" } else { "false" })
            .await
    }
}

impl LibSqlSettingsRepository<'_> {
    async fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let mut rows = self
            .conn
            .query("SELECT value FROM settings WHERE key = ?", [key])
            .await?;

        if let Some(row) = rows.next().await? {
            let value: String = row.get(0)?;
            Ok(Some(value))
        } else {
            Ok(None)
        }
    }

    async fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO settings (key, value) VALUES (?, ?)",
                [key, value],
            )
            .await?;
        Ok(())
    }
}
