pub mod models;

pub use models::*;

use crate::database::settings_repo;
use crate::types::errors::EngineResult;
use sqlx::SqlitePool;
use std::sync::Mutex;

/// Key under which `EngineSettings` is stored in `app_settings`.
pub const ENGINE_SETTINGS_KEY: &str = "engine";

pub struct ConfigService {
    pool: SqlitePool,
    settings: Mutex<EngineSettings>,
}

impl ConfigService {
    /// Load settings from the database, falling back to defaults.
    pub async fn init(pool: SqlitePool) -> Self {
        let settings = Self::load_from_db(&pool).await;
        Self {
            pool,
            settings: Mutex::new(settings),
        }
    }

    /// Load EngineSettings from the SQLite database.
    async fn load_from_db(pool: &SqlitePool) -> EngineSettings {
        let raw = match settings_repo::get_setting(pool, ENGINE_SETTINGS_KEY).await {
            Ok(raw) => raw,
            Err(e) => {
                log::error!("Failed to load engine settings from DB: {e}");
                return EngineSettings::default();
            }
        };

        let Some(raw) = raw else {
            return EngineSettings::default();
        };

        match serde_json::from_str::<EngineSettings>(&raw) {
            Ok(settings) => settings.sanitized(),
            Err(e) => {
                log::error!("Malformed engine settings, using defaults: {e}");
                EngineSettings::default()
            }
        }
    }

    pub fn get_settings(&self) -> EngineSettings {
        self.settings
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub async fn save_settings(&self, new_settings: EngineSettings) -> EngineResult<()> {
        let new_settings = new_settings.sanitized();
        let json = serde_json::to_string(&new_settings)?;
        settings_repo::set_setting(&self.pool, ENGINE_SETTINGS_KEY, &json).await?;

        *self
            .settings
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = new_settings;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
