//! Core of a personal blood-pressure tracker.
//!
//! Readings are validated and classified by [`pressure`], persisted through a
//! [`store::MeasurementStore`] (SQLite by default) and exposed to a
//! presentation layer as observable state by [`tracker::TrackerController`].

pub mod db;
pub mod pressure;
pub mod settings;
pub mod store;
pub mod tracker;
pub mod utils;

use std::{path::Path, sync::Arc};

use anyhow::{Context, Result};
use log::info;
use tokio_util::sync::CancellationToken;

pub use db::Measurement;
pub use pressure::{
    classify_pressure, is_high_pressure, is_valid_pressure, CategoryColor, PressureCategory,
    PressureStats,
};
pub use settings::{SettingsStore, TrackerSettings, SETTINGS_FILE};
pub use store::{ListQuery, LiveList, MeasurementStore, SqliteStore, StoreError};
pub use tracker::{TrackerController, TrackerState};
pub use utils::init_logging;

/// Everything a running app needs, wired from one data directory.
pub struct Tracker {
    settings: SettingsStore,
    store: SqliteStore,
    controller: TrackerController,
}

impl Tracker {
    /// Reads `settings.json` from `data_dir`, opens the database it names and
    /// starts a controller bound to `scope`. Must be called from within a
    /// tokio runtime.
    pub fn open(data_dir: &Path, scope: CancellationToken) -> Result<Self> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

        let settings = SettingsStore::new(data_dir.join(SETTINGS_FILE))?;
        let db_path = settings.get().database_path(data_dir);
        let store = SqliteStore::open(db_path)?;
        let controller = TrackerController::new(Arc::new(store.clone()), scope);

        info!("Pressure tracker ready in {}", data_dir.display());

        Ok(Self {
            settings,
            store,
            controller,
        })
    }

    pub fn controller(&self) -> &TrackerController {
        &self.controller
    }

    pub fn store(&self) -> &SqliteStore {
        &self.store
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    /// Live view of the newest readings, sized by `recent_limit`.
    pub fn recent(&self) -> LiveList {
        self.store.subscribe_recent(self.settings.get().recent_limit)
    }

    /// Live view of today's readings.
    pub fn today(&self) -> LiveList {
        self.store
            .subscribe_by_date(pressure::time::today_start_ms())
    }

    pub async fn shutdown(&self) {
        self.controller.shutdown().await;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn readings_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();

        let tracker = Tracker::open(dir.path(), CancellationToken::new()).unwrap();
        tracker.controller().create(200, 60, "dizzy").await;
        let list = tokio::time::timeout(
            Duration::from_secs(2),
            tracker
                .controller()
                .measurements_observable()
                .wait_for(|list| list.len() == 1),
        )
        .await
        .unwrap();
        assert_eq!(list[0].category(), PressureCategory::Critical);
        assert!(tracker
            .controller()
            .success_message()
            .unwrap()
            .contains(PressureCategory::Critical.label()));

        let mut today = tracker.today();
        assert_eq!(today.next().await.unwrap().unwrap().len(), 1);
        let recent = tracker.recent();
        assert_eq!(recent.query(), ListQuery::Recent { limit: 7 });

        tracker.shutdown().await;
        drop(tracker);

        let reopened = Tracker::open(dir.path(), CancellationToken::new()).unwrap();
        let stored = reopened.store().list(ListQuery::All).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].note, "dizzy");
        assert!(dir.path().join("pressure.sqlite3").exists());
    }

    #[tokio::test]
    async fn custom_database_file_is_honoured() {
        let dir = tempfile::tempdir().unwrap();
        let settings = SettingsStore::new(dir.path().join(SETTINGS_FILE)).unwrap();
        settings
            .update(TrackerSettings {
                database_file: "other.sqlite3".into(),
                ..TrackerSettings::default()
            })
            .unwrap();

        let tracker = Tracker::open(dir.path(), CancellationToken::new()).unwrap();
        assert_eq!(
            tracker.store().database().path(),
            dir.path().join("other.sqlite3").as_path()
        );
        tracker.shutdown().await;
    }
}
