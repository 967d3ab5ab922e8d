use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use tokio::sync::watch;

use super::{ListQuery, ListSource, LiveList, MeasurementStore, StoreError};
use crate::db::{models::Measurement, Database};

/// [`MeasurementStore`] backed by the embedded SQLite database.
#[derive(Clone)]
pub struct SqliteStore {
    inner: Arc<SqliteInner>,
}

struct SqliteInner {
    db: Database,
    version: watch::Sender<u64>,
}

impl SqliteStore {
    pub fn new(db: Database) -> Self {
        let (version, _) = watch::channel(0);
        Self {
            inner: Arc::new(SqliteInner { db, version }),
        }
    }

    pub fn open(db_path: PathBuf) -> Result<Self> {
        Ok(Self::new(Database::new(db_path)?))
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::new(Database::open_in_memory()?))
    }

    pub fn database(&self) -> &Database {
        &self.inner.db
    }

    fn committed(&self) {
        self.inner.version.send_modify(|version| *version += 1);
    }
}

#[async_trait]
impl ListSource for SqliteInner {
    async fn list(&self, query: ListQuery) -> Result<Vec<Measurement>, StoreError> {
        let rows = match query {
            ListQuery::All => self.db.list_measurements().await?,
            ListQuery::ByDate { day_start_ms } => {
                self.db.list_measurements_for_day(day_start_ms).await?
            }
            ListQuery::Recent { limit } => self.db.list_recent_measurements(limit).await?,
        };
        Ok(rows)
    }

    fn changes(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }
}

#[async_trait]
impl MeasurementStore for SqliteStore {
    async fn insert(&self, measurement: &Measurement) -> Result<i64, StoreError> {
        let id = self.database().insert_measurement(measurement).await?;
        self.committed();
        Ok(id)
    }

    async fn update(&self, measurement: &Measurement) -> Result<(), StoreError> {
        let rows = self.database().update_measurement(measurement).await?;
        if rows == 0 {
            debug!("update ignored: no measurement with id {}", measurement.id);
        }
        self.committed();
        Ok(())
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), StoreError> {
        let rows = self.database().delete_measurement(id).await?;
        if rows == 0 {
            debug!("delete ignored: no measurement with id {id}");
        }
        self.committed();
        Ok(())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Measurement>, StoreError> {
        Ok(self.database().get_measurement(id).await?)
    }

    async fn list(&self, query: ListQuery) -> Result<Vec<Measurement>, StoreError> {
        self.inner.list(query).await
    }

    fn changes(&self) -> watch::Receiver<u64> {
        self.inner.changes()
    }

    fn subscribe(&self, query: ListQuery) -> LiveList {
        LiveList::new(&self.inner, query)
    }
}
