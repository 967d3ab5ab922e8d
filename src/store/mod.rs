//! Persistence boundary consumed by the tracker.
//!
//! [`MeasurementStore`] is the only way the rest of the crate reaches stored
//! readings. Implementations bump a version counter after every committed
//! write; [`LiveList`] turns that feed into a stream of fresh query results.

mod error;
mod live;
pub mod memory;
pub mod sqlite;

use std::cmp::Reverse;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::db::models::Measurement;
use crate::pressure::time::DAY_MS;

pub use error::StoreError;
pub use live::{ListSource, LiveList};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum ListQuery {
    /// Every reading, newest first.
    All,
    /// Readings in `[day_start_ms, day_start_ms + 1 day)`, latest time label first.
    ByDate { day_start_ms: i64 },
    /// The newest `limit` readings.
    Recent { limit: usize },
}

impl ListQuery {
    pub fn contains(&self, measurement: &Measurement) -> bool {
        match *self {
            ListQuery::ByDate { day_start_ms } => {
                measurement.timestamp_ms >= day_start_ms
                    && measurement.timestamp_ms < day_start_ms.saturating_add(DAY_MS)
            }
            ListQuery::All | ListQuery::Recent { .. } => true,
        }
    }

    /// Filters, orders and caps `measurements` the same way the SQL queries do.
    pub fn apply(&self, measurements: impl IntoIterator<Item = Measurement>) -> Vec<Measurement> {
        let mut selected: Vec<Measurement> = measurements
            .into_iter()
            .filter(|m| self.contains(m))
            .collect();

        match *self {
            ListQuery::ByDate { .. } => selected.sort_by(|a, b| {
                (Reverse(&a.time_label), Reverse(a.timestamp_ms), Reverse(a.id)).cmp(&(
                    Reverse(&b.time_label),
                    Reverse(b.timestamp_ms),
                    Reverse(b.id),
                ))
            }),
            ListQuery::All | ListQuery::Recent { .. } => selected.sort_by(|a, b| {
                (Reverse(a.timestamp_ms), Reverse(&a.time_label), Reverse(a.id)).cmp(&(
                    Reverse(b.timestamp_ms),
                    Reverse(&b.time_label),
                    Reverse(b.id),
                ))
            }),
        }

        if let ListQuery::Recent { limit } = *self {
            selected.truncate(limit);
        }
        selected
    }
}

#[async_trait]
pub trait MeasurementStore: Send + Sync + 'static {
    /// Stores a reading. An unsaved reading gets a fresh id; a reading with an
    /// id replaces that row. Returns the row id.
    async fn insert(&self, measurement: &Measurement) -> Result<i64, StoreError>;

    /// Replaces all mutable fields of the row with the same id. Unknown ids
    /// are ignored.
    async fn update(&self, measurement: &Measurement) -> Result<(), StoreError>;

    async fn delete(&self, measurement: &Measurement) -> Result<(), StoreError> {
        self.delete_by_id(measurement.id).await
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), StoreError>;

    async fn get_by_id(&self, id: i64) -> Result<Option<Measurement>, StoreError>;

    async fn list(&self, query: ListQuery) -> Result<Vec<Measurement>, StoreError>;

    /// Version feed bumped after every committed write.
    fn changes(&self) -> watch::Receiver<u64>;

    fn subscribe(&self, query: ListQuery) -> LiveList;

    fn subscribe_all(&self) -> LiveList {
        self.subscribe(ListQuery::All)
    }

    fn subscribe_by_date(&self, day_start_ms: i64) -> LiveList {
        self.subscribe(ListQuery::ByDate { day_start_ms })
    }

    fn subscribe_recent(&self, limit: usize) -> LiveList {
        self.subscribe(ListQuery::Recent { limit })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(id: i64, timestamp_ms: i64, label: &str) -> Measurement {
        let mut m = Measurement::new(120, 80, timestamp_ms, label, "");
        m.id = id;
        m
    }

    fn ids(list: &[Measurement]) -> Vec<i64> {
        list.iter().map(|m| m.id).collect()
    }

    #[test]
    fn all_orders_by_timestamp_then_label_then_id() {
        let rows = vec![
            reading(1, 100, "08:00"),
            reading(2, 300, "10:00"),
            reading(3, 300, "11:00"),
            reading(4, 200, "09:00"),
            reading(5, 300, "11:00"),
        ];
        assert_eq!(ids(&ListQuery::All.apply(rows)), vec![5, 3, 2, 4, 1]);
    }

    #[test]
    fn by_date_filters_half_open_window() {
        let day = 3 * DAY_MS;
        let rows = vec![
            reading(1, day - 1, "23:59"),
            reading(2, day, "00:00"),
            reading(3, day + 10, "07:30"),
            reading(4, day + DAY_MS, "00:00"),
        ];
        let query = ListQuery::ByDate { day_start_ms: day };
        assert_eq!(ids(&query.apply(rows)), vec![3, 2]);
    }

    #[test]
    fn recent_caps_length() {
        let rows = (1..=5).map(|i| reading(i, i * 10, "08:00"));
        assert_eq!(ids(&ListQuery::Recent { limit: 2 }.apply(rows)), vec![5, 4]);
        assert!(ListQuery::Recent { limit: 0 }
            .apply(vec![reading(1, 1, "08:00")])
            .is_empty());
    }
}
