use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc, Mutex, MutexGuard,
    },
};

use async_trait::async_trait;
use tokio::sync::watch;

use super::{ListQuery, ListSource, LiveList, MeasurementStore, StoreError};
use crate::db::models::Measurement;

/// Process-local [`MeasurementStore`].
///
/// Writes can be made to fail on demand, and the number of write calls that
/// reached the store is counted, so callers can check what was attempted.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<MemoryInner>,
}

struct MemoryInner {
    rows: Mutex<Rows>,
    version: watch::Sender<u64>,
    fail_writes: AtomicBool,
    insert_calls: AtomicUsize,
    write_calls: AtomicUsize,
}

struct Rows {
    next_id: i64,
    by_id: BTreeMap<i64, Measurement>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        let (version, _) = watch::channel(0);
        Self {
            inner: Arc::new(MemoryInner {
                rows: Mutex::new(Rows {
                    next_id: 1,
                    by_id: BTreeMap::new(),
                }),
                version,
                fail_writes: AtomicBool::new(false),
                insert_calls: AtomicUsize::new(0),
                write_calls: AtomicUsize::new(0),
            }),
        }
    }

    /// While set, every write returns [`StoreError::Unavailable`].
    pub fn set_fail_writes(&self, fail: bool) {
        self.inner.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn insert_calls(&self) -> usize {
        self.inner.insert_calls.load(Ordering::SeqCst)
    }

    /// Insert, update and delete calls combined.
    pub fn write_calls(&self) -> usize {
        self.inner.write_calls.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.inner.rows().by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn begin_write(&self) -> Result<(), StoreError> {
        self.inner.write_calls.fetch_add(1, Ordering::SeqCst);
        if self.inner.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("disk I/O error".into()));
        }
        Ok(())
    }

    fn committed(&self) {
        self.inner.version.send_modify(|version| *version += 1);
    }
}

impl MemoryInner {
    fn rows(&self) -> MutexGuard<'_, Rows> {
        match self.rows.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[async_trait]
impl ListSource for MemoryInner {
    async fn list(&self, query: ListQuery) -> Result<Vec<Measurement>, StoreError> {
        let snapshot: Vec<Measurement> = self.rows().by_id.values().cloned().collect();
        Ok(query.apply(snapshot))
    }

    fn changes(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }
}

#[async_trait]
impl MeasurementStore for MemoryStore {
    async fn insert(&self, measurement: &Measurement) -> Result<i64, StoreError> {
        self.inner.insert_calls.fetch_add(1, Ordering::SeqCst);
        self.begin_write()?;

        let id = {
            let mut rows = self.inner.rows();
            let mut record = measurement.clone();
            if !record.is_saved() {
                record.id = rows.next_id;
            }
            let following = record
                .id
                .checked_add(1)
                .ok_or_else(|| StoreError::Unavailable("id space exhausted".into()))?;
            rows.next_id = rows.next_id.max(following);
            let id = record.id;
            rows.by_id.insert(id, record);
            id
        };

        self.committed();
        Ok(id)
    }

    async fn update(&self, measurement: &Measurement) -> Result<(), StoreError> {
        self.begin_write()?;
        {
            let mut rows = self.inner.rows();
            if let Some(existing) = rows.by_id.get_mut(&measurement.id) {
                *existing = measurement.clone();
            }
        }
        self.committed();
        Ok(())
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), StoreError> {
        self.begin_write()?;
        self.inner.rows().by_id.remove(&id);
        self.committed();
        Ok(())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Measurement>, StoreError> {
        Ok(self.inner.rows().by_id.get(&id).cloned())
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
