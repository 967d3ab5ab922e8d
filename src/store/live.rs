use std::sync::{Arc, Weak};

use async_trait::async_trait;
use tokio::sync::watch;

use super::{ListQuery, StoreError};
use crate::db::models::Measurement;

/// Shared state behind a store handle that a [`LiveList`] re-queries.
///
/// Live lists only hold it weakly, so dropping the last store handle closes
/// the change feed.
#[async_trait]
pub trait ListSource: Send + Sync + 'static {
    async fn list(&self, query: ListQuery) -> Result<Vec<Measurement>, StoreError>;

    fn changes(&self) -> watch::Receiver<u64>;
}

/// A query that re-emits its full result after every committed write.
pub struct LiveList {
    source: Weak<dyn ListSource>,
    query: ListQuery,
    changes: watch::Receiver<u64>,
    primed: bool,
}

impl LiveList {
    pub fn new<S: ListSource>(source: &Arc<S>, query: ListQuery) -> Self {
        let changes = source.changes();
        let source: Weak<dyn ListSource> = Arc::downgrade(source) as Weak<S>;
        Self {
            source,
            query,
            changes,
            primed: false,
        }
    }

    pub fn query(&self) -> ListQuery {
        self.query
    }

    /// The first call yields the current result immediately; later calls wait
    /// for the next write. `None` once every handle to the store is dropped.
    pub async fn next(&mut self) -> Option<Result<Vec<Measurement>, StoreError>> {
        if self.primed {
            self.changes.changed().await.ok()?;
        } else {
            self.changes.borrow_and_update();
            self.primed = true;
        }

        let source = self.source.upgrade()?;
        Some(source.list(self.query).await)
    }
}
