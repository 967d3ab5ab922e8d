use std::{fmt::Display, sync::Arc};

use chrono::Local;
use tokio::{sync::Mutex, task::JoinHandle};
use tokio_util::sync::CancellationToken;

use crate::{
    db::models::Measurement,
    pressure::{classify_pressure, time::time_label, validate, PressureCategory, PressureStats},
    store::{LiveList, MeasurementStore},
};

use super::{
    observable::Observable,
    state::{
        TrackerState, CREATED_MESSAGE, CREATED_WITH_ALERT_PREFIX, DELETED_MESSAGE,
        DELETE_FAILED_PREFIX, LOAD_FAILED_PREFIX, SAVE_FAILED_PREFIX, UPDATED_MESSAGE,
        UPDATE_FAILED_PREFIX,
    },
};

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_error, log_info, log_warn};

struct TrackerShared {
    measurements: Observable<Vec<Measurement>>,
    loading: Observable<bool>,
    error_message: Observable<Option<String>>,
    success_message: Observable<Option<String>>,
}

/// Clears the loading flag when an operation ends, however it ends.
struct LoadingGuard<'a> {
    loading: &'a Observable<bool>,
}

impl<'a> LoadingGuard<'a> {
    fn begin(loading: &'a Observable<bool>) -> Self {
        loading.set(true);
        Self { loading }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.loading.set(false);
    }
}

/// State manager between the presentation layer and the store.
///
/// Keeps the newest-first list of readings in sync with the store, validates
/// before every write and turns every outcome into observable state. No
/// operation returns an error: failures end up in [`error_message`].
///
/// [`error_message`]: TrackerController::error_message
#[derive(Clone)]
pub struct TrackerController {
    store: Arc<dyn MeasurementStore>,
    scope: CancellationToken,
    shared: Arc<TrackerShared>,
    listener: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl TrackerController {
    /// Subscribes to the full list right away. Must be called from within a
    /// tokio runtime. Cancelling `scope` stops the subscription and turns
    /// every later operation into a no-op.
    pub fn new(store: Arc<dyn MeasurementStore>, scope: CancellationToken) -> Self {
        let shared = Arc::new(TrackerShared {
            measurements: Observable::new(Vec::new()),
            loading: Observable::new(false),
            error_message: Observable::new(None),
            success_message: Observable::new(None),
        });

        let handle = tokio::spawn(follow_measurements(
            store.subscribe_all(),
            shared.clone(),
            scope.clone(),
        ));

        Self {
            store,
            scope,
            shared,
            listener: Arc::new(Mutex::new(Some(handle))),
        }
    }

    pub async fn create(&self, systolic: i32, diastolic: i32, note: impl Into<String>) {
        if self.cancelled("create") {
            return;
        }
        if let Err(err) = validate(systolic, diastolic) {
            log_warn!("rejected reading {systolic}/{diastolic}");
            self.shared.error_message.set(Some(err.to_string()));
            return;
        }

        let _loading = LoadingGuard::begin(&self.shared.loading);
        self.shared.error_message.set(None);

        let now = Local::now();
        let measurement = Measurement::new(
            systolic,
            diastolic,
            now.timestamp_millis(),
            time_label(&now),
            note,
        );

        match self.store.insert(&measurement).await {
            Ok(id) => {
                let category = classify_pressure(systolic, diastolic);
                log_info!(
                    "stored measurement {id}: {systolic}/{diastolic} ({})",
                    category.code()
                );
                let message = if category == PressureCategory::Normal {
                    CREATED_MESSAGE.to_string()
                } else {
                    format!("{CREATED_WITH_ALERT_PREFIX} {}", category.label())
                };
                self.shared.success_message.set(Some(message));
            }
            Err(err) => self.fail(SAVE_FAILED_PREFIX, err),
        }
    }

    /// Replaces the stored reading with `measurement`. Timestamp and time
    /// label are written as given, so an edit keeps its original time.
    pub async fn update(&self, measurement: Measurement) {
        if self.cancelled("update") {
            return;
        }
        if let Err(err) = validate(measurement.systolic, measurement.diastolic) {
            log_warn!(
                "rejected edit of measurement {}: {}/{}",
                measurement.id,
                measurement.systolic,
                measurement.diastolic
            );
            self.shared.error_message.set(Some(err.to_string()));
            return;
        }

        let _loading = LoadingGuard::begin(&self.shared.loading);
        self.shared.error_message.set(None);

        match self.store.update(&measurement).await {
            Ok(()) => {
                log_info!("updated measurement {}", measurement.id);
                self.shared
                    .success_message
                    .set(Some(UPDATED_MESSAGE.to_string()));
            }
            Err(err) => self.fail(UPDATE_FAILED_PREFIX, err),
        }
    }

    pub async fn delete(&self, measurement: &Measurement) {
        if self.cancelled("delete") {
            return;
        }

        let _loading = LoadingGuard::begin(&self.shared.loading);
        self.shared.error_message.set(None);

        let result = self.store.delete(measurement).await;
        self.deleted(measurement.id, result);
    }

    pub async fn delete_by_id(&self, id: i64) {
        if self.cancelled("delete") {
            return;
        }

        let _loading = LoadingGuard::begin(&self.shared.loading);
        self.shared.error_message.set(None);

        let result = self.store.delete_by_id(id).await;
        self.deleted(id, result);
    }

    pub fn clear_error(&self) {
        self.shared.error_message.set_if_changed(None);
    }

    pub fn clear_success(&self) {
        self.shared.success_message.set_if_changed(None);
    }

    pub fn measurements(&self) -> Vec<Measurement> {
        self.shared.measurements.get()
    }

    pub fn find(&self, id: i64) -> Option<Measurement> {
        self.shared
            .measurements
            .get()
            .into_iter()
            .find(|measurement| measurement.id == id)
    }

    pub fn is_loading(&self) -> bool {
        self.shared.loading.get()
    }

    pub fn error_message(&self) -> Option<String> {
        self.shared.error_message.get()
    }

    pub fn success_message(&self) -> Option<String> {
        self.shared.success_message.get()
    }

    pub fn measurements_observable(&self) -> &Observable<Vec<Measurement>> {
        &self.shared.measurements
    }

    pub fn loading_observable(&self) -> &Observable<bool> {
        &self.shared.loading
    }

    pub fn error_observable(&self) -> &Observable<Option<String>> {
        &self.shared.error_message
    }

    pub fn success_observable(&self) -> &Observable<Option<String>> {
        &self.shared.success_message
    }

    pub fn snapshot(&self) -> TrackerState {
        TrackerState {
            measurements: self.measurements(),
            is_loading: self.is_loading(),
            error_message: self.error_message(),
            success_message: self.success_message(),
        }
    }

    /// Summary over the cached list; `None` while it is empty.
    pub fn stats(&self) -> Option<PressureStats> {
        PressureStats::from_measurements(&self.shared.measurements.get())
    }

    pub fn scope(&self) -> &CancellationToken {
        &self.scope
    }

    /// Cancels the scope and waits for the list subscription to stop.
    pub async fn shutdown(&self) {
        self.scope.cancel();
        if let Some(handle) = self.listener.lock().await.take() {
            if let Err(err) = handle.await {
                log_error!("measurement listener failed to join: {err}");
            }
        }
    }

    fn cancelled(&self, operation: &str) -> bool {
        if self.scope.is_cancelled() {
            log_warn!("{operation} ignored: tracker scope is cancelled");
            true
        } else {
            false
        }
    }

    fn deleted(&self, id: i64, result: Result<(), crate::store::StoreError>) {
        match result {
            Ok(()) => {
                log_info!("deleted measurement {id}");
                self.shared
                    .success_message
                    .set(Some(DELETED_MESSAGE.to_string()));
            }
            Err(err) => self.fail(DELETE_FAILED_PREFIX, err),
        }
    }

    fn fail(&self, prefix: &str, err: impl Display) {
        log_error!("{prefix}: {err}");
        self.shared
            .error_message
            .set(Some(format!("{prefix}: {err}")));
    }
}

async fn follow_measurements(
    mut live: LiveList,
    shared: Arc<TrackerShared>,
    scope: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = scope.cancelled() => {
                log_debug!("measurement listener shutting down");
                break;
            }
            next = live.next() => match next {
                Some(Ok(measurements)) => {
                    log_debug!("measurement list refreshed ({} rows)", measurements.len());
                    shared.measurements.set(measurements);
                }
                Some(Err(err)) => {
                    log_error!("failed to refresh measurements: {err}");
                    shared
                        .error_message
                        .set(Some(format!("{LOAD_FAILED_PREFIX}: {err}")));
                }
                None => {
                    log_warn!("measurement store closed its change feed");
                    break;
                }
            }
        }
    }
}
