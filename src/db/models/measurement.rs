//! Measurement data model.
//!
//! One blood-pressure reading as stored in `pressure_measurements`.

use serde::{Deserialize, Serialize};

use crate::pressure::{classify_pressure, is_high_pressure, PressureCategory};

/// Id of a measurement that has not been persisted yet.
pub const UNSAVED_ID: i64 = 0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    pub id: i64,
    pub systolic: i32,
    pub diastolic: i32,
    /// Milliseconds since the Unix epoch.
    pub timestamp_ms: i64,
    /// Local "HH:mm" captured at creation.
    pub time_label: String,
    #[serde(default)]
    pub note: String,
}

impl Measurement {
    pub fn new(
        systolic: i32,
        diastolic: i32,
        timestamp_ms: i64,
        time_label: impl Into<String>,
        note: impl Into<String>,
    ) -> Self {
        Self {
            id: UNSAVED_ID,
            systolic,
            diastolic,
            timestamp_ms,
            time_label: time_label.into(),
            note: note.into(),
        }
    }

    pub fn is_saved(&self) -> bool {
        self.id != UNSAVED_ID
    }

    pub fn category(&self) -> PressureCategory {
        classify_pressure(self.systolic, self.diastolic)
    }

    pub fn is_high(&self) -> bool {
        is_high_pressure(self.systolic, self.diastolic)
    }
}
