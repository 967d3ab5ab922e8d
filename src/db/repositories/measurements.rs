use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension, Row};

use crate::db::{
    connection::Database,
    helpers::{collect_rows, to_i64},
    models::Measurement,
};
use crate::pressure::time::DAY_MS;

const SELECT_COLUMNS: &str =
    "SELECT id, systolic, diastolic, timestamp_ms, time_label, note FROM pressure_measurements";

fn row_to_measurement(row: &Row) -> Result<Measurement> {
    Ok(Measurement {
        id: row.get("id")?,
        systolic: row.get("systolic")?,
        diastolic: row.get("diastolic")?,
        timestamp_ms: row.get("timestamp_ms")?,
        time_label: row.get("time_label")?,
        note: row.get("note")?,
    })
}

impl Database {
    /// Inserts a new row for an unsaved measurement, or replaces the row with
    /// the same id. Returns the row id.
    pub async fn insert_measurement(&self, measurement: &Measurement) -> Result<i64> {
        let record = measurement.clone();
        self.execute(move |conn| {
            if record.is_saved() {
                conn.execute(
                    "INSERT OR REPLACE INTO pressure_measurements (id, systolic, diastolic, timestamp_ms, time_label, note)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![
                        record.id,
                        record.systolic,
                        record.diastolic,
                        record.timestamp_ms,
                        record.time_label,
                        record.note,
                    ],
                )
                .with_context(|| format!("failed to replace measurement {}", record.id))?;
                Ok(record.id)
            } else {
                conn.execute(
                    "INSERT INTO pressure_measurements (systolic, diastolic, timestamp_ms, time_label, note)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![
                        record.systolic,
                        record.diastolic,
                        record.timestamp_ms,
                        record.time_label,
                        record.note,
                    ],
                )
                .with_context(|| "failed to insert measurement")?;
                Ok(conn.last_insert_rowid())
            }
        })
        .await
    }

    /// Replaces every mutable column of the row. Returns the number of rows
    /// touched, zero when the id is unknown.
    pub async fn update_measurement(&self, measurement: &Measurement) -> Result<usize> {
        let record = measurement.clone();
        self.execute(move |conn| {
            let rows = conn
                .execute(
                    "UPDATE pressure_measurements
                     SET systolic = ?1,
                         diastolic = ?2,
                         timestamp_ms = ?3,
                         time_label = ?4,
                         note = ?5
                     WHERE id = ?6",
                    params![
                        record.systolic,
                        record.diastolic,
                        record.timestamp_ms,
                        record.time_label,
                        record.note,
                        record.id,
                    ],
                )
                .with_context(|| format!("failed to update measurement {}", record.id))?;
            Ok(rows)
        })
        .await
    }

    pub async fn delete_measurement(&self, id: i64) -> Result<usize> {
        self.execute(move |conn| {
            let rows = conn
                .execute(
                    "DELETE FROM pressure_measurements WHERE id = ?1",
                    params![id],
                )
                .with_context(|| format!("failed to delete measurement {id}"))?;
            Ok(rows)
        })
        .await
    }

    pub async fn get_measurement(&self, id: i64) -> Result<Option<Measurement>> {
        self.execute(move |conn| {
            let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} WHERE id = ?1"))?;
            let row = stmt
                .query_row(params![id], |row| Ok(row_to_measurement(row)))
                .optional()?;
            row.transpose()
        })
        .await
    }

    /// Newest first: by timestamp, then time label.
    pub async fn list_measurements(&self) -> Result<Vec<Measurement>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(&format!(
                "{SELECT_COLUMNS} ORDER BY timestamp_ms DESC, time_label DESC, id DESC"
            ))?;
            let rows = stmt.query([])?;
            collect_rows(rows, row_to_measurement)
        })
        .await
    }

    /// Readings in `[day_start_ms, day_start_ms + 1 day)`, latest time label first.
    pub async fn list_measurements_for_day(&self, day_start_ms: i64) -> Result<Vec<Measurement>> {
        self.execute(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "{SELECT_COLUMNS}
                 WHERE timestamp_ms >= ?1 AND timestamp_ms < ?2
                 ORDER BY time_label DESC, timestamp_ms DESC, id DESC"
            ))?;
            let rows = stmt.query(params![day_start_ms, day_start_ms.saturating_add(DAY_MS)])?;
            collect_rows(rows, row_to_measurement)
        })
        .await
    }

    pub async fn list_recent_measurements(&self, limit: usize) -> Result<Vec<Measurement>> {
        self.execute(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "{SELECT_COLUMNS} ORDER BY timestamp_ms DESC, time_label DESC, id DESC LIMIT ?1"
            ))?;
            let rows = stmt.query(params![to_i64(limit)?])?;
            collect_rows(rows, row_to_measurement)
        })
        .await
    }

    pub async fn count_measurements(&self) -> Result<i64> {
        self.execute(|conn| {
            let count = conn.query_row("SELECT COUNT(*) FROM pressure_measurements", [], |row| {
                row.get(0)
            })?;
            Ok(count)
        })
        .await
    }
}
