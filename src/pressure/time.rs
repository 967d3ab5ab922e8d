use chrono::{DateTime, Local, NaiveDate};

pub const DAY_MS: i64 = 86_400_000;

pub fn local_datetime(timestamp_ms: i64) -> Option<DateTime<Local>> {
    DateTime::from_timestamp_millis(timestamp_ms).map(|dt| dt.with_timezone(&Local))
}

/// "HH:mm" label stored next to each reading.
pub fn time_label(at: &DateTime<Local>) -> String {
    at.format("%H:%M").to_string()
}

/// "dd/MM/yyyy" in local time.
pub fn format_date(timestamp_ms: i64) -> Option<String> {
    local_datetime(timestamp_ms).map(|dt| dt.format("%d/%m/%Y").to_string())
}

pub fn day_start_ms(timestamp_ms: i64) -> Option<i64> {
    local_datetime(timestamp_ms).map(|dt| local_midnight_ms(dt.date_naive()))
}

pub fn today_start_ms() -> i64 {
    local_midnight_ms(Local::now().date_naive())
}

fn local_midnight_ms(date: NaiveDate) -> i64 {
    let midnight = date.and_time(chrono::NaiveTime::MIN);
    match midnight.and_local_timezone(Local).earliest() {
        Some(dt) => dt.timestamp_millis(),
        // midnight skipped by a DST shift
        None => midnight.and_utc().timestamp_millis(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn local_ms(y: i32, m: u32, d: u32, hh: u32, mm: u32) -> i64 {
        Local
            .with_ymd_and_hms(y, m, d, hh, mm, 0)
            .earliest()
            .unwrap()
            .timestamp_millis()
    }

    #[test]
    fn formats_label_and_date() {
        let ms = local_ms(2024, 3, 7, 8, 5);
        let dt = local_datetime(ms).unwrap();
        assert_eq!(time_label(&dt), "08:05");
        assert_eq!(format_date(ms).as_deref(), Some("07/03/2024"));
    }

    #[test]
    fn day_start_truncates_to_local_midnight() {
        let ms = local_ms(2024, 6, 15, 21, 47);
        assert_eq!(day_start_ms(ms), Some(local_ms(2024, 6, 15, 0, 0)));

        let midnight = local_ms(2024, 6, 15, 0, 0);
        assert_eq!(day_start_ms(midnight), Some(midnight));
    }

    #[test]
    fn today_start_is_not_after_now() {
        let now = Local::now().timestamp_millis();
        let start = today_start_ms();
        assert!(start <= now);
        assert!(now - start < DAY_MS + 3_600_000);
    }
}
