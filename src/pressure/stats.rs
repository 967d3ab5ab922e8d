//! Summary statistics and chart series over a set of readings.

use serde::Serialize;

use crate::db::models::Measurement;

/// Padding added above and below the chart bounds.
const CHART_PADDING: i32 = 20;

pub const SYSTOLIC_CHART_RANGE: (i32, i32) = (70, 200);
pub const DIASTOLIC_CHART_RANGE: (i32, i32) = (40, 120);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PressureStats {
    pub count: usize,
    pub avg_systolic: i32,
    pub avg_diastolic: i32,
    pub max_systolic: i32,
    pub min_systolic: i32,
    pub max_diastolic: i32,
    pub min_diastolic: i32,
}

impl PressureStats {
    /// `None` when there is nothing to summarize.
    pub fn from_measurements(measurements: &[Measurement]) -> Option<Self> {
        let first = measurements.first()?;
        let mut stats = Self {
            count: 0,
            avg_systolic: 0,
            avg_diastolic: 0,
            max_systolic: first.systolic,
            min_systolic: first.systolic,
            max_diastolic: first.diastolic,
            min_diastolic: first.diastolic,
        };

        let mut systolic_sum: i64 = 0;
        let mut diastolic_sum: i64 = 0;
        for m in measurements {
            systolic_sum += i64::from(m.systolic);
            diastolic_sum += i64::from(m.diastolic);
            stats.max_systolic = stats.max_systolic.max(m.systolic);
            stats.min_systolic = stats.min_systolic.min(m.systolic);
            stats.max_diastolic = stats.max_diastolic.max(m.diastolic);
            stats.min_diastolic = stats.min_diastolic.min(m.diastolic);
        }

        let count = measurements.len() as i64;
        stats.count = measurements.len();
        stats.avg_systolic = (systolic_sum / count) as i32;
        stats.avg_diastolic = (diastolic_sum / count) as i32;
        Some(stats)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub timestamp_ms: i64,
    pub value: i32,
}

/// One line of the trend chart, oldest reading first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    pub points: Vec<ChartPoint>,
    pub lower_bound: i32,
    pub upper_bound: i32,
}

impl ChartSeries {
    pub fn systolic(measurements: &[Measurement]) -> Self {
        Self::build(measurements, SYSTOLIC_CHART_RANGE, |m| m.systolic)
    }

    pub fn diastolic(measurements: &[Measurement]) -> Self {
        Self::build(measurements, DIASTOLIC_CHART_RANGE, |m| m.diastolic)
    }

    fn build(
        measurements: &[Measurement],
        (reference_min, reference_max): (i32, i32),
        value: impl Fn(&Measurement) -> i32,
    ) -> Self {
        let mut points: Vec<ChartPoint> = measurements
            .iter()
            .map(|m| ChartPoint {
                timestamp_ms: m.timestamp_ms,
                value: value(m),
            })
            .collect();
        points.sort_by_key(|p| p.timestamp_ms);

        let max = points.iter().map(|p| p.value).max().unwrap_or(reference_max);
        let min = points.iter().map(|p| p.value).min().unwrap_or(reference_min);

        Self {
            points,
            lower_bound: reference_min.min(min) - CHART_PADDING,
            upper_bound: reference_max.max(max) + CHART_PADDING,
        }
    }

    /// Fewer than two points cannot be drawn as a line.
    pub fn is_drawable(&self) -> bool {
        self.points.len() > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(systolic: i32, diastolic: i32, timestamp_ms: i64) -> Measurement {
        Measurement::new(systolic, diastolic, timestamp_ms, "08:00", "")
    }

    #[test]
    fn empty_input_has_no_stats() {
        assert_eq!(PressureStats::from_measurements(&[]), None);
    }

    #[test]
    fn aggregates_three_readings() {
        let readings = [reading(120, 80, 1), reading(140, 90, 2), reading(100, 70, 3)];
        let stats = PressureStats::from_measurements(&readings).unwrap();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.avg_systolic, 120);
        assert_eq!(stats.avg_diastolic, 80);
        assert_eq!(stats.max_systolic, 140);
        assert_eq!(stats.min_systolic, 100);
        assert_eq!(stats.max_diastolic, 90);
        assert_eq!(stats.min_diastolic, 70);
    }

    #[test]
    fn averages_truncate() {
        let readings = [reading(121, 80, 1), reading(122, 81, 2)];
        let stats = PressureStats::from_measurements(&readings).unwrap();
        assert_eq!(stats.avg_systolic, 121);
        assert_eq!(stats.avg_diastolic, 80);
    }

    #[test]
    fn chart_series_sorted_oldest_first_with_padded_bounds() {
        let readings = [reading(210, 80, 30), reading(130, 85, 10), reading(125, 130, 20)];

        let systolic = ChartSeries::systolic(&readings);
        let order: Vec<i64> = systolic.points.iter().map(|p| p.timestamp_ms).collect();
        assert_eq!(order, vec![10, 20, 30]);
        assert_eq!(systolic.upper_bound, 230);
        assert_eq!(systolic.lower_bound, 50);
        assert!(systolic.is_drawable());

        let diastolic = ChartSeries::diastolic(&readings);
        assert_eq!(diastolic.upper_bound, 150);
        assert_eq!(diastolic.lower_bound, 20);
    }

    #[test]
    fn single_point_is_not_drawable() {
        let series = ChartSeries::systolic(&[reading(120, 80, 1)]);
        assert!(!series.is_drawable());
        assert_eq!(series.upper_bound, 220);
        assert_eq!(series.lower_bound, 50);
    }
}
