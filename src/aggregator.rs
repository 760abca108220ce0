//! Forecast aggregation
//!
//! Collapses 3-hourly provider samples into one summary per calendar day:
//! temperature range plus the most frequent icon and description.

use std::collections::BTreeMap;

use crate::models::{DailyForecast, RawForecastInterval};

/// Maximum number of days returned
pub const MAX_FORECAST_DAYS: usize = 5;

/// Occurrence counts in first-insertion order.
///
/// Ties resolve to the value seen first, so no secondary sort key is needed.
#[derive(Debug, Default)]
struct Tally {
    entries: Vec<(String, usize)>,
}

impl Tally {
    fn record(&mut self, value: Option<&str>) {
        let Some(value) = value.filter(|v| !v.is_empty()) else {
            return;
        };
        match self.entries.iter_mut().find(|(seen, _)| seen == value) {
            Some((_, count)) => *count += 1,
            None => self.entries.push((value.to_string(), 1)),
        }
    }

    fn winner(self) -> Option<String> {
        let mut best: Option<(String, usize)> = None;
        for (value, count) in self.entries {
            if best.as_ref().is_none_or(|(_, top)| count > *top) {
                best = Some((value, count));
            }
        }
        best.map(|(value, _)| value)
    }
}

#[derive(Debug)]
struct DayBucket {
    min: f64,
    max: f64,
    icons: Tally,
    summaries: Tally,
}

impl DayBucket {
    fn new(temperature: f64) -> Self {
        Self {
            min: temperature,
            max: temperature,
            icons: Tally::default(),
            summaries: Tally::default(),
        }
    }

    fn add(&mut self, interval: &RawForecastInterval) {
        self.min = self.min.min(interval.temperature);
        self.max = self.max.max(interval.temperature);
        self.icons.record(interval.icon.as_deref());
        self.summaries.record(interval.description.as_deref());
    }

    fn finish(self, date: String) -> DailyForecast {
        DailyForecast {
            date,
            min_temp: self.min,
            max_temp: self.max,
            icon: self.icons.winner(),
            summary: self.summaries.winner().unwrap_or_default(),
        }
    }
}

/// Aggregate raw intervals into at most five daily forecasts, earliest first.
///
/// Dates are taken verbatim from the provider timestamps; `YYYY-MM-DD` sorts
/// lexically in calendar order.
#[must_use]
pub fn aggregate_daily(intervals: &[RawForecastInterval]) -> Vec<DailyForecast> {
    let mut days: BTreeMap<String, DayBucket> = BTreeMap::new();

    for interval in intervals {
        days.entry(interval.date().to_string())
            .or_insert_with(|| DayBucket::new(interval.temperature))
            .add(interval);
    }

    days.into_iter()
        .take(MAX_FORECAST_DAYS)
        .map(|(date, bucket)| bucket.finish(date))
        .collect()
}
