//! Turns 3-hourly forecast samples into at-most-five daily summaries.

use chrono::NaiveDate;

use crate::model::{DailySummary, WeatherSample};

/// Upper bound on the number of daily summaries returned.
pub const MAX_FORECAST_DAYS: usize = 5;

/// Collapse forecast samples into one summary per calendar date.
///
/// Samples are grouped by the date portion of their timestamp, with no time
/// zone conversion. Days keep the order in which their dates first appear in
/// the input; within a day the lowest `min_temp_c` and highest `max_temp_c`
/// win, and the icon comes from the day's first sample. At most
/// [`MAX_FORECAST_DAYS`] summaries are returned; empty input yields an empty
/// vector.
pub fn aggregate(samples: &[WeatherSample]) -> Vec<DailySummary> {
    let mut days: Vec<DayGroup> = Vec::with_capacity(MAX_FORECAST_DAYS);

    for sample in samples {
        let date = sample.timestamp.date();

        match days.iter_mut().find(|group| group.date == date) {
            Some(group) => {
                group.min_temp_c = group.min_temp_c.min(sample.min_temp_c);
                group.max_temp_c = group.max_temp_c.max(sample.max_temp_c);
            }
            None => days.push(DayGroup {
                date,
                min_temp_c: sample.min_temp_c,
                max_temp_c: sample.max_temp_c,
                icon: sample.icon.clone(),
            }),
        }
    }

    days.truncate(MAX_FORECAST_DAYS);
    days.into_iter().map(DayGroup::into_summary).collect()
}

/// Running min/max for one calendar date while samples are folded in.
struct DayGroup {
    date: NaiveDate,
    min_temp_c: f64,
    max_temp_c: f64,
    icon: String,
}

impl DayGroup {
    fn into_summary(self) -> DailySummary {
        DailySummary {
            day_label: self.date.format("%a").to_string(),
            min_temp_c: round_temp(self.min_temp_c),
            max_temp_c: round_temp(self.max_temp_c),
            icon: self.icon,
        }
    }
}

/// Nearest integer, ties away from zero: `2.5 -> 3`, `-2.5 -> -3`.
fn round_temp(temp: f64) -> i32 {
    temp.round() as i32
}
