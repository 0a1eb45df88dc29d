use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One 3-hourly forecast reading, already normalized from the raw provider
/// payload.
///
/// `timestamp` is the provider's wall-clock time for the sampled location.
/// It is kept naive on purpose: grouping into days must follow the location's
/// clock, never the machine's time zone.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSample {
    pub timestamp: NaiveDateTime,
    pub min_temp_c: f64,
    pub max_temp_c: f64,
    pub icon: String,
}

/// Aggregated forecast for one calendar date.
///
/// Derived on demand from samples and never persisted. `min_temp_c <=
/// max_temp_c` holds for every summary the aggregator produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySummary {
    /// Abbreviated weekday name, e.g. "Mon".
    pub day_label: String,
    pub min_temp_c: i32,
    pub max_temp_c: i32,
    /// Provider icon code of the day's first sample, e.g. "10d".
    pub icon: String,
}

/// Current conditions for a city, as shown on the home view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// City name as the provider resolved it (may differ in casing from the
    /// query).
    pub city: String,
    pub temp_c: f64,
    pub description: String,
    pub icon: String,
}
