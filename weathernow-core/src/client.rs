use anyhow::{Context, Result, anyhow};
use chrono::NaiveDateTime;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::InvalidInputError,
    model::{CurrentConditions, WeatherSample},
};

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Wall-clock format of forecast `dt_txt` timestamps.
const DT_TXT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// HTTP client for the OpenWeather REST API, metric units throughout.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            http: Client::new(),
        }
    }

    #[cfg(test)]
    fn new_with_base_url(api_key: &str, base_url: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            base_url: base_url.to_string(),
            http: Client::new(),
        }
    }

    /// Current conditions for `city`.
    pub async fn current(&self, city: &str) -> Result<CurrentConditions> {
        let url = format!("{}/weather", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .context("Failed to send request to OpenWeather (current weather)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read OpenWeather current response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "OpenWeather current request failed with status {}: {}",
                status,
                provider_error_message(&body),
            ));
        }

        let parsed: OwCurrentResponse =
            serde_json::from_str(&body).context("Failed to parse OpenWeather current JSON")?;

        let OwWeather { description, icon } = parsed
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("OpenWeather current response contained no weather data"))?;

        Ok(CurrentConditions {
            city: parsed.name,
            temp_c: parsed.main.temp,
            description,
            icon,
        })
    }

    /// 3-hourly forecast samples for `city`, normalized and ready for
    /// aggregation.
    pub async fn forecast(&self, city: &str) -> Result<Vec<WeatherSample>> {
        let url = format!("{}/forecast", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .context("Failed to send request to OpenWeather (5-day forecast)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read OpenWeather forecast response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "OpenWeather forecast request failed with status {}: {}",
                status,
                provider_error_message(&body),
            ));
        }

        let parsed: OwForecastResponse =
            serde_json::from_str(&body).context("Failed to parse OpenWeather forecast JSON")?;

        if parsed.list.is_empty() {
            return Err(anyhow!("OpenWeather forecast response contained no data"));
        }

        let samples = parsed
            .list
            .into_iter()
            .map(normalize_entry)
            .collect::<Result<Vec<_>, InvalidInputError>>()?;

        Ok(samples)
    }
}

/// URL of the provider-rendered image for an icon code.
pub fn icon_url(code: &str) -> String {
    format!("https://openweathermap.org/img/wn/{code}@2x.png")
}

/// Turn one raw forecast entry into a normalized sample, rejecting entries
/// with a malformed `dt_txt` or an empty `weather` array.
fn normalize_entry(entry: OwForecastEntry) -> Result<WeatherSample, InvalidInputError> {
    let OwForecastEntry { dt_txt, main, weather } = entry;

    let timestamp = NaiveDateTime::parse_from_str(&dt_txt, DT_TXT_FORMAT)
        .map_err(|_| InvalidInputError::BadTimestamp(dt_txt.clone()))?;

    let icon = weather
        .into_iter()
        .next()
        .map(|w| w.icon)
        .ok_or_else(|| InvalidInputError::MissingIcon(dt_txt))?;

    Ok(WeatherSample {
        timestamp,
        min_temp_c: main.temp_min,
        max_temp_c: main.temp_max,
        icon,
    })
}

/// Error responses carry a human-readable `message` ("city not found");
/// fall back to the raw body when there is none.
fn provider_error_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct OwError {
        message: String,
    }

    match serde_json::from_str::<OwError>(body) {
        Ok(err) if !err.message.is_empty() => err.message,
        _ => truncate_body(body),
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp_min: f64,
    temp_max: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastWeather {
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt_txt: String,
    main: OwForecastMain,
    weather: Vec<OwForecastWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn current_maps_the_provider_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("q", "Paris"))
            .and(query_param("units", "metric"))
            .and(query_param("appid", "KEY"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "Paris",
                "main": { "temp": 11.3 },
                "weather": [{ "description": "light rain", "icon": "10d" }]
            })))
            .mount(&server)
            .await;

        let client = OpenWeatherClient::new_with_base_url("KEY", &server.uri());
        let conditions = client.current("Paris").await.expect("current must succeed");

        assert_eq!(conditions.city, "Paris");
        assert_eq!(conditions.temp_c, 11.3);
        assert_eq!(conditions.description, "light rain");
        assert_eq!(conditions.icon, "10d");
    }

    #[tokio::test]
    async fn current_surfaces_the_provider_error_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "cod": "404",
                "message": "city not found"
            })))
            .mount(&server)
            .await;

        let client = OpenWeatherClient::new_with_base_url("KEY", &server.uri());
        let err = client.current("Atlantis").await.unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("404"));
        assert!(msg.contains("city not found"));
    }

    #[tokio::test]
    async fn current_without_weather_entries_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "Paris",
                "main": { "temp": 11.3 },
                "weather": []
            })))
            .mount(&server)
            .await;

        let client = OpenWeatherClient::new_with_base_url("KEY", &server.uri());
        let err = client.current("Paris").await.unwrap_err();

        assert!(err.to_string().contains("no weather data"));
    }

    #[tokio::test]
    async fn forecast_normalizes_every_entry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .and(query_param("q", "Paris"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "list": [
                    {
                        "dt_txt": "2025-12-15 12:00:00",
                        "main": { "temp_min": 9.1, "temp_max": 11.6 },
                        "weather": [{ "icon": "10d" }]
                    },
                    {
                        "dt_txt": "2025-12-15 15:00:00",
                        "main": { "temp_min": 8.4, "temp_max": 12.2 },
                        "weather": [{ "icon": "04d" }]
                    }
                ]
            })))
            .mount(&server)
            .await;

        let client = OpenWeatherClient::new_with_base_url("KEY", &server.uri());
        let samples = client.forecast("Paris").await.expect("forecast must succeed");

        assert_eq!(samples.len(), 2);
        assert_eq!(
            samples[0].timestamp,
            NaiveDateTime::parse_from_str("2025-12-15 12:00:00", DT_TXT_FORMAT).expect("parse")
        );
        assert_eq!(samples[0].min_temp_c, 9.1);
        assert_eq!(samples[0].max_temp_c, 11.6);
        assert_eq!(samples[1].icon, "04d");
    }

    #[tokio::test]
    async fn forecast_with_an_empty_list_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "list": [] })))
            .mount(&server)
            .await;

        let client = OpenWeatherClient::new_with_base_url("KEY", &server.uri());
        let err = client.forecast("Paris").await.unwrap_err();

        assert!(err.to_string().contains("contained no data"));
    }

    #[tokio::test]
    async fn forecast_rejects_entries_that_fail_validation() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "list": [
                    {
                        "dt_txt": "tomorrow-ish",
                        "main": { "temp_min": 1.0, "temp_max": 2.0 },
                        "weather": [{ "icon": "01d" }]
                    }
                ]
            })))
            .mount(&server)
            .await;

        let client = OpenWeatherClient::new_with_base_url("KEY", &server.uri());
        let err = client.forecast("Paris").await.unwrap_err();

        let invalid = err
            .downcast_ref::<InvalidInputError>()
            .expect("validation failures keep their type");
        assert!(matches!(invalid, InvalidInputError::BadTimestamp(_)));
    }

    #[test]
    fn entry_without_weather_is_rejected() {
        let entry = OwForecastEntry {
            dt_txt: "2025-12-15 12:00:00".to_string(),
            main: OwForecastMain { temp_min: 1.0, temp_max: 2.0 },
            weather: vec![],
        };

        let err = normalize_entry(entry).unwrap_err();

        assert!(matches!(err, InvalidInputError::MissingIcon(_)));
        assert!(err.to_string().contains("no weather icon"));
    }

    #[test]
    fn icon_url_points_at_the_rendered_image() {
        assert_eq!(icon_url("10d"), "https://openweathermap.org/img/wn/10d@2x.png");
    }
}
