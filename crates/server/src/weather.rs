//! Outbound weather forecast client. Strictly best-effort: any failure is
//! logged and reported upstream as an [`UpstreamError`], never surfaced to
//! the end user.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Deserialize;
use tracing::warn;

use tripweaver_core::config::WeatherConfig;
use tripweaver_core::{Forecast, ForecastProvider, UpstreamError};

const FORECAST_DAYS: u8 = 3;

pub struct HttpForecastProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpForecastProvider {
    pub fn new(config: &WeatherConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.as_ref().map(|key| key.expose_secret().to_string()),
        })
    }
}

#[derive(Debug, Deserialize)]
struct ForecastPayload {
    condition: String,
    temperature_c: f64,
    humidity: u8,
}

impl From<ForecastPayload> for Forecast {
    fn from(payload: ForecastPayload) -> Self {
        Forecast {
            condition: payload.condition,
            temperature_c: payload.temperature_c,
            humidity: payload.humidity,
        }
    }
}

#[async_trait]
impl ForecastProvider for HttpForecastProvider {
    async fn three_day_forecast(&self, destination: &str) -> Result<Forecast, UpstreamError> {
        let url = format!("{}/forecast", self.base_url);
        let days = FORECAST_DAYS.to_string();
        let mut request =
            self.client.get(&url).query(&[("city", destination), ("days", days.as_str())]);
        if let Some(api_key) = &self.api_key {
            request = request.query(&[("key", api_key.as_str())]);
        }

        let response = request.send().await.map_err(|error| {
            warn!(
                event_name = "weather.request_failed",
                destination = %destination,
                error = %error,
                "weather forecast request failed"
            );
            classify(error)
        })?;

        let response = response.error_for_status().map_err(|error| {
            warn!(
                event_name = "weather.bad_status",
                destination = %destination,
                error = %error,
                "weather forecast returned an error status"
            );
            classify(error)
        })?;

        let payload = response.json::<ForecastPayload>().await.map_err(|error| {
            warn!(
                event_name = "weather.decode_failed",
                destination = %destination,
                error = %error,
                "weather forecast payload did not decode"
            );
            classify(error)
        })?;

        Ok(payload.into())
    }
}

fn classify(error: reqwest::Error) -> UpstreamError {
    if error.is_timeout() {
        UpstreamError::Timeout
    } else {
        UpstreamError::Failed(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use tripweaver_core::suggest::weather::annotate;
    use tripweaver_core::Forecast;

    use super::ForecastPayload;

    #[test]
    fn payload_decodes_and_feeds_the_annotator() {
        let payload: ForecastPayload = serde_json::from_str(
            r#"{"condition": "Light rain", "temperature_c": 27.4, "humidity": 82}"#,
        )
        .expect("payload decodes");

        let forecast = Forecast::from(payload);
        assert_eq!(forecast.condition, "Light rain");

        let report = annotate(&forecast);
        assert!(report.is_rainy());
        assert_eq!(report.temperature_c, 27);
    }

    #[test]
    fn payload_rejects_missing_fields() {
        let result =
            serde_json::from_str::<ForecastPayload>(r#"{"condition": "Sunny"}"#);
        assert!(result.is_err());
    }
}
