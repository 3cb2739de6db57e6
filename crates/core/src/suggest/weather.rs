//! Turning a raw short-range forecast into traveler-facing weather tips.

use serde::{Deserialize, Serialize};

/// What the forecast service reports for a destination, consumed opaquely.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub condition: String,
    pub temperature_c: f64,
    pub humidity: u8,
}

/// Forecast digested into the fields the itinerary composer consumes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub temperature_c: i64,
    pub humidity: u8,
    pub condition: String,
    pub tips: Vec<String>,
}

impl WeatherReport {
    pub fn is_rainy(&self) -> bool {
        self.condition.to_lowercase().contains("rain")
    }
}

/// Derives the report from a forecast using fixed thresholds. Each matching
/// threshold contributes its tips; when none match, a single generic tip is
/// returned so the list is never empty.
pub fn annotate(forecast: &Forecast) -> WeatherReport {
    let mut tips = Vec::new();

    if forecast.temperature_c > 30.0 {
        tips.push("Carry sun protection and stay hydrated".to_string());
        tips.push("Schedule outdoor plans before noon".to_string());
    }
    if forecast.temperature_c < 15.0 {
        tips.push("Pack warm layers for mornings and evenings".to_string());
    }
    if forecast.condition.to_lowercase().contains("rain") {
        tips.push("Keep a compact umbrella handy".to_string());
        tips.push("Allow buffer time for traffic in the rain".to_string());
    }
    if forecast.humidity > 70 {
        tips.push("Choose breathable cotton clothing".to_string());
    }

    if tips.is_empty() {
        tips.push("Weather looks comfortable; no special packing needed".to_string());
    }

    WeatherReport {
        temperature_c: forecast.temperature_c.round() as i64,
        humidity: forecast.humidity,
        condition: forecast.condition.clone(),
        tips,
    }
}

#[cfg(test)]
mod tests {
    use super::{annotate, Forecast};

    fn forecast(condition: &str, temperature_c: f64, humidity: u8) -> Forecast {
        Forecast { condition: condition.to_string(), temperature_c, humidity }
    }

    #[test]
    fn hot_weather_yields_heat_tips() {
        let report = annotate(&forecast("Sunny", 34.6, 40));
        assert_eq!(report.temperature_c, 35);
        assert!(report.tips.iter().any(|tip| tip.contains("hydrated")));
    }

    #[test]
    fn cold_weather_yields_layering_tip() {
        let report = annotate(&forecast("Clear", 9.2, 30));
        assert!(report.tips.iter().any(|tip| tip.contains("warm layers")));
    }

    #[test]
    fn rain_and_humidity_tips_stack() {
        let report = annotate(&forecast("Light rain showers", 26.0, 85));
        assert!(report.is_rainy());
        assert!(report.tips.iter().any(|tip| tip.contains("umbrella")));
        assert!(report.tips.iter().any(|tip| tip.contains("cotton")));
    }

    #[test]
    fn mild_weather_gets_a_single_generic_tip() {
        let report = annotate(&forecast("Partly cloudy", 24.0, 50));
        assert_eq!(report.tips.len(), 1);
        assert!(report.tips[0].contains("comfortable"));
    }
}
