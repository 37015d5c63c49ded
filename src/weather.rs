/// Weather widget data: IP geolocation and Open-Meteo lookups, plus the
/// WMO weather-code display tables.
use serde::{Deserialize, Serialize};

/// IP-based location, no permission prompt needed.
pub const GEOLOCATION_URL: &str = "https://ipapi.co/json/";

pub fn forecast_url(latitude: f64, longitude: f64) -> String {
    format!(
        "https://api.open-meteo.com/v1/forecast?latitude={latitude}&longitude={longitude}&current=temperature_2m,weather_code&timezone=auto"
    )
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub city: String,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: CurrentConditions,
}

#[derive(Debug, Deserialize)]
struct CurrentConditions {
    temperature_2m: f64,
    weather_code: u16,
}

/// What the widget renders and what the weather cache stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub temp: i32,
    pub code: u16,
    pub location: String,
}

pub fn parse_geolocation(body: &str) -> Result<GeoLocation, serde_json::Error> {
    serde_json::from_str(body)
}

pub fn parse_forecast(body: &str, city: &str) -> Result<WeatherSnapshot, serde_json::Error> {
    let response: ForecastResponse = serde_json::from_str(body)?;
    let location = if city.is_empty() {
        "Your Location".to_string()
    } else {
        city.to_string()
    };
    Ok(WeatherSnapshot {
        temp: response.current.temperature_2m.round() as i32,
        code: response.current.weather_code,
        location,
    })
}

/// WMO weather code to icon. Unmapped codes fall back to a generic icon.
pub fn icon_for_code(code: u16) -> &'static str {
    match code {
        0 => "☀️",
        1 => "🌤️",
        2 => "⛅",
        3 => "☁️",
        45 | 48 => "🌫️",
        51 | 53 | 55 | 61 | 63 | 65 => "🌧️",
        71 | 73 | 75 | 77 => "❄️",
        80 | 81 | 82 => "🌦️",
        85 | 86 => "🌨️",
        95 | 96 | 99 => "⛈️",
        _ => "🌡️",
    }
}

pub fn description_for_code(code: u16) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Foggy",
        48 => "Rime fog",
        51 => "Light drizzle",
        53 => "Drizzle",
        55 => "Heavy drizzle",
        61 => "Light rain",
        63 => "Rain",
        65 => "Heavy rain",
        71 => "Light snow",
        73 => "Snow",
        75 => "Heavy snow",
        77 => "Snow grains",
        80 => "Light showers",
        81 => "Showers",
        82 => "Heavy showers",
        85 => "Light snow showers",
        86 => "Snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with hail",
        99 => "Severe thunderstorm",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_geolocation() {
        let body = r#"{"latitude": 52.52, "longitude": 13.40, "city": "Berlin", "country": "DE"}"#;

        let geo = parse_geolocation(body).unwrap();

        assert_eq!(geo.latitude, 52.52);
        assert_eq!(geo.longitude, 13.40);
        assert_eq!(geo.city, "Berlin");
    }

    #[test]
    fn test_parse_geolocation_tolerates_missing_city() {
        let body = r#"{"latitude": 0.0, "longitude": 0.0}"#;

        let geo = parse_geolocation(body).unwrap();

        assert_eq!(geo.city, "");
    }

    #[test]
    fn test_parse_forecast_rounds_temperature() {
        let body = r#"{"current": {"temperature_2m": 21.6, "weather_code": 3, "time": "2026-08-30T12:00"}}"#;

        let snapshot = parse_forecast(body, "Berlin").unwrap();

        assert_eq!(snapshot.temp, 22);
        assert_eq!(snapshot.code, 3);
        assert_eq!(snapshot.location, "Berlin");
    }

    #[test]
    fn test_parse_forecast_defaults_location_when_city_unknown() {
        let body = r#"{"current": {"temperature_2m": -3.4, "weather_code": 71}}"#;

        let snapshot = parse_forecast(body, "").unwrap();

        assert_eq!(snapshot.temp, -3);
        assert_eq!(snapshot.location, "Your Location");
    }

    #[test]
    fn test_parse_forecast_rejects_malformed_payload() {
        assert!(parse_forecast(r#"{"current": {}}"#, "").is_err());
        assert!(parse_forecast("not json", "").is_err());
    }

    #[test]
    fn test_wmo_code_tables() {
        assert_eq!(icon_for_code(0), "☀️");
        assert_eq!(description_for_code(0), "Clear sky");
        assert_eq!(icon_for_code(55), "🌧️");
        assert_eq!(description_for_code(55), "Heavy drizzle");
        assert_eq!(icon_for_code(99), "⛈️");
        assert_eq!(description_for_code(99), "Severe thunderstorm");
    }

    #[test]
    fn test_unmapped_code_falls_back_to_unknown() {
        assert_eq!(icon_for_code(42), "🌡️");
        assert_eq!(description_for_code(42), "Unknown");
    }

    #[test]
    fn test_forecast_url_carries_coordinates() {
        let url = forecast_url(52.52, 13.4);
        assert!(url.starts_with("https://api.open-meteo.com/v1/forecast?"));
        assert!(url.contains("latitude=52.52"));
        assert!(url.contains("longitude=13.4"));
        assert!(url.contains("current=temperature_2m,weather_code"));
    }
}
