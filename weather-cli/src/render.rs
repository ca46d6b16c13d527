use std::fmt::Write;

use weather_core::{QueryError, WeatherViewModel};

/// Plain-text card for a successful query.
pub fn view_model(vm: &WeatherViewModel) -> String {
    let c = &vm.current;
    let mut out = String::new();

    let _ = writeln!(out, "{}", c.location);
    let _ = writeln!(out, "{} ({})", capitalize(&c.condition.description), c.condition.category);
    let _ = writeln!(out, "{}°C  feels like {}°C", c.temperature_c, c.feels_like_c);
    let _ = writeln!(out, "High {}°C / Low {}°C", c.temp_max_c, c.temp_min_c);
    let _ = writeln!(out, "Updated: {}", c.updated_at);
    let _ = writeln!(out);
    let _ = writeln!(out, "  Humidity    {}", c.humidity);
    let _ = writeln!(out, "  Wind        {}", c.wind);
    let _ = writeln!(out, "  Pressure    {}", c.pressure);
    if let Some(visibility) = &c.visibility {
        let _ = writeln!(out, "  Visibility  {visibility}");
    }
    let _ = writeln!(out, "  Cloudiness  {}", c.cloudiness);
    if let (Some(sunrise), Some(sunset)) = (&c.sunrise, &c.sunset) {
        let _ = writeln!(out, "  Sunrise     {sunrise}");
        let _ = writeln!(out, "  Sunset      {sunset}");
    }
    let _ = writeln!(out, "  Latitude: {} | Longitude: {}", c.latitude, c.longitude);

    if !vm.daily.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Forecast");
        for day in &vm.daily {
            let _ = writeln!(
                out,
                "  {:<8} {:>4}°C / {:>4}°C  {}",
                day.label,
                day.max_c,
                day.min_c,
                capitalize(&day.condition.description)
            );
        }
    }

    out.trim_end().to_string()
}

pub fn error(err: &QueryError) -> String {
    let hint = match err {
        QueryError::InvalidInput => "Enter a city name.",
        QueryError::NotFound(_) => "Check the spelling of the city.",
        QueryError::UpstreamUnavailable(_) | QueryError::ForecastUnavailable(_) => {
            "Try again in a moment."
        }
        QueryError::MalformedResponse(_) => "The weather service sent data that could not be read.",
    };
    format!("Error: {err}\n{hint}")
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weather_core::{ConditionCategory, ConditionView, CurrentView, DailyForecastView};

    fn condition(description: &str) -> ConditionView {
        ConditionView {
            category: ConditionCategory::Clear,
            description: description.to_string(),
            icon_url: "https://icons.test/01d@2x.png".to_string(),
        }
    }

    fn sample() -> WeatherViewModel {
        WeatherViewModel {
            current: CurrentView {
                location: "Paris, FR".into(),
                condition: condition("clear sky"),
                temperature_c: "26.9".into(),
                temp_min_c: "25.0".into(),
                temp_max_c: "28.0".into(),
                feels_like_c: "25.9".into(),
                humidity: "40%".into(),
                wind: "3.6 m/s".into(),
                pressure: "1012 hPa".into(),
                visibility: None,
                cloudiness: "0%".into(),
                sunrise: Some("06:00 AM".into()),
                sunset: Some("06:30 PM".into()),
                updated_at: "12:00:45 PM".into(),
                latitude: 48.8534,
                longitude: 2.3488,
            },
            daily: vec![DailyForecastView {
                timestamp: 1_704_110_400,
                label: "Today".into(),
                max_c: "27".into(),
                min_c: "7".into(),
                condition: condition("scattered clouds"),
            }],
        }
    }

    #[test]
    fn renders_current_and_forecast() {
        let text = view_model(&sample());

        assert!(text.starts_with("Paris, FR\nClear sky (Clear)"));
        assert!(text.contains("26.9°C  feels like 25.9°C"));
        assert!(text.contains("Sunrise     06:00 AM"));
        assert!(!text.contains("Visibility"));
        assert!(text.contains("Today"));
        assert!(text.contains("Scattered clouds"));
    }

    #[test]
    fn error_includes_hint() {
        let text = error(&QueryError::NotFound("Atlantis".into()));
        assert_eq!(text, "Error: City not found: Atlantis\nCheck the spelling of the city.");
    }

    #[test]
    fn capitalize_handles_empty_and_unicode() {
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("éclair"), "Éclair");
    }
}
