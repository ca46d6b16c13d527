//! Turns raw upstream data into the display-ready [`WeatherViewModel`].
//!
//! Everything here is a pure function of its inputs: no clock, no I/O.
//!
//! Rounding is half away from zero, applied to the scaled value, so
//! `300.0 K` displays as `26.9` (one decimal) and `27` (no decimals).

use chrono::{DateTime, FixedOffset};

use crate::model::{
    ConditionCategory, ConditionDescriptor, ConditionView, CurrentConditions, CurrentView,
    DailyForecastView, ForecastEntry, WeatherViewModel,
};

const KELVIN_OFFSET: f64 = 273.15;
const NOON_MARKER: &str = "12:00:00";
const TODAY_LABEL: &str = "Today";

/// Decimal places for the hero/current-conditions temperatures.
pub const CURRENT_DECIMALS: usize = 1;
/// Decimal places for forecast card temperatures.
pub const FORECAST_DECIMALS: usize = 0;

pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin - KELVIN_OFFSET
}

/// Round half away from zero. Negative zero comes back as `0.0`.
pub fn round_half_away(value: f64, decimals: usize) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor + 0.0
}

pub fn format_celsius(kelvin: f64, decimals: usize) -> String {
    let rounded = round_half_away(kelvin_to_celsius(kelvin), decimals);
    format!("{rounded:.decimals$}")
}

fn local_datetime(ts: i64, utc_offset_secs: i32) -> Option<DateTime<FixedOffset>> {
    let offset = FixedOffset::east_opt(utc_offset_secs)?;
    DateTime::from_timestamp(ts, 0).map(|utc| utc.with_timezone(&offset))
}

/// `06:12 AM` style time of day.
pub fn format_time_of_day(ts: i64, utc_offset_secs: i32) -> Option<String> {
    local_datetime(ts, utc_offset_secs).map(|dt| dt.format("%I:%M %p").to_string())
}

/// `06:12:45 AM` style time of day, used for the observation stamp.
pub fn format_clock(ts: i64, utc_offset_secs: i32) -> Option<String> {
    local_datetime(ts, utc_offset_secs).map(|dt| dt.format("%I:%M:%S %p").to_string())
}

/// Short weekday plus day of month, e.g. `Tue 2`.
pub fn format_day_label(ts: i64, utc_offset_secs: i32) -> Option<String> {
    local_datetime(ts, utc_offset_secs).map(|dt| dt.format("%a %-d").to_string())
}

fn is_noon_marker(dt_txt: &str) -> bool {
    dt_txt.split_whitespace().nth(1) == Some(NOON_MARKER)
}

fn date_part(dt_txt: &str) -> &str {
    dt_txt.split_whitespace().next().unwrap_or_default()
}

/// Keep one sample per calendar day: the one stamped at noon in the feed.
///
/// The result is ordered by ascending timestamp and may be empty.
pub fn daily_noon_entries(entries: Vec<ForecastEntry>) -> Vec<ForecastEntry> {
    let mut daily: Vec<ForecastEntry> = entries
        .into_iter()
        .filter(|entry| is_noon_marker(&entry.dt_txt))
        .collect();

    daily.sort_by_key(|entry| entry.dt);
    daily.dedup_by(|later, earlier| date_part(&later.dt_txt) == date_part(&earlier.dt_txt));
    daily
}

pub fn icon_url(icon_base_url: &str, icon: &str) -> String {
    format!("{}/{icon}@2x.png", icon_base_url.trim_end_matches('/'))
}

fn condition_view(descriptor: &ConditionDescriptor, icon_base_url: &str) -> ConditionView {
    ConditionView {
        category: ConditionCategory::from_main(&descriptor.main),
        description: descriptor.description.clone(),
        icon_url: icon_url(icon_base_url, &descriptor.icon),
    }
}

fn current_view(current: &CurrentConditions, primary: &ConditionDescriptor, icon_base_url: &str) -> CurrentView {
    let offset = current.utc_offset_secs;

    let location = if current.country.is_empty() {
        current.name.clone()
    } else {
        format!("{}, {}", current.name, current.country)
    };

    CurrentView {
        location,
        condition: condition_view(primary, icon_base_url),
        temperature_c: format_celsius(current.temp_k, CURRENT_DECIMALS),
        temp_min_c: format_celsius(current.temp_min_k, CURRENT_DECIMALS),
        temp_max_c: format_celsius(current.temp_max_k, CURRENT_DECIMALS),
        feels_like_c: format_celsius(current.feels_like_k, CURRENT_DECIMALS),
        humidity: format!("{}%", current.humidity_pct),
        wind: format!("{} m/s", current.wind_speed_mps),
        pressure: format!("{} hPa", current.pressure_hpa),
        visibility: current
            .visibility_m
            .map(|m| format!("{:.1} km", round_half_away(f64::from(m) / 1000.0, 1))),
        cloudiness: format!("{}%", current.cloudiness_pct),
        sunrise: current.sunrise.and_then(|ts| format_time_of_day(ts, offset)),
        sunset: current.sunset.and_then(|ts| format_time_of_day(ts, offset)),
        updated_at: format_clock(current.observed_at, offset)
            .unwrap_or_else(|| current.observed_at.to_string()),
        latitude: current.latitude,
        longitude: current.longitude,
    }
}

/// Assemble the view model from a validated pair of upstream responses.
///
/// Returns `None` when `current` carries no condition descriptor.
pub fn build_view_model(
    current: &CurrentConditions,
    forecast: Vec<ForecastEntry>,
    icon_base_url: &str,
) -> Option<WeatherViewModel> {
    let primary = current.conditions.first()?;
    let offset = current.utc_offset_secs;

    let daily = daily_noon_entries(forecast)
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let label = if index == 0 {
                TODAY_LABEL.to_string()
            } else {
                format_day_label(entry.dt, offset).unwrap_or_else(|| entry.dt_txt.clone())
            };

            DailyForecastView {
                timestamp: entry.dt,
                label,
                max_c: format_celsius(entry.temp_max_k, FORECAST_DECIMALS),
                min_c: format_celsius(entry.temp_min_k, FORECAST_DECIMALS),
                condition: condition_view(&entry.condition, icon_base_url),
            }
        })
        .collect();

    Some(WeatherViewModel {
        current: current_view(current, primary, icon_base_url),
        daily,
    })
}
