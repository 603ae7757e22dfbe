//! Synthetic bike-rental data in the dashboard's source schema.
//!
//! Handy for demos and tests when the real export is not at hand. The output
//! uses the same raw encoding as the source file: `DD/MM/YYYY` dates, 0/1
//! holiday and functioning-day codes, and one-hot season columns.

use std::f64::consts::PI;
use std::path::Path;

use chrono::{Datelike, Duration, NaiveDate};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;
use serde::Serialize;
use tracing::info;

use crate::error::AppError;
use crate::io::ingest::DATE_FORMAT;

/// Fixed-date public holidays (month, day).
const HOLIDAYS: [(u32, u32); 8] = [(1, 1), (3, 1), (5, 5), (6, 6), (8, 15), (10, 3), (10, 9), (12, 25)];

/// Chance that a whole day is a non-functioning day.
const NON_FUNCTIONING_PROB: f64 = 0.03;

#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub start: NaiveDate,
    pub days: u32,
    pub seed: u64,
}

/// One hourly row, serialized with the source column names.
#[derive(Debug, Clone, Serialize)]
pub struct SampleRow {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Rented Bike Count")]
    pub rented_bike_count: u32,
    #[serde(rename = "Hour")]
    pub hour: u32,
    #[serde(rename = "Temperature(C)")]
    pub temperature: f64,
    #[serde(rename = "Humidity(%)")]
    pub humidity: u32,
    #[serde(rename = "Wind speed (m/s)")]
    pub wind_speed: f64,
    #[serde(rename = "Visibility (10m)")]
    pub visibility: u32,
    #[serde(rename = "Dew point temperature(C)")]
    pub dew_point: f64,
    #[serde(rename = "Solar Radiation (MJ/m2)")]
    pub solar_radiation: f64,
    #[serde(rename = "Rainfall(mm)")]
    pub rainfall: f64,
    #[serde(rename = "Snowfall (cm)")]
    pub snowfall: f64,
    #[serde(rename = "Seasons")]
    pub season: &'static str,
    #[serde(rename = "Holiday")]
    pub holiday: u8,
    #[serde(rename = "Functioning Day")]
    pub functioning_day: u8,
    #[serde(rename = "Winter")]
    pub winter: u8,
    #[serde(rename = "Summer")]
    pub summer: u8,
    #[serde(rename = "Spring")]
    pub spring: u8,
    #[serde(rename = "Autumn")]
    pub autumn: u8,
}

pub fn season_for_month(month: u32) -> &'static str {
    match month {
        12 | 1 | 2 => "Winter",
        3..=5 => "Spring",
        6..=8 => "Summer",
        _ => "Autumn",
    }
}

pub fn generate_sample(config: &SampleConfig) -> Result<Vec<SampleRow>, AppError> {
    if config.days == 0 {
        return Err(AppError::new(2, "Sample day count must be > 0."));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let noise = Normal::new(0.0, 1.0).map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?;

    let mut rows = Vec::with_capacity(config.days as usize * 24);
    for day in 0..config.days {
        let date = config.start + Duration::days(i64::from(day));
        let season = season_for_month(date.month());
        let is_holiday = HOLIDAYS.contains(&(date.month(), date.day()));
        let functioning = !rng.gen_bool(NON_FUNCTIONING_PROB);

        // Annual cycle peaking in late July.
        let annual = (2.0 * PI * (f64::from(date.ordinal()) - 110.0) / 365.0).sin();

        for hour in 0..24u32 {
            let diurnal = (2.0 * PI * (f64::from(hour) - 9.0) / 24.0).sin();
            let temperature = round1(12.5 + 14.0 * annual + 4.0 * diurnal + 2.0 * noise.sample(&mut rng));
            let humidity = (60.0 - 12.0 * diurnal + 15.0 * noise.sample(&mut rng)).clamp(10.0, 98.0);
            let wind_speed = round1((1.7 + 0.9 * noise.sample(&mut rng)).abs());
            let visibility = rng.gen_range(200..=2000u32);
            let dew_point = round1(temperature - (100.0 - humidity) / 5.0);
            let solar_radiation = if (6..=19).contains(&hour) {
                let sun = (PI * (f64::from(hour) - 6.0) / 13.0).sin();
                round2((sun * (1.6 + 1.0 * annual)).max(0.0))
            } else {
                0.0
            };
            let rainfall = if rng.gen_bool(0.06) { round1(rng.gen_range(0.1..10.0)) } else { 0.0 };
            let snowfall = if temperature < 0.0 && rng.gen_bool(0.04) {
                round1(rng.gen_range(0.1..5.0))
            } else {
                0.0
            };

            let rented_bike_count = if functioning {
                let commute = 420.0 * gaussian_bump(hour, 8.0, 1.0) + 650.0 * gaussian_bump(hour, 18.0, 1.6);
                let weather = 28.0 * temperature - 3.0 * humidity - 90.0 * rainfall - 60.0 * snowfall;
                let holiday_factor = if is_holiday { 0.6 } else { 1.0 };
                let mean = (250.0 + commute + weather).max(0.0) * holiday_factor;
                (mean * (1.0 + 0.15 * noise.sample(&mut rng))).max(0.0).round() as u32
            } else {
                0
            };

            rows.push(SampleRow {
                date: date.format(DATE_FORMAT).to_string(),
                rented_bike_count,
                hour,
                temperature,
                humidity: humidity.round() as u32,
                wind_speed,
                visibility,
                dew_point,
                solar_radiation,
                rainfall,
                snowfall,
                season,
                holiday: u8::from(is_holiday),
                // Source encoding: 0 is a functioning day.
                functioning_day: u8::from(!functioning),
                winter: u8::from(season == "Winter"),
                summer: u8::from(season == "Summer"),
                spring: u8::from(season == "Spring"),
                autumn: u8::from(season == "Autumn"),
            });
        }
    }

    Ok(rows)
}

pub fn write_sample_csv(path: &Path, rows: &[SampleRow]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(2, format!("Failed to create sample CSV '{}': {e}", path.display())))?;
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| AppError::new(2, format!("Failed to write sample row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush sample CSV: {e}")))?;
    info!(path = %path.display(), rows = rows.len(), "wrote sample dataset");
    Ok(())
}

fn gaussian_bump(hour: u32, center: f64, width: f64) -> f64 {
    let d = (f64::from(hour) - center) / width;
    (-0.5 * d * d).exp()
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
