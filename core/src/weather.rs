use serde::Serialize;
use serde_json::{Map, Value};

use crate::args::arg_str;
use crate::datasets::lookup_weather;
use crate::tool::{Tool, ToolError, ToolOutput, ToolProperty};

pub const MOCK_SOURCE: &str = "mock data";
pub const DEFAULT_SOURCE: &str = "mock data (city not in database - returning default)";
const UNKNOWN_CITY: &str = "Unknown";

static PROPERTIES: [ToolProperty; 1] = [ToolProperty::string(
    "city",
    "The name of the city to get weather for.",
)];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    pub city: String,
    pub temperature_c: i32,
    pub temperature_f: f64,
    pub condition: &'static str,
    pub humidity_pct: u8,
    pub wind_kmh: u32,
    pub source: &'static str,
}

/// Mock weather for `city`. Unknown cities get a fixed mild-weather default.
pub fn get_weather(city: &str) -> WeatherReport {
    let city = city.trim().to_lowercase();
    match lookup_weather(&city) {
        Some(record) => WeatherReport {
            city: title_case(&city),
            temperature_c: record.temperature_c,
            temperature_f: celsius_to_fahrenheit(record.temperature_c),
            condition: record.condition,
            humidity_pct: record.humidity_pct,
            wind_kmh: record.wind_kmh,
            source: MOCK_SOURCE,
        },
        None => {
            let display = if city.is_empty() {
                UNKNOWN_CITY.to_string()
            } else {
                title_case(&city)
            };
            WeatherReport {
                city: display,
                temperature_c: 20,
                temperature_f: 68.0,
                condition: "Clear",
                humidity_pct: 60,
                wind_kmh: 10,
                source: DEFAULT_SOURCE,
            }
        }
    }
}

pub struct GetWeather;

impl Tool for GetWeather {
    fn name(&self) -> &'static str {
        "get_weather"
    }

    fn description(&self) -> &'static str {
        "Returns current weather conditions for a given city. Uses mock data."
    }

    fn properties(&self) -> &'static [ToolProperty] {
        &PROPERTIES
    }

    fn invoke(&self, args: &Map<String, Value>) -> Result<ToolOutput, ToolError> {
        tracing::info!("get_weather triggered");
        let city = arg_str(args, "city")?;
        ToolOutput::json(&get_weather(city))
    }
}

/// Rounded to one decimal place, half away from zero.
fn celsius_to_fahrenheit(celsius: i32) -> f64 {
    let fahrenheit = f64::from(celsius) * 9.0 / 5.0 + 32.0;
    (fahrenheit * 10.0).round() / 10.0
}

/// Upper-case every letter that follows a non-letter, lower-case the rest.
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut prev_is_letter = false;
    for ch in input.chars() {
        if prev_is_letter {
            out.extend(ch.to_lowercase());
        } else {
            out.extend(ch.to_uppercase());
        }
        prev_is_letter = ch.is_alphabetic();
    }
    out
}
