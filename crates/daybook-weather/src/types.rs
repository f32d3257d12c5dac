use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// What to look the weather up for.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherQuery {
    /// Free-text place name, e.g. "Paris".
    City(String),
    /// Device position.
    Coordinates { latitude: f64, longitude: f64 },
}

impl WeatherQuery {
    /// City query from user input; `None` when the input is blank.
    pub fn city(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self::City(trimmed.to_string()))
        }
    }

    pub fn coordinates(latitude: f64, longitude: f64) -> Self {
        Self::Coordinates {
            latitude,
            longitude,
        }
    }

    /// Value for the `q` query parameter.
    pub fn as_param(&self) -> String {
        match self {
            Self::City(name) => name.clone(),
            Self::Coordinates {
                latitude,
                longitude,
            } => format!("{},{}", latitude, longitude),
        }
    }
}

/// Current conditions response from `current.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherReport {
    pub location: ReportLocation,
    pub current: CurrentConditions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportLocation {
    pub name: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub country: String,
    /// Local time at the location, formatted "YYYY-MM-DD HH:MM"
    #[serde(default)]
    pub localtime: String,
}

impl ReportLocation {
    /// "Name, Region, Country", skipping blank parts.
    pub fn display_name(&self) -> String {
        [&self.name, &self.region, &self.country]
            .iter()
            .filter(|part| !part.trim().is_empty())
            .map(|part| part.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn local_time(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.localtime, "%Y-%m-%d %H:%M").ok()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temp_c: f64,
    pub feelslike_c: f64,
    pub condition: Condition,
    pub wind_kph: f64,
    pub wind_dir: String,
    pub humidity: u8,
    pub vis_km: f64,
    pub uv: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Condition {
    pub text: String,
    /// Protocol-relative icon path, e.g. "//cdn.weatherapi.com/weather/64x64/day/113.png"
    pub icon: String,
}

impl Condition {
    /// Absolute https URL for the icon.
    pub fn icon_url(&self) -> String {
        if self.icon.starts_with("//") {
            format!("https:{}", self.icon)
        } else {
            self.icon.clone()
        }
    }
}

/// Error payload WeatherAPI sends with non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorDetail {
    pub code: u32,
    pub message: String,
}
