//! Weather lookup for Daybook
//!
//! Current conditions from WeatherAPI.com by city name or coordinates.

pub mod provider;
pub mod types;

pub use provider::WeatherClient;
pub use types::*;
