pub mod app;
pub mod config;
pub mod debounce;
pub mod error;
pub mod fetch;
pub mod group;
pub mod sequence;

pub use app::App;
pub use config::{
    Config, HttpConfig, MoviesConfig, StorageConfig, TodoFlavor, ValidationResult, WeatherConfig,
};
pub use debounce::{Debouncer, Throttler};
pub use error::{
    AppError, ConfigError, MovieError, NetworkError, StorageError, WeatherError,
};
pub use fetch::{FetchResult, HttpFetcher};
pub use group::{group_by, group_json, Groups, KeySelector};
pub use sequence::{RequestSequencer, Ticket};

use anyhow::Result;

/// Initialize logging for the process
pub fn init() -> Result<()> {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init()
        .is_ok();

    if installed {
        tracing::info!("Daybook core initialized");
    }
    Ok(())
}
