use anyhow::Result;
use std::sync::Arc;

use crate::{AppError, Config};

/// Application state and lifecycle manager
pub struct App {
    config: Arc<Config>,
}

impl App {
    /// Create a new application instance from the validated on-disk config
    ///
    /// # Errors
    /// Returns `AppError::Config` for a missing, malformed or invalid config
    /// and `AppError::Io` if the file cannot be read or written.
    pub fn new() -> Result<Self, AppError> {
        let (config, validation) = Config::load_validated()?;
        tracing::debug!(
            "Configuration loaded with {} warning(s)",
            validation.warnings.len()
        );

        Ok(Self::with_config(config))
    }

    /// Create an application instance around an already loaded config
    pub fn with_config(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Shutdown the application
    pub fn shutdown(&mut self) -> Result<()> {
        tracing::info!("Shutting down application");
        Ok(())
    }

    /// Get reference to application config
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Shared handle to the config for services spawned off the main task
    pub fn shared_config(&self) -> Arc<Config> {
        self.config.clone()
    }
}
