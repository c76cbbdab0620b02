//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use super::Settings;
use crate::utils::errors::{Result, TrailheadError};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_database_config(&settings.database)?;
    validate_trips_config(&settings.trips)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(TrailheadError::Config("Database URL is required".to_string()));
    }

    if config.max_connections == 0 {
        return Err(TrailheadError::Config(
            "Max connections must be greater than 0".to_string(),
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(TrailheadError::Config(
            "Min connections cannot be greater than max connections".to_string(),
        ));
    }

    Ok(())
}

/// Validate trip policy configuration
fn validate_trips_config(config: &super::TripsConfig) -> Result<()> {
    if config.itinerary_grace_days < 0 {
        return Err(TrailheadError::Config(
            "Itinerary grace days cannot be negative".to_string(),
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(TrailheadError::Config("Logging level is required".to_string()));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.to_lowercase().as_str()) {
        return Err(TrailheadError::Config(format!(
            "Invalid logging level: {}",
            config.level
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DatabaseConfig, LoggingConfig, TripsConfig};

    fn valid_settings() -> Settings {
        Settings {
            database: DatabaseConfig {
                url: "postgresql://localhost/trailhead".to_string(),
                max_connections: 10,
                min_connections: 1,
            },
            trips: TripsConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: "logs".to_string(),
            },
        }
    }

    #[test]
    fn accepts_valid_settings() {
        assert!(validate_settings(&valid_settings()).is_ok());
    }

    #[test]
    fn rejects_empty_database_url() {
        let mut settings = valid_settings();
        settings.database.url = String::new();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn rejects_negative_grace_period() {
        let mut settings = valid_settings();
        settings.trips.itinerary_grace_days = -1;
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn rejects_unknown_log_level() {
        let mut settings = valid_settings();
        settings.logging.level = "verbose".to_string();
        assert!(validate_settings(&settings).is_err());
    }
}
