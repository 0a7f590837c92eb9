//! Solver configuration.
//!
//! Loaded from TOML so that the week shape, objective weights and time
//! budget can be changed without code changes.
//!
//! ```
//! use weekly_timetable::SolveConfig;
//! use std::time::Duration;
//!
//! let config = SolveConfig::from_toml_str(r#"
//!     time_limit_seconds = 2.5
//!     period_weights = [5, 4, 3, 2, 1]
//! "#).unwrap();
//!
//! assert_eq!(config.time_limit(), Duration::from_millis(2500));
//! assert_eq!(config.days, 5);
//! ```

use crate::{
    calendar::{
        Calendar,
        PeriodWeights,
    },
    search::DEFAULT_CHECK_INTERVAL,
};
use serde::{
    Deserialize,
    Serialize,
};
use std::{
    path::Path,
    time::Duration,
};
use thiserror::Error;

/// Placeholder teacher name for courses without teachers.
pub const UNKNOWN_TEACHER: &str = "unknown";

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Configuration of model construction and search.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", default)]
pub struct SolveConfig {
    /// Wall-clock budget of the search in seconds.
    pub time_limit_seconds: f64,
    /// Number of teaching days per week.
    pub days: u8,
    /// Number of periods per day.
    pub periods: u8,
    /// Objective weight of every period, the first entry belongs to period 1.
    pub period_weights: Vec<i64>,
    /// Number of search nodes between two reads of the clock.
    pub deadline_check_interval: u64,
    /// Teacher name used for courses without teachers.
    pub unknown_teacher: String,
}

impl Default for SolveConfig {
    fn default() -> Self {
        Self {
            time_limit_seconds: 10.0,
            days: 5,
            periods: 5,
            period_weights: vec![3, 3, -1, -2, -3],
            deadline_check_interval: DEFAULT_CHECK_INTERVAL,
            unknown_teacher: UNKNOWN_TEACHER.to_string(),
        }
    }
}

impl SolveConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads and validates the configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file doesn't exist, contains invalid TOML or an invalid configuration.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses and validates the configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the time limit.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit_seconds = limit.as_secs_f64();
        self
    }

    /// Sets the shape of the week.
    pub fn with_calendar(mut self, days: u8, periods: u8) -> Self {
        self.days = days;
        self.periods = periods;
        self
    }

    /// Sets the period weights, the first weight belongs to period 1.
    pub fn with_period_weights<I>(mut self, weights: I) -> Self
    where
        I: IntoIterator<Item = i64>,
    {
        self.period_weights = weights.into_iter().collect();
        self
    }

    /// Checks the configuration for consistency.
    ///
    /// # Errors
    ///
    /// - If the time limit is negative or not finite.
    /// - If the week has no days or no periods.
    /// - If the number of period weights differs from the number of periods.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.time_limit_seconds.is_finite() || self.time_limit_seconds < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "time limit must be a non-negative number of seconds, got {}",
                self.time_limit_seconds
            )))
        }
        if self.days == 0 || self.periods == 0 {
            return Err(ConfigError::Invalid(format!(
                "the week needs at least one day and one period, got {} days with {} periods",
                self.days, self.periods
            )))
        }
        if self.period_weights.len() != usize::from(self.periods) {
            return Err(ConfigError::Invalid(format!(
                "expected {} period weights, got {}",
                self.periods,
                self.period_weights.len()
            )))
        }
        Ok(())
    }

    /// Returns the time limit of the search.
    ///
    /// Invalid limits are clamped to zero.
    pub fn time_limit(&self) -> Duration {
        Duration::try_from_secs_f64(self.time_limit_seconds).unwrap_or(Duration::ZERO)
    }

    /// Returns the shape of the week.
    pub fn calendar(&self) -> Calendar {
        Calendar::new(self.days, self.periods)
    }

    /// Returns the objective weight of every period.
    pub fn period_weights(&self) -> PeriodWeights {
        PeriodWeights::new(self.period_weights.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::Period;

    #[test]
    fn default_matches_weekly_timetable() {
        let config = SolveConfig::default();
        assert_eq!(config.time_limit(), Duration::from_secs(10));
        assert_eq!(config.calendar(), Calendar::default());
        assert_eq!(config.period_weights(), PeriodWeights::default());
        assert_eq!(config.unknown_teacher, UNKNOWN_TEACHER);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = SolveConfig::from_toml_str(
            r#"
            days = 3
            periods = 2
            period_weights = [7, -7]
        "#,
        )
        .unwrap();
        assert_eq!(config.calendar(), Calendar::new(3, 2));
        assert_eq!(config.period_weights().get(Period::new(2)), Some(-7));
        assert_eq!(config.time_limit(), Duration::from_secs(10));
        assert_eq!(config.deadline_check_interval, DEFAULT_CHECK_INTERVAL);
    }

    #[test]
    fn weights_must_cover_every_period() {
        let result = SolveConfig::from_toml_str("periods = 4");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn negative_time_limit_is_invalid() {
        let result = SolveConfig::from_toml_str("time_limit_seconds = -1.0");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn malformed_toml_is_reported() {
        let result = SolveConfig::from_toml_str("days = \"five\"");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn builder_round_trips_through_toml() {
        let config = SolveConfig::new()
            .with_time_limit(Duration::from_millis(500))
            .with_calendar(4, 3)
            .with_period_weights(vec![1, 0, -1]);
        let serialized = toml::to_string(&config).unwrap();
        assert_eq!(SolveConfig::from_toml_str(&serialized).unwrap(), config);
    }
}
