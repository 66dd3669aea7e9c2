//! Settings for talking to the admin API and reporting statistics.

use time_tz::Tz;

use crate::{
    Error,
    timezone::{DEFAULT_TIMEZONE, get_timezone},
};

/// The API base URL used when none is configured.
pub const DEFAULT_API_BASE: &str = "http://localhost:8000/api";

/// The number of items requested per page when fetching a whole collection.
pub const DEFAULT_PAGE_SIZE: u64 = 100;

/// Settings for fetching collections and computing statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsConfig {
    /// The base URL of the admin API, without a trailing slash.
    pub api_base: String,
    /// Items to request per page.
    pub page_size: u64,
    /// The canonical name of the timezone statistics are reported in,
    /// e.g. "Asia/Dhaka".
    pub timezone: String,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_owned(),
            page_size: DEFAULT_PAGE_SIZE,
            timezone: DEFAULT_TIMEZONE.to_owned(),
        }
    }
}

impl StatsConfig {
    /// Resolve [StatsConfig::timezone].
    ///
    /// # Errors
    /// Returns [Error::InvalidTimezoneError] if the name is not a known
    /// canonical timezone.
    pub fn timezone(&self) -> Result<&'static Tz, Error> {
        get_timezone(&self.timezone)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Error, config::StatsConfig};

    #[test]
    fn default_config_reports_in_dhaka() {
        let config = StatsConfig::default();

        assert_eq!(config.timezone, "Asia/Dhaka");
        assert_eq!(config.page_size, 100);
        assert!(config.timezone().is_ok());
    }

    #[test]
    fn invalid_timezone_is_reported() {
        let config = StatsConfig {
            timezone: "Dhaka".to_owned(),
            ..Default::default()
        };

        assert_eq!(
            config.timezone().err(),
            Some(Error::InvalidTimezoneError("Dhaka".to_owned()))
        );
    }
}
