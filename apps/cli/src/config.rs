//! Configuration for the probe harness.
//!
//! Constructed once at startup and passed by reference into every component;
//! there is no ambient global state.

use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ProbeConfig {
    /// Base URL of the FHIR server under test.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Delete resources the suites created once the run completes.
    #[serde(default)]
    pub cleanup_after_tests: bool,

    /// Print per-test progress notes.
    #[serde(default = "default_true")]
    pub verbose: bool,

    /// Timeout applied to every request, in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,

    /// Prefix for any identifiers the tests create, so they cannot collide
    /// with pre-existing data on the target server.
    #[serde(default = "default_identifier_prefix")]
    pub test_identifier_prefix: String,
}

fn default_base_url() -> String {
    "https://playground.dhp.uz/fhir".to_string()
}

fn default_true() -> bool {
    true
}

fn default_request_timeout() -> u64 {
    30
}

fn default_identifier_prefix() -> String {
    "test-".to_string()
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            cleanup_after_tests: false,
            verbose: true,
            request_timeout_seconds: default_request_timeout(),
            test_identifier_prefix: default_identifier_prefix(),
        }
    }
}

impl ProbeConfig {
    /// Load configuration from defaults, an optional `probe` config file, and
    /// environment variables.
    ///
    /// Environment variables use the `FHIR_PROBE` prefix with `__` as the
    /// separator, e.g. `FHIR_PROBE__BASE_URL`.
    pub fn load() -> anyhow::Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .set_default("base_url", default_base_url())?
            .set_default("cleanup_after_tests", false)?
            .set_default("verbose", default_true())?
            .set_default("request_timeout_seconds", default_request_timeout() as i64)?
            .set_default("test_identifier_prefix", default_identifier_prefix())?
            .add_source(config::File::with_name("probe").required(false))
            .add_source(
                config::Environment::with_prefix("FHIR_PROBE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut config: Self = config.try_deserialize()?;

        // Convenience escape hatch: a plain FHIR_BASE_URL selects the target
        // server when no explicit FHIR_PROBE__BASE_URL override is present.
        if std::env::var("FHIR_PROBE__BASE_URL").is_err() {
            if let Ok(url) = std::env::var("FHIR_BASE_URL") {
                config.base_url = url;
            }
        }

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.request_timeout_seconds == 0 {
            return Err("request_timeout_seconds must be > 0".to_string());
        }
        if url::Url::parse(&self.base_url).is_err() {
            return Err(format!("base_url '{}' is not a valid URL", self.base_url));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ProbeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.test_identifier_prefix, "test-");
    }

    #[test]
    fn rejects_zero_timeout() {
        let config = ProbeConfig {
            request_timeout_seconds: 0,
            ..ProbeConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_unparseable_base_url() {
        let config = ProbeConfig {
            base_url: "not a url".to_string(),
            ..ProbeConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
