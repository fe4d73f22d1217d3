//! Gateway settings loaded via OrthoConfig.
//!
//! Values come from `GATEWAY_*` environment variables, command-line flags,
//! and configuration files. Every field is optional; accessors apply the
//! defaults.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

const DEFAULT_SERVER_HOST: &str = "127.0.0.1";
const DEFAULT_SERVER_PORT: u16 = 8080;
const DEFAULT_UPSTREAM_BASE_URL: &str = "https://jsonplaceholder.typicode.com";
const DEFAULT_CACHE_TTL_SECS: u64 = 5 * 60;
const DEFAULT_CACHE_SWEEP_INTERVAL_SECS: u64 = 10 * 60;

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The upstream base URL is not a valid absolute URL.
    #[error("invalid upstream base URL {url:?}: {source}")]
    InvalidUpstreamUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    /// The upstream base URL cannot have path segments appended.
    #[error("upstream base URL {url:?} cannot carry a path")]
    UpstreamUrlWithoutPath { url: String },
}

/// Configuration values for the gateway process.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "GATEWAY")]
pub struct GatewaySettings {
    /// Interface the HTTP server binds to.
    pub server_host: Option<String>,
    /// Port the HTTP server binds to.
    pub server_port: Option<u16>,
    /// Base URL of the upstream user/posts API.
    pub upstream_base_url: Option<String>,
    /// Cache upstream lookups in memory.
    #[ortho_config(default = true)]
    pub cache_enabled: bool,
    /// Lifetime of a cache entry, in seconds.
    pub cache_ttl_secs: Option<u64>,
    /// Interval between sweeps of expired cache entries, in seconds.
    pub cache_sweep_interval_secs: Option<u64>,
}

impl GatewaySettings {
    /// Interface to bind, falling back to loopback.
    pub fn server_host(&self) -> &str {
        self.server_host.as_deref().unwrap_or(DEFAULT_SERVER_HOST)
    }

    /// Port to bind, falling back to 8080.
    pub fn server_port(&self) -> u16 {
        self.server_port.unwrap_or(DEFAULT_SERVER_PORT)
    }

    /// Parsed upstream base URL.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when the configured value is not an absolute
    /// URL that can carry a path.
    pub fn upstream_base_url(&self) -> Result<Url, SettingsError> {
        let raw = self
            .upstream_base_url
            .as_deref()
            .unwrap_or(DEFAULT_UPSTREAM_BASE_URL);
        let url = Url::parse(raw).map_err(|source| SettingsError::InvalidUpstreamUrl {
            url: raw.to_owned(),
            source,
        })?;
        if url.cannot_be_a_base() {
            return Err(SettingsError::UpstreamUrlWithoutPath {
                url: raw.to_owned(),
            });
        }
        Ok(url)
    }

    /// Whether upstream lookups are cached; enabled unless set to false.
    pub fn cache_enabled(&self) -> bool {
        self.cache_enabled
    }

    /// Cache entry lifetime.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs.unwrap_or(DEFAULT_CACHE_TTL_SECS))
    }

    /// Interval between cache sweeps.
    pub fn cache_sweep_interval(&self) -> Duration {
        Duration::from_secs(
            self.cache_sweep_interval_secs
                .unwrap_or(DEFAULT_CACHE_SWEEP_INTERVAL_SECS),
        )
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for gateway settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 6] = [
        "GATEWAY_SERVER_HOST",
        "GATEWAY_SERVER_PORT",
        "GATEWAY_UPSTREAM_BASE_URL",
        "GATEWAY_CACHE_ENABLED",
        "GATEWAY_CACHE_TTL_SECS",
        "GATEWAY_CACHE_SWEEP_INTERVAL_SECS",
    ];

    fn load_from_empty_args() -> GatewaySettings {
        GatewaySettings::load_from_iter([OsString::from("gateway")]).expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(settings.server_host(), DEFAULT_SERVER_HOST);
        assert_eq!(settings.server_port(), 8080);
        assert_eq!(
            settings.upstream_base_url().expect("default URL").as_str(),
            "https://jsonplaceholder.typicode.com/"
        );
        assert!(settings.cache_enabled());
        assert_eq!(settings.cache_ttl(), Duration::from_secs(300));
        assert_eq!(settings.cache_sweep_interval(), Duration::from_secs(600));
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("GATEWAY_SERVER_HOST", Some("0.0.0.0".to_owned())),
            ("GATEWAY_SERVER_PORT", Some("9090".to_owned())),
            (
                "GATEWAY_UPSTREAM_BASE_URL",
                Some("http://localhost:3000/api".to_owned()),
            ),
            ("GATEWAY_CACHE_ENABLED", Some("false".to_owned())),
            ("GATEWAY_CACHE_TTL_SECS", Some("30".to_owned())),
            ("GATEWAY_CACHE_SWEEP_INTERVAL_SECS", Some("60".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.server_host(), "0.0.0.0");
        assert_eq!(settings.server_port(), 9090);
        assert_eq!(
            settings.upstream_base_url().expect("valid URL").as_str(),
            "http://localhost:3000/api"
        );
        assert!(!settings.cache_enabled());
        assert_eq!(settings.cache_ttl(), Duration::from_secs(30));
        assert_eq!(settings.cache_sweep_interval(), Duration::from_secs(60));
    }

    #[rstest]
    #[case("not a url")]
    #[case("mailto:ops@example.com")]
    fn unusable_upstream_urls_are_rejected(#[case] raw: &str) {
        let settings = GatewaySettings {
            server_host: None,
            server_port: None,
            upstream_base_url: Some(raw.to_owned()),
            cache_enabled: true,
            cache_ttl_secs: None,
            cache_sweep_interval_secs: None,
        };
        assert!(settings.upstream_base_url().is_err());
    }
}
