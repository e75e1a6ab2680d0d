//! Client configuration resolved once per process.
//!
//! The base address depends on where the app runs: the Android emulator
//! reaches the host machine through `10.0.2.2`, everything else through
//! `localhost`. The API prefix and timeout are fixed for the client's lifetime.

use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_API_PREFIX: &str = "/api/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(15_000);

pub const ENV_BASE_URL: &str = "CLINIC_API_URL";
pub const ENV_API_PREFIX: &str = "CLINIC_API_PREFIX";
pub const ENV_TIMEOUT_MS: &str = "CLINIC_API_TIMEOUT_MS";

const ANDROID_EMULATOR_BASE_URL: &str = "http://10.0.2.2:8000";
const LOCAL_BASE_URL: &str = "http://localhost:8000";

/// Where the client is running, for picking a default backend address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    AndroidEmulator,
    Ios,
    Desktop,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_prefix: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn for_platform(platform: Platform) -> Self {
        match platform {
            Platform::AndroidEmulator => Self::new(ANDROID_EMULATOR_BASE_URL),
            Platform::Ios | Platform::Desktop => Self::new(LOCAL_BASE_URL),
        }
    }

    pub fn with_api_prefix(mut self, prefix: &str) -> Self {
        self.api_prefix = normalize_prefix(prefix);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Resolve configuration from `CLINIC_API_*` variables, falling back to
    /// the defaults for `platform`.
    ///
    /// # Errors
    ///
    /// Returns an error when a variable is set but empty or unparsable.
    pub fn from_env(platform: Platform) -> Result<Self, ConfigError> {
        Self::from_lookup(platform, |name| std::env::var(name).ok())
    }

    fn from_lookup(
        platform: Platform,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = match lookup(ENV_BASE_URL) {
            Some(url) if url.trim().is_empty() => {
                return Err(ConfigError::Empty { name: ENV_BASE_URL })
            }
            Some(url) => Self::new(url.trim()),
            None => Self::for_platform(platform),
        };
        if let Some(prefix) = lookup(ENV_API_PREFIX) {
            config = config.with_api_prefix(&prefix);
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_MS) {
            let millis = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms > 0)
                .ok_or_else(|| ConfigError::InvalidTimeout {
                    name: ENV_TIMEOUT_MS,
                    value: raw.clone(),
                })?;
            config = config.with_timeout(Duration::from_millis(millis));
        }
        Ok(config)
    }

    /// `base_url` joined with `api_prefix`.
    pub fn api_root(&self) -> String {
        format!("{}{}", self.base_url, self.api_prefix)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::for_platform(Platform::Desktop)
    }
}

fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_end_matches('/');
    if trimmed.is_empty() || trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}
