use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// The full set of recognized configuration keys. Field names are
/// `camelCase` on the wire (`config.toml`, `config.json`, environment
/// overrides) to match the keys this server has always shipped with;
/// any key not named here is rejected by `#[serde(deny_unknown_fields)]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    pub log_level: LogLevel,
    pub port: u16,
    pub paint_delay: u64,
    #[serde(default)]
    pub use_db: bool,
    #[serde(default = "default_width")]
    pub width: u16,
    #[serde(default = "default_height")]
    pub height: u16,
    #[serde(default)]
    pub clear_board: bool,
    #[serde(default = "default_validation_paste")]
    pub validation_paste: String,
    pub key: Option<String>,
    pub cert: Option<String>,
    #[serde(default)]
    pub max_web_socket_per_ip: u32,
    #[serde(default = "default_ban_duration")]
    pub ban_duration: u64,
    #[serde(default = "default_ticks_per_second")]
    pub ticks_per_second: u32,
    #[serde(default = "default_max_packet_per_second")]
    pub max_packet_per_second: u32,
    #[serde(default)]
    pub enable_token_counting: bool,
    pub max_allowed_uid: Option<u32>,
    #[serde(default)]
    pub ban_token: Option<SecretToken>,
}

/// Wraps the admin bearer token so it never lands in a `{:?}` log line.
#[derive(Clone)]
pub struct SecretToken(SecretString);

impl SecretToken {
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for SecretToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretToken(\"[REDACTED]\")")
    }
}

impl Serialize for SecretToken {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str("[REDACTED]")
    }
}

impl<'de> Deserialize<'de> for SecretToken {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self(SecretString::from(raw)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl LogLevel {
    /// The `tracing` level this maps to; `Fatal` has no `tracing` analogue and
    /// is treated as `Error`.
    #[must_use]
    pub fn as_tracing_level(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error | Self::Fatal => "error",
        }
    }
}

fn default_width() -> u16 {
    1000
}

fn default_height() -> u16 {
    600
}

fn default_validation_paste() -> String {
    "IkaPaintBoard".to_string()
}

fn default_ban_duration() -> u64 {
    60_000
}

fn default_ticks_per_second() -> u32 {
    128
}

fn default_max_packet_per_second() -> u32 {
    128
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            port: 8080,
            paint_delay: 0,
            use_db: false,
            width: default_width(),
            height: default_height(),
            clear_board: false,
            validation_paste: default_validation_paste(),
            key: None,
            cert: None,
            max_web_socket_per_ip: 0,
            ban_duration: default_ban_duration(),
            ticks_per_second: default_ticks_per_second(),
            max_packet_per_second: default_max_packet_per_second(),
            enable_token_counting: false,
            max_allowed_uid: None,
            ban_token: None,
        }
    }
}

impl Config {
    pub fn validate(&self) -> AppResult<()> {
        if self.width == 0 {
            return Err(AppError::ConfigError {
                message: "width must be >= 1".to_string(),
            });
        }

        if self.height == 0 {
            return Err(AppError::ConfigError {
                message: "height must be >= 1".to_string(),
            });
        }

        if self.ticks_per_second == 0 {
            return Err(AppError::ConfigError {
                message: "ticksPerSecond must be >= 1".to_string(),
            });
        }

        if self.max_packet_per_second == 0 {
            return Err(AppError::ConfigError {
                message: "maxPacketPerSecond must be >= 1".to_string(),
            });
        }

        Ok(())
    }

    #[must_use]
    pub fn admin_enabled(&self) -> bool {
        self.ban_token.is_some()
    }

    #[must_use]
    pub fn is_admin_token(&self, candidate: &str) -> bool {
        self.ban_token
            .as_ref()
            .is_some_and(|token| token.expose() == candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        Config::default().validate().expect("defaults are valid");
    }

    #[test]
    fn zero_width_is_rejected() {
        let mut config = Config::default();
        config.width = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn secret_token_debug_is_redacted() {
        let token = SecretToken(SecretString::from("super-secret"));
        assert_eq!(format!("{token:?}"), "SecretToken(\"[REDACTED]\")");
    }
}
