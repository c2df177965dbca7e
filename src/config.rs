use std::path::PathBuf;
use std::str::FromStr;

use log::LevelFilter;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_MODEL_PATH: &str = "models/fertilizer_pipeline.json";
pub const DEFAULT_MAX_PAYLOAD_SIZE: usize = 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for field '{field}': {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required field: {field}")]
    MissingRequired { field: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    pub model_path: PathBuf,
    pub max_payload_size: usize,
    pub log_level: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        GatewayConfig {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            max_payload_size: DEFAULT_MAX_PAYLOAD_SIZE,
            log_level: "info".to_string(),
        }
    }
}

impl GatewayConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::MissingRequired {
                field: "host".to_string(),
            });
        }
        if self.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "port".to_string(),
                value: self.port.to_string(),
                reason: "must be between 1 and 65535".to_string(),
            });
        }
        if self.model_path.as_os_str().is_empty() {
            return Err(ConfigError::MissingRequired {
                field: "model_path".to_string(),
            });
        }
        if self.max_payload_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_payload_size".to_string(),
                value: "0".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        self.level_filter()?;
        Ok(())
    }

    pub fn level_filter(&self) -> ConfigResult<LevelFilter> {
        LevelFilter::from_str(&self.log_level).map_err(|_| ConfigError::InvalidValue {
            field: "log_level".to_string(),
            value: self.log_level.clone(),
            reason: "expected one of off, error, warn, info, debug, trace".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = GatewayConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.port, 5000);
        assert_eq!(config.level_filter().unwrap(), LevelFilter::Info);
    }

    #[test]
    fn test_rejects_zero_port() {
        let config = GatewayConfig {
            port: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "port"
        ));
    }

    #[test]
    fn test_rejects_empty_model_path() {
        let config = GatewayConfig {
            model_path: PathBuf::new(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingRequired { ref field }) if field == "model_path"
        ));
    }

    #[test]
    fn test_rejects_zero_payload_limit() {
        let config = GatewayConfig {
            max_payload_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_log_level_parsing() {
        let config = GatewayConfig {
            log_level: "DEBUG".to_string(),
            ..Default::default()
        };
        assert_eq!(config.level_filter().unwrap(), LevelFilter::Debug);

        let config = GatewayConfig {
            log_level: "loud".to_string(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid value for field 'log_level': loud - expected one of off, error, warn, info, debug, trace"
        );
    }
}
