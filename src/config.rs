/**
* filename : config
* author : HAMA
* date: 2025. 5. 8.
* description:
**/

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::TradingError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub scheduler: SchedulerDefaults,
    #[serde(default)]
    pub seed_demo_strategies: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: Option<String>,
}

/// Fallback values substituted for missing or invalid form input
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SchedulerDefaults {
    pub total_volume: f64,
    pub interval_ms: u64,
    pub variance_percent: f64,
    pub min_child_size: f64,
    pub max_child_size: f64,
    pub twap_slices: u32,
    pub iceberg_display_size: f64,
    pub iceberg_max_active_slices: usize,
    pub iceberg_secrecy_factor: f64,
}

impl Default for SchedulerDefaults {
    fn default() -> Self {
        SchedulerDefaults {
            total_volume: 10000.0,
            interval_ms: 1000,
            variance_percent: 10.0,
            min_child_size: 100.0,
            max_child_size: 2000.0,
            twap_slices: 10,
            iceberg_display_size: 1000.0,
            iceberg_max_active_slices: 3,
            iceberg_secrecy_factor: 0.8,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load() -> Result<Self, TradingError> {
        Self::load_from(Path::new("config.json"))
    }

    /// Load configuration from an explicit path, falling back to defaults when absent
    pub fn load_from(config_path: &Path) -> Result<Self, TradingError> {
        if config_path.exists() {
            let mut file = File::open(config_path)?;

            let mut contents = String::new();
            file.read_to_string(&mut contents)?;

            let mut cfg: Config = serde_json::from_str(&contents)?;
            // environment overrides
            cfg.apply_env_overrides()?;
            Ok(cfg)
        } else {
            // Return default configuration
            let mut cfg = Config::default();
            cfg.apply_env_overrides()?;
            Ok(cfg)
        }
    }

    /// Apply environment variable overrides for runtime fields
    fn apply_env_overrides(&mut self) -> Result<(), TradingError> {
        use std::env;
        if let Ok(v) = env::var("SERVER_HOST") { if !v.is_empty() { self.server.host = v; } }
        if let Ok(v) = env::var("SERVER_PORT") {
            if !v.is_empty() {
                self.server.port = v.parse()
                    .map_err(|e| TradingError::ConfigError(format!("Invalid SERVER_PORT '{}': {}", v, e)))?;
            }
        }
        if let Ok(v) = env::var("SEED_DEMO_STRATEGIES") {
            let lower = v.to_lowercase();
            if ["1","true","yes"].contains(&lower.as_str()) { self.seed_demo_strategies = true; }
            if ["0","false","no"].contains(&lower.as_str()) { self.seed_demo_strategies = false; }
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3030,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: None,
            },
            scheduler: SchedulerDefaults::default(),
            seed_demo_strategies: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let cfg = Config::load_from(Path::new("does-not-exist.json")).unwrap();
        assert_eq!(cfg.scheduler, SchedulerDefaults::default());
        assert!(cfg.scheduler.min_child_size <= cfg.scheduler.max_child_size);
    }

    #[test]
    fn test_malformed_file_is_serialization_error() {
        let path = std::env::temp_dir().join(format!("xquant-exec-bad-config-{}.json", std::process::id()));
        std::fs::write(&path, "{ not json").unwrap();

        let result = Config::load_from(&path);
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(result, Err(TradingError::SerializationError(_))));
    }

    #[test]
    fn test_unreadable_path_is_io_error() {
        // 디렉터리는 존재하지만 파일로 읽을 수 없음
        let result = Config::load_from(&std::env::temp_dir());
        assert!(matches!(result, Err(TradingError::IoError(_))));
    }

    #[test]
    fn test_parse_without_seed_flag() {
        let json = r#"{
            "server": {"host": "0.0.0.0", "port": 8080},
            "logging": {"level": "debug", "file_path": null},
            "scheduler": {
                "total_volume": 500.0, "interval_ms": 250, "variance_percent": 0.0,
                "min_child_size": 1.0, "max_child_size": 50.0, "twap_slices": 5,
                "iceberg_display_size": 10.0, "iceberg_max_active_slices": 2,
                "iceberg_secrecy_factor": 0.5
            }
        }"#;
        let cfg: Config = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.scheduler.twap_slices, 5);
        assert!(!cfg.seed_demo_strategies);
    }
}
