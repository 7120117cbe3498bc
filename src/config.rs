use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::error::{Result, ProbeError};

fn default_max_concurrent() -> usize {
    4
}

fn default_extensions() -> Vec<String> {
    ["mp4", "mkv", "mov", "avi", "webm", "wmv", "flv", "m4a", "mp3", "flac", "wav", "ogg", "opus", "aac"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_log_dir() -> PathBuf {
    PathBuf::from(".sonde").join("log")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub probe: ProbeConfig,
    #[serde(default)]
    pub batch: BatchConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Path to ffprobe binary
    pub binary_path: String,
    /// Reject sources that do not exist before spawning ffprobe
    pub verify_path_exists: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Maximum number of ffprobe processes running at once
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
    /// File extensions (without dot, case-insensitive) probed in batch mode
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Directory for the daily-rotated log file
    pub log_dir: PathBuf,
    /// Also write logs to a file, not just the console
    pub file_logging: bool,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            binary_path: "ffprobe".to_string(),
            verify_path_exists: true,
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_concurrent: default_max_concurrent(),
            extensions: default_extensions(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            file_logging: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            probe: ProbeConfig::default(),
            batch: BatchConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ProbeError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&content)?;

        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ProbeError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| ProbeError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.probe.binary_path.trim().is_empty() {
            return Err(ProbeError::Config("probe.binary_path must not be empty".to_string()));
        }
        if self.batch.max_concurrent == 0 {
            return Err(ProbeError::Config("batch.max_concurrent must be at least 1".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.probe.binary_path = "/usr/local/bin/ffprobe".to_string();
        config.batch.max_concurrent = 8;
        config.save_to_file(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.probe.binary_path, "/usr/local/bin/ffprobe");
        assert!(loaded.probe.verify_path_exists);
        assert_eq!(loaded.batch.max_concurrent, 8);
        assert_eq!(loaded.batch.extensions, default_extensions());
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[probe]\nbinary_path = \"ffprobe7\"\nverify_path_exists = false\n").unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.probe.binary_path, "ffprobe7");
        assert!(!loaded.probe.verify_path_exists);
        assert_eq!(loaded.batch.max_concurrent, 4);
        assert_eq!(loaded.logging.log_dir, PathBuf::from(".sonde").join("log"));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[batch]\nmax_concurrent = 0\n").unwrap();

        assert!(matches!(Config::from_file(&path), Err(ProbeError::Config(_))));
        assert!(matches!(Config::from_file(dir.path().join("nope.toml")), Err(ProbeError::Config(_))));

        std::fs::write(&path, "[probe\nbinary_path = 1\n").unwrap();
        assert!(matches!(Config::from_file(&path), Err(ProbeError::Toml(_))));
    }
}
