use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// Input and output locations for every stage
#[derive(Debug, Clone, Deserialize)]
pub struct PathsConfig {
    /// Raw export dumps, one sub-directory per category.
    #[serde(default = "default_xml_dir")]
    pub xml_dir: PathBuf,
    /// Cleaned per-category CSVs produced by the normalizer.
    #[serde(default = "default_csv_dir")]
    pub csv_dir: PathBuf,
    /// Directory receiving `matrix.csv`.
    #[serde(default = "default_matrix_dir")]
    pub matrix_dir: PathBuf,
    /// Directory receiving the edge lists of the graph extractor.
    #[serde(default = "default_graph_dir")]
    pub graph_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            xml_dir: default_xml_dir(),
            csv_dir: default_csv_dir(),
            matrix_dir: default_matrix_dir(),
            graph_dir: default_graph_dir(),
        }
    }
}

/// Batch-stage tuning
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Worker pool size; 0 means one worker per available CPU.
    #[serde(default)]
    pub workers: usize,
    /// Drop subcategory and other non-article pages found in the dumps.
    #[serde(default = "default_skip_category_pages")]
    pub skip_category_pages: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workers: 0,
            skip_category_pages: default_skip_category_pages(),
        }
    }
}

const MAX_WORKERS: usize = 1024;

fn default_xml_dir() -> PathBuf {
    PathBuf::from("data/xml")
}

fn default_csv_dir() -> PathBuf {
    PathBuf::from("data/csv")
}

fn default_matrix_dir() -> PathBuf {
    PathBuf::from("data/resulting_mention_matrix")
}

fn default_graph_dir() -> PathBuf {
    PathBuf::from("data/graph_data")
}

fn default_skip_category_pages() -> bool {
    true
}

impl Config {
    /// Load configuration from file
    ///
    /// Loads environment variables from .env file (if present) before loading config.
    /// Looks for config file in this order:
    /// 1. Path specified in MUSICTREE_CONFIG environment variable (must exist)
    /// 2. ./config.toml in current directory (defaults are used when absent)
    ///
    /// The result is not validated; apply command-line overrides first, then
    /// call [`Config::validate`].
    pub fn load() -> Result<Self> {
        // .env is optional
        let _ = dotenv::dotenv();

        let config = match std::env::var("MUSICTREE_CONFIG") {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => {
                let default_path = Path::new("config.toml");
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    log::debug!("No config.toml found, using built-in defaults");
                    Config::default()
                }
            }
        };

        Ok(config)
    }

    /// Parse a configuration file without consulting the environment
    pub fn from_file(config_path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse {}", config_path.display()))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let paths = [
            ("paths.xml_dir", &self.paths.xml_dir),
            ("paths.csv_dir", &self.paths.csv_dir),
            ("paths.matrix_dir", &self.paths.matrix_dir),
            ("paths.graph_dir", &self.paths.graph_dir),
        ];
        for (key, path) in paths {
            if path.as_os_str().is_empty() {
                anyhow::bail!("{} must not be empty", key);
            }
        }

        if self.pipeline.workers > MAX_WORKERS {
            anyhow::bail!(
                "pipeline.workers must be at most {} (got {})",
                MAX_WORKERS,
                self.pipeline.workers
            );
        }

        Ok(())
    }

    /// Effective worker pool size
    pub fn workers(&self) -> usize {
        if self.pipeline.workers > 0 {
            return self.pipeline.workers;
        }
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }

    /// Location of the mention matrix file
    pub fn matrix_path(&self) -> PathBuf {
        self.paths.matrix_dir.join(crate::matrix::MATRIX_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Serialize config tests that mutate process-wide env so they don't race.
    static CONFIG_TEST_LOCK: Mutex<()> = Mutex::new(());

    fn with_config_env(config_path: Option<&Path>, f: impl FnOnce()) {
        let original = std::env::var("MUSICTREE_CONFIG").ok();
        match config_path {
            Some(p) => std::env::set_var("MUSICTREE_CONFIG", p),
            None => std::env::remove_var("MUSICTREE_CONFIG"),
        }
        f();
        std::env::remove_var("MUSICTREE_CONFIG");
        if let Some(val) = original {
            std::env::set_var("MUSICTREE_CONFIG", val);
        }
    }

    #[test]
    fn test_config_load_success() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(
            &config_path,
            r#"
[paths]
xml_dir = "dumps"
matrix_dir = "out"

[pipeline]
workers = 4
skip_category_pages = false
"#,
        )
        .unwrap();

        with_config_env(Some(&config_path), || {
            let config = Config::load();
            assert!(config.is_ok(), "Config::load() failed: {:?}", config.err());
            let config = config.unwrap();
            assert_eq!(config.paths.xml_dir, PathBuf::from("dumps"));
            assert_eq!(config.paths.csv_dir, PathBuf::from("data/csv"));
            assert_eq!(config.workers(), 4);
            assert!(!config.pipeline.skip_category_pages);
            assert_eq!(config.matrix_path(), PathBuf::from("out/matrix.csv"));
        });
    }

    #[test]
    fn test_config_explicit_path_missing() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        with_config_env(Some(Path::new("nonexistent.toml")), || {
            let config = Config::load();
            assert!(config.is_err());
            assert!(config.unwrap_err().to_string().contains("nonexistent.toml"));
        });
    }

    #[test]
    fn test_config_rejects_too_many_workers() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "[pipeline]\nworkers = 5000\n").unwrap();

        with_config_env(Some(&config_path), || {
            let config = Config::load().unwrap();
            let err = config.validate().unwrap_err();
            assert!(err.to_string().contains("pipeline.workers"));
        });
    }

    #[test]
    fn test_override_replaces_invalid_file_value() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "[pipeline]\nworkers = 5000\n").unwrap();

        with_config_env(Some(&config_path), || {
            let mut config = Config::load().unwrap();
            config.pipeline.workers = 4;
            assert!(config.validate().is_ok());
            assert_eq!(config.workers(), 4);
        });
    }

    #[test]
    fn test_config_rejects_empty_path() {
        let mut config = Config::default();
        config.paths.graph_dir = PathBuf::new();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("paths.graph_dir"));
    }

    #[test]
    fn test_default_workers_nonzero() {
        let config = Config::default();
        assert!(config.workers() >= 1);
        assert!(config.pipeline.skip_category_pages);
    }
}
