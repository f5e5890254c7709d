//! Configuration loading for Catq

mod schema;

pub use schema::{
    AnalyzerConfig, CodeTuning, CompletenessTuning, DescriptionTuning, LevelThresholds,
    ReadinessTuning,
};

use crate::error::AnalysisError;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = ".catqrc.json";

/// Find and load the config file. Searches the working directory then its
/// parents; a missing file yields the defaults.
pub fn load_config(
    work_dir: &Path,
    custom_path: Option<&Path>,
) -> Result<AnalyzerConfig, AnalysisError> {
    let path = if let Some(p) = custom_path {
        let path = if p.is_absolute() {
            p.to_path_buf()
        } else {
            work_dir.join(p)
        };
        if !path.exists() {
            return Err(AnalysisError::ConfigRead {
                path,
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "config file not found"),
            });
        }
        Some(path)
    } else {
        find_config_in_parents(work_dir)
    };

    match path {
        Some(path) => load_config_file(&path),
        None => Ok(AnalyzerConfig::default()),
    }
}

fn load_config_file(path: &Path) -> Result<AnalyzerConfig, AnalysisError> {
    let content = fs::read_to_string(path).map_err(|e| AnalysisError::ConfigRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(&content).map_err(|e| AnalysisError::ConfigParse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Search for .catqrc.json in a directory and its parents
fn find_config_in_parents(mut dir: &Path) -> Option<PathBuf> {
    loop {
        let candidate = dir.join(CONFIG_FILENAME);
        if candidate.exists() {
            return Some(candidate);
        }
        dir = dir.parent()?;
    }
}

/// Serialize the default config, for the `init` subcommand
pub fn default_config_json(threshold: Option<f64>) -> String {
    let config = AnalyzerConfig {
        threshold,
        ..AnalyzerConfig::default()
    };
    serde_json::to_string_pretty(&config).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_missing_config_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config(dir.path(), None).unwrap();
        assert_eq!(config.threshold, None);
        assert_eq!(config.description.min_length, 20);
    }

    #[test]
    fn test_config_found_in_parent() {
        let dir = TempDir::new().unwrap();
        let mut file = std::fs::File::create(dir.path().join(CONFIG_FILENAME)).unwrap();
        writeln!(file, r#"{{ "threshold": 65 }}"#).unwrap();

        let child = dir.path().join("data/nested");
        std::fs::create_dir_all(&child).unwrap();

        let config = load_config(&child, None).unwrap();
        assert_eq!(config.threshold, Some(65.0));
    }

    #[test]
    fn test_explicit_config_path_missing() {
        let dir = TempDir::new().unwrap();
        let result = load_config(dir.path(), Some(Path::new("nope.json")));
        assert!(matches!(result, Err(AnalysisError::ConfigRead { .. })));
    }

    #[test]
    fn test_invalid_json_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "{ not json").unwrap();
        let result = load_config(dir.path(), None);
        assert!(matches!(result, Err(AnalysisError::ConfigParse { .. })));
    }

    #[test]
    fn test_cli_threshold_overrides_file() {
        let config = AnalyzerConfig {
            threshold: Some(50.0),
            ..AnalyzerConfig::default()
        };
        let merged = config.merge_with_cli(Some(80.0));
        assert_eq!(merged.threshold, Some(80.0));

        let config = AnalyzerConfig {
            threshold: Some(50.0),
            ..AnalyzerConfig::default()
        };
        let merged = config.merge_with_cli(None);
        assert_eq!(merged.threshold, Some(50.0));
    }

    #[test]
    fn test_default_config_json_roundtrips() {
        let json = default_config_json(Some(70.0));
        let parsed: AnalyzerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.threshold, Some(70.0));
        assert!(parsed.validate().is_ok());
    }
}
