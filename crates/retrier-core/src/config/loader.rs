//! Configuration file loading and discovery

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

use super::settings::RetryConfig;
use crate::error::{Error, Result};

/// Configuration file names to search for
pub const CONFIG_FILE_NAMES: &[&str] = &["retrier.yaml", "retrier.yml"];

/// Find a configuration file in `start` or one of its parent directories
pub fn find_config(start: &Utf8Path) -> Option<Utf8PathBuf> {
    let mut current = Some(start);

    while let Some(dir) = current {
        for name in CONFIG_FILE_NAMES {
            let path = dir.join(name);
            if path.is_file() {
                return Some(path);
            }
        }
        current = dir.parent();
    }

    None
}

impl RetryConfig {
    /// Load configuration from a file
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::config_not_found(path.as_str())
            } else {
                Error::Io(e)
            }
        })?;

        let config = Self::from_yaml(&content)?;
        tracing::debug!(
            path = %path,
            operations = config.operations.len(),
            "loaded retry configuration"
        );
        Ok(config)
    }

    /// Load the explicit path, or search upwards from the current directory
    ///
    /// When no path is given and no file is found, the defaults are returned.
    pub fn resolve(path: Option<&Utf8Path>) -> Result<Self> {
        if let Some(p) = path {
            return Self::load(p);
        }

        let cwd = std::env::current_dir()?;
        let cwd = Utf8PathBuf::try_from(cwd)
            .map_err(|_| Error::invalid_config("Current directory path is not valid UTF-8"))?;

        match find_config(&cwd) {
            Some(found) => Self::load(&found),
            None => {
                tracing::debug!("no retrier.yaml found, using default settings");
                Ok(Self::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf8(path: std::path::PathBuf) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(path).expect("path should be valid UTF-8")
    }

    #[test]
    fn test_load_nonexistent_file() {
        let path = Utf8Path::new("/tmp/nonexistent-retrier-config-12345.yaml");
        let err = RetryConfig::load(path).unwrap_err();
        assert!(
            matches!(err, Error::ConfigNotFound { .. }),
            "Expected ConfigNotFound, got: {:?}",
            err
        );
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_load_invalid_yaml_syntax() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("retrier.yaml");
        std::fs::write(&config_path, "default: [[[").unwrap();

        let err = RetryConfig::load(&utf8(config_path)).unwrap_err();
        assert!(
            matches!(err, Error::YamlParse(_)),
            "Expected YamlParse, got: {:?}",
            err
        );
    }

    #[test]
    fn test_load_valid_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("retrier.yaml");
        std::fs::write(
            &config_path,
            "operations:\n  deploy:\n    max-attempts: 4\n    delay-ms: 20\n",
        )
        .unwrap();

        let config = RetryConfig::load(&utf8(config_path)).unwrap();
        assert_eq!(config.settings_for(Some("deploy")).max_attempts, 4);
    }

    #[test]
    fn test_find_config_searches_parents() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let root = utf8(temp_dir.path().to_path_buf());
        let nested = root.join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(root.join("retrier.yml"), "{}").unwrap();

        assert_eq!(find_config(&nested), Some(root.join("retrier.yml")));
    }

    #[test]
    fn test_find_config_prefers_yaml_extension() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let root = utf8(temp_dir.path().to_path_buf());
        std::fs::write(root.join("retrier.yaml"), "{}").unwrap();
        std::fs::write(root.join("retrier.yml"), "{}").unwrap();

        assert_eq!(find_config(&root), Some(root.join("retrier.yaml")));
    }

    #[test]
    fn test_resolve_explicit_path() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = utf8(temp_dir.path().join("custom.yaml"));
        std::fs::write(&config_path, "default:\n  delay-ms: 5\n").unwrap();

        let config = RetryConfig::resolve(Some(&config_path)).unwrap();
        assert_eq!(config.default.delay_ms, 5);
    }
}
