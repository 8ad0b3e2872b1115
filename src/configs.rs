use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PkiError, Result};
use crate::input_files::InputFiles;

/// Application config file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "tls-cert-help.toml";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub prompt: PromptConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PathsConfig {
    /// Directory holding the input files; defaults to the executable's directory
    #[serde(default)]
    pub base_dir: Option<PathBuf>,
    #[serde(default = "default_info_file")]
    pub info_file: PathBuf,
    #[serde(default = "default_hosts_file")]
    pub hosts_file: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            base_dir: None,
            info_file: default_info_file(),
            hosts_file: default_hosts_file(),
            output_dir: default_output_dir(),
        }
    }
}

fn default_info_file() -> PathBuf {
    PathBuf::from("info.txt")
}

fn default_hosts_file() -> PathBuf {
    PathBuf::from("hosts.txt")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("conf")
}

#[derive(Debug, Deserialize, Clone)]
pub struct PromptConfig {
    /// Wait for Enter after creating template input files
    #[serde(default = "default_wait_for_acknowledgment")]
    pub wait_for_acknowledgment: bool,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            wait_for_acknowledgment: default_wait_for_acknowledgment(),
        }
    }
}

fn default_wait_for_acknowledgment() -> bool {
    true
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(path).map_err(|e| PkiError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&config_str).map_err(|reason| PkiError::Config {
            path: path.to_path_buf(),
            reason,
        })
    }

    fn from_toml_str(config_str: &str) -> std::result::Result<Self, String> {
        toml::from_str(config_str).map_err(|e| e.to_string())
    }

    /// Load `tls-cert-help.toml` from the working directory, or defaults if absent
    pub fn load() -> Result<Self> {
        let path = Path::new(CONFIG_FILE_NAME);
        if path.is_file() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Configuration rooted at an explicit base directory
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        let mut config = Self::default();
        config.paths.base_dir = Some(base_dir.into());
        config
    }

    pub fn base_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.paths.base_dir {
            return Ok(dir.clone());
        }
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .ok_or_else(|| PkiError::Config {
                path: PathBuf::from(CONFIG_FILE_NAME),
                reason: "cannot determine the executable directory; set paths.base_dir"
                    .to_string(),
            })
    }

    pub fn input_files(&self) -> Result<InputFiles> {
        let base = self.base_dir()?;
        Ok(InputFiles::new(
            base.join(&self.paths.info_file),
            base.join(&self.paths.hosts_file),
        ))
    }

    pub fn output_dir(&self) -> Result<PathBuf> {
        Ok(self.base_dir()?.join(&self.paths.output_dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_original_layout() {
        let config = AppConfig::with_base_dir("/srv/certs");
        let files = config.input_files().unwrap();
        assert_eq!(files.info_path, PathBuf::from("/srv/certs/info.txt"));
        assert_eq!(files.hosts_path, PathBuf::from("/srv/certs/hosts.txt"));
        assert_eq!(config.output_dir().unwrap(), PathBuf::from("/srv/certs/conf"));
        assert!(config.prompt.wait_for_acknowledgment);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [paths]
            base_dir = "/tmp/pki"
            output_dir = "/var/lib/tls"

            [prompt]
            wait_for_acknowledgment = false
            "#,
        )
        .unwrap();
        assert_eq!(config.paths.info_file, PathBuf::from("info.txt"));
        // absolute output_dir replaces the base directory
        assert_eq!(config.output_dir().unwrap(), PathBuf::from("/var/lib/tls"));
        assert!(!config.prompt.wait_for_acknowledgment);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[paths\nbase_dir = 1").unwrap();
        assert!(matches!(
            AppConfig::from_file(&path),
            Err(PkiError::Config { .. })
        ));
    }
}
