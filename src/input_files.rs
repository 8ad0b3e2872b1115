//! Reading `info.txt` and `hosts.txt`
//!
//! Both files are plain UTF-8 text with one value per line. Lines are trimmed;
//! blank lines and lines starting with `#` are dropped before the values reach
//! the parameter resolver.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PkiError, Result};

const COMMENT_MARKER: char = '#';

/// Locations of the two input files
#[derive(Debug, Clone)]
pub struct InputFiles {
    pub info_path: PathBuf,
    pub hosts_path: PathBuf,
}

impl InputFiles {
    pub fn new(info_path: impl Into<PathBuf>, hosts_path: impl Into<PathBuf>) -> Self {
        Self {
            info_path: info_path.into(),
            hosts_path: hosts_path.into(),
        }
    }

    /// True when both files are present
    pub fn exist(&self) -> bool {
        self.info_path.is_file() && self.hosts_path.is_file()
    }

    /// Positional issuance values from `info.txt`
    pub fn read_parameter_values(&self) -> Result<Vec<String>> {
        read_entries(&self.info_path)
    }

    /// Host entries from `hosts.txt`
    pub fn read_host_entries(&self) -> Result<Vec<String>> {
        read_entries(&self.hosts_path)
    }
}

fn read_entries(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path).map_err(|source| PkiError::Input {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(normalize_lines(&text))
}

/// Trim lines and drop blanks and comments
pub fn normalize_lines(text: &str) -> Vec<String> {
    text.trim_start_matches('\u{feff}')
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(COMMENT_MARKER))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_normalize_drops_comments_and_blanks() {
        let text = "# header\r\n\r\n365\r\n  2048  \n\t# indented comment\nMyRootCA\n\nMyLeaf\n";
        assert_eq!(normalize_lines(text), vec!["365", "2048", "MyRootCA", "MyLeaf"]);
    }

    #[test]
    fn test_normalize_strips_byte_order_mark() {
        assert_eq!(normalize_lines("\u{feff}example.local\n"), vec!["example.local"]);
    }

    #[test]
    fn test_read_entries_from_files() {
        let dir = TempDir::new().unwrap();
        let files = InputFiles::new(dir.path().join("info.txt"), dir.path().join("hosts.txt"));
        assert!(!files.exist());

        fs::write(&files.info_path, "30\n2048\nca\nleaf\n").unwrap();
        fs::write(&files.hosts_path, "# hosts\nexample.local\n127.0.0.1\n").unwrap();
        assert!(files.exist());
        assert_eq!(files.read_parameter_values().unwrap().len(), 4);
        assert_eq!(
            files.read_host_entries().unwrap(),
            vec!["example.local", "127.0.0.1"]
        );
    }

    #[test]
    fn test_missing_file_is_input_error() {
        let dir = TempDir::new().unwrap();
        let files = InputFiles::new(dir.path().join("info.txt"), dir.path().join("hosts.txt"));
        let err = files.read_parameter_values().unwrap_err();
        assert!(matches!(err, PkiError::Input { .. }));
    }
}
