//! First-run templates for the input files
//!
//! When `info.txt` or `hosts.txt` is missing, the missing file is created with
//! inline documentation and the run stops so the operator can fill it in.
//! Existing files are never overwritten.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{PkiError, Result};
use crate::input_files::InputFiles;

pub const INFO_TEMPLATE: &str = "\
# Lines starting with '#' are comments; blank lines are ignored.
# Values are read by position, one per line:
#
# 1. Validity period in days, e.g. 365
# 2. RSA key size in bits for both certificates: 2048, 3072 or 4096
# 3. CA subject name (common name), e.g. MyRootCA
# 4. TLS certificate subject name (common name), e.g. MyLeaf
";

pub const HOSTS_TEMPLATE: &str = "\
# Lines starting with '#' are comments; blank lines are ignored.
# One host per line: a DNS name (example.local, *.example.local)
# or an IP address (127.0.0.1, ::1).
# Every entry becomes a subject alternative name of the TLS certificate.
# Leave empty to issue the certificate without subject alternative names.
";

/// Create whichever input files are missing and return their paths
///
/// An empty result means both files already existed.
pub fn bootstrap(files: &InputFiles) -> Result<Vec<PathBuf>> {
    let mut created = Vec::new();
    for (path, template) in [
        (&files.info_path, INFO_TEMPLATE),
        (&files.hosts_path, HOSTS_TEMPLATE),
    ] {
        if write_template(path, template)? {
            info!(path = %path.display(), "created template input file");
            created.push(path.clone());
        }
    }
    Ok(created)
}

fn write_template(path: &Path, template: &str) -> Result<bool> {
    let input_err = |source: std::io::Error| PkiError::Input {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(input_err)?;
    }
    match fs::OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(mut file) => {
            file.write_all(template.as_bytes()).map_err(input_err)?;
            Ok(true)
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(input_err(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input_files::normalize_lines;
    use tempfile::TempDir;

    fn files_in(dir: &TempDir) -> InputFiles {
        InputFiles::new(dir.path().join("info.txt"), dir.path().join("hosts.txt"))
    }

    #[test]
    fn test_bootstrap_creates_both_templates() {
        let dir = TempDir::new().unwrap();
        let files = files_in(&dir);

        let created = bootstrap(&files).unwrap();
        assert_eq!(created, vec![files.info_path.clone(), files.hosts_path.clone()]);
        assert!(files.exist());
        assert_eq!(fs::read_to_string(&files.info_path).unwrap(), INFO_TEMPLATE);
    }

    #[test]
    fn test_bootstrap_keeps_existing_files() {
        let dir = TempDir::new().unwrap();
        let files = files_in(&dir);
        fs::write(&files.info_path, "365\n2048\nca\nleaf\n").unwrap();

        let created = bootstrap(&files).unwrap();
        assert_eq!(created, vec![files.hosts_path.clone()]);
        assert_eq!(
            fs::read_to_string(&files.info_path).unwrap(),
            "365\n2048\nca\nleaf\n"
        );
        assert!(bootstrap(&files).unwrap().is_empty());
    }

    #[test]
    fn test_templates_contain_only_comments() {
        assert!(normalize_lines(INFO_TEMPLATE).is_empty());
        assert!(normalize_lines(HOSTS_TEMPLATE).is_empty());
    }
}
