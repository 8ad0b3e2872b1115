//! End-to-end issuance run
//!
//! ```text
//! input files ─▶ resolve parameters ─▶ build hierarchy ─▶ export artifacts
//! ```
//!
//! Stages run one after another on the calling thread. The first error stops
//! the run; when the input files are missing the run stops after creating
//! templates, before any key is generated.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::Result;
use crate::export::{ExportPipeline, ExportReport};
use crate::hierarchy::HierarchyBuilder;
use crate::input_files::InputFiles;
use crate::parameters::{HostList, IssuanceParameters};
use crate::pki_engine::PkiEngine;
use crate::templates;

/// How a run ended
#[derive(Debug)]
pub enum RunOutcome {
    /// Input files were missing; these templates were written instead
    ConfigurationCreated(Vec<PathBuf>),
    /// All artifacts were written
    Issued(ExportReport),
}

/// Resolve, build and export using explicit input files and output directory
pub fn run<E: PkiEngine>(engine: &E, files: &InputFiles, output_dir: &Path) -> Result<RunOutcome> {
    if !files.exist() {
        let created = templates::bootstrap(files)?;
        info!(created = created.len(), "input files missing; templates written");
        return Ok(RunOutcome::ConfigurationCreated(created));
    }

    let params = IssuanceParameters::resolve(&files.read_parameter_values()?)?;
    let hosts = HostList::resolve(&files.read_host_entries()?)?;
    info!(
        validity_days = params.validity_days,
        key_size = %params.key_size,
        hosts = hosts.len(),
        "issuance parameters loaded"
    );

    let hierarchy = HierarchyBuilder::new(engine).build(&params, &hosts)?;
    let report = ExportPipeline::new(engine, output_dir).export(&hierarchy)?;
    info!(output_dir = %output_dir.display(), "all artifacts exported");
    Ok(RunOutcome::Issued(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PkiError;
    use crate::export::Artifact;
    use crate::openssl_engine::OpensslEngine;
    use crate::pki_engine::testing::BrokenEngine;
    use openssl::x509::X509;
    use std::collections::BTreeSet;
    use std::fs;
    use tempfile::TempDir;

    struct Workspace {
        _dir: TempDir,
        files: InputFiles,
        output: PathBuf,
    }

    fn workspace(info: Option<&str>, hosts: Option<&str>) -> Workspace {
        let dir = TempDir::new().unwrap();
        let files = InputFiles::new(dir.path().join("info.txt"), dir.path().join("hosts.txt"));
        if let Some(info) = info {
            fs::write(&files.info_path, info).unwrap();
        }
        if let Some(hosts) = hosts {
            fs::write(&files.hosts_path, hosts).unwrap();
        }
        let output = dir.path().join("conf");
        Workspace {
            _dir: dir,
            files,
            output,
        }
    }

    #[test]
    fn test_missing_config_creates_templates_only() {
        let ws = workspace(None, None);
        let outcome = run(&BrokenEngine, &ws.files, &ws.output).unwrap();

        match outcome {
            RunOutcome::ConfigurationCreated(created) => assert_eq!(created.len(), 2),
            other => panic!("expected templates, got {other:?}"),
        }
        assert!(ws.files.exist());
        assert!(!ws.output.exists());
    }

    #[test]
    fn test_example_scenario_end_to_end() {
        let ws = workspace(
            Some("# issuance\n365\n2048\nMyRootCA\nMyLeaf\n"),
            Some("example.local\n127.0.0.1\n"),
        );
        let outcome = run(&OpensslEngine::new(), &ws.files, &ws.output).unwrap();
        let report = match outcome {
            RunOutcome::Issued(report) => report,
            other => panic!("expected issued artifacts, got {other:?}"),
        };
        assert_eq!(report.written.len(), 6);

        let ca = X509::from_der(&fs::read(ws.output.join("ca.cer")).unwrap()).unwrap();
        let leaf = X509::from_pem(&fs::read(ws.output.join("tls.pem")).unwrap()).unwrap();
        assert!(leaf.verify(&ca.public_key().unwrap()).unwrap());

        let sans: BTreeSet<String> = leaf
            .subject_alt_names()
            .unwrap()
            .iter()
            .map(|name| match (name.dnsname(), name.ipaddress()) {
                (Some(dns), _) => dns.to_string(),
                (None, Some(ip)) => ip.iter().map(u8::to_string).collect::<Vec<_>>().join("."),
                _ => panic!("unexpected SAN type"),
            })
            .collect();
        let expected: BTreeSet<String> = ["example.local", "127.0.0.1"]
            .into_iter()
            .map(str::to_string)
            .collect();
        assert_eq!(sans, expected);

        let days = ca.not_before().diff(ca.not_after()).unwrap().days;
        assert_eq!(days, 365);
    }

    #[test]
    fn test_weak_key_size_writes_nothing() {
        let ws = workspace(Some("365\n512\nMyRootCA\nMyLeaf\n"), Some(""));
        let err = run(&BrokenEngine, &ws.files, &ws.output).unwrap_err();
        assert!(matches!(err, PkiError::Configuration { ref field, .. } if field == "key_size"));
        assert!(!ws.output.exists());
    }

    #[test]
    fn test_key_generation_failure_writes_nothing() {
        let ws = workspace(Some("365\n2048\nMyRootCA\nMyLeaf\n"), Some("example.local\n"));
        let err = run(&BrokenEngine, &ws.files, &ws.output).unwrap_err();
        assert!(matches!(err, PkiError::KeyGeneration(_)));
        for artifact in Artifact::all() {
            assert!(!ws.output.join(artifact.file_name()).exists());
        }
    }

    #[test]
    fn test_malformed_host_aborts_before_key_generation() {
        let ws = workspace(Some("365\n2048\nMyRootCA\nMyLeaf\n"), Some("good.local\nbad host\n"));
        let err = run(&BrokenEngine, &ws.files, &ws.output).unwrap_err();
        assert!(matches!(err, PkiError::Configuration { ref field, .. } if field == "hosts[1]"));
    }
}
