//! Export Pipeline
//!
//! Encodes the CA and leaf certificates into their six artifacts, checks that
//! every encoding of one certificate describes the same certificate and key,
//! then writes them into the output directory.
//!
//! | Artifact | File | Format |
//! |---|---|---|
//! | CA archive | `ca.pfx` | PKCS#12, empty password |
//! | CA certificate | `ca.cer` | DER |
//! | leaf archive | `tls.pfx` | PKCS#12, empty password |
//! | leaf certificate | `tls.cer` | DER |
//! | leaf PEM certificate | `tls.pem` | PEM |
//! | leaf PEM key | `tls.key` | PEM (PKCS#8) |
//!
//! Writes are not transactional: if one fails, artifacts written before it
//! stay on disk. Re-running regenerates all of them.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::certificate_asset::CertificateAsset;
use crate::error::{PkiError, Result};
use crate::hierarchy::Hierarchy;
use crate::pki_engine::{ArtifactFormat, PkiEngine};

/// The six files produced by a successful run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Artifact {
    CaArchive,
    CaCertificate,
    LeafArchive,
    LeafCertificate,
    LeafPemCertificate,
    LeafPemKey,
}

impl Artifact {
    pub const CA: [Artifact; 2] = [Artifact::CaArchive, Artifact::CaCertificate];
    pub const LEAF: [Artifact; 4] = [
        Artifact::LeafArchive,
        Artifact::LeafCertificate,
        Artifact::LeafPemCertificate,
        Artifact::LeafPemKey,
    ];

    pub fn all() -> impl Iterator<Item = Artifact> {
        Self::CA.into_iter().chain(Self::LEAF)
    }

    pub fn file_name(self) -> &'static str {
        match self {
            Artifact::CaArchive => "ca.pfx",
            Artifact::CaCertificate => "ca.cer",
            Artifact::LeafArchive => "tls.pfx",
            Artifact::LeafCertificate => "tls.cer",
            Artifact::LeafPemCertificate => "tls.pem",
            Artifact::LeafPemKey => "tls.key",
        }
    }

    pub fn format(self) -> ArtifactFormat {
        match self {
            Artifact::CaArchive | Artifact::LeafArchive => ArtifactFormat::Archive,
            Artifact::CaCertificate | Artifact::LeafCertificate => ArtifactFormat::Der,
            Artifact::LeafPemCertificate => ArtifactFormat::PemCertificate,
            Artifact::LeafPemKey => ArtifactFormat::PemPrivateKey,
        }
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Artifact::CaArchive => "CA archive",
            Artifact::CaCertificate => "CA certificate",
            Artifact::LeafArchive => "TLS archive",
            Artifact::LeafCertificate => "TLS certificate",
            Artifact::LeafPemCertificate => "TLS PEM certificate",
            Artifact::LeafPemKey => "TLS PEM private key",
        };
        write!(f, "{} ({})", label, self.file_name())
    }
}

/// One artifact as it was written to disk
#[derive(Debug, Clone)]
pub struct WrittenArtifact {
    pub artifact: Artifact,
    pub path: PathBuf,
    pub size: usize,
    /// SHA-256 of the DER certificate, colon-separated hex; `None` for the key file
    pub fingerprint: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ExportReport {
    pub written: Vec<WrittenArtifact>,
}

impl ExportReport {
    pub fn path_of(&self, artifact: Artifact) -> Option<&Path> {
        self.written
            .iter()
            .find(|w| w.artifact == artifact)
            .map(|w| w.path.as_path())
    }
}

struct RenderedArtifact {
    artifact: Artifact,
    bytes: Vec<u8>,
    fingerprint: Option<String>,
}

pub struct ExportPipeline<'a, E: PkiEngine> {
    engine: &'a E,
    output_dir: PathBuf,
}

impl<'a, E: PkiEngine> ExportPipeline<'a, E> {
    pub fn new(engine: &'a E, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            engine,
            output_dir: output_dir.into(),
        }
    }

    /// Encode, cross-check and write all six artifacts
    ///
    /// Every encoding is produced and verified before the first write, so an
    /// encoder or consistency failure leaves the output directory untouched.
    pub fn export(&self, hierarchy: &Hierarchy) -> Result<ExportReport> {
        let mut rendered = self.render(&hierarchy.ca, &Artifact::CA)?;
        rendered.extend(self.render(&hierarchy.leaf, &Artifact::LEAF)?);

        fs::create_dir_all(&self.output_dir).map_err(|source| PkiError::OutputDirectory {
            path: self.output_dir.clone(),
            source,
        })?;

        let mut report = ExportReport::default();
        for item in rendered {
            let path = self.output_dir.join(item.artifact.file_name());
            write_artifact(&path, &item.bytes, item.artifact.format().contains_private_key())
                .map_err(|source| PkiError::Export {
                    artifact: item.artifact,
                    path: path.clone(),
                    source,
                })?;
            info!(artifact = %item.artifact, path = %path.display(), "artifact written");
            report.written.push(WrittenArtifact {
                artifact: item.artifact,
                path,
                size: item.bytes.len(),
                fingerprint: item.fingerprint,
            });
        }
        Ok(report)
    }

    fn render(
        &self,
        asset: &CertificateAsset,
        artifacts: &[Artifact],
    ) -> Result<Vec<RenderedArtifact>> {
        let fingerprint = fingerprint(asset.certificate_der());
        artifacts
            .iter()
            .map(|&artifact| {
                let format = artifact.format();
                let bytes = self.engine.encode(format, asset, artifact)?;
                self.check_consistency(asset, artifact, &bytes)?;
                debug!(%artifact, size = bytes.len(), "artifact encoded and verified");
                Ok(RenderedArtifact {
                    artifact,
                    bytes,
                    fingerprint: (format != ArtifactFormat::PemPrivateKey)
                        .then(|| fingerprint.clone()),
                })
            })
            .collect()
    }

    fn check_consistency(
        &self,
        asset: &CertificateAsset,
        artifact: Artifact,
        bytes: &[u8],
    ) -> Result<()> {
        let format = artifact.format();
        let decoded = self.engine.decode_artifact(format, bytes, artifact)?;
        let mismatch = |reason: &str| PkiError::InconsistentExport {
            artifact,
            reason: reason.to_string(),
        };

        let expects_certificate = format != ArtifactFormat::PemPrivateKey;
        match (&decoded.certificate, expects_certificate) {
            (Some(summary), true) => {
                let expected = asset.summary();
                if summary.subject_name != expected.subject_name {
                    return Err(mismatch("subject name differs"));
                }
                if summary.issuer_name != expected.issuer_name {
                    return Err(mismatch("issuer name differs"));
                }
                if summary.not_before != expected.not_before
                    || summary.not_after != expected.not_after
                {
                    return Err(mismatch("validity window differs"));
                }
                if summary.public_key_der != expected.public_key_der {
                    return Err(mismatch("public key differs"));
                }
                if summary.subject_alt_names != expected.subject_alt_names {
                    return Err(mismatch("subject alternative names differ"));
                }
            }
            (None, true) => return Err(mismatch("certificate is missing")),
            (Some(_), false) => return Err(mismatch("unexpected certificate in key file")),
            (None, false) => {}
        }

        match (&decoded.private_key_public_der, format.contains_private_key()) {
            (Some(public_der), true) if public_der.as_slice() != asset.public_key_der() => {
                Err(mismatch("private key does not belong to the certificate"))
            }
            (Some(_), true) | (None, false) => Ok(()),
            (None, true) => Err(mismatch("private key is missing")),
            (Some(_), false) => Err(mismatch("public certificate carries a private key")),
        }
    }
}

fn write_artifact(path: &Path, bytes: &[u8], private: bool) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    if private {
        restrict_to_owner(path)?;
    }
    file.write_all(bytes)?;
    file.sync_all()
}

#[cfg(unix)]
fn restrict_to_owner(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_to_owner(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

/// SHA-256 fingerprint as colon-separated upper-case hex
pub fn fingerprint(der: &[u8]) -> String {
    Sha256::digest(der)
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(":")
}
