//! PKI Engine capability
//!
//! The hierarchy builder and export pipeline only talk to cryptography
//! through this trait. [`crate::openssl_engine::OpensslEngine`] is the
//! production implementation.

use crate::certificate_asset::{CaAsset, CertificateAsset, CertificateSummary, LeafAsset};
use crate::error::Result;
use crate::export::Artifact;
use crate::parameters::{HostList, KeySize};

/// Encodings an engine can produce for a certificate asset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactFormat {
    /// PKCS#12 container with certificate and private key, empty password
    Archive,
    /// DER certificate only
    Der,
    /// PEM `CERTIFICATE`
    PemCertificate,
    /// PEM PKCS#8 `PRIVATE KEY`
    PemPrivateKey,
}

impl ArtifactFormat {
    pub fn contains_private_key(self) -> bool {
        matches!(self, ArtifactFormat::Archive | ArtifactFormat::PemPrivateKey)
    }
}

/// Fields recovered by decoding an exported artifact
#[derive(Debug, Clone)]
pub struct DecodedArtifact {
    /// Present for every format except a bare private key
    pub certificate: Option<CertificateSummary>,
    /// Public half of the carried private key, if the artifact holds one
    pub private_key_public_der: Option<Vec<u8>>,
}

pub trait PkiEngine {
    /// Generate a fresh key pair and a self-signed CA certificate
    fn generate_self_signed(
        &self,
        subject_name: &str,
        key_size: KeySize,
        validity_days: u32,
    ) -> Result<CaAsset>;

    /// Generate a fresh key pair and a leaf certificate signed by `issuer`
    ///
    /// An empty `hosts` list produces a certificate without a
    /// subjectAltName extension.
    fn generate_signed_leaf(
        &self,
        issuer: &CaAsset,
        subject_name: &str,
        key_size: KeySize,
        validity_days: u32,
        hosts: &HostList,
    ) -> Result<LeafAsset>;

    /// Check that `leaf` carries a signature made with `issuer`'s key
    fn verify_issued_by(&self, leaf: &LeafAsset, issuer: &CaAsset) -> Result<bool>;

    fn encode_archive(&self, asset: &CertificateAsset, artifact: Artifact) -> Result<Vec<u8>>;

    fn encode_der(&self, asset: &CertificateAsset, artifact: Artifact) -> Result<Vec<u8>>;

    fn encode_pem_cert(&self, asset: &CertificateAsset, artifact: Artifact) -> Result<Vec<u8>>;

    fn encode_pem_key(&self, asset: &CertificateAsset, artifact: Artifact) -> Result<Vec<u8>>;

    /// Parse bytes produced by one of the encoders back into normalized fields
    fn decode_artifact(
        &self,
        format: ArtifactFormat,
        bytes: &[u8],
        artifact: Artifact,
    ) -> Result<DecodedArtifact>;

    /// Dispatch to the encoder matching `format`
    fn encode(
        &self,
        format: ArtifactFormat,
        asset: &CertificateAsset,
        artifact: Artifact,
    ) -> Result<Vec<u8>> {
        match format {
            ArtifactFormat::Archive => self.encode_archive(asset, artifact),
            ArtifactFormat::Der => self.encode_der(asset, artifact),
            ArtifactFormat::PemCertificate => self.encode_pem_cert(asset, artifact),
            ArtifactFormat::PemPrivateKey => self.encode_pem_key(asset, artifact),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::error::PkiError;

    /// Engine that cannot generate keys of any size
    pub(crate) struct BrokenEngine;

    impl PkiEngine for BrokenEngine {
        fn generate_self_signed(&self, _: &str, key_size: KeySize, _: u32) -> Result<CaAsset> {
            Err(PkiError::KeyGeneration(format!("{} unavailable", key_size)))
        }

        fn generate_signed_leaf(
            &self,
            _: &CaAsset,
            _: &str,
            _: KeySize,
            _: u32,
            _: &HostList,
        ) -> Result<LeafAsset> {
            unreachable!("leaf requested after CA generation failed")
        }

        fn verify_issued_by(&self, _: &LeafAsset, _: &CaAsset) -> Result<bool> {
            unreachable!()
        }

        fn encode_archive(&self, _: &CertificateAsset, _: Artifact) -> Result<Vec<u8>> {
            unreachable!()
        }

        fn encode_der(&self, _: &CertificateAsset, _: Artifact) -> Result<Vec<u8>> {
            unreachable!()
        }

        fn encode_pem_cert(&self, _: &CertificateAsset, _: Artifact) -> Result<Vec<u8>> {
            unreachable!()
        }

        fn encode_pem_key(&self, _: &CertificateAsset, _: Artifact) -> Result<Vec<u8>> {
            unreachable!()
        }

        fn decode_artifact(
            &self,
            _: ArtifactFormat,
            _: &[u8],
            _: Artifact,
        ) -> Result<DecodedArtifact> {
            unreachable!()
        }
    }
}
