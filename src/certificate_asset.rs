//! In-memory certificate assets
//!
//! A [`CertificateAsset`] is the library-neutral result of an engine call: the
//! DER certificate, the private key (DER, zeroized on drop) and the
//! normalized fields the rest of the crate reasons about. [`CaAsset`] and
//! [`LeafAsset`] wrap it so that only a CA can be passed as an issuer.

use std::collections::BTreeSet;
use std::fmt;
use std::ops::Deref;

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretBox};

use crate::parameters::HostEntry;

/// Normalized certificate fields used to compare encodings of one asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateSummary {
    pub subject_name: String,
    pub issuer_name: String,
    pub not_before: DateTime<Utc>,
    pub not_after: DateTime<Utc>,
    /// SubjectPublicKeyInfo, DER
    pub public_key_der: Vec<u8>,
    /// `None` when the certificate has no subjectAltName extension
    pub subject_alt_names: Option<BTreeSet<HostEntry>>,
}

pub struct CertificateAsset {
    summary: CertificateSummary,
    certificate_der: Vec<u8>,
    private_key_der: SecretBox<Vec<u8>>,
}

impl CertificateAsset {
    pub fn new(
        summary: CertificateSummary,
        certificate_der: Vec<u8>,
        private_key_der: Vec<u8>,
    ) -> Self {
        Self {
            summary,
            certificate_der,
            private_key_der: SecretBox::new(Box::new(private_key_der)),
        }
    }

    pub fn summary(&self) -> &CertificateSummary {
        &self.summary
    }

    pub fn subject_name(&self) -> &str {
        &self.summary.subject_name
    }

    pub fn issuer_name(&self) -> &str {
        &self.summary.issuer_name
    }

    pub fn not_before(&self) -> DateTime<Utc> {
        self.summary.not_before
    }

    pub fn not_after(&self) -> DateTime<Utc> {
        self.summary.not_after
    }

    pub fn public_key_der(&self) -> &[u8] {
        &self.summary.public_key_der
    }

    pub fn certificate_der(&self) -> &[u8] {
        &self.certificate_der
    }

    /// DER private key. Callers must not keep copies around.
    pub fn private_key_der(&self) -> &[u8] {
        self.private_key_der.expose_secret()
    }

    /// Whole days covered by the validity window
    pub fn validity_span_days(&self) -> i64 {
        (self.summary.not_after - self.summary.not_before).num_days()
    }

    pub fn is_valid_at(&self, instant: DateTime<Utc>) -> bool {
        self.summary.not_before <= instant && instant <= self.summary.not_after
    }
}

impl fmt::Debug for CertificateAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CertificateAsset")
            .field("summary", &self.summary)
            .field("certificate_der", &format_args!("{} bytes", self.certificate_der.len()))
            .field("private_key_der", &"<redacted>")
            .finish()
    }
}

/// Self-signed certificate authority
#[derive(Debug)]
pub struct CaAsset(CertificateAsset);

impl CaAsset {
    pub fn new(asset: CertificateAsset) -> Self {
        Self(asset)
    }
}

impl Deref for CaAsset {
    type Target = CertificateAsset;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// End-entity certificate signed by a [`CaAsset`]
#[derive(Debug)]
pub struct LeafAsset(CertificateAsset);

impl LeafAsset {
    pub fn new(asset: CertificateAsset) -> Self {
        Self(asset)
    }

    /// SAN entries, empty when the extension is absent
    pub fn hosts(&self) -> BTreeSet<HostEntry> {
        self.0
            .summary
            .subject_alt_names
            .clone()
            .unwrap_or_default()
    }
}

impl Deref for LeafAsset {
    type Target = CertificateAsset;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_asset() -> CertificateAsset {
        let not_before = Utc::now();
        CertificateAsset::new(
            CertificateSummary {
                subject_name: "MyLeaf".to_string(),
                issuer_name: "MyRootCA".to_string(),
                not_before,
                not_after: not_before + Duration::days(30),
                public_key_der: vec![1, 2, 3],
                subject_alt_names: None,
            },
            vec![0x30, 0x00],
            b"super secret key bytes".to_vec(),
        )
    }

    #[test]
    fn test_debug_no_leak() {
        let asset = sample_asset();
        let debug_str = format!("{:?}", asset);
        assert!(!debug_str.contains("super secret"));
        assert!(debug_str.contains("<redacted>"));
    }

    #[test]
    fn test_validity_window() {
        let asset = sample_asset();
        assert_eq!(asset.validity_span_days(), 30);
        assert!(asset.is_valid_at(asset.not_before() + Duration::days(1)));
        assert!(!asset.is_valid_at(asset.not_after() + Duration::seconds(1)));
    }

    #[test]
    fn test_leaf_without_san_has_no_hosts() {
        let leaf = LeafAsset::new(sample_asset());
        assert!(leaf.hosts().is_empty());
    }
}
