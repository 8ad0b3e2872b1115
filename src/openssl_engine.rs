//! OpenSSL-backed PKI Engine
//!
//! Generates RSA key pairs and X.509v3 certificates, signs them with SHA-256,
//! and encodes them as PKCS#12, DER and PEM.
//!
//! # Certificate Properties
//! ```text
//! CA   (self-signed)  BasicConstraints CA=true, pathlen=0 (critical)
//!                     KeyUsage keyCertSign, cRLSign, digitalSignature (critical)
//!                     SubjectKeyIdentifier
//! Leaf (signed by CA) BasicConstraints CA=false (critical)
//!                     KeyUsage digitalSignature, keyEncipherment (critical)
//!                     ExtendedKeyUsage serverAuth, clientAuth
//!                     SubjectKeyIdentifier, AuthorityKeyIdentifier
//!                     SubjectAlternativeName (only when hosts are given)
//! ```
//! Serial numbers are random 128-bit values. Both validity bounds are derived
//! from a single issuance instant so the window is exactly `validity_days`.

use std::collections::BTreeSet;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use chrono::{DateTime, Utc};
use openssl::asn1::{Asn1Time, Asn1TimeRef};
use openssl::bn::{BigNum, MsbOption};
use openssl::error::ErrorStack;
use openssl::hash::MessageDigest;
use openssl::nid::Nid;
use openssl::pkcs12::Pkcs12;
use openssl::pkey::{PKey, Private};
use openssl::stack::Stack;
use openssl::x509::extension::{
    AuthorityKeyIdentifier, BasicConstraints, ExtendedKeyUsage, KeyUsage,
    SubjectAlternativeName, SubjectKeyIdentifier,
};
use openssl::x509::store::X509StoreBuilder;
use openssl::x509::{X509NameRef, X509StoreContext, X509VerifyResult, X509};
use tracing::{debug, warn};

use crate::certificate_asset::{CaAsset, CertificateAsset, CertificateSummary, LeafAsset};
use crate::error::{PkiError, Result};
use crate::export::Artifact;
use crate::parameters::{HostEntry, HostList, KeySize};
use crate::pki_engine::{ArtifactFormat, DecodedArtifact, PkiEngine};

const X509_VERSION_3: i32 = 2; // X509 version 3 is represented by 2
const CA_PATH_LENGTH: u32 = 0;
const SERIAL_BITS: i32 = 128;
const SECONDS_PER_DAY: i64 = 86_400;
/// PKCS#12 archives are written without a password
const ARCHIVE_PASSWORD: &str = "";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CertificateRole {
    Ca,
    Leaf,
}

struct CertificateProfile<'a> {
    subject_name: &'a str,
    validity_days: u32,
    role: CertificateRole,
    hosts: &'a HostList,
}

/// [`PkiEngine`] implementation on top of the `openssl` crate
#[derive(Debug, Default, Clone, Copy)]
pub struct OpensslEngine;

impl OpensslEngine {
    pub fn new() -> Self {
        Self
    }

    fn generate_key(&self, key_size: KeySize) -> Result<PKey<Private>> {
        debug!(%key_size, "generating key pair");
        let rsa = openssl::rsa::Rsa::generate(key_size.bits())
            .map_err(keygen("generate RSA keypair"))?;
        PKey::from_rsa(rsa).map_err(keygen("create private key"))
    }

    /// Build and sign a certificate for `private_key`.
    ///
    /// `signer` is `None` for a self-signed certificate, otherwise the issuer
    /// key and certificate.
    fn build_certificate(
        &self,
        profile: &CertificateProfile<'_>,
        private_key: &PKey<Private>,
        signer: Option<(&PKey<Private>, &X509)>,
    ) -> Result<X509> {
        let mut builder = X509::builder().map_err(keygen("create X509 builder"))?;

        builder
            .set_version(X509_VERSION_3)
            .map_err(keygen("set version"))?;

        // Generate random 128-bit (16-byte) serial number
        let mut serial = BigNum::new().map_err(keygen("allocate serial"))?;
        serial
            .rand(SERIAL_BITS, MsbOption::MAYBE_ZERO, false)
            .map_err(keygen("generate serial"))?;
        let asn1_serial = serial
            .to_asn1_integer()
            .map_err(keygen("encode serial"))?;
        builder
            .set_serial_number(&asn1_serial)
            .map_err(keygen("set serial"))?;

        let mut name_builder =
            openssl::x509::X509Name::builder().map_err(keygen("create name builder"))?;
        name_builder
            .append_entry_by_nid(Nid::COMMONNAME, profile.subject_name)
            .map_err(keygen("set CN"))?;
        let subject_name = name_builder.build();

        builder
            .set_subject_name(&subject_name)
            .map_err(keygen("set subject"))?;
        match signer {
            Some((_, issuer_cert)) => builder
                .set_issuer_name(issuer_cert.subject_name())
                .map_err(keygen("set issuer from CA"))?,
            None => builder
                .set_issuer_name(&subject_name)
                .map_err(keygen("set issuer"))?,
        }

        let issued_at = Utc::now().timestamp();
        let not_before = Asn1Time::from_unix(issued_at as _).map_err(keygen("create not_before"))?;
        builder
            .set_not_before(&not_before)
            .map_err(keygen("set not_before"))?;
        let expires_at = issued_at + i64::from(profile.validity_days) * SECONDS_PER_DAY;
        let not_after = Asn1Time::from_unix(expires_at as _).map_err(keygen("create not_after"))?;
        builder
            .set_not_after(&not_after)
            .map_err(keygen("set not_after"))?;

        builder
            .set_pubkey(private_key)
            .map_err(keygen("set public key"))?;

        match profile.role {
            CertificateRole::Ca => {
                let mut bc = BasicConstraints::new();
                bc.critical().ca().pathlen(CA_PATH_LENGTH);
                let extension = bc.build().map_err(keygen("build BasicConstraints"))?;
                builder
                    .append_extension(extension)
                    .map_err(keygen("add BasicConstraints"))?;

                let ku = KeyUsage::new()
                    .critical()
                    .key_cert_sign()
                    .crl_sign()
                    .digital_signature()
                    .build()
                    .map_err(keygen("build KeyUsage"))?;
                builder
                    .append_extension(ku)
                    .map_err(keygen("add KeyUsage"))?;

                let ski = SubjectKeyIdentifier::new()
                    .build(&builder.x509v3_context(None, None))
                    .map_err(keygen("build SubjectKeyIdentifier"))?;
                builder
                    .append_extension(ski)
                    .map_err(keygen("add SubjectKeyIdentifier"))?;
            }
            CertificateRole::Leaf => {
                let issuer_cert = signer.map(|(_, cert)| &**cert);

                // CA=false (end-entity certificate)
                let bc = BasicConstraints::new()
                    .critical()
                    .build()
                    .map_err(keygen("build BasicConstraints"))?;
                builder
                    .append_extension(bc)
                    .map_err(keygen("add BasicConstraints"))?;

                let ku = KeyUsage::new()
                    .critical()
                    .digital_signature() // TLS handshakes
                    .key_encipherment() // RSA key exchange
                    .build()
                    .map_err(keygen("build KeyUsage"))?;
                builder
                    .append_extension(ku)
                    .map_err(keygen("add KeyUsage"))?;

                let eku = ExtendedKeyUsage::new()
                    .server_auth()
                    .client_auth()
                    .build()
                    .map_err(keygen("build ExtendedKeyUsage"))?;
                builder
                    .append_extension(eku)
                    .map_err(keygen("add ExtendedKeyUsage"))?;

                let ski = SubjectKeyIdentifier::new()
                    .build(&builder.x509v3_context(issuer_cert, None))
                    .map_err(keygen("build SubjectKeyIdentifier"))?;
                builder
                    .append_extension(ski)
                    .map_err(keygen("add SubjectKeyIdentifier"))?;

                if issuer_cert.is_some() {
                    let aki = AuthorityKeyIdentifier::new()
                        .keyid(false)
                        .build(&builder.x509v3_context(issuer_cert, None))
                        .map_err(keygen("build AuthorityKeyIdentifier"))?;
                    builder
                        .append_extension(aki)
                        .map_err(keygen("add AuthorityKeyIdentifier"))?;
                }

                // No hosts means no SAN extension at all
                if !profile.hosts.is_empty() {
                    let mut san = SubjectAlternativeName::new();
                    for host in profile.hosts.entries() {
                        match host {
                            HostEntry::Dns(name) => san.dns(name),
                            HostEntry::Ip(ip) => san.ip(&ip.to_string()),
                        };
                    }
                    let san = san
                        .build(&builder.x509v3_context(issuer_cert, None))
                        .map_err(keygen("build SubjectAlternativeName"))?;
                    builder
                        .append_extension(san)
                        .map_err(keygen("add SubjectAlternativeName"))?;
                }
            }
        }

        let signing_key = signer.map(|(key, _)| key).unwrap_or(private_key);
        builder
            .sign(signing_key, MessageDigest::sha256())
            .map_err(keygen("sign certificate"))?;

        Ok(builder.build())
    }

    fn make_asset(
        &self,
        certificate: &X509,
        private_key: &PKey<Private>,
    ) -> Result<CertificateAsset> {
        let summary = summarize(certificate).map_err(keygen("read back certificate"))?;
        let certificate_der = certificate
            .to_der()
            .map_err(keygen("encode certificate"))?;
        let private_key_der = private_key
            .private_key_to_der()
            .map_err(keygen("encode private key"))?;
        Ok(CertificateAsset::new(summary, certificate_der, private_key_der))
    }
}

impl PkiEngine for OpensslEngine {
    fn generate_self_signed(
        &self,
        subject_name: &str,
        key_size: KeySize,
        validity_days: u32,
    ) -> Result<CaAsset> {
        let private_key = self.generate_key(key_size)?;
        let no_hosts = HostList::default();
        let profile = CertificateProfile {
            subject_name,
            validity_days,
            role: CertificateRole::Ca,
            hosts: &no_hosts,
        };
        let certificate = self.build_certificate(&profile, &private_key, None)?;
        debug!(subject = subject_name, "self-signed CA certificate built");
        Ok(CaAsset::new(self.make_asset(&certificate, &private_key)?))
    }

    fn generate_signed_leaf(
        &self,
        issuer: &CaAsset,
        subject_name: &str,
        key_size: KeySize,
        validity_days: u32,
        hosts: &HostList,
    ) -> Result<LeafAsset> {
        let issuer_key = PKey::private_key_from_der(issuer.private_key_der())
            .map_err(keygen("load CA private key"))?;
        let issuer_cert =
            X509::from_der(issuer.certificate_der()).map_err(keygen("load CA certificate"))?;

        let private_key = self.generate_key(key_size)?;
        let profile = CertificateProfile {
            subject_name,
            validity_days,
            role: CertificateRole::Leaf,
            hosts,
        };
        let certificate =
            self.build_certificate(&profile, &private_key, Some((&issuer_key, &issuer_cert)))?;
        debug!(
            subject = subject_name,
            issuer = issuer.subject_name(),
            hosts = hosts.len(),
            "leaf certificate built"
        );
        Ok(LeafAsset::new(self.make_asset(&certificate, &private_key)?))
    }

    fn verify_issued_by(&self, leaf: &LeafAsset, issuer: &CaAsset) -> Result<bool> {
        let chain_err =
            |what: &str, e: ErrorStack| PkiError::ChainVerification(format!("{}: {}", what, e));

        let leaf_cert = X509::from_der(leaf.certificate_der())
            .map_err(|e| chain_err("failed to parse leaf certificate", e))?;
        let ca_cert = X509::from_der(issuer.certificate_der())
            .map_err(|e| chain_err("failed to parse CA certificate", e))?;
        let ca_public_key = ca_cert
            .public_key()
            .map_err(|e| chain_err("failed to read CA public key", e))?;

        match leaf_cert.verify(&ca_public_key) {
            Ok(true) => {}
            Ok(false) => {
                warn!("leaf signature does not verify under the CA public key");
                return Ok(false);
            }
            Err(e) => {
                warn!(error = %e, "leaf signature could not be checked against the CA key");
                return Ok(false);
            }
        }

        let issued = ca_cert.issued(&leaf_cert);
        if issued != X509VerifyResult::OK {
            warn!(reason = issued.error_string(), "CA did not issue the leaf");
            return Ok(false);
        }

        // Full path validation with the CA as the only trust anchor
        let mut store_builder =
            X509StoreBuilder::new().map_err(|e| chain_err("failed to create trust store", e))?;
        store_builder
            .add_cert(ca_cert)
            .map_err(|e| chain_err("failed to add CA to trust store", e))?;
        let store = store_builder.build();
        let untrusted: Stack<X509> = Stack::new().map_err(|e| chain_err("failed to create chain", e))?;
        let mut context =
            X509StoreContext::new().map_err(|e| chain_err("failed to create store context", e))?;
        let (valid, result) = context
            .init(&store, &leaf_cert, &untrusted, |ctx| {
                let valid = ctx.verify_cert()?;
                Ok((valid, ctx.error()))
            })
            .map_err(|e| chain_err("path validation failed", e))?;
        if !valid {
            warn!(reason = result.error_string(), "leaf does not chain to the CA");
        }
        Ok(valid)
    }

    fn encode_archive(&self, asset: &CertificateAsset, artifact: Artifact) -> Result<Vec<u8>> {
        let encoding = encoding_err(artifact);
        let private_key = PKey::private_key_from_der(asset.private_key_der()).map_err(encoding)?;
        let certificate = X509::from_der(asset.certificate_der()).map_err(encoding)?;
        let pkcs12 = Pkcs12::builder()
            .name(asset.subject_name())
            .pkey(&private_key)
            .cert(&certificate)
            .build2(ARCHIVE_PASSWORD)
            .map_err(encoding)?;
        pkcs12.to_der().map_err(encoding)
    }

    fn encode_der(&self, asset: &CertificateAsset, artifact: Artifact) -> Result<Vec<u8>> {
        // Round-trip through the parser so a corrupt asset fails here, not in a TLS stack
        let certificate = X509::from_der(asset.certificate_der()).map_err(encoding_err(artifact))?;
        certificate.to_der().map_err(encoding_err(artifact))
    }

    fn encode_pem_cert(&self, asset: &CertificateAsset, artifact: Artifact) -> Result<Vec<u8>> {
        let certificate = X509::from_der(asset.certificate_der()).map_err(encoding_err(artifact))?;
        certificate.to_pem().map_err(encoding_err(artifact))
    }

    fn encode_pem_key(&self, asset: &CertificateAsset, artifact: Artifact) -> Result<Vec<u8>> {
        let private_key =
            PKey::private_key_from_der(asset.private_key_der()).map_err(encoding_err(artifact))?;
        private_key
            .private_key_to_pem_pkcs8()
            .map_err(encoding_err(artifact))
    }

    fn decode_artifact(
        &self,
        format: ArtifactFormat,
        bytes: &[u8],
        artifact: Artifact,
    ) -> Result<DecodedArtifact> {
        let decoding = decoding_err(artifact);
        match format {
            ArtifactFormat::Archive => {
                let parsed = Pkcs12::from_der(bytes)
                    .and_then(|p| p.parse2(ARCHIVE_PASSWORD))
                    .map_err(decoding)?;
                let certificate = parsed
                    .cert
                    .as_ref()
                    .map(|cert| summarize(cert))
                    .transpose()
                    .map_err(decoding_err(artifact))?;
                let private_key_public_der = parsed
                    .pkey
                    .as_ref()
                    .map(|key| key.public_key_to_der())
                    .transpose()
                    .map_err(decoding)?;
                Ok(DecodedArtifact {
                    certificate,
                    private_key_public_der,
                })
            }
            ArtifactFormat::Der => {
                let certificate = X509::from_der(bytes).map_err(decoding)?;
                Ok(DecodedArtifact {
                    certificate: Some(summarize(&certificate).map_err(decoding_err(artifact))?),
                    private_key_public_der: None,
                })
            }
            ArtifactFormat::PemCertificate => {
                let certificate = X509::from_pem(bytes).map_err(decoding)?;
                Ok(DecodedArtifact {
                    certificate: Some(summarize(&certificate).map_err(decoding_err(artifact))?),
                    private_key_public_der: None,
                })
            }
            ArtifactFormat::PemPrivateKey => {
                let private_key = PKey::private_key_from_pem(bytes).map_err(decoding)?;
                Ok(DecodedArtifact {
                    certificate: None,
                    private_key_public_der: Some(
                        private_key.public_key_to_der().map_err(decoding)?,
                    ),
                })
            }
        }
    }
}

fn keygen<E: fmt::Display>(context: &'static str) -> impl Fn(E) -> PkiError {
    move |e| PkiError::KeyGeneration(format!("failed to {}: {}", context, e))
}

fn encoding_err(artifact: Artifact) -> impl Fn(ErrorStack) -> PkiError + Copy {
    move |e| PkiError::Encoding {
        artifact,
        reason: e.to_string(),
    }
}

fn decoding_err<E: fmt::Display>(artifact: Artifact) -> impl Fn(E) -> PkiError + Copy {
    move |e| PkiError::InconsistentExport {
        artifact,
        reason: format!("cannot be decoded: {}", e),
    }
}

/// Why a certificate could not be read back into a [`CertificateSummary`]
#[derive(Debug)]
enum SummaryError {
    Openssl(ErrorStack),
    TimeOutOfRange(i64),
}

impl From<ErrorStack> for SummaryError {
    fn from(e: ErrorStack) -> Self {
        SummaryError::Openssl(e)
    }
}

impl fmt::Display for SummaryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummaryError::Openssl(e) => write!(f, "{}", e),
            SummaryError::TimeOutOfRange(seconds) => {
                write!(f, "validity time {}s from the epoch is out of range", seconds)
            }
        }
    }
}

/// Extract the normalized fields of a certificate
fn summarize(certificate: &X509) -> std::result::Result<CertificateSummary, SummaryError> {
    Ok(CertificateSummary {
        subject_name: common_name(certificate.subject_name())?,
        issuer_name: common_name(certificate.issuer_name())?,
        not_before: asn1_to_datetime(certificate.not_before())?,
        not_after: asn1_to_datetime(certificate.not_after())?,
        public_key_der: certificate.public_key()?.public_key_to_der()?,
        subject_alt_names: subject_alt_names(certificate),
    })
}

fn common_name(name: &X509NameRef) -> std::result::Result<String, ErrorStack> {
    match name.entries_by_nid(Nid::COMMONNAME).next() {
        Some(entry) => entry.data().to_string(),
        None => Ok(String::new()),
    }
}

fn asn1_to_datetime(time: &Asn1TimeRef) -> std::result::Result<DateTime<Utc>, SummaryError> {
    let epoch = Asn1Time::from_unix(0)?;
    let diff = epoch.diff(time)?;
    let seconds = i64::from(diff.days) * SECONDS_PER_DAY + i64::from(diff.secs);
    datetime_from_seconds(seconds)
}

fn datetime_from_seconds(seconds: i64) -> std::result::Result<DateTime<Utc>, SummaryError> {
    DateTime::from_timestamp(seconds, 0).ok_or(SummaryError::TimeOutOfRange(seconds))
}

fn subject_alt_names(certificate: &X509) -> Option<BTreeSet<HostEntry>> {
    let names = certificate.subject_alt_names()?;
    let mut entries = BTreeSet::new();
    for name in names.iter() {
        if let Some(dns) = name.dnsname() {
            entries.insert(HostEntry::Dns(dns.to_ascii_lowercase()));
        } else if let Some(ip) = name.ipaddress() {
            match ip_from_bytes(ip) {
                Some(ip) => {
                    entries.insert(HostEntry::Ip(ip));
                }
                None => warn!(len = ip.len(), "ignoring malformed IP address in SAN"),
            }
        }
    }
    Some(entries)
}

fn ip_from_bytes(bytes: &[u8]) -> Option<IpAddr> {
    if let Ok(octets) = <[u8; 4]>::try_from(bytes) {
        return Some(IpAddr::V4(Ipv4Addr::from(octets)));
    }
    if let Ok(octets) = <[u8; 16]>::try_from(bytes) {
        return Some(IpAddr::V6(Ipv6Addr::from(octets)));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hosts(entries: &[&str]) -> HostList {
        HostList::resolve(entries).unwrap()
    }

    fn issue(host_entries: &[&str]) -> (CaAsset, LeafAsset) {
        let engine = OpensslEngine::new();
        let ca = engine
            .generate_self_signed("Test Root CA", KeySize::Rsa2048, 30)
            .unwrap();
        let leaf = engine
            .generate_signed_leaf(&ca, "test.local", KeySize::Rsa2048, 30, &hosts(host_entries))
            .unwrap();
        (ca, leaf)
    }

    #[test]
    fn test_ca_is_self_signed_authority() {
        let engine = OpensslEngine::new();
        let ca = engine
            .generate_self_signed("Test Root CA", KeySize::Rsa2048, 365)
            .unwrap();
        assert_eq!(ca.subject_name(), "Test Root CA");
        assert_eq!(ca.issuer_name(), "Test Root CA");
        assert_eq!(ca.validity_span_days(), 365);
        assert!(ca.summary().subject_alt_names.is_none());

        let cert = X509::from_der(ca.certificate_der()).unwrap();
        let key = cert.public_key().unwrap();
        assert!(cert.verify(&key).unwrap());
        let text = String::from_utf8(cert.to_text().unwrap()).unwrap();
        assert!(text.contains("CA:TRUE"));
    }

    #[test]
    fn test_leaf_chains_to_ca() {
        let (ca, leaf) = issue(&["example.local", "127.0.0.1"]);
        let engine = OpensslEngine::new();
        assert!(engine.verify_issued_by(&leaf, &ca).unwrap());
        assert_eq!(leaf.issuer_name(), ca.subject_name());
        assert_ne!(leaf.public_key_der(), ca.public_key_der());

        let cert = X509::from_der(leaf.certificate_der()).unwrap();
        let text = String::from_utf8(cert.to_text().unwrap()).unwrap();
        assert!(text.contains("CA:FALSE"));
        assert!(text.contains("TLS Web Server Authentication"));
    }

    #[test]
    fn test_leaf_from_other_ca_is_rejected() {
        let (_, leaf) = issue(&["example.local"]);
        let engine = OpensslEngine::new();
        let stranger = engine
            .generate_self_signed("Test Root CA", KeySize::Rsa2048, 30)
            .unwrap();
        assert!(!engine.verify_issued_by(&leaf, &stranger).unwrap());
    }

    #[test]
    fn test_san_matches_hosts() {
        let (_, leaf) = issue(&["example.local", "127.0.0.1", "::1", "*.apps.local"]);
        let expected: BTreeSet<HostEntry> =
            hosts(&["::1", "*.apps.local", "127.0.0.1", "example.local"])
                .entries()
                .iter()
                .cloned()
                .collect();
        assert_eq!(leaf.hosts(), expected);
    }

    #[test]
    fn test_empty_hosts_omit_san_extension() {
        let (_, leaf) = issue(&[]);
        assert!(leaf.summary().subject_alt_names.is_none());
        let cert = X509::from_der(leaf.certificate_der()).unwrap();
        assert!(cert.subject_alt_names().is_none());
    }

    #[test]
    fn test_every_encoding_decodes_to_same_certificate() {
        let (_, leaf) = issue(&["example.local"]);
        let engine = OpensslEngine::new();
        let artifact = Artifact::LeafArchive;
        for format in [
            ArtifactFormat::Archive,
            ArtifactFormat::Der,
            ArtifactFormat::PemCertificate,
            ArtifactFormat::PemPrivateKey,
        ] {
            let bytes = engine.encode(format, &leaf, artifact).unwrap();
            let decoded = engine.decode_artifact(format, &bytes, artifact).unwrap();
            if let Some(summary) = decoded.certificate {
                assert_eq!(&summary, leaf.summary());
            }
            if let Some(public_der) = decoded.private_key_public_der {
                assert_eq!(public_der, leaf.public_key_der());
            }
            assert_eq!(format.contains_private_key(), bytes_hold_key(format, &bytes));
        }
    }

    fn bytes_hold_key(format: ArtifactFormat, bytes: &[u8]) -> bool {
        match format {
            ArtifactFormat::PemPrivateKey => {
                String::from_utf8_lossy(bytes).contains("BEGIN PRIVATE KEY")
            }
            ArtifactFormat::Archive => Pkcs12::from_der(bytes)
                .unwrap()
                .parse2(ARCHIVE_PASSWORD)
                .unwrap()
                .pkey
                .is_some(),
            _ => false,
        }
    }

    #[test]
    fn test_garbage_does_not_decode() {
        let engine = OpensslEngine::new();
        let err = engine
            .decode_artifact(ArtifactFormat::Der, b"not a certificate", Artifact::CaCertificate)
            .unwrap_err();
        assert!(matches!(err, PkiError::InconsistentExport { .. }));
    }

    #[test]
    fn test_common_name_keeps_interior_nul() {
        let mut builder = openssl::x509::X509Name::builder().unwrap();
        builder
            .append_entry_by_nid(Nid::COMMONNAME, "Root\0Shadow")
            .unwrap();
        let name = builder.build();
        assert_eq!(common_name(&name).unwrap(), "Root\0Shadow");
    }

    #[test]
    fn test_out_of_range_time_is_an_error() {
        assert_eq!(datetime_from_seconds(0).unwrap().timestamp(), 0);
        let err = datetime_from_seconds(i64::MAX).unwrap_err();
        assert!(matches!(err, SummaryError::TimeOutOfRange(i64::MAX)));

        let mapped = decoding_err(Artifact::CaCertificate)(err);
        assert!(matches!(mapped, PkiError::InconsistentExport { .. }));
    }
}
