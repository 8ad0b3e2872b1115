//! Parameter Resolver
//!
//! Turns the raw positional values of `info.txt` and the entries of
//! `hosts.txt` into validated [`IssuanceParameters`] and a [`HostList`].
//! Input normalization (comment and blank line removal) happens in
//! [`crate::input_files`] before anything reaches this module.
//!
//! # Positional values
//! ```text
//! 0: validity in days        e.g. 365
//! 1: RSA key size in bits    2048 | 3072 | 4096
//! 2: CA subject name         e.g. MyRootCA
//! 3: leaf subject name       e.g. MyLeaf
//! ```

use std::fmt;
use std::net::IpAddr;

use tracing::{debug, warn};

use crate::error::{PkiError, Result};

/// Upper bound on certificate lifetime (100 years)
pub const MAX_VALIDITY_DAYS: u32 = 36_500;
/// X.520 upper bound for commonName
pub const MAX_SUBJECT_NAME_LEN: usize = 64;

const MAX_DNS_NAME_LEN: usize = 253;
const MAX_DNS_LABEL_LEN: usize = 63;

const FIELD_NAMES: [&str; 4] = [
    "validity_days",
    "key_size",
    "ca_subject_name",
    "leaf_subject_name",
];

/// RSA modulus sizes accepted for both certificates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeySize {
    Rsa2048,
    Rsa3072,
    Rsa4096,
}

impl KeySize {
    pub const MINIMUM_BITS: u32 = 2048;

    pub fn bits(self) -> u32 {
        match self {
            KeySize::Rsa2048 => 2048,
            KeySize::Rsa3072 => 3072,
            KeySize::Rsa4096 => 4096,
        }
    }

    pub fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            2048 => Some(KeySize::Rsa2048),
            3072 => Some(KeySize::Rsa3072),
            4096 => Some(KeySize::Rsa4096),
            _ => None,
        }
    }
}

impl fmt::Display for KeySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RSA-{}", self.bits())
    }
}

/// Validated issuance parameters shared by the CA and the leaf certificate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuanceParameters {
    pub validity_days: u32,
    pub key_size: KeySize,
    pub ca_subject_name: String,
    pub leaf_subject_name: String,
}

impl IssuanceParameters {
    /// Resolve the four positional values read from `info.txt`
    ///
    /// # Errors
    /// Returns [`PkiError::Configuration`] naming the offending field when a
    /// value is absent, non-numeric where a number is expected, or outside
    /// its allowed range.
    pub fn resolve<S: AsRef<str>>(values: &[S]) -> Result<Self> {
        if values.len() > FIELD_NAMES.len() {
            warn!(
                extra = values.len() - FIELD_NAMES.len(),
                "ignoring values after the fourth entry of the parameter file"
            );
        }

        let validity_days = parse_validity_days(required(values, 0)?)?;
        let key_size = parse_key_size(required(values, 1)?)?;
        let ca_subject_name = parse_subject_name(FIELD_NAMES[2], required(values, 2)?)?;
        let leaf_subject_name = parse_subject_name(FIELD_NAMES[3], required(values, 3)?)?;

        let params = Self {
            validity_days,
            key_size,
            ca_subject_name,
            leaf_subject_name,
        };
        debug!(?params, "issuance parameters resolved");
        Ok(params)
    }
}

fn required<S: AsRef<str>>(values: &[S], index: usize) -> Result<&str> {
    values
        .get(index)
        .map(|v| v.as_ref().trim())
        .ok_or_else(|| {
            PkiError::configuration(
                FIELD_NAMES[index],
                format!("missing value (expected at position {})", index + 1),
            )
        })
}

fn parse_validity_days(raw: &str) -> Result<u32> {
    let days: u32 = raw.parse().map_err(|_| {
        PkiError::configuration(
            FIELD_NAMES[0],
            format!("`{}` is not a whole number of days", raw),
        )
    })?;
    if days == 0 {
        return Err(PkiError::configuration(
            FIELD_NAMES[0],
            "validity must be at least one day",
        ));
    }
    if days > MAX_VALIDITY_DAYS {
        return Err(PkiError::configuration(
            FIELD_NAMES[0],
            format!("{} days exceeds the maximum of {}", days, MAX_VALIDITY_DAYS),
        ));
    }
    Ok(days)
}

fn parse_key_size(raw: &str) -> Result<KeySize> {
    let bits: u32 = raw.parse().map_err(|_| {
        PkiError::configuration(FIELD_NAMES[1], format!("`{}` is not a number of bits", raw))
    })?;
    if bits < KeySize::MINIMUM_BITS {
        return Err(PkiError::configuration(
            FIELD_NAMES[1],
            format!(
                "{} bits is below the {}-bit minimum",
                bits,
                KeySize::MINIMUM_BITS
            ),
        ));
    }
    KeySize::from_bits(bits).ok_or_else(|| {
        PkiError::configuration(
            FIELD_NAMES[1],
            format!("{} bits is not supported (use 2048, 3072 or 4096)", bits),
        )
    })
}

fn parse_subject_name(field: &str, raw: &str) -> Result<String> {
    if raw.is_empty() {
        return Err(PkiError::configuration(field, "subject name is empty"));
    }
    if raw.chars().count() > MAX_SUBJECT_NAME_LEN {
        return Err(PkiError::configuration(
            field,
            format!(
                "subject name is longer than {} characters",
                MAX_SUBJECT_NAME_LEN
            ),
        ));
    }
    if raw.chars().any(char::is_control) {
        return Err(PkiError::configuration(
            field,
            "subject name contains control characters",
        ));
    }
    Ok(raw.to_string())
}

// ================= Host list =================

/// A single subject alternative name entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HostEntry {
    Dns(String),
    Ip(IpAddr),
}

impl HostEntry {
    /// Parse one host line. IP literals win over DNS names.
    pub fn parse(raw: &str) -> std::result::Result<Self, String> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err("entry is empty".to_string());
        }
        let unbracketed = raw
            .strip_prefix('[')
            .and_then(|s| s.strip_suffix(']'))
            .unwrap_or(raw);
        if let Ok(ip) = unbracketed.parse::<IpAddr>() {
            return Ok(HostEntry::Ip(ip));
        }
        validate_dns_name(raw).map(HostEntry::Dns)
    }
}

impl fmt::Display for HostEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostEntry::Dns(name) => f.write_str(name),
            HostEntry::Ip(ip) => write!(f, "{}", ip),
        }
    }
}

fn validate_dns_name(raw: &str) -> std::result::Result<String, String> {
    let name = raw.trim_end_matches('.').to_ascii_lowercase();
    if name.is_empty() {
        return Err(format!("`{}` is not a host name", raw));
    }
    if name.len() > MAX_DNS_NAME_LEN {
        return Err(format!(
            "`{}` is longer than {} characters",
            raw, MAX_DNS_NAME_LEN
        ));
    }

    let labels = match name.strip_prefix("*.") {
        Some(rest) => rest,
        None => name.as_str(),
    };
    for label in labels.split('.') {
        if label.is_empty() || label.len() > MAX_DNS_LABEL_LEN {
            return Err(format!("`{}` has an empty or oversized label", raw));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(format!("label `{}` in `{}` starts or ends with '-'", label, raw));
        }
        if !label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(format!("`{}` contains characters not allowed in a host name", raw));
        }
    }
    Ok(name)
}

/// Ordered, duplicate-free set of host identities for the leaf certificate
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostList {
    entries: Vec<HostEntry>,
}

impl HostList {
    /// Resolve the entries read from `hosts.txt`
    ///
    /// Duplicates are dropped, keeping the first occurrence. A malformed entry
    /// yields [`PkiError::Configuration`] with field `hosts[<line index>]`.
    pub fn resolve<S: AsRef<str>>(entries: &[S]) -> Result<Self> {
        let mut list = HostList::default();
        for (index, raw) in entries.iter().enumerate() {
            let entry = HostEntry::parse(raw.as_ref())
                .map_err(|reason| PkiError::configuration(format!("hosts[{}]", index), reason))?;
            if list.entries.contains(&entry) {
                debug!(host = %entry, "dropping duplicate host entry");
                continue;
            }
            list.entries.push(entry);
        }
        Ok(list)
    }

    pub fn entries(&self) -> &[HostEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
