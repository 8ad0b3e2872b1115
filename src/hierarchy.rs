//! Hierarchy Builder
//!
//! Produces a verifiably chained (CA, leaf) pair from resolved parameters.
//!
//! ```text
//! CA (self-signed, CA=true)
//!   └── Leaf (signed by CA, CA=false, SAN = hosts)
//! ```
//!
//! Both certificates use the same key size and validity period. Any engine
//! failure aborts the build; nothing is retried.

use chrono::Utc;
use tracing::info;

use crate::certificate_asset::{CaAsset, LeafAsset};
use crate::error::{PkiError, Result};
use crate::parameters::{HostList, IssuanceParameters};
use crate::pki_engine::PkiEngine;

/// A CA and the leaf certificate it issued
#[derive(Debug)]
pub struct Hierarchy {
    pub ca: CaAsset,
    pub leaf: LeafAsset,
}

pub struct HierarchyBuilder<'a, E: PkiEngine> {
    engine: &'a E,
}

impl<'a, E: PkiEngine> HierarchyBuilder<'a, E> {
    pub fn new(engine: &'a E) -> Self {
        Self { engine }
    }

    /// Generate the CA, issue the leaf under it and check the chain
    ///
    /// # Errors
    /// - [`PkiError::KeyGeneration`] if the engine cannot produce either certificate
    /// - [`PkiError::ChainVerification`] if the leaf does not chain to the CA
    pub fn build(&self, params: &IssuanceParameters, hosts: &HostList) -> Result<Hierarchy> {
        let ca = self.engine.generate_self_signed(
            &params.ca_subject_name,
            params.key_size,
            params.validity_days,
        )?;
        info!(subject = ca.subject_name(), key_size = %params.key_size, "CA certificate generated");

        let leaf = self.engine.generate_signed_leaf(
            &ca,
            &params.leaf_subject_name,
            params.key_size,
            params.validity_days,
            hosts,
        )?;
        info!(
            subject = leaf.subject_name(),
            issuer = leaf.issuer_name(),
            hosts = hosts.len(),
            "leaf certificate issued"
        );

        let hierarchy = Hierarchy { ca, leaf };
        self.check_chain(&hierarchy)?;
        Ok(hierarchy)
    }

    fn check_chain(&self, hierarchy: &Hierarchy) -> Result<()> {
        let Hierarchy { ca, leaf } = hierarchy;

        if ca.issuer_name() != ca.subject_name() {
            return Err(PkiError::ChainVerification(format!(
                "CA `{}` is not self-issued (issuer `{}`)",
                ca.subject_name(),
                ca.issuer_name()
            )));
        }
        if leaf.issuer_name() != ca.subject_name() {
            return Err(PkiError::ChainVerification(format!(
                "leaf issuer `{}` does not match CA subject `{}`",
                leaf.issuer_name(),
                ca.subject_name()
            )));
        }
        if leaf.public_key_der() == ca.public_key_der() {
            return Err(PkiError::ChainVerification(
                "leaf reuses the CA key pair".to_string(),
            ));
        }

        let checked_at = Utc::now();
        for (role, asset) in [("CA", &**ca), ("leaf", &**leaf)] {
            if !asset.is_valid_at(checked_at) {
                return Err(PkiError::ChainVerification(format!(
                    "{} validity window {} .. {} does not contain the issuance time",
                    role,
                    asset.not_before(),
                    asset.not_after()
                )));
            }
        }

        if !self.engine.verify_issued_by(leaf, ca)? {
            return Err(PkiError::ChainVerification(
                "leaf signature does not verify under the CA public key".to_string(),
            ));
        }
        Ok(())
    }
}
