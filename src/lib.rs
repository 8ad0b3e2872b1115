//! TLS Cert Help - Private CA and TLS certificate provisioning
//!
//! Creates a self-signed Certificate Authority and one TLS certificate issued
//! by it, bound to a list of host names and IP addresses, then exports both in
//! the formats TLS servers and clients usually ask for.
//!
//! # Overview
//!
//! ```text
//! CA (self-signed, CA=true, pathlen=0)
//!   └── TLS certificate (signed by CA, CA=false, SAN = hosts)
//! ```
//!
//! A run reads two text files from the base directory:
//!
//! - `info.txt`: validity days, RSA key size, CA name, TLS certificate name
//! - `hosts.txt`: one DNS name or IP address per line
//!
//! and writes six artifacts into `conf/`:
//!
//! | File | Content |
//! |---|---|
//! | `ca.pfx` | CA certificate + key (PKCS#12, no password) |
//! | `ca.cer` | CA certificate (DER) |
//! | `tls.pfx` | TLS certificate + key (PKCS#12, no password) |
//! | `tls.cer` | TLS certificate (DER) |
//! | `tls.pem` | TLS certificate (PEM) |
//! | `tls.key` | TLS private key (PEM, PKCS#8) |
//!
//! When either input file is missing, documented templates are written instead
//! and no keys are generated.
//!
//! # Architecture
//!
//! - [`parameters`]: validation of the raw input values
//! - [`pki_engine`]: the cryptography capability the core depends on
//! - [`openssl_engine`]: OpenSSL implementation of [`pki_engine::PkiEngine`]
//! - [`hierarchy`]: builds and checks the CA/TLS pair
//! - [`export`]: encodes, cross-checks and writes the artifacts
//! - [`workflow`]: the sequential run tying everything together
//!
//! # Example
//!
//! ```no_run
//! use tls_cert_help::hierarchy::HierarchyBuilder;
//! use tls_cert_help::export::ExportPipeline;
//! use tls_cert_help::openssl_engine::OpensslEngine;
//! use tls_cert_help::parameters::{HostList, IssuanceParameters};
//!
//! fn main() -> anyhow::Result<()> {
//!     let engine = OpensslEngine::new();
//!     let params = IssuanceParameters::resolve(&["365", "2048", "MyRootCA", "MyLeaf"])?;
//!     let hosts = HostList::resolve(&["example.local", "127.0.0.1"])?;
//!
//!     let hierarchy = HierarchyBuilder::new(&engine).build(&params, &hosts)?;
//!     let report = ExportPipeline::new(&engine, "conf").export(&hierarchy)?;
//!     println!("{} artifacts written", report.written.len());
//!     Ok(())
//! }
//! ```

pub mod certificate_asset;
pub mod configs;
pub mod error;
pub mod export;
pub mod hierarchy;
pub mod input_files;
pub mod openssl_engine;
pub mod parameters;
pub mod pki_engine;
pub mod templates;
pub mod workflow;

pub use error::{PkiError, Result};
