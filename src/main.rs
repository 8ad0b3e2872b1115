//! TLS Cert Help
//!
//! Generates a private CA and a TLS certificate from `info.txt` and
//! `hosts.txt`, and exports them into `conf/`. On first run the two input
//! files are created from templates instead.
//!
//! Logging goes to stderr and is controlled with `RUST_LOG` (default `info`).

use anyhow::{Context, Result};
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

use tls_cert_help::configs::AppConfig;
use tls_cert_help::openssl_engine::OpensslEngine;
use tls_cert_help::workflow::{self, RunOutcome};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    println!("=== TLS Cert Help ===\n");
    let config = AppConfig::load().context("Failed to load application config")?;
    let files = config
        .input_files()
        .context("Failed to locate input files")?;
    let output_dir = config
        .output_dir()
        .context("Failed to locate output directory")?;

    let outcome = workflow::run(&OpensslEngine::new(), &files, &output_dir)
        .context("Certificate provisioning failed")?;

    match outcome {
        RunOutcome::ConfigurationCreated(created) => {
            for path in &created {
                println!("✓ Created {}", path.display());
            }
            println!(
                "\nConfiguration files created. Edit {} and {}, then run again.",
                files.info_path.display(),
                files.hosts_path.display()
            );
            if config.prompt.wait_for_acknowledgment {
                print!("Press Enter to exit...");
                io::stdout().flush()?;
                let mut line = String::new();
                io::stdin().read_line(&mut line)?;
            }
        }
        RunOutcome::Issued(report) => {
            for written in &report.written {
                println!("✓ {} -> {}", written.artifact, written.path.display());
                if let Some(fingerprint) = &written.fingerprint {
                    println!("    SHA-256 {}", fingerprint);
                }
            }
            println!(
                "\n✓ CA and TLS certificates exported to {}",
                output_dir.display()
            );
        }
    }

    Ok(())
}
