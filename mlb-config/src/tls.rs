use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use rustls_pki_types::{CertificateDer, PrivateKeyDer};

/// TLS material resolved from the CA/key/cert paths handed in at boot
/// (§6). Boot-time failures to read or parse this material are fatal
/// (§7, "Boot misconfiguration (bad TLS paths) terminates the process").
pub struct TlsMaterial {
    pub ca_certs: Vec<CertificateDer<'static>>,
    pub leaf_certs: Vec<CertificateDer<'static>>,
    pub private_key: PrivateKeyDer<'static>,
}

pub fn load(ca_path: &Path, key_path: &Path, cert_path: &Path) -> Result<TlsMaterial> {
    let ca_certs = read_certs(ca_path).context("reading CA certificate")?;
    let leaf_certs = read_certs(cert_path).context("reading leaf certificate")?;
    let private_key = read_private_key(key_path).context("reading private key")?;

    Ok(TlsMaterial {
        ca_certs,
        leaf_certs,
        private_key,
    })
}

/// Reads the raw PEM bytes of the CA certificate, for installing as a
/// trusted root on the outbound `reqwest` client used to reach TopoSource
/// and OffsetSink.
pub fn read_ca_pem(ca_path: &Path) -> Result<Vec<u8>> {
    std::fs::read(ca_path).with_context(|| format!("reading {}", ca_path.display()))
}

fn read_certs(path: &Path) -> Result<Vec<CertificateDer<'static>>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut reader = BufReader::new(file);
    rustls_pemfile::certs(&mut reader)
        .collect::<std::result::Result<Vec<_>, _>>()
        .with_context(|| format!("parsing PEM certificates from {}", path.display()))
}

fn read_private_key(path: &Path) -> Result<PrivateKeyDer<'static>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut reader = BufReader::new(file);
    rustls_pemfile::private_key(&mut reader)
        .with_context(|| format!("parsing private key from {}", path.display()))?
        .ok_or_else(|| anyhow::anyhow!("no private key found in {}", path.display()))
}
