//! Publisher signature verification
//!
//! Artifacts are signed with the publisher's ECDSA P-256 key over the
//! SHA-256 digest of the file. The detached signature ships next to the
//! artifact as a PEM `SIGNATURE` block containing the DER-encoded
//! signature. An unverified artifact is never handed to the installer.

use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use p256::ecdsa::signature::DigestVerifier;
use p256::ecdsa::{Signature, VerifyingKey};
use p256::pkcs8::DecodePublicKey;
use sha2::{Digest, Sha256};

/// PEM tag expected on detached signature files
const SIGNATURE_TAG: &str = "SIGNATURE";

/// Orbit release publisher public key (SubjectPublicKeyInfo, P-256)
const PUBLISHER_PUBLIC_KEY_PEM: &str = "\
-----BEGIN PUBLIC KEY-----
MFkwEwYHKoZIzj0CAQYIKoZIzj0DAQcDQgAEYP7UuiVanTHJYet0xjVtaMBJuJI7
Yfps5mliLmDyn7Z5A/4QCLi8maQa6elWKLxk8vGyDC1+n1F3o8KU1EYimQ==
-----END PUBLIC KEY-----
";

/// Parse the embedded publisher key.
pub fn publisher_key() -> Result<VerifyingKey> {
    VerifyingKey::from_public_key_pem(PUBLISHER_PUBLIC_KEY_PEM)
        .map_err(|e| anyhow!("embedded publisher key is invalid: {e}"))
}

/// Verify `artifact` against the detached signature in `signature_file`.
pub fn verify_artifact(artifact: &Path, signature_file: &Path, key: &VerifyingKey) -> Result<()> {
    let signature = read_signature(signature_file)?;

    let mut file = std::fs::File::open(artifact)
        .with_context(|| format!("failed to open {}", artifact.display()))?;
    let mut hasher = Sha256::new();
    std::io::copy(&mut file, &mut hasher)
        .with_context(|| format!("failed to read {}", artifact.display()))?;

    key.verify_digest(hasher, &signature)
        .map_err(|_| anyhow!("artifact does not match its publisher signature"))?;
    Ok(())
}

fn read_signature(signature_file: &Path) -> Result<Signature> {
    let text = std::fs::read_to_string(signature_file)
        .with_context(|| format!("failed to read {}", signature_file.display()))?;
    let block = pem::parse(text.trim()).context("signature file is not valid PEM")?;
    if block.tag() != SIGNATURE_TAG {
        bail!("unexpected PEM tag `{}` in signature file", block.tag());
    }
    Signature::from_der(block.contents()).map_err(|e| anyhow!("signature is not valid DER: {e}"))
}
