// crates/vantage-core/src/core/hashing.rs
// ============================================================================
// Module: Vantage Canonical Hashing
// Description: Canonical JSON hashing for raw graphs and engine output.
// Purpose: Provide stable digests for audit trails and determinism checks.
// Dependencies: serde, serde_jcs, sha2
// ============================================================================

//! ## Overview
//! Hashing canonicalizes a serializable value with JCS (RFC 8785) and digests
//! it with SHA-256. The resulting [`HashDigest`] is stamped into engine
//! metadata so consumers can verify that two runs saw the same raw input,
//! and so determinism tests can assert byte-identical output.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Canonical hashing errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum HashError {
    /// Value could not be canonicalized to JCS form.
    #[error("canonicalization failed: {0}")]
    Canonicalize(String),
}

// ============================================================================
// SECTION: Hash Digest
// ============================================================================

/// SHA-256 digest over the canonical JCS rendering of a value.
///
/// # Invariants
/// - The digest is lowercase hex and always 64 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HashDigest(String);

impl HashDigest {
    /// Returns the digest as a lowercase hex string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HashDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ============================================================================
// SECTION: Canonical Digest
// ============================================================================

/// Computes the canonical JCS/SHA-256 digest of a serializable value.
///
/// # Errors
///
/// Returns [`HashError::Canonicalize`] when the value cannot be rendered as
/// canonical JSON (for example, non-finite floats).
pub fn canonical_digest<T: Serialize>(value: &T) -> Result<HashDigest, HashError> {
    let canonical =
        serde_jcs::to_string(value).map_err(|err| HashError::Canonicalize(err.to_string()))?;
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let digest = hasher.finalize();
    let mut rendered = String::with_capacity(64);
    for byte in digest {
        rendered.push(hex_char(byte >> 4));
        rendered.push(hex_char(byte & 0x0F));
    }
    Ok(HashDigest(rendered))
}

/// Renders a nibble as a lowercase hex character.
const fn hex_char(nibble: u8) -> char {
    match nibble {
        0 => '0',
        1 => '1',
        2 => '2',
        3 => '3',
        4 => '4',
        5 => '5',
        6 => '6',
        7 => '7',
        8 => '8',
        9 => '9',
        10 => 'a',
        11 => 'b',
        12 => 'c',
        13 => 'd',
        14 => 'e',
        _ => 'f',
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Test-only assertions are permitted.")]
mod tests {
    use serde_json::json;

    use super::canonical_digest;

    #[test]
    fn digest_is_stable_across_key_order() {
        let a = json!({"b": 1, "a": 2});
        let b = json!({"a": 2, "b": 1});
        assert_eq!(canonical_digest(&a).unwrap(), canonical_digest(&b).unwrap());
    }

    #[test]
    fn digest_is_64_hex_chars() {
        let digest = canonical_digest(&json!({"k": "v"})).unwrap();
        assert_eq!(digest.as_str().len(), 64);
        assert!(digest.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }
}
