//! # Digest — Opaque 256-bit Fingerprints of LL Residues
//!
//! Long runs publish a [`ResidueDigest`] at throttled checkpoints so that an
//! observer can compare progress between two runs of the same exponent
//! without ever seeing the residue itself.
//!
//! The digest is a value type: equality of bytes is its only meaning. The
//! hash behind it is collision resistant, but which hash is not part of the
//! contract and callers should not depend on it.
//!
//! Residues are hashed over their limb representation: every limb is fed in
//! little-endian order, so the byte stream is `limb_count * size_of::<limb>()`
//! bytes long. This matches the in-memory limbs on little-endian hosts and
//! gives the same digest on big-endian ones.

use rug::Integer;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Width of a digest in bytes.
pub const DIGEST_LEN: usize = 32;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ResidueDigest([u8; DIGEST_LEN]);

impl ResidueDigest {
    pub fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        ResidueDigest(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Lowercase hex, 64 characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for ResidueDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ResidueDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResidueDigest({})", self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected {} lowercase hex characters", DIGEST_LEN * 2)]
pub struct ParseDigestError;

impl FromStr for ResidueDigest {
    type Err = ParseDigestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Only the lowercase form Display produces is accepted.
        if !s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return Err(ParseDigestError);
        }
        let mut bytes = [0u8; DIGEST_LEN];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| ParseDigestError)?;
        Ok(ResidueDigest(bytes))
    }
}

/// Digest of an arbitrary byte sequence.
pub fn digest_bytes(data: &[u8]) -> ResidueDigest {
    ResidueDigest(Sha256::digest(data).into())
}

/// Digest of a string's UTF-8 bytes.
pub fn digest_str(s: &str) -> ResidueDigest {
    digest_bytes(s.as_bytes())
}

/// Digest of a residue's magnitude limbs, without copying them.
pub fn digest_residue(residue: &Integer) -> ResidueDigest {
    let mut hasher = Sha256::new();
    for limb in residue.as_limbs() {
        hasher.update(limb.to_le_bytes());
    }
    ResidueDigest(hasher.finalize().into())
}

/// Lowercase hex encoding of a digest, for logs.
pub fn to_hex(digest: &ResidueDigest) -> String {
    digest.to_hex()
}
