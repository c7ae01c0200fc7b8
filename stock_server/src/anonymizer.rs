//! Requester anonymization.
//!
//! Raw client addresses never leave the request handler; everything downstream
//! sees the SHA-256 digest of the address rendered as lowercase hex.
use sha2::{Digest, Sha256};
use std::fmt;

/// One-way identity derived from a requester address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityToken(String);

impl IdentityToken {
    /// Token as a hex string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Leading characters of the token, safe to put in logs.
    pub fn short(&self) -> &str {
        &self.0[..8]
    }
}

impl fmt::Display for IdentityToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hash `raw_address` into a stable identity token.
pub fn anonymize(raw_address: &str) -> IdentityToken {
    let mut hasher = Sha256::new();
    hasher.update(raw_address.as_bytes());
    IdentityToken(format!("{:x}", hasher.finalize()))
}
