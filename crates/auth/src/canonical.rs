//! Canonical request message
//!
//! The exact byte sequence both signer and verifier compute the MAC over.
//! The field order is a protocol invariant: changing it invalidates every
//! previously-issued signature.

use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 digest of the raw request body
pub fn body_digest(body: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(body);
    hex::encode(hasher.finalize())
}

/// Ordered tuple of request fields covered by the signature.
///
/// `query` is the raw, unparsed query string - re-encoding or reordering
/// parameters would change the signed bytes.
#[derive(Debug, Clone, Copy)]
pub struct CanonicalMessage<'a> {
    pub method: &'a str,
    pub path: &'a str,
    pub query: &'a str,
    pub body: &'a [u8],
    pub uid: &'a str,
    pub timestamp: &'a str,
}

impl CanonicalMessage<'_> {
    /// Render the newline-joined canonical form:
    /// `method \n path \n query \n hex(sha256(body)) \n uid \n timestamp`
    pub fn render(&self) -> String {
        format!(
            "{}\n{}\n{}\n{}\n{}\n{}",
            self.method,
            self.path,
            self.query,
            body_digest(self.body),
            self.uid,
            self.timestamp
        )
    }
}
