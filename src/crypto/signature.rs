use sha1::{Digest, Sha1};
use subtle::ConstantTimeEq;

/// Hex SHA-1 over `parts` sorted lexicographically and concatenated.
pub fn compute_signature(parts: &[&str]) -> String {
    let mut sorted = parts.to_vec();
    sorted.sort_unstable();
    let mut hasher = Sha1::new();
    for part in sorted {
        hasher.update(part.as_bytes());
    }
    hex::encode(hasher.finalize())
}

pub fn signatures_match(expected: &str, supplied: &str) -> bool {
    expected.as_bytes().ct_eq(supplied.as_bytes()).into()
}

pub fn verify(signature: &str, timestamp: &str, nonce: &str, shared_secret: &str) -> bool {
    let expected = compute_signature(&[shared_secret, timestamp, nonce]);
    let matched = signatures_match(&expected, signature);
    if !matched {
        tracing::debug!(timestamp, nonce, "request signature mismatch");
    }
    matched
}

#[derive(Clone)]
pub struct SignatureVerifier {
    token: String,
}

impl SignatureVerifier {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    pub fn verify(&self, signature: &str, timestamp: &str, nonce: &str) -> bool {
        verify(signature, timestamp, nonce, &self.token)
    }

    pub fn sign(&self, timestamp: &str, nonce: &str) -> String {
        compute_signature(&[&self.token, timestamp, nonce])
    }
}
