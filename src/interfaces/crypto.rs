use thiserror::Error;

/// Failure reported by an envelope primitive. Each variant carries the
/// platform's numeric status through [`CryptoError::code`]. Only the statuses
/// this primitive can actually produce have a variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    #[error("message signature mismatch")]
    ValidateSignature,
    #[error("illegal aes key")]
    IllegalAesKey,
    #[error("corp id mismatch")]
    ValidateCorpId,
    #[error("aes encrypt failed")]
    EncryptAes,
    #[error("aes decrypt failed")]
    DecryptAes,
    #[error("illegal buffer: {0}")]
    IllegalBuffer(String),
    #[error("base64 decode failed")]
    DecodeBase64,
}

impl CryptoError {
    pub fn code(&self) -> i32 {
        match self {
            CryptoError::ValidateSignature => -40001,
            CryptoError::IllegalAesKey => -40004,
            CryptoError::ValidateCorpId => -40005,
            CryptoError::EncryptAes => -40006,
            CryptoError::DecryptAes => -40007,
            CryptoError::IllegalBuffer(_) => -40008,
            CryptoError::DecodeBase64 => -40010,
        }
    }
}

pub type CryptoResult<T> = std::result::Result<T, CryptoError>;

pub trait MsgCrypt: Send + Sync {
    /// Checks the message signature over the ciphertext, then opens it.
    fn decrypt(
        &self,
        ciphertext: &str,
        signature: &str,
        timestamp: &str,
        nonce: &str,
    ) -> CryptoResult<String>;

    /// Opens a ciphertext whose request signature was checked elsewhere.
    fn decrypt_echo(&self, ciphertext: &str) -> CryptoResult<String>;

    /// Seals `plaintext` into a signed outbound envelope.
    fn encrypt(&self, plaintext: &str, nonce: &str, timestamp: &str) -> CryptoResult<String>;
}
