use thiserror::Error;

#[derive(Debug, Error)]
pub enum RobotError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("signature verification failed")]
    SignatureInvalid,
    #[error("malformed request: {0}")]
    MalformedRequest(String),
    #[error("decrypt failed with status {status}: {message}")]
    Decrypt { status: i32, message: String },
    #[error("message parse failed: {0}")]
    Parse(String),
    #[error("encrypt failed with status {status}: {message}")]
    Encrypt { status: i32, message: String },
    #[error("runtime error: {0}")]
    Runtime(String),
}

impl RobotError {
    /// Status reported by the envelope primitive, if this error came from it.
    pub fn crypto_status(&self) -> Option<i32> {
        match self {
            RobotError::Decrypt { status, .. } | RobotError::Encrypt { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, RobotError>;
