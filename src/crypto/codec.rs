use std::sync::Arc;

use tracing::error;

use crate::config::Config;
use crate::crypto::WxBizMsgCrypt;
use crate::domains::message::InboundEnvelope;
use crate::error::{Result, RobotError};
use crate::interfaces::crypto::MsgCrypt;

#[derive(Clone)]
pub struct EnvelopeCodec {
    crypt: Arc<dyn MsgCrypt>,
}

impl EnvelopeCodec {
    pub fn new(crypt: Arc<dyn MsgCrypt>) -> Self {
        Self { crypt }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let crypt = WxBizMsgCrypt::new(config)
            .map_err(|e| RobotError::Config(format!("{e} (status {})", e.code())))?;
        Ok(Self::new(Arc::new(crypt)))
    }

    pub fn decrypt(&self, envelope: &InboundEnvelope) -> Result<String> {
        self.crypt
            .decrypt(
                &envelope.ciphertext,
                &envelope.signature,
                &envelope.timestamp,
                &envelope.nonce,
            )
            .map_err(|e| {
                error!(status = e.code(), "message decrypt failed: {e}");
                RobotError::Decrypt {
                    status: e.code(),
                    message: e.to_string(),
                }
            })
    }

    pub fn decrypt_echo(&self, echostr: &str) -> Result<String> {
        self.crypt.decrypt_echo(echostr).map_err(|e| {
            error!(status = e.code(), "echo decrypt failed: {e}");
            RobotError::Decrypt {
                status: e.code(),
                message: e.to_string(),
            }
        })
    }

    pub fn encrypt(&self, plaintext: &str, nonce: &str, timestamp: &str) -> Result<String> {
        self.crypt.encrypt(plaintext, nonce, timestamp).map_err(|e| {
            error!(status = e.code(), "reply encrypt failed: {e}");
            RobotError::Encrypt {
                status: e.code(),
                message: e.to_string(),
            }
        })
    }
}
