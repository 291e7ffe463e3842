use serde::Deserialize;
use tracing::{debug, info};

use crate::config::Config;
use crate::crypto::codec::EnvelopeCodec;
use crate::crypto::signature::SignatureVerifier;
use crate::domains::message::InboundEnvelope;
use crate::error::{Result, RobotError};
use crate::services::{dispatcher, parser, reply};

/// Query parameters the platform attaches to every callback.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackQuery {
    pub msg_signature: Option<String>,
    pub timestamp: Option<String>,
    pub nonce: Option<String>,
    pub echostr: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SignedParams {
    pub msg_signature: String,
    pub timestamp: String,
    pub nonce: String,
}

impl CallbackQuery {
    pub fn require_signed(&self) -> Result<SignedParams> {
        let missing = [
            ("msg_signature", &self.msg_signature),
            ("timestamp", &self.timestamp),
            ("nonce", &self.nonce),
        ]
        .iter()
        .filter(|(_, value)| value.as_deref().map_or(true, str::is_empty))
        .map(|(name, _)| *name)
        .collect::<Vec<_>>();
        if !missing.is_empty() {
            return Err(RobotError::MalformedRequest(format!(
                "missing parameters: {}",
                missing.join(", ")
            )));
        }
        Ok(SignedParams {
            msg_signature: self.msg_signature.clone().unwrap_or_default(),
            timestamp: self.timestamp.clone().unwrap_or_default(),
            nonce: self.nonce.clone().unwrap_or_default(),
        })
    }
}

pub struct CallbackService {
    verifier: SignatureVerifier,
    codec: EnvelopeCodec,
}

impl CallbackService {
    pub fn new(verifier: SignatureVerifier, codec: EnvelopeCodec) -> Self {
        Self { verifier, codec }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(
            SignatureVerifier::new(config.token.clone()),
            EnvelopeCodec::from_config(config)?,
        ))
    }

    /// URL ownership check: returns the plaintext echo the platform expects.
    pub fn verify_url(&self, query: &CallbackQuery) -> Result<String> {
        let params = query.require_signed()?;
        if !self
            .verifier
            .verify(&params.msg_signature, &params.timestamp, &params.nonce)
        {
            return Err(RobotError::SignatureInvalid);
        }
        let echostr = query
            .echostr
            .as_deref()
            .filter(|value| !value.is_empty())
            .ok_or_else(|| RobotError::MalformedRequest("missing parameters: echostr".to_string()))?;

        let decrypted = self.codec.decrypt_echo(echostr)?;
        // Platform-specific: the echo may arrive wrapped in an XML envelope.
        Ok(parser::extract_echo_msg(&decrypted).unwrap_or(decrypted))
    }

    /// Message delivery: decrypts, interprets and answers one callback body.
    pub fn handle_message(&self, query: &CallbackQuery, body: &[u8]) -> Result<String> {
        let params = query.require_signed()?;
        let body = std::str::from_utf8(body)
            .map_err(|e| RobotError::MalformedRequest(format!("body is not utf-8: {e}")))?;
        debug!(body, "received encrypted message");

        let envelope = InboundEnvelope {
            ciphertext: parser::extract_encrypt(body)?,
            signature: params.msg_signature,
            timestamp: params.timestamp,
            nonce: params.nonce,
        };
        let decrypted = self.codec.decrypt(&envelope)?;
        debug!(decrypted = %decrypted, "decrypted message");

        let message = parser::parse(&decrypted)?;
        let content = dispatcher::dispatch(&message);
        info!(msg_type = %message.msg_type, reply = %content, "generated reply content");

        let reply_xml = reply::serialize(&reply::reply_to(&message, content));
        let encrypted = self
            .codec
            .encrypt(&reply_xml, &envelope.nonce, &envelope.timestamp)?;
        debug!(encrypted = %encrypted, "encrypted reply");
        Ok(encrypted)
    }
}
