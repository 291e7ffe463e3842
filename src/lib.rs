pub mod config;
pub mod crypto;
pub mod daemon;
pub mod domains;
pub mod error;
pub mod interfaces;
pub mod services;
pub mod xml;

pub use crate::config::Config;
pub use crate::crypto::codec::EnvelopeCodec;
pub use crate::crypto::signature::SignatureVerifier;
pub use crate::domains::message::{DecryptedMessage, MessagePayload, MsgType, ReplyMessage};
pub use crate::error::{Result, RobotError};
pub use crate::services::callback::{CallbackQuery, CallbackService};
