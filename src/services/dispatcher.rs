use tracing::error;

use crate::domains::message::{DecryptedMessage, MessagePayload, MsgType};
use crate::error::{Result, RobotError};

pub const FALLBACK_REPLY: &str = "message processing failed";

/// Maps a message to its reply text. Never fails; composition errors turn
/// into [`FALLBACK_REPLY`].
pub fn dispatch(message: &DecryptedMessage) -> String {
    match compose(message) {
        Ok(reply) => reply,
        Err(err) => {
            error!(msg_type = %message.msg_type, "message processing failed: {err}");
            FALLBACK_REPLY.to_string()
        }
    }
}

fn compose(message: &DecryptedMessage) -> Result<String> {
    match (&message.msg_type, &message.payload) {
        (MsgType::Text, MessagePayload::Text { content }) => {
            Ok(format!("received text message: {content}"))
        }
        (MsgType::Image, MessagePayload::Image { media_id, pic_url }) => Ok(format!(
            "received image, media_id: {media_id}, pic_url: {pic_url}"
        )),
        (MsgType::News, MessagePayload::News { articles }) => {
            let lines = articles
                .iter()
                .map(|article| format!("title: {}, url: {}", article.title, article.url))
                .collect::<Vec<_>>();
            Ok(format!(
                "received news message with {} articles\n{}",
                articles.len(),
                lines.join("\n")
            ))
        }
        (MsgType::Other(raw), _) => Ok(format!("unsupported message type: {raw}")),
        (msg_type, payload) => Err(RobotError::Runtime(format!(
            "payload {payload:?} does not match message type {msg_type}"
        ))),
    }
}
