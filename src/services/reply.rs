use std::time::{SystemTime, UNIX_EPOCH};

use crate::domains::message::{DecryptedMessage, ReplyMessage};
use crate::xml::cdata;

pub const REPLY_MSG_TYPE: &str = "text";

/// Reply addressed back to the sender of `inbound`.
pub fn reply_to(inbound: &DecryptedMessage, content: String) -> ReplyMessage {
    ReplyMessage {
        to_user: inbound.from_user.clone(),
        from_user: inbound.to_user.clone(),
        msg_type: REPLY_MSG_TYPE.to_string(),
        content,
        create_time: now_ts(),
    }
}

/// `to_user` and `from_user` are the inbound message's routing fields; the
/// serialized reply swaps them.
pub fn build(to_user: &str, from_user: &str, msg_type: &str, content: &str) -> String {
    serialize(&ReplyMessage {
        to_user: from_user.to_string(),
        from_user: to_user.to_string(),
        msg_type: msg_type.to_string(),
        content: content.to_string(),
        create_time: now_ts(),
    })
}

pub fn serialize(reply: &ReplyMessage) -> String {
    format!(
        "<xml><ToUserName>{}</ToUserName><FromUserName>{}</FromUserName><CreateTime>{}</CreateTime><MsgType>{}</MsgType><Content>{}</Content></xml>",
        cdata(&reply.to_user),
        cdata(&reply.from_user),
        reply.create_time,
        cdata(&reply.msg_type),
        cdata(&reply.content),
    )
}

fn now_ts() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
