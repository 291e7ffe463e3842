use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MsgType {
    Text,
    Image,
    News,
    Other(String),
}

impl MsgType {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "text" => MsgType::Text,
            "image" => MsgType::Image,
            "news" => MsgType::News,
            other => MsgType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            MsgType::Text => "text",
            MsgType::Image => "image",
            MsgType::News => "news",
            MsgType::Other(raw) => raw,
        }
    }
}

impl fmt::Display for MsgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessagePayload {
    Text { content: String },
    Image { media_id: String, pic_url: String },
    News { articles: Vec<Article> },
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecryptedMessage {
    pub msg_type: MsgType,
    pub from_user: String,
    pub to_user: String,
    pub payload: MessagePayload,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyMessage {
    pub to_user: String,
    pub from_user: String,
    pub msg_type: String,
    pub content: String,
    pub create_time: i64,
}

/// Ciphertext plus the out-of-band parameters it arrived with.
#[derive(Debug, Clone)]
pub struct InboundEnvelope {
    pub ciphertext: String,
    pub signature: String,
    pub timestamp: String,
    pub nonce: String,
}
