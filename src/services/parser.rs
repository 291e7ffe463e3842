use crate::domains::message::{Article, DecryptedMessage, MessagePayload, MsgType};
use crate::error::{Result, RobotError};
use crate::xml::XmlElement;

pub fn parse(decrypted_xml: &str) -> Result<DecryptedMessage> {
    let root = XmlElement::parse(decrypted_xml).map_err(|e| RobotError::Parse(e.to_string()))?;

    let msg_type = MsgType::parse(required_non_empty(&root, "MsgType")?);
    let from_user = required_non_empty(&root, "FromUserName")?.to_string();
    let to_user = required_non_empty(&root, "ToUserName")?.to_string();

    let payload = match msg_type {
        MsgType::Text => MessagePayload::Text {
            content: required(&root, "Content")?.to_string(),
        },
        MsgType::Image => MessagePayload::Image {
            media_id: required(&root, "MediaId")?.to_string(),
            pic_url: required(&root, "PicUrl")?.to_string(),
        },
        MsgType::News => {
            let articles = match root.child("Articles") {
                Some(container) => container
                    .children("Article")
                    .enumerate()
                    .map(|(idx, article)| -> Result<Article> {
                        Ok(Article {
                            title: required(article, "Title")
                                .map_err(|_| missing(&format!("Articles/Article[{idx}]/Title")))?
                                .to_string(),
                            url: required(article, "Url")
                                .map_err(|_| missing(&format!("Articles/Article[{idx}]/Url")))?
                                .to_string(),
                        })
                    })
                    .collect::<Result<Vec<_>>>()?,
                None => Vec::new(),
            };
            MessagePayload::News { articles }
        }
        MsgType::Other(_) => MessagePayload::Empty,
    };

    Ok(DecryptedMessage {
        msg_type,
        from_user,
        to_user,
        payload,
    })
}

/// Pulls the `Encrypt` element out of a callback request body.
pub fn extract_encrypt(body: &str) -> Result<String> {
    let root = XmlElement::parse(body)
        .map_err(|e| RobotError::MalformedRequest(format!("unparseable message body: {e}")))?;
    root.child_text("Encrypt")
        .filter(|value| !value.trim().is_empty())
        .map(str::to_string)
        .ok_or_else(|| RobotError::MalformedRequest("message body has no Encrypt".to_string()))
}

/// Returns the `Msg` field when the decrypted echo is itself an XML envelope.
pub fn extract_echo_msg(decrypted: &str) -> Option<String> {
    if !decrypted.trim_start().starts_with('<') {
        return None;
    }
    XmlElement::parse(decrypted)
        .ok()
        .and_then(|root| root.child_text("Msg").map(str::to_string))
}

fn missing(field: &str) -> RobotError {
    RobotError::Parse(format!("missing required field {field}"))
}

fn required<'a>(element: &'a XmlElement, field: &str) -> Result<&'a str> {
    element.child_text(field).ok_or_else(|| missing(field))
}

fn required_non_empty<'a>(element: &'a XmlElement, field: &str) -> Result<&'a str> {
    required(element, field)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| missing(field))
}
