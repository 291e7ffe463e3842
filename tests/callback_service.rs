mod common;

use wecom_robot::domains::message::{MessagePayload, MsgType};
use wecom_robot::error::RobotError;
use wecom_robot::services::callback::CallbackQuery;
use wecom_robot::services::parser::parse;

use common::{
    encrypt_failing_service, open_reply, platform_post, test_crypt, test_service,
    text_message_xml, url_signature, NONCE, TIMESTAMP,
};

fn signed_query(signature: &str) -> CallbackQuery {
    CallbackQuery {
        msg_signature: Some(signature.to_string()),
        timestamp: Some(TIMESTAMP.to_string()),
        nonce: Some(NONCE.to_string()),
        echostr: None,
    }
}

#[test]
fn message_roundtrip_replies_to_sender() {
    let (body, signature) = platform_post(&text_message_xml("alice", "bot", "hello"));
    let encrypted = test_service()
        .handle_message(&signed_query(&signature), body.as_bytes())
        .unwrap();

    let reply = parse(&open_reply(&encrypted)).unwrap();
    assert_eq!(reply.msg_type, MsgType::Text);
    assert_eq!(reply.to_user, "alice");
    assert_eq!(reply.from_user, "bot");
    assert_eq!(
        reply.payload,
        MessagePayload::Text {
            content: "received text message: hello".to_string()
        }
    );
}

#[test]
fn missing_params_are_malformed() {
    let (body, _) = platform_post(&text_message_xml("alice", "bot", "hello"));
    let mut query = signed_query("sig");
    query.nonce = None;
    let err = test_service()
        .handle_message(&query, body.as_bytes())
        .unwrap_err();
    assert!(matches!(err, RobotError::MalformedRequest(ref msg) if msg.contains("nonce")));

    let err = test_service()
        .handle_message(&CallbackQuery::default(), body.as_bytes())
        .unwrap_err();
    assert!(matches!(err, RobotError::MalformedRequest(_)));
}

#[test]
fn classifies_each_failure() {
    let service = test_service();

    let err = service
        .handle_message(&signed_query("sig"), b"<xml><Encrypt>")
        .unwrap_err();
    assert!(matches!(err, RobotError::MalformedRequest(_)));

    let err = service
        .handle_message(&signed_query("sig"), &[0xff, 0xfe])
        .unwrap_err();
    assert!(matches!(err, RobotError::MalformedRequest(_)));

    let (body, _) = platform_post(&text_message_xml("alice", "bot", "hello"));
    let err = service
        .handle_message(&signed_query("wrong"), body.as_bytes())
        .unwrap_err();
    assert!(matches!(err, RobotError::Decrypt { status: -40001, .. }));

    let (body, signature) = platform_post("<xml><ToUserName>bot</ToUserName></xml>");
    let err = service
        .handle_message(&signed_query(&signature), body.as_bytes())
        .unwrap_err();
    assert!(matches!(err, RobotError::Parse(_)));

    let (body, signature) = platform_post(&text_message_xml("alice", "bot", "hello"));
    let err = encrypt_failing_service()
        .handle_message(&signed_query(&signature), body.as_bytes())
        .unwrap_err();
    assert!(matches!(err, RobotError::Encrypt { .. }));
}

#[test]
fn verify_url_returns_msg_or_raw_echo() {
    let crypt = test_crypt();
    let service = test_service();
    let signature = url_signature(TIMESTAMP, NONCE);

    let mut query = signed_query(&signature);
    query.echostr = Some(crypt.seal("<xml><Msg>8263451</Msg></xml>").unwrap());
    assert_eq!(service.verify_url(&query).unwrap(), "8263451");

    query.echostr = Some(crypt.seal("raw-echo-123").unwrap());
    assert_eq!(service.verify_url(&query).unwrap(), "raw-echo-123");

    query.echostr = Some(crypt.seal("<xml><Msg>  123 </Msg></xml>").unwrap());
    assert_eq!(service.verify_url(&query).unwrap(), "  123 ");
}

#[test]
fn verify_url_checks_signature_first() {
    let service = test_service();
    let mut query = signed_query("bad-signature");
    query.echostr = Some(test_crypt().seal("raw").unwrap());
    assert!(matches!(
        service.verify_url(&query).unwrap_err(),
        RobotError::SignatureInvalid
    ));

    query.echostr = Some("garbage".to_string());
    assert!(matches!(
        service.verify_url(&query).unwrap_err(),
        RobotError::SignatureInvalid
    ));

    let mut query = signed_query(&url_signature(TIMESTAMP, NONCE));
    query.echostr = Some("%%%".to_string());
    assert!(matches!(
        service.verify_url(&query).unwrap_err(),
        RobotError::Decrypt { status: -40010, .. }
    ));

    query.echostr = None;
    assert!(matches!(
        service.verify_url(&query).unwrap_err(),
        RobotError::MalformedRequest(_)
    ));
}
