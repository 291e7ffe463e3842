#![allow(dead_code)]

use std::sync::Arc;

use wecom_robot::config::Config;
use wecom_robot::crypto::codec::EnvelopeCodec;
use wecom_robot::crypto::signature::SignatureVerifier;
use wecom_robot::crypto::WxBizMsgCrypt;
use wecom_robot::interfaces::crypto::{CryptoError, CryptoResult, MsgCrypt};
use wecom_robot::services::callback::CallbackService;
use wecom_robot::xml::XmlElement;

pub const TOKEN: &str = "test-token";
pub const ENCODING_AES_KEY: &str = "abcdefghijklmnopqrstuvwxyz0123456789ABCDEFG";
pub const CORP_ID: &str = "ww0000000000000001";
pub const TIMESTAMP: &str = "1700000000";
pub const NONCE: &str = "nonce-42";

pub fn test_config() -> Config {
    Config::new(TOKEN, ENCODING_AES_KEY, CORP_ID)
}

pub fn test_crypt() -> WxBizMsgCrypt {
    WxBizMsgCrypt::new(&test_config()).unwrap()
}

pub fn test_service() -> CallbackService {
    CallbackService::from_config(&test_config()).unwrap()
}

/// Signature over (token, timestamp, nonce) as checked on the verify-URL route.
pub fn url_signature(timestamp: &str, nonce: &str) -> String {
    SignatureVerifier::new(TOKEN).sign(timestamp, nonce)
}

pub fn text_message_xml(from: &str, to: &str, content: &str) -> String {
    format!(
        "<xml><ToUserName><![CDATA[{to}]]></ToUserName><FromUserName><![CDATA[{from}]]></FromUserName><CreateTime>1700000000</CreateTime><MsgType><![CDATA[text]]></MsgType><Content><![CDATA[{content}]]></Content><MsgId>1234567890</MsgId></xml>"
    )
}

/// What the platform would POST: an `Encrypt` body and its message signature.
pub fn platform_post(plaintext: &str) -> (String, String) {
    let crypt = test_crypt();
    let ciphertext = crypt.seal(plaintext).unwrap();
    let signature = crypt.sign(TIMESTAMP, NONCE, &ciphertext);
    let body = format!(
        "<xml><ToUserName><![CDATA[{CORP_ID}]]></ToUserName><Encrypt><![CDATA[{ciphertext}]]></Encrypt><AgentID><![CDATA[1000002]]></AgentID></xml>"
    );
    (body, signature)
}

/// Opens an outbound envelope the way the platform would.
pub fn open_reply(envelope_xml: &str) -> String {
    let envelope = XmlElement::parse(envelope_xml).unwrap();
    let field = |name: &str| envelope.child_text(name).unwrap().to_string();
    test_crypt()
        .decrypt(
            &field("Encrypt"),
            &field("MsgSignature"),
            &field("TimeStamp"),
            &field("Nonce"),
        )
        .unwrap()
}

/// Decrypts like the real primitive but refuses to encrypt.
pub struct EncryptFailingCrypt {
    pub inner: WxBizMsgCrypt,
}

impl MsgCrypt for EncryptFailingCrypt {
    fn decrypt(
        &self,
        ciphertext: &str,
        signature: &str,
        timestamp: &str,
        nonce: &str,
    ) -> CryptoResult<String> {
        self.inner.decrypt(ciphertext, signature, timestamp, nonce)
    }

    fn decrypt_echo(&self, ciphertext: &str) -> CryptoResult<String> {
        self.inner.decrypt_echo(ciphertext)
    }

    fn encrypt(&self, _plaintext: &str, _nonce: &str, _timestamp: &str) -> CryptoResult<String> {
        Err(CryptoError::EncryptAes)
    }
}

pub fn encrypt_failing_service() -> CallbackService {
    let codec = EnvelopeCodec::new(Arc::new(EncryptFailingCrypt {
        inner: test_crypt(),
    }));
    CallbackService::new(SignatureVerifier::new(TOKEN), codec)
}
