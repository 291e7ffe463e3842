use aes::Aes256;
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::Engine as _;
use cbc::cipher::block_padding::NoPadding;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand_core::{OsRng, RngCore};

use crate::config::Config;
use crate::interfaces::crypto::{CryptoError, CryptoResult, MsgCrypt};
use crate::xml::{cdata, escape_text};

pub mod codec;
pub mod signature;

use signature::{compute_signature, signatures_match};

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

const KEY_LEN: usize = 32;
const IV_LEN: usize = 16;
const AES_BLOCK_LEN: usize = 16;
const PAD_BLOCK_LEN: usize = 32;
const RANDOM_PREFIX_LEN: usize = 16;
const LENGTH_PREFIX_LEN: usize = 4;

// Platform keys are 43 characters whose last symbol may carry stray bits.
const KEY_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

/// The platform's message envelope: AES-256-CBC over a length-prefixed frame
/// that ends with the corp id, signed with SHA-1 over the sorted request
/// parameters.
#[derive(Clone)]
pub struct WxBizMsgCrypt {
    token: String,
    key: [u8; KEY_LEN],
    corp_id: String,
}

impl WxBizMsgCrypt {
    pub fn new(config: &Config) -> CryptoResult<Self> {
        let key = decode_aes_key(&config.encoding_aes_key)?;
        Ok(Self {
            token: config.token.clone(),
            key,
            corp_id: config.corp_id.clone(),
        })
    }

    /// Message signature over a ciphertext, as carried in `msg_signature`.
    pub fn sign(&self, timestamp: &str, nonce: &str, ciphertext: &str) -> String {
        compute_signature(&[&self.token, timestamp, nonce, ciphertext])
    }

    /// Encrypts `plaintext` into the bare base64 ciphertext.
    pub fn seal(&self, plaintext: &str) -> CryptoResult<String> {
        let mut random = [0u8; RANDOM_PREFIX_LEN];
        OsRng.fill_bytes(&mut random);

        let msg = plaintext.as_bytes();
        let msg_len = u32::try_from(msg.len())
            .map_err(|_| CryptoError::IllegalBuffer("message too long".to_string()))?;
        let mut frame = Vec::with_capacity(
            RANDOM_PREFIX_LEN + LENGTH_PREFIX_LEN + msg.len() + self.corp_id.len() + PAD_BLOCK_LEN,
        );
        frame.extend_from_slice(&random);
        frame.extend_from_slice(&msg_len.to_be_bytes());
        frame.extend_from_slice(msg);
        frame.extend_from_slice(self.corp_id.as_bytes());
        pkcs7_pad(&mut frame);

        let cipher = Aes256CbcEnc::new_from_slices(&self.key, self.iv())
            .map_err(|_| CryptoError::EncryptAes)?;
        let ciphertext = cipher.encrypt_padded_vec_mut::<NoPadding>(&frame);
        Ok(STANDARD.encode(ciphertext))
    }

    /// Decrypts a bare base64 ciphertext and checks the trailing corp id.
    pub fn open(&self, ciphertext: &str) -> CryptoResult<String> {
        let data = STANDARD
            .decode(ciphertext.trim())
            .map_err(|_| CryptoError::DecodeBase64)?;
        if data.is_empty() || data.len() % AES_BLOCK_LEN != 0 {
            return Err(CryptoError::DecryptAes);
        }
        let cipher = Aes256CbcDec::new_from_slices(&self.key, self.iv())
            .map_err(|_| CryptoError::DecryptAes)?;
        let mut frame = cipher
            .decrypt_padded_vec_mut::<NoPadding>(&data)
            .map_err(|_| CryptoError::DecryptAes)?;
        pkcs7_unpad(&mut frame)?;

        if frame.len() < RANDOM_PREFIX_LEN + LENGTH_PREFIX_LEN {
            return Err(CryptoError::IllegalBuffer("frame too short".to_string()));
        }
        let (len_bytes, rest) = frame[RANDOM_PREFIX_LEN..].split_at(LENGTH_PREFIX_LEN);
        let len_bytes = <[u8; LENGTH_PREFIX_LEN]>::try_from(len_bytes)
            .map_err(|_| CryptoError::IllegalBuffer("bad length prefix".to_string()))?;
        let msg_len = u32::from_be_bytes(len_bytes) as usize;
        if msg_len > rest.len() {
            return Err(CryptoError::IllegalBuffer(
                "declared length exceeds frame".to_string(),
            ));
        }
        let (msg, corp_id) = rest.split_at(msg_len);
        if corp_id != self.corp_id.as_bytes() {
            return Err(CryptoError::ValidateCorpId);
        }
        String::from_utf8(msg.to_vec()).map_err(|e| CryptoError::IllegalBuffer(e.to_string()))
    }

    fn iv(&self) -> &[u8] {
        &self.key[..IV_LEN]
    }
}

impl MsgCrypt for WxBizMsgCrypt {
    fn decrypt(
        &self,
        ciphertext: &str,
        signature: &str,
        timestamp: &str,
        nonce: &str,
    ) -> CryptoResult<String> {
        let expected = self.sign(timestamp, nonce, ciphertext);
        if !signatures_match(&expected, signature) {
            return Err(CryptoError::ValidateSignature);
        }
        self.open(ciphertext)
    }

    fn decrypt_echo(&self, ciphertext: &str) -> CryptoResult<String> {
        self.open(ciphertext)
    }

    fn encrypt(&self, plaintext: &str, nonce: &str, timestamp: &str) -> CryptoResult<String> {
        let ciphertext = self.seal(plaintext)?;
        let signature = self.sign(timestamp, nonce, &ciphertext);
        Ok(envelope_xml(&ciphertext, &signature, timestamp, nonce))
    }
}

pub fn decode_aes_key(encoding_aes_key: &str) -> CryptoResult<[u8; KEY_LEN]> {
    let bytes = KEY_ENGINE
        .decode(format!("{encoding_aes_key}="))
        .map_err(|_| CryptoError::IllegalAesKey)?;
    <[u8; KEY_LEN]>::try_from(bytes.as_slice()).map_err(|_| CryptoError::IllegalAesKey)
}

fn envelope_xml(ciphertext: &str, signature: &str, timestamp: &str, nonce: &str) -> String {
    format!(
        "<xml><Encrypt>{}</Encrypt><MsgSignature>{}</MsgSignature><TimeStamp>{}</TimeStamp><Nonce>{}</Nonce></xml>",
        cdata(ciphertext),
        cdata(signature),
        escape_text(timestamp),
        cdata(nonce),
    )
}

fn pkcs7_pad(buf: &mut Vec<u8>) {
    let pad = PAD_BLOCK_LEN - buf.len() % PAD_BLOCK_LEN;
    buf.resize(buf.len() + pad, pad as u8);
}

fn pkcs7_unpad(buf: &mut Vec<u8>) -> CryptoResult<()> {
    let pad = buf
        .last()
        .copied()
        .ok_or_else(|| CryptoError::IllegalBuffer("empty frame".to_string()))? as usize;
    if pad == 0 || pad > PAD_BLOCK_LEN || pad > buf.len() {
        return Err(CryptoError::IllegalBuffer("bad padding".to_string()));
    }
    buf.truncate(buf.len() - pad);
    Ok(())
}
