use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Result, RobotError};

pub const ENCODING_AES_KEY_LEN: usize = 43;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub token: String,
    pub encoding_aes_key: String,
    pub corp_id: String,
}

impl Config {
    pub fn new(
        token: impl Into<String>,
        encoding_aes_key: impl Into<String>,
        corp_id: impl Into<String>,
    ) -> Self {
        Self {
            token: token.into(),
            encoding_aes_key: encoding_aes_key.into(),
            corp_id: corp_id.into(),
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| RobotError::Config(e.to_string()))?;
        let config: Config =
            serde_json::from_str(&content).map_err(|e| RobotError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.token.trim().is_empty() {
            return Err(RobotError::Config("token must not be empty".to_string()));
        }
        if self.corp_id.trim().is_empty() {
            return Err(RobotError::Config("corp_id must not be empty".to_string()));
        }
        if self.encoding_aes_key.len() != ENCODING_AES_KEY_LEN {
            return Err(RobotError::Config(format!(
                "encoding_aes_key must be {ENCODING_AES_KEY_LEN} characters, got {}",
                self.encoding_aes_key.len()
            )));
        }
        Ok(())
    }
}
