mod common;

use serde_json::json;

use wecom_robot::config::Config;
use wecom_robot::error::RobotError;
use wecom_robot::services::callback::CallbackService;

use common::{CORP_ID, ENCODING_AES_KEY, TOKEN};

#[test]
fn config_from_file() {
    let tmp = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(
        tmp.path(),
        json!({
            "token": TOKEN,
            "encoding_aes_key": ENCODING_AES_KEY,
            "corp_id": CORP_ID
        })
        .to_string(),
    )
    .unwrap();
    let config = Config::from_file(tmp.path()).unwrap();
    assert_eq!(config.token, TOKEN);
    assert_eq!(config.corp_id, CORP_ID);
    CallbackService::from_config(&config).unwrap();
}

#[test]
fn config_errors() {
    let bad = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(bad.path(), "{bad}").unwrap();
    let err = Config::from_file(bad.path()).unwrap_err();
    assert!(matches!(err, RobotError::Config(_)));

    let err = Config::from_file("/nope/not-found.json").unwrap_err();
    assert!(matches!(err, RobotError::Config(_)));

    let short_key = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(
        short_key.path(),
        json!({"token": TOKEN, "encoding_aes_key": "abc", "corp_id": CORP_ID}).to_string(),
    )
    .unwrap();
    let err = Config::from_file(short_key.path()).unwrap_err();
    assert!(matches!(err, RobotError::Config(ref msg) if msg.contains("43")));

    let err = Config::new("", ENCODING_AES_KEY, CORP_ID).validate().unwrap_err();
    assert!(matches!(err, RobotError::Config(_)));
    let err = Config::new(TOKEN, ENCODING_AES_KEY, " ").validate().unwrap_err();
    assert!(matches!(err, RobotError::Config(_)));

    let err = CallbackService::from_config(&Config::new(TOKEN, "short", CORP_ID))
        .err()
        .unwrap();
    assert!(matches!(err, RobotError::Config(_)));
}
