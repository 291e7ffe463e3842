use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use wecom_robot::config::Config;
use wecom_robot::daemon;
use wecom_robot::error::{Result, RobotError};

#[derive(Parser, Debug)]
#[command(name = "wecom-robotd")]
#[command(about = "WeCom robot callback server")]
struct Cli {
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    #[arg(long, default_value_t = 8000)]
    port: u16,

    /// JSON file with token, encoding_aes_key and corp_id; overrides the flags below.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, env = "WECOM_TOKEN")]
    token: Option<String>,

    #[arg(long, env = "WECOM_ENCODING_AES_KEY")]
    encoding_aes_key: Option<String>,

    #[arg(long, env = "WECOM_CORP_ID")]
    corp_id: Option<String>,
}

impl Cli {
    fn load_config(&self) -> Result<Config> {
        if let Some(path) = &self.config {
            return Config::from_file(path);
        }
        let field = |value: &Option<String>, name: &str| {
            value
                .clone()
                .ok_or_else(|| RobotError::Config(format!("missing --{name}")))
        };
        let config = Config::new(
            field(&self.token, "token")?,
            field(&self.encoding_aes_key, "encoding-aes-key")?,
            field(&self.corp_id, "corp-id")?,
        );
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,wecom_robot=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    let cli = Cli::parse();
    let config = cli.load_config()?;

    daemon::run_with_shutdown(&cli.host, cli.port, &config, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}
