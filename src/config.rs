use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use url::Url;

use crate::error::{AppError, Result};

/// Terminal client for editing trips and following their budget
#[derive(Parser, Debug, Clone)]
#[command(name = "tripfund", version, about)]
pub struct Config {
    /// Base URL of the trip backend, e.g. https://api.example.com/api
    #[arg(long, env = "TRIPFUND_API_URL", default_value = "http://127.0.0.1:8080/api")]
    pub api_url: String,

    /// Bearer token for the signed-in user
    #[arg(long, env = "TRIPFUND_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Id of the signed-in user, sent as the trip owner on update
    #[arg(long, env = "TRIPFUND_OWNER_ID")]
    pub owner_id: String,

    /// Trip to open
    #[arg(long, env = "TRIPFUND_TRIP_ID")]
    pub trip_id: String,

    /// Per-request timeout in seconds
    #[arg(long, env = "TRIPFUND_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Where to write logs (the terminal is taken by the UI)
    #[arg(long, env = "TRIPFUND_LOG_FILE", default_value = "tripfund.log")]
    pub log_file: PathBuf,

    /// Also show network failures as toasts instead of only logging them
    #[arg(long, env = "TRIPFUND_TOAST_NETWORK_ERRORS")]
    pub toast_network_errors: bool,
}

impl Config {
    /// Load `.env`, then parse arguments with environment fallbacks
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        let config = Self::parse();
        config.base_url()?;
        Ok(config)
    }

    pub fn base_url(&self) -> Result<Url> {
        let mut url = Url::parse(&self.api_url)
            .map_err(|err| AppError::Config(format!("invalid TRIPFUND_API_URL: {err}")))?;
        if url.cannot_be_a_base() {
            return Err(AppError::Config(format!(
                "TRIPFUND_API_URL cannot be a base URL: {}",
                self.api_url
            )));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        let mut full = vec!["tripfund", "--token", "tok", "--owner-id", "u1", "--trip-id", "t1"];
        full.extend_from_slice(args);
        Config::try_parse_from(full).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = parse(&["--api-url", "http://localhost:9000/api"]);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.log_file, PathBuf::from("tripfund.log"));
        assert!(!config.toast_network_errors);
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let config = parse(&["--api-url", "http://localhost:9000/api"]);
        assert_eq!(
            config.base_url().unwrap().as_str(),
            "http://localhost:9000/api/"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let config = parse(&["--api-url", "not a url"]);
        assert!(matches!(config.base_url(), Err(AppError::Config(_))));
    }
}
