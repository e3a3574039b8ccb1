//! Server configuration
//!
//! Everything is read from environment variables once, at startup, into a single [`ServerConfig`]. Missing required
//! values stop the server before it binds to a port.
//!
//! | Variable                       | Required | Default                       |
//! |--------------------------------|----------|-------------------------------|
//! | `HUGARD_COINBASE_API_KEY`      | yes      |                               |
//! | `HUGARD_COMMUNITY_ID`          | yes      |                               |
//! | `HUGARD_OWNER_ID`              | yes      |                               |
//! | `HUGARD_GATEWAY_HMAC_SECRET`   | yes      |                               |
//! | `HUGARD_HOST`                  |          | `127.0.0.1`                   |
//! | `HUGARD_PORT`                  |          | `8370`                        |
//! | `HUGARD_DATABASE_URL`          |          | `sqlite://data/payments.db`   |
//! | `HUGARD_POLL_INTERVAL_SECS`    |          | `30`                          |
//! | `HUGARD_PROVIDER_TIMEOUT_SECS` |          | `10`                          |
//! | `HUGARD_QR_CODE_DIR`           |          | `data/qrcodes`                |
//! | `HUGARD_NOTIFY_WEBHOOK_URL`    |          | none (notifications are logged) |
//! | `HUGARD_HMAC_CHECKS`           |          | `true`                        |
//! | `HUGARD_COINBASE_API_URL`      |          | `https://api.commerce.coinbase.com` |
//! | `HUGARD_COINBASE_PAY_URL`      |          | `https://commerce.coinbase.com/pay` |
use std::{env, path::PathBuf, str::FromStr, time::Duration};

use coinbase_tools::CoinbaseConfig;
use hugard_common::{parse_boolean_flag, Secret};
use log::*;

use crate::errors::ServerError;

const DEFAULT_HUGARD_HOST: &str = "127.0.0.1";
const DEFAULT_HUGARD_PORT: u16 = 8370;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/payments.db";
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);
const DEFAULT_QR_CODE_DIR: &str = "data/qrcodes";

const REQUIRED_VARS: [&str; 4] =
    ["HUGARD_COINBASE_API_KEY", "HUGARD_COMMUNITY_ID", "HUGARD_OWNER_ID", "HUGARD_GATEWAY_HMAC_SECRET"];

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Commands are only accepted on behalf of this community
    pub community_id: String,
    /// The member that receives settlement notifications
    pub owner_id: String,
    /// Shared secret for signing command requests from the chat gateway
    pub hmac_secret: Secret<String>,
    /// If false, request signatures are not checked. **DANGER**
    pub hmac_checks: bool,
    /// Time between reconciliation cycles
    pub poll_interval: Duration,
    pub qr_code_dir: PathBuf,
    pub notify_webhook_url: Option<String>,
    pub coinbase: CoinbaseConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HUGARD_HOST.to_string(),
            port: DEFAULT_HUGARD_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            community_id: String::default(),
            owner_id: String::default(),
            hmac_secret: Secret::default(),
            hmac_checks: true,
            poll_interval: DEFAULT_POLL_INTERVAL,
            qr_code_dir: PathBuf::from(DEFAULT_QR_CODE_DIR),
            notify_webhook_url: None,
            coinbase: CoinbaseConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    /// Reads the configuration from the process environment.
    pub fn try_from_env() -> Result<Self, ServerError> {
        Self::try_from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from any variable source. Blank values count as unset.
    pub fn try_from_lookup<F>(lookup: F) -> Result<Self, ServerError>
    where F: Fn(&str) -> Option<String> {
        let var = |name: &str| lookup(name).map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        let missing = REQUIRED_VARS.iter().filter(|&&name| var(name).is_none()).copied().collect::<Vec<_>>();
        if !missing.is_empty() {
            return Err(ServerError::ConfigurationError(format!(
                "The following required environment variables are not set: {}",
                missing.join(", ")
            )));
        }
        let required = |name: &str| var(name).unwrap_or_default();
        let host = var("HUGARD_HOST").unwrap_or_else(|| DEFAULT_HUGARD_HOST.into());
        let port = parse_or_default("HUGARD_PORT", var("HUGARD_PORT"), DEFAULT_HUGARD_PORT);
        let database_url = var("HUGARD_DATABASE_URL").unwrap_or_else(|| {
            info!("🪛️ HUGARD_DATABASE_URL is not set. Using {DEFAULT_DATABASE_URL}");
            DEFAULT_DATABASE_URL.into()
        });
        let poll_interval = parse_or_default("HUGARD_POLL_INTERVAL_SECS", var("HUGARD_POLL_INTERVAL_SECS"), 0u64);
        let poll_interval = match poll_interval {
            0 => DEFAULT_POLL_INTERVAL,
            secs => Duration::from_secs(secs),
        };
        let coinbase = CoinbaseConfig::from_lookup(&lookup);
        let provider_timeout = coinbase.timeout;
        if provider_timeout >= poll_interval {
            warn!(
                "🪛️ The provider timeout ({provider_timeout:?}) is not shorter than the polling interval \
                 ({poll_interval:?}). Slow status checks will delay reconciliation cycles."
            );
        }
        let hmac_checks = parse_boolean_flag(var("HUGARD_HMAC_CHECKS"), true);
        if !hmac_checks {
            warn!("🚨️ HMAC checks are disabled. Anyone who can reach this server can issue commands.");
        }
        Ok(Self {
            host,
            port,
            database_url,
            community_id: required("HUGARD_COMMUNITY_ID"),
            owner_id: required("HUGARD_OWNER_ID"),
            hmac_secret: Secret::new(required("HUGARD_GATEWAY_HMAC_SECRET")),
            hmac_checks,
            poll_interval,
            qr_code_dir: var("HUGARD_QR_CODE_DIR").map(PathBuf::from).unwrap_or_else(|| DEFAULT_QR_CODE_DIR.into()),
            notify_webhook_url: var("HUGARD_NOTIFY_WEBHOOK_URL"),
            coinbase,
        })
    }
}

fn parse_or_default<T: FromStr + Copy + std::fmt::Display>(name: &str, value: Option<String>, default: T) -> T
where T::Err: std::fmt::Display {
    match value {
        None => default,
        Some(s) => s.parse::<T>().unwrap_or_else(|e| {
            error!("🪛️ {s} is not a valid value for {name}. {e} Using the default, {default}, instead.");
            default
        }),
    }
}
