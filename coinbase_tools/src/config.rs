use std::time::Duration;

use hugard_common::Secret;
use log::*;

pub(crate) const DEFAULT_API_URL: &str = "https://api.commerce.coinbase.com";
pub(crate) const DEFAULT_PAY_URL: &str = "https://commerce.coinbase.com/pay";
pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct CoinbaseConfig {
    /// Base URL of the Commerce REST API, without a trailing slash
    pub api_url: String,
    /// Base URL of the hosted payment pages, without a trailing slash
    pub pay_url: String,
    pub api_key: Secret<String>,
    /// Upper bound on every request made to Coinbase
    pub timeout: Duration,
}

impl Default for CoinbaseConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            pay_url: DEFAULT_PAY_URL.to_string(),
            api_key: Secret::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl CoinbaseConfig {
    pub fn new(api_key: Secret<String>) -> Self {
        Self { api_key, ..Default::default() }
    }

    /// Reads the Coinbase settings from any variable source, such as `std::env::var`. Unset, blank or unparseable
    /// values fall back to the defaults. The API key is left empty if it is missing; callers that require it should
    /// check for it first.
    pub fn from_lookup<F>(lookup: F) -> Self
    where F: Fn(&str) -> Option<String> {
        let var = |name: &str| lookup(name).map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        let api_url = var("HUGARD_COINBASE_API_URL").unwrap_or_else(|| {
            debug!("HUGARD_COINBASE_API_URL not set, using {DEFAULT_API_URL}");
            DEFAULT_API_URL.to_string()
        });
        let pay_url = var("HUGARD_COINBASE_PAY_URL").unwrap_or_else(|| {
            debug!("HUGARD_COINBASE_PAY_URL not set, using {DEFAULT_PAY_URL}");
            DEFAULT_PAY_URL.to_string()
        });
        let api_key = Secret::new(var("HUGARD_COINBASE_API_KEY").unwrap_or_else(|| {
            warn!("HUGARD_COINBASE_API_KEY not set. Every request to Coinbase will be rejected.");
            String::default()
        }));
        let timeout = var("HUGARD_PROVIDER_TIMEOUT_SECS")
            .and_then(|s| {
                s.parse::<u64>()
                    .map_err(|e| warn!("Invalid value for HUGARD_PROVIDER_TIMEOUT_SECS ({s}). {e}"))
                    .ok()
            })
            .filter(|&secs| secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            pay_url: pay_url.trim_end_matches('/').to_string(),
            api_key,
            timeout,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn lookup_defaults_and_overrides() {
        let config = CoinbaseConfig::from_lookup(|_| None);
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.pay_url, DEFAULT_PAY_URL);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert!(config.api_key.reveal().is_empty());

        let config = CoinbaseConfig::from_lookup(|name| match name {
            "HUGARD_COINBASE_API_URL" => Some("http://localhost:9999/".into()),
            "HUGARD_COINBASE_API_KEY" => Some(" cb-key ".into()),
            "HUGARD_PROVIDER_TIMEOUT_SECS" => Some("0".into()),
            _ => None,
        });
        assert_eq!(config.api_url, "http://localhost:9999");
        assert_eq!(config.api_key.reveal(), "cb-key");
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }
}
