use std::sync::Arc;

use hugard_common::Cents;
use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
    Method,
    StatusCode,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    config::CoinbaseConfig,
    data_objects::{DataEnvelope, NewCharge},
    Charge,
    ChargeStatus,
    CoinbaseApiError,
};

/// A stateless client for the Coinbase Commerce charges API. Every call is independent, and bounded by the timeout in
/// [`CoinbaseConfig`].
#[derive(Clone)]
pub struct CoinbaseApi {
    config: CoinbaseConfig,
    client: Arc<Client>,
}

impl CoinbaseApi {
    pub fn new(config: CoinbaseConfig) -> Result<Self, CoinbaseApiError> {
        let mut headers = HeaderMap::with_capacity(2);
        let val = HeaderValue::from_str(config.api_key.reveal().as_str())
            .map_err(|e| CoinbaseApiError::Initialization(e.to_string()))?;
        headers.insert("X-CC-Api-Key", val);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| CoinbaseApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    /// Sends a REST request and deserializes the `data` envelope of the response. Only `expected` is treated as a
    /// success; any other status code results in a [`CoinbaseApiError::QueryError`].
    pub async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        expected: StatusCode,
        body: Option<B>,
    ) -> Result<T, CoinbaseApiError> {
        let url = self.url(path);
        trace!("Sending REST query: {method} {url}");
        let mut req = self.client.request(method, url);
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await.map_err(|e| CoinbaseApiError::RestRequestError(e.to_string()))?;
        let status = response.status();
        if status == expected {
            trace!("REST query successful. {status}");
            let envelope = response
                .json::<DataEnvelope<T>>()
                .await
                .map_err(|e| CoinbaseApiError::JsonError(e.to_string()))?;
            Ok(envelope.data)
        } else {
            let message = response.text().await.map_err(|e| CoinbaseApiError::RestResponseError(e.to_string()))?;
            Err(CoinbaseApiError::QueryError { status: status.as_u16(), message })
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.api_url)
    }

    /// The hosted payment page for the given charge. This is also the payload encoded in the QR code.
    pub fn payment_url(&self, charge_id: &str) -> String {
        format!("{}/{charge_id}", self.config.pay_url)
    }

    /// Creates a fixed-price USD charge. Coinbase responds with `201 Created` on success.
    pub async fn create_charge(&self, name: String, amount: Cents) -> Result<Charge, CoinbaseApiError> {
        let body = NewCharge::fixed_price(name, amount);
        debug!("Creating charge for {amount}");
        let charge =
            self.rest_query::<Charge, NewCharge>(Method::POST, "/charges/", StatusCode::CREATED, Some(body)).await?;
        info!("Created charge {} for {amount}", charge.id);
        Ok(charge)
    }

    pub async fn fetch_charge(&self, charge_id: &str) -> Result<Charge, CoinbaseApiError> {
        let path = format!("/charges/{charge_id}");
        trace!("Fetching charge {charge_id}");
        self.rest_query::<Charge, ()>(Method::GET, &path, StatusCode::OK, None).await
    }

    /// Fetches the charge and returns the latest status in its timeline.
    pub async fn charge_status(&self, charge_id: &str) -> Result<ChargeStatus, CoinbaseApiError> {
        let charge = self.fetch_charge(charge_id).await?;
        let status = charge.current_status()?;
        trace!("Charge {charge_id} is {status}");
        Ok(status)
    }
}
