//! Settlement notifications for the community owner.
use std::{future::Future, pin::Pin, sync::Arc, time::Duration};

use hugard_engine::events::{EventHooks, PaymentSettledEvent};
use log::*;
use reqwest::Client;
use serde_json::json;
use thiserror::Error;

use crate::member_directory::MemberDirectory;

#[derive(Debug, Clone, Error)]
pub enum NotifierError {
    #[error("Could not deliver notification. {0}")]
    DeliveryFailed(String),
}

/// Delivers a plain text message to the community owner.
pub trait Notifier {
    fn notify(&self, message: &str) -> impl Future<Output = Result<(), NotifierError>> + Send;
}

/// POSTs `{"recipient": owner, "content": message}` to a webhook. Without a webhook, messages are only logged.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: Client,
    url: Option<String>,
    recipient: String,
}

impl WebhookNotifier {
    pub fn new(url: Option<String>, recipient: &str, timeout: Duration) -> Result<Self, NotifierError> {
        let client =
            Client::builder().timeout(timeout).build().map_err(|e| NotifierError::DeliveryFailed(e.to_string()))?;
        Ok(Self { client, url, recipient: recipient.to_string() })
    }
}

impl Notifier for WebhookNotifier {
    async fn notify(&self, message: &str) -> Result<(), NotifierError> {
        let Some(url) = &self.url else {
            info!("📣️ {message}");
            return Ok(());
        };
        let body = json!({ "recipient": self.recipient, "content": message });
        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| NotifierError::DeliveryFailed(e.to_string()))?;
        if response.status().is_success() {
            debug!("📣️ Notification delivered to {}", self.recipient);
            Ok(())
        } else {
            Err(NotifierError::DeliveryFailed(format!("Webhook responded with {}", response.status())))
        }
    }
}

pub fn settlement_message(payer_name: &str, event: &PaymentSettledEvent) -> String {
    format!("{payer_name} just paid you {}!", event.record.amount)
}

/// Registers a settlement hook that tells the owner who paid and how much.
pub fn register_settlement_notifier<N>(hooks: &mut EventHooks, notifier: N, directory: MemberDirectory)
where N: Notifier + Send + Sync + 'static {
    let notifier = Arc::new(notifier);
    hooks.on_payment_settled(move |ev| {
        let notifier = Arc::clone(&notifier);
        let directory = directory.clone();
        Box::pin(async move {
            let name = directory.display_name(&ev.record.payer_id).await;
            let message = settlement_message(&name, &ev);
            if let Err(e) = notifier.notify(&message).await {
                warn!("📣️ Could not tell the owner that {} settled. {e}", ev.record.invoice_ref);
            }
        }) as Pin<Box<dyn Future<Output = ()> + Send>>
    });
}
