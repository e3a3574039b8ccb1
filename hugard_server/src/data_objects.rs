use std::fmt::Display;

use hugard_common::sanitize_display_name;
use hugard_engine::RequestedAmount;
use serde::{Deserialize, Serialize};

/// The embed accent colour, `rgb(155, 50, 205)`.
pub const THEME_COLOUR: u32 = 0x9B32CD;

/// A community member, as described by the chat gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub can_view_audit_log: bool,
}

impl Member {
    /// The display name with markup and shell metacharacters removed. Use this whenever the name is echoed back.
    pub fn safe_name(&self) -> String {
        sanitize_display_name(&self.display_name)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PayRequest {
    pub member: Member,
    pub amount: RequestedAmount,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryRequest {
    pub member: Member,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsRequest {
    pub member: Member,
    /// When present, report on this member instead of the whole community
    #[serde(default)]
    pub target: Option<Member>,
    /// Used in the statistics title, if the gateway supplies it
    #[serde(default)]
    pub community_name: Option<String>,
}

/// Body of `/commands/ping` and `/commands/about`. Both carry nothing but the caller.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BasicCommand {
    #[serde(default)]
    pub member: Option<Member>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub image_url: Option<String>,
    pub colour: u32,
}

impl Embed {
    pub fn new<T: Display, D: Display>(title: T, description: D) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            url: None,
            image_url: None,
            colour: THEME_COLOUR,
        }
    }

    pub fn with_url<S: Into<String>>(mut self, url: S) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_image<S: Into<String>>(mut self, image_url: S) -> Self {
        self.image_url = Some(image_url.into());
        self
    }
}

/// The reply that the gateway relays to the chat platform. Ephemeral replies are only shown to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResponse {
    pub ephemeral: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub embed: Option<Embed>,
}

impl CommandResponse {
    pub fn message<S: Display>(message: S, ephemeral: bool) -> Self {
        Self { ephemeral, message: Some(message.to_string()), embed: None }
    }

    pub fn embed(embed: Embed, ephemeral: bool) -> Self {
        Self { ephemeral, message: None, embed: Some(embed) }
    }
}
