//! Legacy RTM-shaped events.
//!
//! Consulted only after the Events API registry. `message` exists in both;
//! the RTM variant here is reached only when the Events API registry is
//! replaced by one that does not define it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HelloEvent {
    #[serde(rename = "type")]
    pub event_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoodbyeEvent {
    #[serde(rename = "type")]
    pub event_type: String,
}

/// RTM `message`: acknowledgements carry `reply_to`, no `channel_type`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RtmMessageEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub channel: String,
    pub user: String,
    pub text: String,
    pub ts: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    pub hidden: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserTypingEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub channel: String,
    pub user: String,
}

/// `presence_change`; batched updates list `users` instead of `user`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresenceChangeEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub user: String,
    pub users: Vec<String>,
    pub presence: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RtmChannel {
    pub id: String,
    pub name: String,
    pub created: i64,
    pub creator: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelJoinedEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub channel: RtmChannel,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RtmUser {
    pub id: String,
    pub name: String,
    pub real_name: String,
    pub is_bot: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamJoinEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub user: RtmUser,
}
