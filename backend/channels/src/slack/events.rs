//! Events API inner event payloads.
//!
//! These are the shapes seeded into [`EventRegistry::events_api`](super::EventRegistry::events_api).
//! Only commonly used fields are modelled; unknown fields are ignored.

use serde::{Deserialize, Serialize};

/// `app_mention`: the app was mentioned in a channel it belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppMentionEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub user: String,
    pub text: String,
    pub ts: String,
    pub channel: String,
    pub event_ts: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_ts: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bot_id: Option<String>,
}

/// `message` as delivered by the Events API (carries `channel_type`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub user: String,
    pub text: String,
    pub ts: String,
    pub channel: String,
    pub channel_type: String,
    pub event_ts: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_ts: Option<String>,
    /// Set for edits, deletions, bot messages, joins and similar.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bot_id: Option<String>,
}

impl MessageEvent {
    /// A plain user-authored message (no subtype, not from a bot).
    pub fn is_user_message(&self) -> bool {
        self.subtype.is_none() && self.bot_id.is_none()
    }
}

/// The item a reaction was attached to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReactionItem {
    #[serde(rename = "type")]
    pub item_type: String,
    pub channel: String,
    pub ts: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReactionAddedEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub user: String,
    pub reaction: String,
    pub item_user: String,
    pub item: ReactionItem,
    pub event_ts: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReactionRemovedEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub user: String,
    pub reaction: String,
    pub item_user: String,
    pub item: ReactionItem,
    pub event_ts: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemberJoinedChannelEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub user: String,
    pub channel: String,
    pub channel_type: String,
    pub team: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inviter: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemberLeftChannelEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub user: String,
    pub channel: String,
    pub channel_type: String,
    pub team: String,
}

/// Channel summary carried by `channel_created` and `channel_rename`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelInfo {
    pub id: String,
    pub name: String,
    pub created: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelCreatedEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub channel: ChannelInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelRenameEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub channel: ChannelInfo,
}

/// `app_home_opened`: a user opened the app's Home or Messages tab.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppHomeOpenedEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub user: String,
    pub channel: String,
    pub tab: String,
    pub event_ts: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SharedLink {
    pub domain: String,
    pub url: String,
}

/// `link_shared`: a message contained a URL on one of the app's domains.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkSharedEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub user: String,
    pub channel: String,
    pub message_ts: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_ts: Option<String>,
    pub links: Vec<SharedLink>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppUninstalledEvent {
    #[serde(rename = "type")]
    pub event_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevokedTokens {
    pub oauth: Vec<String>,
    pub bot: Vec<String>,
}

/// `tokens_revoked`: API tokens for this app were revoked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokensRevokedEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub tokens: RevokedTokens,
}
