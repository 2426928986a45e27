//! Inner event registries: type tag -> decoder for a concrete payload shape.
//!
//! Registries are built once and shared read-only between request handlers.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use eventgate_core::EventPayload;
use serde::de::DeserializeOwned;
use serde_json::value::RawValue;

use super::{events, rtm};

/// Decodes a raw inner event into a freshly allocated payload.
pub type DecodeFn = fn(&RawValue) -> Result<Box<dyn EventPayload>, serde_json::Error>;

fn decode_into<T>(raw: &RawValue) -> Result<Box<dyn EventPayload>, serde_json::Error>
where
    T: EventPayload + DeserializeOwned,
{
    let payload: T = serde_json::from_str(raw.get())?;
    Ok(Box::new(payload))
}

/// A named mapping from inner event type tags to decoders.
#[derive(Clone)]
pub struct EventRegistry {
    name: &'static str,
    decoders: HashMap<String, DecodeFn>,
}

impl EventRegistry {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            decoders: HashMap::new(),
        }
    }

    /// Register `T` as the payload shape for `tag`, replacing any previous entry.
    pub fn register<T>(&mut self, tag: impl Into<String>) -> &mut Self
    where
        T: EventPayload + DeserializeOwned,
    {
        self.decoders.insert(tag.into(), decode_into::<T> as DecodeFn);
        self
    }

    /// Builder form of [`register`](Self::register).
    pub fn with<T>(mut self, tag: impl Into<String>) -> Self
    where
        T: EventPayload + DeserializeOwned,
    {
        self.register::<T>(tag);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn get(&self, tag: &str) -> Option<DecodeFn> {
        self.decoders.get(tag).copied()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.decoders.contains_key(tag)
    }

    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }

    /// Registered tags, sorted.
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.decoders.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    /// Events API inner events.
    pub fn events_api() -> Self {
        Self::new("events_api")
            .with::<events::AppMentionEvent>("app_mention")
            .with::<events::MessageEvent>("message")
            .with::<events::ReactionAddedEvent>("reaction_added")
            .with::<events::ReactionRemovedEvent>("reaction_removed")
            .with::<events::MemberJoinedChannelEvent>("member_joined_channel")
            .with::<events::MemberLeftChannelEvent>("member_left_channel")
            .with::<events::ChannelCreatedEvent>("channel_created")
            .with::<events::ChannelRenameEvent>("channel_rename")
            .with::<events::AppHomeOpenedEvent>("app_home_opened")
            .with::<events::LinkSharedEvent>("link_shared")
            .with::<events::AppUninstalledEvent>("app_uninstalled")
            .with::<events::TokensRevokedEvent>("tokens_revoked")
    }

    /// Legacy RTM-shaped events.
    pub fn legacy_rtm() -> Self {
        Self::new("legacy_rtm")
            .with::<rtm::HelloEvent>("hello")
            .with::<rtm::GoodbyeEvent>("goodbye")
            .with::<rtm::RtmMessageEvent>("message")
            .with::<rtm::UserTypingEvent>("user_typing")
            .with::<rtm::PresenceChangeEvent>("presence_change")
            .with::<rtm::ChannelJoinedEvent>("channel_joined")
            .with::<rtm::TeamJoinEvent>("team_join")
    }
}

impl fmt::Debug for EventRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventRegistry")
            .field("name", &self.name)
            .field("tags", &self.tags())
            .finish()
    }
}

/// The registries consulted for inner dispatch, in order.
///
/// The Events API registry always wins: both registries define `message`
/// and the two shapes differ.
#[derive(Debug, Clone)]
pub struct EventRegistries {
    events_api: EventRegistry,
    legacy_rtm: Option<EventRegistry>,
}

impl EventRegistries {
    pub fn new(events_api: EventRegistry, legacy_rtm: Option<EventRegistry>) -> Self {
        Self {
            events_api,
            legacy_rtm,
        }
    }

    /// Only the seeded Events API registry; RTM-shaped payloads become unknown.
    pub fn events_api_only() -> Self {
        Self::new(EventRegistry::events_api(), None)
    }

    pub fn events_api(&self) -> &EventRegistry {
        &self.events_api
    }

    pub fn legacy_rtm(&self) -> Option<&EventRegistry> {
        self.legacy_rtm.as_ref()
    }

    /// Find the decoder for `tag` and the name of the registry that supplied it.
    pub fn resolve(&self, tag: &str) -> Option<(&'static str, DecodeFn)> {
        std::iter::once(&self.events_api)
            .chain(self.legacy_rtm.as_ref())
            .find_map(|registry| registry.get(tag).map(|decode| (registry.name(), decode)))
    }
}

impl Default for EventRegistries {
    fn default() -> Self {
        Self::new(EventRegistry::events_api(), Some(EventRegistry::legacy_rtm()))
    }
}

static DEFAULT_REGISTRIES: LazyLock<Arc<EventRegistries>> =
    LazyLock::new(|| Arc::new(EventRegistries::default()));

/// Process-wide seeded registries (Events API, then legacy RTM).
pub fn default_registries() -> Arc<EventRegistries> {
    Arc::clone(&DEFAULT_REGISTRIES)
}
