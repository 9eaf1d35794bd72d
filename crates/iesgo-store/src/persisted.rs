//! Per-key session snapshot.
//!
//! Each entity lives under its own key and is loaded independently: a key
//! that is missing, unreadable or holds malformed JSON comes back as `None`
//! without affecting the others.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;

use iesgo_shared::constants::{KEY_MATCHES, KEY_MESSAGES, KEY_SWIPES, KEY_THEME, KEY_USER};
use iesgo_shared::types::{Match, MatchId, Message, SwipeAction, Theme, User};

use crate::error::Result;
use crate::kv::KvStore;

/// Message threads keyed by match id.
pub type Threads = HashMap<MatchId, Vec<Message>>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistedState {
    pub user: Option<User>,
    pub matches: Option<Vec<Match>>,
    pub messages: Option<Threads>,
    pub swipes: Option<Vec<SwipeAction>>,
    pub theme: Option<Theme>,
}

impl PersistedState {
    /// Read every entry from `store`, tolerating per-key failures.
    pub fn load(store: &dyn KvStore) -> Self {
        let theme = read_raw(store, KEY_THEME).and_then(|raw| {
            let parsed = Theme::parse(&raw);
            if parsed.is_none() {
                tracing::warn!(key = KEY_THEME, value = %raw, "ignoring unknown theme");
            }
            parsed
        });

        let state = Self {
            user: read_json(store, KEY_USER),
            matches: read_json(store, KEY_MATCHES),
            messages: read_json(store, KEY_MESSAGES),
            swipes: read_json(store, KEY_SWIPES),
            theme,
        };

        tracing::debug!(
            user = state.user.is_some(),
            matches = state.matches.as_ref().map_or(0, Vec::len),
            threads = state.messages.as_ref().map_or(0, HashMap::len),
            swipes = state.swipes.as_ref().map_or(0, Vec::len),
            "restored persisted state"
        );

        state
    }

    /// Write every present entry to `store`, one key at a time.
    pub fn save(&self, store: &dyn KvStore) -> Result<()> {
        if let Some(ref user) = self.user {
            store.set(KEY_USER, &encode(user)?)?;
        }
        if let Some(ref matches) = self.matches {
            store.set(KEY_MATCHES, &encode(matches)?)?;
        }
        if let Some(ref messages) = self.messages {
            store.set(KEY_MESSAGES, &encode(messages)?)?;
        }
        if let Some(ref swipes) = self.swipes {
            store.set(KEY_SWIPES, &encode(swipes)?)?;
        }
        if let Some(theme) = self.theme {
            store.set(KEY_THEME, theme.as_str())?;
        }
        Ok(())
    }
}

/// JSON-encode a value for storage.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

fn read_raw(store: &dyn KvStore, key: &str) -> Option<String> {
    match store.get(key) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to read persisted entry");
            None
        }
    }
}

fn read_json<T: DeserializeOwned>(store: &dyn KvStore, key: &str) -> Option<T> {
    let raw = read_raw(store, key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "discarding malformed persisted entry");
            None
        }
    }
}
