// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Host-owned context store.
//!
//! The panel never owns the context it inspects. It attaches to a store the embedding
//! application created, reads and conditionally writes exactly one key on it, and announces
//! successful write-backs over a broadcast channel so host code can react.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tokio::sync::broadcast;

const UPDATE_CHANNEL_CAPACITY: usize = 32;

/// Payload announced after a successful write-back.
///
/// Consumers should treat `value` as informational and re-read the store for the
/// authoritative current value (see [`ContextSubscription::current`]).
#[derive(Debug, Clone)]
pub struct ContextUpdate {
    pub event: String,
    pub key: String,
    pub value: Value,
}

/// Key-value store owned by the host application.
///
/// Implementations use interior mutability so one store can be shared behind an `Arc`
/// between the host, the panel, and any number of subscribers. `get` returns a cloned
/// snapshot taken under the lock; callers never observe a partially written value.
pub trait HostStore: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&self, key: &str, value: Value);
    fn announce(&self, update: ContextUpdate);
    fn updates(&self) -> broadcast::Receiver<ContextUpdate>;
}

/// In-process [`HostStore`] used by the CLI and by tests.
#[derive(Debug)]
pub struct MemoryHost {
    entries: Mutex<BTreeMap<String, Value>>,
    updates: broadcast::Sender<ContextUpdate>,
}

impl MemoryHost {
    pub fn new() -> Self {
        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        Self {
            entries: Mutex::new(BTreeMap::new()),
            updates,
        }
    }

    pub fn with_entry(key: impl Into<String>, value: Value) -> Self {
        let host = Self::new();
        host.set(&key.into(), value);
        host
    }
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HostStore for MemoryHost {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.lock().expect("host entries lock poisoned").get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) {
        self.entries.lock().expect("host entries lock poisoned").insert(key.to_owned(), value);
    }

    fn announce(&self, update: ContextUpdate) {
        // No receivers is fine; announcements are fire-and-forget.
        let _ = self.updates.send(update);
    }

    fn updates(&self) -> broadcast::Receiver<ContextUpdate> {
        self.updates.subscribe()
    }
}

/// Whether a live context existed at the moment the panel attached.
///
/// Captured exactly once per session. Later writes, including writes performed through the
/// panel itself, never turn a preview session into a connected one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connected,
    Preview,
}

impl ConnectionState {
    pub fn capture(store: &dyn HostStore, key: &str) -> Self {
        match store.get(key) {
            Some(Value::Null) | None => Self::Preview,
            Some(_) => Self::Connected,
        }
    }

    pub fn is_connected(self) -> bool {
        matches!(self, Self::Connected)
    }
}

/// Consumer-side handle: the current value of one context key, refreshed whenever the
/// panel announces a write-back.
pub struct ContextSubscription {
    store: Arc<dyn HostStore>,
    key: String,
    event: String,
    receiver: broadcast::Receiver<ContextUpdate>,
}

impl ContextSubscription {
    pub fn new(
        store: Arc<dyn HostStore>,
        key: impl Into<String>,
        event: impl Into<String>,
    ) -> Self {
        let receiver = store.updates();
        Self {
            store,
            key: key.into(),
            event: event.into(),
            receiver,
        }
    }

    /// Reads the value fresh from the store rather than trusting any announcement payload.
    pub fn current(&self) -> Option<Value> {
        self.store.get(&self.key)
    }

    /// Waits for the next matching announcement and returns the freshly re-read value.
    ///
    /// Returns `None` once the store side of the channel is gone.
    pub async fn changed(&mut self) -> Option<Value> {
        loop {
            match self.receiver.recv().await {
                Ok(update) if update.event == self.event && update.key == self.key => {
                    return self.current();
                }
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests;
