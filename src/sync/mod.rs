// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Debounced two-way binding between an editable JSON text buffer and one host key.
//!
//! The buffer is the single editing surface; the host store stays authoritative. Edits are
//! parsed and written back only after the buffer has been stable for the debounce window,
//! and only while the binding is active. Pulling from the store refuses to clobber the
//! buffer with an echo of what the binding itself just applied.
//!
//! The debounce clock is passed in by the caller, so the event loop drives time and tests
//! use a manual clock.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::Value;

use crate::host::{ContextUpdate, HostStore};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(400);

#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Whether edits are being applied at all. While inactive the binding neither pulls
    /// on value changes nor schedules write-backs.
    pub active: bool,
    pub debounce: Duration,
    /// Pull the current host value into the buffer when the binding (re)activates.
    pub auto_sync_on_active: bool,
    /// When false, edits stay local; the host key is never written.
    pub apply_enabled: bool,
    /// Announcement name emitted after each successful write-back, if any.
    pub broadcast_event: Option<String>,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            active: false,
            debounce: DEFAULT_DEBOUNCE,
            auto_sync_on_active: true,
            apply_enabled: true,
            broadcast_event: None,
        }
    }
}

/// Binds a raw JSON text buffer to `store[key]`.
pub struct ContextSync {
    store: Arc<dyn HostStore>,
    key: String,
    options: SyncOptions,
    raw: String,
    is_valid: bool,
    last_applied: Option<String>,
    deadline: Option<Instant>,
}

impl ContextSync {
    pub fn new(store: Arc<dyn HostStore>, key: impl Into<String>, options: SyncOptions) -> Self {
        let mut sync = Self {
            store,
            key: key.into(),
            options,
            raw: String::new(),
            is_valid: true,
            last_applied: None,
            deadline: None,
        };
        if sync.options.active && sync.options.auto_sync_on_active && sync.has_source_value() {
            sync.refresh_from_source();
        }
        sync
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn is_active(&self) -> bool {
        self.options.active
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// A fresh snapshot of the bound host value.
    pub fn current_value(&self) -> Option<Value> {
        self.store.get(&self.key)
    }

    fn has_source_value(&self) -> bool {
        !matches!(self.store.get(&self.key), None | Some(Value::Null))
    }

    /// Replaces the buffer and restarts the debounce window while active.
    pub fn set_raw(&mut self, text: impl Into<String>, now: Instant) {
        self.raw = text.into();
        if self.options.active {
            self.deadline = Some(now + self.options.debounce);
        }
    }

    /// Serializes the current host value into the buffer.
    ///
    /// Skipped when the serialization equals the last text this binding applied, so a pull
    /// right after a write-back does not clobber in-flight edits with an echo. Values that
    /// do not serialize produce no change.
    pub fn refresh_from_source(&mut self) {
        let Some(value) = self.store.get(&self.key) else {
            return;
        };
        let Ok(text) = serde_json::to_string_pretty(&value) else {
            return;
        };
        if text.is_empty() || self.last_applied.as_deref() == Some(text.as_str()) {
            return;
        }
        self.raw = text.clone();
        self.last_applied = Some(text);
    }

    /// Activates or deactivates the binding.
    ///
    /// Deactivating suspends: any pending write-back is dropped, not flushed. Activating
    /// pulls the host value into the buffer when configured to.
    pub fn set_active(&mut self, active: bool) {
        if self.options.active == active {
            return;
        }
        self.options.active = active;
        if active {
            if self.options.auto_sync_on_active && self.has_source_value() {
                self.refresh_from_source();
            }
        } else {
            self.deadline = None;
        }
    }

    /// Called when the host value changed underneath the binding (e.g. another writer
    /// announced an update). Mirrors activation: pull only while active and configured.
    pub fn handle_source_changed(&mut self) {
        if self.options.active && self.options.auto_sync_on_active && self.has_source_value() {
            self.refresh_from_source();
        }
    }

    /// Fires the debounced apply if the window has elapsed. Returns whether it fired.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.deadline.is_some_and(|deadline| now >= deadline) {
            self.deadline = None;
            self.apply_now();
            true
        } else {
            false
        }
    }

    /// Parses the buffer and writes the value to the host key, bypassing the debounce.
    ///
    /// No-op when applying is disabled or the buffer is blank. A parse failure only flips
    /// the validity flag; the host keeps its last good value.
    pub fn apply_now(&mut self) {
        if !self.options.apply_enabled {
            return;
        }
        if self.raw.trim().is_empty() {
            return;
        }
        match serde_json::from_str::<Value>(&self.raw) {
            Ok(value) => {
                self.store.set(&self.key, value.clone());
                self.is_valid = true;
                self.last_applied = Some(self.raw.clone());
                if let Some(event) = self.options.broadcast_event.clone() {
                    self.store.announce(ContextUpdate {
                        event,
                        key: self.key.clone(),
                        value,
                    });
                }
            }
            Err(_) => {
                self.is_valid = false;
            }
        }
    }
}
