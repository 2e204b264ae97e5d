//! Event persistence on top of a key-value medium.
//!
//! Every event lives under its `event-<day>-<start>` key as a JSON object.
//! Keys outside the `event-` namespace are left alone.

use crate::error::{WeekGridError, WeekGridResult};
use crate::event::{EventKey, EventRecord};
use crate::kv::KeyValueStore;

/// A stored entry that could not be turned back into an `EventRecord`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    /// Raw medium key (not necessarily a well-formed `EventKey`)
    pub key: String,
    pub reason: String,
}

/// Result of scanning the medium for events.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub events: Vec<EventRecord>,
    pub failures: Vec<LoadFailure>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct EventStore<S: KeyValueStore> {
    medium: S,
}

impl<S: KeyValueStore> EventStore<S> {
    pub fn new(medium: S) -> Self {
        EventStore { medium }
    }

    pub fn medium(&self) -> &S {
        &self.medium
    }

    pub fn into_inner(self) -> S {
        self.medium
    }

    /// Write `event` under its derived key, replacing whatever occupied that
    /// (day, start) slot before.
    pub fn save(&mut self, event: &EventRecord) -> WeekGridResult<()> {
        let key = event.key();
        let value = serde_json::to_string(event)?;

        tracing::debug!(%key, "saving event");
        self.medium.set(key.as_str(), &value)
    }

    /// Remove the event stored at `key`. Missing keys are ignored.
    pub fn delete(&mut self, key: &EventKey) -> WeekGridResult<()> {
        tracing::debug!(%key, "deleting event");
        self.medium.delete(key.as_str())
    }

    pub fn get(&self, key: &EventKey) -> WeekGridResult<Option<EventRecord>> {
        let Some(value) = self.medium.get(key.as_str())? else {
            return Ok(None);
        };

        serde_json::from_str(&value)
            .map(Some)
            .map_err(|e| WeekGridError::Serialization(format!("{key}: {e}")))
    }

    pub fn contains(&self, key: &EventKey) -> WeekGridResult<bool> {
        Ok(self.medium.get(key.as_str())?.is_some())
    }

    /// Scan the whole medium for event entries.
    ///
    /// Entries that cannot be read or parsed, or whose record belongs under a
    /// different key, are collected in `LoadReport::failures` and the scan
    /// carries on. Only a failure to list the medium aborts it.
    pub fn load_all(&self) -> WeekGridResult<LoadReport> {
        let mut report = LoadReport::default();

        for key in self.medium.keys()? {
            if !EventKey::is_event_key(&key) {
                continue;
            }

            match self.read_entry(&key) {
                // Key vanished between listing and reading
                Ok(None) => {}
                Ok(Some(event)) => report.events.push(event),
                Err(reason) => {
                    tracing::warn!(%key, %reason, "skipping unreadable event entry");
                    report.failures.push(LoadFailure { key, reason });
                }
            }
        }

        Ok(report)
    }

    /// Read one listed entry, describing why it is unusable on failure.
    fn read_entry(&self, key: &str) -> Result<Option<EventRecord>, String> {
        let Some(value) = self.medium.get(key).map_err(|e| e.to_string())? else {
            return Ok(None);
        };

        let event: EventRecord = serde_json::from_str(&value).map_err(|e| e.to_string())?;

        // Deletion goes through the derived key, so a mismatched entry could
        // never be removed
        let derived = event.key();
        if derived.as_str() != key {
            return Err(format!("entry holds the event for {derived}"));
        }

        Ok(Some(event))
    }
}

// =============================================================================
// Tests
// =============================================================================
