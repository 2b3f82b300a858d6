use anyhow::Result;
use chrono::{DateTime, Utc};
use serde_json::Value;
use shared::domain::BasketEntry;
use storage::Storage;
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::warn;

/// Fixed storage key the basket payload lives under.
pub const BASKET_KEY: &str = "basket";

const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// Stored payload at the basket key is not valid JSON. `load` converts this
/// into a warning plus an empty basket; it never reaches callers.
#[derive(Debug, Error)]
#[error("stored basket payload is not valid JSON: {source}")]
pub struct BasketDecodeError {
    #[source]
    source: serde_json::Error,
}

/// Snapshot published after every successful mutation. `saved_at` is `None`
/// when the mutation removed the stored row (a cleared basket).
#[derive(Debug, Clone)]
pub struct BasketChanged {
    pub entries: Vec<BasketEntry>,
    pub saved_at: Option<DateTime<Utc>>,
}

pub fn decode_stored_basket(raw: &str) -> Result<Value, BasketDecodeError> {
    serde_json::from_str(raw).map_err(|source| BasketDecodeError { source })
}

/// Convert an arbitrary decoded JSON value into a valid basket.
///
/// Two persisted shapes are accepted: a plain list of product-id strings
/// (legacy payloads; repeats collapse into quantities, first-seen order kept)
/// and a list of `{product, quantity}` objects. Anything else degrades to an
/// empty basket or drops per element. Malformed input is never an error, even
/// when every element drops.
pub fn normalize_basket_entries(raw: &Value) -> Vec<BasketEntry> {
    let Some(items) = raw.as_array() else {
        return Vec::new();
    };
    if items.is_empty() {
        return Vec::new();
    }

    if items.iter().all(Value::is_string) {
        let mut entries: Vec<BasketEntry> = Vec::new();
        for product in items.iter().filter_map(Value::as_str) {
            match entries.iter_mut().find(|entry| entry.product == product) {
                Some(entry) => entry.quantity += 1,
                None => entries.push(BasketEntry::new(product, 1)),
            }
        }
        return entries;
    }

    // Mixed payloads land here too; non-object elements drop individually.
    items
        .iter()
        .filter_map(|item| {
            let product = item.get("product")?.as_str()?;
            let quantity = item.get("quantity")?.as_f64()?;
            if !quantity.is_finite() || quantity <= 0.0 {
                return None;
            }
            Some(BasketEntry::new(product, quantity.floor() as u32))
        })
        .collect()
}

/// Single source of truth for reading, validating, and persisting the basket.
/// All storage access goes through here; renderers subscribe to the change
/// channel instead of polling.
pub struct BasketManager {
    storage: Storage,
    changes: broadcast::Sender<BasketChanged>,
}

impl BasketManager {
    pub fn new(storage: Storage) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self { storage, changes }
    }

    pub fn subscribe_changes(&self) -> broadcast::Receiver<BasketChanged> {
        self.changes.subscribe()
    }

    /// Reads and normalizes the persisted basket. An absent key is an empty
    /// basket; an undecodable payload is logged once and treated as empty.
    pub async fn load(&self) -> Result<Vec<BasketEntry>> {
        let Some(stored) = self.storage.read_value(BASKET_KEY).await? else {
            return Ok(Vec::new());
        };

        match decode_stored_basket(&stored.value) {
            Ok(raw) => Ok(normalize_basket_entries(&raw)),
            Err(err) => {
                warn!("discarding stored basket: {err}");
                Ok(Vec::new())
            }
        }
    }

    /// Instant of the last persisted write, if the key is present.
    pub async fn last_saved(&self) -> Result<Option<DateTime<Utc>>> {
        Ok(self
            .storage
            .read_value(BASKET_KEY)
            .await?
            .map(|stored| stored.updated_at))
    }

    /// Serializes `entries` in object form and replaces the stored payload.
    pub async fn save(&self, entries: &[BasketEntry]) -> Result<DateTime<Utc>> {
        let payload = serde_json::to_string(entries)?;
        self.storage.write_value(BASKET_KEY, &payload).await
    }

    /// Adds one unit of `product`, incrementing an existing entry or
    /// appending a fresh one, then persists and publishes the new snapshot.
    pub async fn add(&self, product: &str) -> Result<Vec<BasketEntry>> {
        let mut entries = self.load().await?;
        match entries.iter_mut().find(|entry| entry.product == product) {
            Some(entry) => entry.quantity += 1,
            None => entries.push(BasketEntry::new(product, 1)),
        }

        let saved_at = self.save(&entries).await?;
        self.publish_changed(entries.clone(), Some(saved_at));
        Ok(entries)
    }

    /// Removes the stored row entirely (key absent afterwards) and publishes
    /// an empty snapshot.
    pub async fn clear(&self) -> Result<()> {
        self.storage.remove_value(BASKET_KEY).await?;
        self.publish_changed(Vec::new(), None);
        Ok(())
    }

    fn publish_changed(&self, entries: Vec<BasketEntry>, saved_at: Option<DateTime<Utc>>) {
        // No subscribers is fine; send only fails when nobody listens.
        let _ = self.changes.send(BasketChanged { entries, saved_at });
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
