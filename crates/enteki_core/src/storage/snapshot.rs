//! JSON codecs for the persisted `tools` and `records` documents.
//!
//! # Responsibility
//! - Encode the full equipment list and the full record tree.
//! - Decode stored documents, recovering from missing or corrupt data.
//!
//! # Invariants
//! - `records` is always written with both mode keys present.
//! - Decoding never fails: corrupt input yields the empty default and a
//!   `warn` log line with `status=fallback`.
//! - Date keys that are not strict `YYYY-MM-DD` dates are dropped on load.
//! - A stored stand whose selection breaks the cap or repeats a ref is
//!   repaired in place; its day and every other day are kept.

use super::{KeyValueStore, RECORDS_KEY, TOOLS_KEY};
use crate::model::equipment::{EquipmentItem, EquipmentRef};
use crate::model::record_key::{DateKey, Mode};
use crate::model::shot::Shot;
use crate::model::stand::Stand;
use crate::repo::equipment_repo::EquipmentRegistry;
use crate::repo::record_repo::RecordStore;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Outcome of reading one persisted document.
#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotLoad<T> {
    /// Document decoded successfully.
    Loaded(T),
    /// No document stored under the key.
    Missing,
    /// Document present but unreadable; carries the reason.
    Fallback(String),
}

impl<T: Default> SnapshotLoad<T> {
    /// Decoded value, or the empty default.
    pub fn into_value(self) -> T {
        match self {
            Self::Loaded(value) => value,
            Self::Missing | Self::Fallback(_) => T::default(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct RecordsDocument<S> {
    #[serde(default)]
    practice: BTreeMap<String, Vec<S>>,
    #[serde(default)]
    competition: BTreeMap<String, Vec<S>>,
}

impl<S> RecordsDocument<S> {
    fn mode_mut(&mut self, mode: Mode) -> &mut BTreeMap<String, Vec<S>> {
        match mode {
            Mode::Practice => &mut self.practice,
            Mode::Competition => &mut self.competition,
        }
    }
}

/// Stand as read from storage, before selection rules are applied.
#[derive(Debug, Default, Deserialize)]
struct StoredStand {
    #[serde(default)]
    shots: Vec<Shot>,
    #[serde(default, rename = "selectedTools")]
    selected_tools: Vec<EquipmentRef>,
}

impl StoredStand {
    fn into_stand(self, mode: Mode, date: &DateKey) -> Stand {
        let stored_count = self.selected_tools.len();
        let stand = Stand::from_parts_repaired(self.shots, self.selected_tools);
        if stand.selected_equipment().len() != stored_count {
            warn!(
                "event=records_load module=storage status=repair mode={mode} date={date} stored_selection={stored_count} kept_selection={}",
                stand.selected_equipment().len()
            );
        }
        stand
    }
}

/// Serializes the equipment list as a JSON array of `{name, type}`.
pub fn encode_tools(registry: &EquipmentRegistry) -> serde_json::Result<String> {
    serde_json::to_string(registry.items())
}

/// Serializes the record tree as `{practice: {...}, competition: {...}}`.
pub fn encode_records(records: &RecordStore) -> serde_json::Result<String> {
    let mut document = RecordsDocument::<Stand>::default();
    for (mode, date, stands) in records.days() {
        document
            .mode_mut(mode)
            .insert(date.as_str().to_string(), stands.to_vec());
    }
    serde_json::to_string(&document)
}

/// Decodes a `tools` document.
pub fn decode_tools(raw: &str) -> serde_json::Result<EquipmentRegistry> {
    let items: Vec<EquipmentItem> = serde_json::from_str(raw)?;
    Ok(EquipmentRegistry::from_items(items))
}

/// Decodes a `records` document, dropping entries with invalid date keys
/// and repairing stands with an invalid equipment selection.
pub fn decode_records(raw: &str) -> serde_json::Result<RecordStore> {
    let mut document: RecordsDocument<StoredStand> = serde_json::from_str(raw)?;
    let mut days = Vec::new();
    for mode in Mode::ALL {
        for (key, stored) in std::mem::take(document.mode_mut(mode)) {
            match DateKey::parse(&key) {
                Ok(date) => {
                    let stands = stored
                        .into_iter()
                        .map(|stand| stand.into_stand(mode, &date))
                        .collect::<Vec<_>>();
                    days.push((mode, date, stands));
                }
                Err(err) => warn!(
                    "event=records_load module=storage status=skip mode={mode} error={err}"
                ),
            }
        }
    }
    Ok(RecordStore::from_days(days))
}

/// Loads the equipment registry from `store`.
pub fn load_tools(store: &impl KeyValueStore) -> SnapshotLoad<EquipmentRegistry> {
    load_document(store, TOOLS_KEY, decode_tools)
}

/// Loads the record tree from `store`.
pub fn load_records(store: &impl KeyValueStore) -> SnapshotLoad<RecordStore> {
    load_document(store, RECORDS_KEY, decode_records)
}

fn load_document<T>(
    store: &impl KeyValueStore,
    key: &str,
    decode: impl FnOnce(&str) -> serde_json::Result<T>,
) -> SnapshotLoad<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!("event=snapshot_load module=storage status=missing key={key}");
            return SnapshotLoad::Missing;
        }
        Err(err) => {
            warn!(
                "event=snapshot_load module=storage status=fallback key={key} error_code=store_read_failed error={err}"
            );
            return SnapshotLoad::Fallback(err.to_string());
        }
    };

    match decode(&raw) {
        Ok(value) => {
            debug!(
                "event=snapshot_load module=storage status=ok key={key} bytes={}",
                raw.len()
            );
            SnapshotLoad::Loaded(value)
        }
        Err(err) => {
            warn!(
                "event=snapshot_load module=storage status=fallback key={key} error_code=persisted_state_corrupt error={err}"
            );
            SnapshotLoad::Fallback(err.to_string())
        }
    }
}
