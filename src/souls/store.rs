//! In-memory soul ledger keyed by player UUID.
//!
//! The store is the only stateful piece of the crate. It is filled from a
//! [`SoulsDocument`] at startup, mutated by event handlers and commands, and written back
//! as a full snapshot by the autosave task and at shutdown.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::balances::SoulBalances;
use super::category::Category;
use super::errors::SoulsError;
use crate::logutil::escape_log;

/// Store handle shared between the event loop and the autosave task.
pub type SharedLedger = Arc<Mutex<LedgerStore>>;

/// Persisted layout: `players.<uuid>.<Category> = <balance>`.
///
/// Values are kept as raw JSON so one damaged record cannot fail the whole load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SoulsDocument {
    #[serde(default)]
    pub players: BTreeMap<String, Value>,
}

impl SoulsDocument {
    /// Read a single balance the way the loader does: absent or non-integer yields 0.
    pub fn balance_of(&self, player_key: &str, category: Category) -> i64 {
        self.players
            .get(player_key)
            .and_then(|record| record.get(category.label()))
            .and_then(Value::as_i64)
            .unwrap_or(0)
    }
}

/// Parse a persisted player key.
pub fn parse_player_id(key: &str) -> Result<Uuid, SoulsError> {
    Uuid::parse_str(key).map_err(|_| SoulsError::InvalidPlayerId(escape_log(key)))
}

/// Counts produced by [`LedgerStore::load_all`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped: usize,
}

/// Player id to balances mapping.
#[derive(Debug, Default)]
pub struct LedgerStore {
    players: HashMap<Uuid, SoulBalances>,
}

impl LedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a store for sharing with the autosave task.
    pub fn into_shared(self) -> SharedLedger {
        Arc::new(Mutex::new(self))
    }

    /// Balances for `player`, if any were ever recorded. Never creates an entry.
    pub fn get(&self, player: &Uuid) -> Option<&SoulBalances> {
        self.players.get(player)
    }

    /// Balances for `player`, inserting a zeroed entry first if needed.
    pub fn get_or_create(&mut self, player: Uuid) -> &mut SoulBalances {
        self.players.entry(player).or_default()
    }

    pub fn contains(&self, player: &Uuid) -> bool {
        self.players.contains_key(player)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Replace the in-memory state with the contents of `doc`.
    ///
    /// Keys that are not canonical UUIDs are skipped with a warning. Missing or
    /// non-integer category values load as 0 and negative values clamp to 0.
    pub fn load_all(&mut self, doc: &SoulsDocument) -> LoadReport {
        self.players.clear();
        let mut report = LoadReport::default();

        for key in doc.players.keys() {
            let id = match parse_player_id(key) {
                Ok(id) => id,
                Err(e) => {
                    warn!("Skipping record in souls data: {}", e);
                    report.skipped += 1;
                    continue;
                }
            };

            let mut souls = SoulBalances::new();
            for category in Category::ALL {
                souls.set(category, doc.balance_of(key, category));
            }
            self.players.insert(id, souls);
            report.loaded += 1;
        }

        info!("Loaded soul data for {} player(s)", report.loaded);
        report
    }

    /// Full snapshot of the current state; replaces whatever was persisted before.
    pub fn save_all(&self) -> SoulsDocument {
        let players = self
            .players
            .iter()
            .map(|(id, souls)| {
                let record: serde_json::Map<String, Value> = souls
                    .iter()
                    .map(|(category, amount)| (category.label().to_string(), Value::from(amount)))
                    .collect();
                (id.to_string(), Value::Object(record))
            })
            .collect();
        SoulsDocument { players }
    }

    /// Sum of every player's balance per category, in display order.
    pub fn category_totals(&self) -> [(Category, i64); Category::COUNT] {
        Category::ALL.map(|category| {
            let total = self
                .players
                .values()
                .fold(0i64, |acc, souls| acc.saturating_add(souls.balance(category)));
            (category, total)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn get_does_not_create() {
        let store = LedgerStore::new();
        assert!(store.get(&Uuid::new_v4()).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn get_or_create_returns_shared_entry() {
        let mut store = LedgerStore::new();
        let id = Uuid::new_v4();
        store.get_or_create(id).credit(Category::Crops, 3);
        store.get_or_create(id).credit(Category::Crops, 2);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&id).map(|s| s.balance(Category::Crops)), Some(5));
    }

    #[test]
    fn load_handles_non_object_and_non_integer_values() {
        let id = Uuid::new_v4();
        let other = Uuid::new_v4();
        let doc: SoulsDocument = serde_json::from_value(json!({
            "players": {
                id.to_string(): { "Minerals": "lots", "Crops": 4, "Hunting": -9 },
                other.to_string(): 17
            }
        }))
        .expect("doc");

        let mut store = LedgerStore::new();
        let report = store.load_all(&doc);
        assert_eq!(report, LoadReport { loaded: 2, skipped: 0 });
        let souls = store.get(&id).expect("entry");
        assert_eq!(souls.balance(Category::Minerals), 0);
        assert_eq!(souls.balance(Category::Crops), 4);
        assert_eq!(souls.balance(Category::Hunting), 0);
        assert_eq!(store.get(&other).map(SoulBalances::total), Some(0));
    }

    #[test]
    fn parse_player_id_rejects_garbage() {
        let id = Uuid::new_v4();
        assert_eq!(parse_player_id(&id.to_string()).ok(), Some(id));
        let err = parse_player_id("steve").unwrap_err();
        assert!(matches!(err, SoulsError::InvalidPlayerId(ref k) if k == "steve"));
    }

    #[test]
    fn load_clears_previous_state() {
        let mut store = LedgerStore::new();
        store.get_or_create(Uuid::new_v4()).credit(Category::Minerals, 1);
        store.load_all(&SoulsDocument::default());
        assert!(store.is_empty());
    }

    #[test]
    fn category_totals_sum_every_player() {
        let mut store = LedgerStore::new();
        store.get_or_create(Uuid::new_v4()).credit(Category::Hunting, 3);
        store.get_or_create(Uuid::new_v4()).credit(Category::Hunting, 4);
        let totals = store.category_totals();
        assert_eq!(totals[3], (Category::Hunting, 7));
        assert_eq!(totals[0], (Category::Minerals, 0));
    }
}
