//! Test utilities & fixtures.
//! Provides a scripted [`GameHost`] and a roller with pinned draws.

#![allow(dead_code)] // Each test binary uses a different subset of these helpers.

use std::collections::{HashMap, HashSet, VecDeque};

use soulkeeper::host::{GameHost, GrantError, PlayerRef, PERMISSION_ADMIN};
use soulkeeper::souls::{RedemptionItem, SoulRoller};
use uuid::Uuid;

/// In-memory host that records every message and item it is asked to deliver.
#[derive(Default)]
pub struct MockHost {
    pub online: Vec<PlayerRef>,
    pub admins: HashSet<Uuid>,
    pub full_inventories: HashSet<Uuid>,
    /// Players whose grants fail even though a free slot was reported.
    pub failing_grants: HashSet<Uuid>,
    pub messages: Vec<(Uuid, String)>,
    pub console: Vec<String>,
    pub given: HashMap<Uuid, Vec<RedemptionItem>>,
}

impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bring a player online and return its handle.
    pub fn connect(&mut self, name: &str) -> PlayerRef {
        let player = PlayerRef::new(Uuid::new_v4(), name);
        self.online.push(player.clone());
        player
    }

    pub fn connect_admin(&mut self, name: &str) -> PlayerRef {
        let player = self.connect(name);
        self.admins.insert(player.id);
        player
    }

    pub fn messages_for(&self, player: &PlayerRef) -> Vec<String> {
        self.messages
            .iter()
            .filter(|(id, _)| *id == player.id)
            .map(|(_, text)| text.clone())
            .collect()
    }

    pub fn last_message_for(&self, player: &PlayerRef) -> Option<String> {
        self.messages_for(player).pop()
    }

    pub fn items_for(&self, player: &PlayerRef) -> &[RedemptionItem] {
        self.given.get(&player.id).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl GameHost for MockHost {
    fn send_message(&mut self, player: &PlayerRef, text: &str) {
        self.messages.push((player.id, text.to_string()));
    }

    fn send_console(&mut self, text: &str) {
        self.console.push(text.to_string());
    }

    fn find_online_player(&self, name: &str) -> Option<PlayerRef> {
        self.online
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .cloned()
    }

    fn online_player_names(&self) -> Vec<String> {
        self.online.iter().map(|p| p.name.clone()).collect()
    }

    fn has_permission(&self, player: &PlayerRef, node: &str) -> bool {
        node == PERMISSION_ADMIN && self.admins.contains(&player.id)
    }

    fn has_free_slot(&self, player: &PlayerRef) -> bool {
        !self.full_inventories.contains(&player.id)
    }

    fn give_item(&mut self, player: &PlayerRef, item: RedemptionItem) -> Result<(), GrantError> {
        if self.full_inventories.contains(&player.id) {
            return Err(GrantError::InventoryFull);
        }
        if self.failing_grants.contains(&player.id) {
            return Err(GrantError::Offline);
        }
        self.given.entry(player.id).or_default().push(item);
        Ok(())
    }
}

/// Roller returning queued values in order; falls back to the low bound when empty.
#[derive(Default)]
pub struct FixedRoller {
    draws: VecDeque<i64>,
    pub calls: Vec<(i64, i64)>,
}

impl FixedRoller {
    pub fn new(draws: &[i64]) -> Self {
        Self {
            draws: draws.iter().copied().collect(),
            calls: Vec::new(),
        }
    }
}

impl SoulRoller for FixedRoller {
    fn roll(&mut self, low: i64, high: i64) -> i64 {
        self.calls.push((low, high));
        self.draws.pop_front().unwrap_or(low)
    }
}

pub fn args(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}
