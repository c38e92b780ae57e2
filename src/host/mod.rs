//! Boundary between the soul ledger and the game engine hosting it.
//!
//! Everything the ledger needs from the engine goes through [`GameHost`]: sending chat
//! lines, resolving online players, permission checks and handing out redemption items.
//! The crate ships [`console::ConsoleHost`], a stdin-driven stand-in used by the binary.

pub mod console;

use std::fmt;

use uuid::Uuid;

use crate::souls::RedemptionItem;

/// Permission node gating the admin subcommands.
pub const PERMISSION_ADMIN: &str = "soulkeeper.admin";

/// A connected player as seen by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlayerRef {
    pub id: Uuid,
    pub name: String,
}

impl PlayerRef {
    pub fn new(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl fmt::Display for PlayerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// Who issued a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandSender {
    Player(PlayerRef),
    /// Server console or another non-player source.
    Console,
}

/// Why the host refused to hand over an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrantError {
    /// No free inventory slot.
    InventoryFull,
    /// Player disconnected between validation and grant.
    Offline,
}

/// Engine services the ledger calls into.
///
/// Implementations are driven from a single dispatch thread; methods take `&mut self`
/// where the host's state changes.
pub trait GameHost {
    /// Deliver one chat line to `player`.
    fn send_message(&mut self, player: &PlayerRef, text: &str);

    /// Deliver one line to the console sender.
    fn send_console(&mut self, text: &str);

    /// Resolve an exact (case-insensitive) name among currently connected players.
    fn find_online_player(&self, name: &str) -> Option<PlayerRef>;

    /// Names of everyone currently connected.
    fn online_player_names(&self) -> Vec<String>;

    fn has_permission(&self, player: &PlayerRef, node: &str) -> bool;

    /// True when `player` has room for one more item.
    fn has_free_slot(&self, player: &PlayerRef) -> bool;

    /// Put `item` into `player`'s inventory.
    fn give_item(&mut self, player: &PlayerRef, item: RedemptionItem) -> Result<(), GrantError>;
}
