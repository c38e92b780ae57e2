//! Soul ledger domain: categories, balances, the player store, reward rules, event
//! handlers and the `souls` command.
//!
//! The store is passed explicitly to event handlers and the command processor; nothing
//! in this module holds global state.

pub mod balances;
pub mod category;
pub mod commands;
pub mod errors;
pub mod events;
pub mod item;
pub mod reward;
pub mod store;

pub use balances::SoulBalances;
pub use category::Category;
pub use commands::{execute, tab_complete, AdminAction, CommandOutcome, Rejection, SoulsCommand};
pub use errors::SoulsError;
pub use events::{on_block_break, on_monster_kill, on_player_kill, BlockBreak};
pub use item::RedemptionItem;
pub use reward::{
    BlockKind, CropGrowth, MonsterKind, Reward, SeededRoller, SoulRoller, ThreadRoller,
    PLAYER_KILL_REWARD,
};
pub use store::{LedgerStore, LoadReport, SharedLedger, SoulsDocument};
