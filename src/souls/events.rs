//! Gameplay event handlers: turn engine events into ledger credits and chat feedback.

use log::debug;

use super::reward::{
    category_for_block, crop_qualifies, monster_reward, player_kill_reward, reward_for_block,
    BlockKind, CropGrowth, MonsterKind, Reward, SoulRoller,
};
use super::store::LedgerStore;
use super::Category;
use crate::host::{GameHost, PlayerRef};

pub const SILK_TOUCH_REJECTION: &str = "[Souls] Souls cannot be gathered with a Silk Touch tool.";

/// A block broken by a player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockBreak {
    pub block: BlockKind,
    pub growth: CropGrowth,
    /// Tool in the main hand carries Silk Touch (or an equivalent "no drop change" enchant).
    pub silk_touch: bool,
}

impl BlockBreak {
    /// Non-crop block broken with an ordinary tool.
    pub fn plain(block: BlockKind) -> Self {
        Self {
            block,
            growth: CropGrowth::Unstaged,
            silk_touch: false,
        }
    }
}

pub fn gain_message(reward: &Reward) -> String {
    format!(
        "[Souls] You gained {} {} souls.",
        reward.amount, reward.category
    )
}

fn apply(store: &mut LedgerStore, host: &mut dyn GameHost, player: &PlayerRef, reward: Reward) {
    store
        .get_or_create(player.id)
        .credit(reward.category, reward.amount);
    debug!(
        "Credited {} {} souls to {}",
        reward.amount, reward.category, player
    );
    host.send_message(player, &gain_message(&reward));
}

/// Handle a block break. Returns the reward that was credited, if any.
pub fn on_block_break(
    store: &mut LedgerStore,
    host: &mut dyn GameHost,
    player: &PlayerRef,
    event: &BlockBreak,
) -> Option<Reward> {
    if event.silk_touch {
        host.send_message(player, SILK_TOUCH_REJECTION);
        return None;
    }

    let category = category_for_block(&event.block)?;
    if category == Category::Crops && !crop_qualifies(&event.block, event.growth) {
        return None;
    }

    let reward = Reward::new(category, reward_for_block(&event.block))?;
    apply(store, host, player, reward);
    Some(reward)
}

/// Handle a monster killed by `killer`.
pub fn on_monster_kill(
    store: &mut LedgerStore,
    host: &mut dyn GameHost,
    roller: &mut dyn SoulRoller,
    killer: &PlayerRef,
    monster: &MonsterKind,
) -> Option<Reward> {
    let reward = monster_reward(monster, roller)?;
    apply(store, host, killer, reward);
    Some(reward)
}

/// Handle one player killing another.
pub fn on_player_kill(
    store: &mut LedgerStore,
    host: &mut dyn GameHost,
    killer: &PlayerRef,
) -> Reward {
    let reward = player_kill_reward();
    apply(store, host, killer, reward);
    reward
}
