//! Reward rules: which game events earn souls, in which category, and how many.
//!
//! Block rewards are fixed table lookups. Monster rewards are two-step: the monster's
//! type picks a strength level (often randomised within a tier), and the level picks the
//! payout. Randomness goes through [`SoulRoller`] so tests can pin the draws.

use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::category::Category;

/// Souls awarded for killing another player.
pub const PLAYER_KILL_REWARD: i64 = 100;

/// Level assumed for monsters missing from the strength table.
pub const DEFAULT_MONSTER_LEVEL: i64 = 2;

/// Souls granted for a single event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reward {
    pub category: Category,
    pub amount: i64,
}

impl Reward {
    /// Build a reward, or `None` when `amount` is not positive.
    pub fn new(category: Category, amount: i64) -> Option<Self> {
        (amount > 0).then_some(Self { category, amount })
    }
}

/// Source of uniformly distributed integers with inclusive bounds.
pub trait SoulRoller {
    fn roll(&mut self, low: i64, high: i64) -> i64;
}

/// Thread-local RNG; safe to use from any thread the host dispatches events on.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRoller;

impl SoulRoller for ThreadRoller {
    fn roll(&mut self, low: i64, high: i64) -> i64 {
        if high <= low {
            return low;
        }
        rand::thread_rng().gen_range(low..=high)
    }
}

/// Seeded RNG for reproducible replays.
#[derive(Debug, Clone)]
pub struct SeededRoller(StdRng);

impl SeededRoller {
    pub fn new(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl SoulRoller for SeededRoller {
    fn roll(&mut self, low: i64, high: i64) -> i64 {
        if high <= low {
            return low;
        }
        self.0.gen_range(low..=high)
    }
}

macro_rules! named_kinds {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)+
            /// Anything the reward tables do not know about.
            Other(String),
        }

        impl $name {
            /// Snake-case identifier as used by the host engine.
            pub fn name(&self) -> &str {
                match self {
                    $($name::$variant => $text,)+
                    $name::Other(raw) => raw.as_str(),
                }
            }
        }

        impl FromStr for $name {
            type Err = std::convert::Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let key = s.trim().to_ascii_lowercase();
                let key = key.strip_prefix("minecraft:").unwrap_or(&key);
                Ok(match key {
                    $($text => $name::$variant,)+
                    other => $name::Other(other.to_string()),
                })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

named_kinds! {
    /// Block types that can appear in a block-break event.
    BlockKind {
        CoalOre => "coal_ore",
        DeepslateCoalOre => "deepslate_coal_ore",
        IronOre => "iron_ore",
        DeepslateIronOre => "deepslate_iron_ore",
        CopperOre => "copper_ore",
        DeepslateCopperOre => "deepslate_copper_ore",
        GoldOre => "gold_ore",
        DeepslateGoldOre => "deepslate_gold_ore",
        DiamondOre => "diamond_ore",
        DeepslateDiamondOre => "deepslate_diamond_ore",
        LapisOre => "lapis_ore",
        DeepslateLapisOre => "deepslate_lapis_ore",
        RedstoneOre => "redstone_ore",
        DeepslateRedstoneOre => "deepslate_redstone_ore",
        EmeraldOre => "emerald_ore",
        DeepslateEmeraldOre => "deepslate_emerald_ore",
        AncientDebris => "ancient_debris",
        Wheat => "wheat",
        Carrots => "carrots",
        Potatoes => "potatoes",
        Beetroots => "beetroots",
        Cocoa => "cocoa",
        Melon => "melon",
        Pumpkin => "pumpkin",
        NetherWart => "nether_wart",
    }
}

named_kinds! {
    /// Monster types that can appear in an entity-death event.
    MonsterKind {
        Zombie => "zombie",
        Skeleton => "skeleton",
        Creeper => "creeper",
        Spider => "spider",
        Drowned => "drowned",
        Husk => "husk",
        Silverfish => "silverfish",
        Slime => "slime",
        CaveSpider => "cave_spider",
        ZombieVillager => "zombie_villager",
        Enderman => "enderman",
        Stray => "stray",
        Witch => "witch",
        Pillager => "pillager",
        Vindicator => "vindicator",
        Blaze => "blaze",
        Ghast => "ghast",
        MagmaCube => "magma_cube",
        Phantom => "phantom",
        Piglin => "piglin",
        ZombifiedPiglin => "zombified_piglin",
        Hoglin => "hoglin",
        Zoglin => "zoglin",
        Endermite => "endermite",
        Shulker => "shulker",
        Vex => "vex",
        Guardian => "guardian",
        Bogged => "bogged",
        Breeze => "breeze",
        Ravager => "ravager",
        Evoker => "evoker",
        WitherSkeleton => "wither_skeleton",
        PiglinBrute => "piglin_brute",
        ElderGuardian => "elder_guardian",
        Warden => "warden",
        Wither => "wither",
        EnderDragon => "ender_dragon",
    }
}

/// Growth information the host reports for a broken crop block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CropGrowth {
    /// Block has growth stages; only `age == max_age` counts as ripe.
    Staged { age: u8, max_age: u8 },
    /// Block has no growth stages at all.
    Unstaged,
}

/// Category a broken block is rewarded under, if any.
pub fn category_for_block(block: &BlockKind) -> Option<Category> {
    use BlockKind::*;
    match block {
        CoalOre | DeepslateCoalOre | IronOre | DeepslateIronOre | GoldOre | DeepslateGoldOre
        | DiamondOre | DeepslateDiamondOre | EmeraldOre | DeepslateEmeraldOre | CopperOre
        | DeepslateCopperOre | LapisOre | DeepslateLapisOre | RedstoneOre
        | DeepslateRedstoneOre | AncientDebris => Some(Category::Minerals),
        Wheat | Carrots | Potatoes | Beetroots | Cocoa | Melon | Pumpkin | NetherWart => {
            Some(Category::Crops)
        }
        Other(_) => None,
    }
}

/// Souls paid for breaking `block`; 0 for unmapped blocks.
pub fn reward_for_block(block: &BlockKind) -> i64 {
    use BlockKind::*;
    match block {
        CoalOre | DeepslateCoalOre | IronOre | DeepslateIronOre | CopperOre
        | DeepslateCopperOre => 1,
        GoldOre | DeepslateGoldOre | DiamondOre | DeepslateDiamondOre | LapisOre
        | DeepslateLapisOre | RedstoneOre | DeepslateRedstoneOre => 2,
        EmeraldOre | DeepslateEmeraldOre => 4,
        AncientDebris => 5,
        Wheat | Carrots | Potatoes | Beetroots => 1,
        Cocoa | Melon | Pumpkin | NetherWart => 2,
        Other(_) => 0,
    }
}

/// Blocks filed under Crops that legitimately have no growth stages.
pub fn is_unstaged_crop(block: &BlockKind) -> bool {
    matches!(block, BlockKind::Melon | BlockKind::Pumpkin)
}

/// Whether a Crops block is ripe enough to pay out.
///
/// Staged crops must be at their final stage. Unstaged blocks only qualify when they are
/// melon or pumpkin; any other unstaged Crops block pays nothing.
pub fn crop_qualifies(block: &BlockKind, growth: CropGrowth) -> bool {
    match growth {
        CropGrowth::Staged { age, max_age } => age == max_age,
        CropGrowth::Unstaged => is_unstaged_crop(block),
    }
}

/// Combined block lookup, ignoring crop gating and tool checks.
pub fn block_reward(block: &BlockKind) -> Option<Reward> {
    category_for_block(block).and_then(|category| Reward::new(category, reward_for_block(block)))
}

/// Strength level for a monster type, drawn from its tier's range.
pub fn strength_level(monster: &MonsterKind, roller: &mut dyn SoulRoller) -> i64 {
    use MonsterKind::*;
    match monster {
        Zombie | Skeleton | Creeper | Spider | Drowned | Husk | Silverfish | Slime
        | CaveSpider | ZombieVillager => roller.roll(1, 3),
        Enderman | Stray | Witch | Pillager | Vindicator | Blaze | Ghast | MagmaCube
        | Phantom | Piglin | ZombifiedPiglin | Hoglin | Zoglin | Endermite | Shulker | Vex
        | Guardian | Bogged | Breeze => roller.roll(3, 5),
        Ravager | Evoker | WitherSkeleton | PiglinBrute | ElderGuardian => roller.roll(4, 6),
        Warden => roller.roll(7, 8),
        Wither | EnderDragon => roller.roll(300, 500),
        Other(_) => DEFAULT_MONSTER_LEVEL,
    }
}

/// Souls paid for killing a monster of the given level.
pub fn reward_for_level(level: i64, roller: &mut dyn SoulRoller) -> i64 {
    if level <= 3 {
        roller.roll(1, 3)
    } else if level <= 5 {
        roller.roll(3, 5)
    } else if level <= 6 {
        roller.roll(4, 6)
    } else if level <= 8 {
        50
    } else {
        roller.roll(300, 500)
    }
}

/// Hunting reward for a monster kill.
pub fn monster_reward(monster: &MonsterKind, roller: &mut dyn SoulRoller) -> Option<Reward> {
    let level = strength_level(monster, roller);
    Reward::new(Category::Hunting, reward_for_level(level, roller))
}

/// Assassination reward for a player kill.
pub fn player_kill_reward() -> Reward {
    Reward {
        category: Category::Assassination,
        amount: PLAYER_KILL_REWARD,
    }
}
