//! The item handed out when a player redeems souls.

use serde::{Deserialize, Serialize};

use super::category::Category;

/// Engine material used for every redemption item.
pub const REDEMPTION_MATERIAL: &str = "nether_star";

/// A redeemed soul condensate. The display name and lore carry the category and amount
/// so the item can be identified in-game; the typed fields carry the same data for hosts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedemptionItem {
    pub material: String,
    pub display_name: String,
    pub lore: Vec<String>,
    pub category: Category,
    pub amount: i64,
}

impl RedemptionItem {
    pub fn new(category: Category, amount: i64) -> Self {
        Self {
            material: REDEMPTION_MATERIAL.to_string(),
            display_name: format!("Adept's {} Soul Condensate", category),
            lore: vec![
                format!("Value: {} {} souls", amount, category),
                "It seems to hold a special power.".to_string(),
            ],
            category,
            amount,
        }
    }
}
