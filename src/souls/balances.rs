//! One player's soul balances.
//!
//! Balances are stored in a fixed array indexed by [`Category`], so every category is
//! always present and starts at zero. No operation can drive a balance below zero.

use serde::{Deserialize, Serialize};

use super::category::Category;

/// Per-category balances owned by a single player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoulBalances {
    amounts: [i64; Category::COUNT],
}

impl SoulBalances {
    /// Zero-initialised balances for every category.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current balance for `category`.
    pub fn balance(&self, category: Category) -> i64 {
        self.amounts[category.index()]
    }

    /// Assign an absolute balance; negative values clamp to zero.
    pub fn set(&mut self, category: Category, amount: i64) {
        self.amounts[category.index()] = amount.max(0);
    }

    /// Add `amount` souls. Zero or negative amounts are ignored.
    pub fn credit(&mut self, category: Category, amount: i64) {
        if amount <= 0 {
            return;
        }
        let slot = &mut self.amounts[category.index()];
        *slot = slot.saturating_add(amount);
    }

    /// Remove `amount` souls, flooring at zero. Zero or negative amounts are ignored.
    pub fn debit(&mut self, category: Category, amount: i64) {
        if amount <= 0 {
            return;
        }
        let slot = &mut self.amounts[category.index()];
        *slot = slot.saturating_sub(amount).max(0);
    }

    /// True when `amount` is positive and fully covered by the current balance.
    pub fn can_redeem(&self, category: Category, amount: i64) -> bool {
        amount > 0 && self.balance(category) >= amount
    }

    /// Debit exactly `amount` if [`can_redeem`](Self::can_redeem) holds.
    ///
    /// Returns `false` and leaves the balance untouched otherwise; a redemption never
    /// partially debits.
    pub fn redeem(&mut self, category: Category, amount: i64) -> bool {
        if !self.can_redeem(category, amount) {
            return false;
        }
        self.debit(category, amount);
        true
    }

    /// `(category, balance)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, i64)> + '_ {
        Category::ALL.into_iter().map(move |c| (c, self.balance(c)))
    }

    /// Sum across all categories.
    pub fn total(&self) -> i64 {
        self.amounts.iter().fold(0i64, |acc, v| acc.saturating_add(*v))
    }
}
