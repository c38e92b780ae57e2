//! The closed set of soul categories.
//!
//! Every balance, reward and redemption is keyed by one of these four kinds. The set is
//! fixed at compile time; user-typed labels are resolved through [`Category::from_label`]
//! and anything outside the set is rejected at the command boundary.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Resource kind a soul balance is tracked under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    /// Earned by mining ores.
    Minerals,
    /// Earned by harvesting fully grown crops.
    Crops,
    /// Earned by killing other players.
    Assassination,
    /// Earned by killing hostile monsters.
    Hunting,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 4] = [
        Category::Minerals,
        Category::Crops,
        Category::Assassination,
        Category::Hunting,
    ];

    /// Number of categories; sizes the per-player balance array.
    pub const COUNT: usize = Self::ALL.len();

    /// Canonical label used in commands, messages and the persisted document.
    pub fn label(self) -> &'static str {
        match self {
            Category::Minerals => "Minerals",
            Category::Crops => "Crops",
            Category::Assassination => "Assassination",
            Category::Hunting => "Hunting",
        }
    }

    /// Resolve a user or document label (ASCII case-insensitive).
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(label.trim()))
    }

    /// Position of this category in [`Category::ALL`].
    pub(crate) fn index(self) -> usize {
        match self {
            Category::Minerals => 0,
            Category::Crops => 1,
            Category::Assassination => 2,
            Category::Hunting => 3,
        }
    }

    /// Comma separated list of labels for usage and error messages.
    pub fn label_list() -> String {
        Self::ALL
            .iter()
            .map(|c| c.label())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_resolve_case_insensitively() {
        assert_eq!(Category::from_label("minerals"), Some(Category::Minerals));
        assert_eq!(Category::from_label("CROPS"), Some(Category::Crops));
        assert_eq!(Category::from_label(" Hunting "), Some(Category::Hunting));
        assert_eq!(Category::from_label("Gold"), None);
        assert_eq!(Category::from_label(""), None);
    }

    #[test]
    fn index_matches_display_order() {
        for (i, category) in Category::ALL.iter().enumerate() {
            assert_eq!(category.index(), i);
        }
    }

    #[test]
    fn label_list_is_in_display_order() {
        assert_eq!(
            Category::label_list(),
            "Minerals, Crops, Assassination, Hunting"
        );
    }
}
