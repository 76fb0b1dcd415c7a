//! Unordered item pair used as the edge key.

use std::fmt;

use crate::data::ItemId;

/// Two distinct items stored in sorted order, so `(a, b)` and `(b, a)`
/// build the same key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemPair {
    low: ItemId,
    high: ItemId,
}

impl ItemPair {
    /// Returns `None` for a self-pair
    pub fn new(a: impl Into<ItemId>, b: impl Into<ItemId>) -> Option<Self> {
        let (a, b) = (a.into(), b.into());
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { low: a, high: b }),
            std::cmp::Ordering::Greater => Some(Self { low: b, high: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn low(&self) -> &str {
        &self.low
    }

    pub fn high(&self) -> &str {
        &self.high
    }

    pub fn contains(&self, item: &str) -> bool {
        self.low == item || self.high == item
    }
}

impl fmt::Display for ItemPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.low, self.high)
    }
}
