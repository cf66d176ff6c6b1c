//! # Wishlist
//!
//! A deduplicated set of product ids with toggle semantics.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::types::ProductId;

/// Products the user has hearted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Wishlist {
    ids: BTreeSet<ProductId>,
}

impl Wishlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a wishlist from stored ids; duplicates collapse.
    pub fn from_ids(ids: impl IntoIterator<Item = ProductId>) -> Self {
        Wishlist {
            ids: ids.into_iter().collect(),
        }
    }

    /// Flips membership.
    ///
    /// ## Returns
    /// The new membership: `true` if the product is now wishlisted.
    pub fn toggle(&mut self, product_id: ProductId) -> bool {
        if self.ids.remove(&product_id) {
            false
        } else {
            self.ids.insert(product_id);
            true
        }
    }

    pub fn contains(&self, product_id: ProductId) -> bool {
        self.ids.contains(&product_id)
    }

    /// Member ids in ascending order.
    pub fn ids(&self) -> Vec<ProductId> {
        self.ids.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_is_an_involution() {
        let mut wishlist = Wishlist::from_ids([ProductId::new(2)]);
        let before = wishlist.clone();

        assert!(wishlist.toggle(ProductId::new(5)));
        assert!(wishlist.contains(ProductId::new(5)));
        assert!(!wishlist.toggle(ProductId::new(5)));
        assert_eq!(wishlist, before);

        assert!(!wishlist.toggle(ProductId::new(2)));
        assert!(wishlist.toggle(ProductId::new(2)));
        assert_eq!(wishlist, before);
    }

    #[test]
    fn test_from_ids_dedupes() {
        let wishlist = Wishlist::from_ids([3, 1, 3].map(ProductId::new));
        assert_eq!(wishlist.ids(), vec![ProductId::new(1), ProductId::new(3)]);
    }

    #[test]
    fn test_json_is_id_array() {
        let wishlist: Wishlist = serde_json::from_str("[4,1,4]").unwrap();
        assert_eq!(wishlist.len(), 2);
        assert_eq!(serde_json::to_string(&wishlist).unwrap(), "[1,4]");
    }
}
