//! Storage keys for the persisted aggregates.

use std::fmt;

/// One persisted aggregate, stored under `aquastore-<name>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    Cart,
    Wishlist,
    /// Last-known wallet session.
    User,
    Theme,
}

impl StorageKey {
    pub const ALL: [StorageKey; 4] = [
        StorageKey::Cart,
        StorageKey::Wishlist,
        StorageKey::User,
        StorageKey::Theme,
    ];

    /// The full key, namespace included.
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::Cart => "aquastore-cart",
            StorageKey::Wishlist => "aquastore-wishlist",
            StorageKey::User => "aquastore-user",
            StorageKey::Theme => "aquastore-theme",
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
