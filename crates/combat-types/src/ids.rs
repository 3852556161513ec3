//! Type-safe identifier wrappers around [`Uuid`].
//!
//! The host simulation owns entity and world identity. These newtypes keep
//! the two from being mixed at compile time; the combat engine never
//! inspects their contents beyond equality and ordering.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Declares a host-issued identifier as a [`Uuid`] newtype.
///
/// Identifiers are `Copy` and totally ordered so they can key the tracker
/// table and the pending-death map directly.
macro_rules! host_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Mint a fresh time-ordered identifier, as an in-memory host
            /// does when it spawns something.
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

host_id! {
    /// Identifier of an entity in the host simulation (players included).
    EntityId
}

host_id! {
    /// Identifier of a world (dimension) in the host simulation.
    WorldId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_distinct_types() {
        let entity = EntityId::new();
        let world = WorldId::new();
        assert_ne!(entity.0, Uuid::nil());
        assert_ne!(world.0, Uuid::nil());
    }

    #[test]
    fn fresh_ids_are_unique() {
        assert_ne!(EntityId::new(), EntityId::new());
    }

    #[test]
    fn display_matches_inner_uuid() {
        let id = EntityId::new();
        assert_eq!(id.to_string(), id.0.hyphenated().to_string());
    }
}
