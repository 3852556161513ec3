//! Shared type definitions for the combat tracker.
//!
//! This crate is the vocabulary the host simulation and the engine agree
//! on. It has no logic beyond accessors.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for host identifiers
//! - [`enums`] -- Damage kinds, death causes, damage options, entity kinds
//! - [`structs`] -- Entities, items, locations, damage and death notifications

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{DamageCause, DamageOption, DeathCause, EntityKind};
pub use ids::{EntityId, WorldId};
pub use structs::{DamageEvent, DamageSource, DeathNotice, EntityRef, ItemStack, Location};
