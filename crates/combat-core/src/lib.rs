//! Combat tracking engine.
//!
//! The [`CombatManager`] keeps one combat log per tracked entity, records
//! damage as the host reports it, and turns lethal damage into a
//! cancellable [`CombatDeathEvent`] before the host gets to finish the
//! death. The host is reached only through the [`Simulation`] trait.
//!
//! # Modules
//!
//! - [`config`] -- YAML engine configuration ([`CombatConfig`])
//! - [`error`] -- Error types ([`CombatError`])
//! - [`listener`] -- Death listeners ([`DeathListener`])
//! - [`manager`] -- Population, damage interception and the death
//!   handshake ([`CombatManager`])
//! - [`simulation`] -- Host boundary and an in-memory host
//!   ([`Simulation`], [`MemorySimulation`])
//! - [`table`] -- Generational slot table of trackers ([`TrackerTable`])
//! - [`ticker`] -- Background tick task ([`TickTask`])
//!
//! [`CombatDeathEvent`]: combat_tracker::CombatDeathEvent

pub mod config;
pub mod error;
pub mod listener;
pub mod manager;
pub mod simulation;
pub mod table;
pub mod ticker;

pub use config::{CombatConfig, ConfigError, LoggingConfig, SchedulerConfig};
pub use error::CombatError;
pub use listener::{CancelAll, DeathListener};
pub use manager::{CombatManager, DamageOutcome, DeathOutcome, Reconciliation};
pub use simulation::{MemorySimulation, SimCommand, SimEntity, Simulation};
pub use table::{SessionId, TrackerTable};
pub use ticker::TickTask;
