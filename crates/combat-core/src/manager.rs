//! The combat manager: tracked population, damage interception and the
//! death handshake with the host.
//!
//! # Protocol
//!
//! 1. **Join/leave** -- a tracker exists for an entity exactly while it is
//!    joined. Leaving discards the log; no combat credit survives a session.
//! 2. **Tick** -- every tracker ages by one tick and drops expired entries.
//! 3. **Damage** -- the event is recorded on the target's tracker. If it
//!    would be lethal, the raw damage is suppressed and the death is
//!    resolved here first, so the host cannot conclude the entity died
//!    before listeners had their say.
//! 4. **Resolution** -- the tracker builds a [`CombatDeathEvent`], every
//!    listener sees it in order, and the tracker is reset. A surviving
//!    event is parked as a pending death and the host is told to zero the
//!    entity's health. A cancelled event, or one resolved without
//!    delegation, spawns its drops at the entity's location instead.
//! 5. **Confirmation** -- when the host raises its own death notice, the
//!    pending event is consumed and its message and drops replace the
//!    host's defaults. A notice with no pending event is logged and left
//!    as the host made it.
//!
//! All of this runs on one logical thread. A lethal hit completes its
//! whole resolution before the next notification is processed.

use std::collections::BTreeMap;

use combat_tracker::{CombatDeathEvent, CombatTracker, TrackerConfig, TranslatorRegistry};
use combat_types::{DamageCause, DamageEvent, DeathNotice, EntityId, ItemStack, Location};
use tracing::{debug, error, info, warn};

use crate::config::CombatConfig;
use crate::error::CombatError;
use crate::listener::DeathListener;
use crate::simulation::Simulation;
use crate::table::{SessionId, TrackerTable};

/// What the manager did with a damage notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Not recorded: untracked target, cancelled upstream, or no damage.
    Ignored,
    /// Recorded; the entity survives.
    Recorded,
    /// Recorded and lethal; the death was resolved.
    Killed(DeathOutcome),
}

/// How a resolved death was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathOutcome {
    /// Handed to the host's death path; a pending death awaits
    /// confirmation.
    Delegated,
    /// A listener cancelled the death; the entity lives and `dropped`
    /// items were spawned.
    Cancelled {
        /// Number of items spawned.
        dropped: usize,
    },
    /// Resolved without delegation; `dropped` items were spawned.
    Resolved {
        /// Number of items spawned.
        dropped: usize,
    },
}

/// Result of reconciling a host death notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// The pending death was consumed and applied to the notice.
    Applied,
    /// No pending death matched; the notice was left untouched.
    Unhandled,
}

/// Orchestrates combat tracking for the whole tracked population.
pub struct CombatManager {
    config: TrackerConfig,
    registry: TranslatorRegistry,
    trackers: TrackerTable,
    pending_deaths: BTreeMap<EntityId, CombatDeathEvent>,
    listeners: Vec<Box<dyn DeathListener>>,
}

impl core::fmt::Debug for CombatManager {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CombatManager")
            .field("config", &self.config)
            .field("tracked", &self.trackers.len())
            .field("pending_deaths", &self.pending_deaths.len())
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl CombatManager {
    /// Create a manager with the given tracker settings and translators.
    ///
    /// # Errors
    ///
    /// Returns [`CombatError::Tracker`] if the configuration is invalid.
    pub fn new(config: TrackerConfig, registry: TranslatorRegistry) -> Result<Self, CombatError> {
        config.validate()?;
        Ok(Self {
            config,
            registry,
            trackers: TrackerTable::new(),
            pending_deaths: BTreeMap::new(),
            listeners: Vec::new(),
        })
    }

    /// Create a manager from engine configuration with the built-in
    /// translators.
    ///
    /// # Errors
    ///
    /// Returns [`CombatError::Config`] if the configuration is invalid.
    pub fn from_config(config: &CombatConfig) -> Result<Self, CombatError> {
        config.validate()?;
        Self::new(config.tracker, TranslatorRegistry::with_defaults())
    }

    /// Add a death listener. Listeners run in registration order.
    pub fn register_listener(&mut self, listener: impl DeathListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// The translator registry.
    pub const fn registry(&self) -> &TranslatorRegistry {
        &self.registry
    }

    /// Mutable access to the translator registry, for registering
    /// translators of custom damage kinds.
    pub const fn registry_mut(&mut self) -> &mut TranslatorRegistry {
        &mut self.registry
    }

    // -----------------------------------------------------------------------
    // Population
    // -----------------------------------------------------------------------

    /// Start tracking `entity` with an empty log.
    pub fn on_join(&mut self, entity: EntityId) -> SessionId {
        let session = self.trackers.insert(entity, CombatTracker::new(self.config));
        debug!(%entity, %session, "Entity joined combat tracking");
        session
    }

    /// Stop tracking `entity`, discarding its log and any unconfirmed
    /// pending death. Returns whether the entity was tracked.
    pub fn on_leave(&mut self, entity: EntityId) -> bool {
        let was_tracked = self.trackers.remove(entity).is_some();
        if self.pending_deaths.remove(&entity).is_some() {
            warn!(%entity, "Entity left with an unconfirmed pending death; discarded");
        }
        debug!(%entity, was_tracked, "Entity left combat tracking");
        was_tracked
    }

    /// Age every tracker by one tick. Returns the number of entries that
    /// expired across the population.
    pub fn on_tick(&mut self) -> usize {
        self.trackers
            .iter_mut()
            .map(|(_, tracker)| tracker.tick())
            .fold(0_usize, usize::saturating_add)
    }

    // -----------------------------------------------------------------------
    // Damage
    // -----------------------------------------------------------------------

    /// Handle a damage notification from the host.
    ///
    /// Lethal damage (final damage at or above current health) is
    /// suppressed on `event` and the death is resolved immediately.
    pub fn on_damage<S: Simulation>(
        &mut self,
        sim: &mut S,
        event: &mut DamageEvent,
    ) -> DamageOutcome {
        if event.cancelled {
            return DamageOutcome::Ignored;
        }
        let entity = event.target;
        let Some(tracker) = self.trackers.get_mut(entity) else {
            return DamageOutcome::Ignored;
        };
        if tracker.track_damage(&self.registry, event, false).is_none() {
            return DamageOutcome::Ignored;
        }

        let Some(health) = sim.health(entity) else {
            return DamageOutcome::Recorded;
        };
        if event.final_damage < health {
            return DamageOutcome::Recorded;
        }

        event.suppress();
        self.resolve_death(sim, entity, true)
            .map_or(DamageOutcome::Recorded, DamageOutcome::Killed)
    }

    /// Apply scripted damage to `entity` through the tracking path.
    ///
    /// The damage is recorded as synthetic. If it is lethal the death is
    /// resolved as for observed damage; otherwise the host is told to
    /// lower the entity's health directly, without raising another damage
    /// notification.
    ///
    /// # Errors
    ///
    /// Returns [`CombatError::UntrackedEntity`] if `entity` is not tracked,
    /// or [`CombatError::MissingHostEntity`] if the host does not know it.
    pub fn damage_player<S: Simulation>(
        &mut self,
        sim: &mut S,
        entity: EntityId,
        cause: DamageCause,
        amount: f64,
    ) -> Result<DamageOutcome, CombatError> {
        let tracker = self
            .trackers
            .get_mut(entity)
            .ok_or(CombatError::UntrackedEntity(entity))?;
        let health = sim
            .health(entity)
            .ok_or(CombatError::MissingHostEntity(entity))?;

        let event = DamageEvent::new(entity, cause, amount);
        if tracker.track_damage(&self.registry, &event, true).is_none() {
            return Ok(DamageOutcome::Ignored);
        }

        if health <= amount {
            return Ok(self
                .resolve_death(sim, entity, true)
                .map_or(DamageOutcome::Recorded, DamageOutcome::Killed));
        }

        sim.set_health(entity, health - amount);
        Ok(DamageOutcome::Recorded)
    }

    /// Resolve the death of `entity` from its current log.
    ///
    /// With `delegate_event` the host's own death path finishes the death;
    /// without it the drops are spawned here and the entity is left for the
    /// caller to deal with.
    ///
    /// # Errors
    ///
    /// Returns [`CombatError::UntrackedEntity`] if `entity` is not tracked.
    pub fn kill_player<S: Simulation>(
        &mut self,
        sim: &mut S,
        entity: EntityId,
        delegate_event: bool,
    ) -> Result<DeathOutcome, CombatError> {
        self.resolve_death(sim, entity, delegate_event)
            .ok_or(CombatError::UntrackedEntity(entity))
    }

    fn resolve_death<S: Simulation>(
        &mut self,
        sim: &mut S,
        entity: EntityId,
        delegate_event: bool,
    ) -> Option<DeathOutcome> {
        let tracker = self.trackers.get_mut(entity)?;

        let location = sim.location(entity);
        let name = sim.name(entity).unwrap_or_else(|| entity.to_string());
        let drops = sim.inventory(entity);

        let mut event = tracker.on_death(&self.registry, entity, &name, drops);
        for listener in &mut self.listeners {
            listener.on_combat_death(&mut event);
        }
        tracker.reset();

        info!(
            %entity,
            cause = %event.death_cause(),
            killer = event.killer().map(|k| k.name.as_str()),
            killer_actor = event.killer_actor().map(|k| k.name.as_str()),
            cancelled = event.is_cancelled(),
            delegate_event,
            "Combat death resolved"
        );

        if delegate_event && !event.is_cancelled() {
            if self.pending_deaths.insert(entity, event).is_some() {
                warn!(%entity, "Pending death replaced before it was confirmed");
            }
            sim.set_health(entity, 0.0);
            return Some(DeathOutcome::Delegated);
        }

        let cancelled = event.is_cancelled();
        let dropped = spawn_drops(sim, entity, location.as_ref(), event.into_drops());
        Some(if cancelled {
            DeathOutcome::Cancelled { dropped }
        } else {
            DeathOutcome::Resolved { dropped }
        })
    }

    // -----------------------------------------------------------------------
    // Confirmation
    // -----------------------------------------------------------------------

    /// Reconcile the host's own death notice with the pending death.
    ///
    /// On a match the notice's message becomes the resolved message and
    /// its drops become exactly the resolved drops. Without a match the
    /// notice is left as the host made it.
    pub fn on_authoritative_death(&mut self, notice: &mut DeathNotice) -> Reconciliation {
        let Some(event) = self.pending_deaths.remove(&notice.entity) else {
            error!(
                entity = %notice.entity,
                message = %notice.message,
                "Unhandled death: no pending combat death for entity"
            );
            return Reconciliation::Unhandled;
        };

        notice.message = event.death_message().to_owned();
        reconcile_drops(&mut notice.drops, event.into_drops());
        Reconciliation::Applied
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Whether `entity` is in the tracked population.
    pub fn is_tracked(&self, entity: EntityId) -> bool {
        self.trackers.contains(entity)
    }

    /// Whether `entity` has unexpired combat entries.
    pub fn is_in_combat(&self, entity: EntityId) -> bool {
        self.trackers
            .get(entity)
            .is_some_and(CombatTracker::is_in_combat)
    }

    /// Tracker of `entity`.
    pub fn tracker(&self, entity: EntityId) -> Option<&CombatTracker> {
        self.trackers.get(entity)
    }

    /// Session of `entity`.
    pub fn session(&self, entity: EntityId) -> Option<SessionId> {
        self.trackers.session(entity)
    }

    /// Number of tracked entities.
    pub fn tracked_count(&self) -> usize {
        self.trackers.len()
    }

    /// Pending death of `entity`, awaiting host confirmation.
    pub fn pending_death(&self, entity: EntityId) -> Option<&CombatDeathEvent> {
        self.pending_deaths.get(&entity)
    }
}

/// Spawn every drop at `location`. Returns how many were spawned.
fn spawn_drops<S: Simulation>(
    sim: &mut S,
    entity: EntityId,
    location: Option<&Location>,
    drops: Vec<ItemStack>,
) -> usize {
    let Some(location) = location else {
        if !drops.is_empty() {
            warn!(%entity, count = drops.len(), "No location for entity; drops discarded");
        }
        return 0;
    };
    let count = drops.len();
    for item in drops {
        sim.spawn_item(location, item);
    }
    count
}

/// Make `host` hold exactly the `resolved` drops.
///
/// Host drops matching a resolved drop keep their position; unmatched host
/// drops are removed and resolved drops the host did not have are appended.
fn reconcile_drops(host: &mut Vec<ItemStack>, resolved: Vec<ItemStack>) {
    let mut remaining = resolved;
    host.retain(|item| {
        remaining
            .iter()
            .position(|candidate| candidate == item)
            .map(|position| remaining.swap_remove(position))
            .is_some()
    });
    host.extend(remaining);
}
