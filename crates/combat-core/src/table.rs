//! Slot table of combat trackers.
//!
//! Each tracked entity is given a [`SessionId`] when it joins: an index
//! into a dense slot vector plus a generation counter. Leaving frees the
//! slot for reuse and bumps its generation, so a session id held past a
//! leave can never reach the next occupant's tracker.

use std::collections::BTreeMap;

use combat_tracker::CombatTracker;
use combat_types::EntityId;

/// Handle to one tracked session of one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId {
    index: usize,
    generation: u32,
}

impl SessionId {
    /// Slot index backing this session.
    pub const fn index(self) -> usize {
        self.index
    }

    /// Generation of the slot when the session started.
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl core::fmt::Display for SessionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

#[derive(Debug)]
struct Occupant {
    entity: EntityId,
    tracker: CombatTracker,
}

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    occupant: Option<Occupant>,
}

/// Trackers of every entity currently in the tracked population.
#[derive(Debug, Default)]
pub struct TrackerTable {
    slots: Vec<Slot>,
    free: Vec<usize>,
    sessions: BTreeMap<EntityId, SessionId>,
}

impl TrackerTable {
    /// Create an empty table.
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            sessions: BTreeMap::new(),
        }
    }

    /// Start a session for `entity`. An existing session for the same
    /// entity is ended first.
    pub fn insert(&mut self, entity: EntityId, tracker: CombatTracker) -> SessionId {
        self.remove(entity);

        let occupant = Occupant { entity, tracker };
        let session = if let Some(index) = self.free.pop() {
            let generation = self.slots.get(index).map_or(0, |slot| slot.generation);
            if let Some(slot) = self.slots.get_mut(index) {
                slot.occupant = Some(occupant);
            }
            SessionId { index, generation }
        } else {
            let index = self.slots.len();
            self.slots.push(Slot {
                generation: 0,
                occupant: Some(occupant),
            });
            SessionId {
                index,
                generation: 0,
            }
        };

        self.sessions.insert(entity, session);
        session
    }

    /// End the session of `entity`, returning its tracker.
    pub fn remove(&mut self, entity: EntityId) -> Option<CombatTracker> {
        let session = self.sessions.remove(&entity)?;
        let slot = self.slots.get_mut(session.index)?;
        let occupant = slot.occupant.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(session.index);
        Some(occupant.tracker)
    }

    /// Current session of `entity`.
    pub fn session(&self, entity: EntityId) -> Option<SessionId> {
        self.sessions.get(&entity).copied()
    }

    /// Whether `entity` is tracked.
    pub fn contains(&self, entity: EntityId) -> bool {
        self.sessions.contains_key(&entity)
    }

    /// Tracker of `entity`.
    pub fn get(&self, entity: EntityId) -> Option<&CombatTracker> {
        self.session(entity).and_then(|session| self.get_by_session(session))
    }

    /// Mutable tracker of `entity`.
    pub fn get_mut(&mut self, entity: EntityId) -> Option<&mut CombatTracker> {
        let session = self.session(entity)?;
        self.get_by_session_mut(session)
    }

    /// Tracker of a session, if the session is still live.
    pub fn get_by_session(&self, session: SessionId) -> Option<&CombatTracker> {
        self.slots
            .get(session.index)
            .filter(|slot| slot.generation == session.generation)
            .and_then(|slot| slot.occupant.as_ref())
            .map(|occupant| &occupant.tracker)
    }

    /// Mutable tracker of a session, if the session is still live.
    pub fn get_by_session_mut(&mut self, session: SessionId) -> Option<&mut CombatTracker> {
        self.slots
            .get_mut(session.index)
            .filter(|slot| slot.generation == session.generation)
            .and_then(|slot| slot.occupant.as_mut())
            .map(|occupant| &mut occupant.tracker)
    }

    /// Every live tracker with its entity, in slot order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut CombatTracker)> {
        self.slots
            .iter_mut()
            .filter_map(|slot| slot.occupant.as_mut())
            .map(|occupant| (occupant.entity, &mut occupant.tracker))
    }

    /// Every live tracker with its entity, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &CombatTracker)> {
        self.slots
            .iter()
            .filter_map(|slot| slot.occupant.as_ref())
            .map(|occupant| (occupant.entity, &occupant.tracker))
    }

    /// Number of tracked entities.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether nobody is tracked.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
