//! Per-entity combat log.
//!
//! A [`CombatTracker`] keeps the recent damage an entity took, oldest
//! first. Entries expire once they are `retention_ticks` old, which moves
//! the tracker from [`TrackerState::InCombat`] back to
//! [`TrackerState::Idle`]. The newest entry is the lethal pointer: when the
//! entity dies, it decides the death cause and the killer.
//!
//! # Kill attribution
//!
//! The entity that hit last and the player credited for the kill are kept
//! apart. An arrow is the killer but its shooter is credited; fire placed
//! by a player has no killer entity but still credits the player. When the
//! lethal entry credits nobody (a fall after being knocked off a ledge),
//! the most recent player in the log is credited instead.

use std::collections::VecDeque;

use combat_types::{DamageEvent, DamageOption, DeathCause, EntityId, ItemStack};
use tracing::debug;

use crate::config::TrackerConfig;
use crate::death_event::{CombatDeathEvent, DeathResolution};
use crate::entry::CombatEntry;
use crate::message;
use crate::translator::TranslatorRegistry;

/// Coarse combat state of one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackerState {
    /// No unexpired entries.
    Idle,
    /// At least one unexpired entry.
    InCombat,
}

/// Rolling combat log of one tracked entity.
#[derive(Debug, Clone)]
pub struct CombatTracker {
    /// Entries, oldest first. The back is the lethal pointer.
    entries: VecDeque<CombatEntry>,
    /// Ticks elapsed since the tracker was created.
    clock: u64,
    config: TrackerConfig,
}

impl CombatTracker {
    /// Create an idle tracker.
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            entries: VecDeque::new(),
            clock: 0,
            config,
        }
    }

    /// Record a damage event.
    ///
    /// Events with a non-positive amount are dropped. Observed events
    /// already cancelled upstream are dropped too; `synthetic` events,
    /// injected by the engine itself, bypass that check. The event is
    /// never modified.
    ///
    /// Returns the recorded entry.
    pub fn track_damage(
        &mut self,
        registry: &TranslatorRegistry,
        event: &DamageEvent,
        synthetic: bool,
    ) -> Option<&CombatEntry> {
        if event.cancelled && !synthetic {
            return None;
        }
        let entry = CombatEntry::from_event(registry, event, self.clock, synthetic)?;

        debug!(
            target_entity = %event.target,
            cause = ?entry.damage_cause(),
            death_cause = %entry.death_cause(),
            amount = entry.amount(),
            synthetic,
            "Combat entry recorded"
        );

        self.entries.push_back(entry);
        while self.entries.len() > self.config.max_entries {
            self.entries.pop_front();
        }
        self.entries.back()
    }

    /// Advance the decay clock one tick and drop expired entries.
    ///
    /// Only the expired prefix of the log is visited. Returns the number
    /// of entries dropped.
    pub fn tick(&mut self) -> usize {
        self.clock = self.clock.saturating_add(1);

        let mut expired: usize = 0;
        while let Some(oldest) = self.entries.front() {
            if self.clock.saturating_sub(oldest.tick()) < self.config.retention_ticks {
                break;
            }
            self.entries.pop_front();
            expired = expired.saturating_add(1);
        }

        if expired > 0 && self.entries.is_empty() {
            debug!(expired, "Combat log expired, tracker idle");
        }
        expired
    }

    /// Resolve the death of `subject` from the current log.
    ///
    /// The log is left untouched so the history handed to listeners stays
    /// stable; call [`reset`](Self::reset) once the event is dispatched.
    pub fn on_death(
        &self,
        registry: &TranslatorRegistry,
        subject: EntityId,
        subject_name: &str,
        drops: Vec<Option<ItemStack>>,
    ) -> CombatDeathEvent {
        let last_damage = self.entries.back();
        let cause = last_damage.map_or(DeathCause::Generic, CombatEntry::death_cause);

        let killer = last_damage.and_then(CombatEntry::direct_entity).cloned();
        let killer_actor = last_damage
            .and_then(CombatEntry::responsible_actor)
            .or_else(|| {
                self.entries
                    .iter()
                    .rev()
                    .find_map(CombatEntry::responsible_actor)
            })
            .cloned();
        let weapon = last_damage.and_then(CombatEntry::weapon).cloned();

        let attacker = last_damage
            .and_then(CombatEntry::attacker)
            .or(killer_actor.as_ref());
        let attacker_name = attacker.map(|entity| entity.name.as_str());
        let weapon_name = weapon.as_ref().and_then(|item| item.display_name.as_deref());

        let options = registry.damage_options(cause);
        let damage_option = if attacker.is_some()
            && weapon_name.is_some()
            && options.contains(&DamageOption::WithItem)
        {
            DamageOption::WithItem
        } else if attacker.is_some()
            && !cause.requires_killer()
            && options.contains(&DamageOption::WhilstFighting)
        {
            DamageOption::WhilstFighting
        } else {
            DamageOption::Plain
        };

        let death_message =
            message::render(cause, damage_option, subject_name, attacker_name, weapon_name);

        CombatDeathEvent::new(DeathResolution {
            subject,
            subject_name: subject_name.to_owned(),
            drops,
            last_damage: last_damage.cloned(),
            history: self.entries.iter().cloned().collect(),
            weapon,
            killer,
            killer_actor,
            damage_option,
            death_message,
        })
    }

    /// Clear the log. Idempotent.
    pub fn reset(&mut self) {
        self.entries.clear();
    }

    /// Current combat state.
    pub fn state(&self) -> TrackerState {
        if self.entries.is_empty() {
            TrackerState::Idle
        } else {
            TrackerState::InCombat
        }
    }

    /// Whether the entity has unexpired entries.
    pub fn is_in_combat(&self) -> bool {
        self.state() == TrackerState::InCombat
    }

    /// The most recent entry, which decides the death cause.
    pub fn last_damage(&self) -> Option<&CombatEntry> {
        self.entries.back()
    }

    /// Entries, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &CombatEntry> {
        self.entries.iter()
    }

    /// Number of unexpired entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ticks since the most recent entry was recorded.
    pub fn ticks_since_last_damage(&self) -> Option<u64> {
        self.entries
            .back()
            .map(|entry| self.clock.saturating_sub(entry.tick()))
    }

    /// Ticks between the oldest and newest unexpired entries.
    pub fn combat_duration(&self) -> u64 {
        match (self.entries.front(), self.entries.back()) {
            (Some(first), Some(last)) => last.tick().saturating_sub(first.tick()),
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use combat_types::{DamageCause, DamageSource, EntityKind, EntityRef};

    use super::*;

    fn config(retention_ticks: u64) -> TrackerConfig {
        TrackerConfig {
            retention_ticks,
            max_entries: 64,
        }
    }

    fn hit(target: EntityId, cause: DamageCause, amount: f64) -> DamageEvent {
        DamageEvent::new(target, cause, amount)
    }

    #[test]
    fn new_tracker_is_idle() {
        let tracker = CombatTracker::new(config(10));
        assert_eq!(tracker.state(), TrackerState::Idle);
        assert!(tracker.last_damage().is_none());
        assert_eq!(tracker.ticks_since_last_damage(), None);
    }

    #[test]
    fn log_grows_within_retention_window() {
        let registry = TranslatorRegistry::with_defaults();
        let mut tracker = CombatTracker::new(config(10));
        let target = EntityId::new();

        let mut previous = 0;
        for _ in 0..5 {
            tracker.track_damage(&registry, &hit(target, DamageCause::Fall, 1.0), false);
            tracker.tick();
            assert!(tracker.len() >= previous);
            previous = tracker.len();
        }
        assert_eq!(tracker.len(), 5);
        assert!(tracker.is_in_combat());
    }

    #[test]
    fn log_expires_to_idle() {
        let registry = TranslatorRegistry::with_defaults();
        let mut tracker = CombatTracker::new(config(3));
        let target = EntityId::new();

        tracker.track_damage(&registry, &hit(target, DamageCause::Fall, 1.0), false);
        tracker.tick();
        tracker.track_damage(&registry, &hit(target, DamageCause::Fire, 1.0), false);

        assert_eq!(tracker.tick(), 0);
        assert_eq!(tracker.tick(), 1);
        assert_eq!(tracker.len(), 1);
        assert_eq!(tracker.tick(), 1);
        assert_eq!(tracker.state(), TrackerState::Idle);
        assert!(tracker.last_damage().is_none());
        assert_eq!(tracker.tick(), 0);
    }

    #[test]
    fn zero_damage_is_not_recorded() {
        let registry = TranslatorRegistry::with_defaults();
        let mut tracker = CombatTracker::new(config(10));
        assert!(
            tracker
                .track_damage(&registry, &hit(EntityId::new(), DamageCause::Fall, 0.0), false)
                .is_none()
        );
        assert!(tracker.is_empty());
    }

    #[test]
    fn cancelled_events_only_recorded_when_synthetic() {
        let registry = TranslatorRegistry::with_defaults();
        let mut tracker = CombatTracker::new(config(10));
        let mut event = hit(EntityId::new(), DamageCause::Custom, 2.0);
        event.cancelled = true;

        assert!(tracker.track_damage(&registry, &event, false).is_none());
        let recorded = tracker.track_damage(&registry, &event, true);
        assert!(recorded.is_some_and(CombatEntry::is_synthetic));
    }

    #[test]
    fn capacity_evicts_oldest() {
        let registry = TranslatorRegistry::with_defaults();
        let mut tracker = CombatTracker::new(TrackerConfig {
            retention_ticks: 100,
            max_entries: 2,
        });
        let target = EntityId::new();
        tracker.track_damage(&registry, &hit(target, DamageCause::Fall, 1.0), false);
        tracker.track_damage(&registry, &hit(target, DamageCause::Fire, 1.0), false);
        tracker.track_damage(&registry, &hit(target, DamageCause::Lava, 1.0), false);

        let causes: Vec<_> = tracker.entries().map(CombatEntry::damage_cause).collect();
        assert_eq!(causes, vec![DamageCause::Fire, DamageCause::Lava]);
    }

    #[test]
    fn reset_is_idempotent() {
        let registry = TranslatorRegistry::with_defaults();
        let mut tracker = CombatTracker::new(config(10));
        tracker.track_damage(&registry, &hit(EntityId::new(), DamageCause::Fall, 1.0), false);

        tracker.reset();
        assert_eq!(tracker.state(), TrackerState::Idle);
        assert!(tracker.is_empty());
        tracker.reset();
        assert_eq!(tracker.state(), TrackerState::Idle);
        assert!(tracker.is_empty());
    }

    #[test]
    fn death_without_entries_is_generic() {
        let registry = TranslatorRegistry::with_defaults();
        let tracker = CombatTracker::new(config(10));
        let event = tracker.on_death(&registry, EntityId::new(), "Alex", Vec::new());

        assert_eq!(event.death_cause(), DeathCause::Generic);
        assert!(event.last_damage().is_none());
        assert!(event.killer().is_none());
        assert_eq!(event.death_message(), "Alex died");
    }

    #[test]
    fn fire_placed_by_player_credits_player() {
        let registry = TranslatorRegistry::with_defaults();
        let mut tracker = CombatTracker::new(config(10));
        let victim = EntityId::new();
        let arsonist = EntityRef::player(EntityId::new(), "Steve")
            .holding(ItemStack::new("flint_and_steel", 1));
        let burn = hit(victim, DamageCause::Fire, 20.0).with_source(DamageSource::Block {
            material: String::from("fire"),
            placed_by: Some(arsonist.clone()),
        });
        tracker.track_damage(&registry, &burn, false);

        let event = tracker.on_death(&registry, victim, "Alex", Vec::new());
        assert_eq!(event.death_cause(), DeathCause::InFire);
        assert!(event.killer().is_none());
        assert_eq!(event.killer_actor(), Some(&arsonist));
        assert_eq!(event.damage_option(), DamageOption::WhilstFighting);
        assert_eq!(event.death_message(), "Alex walked into fire whilst fighting Steve");
    }

    #[test]
    fn pet_kill_credits_owner_and_keeps_pet_as_killer() {
        let registry = TranslatorRegistry::with_defaults();
        let mut tracker = CombatTracker::new(config(10));
        let victim = EntityId::new();
        let owner = EntityRef::player(EntityId::new(), "Steve");
        let wolf =
            EntityRef::new(EntityId::new(), EntityKind::Creature, "Wolf").owned_by(owner.clone());
        let bite = hit(victim, DamageCause::EntityAttack, 20.0)
            .with_source(DamageSource::Entity(wolf.clone()));
        tracker.track_damage(&registry, &bite, false);

        let event = tracker.on_death(&registry, victim, "Alex", Vec::new());
        assert_eq!(event.killer(), Some(&wolf));
        assert_eq!(event.killer_actor(), Some(&owner));
        assert_eq!(event.death_cause(), DeathCause::Slain);
    }

    #[test]
    fn pet_kill_ignores_owner_held_item() {
        let registry = TranslatorRegistry::with_defaults();
        let mut tracker = CombatTracker::new(config(10));
        let victim = EntityId::new();
        let owner = EntityRef::player(EntityId::new(), "Steve")
            .holding(ItemStack::new("diamond_sword", 1).named("Bane"));
        let wolf =
            EntityRef::new(EntityId::new(), EntityKind::Creature, "Wolf").owned_by(owner.clone());
        let bite = hit(victim, DamageCause::EntityAttack, 20.0)
            .with_source(DamageSource::Entity(wolf.clone()));
        tracker.track_damage(&registry, &bite, false);

        let event = tracker.on_death(&registry, victim, "Alex", Vec::new());
        assert_eq!(event.killer(), Some(&wolf));
        assert_eq!(event.killer_actor(), Some(&owner));
        assert!(event.weapon().is_none());
        assert_eq!(event.damage_option(), DamageOption::Plain);
        assert_eq!(event.death_message(), "Alex was slain by Steve");
    }

    #[test]
    fn knockback_fall_credits_last_player_fought() {
        let registry = TranslatorRegistry::with_defaults();
        let mut tracker = CombatTracker::new(config(100));
        let victim = EntityId::new();
        let attacker = EntityRef::player(EntityId::new(), "Steve");

        let punch = hit(victim, DamageCause::EntityAttack, 1.0)
            .with_source(DamageSource::Entity(attacker.clone()));
        tracker.track_damage(&registry, &punch, false);
        tracker.tick();
        let fall = hit(victim, DamageCause::Fall, 30.0).with_fall_distance(40.0);
        tracker.track_damage(&registry, &fall, false);

        let event = tracker.on_death(&registry, victim, "Alex", Vec::new());
        assert_eq!(event.death_cause(), DeathCause::FellFromHigh);
        assert!(event.killer().is_none());
        assert_eq!(event.killer_actor(), Some(&attacker));
        assert_eq!(event.death_message(), "Alex was doomed to fall by Steve");
        assert_eq!(event.combat_history().len(), 2);
    }

    #[test]
    fn named_weapon_selects_item_phrasing() {
        let registry = TranslatorRegistry::with_defaults();
        let mut tracker = CombatTracker::new(config(10));
        let victim = EntityId::new();
        let blade = ItemStack::new("netherite_sword", 1).named("Bane");
        let attacker = EntityRef::player(EntityId::new(), "Steve").holding(blade.clone());
        let slash = hit(victim, DamageCause::EntityAttack, 20.0)
            .with_source(DamageSource::Entity(attacker));
        tracker.track_damage(&registry, &slash, false);

        let event = tracker.on_death(&registry, victim, "Alex", Vec::new());
        assert_eq!(event.weapon(), Some(&blade));
        assert_eq!(event.damage_option(), DamageOption::WithItem);
        assert_eq!(event.death_message(), "Alex was slain by Steve using Bane");
    }

    #[test]
    fn on_death_does_not_clear_log() {
        let registry = TranslatorRegistry::with_defaults();
        let mut tracker = CombatTracker::new(config(10));
        let victim = EntityId::new();
        tracker.track_damage(&registry, &hit(victim, DamageCause::Drowning, 20.0), false);

        let event = tracker.on_death(
            &registry,
            victim,
            "Alex",
            vec![Some(ItemStack::new("apple", 1))],
        );
        assert_eq!(tracker.len(), 1);
        assert_eq!(event.drops().len(), 1);
        assert_eq!(event.death_message(), "Alex drowned");
    }

    #[test]
    fn duration_and_recency() {
        let registry = TranslatorRegistry::with_defaults();
        let mut tracker = CombatTracker::new(config(100));
        let target = EntityId::new();
        tracker.track_damage(&registry, &hit(target, DamageCause::Fall, 1.0), false);
        tracker.tick();
        tracker.tick();
        tracker.track_damage(&registry, &hit(target, DamageCause::Fall, 1.0), false);
        tracker.tick();

        assert_eq!(tracker.combat_duration(), 2);
        assert_eq!(tracker.ticks_since_last_damage(), Some(1));
    }
}
