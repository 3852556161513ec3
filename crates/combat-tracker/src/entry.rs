//! A single recorded damage occurrence.

use chrono::{DateTime, Utc};
use combat_types::{DamageCause, DamageEvent, DeathCause, EntityKind, EntityRef, ItemStack};

use crate::translator::TranslatorRegistry;

/// One damage occurrence in an entity's combat log.
///
/// Entries are built once from a damage event and never mutated. The death
/// cause is resolved at record time so later translator changes do not
/// rewrite history.
#[derive(Debug, Clone, PartialEq)]
pub struct CombatEntry {
    damage_cause: DamageCause,
    death_cause: DeathCause,
    tick: u64,
    recorded_at: DateTime<Utc>,
    amount: f64,
    direct_entity: Option<EntityRef>,
    responsible_actor: Option<EntityRef>,
    weapon: Option<ItemStack>,
    synthetic: bool,
}

impl CombatEntry {
    /// Build an entry from `event` recorded at tracker tick `tick`.
    ///
    /// Returns `None` when the amount is zero, negative or NaN; such
    /// events never enter a combat log.
    pub fn from_event(
        registry: &TranslatorRegistry,
        event: &DamageEvent,
        tick: u64,
        synthetic: bool,
    ) -> Option<Self> {
        let amount = event.final_damage;
        if amount.is_nan() || amount <= 0.0 {
            return None;
        }

        let direct_entity = event.source.direct_entity().cloned();
        let responsible_actor = event.source.responsible_player().cloned();
        let weapon = if event.cause.is_entity_damage() {
            direct_entity.as_ref().and_then(wielded_item).cloned()
        } else {
            None
        };

        Some(Self {
            damage_cause: event.cause,
            death_cause: registry.resolve(event),
            tick,
            recorded_at: Utc::now(),
            amount,
            direct_entity,
            responsible_actor,
            weapon,
            synthetic,
        })
    }

    /// Raw damage kind reported by the host.
    pub const fn damage_cause(&self) -> DamageCause {
        self.damage_cause
    }

    /// Death cause this damage would be reported as.
    pub const fn death_cause(&self) -> DeathCause {
        self.death_cause
    }

    /// Tracker tick at which the entry was recorded.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Wall-clock time at which the entry was recorded.
    pub const fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }

    /// Damage amount after reductions; always positive.
    pub const fn amount(&self) -> f64 {
        self.amount
    }

    /// Entity that dealt the damage directly (arrow, zombie, TNT).
    pub const fn direct_entity(&self) -> Option<&EntityRef> {
        self.direct_entity.as_ref()
    }

    /// Player credited for the damage, which may differ from the direct
    /// entity.
    pub const fn responsible_actor(&self) -> Option<&EntityRef> {
        self.responsible_actor.as_ref()
    }

    /// Item the damage was dealt with: whatever the direct entity held, or
    /// for a projectile, whatever its shooter held. Only recorded for
    /// entity damage kinds.
    pub const fn weapon(&self) -> Option<&ItemStack> {
        self.weapon.as_ref()
    }

    /// Whether the damage was injected through the synthetic damage API
    /// rather than observed from the host.
    pub const fn is_synthetic(&self) -> bool {
        self.synthetic
    }

    /// Entity named as the attacker in death messages.
    pub fn attacker(&self) -> Option<&EntityRef> {
        attacker(self.direct_entity.as_ref(), self.responsible_actor.as_ref())
    }
}

/// The credited player if any, else whoever launched the direct entity,
/// else the direct entity itself.
fn attacker<'a>(
    direct: Option<&'a EntityRef>,
    actor: Option<&'a EntityRef>,
) -> Option<&'a EntityRef> {
    actor.or_else(|| direct.map(|entity| entity.owner.as_deref().unwrap_or(entity)))
}

/// Item a direct attacker used. A pet never swings its owner's sword, but
/// an arrow was fired from its shooter's bow.
fn wielded_item(direct: &EntityRef) -> Option<&ItemStack> {
    if direct.held_item.is_some() || direct.kind != EntityKind::Projectile {
        return direct.held_item.as_ref();
    }
    direct.owner.as_deref().and_then(|shooter| shooter.held_item.as_ref())
}
