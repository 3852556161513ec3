//! The cancellable death-resolution payload.
//!
//! A [`CombatDeathEvent`] is produced when an entity is about to die, handed
//! to every death listener in turn, and consumed once afterwards. Listeners
//! may edit the drops and the message, or cancel the death outright, in
//! which case the entity stays alive and the drops are spawned where it
//! stood.

use combat_types::{DamageOption, DeathCause, EntityId, EntityRef, ItemStack};

use crate::entry::CombatEntry;

/// Everything a tracker resolved about a death, used to build a
/// [`CombatDeathEvent`].
#[derive(Debug, Clone)]
pub struct DeathResolution {
    /// Entity that is about to die.
    pub subject: EntityId,
    /// Display name of the subject.
    pub subject_name: String,
    /// Inventory snapshot; empty slots are `None`.
    pub drops: Vec<Option<ItemStack>>,
    /// The lethal entry, if the log had one.
    pub last_damage: Option<CombatEntry>,
    /// Full log, oldest first.
    pub history: Vec<CombatEntry>,
    /// Item the killer held.
    pub weapon: Option<ItemStack>,
    /// Entity that dealt the lethal damage directly.
    pub killer: Option<EntityRef>,
    /// Player credited for the kill.
    pub killer_actor: Option<EntityRef>,
    /// Phrasing selected for the death message.
    pub damage_option: DamageOption,
    /// Initial death message.
    pub death_message: String,
}

/// Payload published to death listeners before an entity dies.
#[derive(Debug, Clone)]
pub struct CombatDeathEvent {
    subject: EntityId,
    subject_name: String,
    drops: Vec<Option<ItemStack>>,
    last_damage: Option<CombatEntry>,
    history: Vec<CombatEntry>,
    weapon: Option<ItemStack>,
    killer: Option<EntityRef>,
    killer_actor: Option<EntityRef>,
    damage_option: DamageOption,
    death_message: String,
    cancelled: bool,
}

impl CombatDeathEvent {
    /// Build an uncancelled event from a resolution.
    pub fn new(resolution: DeathResolution) -> Self {
        let DeathResolution {
            subject,
            subject_name,
            drops,
            last_damage,
            history,
            weapon,
            killer,
            killer_actor,
            damage_option,
            death_message,
        } = resolution;
        Self {
            subject,
            subject_name,
            drops,
            last_damage,
            history,
            weapon,
            killer,
            killer_actor,
            damage_option,
            death_message,
            cancelled: false,
        }
    }

    /// Entity that is about to die.
    pub const fn subject(&self) -> EntityId {
        self.subject
    }

    /// Display name of the subject.
    pub fn subject_name(&self) -> &str {
        &self.subject_name
    }

    /// Reportable cause of the death; [`DeathCause::Generic`] when there
    /// is no lethal entry.
    pub fn death_cause(&self) -> DeathCause {
        self.last_damage
            .as_ref()
            .map_or(DeathCause::Generic, CombatEntry::death_cause)
    }

    /// Phrasing selected for the death message.
    pub const fn damage_option(&self) -> DamageOption {
        self.damage_option
    }

    /// The lethal entry.
    ///
    /// The credited player can be present on the event while absent here:
    /// the last damage may be fire that a player pushed the subject into.
    pub const fn last_damage(&self) -> Option<&CombatEntry> {
        self.last_damage.as_ref()
    }

    /// Every entry leading up to the death, oldest first.
    pub fn combat_history(&self) -> &[CombatEntry] {
        &self.history
    }

    /// Item the subject was killed with.
    pub const fn weapon(&self) -> Option<&ItemStack> {
        self.weapon.as_ref()
    }

    /// Entity that dealt the lethal damage directly.
    pub const fn killer(&self) -> Option<&EntityRef> {
        self.killer.as_ref()
    }

    /// Player credited for the kill: the killer itself, the owner of the
    /// killer, or the last player the subject fought.
    pub const fn killer_actor(&self) -> Option<&EntityRef> {
        self.killer_actor.as_ref()
    }

    /// Items that will drop.
    pub fn drops(&self) -> &[Option<ItemStack>] {
        &self.drops
    }

    /// Mutable access to the drops. Clearing the list drops nothing.
    pub const fn drops_mut(&mut self) -> &mut Vec<Option<ItemStack>> {
        &mut self.drops
    }

    /// Current death message.
    pub fn death_message(&self) -> &str {
        &self.death_message
    }

    /// Replace the death message. The engine never broadcasts it; the
    /// host applies it when it confirms the death.
    pub fn set_death_message(&mut self, message: impl Into<String>) {
        self.death_message = message.into();
    }

    /// Whether a listener cancelled the death.
    pub const fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Cancel or un-cancel the death. A cancelled death leaves the subject
    /// alive and spawns the drops at its location.
    pub const fn set_cancelled(&mut self, cancelled: bool) {
        self.cancelled = cancelled;
    }

    /// Non-empty drops, consuming the event.
    pub fn into_drops(self) -> Vec<ItemStack> {
        self.drops.into_iter().flatten().collect()
    }
}
