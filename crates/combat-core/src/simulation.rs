//! The host simulation boundary.
//!
//! The engine never owns entity health, inventories or the world. It reads
//! them through [`Simulation`] and changes them only by issuing commands
//! through the same trait. The host is free to apply those commands
//! immediately or later; the engine makes no assumption either way.
//!
//! [`MemorySimulation`] is an in-memory host used by the replay binary and
//! by tests. It applies commands immediately and queues the death notices a
//! real host would raise when health reaches zero.

use std::collections::BTreeMap;

use combat_types::{DamageEvent, DeathNotice, EntityId, ItemStack, Location};

/// Read access to, and commands against, the host simulation.
pub trait Simulation {
    /// Display name of `entity`.
    fn name(&self, entity: EntityId) -> Option<String>;

    /// Current health of `entity`.
    fn health(&self, entity: EntityId) -> Option<f64>;

    /// Current location of `entity`.
    fn location(&self, entity: EntityId) -> Option<Location>;

    /// Inventory contents of `entity`; empty slots are `None`.
    fn inventory(&self, entity: EntityId) -> Vec<Option<ItemStack>>;

    /// Command: set the health of `entity`. Setting zero kills it through
    /// the host's own death path.
    fn set_health(&mut self, entity: EntityId, health: f64);

    /// Command: drop `item` into the world at `location`.
    fn spawn_item(&mut self, location: &Location, item: ItemStack);
}

/// A command the engine issued to a [`MemorySimulation`].
#[derive(Debug, Clone, PartialEq)]
pub enum SimCommand {
    /// Health of an entity was set.
    SetHealth {
        /// Entity whose health changed.
        entity: EntityId,
        /// New health value.
        health: f64,
    },
    /// An item was dropped into the world.
    SpawnItem {
        /// Where the item was dropped.
        location: Location,
        /// The dropped item.
        item: ItemStack,
    },
}

/// An entity living in a [`MemorySimulation`].
#[derive(Debug, Clone, PartialEq)]
pub struct SimEntity {
    /// Display name.
    pub name: String,
    /// Current health; the entity dies when it reaches zero.
    pub health: f64,
    /// Current location.
    pub location: Location,
    /// Inventory slots.
    pub inventory: Vec<Option<ItemStack>>,
}

/// In-memory host simulation.
#[derive(Debug, Clone, Default)]
pub struct MemorySimulation {
    entities: BTreeMap<EntityId, SimEntity>,
    commands: Vec<SimCommand>,
    deaths: Vec<DeathNotice>,
}

impl MemorySimulation {
    /// Create an empty world.
    pub const fn new() -> Self {
        Self {
            entities: BTreeMap::new(),
            commands: Vec::new(),
            deaths: Vec::new(),
        }
    }

    /// Add an entity, replacing any previous one with the same id.
    pub fn spawn(&mut self, id: EntityId, entity: SimEntity) {
        self.entities.insert(id, entity);
    }

    /// Remove an entity.
    pub fn despawn(&mut self, id: EntityId) -> Option<SimEntity> {
        self.entities.remove(&id)
    }

    /// Look up an entity.
    pub fn entity(&self, id: EntityId) -> Option<&SimEntity> {
        self.entities.get(&id)
    }

    /// Mutable access to an entity.
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut SimEntity> {
        self.entities.get_mut(&id)
    }

    /// Apply whatever damage is left on `event` after the engine saw it,
    /// as the host would once every listener has run.
    pub fn apply_damage(&mut self, event: &DamageEvent) {
        if event.cancelled || event.final_damage <= 0.0 {
            return;
        }
        let Some(entity) = self.entities.get_mut(&event.target) else {
            return;
        };
        if entity.health <= 0.0 {
            return;
        }
        entity.health = (entity.health - event.final_damage).max(0.0);
        if entity.health <= 0.0 {
            self.queue_death(event.target);
        }
    }

    /// Commands issued so far, oldest first.
    pub fn commands(&self) -> &[SimCommand] {
        &self.commands
    }

    /// Drain the command log.
    pub fn take_commands(&mut self) -> Vec<SimCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Drain the death notices raised since the last call.
    pub fn take_deaths(&mut self) -> Vec<DeathNotice> {
        std::mem::take(&mut self.deaths)
    }

    /// Items spawned into the world so far.
    pub fn spawned_items(&self) -> impl Iterator<Item = &ItemStack> {
        self.commands.iter().filter_map(|command| match command {
            SimCommand::SpawnItem { item, .. } => Some(item),
            SimCommand::SetHealth { .. } => None,
        })
    }

    /// Raise the host's default death notice and empty the inventory.
    fn queue_death(&mut self, id: EntityId) {
        let Some(entity) = self.entities.get_mut(&id) else {
            return;
        };
        let drops = std::mem::take(&mut entity.inventory)
            .into_iter()
            .flatten()
            .collect();
        self.deaths.push(DeathNotice {
            entity: id,
            message: format!("{} died", entity.name),
            drops,
        });
    }
}

impl Simulation for MemorySimulation {
    fn name(&self, entity: EntityId) -> Option<String> {
        self.entities.get(&entity).map(|e| e.name.clone())
    }

    fn health(&self, entity: EntityId) -> Option<f64> {
        self.entities.get(&entity).map(|e| e.health)
    }

    fn location(&self, entity: EntityId) -> Option<Location> {
        self.entities.get(&entity).map(|e| e.location)
    }

    fn inventory(&self, entity: EntityId) -> Vec<Option<ItemStack>> {
        self.entities
            .get(&entity)
            .map(|e| e.inventory.clone())
            .unwrap_or_default()
    }

    fn set_health(&mut self, entity: EntityId, health: f64) {
        self.commands.push(SimCommand::SetHealth { entity, health });
        let Some(record) = self.entities.get_mut(&entity) else {
            return;
        };
        let was_alive = record.health > 0.0;
        record.health = health.max(0.0);
        if was_alive && record.health <= 0.0 {
            self.queue_death(entity);
        }
    }

    fn spawn_item(&mut self, location: &Location, item: ItemStack) {
        self.commands.push(SimCommand::SpawnItem {
            location: *location,
            item,
        });
    }
}
