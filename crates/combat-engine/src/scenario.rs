//! Scenario files: a cast of entities and a script of host notifications.
//!
//! ```yaml
//! entities:
//!   - name: Alex
//!     inventory:
//!       - { material: apple, amount: 3 }
//!   - name: Steve
//!     held_item: { material: diamond_sword, amount: 1, display_name: Bane }
//!   - name: Wolf
//!     kind: Creature
//!     owner: Steve
//! listeners:
//!   cancel_deaths: false
//! steps:
//!   - action: join
//!     entity: Alex
//!   - action: damage
//!     target: Alex
//!     cause: EntityAttack
//!     amount: 6
//!     source: Wolf
//!   - action: tick
//!     count: 20
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use combat_types::{
    DamageCause, DamageEvent, DamageSource, EntityId, EntityKind, EntityRef, ItemStack, Location,
    WorldId,
};
use serde::Deserialize;

/// Errors raised while loading or resolving a scenario.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    /// Failed to read the scenario file.
    #[error("failed to read scenario file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse scenario YAML.
    #[error("failed to parse scenario YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A step or owner link names an entity the cast does not declare.
    #[error("unknown entity: {name}")]
    UnknownEntity {
        /// The name that failed to resolve.
        name: String,
    },

    /// Two cast members share a name.
    #[error("duplicate entity: {name}")]
    DuplicateEntity {
        /// The repeated name.
        name: String,
    },

    /// An owner chain loops back on itself.
    #[error("owner chain of {name} is cyclic")]
    OwnerCycle {
        /// Entity whose chain loops.
        name: String,
    },
}

impl From<serde_yml::Error> for ScenarioError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// A complete scenario document.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    /// Every entity the script may mention.
    #[serde(default)]
    pub entities: Vec<EntitySpec>,

    /// Scripted death listeners.
    #[serde(default)]
    pub listeners: ListenerSpec,

    /// Run the background tick task during the replay. `wait` steps then
    /// let real time pass instead of being skipped.
    #[serde(default)]
    pub realtime_ticks: bool,

    /// Notifications to deliver, in order.
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Scenario {
    /// Load a scenario from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Io`] if the file cannot be read or
    /// [`ScenarioError::Yaml`] if it does not parse.
    pub fn from_file(path: &Path) -> Result<Self, ScenarioError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse a scenario from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Yaml`] if the string does not parse.
    pub fn parse(yaml: &str) -> Result<Self, ScenarioError> {
        Ok(serde_yml::from_str(yaml)?)
    }
}

/// One cast member.
#[derive(Debug, Clone, Deserialize)]
pub struct EntitySpec {
    /// Unique name, also the display name.
    pub name: String,

    /// Kind of entity (default: `Player`).
    #[serde(default = "default_kind")]
    pub kind: EntityKind,

    /// Starting health (default: 20).
    #[serde(default = "default_health")]
    pub health: f64,

    /// Starting position in the scenario world.
    #[serde(default)]
    pub position: [f64; 3],

    /// Inventory contents.
    #[serde(default)]
    pub inventory: Vec<ItemStack>,

    /// Item held in the main hand.
    #[serde(default)]
    pub held_item: Option<ItemStack>,

    /// Name of the entity that owns or launched this one.
    #[serde(default)]
    pub owner: Option<String>,
}

/// Listeners registered before the script runs, in field order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListenerSpec {
    /// Cancel every death.
    #[serde(default)]
    pub cancel_deaths: bool,

    /// Replace every death message. `{victim}` is substituted.
    #[serde(default)]
    pub death_message: Option<String>,

    /// Remove every drop.
    #[serde(default)]
    pub clear_drops: bool,
}

/// One host notification or engine call.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// The entity joins the tracked population.
    Join {
        /// Entity name.
        entity: String,
    },
    /// The entity leaves the tracked population.
    Leave {
        /// Entity name.
        entity: String,
    },
    /// The host reports damage.
    Damage(DamageSpec),
    /// Scripted damage through the engine's synthetic API.
    Synthetic {
        /// Entity name.
        target: String,
        /// Raw damage kind.
        cause: DamageCause,
        /// Damage amount.
        amount: f64,
    },
    /// Kill the entity directly.
    Kill {
        /// Entity name.
        target: String,
        /// Hand the death to the host's death path (default: true).
        #[serde(default = "default_delegate")]
        delegate: bool,
    },
    /// Advance every tracker by `count` ticks.
    Tick {
        /// Number of ticks.
        #[serde(default = "default_tick_count")]
        count: u64,
    },
    /// Let real time pass for the background tick task.
    Wait {
        /// Milliseconds to wait.
        millis: u64,
    },
}

/// A host damage notification.
#[derive(Debug, Clone, Deserialize)]
pub struct DamageSpec {
    /// Entity taking the damage.
    pub target: String,
    /// Raw damage kind.
    pub cause: DamageCause,
    /// Raw damage amount.
    pub amount: f64,
    /// Amount after armour; defaults to `amount`.
    #[serde(default)]
    pub final_amount: Option<f64>,
    /// Entity that dealt the damage directly.
    #[serde(default)]
    pub source: Option<String>,
    /// Material of the block that dealt the damage.
    #[serde(default)]
    pub block: Option<String>,
    /// Entity that placed `block`.
    #[serde(default)]
    pub placed_by: Option<String>,
    /// Blocks fallen before landing.
    #[serde(default)]
    pub fall_distance: f64,
    /// Already cancelled by an earlier host listener.
    #[serde(default)]
    pub cancelled: bool,
}

const fn default_kind() -> EntityKind {
    EntityKind::Player
}

const fn default_health() -> f64 {
    20.0
}

const fn default_delegate() -> bool {
    true
}

const fn default_tick_count() -> u64 {
    1
}

/// The cast with ids assigned, placed in one world.
#[derive(Debug)]
pub struct Cast {
    world: WorldId,
    members: BTreeMap<String, (EntityId, EntitySpec)>,
}

impl Cast {
    /// Assign ids to every cast member and check owner links.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::DuplicateEntity`] for a repeated name,
    /// [`ScenarioError::UnknownEntity`] for a dangling owner, or
    /// [`ScenarioError::OwnerCycle`] for a looping owner chain.
    pub fn new(specs: &[EntitySpec]) -> Result<Self, ScenarioError> {
        let mut members = BTreeMap::new();
        for spec in specs {
            if members
                .insert(spec.name.clone(), (EntityId::new(), spec.clone()))
                .is_some()
            {
                return Err(ScenarioError::DuplicateEntity {
                    name: spec.name.clone(),
                });
            }
        }
        let cast = Self {
            world: WorldId::new(),
            members,
        };
        for name in cast.members.keys() {
            cast.entity_ref(name)?;
        }
        Ok(cast)
    }

    /// Id of the named member.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::UnknownEntity`] if no member has `name`.
    pub fn id(&self, name: &str) -> Result<EntityId, ScenarioError> {
        self.spec(name).map(|(id, _)| *id)
    }

    /// Name of the member with `id`.
    pub fn name_of(&self, id: EntityId) -> Option<&str> {
        self.members
            .iter()
            .find(|(_, (member, _))| *member == id)
            .map(|(name, _)| name.as_str())
    }

    /// Every member in name order.
    pub fn members(&self) -> impl Iterator<Item = (EntityId, &EntitySpec)> {
        self.members.values().map(|(id, spec)| (*id, spec))
    }

    /// Location of a member in the scenario world.
    pub const fn location(&self, spec: &EntitySpec) -> Location {
        let [x, y, z] = spec.position;
        Location::new(self.world, x, y, z)
    }

    /// Snapshot of the named member with its owner chain.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::UnknownEntity`] for a dangling name or
    /// [`ScenarioError::OwnerCycle`] for a looping chain.
    pub fn entity_ref(&self, name: &str) -> Result<EntityRef, ScenarioError> {
        let mut chain = Vec::new();
        let mut next = Some(name);
        while let Some(current) = next {
            if chain.len() > self.members.len() {
                return Err(ScenarioError::OwnerCycle {
                    name: name.to_owned(),
                });
            }
            let (id, spec) = self.spec(current)?;
            let mut snapshot = EntityRef::new(*id, spec.kind, spec.name.clone());
            snapshot.held_item.clone_from(&spec.held_item);
            chain.push(snapshot);
            next = spec.owner.as_deref();
        }

        let mut links = chain.into_iter().rev();
        let root = links.next().ok_or_else(|| ScenarioError::UnknownEntity {
            name: name.to_owned(),
        })?;
        Ok(links.fold(root, |owner, entity| entity.owned_by(owner)))
    }

    /// Build the host damage event for `spec`.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::UnknownEntity`] if a named entity is not in
    /// the cast.
    pub fn damage_event(&self, spec: &DamageSpec) -> Result<DamageEvent, ScenarioError> {
        let source = match (&spec.source, &spec.block) {
            (Some(source), _) => DamageSource::Entity(self.entity_ref(source)?),
            (None, Some(material)) => DamageSource::Block {
                material: material.clone(),
                placed_by: spec
                    .placed_by
                    .as_deref()
                    .map(|name| self.entity_ref(name))
                    .transpose()?,
            },
            (None, None) => DamageSource::Environment,
        };

        let mut event = DamageEvent::new(self.id(&spec.target)?, spec.cause, spec.amount)
            .with_source(source)
            .with_fall_distance(spec.fall_distance);
        if let Some(final_amount) = spec.final_amount {
            event = event.with_final_damage(final_amount);
        }
        event.cancelled = spec.cancelled;
        Ok(event)
    }

    fn spec(&self, name: &str) -> Result<&(EntityId, EntitySpec), ScenarioError> {
        self.members
            .get(name)
            .ok_or_else(|| ScenarioError::UnknownEntity {
                name: name.to_owned(),
            })
    }
}
