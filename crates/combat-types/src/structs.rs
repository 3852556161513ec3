//! Value types exchanged with the host simulation.
//!
//! Everything here is owned by the host: the engine receives these values
//! in notifications, copies what it needs into its combat log, and hands
//! them back in commands. None of them carry behaviour beyond small
//! accessors.

use serde::{Deserialize, Serialize};

use crate::enums::{DamageCause, EntityKind};
use crate::ids::{EntityId, WorldId};

// ---------------------------------------------------------------------------
// Positions and items
// ---------------------------------------------------------------------------

/// A point in a host world.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// World (dimension) the point lies in.
    pub world: WorldId,
    /// East-west coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
    /// North-south coordinate.
    pub z: f64,
}

impl Location {
    /// Create a location in `world`.
    pub const fn new(world: WorldId, x: f64, y: f64, z: f64) -> Self {
        Self { world, x, y, z }
    }
}

/// A stack of items as the host reports it.
///
/// Two stacks are the same drop when material, amount and display name all
/// match; drop reconciliation relies on this equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemStack {
    /// Material identifier, e.g. `diamond_sword`.
    pub material: String,
    /// Number of items in the stack.
    pub amount: u32,
    /// Custom display name, if the item was renamed.
    #[serde(default)]
    pub display_name: Option<String>,
}

impl ItemStack {
    /// Create an unnamed stack.
    pub fn new(material: impl Into<String>, amount: u32) -> Self {
        Self {
            material: material.into(),
            amount,
            display_name: None,
        }
    }

    /// Attach a custom display name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Name shown in death messages: the display name, else the material.
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.material)
    }
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// A snapshot of an entity involved in a damage event.
///
/// `owner` links owned entities to whoever controls them: an arrow to its
/// shooter, primed TNT to its igniter, a wolf to its tamer. The chain is
/// finite because each link is boxed by value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    /// Host identifier of the entity.
    pub id: EntityId,
    /// Coarse kind of the entity.
    pub kind: EntityKind,
    /// Display name used in death messages.
    pub name: String,
    /// Item in the entity's main hand when the snapshot was taken.
    #[serde(default)]
    pub held_item: Option<ItemStack>,
    /// Entity that owns or launched this one.
    #[serde(default)]
    pub owner: Option<Box<EntityRef>>,
}

impl EntityRef {
    /// Snapshot of a player.
    pub fn player(id: EntityId, name: impl Into<String>) -> Self {
        Self::new(id, EntityKind::Player, name)
    }

    /// Snapshot of an entity of any kind.
    pub fn new(id: EntityId, kind: EntityKind, name: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            name: name.into(),
            held_item: None,
            owner: None,
        }
    }

    /// Set the held item.
    #[must_use]
    pub fn holding(mut self, item: ItemStack) -> Self {
        self.held_item = Some(item);
        self
    }

    /// Set the owner.
    #[must_use]
    pub fn owned_by(mut self, owner: Self) -> Self {
        self.owner = Some(Box::new(owner));
        self
    }

    /// Whether this entity is a player.
    pub const fn is_player(&self) -> bool {
        matches!(self.kind, EntityKind::Player)
    }

    /// First player on the owner chain, starting with this entity itself.
    pub fn responsible_player(&self) -> Option<&Self> {
        let mut current = Some(self);
        while let Some(entity) = current {
            if entity.is_player() {
                return Some(entity);
            }
            current = entity.owner.as_deref();
        }
        None
    }
}

// ---------------------------------------------------------------------------
// Damage notifications
// ---------------------------------------------------------------------------

/// What dealt the damage.
///
/// The host reports damage in three shapes, each with its own payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageSource {
    /// No entity or block is attached (starvation, void, drowning).
    #[default]
    Environment,
    /// An entity dealt the damage directly.
    Entity(EntityRef),
    /// A block dealt the damage (fire, lava, cactus, magma).
    Block {
        /// Material of the damaging block.
        material: String,
        /// Entity that placed or ignited the block, when known.
        #[serde(default)]
        placed_by: Option<EntityRef>,
    },
}

impl DamageSource {
    /// The entity that dealt the damage directly, if any.
    pub const fn direct_entity(&self) -> Option<&EntityRef> {
        match self {
            Self::Entity(entity) => Some(entity),
            Self::Environment | Self::Block { .. } => None,
        }
    }

    /// The player credited for this damage, following owner chains and
    /// block placers.
    pub fn responsible_player(&self) -> Option<&EntityRef> {
        match self {
            Self::Environment => None,
            Self::Entity(entity) => entity.responsible_player(),
            Self::Block { placed_by, .. } => {
                placed_by.as_ref().and_then(EntityRef::responsible_player)
            }
        }
    }
}

/// A damage notification from the host.
///
/// `damage` is the raw amount, `final_damage` the amount after armour and
/// effects. The engine mutates the event only to suppress it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageEvent {
    /// Entity receiving the damage.
    pub target: EntityId,
    /// Raw damage kind.
    pub cause: DamageCause,
    /// What dealt the damage.
    #[serde(default)]
    pub source: DamageSource,
    /// Raw damage amount.
    pub damage: f64,
    /// Damage amount after reductions.
    pub final_damage: f64,
    /// Fall distance in blocks, meaningful for [`DamageCause::Fall`].
    #[serde(default)]
    pub fall_distance: f64,
    /// Set when another system already cancelled the damage.
    #[serde(default)]
    pub cancelled: bool,
}

impl DamageEvent {
    /// Create an environment-sourced event whose final damage equals the
    /// raw damage.
    pub const fn new(target: EntityId, cause: DamageCause, damage: f64) -> Self {
        Self {
            target,
            cause,
            source: DamageSource::Environment,
            damage,
            final_damage: damage,
            fall_distance: 0.0,
            cancelled: false,
        }
    }

    /// Set the damage source.
    #[must_use]
    pub fn with_source(mut self, source: DamageSource) -> Self {
        self.source = source;
        self
    }

    /// Set the post-reduction damage amount.
    #[must_use]
    pub const fn with_final_damage(mut self, final_damage: f64) -> Self {
        self.final_damage = final_damage;
        self
    }

    /// Set the fall distance.
    #[must_use]
    pub const fn with_fall_distance(mut self, fall_distance: f64) -> Self {
        self.fall_distance = fall_distance;
        self
    }

    /// Zero out the damage so the host applies nothing.
    pub const fn suppress(&mut self) {
        self.damage = 0.0;
        self.final_damage = 0.0;
    }
}

/// The host's own, non-cancellable death notification.
///
/// The engine rewrites `message` and `drops` in place when it owns the
/// death; the host then applies whatever is left.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeathNotice {
    /// Entity that died.
    pub entity: EntityId,
    /// Death message the host would broadcast.
    pub message: String,
    /// Items the host would drop.
    pub drops: Vec<ItemStack>,
}
