//! Enumeration types for damage and death classification.
//!
//! [`DamageCause`] is the raw vocabulary the host simulation reports with
//! every damage notification. [`DeathCause`] is the coarser, user-facing
//! vocabulary a death is reported with. [`DamageOption`] discriminates the
//! variants of a single death cause (plain, whilst fighting, with an item).

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Raw damage kinds
// ---------------------------------------------------------------------------

/// How damage was inflicted, as reported by the host simulation.
///
/// Kinds the engine does not know deserialize to [`DamageCause::Unknown`]
/// instead of failing, and resolve to [`DeathCause::Generic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DamageCause {
    /// Touching a damaging block (cactus, berry bush, dripstone).
    Contact,
    /// Melee attack by an entity.
    EntityAttack,
    /// Sweep attack splash from an entity's melee swing.
    EntitySweepAttack,
    /// Hit by a projectile (arrow, trident, snowball).
    Projectile,
    /// Stuck inside a solid block.
    Suffocation,
    /// Landing after a fall.
    Fall,
    /// Standing in a fire block.
    Fire,
    /// Burning after being set on fire.
    FireTick,
    /// Melting (snow golems in warm biomes).
    Melting,
    /// Standing in lava.
    Lava,
    /// Running out of air underwater.
    Drowning,
    /// Explosion of a block (bed, respawn anchor).
    BlockExplosion,
    /// Explosion of an entity (creeper, primed TNT, fireball).
    EntityExplosion,
    /// Falling out of the world.
    Void,
    /// Struck by lightning.
    Lightning,
    /// Self-inflicted.
    Suicide,
    /// Starvation from an empty hunger bar.
    Starvation,
    /// Poison effect.
    Poison,
    /// Instant damage potion or other magic.
    Magic,
    /// Wither effect.
    Wither,
    /// Hit by a falling block (anvil, stalactite).
    FallingBlock,
    /// Reflected damage from thorns.
    Thorns,
    /// Dragon breath cloud.
    DragonBreath,
    /// Damage injected by a plugin or script.
    Custom,
    /// Flying into a wall with an elytra.
    FlyIntoWall,
    /// Standing on a magma block.
    HotFloor,
    /// Crushed by entity cramming.
    Cramming,
    /// Water mob out of water.
    Dryout,
    /// Freezing in powder snow.
    Freeze,
    /// Warden sonic boom.
    SonicBoom,
    /// Kill command.
    Kill,
    /// Outside the world border.
    WorldBorder,
    /// Any kind this engine does not recognise.
    #[serde(other)]
    Unknown,
}

impl DamageCause {
    /// Whether the host attaches a direct attacker entity to this kind.
    pub const fn is_entity_damage(self) -> bool {
        matches!(
            self,
            Self::EntityAttack
                | Self::EntitySweepAttack
                | Self::Projectile
                | Self::EntityExplosion
                | Self::Thorns
                | Self::SonicBoom
        )
    }
}

// ---------------------------------------------------------------------------
// Reportable death causes
// ---------------------------------------------------------------------------

/// The reportable cause of a death.
///
/// Several raw [`DamageCause`] kinds collapse into one death cause, e.g. a
/// melee hit and a sweep hit both resolve to [`DeathCause::Slain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DeathCause {
    /// No combat entry or no registered translator.
    Generic,
    /// Fell a short distance.
    Fell,
    /// Fell from a high place.
    FellFromHigh,
    /// Walked into a fire block.
    InFire,
    /// Burned to death after being set alight.
    OnFire,
    /// Swam in lava.
    Lava,
    /// Walked on a magma block.
    HotFloor,
    /// Drowned.
    Drowned,
    /// Suffocated in a wall.
    InWall,
    /// Squished by cramming.
    Cramming,
    /// Blew up.
    Explosion,
    /// Fell out of the world.
    OutOfWorld,
    /// Struck by lightning.
    LightningBolt,
    /// Starved to death.
    Starve,
    /// Killed by magic.
    Magic,
    /// Withered away.
    Wither,
    /// Pricked to death by a contact block.
    Cactus,
    /// Killed while trying to hurt a thorned entity.
    Thorns,
    /// Squashed by a falling block.
    FallingBlock,
    /// Roasted in dragon breath.
    DragonBreath,
    /// Experienced kinetic energy.
    FlyIntoWall,
    /// Froze to death.
    Freeze,
    /// Obliterated by a sonic boom.
    SonicBoom,
    /// Slain in melee by an entity.
    Slain,
    /// Shot by a projectile.
    Shot,
    /// Killed outside the world border.
    OutsideBorder,
    /// Removed by a kill command or self-inflicted damage.
    Killed,
    /// Died to scripted damage.
    Custom,
}

impl DeathCause {
    /// Whether this cause needs an attacker entity to read naturally.
    pub const fn requires_killer(self) -> bool {
        matches!(self, Self::Slain | Self::Shot | Self::Thorns | Self::SonicBoom)
    }
}

impl core::fmt::Display for DeathCause {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::Generic => "generic",
            Self::Fell => "fall",
            Self::FellFromHigh => "fall_high",
            Self::InFire => "in_fire",
            Self::OnFire => "on_fire",
            Self::Lava => "lava",
            Self::HotFloor => "hot_floor",
            Self::Drowned => "drown",
            Self::InWall => "in_wall",
            Self::Cramming => "cramming",
            Self::Explosion => "explosion",
            Self::OutOfWorld => "out_of_world",
            Self::LightningBolt => "lightning_bolt",
            Self::Starve => "starve",
            Self::Magic => "magic",
            Self::Wither => "wither",
            Self::Cactus => "cactus",
            Self::Thorns => "thorns",
            Self::FallingBlock => "falling_block",
            Self::DragonBreath => "dragon_breath",
            Self::FlyIntoWall => "fly_into_wall",
            Self::Freeze => "freeze",
            Self::SonicBoom => "sonic_boom",
            Self::Slain => "mob",
            Self::Shot => "arrow",
            Self::OutsideBorder => "outside_border",
            Self::Killed => "kill",
            Self::Custom => "custom",
        };
        f.write_str(name)
    }
}

/// Variant of a death cause, picking which phrasing of the death applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DamageOption {
    /// Nobody else was involved ("burned to death").
    Plain,
    /// Another entity is credited ("walked into fire whilst fighting P").
    WhilstFighting,
    /// The credited entity used a named item ("was slain by P using Blade").
    WithItem,
}

// ---------------------------------------------------------------------------
// Entity kinds
// ---------------------------------------------------------------------------

/// Coarse kind of an entity involved in combat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// A connected player.
    Player,
    /// A living non-player entity (mob, pet).
    Creature,
    /// An arrow, trident, fireball or other thrown object.
    Projectile,
    /// Primed TNT, end crystal and other explosives.
    Explosive,
    /// Lingering clouds, evoker fangs and similar effect entities.
    AreaEffect,
    /// Anything else.
    #[serde(other)]
    Other,
}
