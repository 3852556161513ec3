//! Death-cause translation: raw damage kinds to reportable death causes.
//!
//! Each [`DamageCause`] is mapped to a [`DeathCauseTranslator`] in a
//! [`TranslatorRegistry`] built once at startup. Dispatch is a table lookup
//! on the event's kind, so new translators can be registered without
//! touching the registry. A kind with no translator resolves to
//! [`DeathCause::Generic`].

use std::collections::BTreeMap;
use std::sync::Arc;

use combat_types::{DamageCause, DamageEvent, DamageOption, DeathCause};

/// Fall distance in blocks above which a fall reads as "from a high place".
pub const HIGH_FALL_DISTANCE: f64 = 5.0;

const PLAIN: &[DamageOption] = &[DamageOption::Plain];
const PLAIN_OR_FIGHTING: &[DamageOption] = &[DamageOption::Plain, DamageOption::WhilstFighting];
const PLAIN_OR_ITEM: &[DamageOption] = &[DamageOption::Plain, DamageOption::WithItem];
const ALL_OPTIONS: &[DamageOption] = &[
    DamageOption::Plain,
    DamageOption::WhilstFighting,
    DamageOption::WithItem,
];

/// Strategy converting one family of damage events into a death cause.
pub trait DeathCauseTranslator: core::fmt::Debug + Send + Sync {
    /// Classify the event.
    fn death_cause(&self, event: &DamageEvent) -> DeathCause;

    /// Options a death of `cause` can be phrased with. Empty when this
    /// translator never produces `cause`.
    fn damage_options(&self, cause: DeathCause) -> &'static [DamageOption];
}

/// Table of translators keyed by raw damage kind.
#[derive(Debug, Clone, Default)]
pub struct TranslatorRegistry {
    translators: BTreeMap<DamageCause, Arc<dyn DeathCauseTranslator>>,
}

impl TranslatorRegistry {
    /// Create a registry with no translators; everything resolves to
    /// [`DeathCause::Generic`].
    pub const fn new() -> Self {
        Self {
            translators: BTreeMap::new(),
        }
    }

    /// Create a registry with the built-in translators for every known
    /// damage kind except [`DamageCause::Dryout`] and
    /// [`DamageCause::Unknown`].
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(DamageCause::Fall, Arc::new(FallTranslator));
        registry.register_all(
            &[
                DamageCause::Fire,
                DamageCause::FireTick,
                DamageCause::Lava,
                DamageCause::HotFloor,
                DamageCause::Melting,
            ],
            &(Arc::new(FireTranslator) as Arc<dyn DeathCauseTranslator>),
        );
        registry.register_all(
            &[
                DamageCause::EntityAttack,
                DamageCause::EntitySweepAttack,
                DamageCause::Projectile,
                DamageCause::Thorns,
                DamageCause::SonicBoom,
            ],
            &(Arc::new(AttackTranslator) as Arc<dyn DeathCauseTranslator>),
        );
        registry.register_all(
            &[DamageCause::BlockExplosion, DamageCause::EntityExplosion],
            &(Arc::new(ExplosionTranslator) as Arc<dyn DeathCauseTranslator>),
        );
        let environment: Arc<dyn DeathCauseTranslator> = Arc::new(EnvironmentTranslator);
        for &(cause, _) in ENVIRONMENT_TABLE {
            registry.register(cause, Arc::clone(&environment));
        }
        registry
    }

    /// Register `translator` for `cause`, returning the translator it
    /// replaced.
    pub fn register(
        &mut self,
        cause: DamageCause,
        translator: Arc<dyn DeathCauseTranslator>,
    ) -> Option<Arc<dyn DeathCauseTranslator>> {
        self.translators.insert(cause, translator)
    }

    /// Register one translator for several kinds.
    pub fn register_all(
        &mut self,
        causes: &[DamageCause],
        translator: &Arc<dyn DeathCauseTranslator>,
    ) {
        for &cause in causes {
            self.translators.insert(cause, Arc::clone(translator));
        }
    }

    /// Whether a translator is registered for `cause`.
    pub fn is_registered(&self, cause: DamageCause) -> bool {
        self.translators.contains_key(&cause)
    }

    /// Classify a raw damage event.
    pub fn resolve(&self, event: &DamageEvent) -> DeathCause {
        self.translators
            .get(&event.cause)
            .map_or(DeathCause::Generic, |translator| translator.death_cause(event))
    }

    /// Options a death of `cause` can be phrased with.
    ///
    /// [`DeathCause::Generic`] always offers [`DamageOption::Plain`] and
    /// [`DamageOption::WhilstFighting`]; any other cause no registered
    /// translator produces yields an empty list.
    pub fn damage_options(&self, cause: DeathCause) -> Vec<DamageOption> {
        if cause == DeathCause::Generic {
            return PLAIN_OR_FIGHTING.to_vec();
        }
        self.translators
            .values()
            .map(|translator| translator.damage_options(cause))
            .find(|options| !options.is_empty())
            .map(<[DamageOption]>::to_vec)
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Built-in translators
// ---------------------------------------------------------------------------

/// Falls, split by height.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallTranslator;

impl DeathCauseTranslator for FallTranslator {
    fn death_cause(&self, event: &DamageEvent) -> DeathCause {
        if event.fall_distance > HIGH_FALL_DISTANCE {
            DeathCause::FellFromHigh
        } else {
            DeathCause::Fell
        }
    }

    fn damage_options(&self, cause: DeathCause) -> &'static [DamageOption] {
        match cause {
            DeathCause::Fell | DeathCause::FellFromHigh => PLAIN_OR_FIGHTING,
            _ => &[],
        }
    }
}

/// Fire blocks, burning, lava and magma.
#[derive(Debug, Clone, Copy, Default)]
pub struct FireTranslator;

impl DeathCauseTranslator for FireTranslator {
    fn death_cause(&self, event: &DamageEvent) -> DeathCause {
        match event.cause {
            DamageCause::Fire => DeathCause::InFire,
            DamageCause::Lava => DeathCause::Lava,
            DamageCause::HotFloor => DeathCause::HotFloor,
            _ => DeathCause::OnFire,
        }
    }

    fn damage_options(&self, cause: DeathCause) -> &'static [DamageOption] {
        match cause {
            DeathCause::InFire | DeathCause::OnFire | DeathCause::Lava | DeathCause::HotFloor => {
                PLAIN_OR_FIGHTING
            }
            _ => &[],
        }
    }
}

/// Melee, projectiles, thorns and sonic booms.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttackTranslator;

impl DeathCauseTranslator for AttackTranslator {
    fn death_cause(&self, event: &DamageEvent) -> DeathCause {
        match event.cause {
            DamageCause::Projectile => DeathCause::Shot,
            DamageCause::Thorns => DeathCause::Thorns,
            DamageCause::SonicBoom => DeathCause::SonicBoom,
            _ => DeathCause::Slain,
        }
    }

    fn damage_options(&self, cause: DeathCause) -> &'static [DamageOption] {
        match cause {
            DeathCause::Slain | DeathCause::Shot | DeathCause::Thorns => PLAIN_OR_ITEM,
            DeathCause::SonicBoom => PLAIN_OR_FIGHTING,
            _ => &[],
        }
    }
}

/// Block and entity explosions.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExplosionTranslator;

impl DeathCauseTranslator for ExplosionTranslator {
    fn death_cause(&self, _event: &DamageEvent) -> DeathCause {
        DeathCause::Explosion
    }

    fn damage_options(&self, cause: DeathCause) -> &'static [DamageOption] {
        if cause == DeathCause::Explosion {
            ALL_OPTIONS
        } else {
            &[]
        }
    }
}

/// One-to-one kinds with no payload-dependent classification.
const ENVIRONMENT_TABLE: &[(DamageCause, DeathCause)] = &[
    (DamageCause::Contact, DeathCause::Cactus),
    (DamageCause::Suffocation, DeathCause::InWall),
    (DamageCause::Drowning, DeathCause::Drowned),
    (DamageCause::Void, DeathCause::OutOfWorld),
    (DamageCause::Lightning, DeathCause::LightningBolt),
    (DamageCause::Suicide, DeathCause::Killed),
    (DamageCause::Starvation, DeathCause::Starve),
    (DamageCause::Poison, DeathCause::Magic),
    (DamageCause::Magic, DeathCause::Magic),
    (DamageCause::Wither, DeathCause::Wither),
    (DamageCause::FallingBlock, DeathCause::FallingBlock),
    (DamageCause::DragonBreath, DeathCause::DragonBreath),
    (DamageCause::Custom, DeathCause::Custom),
    (DamageCause::FlyIntoWall, DeathCause::FlyIntoWall),
    (DamageCause::Cramming, DeathCause::Cramming),
    (DamageCause::Freeze, DeathCause::Freeze),
    (DamageCause::Kill, DeathCause::Killed),
    (DamageCause::WorldBorder, DeathCause::OutsideBorder),
];

/// Environmental kinds resolved through a fixed table.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvironmentTranslator;

impl DeathCauseTranslator for EnvironmentTranslator {
    fn death_cause(&self, event: &DamageEvent) -> DeathCause {
        ENVIRONMENT_TABLE
            .iter()
            .find(|(cause, _)| *cause == event.cause)
            .map_or(DeathCause::Generic, |&(_, death)| death)
    }

    fn damage_options(&self, cause: DeathCause) -> &'static [DamageOption] {
        match cause {
            DeathCause::Killed | DeathCause::Custom => PLAIN,
            other if ENVIRONMENT_TABLE.iter().any(|&(_, death)| death == other) => {
                PLAIN_OR_FIGHTING
            }
            _ => &[],
        }
    }
}
