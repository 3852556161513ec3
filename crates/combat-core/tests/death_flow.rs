//! End-to-end death handshake tests.
//!
//! Each test drives a [`CombatManager`] against a [`MemorySimulation`] the
//! way a host would: deliver the damage notification, apply whatever
//! damage survives it, then deliver any death notices the host raised.

#![allow(clippy::unwrap_used)]

use combat_core::{
    CancelAll, CombatError, CombatManager, DamageOutcome, DeathOutcome, MemorySimulation,
    Reconciliation, SimCommand, SimEntity, Simulation,
};
use combat_tracker::{CombatDeathEvent, TrackerConfig, TranslatorRegistry};
use combat_types::{
    DamageCause, DamageEvent, DamageSource, DeathCause, DeathNotice, EntityId, EntityKind,
    EntityRef, ItemStack, Location, WorldId,
};

struct Arena {
    manager: CombatManager,
    sim: MemorySimulation,
    alex: EntityId,
    steve: EntityId,
}

impl Arena {
    fn new() -> Self {
        let manager =
            CombatManager::new(TrackerConfig::default(), TranslatorRegistry::with_defaults())
                .unwrap();
        let mut sim = MemorySimulation::new();
        let world = WorldId::new();
        let alex = EntityId::new();
        let steve = EntityId::new();

        sim.spawn(
            alex,
            SimEntity {
                name: String::from("Alex"),
                health: 20.0,
                location: Location::new(world, 10.0, 64.0, -4.0),
                inventory: vec![
                    Some(ItemStack::new("apple", 3)),
                    None,
                    Some(ItemStack::new("iron_pickaxe", 1)),
                ],
            },
        );
        sim.spawn(
            steve,
            SimEntity {
                name: String::from("Steve"),
                health: 20.0,
                location: Location::new(world, 12.0, 64.0, -4.0),
                inventory: Vec::new(),
            },
        );

        let mut arena = Self {
            manager,
            sim,
            alex,
            steve,
        };
        arena.manager.on_join(alex);
        arena.manager.on_join(steve);
        arena
    }

    fn steve_ref(&self) -> EntityRef {
        EntityRef::player(self.steve, "Steve")
    }

    /// Deliver `event` to the manager, then let the host apply what is
    /// left of it and confirm any deaths.
    fn hit(&mut self, mut event: DamageEvent) -> (DamageOutcome, Vec<(DeathNotice, Reconciliation)>) {
        let outcome = self.manager.on_damage(&mut self.sim, &mut event);
        self.sim.apply_damage(&event);
        let deaths = self
            .sim
            .take_deaths()
            .into_iter()
            .map(|mut notice| {
                let reconciliation = self.manager.on_authoritative_death(&mut notice);
                (notice, reconciliation)
            })
            .collect();
        (outcome, deaths)
    }
}

#[test]
fn survivable_damage_is_recorded_and_applied() {
    let mut arena = Arena::new();
    let (outcome, deaths) = arena.hit(DamageEvent::new(arena.alex, DamageCause::Lava, 4.0));

    assert_eq!(outcome, DamageOutcome::Recorded);
    assert!(deaths.is_empty());
    assert_eq!(arena.sim.health(arena.alex), Some(16.0));
    assert!(arena.manager.is_in_combat(arena.alex));
    assert_eq!(arena.manager.tracker(arena.alex).unwrap().len(), 1);
}

#[test]
fn delegated_death_replaces_message_and_drops() {
    let mut arena = Arena::new();
    arena
        .manager
        .register_listener(|event: &mut CombatDeathEvent| {
            event.set_death_message("Alex had a bad day");
            event
                .drops_mut()
                .retain(|item| item.as_ref().is_none_or(|item| item.material != "iron_pickaxe"));
            event.drops_mut().push(Some(ItemStack::new("trophy", 1)));
        });

    let (outcome, deaths) = arena.hit(DamageEvent::new(arena.alex, DamageCause::Drowning, 25.0));

    assert_eq!(outcome, DamageOutcome::Killed(DeathOutcome::Delegated));
    assert_eq!(deaths.len(), 1);
    let (notice, reconciliation) = deaths.first().unwrap();
    assert_eq!(*reconciliation, Reconciliation::Applied);
    assert_eq!(notice.entity, arena.alex);
    assert_eq!(notice.message, "Alex had a bad day");
    assert_eq!(
        notice.drops,
        vec![ItemStack::new("apple", 3), ItemStack::new("trophy", 1)]
    );

    assert!(arena.manager.pending_death(arena.alex).is_none());
    assert!(!arena.manager.is_in_combat(arena.alex));
    assert_eq!(arena.sim.spawned_items().count(), 0);
}

#[test]
fn delegated_death_without_listeners_uses_rendered_message() {
    let mut arena = Arena::new();
    let sword = ItemStack::new("diamond_sword", 1).named("Bane");
    let source = DamageSource::Entity(arena.steve_ref().holding(sword));

    let (outcome, deaths) = arena.hit(
        DamageEvent::new(arena.alex, DamageCause::EntityAttack, 30.0).with_source(source),
    );

    assert_eq!(outcome, DamageOutcome::Killed(DeathOutcome::Delegated));
    let (notice, _) = deaths.first().unwrap();
    assert_eq!(notice.message, "Alex was slain by Steve using Bane");
    assert_eq!(
        notice.drops,
        vec![ItemStack::new("apple", 3), ItemStack::new("iron_pickaxe", 1)]
    );
}

#[test]
fn cancelled_death_keeps_entity_alive_and_drops_once() {
    let mut arena = Arena::new();
    arena.manager.register_listener(CancelAll);

    let death_location = arena.sim.location(arena.alex).unwrap();

    let (outcome, deaths) = arena.hit(DamageEvent::new(arena.alex, DamageCause::Lava, 25.0));

    assert_eq!(
        outcome,
        DamageOutcome::Killed(DeathOutcome::Cancelled { dropped: 2 })
    );
    assert!(deaths.is_empty());
    assert_eq!(arena.sim.health(arena.alex), Some(20.0));
    let spawned: Vec<_> = arena
        .sim
        .commands()
        .iter()
        .filter(|command| matches!(command, SimCommand::SpawnItem { .. }))
        .cloned()
        .collect();
    assert_eq!(
        spawned,
        vec![
            SimCommand::SpawnItem {
                location: death_location,
                item: ItemStack::new("apple", 3),
            },
            SimCommand::SpawnItem {
                location: death_location,
                item: ItemStack::new("iron_pickaxe", 1),
            },
        ]
    );
    assert!(arena.manager.tracker(arena.alex).unwrap().is_empty());
    assert!(arena.manager.pending_death(arena.alex).is_none());
}

#[test]
fn repeated_delegated_kill_keeps_only_newest_pending_death() {
    let mut arena = Arena::new();
    let mut resolved = 0_u32;
    arena
        .manager
        .register_listener(move |event: &mut CombatDeathEvent| {
            resolved = resolved.saturating_add(1);
            event.set_death_message(format!("Alex fell (resolution {resolved})"));
        });

    let first = arena.manager.kill_player(&mut arena.sim, arena.alex, true);
    let second = arena.manager.kill_player(&mut arena.sim, arena.alex, true);

    assert_eq!(first.unwrap(), DeathOutcome::Delegated);
    assert_eq!(second.unwrap(), DeathOutcome::Delegated);
    assert_eq!(
        arena
            .manager
            .pending_death(arena.alex)
            .map(CombatDeathEvent::death_message),
        Some("Alex fell (resolution 2)")
    );

    // The host raises one notice: the second kill finds Alex already dead.
    let mut notices = arena.sim.take_deaths();
    assert_eq!(notices.len(), 1);
    let notice = notices.first_mut().unwrap();
    assert_eq!(
        arena.manager.on_authoritative_death(notice),
        Reconciliation::Applied
    );
    assert_eq!(notice.message, "Alex fell (resolution 2)");
    // The newest resolution saw the already emptied inventory.
    assert!(notice.drops.is_empty());
    assert!(arena.manager.pending_death(arena.alex).is_none());

    let mut late = DeathNotice {
        entity: arena.alex,
        message: String::from("Alex died"),
        drops: Vec::new(),
    };
    assert_eq!(
        arena.manager.on_authoritative_death(&mut late),
        Reconciliation::Unhandled
    );
}

#[test]
fn listeners_see_death_in_registration_order() {
    let mut arena = Arena::new();
    arena
        .manager
        .register_listener(|event: &mut CombatDeathEvent| event.set_cancelled(true));
    arena
        .manager
        .register_listener(|event: &mut CombatDeathEvent| event.set_cancelled(false));

    let (outcome, deaths) = arena.hit(DamageEvent::new(arena.alex, DamageCause::Void, 100.0));

    assert_eq!(outcome, DamageOutcome::Killed(DeathOutcome::Delegated));
    assert_eq!(deaths.len(), 1);
}

#[test]
fn unmatched_host_death_is_left_alone() {
    let mut arena = Arena::new();
    let mut notice = DeathNotice {
        entity: arena.alex,
        message: String::from("Alex died"),
        drops: vec![ItemStack::new("apple", 3)],
    };

    assert_eq!(
        arena.manager.on_authoritative_death(&mut notice),
        Reconciliation::Unhandled
    );
    assert_eq!(notice.message, "Alex died");
    assert_eq!(notice.drops, vec![ItemStack::new("apple", 3)]);
}

#[test]
fn knockback_into_fall_credits_attacker() {
    let mut arena = Arena::new();
    let punch = DamageEvent::new(arena.alex, DamageCause::EntityAttack, 1.0)
        .with_source(DamageSource::Entity(arena.steve_ref()));
    arena.hit(punch);

    let fall = DamageEvent::new(arena.alex, DamageCause::Fall, 40.0).with_fall_distance(30.0);
    let (outcome, deaths) = arena.hit(fall);

    assert_eq!(outcome, DamageOutcome::Killed(DeathOutcome::Delegated));
    let (notice, _) = deaths.first().unwrap();
    assert_eq!(notice.message, "Alex was doomed to fall by Steve");
}

#[test]
fn pet_kill_is_credited_to_owner() {
    let mut arena = Arena::new();
    let wolf = EntityRef::new(EntityId::new(), EntityKind::Creature, "Wolf")
        .owned_by(arena.steve_ref());
    arena
        .manager
        .register_listener(|event: &mut CombatDeathEvent| {
            let message = format!(
                "{} via {}",
                event.killer_actor().map_or("nobody", |actor| actor.name.as_str()),
                event.killer().map_or("nothing", |killer| killer.name.as_str())
            );
            event.set_death_message(message);
        });

    let (_, deaths) = arena.hit(
        DamageEvent::new(arena.alex, DamageCause::EntityAttack, 30.0)
            .with_source(DamageSource::Entity(wolf)),
    );

    let (notice, _) = deaths.first().unwrap();
    assert_eq!(notice.message, "Steve via Wolf");
}

#[test]
fn untracked_entity_is_ignored() {
    let mut arena = Arena::new();
    assert!(arena.manager.on_leave(arena.alex));

    let (outcome, deaths) = arena.hit(DamageEvent::new(arena.alex, DamageCause::Lava, 25.0));

    // The host applies the full damage on its own.
    assert_eq!(outcome, DamageOutcome::Ignored);
    assert_eq!(deaths.len(), 1);
    let (notice, reconciliation) = deaths.first().unwrap();
    assert_eq!(*reconciliation, Reconciliation::Unhandled);
    assert_eq!(notice.message, "Alex died");
}

#[test]
fn upstream_cancelled_damage_is_ignored() {
    let mut arena = Arena::new();
    let mut event = DamageEvent::new(arena.alex, DamageCause::Lava, 25.0);
    event.cancelled = true;

    let (outcome, deaths) = arena.hit(event);

    assert_eq!(outcome, DamageOutcome::Ignored);
    assert!(deaths.is_empty());
    assert!(!arena.manager.is_in_combat(arena.alex));
}

#[test]
fn synthetic_damage_lowers_health_without_notification() {
    let mut arena = Arena::new();
    let outcome = arena
        .manager
        .damage_player(&mut arena.sim, arena.alex, DamageCause::Magic, 5.0)
        .unwrap();

    assert_eq!(outcome, DamageOutcome::Recorded);
    assert_eq!(arena.sim.health(arena.alex), Some(15.0));
    let tracker = arena.manager.tracker(arena.alex).unwrap();
    assert!(tracker.last_damage().unwrap().is_synthetic());
    assert_eq!(
        tracker.last_damage().unwrap().death_cause(),
        DeathCause::Magic
    );
}

#[test]
fn lethal_synthetic_damage_resolves_death() {
    let mut arena = Arena::new();
    let outcome = arena
        .manager
        .damage_player(&mut arena.sim, arena.alex, DamageCause::Magic, 20.0)
        .unwrap();

    assert_eq!(outcome, DamageOutcome::Killed(DeathOutcome::Delegated));
    let mut notices = arena.sim.take_deaths();
    assert_eq!(notices.len(), 1);
    let notice = notices.first_mut().unwrap();
    assert_eq!(
        arena.manager.on_authoritative_death(notice),
        Reconciliation::Applied
    );
    assert_eq!(notice.message, "Alex was killed by magic");
}

#[test]
fn synthetic_damage_on_untracked_entity_fails() {
    let mut arena = Arena::new();
    let stranger = EntityId::new();
    let result = arena
        .manager
        .damage_player(&mut arena.sim, stranger, DamageCause::Magic, 5.0);
    assert!(matches!(result, Err(CombatError::UntrackedEntity(id)) if id == stranger));
}

#[test]
fn unknown_damage_kind_dies_generically() {
    let mut arena = Arena::new();
    let (outcome, deaths) = arena.hit(DamageEvent::new(arena.alex, DamageCause::Unknown, 50.0));

    assert_eq!(outcome, DamageOutcome::Killed(DeathOutcome::Delegated));
    let (notice, _) = deaths.first().unwrap();
    assert_eq!(notice.message, "Alex died");
}

#[test]
fn non_delegated_kill_spawns_drops() {
    let mut arena = Arena::new();
    let outcome = arena
        .manager
        .kill_player(&mut arena.sim, arena.alex, false)
        .unwrap();

    assert_eq!(outcome, DeathOutcome::Resolved { dropped: 2 });
    assert_eq!(arena.sim.spawned_items().count(), 2);
    assert!(arena.sim.take_deaths().is_empty());
    assert!(arena.manager.pending_death(arena.alex).is_none());
}

#[test]
fn leaving_discards_pending_death() {
    let mut arena = Arena::new();
    let outcome = arena
        .manager
        .kill_player(&mut arena.sim, arena.alex, true)
        .unwrap();
    assert_eq!(outcome, DeathOutcome::Delegated);
    assert!(arena.manager.pending_death(arena.alex).is_some());

    assert!(arena.manager.on_leave(arena.alex));
    assert!(arena.manager.pending_death(arena.alex).is_none());

    let mut notices = arena.sim.take_deaths();
    let notice = notices.first_mut().unwrap();
    assert_eq!(
        arena.manager.on_authoritative_death(notice),
        Reconciliation::Unhandled
    );
}

#[test]
fn expired_combat_gives_no_credit() {
    let config = TrackerConfig {
        retention_ticks: 3,
        max_entries: 8,
    };
    let mut arena = Arena::new();
    arena.manager = CombatManager::new(config, TranslatorRegistry::with_defaults()).unwrap();
    arena.manager.on_join(arena.alex);

    arena.hit(
        DamageEvent::new(arena.alex, DamageCause::EntityAttack, 1.0)
            .with_source(DamageSource::Entity(arena.steve_ref())),
    );
    for _ in 0..3 {
        arena.manager.on_tick();
    }
    assert!(!arena.manager.is_in_combat(arena.alex));

    let (_, deaths) = arena.hit(DamageEvent::new(arena.alex, DamageCause::Fall, 40.0));
    let (notice, _) = deaths.first().unwrap();
    assert_eq!(notice.message, "Alex hit the ground too hard");
}
