//! Scenario replay against an in-memory host.
//!
//! The replay plays the host's part: it delivers each step to the
//! [`CombatManager`], applies whatever damage survives interception to the
//! [`MemorySimulation`], and feeds every death notice the host raises back
//! through the confirmation path.

use std::sync::Arc;
use std::time::Duration;

use combat_core::{
    CancelAll, CombatConfig, CombatManager, DamageOutcome, DeathOutcome, MemorySimulation,
    Reconciliation, SimEntity, Simulation, TickTask,
};
use combat_tracker::CombatDeathEvent;
use combat_types::ItemStack;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::EngineError;
use crate::scenario::{Cast, ListenerSpec, Scenario, Step};

/// What happened during a replay.
#[derive(Debug, Default, Serialize)]
pub struct ReplayReport {
    /// Steps delivered.
    pub steps: usize,
    /// Deaths the host confirmed, in order.
    pub deaths: Vec<DeathRecord>,
    /// Deaths cancelled by a listener, by entity name.
    pub cancelled: Vec<String>,
    /// Items the engine spawned into the world.
    pub spawned_items: Vec<ItemStack>,
    /// Final health of every cast member, in name order.
    pub survivors: Vec<Survivor>,
    /// Ticks completed by the background tick task.
    pub background_ticks: u64,
}

/// A death notice after reconciliation.
#[derive(Debug, Serialize)]
pub struct DeathRecord {
    /// Entity that died.
    pub entity: String,
    /// Final death message.
    pub message: String,
    /// Final drops.
    pub drops: Vec<ItemStack>,
    /// Whether a pending combat death was applied.
    pub handled: bool,
}

/// A cast member's state at the end of the replay.
#[derive(Debug, Serialize)]
pub struct Survivor {
    /// Entity name.
    pub entity: String,
    /// Remaining health.
    pub health: f64,
}

/// Replay `scenario` with `config`.
///
/// # Errors
///
/// Returns [`EngineError`] if the configuration is invalid, the scenario
/// names an unknown entity, or a synthetic call targets an untracked
/// entity.
pub async fn replay(
    config: &CombatConfig,
    scenario: &Scenario,
) -> Result<ReplayReport, EngineError> {
    let cast = Cast::new(&scenario.entities)?;

    let mut sim = MemorySimulation::new();
    for (id, spec) in cast.members() {
        sim.spawn(
            id,
            SimEntity {
                name: spec.name.clone(),
                health: spec.health,
                location: cast.location(spec),
                inventory: spec.inventory.iter().cloned().map(Some).collect(),
            },
        );
    }

    let mut manager = CombatManager::from_config(config)?;
    register_listeners(&mut manager, &scenario.listeners);
    let manager = Arc::new(Mutex::new(manager));

    let ticker = scenario.realtime_ticks.then(|| {
        TickTask::start(
            Arc::clone(&manager),
            Duration::from_millis(config.scheduler.tick_interval_ms),
        )
    });

    info!(
        entities = scenario.entities.len(),
        steps = scenario.steps.len(),
        realtime_ticks = scenario.realtime_ticks,
        "Replaying scenario"
    );

    let mut report = ReplayReport::default();
    for step in &scenario.steps {
        run_step(&manager, &mut sim, &cast, step, &mut report).await?;
        report.steps = report.steps.saturating_add(1);
    }

    if let Some(ticker) = ticker {
        report.background_ticks = ticker.shutdown().await;
    }

    report.spawned_items = sim.spawned_items().cloned().collect();
    report.survivors = cast
        .members()
        .filter_map(|(id, spec)| {
            sim.health(id).map(|health| Survivor {
                entity: spec.name.clone(),
                health,
            })
        })
        .collect();

    info!(
        steps = report.steps,
        deaths = report.deaths.len(),
        cancelled = report.cancelled.len(),
        "Scenario complete"
    );
    Ok(report)
}

fn register_listeners(manager: &mut CombatManager, spec: &ListenerSpec) {
    if spec.cancel_deaths {
        manager.register_listener(CancelAll);
    }
    if let Some(template) = spec.death_message.clone() {
        manager.register_listener(move |event: &mut CombatDeathEvent| {
            let message = template.replace("{victim}", event.subject_name());
            event.set_death_message(message);
        });
    }
    if spec.clear_drops {
        manager.register_listener(|event: &mut CombatDeathEvent| event.drops_mut().clear());
    }
}

async fn run_step(
    manager: &Mutex<CombatManager>,
    sim: &mut MemorySimulation,
    cast: &Cast,
    step: &Step,
    report: &mut ReplayReport,
) -> Result<(), EngineError> {
    debug!(?step, "Replay step");
    match step {
        Step::Join { entity } => {
            manager.lock().await.on_join(cast.id(entity)?);
        }
        Step::Leave { entity } => {
            manager.lock().await.on_leave(cast.id(entity)?);
        }
        Step::Damage(spec) => {
            let mut event = cast.damage_event(spec)?;
            let outcome = manager.lock().await.on_damage(sim, &mut event);
            note_cancelled(report, &spec.target, outcome);
            sim.apply_damage(&event);
        }
        Step::Synthetic {
            target,
            cause,
            amount,
        } => {
            let outcome = manager
                .lock()
                .await
                .damage_player(sim, cast.id(target)?, *cause, *amount)?;
            note_cancelled(report, target, outcome);
        }
        Step::Kill { target, delegate } => {
            let outcome = manager
                .lock()
                .await
                .kill_player(sim, cast.id(target)?, *delegate)?;
            if matches!(outcome, DeathOutcome::Cancelled { .. }) {
                report.cancelled.push(target.clone());
            }
        }
        Step::Tick { count } => {
            let mut guard = manager.lock().await;
            for _ in 0..*count {
                guard.on_tick();
            }
        }
        Step::Wait { millis } => {
            tokio::time::sleep(Duration::from_millis(*millis)).await;
        }
    }

    confirm_deaths(manager, sim, cast, report).await;
    Ok(())
}

fn note_cancelled(report: &mut ReplayReport, target: &str, outcome: DamageOutcome) {
    if matches!(
        outcome,
        DamageOutcome::Killed(DeathOutcome::Cancelled { .. })
    ) {
        report.cancelled.push(target.to_owned());
    }
}

/// Deliver every death notice the host raised since the last step.
async fn confirm_deaths(
    manager: &Mutex<CombatManager>,
    sim: &mut MemorySimulation,
    cast: &Cast,
    report: &mut ReplayReport,
) {
    let notices = sim.take_deaths();
    if notices.is_empty() {
        return;
    }
    let mut guard = manager.lock().await;
    for mut notice in notices {
        let handled = guard.on_authoritative_death(&mut notice) == Reconciliation::Applied;
        report.deaths.push(DeathRecord {
            entity: cast
                .name_of(notice.entity)
                .map_or_else(|| notice.entity.to_string(), str::to_owned),
            message: notice.message,
            drops: notice.drops,
            handled,
        });
    }
}
