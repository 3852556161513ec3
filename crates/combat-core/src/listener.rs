//! Death listeners.
//!
//! Listeners see every [`CombatDeathEvent`] before the manager acts on it,
//! in registration order, and may cancel it or edit its drops and message.
//! The manager reads the cancelled flag once, after the last listener.

use combat_tracker::CombatDeathEvent;

/// Callback invoked with each pending death.
pub trait DeathListener: Send {
    /// Inspect or modify the death before it is applied.
    fn on_combat_death(&mut self, event: &mut CombatDeathEvent);
}

impl<F> DeathListener for F
where
    F: FnMut(&mut CombatDeathEvent) + Send,
{
    fn on_combat_death(&mut self, event: &mut CombatDeathEvent) {
        self(event);
    }
}

/// Listener that cancels every death, keeping entities alive.
#[derive(Debug, Clone, Copy, Default)]
pub struct CancelAll;

impl DeathListener for CancelAll {
    fn on_combat_death(&mut self, event: &mut CombatDeathEvent) {
        event.set_cancelled(true);
    }
}
