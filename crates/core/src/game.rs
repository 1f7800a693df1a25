//! Game facade - a session plus its stats store
//!
//! [`Game`] is what front-ends drive. It forwards to [`Session`] and keeps the
//! [`StatsStore`] current: lifetime stats are saved when a session starts,
//! after every resolved sort and spent power-up, and when the session ends
//! (together with its history record). Restarting mid-game therefore never
//! loses the cumulative counters.

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::events::{GameEvent, GameSummary};
use crate::power_ups::Activation;
use crate::session::{Session, SortOutcome};
use crate::snapshot::SessionSnapshot;
use crate::stats::{SessionRecord, StatsStore};
use crate::types::{Category, GameMode, InstanceId, PlayerAction, PowerUpKind};

/// What applying a [`PlayerAction`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActionResult {
    /// False when the action did not apply in the current phase.
    pub applied: bool,
    /// Timed effect to schedule an expiry for.
    pub activation: Option<Activation>,
}

impl ActionResult {
    fn from_bool(applied: bool) -> Self {
        Self {
            applied,
            activation: None,
        }
    }
}

#[derive(Debug)]
pub struct Game<S: StatsStore> {
    session: Session,
    store: S,
}

impl<S: StatsStore> Game<S> {
    pub fn new(catalog: Arc<Catalog>, store: S, seed: u32) -> Self {
        Self {
            session: Session::new(catalog, seed),
            store,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Add one unit of `kind` to the inventory.
    pub fn grant_power_up(&mut self, kind: PowerUpKind) {
        self.session.inventory_mut().grant(kind);
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot()
    }

    pub fn snapshot_into(&self, out: &mut SessionSnapshot) {
        self.session.snapshot_into(out);
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.session.drain_events()
    }

    pub fn recent_sessions(&self, limit: usize) -> Vec<SessionRecord> {
        self.store.recent_sessions(limit)
    }

    /// Load lifetime stats and start a session in `mode`.
    pub fn start_session(&mut self, mode: GameMode) {
        let stats = self.store.load_stats();
        self.session.start(mode, stats);
        self.store.save_stats(self.session.stats());
    }

    /// Apply one player intent.
    pub fn apply_action(&mut self, action: PlayerAction) -> ActionResult {
        match action {
            PlayerAction::SelectSlot(slot) => ActionResult::from_bool(self.session.select_slot(slot)),
            PlayerAction::SelectFirst => ActionResult::from_bool(self.session.select_first()),
            PlayerAction::Sort(category) => {
                ActionResult::from_bool(self.sort_selected(category).is_some())
            }
            PlayerAction::Activate(kind) => {
                let (applied, activation) = self.activate(kind);
                ActionResult {
                    applied,
                    activation,
                }
            }
            PlayerAction::TogglePause => {
                let applied = if self.session.is_active() {
                    self.session.pause()
                } else {
                    self.session.resume()
                };
                ActionResult::from_bool(applied)
            }
            PlayerAction::Restart => {
                let mode = self.session.mode();
                self.start_session(mode);
                ActionResult::from_bool(true)
            }
            PlayerAction::End => ActionResult::from_bool(self.end().is_some()),
        }
    }

    pub fn select_item(&mut self, id: InstanceId) -> bool {
        self.session.select_item(id)
    }

    /// Sort the selected item and save the updated lifetime stats.
    pub fn sort_selected(&mut self, category: Category) -> Option<SortOutcome> {
        let outcome = self.session.sort_selected(category)?;
        if !self.persist_if_finished() {
            self.store.save_stats(self.session.stats());
        }
        Some(outcome)
    }

    pub fn tick(&mut self) -> bool {
        let changed = self.session.tick();
        self.persist_if_finished();
        changed
    }

    pub fn pause(&mut self) -> bool {
        self.session.pause()
    }

    pub fn resume(&mut self) -> bool {
        self.session.resume()
    }

    pub fn end(&mut self) -> Option<GameSummary> {
        let summary = self.session.end();
        self.persist_if_finished();
        summary
    }

    pub fn activate_power_up(&mut self, kind: PowerUpKind) -> Option<Activation> {
        self.activate(kind).1
    }

    /// Whether a unit was spent, and the timed effect to schedule.
    fn activate(&mut self, kind: PowerUpKind) -> (bool, Option<Activation>) {
        let before = self.session.stats().power_ups_used;
        let activation = self.session.activate_power_up(kind);
        let spent = self.session.stats().power_ups_used > before;
        if spent {
            self.store.save_stats(self.session.stats());
        }
        (spent, activation)
    }

    pub fn expire_effect(&mut self, kind: PowerUpKind, token: u64) -> bool {
        self.session.expire_effect(kind, token)
    }

    pub fn deliver_hint(&mut self, id: InstanceId) -> bool {
        self.session.deliver_hint(id)
    }

    /// Save the summary of a just-ended session. Returns false if there was none.
    fn persist_if_finished(&mut self) -> bool {
        match self.session.take_unsaved_summary() {
            Some(summary) => {
                self.store.save_stats(&summary.stats);
                self.store.record_session(&SessionRecord::from(&summary));
                true
            }
            None => false,
        }
    }
}
