//! Session state machine - one play-through from start to game over
//!
//! A [`Session`] owns score, level, combo, lives, the clock, the three
//! visible items, the selection, power-ups and lifetime stats. It is mutated
//! only through the methods below and reports every observable change as a
//! [`GameEvent`] in its queue.
//!
//! Player-facing operations never fail. Anything that does not apply in the
//! current phase (or names a stale item) is a no-op that returns `false` or
//! `None` and leaves state untouched.
//!
//! The session does not own a clock. Whoever drives it calls [`Session::tick`]
//! once per second, schedules expiries from the returned [`Activation`]s, and
//! calls [`Session::deliver_hint`] when a delayed hint is due.

use std::sync::Arc;

use arrayvec::ArrayVec;

use crate::catalog::Catalog;
use crate::events::{EventQueue, GameEvent, GameSummary};
use crate::power_ups::{Activation, ActiveEffects, PowerUpInventory};
use crate::scoring::{self, SortAward};
use crate::snapshot::SessionSnapshot;
use crate::spawn::{SpawnedItem, Spawner};
use crate::stats::Stats;
use crate::types::*;

/// Result of a resolved sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOutcome {
    pub correct: bool,
    /// Zero for an incorrect sort.
    pub points: u32,
    pub award: Option<SortAward>,
    pub leveled_up: bool,
    /// The slot that received a fresh item.
    pub slot: usize,
    pub ended: bool,
}

#[derive(Debug, Clone)]
pub struct Session {
    mode: GameMode,
    phase: SessionPhase,
    score: u32,
    level: u32,
    combo: u32,
    max_combo: u32,
    /// `None` means unbounded.
    lives: Option<u32>,
    /// Seconds left, `None` in untimed modes.
    time_remaining: Option<u32>,
    items: ArrayVec<SpawnedItem, ITEMS_ON_SCREEN>,
    selected: Option<InstanceId>,
    effects: ActiveEffects,
    inventory: PowerUpInventory,
    spawner: Spawner,
    /// Lifetime stats, loaded at start and folded in as the session runs.
    stats: Stats,
    session_correct: u32,
    session_incorrect: u32,
    /// Seconds of active clock this session.
    played_secs: u32,
    /// Item whose delayed hint is pending.
    pending_hint: Option<SpawnedItem>,
    /// Summary of an end not yet collected by the owner.
    unsaved_summary: Option<GameSummary>,
    events: EventQueue,
}

impl Session {
    /// Create an idle session. Call [`Session::start`] to play.
    pub fn new(catalog: Arc<Catalog>, seed: u32) -> Self {
        Self {
            mode: GameMode::default(),
            phase: SessionPhase::Idle,
            score: 0,
            level: 1,
            combo: 0,
            max_combo: 0,
            lives: None,
            time_remaining: None,
            items: ArrayVec::new(),
            selected: None,
            effects: ActiveEffects::new(),
            inventory: PowerUpInventory::new(),
            spawner: Spawner::new(catalog, seed),
            stats: Stats::default(),
            session_correct: 0,
            session_incorrect: 0,
            played_secs: 0,
            pending_hint: None,
            unsaved_summary: None,
            events: EventQueue::new(),
        }
    }

    /// Begin a fresh play-through.
    ///
    /// Resets all per-session state, seeds lifetime stats from `stats` (and
    /// counts this game), spawns the opening items, and goes Active. Any
    /// previous play-through is discarded without a game-over. The power-up
    /// inventory carries over.
    pub fn start(&mut self, mode: GameMode, stats: Stats) {
        self.mode = mode;
        self.phase = SessionPhase::Active;
        self.score = 0;
        self.level = 1;
        self.combo = 0;
        self.max_combo = 0;
        self.lives = mode.initial_lives();
        self.time_remaining = mode.initial_time();
        self.selected = None;
        self.effects.clear();
        self.session_correct = 0;
        self.session_incorrect = 0;
        self.played_secs = 0;
        self.pending_hint = None;
        self.unsaved_summary = None;

        self.stats = stats;
        self.stats.games_played = self.stats.games_played.saturating_add(1);

        self.respawn_all();

        self.events.push(GameEvent::SessionStart {
            mode,
            time_remaining: self.time_remaining,
        });
    }

    fn respawn_all(&mut self) {
        let level = self.level;
        self.items.clear();
        for item in self.spawner.spawn_initial_set(level, ITEMS_ON_SCREEN) {
            self.items.push(item);
        }
    }

    // ----- accessors -----

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == SessionPhase::Active
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn max_combo(&self) -> u32 {
        self.max_combo
    }

    pub fn lives(&self) -> Option<u32> {
        self.lives
    }

    pub fn time_remaining(&self) -> Option<u32> {
        self.time_remaining
    }

    /// Exactly [`ITEMS_ON_SCREEN`] items once started, empty while idle.
    pub fn visible_items(&self) -> &[SpawnedItem] {
        &self.items
    }

    pub fn selected_item(&self) -> Option<&SpawnedItem> {
        let id = self.selected?;
        self.items.iter().find(|i| i.instance_id == id)
    }

    pub fn active_effects(&self) -> &ActiveEffects {
        &self.effects
    }

    pub fn inventory(&self) -> &PowerUpInventory {
        &self.inventory
    }

    /// Grant a power-up unit directly (rewards, tests, debug menus).
    pub fn inventory_mut(&mut self) -> &mut PowerUpInventory {
        &mut self.inventory
    }

    /// Whether the presentation layer should reveal bins per item.
    pub fn hints_visible(&self) -> bool {
        self.effects.contains(PowerUpKind::ShowHints)
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn session_accuracy(&self) -> f64 {
        scoring::accuracy(self.session_correct, self.session_incorrect)
    }

    pub fn events(&self) -> &EventQueue {
        &self.events
    }

    /// Take the events recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain().collect()
    }

    /// Summary of a game-over the owner has not persisted yet.
    pub fn take_unsaved_summary(&mut self) -> Option<GameSummary> {
        self.unsaved_summary.take()
    }

    pub fn snapshot_into(&self, out: &mut SessionSnapshot) {
        out.mode = self.mode;
        out.phase = self.phase;
        out.score = self.score;
        out.level = self.level;
        out.combo = self.combo;
        out.max_combo = self.max_combo;
        out.lives = self.lives;
        out.time_remaining = self.time_remaining;
        out.items = self.items.clone();
        out.selected = self.selected;
        out.active_effects = self.effects.kinds();
        out.inventory = self.inventory;
        out.hints_visible = self.hints_visible();
        out.best_score = self.stats.best_score;
        out.accuracy = self.session_accuracy();
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let mut s = SessionSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    // ----- player operations -----

    /// Select a visible item by id. Stale ids are ignored.
    pub fn select_item(&mut self, id: InstanceId) -> bool {
        if !self.is_active() {
            return false;
        }
        let Some(item) = self.items.iter().find(|i| i.instance_id == id).copied() else {
            return false;
        };
        self.selected = Some(id);
        self.events.push(GameEvent::ItemSelected { item });
        true
    }

    /// Select by slot position.
    pub fn select_slot(&mut self, slot: usize) -> bool {
        match self.items.get(slot) {
            Some(item) => {
                let id = item.instance_id;
                self.select_item(id)
            }
            None => false,
        }
    }

    pub fn select_first(&mut self) -> bool {
        self.select_slot(0)
    }

    /// Sort the selected item into `target`.
    ///
    /// This is the only place score, combo and lives change.
    pub fn sort_selected(&mut self, target: Category) -> Option<SortOutcome> {
        if !self.is_active() {
            return None;
        }
        let id = self.selected?;
        let slot = self.items.iter().position(|i| i.instance_id == id)?;
        let item = self.items[slot];
        let correct = item.category() == target;

        let mut award = None;
        let mut leveled_up = false;
        let mut out_of_lives = false;

        self.stats.items_sorted = self.stats.items_sorted.saturating_add(1);

        if correct {
            self.combo += 1;
            self.max_combo = self.max_combo.max(self.combo);

            let a = scoring::award_points(
                item.display_points,
                self.combo,
                self.effects.contains(PowerUpKind::DoublePoints),
            );
            self.score = self.score.saturating_add(a.total);
            self.stats.correct_sorts = self.stats.correct_sorts.saturating_add(1);
            self.session_correct += 1;
            award = Some(a);

            self.events.push(GameEvent::CorrectSort {
                points: a.total,
                item,
            });

            if scoring::level_up_due(self.stats.items_sorted) {
                self.level_up();
                leveled_up = true;
            }
        } else {
            self.combo = 0;
            self.stats.incorrect_sorts = self.stats.incorrect_sorts.saturating_add(1);
            self.session_incorrect += 1;

            if let Some(lives) = self.lives.as_mut() {
                *lives = lives.saturating_sub(1);
                out_of_lives = *lives == 0;
            }

            self.pending_hint = Some(item);
            self.events.push(GameEvent::WrongSort {
                item,
                correct_category: item.category(),
            });
        }

        self.stats.streak_record = self.stats.streak_record.max(self.combo);
        if scoring::is_combo_milestone(self.combo) {
            self.events.push(GameEvent::ComboMilestone { combo: self.combo });
        }

        let fresh = self.spawner.spawn_item(self.level);
        self.items[slot] = fresh;
        self.selected = None;

        if out_of_lives {
            self.end();
        }

        Some(SortOutcome {
            correct,
            points: award.map(|a| a.total).unwrap_or(0),
            award,
            leveled_up,
            slot,
            ended: out_of_lives,
        })
    }

    /// Advance the level and grant one random power-up.
    ///
    /// Items already on screen keep their points.
    pub fn level_up(&mut self) {
        self.level += 1;
        self.events.push(GameEvent::LevelUp {
            new_level: self.level,
        });
        let kind = self.inventory.grant_random(self.spawner.rng_mut());
        self.events.push(GameEvent::PowerUpAwarded { kind });
    }

    /// One second of session clock.
    ///
    /// Counts play time in every mode. In timed modes the clock runs down
    /// unless time freeze is active; reaching zero ends the session.
    pub fn tick(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.played_secs = self.played_secs.saturating_add(1);

        let Some(remaining) = self.time_remaining else {
            return false;
        };

        if self.effects.contains(PowerUpKind::TimeFreeze) {
            self.events.push(GameEvent::TimeRemaining { seconds: remaining });
            return false;
        }

        let remaining = remaining.saturating_sub(1);
        self.time_remaining = Some(remaining);
        self.events.push(GameEvent::TimeRemaining { seconds: remaining });

        if remaining == 0 {
            self.end();
        }
        true
    }

    pub fn pause(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.phase = SessionPhase::Paused;
        self.events.push(GameEvent::Paused);
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.phase != SessionPhase::Paused {
            return false;
        }
        self.phase = SessionPhase::Active;
        self.events.push(GameEvent::Resumed);
        true
    }

    /// Finish the session and fold it into lifetime stats.
    ///
    /// Only Active or Paused sessions end; calling again is a no-op.
    pub fn end(&mut self) -> Option<GameSummary> {
        if !matches!(self.phase, SessionPhase::Active | SessionPhase::Paused) {
            return None;
        }
        self.phase = SessionPhase::Ended;
        self.selected = None;
        self.pending_hint = None;
        self.effects.clear();

        self.stats.total_score = self.stats.total_score.saturating_add(self.score as u64);
        self.stats.total_play_time = self.stats.total_play_time.saturating_add(self.played_secs);
        let new_best = self.score > self.stats.best_score;
        if new_best {
            self.stats.best_score = self.score;
            self.events.push(GameEvent::NewBestScore { score: self.score });
        }

        let summary = GameSummary {
            score: self.score,
            level: self.level,
            max_combo: self.max_combo,
            accuracy: self.stats.accuracy(),
            session_accuracy: self.session_accuracy(),
            mode: self.mode,
            correct_sorts: self.session_correct,
            incorrect_sorts: self.session_incorrect,
            new_best,
            stats: self.stats,
        };
        self.events.push(GameEvent::GameOver(summary.clone()));
        self.unsaved_summary = Some(summary.clone());
        Some(summary)
    }

    /// Spend one unit of a power-up.
    ///
    /// Requires an Active session and stock. Timed kinds return the
    /// [`Activation`] to schedule; one-shot kinds apply immediately and
    /// return `None`, as does a refused activation.
    ///
    /// Extra life only adds a life in modes with finite lives, yet the unit
    /// is spent in every mode.
    pub fn activate_power_up(&mut self, kind: PowerUpKind) -> Option<Activation> {
        if !self.is_active() || !self.inventory.try_consume(kind) {
            return None;
        }
        self.stats.power_ups_used = self.stats.power_ups_used.saturating_add(1);

        let activation = match kind {
            PowerUpKind::TimeFreeze | PowerUpKind::DoublePoints | PowerUpKind::ShowHints => {
                self.effects.activate(kind)
            }
            PowerUpKind::SkipItem => {
                self.selected = None;
                self.respawn_all();
                None
            }
            PowerUpKind::ExtraLife => {
                if let Some(lives) = self.lives.as_mut() {
                    *lives = lives.saturating_add(1);
                }
                None
            }
        };

        self.events.push(GameEvent::PowerUpActivated { kind });
        activation
    }

    /// Expire a timed effect. Stale tokens and torn-down sessions are ignored.
    pub fn expire_effect(&mut self, kind: PowerUpKind, token: u64) -> bool {
        if !self.effects.expire(kind, token) {
            return false;
        }
        self.events.push(GameEvent::PowerUpExpired { kind });
        true
    }

    /// Item a delayed hint is waiting for, if any.
    pub fn pending_hint(&self) -> Option<&SpawnedItem> {
        self.pending_hint.as_ref()
    }

    /// Deliver the delayed hint for `id` if it is still the pending one.
    pub fn deliver_hint(&mut self, id: InstanceId) -> bool {
        if !self.is_active() {
            return false;
        }
        match self.pending_hint {
            Some(item) if item.instance_id == id => {
                self.pending_hint = None;
                self.events.push(GameEvent::HintOffered {
                    item,
                    correct_category: item.category(),
                });
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
impl Session {
    /// Replace a visible item (tests only).
    pub(crate) fn set_item(&mut self, slot: usize, item: SpawnedItem) {
        self.items[slot] = item;
    }
}
