//! Game driver - owns the game on a tokio task
//!
//! The driver is a single-owner actor: front-ends send [`Command`]s over a
//! bounded channel and listen to [`GameEvent`]s on a broadcast channel. The
//! driver also owns every clock the core leaves to its caller:
//!
//! - the one-second session tick, running only while the session is Active
//! - expiry timers for timed power-ups, scheduled from each activation
//! - the delayed hint, three seconds after a wrong sort
//!
//! All of them are dropped when the session ends or a new one starts.

use std::time::Duration;

use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace};

use crate::config::RuntimeConfig;
use crate::core::{Game, GameEvent, SessionRecord, SessionSnapshot, StatsStore};
use crate::timers::{TimerKey, TimerSet};
use crate::types::{
    GameMode, InstanceId, PlayerAction, PowerUpKind, SessionPhase, DELAYED_HINT_MS, TICK_MS,
};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverError {
    #[error("game driver has stopped")]
    Closed,

    #[error("game driver command queue is full")]
    Busy,
}

/// Requests accepted by the driver.
#[derive(Debug)]
pub enum Command {
    Start(GameMode),
    Action(PlayerAction),
    SelectItem(InstanceId),
    Snapshot(oneshot::Sender<SessionSnapshot>),
    RecentSessions {
        limit: usize,
        reply: oneshot::Sender<Vec<SessionRecord>>,
    },
    Shutdown,
}

/// Driver channel sizes and clock period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverOptions {
    pub tick: Duration,
    pub event_capacity: usize,
    pub command_capacity: usize,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(TICK_MS),
            event_capacity: 256,
            command_capacity: 64,
        }
    }
}

impl From<&RuntimeConfig> for DriverOptions {
    fn from(config: &RuntimeConfig) -> Self {
        Self {
            tick: config.tick,
            event_capacity: config.event_capacity,
            command_capacity: config.command_capacity,
        }
    }
}

#[derive(Debug, Clone)]
enum TimerFire {
    /// Carries the clock generation it was started under.
    Tick(u64),
    Expire { kind: PowerUpKind, token: u64 },
    Hint(InstanceId),
}

/// Cloneable handle to a running driver.
#[derive(Debug, Clone)]
pub struct DriverHandle {
    commands: mpsc::Sender<Command>,
    events: broadcast::Sender<GameEvent>,
}

impl DriverHandle {
    pub async fn send(&self, action: PlayerAction) -> Result<(), DriverError> {
        self.command(Command::Action(action)).await
    }

    /// Queue an action without waiting. Fails with `Busy` when the queue
    /// is full.
    pub fn try_send(&self, action: PlayerAction) -> Result<(), DriverError> {
        self.commands
            .try_send(Command::Action(action))
            .map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => DriverError::Busy,
                mpsc::error::TrySendError::Closed(_) => DriverError::Closed,
            })
    }

    pub async fn start(&self, mode: GameMode) -> Result<(), DriverError> {
        self.command(Command::Start(mode)).await
    }

    pub async fn select_item(&self, id: InstanceId) -> Result<(), DriverError> {
        self.command(Command::SelectItem(id)).await
    }

    /// Receive every event published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<GameEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> Result<SessionSnapshot, DriverError> {
        let (tx, rx) = oneshot::channel();
        self.command(Command::Snapshot(tx)).await?;
        rx.await.map_err(|_| DriverError::Closed)
    }

    pub async fn recent_sessions(&self, limit: usize) -> Result<Vec<SessionRecord>, DriverError> {
        let (reply, rx) = oneshot::channel();
        self.command(Command::RecentSessions { limit, reply }).await?;
        rx.await.map_err(|_| DriverError::Closed)
    }

    /// Ask the driver to stop. Pending timers are cancelled.
    pub async fn shutdown(&self) -> Result<(), DriverError> {
        self.command(Command::Shutdown).await
    }

    async fn command(&self, cmd: Command) -> Result<(), DriverError> {
        self.commands.send(cmd).await.map_err(|_| DriverError::Closed)
    }
}

pub struct GameDriver<S: StatsStore> {
    game: Game<S>,
    commands: mpsc::Receiver<Command>,
    timer_rx: mpsc::UnboundedReceiver<TimerFire>,
    timers: TimerSet<TimerFire>,
    events: broadcast::Sender<GameEvent>,
    tick: Duration,
    tick_generation: u64,
}

impl<S> GameDriver<S>
where
    S: StatsStore + Send + 'static,
{
    /// Build a driver and its handle without starting it.
    pub fn new(game: Game<S>, options: DriverOptions) -> (Self, DriverHandle) {
        let (cmd_tx, commands) = mpsc::channel(options.command_capacity.max(1));
        let (events, _) = broadcast::channel(options.event_capacity.max(1));
        let (timer_tx, timer_rx) = mpsc::unbounded_channel();

        let driver = Self {
            game,
            commands,
            timer_rx,
            timers: TimerSet::new(timer_tx),
            events: events.clone(),
            tick: options.tick,
            tick_generation: 0,
        };
        let handle = DriverHandle {
            commands: cmd_tx,
            events,
        };
        (driver, handle)
    }

    /// Spawn the driver on the current runtime.
    ///
    /// The join handle yields the game back once the driver stops.
    pub fn spawn(game: Game<S>, options: DriverOptions) -> (DriverHandle, JoinHandle<Game<S>>) {
        let (driver, handle) = Self::new(game, options);
        (handle, tokio::spawn(driver.run()))
    }

    pub async fn run(mut self) -> Game<S> {
        debug!("game driver running");
        loop {
            tokio::select! {
                cmd = self.commands.recv() => match cmd {
                    Some(Command::Shutdown) | None => break,
                    Some(cmd) => self.handle_command(cmd),
                },
                Some(fire) = self.timer_rx.recv() => self.handle_timer(fire),
            }
            self.publish();
            self.sync_clock();
        }
        // A session still in progress ends here and gets its history record.
        if self.game.end().is_some() {
            info!("session in progress ended by shutdown");
            self.publish();
        }
        self.timers.cancel_all();
        debug!("game driver stopped");
        self.game
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Start(mode) => self.game.start_session(mode),
            Command::Action(action) => {
                let result = self.game.apply_action(action);
                if !result.applied {
                    trace!(?action, "action ignored");
                }
                if let Some(a) = result.activation {
                    self.timers.once(
                        TimerKey::Effect(a.kind),
                        Duration::from_millis(a.duration_ms as u64),
                        TimerFire::Expire {
                            kind: a.kind,
                            token: a.token,
                        },
                    );
                }
            }
            Command::SelectItem(id) => {
                self.game.select_item(id);
            }
            Command::Snapshot(reply) => {
                let _ = reply.send(self.game.snapshot());
            }
            Command::RecentSessions { limit, reply } => {
                let _ = reply.send(self.game.recent_sessions(limit));
            }
            Command::Shutdown => {}
        }
    }

    fn handle_timer(&mut self, fire: TimerFire) {
        match fire {
            TimerFire::Tick(generation) if generation == self.tick_generation => {
                self.game.tick();
            }
            TimerFire::Tick(_) => trace!("stale tick dropped"),
            TimerFire::Expire { kind, token } => {
                self.game.expire_effect(kind, token);
            }
            TimerFire::Hint(id) => {
                self.game.deliver_hint(id);
            }
        }
    }

    fn publish(&mut self) {
        for event in self.game.drain_events() {
            match &event {
                GameEvent::SessionStart { mode, .. } => {
                    self.timers.cancel_all();
                    info!(mode = mode.as_str(), "session started");
                }
                GameEvent::WrongSort { item, .. } => {
                    self.timers.once(
                        TimerKey::Hint,
                        Duration::from_millis(DELAYED_HINT_MS as u64),
                        TimerFire::Hint(item.instance_id),
                    );
                    debug!(item = item.name(), "wrong sort");
                }
                GameEvent::GameOver(summary) => {
                    self.timers.cancel_all();
                    info!(
                        mode = summary.mode.as_str(),
                        score = summary.score,
                        level = summary.level,
                        max_combo = summary.max_combo,
                        "session ended"
                    );
                }
                GameEvent::LevelUp { new_level } => info!(level = new_level, "level up"),
                GameEvent::TimeRemaining { seconds } => trace!(seconds, "clock"),
                other => debug!(event = other.name(), "game event"),
            }
            // No subscribers is fine.
            let _ = self.events.send(event);
        }
    }

    /// Run the session clock exactly while the session is Active.
    fn sync_clock(&mut self) {
        match self.game.session().phase() {
            SessionPhase::Active => {
                if !self.timers.is_scheduled(TimerKey::Tick) {
                    self.tick_generation += 1;
                    self.timers.every(
                        TimerKey::Tick,
                        self.tick,
                        TimerFire::Tick(self.tick_generation),
                    );
                }
            }
            SessionPhase::Paused => {
                self.timers.cancel(TimerKey::Tick);
            }
            SessionPhase::Idle | SessionPhase::Ended => {
                self.timers.cancel_all();
            }
        }
    }
}
