//! Blocking bridge for a synchronous front-end loop.
//!
//! [`SyncRuntime`] owns a tokio runtime running the [`GameDriver`] (and the
//! event log, when configured). The terminal loop polls it without ever
//! awaiting: actions go in with `try_send`, events come out with
//! `try_recv`.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::runtime::Runtime;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{info, warn};

use crate::config::RuntimeConfig;
use crate::core::{Catalog, Game, GameEvent, MemoryStore, SessionRecord, SessionSnapshot, StatsStore};
use crate::driver::{DriverError, DriverHandle, DriverOptions, GameDriver};
use crate::event_log::spawn_event_log;
use crate::store::JsonFileStore;
use crate::types::{GameMode, PlayerAction};

pub type BoxedStore = Box<dyn StatsStore + Send>;

/// Running game driver plus the runtime it lives on.
pub struct SyncRuntime {
    rt: Runtime,
    handle: DriverHandle,
    events: broadcast::Receiver<GameEvent>,
}

impl SyncRuntime {
    /// Start from environment configuration.
    pub fn start_from_env() -> Result<Self> {
        Self::start(RuntimeConfig::from_env())
    }

    /// Start with the standard catalog and the store `config` asks for.
    pub fn start(config: RuntimeConfig) -> Result<Self> {
        let store: BoxedStore = if config.persist {
            Box::new(JsonFileStore::open(&config.stats_path))
        } else {
            Box::new(MemoryStore::new())
        };
        let catalog = Catalog::standard().context("standard catalog is invalid")?;
        Self::start_with(config, Arc::new(catalog), store)
    }

    pub fn start_with(config: RuntimeConfig, catalog: Arc<Catalog>, store: BoxedStore) -> Result<Self> {
        let rt = Runtime::new().context("failed to create tokio runtime")?;

        let game = Game::new(catalog, store, config.seed);
        let options = DriverOptions::from(&config);
        let handle = {
            let _guard = rt.enter();
            let (handle, _task) = GameDriver::spawn(game, options);
            if let Some(path) = config.event_log.clone() {
                info!(path = %path.display(), "event log enabled");
                spawn_event_log(path, handle.subscribe());
            }
            handle
        };
        let events = handle.subscribe();

        info!(seed = config.seed, persist = config.persist, "game runtime started");
        Ok(Self { rt, handle, events })
    }

    pub fn handle(&self) -> &DriverHandle {
        &self.handle
    }

    pub fn start_session(&self, mode: GameMode) -> Result<(), DriverError> {
        self.rt.block_on(self.handle.start(mode))
    }

    /// Queue an action without blocking.
    pub fn try_send(&self, action: PlayerAction) -> Result<(), DriverError> {
        self.handle.try_send(action)
    }

    /// Next published event, if one is waiting.
    pub fn try_recv(&mut self) -> Option<GameEvent> {
        loop {
            match self.events.try_recv() {
                Ok(event) => return Some(event),
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "front-end fell behind on events");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }

    /// Current session state. Blocks until the driver answers.
    pub fn snapshot(&self) -> Result<SessionSnapshot, DriverError> {
        self.rt.block_on(self.handle.snapshot())
    }

    pub fn recent_sessions(&self, limit: usize) -> Result<Vec<SessionRecord>, DriverError> {
        self.rt.block_on(self.handle.recent_sessions(limit))
    }

    /// Stop the driver and wait for it to hand back the game.
    pub fn shutdown(self) {
        let _ = self.rt.block_on(self.handle.shutdown());
        self.rt.shutdown_timeout(std::time::Duration::from_millis(500));
    }
}
