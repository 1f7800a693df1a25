//! Async runtime for EcoSort - clocks, persistence, event fan-out
//!
//! The core is clock-free and I/O-free. This crate supplies the rest:
//!
//! - [`driver`]: a [`GameDriver`] task owning the [`Game`](core::Game),
//!   fed by a bounded command channel and publishing events on a broadcast
//!   channel
//! - [`timers`]: cancellable session tick, power-up expiry and hint timers
//! - [`store`]: [`JsonFileStore`], stats and session history in a JSON file
//! - [`event_log`]: optional JSON-lines log of every event
//! - [`sync`]: [`SyncRuntime`], a blocking bridge for a terminal loop
//!
//! # Environment Variables
//!
//! - `ECOSORT_MODE`: starting mode (`time_trial`, `blitz`, `marathon`,
//!   `survival`, `zen`; `normal` and `speed` are aliases)
//! - `ECOSORT_SEED`: spawn seed
//! - `ECOSORT_STATS_PATH`: stats file (default `ecosort-stats.json`)
//! - `ECOSORT_PERSIST_DISABLED`: set to `1` or `true` to keep stats in memory
//! - `ECOSORT_TICK_MS`: clock period in milliseconds (default 1000)
//! - `ECOSORT_EVENT_CAPACITY`: per-subscriber event buffer (default 256)
//! - `ECOSORT_EVENT_LOG`: path of a JSON-lines event log
//!
//! # Event Log Format
//!
//! ```text
//! {"ts":1700000000000,"type":"session-start","mode":"blitz","timeRemaining":30}
//! {"ts":1700000000412,"type":"item-selected","item":{...}}
//! {"ts":1700000000981,"type":"correct-sort","points":15,"item":{...}}
//! ```

pub mod config;
pub mod driver;
pub mod event_log;
pub mod store;
pub mod sync;
pub mod timers;

pub use ecosort_core as core;
pub use ecosort_types as types;

pub use config::RuntimeConfig;
pub use driver::{Command, DriverError, DriverHandle, DriverOptions, GameDriver};
pub use event_log::spawn_event_log;
pub use store::{JsonFileStore, StoreError};
pub use sync::{BoxedStore, SyncRuntime};
pub use timers::{TimerKey, TimerSet};
