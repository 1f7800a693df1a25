//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains every EcoSort rule: the item catalog, spawning,
//! scoring, power-ups and the session state machine. It has **no**
//! dependencies on terminals, async runtimes, or the filesystem:
//!
//! - **Deterministic**: the same seed spawns the same items
//! - **Clock-free**: the owner calls [`Session::tick`] once a second and
//!   schedules power-up expiries from the returned [`Activation`]
//! - **Event-driven**: every observable change is queued as a [`GameEvent`]
//!
//! # Module Structure
//!
//! - [`catalog`]: the validated item table, indexed by rarity tier
//! - [`spawn`]: rarity roll and per-instance ids
//! - [`scoring`]: display points, combo bonus, accuracy, level-up rule
//! - [`power_ups`]: inventory counts and live timed effects
//! - [`session`]: the state machine (`Idle -> Active <-> Paused -> Ended`)
//! - [`game`]: a session bound to a [`StatsStore`]
//! - [`stats`]: lifetime stats, session history, the persistence seam
//!
//! # Rules
//!
//! | Rule | Value |
//! |------|-------|
//! | Items on screen | 3 |
//! | Display points | `floor(base * (1 + (level - 1) * 0.1))` |
//! | Combo bonus | x1.5 at combo >= 5 |
//! | Double points | x2 after combo bonus |
//! | Level up | every 10 lifetime sorts, on a correct sort |
//! | Level-up reward | one random power-up |
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use ecosort_core::{Catalog, Game, MemoryStore};
//! use ecosort_types::{GameMode, PlayerAction};
//!
//! let catalog = Arc::new(Catalog::standard().unwrap());
//! let mut game = Game::new(catalog, MemoryStore::new(), 12345);
//! game.start_session(GameMode::Zen);
//!
//! game.apply_action(PlayerAction::SelectFirst);
//! let bin = game.session().selected_item().unwrap().category();
//! game.apply_action(PlayerAction::Sort(bin));
//!
//! assert!(game.session().score() > 0);
//! assert_eq!(game.session().combo(), 1);
//! ```

pub mod catalog;
pub mod error;
pub mod events;
pub mod game;
pub mod power_ups;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod snapshot;
pub mod spawn;
pub mod stats;

pub use ecosort_types as types;

pub use catalog::{Catalog, ItemDefinition, STANDARD_ITEMS};
pub use error::CatalogError;
pub use events::{EventQueue, GameEvent, GameSummary};
pub use game::{ActionResult, Game};
pub use power_ups::{Activation, ActiveEffects, PowerUpInventory};
pub use rng::SimpleRng;
pub use scoring::SortAward;
pub use session::{Session, SortOutcome};
pub use snapshot::SessionSnapshot;
pub use spawn::{SpawnedItem, Spawner};
pub use stats::{Impact, MemoryStore, SessionRecord, Stats, StatsStore};
