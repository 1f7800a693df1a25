//! Terminal front-end for EcoSort.
//!
//! Renders into a plain framebuffer that is diffed and flushed to the
//! terminal, no widget toolkit involved:
//!
//! - [`fb`]: styled character cells
//! - [`game_view`]: session snapshot to framebuffer (pure, tested)
//! - [`messages`]: toast log fed by game events, including countdown warnings
//! - [`renderer`]: crossterm output with changed-run diffing

pub mod fb;
pub mod game_view;
pub mod messages;
pub mod renderer;

pub use ecosort_core as core;
pub use ecosort_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{GameView, Viewport};
pub use messages::{Message, MessageLog, Tone};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
