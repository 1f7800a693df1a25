//! Terminal input module.
//!
//! Maps `crossterm` key events to [`crate::types::PlayerAction`]s. Holds no
//! state: what an action means in the current phase is the session's call.
//!
//! | Keys | Action |
//! |------|--------|
//! | `1` `2` `3` | select slot |
//! | `Space` | select first item |
//! | `Q` `W` `E` | sort into organic / recyclable / hazardous |
//! | `F` `D` `H` `S` `L` | time freeze, double points, hints, skip, extra life |
//! | `P` | pause / resume |
//! | `R` | restart |
//! | `X` | end session |
//! | `Esc` `Ctrl-C` | quit |

pub mod map;

pub use ecosort_types as types;

pub use map::{handle_key_event, should_quit};
