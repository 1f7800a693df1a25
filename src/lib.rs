//! EcoSort (workspace facade crate).
//!
//! Re-exports the workspace crates under one roof so the binary, the
//! integration tests and the benches share `ecosort::{core, runtime, term,
//! input, types}`.

pub use ecosort_core as core;
pub use ecosort_input as input;
pub use ecosort_runtime as runtime;
pub use ecosort_term as term;
pub use ecosort_types as types;
