//! Per-connection session state
//!
//! A session is created at accept time, mutated only during the two-line
//! handshake, and destroyed exactly once on disconnect (terminate line,
//! I/O error, send failure during broadcast, or server shutdown).

pub mod handle;
pub mod state;

pub use handle::{Session, SessionId};
pub use state::SessionPhase;
