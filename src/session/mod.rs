//! Session module
//!
//! Holds the signed-in token and user, shared by the HTTP pipeline, the
//! router and the stores, and persists it between runs.

mod state;
pub mod storage;

pub use state::{Session, SessionState};
pub use storage::{FileStorage, MemoryStorage, SessionStorage};
