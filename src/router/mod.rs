//! Router module
//!
//! Static route table, the access guard run before each navigation, and the
//! router that tracks the current location.

mod guard;
mod navigator;
mod routes;

pub use guard::{evaluate, GuardDecision};
pub use navigator::{Navigation, Navigator, Router};
pub use routes::{resolve, resolve_in, Location, RouteDescriptor, RouteName, LOGIN_PATH, NOT_FOUND, ROOT_PATH, ROUTES};
