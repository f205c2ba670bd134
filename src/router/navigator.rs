use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

use super::guard::{evaluate, GuardDecision};
use super::routes::{resolve_in, Location, RouteDescriptor, ROOT_PATH, ROUTES};
use crate::error::NavigationError;
use crate::session::SessionState;

const MAX_REDIRECTS: usize = 8;

/// What the HTTP pipeline needs from the navigation layer to redirect after
/// a forced logout.
#[async_trait]
pub trait Navigator: Send + Sync {
    /// Path of the current location, without the query string.
    async fn current_path(&self) -> String;

    /// Navigates to `location` (path plus optional query).
    async fn assign(&self, location: &str);
}

/// Outcome of a completed navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub route: &'static RouteDescriptor,
    pub location: Location,
    /// Set when the guard sent the navigation somewhere other than requested.
    pub redirected_from: Option<String>,
}

/// Holds the current location and guards every move away from it.
pub struct Router {
    session: SessionState,
    routes: &'static [RouteDescriptor],
    current: RwLock<Location>,
}

impl Router {
    pub fn new(session: SessionState) -> Self {
        Self::with_routes(session, ROUTES)
    }

    /// Router over a custom route table.
    pub fn with_routes(session: SessionState, routes: &'static [RouteDescriptor]) -> Self {
        Self {
            session,
            routes,
            current: RwLock::new(Location::parse(ROOT_PATH)),
        }
    }

    pub async fn current(&self) -> Location {
        self.current.read().await.clone()
    }

    /// Navigates to `target`, following guard redirects until a route is
    /// allowed.
    pub async fn push(&self, target: &str) -> Result<Navigation, NavigationError> {
        let mut location = Location::parse(target);
        let mut redirected_from = None;

        for _ in 0..=MAX_REDIRECTS {
            let route = resolve_in(self.routes, &location.path);
            let authenticated = self.session.is_authenticated().await;

            match evaluate(route, authenticated) {
                GuardDecision::Proceed => {
                    debug!("Navigated to {} ({})", location, route.name);
                    *self.current.write().await = location.clone();
                    return Ok(Navigation {
                        route,
                        location,
                        redirected_from,
                    });
                }
                GuardDecision::Redirect(to) => {
                    info!("Route guard redirected {} to {}", location.path, to);
                    redirected_from.get_or_insert_with(|| location.to_string());
                    location = Location::parse(to);
                }
            }
        }

        Err(NavigationError::RedirectLoop(target.to_string()))
    }

    /// The `redirect` query parameter of the current location, if any.
    pub async fn redirect_target(&self) -> Option<String> {
        self.current.read().await.query_param("redirect")
    }
}

#[async_trait]
impl Navigator for Router {
    async fn current_path(&self) -> String {
        self.current.read().await.path.clone()
    }

    async fn assign(&self, location: &str) {
        if let Err(e) = self.push(location).await {
            error!("Navigation to {} failed: {}", location, e);
        }
    }
}
