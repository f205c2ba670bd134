use super::routes::{RouteDescriptor, LOGIN_PATH, ROOT_PATH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Proceed,
    Redirect(&'static str),
}

/// Access check run before every navigation.
///
/// The auth requirement is checked first; a route flagged both ways sends an
/// anonymous user to login rather than home.
pub fn evaluate(target: &RouteDescriptor, authenticated: bool) -> GuardDecision {
    if target.requires_auth && !authenticated {
        return GuardDecision::Redirect(LOGIN_PATH);
    }

    if target.guest_only && authenticated {
        return GuardDecision::Redirect(ROOT_PATH);
    }

    GuardDecision::Proceed
}
