use std::fmt;

pub const ROOT_PATH: &str = "/";
pub const LOGIN_PATH: &str = "/auth/login";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteName {
    Dashboard,
    Employee,
    Login,
    NotFound,
}

impl fmt::Display for RouteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RouteName::Dashboard => "dashboard",
            RouteName::Employee => "employee",
            RouteName::Login => "login",
            RouteName::NotFound => "notfound",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteDescriptor {
    pub name: RouteName,
    pub path: &'static str,
    pub requires_auth: bool,
    pub guest_only: bool,
}

pub const ROUTES: &[RouteDescriptor] = &[
    RouteDescriptor {
        name: RouteName::Dashboard,
        path: ROOT_PATH,
        requires_auth: true,
        guest_only: false,
    },
    RouteDescriptor {
        name: RouteName::Employee,
        path: "/employee",
        requires_auth: true,
        guest_only: false,
    },
    RouteDescriptor {
        name: RouteName::Login,
        path: LOGIN_PATH,
        requires_auth: false,
        guest_only: true,
    },
];

/// Catch-all for any path not in [`ROUTES`].
pub const NOT_FOUND: RouteDescriptor = RouteDescriptor {
    name: RouteName::NotFound,
    path: "*",
    requires_auth: false,
    guest_only: false,
};

pub fn resolve(path: &str) -> &'static RouteDescriptor {
    resolve_in(ROUTES, path)
}

/// Exact-match lookup in `routes`, falling back to [`NOT_FOUND`].
pub fn resolve_in(routes: &'static [RouteDescriptor], path: &str) -> &'static RouteDescriptor {
    routes
        .iter()
        .find(|route| route.path == path)
        .unwrap_or(&NOT_FOUND)
}

/// A navigation target split into path and query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub query: Option<String>,
}

impl Location {
    pub fn parse(location: &str) -> Self {
        let (path, query) = match location.split_once('?') {
            Some((path, query)) => (path, Some(query.to_string())),
            None => (location, None),
        };
        let path = if path.is_empty() { ROOT_PATH } else { path };

        Self {
            path: path.to_string(),
            query,
        }
    }

    pub fn query_param(&self, name: &str) -> Option<String> {
        let query = self.query.as_deref()?;
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.query {
            Some(query) => write!(f, "{}?{}", self.path, query),
            None => f.write_str(&self.path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_table() {
        assert_eq!(resolve("/").name, RouteName::Dashboard);
        assert!(resolve("/").requires_auth);
        assert_eq!(resolve("/employee").name, RouteName::Employee);
        assert!(resolve("/employee").requires_auth);

        let login = resolve("/auth/login");
        assert_eq!(login.name, RouteName::Login);
        assert!(login.guest_only);
        assert!(!login.requires_auth);
    }

    #[test]
    fn test_unknown_paths_hit_catch_all() {
        for path in ["/reports", "/employee/12", "/auth", "/auth/login/extra"] {
            let route = resolve(path);
            assert_eq!(route.name, RouteName::NotFound, "{}", path);
            assert!(!route.requires_auth && !route.guest_only);
        }
    }

    #[test]
    fn test_location_parse() {
        let location = Location::parse("/auth/login?redirect=/employee");
        assert_eq!(location.path, "/auth/login");
        assert_eq!(location.query_param("redirect").as_deref(), Some("/employee"));
        assert_eq!(location.query_param("other"), None);
        assert_eq!(location.to_string(), "/auth/login?redirect=/employee");

        let location = Location::parse("/employee");
        assert_eq!(location.query, None);
        assert_eq!(location.query_param("redirect"), None);

        assert_eq!(Location::parse("").path, "/");
    }

    #[test]
    fn test_location_decodes_query() {
        let location = Location::parse("/auth/login?redirect=%2Femployee&x=1");
        assert_eq!(location.query_param("redirect").as_deref(), Some("/employee"));
    }
}
