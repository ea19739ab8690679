//! Client-side routes and push-based navigation.

use std::fmt;

/// A page the shell can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Entry route hosting the login form
    Login,
    /// Content behind the auth gate
    Protected,
    /// Finance transaction list and form
    Transactions,
}

impl Route {
    pub const ALL: [Route; 3] = [Route::Login, Route::Protected, Route::Transactions];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/",
            Route::Protected => "/protected",
            Route::Transactions => "/transactions",
        }
    }

    /// Resolve a path from the route table. Unknown paths have no route.
    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.path() == path)
    }

    /// Whether activating this route runs the auth gate
    pub fn is_gated(&self) -> bool {
        matches!(self, Route::Protected)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Login => "Login",
            Route::Protected => "Protected Page",
            Route::Transactions => "Transactions",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Maximum number of history entries kept
pub const MAX_HISTORY: usize = 32;

/// Navigation history. Starts on the entry route; `push` adds, `back` pops.
#[derive(Debug, Clone)]
pub struct Router {
    history: Vec<Route>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new(Route::Login)
    }
}

impl Router {
    pub fn new(start: Route) -> Self {
        Self {
            history: vec![start],
        }
    }

    pub fn current(&self) -> Route {
        // history is never empty: `back` keeps the first entry
        self.history.last().copied().unwrap_or(Route::Login)
    }

    /// Navigate to `route`.
    ///
    /// Pushing the current route again adds no entry; the shell still treats
    /// it as a fresh activation. Past [`MAX_HISTORY`] entries the oldest entry
    /// after the first is dropped.
    pub fn push(&mut self, route: Route) {
        if self.current() == route {
            return;
        }
        if self.history.len() >= MAX_HISTORY {
            self.history.remove(1);
        }
        self.history.push(route);
    }

    /// Go back one entry. The first entry is never popped.
    pub fn back(&mut self) -> Option<Route> {
        if self.history.len() > 1 {
            self.history.pop();
            Some(self.current())
        } else {
            None
        }
    }

    pub fn depth(&self) -> usize {
        self.history.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_paths_roundtrip_table() {
        for route in Route::ALL {
            assert_eq!(Route::from_path(route.path()), Some(route));
        }
        assert_eq!(Route::from_path("/nope"), None);
        assert_eq!(Route::from_path(""), None);
    }

    #[test]
    fn test_only_protected_is_gated() {
        assert!(Route::Protected.is_gated());
        assert!(!Route::Login.is_gated());
        assert!(!Route::Transactions.is_gated());
    }

    #[test]
    fn test_router_push_and_back() {
        let mut router = Router::default();
        assert_eq!(router.current(), Route::Login);

        router.push(Route::Protected);
        assert_eq!(router.current(), Route::Protected);
        assert_eq!(router.depth(), 2);

        router.push(Route::Login);
        assert_eq!(router.current(), Route::Login);

        assert_eq!(router.back(), Some(Route::Protected));
        assert_eq!(router.back(), Some(Route::Login));
        // First entry stays
        assert_eq!(router.back(), None);
        assert_eq!(router.current(), Route::Login);
    }

    #[test]
    fn test_push_same_route_adds_no_entry() {
        let mut router = Router::default();
        router.push(Route::Protected);
        router.push(Route::Protected);
        router.push(Route::Protected);
        assert_eq!(router.depth(), 2);

        assert_eq!(router.back(), Some(Route::Login));
        assert_eq!(router.back(), None);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut router = Router::new(Route::Protected);
        for i in 0..(MAX_HISTORY * 3) {
            let route = if i % 2 == 0 { Route::Login } else { Route::Transactions };
            router.push(route);
        }
        assert_eq!(router.depth(), MAX_HISTORY);

        // The first entry survives trimming
        while router.back().is_some() {}
        assert_eq!(router.current(), Route::Protected);
    }

    #[test]
    fn test_route_display_is_path() {
        assert_eq!(Route::Protected.to_string(), "/protected");
    }
}
