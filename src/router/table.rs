use http::Method;

use super::Route;

/// Routes keyed by method and pattern, kept in registration order.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a route. A route with the same method and pattern is replaced
    /// in place and returned; its position in the order is kept.
    pub fn insert(&mut self, route: Route) -> Option<Route> {
        match self
            .routes
            .iter_mut()
            .find(|existing| existing.method() == route.method() && existing.pattern() == route.pattern())
        {
            Some(existing) => Some(std::mem::replace(existing, route)),
            None => {
                self.routes.push(route);
                None
            }
        }
    }

    pub fn get(&self, method: &Method, pattern: &str) -> Option<&Route> {
        self.routes
            .iter()
            .find(|route| route.method() == method && route.pattern() == pattern)
    }

    /// First route, in registration order, matching the request.
    pub fn find(&self, method: &Method, path: &str) -> Option<&Route> {
        self.routes.iter().find(|route| route.matches(method, path))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Route> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl<'a> IntoIterator for &'a RouteTable {
    type Item = &'a Route;
    type IntoIter = std::slice::Iter<'a, Route>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Route> for RouteTable {
    fn from_iter<T: IntoIterator<Item = Route>>(iter: T) -> Self {
        let mut table = Self::new();
        for route in iter {
            table.insert(route);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        handler::{Request, Response},
        Result,
    };

    async fn noop(_: Request, response: Response) -> Result<()> {
        response.end();
        Ok(())
    }

    fn route(method: &str, pattern: &str) -> Route {
        Route::new(method, pattern, noop).unwrap()
    }

    fn patterns(table: &RouteTable) -> Vec<(String, String)> {
        table
            .iter()
            .map(|route| (route.method().to_string(), route.pattern().to_string()))
            .collect()
    }

    #[test]
    fn keeps_registration_order() {
        let table: RouteTable = vec![
            route("GET", "/b"),
            route("GET", "/a"),
            route("POST", "/b"),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            patterns(&table),
            vec![
                ("GET".to_string(), "/b".to_string()),
                ("GET".to_string(), "/a".to_string()),
                ("POST".to_string(), "/b".to_string()),
            ]
        );
    }

    #[test]
    fn replaces_duplicates_in_place() {
        let mut table = RouteTable::new();
        assert!(table.insert(route("GET", "/a")).is_none());
        table.insert(route("GET", "/b"));
        assert!(table.insert(route("get", "/a")).is_some());
        assert_eq!(table.len(), 2);
        assert_eq!(table.iter().next().unwrap().pattern(), "/a");
        assert!(table.get(&Method::GET, "/a").is_some());
        assert!(table.get(&Method::POST, "/a").is_none());
    }

    #[test]
    fn first_match_wins() {
        let table: RouteTable = vec![route("GET", "/users/:id"), route("GET", "/users/me")]
            .into_iter()
            .collect();
        assert_eq!(
            table.find(&Method::GET, "/users/me").unwrap().pattern(),
            "/users/:id"
        );
        assert!(table.find(&Method::DELETE, "/users/me").is_none());
    }
}
