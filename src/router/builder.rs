use std::sync::Arc;

use http::Method;

use super::{route::parse_method, Route, RouteTable, Router};
use crate::{handler::Handler, Error, Result};

/// Accumulates routes and produces a [`Router`].
///
/// Invalid method tokens are reported by [`RouteBuilder::build`] so the
/// registration calls can stay chainable.
#[derive(Debug, Default)]
pub struct RouteBuilder {
    routes: RouteTable,
    invalid_method: Option<String>,
}

impl RouteBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_route<P, H>(mut self, method: &str, pattern: P, handler: H) -> Self
    where
        P: Into<String>,
        H: Handler,
    {
        match parse_method(method) {
            Ok(method) => {
                self.routes
                    .insert(Route::with_method(method, pattern, Arc::new(handler)));
            }
            Err(_) => {
                self.invalid_method.get_or_insert_with(|| method.to_string());
            }
        }
        self
    }

    pub fn route<P, H>(mut self, method: Method, pattern: P, handler: H) -> Self
    where
        P: Into<String>,
        H: Handler,
    {
        self.routes
            .insert(Route::with_method(method, pattern, Arc::new(handler)));
        self
    }

    pub fn get<P: Into<String>, H: Handler>(self, pattern: P, handler: H) -> Self {
        self.route(Method::GET, pattern, handler)
    }

    pub fn post<P: Into<String>, H: Handler>(self, pattern: P, handler: H) -> Self {
        self.route(Method::POST, pattern, handler)
    }

    pub fn put<P: Into<String>, H: Handler>(self, pattern: P, handler: H) -> Self {
        self.route(Method::PUT, pattern, handler)
    }

    pub fn delete<P: Into<String>, H: Handler>(self, pattern: P, handler: H) -> Self {
        self.route(Method::DELETE, pattern, handler)
    }

    pub fn patch<P: Into<String>, H: Handler>(self, pattern: P, handler: H) -> Self {
        self.route(Method::PATCH, pattern, handler)
    }

    /// Build a root router from a copy of the accumulated routes.
    pub fn build(&self) -> Result<Router> {
        if let Some(method) = &self.invalid_method {
            return Err(Error::InvalidMethod(method.clone()));
        }
        Ok(Router::from_table(self.routes.clone()))
    }
}

impl From<RouteTable> for RouteBuilder {
    fn from(routes: RouteTable) -> Self {
        Self {
            routes,
            invalid_method: None,
        }
    }
}

impl FromIterator<Route> for RouteBuilder {
    fn from_iter<T: IntoIterator<Item = Route>>(iter: T) -> Self {
        Self::from(iter.into_iter().collect::<RouteTable>())
    }
}
