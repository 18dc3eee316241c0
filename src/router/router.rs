use std::sync::Arc;

use futures::future::BoxFuture;
use tracing::{debug, trace};

use super::RouteTable;
use crate::{
    handler::{Request, Response},
    http::{RawRequest, ResponseSink},
    Result,
};

/// Resolves requests to mounted routers, route handlers or a 404.
///
/// Mounts are consulted before routes, both in insertion order, and the first
/// hit wins. A matching mount takes the request exclusively: the routes of
/// this router are not tried for it.
#[derive(Debug, Default)]
pub struct Router {
    mount_prefix: String,
    routes: RouteTable,
    mounts: Vec<(String, Arc<Router>)>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_table(routes: RouteTable) -> Self {
        Self {
            routes,
            ..Default::default()
        }
    }

    /// A router that only delegates `base_path` to `child`.
    pub fn nest<P, R>(base_path: P, child: R) -> Self
    where
        P: Into<String>,
        R: Into<Arc<Router>>,
    {
        let base_path = base_path.into();
        let mut router = Self {
            mount_prefix: base_path.clone(),
            ..Default::default()
        };
        router.mount(base_path, child);
        router
    }

    /// Delegate requests whose target starts with `base_path` to `child`.
    ///
    /// Mounting the same prefix again replaces the child but keeps the
    /// original position.
    pub fn mount<P, R>(&mut self, base_path: P, child: R) -> &mut Self
    where
        P: Into<String>,
        R: Into<Arc<Router>>,
    {
        let base_path = base_path.into();
        let child = child.into();
        match self.mounts.iter_mut().find(|(prefix, _)| *prefix == base_path) {
            Some((_, existing)) => *existing = child,
            None => self.mounts.push((base_path, child)),
        }
        self
    }

    /// Prefix this router was created for by [`Router::nest`]; empty for roots.
    pub fn mount_prefix(&self) -> &str {
        &self.mount_prefix
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn mounts(&self) -> impl Iterator<Item = (&str, &Router)> {
        self.mounts
            .iter()
            .map(|(prefix, router)| (prefix.as_str(), router.as_ref()))
    }

    /// Dispatch one request.
    ///
    /// Unmatched requests get `404 Not Found`. Handler errors and transport
    /// errors are returned as is.
    pub async fn handle_request<S>(&self, request: RawRequest, sink: S) -> Result<()>
    where
        S: ResponseSink + 'static,
    {
        self.dispatch(request, Box::new(sink)).await
    }

    fn dispatch<'a>(
        &'a self,
        mut raw: RawRequest,
        sink: Box<dyn ResponseSink>,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            if let Some((prefix, child)) = self
                .mounts
                .iter()
                .find(|(prefix, _)| raw.target.starts_with(prefix.as_str()))
            {
                trace!(prefix = %prefix, target = %raw.target, "delegating to mounted router");
                raw.delegate(prefix);
                return child.dispatch(raw, sink).await;
            }

            let mount_path = raw.mount_path().to_string();
            let mut request = Request::new(raw);
            let response = Response::from_boxed(sink);
            match self.routes.find(request.method(), request.path()) {
                Some(route) => {
                    request.params = route.extract_params(request.path());
                    request.set_route_path(format!("{}{}", mount_path, route.pattern()));
                    debug!(
                        method = %request.method(),
                        path = request.path(),
                        route = request.route_path(),
                        "matched route"
                    );
                    route.handler().call(request, response).await
                }
                None => {
                    debug!(method = %request.method(), path = request.path(), "no route matched");
                    response.not_found();
                    Ok(())
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use http::{header, Method, StatusCode};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::{
        http::{body, BufferedResponse, HeaderMapExt, ResponseParts},
        Error, RouteBuilder,
    };

    async fn dispatch(router: &Router, method: Method, target: &str) -> ResponseParts {
        let sink = BufferedResponse::new();
        router
            .handle_request(RawRequest::new(method, target), sink.clone())
            .await
            .unwrap();
        sink.snapshot()
    }

    fn test_router() -> Router {
        RouteBuilder::new()
            .get("/test/:id", |request: Request, response: Response| async move {
                response.json(&json!({ "id": request.param("id") }))
            })
            .post("/test", |_: Request, response: Response| async move {
                response.json(&json!({ "message": "Post request received" }))
            })
            .put("/test/:id", |request: Request, response: Response| async move {
                let id = request.param("id").unwrap_or_default();
                response.json(&json!({ "message": format!("Put request received for id {id}") }))
            })
            .delete("/test/:id", |request: Request, response: Response| async move {
                let id = request.param("id").unwrap_or_default();
                response.json(&json!({ "message": format!("Delete request received for id {id}") }))
            })
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn dispatches_by_method_and_path() {
        let router = test_router();
        let cases = [
            (Method::GET, "/test/123", r#"{"id":"123"}"#),
            (Method::POST, "/test", r#"{"message":"Post request received"}"#),
            (
                Method::PUT,
                "/test/123",
                r#"{"message":"Put request received for id 123"}"#,
            ),
            (
                Method::DELETE,
                "/test/123",
                r#"{"message":"Delete request received for id 123"}"#,
            ),
        ];
        for (method, target, expected) in cases {
            let response = dispatch(&router, method, target).await;
            assert_eq!(response.status, StatusCode::OK);
            assert_eq!(response.body_string(), expected);
            assert_eq!(
                response.header(header::CONTENT_TYPE).unwrap(),
                "application/json"
            );
        }
    }

    #[tokio::test]
    async fn unknown_path_is_not_found() {
        let response = dispatch(&test_router(), Method::GET, "/unknown").await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.body_string(), "Not Found");
        assert!(response.header(header::CONTENT_TYPE).is_none());
    }

    #[tokio::test]
    async fn wrong_method_is_not_found() {
        let response = dispatch(&test_router(), Method::PATCH, "/test/123").await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn lowercase_method_matches() {
        let method = Method::from_bytes(b"get").unwrap();
        let response = dispatch(&test_router(), method, "/test/1").await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body_string(), r#"{"id":"1"}"#);
    }

    #[tokio::test]
    async fn query_string_does_not_affect_matching() {
        let response = dispatch(&test_router(), Method::GET, "/test/42?verbose=1").await;
        assert_eq!(response.body_string(), r#"{"id":"42"}"#);
    }

    #[tokio::test]
    async fn registration_order_decides() {
        let router = RouteBuilder::new()
            .get("/users/:id", |_: Request, response: Response| async move {
                response.send("by id")
            })
            .get("/users/me", |_: Request, response: Response| async move {
                response.send("me")
            })
            .build()
            .unwrap();
        assert_eq!(
            dispatch(&router, Method::GET, "/users/me").await.body_string(),
            "by id"
        );
    }

    fn users_router() -> Router {
        RouteBuilder::new()
            .get("/users/:id", |request: Request, response: Response| async move {
                response.json(&json!({
                    "id": request.param("id"),
                    "route": request.route_path(),
                    "url": request.url(),
                }))
            })
            .get("/", |_: Request, response: Response| async move {
                response.send("index")
            })
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn mounted_router_sees_stripped_path() {
        let router = Router::nest("/api", users_router());
        assert_eq!(router.mount_prefix(), "/api");
        let response = dispatch(&router, Method::GET, "/api/users/42?x=1").await;
        assert_eq!(
            response.body_string(),
            r#"{"id":"42","route":"/api/users/:id","url":"/users/42?x=1"}"#
        );
    }

    #[tokio::test]
    async fn empty_remainder_becomes_root() {
        let router = Router::nest("/api", users_router());
        assert_eq!(dispatch(&router, Method::GET, "/api").await.body_string(), "index");
    }

    #[tokio::test]
    async fn nested_mounts_accumulate_route_path() {
        let router = Router::nest("/v1", Router::nest("/api", users_router()));
        let response = dispatch(&router, Method::GET, "/v1/api/users/7").await;
        assert_eq!(
            response.body_string(),
            r#"{"id":"7","route":"/v1/api/users/:id","url":"/users/7"}"#
        );
    }

    #[tokio::test]
    async fn mounts_shadow_local_routes() {
        let mut router = RouteBuilder::new()
            .get("/api/users/:id", |_: Request, response: Response| async move {
                response.send("parent")
            })
            .get("/health", |_: Request, response: Response| async move {
                response.send("ok")
            })
            .build()
            .unwrap();
        router.mount("/api", users_router());

        let response = dispatch(&router, Method::GET, "/api/users/1").await;
        assert!(response.body_string().contains(r#""id":"1""#));
        assert_eq!(dispatch(&router, Method::GET, "/health").await.body_string(), "ok");
    }

    #[tokio::test]
    async fn unmatched_in_child_is_not_found() {
        let router = Router::nest("/api", users_router());
        let response = dispatch(&router, Method::GET, "/api/nothing/here").await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.body_string(), "Not Found");
    }

    #[tokio::test]
    async fn first_mount_wins() {
        let mut router = Router::new();
        router
            .mount(
                "/a",
                RouteBuilder::new()
                    .get("/b", |_: Request, response: Response| async move {
                        response.send("first")
                    })
                    .build()
                    .unwrap(),
            )
            .mount(
                "/a/b",
                RouteBuilder::new()
                    .get("/", |_: Request, response: Response| async move {
                        response.send("second")
                    })
                    .build()
                    .unwrap(),
            );
        assert_eq!(dispatch(&router, Method::GET, "/a/b").await.body_string(), "first");
        assert_eq!(router.mounts().count(), 2);
    }

    #[tokio::test]
    async fn handler_errors_propagate() {
        let router = RouteBuilder::new()
            .get("/fail", |_: Request, _: Response| async move {
                Err::<(), _>(Error::new("handler failed"))
            })
            .build()
            .unwrap();
        let sink = BufferedResponse::new();
        let error = router
            .handle_request(RawRequest::new(Method::GET, "/fail"), sink.clone())
            .await
            .unwrap_err();
        assert_eq!(error.to_string(), "handler failed");
        assert!(!sink.is_ended());
    }

    #[tokio::test]
    async fn handlers_read_the_body() {
        let router = RouteBuilder::new()
            .post("/echo", |mut request: Request, response: Response| async move {
                let body = request.body().await?.clone();
                match body.as_json() {
                    Some(value) => response.status(StatusCode::CREATED).json(value),
                    None => response.send(body.as_text().unwrap_or_default().to_string()),
                }
            })
            .build()
            .unwrap();
        let sink = BufferedResponse::new();
        router
            .handle_request(
                RawRequest::new(Method::POST, "/echo")
                    .with_body(body::from_chunks(vec![b"{\"a\":1}".to_vec()])),
                sink.clone(),
            )
            .await
            .unwrap();
        let parts = sink.snapshot();
        assert_eq!(parts.status, StatusCode::CREATED);
        assert_eq!(parts.body_string(), r#"{"a":1}"#);
    }
}
