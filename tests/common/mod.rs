use axum::{
    body::Body,
    http::{header, Method, Request},
    response::Response,
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use movie_catalog_api::{app_router, config::AppConfig, store::MovieStore, AppState};

/// Helper harness for spinning up the application router against a fresh
/// seeded in-memory store.
pub struct TestApp {
    router: Router,
    pub seed_len: usize,
}

impl TestApp {
    /// Construct a new test application with fresh catalog state.
    pub fn new() -> Self {
        let store = MovieStore::from_seed().expect("bundled seed data parses");
        let seed_len = store.len();
        let state = AppState::new(AppConfig::default(), store);

        Self {
            router: app_router(state),
            seed_len,
        }
    }

    /// Issue a single request against the router.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        origin: Option<&str>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(origin) = origin {
            builder = builder.header(header::ORIGIN, origin);
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .expect("request builds"),
            None => builder.body(Body::empty()).expect("request builds"),
        };

        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }
}

/// Collect a response body as JSON. Empty bodies come back as `Null`.
pub async fn response_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
}
