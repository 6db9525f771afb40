use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{
        header::{ACCESS_CONTROL_ALLOW_ORIGIN, ORIGIN},
        HeaderValue,
    },
    middleware::Next,
    response::Response,
};
use tracing::warn;

/// Methods advertised to allow-listed origins on a pre-flight response.
pub const ALLOW_METHODS: &str = "GET, POST, PUT, PATCH, DELETE";

/// The fixed set of origins allowed to read the API cross-origin.
///
/// Matching is exact: the `Origin` header value must equal an entry
/// byte-for-byte. Anything else gets no CORS headers at all and the browser
/// enforces the block; the response body is unaffected.
#[derive(Debug, Clone)]
pub struct AllowedOrigins(Arc<Vec<HeaderValue>>);

impl AllowedOrigins {
    /// Parse a comma-separated origin list. Entries that are not valid
    /// header values are skipped with a warning.
    pub fn from_config(raw: &str) -> Self {
        let origins = raw
            .split(',')
            .filter_map(|origin| {
                let trimmed = origin.trim();
                if trimmed.is_empty() {
                    return None;
                }
                match HeaderValue::from_str(trimmed) {
                    Ok(value) => Some(value),
                    Err(_) => {
                        warn!("Skipping invalid CORS origin: {trimmed:?}");
                        None
                    }
                }
            })
            .collect();
        Self(Arc::new(origins))
    }

    pub fn contains(&self, origin: &HeaderValue) -> bool {
        self.0.contains(origin)
    }
}

/// Echo the request `Origin` back in `Access-Control-Allow-Origin` when it
/// is allow-listed; otherwise leave the response headers untouched.
pub async fn allow_origin_middleware(
    State(origins): State<AllowedOrigins>,
    request: Request,
    next: Next,
) -> Response {
    let origin = request.headers().get(ORIGIN).cloned();
    let mut response = next.run(request).await;

    if let Some(origin) = origin {
        if origins.contains(&origin) {
            response
                .headers_mut()
                .insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin);
        }
    }

    response
}
