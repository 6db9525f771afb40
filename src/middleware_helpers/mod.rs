pub mod cors;

pub use cors::{allow_origin_middleware, AllowedOrigins, ALLOW_METHODS};
