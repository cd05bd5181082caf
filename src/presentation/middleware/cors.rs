//! CORS Middleware Configuration

use std::time::Duration;

use axum::http::{header, HeaderName, HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};

use crate::config::CorsSettings;

/// Header other services use to pass the caller's id
const USER_ID_HEADER: HeaderName = HeaderName::from_static("userid");

/// Create CORS layer from settings. An empty origin list allows any origin.
pub fn create_cors_layer(settings: &CorsSettings) -> CorsLayer {
    let origins: Vec<HeaderValue> = settings
        .allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    if origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, USER_ID_HEADER])
        .max_age(Duration::from_secs(3600))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unparseable_origins_are_skipped() {
        let settings = CorsSettings {
            allowed_origins: vec!["https://tunemate.app".into(), "bad\norigin".into()],
        };
        // Builds without panicking on the invalid entry
        let _ = create_cors_layer(&settings);
    }
}
