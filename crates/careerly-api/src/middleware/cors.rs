//! CORS layer configuration.

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

use careerly_core::config::CorsConfig;

/// Builds a CORS tower layer from configuration.
///
/// Credentials are always allowed so browsers send the refresh cookie.
/// A `*` origin mirrors the request origin, since a literal wildcard is
/// rejected together with credentials.
pub fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    let mut layer = CorsLayer::new().allow_credentials(true);

    // Origins
    if config.allowed_origins.iter().any(|o| o == "*") {
        layer = layer.allow_origin(AllowOrigin::mirror_request());
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        layer = layer.allow_origin(origins);
    }

    // Methods
    let methods: Vec<Method> = config
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();
    layer = layer.allow_methods(methods);

    layer = layer.allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    layer.max_age(std::time::Duration::from_secs(config.max_age_seconds))
}
