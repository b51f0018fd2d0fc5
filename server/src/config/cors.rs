use axum::http::{header, HeaderName, HeaderValue, Method};
use std::env;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// The function endpoints are called straight from the browser, so any origin is
/// accepted unless a list is configured.
const DEFAULT_ALLOWED_ORIGINS: &str = "*";

const PREFLIGHT_MAX_AGE_SECS: u64 = 86400;

pub fn create_cors_layer() -> CorsLayer {
    let origins_str =
        env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| DEFAULT_ALLOWED_ORIGINS.to_string());
    cors_layer_for(&origins_str)
}

pub fn cors_layer_for(origins_str: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            header::ORIGIN,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
        ])
        .expose_headers([header::CONTENT_LENGTH, header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(PREFLIGHT_MAX_AGE_SECS));

    match parse_origins(origins_str) {
        // Credentials cannot be combined with a wildcard origin.
        Some(origins) => layer
            .allow_origin(AllowOrigin::list(origins))
            .allow_credentials(true),
        None => layer.allow_origin(AllowOrigin::any()),
    }
}

/// `None` means any origin.
fn parse_origins(origins_str: &str) -> Option<Vec<HeaderValue>> {
    if origins_str.split(',').any(|o| o.trim() == "*") {
        tracing::info!("CORS: Allowing any origin");
        return None;
    }

    let origins: Vec<HeaderValue> = origins_str
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => {
                tracing::debug!("CORS: Allowing origin: {}", origin);
                Some(value)
            }
            Err(e) => {
                tracing::warn!("CORS: Invalid origin '{}': {}", origin, e);
                None
            }
        })
        .collect();

    if origins.is_empty() {
        tracing::warn!("CORS: No valid origins configured, allowing any origin");
        None
    } else {
        tracing::info!("CORS: Configured with {} allowed origin(s)", origins.len());
        Some(origins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wildcard_means_any() {
        assert!(parse_origins("*").is_none());
        assert!(parse_origins("https://a.ae, *").is_none());
    }

    #[test]
    fn test_origin_list() {
        let origins = parse_origins("https://sponsors.ae, http://localhost:5173,").unwrap();
        assert_eq!(origins.len(), 2);
        assert_eq!(origins[0], "https://sponsors.ae");
    }

    #[test]
    fn test_blank_list_falls_back_to_any() {
        assert!(parse_origins(" , ").is_none());
    }

    #[test]
    fn test_create_cors_layer() {
        let _any = cors_layer_for("*");
        let _listed = cors_layer_for("http://localhost:3000");
    }
}
