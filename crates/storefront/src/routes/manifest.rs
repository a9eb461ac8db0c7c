//! Web app manifest route handler.

use axum::{
    http::header,
    response::{IntoResponse, Response},
};
use foodpi_core::{ICON_SIZES, icon_file_name};

/// Where `fp-cli icons generate` output is served from.
const ICON_BASE_URL: &str = "/static/images/icons";

/// Build the web app manifest, one icon entry per generated size.
#[must_use]
pub fn manifest_json() -> serde_json::Value {
    let icons: Vec<_> = ICON_SIZES
        .iter()
        .map(|&size| {
            serde_json::json!({
                "src": format!("{ICON_BASE_URL}/{}", icon_file_name(size)),
                "sizes": format!("{size}x{size}"),
                "type": "image/png",
                "purpose": "any maskable"
            })
        })
        .collect();

    serde_json::json!({
        "name": "FoodPi Hub",
        "short_name": "FoodPi",
        "description": "Order food and pay with Pi",
        "start_url": "/",
        "icons": icons,
        "theme_color": "#6b3fa0",
        "background_color": "#ffffff",
        "display": "standalone"
    })
}

/// Serve the web app manifest.
pub async fn webmanifest() -> Response {
    (
        [(header::CONTENT_TYPE, "application/manifest+json")],
        manifest_json().to_string(),
    )
        .into_response()
}
