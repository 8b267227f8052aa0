use axum::{
    extract::Request,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use rust_embed::RustEmbed;

#[derive(RustEmbed)]
#[folder = "ui/dist/"]
struct UiAssets;

const INDEX_PAGE: &str = "index.html";

fn asset_response(path: &str) -> Option<Response> {
    let content = UiAssets::get(path)?;
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    Some(
        (
            [(header::CONTENT_TYPE, mime.as_ref().to_string())],
            content.data.into_owned(),
        )
            .into_response(),
    )
}

/// Serve the embedded dashboard page at `/`, other embedded assets by path
pub async fn serve_ui(req: Request) -> impl IntoResponse {
    let path = match req.uri().path().trim_start_matches('/') {
        "" => INDEX_PAGE,
        p => p,
    };

    asset_response(path).unwrap_or_else(|| (StatusCode::NOT_FOUND, "Not Found").into_response())
}
