//! 정적 페이지 임베드 및 서빙.
//!
//! rust-embed로 `pages/` 디렉토리의 HTML을 바이너리에 포함한다.

use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use rust_embed::Embed;

/// 음성 세션 페이지
pub const VOICE_PAGE: &str = "index.html";

/// 원격 제어 페이지
pub const CONTROL_PAGE: &str = "control.html";

#[derive(Embed)]
#[folder = "pages"]
#[include = "*.html"]
#[include = "*.css"]
#[include = "*.js"]
#[include = "*.svg"]
#[include = "*.ico"]
struct Pages;

/// 임베디드 파일 응답 (없으면 None)
fn embedded_file(path: &str) -> Option<Response> {
    let content = Pages::get(path)?;
    let mime = mime_guess::from_path(path).first_or_octet_stream();

    let cache_control = if path.ends_with(".html") {
        "no-cache"
    } else {
        "public, max-age=3600"
    };

    Some(
        (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, mime.as_ref()),
                (header::CACHE_CONTROL, cache_control),
            ],
            content.data.into_owned(),
        )
            .into_response(),
    )
}

/// 이름으로 페이지 응답
pub fn serve_page(name: &str) -> Response {
    embedded_file(name).unwrap_or_else(|| not_found(name))
}

/// 라우트에 없는 경로의 fallback 핸들러
pub async fn serve_static(uri: Uri) -> Response {
    let path = uri.path().trim_start_matches('/');
    embedded_file(path).unwrap_or_else(|| not_found(path))
}

fn not_found(path: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "error": format!("찾을 수 없음: /{path}"),
            "status": StatusCode::NOT_FOUND.as_u16(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_pages_are_embedded() {
        assert!(Pages::get(VOICE_PAGE).is_some());
        assert!(Pages::get(CONTROL_PAGE).is_some());
    }

    #[test]
    fn pages_are_html_without_cache() {
        let resp = serve_page(CONTROL_PAGE);
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "text/html");
        assert_eq!(resp.headers()[header::CACHE_CONTROL], "no-cache");
    }

    #[test]
    fn unknown_page_is_not_found() {
        assert_eq!(serve_page("missing.html").status(), StatusCode::NOT_FOUND);
    }
}
