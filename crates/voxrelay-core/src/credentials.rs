//! 참가 응답에서 미디어 토큰/URL 추출.
//!
//! 업스트림 응답 스키마는 테넌트마다 다르다. 우선순위 경로 조회를 먼저 하고,
//! 실패한 필드만 문서 순서 깊이 우선 탐색으로 찾는다.
//! 경로 조회 결과가 있으면 탐색 결과보다 항상 우선한다
//! (베어러 토큰처럼 JWT 모양 문자열이 여러 개 있는 경우).

use serde_json::Value;

use crate::error::CoreError;

/// 토큰 경로 (우선순위 순)
pub const TOKEN_PATHS: [&str; 8] = [
    "room.token",
    "room.accessToken",
    "room.jwt",
    "roomToken",
    "roomJWT",
    "token",
    "accessToken",
    "jwt",
];

/// URL 경로 (우선순위 순)
pub const URL_PATHS: [&str; 8] = [
    "endpoint",
    "room.url",
    "room.serverUrl",
    "room.wss",
    "wss",
    "wssUrl",
    "wsUrl",
    "url",
];

/// 보안 웹소켓 스킴 접두사
pub const SECURE_WS_PREFIX: &str = "wss://";

/// 값을 찾은 단계
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchSource {
    /// 우선순위 경로 조회
    Path(&'static str),
    /// 전체 트리 탐색
    Scan,
}

/// 추출 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaCredentials {
    pub token: String,
    pub url: String,
    pub token_source: MatchSource,
    pub url_source: MatchSource,
}

/// 점 구분 경로로 중첩 객체 탐색 (객체만 내려간다)
pub fn get_by_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(value, |cur, key| cur.as_object().and_then(|obj| obj.get(key)))
}

/// 경로 단계의 토큰 조건: 점이 정확히 2개
fn has_three_segments(s: &str) -> bool {
    s.matches('.').count() == 2
}

/// 탐색 단계의 토큰 조건: `seg.seg.seg`, 각 세그먼트는 base64url 문자 1개 이상
pub fn is_jwt_shaped(s: &str) -> bool {
    let segments: Vec<&str> = s.split('.').collect();
    segments.len() == 3
        && segments.iter().all(|seg| {
            !seg.is_empty()
                && seg
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        })
}

fn is_secure_ws(s: &str) -> bool {
    s.starts_with(SECURE_WS_PREFIX)
}

/// 경로 목록에서 조건을 만족하는 첫 문자열
fn find_by_paths<'a>(
    value: &'a Value,
    paths: &[&'static str],
    accept: fn(&str) -> bool,
) -> Option<(&'a str, &'static str)> {
    paths.iter().find_map(|path| {
        get_by_path(value, path)
            .and_then(Value::as_str)
            .filter(|s| accept(s))
            .map(|s| (s, *path))
    })
}

/// 깊이 우선, 문서 순서로 조건을 만족하는 첫 문자열
pub fn find_first_string(value: &Value, accept: fn(&str) -> bool) -> Option<&str> {
    match value {
        Value::String(s) if accept(s) => Some(s.as_str()),
        Value::Object(map) => map.values().find_map(|v| find_first_string(v, accept)),
        Value::Array(items) => items.iter().find_map(|v| find_first_string(v, accept)),
        _ => None,
    }
}

/// 미디어 자격증명 추출
///
/// 둘 중 하나라도 못 찾으면 원본 응답과 함께 `CoreError::CredentialsNotFound`.
pub fn extract_media_credentials(join: &Value) -> Result<MediaCredentials, CoreError> {
    let token = find_by_paths(join, &TOKEN_PATHS, has_three_segments)
        .map(|(s, path)| (s, MatchSource::Path(path)))
        .or_else(|| find_first_string(join, is_jwt_shaped).map(|s| (s, MatchSource::Scan)));

    let url = find_by_paths(join, &URL_PATHS, is_secure_ws)
        .map(|(s, path)| (s, MatchSource::Path(path)))
        .or_else(|| find_first_string(join, is_secure_ws).map(|s| (s, MatchSource::Scan)));

    match (token, url) {
        (Some((token, token_source)), Some((url, url_source))) => Ok(MediaCredentials {
            token: token.to_string(),
            url: url.to_string(),
            token_source,
            url_source,
        }),
        (token, url) => Err(CoreError::CredentialsNotFound {
            token_found: token.is_some(),
            url_found: url.is_some(),
            raw: join.clone(),
        }),
    }
}
