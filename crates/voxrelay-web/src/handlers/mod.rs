//! API 핸들러 모듈.

pub mod control;
pub mod health;
pub mod pages;
pub mod session;

use axum::body::Bytes;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// JSON 요청 본문 파싱
///
/// 빈 본문은 기본값으로 취급한다. 페이지가 설정 없이 호출해도 서버 기본값으로 동작하게 한다.
pub(crate) fn parse_body<T>(body: &Bytes) -> Result<T, ApiError>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| ApiError::BadRequest(format!("JSON 본문 파싱 실패: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize)]
    struct Sample {
        #[serde(default)]
        name: Option<String>,
    }

    #[test]
    fn empty_body_is_default() {
        let sample: Sample = parse_body(&Bytes::from_static(b"  \n")).unwrap();
        assert!(sample.name.is_none());
    }

    #[test]
    fn malformed_body_is_bad_request() {
        let err = parse_body::<Sample>(&Bytes::from_static(b"{nope")).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn json_body_is_parsed() {
        let sample: Sample = parse_body(&Bytes::from_static(br#"{"name":"x"}"#)).unwrap();
        assert_eq!(sample.name.as_deref(), Some("x"));
    }
}
