use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ApiError;
use super::AppState;
use crate::aggregate::SentimentCounts;

/// Body of `POST /sentiment`. A missing `comments` field means no comments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentRequest {
    #[serde(default)]
    pub comments: Vec<String>,
}

impl SentimentRequest {
    /// Parses a raw body. Only a JSON object is accepted; arrays, scalars and
    /// `null` are rejected even though serde could map some of them.
    pub fn from_slice(body: &[u8]) -> Result<Self, ApiError> {
        let value: Value = serde_json::from_slice(body)?;
        let kind = match &value {
            Value::Object(_) => None,
            Value::Null => Some("null"),
            Value::Bool(_) => Some("a boolean"),
            Value::Number(_) => Some("a number"),
            Value::String(_) => Some("a string"),
            Value::Array(_) => Some("an array"),
        };
        if let Some(kind) = kind {
            return Err(ApiError::NotAnObject(kind));
        }
        Ok(serde_json::from_value(value)?)
    }
}

/// True for `application/json` and `application/*+json`, parameters ignored.
pub fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(value) = headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let mime = value.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

pub async fn sentiment(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<SentimentCounts>, ApiError> {
    if !is_json_content_type(&headers) {
        let found = headers
            .get(header::CONTENT_TYPE)
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .unwrap_or_else(|| "none".to_string());
        return Err(ApiError::UnsupportedContentType(found));
    }
    let request = SentimentRequest::from_slice(&body?)?;
    let counts = state.analyzer.analyze(&request.comments)?;
    log::info!(
        "Classified {} comments: {} positive, {} negative, {} neutral",
        request.comments.len(),
        counts.positive,
        counts.negative,
        counts.neutral
    );
    Ok(Json(counts))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_comments_is_empty() -> Result<(), ApiError> {
        assert_eq!(SentimentRequest::from_slice(b"{}")?.comments, Vec::<String>::new());
        Ok(())
    }

    #[test]
    fn test_extra_fields_are_ignored() -> Result<(), ApiError> {
        let request = SentimentRequest::from_slice(br#"{"comments": ["a"], "lang": "en"}"#)?;
        assert_eq!(request.comments, vec!["a"]);
        Ok(())
    }

    #[test]
    fn test_rejects_non_list_comments() {
        let result = SentimentRequest::from_slice(br#"{"comments": "nope"}"#);
        assert!(matches!(result, Err(ApiError::MalformedBody(_))));
        let result = SentimentRequest::from_slice(br#"{"comments": ["ok", 3]}"#);
        assert!(matches!(result, Err(ApiError::MalformedBody(_))));
    }

    fn headers_with(content_type: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, content_type.parse().unwrap());
        headers
    }

    #[test]
    fn test_json_content_types() {
        assert!(is_json_content_type(&headers_with("application/json")));
        assert!(is_json_content_type(&headers_with("Application/JSON; charset=utf-8")));
        assert!(is_json_content_type(&headers_with("application/vnd.api+json")));
        assert!(!is_json_content_type(&headers_with("text/plain")));
        assert!(!is_json_content_type(&headers_with("application/x-www-form-urlencoded")));
        assert!(!is_json_content_type(&HeaderMap::new()));
    }

    #[test]
    fn test_rejects_non_object_bodies() {
        assert!(matches!(SentimentRequest::from_slice(b"null"), Err(ApiError::NotAnObject("null"))));
        assert!(matches!(
            SentimentRequest::from_slice(br#"[["a"]]"#),
            Err(ApiError::NotAnObject("an array"))
        ));
        assert!(matches!(SentimentRequest::from_slice(b"not json"), Err(ApiError::MalformedBody(_))));
        assert!(matches!(SentimentRequest::from_slice(b""), Err(ApiError::MalformedBody(_))));
    }
}
