//! Translation API request and response types (LibreTranslate wire shape).

use serde::{Deserialize, Serialize};

/// Request body for `POST /translate`.
#[derive(Debug, Clone, Serialize)]
pub struct TranslateRequest {
    /// Text to translate.
    pub q: String,
    /// Source language code, or "auto".
    pub source: String,
    /// Target language code.
    pub target: String,
    /// Payload format; always "text" here.
    pub format: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl TranslateRequest {
    pub fn new(text: &str, source: &str, target: &str, api_key: Option<&str>) -> Self {
        Self {
            q: text.to_string(),
            source: source.to_string(),
            target: target.to_string(),
            format: "text".to_string(),
            api_key: api_key.map(str::to_string),
        }
    }
}

/// Response body for `POST /translate`.
#[derive(Debug, Clone, Deserialize)]
pub struct TranslateResponse {
    #[serde(rename = "translatedText")]
    pub translated_text: String,
}

/// Request body for `POST /detect`.
#[derive(Debug, Clone, Serialize)]
pub struct DetectRequest {
    pub q: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

/// One candidate in the `POST /detect` response array.
#[derive(Debug, Clone, Deserialize)]
pub struct DetectCandidate {
    pub language: String,
    pub confidence: f64,
}

/// Error body the API returns on non-success statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_request_omits_missing_key() {
        let req = TranslateRequest::new("Bonjour", "fr", "en", None);
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["q"], "Bonjour");
        assert_eq!(json["format"], "text");
        assert!(json.get("api_key").is_none());
    }

    #[test]
    fn test_detect_response_parses() {
        let body = r#"[{"confidence": 0.92, "language": "fr"}]"#;
        let candidates: Vec<DetectCandidate> = serde_json::from_str(body).unwrap();
        assert_eq!(candidates[0].language, "fr");
        assert!(candidates[0].confidence > 0.9);
    }
}
