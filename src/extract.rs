use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static URL_RX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s'"<>]+"#).expect("valid URL regex"));

// Probe order is tuned against the shapes Replicate has been observed to
// return. Keep it fixed; it is not meaningful beyond that.
const PROBE_KEYS: [&str; 4] = ["image", "url", "output", "result"];

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Replicate output list empty")]
    EmptyOutput,
    #[error("unexpected Replicate output structure: {0}")]
    UnexpectedShape(String),
}

/// Mirrors truthiness as the probe condition: null, false, zero, and empty
/// strings/arrays/objects are skipped when probing keys.
fn is_non_empty(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Locates a usable result URL inside an arbitrarily shaped provider output.
///
/// Depth-first, first successful branch wins: a string is returned as-is, a
/// sequence recurses on its last element (the provider puts the final result
/// last), a mapping is probed for well-known keys. Anything else falls back
/// to scraping the stringified value for an http(s) URL.
pub fn extract_result_url(output: &Value) -> Result<String, ExtractError> {
    match output {
        Value::String(url) => return Ok(url.clone()),
        Value::Array(items) => {
            return match items.last() {
                Some(last) => extract_result_url(last),
                None => Err(ExtractError::EmptyOutput),
            };
        }
        Value::Object(map) => {
            for key in PROBE_KEYS {
                if let Some(val) = map.get(key) {
                    if is_non_empty(val) {
                        return extract_result_url(val);
                    }
                }
            }
        }
        _ => {}
    }

    // Last resort: scrape any URL out of the string representation.
    let rendered = output.to_string();
    if let Some(m) = URL_RX.find(&rendered) {
        return Ok(m.as_str().to_string());
    }
    Err(ExtractError::UnexpectedShape(rendered))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_string_passes_through() {
        let out = extract_result_url(&json!("http://a.test/x.jpg")).unwrap();
        assert_eq!(out, "http://a.test/x.jpg");
    }

    #[test]
    fn test_string_is_not_validated_as_url() {
        // Contract: strings are returned as-is, even if not URL-shaped.
        let out = extract_result_url(&json!("not-a-url")).unwrap();
        assert_eq!(out, "not-a-url");
    }

    #[test]
    fn test_list_prefers_last_element() {
        let out =
            extract_result_url(&json!(["http://a.test/1.jpg", "http://a.test/2.jpg"])).unwrap();
        assert_eq!(out, "http://a.test/2.jpg");
    }

    #[test]
    fn test_empty_list_is_a_distinct_error() {
        let err = extract_result_url(&json!([])).unwrap_err();
        assert!(matches!(err, ExtractError::EmptyOutput));
    }

    #[test]
    fn test_url_key_in_object() {
        let out = extract_result_url(&json!({"url": "http://a.test/x.jpg"})).unwrap();
        assert_eq!(out, "http://a.test/x.jpg");
    }

    #[test]
    fn test_image_key_wins_over_url_key() {
        let out = extract_result_url(
            &json!({"url": "http://a.test/page", "image": "http://a.test/img.jpg"}),
        )
        .unwrap();
        assert_eq!(out, "http://a.test/img.jpg");
    }

    #[test]
    fn test_empty_probe_value_is_skipped() {
        let out =
            extract_result_url(&json!({"image": "", "url": "http://a.test/x.jpg"})).unwrap();
        assert_eq!(out, "http://a.test/x.jpg");
    }

    #[test]
    fn test_nested_list_inside_object() {
        let out = extract_result_url(
            &json!({"output": ["http://a.test/1.jpg", "http://a.test/2.jpg"]}),
        )
        .unwrap();
        assert_eq!(out, "http://a.test/2.jpg");
    }

    #[test]
    fn test_fallback_scrapes_url_from_stringified_value() {
        let out = extract_result_url(
            &json!({"detail": {"location": "https://cdn.test/deep/out.png"}}),
        )
        .unwrap();
        assert_eq!(out, "https://cdn.test/deep/out.png");
    }

    #[test]
    fn test_empty_object_without_url_fails() {
        let err = extract_result_url(&json!({})).unwrap_err();
        match err {
            ExtractError::UnexpectedShape(raw) => assert_eq!(raw, "{}"),
            other => panic!("expected UnexpectedShape, got {other:?}"),
        }
    }

    #[test]
    fn test_number_fails_without_url() {
        let err = extract_result_url(&json!(42)).unwrap_err();
        assert!(matches!(err, ExtractError::UnexpectedShape(_)));
    }
}
