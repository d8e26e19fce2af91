//! Shared utility functions

use serde::{Deserialize, Deserializer};

/// Resolve a stored media reference into a URL.
///
/// References that already carry a scheme are returned unchanged.
///
/// # Examples
///
/// ```
/// use clubhub_server::util::media_url;
///
/// assert_eq!(media_url(Some("https://cdn.example.com"), "clubs/chess.png"), "https://cdn.example.com/clubs/chess.png");
/// assert_eq!(media_url(None, "clubs/chess.png"), "clubs/chess.png");
/// ```
pub fn media_url(base: Option<&str>, reference: &str) -> String {
    if reference.starts_with("http://") || reference.starts_with("https://") {
        return reference.to_string();
    }
    match base {
        Some(base) => format!(
            "{}/{}",
            base.trim_end_matches('/'),
            reference.trim_start_matches('/')
        ),
        None => reference.to_string(),
    }
}

/// Deserialize a field that distinguishes between absent, null, and present.
///
/// - Field absent in JSON → `#[serde(default)]` yields `None` (skip calling this)
/// - `"field": null` → `Some(None)` (clear the value)
/// - `"field": "text"` → `Some(Some("text"))` (set value)
#[allow(clippy::option_option)]
pub fn deserialize_double_option<'de, D>(
    deserializer: D,
) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_url() {
        assert_eq!(
            media_url(Some("http://localhost:8080/media"), "/posts/a.png"),
            "http://localhost:8080/media/posts/a.png"
        );
        assert_eq!(
            media_url(Some("http://localhost:8080/media"), "https://elsewhere/a.png"),
            "https://elsewhere/a.png"
        );
        assert_eq!(media_url(None, "posts/a.png"), "posts/a.png");
    }

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "deserialize_double_option")]
        image: Option<Option<String>>,
    }

    #[test]
    fn test_double_option() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.image, None);

        let cleared: Patch = serde_json::from_str(r#"{"image": null}"#).unwrap();
        assert_eq!(cleared.image, Some(None));

        let set: Patch = serde_json::from_str(r#"{"image": "a.png"}"#).unwrap();
        assert_eq!(set.image, Some(Some("a.png".to_string())));
    }
}
