// src/services/extractor.rs
//! Reading payloads out of chat-completion responses.

use serde_json::{Map, Value};

const DATA_URI_PREFIX: &str = "data:image/";

fn first_message(raw: &Value) -> Option<&Value> {
    raw.get("choices")?.get(0)?.get("message")
}

fn first_image(raw: &Value) -> Option<&Value> {
    first_message(raw)?.get("images")?.get(0)
}

/// `choices[0].message.content` when it is a plain string.
pub fn extract_text(raw: &Value) -> Option<&str> {
    first_message(raw)?.get("content")?.as_str()
}

type ImageStrategy = fn(&Value) -> Option<&str>;

fn nested_image_url(raw: &Value) -> Option<&str> {
    first_image(raw)?.get("image_url")?.get("url")?.as_str()
}

fn flat_image_url(raw: &Value) -> Option<&str> {
    first_image(raw)?.get("url")?.as_str()
}

fn bare_image(raw: &Value) -> Option<&str> {
    first_image(raw)?.as_str()
}

fn data_uri_content(raw: &Value) -> Option<&str> {
    extract_text(raw).filter(|s| s.starts_with(DATA_URI_PREFIX))
}

/// Tried in order; the first non-empty string wins.
const IMAGE_STRATEGIES: [ImageStrategy; 4] =
    [nested_image_url, flat_image_url, bare_image, data_uri_content];

/// Locate a generated image (data URI or URL) in the response.
pub fn extract_image(raw: &Value) -> Option<&str> {
    IMAGE_STRATEGIES
        .iter()
        .fold(None, |found, strategy| {
            found.or_else(|| strategy(raw).filter(|s| !s.trim().is_empty()))
        })
}

/// Parse a JSON object out of model prose.
///
/// The whole text is tried first; failing that, each balanced `{...}` span in
/// order of its opening brace, so answers wrapped in prose or markdown fences
/// still parse.
pub fn recover_json_object(text: &str) -> Option<Map<String, Value>> {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(text.trim()) {
        return Some(map);
    }

    text.match_indices('{').find_map(|(start, _)| {
        let end = balanced_end(&text[start..])?;
        match serde_json::from_str::<Value>(&text[start..start + end]) {
            Ok(Value::Object(map)) => Some(map),
            _ => None,
        }
    })
}

/// Byte length of the balanced brace group at the start of `s`, ignoring
/// braces inside JSON string literals.
fn balanced_end(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in s.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(idx + 1);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const IMG: &str = "data:image/jpeg;base64,AAAA";

    #[test]
    fn text_reads_first_choice_content() {
        let raw = json!({"choices": [{"message": {"content": "hello"}}, {"message": {"content": "other"}}]});
        assert_eq!(extract_text(&raw), Some("hello"));
    }

    #[test]
    fn text_ignores_non_string_content() {
        let raw = json!({"choices": [{"message": {"content": [{"type": "text", "text": "x"}]}}]});
        assert_eq!(extract_text(&raw), None);
        assert_eq!(extract_text(&json!({"choices": []})), None);
        assert_eq!(extract_text(&json!({})), None);
    }

    #[test]
    fn image_fallback_chain_is_equivalent() {
        let shapes = [
            json!({"choices": [{"message": {"images": [{"image_url": {"url": IMG}}]}}]}),
            json!({"choices": [{"message": {"images": [{"url": IMG}]}}]}),
            json!({"choices": [{"message": {"images": [IMG]}}]}),
            json!({"choices": [{"message": {"content": IMG}}]}),
        ];
        for raw in &shapes {
            assert_eq!(extract_image(raw), Some(IMG), "shape: {raw}");
        }
    }

    #[test]
    fn image_prefers_earlier_strategy() {
        let raw = json!({"choices": [{"message": {
            "content": "data:image/png;base64,CONTENT",
            "images": [{"image_url": {"url": IMG}, "url": "https://example.com/flat.png"}]
        }}]});
        assert_eq!(extract_image(&raw), Some(IMG));
    }

    #[test]
    fn image_skips_empty_candidates() {
        let raw = json!({"choices": [{"message": {"images": [{"image_url": {"url": ""}, "url": IMG}]}}]});
        assert_eq!(extract_image(&raw), Some(IMG));
    }

    #[test]
    fn image_not_found() {
        let raw = json!({"choices": [{"message": {"content": "Sorry, I can't do that."}}]});
        assert_eq!(extract_image(&raw), None);
        assert_eq!(extract_image(&json!({"choices": [{"message": {"images": []}}]})), None);
    }

    #[test]
    fn recovers_direct_json() {
        let map = recover_json_object(r#" {"a": 1} "#).unwrap();
        assert_eq!(map["a"], json!(1));
    }

    #[test]
    fn recovers_json_from_prose_and_fences() {
        let text = "Here you go:\n```json\n{\"bodyType\": \"pear\", \"nested\": {\"x\": 1}}\n```\nEnjoy!";
        let map = recover_json_object(text).unwrap();
        assert_eq!(map["bodyType"], json!("pear"));
        assert_eq!(map["nested"]["x"], json!(1));
    }

    #[test]
    fn braces_inside_strings_do_not_confuse_matching() {
        let text = r#"Result: {"advice": "use {bold} colors", "ok": true} trailing }"#;
        let map = recover_json_object(text).unwrap();
        assert_eq!(map["advice"], json!("use {bold} colors"));
    }

    #[test]
    fn later_span_is_used_when_first_is_not_json() {
        let text = r#"Template {name} then {"skinTone": "olive"}"#;
        let map = recover_json_object(text).unwrap();
        assert_eq!(map["skinTone"], json!("olive"));
    }

    #[test]
    fn no_json_yields_none() {
        assert!(recover_json_object("I could not analyze this photo.").is_none());
        assert!(recover_json_object("{ unbalanced").is_none());
        assert!(recover_json_object("[1, 2, 3]").is_none());
    }
}
