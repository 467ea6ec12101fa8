//! JSON shapes exchanged with the backend and the lenient decoders for them.

use scanner_logging::{scanner_debug, scanner_warn};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiSearchResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, alias = "url", deserialize_with = "null_as_default")]
    pub link: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub domain: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_new: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiSource {
    #[serde(default, deserialize_with = "null_as_default")]
    pub domain: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub found_at: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SearchRequest<'a> {
    pub query: &'a str,
}

/// Pulls a non-empty string `detail` out of an error body.
pub(crate) fn extract_detail(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    match value.get("detail")? {
        Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
        _ => None,
    }
}

/// Decodes a search response, filling a missing `domain` from the link host.
pub(crate) fn decode_search_results(body: &[u8]) -> Result<Vec<ApiSearchResult>, serde_json::Error> {
    let mut results: Vec<ApiSearchResult> = serde_json::from_slice(body)?;
    for result in results.iter_mut().filter(|result| result.domain.is_empty()) {
        result.domain = domain_of(&result.link).unwrap_or_default();
    }
    Ok(results)
}

/// Decodes a listing response. Any JSON value other than an array becomes an
/// empty listing; array entries that are not source objects are dropped.
pub(crate) fn decode_sources(body: &[u8]) -> Result<Vec<ApiSource>, serde_json::Error> {
    let value: Value = serde_json::from_slice(body)?;
    let Value::Array(items) = value else {
        scanner_debug!("listing body is not an array; treating it as empty");
        return Ok(Vec::new());
    };

    let sources = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value::<ApiSource>(item) {
            Ok(source) => Some(source),
            Err(err) => {
                scanner_warn!("skipping listing entry {}: {}", index, err);
                None
            }
        })
        .collect();
    Ok(sources)
}

fn domain_of(link: &str) -> Option<String> {
    let url = Url::parse(link).ok()?;
    let host = url.host_str()?;
    Some(host.strip_prefix("www.").unwrap_or(host).to_string())
}

/// Treats an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(text)) if !text.is_empty() => Some(text),
        Some(Value::Number(number)) => Some(number.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_must_be_a_non_empty_string() {
        assert_eq!(
            extract_detail(br#"{"detail":"Invalid file format"}"#).as_deref(),
            Some("Invalid file format")
        );
        assert_eq!(extract_detail(br#"{"detail":""}"#), None);
        assert_eq!(extract_detail(br#"{"detail":[{"msg":"field required"}]}"#), None);
        assert_eq!(extract_detail(b"<html>Bad Gateway</html>"), None);
    }

    #[test]
    fn search_results_accept_url_alias_and_derive_domain() {
        let body = br#"[{"title":"Kyiv Daily","url":"https://www.kyivdaily.example/news","description":"d"}]"#;
        let results = decode_search_results(body).expect("decode");
        assert_eq!(results[0].link, "https://www.kyivdaily.example/news");
        assert_eq!(results[0].domain, "kyivdaily.example");
        assert!(!results[0].is_new);
    }

    #[test]
    fn sources_coerce_non_arrays_to_empty() {
        let bodies: [&[u8]; 5] = [b"null", b"{}", br#"{"detail":"oops"}"#, b"42", br#""text""#];
        for body in bodies {
            assert_eq!(decode_sources(body).expect("decode"), Vec::new());
        }
        assert!(decode_sources(b"not json").is_err());
    }

    #[test]
    fn sources_skip_entries_that_are_not_objects() {
        let body = br#"[{"domain":"a.example","name":"A","url":"https://a.example","created_at":"2024-01-01"}, 7, {"domain":"b.example","found_at":{"$date":1}}]"#;
        let sources = decode_sources(body).expect("decode");
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].created_at.as_deref(), Some("2024-01-01"));
        assert_eq!(sources[1].name, "");
        assert_eq!(sources[1].found_at, None);
    }

    #[test]
    fn null_fields_keep_the_search_row() {
        let body = br#"[{"title":"A","link":"https://a.example","description":"d","is_new":true},{"title":"B","link":"https://www.b.example/x","description":null,"domain":null,"is_new":null},{"title":null,"url":null}]"#;
        let results = decode_search_results(body).expect("decode");
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].title, "A");
        assert!(results[0].is_new);
        assert_eq!(results[1].description, "");
        assert_eq!(results[1].domain, "b.example");
        assert!(!results[1].is_new);
        assert_eq!(results[2].title, "");
        assert_eq!(results[2].link, "");
    }

    #[test]
    fn null_fields_keep_the_listing_row() {
        let body = br#"[{"domain":"a.example","name":null,"url":"https://a.example"},{"domain":null,"name":"B","url":null,"created_at":null}]"#;
        let sources = decode_sources(body).expect("decode");
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].domain, "a.example");
        assert_eq!(sources[0].name, "");
        assert_eq!(sources[1].name, "B");
        assert_eq!(sources[1].url, "");
        assert_eq!(sources[1].created_at, None);
    }
}
