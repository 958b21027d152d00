//! Style source resolution
//!
//! Keyed basemap styles are usually copied around with their API key still in
//! the query string. The key is lifted out of the URL so the surface receives
//! it through its dedicated option instead.

use url::Url;

use crate::{
    core::constants::{KEYED_STYLE_PREFIX, STYLE_KEY_PARAM},
    Result,
};

/// Style and key as they are handed to the GL surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedStyle {
    pub style: String,
    pub api_key: Option<String>,
}

/// Resolves the style/key pair for the surface.
///
/// A key embedded in a keyed style URL is stripped from the URL. The explicit
/// `api_key` wins over the embedded one when both are present. Style strings
/// outside the keyed prefix, including inline JSON styles, pass through
/// unchanged. A URL that fails to parse is logged and passed through as well.
pub fn resolve_style(style: &str, api_key: Option<&str>) -> ResolvedStyle {
    let explicit = api_key.filter(|key| !key.is_empty()).map(str::to_string);

    if !style.starts_with(KEYED_STYLE_PREFIX) {
        return ResolvedStyle {
            style: style.to_string(),
            api_key: explicit,
        };
    }

    match split_style_key(style) {
        Ok(Some((stripped, embedded))) => {
            if explicit.is_some() {
                log::debug!("explicit API key overrides the one embedded in the style URL");
            }
            ResolvedStyle {
                style: stripped,
                api_key: explicit.or(Some(embedded)),
            }
        }
        Ok(None) => ResolvedStyle {
            style: style.to_string(),
            api_key: explicit,
        },
        Err(e) => {
            log::error!("could not read API key from style URL {style:?}: {e}");
            ResolvedStyle {
                style: style.to_string(),
                api_key: explicit,
            }
        }
    }
}

/// Splits `key=...` off a style URL. Returns the URL without the key and the
/// key itself, or `None` when the URL carries no non-empty key.
pub(crate) fn split_style_key(style: &str) -> Result<Option<(String, String)>> {
    let mut url = Url::parse(style)?;

    let key = url
        .query_pairs()
        .find(|(name, _)| name == STYLE_KEY_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty());

    let Some(key) = key else {
        return Ok(None);
    };

    let remaining: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(name, _)| name != STYLE_KEY_PARAM)
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect();

    if remaining.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(remaining);
    }

    Ok(Some((url.to_string(), key)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEYED: &str = "https://api.maptiler.com/maps/streets/style.json?key=ABC123";

    #[test]
    fn test_embedded_key_extracted() {
        let resolved = resolve_style(KEYED, None);
        assert_eq!(resolved.api_key.as_deref(), Some("ABC123"));
        assert_eq!(
            resolved.style,
            "https://api.maptiler.com/maps/streets/style.json"
        );
    }

    #[test]
    fn test_explicit_key_wins() {
        let resolved = resolve_style(KEYED, Some("XYZ"));
        assert_eq!(resolved.api_key.as_deref(), Some("XYZ"));
        assert_eq!(
            resolved.style,
            "https://api.maptiler.com/maps/streets/style.json"
        );
    }

    #[test]
    fn test_other_params_survive() {
        let resolved = resolve_style(
            "https://api.maptiler.com/maps/basic/style.json?language=fr&key=K1",
            None,
        );
        assert_eq!(resolved.api_key.as_deref(), Some("K1"));
        assert_eq!(
            resolved.style,
            "https://api.maptiler.com/maps/basic/style.json?language=fr"
        );
    }

    #[test]
    fn test_unkeyed_style_passes_through() {
        let inline = r#"{"version":8,"sources":{},"layers":[]}"#;
        assert_eq!(
            resolve_style(inline, Some("XYZ")),
            ResolvedStyle {
                style: inline.to_string(),
                api_key: Some("XYZ".to_string()),
            }
        );

        let other = "https://tiles.example.com/style.json?key=ABC";
        assert_eq!(resolve_style(other, None).style, other);
        assert_eq!(resolve_style(other, None).api_key, None);
    }

    #[test]
    fn test_prefix_without_key() {
        let url = "https://api.maptiler.com/maps/streets/style.json";
        assert_eq!(resolve_style(url, None).style, url);
        assert_eq!(resolve_style(url, None).api_key, None);
    }

    #[test]
    fn test_unparsable_url_is_an_error() {
        assert!(split_style_key("not a url").is_err());
    }
}
