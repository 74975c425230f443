use burrow_core::ShortenerError;
use url::Url;

/// Longest long URL accepted; matches the `long_url` column width.
pub const MAX_URL_LENGTH: usize = 2048;

/// Checks `raw` and returns the form to store.
///
/// The trimmed input is kept as typed when it is plain ASCII, so the
/// redirect target is exactly what the caller sent. Anything else is stored
/// in the parser's percent-encoded form, which is always a valid
/// `Location` header value.
pub fn normalize_long_url(raw: &str, public_host: Option<&str>) -> Result<String, ShortenerError> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Err(ShortenerError::InvalidUrl("URL cannot be empty".to_string()));
    }
    if trimmed.len() > MAX_URL_LENGTH {
        return Err(too_long());
    }

    let parsed = Url::parse(trimmed)
        .map_err(|e| ShortenerError::InvalidUrl(format!("invalid URL format: {e}")))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ShortenerError::InvalidUrl(format!(
            "URL scheme must be http or https, got '{}'",
            parsed.scheme()
        )));
    }

    let Some(host) = parsed.host_str().filter(|h| !h.is_empty()) else {
        return Err(ShortenerError::InvalidUrl("URL must have a host".to_string()));
    };

    if let Some(own) = public_host {
        if is_same_site(host, own) {
            return Err(ShortenerError::InvalidUrl(
                "cannot shorten a URL from this service, provide the original long URL".to_string(),
            ));
        }
    }

    let stored: String = if trimmed.bytes().all(|b| b.is_ascii_graphic()) {
        trimmed.to_string()
    } else {
        parsed.into()
    };

    // Percent-encoding can triple the length of non-ASCII input.
    if stored.len() > MAX_URL_LENGTH {
        return Err(too_long());
    }

    Ok(stored)
}

fn too_long() -> ShortenerError {
    ShortenerError::InvalidUrl(format!(
        "URL is longer than {MAX_URL_LENGTH} characters"
    ))
}

/// `true` when `host` is `own` or one of its subdomains, ignoring `www.`.
fn is_same_site(host: &str, own: &str) -> bool {
    let host = host.to_ascii_lowercase();
    let own = own.to_ascii_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);
    let own = own.strip_prefix("www.").unwrap_or(&own);

    !own.is_empty() && (host == own || host.ends_with(&format!(".{own}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_and_https() {
        assert_eq!(
            normalize_long_url("https://example.com/a", None).unwrap(),
            "https://example.com/a"
        );
        assert!(normalize_long_url("http://localhost:8080/x?y=1", None).is_ok());
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(
            normalize_long_url("  https://example.com/a \n", None).unwrap(),
            "https://example.com/a"
        );
    }

    #[test]
    fn rejects_bad_input() {
        for raw in [
            "",
            "   ",
            "example.com",
            "ftp://example.com/file",
            "javascript:alert(1)",
            "https://",
            "not a url",
        ] {
            assert!(
                matches!(
                    normalize_long_url(raw, None),
                    Err(ShortenerError::InvalidUrl(_))
                ),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_overlong_urls() {
        let long = format!("https://example.com/{}", "a".repeat(MAX_URL_LENGTH));
        assert!(normalize_long_url(&long, None).is_err());
    }

    #[test]
    fn percent_encodes_non_ascii() {
        assert_eq!(
            normalize_long_url("https://example.com/caf\u{e9}", None).unwrap(),
            "https://example.com/caf%C3%A9"
        );
    }

    #[test]
    fn rejects_links_back_to_this_service() {
        let own = Some("brw.io");
        assert!(normalize_long_url("https://brw.io/abc1234", own).is_err());
        assert!(normalize_long_url("https://www.brw.io/abc1234", own).is_err());
        assert!(normalize_long_url("https://go.brw.io/abc1234", own).is_err());
        assert!(normalize_long_url("https://notbrw.io/abc1234", own).is_ok());
        assert!(normalize_long_url("https://www.BRW.io/x", Some("www.brw.io")).is_err());
    }

    #[test]
    fn length_limit_applies_to_the_encoded_form() {
        let raw = format!("https://example.com/{}", "\u{e9}".repeat(1_000));
        assert!(raw.len() <= MAX_URL_LENGTH);

        let err = normalize_long_url(&raw, None).unwrap_err();
        assert!(matches!(err, ShortenerError::InvalidUrl(_)));

        let fits = format!("https://example.com/{}", "\u{e9}".repeat(300));
        let stored = normalize_long_url(&fits, None).unwrap();
        assert!(stored.len() <= MAX_URL_LENGTH);
        assert!(stored.starts_with("https://example.com/%C3%A9"));
    }
}
