use url::Url;

use crate::error::HttpError;

/// Parses a target page URL and checks it can anchor asset resolution.
///
/// # Errors
///
/// Returns an error when the URL does not parse, uses a scheme other than
/// http/https, or has no host.
pub fn validate_target_url(raw: &str) -> Result<Url, HttpError> {
    let parsed = Url::parse(raw).map_err(|source| HttpError::InvalidBaseUrl {
        url: raw.to_owned(),
        source,
    })?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(HttpError::UnsupportedScheme {
                scheme: other.to_owned(),
            });
        }
    }
    if parsed.host_str().is_none() {
        return Err(HttpError::BaseUrlMissingHost {
            url: raw.to_owned(),
        });
    }
    Ok(parsed)
}

/// `scheme://host[:port]` of a page URL.
///
/// # Errors
///
/// Returns an error when the URL does not parse or has no host.
pub fn page_origin(base: &str) -> Result<String, HttpError> {
    let parsed = Url::parse(base).map_err(|source| HttpError::InvalidBaseUrl {
        url: base.to_owned(),
        source,
    })?;
    let Some(host) = parsed.host_str() else {
        return Err(HttpError::BaseUrlMissingHost {
            url: base.to_owned(),
        });
    };
    Ok(match parsed.port() {
        Some(port) => format!("{}://{}:{}", parsed.scheme(), host, port),
        None => format!("{}://{}", parsed.scheme(), host),
    })
}

/// Turns an asset reference found on `base` into an absolute URL.
///
/// References starting with `http` are returned unchanged. Anything else is
/// joined onto the page origin, so `a.js` and `/a.js` both land at the root.
/// Protocol-relative references (`//cdn/x.js`) take the page scheme.
///
/// # Errors
///
/// Returns an error when `base` is not a usable URL.
pub fn resolve_asset_url(base: &str, asset: &str) -> Result<String, HttpError> {
    if asset.get(..4).is_some_and(|prefix| prefix.eq_ignore_ascii_case("http")) {
        return Ok(asset.to_owned());
    }
    if let Some(rest) = asset.strip_prefix("//") {
        let parsed = Url::parse(base).map_err(|source| HttpError::InvalidBaseUrl {
            url: base.to_owned(),
            source,
        })?;
        return Ok(format!("{}://{}", parsed.scheme(), rest));
    }
    let origin = page_origin(base)?;
    if asset.starts_with('/') {
        Ok(format!("{}{}", origin, asset))
    } else {
        Ok(format!("{}/{}", origin, asset))
    }
}
