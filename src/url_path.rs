use log::debug;
use url::Url;

/// Display path of `url` relative to `base_url`.
///
/// Never fails: when there's no usable base, or `url` isn't an absolute URL,
/// the input comes back untouched (absent base still yields the bare path
/// for parseable URLs). A URL outside the base path keeps its full path.
pub fn relative_path(url: &str, base_url: Option<&str>) -> String {
    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(e) => {
            debug!("Showing raw URL {:?}, not absolute: {}", url, e);
            return url.to_string();
        }
    };

    let full_path = match parsed.path() {
        "" => "/".to_string(),
        path => path.to_string(),
    };

    let base_url = match base_url.map(str::trim) {
        Some(base) if !base.is_empty() => base,
        _ => return full_path,
    };

    let base = match Url::parse(base_url.trim_end_matches('/')) {
        Ok(base) => base,
        Err(e) => {
            debug!("Ignoring base URL {:?}: {}", base_url, e);
            return full_path;
        }
    };

    let base_path = base.path().trim_end_matches('/');
    if base_path.is_empty() {
        return full_path;
    }

    if full_path == base_path {
        return "/".to_string();
    }

    match full_path.strip_prefix(base_path) {
        Some(rest) if rest.starts_with('/') => rest.to_string(),
        _ => full_path,
    }
}

/// Trims whitespace and trailing slashes from a user-entered base URL.
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}
