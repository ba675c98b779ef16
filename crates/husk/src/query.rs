//! URL query helpers

use url::Url;

/// Extract a query parameter from an absolute URL.
///
/// Returns the first occurrence, percent-decoded. `None` for malformed
/// URLs or absent parameters.
pub fn query_param(url: &str, name: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed
        .query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

/// Extract every query parameter as decoded `(name, value)` pairs,
/// in order of appearance. Empty for malformed URLs.
pub fn query_params(url: &str) -> Vec<(String, String)> {
    match Url::parse(url) {
        Ok(parsed) => parsed
            .query_pairs()
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect(),
        Err(e) => {
            tracing::debug!("unparseable URL {:?}: {}", url, e);
            Vec::new()
        }
    }
}
