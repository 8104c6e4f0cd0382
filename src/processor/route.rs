use serde::{Deserialize, Serialize};

const SCHEME_SEPARATOR: &str = "://";
const HTTP_PREFIX: &str = "http://";
const HTTPS_PREFIX: &str = "https://";

/// Builds the `"{method} {protocol}://{host}:{port}{path}"` key that
/// identifies a route within a run.
#[must_use]
pub fn route_signature(method: &str, protocol: &str, host: &str, port: u16, url: &str) -> String {
    format!("{method} {protocol}{SCHEME_SEPARATOR}{host}:{port}{url}")
}

/// Method and path recovered from a route signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteKey {
    pub method: String,
    pub path: String,
}

impl RouteKey {
    /// Splits `<method> http[s]://<authority><path>`. The path starts at the
    /// first `/` after a non-empty authority; a url without one (`*`) leaves
    /// only the final character as the path. Returns `None` when the
    /// signature does not use an http(s) scheme.
    #[must_use]
    pub fn parse(signature: &str) -> Option<Self> {
        let (method, rest) = signature.split_once(' ')?;
        if method.is_empty() {
            return None;
        }
        let rest = rest
            .strip_prefix(HTTP_PREFIX)
            .or_else(|| rest.strip_prefix(HTTPS_PREFIX))?;
        let path_start = match rest.find('/') {
            Some(index) => index,
            None => rest.char_indices().last().map(|(index, _)| index)?,
        };
        if path_start == 0 {
            return None;
        }
        let path = rest.get(path_start..)?;
        Some(Self {
            method: method.to_owned(),
            path: path.to_owned(),
        })
    }
}
