//! Upstream base URL normalization.
//!
//! Both the proxy target and the API client base go through the same rules:
//! - must be an http(s) URL, otherwise the fallback is used
//! - one trailing `/` is stripped
//! - `/api` is appended unless the base already ends with it

use std::fmt;

use url::Url;

/// Upstream used when nothing (or nothing usable) is configured.
pub const DEFAULT_UPSTREAM: &str = "http://localhost:8080";

/// Client base used when nothing is configured: the proxy's own `/api` surface.
pub const DEFAULT_CLIENT_BASE: &str = "http://localhost:3000";

/// Environment variables consulted for the proxy target, in priority order.
pub const UPSTREAM_ENV_VARS: [&str; 2] = ["API_PROXY_TARGET", "API_BASE_URL"];

const API_SUFFIX: &str = "/api";

/// A normalized API base URL, always ending in `/api` and never in `/`.
///
/// Constructed once at process start and handed to the components that need
/// it; there is no global copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamTarget(String);

impl UpstreamTarget {
    /// Normalize `raw`, falling back to [`DEFAULT_UPSTREAM`].
    pub fn resolve(raw: Option<&str>) -> Self {
        Self::resolve_with_default(raw, DEFAULT_UPSTREAM)
    }

    /// Normalize `raw`, falling back to `default` when `raw` is absent or not
    /// an http(s) URL.
    pub fn resolve_with_default(raw: Option<&str>, default: &str) -> Self {
        let base = match raw.map(str::trim).filter(|s| is_http_url(s)) {
            Some(candidate) => candidate,
            None => {
                if let Some(rejected) = raw.filter(|s| !s.trim().is_empty()) {
                    tracing::warn!(value = %rejected, fallback = %default, "Ignoring non-HTTP upstream");
                }
                default
            }
        };

        let base = base.strip_suffix('/').unwrap_or(base);
        if base.ends_with(API_SUFFIX) {
            Self(base.to_string())
        } else {
            Self(format!("{base}{API_SUFFIX}"))
        }
    }

    /// Resolve the proxy target: configured value first, then environment.
    pub fn from_config_and_env(configured: Option<&str>) -> Self {
        let from_env = UPSTREAM_ENV_VARS
            .iter()
            .find_map(|key| std::env::var(key).ok().filter(|v| !v.is_empty()));
        Self::resolve(from_env.as_deref().or(configured))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Join path segments and an optional raw query onto the base.
    pub fn join(&self, path: &str, query: Option<&str>) -> String {
        let path = path.trim_start_matches('/');
        match query {
            Some(q) if !q.is_empty() => format!("{}/{}?{}", self.0, path, q),
            _ => format!("{}/{}", self.0, path),
        }
    }
}

impl fmt::Display for UpstreamTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_http_url(value: &str) -> bool {
    Url::parse(value)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_uses_default() {
        assert_eq!(UpstreamTarget::resolve(None).as_str(), "http://localhost:8080/api");
    }

    #[test]
    fn test_non_http_uses_default() {
        assert_eq!(
            UpstreamTarget::resolve(Some("ftp://files.local")).as_str(),
            "http://localhost:8080/api"
        );
        assert_eq!(
            UpstreamTarget::resolve(Some("localhost:9000")).as_str(),
            "http://localhost:8080/api"
        );
    }

    #[test]
    fn test_trailing_slash_and_suffix() {
        assert_eq!(
            UpstreamTarget::resolve(Some("https://fleet.example.com/")).as_str(),
            "https://fleet.example.com/api"
        );
        assert_eq!(
            UpstreamTarget::resolve(Some("http://10.0.0.5:8080/api/")).as_str(),
            "http://10.0.0.5:8080/api"
        );
        assert_eq!(
            UpstreamTarget::resolve(Some("http://10.0.0.5:8080/api")).as_str(),
            "http://10.0.0.5:8080/api"
        );
    }

    #[test]
    fn test_join() {
        let target = UpstreamTarget::resolve(Some("http://backend:8080"));
        assert_eq!(target.join("cars/1", None), "http://backend:8080/api/cars/1");
        assert_eq!(
            target.join("/cars", Some("page=2&size=10")),
            "http://backend:8080/api/cars?page=2&size=10"
        );
        assert_eq!(target.join("cars", Some("")), "http://backend:8080/api/cars");
    }

    #[test]
    fn test_custom_default() {
        assert_eq!(
            UpstreamTarget::resolve_with_default(None, DEFAULT_CLIENT_BASE).as_str(),
            "http://localhost:3000/api"
        );
    }
}
