//! Route map - the handful of paths the guard redirects between.

use serde::{Deserialize, Serialize};

/// Well-known paths plus the protected-route set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteMap {
    pub login: String,
    pub recovery: String,
    pub onboarding: String,
    pub welcome: String,
    pub default_authenticated: String,
    /// Prefixes whose pages are remembered as the intended destination when
    /// a signed-out visitor is bounced to login.
    pub protected: Vec<String>,
}

impl RouteMap {
    /// Strips query, fragment and trailing slashes.
    ///
    /// `"/leads/?page=2"` and `"/leads"` compare equal. The root path stays `"/"`.
    pub fn normalize(path: &str) -> &str {
        let end = path.find(['?', '#']).unwrap_or(path.len());
        let trimmed = path[..end].trim_end_matches('/');
        if trimmed.is_empty() && path.starts_with('/') {
            "/"
        } else {
            trimmed
        }
    }

    pub fn same_path(a: &str, b: &str) -> bool {
        Self::normalize(a) == Self::normalize(b)
    }

    /// True when `path` is a protected prefix or lives under one.
    pub fn is_protected(&self, path: &str) -> bool {
        let path = Self::normalize(path);
        self.protected.iter().any(|prefix| {
            let prefix = Self::normalize(prefix);
            match path.strip_prefix(prefix) {
                Some(rest) => rest.is_empty() || rest.starts_with('/') || prefix == "/",
                None => false,
            }
        })
    }

    /// The onboarding flow's own screens.
    pub fn is_onboarding_flow(&self, path: &str) -> bool {
        Self::same_path(path, &self.onboarding) || Self::same_path(path, &self.welcome)
    }
}

impl Default for RouteMap {
    fn default() -> Self {
        Self {
            login: "/login".to_string(),
            recovery: "/auth/recovery".to_string(),
            onboarding: "/onboarding".to_string(),
            welcome: "/welcome".to_string(),
            default_authenticated: "/dashboard".to_string(),
            protected: ["/dashboard", "/leads", "/saved", "/settings", "/billing"]
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}
