//! Route guard configuration

use serde::Deserialize;
use std::time::Duration;

use crate::domain::navigation::{NavigationResolver, RouteMap};

use super::error::ValidationError;
use super::server::split_list;

/// Guard paths and the loading timeout
#[derive(Debug, Clone, Deserialize)]
pub struct NavigationConfig {
    #[serde(default = "default_login_path")]
    pub login_path: String,

    #[serde(default = "default_recovery_path")]
    pub recovery_path: String,

    #[serde(default = "default_onboarding_path")]
    pub onboarding_path: String,

    #[serde(default = "default_welcome_path")]
    pub welcome_path: String,

    /// Where onboarded users land when they open an onboarding screen
    #[serde(default = "default_authenticated_path")]
    pub default_path: String,

    /// Protected route prefixes (comma-separated). Unset keeps the built-in set.
    pub protected_routes: Option<String>,

    #[serde(default = "default_loading_timeout")]
    pub loading_timeout_secs: u64,
}

impl NavigationConfig {
    pub fn loading_timeout(&self) -> Duration {
        Duration::from_secs(self.loading_timeout_secs)
    }

    pub fn route_map(&self) -> RouteMap {
        let protected = match self.protected_routes.as_deref() {
            Some(raw) => split_list(Some(raw)),
            None => RouteMap::default().protected,
        };
        RouteMap {
            login: self.login_path.clone(),
            recovery: self.recovery_path.clone(),
            onboarding: self.onboarding_path.clone(),
            welcome: self.welcome_path.clone(),
            default_authenticated: self.default_path.clone(),
            protected,
        }
    }

    pub fn resolver(&self) -> NavigationResolver {
        NavigationResolver::new(self.route_map(), self.loading_timeout())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let map = self.route_map();
        let paths = [
            &map.login,
            &map.recovery,
            &map.onboarding,
            &map.welcome,
            &map.default_authenticated,
        ];
        for path in paths.into_iter().chain(map.protected.iter()) {
            if !path.starts_with('/') {
                return Err(ValidationError::InvalidRoutePath(path.clone()));
            }
        }
        if self.loading_timeout_secs == 0 || self.loading_timeout_secs > 300 {
            return Err(ValidationError::InvalidLoadingTimeout);
        }
        Ok(())
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            login_path: default_login_path(),
            recovery_path: default_recovery_path(),
            onboarding_path: default_onboarding_path(),
            welcome_path: default_welcome_path(),
            default_path: default_authenticated_path(),
            protected_routes: None,
            loading_timeout_secs: default_loading_timeout(),
        }
    }
}

fn default_login_path() -> String {
    "/login".to_string()
}

fn default_recovery_path() -> String {
    "/auth/recovery".to_string()
}

fn default_onboarding_path() -> String {
    "/onboarding".to_string()
}

fn default_welcome_path() -> String {
    "/welcome".to_string()
}

fn default_authenticated_path() -> String {
    "/dashboard".to_string()
}

fn default_loading_timeout() -> u64 {
    10
}
