//! Application configuration module
//!
//! Configuration is read from environment variables with the `LEADGATE`
//! prefix; nested values use double underscores.
//!
//! # Example
//!
//! ```no_run
//! use leadgate::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod auth;
mod credits;
mod database;
mod error;
mod navigation;
mod server;

pub use auth::AuthConfig;
pub use credits::CreditsConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use navigation::NavigationConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    pub auth: AuthConfig,

    #[serde(default)]
    pub navigation: NavigationConfig,

    #[serde(default)]
    pub credits: CreditsConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Loads `.env` if present, then reads `LEADGATE__*` variables:
    ///
    /// - `LEADGATE__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `LEADGATE__CREDITS__LISTING_KIND_COSTS=probate=3` -> `credits.listing_kind_costs`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("LEADGATE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate every section, stopping at the first failure.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.auth.validate(&self.server.environment)?;
        self.navigation.validate()?;
        self.credits.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global; serialize the tests that touch them.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "LEADGATE__DATABASE__URL",
        "LEADGATE__AUTH__JWT_SECRET",
        "LEADGATE__SERVER__PORT",
        "LEADGATE__SERVER__ENVIRONMENT",
        "LEADGATE__NAVIGATION__LOADING_TIMEOUT_SECS",
        "LEADGATE__NAVIGATION__PROTECTED_ROUTES",
        "LEADGATE__CREDITS__LISTING_KIND_COSTS",
        "LEADGATE__CREDITS__STARTING_CREDITS",
    ];

    fn set_minimal_env() {
        env::set_var("LEADGATE__DATABASE__URL", "postgresql://test@localhost/leadgate");
        env::set_var("LEADGATE__AUTH__JWT_SECRET", "dev-secret");
    }

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    fn load_with(extra: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        set_minimal_env();
        for (key, value) in extra {
            env::set_var(key, value);
        }
        let result = AppConfig::load();
        clear_env();
        result
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[]).unwrap();

        assert_eq!(config.database.url, "postgresql://test@localhost/leadgate");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.navigation.loading_timeout_secs, 10);
        assert_eq!(config.credits.default_reveal_cost, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_nested_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[
            ("LEADGATE__SERVER__PORT", "3000"),
            ("LEADGATE__NAVIGATION__LOADING_TIMEOUT_SECS", "4"),
            ("LEADGATE__NAVIGATION__PROTECTED_ROUTES", "/leads,/billing"),
            ("LEADGATE__CREDITS__LISTING_KIND_COSTS", "probate=3"),
            ("LEADGATE__CREDITS__STARTING_CREDITS", "20"),
        ])
        .unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.navigation.loading_timeout_secs, 4);
        assert_eq!(config.navigation.route_map().protected, vec!["/leads", "/billing"]);
        assert_eq!(config.credits.starting_credits, 20);
        assert_eq!(
            config.credits.pricing().unwrap().cost_for(Some("probate"), None).unwrap().get(),
            3
        );
    }

    #[test]
    fn test_missing_secret_fails_to_load() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("LEADGATE__DATABASE__URL", "postgresql://test@localhost/leadgate");
        let result = AppConfig::load();
        clear_env();

        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }

    #[test]
    fn test_production_requires_strong_secret() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[("LEADGATE__SERVER__ENVIRONMENT", "production")]).unwrap();

        assert!(config.is_production());
        assert!(matches!(
            config.validate(),
            Err(ValidationError::WeakJwtSecret(_))
        ));
    }
}
