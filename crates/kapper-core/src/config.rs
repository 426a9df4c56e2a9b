use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can pass a `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let env = parse_environment(&or_default("KAPPER_ENV", "development"))?;

    let bind_addr = or_default("KAPPER_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("KAPPER_BIND_ADDR", e.to_string()))?;

    let log_level = or_default("KAPPER_LOG_LEVEL", "info");
    let providers_path = PathBuf::from(or_default(
        "KAPPER_PROVIDERS_PATH",
        "./config/providers.yaml",
    ));
    let zoom_table_path = lookup("KAPPER_ZOOM_TABLE_PATH")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from);

    let refresh_cron = or_default("KAPPER_REFRESH_CRON", "0 */5 * * * *");
    if refresh_cron.split_whitespace().count() < 6 {
        return Err(invalid(
            "KAPPER_REFRESH_CRON",
            "expected a six-field cron expression (sec min hour dom mon dow)".to_string(),
        ));
    }

    let rate_limit_per_minute = or_default("KAPPER_RATE_LIMIT_PER_MINUTE", "120")
        .parse::<usize>()
        .map_err(|e| invalid("KAPPER_RATE_LIMIT_PER_MINUTE", e.to_string()))?;
    if rate_limit_per_minute == 0 {
        return Err(invalid(
            "KAPPER_RATE_LIMIT_PER_MINUTE",
            "must be greater than zero".to_string(),
        ));
    }

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        providers_path,
        zoom_table_path,
        refresh_cron,
        rate_limit_per_minute,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything other than the three known names.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "KAPPER_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
