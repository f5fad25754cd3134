use crate::error::DbError;

/// Default pool size when `DB_MAX_CONNECTIONS` is unset.
const DEFAULT_MAX_CONNECTIONS: u32 = 20;

/// Database configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Maximum pooled connections (default: `20`).
    pub max_connections: u32,
    /// Whether the bootstrap binary applies migrations (default: `true`).
    pub run_migrations: bool,
}

impl DbConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var              | Default |
    /// |----------------------|---------|
    /// | `DATABASE_URL`       | required |
    /// | `DB_MAX_CONNECTIONS` | `20`    |
    /// | `DB_RUN_MIGRATIONS`  | `true`  |
    pub fn from_env() -> Result<Self, DbError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    ///
    /// `from_env` delegates here; tests pass a closure over a fixed map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DbError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| DbError::Config("DATABASE_URL must be set".into()))?;

        let max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(DbError::Config(format!(
                        "DB_MAX_CONNECTIONS must be a positive integer, got '{raw}'"
                    )))
                }
            },
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let run_migrations = match lookup("DB_RUN_MIGRATIONS") {
            Some(raw) => parse_bool(&raw).ok_or_else(|| {
                DbError::Config(format!("DB_RUN_MIGRATIONS must be true or false, got '{raw}'"))
            })?,
            None => true,
        };

        Ok(Self {
            database_url,
            max_connections,
            run_migrations,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<DbConfig, DbError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        DbConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults_applied() {
        let config = config_from(&[("DATABASE_URL", "postgres://localhost/catalog")]).unwrap();
        assert_eq!(config.database_url, "postgres://localhost/catalog");
        assert_eq!(config.max_connections, 20);
        assert!(config.run_migrations);
    }

    #[test]
    fn test_missing_database_url_is_config_error() {
        assert_matches!(config_from(&[]), Err(DbError::Config(_)));
        assert_matches!(config_from(&[("DATABASE_URL", "  ")]), Err(DbError::Config(_)));
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("DATABASE_URL", "postgres://db/catalog"),
            ("DB_MAX_CONNECTIONS", "5"),
            ("DB_RUN_MIGRATIONS", "false"),
        ])
        .unwrap();
        assert_eq!(config.max_connections, 5);
        assert!(!config.run_migrations);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert_matches!(
            config_from(&[("DATABASE_URL", "x"), ("DB_MAX_CONNECTIONS", "0")]),
            Err(DbError::Config(_))
        );
        assert_matches!(
            config_from(&[("DATABASE_URL", "x"), ("DB_MAX_CONNECTIONS", "many")]),
            Err(DbError::Config(_))
        );
        assert_matches!(
            config_from(&[("DATABASE_URL", "x"), ("DB_RUN_MIGRATIONS", "maybe")]),
            Err(DbError::Config(_))
        );
    }
}
