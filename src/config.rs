use std::path::PathBuf;

use anyhow::Context;
use serde::Deserialize;

const PRODUCTION_DB_PATH: &str = "/opt/render/project/src/instance/energy_tracker.db";
const DEVELOPMENT_DB_PATH: &str = "energy_tracker.db";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    pub production: bool,
    /// Drop and recreate the activities table when its columns drift.
    /// Discards every stored record, so it stays off unless asked for.
    pub reset_on_schema_mismatch: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let production = var("RENDER").is_some();
        let database_path = match var("DATABASE_PATH") {
            Some(path) => PathBuf::from(path),
            None if production => PathBuf::from(PRODUCTION_DB_PATH),
            None => PathBuf::from(DEVELOPMENT_DB_PATH),
        };
        let port = match var("PORT") {
            Some(p) => p
                .trim()
                .parse::<u16>()
                .with_context(|| format!("invalid PORT value {p:?}"))?,
            None => 5000,
        };
        let reset_on_schema_mismatch = var("RESET_ON_SCHEMA_MISMATCH")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            host: var("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            database_path,
            production,
            reset_on_schema_mismatch,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn defaults_to_development_storage_on_port_5000() {
        let cfg = config_from(&[]).unwrap();
        assert_eq!(cfg.port, 5000);
        assert_eq!(cfg.host, "0.0.0.0");
        assert!(!cfg.production);
        assert!(!cfg.reset_on_schema_mismatch);
        assert_eq!(cfg.database_path, PathBuf::from("energy_tracker.db"));
    }

    #[test]
    fn render_flag_selects_production_storage() {
        let cfg = config_from(&[("RENDER", "true"), ("PORT", "8081")]).unwrap();
        assert!(cfg.production);
        assert_eq!(cfg.port, 8081);
        assert_eq!(cfg.database_path, PathBuf::from(PRODUCTION_DB_PATH));
    }

    #[test]
    fn explicit_database_path_wins() {
        let cfg = config_from(&[("RENDER", "1"), ("DATABASE_PATH", "/tmp/x.db")]).unwrap();
        assert_eq!(cfg.database_path, PathBuf::from("/tmp/x.db"));
    }

    #[test]
    fn empty_values_count_as_unset() {
        let cfg = config_from(&[("RENDER", ""), ("PORT", " ")]).unwrap();
        assert!(!cfg.production);
        assert_eq!(cfg.port, 5000);
    }

    #[test]
    fn rejects_unparsable_port() {
        let err = config_from(&[("PORT", "fivethousand")]).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn schema_reset_is_opt_in() {
        assert!(config_from(&[("RESET_ON_SCHEMA_MISMATCH", "TRUE")])
            .unwrap()
            .reset_on_schema_mismatch);
        assert!(!config_from(&[("RESET_ON_SCHEMA_MISMATCH", "no")])
            .unwrap()
            .reset_on_schema_mismatch);
    }
}
