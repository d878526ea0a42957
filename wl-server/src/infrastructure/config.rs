use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, anyhow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Prod,
}

impl Environment {
    /// Anything other than `prod` runs as `dev`.
    fn from_name(name: Option<&str>) -> Self {
        match name.map(str::trim) {
            Some("prod") => Environment::Prod,
            _ => Environment::Dev,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub r_binary: String,
    pub model_dir: PathBuf,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    pub database_read_only: bool,
    pub posts_per_page: u32,
    pub cors_origins: Vec<String>,
    pub simulation: SimulationConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = Environment::from_name(lookup("APP_ENV").as_deref());
        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".into());
        let port = lookup("PORT")
            .unwrap_or_else(|| "3000".into())
            .parse()
            .map_err(|e| anyhow!("invalid PORT: {}", e))?;
        let database_path = lookup("DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("wl.db"));
        let database_read_only = parse_bool(lookup("DATABASE_READ_ONLY").as_deref(), true)
            .context("invalid DATABASE_READ_ONLY")?;

        let posts_per_page: u32 = lookup("POSTS_PER_PAGE")
            .unwrap_or_else(|| "2".into())
            .parse()
            .map_err(|e| anyhow!("invalid POSTS_PER_PAGE: {}", e))?;
        if !(1..=50).contains(&posts_per_page) {
            return Err(anyhow!(
                "POSTS_PER_PAGE must be between 1 and 50, got {}",
                posts_per_page
            ));
        }

        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let timeout_secs: u64 = lookup("SIMULATION_TIMEOUT_SECS")
            .unwrap_or_else(|| "300".into())
            .parse()
            .map_err(|e| anyhow!("invalid SIMULATION_TIMEOUT_SECS: {}", e))?;
        let simulation = SimulationConfig {
            r_binary: lookup("R_BINARY").unwrap_or_else(|| "R".into()),
            model_dir: lookup("CAT_MODEL_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("public/projects/cat-model")),
            timeout: Duration::from_secs(timeout_secs),
        };

        Ok(Self {
            environment,
            host,
            port,
            database_path,
            database_read_only,
            posts_per_page,
            cors_origins,
            simulation,
        })
    }
}

fn parse_bool(value: Option<&str>, default: bool) -> anyhow::Result<bool> {
    match value.map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(default),
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(anyhow!("expected a boolean, got {:?}", other)),
        },
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
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.environment, Environment::Dev);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3000);
        assert_eq!(config.database_path, PathBuf::from("wl.db"));
        assert!(config.database_read_only);
        assert_eq!(config.posts_per_page, 2);
        assert!(config.cors_origins.is_empty());
        assert_eq!(config.simulation.r_binary, "R");
        assert_eq!(config.simulation.timeout, Duration::from_secs(300));
    }

    #[test]
    fn unknown_environment_runs_as_dev() {
        let config = config_from(&[("APP_ENV", "staging")]).unwrap();
        assert_eq!(config.environment, Environment::Dev);

        let config = config_from(&[("APP_ENV", "prod")]).unwrap();
        assert_eq!(config.environment, Environment::Prod);
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("PORT", "8080"),
            ("DATABASE_PATH", "/srv/wl/wl.db"),
            ("DATABASE_READ_ONLY", "false"),
            ("POSTS_PER_PAGE", "5"),
            ("CORS_ORIGINS", "https://a.example, ,https://b.example"),
            ("SIMULATION_TIMEOUT_SECS", "30"),
        ])
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.database_path, PathBuf::from("/srv/wl/wl.db"));
        assert!(!config.database_read_only);
        assert_eq!(config.posts_per_page, 5);
        assert_eq!(
            config.cors_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert_eq!(config.simulation.timeout, Duration::from_secs(30));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(config_from(&[("PORT", "http")]).is_err());
        assert!(config_from(&[("POSTS_PER_PAGE", "0")]).is_err());
        assert!(config_from(&[("DATABASE_READ_ONLY", "maybe")]).is_err());
    }
}
