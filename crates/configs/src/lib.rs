use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

/// Retention window stamped on records when nothing overrides it, in days.
pub const DEFAULT_RETENTION_DAYS: u32 = 90;

/// Upper bound accepted for `retention_days`; stamps stay well inside the
/// representable date range.
pub const MAX_RETENTION_DAYS: u32 = 36_500;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub store: StoreConfig,
}

/// Policy knobs for keyed stores: how long a record is stamped to live,
/// which scope path is written alongside it, and whether fetch enforces
/// the stamped expiry itself (default: the medium owns expiry).
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
    #[serde(default = "default_path_scope")]
    pub path_scope: String,
    #[serde(default)]
    pub enforce_expiry: bool,
}

fn default_retention_days() -> u32 { DEFAULT_RETENTION_DAYS }
fn default_path_scope() -> String { "/".to_string() }

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            retention_days: default_retention_days(),
            path_scope: default_path_scope(),
            enforce_expiry: false,
        }
    }
}

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.store.normalize_from_env()?;
        self.store.validate()?;
        Ok(())
    }
}

impl StoreConfig {
    /// Fill overrides from environment variables (`.env` honored if present):
    /// `STORE_RETENTION_DAYS`, `STORE_PATH_SCOPE`, `STORE_ENFORCE_EXPIRY`.
    pub fn normalize_from_env(&mut self) -> Result<()> {
        let _ = dotenvy::dotenv();
        if let Ok(days) = std::env::var("STORE_RETENTION_DAYS") {
            self.retention_days = days
                .parse()
                .map_err(|_| anyhow!("STORE_RETENTION_DAYS must be a positive integer, got {days:?}"))?;
        }
        if let Ok(scope) = std::env::var("STORE_PATH_SCOPE") {
            self.path_scope = scope;
        }
        if let Ok(flag) = std::env::var("STORE_ENFORCE_EXPIRY") {
            self.enforce_expiry = match flag.as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                other => return Err(anyhow!("STORE_ENFORCE_EXPIRY must be a boolean, got {other:?}")),
            };
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.retention_days == 0 {
            return Err(anyhow!("store.retention_days must be >= 1"));
        }
        if self.retention_days > MAX_RETENTION_DAYS {
            return Err(anyhow!(
                "store.retention_days must be <= {MAX_RETENTION_DAYS}"
            ));
        }
        if self.path_scope.trim().is_empty() || !self.path_scope.starts_with('/') {
            return Err(anyhow!("store.path_scope must start with '/'"));
        }
        if self.path_scope.contains(';') || self.path_scope.contains('=') {
            return Err(anyhow!("store.path_scope must not contain ';' or '='"));
        }
        Ok(())
    }
}
