use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::db::CURRENT_VERSION;

pub const DB_PATH_ENV: &str = "BUDGETDB_PATH";
pub const MIGRATION_ENV: &str = "BUDGETDB_MIGRATION";

const DB_FILE_NAME: &str = "budget.db";

/// What to do with existing rows when the stored schema version is older
/// than the one the store is opened with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MigrationStrategy {
    /// Drop both tables and recreate them empty. All data is lost.
    #[default]
    DropRecreate,
    /// Keep rows and apply the registered additive migrations in order.
    PreserveWithAlter,
}

impl MigrationStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DropRecreate => "drop-recreate",
            Self::PreserveWithAlter => "preserve",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "drop-recreate" | "drop" | "recreate" => Some(Self::DropRecreate),
            "preserve" | "preserve-with-alter" | "alter" => Some(Self::PreserveWithAlter),
            _ => None,
        }
    }
}

impl std::fmt::Display for MigrationStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub path: PathBuf,
    pub schema_version: i32,
    pub migration: MigrationStrategy,
}

impl StoreConfig {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            schema_version: CURRENT_VERSION,
            migration: MigrationStrategy::default(),
        }
    }

    /// Resolve from the `--db` flag, then the environment, then the
    /// platform data directory.
    pub fn resolve(db_flag: Option<&str>) -> Result<Self> {
        Self::from_sources(
            db_flag,
            std::env::var(DB_PATH_ENV).ok(),
            std::env::var(MIGRATION_ENV).ok(),
        )
    }

    fn from_sources(
        db_flag: Option<&str>,
        env_path: Option<String>,
        env_migration: Option<String>,
    ) -> Result<Self> {
        let path = match db_flag
            .map(str::to_string)
            .or(env_path)
            .filter(|p| !p.trim().is_empty())
        {
            Some(p) => PathBuf::from(p),
            None => default_db_path()?,
        };

        let mut config = Self::new(path);
        if let Some(raw) = env_migration {
            config.migration = MigrationStrategy::parse(&raw).ok_or_else(|| {
                anyhow::anyhow!("Invalid {MIGRATION_ENV} value '{raw}' (expected drop-recreate or preserve)")
            })?;
        }
        Ok(config)
    }
}

fn default_db_path() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "budgetdb", "budgetdb")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.join(DB_FILE_NAME))
}
