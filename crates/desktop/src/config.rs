//! Desktop shell configuration (environment variables with defaults).

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, bail};

use tillpoint_observability::LogFormat;
use tillpoint_restock::RestockSettings;
use tillpoint_suppliers::DEFAULT_PAGE_SIZE;

pub const ENV_DATA_DIR: &str = "TILLPOINT_DATA_DIR";
pub const ENV_LOG_FORMAT: &str = "TILLPOINT_LOG_FORMAT";
pub const ENV_SUPPLIER_PAGE_SIZE: &str = "TILLPOINT_SUPPLIER_PAGE_SIZE";
pub const ENV_SUBMIT_TIMEOUT_SECS: &str = "TILLPOINT_SUBMIT_TIMEOUT_SECS";

const SESSION_FILE: &str = "session.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesktopConfig {
    /// Directory holding local state (the session file).
    pub data_dir: PathBuf,
    pub log_format: LogFormat,
    pub supplier_page_size: u32,
    /// `None` lets a submission wait indefinitely.
    pub submit_timeout: Option<Duration>,
}

impl DesktopConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let data_dir = match get(ENV_DATA_DIR) {
            Some(dir) => PathBuf::from(dir),
            None => default_data_dir()?,
        };

        let log_format = match get(ENV_LOG_FORMAT) {
            Some(raw) => raw
                .parse::<LogFormat>()
                .with_context(|| format!("invalid {ENV_LOG_FORMAT}"))?,
            None => LogFormat::default(),
        };

        let supplier_page_size = match get(ENV_SUPPLIER_PAGE_SIZE) {
            Some(raw) => {
                let size: u32 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("invalid {ENV_SUPPLIER_PAGE_SIZE}: {raw}"))?;
                if size == 0 {
                    bail!("{ENV_SUPPLIER_PAGE_SIZE} must be at least 1");
                }
                size
            }
            None => DEFAULT_PAGE_SIZE,
        };

        let submit_timeout = match get(ENV_SUBMIT_TIMEOUT_SECS) {
            Some(raw) => {
                let secs: u64 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("invalid {ENV_SUBMIT_TIMEOUT_SECS}: {raw}"))?;
                if secs == 0 {
                    bail!("{ENV_SUBMIT_TIMEOUT_SECS} must be at least 1");
                }
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self {
            data_dir,
            log_format,
            supplier_page_size,
            submit_timeout,
        })
    }

    pub fn session_path(&self) -> PathBuf {
        self.data_dir.join(SESSION_FILE)
    }

    pub fn restock_settings(&self) -> RestockSettings {
        RestockSettings {
            supplier_page_size: self.supplier_page_size,
            submit_timeout: self.submit_timeout,
        }
    }
}

fn default_data_dir() -> anyhow::Result<PathBuf> {
    let base = dirs::data_dir()
        .with_context(|| format!("could not determine a data directory; set {ENV_DATA_DIR}"))?;
    Ok(base.join("tillpoint"))
}
