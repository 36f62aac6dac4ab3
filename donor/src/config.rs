#![forbid(unsafe_code)]

use std::fs;
use std::path::{Path, PathBuf};

use donor_verify::VerifyConfig;
use miette::Diagnostic;
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = "donor.toml";

#[derive(Debug, Error, Diagnostic)]
#[error("config error: {message}")]
#[diagnostic(code(donor::config))]
pub struct ConfigError {
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// Default filter when `DONOR_LOG` is not set.
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DonorConfig {
    pub verify: VerifyConfig,
    pub log: LogConfig,
}

#[derive(Clone, Debug, Default)]
pub struct ResolvedConfig {
    pub config_path: Option<PathBuf>,
    pub config: DonorConfig,
}

impl DonorConfig {
    pub fn parse(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError {
            message: format!("{}: {e}", origin.display()),
        })
    }
}

/// Explicit `--config` wins; otherwise `donor.toml` next to the module file
/// is used when present; otherwise defaults.
pub fn resolve_config(explicit: Option<&Path>, module_path: &Path) -> Result<ResolvedConfig, ConfigError> {
    let candidate = match explicit {
        Some(p) => Some(p.to_path_buf()),
        None => {
            let dir = module_path.parent().unwrap_or_else(|| Path::new("."));
            let p = dir.join(CONFIG_FILE_NAME);
            p.is_file().then_some(p)
        }
    };

    let Some(path) = candidate else {
        return Ok(ResolvedConfig::default());
    };

    let text = fs::read_to_string(&path).map_err(|e| ConfigError {
        message: format!("failed to read {}: {e}", path.display()),
    })?;
    let config = DonorConfig::parse(&text, &path)?;
    Ok(ResolvedConfig {
        config_path: Some(path),
        config,
    })
}

/// Command-line overrides applied on top of the file.
#[derive(Clone, Copy, Debug, Default)]
pub struct VerifyOverrides {
    pub keep_going: bool,
    pub no_parallel: bool,
    pub max_diagnostics: Option<usize>,
}

pub fn build_verify_config(resolved: &ResolvedConfig, overrides: VerifyOverrides) -> VerifyConfig {
    let mut cfg = resolved.config.verify;
    if overrides.keep_going {
        cfg.keep_going = true;
    }
    if overrides.no_parallel {
        cfg.parallel = false;
    }
    if let Some(n) = overrides.max_diagnostics {
        cfg.max_diagnostics = n;
    }
    cfg
}
