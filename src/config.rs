// src/config.rs

//! Recognized options and how they are sourced.
//!
//! Options come from, in increasing precedence:
//! 1. defaults,
//! 2. an optional TOML file ([`load_from_path`]),
//! 3. environment variables (`ASYNCBREAK_KEEP_INTERNALS`,
//!    `ASYNCBREAK_ARTIFACT`),
//! 4. whatever flags the embedding binary layers on top.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Environment variable forcing `keep_internal_frames = true`.
pub const ENV_KEEP_INTERNALS: &str = "ASYNCBREAK_KEEP_INTERNALS";

/// Environment variable forcing `produce_artifact = true`.
pub const ENV_ARTIFACT: &str = "ASYNCBREAK_ARTIFACT";

/// Recognized options.
///
/// ```toml
/// keep_internal_frames = false
/// produce_artifact = true
/// artifact_dir = "target/diagnostics"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Options {
    /// Include this library's own frames in captured descriptors instead of
    /// filtering them. Useful when debugging the tracking itself.
    #[serde(default)]
    pub keep_internal_frames: bool,

    /// Report failures by way of a persisted visual artifact rather than
    /// inline text. The core only carries the flag; writing happens in the
    /// rendering layer.
    #[serde(default)]
    pub produce_artifact: bool,

    /// Where artifacts go. Defaults to the current working directory.
    #[serde(default)]
    pub artifact_dir: Option<PathBuf>,
}

impl Options {
    /// Defaults overlaid with the environment flags.
    pub fn from_env() -> Self {
        Self::default().apply_env()
    }

    /// Overlay the `ASYNCBREAK_*` environment flags on top of `self`.
    /// A set-but-falsy value ("0", "false", empty) leaves the field alone.
    pub fn apply_env(mut self) -> Self {
        if env_flag(ENV_KEEP_INTERNALS) {
            self.keep_internal_frames = true;
        }
        if env_flag(ENV_ARTIFACT) {
            self.produce_artifact = true;
        }
        self
    }

    pub fn effective_artifact_dir(&self) -> PathBuf {
        self.artifact_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Load options from a TOML file. Env flags are not applied here; call
/// [`Options::apply_env`] on the result if the ambient flags should win.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<Options> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading options file at {:?}", path))?;

    let options: Options = toml::from_str(&contents)
        .with_context(|| format!("parsing TOML options from {:?}", path))?;

    Ok(options)
}

/// Truthiness of a flag-style string value.
pub fn parse_flag(value: &str) -> bool {
    !matches!(value.trim().to_lowercase().as_str(), "" | "0" | "false" | "no")
}

fn env_flag(name: &str) -> bool {
    std::env::var(name).is_ok_and(|v| parse_flag(&v))
}
