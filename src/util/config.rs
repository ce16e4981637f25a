//! Configuration file support.
//!
//! Two configuration file locations are merged:
//! - Global: `~/.gwen/config.toml` - User-wide defaults
//! - Project: `.gwen/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config; command-line flags
//! take precedence over both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Go program used when nothing else is configured.
pub const DEFAULT_GO: &str = "go";

/// Build driver configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Build settings
    pub build: BuildConfig,
}

/// Build-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Go program to invoke (e.g., /usr/local/go/bin/go)
    pub go: Option<String>,

    /// Request static linking for binaries (default: true)
    pub static_link: Option<bool>,

    /// Bundle MinGW runtime DLLs next to Windows binaries (default: true)
    pub copy_runtime_libs: Option<bool>,

    /// Primary target source path (default: cmd/gwen)
    pub target: Option<String>,

    /// Primary output binary name
    pub output: Option<String>,

    /// Extra directories searched for gcc.exe after the built-in list
    #[serde(default)]
    pub toolchain_dirs: Vec<PathBuf>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.build.go.is_some() {
            self.build.go = other.build.go;
        }
        if other.build.static_link.is_some() {
            self.build.static_link = other.build.static_link;
        }
        if other.build.copy_runtime_libs.is_some() {
            self.build.copy_runtime_libs = other.build.copy_runtime_libs;
        }
        if other.build.target.is_some() {
            self.build.target = other.build.target;
        }
        if other.build.output.is_some() {
            self.build.output = other.build.output;
        }
        if !other.build.toolchain_dirs.is_empty() {
            self.build.toolchain_dirs = other.build.toolchain_dirs;
        }
    }

    /// The Go program to invoke.
    pub fn go_program(&self) -> &str {
        self.build.go.as_deref().unwrap_or(DEFAULT_GO)
    }

    pub fn static_link(&self) -> bool {
        self.build.static_link.unwrap_or(true)
    }

    pub fn copy_runtime_libs(&self) -> bool {
        self.build.copy_runtime_libs.unwrap_or(true)
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.gwen/config.toml)
/// 2. Global config (~/.gwen/config.toml)
/// 3. Defaults
pub fn load_config(global_path: &Path, project_path: &Path) -> Config {
    let mut config = Config::default();

    if global_path.exists() {
        config.merge(Config::load_or_default(global_path));
    }

    if project_path.exists() {
        config.merge(Config::load_or_default(project_path));
    }

    config
}

/// Load the configuration that applies to `project_root`.
pub fn load_project_config(project_root: &Path) -> Config {
    let project_path = project_config_path(project_root);
    match global_config_path() {
        Some(global) => load_config(&global, &project_path),
        None => load_config(&PathBuf::new(), &project_path),
    }
}

/// Get the global config directory (~/.gwen).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".gwen"))
}

/// Get the global config path (~/.gwen/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.gwen/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".gwen").join("config.toml")
}
