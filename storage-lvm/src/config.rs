// SPDX-License-Identifier: GPL-3.0-only

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{LvmError, Result};

pub const DEFAULT_LVM_PATH: &str = "/usr/sbin/lvm";
pub const DEFAULT_VOLUME_GROUP: &str = "ovirt-local";
pub const DEFAULT_CONFIG_PATH: &str = "/etc/cosmic-ext-disks/lvm-helper.toml";
pub const CONFIG_ENV: &str = "LVM_HELPER_CONFIG";

/// Where the relay finds the LVM binary and which volume group it targets.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LvmConfig {
    pub lvm_path: PathBuf,
    pub volume_group: String,
}

impl Default for LvmConfig {
    fn default() -> Self {
        Self {
            lvm_path: PathBuf::from(DEFAULT_LVM_PATH),
            volume_group: DEFAULT_VOLUME_GROUP.to_string(),
        }
    }
}

impl LvmConfig {
    pub fn new(lvm_path: impl Into<PathBuf>, volume_group: impl Into<String>) -> Self {
        Self {
            lvm_path: lvm_path.into(),
            volume_group: volume_group.into(),
        }
    }

    /// Resolve configuration from an explicit path, `LVM_HELPER_CONFIG`, or
    /// the system default location, falling back to built-in defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        Self::resolve_with(explicit, std::env::var(CONFIG_ENV).ok())
    }

    /// [`LvmConfig::resolve`] with the `LVM_HELPER_CONFIG` value supplied by the caller.
    pub fn resolve_with(explicit: Option<&Path>, env_value: Option<String>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        if let Some(value) = env_value
            && !value.is_empty()
        {
            return Self::load(Path::new(&value));
        }

        let default_path = Path::new(DEFAULT_CONFIG_PATH);
        if default_path.exists() {
            return Self::load(default_path);
        }

        tracing::debug!("no config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|error| LvmError::ConfigIo {
            path: path.to_path_buf(),
            reason: error.to_string(),
        })?;

        let config = Self::parse(&raw).map_err(|reason| LvmError::ConfigInvalid {
            path: path.to_path_buf(),
            reason,
        })?;

        tracing::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    fn parse(raw: &str) -> std::result::Result<Self, String> {
        let config: Self = toml::from_str(raw).map_err(|error| error.to_string())?;
        if config.volume_group.trim().is_empty() {
            return Err("volume_group must not be empty".to_string());
        }
        if config.lvm_path.as_os_str().is_empty() {
            return Err("lvm_path must not be empty".to_string());
        }
        Ok(config)
    }

    pub fn with_volume_group(mut self, volume_group: impl Into<String>) -> Result<Self> {
        let volume_group = volume_group.into();
        if volume_group.trim().is_empty() {
            return Err(LvmError::ConfigInvalid {
                path: PathBuf::from("--volume-group"),
                reason: "volume_group must not be empty".to_string(),
            });
        }
        self.volume_group = volume_group;
        Ok(self)
    }

    /// `<group>/<lv_name>` reference for a volume in the configured group.
    pub fn lv_path(&self, lv_name: &str) -> String {
        format!("{}/{}", self.volume_group, lv_name)
    }
}
