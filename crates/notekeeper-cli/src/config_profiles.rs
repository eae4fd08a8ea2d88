//! Persistent CLI profile configuration.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use notekeeper_core::config::{normalize_base_url, ClientConfig, API_URL_ENV};
use notekeeper_core::models::TagCase;
use notekeeper_core::util::non_blank;
use serde::{Deserialize, Serialize};

use crate::error::CliError;

const CONFIG_FILE_NAME: &str = "cli-config.json";
pub const PROFILE_ENV: &str = "NOTEKEEPER_PROFILE";
pub const DEFAULT_PROFILE: &str = "default";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CliProfilesConfig {
    #[serde(default = "default_config_version")]
    pub version: u32,
    #[serde(default)]
    pub active_profile: Option<String>,
    #[serde(default)]
    pub profiles: BTreeMap<String, CliProfile>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CliProfile {
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub tag_case: TagCase,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

const fn default_config_version() -> u32 {
    1
}

pub fn default_config_path() -> Result<PathBuf, String> {
    dirs::config_dir()
        .map(|dir| dir.join("notekeeper").join(CONFIG_FILE_NAME))
        .ok_or_else(|| "Failed to resolve CLI config directory".to_string())
}

pub fn normalize_profile_name(value: Option<&str>) -> Option<String> {
    non_blank(value)
}

impl CliProfilesConfig {
    pub fn load() -> Result<Self, String> {
        Self::load_from_path(&default_config_path()?)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|error| format!("Failed to read config at {}: {}", path.display(), error))?;
        let mut config = serde_json::from_str::<Self>(&raw)
            .map_err(|error| format!("Failed to parse config at {}: {}", path.display(), error))?;
        config.normalize();
        Ok(config)
    }

    pub fn save(&self) -> Result<PathBuf, String> {
        let path = default_config_path()?;
        self.save_to_path(&path)?;
        Ok(path)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|error| {
                format!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    error
                )
            })?;
        }

        let mut normalized = self.clone();
        normalized.normalize();
        let serialized = serde_json::to_string_pretty(&normalized)
            .map_err(|error| format!("Failed to serialize config: {error}"))?;
        std::fs::write(path, serialized)
            .map_err(|error| format!("Failed to write config at {}: {}", path.display(), error))
    }

    /// Explicit flag, then `NOTEKEEPER_PROFILE`, then the active profile.
    pub fn resolve_profile_name(&self, explicit: Option<&str>) -> String {
        self.resolve_profile_name_from(explicit, std::env::var(PROFILE_ENV).ok().as_deref())
    }

    pub fn resolve_profile_name_from(&self, explicit: Option<&str>, env: Option<&str>) -> String {
        normalize_profile_name(explicit)
            .or_else(|| normalize_profile_name(env))
            .or_else(|| normalize_profile_name(self.active_profile.as_deref()))
            .unwrap_or_else(|| DEFAULT_PROFILE.to_string())
    }

    pub fn profile(&self, name: &str) -> Option<&CliProfile> {
        self.profiles.get(name)
    }

    pub fn profile_mut_or_default(&mut self, name: &str) -> &mut CliProfile {
        self.profiles.entry(name.to_string()).or_default()
    }

    fn normalize(&mut self) {
        self.active_profile = normalize_profile_name(self.active_profile.as_deref());
        for profile in self.profiles.values_mut() {
            profile.normalize();
        }
    }
}

impl CliProfile {
    pub fn api_base_url(&self) -> Option<String> {
        non_blank(self.api_base_url.as_deref())
    }

    fn normalize(&mut self) {
        self.api_base_url = self
            .api_base_url()
            .map(|url| url.trim_end_matches('/').to_string());
    }
}

/// Build the client configuration for a profile.
///
/// `NOTEKEEPER_API_URL` wins over the profile's stored URL; tag matching and
/// timeout always come from the profile.
pub fn resolve_client_config(
    profile_name: &str,
    profile: Option<&CliProfile>,
) -> Result<ClientConfig, CliError> {
    resolve_client_config_from(profile_name, profile, std::env::var(API_URL_ENV).ok())
}

pub fn resolve_client_config_from(
    profile_name: &str,
    profile: Option<&CliProfile>,
    env_url: Option<String>,
) -> Result<ClientConfig, CliError> {
    let base_url = non_blank(env_url.as_deref())
        .or_else(|| profile.and_then(CliProfile::api_base_url))
        .ok_or_else(|| CliError::NotConfigured(profile_name.to_string()))?;

    let config = ClientConfig::new(base_url)?;
    Ok(match profile {
        Some(profile) => config
            .with_tag_case(profile.tag_case)
            .with_request_timeout_secs(profile.request_timeout_secs),
        None => config,
    })
}

/// Validate and normalize a URL given on the command line.
pub fn validate_api_base_url(url: &str) -> Result<String, CliError> {
    normalize_base_url(url).map_err(|error| CliError::Config(error.to_string()))
}
