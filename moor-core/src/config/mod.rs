//! Configuration module
//!
//! Loads the VPN profile list from the user's `~/.moorrc` JSON file.

use crate::error::{ConfigError, MoorError};
use crate::types::ProfileSecret;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Default configuration file name, relative to the home directory
const CONFIG_FILE_NAME: &str = ".moorrc";

/// A Tunnelblick configuration paired with its TOTP secret
///
/// Fields other than `name` and `secret` in the profile file are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    /// Tunnelblick configuration name
    pub name: String,

    /// Base32 TOTP secret
    pub secret: ProfileSecret,
}

impl Profile {
    pub fn new(name: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            secret: ProfileSecret::new(secret.into()),
        }
    }
}

/// Ordered, immutable set of profiles
///
/// Iteration order is the order of the config file.
#[derive(Debug, Clone, Default)]
pub struct ProfileRegistry {
    profiles: Vec<Profile>,
}

impl ProfileRegistry {
    pub fn new(profiles: Vec<Profile>) -> Self {
        Self { profiles }
    }

    /// Load the registry from the default config path
    pub fn load_default() -> Result<Self, MoorError> {
        let path = get_config_path()?;
        Self::load(&path)
    }

    /// Load the registry from a JSON file
    ///
    /// Any failure is fatal: a registry is never built from part of a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, MoorError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let contents = std::fs::read_to_string(&path).map_err(|e| {
            MoorError::Config(ConfigError::LoadFailed {
                path: path_str.clone(),
                message: e.to_string(),
            })
        })?;

        let registry = Self::from_json(&contents).map_err(|e| match e {
            MoorError::Config(ConfigError::ParseFailed { message, .. }) => {
                MoorError::Config(ConfigError::ParseFailed {
                    path: path_str.clone(),
                    message,
                })
            }
            other => other,
        })?;

        debug!("Loaded {} profile(s) from {}", registry.len(), path_str);
        Ok(registry)
    }

    /// Parse and validate a JSON array of profiles
    pub fn from_json(contents: &str) -> Result<Self, MoorError> {
        let profiles: Vec<Profile> = serde_json::from_str(contents).map_err(|e| {
            MoorError::Config(ConfigError::ParseFailed {
                path: "<inline>".to_string(),
                message: e.to_string(),
            })
        })?;

        let registry = Self::new(profiles);
        registry.validate()?;
        Ok(registry)
    }

    fn validate(&self) -> Result<(), MoorError> {
        for (index, profile) in self.profiles.iter().enumerate() {
            if profile.name.trim().is_empty() {
                return Err(MoorError::Config(ConfigError::ValidationError {
                    message: format!("profile #{} has an empty name", index + 1),
                }));
            }

            if self.profiles[..index].iter().any(|p| p.name == profile.name) {
                warn!(
                    "Duplicate profile name {:?}; only the first entry is reachable by name",
                    profile.name
                );
            }
        }
        Ok(())
    }

    /// First profile whose name matches exactly
    pub fn find(&self, name: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Profile> {
        self.profiles.iter()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

/// Get the default configuration file path
///
/// Returns `$HOME/.moorrc`, or the `MOOR_CONFIG` environment variable if set.
pub fn get_config_path() -> Result<PathBuf, MoorError> {
    if let Ok(path) = std::env::var("MOOR_CONFIG") {
        return Ok(PathBuf::from(path));
    }

    let home = std::env::var("HOME").map_err(|_| {
        MoorError::Config(ConfigError::PathUnavailable {
            message: "HOME environment variable not set".to_string(),
        })
    })?;

    Ok(PathBuf::from(home).join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const TWO_PROFILES: &str = r#"[
        {"name": "home", "secret": "JBSWY3DPEHPK3PXP"},
        {"name": "office", "secret": "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ", "note": "ignored"}
    ]"#;

    #[test]
    fn test_load_preserves_order() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join(".moorrc");
        std::fs::write(&path, TWO_PROFILES).unwrap();

        let registry = ProfileRegistry::load(&path).unwrap();
        let names: Vec<&str> = registry.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["home", "office"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("absent");

        let result = ProfileRegistry::load(&path);
        assert!(matches!(
            result,
            Err(MoorError::Config(ConfigError::LoadFailed { .. }))
        ));
    }

    #[test]
    fn test_malformed_file_reports_path() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join(".moorrc");
        std::fs::write(&path, "[{\"name\": \"home\"").unwrap();

        match ProfileRegistry::load(&path) {
            Err(MoorError::Config(ConfigError::ParseFailed { path: reported, .. })) => {
                assert_eq!(reported, path.to_string_lossy());
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_rejects_non_array_and_missing_fields() {
        for contents in [
            r#"{"name": "home", "secret": "JBSWY3DPEHPK3PXP"}"#,
            r#"[{"name": "home"}]"#,
            r#"[{"secret": "JBSWY3DPEHPK3PXP"}]"#,
            r#"[{"name": 7, "secret": "JBSWY3DPEHPK3PXP"}]"#,
        ] {
            assert!(
                matches!(
                    ProfileRegistry::from_json(contents),
                    Err(MoorError::Config(ConfigError::ParseFailed { .. }))
                ),
                "accepted {}",
                contents
            );
        }
    }

    #[test]
    fn test_rejects_empty_name() {
        let result = ProfileRegistry::from_json(r#"[{"name": " ", "secret": "JBSWY3DPEHPK3PXP"}]"#);
        assert!(matches!(
            result,
            Err(MoorError::Config(ConfigError::ValidationError { .. }))
        ));
    }

    #[test]
    fn test_find_returns_first_match() {
        let registry = ProfileRegistry::from_json(
            r#"[
                {"name": "dup", "secret": "MZXW6"},
                {"name": "dup", "secret": "JBSWY3DPEHPK3PXP"}
            ]"#,
        )
        .unwrap();

        assert_eq!(registry.find("dup").unwrap().secret.expose(), "MZXW6");
        assert!(registry.find("DUP").is_none());
        assert!(registry.find("missing").is_none());
    }

    #[test]
    fn test_empty_list_is_valid() {
        let registry = ProfileRegistry::from_json("[]").unwrap();
        assert!(registry.is_empty());
    }
}
