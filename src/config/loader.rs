use crate::config::schema::Settings;
use crate::error::{Error, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;
use validator::Validate;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads settings over the defaults. A missing or malformed file yields
    /// the defaults; a key with an invalid value keeps its default while the
    /// other keys still apply. Each problem is logged as a warning.
    pub fn load<P: AsRef<Path>>(path: P) -> Settings {
        let path = path.as_ref();
        if !path.exists() {
            log::warn!("Settings file not found at {}, using defaults.", path.display());
            return Settings::default();
        }

        match Self::load_value(path) {
            Ok(Value::Object(entries)) => {
                let mut settings = Settings::default();
                for (key, value) in entries {
                    match Self::apply(&settings, &key, value) {
                        Ok(updated) => settings = updated,
                        Err(e) => log::warn!(
                            "Invalid value for '{}' in {}: {}. Using default.",
                            key,
                            path.display(),
                            e
                        ),
                    }
                }
                settings
            }
            Ok(_) => {
                log::warn!(
                    "Settings file {} is not an object. Using defaults.",
                    path.display()
                );
                Settings::default()
            }
            Err(e) => {
                log::warn!("Ignoring settings file {}: {}. Using defaults.", path.display(), e);
                Settings::default()
            }
        }
    }

    /// Strict variant of [`ConfigLoader::load`]: any bad value is an error.
    pub fn try_load<P: AsRef<Path>>(path: P) -> Result<Settings> {
        let settings: Settings = serde_json::from_value(Self::load_value(path.as_ref())?)?;
        settings.validate()?;
        Ok(settings)
    }

    /// `settings` with one key overridden, if the result deserializes and
    /// validates.
    fn apply(settings: &Settings, key: &str, value: Value) -> Result<Settings> {
        let mut merged = serde_json::to_value(settings)?;
        if let Value::Object(map) = &mut merged {
            map.insert(key.to_string(), value);
        }
        let updated: Settings = serde_json::from_value(merged)?;
        updated.validate()?;
        Ok(updated)
    }

    fn load_value(path: &Path) -> Result<Value> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;

        let value = match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
            Some("toml") => toml::from_str(&content)?,
            _ => serde_json::from_str(&content)?,
        };
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{DEFAULT_BASE_URL, DEFAULT_MAX_WORKERS, DEFAULT_USER_AGENT};
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    fn write_settings(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .expect("temp file");
        file.write_all(content.as_bytes()).expect("write settings");
        file
    }

    #[test]
    fn missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = ConfigLoader::load(dir.path().join("nope.json"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn partial_json_keeps_defaults_for_missing_keys() {
        let file = write_settings(
            ".json",
            r#"{"maxWorkers": 3, "requestTimeoutSeconds": 2.5, "snapshotDate": "2024-05-01"}"#,
        );
        let settings = ConfigLoader::load(file.path());
        assert_eq!(settings.max_workers, 3);
        assert_eq!(settings.request_timeout_seconds, 2.5);
        assert_eq!(settings.snapshot_date.as_deref(), Some("2024-05-01"));
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn malformed_json_falls_back_to_defaults() {
        let file = write_settings(".json", "{ this is not json");
        assert!(ConfigLoader::try_load(file.path()).is_err());
        assert_eq!(ConfigLoader::load(file.path()), Settings::default());

        let file = write_settings(".json", "[1, 2]");
        assert_eq!(ConfigLoader::load(file.path()), Settings::default());
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let file = write_settings(".json", r#"{"maxWorkers": 0}"#);
        assert!(matches!(ConfigLoader::try_load(file.path()), Err(Error::Validation(_))));
        assert_eq!(ConfigLoader::load(file.path()).max_workers, DEFAULT_MAX_WORKERS);
    }

    #[test]
    fn invalid_key_does_not_discard_valid_ones() {
        let file = write_settings(
            ".json",
            r#"{"similarwebBaseUrl": "http://mirror.local/website", "userAgent": "custom/1.0", "snapshotDate": "2024/06/01"}"#,
        );
        let settings = ConfigLoader::load(file.path());
        assert_eq!(settings.base_url, "http://mirror.local/website");
        assert_eq!(settings.user_agent, "custom/1.0");
        assert_eq!(settings.snapshot_date, None);

        let file = write_settings(
            ".json",
            r#"{"similarwebBaseUrl": "http://mirror.local/website", "maxWorkers": 4.5, "userAgent": ""}"#,
        );
        let settings = ConfigLoader::load(file.path());
        assert_eq!(settings.base_url, "http://mirror.local/website");
        assert_eq!(settings.max_workers, DEFAULT_MAX_WORKERS);
        assert_eq!(settings.user_agent, DEFAULT_USER_AGENT);
        assert!(ConfigLoader::try_load(file.path()).is_err());
    }

    #[test]
    fn yaml_and_toml_by_extension() {
        let yaml = write_settings(".yaml", "maxWorkers: 7\nsimilarwebBaseUrl: http://localhost/site\n");
        let settings = ConfigLoader::try_load(yaml.path()).unwrap();
        assert_eq!(settings.max_workers, 7);
        assert_eq!(settings.base_url, "http://localhost/site");

        let toml = write_settings(".toml", "userAgent = \"agent/1.0\"\nmaxWorkers = 0\n");
        let settings = ConfigLoader::load(toml.path());
        assert_eq!(settings.user_agent, "agent/1.0");
        assert_eq!(settings.max_workers, DEFAULT_MAX_WORKERS);
    }
}
