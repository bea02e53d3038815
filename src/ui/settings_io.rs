use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::ui::settings::AppSettings;

fn settings_path() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("storyworld");
    path.push("settings.json");
    path
}

/// Missing or unreadable settings fall back to defaults.
pub fn load_settings() -> AppSettings {
    let path = settings_path();
    match load_settings_from(&path) {
        Ok(Some(settings)) => settings,
        Ok(None) => AppSettings::default(),
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unreadable settings");
            AppSettings::default()
        }
    }
}

pub fn save_settings(settings: &AppSettings) {
    if let Err(e) = save_settings_to(&settings_path(), settings) {
        tracing::warn!(error = %e, "could not save settings");
    }
}

pub fn load_settings_from(path: &Path) -> Result<Option<AppSettings>> {
    if !path.exists() {
        return Ok(None);
    }

    let json = fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let mut settings: AppSettings = serde_json::from_str(&json)
        .with_context(|| format!("parsing {}", path.display()))?;
    settings.sanitize();
    Ok(Some(settings))
}

pub fn save_settings_to(path: &Path, settings: &AppSettings) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }

    let json = serde_json::to_string_pretty(settings)?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::illustration::ImageSize;

    #[test]
    fn missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_settings_from(&dir.path().join("settings.json"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn settings_survive_a_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let mut settings = AppSettings::default();
        settings.ui_scale = 1.5;
        settings.illustration.size = ImageSize::Landscape;
        settings.illustration.endpoint = "http://localhost:8080/images".into();

        save_settings_to(&path, &settings).unwrap();
        assert_eq!(load_settings_from(&path).unwrap(), Some(settings));
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"illustration":{"model":"dall-e-2"}}"#).unwrap();

        let settings = load_settings_from(&path).unwrap().unwrap();
        assert_eq!(settings.ui_scale, 1.0);
        assert_eq!(settings.illustration.model, "dall-e-2");
        assert_eq!(
            settings.illustration.endpoint,
            crate::engine::illustration::DEFAULT_ENDPOINT
        );
    }

    #[test]
    fn out_of_range_scale_is_clamped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        for (raw, expected) in [("0", 0.75), ("-3.5", 0.75), ("9", 2.0), ("1.25", 1.25)] {
            fs::write(&path, format!(r#"{{"ui_scale":{raw}}}"#)).unwrap();
            let settings = load_settings_from(&path).unwrap().unwrap();
            assert_eq!(settings.ui_scale, expected, "{raw}");
        }
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ nope").unwrap();
        assert!(load_settings_from(&path).is_err());
    }

    #[test]
    fn credential_is_never_part_of_settings() {
        let json = serde_json::to_string(&AppSettings::default()).unwrap();
        assert!(!json.to_lowercase().contains("key"));
        assert!(!json.to_lowercase().contains("token"));
    }
}
