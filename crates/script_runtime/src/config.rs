//! Runtime configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, RuntimeError};
use crate::frame::FrameConfig;

/// Settings for a runtime process, usually read from a JSON file.
///
/// ```json
/// { "frame_rate": 60.0, "max_frames": 600, "log_filter": "info", "scene": "scene.json" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    #[serde(flatten)]
    pub frame: FrameConfig,
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub log_filter: String,
    /// Scene descriptor to load, relative paths resolved against the config
    /// file's directory.
    pub scene: Option<PathBuf>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            frame: FrameConfig::default(),
            log_filter: "info".to_owned(),
            scene: None,
        }
    }
}

impl RuntimeConfig {
    /// Read and validate a config file.
    ///
    /// # Errors
    ///
    /// I/O and JSON failures, or an invalid frame rate.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| RuntimeError::Io {
            path: path.to_owned(),
            source,
        })?;
        let mut config: Self = serde_json::from_str(&text).map_err(|source| RuntimeError::Json {
            path: path.to_owned(),
            source,
        })?;
        config.scene = config.scene.take().map(|scene| match path.parent() {
            Some(dir) if scene.is_relative() => dir.join(scene),
            _ => scene,
        });
        config.frame.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config: RuntimeConfig = serde_json::from_str(r#"{ "max_frames": 10 }"#).unwrap();
        assert_eq!(config.frame.frame_rate, 60.0);
        assert_eq!(config.frame.max_frames, 10);
        assert_eq!(config.log_filter, "info");
        assert!(config.scene.is_none());
    }

    #[test]
    fn test_load_resolves_scene_path() {
        let dir = std::env::temp_dir().join(format!("script_runtime_config_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("runtime.json");
        std::fs::write(&path, r#"{ "frame_rate": 30.0, "scene": "level.json" }"#).unwrap();

        let config = RuntimeConfig::load(&path).unwrap();
        assert_eq!(config.frame.frame_rate, 30.0);
        assert_eq!(config.scene, Some(dir.join("level.json")));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_errors() {
        let missing = Path::new("/nonexistent/runtime.json");
        assert!(matches!(
            RuntimeConfig::load(missing),
            Err(RuntimeError::Io { .. })
        ));

        let dir = std::env::temp_dir().join(format!("script_runtime_bad_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("runtime.json");
        std::fs::write(&path, r#"{ "frame_rate": -5.0 }"#).unwrap();
        assert!(matches!(
            RuntimeConfig::load(&path),
            Err(RuntimeError::InvalidFrameRate(_))
        ));
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            RuntimeConfig::load(&path),
            Err(RuntimeError::Json { .. })
        ));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
