use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tilerun_engine::{LoopConfig, SimulationConfig, Viewport};

pub(crate) const CONFIG_ENV_VAR: &str = "TILERUN_CONFIG";

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path} at {field}: {source}")]
    Json {
        path: PathBuf,
        field: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Everything the binary reads from its optional JSON config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct GameConfig {
    pub(crate) simulation: SimulationConfig,
    #[serde(rename = "loop")]
    pub(crate) frame_loop: FrameLoopSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct FrameLoopSettings {
    pub(crate) frame_ms: u64,
    pub(crate) metrics_log_interval_ms: u64,
    pub(crate) max_frames: Option<u64>,
    pub(crate) viewport_width: u32,
    pub(crate) viewport_height: u32,
}

impl Default for FrameLoopSettings {
    fn default() -> Self {
        let defaults = LoopConfig::default();
        Self {
            frame_ms: defaults.default_frame_delta.as_millis() as u64,
            metrics_log_interval_ms: defaults.metrics_log_interval.as_millis() as u64,
            max_frames: defaults.max_frames,
            viewport_width: defaults.viewport.width,
            viewport_height: defaults.viewport.height,
        }
    }
}

impl FrameLoopSettings {
    pub(crate) fn to_loop_config(&self) -> LoopConfig {
        LoopConfig {
            default_frame_delta: Duration::from_millis(self.frame_ms),
            max_frames: self.max_frames,
            metrics_log_interval: Duration::from_millis(self.metrics_log_interval_ms),
            viewport: Viewport {
                width: self.viewport_width,
                height: self.viewport_height,
            },
        }
    }
}

pub(crate) fn load_config(path: Option<&Path>) -> Result<GameConfig, ConfigError> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(path, &raw)
}

fn parse_config(path: &Path, raw: &str) -> Result<GameConfig, ConfigError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize::<_, GameConfig>(&mut deserializer).map_err(|error| {
        let field = error.path().to_string();
        ConfigError::Json {
            path: path.to_path_buf(),
            field,
            source: error.into_inner(),
        }
    })
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn missing_path_yields_defaults() {
        let config = load_config(None).expect("defaults");
        assert_eq!(config.simulation, SimulationConfig::default());
        assert_eq!(config.frame_loop.frame_ms, 16);
        assert_eq!(config.frame_loop.max_frames, None);
    }

    #[test]
    fn partial_file_overrides_only_named_fields() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("tilerun.json");
        fs::write(
            &path,
            r#"{ "simulation": { "player": { "initial_health": 30 } }, "loop": { "max_frames": 90 } }"#,
        )
        .expect("write");

        let config = load_config(Some(&path)).expect("config");
        assert_eq!(config.simulation.player.initial_health, 30);
        assert_eq!(config.simulation.player.max_health, 40);
        let loop_config = config.frame_loop.to_loop_config();
        assert_eq!(loop_config.max_frames, Some(90));
        assert_eq!(loop_config.default_frame_delta, Duration::from_millis(16));
        assert_eq!(loop_config.viewport, Viewport::default());
    }

    #[test]
    fn type_errors_report_the_json_path() {
        let err = parse_config(
            Path::new("tilerun.json"),
            r#"{ "simulation": { "player": { "max_health": "lots" } } }"#,
        )
        .expect_err("bad type");
        let ConfigError::Json { field, .. } = &err else {
            panic!("expected json error, got {err:?}");
        };
        assert_eq!(field, "simulation.player.max_health");
        assert!(err.to_string().contains("tilerun.json"));
    }

    #[test]
    fn unknown_loop_fields_are_rejected() {
        let err = parse_config(Path::new("c.json"), r#"{ "loop": { "fps": 60 } }"#)
            .expect_err("unknown field");
        assert!(matches!(err, ConfigError::Json { .. }));
    }

    #[test]
    fn unreadable_file_is_a_read_error() {
        let temp = TempDir::new().expect("tempdir");
        let err = load_config(Some(&temp.path().join("missing.json"))).expect_err("missing");
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
