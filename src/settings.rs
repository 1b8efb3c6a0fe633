use std::path::{Path, PathBuf};
use std::time::Duration;

use bevy::prelude::*;
use outliner_core::Timings;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tunables for the outliner panel. Missing fields in a settings file keep
/// their defaults.
#[derive(Resource, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlinerSettings {
    /// Quiet period after a hierarchy change before the rows are rebuilt.
    pub rebuild_delay_ms: u64,
    /// Quiet period after the last keystroke in the filter box.
    pub filter_delay_ms: u64,
    /// Wait after selecting before checking whether the row needs scrolling.
    pub scroll_delay_ms: u64,
    pub row_height: f32,
    /// Horizontal offset per depth level.
    pub indent: f32,
    /// Fraction of the remaining distance covered per frame while smooth
    /// scrolling. `1.0` jumps straight to the target.
    pub scroll_easing: f32,
}

impl Default for OutlinerSettings {
    fn default() -> Self {
        Self {
            rebuild_delay_ms: 0,
            filter_delay_ms: 100,
            scroll_delay_ms: 100,
            row_height: 24.0,
            indent: 16.0,
            scroll_easing: 0.25,
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read outliner settings from {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid outliner settings in {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl OutlinerSettings {
    pub fn timings(&self) -> Timings {
        Timings {
            rebuild: Duration::from_millis(self.rebuild_delay_ms),
            filter: Duration::from_millis(self.filter_delay_ms),
            scroll: Duration::from_millis(self.scroll_delay_ms),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Loaded outliner settings from {}", path.display());
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_json_keeps_defaults() {
        let settings = OutlinerSettings::from_json(r#"{ "filter_delay_ms": 250 }"#).unwrap();
        assert_eq!(settings.filter_delay_ms, 250);
        assert_eq!(settings.row_height, 24.0);
        assert_eq!(
            settings.timings(),
            Timings {
                rebuild: Duration::ZERO,
                filter: Duration::from_millis(250),
                scroll: Duration::from_millis(100),
            }
        );
    }

    #[test]
    fn default_timings_match_engine_defaults() {
        assert_eq!(OutlinerSettings::default().timings(), Timings::default());
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "indent": 20.0, "scroll_easing": 1.0 }}"#).unwrap();
        let settings = OutlinerSettings::load(file.path()).unwrap();
        assert_eq!(settings.indent, 20.0);
        assert_eq!(settings.scroll_easing, 1.0);
    }

    #[test]
    fn load_reports_missing_file_and_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(matches!(
            OutlinerSettings::load(&missing),
            Err(SettingsError::Read { .. })
        ));

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{ not json").unwrap();
        let err = OutlinerSettings::load(&bad).unwrap_err();
        assert!(matches!(err, SettingsError::Parse { .. }));
        assert!(err.to_string().contains("bad.json"));
    }
}
