//! Tunable engine settings with RON persistence.
//!
//! [`InputSettings`] is serializable so games can ship a user-editable
//! config file; loading falls back to defaults on a missing or malformed
//! file, logging a warning either way.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

/// Engine-wide tunables.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct InputSettings {
    /// How often (seconds) the connected-gamepad list is re-enumerated.
    /// Button/axis state still refreshes every tick.
    pub gamepad_recheck_seconds: f32,
    /// Deadzone threshold for analog sticks; values below it read as zero and
    /// the remaining range is rescaled to `[0, 1]`.
    pub stick_deadzone: f32,
    /// Pixel-delta scroll events are normalized at this many pixels per line.
    pub scroll_pixels_per_line: f32,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            gamepad_recheck_seconds: 15.0,
            stick_deadzone: 0.15,
            scroll_pixels_per_line: 40.0,
        }
    }
}

impl InputSettings {
    /// The gamepad re-enumeration interval in whole milliseconds.
    #[must_use]
    pub fn gamepad_recheck_ms(&self) -> u64 {
        (self.gamepad_recheck_seconds.max(0.0) * 1000.0) as u64
    }

    /// Saves the settings as RON at `path`, creating parent directories.
    ///
    /// # Errors
    /// Returns an error if serialization or file writing fails.
    pub fn save(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let ron_str = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        std::fs::write(path, ron_str)?;
        Ok(())
    }

    /// Loads settings from a RON file at `path`.
    ///
    /// Falls back to [`InputSettings::default`] if the file is missing or
    /// malformed, logging a warning in either case.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match ron::from_str(&contents) {
                Ok(settings) => settings,
                Err(e) => {
                    warn!(
                        "Malformed input settings file {}: {e}; using defaults",
                        path.display()
                    );
                    Self::default()
                }
            },
            Err(e) => {
                warn!(
                    "Could not read input settings file {}: {e}; using defaults",
                    path.display()
                );
                Self::default()
            }
        }
    }

    /// Returns the platform config path for `input.ron`.
    #[must_use]
    pub fn default_config_path() -> Option<std::path::PathBuf> {
        dirs::config_dir().map(|d| d.join("comet").join("input.ron"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = InputSettings::default();
        assert_eq!(settings.gamepad_recheck_ms(), 15_000);
        assert!((settings.stick_deadzone - 0.15).abs() < f32::EPSILON);
    }

    #[test]
    fn test_round_trip_through_ron_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("input.ron");

        let settings = InputSettings {
            gamepad_recheck_seconds: 5.0,
            ..InputSettings::default()
        };
        settings.save(&path).expect("save");

        let loaded = InputSettings::load(&path);
        assert_eq!(loaded.gamepad_recheck_ms(), 5_000);
    }

    #[test]
    fn test_malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("input.ron");
        std::fs::write(&path, "not valid ron {{{").unwrap();

        let loaded = InputSettings::load(&path);
        assert_eq!(loaded.gamepad_recheck_ms(), 15_000);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let loaded = InputSettings::load(Path::new("/tmp/comet_nonexistent_7391/input.ron"));
        assert_eq!(loaded.gamepad_recheck_ms(), 15_000);
    }
}
