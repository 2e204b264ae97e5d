//! weekgrid settings.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::drag::Rect;
use crate::error::{WeekGridError, WeekGridResult};
use crate::layout::GridMetrics;

static FALLBACK_DATA_DIR: &str = "~/.weekgrid";

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("weekgrid"))
        .unwrap_or_else(|| PathBuf::from(FALLBACK_DATA_DIR))
}

/// Settings at ~/.config/weekgrid/config.toml
///
/// Every field can be overridden from the environment, e.g.
/// `WEEKGRID_DATA_DIR` or `WEEKGRID_GRID__HEADER_HEIGHT`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Where event entries are stored
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default)]
    pub grid: GridMetrics,

    /// Drop target for deleting events
    #[serde(default)]
    pub trash: Rect,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            data_dir: default_data_dir(),
            grid: GridMetrics::default(),
            trash: Rect::default(),
        }
    }
}

impl Settings {
    pub fn config_path() -> WeekGridResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| WeekGridError::Config("Could not determine config directory".into()))?
            .join("weekgrid");

        Ok(config_dir.join("config.toml"))
    }

    /// Load settings from `path`, or from the default location when `None`.
    /// The default file is created with commented-out defaults on first use.
    pub fn load(path: Option<&Path>) -> WeekGridResult<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default_path = Self::config_path()?;
                if !default_path.exists() {
                    Self::create_default_config(&default_path)?;
                }
                default_path
            }
        };

        tracing::debug!(path = %config_path.display(), "loading settings");

        let settings: Settings = Config::builder()
            .add_source(File::from(config_path).required(path.is_some()))
            .add_source(
                Environment::with_prefix("WEEKGRID")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| WeekGridError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| WeekGridError::Config(e.to_string()))?;

        settings.grid.validate()?;
        Ok(settings)
    }

    /// `data_dir` with a leading `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.data_dir.to_string_lossy()).into_owned();
        PathBuf::from(full_path_str)
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> WeekGridResult<()> {
        let defaults = Settings::default();
        let contents = format!(
            "\
# weekgrid configuration

# Where events are stored:
# data_dir = \"{data_dir}\"

# [grid]
# first_hour = {first_hour}
# hour_count = {hour_count}
# pixels_per_minute = {ppm}
# block_inset = {inset}
# header_height = {header}

# Drop events here to delete them:
# [trash]
# left = {left}
# top = {top}
# right = {right}
# bottom = {bottom}
",
            data_dir = defaults.data_dir.display(),
            first_hour = defaults.grid.first_hour,
            hour_count = defaults.grid.hour_count,
            ppm = defaults.grid.pixels_per_minute,
            inset = defaults.grid.block_inset,
            header = defaults.grid.header_height,
            left = defaults.trash.left,
            top = defaults.trash.top,
            right = defaults.trash.right,
            bottom = defaults.trash.bottom,
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                WeekGridError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| WeekGridError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
data_dir = "/tmp/weekgrid-events"

[grid]
header_height = 32
pixels_per_minute = 2

[trash]
left = 10
top = 20
right = 30
bottom = 40
"#,
        )
        .unwrap();

        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.data_dir, PathBuf::from("/tmp/weekgrid-events"));
        assert_eq!(settings.grid.header_height, 32);
        assert_eq!(settings.grid.pixels_per_minute, 2);
        assert_eq!(settings.grid.first_hour, 6);
        assert_eq!(
            settings.trash,
            Rect {
                left: 10,
                top: 20,
                right: 30,
                bottom: 40
            }
        );
    }

    #[test]
    fn test_load_rejects_invalid_grid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[grid]\nfirst_hour = 20\nhour_count = 8\n").unwrap();

        assert!(matches!(
            Settings::load(Some(&path)),
            Err(WeekGridError::Config(_))
        ));
    }

    #[test]
    fn test_default_config_is_all_comments() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/config.toml");

        Settings::create_default_config(&path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(
            content
                .lines()
                .all(|line| line.is_empty() || line.starts_with('#'))
        );

        // Commented defaults parse as an empty file
        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.grid, GridMetrics::default());
    }

    #[test]
    fn test_load_rejects_oversized_grid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[grid]\nfirst_hour = 6\nhour_count = 4294967295\n").unwrap();

        assert!(matches!(
            Settings::load(Some(&path)),
            Err(WeekGridError::Config(_))
        ));
    }

    #[test]
    fn test_data_path_expands_tilde() {
        let settings = Settings {
            data_dir: PathBuf::from("~/events"),
            ..Settings::default()
        };
        assert!(!settings.data_path().to_string_lossy().starts_with('~'));
    }
}
