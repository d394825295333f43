//! Dashboard configuration.
//!
//! Settings come from an optional TOML file and are then overridden by
//! command-line flags (which themselves fall back to `QUAKE_MAP_*`
//! environment variables). Every field has a default, so an empty file
//! or no file at all is valid.
//!
//! ```toml
//! data_path = "data/earthquakes.csv"
//! boundaries_path = "data/countries.geo.json"
//! map_radius = "exponential"
//! epicentre_radius = "empirical"
//! default_year = 2020
//! ```

use std::path::{Path, PathBuf};

use quake_map_charts::ImpactPresets;
use quake_map_geography::ImpactFormula;
use serde::Deserialize;
use thiserror::Error;

/// Dataset path used when neither the file nor the flags set one.
pub const DEFAULT_DATA_PATH: &str = "data/earthquakes.csv";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Resolved dashboard settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DashboardConfig {
    /// Earthquake CSV.
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,
    /// Country boundary `GeoJSON`. Maps render without boundaries when
    /// unset or unreadable.
    #[serde(default)]
    pub boundaries_path: Option<PathBuf>,
    /// Radius formula for the world map.
    #[serde(default = "default_map_radius")]
    pub map_radius: ImpactFormula,
    /// Radius formula for the epicentre view.
    #[serde(default = "default_epicentre_radius")]
    pub epicentre_radius: ImpactFormula,
    /// Year preselected by the map and time-series views.
    #[serde(default)]
    pub default_year: Option<i32>,
}

fn default_data_path() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_PATH)
}

const fn default_map_radius() -> ImpactFormula {
    ImpactFormula::Exponential
}

const fn default_epicentre_radius() -> ImpactFormula {
    ImpactFormula::Empirical
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            boundaries_path: None,
            map_radius: default_map_radius(),
            epicentre_radius: default_epicentre_radius(),
            default_year: None,
        }
    }
}

/// Values supplied on the command line. `None` keeps the configured value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub data_path: Option<PathBuf>,
    pub boundaries_path: Option<PathBuf>,
    pub map_radius: Option<ImpactFormula>,
    pub epicentre_radius: Option<ImpactFormula>,
    pub default_year: Option<i32>,
}

impl DashboardConfig {
    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the text is not valid TOML or a
    /// value has the wrong type.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::de::from_str(text)?)
    }

    /// Reads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        log::debug!("Loaded config from {}: {config:?}", path.display());
        Ok(config)
    }

    /// Reads `path` when given, otherwise returns the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if an explicitly given file cannot be read
    /// or parsed.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    /// Applies command-line overrides.
    #[must_use]
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(path) = overrides.data_path {
            self.data_path = path;
        }
        if overrides.boundaries_path.is_some() {
            self.boundaries_path = overrides.boundaries_path;
        }
        if let Some(formula) = overrides.map_radius {
            self.map_radius = formula;
        }
        if let Some(formula) = overrides.epicentre_radius {
            self.epicentre_radius = formula;
        }
        if overrides.default_year.is_some() {
            self.default_year = overrides.default_year;
        }
        self
    }

    /// Radius formulas for the dashboard context.
    #[must_use]
    pub const fn presets(&self) -> ImpactPresets {
        ImpactPresets {
            map: self.map_radius,
            epicentre: self.epicentre_radius,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = DashboardConfig::from_toml_str("").unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.data_path, PathBuf::from(DEFAULT_DATA_PATH));
        assert_eq!(config.map_radius, ImpactFormula::Exponential);
        assert_eq!(config.epicentre_radius, ImpactFormula::Empirical);
    }

    #[test]
    fn parses_every_field() {
        let config = DashboardConfig::from_toml_str(
            r#"
            data_path = "/srv/quakes.csv"
            boundaries_path = "/srv/countries.geo.json"
            map_radius = "empirical"
            epicentre_radius = "exponential"
            default_year = 2011
            "#,
        )
        .unwrap();
        assert_eq!(config.data_path, PathBuf::from("/srv/quakes.csv"));
        assert_eq!(
            config.boundaries_path,
            Some(PathBuf::from("/srv/countries.geo.json"))
        );
        assert_eq!(config.map_radius, ImpactFormula::Empirical);
        assert_eq!(config.epicentre_radius, ImpactFormula::Exponential);
        assert_eq!(config.default_year, Some(2011));
        assert_eq!(
            config.presets(),
            ImpactPresets {
                map: ImpactFormula::Empirical,
                epicentre: ImpactFormula::Exponential,
            }
        );
    }

    #[test]
    fn rejects_unknown_formula() {
        let err = DashboardConfig::from_toml_str("map_radius = \"linear\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn overrides_replace_only_given_values() {
        let config = DashboardConfig {
            default_year: Some(2015),
            ..DashboardConfig::default()
        }
        .with_overrides(ConfigOverrides {
            data_path: Some(PathBuf::from("other.csv")),
            map_radius: Some(ImpactFormula::Empirical),
            ..ConfigOverrides::default()
        });
        assert_eq!(config.data_path, PathBuf::from("other.csv"));
        assert_eq!(config.map_radius, ImpactFormula::Empirical);
        assert_eq!(config.epicentre_radius, ImpactFormula::Empirical);
        assert_eq!(config.default_year, Some(2015));
        assert_eq!(config.boundaries_path, None);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        assert!(DashboardConfig::load_or_default(None).is_ok());
        let err =
            DashboardConfig::load_or_default(Some(Path::new("/definitely/not/here.toml")))
                .unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
