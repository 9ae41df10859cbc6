//! Metro-level settings and the per-request context handed to filters.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::schema::Schema;

/// Errors loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Installation settings that change how filters parse their arguments.
///
/// ```
/// use schemafilter::FilterSettings;
///
/// let settings = FilterSettings::from_yaml_str("multiple_cities: true").unwrap();
/// assert!(settings.multiple_cities);
/// assert_eq!(settings.default_block_radius, "8");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    /// Street filters carry a leading city slug when the metro spans
    /// several cities.
    pub multiple_cities: bool,
    /// Radius suggested when a street filter omits one.
    pub default_block_radius: String,
    /// Radii a visitor may pick (and remember in a cookie).
    pub block_radius_choices: Vec<String>,
}

impl Default for FilterSettings {
    fn default() -> Self {
        FilterSettings {
            multiple_cities: false,
            default_block_radius: "8".to_string(),
            block_radius_choices: vec!["1".to_string(), "3".to_string(), "8".to_string()],
        }
    }
}

impl FilterSettings {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SettingsError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Loads settings from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    /// The radius to suggest: the remembered choice if it is still offered,
    /// otherwise the default.
    pub fn block_radius<'a>(&'a self, remembered: Option<&'a str>) -> &'a str {
        match remembered {
            Some(radius) if self.block_radius_choices.iter().any(|c| c == radius) => radius,
            _ => &self.default_block_radius,
        }
    }
}

/// What a filter may know about the request it was parsed from.
#[derive(Debug, Clone, Copy)]
pub struct FilterRequest<'a> {
    /// Request path, used to build redirect targets.
    pub path: &'a str,
    /// The schema being filtered.
    pub schema: &'a Schema,
    pub settings: &'a FilterSettings,
    /// Block radius remembered from an earlier visit (cookie value).
    pub block_radius: Option<&'a str>,
}

impl<'a> FilterRequest<'a> {
    pub fn new(schema: &'a Schema, settings: &'a FilterSettings) -> Self {
        FilterRequest {
            path: "",
            schema,
            settings,
            block_radius: None,
        }
    }

    pub fn with_path(mut self, path: &'a str) -> Self {
        self.path = path;
        self
    }

    pub fn with_block_radius(mut self, radius: &'a str) -> Self {
        self.block_radius = Some(radius);
        self
    }

    /// Radius to suggest for a street filter that omitted one.
    pub fn suggested_radius(&self) -> &'a str {
        self.settings.block_radius(self.block_radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let settings = FilterSettings::default();
        assert!(!settings.multiple_cities);
        assert_eq!(settings.block_radius(None), "8");
    }

    #[test]
    fn remembered_radius_must_be_a_choice() {
        let settings = FilterSettings::default();
        assert_eq!(settings.block_radius(Some("3")), "3");
        assert_eq!(settings.block_radius(Some("50")), "8");
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let settings = FilterSettings::from_yaml_str("default_block_radius: '3'").unwrap();
        assert_eq!(settings.default_block_radius, "3");
        assert_eq!(settings.block_radius_choices.len(), 3);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "multiple_cities: true").unwrap();
        let settings = FilterSettings::load(file.path()).unwrap();
        assert!(settings.multiple_cities);
    }

    #[test]
    fn load_missing_file() {
        let err = FilterSettings::load("/nonexistent/settings.yaml").unwrap_err();
        assert!(matches!(err, SettingsError::Io { .. }));
    }

    #[test]
    fn request_suggests_cookie_radius() {
        let schema = Schema::new("crime", "Crime", "date");
        let settings = FilterSettings::default();
        let request = FilterRequest::new(&schema, &settings).with_block_radius("1");
        assert_eq!(request.suggested_radius(), "1");
    }
}
