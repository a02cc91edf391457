//! Dashboard configuration.
//!
//! Read from an optional JSON file; every field has a default so a partial
//! file (or none at all) is fine.
//!
//! ```json
//! {
//!   "data_dir": "public",
//!   "default_top_n": 15,
//!   "theme": { "primary": "#1976d2", "female": "#ef4444" }
//! }
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::views::ViewKind;

/// Colours as hex strings, resolved into a [`crate::color::Theme`] at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Single-series bar colour.
    pub primary: String,
    /// Left side of the age pyramid.
    pub male: String,
    /// Right side of the age pyramid.
    pub female: String,
    /// Pie slice colours, cycled in order.
    pub categorical: Vec<String>,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        ThemeConfig {
            primary: "#1976d2".into(),
            male: "#1976d2".into(),
            female: "#ef4444".into(),
            categorical: vec![
                "#3b82f6".into(),
                "#ef4444".into(),
                "#10b981".into(),
                "#facc15".into(),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Directory holding the view CSV files.
    pub data_dir: PathBuf,
    /// Initial top-N for ranked views; clamped to at least one.
    pub default_top_n: i64,
    pub theme: ThemeConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            data_dir: PathBuf::from("data"),
            default_top_n: 10,
            theme: ThemeConfig::default(),
        }
    }
}

impl DashboardConfig {
    /// Read a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Configuration from the command line: an optional JSON file path as the
    /// first argument. Anything else falls back to defaults.
    pub fn from_args<I>(mut args: I) -> Result<Self>
    where
        I: Iterator<Item = String>,
    {
        match args.next() {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    /// Where a view's CSV lives.
    pub fn resource_path(&self, view: ViewKind) -> PathBuf {
        self.data_dir.join(view.resource())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let cfg = DashboardConfig::default();
        assert_eq!(cfg.default_top_n, 10);
        assert_eq!(cfg.theme.categorical.len(), 4);
        assert_eq!(
            cfg.resource_path(ViewKind::AgePyramid),
            PathBuf::from("data").join("age_pyramid.csv")
        );
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r##"{{"data_dir": "public", "theme": {{"female": "#ff0000"}}}}"##).unwrap();

        let cfg = DashboardConfig::load(file.path()).unwrap();
        assert_eq!(cfg.data_dir, PathBuf::from("public"));
        assert_eq!(cfg.default_top_n, 10);
        assert_eq!(cfg.theme.female, "#ff0000");
        assert_eq!(cfg.theme.primary, "#1976d2");
    }

    #[test]
    fn test_from_args() {
        let cfg = DashboardConfig::from_args(std::iter::empty()).unwrap();
        assert_eq!(cfg, DashboardConfig::default());

        let err = DashboardConfig::from_args(["/nonexistent/config.json".to_string()].into_iter())
            .unwrap_err();
        assert!(format!("{err:#}").contains("reading config"));
    }
}
