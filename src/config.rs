//! Startup settings.
//!
//! Loaded once from `inbox-clusters.toml` in the working directory (or the
//! path in `INBOX_CLUSTERS_CONFIG`). A missing file means defaults and the
//! built-in cluster templates.

use crate::cluster::template::ClusterTemplate;
use crate::cluster::TemplateSet;
use crate::error::AppError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const ENV_CONFIG_PATH: &str = "INBOX_CLUSTERS_CONFIG";
pub const DEFAULT_CONFIG_FILENAME: &str = "inbox-clusters.toml";

#[derive(Debug, Deserialize)]
struct RawSettings {
    #[serde(default = "default_folder")]
    folder: String,
    #[serde(default = "default_fetch_limit")]
    fetch_limit: u32,
    #[serde(default = "default_snippet_len")]
    snippet_len: usize,
    /// Replaces the built-in table when present. Order matters: the first
    /// template catches messages nothing else matches.
    #[serde(default)]
    templates: Option<Vec<ClusterTemplate>>,
}

fn default_folder() -> String {
    "INBOX".to_string()
}

fn default_fetch_limit() -> u32 {
    200
}

fn default_snippet_len() -> usize {
    200
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub folder: String,
    pub fetch_limit: u32,
    pub snippet_len: usize,
    pub templates: TemplateSet,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            folder: default_folder(),
            fetch_limit: default_fetch_limit(),
            snippet_len: default_snippet_len(),
            templates: TemplateSet::builtin(),
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self, AppError> {
        let path = resolve_config_path();
        if !path.exists() {
            tracing::info!(path = %path.display(), "Config not found, using defaults");
            return Ok(Self::default());
        }
        Self::load_from_path(&path)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, AppError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let settings = Self::parse(&contents)?;
        tracing::info!(
            path = %path.display(),
            templates = settings.templates.len(),
            "Loaded config"
        );
        Ok(settings)
    }

    pub fn parse(contents: &str) -> Result<Self, AppError> {
        let raw: RawSettings = toml::from_str(contents)?;

        if raw.fetch_limit == 0 {
            return Err(AppError::Config("fetch_limit must be at least 1".to_string()));
        }

        let templates = match raw.templates {
            Some(list) => TemplateSet::new(list)?,
            None => TemplateSet::builtin(),
        };

        Ok(Self {
            folder: raw.folder,
            fetch_limit: raw.fetch_limit,
            snippet_len: raw.snippet_len,
            templates,
        })
    }
}

fn resolve_config_path() -> PathBuf {
    std::env::var(ENV_CONFIG_PATH)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILENAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn empty_file_gives_defaults() {
        let settings = Settings::parse("").unwrap();
        assert_eq!(settings.folder, "INBOX");
        assert_eq!(settings.fetch_limit, 200);
        assert_eq!(settings.snippet_len, 200);
        assert_eq!(settings.templates, TemplateSet::builtin());
    }

    #[test]
    fn custom_templates_replace_builtin() {
        let settings = Settings::parse(
            r#"
            folder = "Archive/2025"
            fetch_limit = 50

            [[templates]]
            name = "Everything Else"

            [[templates]]
            name = "Travel"
            description = "Flights and hotels"
            color = "teal-500"
            keywords = ["Flight", "boarding"]
            sender_patterns = ["airline"]
            "#,
        )
        .unwrap();

        assert_eq!(settings.folder, "Archive/2025");
        assert_eq!(settings.fetch_limit, 50);
        assert_eq!(settings.templates.len(), 2);
        assert_eq!(settings.templates.default_template().name, "Everything Else");
        let travel = settings.templates.get("Travel").unwrap();
        assert_eq!(travel.keywords, vec!["flight", "boarding"]);
        assert_eq!(travel.color, "teal-500");
    }

    #[test]
    fn empty_template_array_is_invalid() {
        let err = Settings::parse("templates = []").unwrap_err();
        assert!(matches!(err, AppError::InvalidConfiguration(_)));
    }

    #[test]
    fn zero_fetch_limit_is_rejected() {
        let err = Settings::parse("fetch_limit = 0").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn malformed_toml_is_config_error() {
        let err = Settings::parse("fetch_limit = \"many\"").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "snippet_len = 80").unwrap();
        let settings = Settings::load_from_path(file.path()).unwrap();
        assert_eq!(settings.snippet_len, 80);
    }

    #[test]
    fn missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load_from_path(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
