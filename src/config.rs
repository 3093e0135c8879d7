//! Configuration management for vanban.
//!
//! Settings are resolved in layers: built-in defaults, then a config file
//! (found by `prefer` or given with `--config`), then the `--data` flag, then
//! the `DATABASE_URL` environment variable.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::repository::DieselDbContext;

/// Default database filename.
pub const DEFAULT_DATABASE_FILENAME: &str = "vanban.db";

/// Subdirectory of the data directory holding uploaded files.
pub const UPLOADS_SUBDIR: &str = "uploads";

/// Default server bind address.
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

/// Default request body limit in megabytes.
pub const DEFAULT_MAX_UPLOAD_MB: u64 = 50;

/// Resolved runtime settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Base data directory.
    pub data_dir: PathBuf,
    /// Database filename inside `data_dir`.
    pub database_filename: String,
    /// Database URL, overriding `data_dir/database_filename` when set.
    pub database_url: Option<String>,
    /// Directory for uploaded files.
    pub uploads_dir: PathBuf,
    /// Address the web server listens on.
    pub bind: String,
    /// Largest accepted request body.
    pub max_upload_bytes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        // Documents dir -> Home dir -> Current dir
        let data_dir = dirs::document_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vanban");

        Self::with_data_dir(data_dir)
    }
}

impl Settings {
    /// Create settings rooted at a custom data directory.
    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        Self {
            uploads_dir: data_dir.join(UPLOADS_SUBDIR),
            data_dir,
            database_filename: DEFAULT_DATABASE_FILENAME.to_string(),
            database_url: None,
            bind: DEFAULT_BIND.to_string(),
            max_upload_bytes: mb_to_bytes(DEFAULT_MAX_UPLOAD_MB),
        }
    }

    /// Full path to the SQLite database file.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.database_filename)
    }

    /// Database location as handed to the connection factory.
    pub fn database_url(&self) -> String {
        self.database_url
            .clone()
            .unwrap_or_else(|| self.database_path().display().to_string())
    }

    /// Open a database context for these settings.
    pub fn create_db_context(&self) -> DieselDbContext {
        DieselDbContext::from_url(&self.database_url())
    }

    /// Create the data and uploads directories.
    pub fn ensure_directories(&self) -> std::io::Result<()> {
        for (dir, what) in [(&self.data_dir, "data"), (&self.uploads_dir, "uploads")] {
            fs::create_dir_all(dir).map_err(|e| {
                std::io::Error::new(
                    e.kind(),
                    format!("Failed to create {} directory '{}': {}", what, dir.display(), e),
                )
            })?;
        }
        Ok(())
    }
}

fn mb_to_bytes(mb: u64) -> usize {
    usize::try_from(mb.saturating_mul(1024 * 1024)).unwrap_or(usize::MAX)
}

/// Configuration file contents. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Data directory (relative paths resolve against the config file).
    pub data_dir: Option<String>,
    /// Database filename inside the data directory.
    pub database: Option<String>,
    /// Uploads directory. Defaults to `{data_dir}/uploads`.
    pub uploads_dir: Option<String>,
    /// Server bind address (`PORT`, `HOST` or `HOST:PORT`).
    pub bind: Option<String>,
    /// Request body limit in megabytes.
    pub max_upload_mb: Option<u64>,

    /// Where this config was loaded from.
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Discover and load the config file, falling back to defaults.
    pub async fn load() -> Self {
        match prefer::load("vanban").await {
            Ok(pref_config) => match pref_config.source_path() {
                Some(path) => Self::load_from_path(path).await.unwrap_or_else(|e| {
                    tracing::warn!("{}", e);
                    Self::default()
                }),
                None => Self::default(),
            },
            Err(_) => Self::default(),
        }
    }

    /// Load configuration from a specific file, parsed by its extension.
    pub async fn load_from_path(path: &Path) -> Result<Self, String> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

        let mut config: Config = match ext {
            "toml" => toml::from_str(&contents)
                .map_err(|e| format!("Failed to parse TOML config: {}", e))?,
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .map_err(|e| format!("Failed to parse YAML config: {}", e))?,
            _ => serde_json::from_str(&contents)
                .map_err(|e| format!("Failed to parse JSON config: {}", e))?,
        };

        config.source_path = Some(path.to_path_buf());
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Directory of the config file, if one was loaded.
    pub fn base_dir(&self) -> Option<PathBuf> {
        self.source_path
            .as_ref()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    /// Expand `~` and resolve relative paths against `base_dir`.
    pub fn resolve_path(&self, path_str: &str, base_dir: &Path) -> PathBuf {
        let expanded = shellexpand::tilde(path_str);
        let path = Path::new(expanded.as_ref());

        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        }
    }

    /// Apply configuration to settings.
    pub fn apply_to_settings(&self, settings: &mut Settings, base_dir: &Path) {
        if let Some(ref data_dir) = self.data_dir {
            settings.data_dir = self.resolve_path(data_dir, base_dir);
            settings.uploads_dir = settings.data_dir.join(UPLOADS_SUBDIR);
        }
        if let Some(ref database) = self.database {
            settings.database_filename = database.clone();
        }
        if let Some(ref uploads_dir) = self.uploads_dir {
            settings.uploads_dir = self.resolve_path(uploads_dir, base_dir);
        }
        if let Some(ref bind) = self.bind {
            settings.bind = bind.clone();
        }
        if let Some(mb) = self.max_upload_mb {
            settings.max_upload_bytes = mb_to_bytes(mb);
        }
    }
}

/// Options for loading settings.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit config file path (overrides auto-discovery).
    pub config_path: Option<PathBuf>,
    /// Data directory or database file (`--data` flag).
    pub data: Option<PathBuf>,
}

/// Split a `--data` value into a data directory and, if it names a database
/// file directly, that file's name.
fn resolve_data_path(path: &Path) -> (PathBuf, Option<String>) {
    let path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };

    let is_db_file = path
        .extension()
        .is_some_and(|ext| ext == "db" || ext == "sqlite" || ext == "sqlite3");

    if is_db_file {
        let filename = path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned());
        let dir = path.parent().unwrap_or(Path::new(".")).to_path_buf();
        (dir, filename)
    } else {
        (path, None)
    }
}

/// Load settings with explicit options.
pub async fn load_settings_with_options(options: LoadOptions) -> (Settings, Config) {
    let config = match options.config_path {
        Some(ref path) => Config::load_from_path(path).await.unwrap_or_else(|e| {
            tracing::warn!("{}", e);
            Config::default()
        }),
        None => Config::load().await,
    };

    let mut settings = Settings::default();
    let base_dir = config
        .base_dir()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
    config.apply_to_settings(&mut settings, &base_dir);

    // --data takes precedence over the config file
    if let Some(ref data) = options.data {
        let (data_dir, database_filename) = resolve_data_path(data);
        settings.data_dir = data_dir;
        if config.uploads_dir.is_none() {
            settings.uploads_dir = settings.data_dir.join(UPLOADS_SUBDIR);
        }
        if let Some(filename) = database_filename {
            settings.database_filename = filename;
        }
    }

    // DATABASE_URL takes highest precedence
    if let Some(database_url) = std::env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()) {
        tracing::debug!("Using DATABASE_URL from environment: {}", database_url);
        settings.database_url = Some(database_url);
    }

    (settings, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_layout() {
        let settings = Settings::with_data_dir(PathBuf::from("/srv/vanban"));
        assert_eq!(settings.uploads_dir, PathBuf::from("/srv/vanban/uploads"));
        assert_eq!(settings.database_path(), PathBuf::from("/srv/vanban/vanban.db"));
        assert_eq!(settings.database_url(), "/srv/vanban/vanban.db");
        assert_eq!(settings.bind, DEFAULT_BIND);
        assert_eq!(settings.max_upload_bytes, 50 * 1024 * 1024);
    }

    #[test]
    fn test_database_url_override() {
        let mut settings = Settings::with_data_dir(PathBuf::from("/srv/vanban"));
        settings.database_url = Some("sqlite:/tmp/other.db".to_string());
        assert_eq!(settings.database_url(), "sqlite:/tmp/other.db");
    }

    #[test]
    fn test_apply_relative_paths() {
        let config = Config {
            data_dir: Some("data".to_string()),
            database: Some("register.db".to_string()),
            bind: Some("8080".to_string()),
            max_upload_mb: Some(2),
            ..Default::default()
        };

        let mut settings = Settings::default();
        config.apply_to_settings(&mut settings, Path::new("/etc/vanban"));

        assert_eq!(settings.data_dir, PathBuf::from("/etc/vanban/data"));
        assert_eq!(settings.uploads_dir, PathBuf::from("/etc/vanban/data/uploads"));
        assert_eq!(settings.database_filename, "register.db");
        assert_eq!(settings.bind, "8080");
        assert_eq!(settings.max_upload_bytes, 2 * 1024 * 1024);
    }

    #[test]
    fn test_explicit_uploads_dir() {
        let config = Config {
            data_dir: Some("/var/lib/vanban".to_string()),
            uploads_dir: Some("/srv/files".to_string()),
            ..Default::default()
        };

        let mut settings = Settings::default();
        config.apply_to_settings(&mut settings, Path::new("/"));
        assert_eq!(settings.uploads_dir, PathBuf::from("/srv/files"));
    }

    #[test]
    fn test_resolve_data_path() {
        let (dir, file) = resolve_data_path(Path::new("/srv/vanban/archive.sqlite"));
        assert_eq!(dir, PathBuf::from("/srv/vanban"));
        assert_eq!(file.as_deref(), Some("archive.sqlite"));

        let (dir, file) = resolve_data_path(Path::new("/srv/vanban"));
        assert_eq!(dir, PathBuf::from("/srv/vanban"));
        assert!(file.is_none());
    }

    #[tokio::test]
    async fn test_load_from_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("vanban.toml");
        std::fs::write(&path, "data_dir = \"store\"\nmax_upload_mb = 10\n").unwrap();

        let config = Config::load_from_path(&path).await.unwrap();
        assert_eq!(config.data_dir.as_deref(), Some("store"));
        assert_eq!(config.max_upload_mb, Some(10));
        assert_eq!(config.base_dir(), Some(dir.path().to_path_buf()));
    }

    #[tokio::test]
    async fn test_load_from_yaml_and_json() {
        let dir = tempdir().unwrap();

        let yaml = dir.path().join("vanban.yaml");
        std::fs::write(&yaml, "bind: \"0.0.0.0:8000\"\n").unwrap();
        let config = Config::load_from_path(&yaml).await.unwrap();
        assert_eq!(config.bind.as_deref(), Some("0.0.0.0:8000"));

        let json = dir.path().join("vanban.json");
        std::fs::write(&json, r#"{"database": "x.db"}"#).unwrap();
        let config = Config::load_from_path(&json).await.unwrap();
        assert_eq!(config.database.as_deref(), Some("x.db"));
    }

    #[tokio::test]
    async fn test_load_from_path_rejects_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("vanban.toml");
        std::fs::write(&path, "data_dir = [").unwrap();
        assert!(Config::load_from_path(&path).await.is_err());
    }

    #[test]
    fn test_ensure_directories() {
        let dir = tempdir().unwrap();
        let settings = Settings::with_data_dir(dir.path().join("data"));
        settings.ensure_directories().unwrap();
        assert!(settings.uploads_dir.is_dir());
    }
}
