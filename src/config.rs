//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\scanbook\config.toml
//! - macOS: ~/Library/Application Support/scanbook/config.toml
//! - Linux: ~/.config/scanbook/config.toml
//!
//! The config file is human-readable and editable. Every section and field
//! is optional; missing values fall back to defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::lookup::openlibrary::{self, CoverSize};
use crate::lookup::{googlebooks, http, CatalogKind};
use crate::scanner::DetectorConfig;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Catalog lookup settings
    pub catalogs: CatalogConfig,

    /// Barcode scanner settings
    pub scanner: ScannerConfig,
}

/// Catalog lookup settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Catalogs to try, in order
    pub order: Vec<CatalogKind>,

    /// Open Library API base URL
    pub open_library_url: String,

    /// Open Library covers base URL
    pub covers_url: String,

    /// Cover size for synthesized Open Library cover URLs
    pub cover_size: CoverSize,

    /// Google Books API base URL
    pub google_books_url: String,

    /// Optional Google Books API key (raises the request quota)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_books_api_key: Option<String>,

    /// Connect and request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            order: vec![CatalogKind::OpenLibrary, CatalogKind::GoogleBooks],
            open_library_url: openlibrary::DEFAULT_BASE_URL.to_string(),
            covers_url: openlibrary::DEFAULT_COVERS_URL.to_string(),
            cover_size: CoverSize::default(),
            google_books_url: googlebooks::DEFAULT_BASE_URL.to_string(),
            google_books_api_key: None,
            timeout_secs: http::DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

/// Barcode scanner settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Only accept EAN-13 codes with a 978/979 prefix
    pub strict_isbn: bool,

    /// Also accept EAN-8 codes (ignored in strict mode)
    pub accept_ean8: bool,

    /// Reject codes whose ISBN-13 check digit is wrong (strict mode only)
    pub verify_checksum: bool,

    /// Ring the terminal bell on each new detection
    pub beep: bool,

    /// Delay between frames when replaying a recorded scan
    pub frame_interval_ms: u64,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            strict_isbn: true,
            accept_ean8: false,
            verify_checksum: false,
            beep: true,
            frame_interval_ms: 33,
        }
    }
}

impl ScannerConfig {
    /// Detector settings derived from this section
    pub fn detector(&self) -> DetectorConfig {
        DetectorConfig {
            strict_isbn: self.strict_isbn,
            accept_ean8: self.accept_ean8,
            verify_checksum: self.verify_checksum,
        }
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("scanbook"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from the default location
///
/// Returns default config if file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };
    load_from(&path)
}

/// Load configuration from a specific file, falling back to defaults
pub fn load_from(path: &Path) -> Config {
    if !path.exists() {
        tracing::info!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                tracing::warn!("Using default configuration");
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

/// Save configuration to the default location
///
/// Creates the config directory if it doesn't exist.
pub fn save(config: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path().ok_or(ConfigError::NoConfigDir)?;
    save_to(config, &path)?;
    Ok(path)
}

/// Save configuration to a specific file
pub fn save_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;
    }

    // Serialize to pretty TOML
    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| ConfigError::Rename(temp_path, path.to_path_buf(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("[catalogs]"));
        assert!(toml.contains("[scanner]"));
        assert!(toml.contains("open-library"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let toml = r#"
[catalogs]
order = ["google-books"]
cover_size = "medium"

[scanner]
strict_isbn = false
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.catalogs.order, vec![CatalogKind::GoogleBooks]);
        assert_eq!(config.catalogs.cover_size, CoverSize::Medium);
        assert!(!config.scanner.strict_isbn);

        // Other fields use defaults
        assert_eq!(config.catalogs.timeout_secs, 15);
        assert_eq!(config.catalogs.open_library_url, "https://openlibrary.org");
        assert!(config.scanner.beep);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.catalogs.google_books_api_key = Some("test-key-123".to_string());
        config.scanner.accept_ean8 = true;

        save_to(&config, &path).unwrap();
        let loaded = load_from(&path);

        assert_eq!(loaded, config);
        assert!(!path.with_extension("toml.tmp").exists());
    }

    #[test]
    fn test_broken_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "this is = = not toml").unwrap();

        assert_eq!(load_from(&path), Config::default());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_from(&dir.path().join("absent.toml")), Config::default());
    }

    #[test]
    fn test_detector_settings() {
        let scanner = ScannerConfig {
            verify_checksum: true,
            ..Default::default()
        };
        let detector = scanner.detector();
        assert!(detector.strict_isbn);
        assert!(detector.verify_checksum);
        assert!(!detector.accept_ean8);
    }
}
