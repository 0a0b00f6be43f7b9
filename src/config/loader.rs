//! Configuration loading and discovery for `lumptex.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::LumptexConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file searched for.
pub const CONFIG_FILE_NAME: &str = "lumptex.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse lumptex.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override resource directory
    pub dir: Option<PathBuf>,
    /// Override output directory
    pub out: Option<PathBuf>,
    /// Override scale factor
    pub scale: Option<u8>,
    /// Override palette resource
    pub palette: Option<String>,
    /// Override mask transparency
    pub transparent: Option<bool>,
}

/// A loaded configuration plus the directory relative paths resolve against.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: LumptexConfig,
    pub root: PathBuf,
}

impl LoadedConfig {
    /// Resource directory, resolved against the config root.
    pub fn resource_dir(&self) -> PathBuf {
        resolve_path(&self.root, &self.config.resources.dir)
    }

    /// Output directory, resolved against the config root.
    pub fn output_dir(&self) -> PathBuf {
        resolve_path(&self.root, &self.config.output.dir)
    }
}

/// Find lumptex.toml by walking up from the current working directory.
pub fn find_config() -> Option<PathBuf> {
    let cwd = env::current_dir().ok()?;
    find_config_from(cwd)
}

/// Find lumptex.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from a lumptex.toml file.
///
/// If a path is provided, loads from that file. Otherwise, uses `find_config()`
/// to locate the config file. If no config file is found, returns the default
/// configuration rooted at the current directory.
pub fn load_config(path: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => {
            let config = load_config_file(&p)?;
            let root = project_root(&p)
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
            Ok(LoadedConfig { config, root })
        }
        None => Ok(LoadedConfig {
            config: LumptexConfig::default(),
            root: PathBuf::from("."),
        }),
    }
}

/// Load configuration from a specific file path.
fn load_config_file(path: &Path) -> Result<LumptexConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: LumptexConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    Ok(config)
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values.
pub fn merge_cli_overrides(config: &mut LumptexConfig, overrides: &CliOverrides) {
    if let Some(ref dir) = overrides.dir {
        config.resources.dir = dir.clone();
    }
    if let Some(ref out) = overrides.out {
        config.output.dir = out.clone();
    }
    if let Some(scale) = overrides.scale {
        config.output.scale = scale;
    }
    if let Some(ref palette) = overrides.palette {
        config.output.palette = Some(palette.clone());
    }
    if let Some(transparent) = overrides.transparent {
        config.output.transparent = transparent;
    }
}

/// Get the project root directory from a config file path.
pub fn project_root(config_path: &Path) -> Option<&Path> {
    config_path.parent()
}

/// Resolve a path relative to the project root.
///
/// If the path is absolute, returns it unchanged.
/// If relative, joins it with the project root.
pub fn resolve_path(project_root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_root.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_config(dir: &Path, contents: &str) -> PathBuf {
        let config_path = dir.join(CONFIG_FILE_NAME);
        File::create(&config_path)
            .expect("should create config file")
            .write_all(contents.as_bytes())
            .expect("should write config content");
        config_path
    }

    #[test]
    fn test_find_config_in_current_dir() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), "");
        let found = find_config_from(temp.path().to_path_buf());
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_in_parent_dir() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), "");
        let subdir = temp.path().join("maps").join("e1");
        fs::create_dir_all(&subdir).expect("should create subdirectories");

        let found = find_config_from(subdir);
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_load_config_resolves_paths() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), "[resources]\ndir = \"wad\"\n");

        let loaded = load_config(Some(&config_path)).expect("should load config");
        assert_eq!(loaded.resource_dir(), temp.path().join("wad"));
        assert_eq!(loaded.output_dir(), temp.path().join("build"));
    }

    #[test]
    fn test_load_config_parse_error() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), "[output\nscale = ");
        let err = load_config(Some(&config_path)).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_config_validation_error() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), "[output]\nscale = 40\n");
        let err = load_config(Some(&config_path)).unwrap_err();
        assert!(err.to_string().contains("output.scale"));
    }

    #[test]
    fn test_merge_cli_overrides() {
        let mut config = LumptexConfig::default();
        let overrides = CliOverrides {
            out: Some(PathBuf::from("dist")),
            scale: Some(3),
            transparent: Some(false),
            ..Default::default()
        };
        merge_cli_overrides(&mut config, &overrides);
        assert_eq!(config.output.dir, PathBuf::from("dist"));
        assert_eq!(config.output.scale, 3);
        assert!(!config.output.transparent);
        assert_eq!(config.resources.dir, PathBuf::from("lumps"));
    }

    #[test]
    fn test_resolve_path() {
        assert_eq!(
            resolve_path(Path::new("/proj"), Path::new("lumps")),
            PathBuf::from("/proj/lumps")
        );
        assert_eq!(
            resolve_path(Path::new("/proj"), Path::new("/abs")),
            PathBuf::from("/abs")
        );
    }
}
