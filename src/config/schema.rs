//! Configuration schema types for `lumptex.toml`
//!
//! Defines the structure and validation rules for decoding configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::composite::TextureSpec;
use crate::texture::{MAX_TEXTURE_HEIGHT, MAX_TEXTURE_WIDTH};

/// Where raw resources are read from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourcesConfig {
    /// Directory of raw resource files
    #[serde(default = "default_resource_dir")]
    pub dir: PathBuf,
}

impl Default for ResourcesConfig {
    fn default() -> Self {
        Self {
            dir: default_resource_dir(),
        }
    }
}

fn default_resource_dir() -> PathBuf {
    PathBuf::from("lumps")
}

/// PNG export settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output directory
    #[serde(default = "default_out")]
    pub dir: PathBuf,
    /// Integer upscale factor
    #[serde(default = "default_scale")]
    pub scale: u8,
    /// Write the mask color as fully transparent
    #[serde(default = "default_transparent")]
    pub transparent: bool,
    /// Palette resource name; grayscale when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub palette: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_out(),
            scale: default_scale(),
            transparent: default_transparent(),
            palette: None,
        }
    }
}

fn default_out() -> PathBuf {
    PathBuf::from("build")
}

fn default_scale() -> u8 {
    1
}

fn default_transparent() -> bool {
    true
}

/// Complete `lumptex.toml` configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LumptexConfig {
    #[serde(default)]
    pub resources: ResourcesConfig,
    #[serde(default)]
    pub output: OutputConfig,
    /// Composite texture definitions by name
    #[serde(default)]
    pub textures: BTreeMap<String, TextureSpec>,
}

/// Configuration validation error
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "textures.STARTAN3.width")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "lumptex.toml: '{}' {}", self.field, self.message)
    }
}

impl LumptexConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        if self.resources.dir.as_os_str().is_empty() {
            errors.push(ConfigValidationError {
                field: "resources.dir".to_string(),
                message: "must be a non-empty path".to_string(),
            });
        }

        if self.output.scale == 0 || self.output.scale > 16 {
            errors.push(ConfigValidationError {
                field: "output.scale".to_string(),
                message: "must be between 1 and 16".to_string(),
            });
        }

        for (name, texture) in &self.textures {
            if texture.width == 0 || texture.height == 0 {
                errors.push(ConfigValidationError {
                    field: format!("textures.{}", name),
                    message: "dimensions must be positive".to_string(),
                });
            }
            if texture.width > MAX_TEXTURE_WIDTH {
                errors.push(ConfigValidationError {
                    field: format!("textures.{}.width", name),
                    message: format!("must be at most {}", MAX_TEXTURE_WIDTH),
                });
            }
            if texture.height > MAX_TEXTURE_HEIGHT {
                errors.push(ConfigValidationError {
                    field: format!("textures.{}.height", name),
                    message: format!("must be at most {}", MAX_TEXTURE_HEIGHT),
                });
            }
        }

        errors
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}
