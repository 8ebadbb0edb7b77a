// SPDX-License-Identifier: MPL-2.0
//! This module handles the application's configuration, including loading and
//! saving settings from a `settings.toml` file.
//!
//! The configuration is built once at startup and handed into the pipeline
//! by reference; nothing below `main` reads ambient state. Sections map to
//! the subsystems that consume them: provider credentials and models, edit
//! pipeline tuning, translation, and upload normalization.
//!
//! # Examples
//!
//! ```no_run
//! use lasso_patch::config::{self, Config};
//!
//! // Load existing configuration
//! let mut config = config::load().unwrap_or_default();
//!
//! // Modify a setting
//! config.edit.strength = 0.9;
//!
//! // Save the modified configuration
//! config::save(&config).expect("Failed to save config");
//! ```

pub mod defaults;

use crate::application::edit::EditStrategy;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "settings.toml";
const APP_NAME: &str = "LassoPatch";

// ==========================================================================
// OutputFormat
// ==========================================================================

/// Encoding requested for provider output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Lossless with alpha; the compositor needs both.
    #[default]
    Png,
    Webp,
    Jpeg,
}

impl OutputFormat {
    /// Wire name used in provider payloads.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Png => "PNG",
            OutputFormat::Webp => "WEBP",
            OutputFormat::Jpeg => "JPEG",
        }
    }

    /// MIME type of rasters encoded in this format.
    #[must_use]
    pub fn mime(self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
            OutputFormat::Webp => "image/webp",
            OutputFormat::Jpeg => "image/jpeg",
        }
    }
}

// ==========================================================================
// Sections
// ==========================================================================

/// Generation provider credentials and model selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Bearer key for the generation API. Empty means unconfigured.
    pub api_key: String,
    /// Task endpoint URL.
    pub endpoint: String,
    /// Model for text-to-image generation.
    pub model: String,
    /// Model pinned for masked inpainting; `None` applies the default
    /// text-to-fill swap.
    pub inpaint_model: Option<String>,
    /// Negative prompt sent with non-strict inferences.
    pub negative_prompt: String,
    /// Classifier-free guidance scale.
    pub cfg_scale: f32,
    /// Diffusion step count.
    pub steps: u32,
    /// Encoding requested for provider output.
    pub output_format: OutputFormat,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: defaults::DEFAULT_ENDPOINT.to_string(),
            model: defaults::DEFAULT_MODEL.to_string(),
            inpaint_model: None,
            negative_prompt: defaults::DEFAULT_NEGATIVE_PROMPT.to_string(),
            cfg_scale: defaults::DEFAULT_CFG_SCALE,
            steps: defaults::DEFAULT_STEPS,
            output_format: OutputFormat::default(),
        }
    }
}

/// Edit pipeline tuning. Raw values are clamped into their domain ranges
/// when options are built from the config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditConfig {
    /// How provider calls are arranged; see
    /// [`EditStrategy`](crate::application::edit::EditStrategy).
    pub strategy: EditStrategy,
    /// Generation strength in [0, 1].
    pub strength: f32,
    /// Mask stroke dilation in pixels.
    pub dilation: f32,
    /// Mask feather radius in pixels.
    pub feather: u32,
    /// Edits everything outside the selection instead.
    pub invert_mask: bool,
    /// Color-matches the patch against the surrounding original.
    pub color_match: bool,
    /// Synthesizes a contact shadow beneath the patch.
    pub shadow: bool,
}

impl Default for EditConfig {
    fn default() -> Self {
        Self {
            strategy: EditStrategy::default(),
            strength: defaults::DEFAULT_STRENGTH,
            dilation: defaults::DEFAULT_DILATION,
            feather: defaults::DEFAULT_FEATHER,
            invert_mask: false,
            color_match: true,
            shadow: false,
        }
    }
}

/// Instruction translation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslateConfig {
    /// Routes instructions through the translator before prompt assembly.
    pub enabled: bool,
    /// Translation endpoint URL.
    pub endpoint: String,
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: defaults::DEFAULT_TRANSLATE_ENDPOINT.to_string(),
        }
    }
}

/// Upload normalization settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Longest side an incoming image is scaled down to.
    pub max_dimension: u32,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_dimension: defaults::DEFAULT_MAX_DIMENSION,
        }
    }
}

// ==========================================================================
// Config
// ==========================================================================

/// Complete application configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub provider: ProviderConfig,
    pub edit: EditConfig,
    pub translate: TranslateConfig,
    pub upload: UploadConfig,
}

fn get_default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path.push(CONFIG_FILE);
        path
    })
}

/// Loads the configuration from the default location, falling back to
/// defaults when no file exists.
///
/// # Errors
///
/// Returns an error when the file exists but cannot be read.
pub fn load() -> Result<Config> {
    if let Some(path) = get_default_config_path() {
        if path.exists() {
            return load_from_path(&path);
        }
    }
    Ok(Config::default())
}

/// Saves the configuration to the default location.
///
/// # Errors
///
/// Returns an error when the file cannot be written.
pub fn save(config: &Config) -> Result<()> {
    if let Some(path) = get_default_config_path() {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Loads the configuration from a specific path. Unparseable content
/// falls back to defaults rather than failing startup.
///
/// # Errors
///
/// Returns an error when the file cannot be read.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content).unwrap_or_default())
}

/// Saves the configuration to a specific path, creating parent
/// directories as needed.
///
/// # Errors
///
/// Returns an error when serialization or writing fails.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}
