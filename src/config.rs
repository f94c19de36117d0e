//! Loader for the `config.txt` key=value file that drives the `fetch` command.

use crate::images::{ImageOptions, ImageQuality, LACKEY_IMAGE_SIZE};
use crate::transform::{ColorSeparator, FormatOptions, ManaCase};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Output file name used when the config does not name one
pub const DEFAULT_OUTPUT_FILE: &str = "custom.txt";

/// Settings for a `fetch` run
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub output_file: String,
    pub set_codes: Vec<String>,
    pub download_images: bool,
    pub format: FormatOptions,
    pub image_quality: ImageQuality,
    pub resize_images: bool,
    pub write_bom: bool,
    pub request_delay: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_file: DEFAULT_OUTPUT_FILE.to_string(),
            set_codes: Vec::new(),
            download_images: false,
            format: FormatOptions::default(),
            image_quality: ImageQuality::Best,
            resize_images: true,
            write_bom: false,
            request_delay: Duration::from_millis(100),
        }
    }
}

impl Config {
    /// Directory of the running executable, falling back to the working directory
    pub fn executable_dir() -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// `config.txt` next to the executable
    pub fn default_path() -> PathBuf {
        Self::executable_dir().join("config.txt")
    }

    /// Load the config file. Missing or unreadable files yield defaults.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            log::warn!("config.txt not found at {}", path.display());
            log::warn!(
                "Using default values: output_file={}, set_codes=[], download_images=false",
                DEFAULT_OUTPUT_FILE
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => {
                log::debug!("Loaded config from {}", path.display());
                Self::parse(&content)
            }
            Err(e) => {
                log::error!("Error reading {}: {}", path.display(), e);
                log::warn!("Using default values");
                Self::default()
            }
        }
    }

    /// Image download settings derived from this config
    pub fn image_options(&self) -> ImageOptions {
        ImageOptions {
            quality: self.image_quality,
            resize: self.resize_images.then_some(LACKEY_IMAGE_SIZE),
            delay: self.request_delay,
        }
    }

    /// Parse config text. Unknown keys and malformed lines are ignored.
    pub fn parse(content: &str) -> Self {
        let mut config = Self::default();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            match key {
                "output_file" => config.output_file = value.to_string(),
                "set_codes" => {
                    config.set_codes = value
                        .split(',')
                        .map(str::trim)
                        .filter(|code| !code.is_empty())
                        .map(str::to_string)
                        .collect();
                }
                "download_images" => config.download_images = parse_flag(value),
                "resize_images" => config.resize_images = parse_flag(value),
                "write_bom" => config.write_bom = parse_flag(value),
                "mana_case" => match value.to_lowercase().as_str() {
                    "upper" => config.format.mana_case = ManaCase::Upper,
                    "lower" => config.format.mana_case = ManaCase::Lower,
                    other => log::warn!("Unknown mana_case '{}', keeping default", other),
                },
                "color_separator" => match value.to_lowercase().as_str() {
                    "none" | "" => config.format.color_separator = ColorSeparator::None,
                    "space" => config.format.color_separator = ColorSeparator::Space,
                    other => log::warn!("Unknown color_separator '{}', keeping default", other),
                },
                "image_quality" => match value.to_lowercase().as_str() {
                    "normal" => config.image_quality = ImageQuality::Normal,
                    "best" => config.image_quality = ImageQuality::Best,
                    other => log::warn!("Unknown image_quality '{}', keeping default", other),
                },
                "request_delay_ms" => match value.parse::<u64>() {
                    Ok(ms) => config.request_delay = Duration::from_millis(ms),
                    Err(e) => log::warn!("Invalid request_delay_ms '{}': {}", value, e),
                },
                other => log::debug!("Ignoring unknown config key: {}", other),
            }
        }

        config
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "yes" | "1")
}
