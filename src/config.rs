use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::core::{MatchingConfig, DEFAULT_TOP_N};
use crate::models::{FillPolicy, OrdinalScale};
use crate::services::{images::DEFAULT_IMAGE_BASE_URL, LoaderOptions};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 8080 }

/// Where the catalog tables live and how they are laid out
#[derive(Debug, Clone, Deserialize)]
pub struct DataSettings {
    #[serde(default = "default_breed_traits_path")]
    pub breed_traits_path: PathBuf,
    #[serde(default = "default_trait_descriptions_path")]
    pub trait_descriptions_path: PathBuf,
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    #[serde(default = "default_breed_column")]
    pub breed_column: String,
    #[serde(default = "default_image_column")]
    pub image_column: Option<String>,
    #[serde(default = "default_skip_columns")]
    pub skip_columns: Vec<String>,
    #[serde(default)]
    pub missing_values: FillPolicy,
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            breed_traits_path: default_breed_traits_path(),
            trait_descriptions_path: default_trait_descriptions_path(),
            delimiter: default_delimiter(),
            breed_column: default_breed_column(),
            image_column: default_image_column(),
            skip_columns: default_skip_columns(),
            missing_values: FillPolicy::default(),
            image_base_url: default_image_base_url(),
        }
    }
}

impl DataSettings {
    pub fn loader_options(&self) -> LoaderOptions {
        LoaderOptions {
            delimiter: self.delimiter,
            breed_column: self.breed_column.clone(),
            image_column: self.image_column.clone(),
            skip_columns: self.skip_columns.clone(),
            missing_values: self.missing_values,
            scale: OrdinalScale::default(),
            image_base_url: self.image_base_url.clone(),
        }
    }
}

fn default_breed_traits_path() -> PathBuf { PathBuf::from("data/breed_traits.csv") }
fn default_trait_descriptions_path() -> PathBuf { PathBuf::from("data/trait_description.csv") }
fn default_delimiter() -> char { ',' }
fn default_breed_column() -> String { "Breed".to_string() }
fn default_image_column() -> Option<String> { Some("Image".to_string()) }
fn default_skip_columns() -> Vec<String> { vec!["Coat Type".to_string(), "Coat Length".to_string()] }
fn default_image_base_url() -> String { DEFAULT_IMAGE_BASE_URL.to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_top_n")]
    pub default_top_n: u16,
    #[serde(default = "default_max_top_n")]
    pub max_top_n: u16,
    #[serde(default = "default_explain_traits")]
    pub explain_traits: usize,
    #[serde(default)]
    pub missing_preferences: FillPolicy,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            default_top_n: default_top_n(),
            max_top_n: default_max_top_n(),
            explain_traits: default_explain_traits(),
            missing_preferences: FillPolicy::default(),
        }
    }
}

impl MatchingSettings {
    pub fn matching_config(&self) -> MatchingConfig {
        MatchingConfig {
            missing_preferences: self.missing_preferences,
            explain_traits: self.explain_traits,
        }
    }
}

fn default_top_n() -> u16 { DEFAULT_TOP_N as u16 }
fn default_max_top_n() -> u16 { 50 }
fn default_explain_traits() -> usize { 3 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with BREED_MATCH)
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., BREED_MATCH__SERVER__PORT -> server.port
            .add_source(environment())
            .build()?
            .try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?
            .try_deserialize()
    }
}

fn environment() -> Environment {
    Environment::with_prefix("BREED_MATCH")
        .prefix_separator("__")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("data.skip_columns")
        .try_parsing(true)
}
