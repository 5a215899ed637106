use std::path::Path;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Which route table the server exposes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ServeMode {
    /// HTML listing at `/`, downloads under `/files/{filename}`
    #[default]
    Catalog,
    /// Index document at `/`, downloads at `/{filename}`
    Minimal,
}

impl ServeMode {
    /// URL prefix under which files are downloadable.
    pub fn download_prefix(self) -> &'static str {
        match self {
            ServeMode::Catalog => "/files/",
            ServeMode::Minimal => "/",
        }
    }

    /// Bind address used when none is given on the command line.
    pub fn default_bind(self) -> &'static str {
        match self {
            ServeMode::Catalog => "0.0.0.0",
            ServeMode::Minimal => "127.0.0.1",
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Route table to expose
    #[serde(default)]
    pub mode: ServeMode,

    /// Refuse and hide names starting with a dot, for listing and download alike
    #[serde(default = "default_hide_dotfiles")]
    pub hide_dotfiles: bool,

    /// Names that are never listed or served (compared case-insensitively)
    #[serde(default = "default_protected_files")]
    pub protected_files: Vec<String>,

    /// Asset directories mounted read-only when present under the root
    #[serde(default = "default_static_dirs")]
    pub static_dirs: Vec<String>,

    /// Document served at `/` in minimal mode
    #[serde(default = "default_index_file")]
    pub index_file: String,

    /// Heading of the HTML listing page
    #[serde(default = "default_title")]
    pub title: String,

    /// Allow cross-origin requests
    #[serde(default)]
    pub enable_cors: bool,
}

fn default_hide_dotfiles() -> bool {
    true
}

fn default_protected_files() -> Vec<String> {
    let own_name = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.file_name().map(|n| n.to_string_lossy().to_string()))
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string());

    if own_name == env!("CARGO_PKG_NAME") {
        vec![own_name]
    } else {
        vec![own_name, env!("CARGO_PKG_NAME").to_string()]
    }
}

fn default_static_dirs() -> Vec<String> {
    vec!["css".to_string(), "js".to_string(), "favicon".to_string()]
}

fn default_index_file() -> String {
    "index.html".to_string()
}

fn default_title() -> String {
    "Files".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: ServeMode::default(),
            hide_dotfiles: default_hide_dotfiles(),
            protected_files: default_protected_files(),
            static_dirs: default_static_dirs(),
            index_file: default_index_file(),
            title: default_title(),
            enable_cors: false,
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
