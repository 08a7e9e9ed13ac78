// Application settings
// Loaded from ~/.config/budgetplan/settings.json

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use budgetplan_model::CpmOptions;

/// How the "Exp. CPM Range" column is constrained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CpmMode {
    /// One list per channel (default)
    #[default]
    PerChannel,
    /// One list shared by every channel
    Global,
    /// Free text
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Data
    #[serde(rename = "data.workbookPath")]
    pub workbook_path: Option<PathBuf>, // None = backend_data.xlsx in the working directory

    // CPM ranges
    #[serde(rename = "cpm.mode")]
    pub cpm_mode: CpmMode,

    #[serde(rename = "cpm.global")]
    pub cpm_global: Vec<String>,

    #[serde(rename = "cpm.perChannel")]
    pub cpm_per_channel: BTreeMap<String, Vec<String>>,

    // Planning selections
    #[serde(rename = "planning.brands")]
    pub brands: Vec<String>,

    #[serde(rename = "planning.segments")]
    pub segments: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        let cpm_global = match CpmOptions::default_global() {
            CpmOptions::Global(values) => values,
            _ => Vec::new(),
        };
        let cpm_per_channel = match CpmOptions::default_per_channel() {
            CpmOptions::PerChannel(map) => map,
            _ => BTreeMap::new(),
        };
        Self {
            workbook_path: None,
            cpm_mode: CpmMode::PerChannel,
            cpm_global,
            cpm_per_channel,
            brands: ["Brand A", "Brand B", "Brand C"].map(String::from).to_vec(),
            segments: ["Bath", "LDS", "LLS"].map(String::from).to_vec(),
        }
    }
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("budgetplan");
        config_dir.join("settings.json")
    }

    /// Load settings from disk, falling back to defaults
    pub fn load() -> Self {
        let path = Self::config_path();

        if !path.exists() {
            let settings = Self::default();
            settings.create_default_file(&path);
            return settings;
        }

        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("{e}; using default settings");
                Self::default()
            }
        }
    }

    /// Strict load of an explicit settings file (`--config`).
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Error reading {}: {}", path.display(), e))?;
        Self::parse(&contents).map_err(|e| format!("Error parsing {}: {}", path.display(), e))
    }

    /// Parse settings JSON. Lines starting with `//` are comments.
    pub fn parse(contents: &str) -> Result<Self, serde_json::Error> {
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");
        serde_json::from_str(&cleaned)
    }

    /// CPM options for the configured mode.
    pub fn cpm_options(&self) -> CpmOptions {
        match self.cpm_mode {
            CpmMode::PerChannel => CpmOptions::PerChannel(self.cpm_per_channel.clone()),
            CpmMode::Global => CpmOptions::Global(self.cpm_global.clone()),
            CpmMode::None => CpmOptions::Unconstrained,
        }
    }

    /// Create default settings file with comments
    fn create_default_file(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                log::warn!("Error creating config directory: {}", e);
                return;
            }
        }

        if let Err(e) = fs::write(path, DEFAULT_CONFIG) {
            log::warn!("Error writing default settings.json: {}", e);
        }
    }
}

const DEFAULT_CONFIG: &str = r#"{
    // Budget workbook (null = backend_data.xlsx in the working directory)
    "data.workbookPath": null,

    // Exp. CPM Range constraint: "per_channel", "global" or "none"
    "cpm.mode": "per_channel",
    "cpm.global": ["$6.3 - $6.8", "$8.1 - $8.9", "$5.0 - $5.5", "$9.3 - $10.0"],
    "cpm.perChannel": {
        "Display": ["$6.3 - $6.8", "$6.5 - $7.0"],
        "FEP": ["$8.1 - $8.9", "$8.0 - $8.7"],
        "Search": ["$5.0 - $5.5", "$5.2 - $5.8"],
        "Social Media": ["$9.3 - $10.0", "$9.1 - $9.8"],
        "Video": ["$6.3 - $6.8", "$6.5 - $7.0"]
    },

    // Selectable brands and segments
    "planning.brands": ["Brand A", "Brand B", "Brand C"],
    "planning.segments": ["Bath", "LDS", "LLS"]
}
"#;
