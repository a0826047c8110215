// ⚙️ Configuration - Data paths, default query, scene styling
//
// Nothing here is global: callers build a NetworkConfig and pass the pieces
// they need into the pipeline.

use crate::temporal::YearRange;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub edges_path: PathBuf,
    pub nodes_path: PathBuf,

    /// Account shown when the caller does not name one
    pub default_account: String,

    pub default_years: YearRange,

    pub style: SceneStyle,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        NetworkConfig {
            edges_path: PathBuf::from("data/input/edge_sample.csv"),
            nodes_path: PathBuf::from("data/input/node_sample.csv"),
            default_account: "A0001".to_string(),
            default_years: YearRange::default(),
            style: SceneStyle::default(),
        }
    }
}

impl NetworkConfig {
    /// Load from a JSON file; missing fields keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: NetworkConfig =
            serde_json::from_str(text).context("Failed to parse configuration JSON")?;
        YearRange::new(config.default_years.start, config.default_years.end)?;
        Ok(config)
    }
}

/// Visual constants of the rendered scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneStyle {
    pub title: String,
    pub height: u32,
    pub margin: u32,

    pub node_size: f64,
    pub hover_size: f64,
    pub node_color: String,

    /// Edge gradient endpoints (color name or `#rrggbb`)
    pub gradient_start: String,
    pub gradient_end: String,

    /// Width of the largest transaction in the window
    pub max_edge_width: f64,

    /// Where the lone marker goes when the account has no counterparties
    pub placeholder: (f64, f64),

    pub arrow_head: u8,
    pub arrow_size: f64,
    pub arrow_width: f64,
}

impl Default for SceneStyle {
    fn default() -> Self {
        SceneStyle {
            title: "Interactive Transaction Visualization".to_string(),
            height: 600,
            margin: 40,
            node_size: 50.0,
            hover_size: 20.0,
            node_color: "LightBlue".to_string(),
            gradient_start: "brown".to_string(),
            gradient_end: "darkred".to_string(),
            max_edge_width: 10.0,
            placeholder: (1.0, 1.0),
            arrow_head: 3,
            arrow_size: 4.0,
            arrow_width: 1.0,
        }
    }
}
