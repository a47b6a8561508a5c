//! Configuration
//!
//! JSON設定ファイルの読み込み（全フィールドにデフォルト値あり）

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;

use crate::application::dto::conversion_config::ConversionConfig;
use crate::domain::entities::shapefile_archive::LAYER_BASE_NAME;

pub const DEFAULT_TILE_URL_TEMPLATE: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// `{z}` `{x}` `{y}` を含むタイルURL
    pub tile_url_template: String,
    pub user_agent: String,
    pub request_timeout_secs: u64,

    // Preview
    pub figure_width: u32,
    pub figure_height: u32,
    pub max_zoom: u8,
    pub require_preview: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tile_url_template: DEFAULT_TILE_URL_TEMPLATE.to_string(),
            user_agent: concat!("kml2shp/", env!("CARGO_PKG_VERSION")).to_string(),
            request_timeout_secs: 30,
            figure_width: 800,
            figure_height: 800,
            max_zoom: 18,
            require_preview: true,
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let expanded = shellexpand::tilde(path);
        let content = fs::read_to_string(expanded.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;
        Ok(config)
    }

    /// 変換設定に変換する
    pub fn to_conversion_config(&self, render_preview: bool) -> ConversionConfig {
        ConversionConfig::new(
            LAYER_BASE_NAME.to_string(),
            render_preview,
            self.require_preview,
            self.figure_width,
            self.figure_height,
            self.max_zoom,
        )
    }
}
