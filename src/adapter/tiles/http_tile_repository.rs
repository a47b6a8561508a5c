//! HTTP Tile Repository Implementation
//!
//! TileRepositoryのHTTP実装（XYZタイルサーバーから取得）

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, warn};
use std::time::Duration;

use crate::adapter::config::Config;
use crate::domain::repositories::tile_repository::TileRepository;
use crate::domain::services::web_mercator::TileCoord;

/// HTTPタイルリポジトリ
pub struct HttpTileRepository {
    client: reqwest::Client,
    url_template: String,
}

impl HttpTileRepository {
    /// 新しいリポジトリを作成
    ///
    /// # Arguments
    ///
    /// * `url_template` - `{z}` `{x}` `{y}` を含むURL
    /// * `user_agent` - タイルサーバーに送るUser-Agent
    /// * `timeout` - 1リクエストあたりのタイムアウト
    pub fn new(url_template: &str, user_agent: &str, timeout: Duration) -> Result<Self> {
        for placeholder in ["{z}", "{x}", "{y}"] {
            if !url_template.contains(placeholder) {
                anyhow::bail!(
                    "Tile URL template is missing {}: {}",
                    placeholder,
                    url_template
                );
            }
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            url_template: url_template.to_string(),
        })
    }

    /// 設定から作成
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.tile_url_template,
            &config.user_agent,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// タイルのURLを組み立てる
    pub fn tile_url(&self, tile: TileCoord) -> String {
        self.url_template
            .replace("{z}", &tile.zoom.to_string())
            .replace("{x}", &tile.x.to_string())
            .replace("{y}", &tile.y.to_string())
    }
}

#[async_trait]
impl TileRepository for HttpTileRepository {
    async fn fetch_tile(&self, tile: TileCoord) -> Result<Vec<u8>> {
        let url = self.tile_url(tile);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Request failed: {}", url))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Tile server returned {} for {}", status, url);
            anyhow::bail!("HTTP {} for {}", status, url);
        }

        let bytes = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read response body: {}", url))?;

        debug!("Received {} bytes for {}", bytes.len(), url);
        Ok(bytes.to_vec())
    }
}
