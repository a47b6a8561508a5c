//! # Tile Repository Trait
//!
//! ベースマップタイルの取得を抽象化

use anyhow::Result;
use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::domain::services::web_mercator::TileCoord;

/// タイルリポジトリ
///
/// XYZタイルの画像バイト列（PNG等）を返す
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TileRepository: Send + Sync {
    /// タイルを1枚取得する
    ///
    /// # Errors
    ///
    /// 通信エラーやHTTPエラーの場合にエラーを返す
    async fn fetch_tile(&self, tile: TileCoord) -> Result<Vec<u8>>;
}
