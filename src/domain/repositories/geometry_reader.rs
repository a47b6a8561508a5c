//! # Geometry Reader Trait
//!
//! ファイルからジオメトリコレクションを読み込む処理を抽象化

use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;

use crate::domain::entities::geometry_collection::GeometryCollection;

/// ジオメトリリーダー
#[async_trait]
pub trait GeometryReader: Send + Sync {
    /// ファイルを読み込んでジオメトリコレクションを返す
    ///
    /// # Arguments
    ///
    /// * `path` - 入力ファイルのパス
    ///
    /// # Errors
    ///
    /// ファイルが読めない、または形式が不正な場合にエラーを返す
    async fn read(&self, path: &Path) -> Result<GeometryCollection>;
}
