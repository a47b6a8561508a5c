//! # Shapefile Repository Trait
//!
//! ポリゴンレイヤーのShapefile書き出しを抽象化

use anyhow::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

#[cfg(test)]
use mockall::automock;

use crate::domain::entities::geometry_collection::PolygonLayer;

/// Shapefileリポジトリ
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ShapefileRepository: Send + Sync {
    /// レイヤーをShapefileバンドルとして書き出す
    ///
    /// # Arguments
    ///
    /// * `dir` - 出力先ディレクトリ
    /// * `base_name` - 構成ファイル共通のベース名
    /// * `layer` - 書き出すレイヤー
    ///
    /// # Returns
    ///
    /// 書き出したファイルのパス
    async fn write_layer(
        &self,
        dir: &Path,
        base_name: &str,
        layer: &PolygonLayer,
    ) -> Result<Vec<PathBuf>>;
}
