//! # Figure Renderer Trait
//!
//! タイルとポリゴンを合成してプレビュー画像を描画する処理を抽象化

use anyhow::Result;

use crate::domain::entities::geometry_collection::PolygonLayer;
use crate::domain::entities::preview_figure::PreviewFigure;
use crate::domain::services::web_mercator::{PlacedTile, Viewport};

/// プレビュー描画
pub trait FigureRenderer: Send + Sync {
    /// タイルを敷き詰め、その上にポリゴンを描画する
    ///
    /// # Arguments
    ///
    /// * `viewport` - 表示範囲
    /// * `tiles` - 配置済みタイルと画像バイト列
    /// * `layer` - 描画するポリゴンレイヤー
    fn render(
        &self,
        viewport: &Viewport,
        tiles: &[(PlacedTile, Vec<u8>)],
        layer: &PolygonLayer,
    ) -> Result<PreviewFigure>;
}
