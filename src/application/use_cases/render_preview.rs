//! # Render Preview Use Case
//!
//! ベースマップタイルを取得し、ポリゴンを重ねたプレビューを描画する

use std::sync::Arc;

use log::{debug, info};

use crate::application::dto::conversion_config::ConversionConfig;
use crate::domain::entities::geometry_collection::PolygonLayer;
use crate::domain::entities::preview_figure::PreviewFigure;
use crate::domain::error::{error_chain_to_string, ConversionError};
use crate::domain::repositories::figure_renderer::FigureRenderer;
use crate::domain::repositories::tile_repository::TileRepository;
use crate::domain::services::web_mercator::Viewport;

/// プレビュー描画ユースケース
pub struct RenderPreviewUseCase {
    tile_repository: Arc<dyn TileRepository>,
    renderer: Arc<dyn FigureRenderer>,
}

impl RenderPreviewUseCase {
    /// 新しいユースケースを作成
    ///
    /// # Arguments
    ///
    /// * `tile_repository` - ベースマップタイルの取得元
    /// * `renderer` - 画像の合成・描画
    pub fn new(tile_repository: Arc<dyn TileRepository>, renderer: Arc<dyn FigureRenderer>) -> Self {
        Self {
            tile_repository,
            renderer,
        }
    }

    /// プレビューを描画する
    ///
    /// # Returns
    ///
    /// 空のレイヤーでは通信せずに `None` を返す
    ///
    /// # Errors
    ///
    /// - タイル取得に失敗した場合は `ConversionError::Network`
    /// - CRSが経緯度でない場合や描画に失敗した場合は `ConversionError::Preview`
    pub async fn execute(
        &self,
        layer: &PolygonLayer,
        config: &ConversionConfig,
    ) -> Result<Option<PreviewFigure>, ConversionError> {
        let Some(bounds) = layer.bounds() else {
            debug!("Nothing to preview");
            return Ok(None);
        };

        if !layer.crs().is_wgs84() {
            return Err(ConversionError::Preview(format!(
                "cannot project {} onto the basemap",
                layer.crs()
            )));
        }

        let viewport = Viewport::fit(
            bounds,
            config.figure_width,
            config.figure_height,
            config.max_zoom,
        );
        let placed = viewport.tiles();
        info!(
            "Fetching {} basemap tiles at zoom {}",
            placed.len(),
            viewport.zoom
        );

        let mut tiles = Vec::with_capacity(placed.len());
        for tile in placed {
            let bytes = self
                .tile_repository
                .fetch_tile(tile.coord)
                .await
                .map_err(|e| ConversionError::Network(error_chain_to_string(&e)))?;
            tiles.push((tile, bytes));
        }

        let figure = self
            .renderer
            .render(&viewport, &tiles, layer)
            .map_err(|e| ConversionError::Preview(error_chain_to_string(&e)))?;

        Ok(Some(figure))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::geometry_collection::{Crs, PolygonFeature, Polygonal};
    use crate::domain::repositories::tile_repository::MockTileRepository;
    use crate::domain::services::web_mercator::PlacedTile;
    use anyhow::Result;
    use geo_types::polygon;

    /// 受け取ったタイル数を画像サイズに詰めて返すレンダラー
    struct CountingRenderer;

    impl FigureRenderer for CountingRenderer {
        fn render(
            &self,
            viewport: &Viewport,
            tiles: &[(PlacedTile, Vec<u8>)],
            _layer: &PolygonLayer,
        ) -> Result<PreviewFigure> {
            Ok(PreviewFigure {
                png: vec![],
                width: viewport.width,
                height: viewport.height,
                zoom: viewport.zoom,
                tile_count: tiles.len(),
            })
        }
    }

    struct FailingRenderer;

    impl FigureRenderer for FailingRenderer {
        fn render(
            &self,
            _viewport: &Viewport,
            _tiles: &[(PlacedTile, Vec<u8>)],
            _layer: &PolygonLayer,
        ) -> Result<PreviewFigure> {
            Err(anyhow::anyhow!("invalid PNG signature"))
        }
    }

    fn square_layer(crs: Crs) -> PolygonLayer {
        PolygonLayer::new(
            vec![PolygonFeature::new(
                1,
                Polygonal::Polygon(polygon![
                    (x: 139.70, y: 35.65),
                    (x: 139.71, y: 35.65),
                    (x: 139.71, y: 35.66),
                    (x: 139.70, y: 35.66)
                ]),
            )],
            crs,
        )
    }

    #[tokio::test]
    async fn test_render_fetches_every_tile() {
        let mut tiles = MockTileRepository::new();
        tiles
            .expect_fetch_tile()
            .returning(|_| Ok(vec![0u8; 4]));

        let use_case = RenderPreviewUseCase::new(Arc::new(tiles), Arc::new(CountingRenderer));
        let config = ConversionConfig::default();
        let layer = square_layer(Crs::wgs84());

        let figure = use_case.execute(&layer, &config).await.unwrap().unwrap();

        let expected = Viewport::fit(layer.bounds().unwrap(), 800, 800, 18)
            .tiles()
            .len();
        assert_eq!(figure.tile_count, expected);
        assert_eq!(figure.width, 800);
    }

    #[tokio::test]
    async fn test_render_empty_layer_does_not_fetch() {
        let mut tiles = MockTileRepository::new();
        tiles.expect_fetch_tile().never();

        let use_case = RenderPreviewUseCase::new(Arc::new(tiles), Arc::new(CountingRenderer));
        let layer = PolygonLayer::new(vec![], Crs::wgs84());

        let result = use_case
            .execute(&layer, &ConversionConfig::default())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_render_tile_failure_is_network_error() {
        let mut tiles = MockTileRepository::new();
        tiles
            .expect_fetch_tile()
            .times(1)
            .returning(|_| Err(anyhow::anyhow!("connection refused")));

        let use_case = RenderPreviewUseCase::new(Arc::new(tiles), Arc::new(CountingRenderer));

        let err = use_case
            .execute(&square_layer(Crs::wgs84()), &ConversionConfig::default())
            .await
            .unwrap_err();
        assert_eq!(err, ConversionError::Network("connection refused".to_string()));
    }

    #[tokio::test]
    async fn test_render_renderer_failure_is_preview_error() {
        let mut tiles = MockTileRepository::new();
        tiles.expect_fetch_tile().returning(|_| Ok(vec![]));

        let use_case = RenderPreviewUseCase::new(Arc::new(tiles), Arc::new(FailingRenderer));

        let err = use_case
            .execute(&square_layer(Crs::wgs84()), &ConversionConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ConversionError::Preview(_)));
    }

    #[tokio::test]
    async fn test_render_rejects_projected_crs() {
        let mut tiles = MockTileRepository::new();
        tiles.expect_fetch_tile().never();

        let use_case = RenderPreviewUseCase::new(Arc::new(tiles), Arc::new(CountingRenderer));

        let err = use_case
            .execute(&square_layer(Crs::epsg(3857)), &ConversionConfig::default())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ConversionError::Preview("cannot project EPSG:3857 onto the basemap".to_string())
        );
    }
}
