//! # Conversion Configuration DTO
//!
//! 変換処理の設定のData Transfer Object

use crate::domain::entities::shapefile_archive::LAYER_BASE_NAME;

/// 変換設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionConfig {
    /// 出力レイヤーのベース名
    pub layer_name: String,
    /// プレビューを描画するかどうか
    pub render_preview: bool,
    /// プレビュー失敗を変換全体の失敗として扱うかどうか
    pub require_preview: bool,
    /// プレビュー画像の幅（ピクセル）
    pub figure_width: u32,
    /// プレビュー画像の高さ（ピクセル）
    pub figure_height: u32,
    /// ベースマップの最大ズーム
    pub max_zoom: u8,
}

impl ConversionConfig {
    /// 新しい変換設定を作成します。
    ///
    /// # 例
    ///
    /// プレビュー失敗を許容する設定：
    ///
    /// ```
    /// use kml2shp::application::dto::conversion_config::ConversionConfig;
    ///
    /// let config = ConversionConfig::new(
    ///     "converted_shapefile".to_string(),
    ///     true,   // プレビューを描画
    ///     false,  // プレビュー失敗でも書き出しは続行
    ///     800,
    ///     600,
    ///     18,
    /// );
    ///
    /// assert!(config.render_preview);
    /// assert!(!config.require_preview);
    /// assert_eq!(config.figure_height, 600);
    /// ```
    pub fn new(
        layer_name: String,
        render_preview: bool,
        require_preview: bool,
        figure_width: u32,
        figure_height: u32,
        max_zoom: u8,
    ) -> Self {
        Self {
            layer_name,
            render_preview,
            require_preview,
            figure_width,
            figure_height,
            max_zoom,
        }
    }
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self::new(LAYER_BASE_NAME.to_string(), true, true, 800, 800, 18)
    }
}
