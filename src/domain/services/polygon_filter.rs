//! # Polygon Filter Service
//!
//! ポリゴン / マルチポリゴン以外のフィーチャを取り除くサービス

use crate::domain::entities::geometry_collection::{
    GeometryCollection, PolygonFeature, PolygonLayer,
};

/// ポリゴンフィルタサービス
///
/// 各フィーチャのジオメトリをポリゴン系なら残し、それ以外なら欠損扱いにして除外する。
/// エラーにはならない。結果が空でも有効なレイヤーとして返す。
pub struct PolygonFilterService;

impl PolygonFilterService {
    /// ポリゴン系フィーチャだけを残す
    ///
    /// # Arguments
    ///
    /// * `collection` - フィルタ対象のジオメトリコレクション
    ///
    /// # Returns
    ///
    /// 入力順とID、属性、CRSを保ったポリゴンレイヤー
    pub fn retain_polygons(collection: GeometryCollection) -> PolygonLayer {
        let crs = collection.crs();
        let features = collection
            .into_features()
            .into_iter()
            .filter_map(PolygonFeature::from_feature)
            .collect();

        PolygonLayer::new(features, crs)
    }
}
