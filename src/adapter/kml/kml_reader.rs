//! KML Geometry Reader
//!
//! GeometryReaderのKML実装（`kml` クレートでパースし `geo-types` に変換）

use anyhow::{Context, Result};
use async_trait::async_trait;
use geo_types::{Geometry, MultiPolygon};
use kml::Kml;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::entities::geometry_collection::{Crs, Feature, GeometryCollection};
use crate::domain::repositories::geometry_reader::GeometryReader;

/// KMLファイルリーダー
///
/// KMLの座標は常にWGS84の経度・緯度
pub struct KmlGeometryReader;

impl KmlGeometryReader {
    /// 新しいリーダーを作成
    pub fn new() -> Self {
        Self
    }

    /// ファイルを読み込む（同期処理）
    fn read_sync(path: &Path) -> Result<GeometryCollection> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read KML file: {}", path.display()))?;
        Self::parse(&content)
    }

    /// KML文字列をジオメトリコレクションに変換する
    pub fn parse(content: &str) -> Result<GeometryCollection> {
        let kml = content
            .parse::<Kml<f64>>()
            .map_err(|e| anyhow::anyhow!("{}", e))
            .context("Invalid KML document")?;

        if !matches!(kml, Kml::KmlDocument(_)) {
            anyhow::bail!("No readable layer: missing <kml> root element");
        }

        let mut features = Vec::new();
        collect_features(kml, &mut features);
        for feature in &features {
            debug!(
                "Feature {}: {} ({})",
                feature.id,
                feature.kind_name(),
                feature.name.as_deref().unwrap_or("unnamed")
            );
        }

        Ok(GeometryCollection::new(features, Crs::wgs84()))
    }
}

/// 要素ツリーを文書順にたどってフィーチャを集める
///
/// Placemarkは名前と説明を引き継ぐ。Placemarkの外に置かれたジオメトリは属性なしで扱う。
/// 変換できないジオメトリは読み飛ばす。
fn collect_features(element: Kml<f64>, features: &mut Vec<Feature>) {
    match element {
        Kml::KmlDocument(document) => {
            for child in document.elements {
                collect_features(child, features);
            }
        }
        Kml::Document { elements, .. } | Kml::Folder { elements, .. } => {
            for child in elements {
                collect_features(child, features);
            }
        }
        Kml::Placemark(placemark) => {
            let Some(geometry) = placemark.geometry else {
                debug!("Skipping placemark without geometry");
                return;
            };
            match Geometry::<f64>::try_from(geometry) {
                Ok(geometry) => {
                    let id = features.len() + 1;
                    features.push(
                        Feature::new(id, normalize_geometry(geometry))
                            .with_attributes(placemark.name, placemark.description),
                    );
                }
                Err(e) => debug!("Skipping placemark geometry: {}", e),
            }
        }
        other => match Vec::<Geometry<f64>>::try_from(other) {
            Ok(geometries) => {
                for geometry in geometries {
                    let id = features.len() + 1;
                    features.push(Feature::new(id, normalize_geometry(geometry)));
                }
            }
            Err(e) => debug!("Skipping geometry: {}", e),
        },
    }
}

/// `MultiGeometry` がポリゴンのみで構成される場合はマルチポリゴンにまとめる
///
/// 要素が1つならポリゴンのまま。異種混在のコレクションはそのまま残す。
fn normalize_geometry(geometry: Geometry<f64>) -> Geometry<f64> {
    let Geometry::GeometryCollection(collection) = geometry else {
        return geometry;
    };

    let is_polygonal = !collection.0.is_empty()
        && collection
            .0
            .iter()
            .all(|g| matches!(g, Geometry::Polygon(_) | Geometry::MultiPolygon(_)));
    if !is_polygonal {
        return Geometry::GeometryCollection(collection);
    }

    let mut polygons = Vec::new();
    for member in collection.0 {
        match member {
            Geometry::Polygon(polygon) => polygons.push(polygon),
            Geometry::MultiPolygon(multi) => polygons.extend(multi.0),
            _ => {}
        }
    }

    if polygons.len() == 1 {
        Geometry::Polygon(polygons.remove(0))
    } else {
        Geometry::MultiPolygon(MultiPolygon(polygons))
    }
}

#[async_trait]
impl GeometryReader for KmlGeometryReader {
    async fn read(&self, path: &Path) -> Result<GeometryCollection> {
        let path: PathBuf = path.to_path_buf();
        let collection = tokio::task::spawn_blocking(move || Self::read_sync(&path))
            .await
            .map_err(|e| anyhow::anyhow!("Failed to spawn blocking task: {}", e))??;

        info!("Loaded {} features from KML", collection.len());
        Ok(collection)
    }
}

impl Default for KmlGeometryReader {
    fn default() -> Self {
        Self::new()
    }
}
