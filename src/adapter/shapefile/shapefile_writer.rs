//! ESRI Shapefile Repository Implementation
//!
//! ShapefileRepositoryの実装（`.shp` `.shx` `.dbf` は `shapefile` クレート、`.prj` はWKT）

use anyhow::{Context, Result};
use async_trait::async_trait;
use geo_types::LineString;
use log::{debug, info};
use shapefile::dbase::{FieldName, FieldValue, Record, TableWriterBuilder};
use shapefile::{PolygonRing, Writer};
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::entities::geometry_collection::{Polygonal, PolygonLayer};
use crate::domain::entities::shapefile_archive::COMPONENT_EXTENSIONS;
use crate::domain::repositories::shapefile_repository::ShapefileRepository;

/// 属性テーブルのIDフィールド名
pub const ID_FIELD: &str = "id";
/// Placemarkの名前フィールド名
pub const NAME_FIELD: &str = "Name";
/// Placemarkの説明フィールド名
pub const DESCRIPTION_FIELD: &str = "Description";
const ID_FIELD_LENGTH: u8 = 10;
const TEXT_FIELD_LENGTH: u8 = 254;

/// Shapefileリポジトリ
pub struct EsriShapefileRepository;

impl EsriShapefileRepository {
    /// 新しいリポジトリを作成
    pub fn new() -> Self {
        Self
    }

    /// レイヤーを書き出す（同期処理）
    fn write_sync(dir: &Path, base_name: &str, layer: &PolygonLayer) -> Result<Vec<PathBuf>> {
        let wkt = layer
            .crs()
            .esri_wkt()
            .with_context(|| format!("Unsupported CRS for .prj: {}", layer.crs()))?;

        let shapes = layer
            .features()
            .iter()
            .map(|feature| {
                to_esri_polygon(&feature.shape)
                    .with_context(|| format!("Failed to convert feature {}", feature.id))
            })
            .collect::<Result<Vec<_>>>()?;

        let shp_path = dir.join(format!("{}.shp", base_name));
        let table = TableWriterBuilder::new()
            .add_numeric_field(field_name(ID_FIELD)?, ID_FIELD_LENGTH, 0)
            .add_character_field(field_name(NAME_FIELD)?, TEXT_FIELD_LENGTH)
            .add_character_field(field_name(DESCRIPTION_FIELD)?, TEXT_FIELD_LENGTH);

        // Writer flushes .shp/.shx headers and the .dbf on drop
        {
            let mut writer = Writer::from_path(&shp_path, table)
                .with_context(|| format!("Failed to create {}", shp_path.display()))?;

            for (feature, shape) in layer.features().iter().zip(shapes.iter()) {
                let mut record = Record::default();
                record.insert(
                    ID_FIELD.to_string(),
                    FieldValue::Numeric(Some(feature.id as f64)),
                );
                record.insert(
                    NAME_FIELD.to_string(),
                    FieldValue::Character(text_value(feature.name.as_deref())),
                );
                record.insert(
                    DESCRIPTION_FIELD.to_string(),
                    FieldValue::Character(text_value(feature.description.as_deref())),
                );
                writer
                    .write_shape_and_record(shape, &record)
                    .with_context(|| format!("Failed to write feature {}", feature.id))?;
            }
        }

        let prj_path = dir.join(format!("{}.prj", base_name));
        fs::write(&prj_path, wkt)
            .with_context(|| format!("Failed to write {}", prj_path.display()))?;

        let written: Vec<PathBuf> = COMPONENT_EXTENSIONS
            .iter()
            .map(|ext| dir.join(format!("{}.{}", base_name, ext)))
            .collect();
        for path in &written {
            if !path.is_file() {
                anyhow::bail!("Missing shapefile component: {}", path.display());
            }
            debug!("Wrote {}", path.display());
        }

        info!(
            "Wrote {} polygon features to {}",
            layer.len(),
            shp_path.display()
        );

        Ok(written)
    }
}

fn field_name(name: &str) -> Result<FieldName> {
    FieldName::try_from(name).map_err(|e| anyhow::anyhow!("Invalid field name {}: {}", name, e))
}

/// 文字列属性をフィールド長に収める
///
/// 空文字列は欠損値として書き出す。UTF-8の文字境界で切り詰める。
fn text_value(value: Option<&str>) -> Option<String> {
    let value = value?.trim();
    if value.is_empty() {
        return None;
    }

    let limit = TEXT_FIELD_LENGTH as usize;
    let mut end = value.len().min(limit);
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    Some(value[..end].to_string())
}

/// ポリゴン系ジオメトリをShapefileのポリゴン（外周・内周リング）に変換する
///
/// リングの向きと閉じは `shapefile` 側で整える
fn to_esri_polygon(shape: &Polygonal) -> Result<shapefile::Polygon> {
    let mut rings = Vec::new();
    for polygon in shape.polygons() {
        let exterior = to_points(polygon.exterior());
        if exterior.is_empty() {
            continue;
        }
        rings.push(PolygonRing::Outer(exterior));
        for interior in polygon.interiors() {
            let points = to_points(interior);
            if !points.is_empty() {
                rings.push(PolygonRing::Inner(points));
            }
        }
    }

    if rings.is_empty() {
        anyhow::bail!("Polygon has no rings");
    }

    Ok(shapefile::Polygon::with_rings(rings))
}

fn to_points(ring: &LineString<f64>) -> Vec<shapefile::Point> {
    ring.0
        .iter()
        .map(|c| shapefile::Point::new(c.x, c.y))
        .collect()
}

#[async_trait]
impl ShapefileRepository for EsriShapefileRepository {
    async fn write_layer(
        &self,
        dir: &Path,
        base_name: &str,
        layer: &PolygonLayer,
    ) -> Result<Vec<PathBuf>> {
        let dir = dir.to_path_buf();
        let base_name = base_name.to_string();
        let layer = layer.clone();
        tokio::task::spawn_blocking(move || Self::write_sync(&dir, &base_name, &layer))
            .await
            .map_err(|e| anyhow::anyhow!("Failed to spawn blocking task: {}", e))?
    }
}

impl Default for EsriShapefileRepository {
    fn default() -> Self {
        Self::new()
    }
}
