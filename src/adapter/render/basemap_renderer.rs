//! Basemap Renderer
//!
//! FigureRendererの実装。`image` でタイルを合成し、`plotters` でポリゴンを重ねてPNGにする

use anyhow::{Context, Result};
use image::{imageops, DynamicImage, ImageOutputFormat, Rgb, RgbImage};
use log::debug;
use plotters::prelude::{
    BitMapBackend, Color, IntoDrawingArea, PathElement, Polygon as FilledPolygon, BLACK, BLUE,
    WHITE,
};
use std::io::Cursor;

use crate::domain::entities::geometry_collection::PolygonLayer;
use crate::domain::entities::preview_figure::PreviewFigure;
use crate::domain::repositories::figure_renderer::FigureRenderer;
use crate::domain::services::web_mercator::{PlacedTile, Viewport};

/// タイルが無い部分の背景色
const BACKGROUND: Rgb<u8> = Rgb([224, 224, 224]);

/// ポリゴン塗りの不透明度
pub const FILL_ALPHA: f64 = 0.5;

/// 画素座標に投影したポリゴン
struct ProjectedPolygon {
    feature_id: usize,
    exterior: Vec<(i32, i32)>,
    holes: Vec<Vec<(i32, i32)>>,
}

/// 穴の内側にあたる画素のインデックスを返す
///
/// 塗りと同じラスタライズになるよう、別バッファに穴を白で塗ってマスクにする
fn hole_pixel_indices(width: u32, height: u32, holes: &[Vec<(i32, i32)>]) -> Result<Vec<usize>> {
    let holes: Vec<&Vec<(i32, i32)>> = holes.iter().filter(|ring| ring.len() >= 3).collect();
    if holes.is_empty() {
        return Ok(Vec::new());
    }

    let mut mask = vec![0u8; width as usize * height as usize * 3];
    {
        let area = BitMapBackend::with_buffer(&mut mask, (width, height)).into_drawing_area();
        for ring in holes {
            area.draw(&FilledPolygon::new(ring.clone(), WHITE.filled()))
                .map_err(|e| anyhow::anyhow!("Failed to rasterize hole: {:?}", e))?;
        }
        area.present()
            .map_err(|e| anyhow::anyhow!("Failed to finish drawing: {:?}", e))?;
    }

    Ok(mask
        .chunks_exact(3)
        .enumerate()
        .filter(|(_, pixel)| pixel[0] != 0)
        .map(|(index, _)| index)
        .collect())
}

/// ベースマップ + ポリゴンのレンダラー
pub struct BasemapRenderer;

impl BasemapRenderer {
    /// 新しいレンダラーを作成
    pub fn new() -> Self {
        Self
    }

    /// タイルを画像上の位置に敷き詰める
    fn composite_tiles(viewport: &Viewport, tiles: &[(PlacedTile, Vec<u8>)]) -> Result<RgbImage> {
        let mut canvas = RgbImage::from_pixel(viewport.width, viewport.height, BACKGROUND);

        for (placed, bytes) in tiles {
            let tile = image::load_from_memory(bytes)
                .with_context(|| {
                    format!(
                        "Failed to decode tile {}/{}/{}",
                        placed.coord.zoom, placed.coord.x, placed.coord.y
                    )
                })?
                .to_rgb8();
            imageops::overlay(&mut canvas, &tile, placed.offset_x, placed.offset_y);
        }

        Ok(canvas)
    }

    /// ポリゴンを塗りつぶし＋輪郭線で描く
    ///
    /// 内周リング（穴）の内側は塗らずにベースマップを残す
    fn draw_polygons(canvas: RgbImage, viewport: &Viewport, layer: &PolygonLayer) -> Result<RgbImage> {
        let (width, height) = canvas.dimensions();
        let mut raw = canvas.into_raw();

        let to_pixel = |(lon, lat): (f64, f64)| {
            let (x, y) = viewport.project(lon, lat);
            (x.round() as i32, y.round() as i32)
        };
        let mut shapes = Vec::new();
        for feature in layer.features() {
            for polygon in feature.shape.polygons() {
                let exterior: Vec<(i32, i32)> = polygon
                    .exterior()
                    .0
                    .iter()
                    .map(|c| to_pixel((c.x, c.y)))
                    .collect();
                if exterior.len() < 3 {
                    continue;
                }
                let holes: Vec<Vec<(i32, i32)>> = polygon
                    .interiors()
                    .iter()
                    .map(|ring| ring.0.iter().map(|c| to_pixel((c.x, c.y))).collect())
                    .collect();
                shapes.push(ProjectedPolygon {
                    feature_id: feature.id,
                    exterior,
                    holes,
                });
            }
        }

        for shape in &shapes {
            let hole_pixels = hole_pixel_indices(width, height, &shape.holes)?;
            let saved: Vec<[u8; 3]> = hole_pixels
                .iter()
                .map(|&i| [raw[i * 3], raw[i * 3 + 1], raw[i * 3 + 2]])
                .collect();

            {
                let root = BitMapBackend::with_buffer(&mut raw, (width, height)).into_drawing_area();
                root.draw(&FilledPolygon::new(
                    shape.exterior.clone(),
                    BLUE.mix(FILL_ALPHA).filled(),
                ))
                .map_err(|e| {
                    anyhow::anyhow!("Failed to fill feature {}: {:?}", shape.feature_id, e)
                })?;
                root.present()
                    .map_err(|e| anyhow::anyhow!("Failed to finish drawing: {:?}", e))?;
            }

            for (&i, pixel) in hole_pixels.iter().zip(saved.iter()) {
                raw[i * 3..i * 3 + 3].copy_from_slice(pixel);
            }
        }

        {
            let root = BitMapBackend::with_buffer(&mut raw, (width, height)).into_drawing_area();
            for shape in &shapes {
                root.draw(&PathElement::new(shape.exterior.clone(), BLACK.stroke_width(2)))
                    .map_err(|e| {
                        anyhow::anyhow!("Failed to outline feature {}: {:?}", shape.feature_id, e)
                    })?;
                for hole in &shape.holes {
                    root.draw(&PathElement::new(hole.clone(), BLACK.stroke_width(1)))
                        .map_err(|e| {
                            anyhow::anyhow!(
                                "Failed to outline hole of feature {}: {:?}",
                                shape.feature_id,
                                e
                            )
                        })?;
                }
            }

            root.present()
                .map_err(|e| anyhow::anyhow!("Failed to finish drawing: {:?}", e))?;
        }

        RgbImage::from_raw(width, height, raw).context("Drawing buffer has an unexpected size")
    }

    fn encode_png(canvas: RgbImage) -> Result<Vec<u8>> {
        let mut png = Vec::new();
        DynamicImage::ImageRgb8(canvas)
            .write_to(&mut Cursor::new(&mut png), ImageOutputFormat::Png)
            .context("Failed to encode preview PNG")?;
        Ok(png)
    }
}

impl FigureRenderer for BasemapRenderer {
    fn render(
        &self,
        viewport: &Viewport,
        tiles: &[(PlacedTile, Vec<u8>)],
        layer: &PolygonLayer,
    ) -> Result<PreviewFigure> {
        let canvas = Self::composite_tiles(viewport, tiles)?;
        let canvas = Self::draw_polygons(canvas, viewport, layer)?;
        let png = Self::encode_png(canvas)?;

        debug!(
            "Rendered {}x{} preview at zoom {} from {} tiles ({} bytes)",
            viewport.width,
            viewport.height,
            viewport.zoom,
            tiles.len(),
            png.len()
        );

        Ok(PreviewFigure {
            png,
            width: viewport.width,
            height: viewport.height,
            zoom: viewport.zoom,
            tile_count: tiles.len(),
        })
    }
}

impl Default for BasemapRenderer {
    fn default() -> Self {
        Self::new()
    }
}
