//! Workflow Integration Tests
//!
//! ConversionWorkflow の統合テスト（タイル取得はスタブに差し替える）

use anyhow::Result;
use async_trait::async_trait;
use image::{DynamicImage, ImageOutputFormat, Rgb, RgbImage};
use kml2shp::adapter::config::Config;
use kml2shp::domain::entities::delivery::StatusMessage;
use kml2shp::domain::repositories::tile_repository::TileRepository;
use kml2shp::domain::services::web_mercator::TileCoord;
use kml2shp::driver::cli::Args;
use kml2shp::driver::workflow::ConversionWorkflow;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

/// 単色のPNGタイルを返すスタブ
struct StubTileRepository {
    png: Vec<u8>,
    requests: AtomicUsize,
}

impl StubTileRepository {
    fn new() -> Self {
        let tile = RgbImage::from_pixel(256, 256, Rgb([170, 211, 223]));
        let mut png = Vec::new();
        DynamicImage::ImageRgb8(tile)
            .write_to(&mut Cursor::new(&mut png), ImageOutputFormat::Png)
            .unwrap();
        Self {
            png,
            requests: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl TileRepository for StubTileRepository {
    async fn fetch_tile(&self, _tile: TileCoord) -> Result<Vec<u8>> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        Ok(self.png.clone())
    }
}

/// タイルサーバーに到達できない状態のスタブ
struct UnreachableTileRepository;

#[async_trait]
impl TileRepository for UnreachableTileRepository {
    async fn fetch_tile(&self, tile: TileCoord) -> Result<Vec<u8>> {
        Err(anyhow::anyhow!(
            "Request failed: https://tile.openstreetmap.org/{}/{}/{}.png",
            tile.zoom,
            tile.x,
            tile.y
        ))
    }
}

fn fixture(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
        .to_string_lossy()
        .to_string()
}

fn args_for(input: &str, output_dir: &Path) -> Args {
    Args {
        input: Some(fixture(input)),
        output_dir: output_dir.to_string_lossy().to_string(),
        config: None,
        no_preview: false,
        allow_preview_failure: false,
    }
}

fn output_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().to_string())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

#[tokio::test]
async fn test_square_produces_zip_and_preview() {
    let temp_dir = TempDir::new().unwrap();
    let tiles = Arc::new(StubTileRepository::new());
    let workflow = ConversionWorkflow::new(Config::default()).with_tile_repository(tiles.clone());

    let report = workflow
        .execute(&args_for("square.kml", temp_dir.path()))
        .await
        .unwrap();

    assert!(!report.has_error());
    assert_eq!(
        report.messages,
        vec![StatusMessage::Success(
            "Shapefile successfully generated!".to_string()
        )]
    );
    assert_eq!(output_files(temp_dir.path()), vec!["preview.png", "shapefile.zip"]);
    assert!(tiles.requests.load(Ordering::SeqCst) > 0);

    let zip_bytes = std::fs::read(temp_dir.path().join("shapefile.zip")).unwrap();
    let archive = zip::ZipArchive::new(Cursor::new(zip_bytes)).unwrap();
    let mut names: Vec<&str> = archive.file_names().collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "converted_shapefile.dbf",
            "converted_shapefile.prj",
            "converted_shapefile.shp",
            "converted_shapefile.shx",
        ]
    );

    let preview = image::open(temp_dir.path().join("preview.png")).unwrap();
    assert_eq!((preview.width(), preview.height()), (800, 800));
}

#[tokio::test]
async fn test_points_only_warns_without_download() {
    let temp_dir = TempDir::new().unwrap();
    let tiles = Arc::new(StubTileRepository::new());
    let workflow = ConversionWorkflow::new(Config::default()).with_tile_repository(tiles.clone());

    let report = workflow
        .execute(&args_for("points_only.kml", temp_dir.path()))
        .await
        .unwrap();

    assert!(!report.has_error());
    assert_eq!(
        report.messages,
        vec![StatusMessage::Warning(
            "No polygon or multipolygon features found in the uploaded KML.".to_string()
        )]
    );
    assert!(output_files(temp_dir.path()).is_empty());
    assert_eq!(tiles.requests.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_plain_text_reports_error() {
    let temp_dir = TempDir::new().unwrap();
    let workflow = ConversionWorkflow::new(Config::default())
        .with_tile_repository(Arc::new(StubTileRepository::new()));

    let report = workflow
        .execute(&args_for("plain_text.kml", temp_dir.path()))
        .await
        .unwrap();

    assert!(report.has_error());
    assert!(report.messages[0]
        .text()
        .starts_with("There was an error processing the KML file: "));
    assert!(report.download.is_none());
    assert!(output_files(temp_dir.path()).is_empty());
}

#[tokio::test]
async fn test_unreachable_basemap_reports_error() {
    let temp_dir = TempDir::new().unwrap();
    let workflow = ConversionWorkflow::new(Config::default())
        .with_tile_repository(Arc::new(UnreachableTileRepository));

    let report = workflow
        .execute(&args_for("point_and_polygon.kml", temp_dir.path()))
        .await
        .unwrap();

    assert!(report.has_error());
    assert!(report.messages[0]
        .text()
        .contains("failed to fetch basemap tiles"));
    assert!(report.download.is_none());
    assert!(output_files(temp_dir.path()).is_empty());
}

#[tokio::test]
async fn test_unreachable_basemap_allowed_still_exports() {
    let temp_dir = TempDir::new().unwrap();
    let workflow = ConversionWorkflow::new(Config::default())
        .with_tile_repository(Arc::new(UnreachableTileRepository));

    let mut args = args_for("point_and_polygon.kml", temp_dir.path());
    args.allow_preview_failure = true;
    let report = workflow.execute(&args).await.unwrap();

    assert!(!report.has_error());
    assert_eq!(report.features_read, 2);
    assert_eq!(report.features_kept, 1);
    assert!(matches!(report.messages[0], StatusMessage::Warning(_)));
    assert_eq!(output_files(temp_dir.path()), vec!["shapefile.zip"]);
}

#[tokio::test]
async fn test_no_preview_skips_tiles() {
    let temp_dir = TempDir::new().unwrap();
    let tiles = Arc::new(StubTileRepository::new());
    let workflow = ConversionWorkflow::new(Config::default()).with_tile_repository(tiles.clone());

    let mut args = args_for("square.kml", temp_dir.path());
    args.no_preview = true;
    let report = workflow.execute(&args).await.unwrap();

    assert!(!report.has_error());
    assert_eq!(tiles.requests.load(Ordering::SeqCst), 0);
    assert_eq!(output_files(temp_dir.path()), vec!["shapefile.zip"]);
}

#[tokio::test]
async fn test_no_preview_ignores_bad_tile_template() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config {
        tile_url_template: "https://tiles.invalid/tile.png".to_string(),
        ..Config::default()
    };
    let workflow = ConversionWorkflow::new(config);

    let mut args = args_for("square.kml", temp_dir.path());
    args.no_preview = true;
    let report = workflow.execute(&args).await.unwrap();

    assert!(!report.has_error());
    assert_eq!(output_files(temp_dir.path()), vec!["shapefile.zip"]);
}

#[tokio::test]
async fn test_repeated_conversions_are_identical() {
    let first_dir = TempDir::new().unwrap();
    let second_dir = TempDir::new().unwrap();
    let workflow = ConversionWorkflow::new(Config::default())
        .with_tile_repository(Arc::new(StubTileRepository::new()));

    workflow
        .execute(&args_for("square.kml", first_dir.path()))
        .await
        .unwrap();
    workflow
        .execute(&args_for("square.kml", second_dir.path()))
        .await
        .unwrap();

    let first = std::fs::read(first_dir.path().join("shapefile.zip")).unwrap();
    let second = std::fs::read(second_dir.path().join("shapefile.zip")).unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_missing_input_is_error() {
    let temp_dir = TempDir::new().unwrap();
    let workflow = ConversionWorkflow::new(Config::default());

    let mut args = args_for("square.kml", temp_dir.path());
    args.input = Some("/nonexistent/missing.kml".to_string());

    assert!(workflow.execute(&args).await.is_err());
}
