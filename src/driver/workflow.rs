//! Workflow Orchestration
//!
//! 依存性を組み立てて変換を1回実行し、結果を出力ディレクトリに保存する

use anyhow::{Context, Result};
use log::info;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;

use crate::adapter::archive::ZipArchiveRepository;
use crate::adapter::config::Config;
use crate::adapter::kml::KmlGeometryReader;
use crate::adapter::render::BasemapRenderer;
use crate::adapter::shapefile::EsriShapefileRepository;
use crate::adapter::tiles::HttpTileRepository;
use crate::application::dto::conversion_config::ConversionConfig;
use crate::application::use_cases::convert_upload::ConvertUploadUseCase;
use crate::application::use_cases::export_shapefile::ExportShapefileUseCase;
use crate::application::use_cases::ingest_kml::IngestKmlUseCase;
use crate::application::use_cases::render_preview::RenderPreviewUseCase;
use crate::domain::entities::conversion_context::ConversionContext;
use crate::domain::entities::delivery::InteractionReport;
use crate::domain::entities::preview_figure::PreviewFigure;
use crate::domain::entities::uploaded_file::UploadedFile;
use crate::domain::repositories::tile_repository::TileRepository;

use super::cli::Args;

/// ファイルを読み込んでアップロードとして扱う
pub fn load_upload(path: &str) -> Result<UploadedFile> {
    let expanded = shellexpand::tilde(path);
    let path = PathBuf::from(expanded.as_ref());

    let bytes =
        fs::read(&path).with_context(|| format!("Failed to read input file: {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string());

    Ok(UploadedFile::new(file_name, bytes))
}

/// 出力ディレクトリ内の一時ファイルに書き込む（まだ目的のパスには置かない）
fn stage_file(dir: &Path, file_name: &str, data: &[u8]) -> Result<NamedTempFile> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

    let mut staged = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
    staged
        .write_all(data)
        .with_context(|| format!("Failed to write {}", file_name))?;
    staged
        .flush()
        .with_context(|| format!("Failed to write {}", file_name))?;

    Ok(staged)
}

fn persist_file(staged: NamedTempFile, dir: &Path, file_name: &str) -> Result<PathBuf> {
    let target = dir.join(file_name);
    staged
        .persist(&target)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to save {}", target.display()))?;
    Ok(target)
}

/// レポートの成果物（ZIP・プレビュー）を保存する
///
/// 両方を一時ファイルに書き終えてから配置する。ZIPを先に置くので、
/// ZIPを保存できなかった場合はプレビューも残らない。
pub fn save_artifacts(dir: &Path, report: &InteractionReport) -> Result<()> {
    let staged_download = report
        .download
        .as_ref()
        .map(|download| stage_file(dir, &download.file_name, &download.data))
        .transpose()?;
    let staged_preview = report
        .preview
        .as_ref()
        .map(|preview| stage_file(dir, PreviewFigure::FILE_NAME, &preview.png))
        .transpose()?;

    if let (Some(download), Some(staged)) = (&report.download, staged_download) {
        let path = persist_file(staged, dir, &download.file_name)?;
        println!(
            "✓ {}: {} ({} bytes)",
            download.label,
            path.display(),
            download.data.len()
        );
    }

    if let (Some(preview), Some(staged)) = (&report.preview, staged_preview) {
        let path = persist_file(staged, dir, PreviewFigure::FILE_NAME)?;
        println!(
            "✓ Saved preview ({}x{}, zoom {}) to {}",
            preview.width,
            preview.height,
            preview.zoom,
            path.display()
        );
    }

    Ok(())
}

/// KML → Shapefile 変換ワークフロー
pub struct ConversionWorkflow {
    config: Config,
    tile_repository: Option<Arc<dyn TileRepository>>,
}

impl ConversionWorkflow {
    /// Create a new workflow instance with dependency injection
    pub fn new(config: Config) -> Self {
        Self {
            config,
            tile_repository: None,
        }
    }

    /// タイル取得元を差し替える（既定は設定に従うHTTP取得）
    pub fn with_tile_repository(mut self, tile_repository: Arc<dyn TileRepository>) -> Self {
        self.tile_repository = Some(tile_repository);
        self
    }

    fn conversion_config(&self, args: &Args) -> ConversionConfig {
        let mut conversion = self.config.to_conversion_config(!args.no_preview);
        if args.allow_preview_failure {
            conversion.require_preview = false;
        }
        conversion
    }

    /// タイル取得元はプレビューを描く場合にだけ組み立てる
    fn build_use_case(
        &self,
        conversion: ConversionConfig,
        with_preview: bool,
    ) -> Result<ConvertUploadUseCase<KmlGeometryReader, EsriShapefileRepository, ZipArchiveRepository>>
    {
        let preview = if with_preview {
            let tile_repository: Arc<dyn TileRepository> = match &self.tile_repository {
                Some(repository) => repository.clone(),
                None => Arc::new(HttpTileRepository::from_config(&self.config)?),
            };
            Some(RenderPreviewUseCase::new(
                tile_repository,
                Arc::new(BasemapRenderer::new()),
            ))
        } else {
            None
        };

        Ok(ConvertUploadUseCase::new(
            IngestKmlUseCase::new(Arc::new(KmlGeometryReader::new())),
            preview,
            ExportShapefileUseCase::new(
                Arc::new(EsriShapefileRepository::new()),
                Arc::new(ZipArchiveRepository::new()),
            ),
            conversion,
        ))
    }

    /// Execute the conversion workflow
    ///
    /// 変換の失敗はレポート内のエラーメッセージとして返る。
    /// `Err` になるのは入力ファイルが読めない場合や成果物を保存できない場合のみ。
    pub async fn execute(&self, args: &Args) -> Result<InteractionReport> {
        let conversion = self.conversion_config(args);
        info!(
            "Starting conversion (preview: {}, require preview: {})",
            conversion.render_preview, conversion.require_preview
        );

        let upload = match &args.input {
            Some(path) => Some(load_upload(path)?),
            None => None,
        };

        let with_preview = conversion.render_preview && upload.is_some();
        let use_case = self.build_use_case(conversion, with_preview)?;
        let context = ConversionContext::new(upload);
        let report = use_case.execute(&context).await;

        println!("{}", report.title());
        for message in &report.messages {
            println!("{}", message);
        }

        let output_dir = PathBuf::from(shellexpand::tilde(&args.output_dir).as_ref());
        save_artifacts(&output_dir, &report)?;

        Ok(report)
    }
}
