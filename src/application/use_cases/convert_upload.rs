//! # Convert Upload Use Case
//!
//! 1回の対話（アップロード → 読み込み → フィルタ → プレビュー → 書き出し）を通して実行し、
//! ユーザーに届ける内容を組み立てる

use log::{error, info, warn};

use crate::application::dto::conversion_config::ConversionConfig;
use crate::application::use_cases::export_shapefile::ExportShapefileUseCase;
use crate::application::use_cases::ingest_kml::IngestKmlUseCase;
use crate::application::use_cases::render_preview::RenderPreviewUseCase;
use crate::domain::entities::conversion_context::ConversionContext;
use crate::domain::entities::delivery::{DownloadArtifact, InteractionReport, StatusMessage};
use crate::domain::entities::uploaded_file::UploadedFile;
use crate::domain::error::ConversionError;
use crate::domain::repositories::archive_repository::ArchiveRepository;
use crate::domain::repositories::geometry_reader::GeometryReader;
use crate::domain::repositories::shapefile_repository::ShapefileRepository;
use crate::domain::services::polygon_filter::PolygonFilterService;

pub const UPLOAD_PROMPT: &str = "Please upload a KML file to convert.";
pub const SUCCESS_MESSAGE: &str = "Shapefile successfully generated!";
pub const NO_FEATURES_MESSAGE: &str =
    "No polygon or multipolygon features found in the uploaded KML.";
pub const ERROR_PREFIX: &str = "There was an error processing the KML file";

/// 変換ユースケース
pub struct ConvertUploadUseCase<R, S, A>
where
    R: GeometryReader,
    S: ShapefileRepository,
    A: ArchiveRepository,
{
    ingest: IngestKmlUseCase<R>,
    preview: Option<RenderPreviewUseCase>,
    export: ExportShapefileUseCase<S, A>,
    config: ConversionConfig,
}

impl<R, S, A> ConvertUploadUseCase<R, S, A>
where
    R: GeometryReader,
    S: ShapefileRepository,
    A: ArchiveRepository,
{
    /// 新しいユースケースを作成
    ///
    /// `preview` が `None` の場合はプレビューを描かない
    pub fn new(
        ingest: IngestKmlUseCase<R>,
        preview: Option<RenderPreviewUseCase>,
        export: ExportShapefileUseCase<S, A>,
        config: ConversionConfig,
    ) -> Self {
        Self {
            ingest,
            preview,
            export,
            config,
        }
    }

    /// 変換を実行してレポートを返す
    ///
    /// どのステージのエラーも1つのエラーメッセージに変換され、
    /// その場合はダウンロードもプレビューも含まれない
    pub async fn execute(&self, context: &ConversionContext) -> InteractionReport {
        let mut report = InteractionReport::new();

        let Some(upload) = context.upload.as_ref() else {
            report.push(StatusMessage::Info(UPLOAD_PROMPT.to_string()));
            return report;
        };

        info!(
            "[{}] Converting {} ({} bytes)",
            context.request_id,
            upload.file_name(),
            upload.len()
        );

        if let Err(e) = self.run(upload, &mut report).await {
            error!("[{}] {}: {}", context.request_id, e.kind(), e);
            report.preview = None;
            report.download = None;
            report.push(StatusMessage::Error(format!("{}: {}", ERROR_PREFIX, e)));
        }

        info!(
            "[{}] Finished in {} ms ({} of {} features kept)",
            context.request_id,
            context.elapsed_ms(),
            report.features_kept,
            report.features_read
        );

        report
    }

    async fn run(
        &self,
        upload: &UploadedFile,
        report: &mut InteractionReport,
    ) -> Result<(), ConversionError> {
        let collection = self.ingest.execute(upload).await?;
        report.features_read = collection.len();

        let layer = PolygonFilterService::retain_polygons(collection);
        report.features_kept = layer.len();
        if report.features_read > layer.len() {
            warn!(
                "Dropped {} non-polygon features",
                report.features_read - layer.len()
            );
        }

        if layer.is_empty() {
            report.push(StatusMessage::Warning(NO_FEATURES_MESSAGE.to_string()));
            return Ok(());
        }

        let preview = self
            .preview
            .as_ref()
            .filter(|_| self.config.render_preview);
        if let Some(preview) = preview {
            match preview.execute(&layer, &self.config).await {
                Ok(figure) => report.preview = figure,
                Err(e) if e.is_preview_failure() && !self.config.require_preview => {
                    warn!("Preview skipped: {}", e);
                    report.push(StatusMessage::Warning(format!(
                        "Preview unavailable: {}",
                        e
                    )));
                }
                Err(e) => return Err(e),
            }
        }

        let archive = self
            .export
            .execute(&layer, &self.config.layer_name)
            .await?;
        report.download = Some(DownloadArtifact::from_archive(archive));
        report.push(StatusMessage::Success(SUCCESS_MESSAGE.to_string()));

        Ok(())
    }
}
