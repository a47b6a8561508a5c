//! # Export Shapefile Use Case
//!
//! 一時ディレクトリにShapefileバンドルを書き出し、メモリ上のZIPにまとめる

use std::sync::Arc;

use log::{info, warn};

use crate::domain::entities::geometry_collection::PolygonLayer;
use crate::domain::entities::shapefile_archive::ShapefileArchive;
use crate::domain::error::{error_chain_to_string, ConversionError};
use crate::domain::repositories::archive_repository::ArchiveRepository;
use crate::domain::repositories::shapefile_repository::ShapefileRepository;

/// Shapefile書き出しユースケース
pub struct ExportShapefileUseCase<S: ShapefileRepository, A: ArchiveRepository> {
    shapefile_repository: Arc<S>,
    archive_repository: Arc<A>,
}

impl<S: ShapefileRepository, A: ArchiveRepository> ExportShapefileUseCase<S, A> {
    /// 新しいユースケースを作成
    ///
    /// # Arguments
    ///
    /// * `shapefile_repository` - Shapefileの書き出し
    /// * `archive_repository` - ディレクトリのアーカイブ化
    pub fn new(shapefile_repository: Arc<S>, archive_repository: Arc<A>) -> Self {
        Self {
            shapefile_repository,
            archive_repository,
        }
    }

    /// レイヤーをShapefileとして書き出し、ZIPアーカイブを返す
    ///
    /// 一時ディレクトリはアーカイブがメモリ上に揃った後、成否にかかわらず削除される
    ///
    /// # Arguments
    ///
    /// * `layer` - 書き出すポリゴンレイヤー
    /// * `base_name` - 構成ファイル共通のベース名
    ///
    /// # Errors
    ///
    /// 空のレイヤー、書き出し失敗、構成ファイルの欠落で `ConversionError::Export` を返す
    pub async fn execute(
        &self,
        layer: &PolygonLayer,
        base_name: &str,
    ) -> Result<ShapefileArchive, ConversionError> {
        if layer.is_empty() {
            return Err(ConversionError::Export(
                "no polygon features to export".to_string(),
            ));
        }

        let workdir = tempfile::Builder::new()
            .prefix("kml2shp-export-")
            .tempdir()
            .map_err(|e| {
                ConversionError::Export(format!("failed to create temporary directory: {}", e))
            })?;

        let written = self
            .shapefile_repository
            .write_layer(workdir.path(), base_name, layer)
            .await
            .map_err(|e| ConversionError::Export(error_chain_to_string(&e)))?;
        info!(
            "Wrote {} shapefile components for {} features",
            written.len(),
            layer.len()
        );

        let archive = self
            .archive_repository
            .pack_directory(workdir.path())
            .await
            .map_err(|e| ConversionError::Export(error_chain_to_string(&e)))?;

        if !archive.is_complete(base_name) {
            return Err(ConversionError::Export(format!(
                "incomplete shapefile bundle: {:?}",
                archive.entries()
            )));
        }

        let workdir_path = workdir.path().to_path_buf();
        if let Err(e) = workdir.close() {
            warn!(
                "Failed to remove temporary directory {}: {}",
                workdir_path.display(),
                e
            );
        }

        info!(
            "Packed {} files into a {} byte archive",
            archive.entries().len(),
            archive.bytes().len()
        );

        Ok(archive)
    }
}
