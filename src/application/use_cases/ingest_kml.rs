//! # Ingest KML Use Case
//!
//! アップロードされたバイト列を一時ファイルに書き出し、ジオメトリとして読み込む

use std::io::Write;
use std::sync::Arc;

use log::{debug, info};

use crate::domain::entities::geometry_collection::GeometryCollection;
use crate::domain::entities::uploaded_file::{UploadedFile, ACCEPTED_EXTENSION};
use crate::domain::error::{error_chain_to_string, ConversionError};
use crate::domain::repositories::geometry_reader::GeometryReader;

/// KML読み込みユースケース
pub struct IngestKmlUseCase<R: GeometryReader> {
    reader: Arc<R>,
}

impl<R: GeometryReader> IngestKmlUseCase<R> {
    /// 新しいユースケースを作成
    ///
    /// # Arguments
    ///
    /// * `reader` - ジオメトリリーダー
    pub fn new(reader: Arc<R>) -> Self {
        Self { reader }
    }

    /// アップロードを読み込んでジオメトリコレクションを返す
    ///
    /// 一時ファイルはどの経路で抜けても削除される
    ///
    /// # Errors
    ///
    /// 拡張子が `kml` でない場合、一時ファイルを書けない場合、
    /// KMLとして読めない場合に `ConversionError::Parse` を返す
    pub async fn execute(
        &self,
        upload: &UploadedFile,
    ) -> Result<GeometryCollection, ConversionError> {
        if !upload.has_accepted_extension() {
            return Err(ConversionError::Parse(format!(
                "expected a .{} file, got '{}'",
                ACCEPTED_EXTENSION,
                upload.file_name()
            )));
        }

        let mut staged = tempfile::Builder::new()
            .prefix("kml2shp-upload-")
            .suffix(".kml")
            .tempfile()
            .map_err(|e| ConversionError::Parse(format!("failed to stage upload: {}", e)))?;
        staged
            .write_all(upload.bytes())
            .map_err(|e| ConversionError::Parse(format!("failed to stage upload: {}", e)))?;
        staged
            .flush()
            .map_err(|e| ConversionError::Parse(format!("failed to stage upload: {}", e)))?;

        debug!(
            "Staged {} ({} bytes) at {}",
            upload.file_name(),
            upload.len(),
            staged.path().display()
        );

        let collection = self
            .reader
            .read(staged.path())
            .await
            .map_err(|e| ConversionError::Parse(error_chain_to_string(&e)))?;

        info!(
            "Read {} features from {} ({})",
            collection.len(),
            upload.file_name(),
            collection.crs()
        );

        Ok(collection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::geometry_collection::Crs;
    use anyhow::Result;
    use async_trait::async_trait;
    use geo_types::{Geometry, Point};
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    /// 読み込み時のパスと内容を記録するリーダー
    struct RecordingReader {
        seen: Mutex<Option<(PathBuf, Vec<u8>)>>,
        fail: bool,
    }

    impl RecordingReader {
        fn new(fail: bool) -> Self {
            Self {
                seen: Mutex::new(None),
                fail,
            }
        }
    }

    #[async_trait]
    impl GeometryReader for RecordingReader {
        async fn read(&self, path: &Path) -> Result<GeometryCollection> {
            let content = std::fs::read(path)?;
            *self.seen.lock().unwrap() = Some((path.to_path_buf(), content));
            if self.fail {
                return Err(anyhow::anyhow!("syntax error at line 1").context("invalid KML"));
            }
            Ok(GeometryCollection::from_geometries(
                vec![Geometry::Point(Point::new(1.0, 2.0))],
                Crs::wgs84(),
            ))
        }
    }

    #[tokio::test]
    async fn test_ingest_stages_bytes_and_cleans_up() {
        let reader = Arc::new(RecordingReader::new(false));
        let use_case = IngestKmlUseCase::new(reader.clone());
        let upload = UploadedFile::new("area.kml", b"<kml></kml>".to_vec());

        let collection = use_case.execute(&upload).await.unwrap();
        assert_eq!(collection.len(), 1);

        let (path, content) = reader.seen.lock().unwrap().clone().unwrap();
        assert_eq!(content, b"<kml></kml>");
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("kml"));
        assert!(!path.exists(), "staged file should be removed");
    }

    #[tokio::test]
    async fn test_ingest_reader_error_becomes_parse_error() {
        let reader = Arc::new(RecordingReader::new(true));
        let use_case = IngestKmlUseCase::new(reader.clone());
        let upload = UploadedFile::new("area.kml", b"not xml".to_vec());

        let err = use_case.execute(&upload).await.unwrap_err();
        assert_eq!(
            err,
            ConversionError::Parse("invalid KML | syntax error at line 1".to_string())
        );

        let (path, _) = reader.seen.lock().unwrap().clone().unwrap();
        assert!(!path.exists(), "staged file should be removed on failure");
    }

    #[tokio::test]
    async fn test_ingest_rejects_wrong_extension() {
        let reader = Arc::new(RecordingReader::new(false));
        let use_case = IngestKmlUseCase::new(reader.clone());
        let upload = UploadedFile::new("notes.txt", b"hello".to_vec());

        let err = use_case.execute(&upload).await.unwrap_err();
        assert!(matches!(err, ConversionError::Parse(_)));
        assert!(reader.seen.lock().unwrap().is_none());
    }
}
