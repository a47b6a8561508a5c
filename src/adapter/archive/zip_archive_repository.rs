//! ZIP Archive Repository Implementation
//!
//! ArchiveRepositoryのZIP実装（ディレクトリ直下のファイルをメモリ上のZIPにまとめる）

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, info};
use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::domain::entities::shapefile_archive::ShapefileArchive;
use crate::domain::repositories::archive_repository::ArchiveRepository;

/// ZIPアーカイブリポジトリ
///
/// 同じ入力からは常に同じバイト列を生成する（エントリ順・時刻・権限を固定）
pub struct ZipArchiveRepository;

impl ZipArchiveRepository {
    /// 新しいリポジトリを作成
    pub fn new() -> Self {
        Self
    }

    /// ディレクトリをZIP化する（同期処理）
    fn pack_sync(dir: &Path) -> Result<ShapefileArchive> {
        if !dir.is_dir() {
            anyhow::bail!("Not a directory: {}", dir.display());
        }

        let options = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .unix_permissions(0o644)
            .last_modified_time(zip::DateTime::default());

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let mut entries = Vec::new();

        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.with_context(|| format!("Failed to walk {}", dir.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().to_string();
            let content = fs::read(entry.path())
                .with_context(|| format!("Failed to read {}", entry.path().display()))?;

            zip.start_file(name.as_str(), options)
                .with_context(|| format!("Failed to add {} to archive", name))?;
            zip.write_all(&content)
                .with_context(|| format!("Failed to write {} to archive", name))?;

            debug!("Archived {} ({} bytes)", name, content.len());
            entries.push(name);
        }

        let bytes = zip
            .finish()
            .context("Failed to finalize archive")?
            .into_inner();

        info!(
            "Archived {} files from {} ({} bytes)",
            entries.len(),
            dir.display(),
            bytes.len()
        );

        Ok(ShapefileArchive::new(bytes, entries))
    }
}

#[async_trait]
impl ArchiveRepository for ZipArchiveRepository {
    async fn pack_directory(&self, dir: &Path) -> Result<ShapefileArchive> {
        let dir: PathBuf = dir.to_path_buf();
        tokio::task::spawn_blocking(move || Self::pack_sync(&dir))
            .await
            .map_err(|e| anyhow::anyhow!("Failed to spawn blocking task: {}", e))?
    }
}

impl Default for ZipArchiveRepository {
    fn default() -> Self {
        Self::new()
    }
}
