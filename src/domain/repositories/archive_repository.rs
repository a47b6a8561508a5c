//! # Archive Repository Trait
//!
//! ディレクトリのアーカイブ化を抽象化

use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;

#[cfg(test)]
use mockall::automock;

use crate::domain::entities::shapefile_archive::ShapefileArchive;

/// アーカイブリポジトリ
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ArchiveRepository: Send + Sync {
    /// ディレクトリ配下の全ファイルをメモリ上のアーカイブにまとめる
    ///
    /// エントリ名はファイル名のみ（ディレクトリを含まない）
    async fn pack_directory(&self, dir: &Path) -> Result<ShapefileArchive>;
}
