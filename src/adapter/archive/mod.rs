//! Archive Adapter
//!
//! ZIPアーカイブの作成

pub mod zip_archive_repository;

pub use zip_archive_repository::ZipArchiveRepository;
