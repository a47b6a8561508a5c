//! Tile Adapter
//!
//! ベースマップタイルの取得

pub mod http_tile_repository;

pub use http_tile_repository::HttpTileRepository;
