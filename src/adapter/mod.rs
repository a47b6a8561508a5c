//! Adapter Layer
//!
//! 外部システム（ファイルシステム, タイルサーバー, 画像・アーカイブ形式）との統合

pub mod archive;
pub mod config;
pub mod kml;
pub mod render;
pub mod shapefile;
pub mod tiles;
