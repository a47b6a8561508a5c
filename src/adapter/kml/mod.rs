//! KML Adapter
//!
//! KMLファイルの読み込み

pub mod kml_reader;

pub use kml_reader::KmlGeometryReader;
