//! Shapefile Adapter
//!
//! ESRI Shapefileバンドルの書き出し

pub mod shapefile_writer;

pub use shapefile_writer::EsriShapefileRepository;
