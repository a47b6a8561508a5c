//! Render Adapter
//!
//! プレビュー画像の描画

pub mod basemap_renderer;

pub use basemap_renderer::BasemapRenderer;
