//! kml2shp - KML to Shapefile Converter
//!
//! KMLファイルをZIP化したESRI Shapefileに変換

// coverage_nightly cfg が設定されている場合のみ coverage_attribute を有効化
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use anyhow::Result;
use clap::Parser;

use kml2shp::adapter::config::Config;
use kml2shp::driver::{Args, ConversionWorkflow};

#[cfg_attr(coverage_nightly, coverage(off))]
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    // Load configuration
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    // Create workflow with injected dependencies
    let workflow = ConversionWorkflow::new(config);
    let report = workflow.execute(&args).await?;

    if report.has_error() {
        std::process::exit(1);
    }

    Ok(())
}
