//! CLI Argument Parsing
//!
//! CLIの引数解析

use clap::Parser;

/// KMLファイルをZIP化したShapefileに変換するCLI
#[derive(Parser, Debug, Clone)]
#[command(name = "kml2shp")]
#[command(about = "Convert a KML file into a zipped ESRI Shapefile", long_about = None)]
pub struct Args {
    /// KML file to convert (prints a prompt when omitted)
    pub input: Option<String>,

    /// Directory that receives shapefile.zip and preview.png
    #[arg(short, long, default_value = ".")]
    pub output_dir: String,

    /// Config file path (defaults are used when omitted)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Skip the basemap preview (no network access)
    #[arg(long)]
    pub no_preview: bool,

    /// Still export the shapefile when the preview cannot be rendered
    #[arg(long)]
    pub allow_preview_failure: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["kml2shp"]);
        assert!(args.input.is_none());
        assert_eq!(args.output_dir, ".");
        assert!(args.config.is_none());
        assert!(!args.no_preview);
        assert!(!args.allow_preview_failure);
    }

    #[test]
    fn test_args_input() {
        let args = Args::parse_from(["kml2shp", "area.kml"]);
        assert_eq!(args.input.as_deref(), Some("area.kml"));
    }

    #[test]
    fn test_args_output_dir() {
        let args = Args::parse_from(["kml2shp", "area.kml", "-o", "/tmp/out"]);
        assert_eq!(args.output_dir, "/tmp/out");
    }

    #[test]
    fn test_args_custom_config() {
        let args = Args::parse_from(["kml2shp", "-c", "/custom/config.json"]);
        assert_eq!(args.config.as_deref(), Some("/custom/config.json"));
    }

    #[test]
    fn test_args_combined() {
        let args = Args::parse_from([
            "kml2shp",
            "area.kml",
            "--no-preview",
            "--allow-preview-failure",
        ]);
        assert!(args.no_preview);
        assert!(args.allow_preview_failure);
    }
}
