//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Command-line arguments shared by the workspace binaries.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "lodcull", about = "Distance-based LOD group culling")]
pub struct CliArgs {
    /// Culling distance applied to every group without an override.
    #[arg(long)]
    pub culling_distance: Option<f32>,

    /// Toggle renderers only (true) or whole child objects (false).
    #[arg(long)]
    pub disable_renderer_only: Option<bool>,

    /// Re-scan group members when the child count changes.
    #[arg(long)]
    pub update_by_count: Option<bool>,

    /// Blocks per grid side in the demo scene.
    #[arg(long)]
    pub grid_size: Option<u32>,

    /// Spacing between demo blocks.
    #[arg(long)]
    pub spacing: Option<f32>,

    /// Number of frames the demo simulates.
    #[arg(long)]
    pub frames: Option<u32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(d) = args.culling_distance {
            self.culling.culling_distance = d;
        }
        if let Some(v) = args.disable_renderer_only {
            self.culling.disable_renderer_only = v;
        }
        if let Some(v) = args.update_by_count {
            self.culling.update_by_count = v;
        }
        if let Some(size) = args.grid_size {
            self.demo.grid_size = size;
        }
        if let Some(spacing) = args.spacing {
            self.demo.spacing = spacing;
        }
        if let Some(frames) = args.frames {
            self.demo.frames = frames;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            culling_distance: Some(42.0),
            disable_renderer_only: Some(false),
            log_level: Some("debug".to_string()),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.culling.culling_distance, 42.0);
        assert!(!config.culling.disable_renderer_only);
        assert_eq!(config.debug.log_level, "debug");
        // Non-overridden fields retain defaults
        assert!(!config.culling.update_by_count);
        assert_eq!(config.demo.grid_size, 20);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_cli_parses_flags() {
        let args = CliArgs::try_parse_from([
            "lodcull",
            "--culling-distance",
            "90.5",
            "--update-by-count",
            "true",
            "--grid-size",
            "8",
        ])
        .unwrap();
        assert_eq!(args.culling_distance, Some(90.5));
        assert_eq!(args.update_by_count, Some(true));
        assert_eq!(args.grid_size, Some(8));
        assert!(args.config.is_none());
    }
}
