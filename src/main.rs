//! hovercube - a rotating cube that reacts to pointer hover
//!
//! Main executable: parses flags, loads the config, opens the window and
//! runs the event loop.

mod app;
mod config;

use std::{env, path::PathBuf};

use anyhow::Result;
use app::{App, AppAction};
use config::{DemoConfig, DEFAULT_CONFIG_PATH};
use hovercube_render::WindowManager;
use tracing::info;

fn main() -> Result<()> {
    // Initialize tracing with WARN level by default (can be overridden via RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    info!("Starting hovercube v{}", env!("CARGO_PKG_VERSION"));

    let cli = CliOptions::parse(env::args().skip(1))?;
    if cli.write_default_config {
        DemoConfig::default().save_to_path(&cli.config)?;
        println!("wrote default config to {}", cli.config.display());
        return Ok(());
    }

    let mut config = DemoConfig::load_from_path(&cli.config);
    cli.apply(&mut config);

    let window_manager = WindowManager::new(&config.window_config())?;
    let mut app = App::new(&config, &window_manager)?;

    window_manager.run(move |event, window| app.handle_event(&event, window) == AppAction::Continue)?;

    info!("hovercube shutting down");
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
struct CliOptions {
    config: PathBuf,
    resolution: Option<(u32, u32)>,
    title: Option<String>,
    no_vsync: bool,
    write_default_config: bool,
}

impl CliOptions {
    fn parse<I: Iterator<Item = String>>(mut args: I) -> Result<Self> {
        let mut opts = CliOptions {
            config: PathBuf::from(DEFAULT_CONFIG_PATH),
            resolution: None,
            title: None,
            no_vsync: false,
            write_default_config: false,
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => {
                    let value = args
                        .next()
                        .ok_or_else(|| anyhow::anyhow!("--config requires a path"))?;
                    opts.config = PathBuf::from(value);
                }
                "--resolution" => {
                    let value = args
                        .next()
                        .ok_or_else(|| anyhow::anyhow!("--resolution requires <W>x<H>"))?;
                    opts.resolution = Some(parse_resolution(&value)?);
                }
                "--title" => {
                    opts.title = Some(
                        args.next()
                            .ok_or_else(|| anyhow::anyhow!("--title requires a value"))?,
                    );
                }
                "--no-vsync" => opts.no_vsync = true,
                "--write-default-config" => opts.write_default_config = true,
                other => tracing::warn!(arg = other, "ignoring unknown argument"),
            }
        }

        Ok(opts)
    }

    fn apply(&self, config: &mut DemoConfig) {
        if let Some((width, height)) = self.resolution {
            config.window.width = width;
            config.window.height = height;
        }
        if let Some(title) = &self.title {
            config.window.title = title.clone();
        }
        if self.no_vsync {
            config.window.vsync = false;
        }
    }
}

fn parse_resolution(value: &str) -> Result<(u32, u32)> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| anyhow::anyhow!("resolution must look like 1280x720, got '{value}'"))?;
    let width: u32 = width.trim().parse()?;
    let height: u32 = height.trim().parse()?;
    if width == 0 || height == 0 {
        anyhow::bail!("resolution must be non-zero, got '{value}'");
    }
    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<CliOptions> {
        CliOptions::parse(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn defaults_without_flags() {
        let opts = parse(&[]).unwrap();
        assert_eq!(opts.config, PathBuf::from(DEFAULT_CONFIG_PATH));
        assert_eq!(opts.resolution, None);
        assert!(!opts.no_vsync);
    }

    #[test]
    fn flags_override_config() {
        let opts = parse(&[
            "--resolution",
            "1600x900",
            "--title",
            "cube",
            "--no-vsync",
            "--config",
            "custom.toml",
        ])
        .unwrap();
        let mut config = DemoConfig::default();
        opts.apply(&mut config);
        assert_eq!((config.window.width, config.window.height), (1600, 900));
        assert_eq!(config.window.title, "cube");
        assert!(!config.window.vsync);
        assert_eq!(opts.config, PathBuf::from("custom.toml"));
    }

    #[test]
    fn write_default_config_flag_targets_config_path() {
        let opts = parse(&["--write-default-config", "--config", "out/demo.toml"]).unwrap();
        assert!(opts.write_default_config);
        assert_eq!(opts.config, PathBuf::from("out/demo.toml"));
        assert!(!parse(&[]).unwrap().write_default_config);
    }

    #[test]
    fn bad_resolution_is_rejected() {
        assert!(parse(&["--resolution", "wide"]).is_err());
        assert!(parse(&["--resolution", "0x10"]).is_err());
        assert!(parse(&["--resolution"]).is_err());
    }
}
