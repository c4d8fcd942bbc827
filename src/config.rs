use std::{fs, path::Path};

use anyhow::Result;
use glam::Vec3;
use hovercube_render::{RendererConfig, WindowConfig};
use hovercube_scene::{Color, DemoSettings};
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const DEFAULT_CONFIG_PATH: &str = "config/hovercube.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct DemoConfig {
    pub window: WindowSection,
    pub camera: CameraSection,
    pub cube: CubeSection,
    pub animation: AnimationSection,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct WindowSection {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    /// Background color as `#rrggbb` or a CSS name.
    pub background: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct CameraSection {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Distance from the cube along +Z.
    pub distance: f32,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct CubeSection {
    pub size: f32,
    pub color: String,
    pub hover_color: String,
    pub rest_color: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct AnimationSection {
    /// Radians per frame around X.
    pub spin_x: f32,
    /// Radians per frame around Y.
    pub spin_y: f32,
}

impl Default for WindowSection {
    fn default() -> Self {
        Self {
            title: "hovercube".to_string(),
            width: 1280,
            height: 720,
            vsync: true,
            background: "#000000".to_string(),
        }
    }
}

impl Default for CameraSection {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            distance: 5.0,
        }
    }
}

impl Default for CubeSection {
    fn default() -> Self {
        Self {
            size: 1.0,
            color: "#00ff00".to_string(),
            hover_color: "hotpink".to_string(),
            rest_color: "green".to_string(),
        }
    }
}

impl Default for AnimationSection {
    fn default() -> Self {
        Self {
            spin_x: 0.01,
            spin_y: 0.01,
        }
    }
}

impl DemoConfig {
    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<DemoConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    DemoConfig::default()
                }
            },
            Err(err) => {
                if path != Path::new(DEFAULT_CONFIG_PATH)
                    || err.kind() != std::io::ErrorKind::NotFound
                {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                }
                DemoConfig::default()
            }
        }
    }

    /// Save configuration to an explicit path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        Ok(())
    }

    pub fn window_config(&self) -> WindowConfig {
        WindowConfig {
            title: self.window.title.clone(),
            width: self.window.width.max(1),
            height: self.window.height.max(1),
            vsync: self.window.vsync,
        }
    }

    pub fn renderer_config(&self) -> RendererConfig {
        RendererConfig {
            width: self.window.width.max(1),
            height: self.window.height.max(1),
            vsync: self.window.vsync,
            clear_color: color_or(&self.window.background, "window.background", Color::BLACK),
        }
    }

    pub fn demo_settings(&self) -> DemoSettings {
        let defaults = DemoSettings::default();
        let camera = &self.camera;
        let (near, far) = if camera.near > 0.0 && camera.far > camera.near {
            (camera.near, camera.far)
        } else {
            warn!(near = camera.near, far = camera.far, "invalid clip planes; using defaults");
            (defaults.near, defaults.far)
        };

        DemoSettings {
            cube_size: positive_or(self.cube.size, "cube.size", defaults.cube_size),
            color: color_or(&self.cube.color, "cube.color", defaults.color),
            hover_color: color_or(&self.cube.hover_color, "cube.hover_color", defaults.hover_color),
            rest_color: color_or(&self.cube.rest_color, "cube.rest_color", defaults.rest_color),
            fov_degrees: if camera.fov_degrees > 0.0 && camera.fov_degrees < 180.0 {
                camera.fov_degrees
            } else {
                warn!(fov = camera.fov_degrees, "field of view out of range; using default");
                defaults.fov_degrees
            },
            near,
            far,
            camera_distance: positive_or(camera.distance, "camera.distance", defaults.camera_distance),
            aspect: self.window.width.max(1) as f32 / self.window.height.max(1) as f32,
            spin: Vec3::new(self.animation.spin_x, self.animation.spin_y, 0.0),
        }
    }
}

fn color_or(value: &str, field: &str, fallback: Color) -> Color {
    match Color::from_css(value) {
        Ok(color) => color,
        Err(err) => {
            warn!(field, %err, "invalid color; using default");
            fallback
        }
    }
}

fn positive_or(value: f32, field: &str, fallback: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        warn!(field, value, "expected a positive number; using default");
        fallback
    }
}
