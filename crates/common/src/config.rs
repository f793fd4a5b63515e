//! Viewer configuration.
//!
//! Every field has a default, so a YAML override file only needs the keys it
//! changes. Without a file the viewer runs with the built-in layout: a
//! 1920x1080 window, a 250px console strip and a 400px properties column.

use crate::rect::ScreenRect;
use crate::types::{Color, Shape};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Errors from loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Scene Viewer".into(),
            width: 1920,
            height: 1080,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub console_height: u32,
    pub properties_width: u32,
    /// Distance between the console's bottom edge and the window bottom.
    pub console_bottom_margin: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            console_height: 250,
            properties_width: 400,
            console_bottom_margin: 25,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self { speed: 0.5 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    pub speed: f32,
    pub color: Color,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            speed: 0.5,
            color: Color::WHITE,
        }
    }
}

/// Asset locations, relative to `root`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub root: PathBuf,
    pub default_shader: String,
    pub lit_shader: String,
    pub font: String,
    pub font_size: f32,
    /// Textures bound to the two texture buttons of the properties panel.
    pub swap_textures: [String; 2],
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("assets"),
            default_shader: "Shaders/default.wgsl".into(),
            lit_shader: "Shaders/lit.wgsl".into(),
            font: "Fonts/Arial.ttf".into(),
            font_size: 16.0,
            swap_textures: [
                "Textures/Crate_1.png".into(),
                "Textures/Crate_2.png".into(),
            ],
        }
    }
}

impl AssetConfig {
    pub fn resolve(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }
}

/// One entry of the initial object list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectSpec {
    #[serde(flatten)]
    pub shape: Shape,
    pub texture: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub window: WindowConfig,
    pub layout: LayoutConfig,
    pub camera: CameraConfig,
    pub light: LightConfig,
    pub assets: AssetConfig,
    pub objects: Vec<ObjectSpec>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            layout: LayoutConfig::default(),
            camera: CameraConfig::default(),
            light: LightConfig::default(),
            assets: AssetConfig::default(),
            objects: vec![ObjectSpec {
                shape: Shape::Cube,
                texture: "Textures/Crate_1.png".into(),
            }],
        }
    }
}

impl ViewerConfig {
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text)
    }

    /// Pixel rectangles of the 3D viewport and both UI panels.
    pub fn layout(&self) -> PanelLayout {
        PanelLayout::new(&self.window, &self.layout)
    }
}

/// Screen regions derived from the window size and panel constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelLayout {
    pub viewport: ScreenRect,
    pub console: ScreenRect,
    pub properties: ScreenRect,
}

impl PanelLayout {
    pub fn new(window: &WindowConfig, layout: &LayoutConfig) -> Self {
        let w = window.width as i32;
        let h = window.height as i32;
        let console_h = layout.console_height as i32;
        let props_w = layout.properties_width as i32;
        let margin = layout.console_bottom_margin as i32;
        Self {
            viewport: ScreenRect::new(0, 0, w - props_w, h - console_h),
            console: ScreenRect::new(0, h - console_h - margin, w - props_w, console_h),
            properties: ScreenRect::new(w - props_w, 0, props_w, h),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_layout_matches_fixed_resolution() {
        let layout = ViewerConfig::default().layout();
        assert_eq!(layout.viewport, ScreenRect::new(0, 0, 1520, 830));
        assert_eq!(layout.console, ScreenRect::new(0, 805, 1520, 250));
        assert_eq!(layout.properties, ScreenRect::new(1520, 0, 400, 1080));
    }

    #[test]
    fn default_scene_is_one_crate() {
        let config = ViewerConfig::default();
        assert_eq!(config.objects.len(), 1);
        assert_eq!(config.objects[0].shape, Shape::Cube);
        assert_eq!(config.camera.speed, 0.5);
        assert_eq!(config.light.speed, 0.5);
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = ViewerConfig::from_yaml("window:\n  width: 1280\n  height: 720\n").unwrap();
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.window.title, "Scene Viewer");
        assert_eq!(config.layout, LayoutConfig::default());
        assert_eq!(config.objects.len(), 1);
    }

    #[test]
    fn yaml_object_list() {
        let yaml = r#"
objects:
  - kind: quad
    texture: Textures/Floor.jpg
  - kind: model
    path: Models/Armchair.obj
    texture: Textures/Crate_2.png
"#;
        let config = ViewerConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.objects.len(), 2);
        assert_eq!(config.objects[0].shape, Shape::Quad);
        assert_eq!(
            config.objects[1].shape,
            Shape::Model {
                path: "Models/Armchair.obj".into()
            }
        );
    }

    #[test]
    fn load_from_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "camera:\n  speed: 2.0").unwrap();
        let config = ViewerConfig::load(tmp.path()).unwrap();
        assert_eq!(config.camera.speed, 2.0);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = ViewerConfig::load("/nonexistent/viewer.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn asset_paths_resolve_under_root() {
        let assets = AssetConfig::default();
        assert_eq!(
            assets.resolve("Fonts/Arial.ttf"),
            PathBuf::from("assets/Fonts/Arial.ttf")
        );
    }
}
