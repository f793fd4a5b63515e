//! Shared types for the scene viewer.
//!
//! Everything here is plain data: no GPU, window or file handles.

pub mod config;
pub mod rect;
pub mod types;

pub use config::{
    AssetConfig, CameraConfig, ConfigError, LayoutConfig, LightConfig, ObjectSpec, PanelLayout,
    ViewerConfig, WindowConfig,
};
pub use rect::ScreenRect;
pub use types::{AssetId, Color, Shape, Transform};
