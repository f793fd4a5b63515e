//! Startup asset loading: textures, OBJ models, fonts and shader sources.
//!
//! Assets are read once when the viewer starts. The renderer consumes them
//! by [`AssetId`](sceneview_common::AssetId) or as plain CPU-side data, never
//! by path.

mod model;
mod texture;

pub use model::{ObjMesh, load_obj};
pub use texture::{TextureData, TextureLibrary, load_texture, load_texture_or_fallback};

use std::path::{Path, PathBuf};

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("asset not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("image decode error: {0}")]
    Image(#[from] image::ImageError),
    #[error("OBJ load error: {0}")]
    Obj(#[from] tobj::LoadError),
}

/// Raw TTF/OTF bytes for the UI font.
pub fn load_font(path: impl AsRef<Path>) -> Result<Vec<u8>, AssetError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(AssetError::NotFound(path.to_path_buf()));
    }
    Ok(std::fs::read(path)?)
}

/// WGSL source from `path`, or `builtin` when the file does not exist.
pub fn load_shader_source(path: impl AsRef<Path>, builtin: &str) -> Result<String, AssetError> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::debug!("no shader override at {}, using built-in", path.display());
        return Ok(builtin.to_owned());
    }
    tracing::info!("using shader override {}", path.display());
    Ok(std::fs::read_to_string(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_bytes_are_read_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("font.ttf");
        std::fs::write(&path, [0u8, 1, 0, 0, 42]).unwrap();
        assert_eq!(load_font(&path).unwrap(), vec![0, 1, 0, 0, 42]);
    }

    #[test]
    fn missing_font_is_not_found() {
        assert!(matches!(
            load_font("/nonexistent/Arial.ttf"),
            Err(AssetError::NotFound(_))
        ));
    }

    #[test]
    fn shader_override_wins_over_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("default.wgsl");
        assert_eq!(load_shader_source(&path, "builtin").unwrap(), "builtin");
        std::fs::write(&path, "override").unwrap();
        assert_eq!(load_shader_source(&path, "builtin").unwrap(), "override");
    }
}
