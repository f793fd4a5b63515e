use crate::AssetError;
use sceneview_common::AssetId;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::Path;

/// Decoded RGBA8 image ready for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TextureData {
    /// Single opaque white texel, bound when an object draws untextured.
    pub fn white() -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: vec![255; 4],
        }
    }

    /// Magenta/black checkerboard used in place of a texture that failed to load.
    pub fn checkerboard(size: u32, cell: u32) -> Self {
        let cell = cell.max(1);
        let mut rgba = Vec::with_capacity((size * size * 4) as usize);
        for y in 0..size {
            for x in 0..size {
                let on = ((x / cell) + (y / cell)) % 2 == 0;
                let texel = if on { [255, 0, 255, 255] } else { [0, 0, 0, 255] };
                rgba.extend_from_slice(&texel);
            }
        }
        Self {
            width: size,
            height: size,
            rgba,
        }
    }

    /// Content hash of dimensions and pixels.
    pub fn content_id(&self) -> AssetId {
        let mut hasher = Sha256::new();
        hasher.update(self.width.to_le_bytes());
        hasher.update(self.height.to_le_bytes());
        hasher.update(&self.rgba);
        let result = hasher.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&result[..8]);
        AssetId(u64::from_le_bytes(bytes))
    }
}

/// Decode an image file into RGBA8.
pub fn load_texture(path: impl AsRef<Path>) -> Result<TextureData, AssetError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(AssetError::NotFound(path.to_path_buf()));
    }
    let image = image::open(path)?.to_rgba8();
    let (width, height) = image.dimensions();
    tracing::debug!("loaded texture {} ({width}x{height})", path.display());
    Ok(TextureData {
        width,
        height,
        rgba: image.into_raw(),
    })
}

/// Like [`load_texture`], but a failure is logged and replaced by a checkerboard.
pub fn load_texture_or_fallback(path: impl AsRef<Path>) -> TextureData {
    let path = path.as_ref();
    match load_texture(path) {
        Ok(data) => data,
        Err(e) => {
            tracing::warn!("texture {} unavailable ({e}); using checkerboard", path.display());
            TextureData::checkerboard(64, 8)
        }
    }
}

/// Content-addressed texture registry.
///
/// Textures are keyed by the hash of their pixels, so two paths with the same
/// image share one entry. Paths map onto those ids for lookup by name.
#[derive(Debug, Clone, Default)]
pub struct TextureLibrary {
    textures: BTreeMap<AssetId, TextureData>,
    by_path: BTreeMap<String, AssetId>,
}

impl TextureLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register decoded texture data under a name and return its id.
    pub fn insert(&mut self, name: impl Into<String>, data: TextureData) -> AssetId {
        let id = data.content_id();
        self.textures.entry(id).or_insert(data);
        self.by_path.insert(name.into(), id);
        id
    }

    /// Load `relative` under `root` (with fallback) unless it is already registered.
    pub fn load(&mut self, root: &Path, relative: &str) -> AssetId {
        if let Some(id) = self.by_path.get(relative) {
            return *id;
        }
        let data = load_texture_or_fallback(root.join(relative));
        self.insert(relative, data)
    }

    pub fn get(&self, id: AssetId) -> Option<&TextureData> {
        self.textures.get(&id)
    }

    pub fn id_for(&self, name: &str) -> Option<AssetId> {
        self.by_path.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (AssetId, &TextureData)> {
        self.textures.iter().map(|(id, data)| (*id, data))
    }

    /// Number of distinct textures.
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_png(path: &Path, color: [u8; 4]) {
        image::RgbaImage::from_pixel(4, 2, image::Rgba(color))
            .save(path)
            .unwrap();
    }

    #[test]
    fn load_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("red.png");
        write_png(&path, [255, 0, 0, 255]);

        let tex = load_texture(&path).unwrap();
        assert_eq!((tex.width, tex.height), (4, 2));
        assert_eq!(tex.rgba.len(), 4 * 2 * 4);
        assert_eq!(&tex.rgba[..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn missing_texture_is_not_found() {
        let err = load_texture("/nonexistent/crate.png").unwrap_err();
        assert!(matches!(err, AssetError::NotFound(_)));
    }

    #[test]
    fn missing_texture_falls_back_to_checkerboard() {
        let tex = load_texture_or_fallback("/nonexistent/crate.png");
        assert_eq!(tex, TextureData::checkerboard(64, 8));
    }

    #[test]
    fn checkerboard_alternates_cells() {
        let tex = TextureData::checkerboard(4, 2);
        assert_eq!(&tex.rgba[0..4], &[255, 0, 255, 255]);
        // x = 2 is the next cell on the first row.
        assert_eq!(&tex.rgba[8..12], &[0, 0, 0, 255]);
    }

    #[test]
    fn identical_textures_share_an_id() {
        let mut lib = TextureLibrary::new();
        let a = lib.insert("a.png", TextureData::white());
        let b = lib.insert("b.png", TextureData::white());
        let c = lib.insert("c.png", TextureData::checkerboard(8, 2));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(lib.len(), 2);
        assert_eq!(lib.id_for("b.png"), Some(a));
        assert!(lib.get(c).is_some());
    }

    #[test]
    fn library_load_reuses_registered_path() {
        let dir = tempfile::tempdir().unwrap();
        write_png(&dir.path().join("crate.png"), [10, 20, 30, 255]);

        let mut lib = TextureLibrary::new();
        let first = lib.load(dir.path(), "crate.png");
        let second = lib.load(dir.path(), "crate.png");
        assert_eq!(first, second);
        assert_eq!(lib.len(), 1);
        assert_eq!(lib.get(first).unwrap().width, 4);
    }
}
