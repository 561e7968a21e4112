/// Texture dimension lookup at the host boundary.
///
/// The pipeline only ever needs pixel dimensions of the atlas, never pixel
/// data. Lookups are probed once per path and cached for the remainder of
/// one document build; the host owns the images themselves.
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub trait TextureLookup {
    /// Pixel (width, height) of the image at `path`, or None when the file
    /// cannot be found or read.
    fn dimensions(&self, path: &str) -> Option<(u32, u32)>;
}

/// Disk-backed lookup resolving relative paths against the scene directory.
pub struct FileTextures {
    base_dir: PathBuf,
    cache: RefCell<HashMap<String, Option<(u32, u32)>>>,
}

impl FileTextures {
    pub fn new(base_dir: &Path) -> Self {
        Self {
            base_dir: base_dir.to_path_buf(),
            cache: RefCell::new(HashMap::new()),
        }
    }
}

impl TextureLookup for FileTextures {
    fn dimensions(&self, path: &str) -> Option<(u32, u32)> {
        if let Some(cached) = self.cache.borrow().get(path) {
            return *cached;
        }
        let resolved = self.base_dir.join(path);
        let dims = image::image_dimensions(&resolved).ok();
        self.cache.borrow_mut().insert(path.to_string(), dims);
        dims
    }
}

/// Fixed-dimension lookup for embedding hosts and tests without image files
/// on disk.
#[derive(Default)]
pub struct StaticTextures {
    dims: HashMap<String, (u32, u32)>,
}

impl StaticTextures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, width: u32, height: u32) {
        self.dims.insert(path.into(), (width, height));
    }
}

impl TextureLookup for StaticTextures {
    fn dimensions(&self, path: &str) -> Option<(u32, u32)> {
        self.dims.get(path).copied()
    }
}
