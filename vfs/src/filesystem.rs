use std::path::PathBuf;

use crate::error::VfsError;
use crate::provider::{VfsFuture, VfsProvider};

/// Provider reading assets from a directory on disk.
///
/// The root path is joined with the asset path to form the actual filesystem
/// path. I/O is blocking (`std::fs`) inside the returned future, which is fine
/// for the small documents and shader sources the engine loads at startup.
///
/// Path traversal is prevented by the store's path normalization, which
/// rejects `..` segments before they reach the provider.
///
/// # Example
///
/// ```ignore
/// let store = AssetStore::new(FileSystemProvider::new("./assets"));
///
/// // Reads ./assets/shader/basic.glsl
/// let source = store.load_text("shader/basic.glsl").await?;
/// ```
pub struct FileSystemProvider {
    root: PathBuf,
}

impl FileSystemProvider {
    /// Create a provider rooted at the given directory.
    ///
    /// The directory does not need to exist yet; it is only touched on read.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

impl VfsProvider for FileSystemProvider {
    fn read(&self, path: &str) -> VfsFuture<Vec<u8>> {
        let full_path = self.resolve(path);
        let uri = path.to_owned();
        Box::pin(async move {
            log::trace!("Reading {}", full_path.display());
            std::fs::read(&full_path).map_err(|err| VfsError::from_io(&uri, &err))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pollster::block_on;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("glint_vfs_test_{name}"));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn read_existing_file() {
        let dir = temp_dir("read");
        std::fs::create_dir_all(dir.join("shader")).unwrap();
        std::fs::write(dir.join("shader/basic.glsl"), b"hello").unwrap();

        let provider = FileSystemProvider::new(&dir);
        let data = block_on(provider.read("shader/basic.glsl")).unwrap();
        assert_eq!(data, b"hello");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn read_missing_file_is_404() {
        let dir = temp_dir("read_missing");
        let provider = FileSystemProvider::new(&dir);
        let err = block_on(provider.read("nope.txt")).unwrap_err();
        assert_eq!(err, VfsError::not_found("nope.txt"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
