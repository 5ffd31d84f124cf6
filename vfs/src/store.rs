use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::rc::Rc;

use crate::error::VfsError;
use crate::path;
use crate::provider::VfsProvider;

/// Fetch-once, cache-forever store of asset payloads keyed by URI.
///
/// URIs are normalized with [`path::normalize`] before lookup. A load either
/// finds the URI cached and returns the cached value without touching the
/// provider or decoder, or issues one provider read, decodes the payload once
/// and caches the result. Failed loads cache nothing, so a later load retries.
///
/// `Clone` is cheap (Rc internals). Not `Send`: the store lives on the thread
/// that drives asset loading.
///
/// Two loads of the same uncached URI that overlap both issue a read, and the
/// later result replaces the earlier one in the cache. Callers that need
/// at-most-once loading deduplicate by their own key on top of the store.
///
/// # Example
///
/// ```ignore
/// let store = AssetStore::new(FileSystemProvider::new("./assets"));
///
/// let source = store.load_text("shader/basic.glsl").await?;
/// let doc = store
///     .load_with("model/cube.tml", |bytes| parse_document(&bytes))
///     .await?;
/// ```
#[derive(Clone)]
pub struct AssetStore {
    inner: Rc<StoreInner>,
}

struct StoreInner {
    provider: Box<dyn VfsProvider>,
    assets: RefCell<HashMap<String, Rc<dyn Any>>>,
}

impl StoreInner {
    fn cached<T: 'static>(&self, key: &str) -> Result<Option<Rc<T>>, VfsError> {
        let Some(asset) = self.assets.borrow().get(key).cloned() else {
            return Ok(None);
        };
        asset
            .downcast::<T>()
            .map(Some)
            .map_err(|_| VfsError::TypeMismatch {
                uri: key.to_owned(),
            })
    }
}

impl AssetStore {
    /// Create an empty store reading through `provider`.
    pub fn new(provider: impl VfsProvider) -> Self {
        Self {
            inner: Rc::new(StoreInner {
                provider: Box::new(provider),
                assets: RefCell::new(HashMap::new()),
            }),
        }
    }

    /// Load the raw bytes of an asset.
    pub fn load(
        &self,
        uri: &str,
    ) -> impl Future<Output = Result<Rc<Vec<u8>>, VfsError>> + use<> {
        self.load_with(uri, Ok::<_, VfsError>)
    }

    /// Load an asset as UTF-8 text.
    pub fn load_text(
        &self,
        uri: &str,
    ) -> impl Future<Output = Result<Rc<String>, VfsError>> + use<> {
        let owned = uri.to_owned();
        self.load_with(uri, move |bytes| {
            String::from_utf8(bytes).map_err(|err| VfsError::Decode {
                uri: owned,
                message: err.to_string(),
            })
        })
    }

    /// Load an asset and decode it with `decode`.
    ///
    /// `decode` runs at most once per successful load and never on a cache
    /// hit. Loading a URI already cached as a different type fails with
    /// [`VfsError::TypeMismatch`].
    pub fn load_with<T, E, F>(
        &self,
        uri: &str,
        decode: F,
    ) -> impl Future<Output = Result<Rc<T>, E>> + use<T, E, F>
    where
        T: 'static,
        E: From<VfsError>,
        F: FnOnce(Vec<u8>) -> Result<T, E> + 'static,
    {
        let inner = self.inner.clone();
        let uri = uri.to_owned();
        async move {
            let key = path::normalize(&uri)?;
            if let Some(asset) = inner.cached::<T>(&key)? {
                log::trace!("Asset cache hit: {key}");
                return Ok(asset);
            }

            log::debug!("Loading asset {key}");
            let bytes = inner.provider.read(&key).await?;
            let asset = Rc::new(decode(bytes)?);
            inner
                .assets
                .borrow_mut()
                .insert(key, asset.clone() as Rc<dyn Any>);
            Ok(asset)
        }
    }

    /// Whether `uri` is cached.
    pub fn contains(&self, uri: &str) -> bool {
        path::normalize(uri).is_ok_and(|key| self.inner.assets.borrow().contains_key(&key))
    }

    /// Number of cached assets.
    pub fn len(&self) -> usize {
        self.inner.assets.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryProvider;
    use pollster::block_on;
    use std::cell::Cell;

    fn store_with(files: &[(&str, &str)]) -> (AssetStore, MemoryProvider) {
        let mem = MemoryProvider::new();
        for (path, text) in files {
            mem.insert_str(*path, text);
        }
        (AssetStore::new(mem.clone()), mem)
    }

    #[test]
    fn second_load_is_served_from_cache() {
        let (store, mem) = store_with(&[("shader/basic.glsl", "src")]);

        let first = block_on(store.load_text("shader/basic.glsl")).unwrap();
        let second = block_on(store.load_text("shader/basic.glsl")).unwrap();

        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(*first, "src");
        assert_eq!(mem.read_count("shader/basic.glsl"), 1);
    }

    #[test]
    fn decode_runs_once() {
        let (store, _) = store_with(&[("a.txt", "42")]);
        let calls = Rc::new(Cell::new(0));

        for _ in 0..3 {
            let calls = calls.clone();
            let value = block_on(store.load_with("a.txt", move |bytes| {
                calls.set(calls.get() + 1);
                Ok::<_, VfsError>(bytes.len())
            }))
            .unwrap();
            assert_eq!(*value, 2);
        }

        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn equivalent_uris_share_an_entry() {
        let (store, mem) = store_with(&[("shader/basic.glsl", "src")]);

        block_on(store.load("shader//basic.glsl")).unwrap();
        block_on(store.load("/shader/./basic.glsl")).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(mem.total_reads(), 1);
        assert!(store.contains("shader/basic.glsl"));
    }

    #[test]
    fn failure_caches_nothing() {
        let (store, mem) = store_with(&[]);

        let err = block_on(store.load("missing.txt")).unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert!(store.is_empty());

        mem.insert_str("missing.txt", "now here");
        let bytes = block_on(store.load("missing.txt")).unwrap();
        assert_eq!(bytes.as_slice(), b"now here");
        assert_eq!(mem.read_count("missing.txt"), 2);
    }

    #[test]
    fn decode_failure_caches_nothing() {
        let mem = MemoryProvider::new();
        mem.insert("bin", vec![0xff, 0xfe]);
        let store = AssetStore::new(mem.clone());

        assert!(matches!(
            block_on(store.load_text("bin")),
            Err(VfsError::Decode { .. })
        ));
        assert!(store.is_empty());

        mem.insert_str("bin", "text");
        assert_eq!(*block_on(store.load_text("bin")).unwrap(), "text");
    }

    #[test]
    fn cached_type_mismatch() {
        let (store, _) = store_with(&[("a.txt", "text")]);

        block_on(store.load_text("a.txt")).unwrap();
        let err = block_on(store.load("a.txt")).unwrap_err();
        assert_eq!(
            err,
            VfsError::TypeMismatch {
                uri: "a.txt".into()
            }
        );
    }

    #[test]
    fn invalid_path_is_rejected() {
        let (store, mem) = store_with(&[]);
        assert!(matches!(
            block_on(store.load("../secret")),
            Err(VfsError::InvalidPath(_))
        ));
        assert_eq!(mem.total_reads(), 0);
    }
}
