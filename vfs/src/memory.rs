use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use crate::error::VfsError;
use crate::provider::{VfsFuture, VfsProvider};

/// In-memory provider for tests and embedded assets.
///
/// Clones share the same storage, so a provider can be handed to an
/// [`AssetStore`](crate::AssetStore) and still be filled or inspected
/// afterwards. Every call to [`read`](VfsProvider::read) is counted, which
/// lets tests check how many requests a load issued.
///
/// # Example
///
/// ```ignore
/// let mem = MemoryProvider::new();
/// mem.insert_str("shader/basic.glsl", "__VERTEX__ ... __FRAGMENT__ ...");
///
/// let store = AssetStore::new(mem.clone());
/// let source = store.load_text("shader/basic.glsl").await?;
/// assert_eq!(mem.read_count("shader/basic.glsl"), 1);
/// ```
#[derive(Clone, Default)]
pub struct MemoryProvider {
    inner: Rc<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    files: RefCell<HashMap<String, Vec<u8>>>,
    reads: RefCell<HashMap<String, usize>>,
    deferred: Cell<bool>,
}

impl MemoryProvider {
    /// Create an empty in-memory provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a file at the given path.
    ///
    /// The path should use forward slashes and have no leading slash.
    /// Overwrites any existing file at the same path.
    pub fn insert(&self, path: impl Into<String>, data: Vec<u8>) {
        self.inner.files.borrow_mut().insert(path.into(), data);
    }

    /// Insert a UTF-8 text file.
    pub fn insert_str(&self, path: impl Into<String>, text: &str) {
        self.insert(path, text.as_bytes().to_vec());
    }

    /// Remove a file at the given path, returning its data if it existed.
    pub fn remove(&self, path: &str) -> Option<Vec<u8>> {
        self.inner.files.borrow_mut().remove(path)
    }

    /// Make every read yield to the executor once before completing.
    ///
    /// Simulates a real transport, where concurrent loads overlap.
    pub fn set_deferred(&self, deferred: bool) {
        self.inner.deferred.set(deferred);
    }

    /// Number of reads issued for `path`, successful or not.
    pub fn read_count(&self, path: &str) -> usize {
        self.inner.reads.borrow().get(path).copied().unwrap_or(0)
    }

    /// Number of reads issued for any path.
    pub fn total_reads(&self) -> usize {
        self.inner.reads.borrow().values().sum()
    }
}

impl VfsProvider for MemoryProvider {
    fn read(&self, path: &str) -> VfsFuture<Vec<u8>> {
        *self
            .inner
            .reads
            .borrow_mut()
            .entry(path.to_owned())
            .or_default() += 1;

        let inner = self.inner.clone();
        let path = path.to_owned();
        let deferred = inner.deferred.get();
        Box::pin(async move {
            if deferred {
                YieldOnce(false).await;
            }
            let data = inner.files.borrow().get(&path).cloned();
            data.ok_or_else(|| VfsError::not_found(path))
        })
    }
}

/// Returns `Pending` on the first poll and `Ready` on the second.
struct YieldOnce(bool);

impl Future for YieldOnce {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.0 {
            Poll::Ready(())
        } else {
            self.0 = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}
