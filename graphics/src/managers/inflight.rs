//! Single-flight memoization of async loads.

use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::rc::Rc;

use futures::FutureExt;
use futures::future::{LocalBoxFuture, Shared};

use crate::error::GraphicsError;

/// A load that any number of callers can await.
pub type SharedLoad<V> = Shared<LocalBoxFuture<'static, Result<Rc<V>, GraphicsError>>>;

/// Maps keys to loads, finished or in flight.
///
/// The first request for a key starts the load and registers it before it
/// is ever polled, so later requests join the same load. A failed load
/// removes its entry; the next request starts over.
pub struct InflightCache<K, V> {
    entries: Rc<RefCell<HashMap<K, SharedLoad<V>>>>,
}

impl<K, V> Default for InflightCache<K, V> {
    fn default() -> Self {
        Self {
            entries: Rc::default(),
        }
    }
}

impl<K, V> InflightCache<K, V>
where
    K: Eq + Hash + Clone + 'static,
    V: 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Join the load for `key`, starting it with `start` if there is none.
    pub fn get_or_load<F, Fut>(&self, key: K, start: F) -> SharedLoad<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, GraphicsError>> + 'static,
    {
        if let Some(load) = self.entries.borrow().get(&key) {
            return load.clone();
        }

        let entries = Rc::downgrade(&self.entries);
        let failed_key = key.clone();
        let load = start();
        let load = async move {
            let result = load.await.map(Rc::new);
            if result.is_err()
                && let Some(entries) = entries.upgrade()
            {
                entries.borrow_mut().remove(&failed_key);
            }
            result
        }
        .boxed_local()
        .shared();

        self.entries.borrow_mut().insert(key, load.clone());
        load
    }

    /// The value for `key` if its load has finished successfully.
    pub fn get(&self, key: &K) -> Option<Rc<V>> {
        self.entries
            .borrow()
            .get(key)
            .and_then(|load| load.peek().cloned())
            .and_then(Result::ok)
    }

    /// Whether a load for `key` is registered, finished or not.
    pub fn contains(&self, key: &K) -> bool {
        self.entries.borrow().contains_key(key)
    }

    /// Number of registered loads.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
