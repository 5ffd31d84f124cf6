use std::future::Future;
use std::pin::Pin;

use crate::VfsError;

/// A boxed local future returning a `Result`.
///
/// Not `Send`: providers may hold browser handles, and the whole loading
/// pipeline runs on the thread that owns the graphics context.
pub type VfsFuture<T> = Pin<Box<dyn Future<Output = Result<T, VfsError>>>>;

/// Trait for asset transports.
///
/// # Path Contract
///
/// Paths passed to [`read`](VfsProvider::read) are already normalized by the
/// [`AssetStore`](crate::AssetStore): forward slashes, no leading or trailing
/// slashes, no `..` or `.` segments. Errors should name that path as their URI.
pub trait VfsProvider: 'static {
    /// Read the entire contents of the asset at the given path.
    fn read(&self, path: &str) -> VfsFuture<Vec<u8>>;
}
