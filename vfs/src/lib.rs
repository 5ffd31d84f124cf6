//! Asset transport for the Glint engine.
//!
//! Bytes reach the engine through the [`VfsProvider`] trait. The
//! [`AssetStore`] sits on top of one provider and caches every successfully
//! loaded asset by its normalized URI for the lifetime of the store.
//!
//! # Architecture
//!
//! Everything here is single-threaded. Providers return boxed local futures
//! (`Pin<Box<dyn Future>>`, not `Send`) because the browser transport is
//! bound to the main thread, and the store shares its state with `Rc`.
//!
//! # Providers
//!
//! - [`MemoryProvider`] - In-memory storage for tests and embedded assets
//! - [`FileSystemProvider`] - Native filesystem access (native only)
//! - [`HttpProvider`] - Blocking HTTP GET (native only, requires `http` feature)
//! - [`FetchProvider`] - Browser `fetch` (wasm only)
//!
//! Custom providers can implement [`VfsProvider`] for packed archives or other
//! storage backends.

mod error;
#[cfg(target_arch = "wasm32")]
mod fetch;
#[cfg(all(feature = "filesystem", not(target_arch = "wasm32")))]
mod filesystem;
#[cfg(all(feature = "http", not(target_arch = "wasm32")))]
mod http;
mod memory;
pub mod path;
mod provider;
mod store;

pub use error::VfsError;
#[cfg(target_arch = "wasm32")]
pub use fetch::FetchProvider;
#[cfg(all(feature = "filesystem", not(target_arch = "wasm32")))]
pub use filesystem::FileSystemProvider;
#[cfg(all(feature = "http", not(target_arch = "wasm32")))]
pub use http::HttpProvider;
pub use memory::MemoryProvider;
pub use provider::{VfsFuture, VfsProvider};
pub use store::AssetStore;
