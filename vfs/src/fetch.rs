use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use crate::error::VfsError;
use crate::provider::{VfsFuture, VfsProvider};

/// Provider fetching assets with the browser `fetch` API.
///
/// Paths are resolved against `base_url`, which may be relative to the page.
/// Any status of 400 or above fails the read with [`VfsError::Load`].
pub struct FetchProvider {
    base_url: String,
}

impl FetchProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

fn transport(uri: &str, value: JsValue) -> VfsError {
    VfsError::Transport {
        uri: uri.to_owned(),
        message: value
            .as_string()
            .unwrap_or_else(|| format!("{value:?}")),
    }
}

impl VfsProvider for FetchProvider {
    fn read(&self, path: &str) -> VfsFuture<Vec<u8>> {
        let url = if self.base_url.is_empty() {
            path.to_owned()
        } else {
            format!("{}/{}", self.base_url.trim_end_matches('/'), path)
        };
        let uri = path.to_owned();
        Box::pin(async move {
            let window = web_sys::window()
                .ok_or_else(|| transport(&uri, JsValue::from_str("no window")))?;

            let response = JsFuture::from(window.fetch_with_str(&url))
                .await
                .map_err(|err| transport(&uri, err))?;
            let response: Response = response
                .dyn_into()
                .map_err(|err| transport(&uri, err))?;

            if response.status() >= 400 {
                return Err(VfsError::Load {
                    uri,
                    status: response.status(),
                    message: response.status_text(),
                });
            }

            let buffer = response
                .array_buffer()
                .map_err(|err| transport(&uri, err))?;
            let buffer = JsFuture::from(buffer)
                .await
                .map_err(|err| transport(&uri, err))?;
            Ok(js_sys::Uint8Array::new(&buffer).to_vec())
        })
    }
}
