use std::io::Read;

use crate::error::VfsError;
use crate::provider::{VfsFuture, VfsProvider};

/// Provider fetching assets over HTTP with a blocking GET.
///
/// The request runs when the future is first polled. Any status of 400 or
/// above fails the read with [`VfsError::Load`].
pub struct HttpProvider {
    base_url: String,
}

impl HttpProvider {
    /// Create a provider resolving paths against `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

impl VfsProvider for HttpProvider {
    fn read(&self, path: &str) -> VfsFuture<Vec<u8>> {
        let url = self.url(path);
        let uri = path.to_owned();
        Box::pin(async move {
            log::debug!("GET {url}");
            let response = match ureq::get(&url).call() {
                Ok(response) => response,
                Err(ureq::Error::Status(status, response)) => {
                    return Err(VfsError::Load {
                        uri,
                        status,
                        message: response.status_text().to_owned(),
                    });
                }
                Err(ureq::Error::Transport(transport)) => {
                    return Err(VfsError::Transport {
                        uri,
                        message: transport.to_string(),
                    });
                }
            };

            let mut body = Vec::new();
            response
                .into_reader()
                .read_to_end(&mut body)
                .map_err(|err| VfsError::from_io(&uri, &err))?;
            Ok(body)
        })
    }
}
