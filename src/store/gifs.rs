//! GifStore — read-only catalog of default attachment gifs.

use std::sync::Arc;

use crate::backend::BackendClient;
use crate::error::BackendError;
use crate::model::Gif;

const TABLE: &str = "defaultGifs";

pub struct GifStore {
    backend: Arc<BackendClient>,
}

impl GifStore {
    pub fn new(backend: Arc<BackendClient>) -> Self {
        Self { backend }
    }

    /// Every gif in the default catalog.
    pub async fn list(&self) -> Result<Vec<Gif>, BackendError> {
        self.backend.select(TABLE, &[]).await
    }
}
