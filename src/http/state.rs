use std::path::PathBuf;
use std::sync::Arc;

use crate::service::ImgClassifier;

/// Shared state for the axum handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Loaded models, shared read-only across requests.
    pub classifier: Arc<ImgClassifier>,
    /// Root of the static asset tree.
    pub static_dir: PathBuf,
}
