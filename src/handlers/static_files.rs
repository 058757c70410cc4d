//! Optional frontend serving.
//!
//! Existing files under the static directory are served as-is; any other
//! path gets `index.html` so client-side routing works.

use std::path::Path;

use tower_http::services::{ServeDir, ServeFile};
use tracing::{info, warn};

pub const INDEX_FILE: &str = "index.html";

pub fn spa_service(static_dir: impl AsRef<Path>) -> ServeDir<ServeFile> {
    let static_dir = static_dir.as_ref();
    let index = static_dir.join(INDEX_FILE);

    if !static_dir.is_dir() {
        warn!(path = %static_dir.display(), "Static files directory not found");
    } else if !index.is_file() {
        warn!(path = %index.display(), "Static index file not found");
    } else {
        info!(path = %static_dir.display(), "Serving static files");
    }

    ServeDir::new(static_dir).fallback(ServeFile::new(index))
}
