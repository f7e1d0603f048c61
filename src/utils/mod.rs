//! Utility functions and helpers.

pub mod http;

use url::Url;

use crate::error::Result;

/// Join an API path onto a base URL.
///
/// The base is treated as a directory even without a trailing slash, so
/// `http://host/api` + `students` gives `http://host/api/students`.
pub fn endpoint(base: &Url, path: &str) -> Result<Url> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let dir = format!("{}/", base.path());
        base.set_path(&dir);
    }
    Ok(base.join(path.trim_start_matches('/'))?)
}
