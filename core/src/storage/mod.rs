//! Object storage seam.
//!
//! RULE: Generators only see `ObjectStorage`. Which bucket sits behind
//! it is decided by the caller.

mod local;
mod memory;
mod uploader;

pub use local::LocalObjectStorage;
pub use memory::MemoryObjectStorage;
pub use uploader::ObjectUploader;

use crate::error::GenResult;
use std::path::Path;

#[derive(Debug, Clone, Copy)]
pub struct UploadRequest<'a> {
    /// Already formatted with `format_object_name`.
    pub object_name: &'a str,
    pub local_path: &'a Path,
    pub content_type: &'a str,
}

pub trait ObjectStorage: Send + Sync {
    /// Final object name, including any configured upload folder.
    fn format_object_name(&self, name: &str) -> String;

    fn download_url(&self, object_name: &str) -> String;

    fn upload_file(&self, request: &UploadRequest<'_>) -> GenResult<()>;

    fn download_file(&self, object_name: &str, dest: &Path) -> GenResult<()>;

    fn object_exists(&self, object_name: &str) -> GenResult<bool>;
}

pub(crate) fn prefix_folder(folder: Option<&str>, name: &str) -> String {
    match folder.map(|f| f.trim_matches('/')).filter(|f| !f.is_empty()) {
        Some(folder) => format!("{folder}/{name}"),
        None => name.to_string(),
    }
}

pub(crate) fn join_url(base_url: &str, object_name: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), object_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folder_prefix_is_optional() {
        assert_eq!(prefix_folder(None, "a.csv"), "a.csv");
        assert_eq!(prefix_folder(Some(""), "a.csv"), "a.csv");
        assert_eq!(prefix_folder(Some("/payments/"), "a.csv"), "payments/a.csv");
    }

    #[test]
    fn urls_do_not_double_slashes() {
        assert_eq!(join_url("https://s.test/", "x/a.csv"), "https://s.test/x/a.csv");
    }
}
