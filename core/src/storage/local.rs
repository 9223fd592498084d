use super::{join_url, prefix_folder, ObjectStorage, UploadRequest};
use crate::{
    config::StorageConfig,
    error::{GenError, GenResult},
};
use std::fs;
use std::path::{Path, PathBuf};

/// A bucket backed by a local directory. Object names map to relative
/// paths under `root`.
#[derive(Debug, Clone)]
pub struct LocalObjectStorage {
    root: PathBuf,
    upload_folder: Option<String>,
    base_url: String,
}

impl LocalObjectStorage {
    pub fn new(root: impl Into<PathBuf>, upload_folder: Option<String>, base_url: &str) -> Self {
        Self {
            root: root.into(),
            upload_folder,
            base_url: base_url.to_string(),
        }
    }

    pub fn from_config(config: &StorageConfig) -> GenResult<Self> {
        fs::create_dir_all(&config.root_dir)?;
        Ok(Self::new(
            config.root_dir.clone(),
            config.upload_folder.clone(),
            &config.base_url,
        ))
    }

    fn object_path(&self, object_name: &str) -> GenResult<PathBuf> {
        if object_name.split('/').any(|part| part == ".." || part.is_empty()) {
            return Err(GenError::Storage(format!("invalid object name: {object_name}")));
        }
        Ok(self.root.join(object_name))
    }
}

impl ObjectStorage for LocalObjectStorage {
    fn format_object_name(&self, name: &str) -> String {
        prefix_folder(self.upload_folder.as_deref(), name)
    }

    fn download_url(&self, object_name: &str) -> String {
        join_url(&self.base_url, object_name)
    }

    fn upload_file(&self, request: &UploadRequest<'_>) -> GenResult<()> {
        let dest = self.object_path(request.object_name)?;
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(request.local_path, &dest).map_err(|e| {
            GenError::Storage(format!("upload of {} failed: {e}", request.object_name))
        })?;
        log::debug!("stored {} ({})", dest.display(), request.content_type);
        Ok(())
    }

    fn download_file(&self, object_name: &str, dest: &Path) -> GenResult<()> {
        let src = self.object_path(object_name)?;
        fs::copy(&src, dest)
            .map_err(|e| GenError::Storage(format!("download of {object_name} failed: {e}")))?;
        Ok(())
    }

    fn object_exists(&self, object_name: &str) -> GenResult<bool> {
        Ok(self.object_path(object_name)?.is_file())
    }
}
