use super::{join_url, prefix_folder, ObjectStorage, UploadRequest};
use crate::error::{GenError, GenResult};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub content: Vec<u8>,
    pub content_type: String,
}

/// In-process bucket. Uploads can be made to fail on demand.
#[derive(Debug, Default)]
pub struct MemoryObjectStorage {
    objects: Mutex<BTreeMap<String, StoredObject>>,
    fail_uploads: AtomicBool,
    upload_folder: Option<String>,
    base_url: String,
}

impl MemoryObjectStorage {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            ..Self::default()
        }
    }

    pub fn with_upload_folder(mut self, folder: &str) -> Self {
        self.upload_folder = Some(folder.to_string());
        self
    }

    /// Every upload after this call fails (or succeeds again with `false`).
    pub fn set_fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    pub fn object(&self, object_name: &str) -> Option<StoredObject> {
        self.lock().ok()?.get(object_name).cloned()
    }

    pub fn object_names(&self) -> Vec<String> {
        self.lock()
            .map(|objects| objects.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn remove(&self, object_name: &str) -> Option<StoredObject> {
        self.lock().ok()?.remove(object_name)
    }

    fn lock(&self) -> GenResult<std::sync::MutexGuard<'_, BTreeMap<String, StoredObject>>> {
        self.objects
            .lock()
            .map_err(|_| GenError::Storage("object map lock poisoned".into()))
    }
}

impl ObjectStorage for MemoryObjectStorage {
    fn format_object_name(&self, name: &str) -> String {
        prefix_folder(self.upload_folder.as_deref(), name)
    }

    fn download_url(&self, object_name: &str) -> String {
        join_url(&self.base_url, object_name)
    }

    fn upload_file(&self, request: &UploadRequest<'_>) -> GenResult<()> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(GenError::Storage(format!(
                "upload of {} rejected",
                request.object_name
            )));
        }
        let content = fs::read(request.local_path)?;
        self.lock()?.insert(
            request.object_name.to_string(),
            StoredObject {
                content,
                content_type: request.content_type.to_string(),
            },
        );
        Ok(())
    }

    fn download_file(&self, object_name: &str, dest: &Path) -> GenResult<()> {
        let object = self
            .object(object_name)
            .ok_or_else(|| GenError::Storage(format!("object {object_name} not found")))?;
        fs::write(dest, object.content)?;
        Ok(())
    }

    fn object_exists(&self, object_name: &str) -> GenResult<bool> {
        Ok(self.lock()?.contains_key(object_name))
    }
}
