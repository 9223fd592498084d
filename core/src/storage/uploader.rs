use super::{ObjectStorage, UploadRequest};
use crate::error::GenResult;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Stages one object in a temporary file until it is uploaded.
/// The temporary file is removed on `close` or drop, uploaded or not.
pub struct ObjectUploader<'a> {
    storage: &'a dyn ObjectStorage,
    temp: Option<NamedTempFile>,
    object_name: String,
    content_type: &'static str,
}

impl<'a> ObjectUploader<'a> {
    pub fn new(
        storage: &'a dyn ObjectStorage,
        temp_dir: Option<&Path>,
        object_name: &str,
        content: &[u8],
        content_type: &'static str,
    ) -> GenResult<Self> {
        let mut temp = match temp_dir {
            Some(dir) => NamedTempFile::new_in(dir)?,
            None => NamedTempFile::new()?,
        };
        temp.write_all(content)?;
        temp.flush()?;
        Ok(Self {
            storage,
            temp: Some(temp),
            object_name: storage.format_object_name(object_name),
            content_type,
        })
    }

    pub fn formatted_object_name(&self) -> &str {
        &self.object_name
    }

    pub fn download_url(&self) -> String {
        self.storage.download_url(&self.object_name)
    }

    pub fn temp_path(&self) -> Option<&Path> {
        self.temp.as_ref().map(|t| t.path())
    }

    pub fn upload(&self) -> GenResult<()> {
        let Some(temp) = self.temp.as_ref() else {
            return Err(crate::error::GenError::Storage(format!(
                "{} was already closed",
                self.object_name
            )));
        };
        self.storage.upload_file(&UploadRequest {
            object_name: &self.object_name,
            local_path: temp.path(),
            content_type: self.content_type,
        })
    }

    /// Remove the temporary file, reporting any failure.
    pub fn close(mut self) -> GenResult<()> {
        if let Some(temp) = self.temp.take() {
            temp.close()?;
        }
        Ok(())
    }
}
