//! Finds committed file rows whose object never reached storage.
//!
//! RULE: Read-only. Repairing a gap is left to the caller.

use crate::{
    entities::BulkPaymentRequestFile,
    error::{During, GenResult},
    storage::ObjectStorage,
    store::PaymentStore,
};

/// File rows of `bulk_payment_request_id` with no reachable object.
pub fn reconcile_uploaded_files(
    store: &PaymentStore,
    storage: &dyn ObjectStorage,
    bulk_payment_request_id: &str,
) -> GenResult<Vec<BulkPaymentRequestFile>> {
    let files = store
        .request_files_for_request(bulk_payment_request_id)
        .during("list request files")?;

    let mut missing = Vec::new();
    for file in files {
        let object_name =
            storage.format_object_name(&format!("{bulk_payment_request_id}-{}", file.file_name));
        if !storage.object_exists(&object_name).during("check object")? {
            log::warn!("file {} has no object at {object_name}", file.file_name);
            missing.push(file);
        }
    }
    Ok(missing)
}
