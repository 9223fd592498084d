//! Records a generated file and flips the export state of everything in it.
//!
//! RULE: Called inside the file's transaction. Any error here rolls the
//! whole file back, including customer codes issued while rendering.

use crate::{
    entities::{BulkPaymentRequestFile, BulkPaymentRequestFilePayment},
    error::{During, GenResult},
    format::PaymentRecord,
    planner::PaymentFileAssoc,
    store::PaymentStore,
    types::BULK_PAYMENT_EXPORTED,
};
use uuid::Uuid;

#[derive(Debug, Default, Clone, Copy)]
pub struct PersistenceGateway;

impl PersistenceGateway {
    pub fn record_file<T: PaymentRecord>(
        &self,
        store: &PaymentStore,
        bulk_payment_request_id: &str,
        file_url: &str,
        file: &PaymentFileAssoc<T>,
    ) -> GenResult<BulkPaymentRequestFile> {
        let row = BulkPaymentRequestFile {
            bulk_payment_request_file_id: file.file_id.clone(),
            bulk_payment_request_id: bulk_payment_request_id.to_string(),
            file_name: file.file_name.clone(),
            file_url: file_url.to_string(),
            file_sequence_number: file.sequence_number,
            total_file_count: file.total_file_count,
            parent_payment_request_file_id: file.parent_file_id.clone(),
            is_downloaded: false,
        };
        store
            .create_request_file(&row)
            .during("create bulk payment request file")?;

        let mut payment_ids = Vec::with_capacity(file.records.len());
        let mut invoice_ids = Vec::with_capacity(file.records.len());
        let mut bulk_payment_ids: Vec<String> = Vec::new();

        for record in &file.records {
            let payment = record.payment();
            store
                .create_request_file_payment(&BulkPaymentRequestFilePayment {
                    bulk_payment_request_file_payment_id: Uuid::new_v4().to_string(),
                    bulk_payment_request_file_id: row.bulk_payment_request_file_id.clone(),
                    payment_id: payment.payment_id.clone(),
                })
                .during("create bulk payment request file payment")?;

            payment_ids.push(payment.payment_id.clone());
            invoice_ids.push(record.invoice().invoice_id.clone());
            if let Some(bulk_id) = &payment.bulk_payment_id {
                if !bulk_payment_ids.contains(bulk_id) {
                    bulk_payment_ids.push(bulk_id.clone());
                }
            }
        }

        store
            .update_is_exported_by_invoice_ids(&invoice_ids, true)
            .during("update invoice export flags")?;
        store
            .update_is_exported_by_payment_ids(&payment_ids, true)
            .during("update payment export flags")?;
        if !bulk_payment_ids.is_empty() {
            store
                .update_bulk_payment_status_by_ids(BULK_PAYMENT_EXPORTED, &bulk_payment_ids)
                .during("update bulk payment status")?;
        }

        Ok(row)
    }
}
