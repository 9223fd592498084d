use super::{datetime_param, PaymentStore};
use crate::{
    entities::{BulkPaymentRequestFile, BulkPaymentRequestFilePayment},
    error::GenResult,
};
use chrono::{DateTime, Utc};
use rusqlite::params;

impl PaymentStore {
    // ── Bulk payment request ────────────────────────────────────

    pub fn insert_bulk_payment_request(
        &self,
        bulk_payment_request_id: &str,
        payment_method: &str,
        created_at: &DateTime<Utc>,
    ) -> GenResult<()> {
        self.conn.execute(
            "INSERT INTO bulk_payment_request (bulk_payment_request_id, payment_method, created_at)
             VALUES (?1, ?2, ?3)",
            params![bulk_payment_request_id, payment_method, datetime_param(created_at)],
        )?;
        Ok(())
    }

    // ── Request files ───────────────────────────────────────────

    pub fn create_request_file(&self, file: &BulkPaymentRequestFile) -> GenResult<()> {
        self.conn.execute(
            "INSERT INTO bulk_payment_request_file (
                bulk_payment_request_file_id, bulk_payment_request_id, file_name, file_url,
                file_sequence_number, total_file_count, parent_payment_request_file_id,
                is_downloaded
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                file.bulk_payment_request_file_id,
                file.bulk_payment_request_id,
                file.file_name,
                file.file_url,
                file.file_sequence_number,
                file.total_file_count,
                file.parent_payment_request_file_id,
                file.is_downloaded,
            ],
        )?;
        Ok(())
    }

    pub fn create_request_file_payment(&self, link: &BulkPaymentRequestFilePayment) -> GenResult<()> {
        self.conn.execute(
            "INSERT INTO bulk_payment_request_file_payment (
                bulk_payment_request_file_payment_id, bulk_payment_request_file_id, payment_id
            ) VALUES (?1, ?2, ?3)",
            params![
                link.bulk_payment_request_file_payment_id,
                link.bulk_payment_request_file_id,
                link.payment_id,
            ],
        )?;
        Ok(())
    }

    /// Files of one request in creation order.
    pub fn request_files_for_request(
        &self,
        bulk_payment_request_id: &str,
    ) -> GenResult<Vec<BulkPaymentRequestFile>> {
        let mut stmt = self.conn.prepare(
            "SELECT bulk_payment_request_file_id, bulk_payment_request_id, file_name, file_url,
                    file_sequence_number, total_file_count, parent_payment_request_file_id,
                    is_downloaded
             FROM bulk_payment_request_file
             WHERE bulk_payment_request_id = ?1
             ORDER BY rowid ASC",
        )?;
        let files = stmt
            .query_map(params![bulk_payment_request_id], |row| {
                Ok(BulkPaymentRequestFile {
                    bulk_payment_request_file_id: row.get(0)?,
                    bulk_payment_request_id: row.get(1)?,
                    file_name: row.get(2)?,
                    file_url: row.get(3)?,
                    file_sequence_number: row.get(4)?,
                    total_file_count: row.get(5)?,
                    parent_payment_request_file_id: row.get(6)?,
                    is_downloaded: row.get(7)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(files)
    }

    pub fn payment_ids_for_request_file(&self, bulk_payment_request_file_id: &str) -> GenResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT payment_id FROM bulk_payment_request_file_payment
             WHERE bulk_payment_request_file_id = ?1
             ORDER BY rowid ASC",
        )?;
        let ids = stmt
            .query_map(params![bulk_payment_request_file_id], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(ids)
    }
}
