use super::{
    datetime_col, datetime_param, decimal_col, opt_datetime_col, opt_decimal_col, placeholders,
    PaymentStore,
};
use crate::{
    entities::{BillItem, BulkPayment, Invoice, InvoiceAdjustment, Payment, PaymentInvoice},
    error::GenResult,
};
use rusqlite::{params, params_from_iter, OptionalExtension, Row};

const PAYMENT_INVOICE_COLUMNS: &str =
    "p.payment_id, p.invoice_id, p.student_id, p.bulk_payment_id, p.payment_method,
     p.payment_status, p.payment_due_date, p.payment_expiry_date, p.payment_sequence_number,
     p.amount, p.is_exported, i.invoice_id, i.student_id, i.total, i.is_exported";

fn payment_invoice_from_row(row: &Row<'_>) -> rusqlite::Result<PaymentInvoice> {
    Ok(PaymentInvoice {
        payment: Payment {
            payment_id: row.get(0)?,
            invoice_id: row.get(1)?,
            student_id: row.get(2)?,
            bulk_payment_id: row.get(3)?,
            payment_method: row.get(4)?,
            payment_status: row.get(5)?,
            payment_due_date: opt_datetime_col(row, 6)?,
            payment_expiry_date: datetime_col(row, 7)?,
            payment_sequence_number: row.get(8)?,
            amount: decimal_col(row, 9)?,
            is_exported: row.get(10)?,
        },
        invoice: Invoice {
            invoice_id: row.get(11)?,
            student_id: row.get(12)?,
            total: decimal_col(row, 13)?,
            is_exported: row.get(14)?,
        },
    })
}

impl PaymentStore {
    // ── Payment / invoice ───────────────────────────────────────

    pub fn insert_invoice(&self, invoice: &Invoice) -> GenResult<()> {
        self.conn.execute(
            "INSERT INTO invoice (invoice_id, student_id, total, is_exported)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                invoice.invoice_id,
                invoice.student_id,
                invoice.total.to_string(),
                invoice.is_exported,
            ],
        )?;
        Ok(())
    }

    pub fn insert_payment(&self, payment: &Payment) -> GenResult<()> {
        self.conn.execute(
            "INSERT INTO payment (
                payment_id, invoice_id, student_id, bulk_payment_id, payment_method,
                payment_status, payment_due_date, payment_expiry_date,
                payment_sequence_number, amount, is_exported
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                payment.payment_id,
                payment.invoice_id,
                payment.student_id,
                payment.bulk_payment_id,
                payment.payment_method,
                payment.payment_status,
                payment.payment_due_date.as_ref().map(datetime_param),
                datetime_param(&payment.payment_expiry_date),
                payment.payment_sequence_number,
                payment.amount.to_string(),
                payment.is_exported,
            ],
        )?;
        Ok(())
    }

    /// Payments with their invoices, ordered by payment sequence number.
    /// Unknown ids are skipped.
    pub fn find_payment_invoice_by_ids(&self, payment_ids: &[String]) -> GenResult<Vec<PaymentInvoice>> {
        if payment_ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT {PAYMENT_INVOICE_COLUMNS}
             FROM payment p JOIN invoice i ON i.invoice_id = p.invoice_id
             WHERE p.payment_id IN ({})
             ORDER BY p.payment_sequence_number ASC, p.payment_id ASC",
            placeholders(payment_ids.len())
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(payment_ids), payment_invoice_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn get_payment(&self, payment_id: &str) -> GenResult<Option<Payment>> {
        let sql = format!(
            "SELECT {PAYMENT_INVOICE_COLUMNS}
             FROM payment p JOIN invoice i ON i.invoice_id = p.invoice_id
             WHERE p.payment_id = ?1"
        );
        let row = self
            .conn
            .query_row(&sql, params![payment_id], payment_invoice_from_row)
            .optional()?;
        Ok(row.map(|pi| pi.payment))
    }

    pub fn get_invoice(&self, invoice_id: &str) -> GenResult<Option<Invoice>> {
        let row = self
            .conn
            .query_row(
                "SELECT invoice_id, student_id, total, is_exported FROM invoice
                 WHERE invoice_id = ?1",
                params![invoice_id],
                |row| {
                    Ok(Invoice {
                        invoice_id: row.get(0)?,
                        student_id: row.get(1)?,
                        total: decimal_col(row, 2)?,
                        is_exported: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    pub fn update_is_exported_by_payment_ids(&self, payment_ids: &[String], exported: bool) -> GenResult<()> {
        if payment_ids.is_empty() {
            return Ok(());
        }
        let sql = format!(
            "UPDATE payment SET is_exported = ? WHERE payment_id IN ({})",
            placeholders(payment_ids.len())
        );
        let mut values: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(exported)];
        values.extend(payment_ids.iter().map(|id| Box::new(id.clone()) as Box<dyn rusqlite::ToSql>));
        self.conn.execute(&sql, params_from_iter(values.iter()))?;
        Ok(())
    }

    pub fn update_is_exported_by_invoice_ids(&self, invoice_ids: &[String], exported: bool) -> GenResult<()> {
        if invoice_ids.is_empty() {
            return Ok(());
        }
        let sql = format!(
            "UPDATE invoice SET is_exported = ? WHERE invoice_id IN ({})",
            placeholders(invoice_ids.len())
        );
        let mut values: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(exported)];
        values.extend(invoice_ids.iter().map(|id| Box::new(id.clone()) as Box<dyn rusqlite::ToSql>));
        self.conn.execute(&sql, params_from_iter(values.iter()))?;
        Ok(())
    }

    // ── Bulk payment ────────────────────────────────────────────

    pub fn insert_bulk_payment(&self, bulk: &BulkPayment) -> GenResult<()> {
        self.conn.execute(
            "INSERT INTO bulk_payment (bulk_payment_id, bulk_payment_status) VALUES (?1, ?2)",
            params![bulk.bulk_payment_id, bulk.bulk_payment_status],
        )?;
        Ok(())
    }

    pub fn get_bulk_payment(&self, bulk_payment_id: &str) -> GenResult<Option<BulkPayment>> {
        let row = self
            .conn
            .query_row(
                "SELECT bulk_payment_id, bulk_payment_status FROM bulk_payment
                 WHERE bulk_payment_id = ?1",
                params![bulk_payment_id],
                |row| {
                    Ok(BulkPayment {
                        bulk_payment_id: row.get(0)?,
                        bulk_payment_status: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    pub fn update_bulk_payment_status_by_ids(&self, status: &str, bulk_payment_ids: &[String]) -> GenResult<()> {
        for id in bulk_payment_ids {
            self.conn.execute(
                "UPDATE bulk_payment SET bulk_payment_status = ?1 WHERE bulk_payment_id = ?2",
                params![status, id],
            )?;
        }
        Ok(())
    }

    // ── Bill items / adjustments ────────────────────────────────

    pub fn insert_bill_item(&self, item: &BillItem) -> GenResult<()> {
        self.conn.execute(
            "INSERT INTO bill_item (
                bill_item_id, invoice_id, billing_item_description, final_price, adjustment_price
            ) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                item.bill_item_id,
                item.invoice_id,
                item.billing_item_description,
                item.final_price.to_string(),
                item.adjustment_price.map(|p| p.to_string()),
            ],
        )?;
        Ok(())
    }

    pub fn find_bill_items_by_invoice_ids(&self, invoice_ids: &[String]) -> GenResult<Vec<BillItem>> {
        if invoice_ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT bill_item_id, invoice_id, billing_item_description, final_price, adjustment_price
             FROM bill_item WHERE invoice_id IN ({}) ORDER BY rowid ASC",
            placeholders(invoice_ids.len())
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let items = stmt
            .query_map(params_from_iter(invoice_ids), |row| {
                Ok(BillItem {
                    bill_item_id: row.get(0)?,
                    invoice_id: row.get(1)?,
                    billing_item_description: row.get(2)?,
                    final_price: decimal_col(row, 3)?,
                    adjustment_price: opt_decimal_col(row, 4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    pub fn insert_invoice_adjustment(&self, adjustment: &InvoiceAdjustment) -> GenResult<()> {
        self.conn.execute(
            "INSERT INTO invoice_adjustment (invoice_adjustment_id, invoice_id, description, amount)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                adjustment.invoice_adjustment_id,
                adjustment.invoice_id,
                adjustment.description,
                adjustment.amount.to_string(),
            ],
        )?;
        Ok(())
    }

    pub fn find_invoice_adjustments_by_invoice_ids(
        &self,
        invoice_ids: &[String],
    ) -> GenResult<Vec<InvoiceAdjustment>> {
        if invoice_ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT invoice_adjustment_id, invoice_id, description, amount
             FROM invoice_adjustment WHERE invoice_id IN ({}) ORDER BY rowid ASC",
            placeholders(invoice_ids.len())
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let adjustments = stmt
            .query_map(params_from_iter(invoice_ids), |row| {
                Ok(InvoiceAdjustment {
                    invoice_adjustment_id: row.get(0)?,
                    invoice_id: row.get(1)?,
                    description: row.get(2)?,
                    amount: decimal_col(row, 3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(adjustments)
    }
}
