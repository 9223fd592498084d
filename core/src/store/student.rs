use super::{placeholders, PaymentStore};
use crate::{
    entities::{
        BankAccount, BillingAddress, StudentBankDetails, StudentBillingDetails,
        StudentPaymentDetail,
    },
    error::GenResult,
};
use rusqlite::{params, params_from_iter, Row};

fn payment_detail_from_row(row: &Row<'_>) -> rusqlite::Result<StudentPaymentDetail> {
    Ok(StudentPaymentDetail {
        student_payment_detail_id: row.get(0)?,
        student_id: row.get(1)?,
        payer_name: row.get(2)?,
        payer_phone_number: row.get(3)?,
        payment_method: row.get(4)?,
    })
}

impl PaymentStore {
    // ── Student payment detail ──────────────────────────────────

    pub fn insert_student_payment_detail(&self, detail: &StudentPaymentDetail) -> GenResult<()> {
        self.conn.execute(
            "INSERT INTO student_payment_detail (
                student_payment_detail_id, student_id, payer_name, payer_phone_number, payment_method
            ) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                detail.student_payment_detail_id,
                detail.student_id,
                detail.payer_name,
                detail.payer_phone_number,
                detail.payment_method,
            ],
        )?;
        Ok(())
    }

    pub fn insert_billing_address(&self, address: &BillingAddress) -> GenResult<()> {
        self.conn.execute(
            "INSERT INTO billing_address (
                billing_address_id, student_payment_detail_id, postal_code,
                prefecture_code, city, street1, street2
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                address.billing_address_id,
                address.student_payment_detail_id,
                address.postal_code,
                address.prefecture_code,
                address.city,
                address.street1,
                address.street2,
            ],
        )?;
        Ok(())
    }

    pub fn insert_bank_account(&self, account: &BankAccount) -> GenResult<()> {
        self.conn.execute(
            "INSERT INTO bank_account (
                bank_account_id, student_payment_detail_id, student_id, bank_branch_id,
                bank_account_number, bank_account_holder, bank_account_type, is_verified
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                account.bank_account_id,
                account.student_payment_detail_id,
                account.student_id,
                account.bank_branch_id,
                account.bank_account_number,
                account.bank_account_holder,
                account.bank_account_type,
                account.is_verified,
            ],
        )?;
        Ok(())
    }

    /// Payment details with their billing address, in insertion order.
    pub fn find_student_billing_by_student_ids(
        &self,
        student_ids: &[String],
    ) -> GenResult<Vec<StudentBillingDetails>> {
        if student_ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT d.student_payment_detail_id, d.student_id, d.payer_name,
                    d.payer_phone_number, d.payment_method,
                    a.billing_address_id, a.postal_code, a.prefecture_code,
                    a.city, a.street1, a.street2
             FROM student_payment_detail d
             LEFT JOIN billing_address a
                ON a.student_payment_detail_id = d.student_payment_detail_id
             WHERE d.student_id IN ({})
             ORDER BY d.rowid ASC, a.rowid ASC",
            placeholders(student_ids.len())
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(student_ids), |row| {
                let payment_detail = payment_detail_from_row(row)?;
                let address_id: Option<String> = row.get(5)?;
                let billing_address = match address_id {
                    Some(billing_address_id) => Some(BillingAddress {
                        billing_address_id,
                        student_payment_detail_id: payment_detail.student_payment_detail_id.clone(),
                        postal_code: row.get(6)?,
                        prefecture_code: row.get(7)?,
                        city: row.get(8)?,
                        street1: row.get(9)?,
                        street2: row.get(10)?,
                    }),
                    None => None,
                };
                Ok(StudentBillingDetails {
                    payment_detail,
                    billing_address,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Payment details with their bank account, in insertion order.
    pub fn find_student_bank_details_by_student_ids(
        &self,
        student_ids: &[String],
    ) -> GenResult<Vec<StudentBankDetails>> {
        if student_ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT d.student_payment_detail_id, d.student_id, d.payer_name,
                    d.payer_phone_number, d.payment_method,
                    b.bank_account_id, b.bank_branch_id, b.bank_account_number,
                    b.bank_account_holder, b.bank_account_type, b.is_verified
             FROM student_payment_detail d
             LEFT JOIN bank_account b
                ON b.student_payment_detail_id = d.student_payment_detail_id
             WHERE d.student_id IN ({})
             ORDER BY d.rowid ASC, b.rowid ASC",
            placeholders(student_ids.len())
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(student_ids), |row| {
                let payment_detail = payment_detail_from_row(row)?;
                let account_id: Option<String> = row.get(5)?;
                let bank_account = match account_id {
                    Some(bank_account_id) => Some(BankAccount {
                        bank_account_id,
                        student_payment_detail_id: payment_detail.student_payment_detail_id.clone(),
                        student_id: payment_detail.student_id.clone(),
                        bank_branch_id: row.get(6)?,
                        bank_account_number: row.get(7)?,
                        bank_account_holder: row.get(8)?,
                        bank_account_type: row.get(9)?,
                        is_verified: row.get(10)?,
                    }),
                    None => None,
                };
                Ok(StudentBankDetails {
                    payment_detail,
                    bank_account,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}
