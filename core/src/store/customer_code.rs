use super::{placeholders, PaymentStore};
use crate::{entities::NewCustomerCodeHistory, error::GenResult};
use rusqlite::{params, params_from_iter, OptionalExtension, Row};

const COLUMNS: &str =
    "new_customer_code_history_id, student_id, bank_account_number, new_customer_code";

fn history_from_row(row: &Row<'_>) -> rusqlite::Result<NewCustomerCodeHistory> {
    Ok(NewCustomerCodeHistory {
        new_customer_code_history_id: row.get(0)?,
        student_id: row.get(1)?,
        bank_account_number: row.get(2)?,
        new_customer_code: row.get(3)?,
    })
}

impl PaymentStore {
    // ── New customer code history ───────────────────────────────

    pub fn find_customer_codes_by_student_ids(
        &self,
        student_ids: &[String],
    ) -> GenResult<Vec<NewCustomerCodeHistory>> {
        self.find_customer_codes_where("student_id", student_ids)
    }

    pub fn find_customer_codes_by_account_numbers(
        &self,
        account_numbers: &[String],
    ) -> GenResult<Vec<NewCustomerCodeHistory>> {
        self.find_customer_codes_where("bank_account_number", account_numbers)
    }

    fn find_customer_codes_where(
        &self,
        column: &'static str,
        values: &[String],
    ) -> GenResult<Vec<NewCustomerCodeHistory>> {
        if values.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT {COLUMNS} FROM new_customer_code_history
             WHERE {column} IN ({}) ORDER BY rowid ASC",
            placeholders(values.len())
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(values), history_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn find_customer_code(
        &self,
        student_id: &str,
        bank_account_number: &str,
    ) -> GenResult<Option<NewCustomerCodeHistory>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM new_customer_code_history
             WHERE student_id = ?1 AND bank_account_number = ?2"
        );
        let row = self
            .conn
            .query_row(&sql, params![student_id, bank_account_number], history_from_row)
            .optional()?;
        Ok(row)
    }

    pub fn create_customer_code(&self, history: &NewCustomerCodeHistory) -> GenResult<()> {
        self.conn.execute(
            "INSERT INTO new_customer_code_history (
                new_customer_code_history_id, student_id, bank_account_number, new_customer_code
            ) VALUES (?1, ?2, ?3, ?4)",
            params![
                history.new_customer_code_history_id,
                history.student_id,
                history.bank_account_number,
                history.new_customer_code,
            ],
        )?;
        Ok(())
    }

    pub fn update_customer_code(&self, history_id: &str, new_customer_code: &str) -> GenResult<()> {
        self.conn.execute(
            "UPDATE new_customer_code_history SET new_customer_code = ?1
             WHERE new_customer_code_history_id = ?2",
            params![new_customer_code, history_id],
        )?;
        Ok(())
    }
}
