//! Direct-debit fixed-width layout. Every record is 120 characters:
//! one header, one data record per payment, one trailer, one end record.
//! Records are joined by "\n"; the end record has no newline after it.

use super::{fit_number, DdPaymentData, FieldNormalizer, Width};
use crate::{
    amount::exact_yen,
    clock::jst_mmdd,
    error::{GenError, GenResult},
    text::{add_prefix_string_with_limit, add_suffix_string_with_limit, repeat_char},
    types::deposit_item_code,
};

pub const RECORD_WIDTH: usize = 120;

#[derive(Debug, Clone, Default)]
pub struct DdTxtFormatter {
    pub normalizer: FieldNormalizer,
}

fn deposit_item(name: &str) -> String {
    deposit_item_code(name)
        .map(|code| code.to_string())
        .unwrap_or_default()
}

impl DdTxtFormatter {
    pub fn new(normalize_fields: bool) -> Self {
        Self {
            normalizer: FieldNormalizer::new(normalize_fields),
        }
    }

    fn half(&self, s: &str) -> String {
        self.normalizer.apply(s, Width::Half)
    }

    fn zero_left(&self, s: &str, width: usize) -> String {
        add_prefix_string_with_limit(&self.half(s), "0", width)
    }

    fn space_right(&self, s: &str, width: usize) -> String {
        add_suffix_string_with_limit(&self.half(s), " ", width)
    }

    pub fn render(&self, records: &[DdPaymentData]) -> GenResult<Vec<u8>> {
        let first = records
            .first()
            .ok_or_else(|| GenError::validation("A direct debit file needs at least one payment"))?;

        let mut lines = Vec::with_capacity(records.len() + 3);
        lines.push(self.header_record(first)?);

        let mut total_amount: i64 = 0;
        for record in records {
            let (line, amount) = self.data_record(record)?;
            total_amount += amount;
            lines.push(line);
        }

        lines.push(self.trailer_record(records.len() as i64, total_amount)?);
        lines.push(self.end_record());
        Ok(lines.join("\n").into_bytes())
    }

    /// Consignor and partner bank of the file, plus the shared due date
    /// taken from the first payment.
    pub fn header_record(&self, first: &DdPaymentData) -> GenResult<String> {
        let due_date = first
            .payment
            .payment_due_date
            .ok_or_else(|| GenError::validation("The payment due date is empty"))?;
        let partner = &first.related_bank.partner_bank;

        Ok([
            "1".to_string(),
            "91".to_string(),
            "0".to_string(),
            self.zero_left(&partner.consignor_code, 10),
            self.space_right(&partner.consignor_name, 40),
            jst_mmdd(due_date),
            add_suffix_string_with_limit(&self.half(&partner.bank_number), "0", 4),
            self.space_right(&partner.bank_name, 15),
            self.zero_left(&partner.bank_branch_number, 3),
            self.space_right(&partner.bank_branch_name, 15),
            add_suffix_string_with_limit(&deposit_item(&partner.deposit_items), " ", 1),
            self.zero_left(&partner.account_number, 7),
            repeat_char(' ', 17),
        ]
        .concat())
    }

    /// One payer line. Returns the line and the yen amount it carries.
    pub fn data_record(&self, record: &DdPaymentData) -> GenResult<(String, i64)> {
        let amount = exact_yen(record.invoice.total)?;
        let sequence = fit_number("payment sequence number", record.payment.payment_sequence_number, 20)?;
        let amount_str = fit_number("invoice total", amount, 10)?;

        let customer_code = record
            .customer_code
            .as_ref()
            .map(|h| h.new_customer_code.as_str())
            .ok_or_else(|| GenError::validation("The new customer code has not been assigned"))?;

        let bank = &record.related_bank.bank;
        let branch = &record.related_bank.bank_branch;
        let account = &record.bank_account;

        let line = [
            "2".to_string(),
            self.zero_left(&bank.bank_code, 4),
            self.space_right(&bank.bank_name_phonetic, 15),
            self.zero_left(&branch.bank_branch_code, 3),
            self.space_right(&branch.bank_branch_phonetic_name, 15),
            repeat_char(' ', 4),
            add_suffix_string_with_limit(&deposit_item(&account.bank_account_type), " ", 1),
            self.zero_left(&account.bank_account_number, 7),
            self.space_right(&account.bank_account_holder, 30),
            add_prefix_string_with_limit(&amount_str, "0", 10),
            add_suffix_string_with_limit(customer_code, " ", 1),
            add_suffix_string_with_limit(&sequence, " ", 20),
            "0".to_string(),
            repeat_char(' ', 8),
        ]
        .concat();
        Ok((line, amount))
    }

    pub fn trailer_record(&self, total_transactions: i64, total_amount: i64) -> GenResult<String> {
        let amount = fit_number("sum of invoices", total_amount, 12)?;
        let count = fit_number("total transactions", total_transactions, 6)?;
        Ok([
            "8".to_string(),
            add_prefix_string_with_limit(&count, "0", 6),
            add_prefix_string_with_limit(&amount, "0", 12),
            repeat_char('0', 6),
            repeat_char('0', 12),
            repeat_char('0', 6),
            repeat_char('0', 12),
            repeat_char(' ', 65),
        ]
        .concat())
    }

    pub fn end_record(&self) -> String {
        format!("9{}", repeat_char(' ', 119))
    }
}

