//! Convenience-store CSV layout.
//!
//! Per payment: header, invoice control, invoice, then three message
//! rows. One end row closes the file. Every row has 13 columns.
//! The end row counts three rows per payment plus itself; message rows
//! are not counted.

use super::{
    billing_message::{
        billing_message_slots, currency_slot, filter_billing_lines, label_slot,
        overall_billing_lines, CURRENT_BILLING_LABEL, MESSAGE_WIDTH, TOTAL_LABEL,
    },
    fit_number, CsPaymentData, FieldNormalizer, Width,
};
use crate::{
    amount::exact_yen,
    clock::jst_yyyymmdd,
    entities::PartnerConvenienceStore,
    error::{GenError, GenResult},
    text::{add_prefix_string_with_limit, limit_string},
};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::collections::HashMap;

pub const COLUMNS: usize = 13;
pub const NO_DUE_DATE: &str = "99999999";
pub const GUARDIAN_SUFFIX: &str = "・保護者";

pub type CsvRow = Vec<String>;

/// Renders convenience-store files for one partner profile.
pub struct CsCsvFormatter<'a> {
    pub partner: &'a PartnerConvenienceStore,
    /// Prefecture code to printed name.
    pub prefectures: &'a HashMap<String, String>,
    /// `YYYYMMDD` in JST, printed as the creation date.
    pub created_date: String,
    pub billing_message: bool,
    pub guardian_payer_name: bool,
    pub normalizer: FieldNormalizer,
}

/// Printed name of a billing address prefecture. An unknown code is a
/// validation error.
pub fn prefecture_name<'p>(
    prefectures: &'p HashMap<String, String>,
    student_id: &str,
    prefecture_code: &str,
) -> GenResult<&'p str> {
    prefectures
        .get(prefecture_code)
        .map(String::as_str)
        .ok_or_else(|| {
            GenError::validation(format!(
                "student {student_id} with billing details prefecture code {prefecture_code} that does not match prefecture records"
            ))
        })
}

fn row(fields: Vec<String>) -> CsvRow {
    let mut fields = fields;
    fields.resize(COLUMNS, String::new());
    fields
}

impl<'a> CsCsvFormatter<'a> {
    fn text(&self, s: &str, width: Width, limit: usize) -> String {
        limit_string(&self.normalizer.apply(s, width), limit)
    }

    pub fn rows(&self, records: &[CsPaymentData]) -> GenResult<Vec<CsvRow>> {
        let mut rows = Vec::with_capacity(records.len() * 6 + 1);
        let mut total_amount: i64 = 0;

        for record in records {
            total_amount += exact_yen(record.invoice.total)?;

            rows.push(self.header_row());
            rows.push(self.invoice_control_row());
            rows.push(self.invoice_row(record)?);
            rows.push(self.message_row(1));
            if self.billing_message {
                rows.extend(self.billing_message_rows(record)?);
            } else {
                rows.push(self.message_row(2));
                rows.push(self.message_row(3));
            }
        }

        let record_count = (3 * records.len() + 1) as i64;
        rows.push(self.end_row(record_count, total_amount)?);
        Ok(rows)
    }

    pub fn render(&self, records: &[CsPaymentData]) -> GenResult<Vec<u8>> {
        write_csv(&self.rows(records)?)
    }

    // ── Rows ────────────────────────────────────────────────────

    pub fn header_row(&self) -> CsvRow {
        row(vec![
            "1".into(),
            "1".into(),
            limit_string(&self.created_date, 8),
            limit_string(&self.partner.manufacturer_code.to_string(), 6),
            limit_string(&self.partner.company_code.to_string(), 5),
            limit_string(&self.partner.shop_code, 6),
        ])
    }

    pub fn invoice_control_row(&self) -> CsvRow {
        let p = self.partner;
        row(vec![
            "1".into(),
            "3".into(),
            self.text(&p.company_name, Width::Full, 20),
            self.text(&p.company_tel_number, Width::Half, 15),
            self.text(&p.postal_code, Width::Half, 8),
            self.text(&p.address1, Width::Full, 20),
            self.text(&p.address2, Width::Full, 20),
        ])
    }

    pub fn invoice_row(&self, record: &CsPaymentData) -> GenResult<CsvRow> {
        let payment = &record.payment;
        let sequence = fit_number("payment sequence number", payment.payment_sequence_number, 17)?;
        let amount = fit_number("invoice total", exact_yen(record.invoice.total)?, 7)?;

        let due_date = payment
            .payment_due_date
            .map(jst_yyyymmdd)
            .unwrap_or_else(|| NO_DUE_DATE.to_string());
        let expiry_date = jst_yyyymmdd(payment.payment_expiry_date);

        let address = &record.billing_address;
        let prefecture = prefecture_name(
            self.prefectures,
            &record.payment_detail.student_id,
            &address.prefecture_code,
        )?;
        let address1 = format!(
            "{} {} {} {}",
            prefecture, address.city, address.street1, address.street2
        );

        let payer = &record.payment_detail.payer_name;
        let payer_name = if self.guardian_payer_name {
            let name = limit_string(&self.normalizer.apply(payer, Width::Full), 16);
            format!("{name}{}", self.normalizer.apply(GUARDIAN_SUFFIX, Width::Full))
        } else {
            self.text(payer, Width::Full, 20)
        };

        Ok(row(vec![
            "3".into(),
            "1".into(),
            add_prefix_string_with_limit(&sequence, "0", 17),
            limit_string(&self.created_date, 8),
            due_date,
            self.text(&address.postal_code, Width::Half, 8),
            self.text(&address1, Width::Full, 20),
            String::new(),
            self.text(&record.payment_detail.payer_phone_number, Width::Half, 25),
            payer_name,
            amount,
            String::new(),
            expiry_date,
        ]))
    }

    /// Partner message row `n` (1..=3), carrying slots 8n-7 to 8n.
    pub fn message_row(&self, n: usize) -> CsvRow {
        let first = (n - 1) * 8 + 1;
        let mut fields = vec!["3".to_string(), "7".to_string(), n.to_string()];
        fields.extend(
            (first..first + 8)
                .map(|slot| self.text(self.partner.message(slot), Width::Full, MESSAGE_WIDTH)),
        );
        row(fields)
    }

    /// Message rows 2 and 3 filled with the bill breakdown, the invoice
    /// total and the amount billed this time.
    pub fn billing_message_rows(&self, record: &CsPaymentData) -> GenResult<Vec<CsvRow>> {
        let lines = filter_billing_lines(overall_billing_lines(
            &record.bill_items,
            &record.adjustments,
        )?);
        let slots = billing_message_slots(&lines, &self.normalizer);

        let mut second = vec!["3".to_string(), "7".to_string(), "2".to_string()];
        second.extend_from_slice(&slots[..8]);

        let mut third = vec!["3".to_string(), "7".to_string(), "3".to_string()];
        third.extend_from_slice(&slots[8..12]);
        third.push(label_slot(TOTAL_LABEL, &self.normalizer));
        third.push(currency_slot(record.invoice.total, &self.normalizer));
        third.push(label_slot(CURRENT_BILLING_LABEL, &self.normalizer));
        third.push(currency_slot(record.payment.amount, &self.normalizer));

        Ok(vec![row(second), row(third)])
    }

    pub fn end_row(&self, record_count: i64, total_amount: i64) -> GenResult<CsvRow> {
        Ok(row(vec![
            "9".into(),
            fit_number("total number of records", record_count, 8)?,
            fit_number("sum of invoices", total_amount, 10)?,
        ]))
    }
}

// ── Writer ──────────────────────────────────────────────────────

/// Quote a field only when a standard reader would misread it bare:
/// it holds a comma, quote, CR or LF, starts with whitespace, or is `\.`.
pub fn quote_field(field: &str) -> String {
    let needs_quotes = !field.is_empty()
        && (field == r"\."
            || field.contains([',', '"', '\r', '\n'])
            || field.chars().next().is_some_and(char::is_whitespace));
    if needs_quotes {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

pub fn write_csv(rows: &[CsvRow]) -> GenResult<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    for r in rows {
        writer.write_record(r.iter().map(|f| quote_field(f)))?;
    }
    writer.flush()?;
    writer
        .into_inner()
        .map_err(|e| GenError::Io(std::io::Error::new(e.error().kind(), e.error().to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoting_matches_standard_readers() {
        assert_eq!(quote_field(""), "");
        assert_eq!(quote_field("plain"), "plain");
        assert_eq!(quote_field("a,b"), "\"a,b\"");
        assert_eq!(quote_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(quote_field("  1,500円"), "\"  1,500円\"");
        assert_eq!(quote_field("\u{3000}１"), "\"\u{3000}１\"");
    }

    #[test]
    fn rows_are_newline_terminated() {
        let bytes = write_csv(&[row(vec!["9".into(), "1".into(), "0".into()])]).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "9,1,0,,,,,,,,,,\n");
    }
}
