//! Byte rendering of payment files.
//!
//! RULE: Formatters are pure. Everything they print arrives in the
//! record slice or the formatter's own fields.
//! RULE: A value that does not fit its column is a FormatOverflow,
//! never a silent cut.

pub mod billing_message;
pub mod cs_csv;
pub mod dd_txt;

use crate::{
    amount::digit_len,
    entities::{
        BankAccount, BankRelationMap, BillItem, BillingAddress, Invoice, InvoiceAdjustment,
        NewCustomerCodeHistory, Payment, StudentPaymentDetail,
    },
    error::{GenError, GenResult},
    text::StringNormalizer,
};

/// A record that pairs a payment with its invoice.
pub trait PaymentRecord {
    fn payment(&self) -> &Payment;
    fn invoice(&self) -> &Invoice;
}

/// Everything one convenience-store payment needs on paper.
#[derive(Debug, Clone)]
pub struct CsPaymentData {
    pub payment: Payment,
    pub invoice: Invoice,
    pub payment_detail: StudentPaymentDetail,
    pub billing_address: BillingAddress,
    pub bill_items: Vec<BillItem>,
    pub adjustments: Vec<InvoiceAdjustment>,
}

impl PaymentRecord for CsPaymentData {
    fn payment(&self) -> &Payment {
        &self.payment
    }
    fn invoice(&self) -> &Invoice {
        &self.invoice
    }
}

/// Everything one direct-debit payment needs on paper.
#[derive(Debug, Clone)]
pub struct DdPaymentData {
    pub payment: Payment,
    pub invoice: Invoice,
    pub bank_account: BankAccount,
    pub related_bank: BankRelationMap,
    /// Filled in just before rendering.
    pub customer_code: Option<NewCustomerCodeHistory>,
}

impl PaymentRecord for DdPaymentData {
    fn payment(&self) -> &Payment {
        &self.payment
    }
    fn invoice(&self) -> &Invoice {
        &self.invoice
    }
}

/// Width treatment applied to a text field before it is padded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    AsIs,
    Full,
    Half,
}

/// Applies `Width` when normalisation is switched on; a no-op otherwise.
#[derive(Debug, Clone, Default)]
pub struct FieldNormalizer {
    inner: Option<StringNormalizer>,
}

impl FieldNormalizer {
    pub fn new(enabled: bool) -> Self {
        Self {
            inner: enabled.then(StringNormalizer::new),
        }
    }

    pub fn apply(&self, s: &str, width: Width) -> String {
        match (&self.inner, width) {
            (Some(n), Width::Full) => n.to_full_width(s),
            (Some(n), Width::Half) => n.to_half_width(s),
            _ => s.to_string(),
        }
    }
}

/// Decimal rendering of `value`, or an overflow if it is wider than `width`.
pub(crate) fn fit_number(field: &'static str, value: i64, width: usize) -> GenResult<String> {
    let actual = digit_len(value);
    if actual > width {
        return Err(GenError::FormatOverflow { field, width, actual });
    }
    Ok(value.to_string())
}
