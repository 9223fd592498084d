//! Rows read from and written to the payment store.
//!
//! RULE: Entities are plain data. Business rules live in validator.rs,
//! rendering lives in format/.

use crate::types::EntityId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ── Payment / invoice ───────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub payment_id: EntityId,
    pub invoice_id: EntityId,
    pub student_id: EntityId,
    pub bulk_payment_id: Option<EntityId>,
    pub payment_method: String,
    pub payment_status: String,
    pub payment_due_date: Option<DateTime<Utc>>,
    pub payment_expiry_date: DateTime<Utc>,
    pub payment_sequence_number: i64,
    pub amount: Decimal,
    pub is_exported: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub invoice_id: EntityId,
    pub student_id: EntityId,
    pub total: Decimal,
    pub is_exported: bool,
}

#[derive(Debug, Clone)]
pub struct PaymentInvoice {
    pub payment: Payment,
    pub invoice: Invoice,
}

#[derive(Debug, Clone)]
pub struct BulkPayment {
    pub bulk_payment_id: EntityId,
    pub bulk_payment_status: String,
}

// ── Student billing / banking ───────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct StudentPaymentDetail {
    pub student_payment_detail_id: EntityId,
    pub student_id: EntityId,
    pub payer_name: String,
    pub payer_phone_number: String,
    pub payment_method: String,
}

#[derive(Debug, Clone, Default)]
pub struct BillingAddress {
    pub billing_address_id: EntityId,
    pub student_payment_detail_id: EntityId,
    pub postal_code: String,
    pub prefecture_code: String,
    pub city: String,
    pub street1: String,
    pub street2: String,
}

#[derive(Debug, Clone)]
pub struct StudentBillingDetails {
    pub payment_detail: StudentPaymentDetail,
    pub billing_address: Option<BillingAddress>,
}

#[derive(Debug, Clone, Default)]
pub struct BankAccount {
    pub bank_account_id: EntityId,
    pub student_payment_detail_id: EntityId,
    pub student_id: EntityId,
    pub bank_branch_id: EntityId,
    pub bank_account_number: String,
    pub bank_account_holder: String,
    pub bank_account_type: String,
    pub is_verified: bool,
}

#[derive(Debug, Clone)]
pub struct StudentBankDetails {
    pub payment_detail: StudentPaymentDetail,
    pub bank_account: Option<BankAccount>,
}

#[derive(Debug, Clone, Default)]
pub struct Bank {
    pub bank_id: EntityId,
    pub bank_code: String,
    pub bank_name: String,
    pub bank_name_phonetic: String,
}

#[derive(Debug, Clone, Default)]
pub struct BankBranch {
    pub bank_branch_id: EntityId,
    pub bank_id: EntityId,
    pub bank_branch_code: String,
    pub bank_branch_name: String,
    pub bank_branch_phonetic_name: String,
}

#[derive(Debug, Clone, Default)]
pub struct PartnerBank {
    pub partner_bank_id: EntityId,
    pub consignor_code: String,
    pub consignor_name: String,
    pub bank_number: String,
    pub bank_name: String,
    pub bank_branch_number: String,
    pub bank_branch_name: String,
    pub deposit_items: String,
    pub account_number: String,
    pub is_default: bool,
    pub record_limit: i64,
}

/// Bank, branch and partner bank reachable from one student branch.
#[derive(Debug, Clone)]
pub struct BankRelationMap {
    pub bank: Bank,
    pub bank_branch: BankBranch,
    pub partner_bank: PartnerBank,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomerCodeHistory {
    pub new_customer_code_history_id: EntityId,
    pub student_id: EntityId,
    pub bank_account_number: String,
    pub new_customer_code: String,
}

// ── Convenience store ───────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct PartnerConvenienceStore {
    pub partner_convenience_store_id: EntityId,
    pub manufacturer_code: i64,
    pub company_code: i64,
    pub shop_code: String,
    pub company_name: String,
    pub company_tel_number: String,
    pub postal_code: String,
    pub address1: String,
    pub address2: String,
    /// Free-text message slots 1..=24, in order.
    pub messages: Vec<String>,
}

impl PartnerConvenienceStore {
    pub const MESSAGE_SLOTS: usize = 24;

    /// Message slot `n` (1-based); missing slots read as empty.
    pub fn message(&self, n: usize) -> &str {
        n.checked_sub(1)
            .and_then(|i| self.messages.get(i))
            .map(String::as_str)
            .unwrap_or("")
    }
}

#[derive(Debug, Clone)]
pub struct Prefecture {
    pub prefecture_id: EntityId,
    pub prefecture_code: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct BillItem {
    pub bill_item_id: EntityId,
    pub invoice_id: EntityId,
    /// JSON document; `product_name` is the printed description.
    pub billing_item_description: String,
    pub final_price: Decimal,
    pub adjustment_price: Option<Decimal>,
}

#[derive(Debug, Clone)]
pub struct InvoiceAdjustment {
    pub invoice_adjustment_id: EntityId,
    pub invoice_id: EntityId,
    pub description: String,
    pub amount: Decimal,
}

// ── Request files ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct BulkPaymentRequestFile {
    pub bulk_payment_request_file_id: EntityId,
    pub bulk_payment_request_id: EntityId,
    pub file_name: String,
    pub file_url: String,
    pub file_sequence_number: i64,
    pub total_file_count: i64,
    pub parent_payment_request_file_id: Option<EntityId>,
    pub is_downloaded: bool,
}

#[derive(Debug, Clone)]
pub struct BulkPaymentRequestFilePayment {
    pub bulk_payment_request_file_payment_id: EntityId,
    pub bulk_payment_request_file_id: EntityId,
    pub payment_id: EntityId,
}
