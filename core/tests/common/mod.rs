//! Shared fixture: an in-memory store with migrations applied, an
//! in-memory bucket, a pinned clock and seeding helpers.

#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use payreq_core::{
    clock::FixedClock,
    config::GeneratorConfig,
    entities::{
        Bank, BankAccount, BankBranch, BillingAddress, BulkPayment, Invoice, PartnerBank,
        PartnerConvenienceStore, Payment, Prefecture, StudentPaymentDetail,
    },
    generator::{GenerationContext, PaymentRequest, RequestDates},
    storage::MemoryObjectStorage,
    store::PaymentStore,
    types::{PaymentMethod, PAYMENT_PENDING},
};
use rust_decimal::Decimal;

pub const BASE_URL: &str = "https://storage.test";
pub const BULK_PAYMENT_ID: &str = "bulk-1";

/// 2026-10-01 12:00 JST.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 1, 3, 0, 0).unwrap()
}

/// 2026-11-01 09:00 JST.
pub fn due_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 11, 1, 0, 0, 0).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub struct Fixture {
    pub store: PaymentStore,
    pub storage: MemoryObjectStorage,
    pub config: GeneratorConfig,
    pub clock: FixedClock,
}

impl Fixture {
    pub fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        let store = PaymentStore::in_memory().expect("in-memory store");
        store.migrate().expect("migrate");
        store
            .insert_bulk_payment(&BulkPayment {
                bulk_payment_id: BULK_PAYMENT_ID.into(),
                bulk_payment_status: "BULK_PAYMENT_PENDING".into(),
            })
            .expect("bulk payment");
        let config = GeneratorConfig::default_test();
        Self {
            store,
            storage: MemoryObjectStorage::new(BASE_URL),
            config,
            clock: FixedClock::new(now()),
        }
    }

    pub fn ctx(&self) -> GenerationContext<'_> {
        GenerationContext {
            store: &self.store,
            storage: &self.storage,
            config: &self.config,
            clock: &self.clock,
        }
    }

    // ── Convenience store ───────────────────────────────────────

    pub fn seed_cs_partner(&self) {
        self.store
            .insert_prefecture(&Prefecture {
                prefecture_id: "pref-13".into(),
                prefecture_code: "13".into(),
                name: "東京都".into(),
            })
            .unwrap();
        self.store
            .insert_partner_convenience_store(&partner_cs())
            .unwrap();
    }

    pub fn add_cs_student(&self, student_id: &str) {
        let detail_id = format!("detail-{student_id}");
        self.store
            .insert_student_payment_detail(&StudentPaymentDetail {
                student_payment_detail_id: detail_id.clone(),
                student_id: student_id.into(),
                payer_name: "山田 花子".into(),
                payer_phone_number: "0901112222".into(),
                payment_method: PaymentMethod::ConvenienceStore.as_str().into(),
            })
            .unwrap();
        self.store
            .insert_billing_address(&BillingAddress {
                billing_address_id: format!("address-{student_id}"),
                student_payment_detail_id: detail_id,
                postal_code: "1500001".into(),
                prefecture_code: "13".into(),
                city: "渋谷区".into(),
                street1: "神宮前1".into(),
                street2: String::new(),
            })
            .unwrap();
    }

    // ── Direct debit ────────────────────────────────────────────

    pub fn seed_dd_bank(&self) {
        self.store.insert_bank(&bank("bank-1", "0001")).unwrap();
        self.store
            .insert_bank_branch(&branch("branch-1", "bank-1", "101"))
            .unwrap();
        self.store
            .insert_partner_bank(&partner_bank("partner-1", "DemoBank", true))
            .unwrap();
        self.store
            .insert_bank_mapping("mapping-1", "branch-1", "partner-1")
            .unwrap();
    }

    pub fn add_dd_student(&self, student_id: &str, branch_id: &str, account_number: &str) {
        let detail_id = format!("detail-{student_id}");
        self.store
            .insert_student_payment_detail(&StudentPaymentDetail {
                student_payment_detail_id: detail_id.clone(),
                student_id: student_id.into(),
                payer_name: "佐藤 太郎".into(),
                payer_phone_number: "0903334444".into(),
                payment_method: PaymentMethod::DirectDebit.as_str().into(),
            })
            .unwrap();
        self.store
            .insert_bank_account(&BankAccount {
                bank_account_id: format!("account-{student_id}"),
                student_payment_detail_id: detail_id,
                student_id: student_id.into(),
                bank_branch_id: branch_id.into(),
                bank_account_number: account_number.into(),
                bank_account_holder: "ｻﾄｳ ﾀﾛｳ".into(),
                bank_account_type: "SAVINGS_ACCOUNT".into(),
                is_verified: true,
            })
            .unwrap();
    }

    // ── Payments ────────────────────────────────────────────────

    /// Insert an unexported pending payment and its invoice.
    /// Returns the payment id.
    pub fn add_payment(
        &self,
        key: &str,
        student_id: &str,
        method: PaymentMethod,
        total: Decimal,
        sequence_number: i64,
    ) -> String {
        let invoice_id = format!("invoice-{key}");
        let payment_id = format!("payment-{key}");
        self.store
            .insert_invoice(&Invoice {
                invoice_id: invoice_id.clone(),
                student_id: student_id.into(),
                total,
                is_exported: false,
            })
            .unwrap();
        self.store
            .insert_payment(&Payment {
                payment_id: payment_id.clone(),
                invoice_id,
                student_id: student_id.into(),
                bulk_payment_id: Some(BULK_PAYMENT_ID.into()),
                payment_method: method.as_str().into(),
                payment_status: PAYMENT_PENDING.into(),
                payment_due_date: Some(due_at()),
                payment_expiry_date: due_at() + chrono::Duration::days(7),
                payment_sequence_number: sequence_number,
                amount: total,
                is_exported: false,
            })
            .unwrap();
        payment_id
    }
}

pub fn cs_request(request_id: &str, payment_ids: Vec<String>) -> PaymentRequest {
    PaymentRequest {
        bulk_payment_request_id: request_id.into(),
        payment_ids,
        method: PaymentMethod::ConvenienceStore,
        dates: RequestDates::ConvenienceStore {
            due_from: date(2026, 11, 1),
            due_until: date(2026, 11, 30),
        },
    }
}

pub fn dd_request(request_id: &str, payment_ids: Vec<String>) -> PaymentRequest {
    PaymentRequest {
        bulk_payment_request_id: request_id.into(),
        payment_ids,
        method: PaymentMethod::DirectDebit,
        dates: RequestDates::DirectDebit {
            due_date: date(2026, 11, 27),
        },
    }
}

// ── Master data builders ────────────────────────────────────────

pub fn partner_cs() -> PartnerConvenienceStore {
    PartnerConvenienceStore {
        partner_convenience_store_id: "pcs-1".into(),
        manufacturer_code: 123456,
        company_code: 12345,
        shop_code: "001".into(),
        company_name: "デモ学園".into(),
        company_tel_number: "0312345678".into(),
        postal_code: "1000001".into(),
        address1: "東京都千代田区".into(),
        address2: "千代田1".into(),
        messages: Vec::new(),
    }
}

pub fn bank(bank_id: &str, bank_code: &str) -> Bank {
    Bank {
        bank_id: bank_id.into(),
        bank_code: bank_code.into(),
        bank_name: "デモ銀行".into(),
        bank_name_phonetic: "ﾃﾞﾓｷﾞﾝｺｳ".into(),
    }
}

pub fn branch(branch_id: &str, bank_id: &str, code: &str) -> BankBranch {
    BankBranch {
        bank_branch_id: branch_id.into(),
        bank_id: bank_id.into(),
        bank_branch_code: code.into(),
        bank_branch_name: "本店".into(),
        bank_branch_phonetic_name: "ﾎﾝﾃﾝ".into(),
    }
}

pub fn partner_bank(partner_bank_id: &str, bank_name: &str, is_default: bool) -> PartnerBank {
    PartnerBank {
        partner_bank_id: partner_bank_id.into(),
        consignor_code: "1234567890".into(),
        consignor_name: "ﾃﾞﾓｶﾞｸｴﾝ".into(),
        bank_number: "0001".into(),
        bank_name: bank_name.into(),
        bank_branch_number: "101".into(),
        bank_branch_name: "ﾎﾝﾃﾝ".into(),
        deposit_items: "SAVINGS_ACCOUNT".into(),
        account_number: "7654321".into(),
        is_default,
        record_limit: 2,
    }
}
