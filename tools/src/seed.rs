//! Small demo dataset: one convenience-store student, one direct-debit
//! student, and the partner master data both need.

use anyhow::Result;
use chrono::Duration;
use payreq_core::{
    clock::Clock,
    entities::{
        Bank, BankAccount, BankBranch, BillingAddress, BulkPayment, Invoice, PartnerBank,
        PartnerConvenienceStore, Payment, Prefecture, StudentPaymentDetail,
    },
    store::PaymentStore,
    types::{PaymentMethod, PAYMENT_PENDING},
};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SeedSummary {
    pub cs_payment_ids: Vec<String>,
    pub dd_payment_ids: Vec<String>,
}

pub fn seed_demo(store: &PaymentStore, clock: &dyn Clock) -> Result<SeedSummary> {
    let now = clock.now_utc();
    let due = now + Duration::days(30);

    store.with_transaction(|store| {
        store.insert_prefecture(&Prefecture {
            prefecture_id: "pref-13".into(),
            prefecture_code: "13".into(),
            name: "東京都".into(),
        })?;
        store.insert_partner_convenience_store(&PartnerConvenienceStore {
            partner_convenience_store_id: "pcs-1".into(),
            manufacturer_code: 123456,
            company_code: 12345,
            shop_code: "001".into(),
            company_name: "デモ学園".into(),
            company_tel_number: "03-1234-5678".into(),
            postal_code: "100-0001".into(),
            address1: "東京都千代田区".into(),
            address2: "千代田1-1".into(),
            messages: vec!["授業料のお支払い".into(), "期日までにお支払いください".into()],
        })?;

        store.insert_bank(&Bank {
            bank_id: "bank-1".into(),
            bank_code: "0001".into(),
            bank_name: "デモ銀行".into(),
            bank_name_phonetic: "ﾃﾞﾓｷﾞﾝｺｳ".into(),
        })?;
        store.insert_bank_branch(&BankBranch {
            bank_branch_id: "branch-1".into(),
            bank_id: "bank-1".into(),
            bank_branch_code: "101".into(),
            bank_branch_name: "本店".into(),
            bank_branch_phonetic_name: "ﾎﾝﾃﾝ".into(),
        })?;
        store.insert_partner_bank(&PartnerBank {
            partner_bank_id: "partner-bank-1".into(),
            consignor_code: "1234567890".into(),
            consignor_name: "ﾃﾞﾓｶﾞｸｴﾝ".into(),
            bank_number: "0001".into(),
            bank_name: "DemoBank".into(),
            bank_branch_number: "101".into(),
            bank_branch_name: "ﾎﾝﾃﾝ".into(),
            deposit_items: "SAVINGS_ACCOUNT".into(),
            account_number: "7654321".into(),
            is_default: true,
            record_limit: 500,
        })?;
        store.insert_bank_mapping("mapping-1", "branch-1", "partner-bank-1")?;
        store.insert_bulk_payment(&BulkPayment {
            bulk_payment_id: "bulk-1".into(),
            bulk_payment_status: "BULK_PAYMENT_PENDING".into(),
        })?;

        // Convenience-store student.
        store.insert_student_payment_detail(&StudentPaymentDetail {
            student_payment_detail_id: "detail-cs".into(),
            student_id: "student-cs".into(),
            payer_name: "山田 花子".into(),
            payer_phone_number: "090-1111-2222".into(),
            payment_method: PaymentMethod::ConvenienceStore.as_str().into(),
        })?;
        store.insert_billing_address(&BillingAddress {
            billing_address_id: "address-cs".into(),
            student_payment_detail_id: "detail-cs".into(),
            postal_code: "150-0001".into(),
            prefecture_code: "13".into(),
            city: "渋谷区".into(),
            street1: "神宮前1-2-3".into(),
            street2: String::new(),
        })?;

        // Direct-debit student.
        store.insert_student_payment_detail(&StudentPaymentDetail {
            student_payment_detail_id: "detail-dd".into(),
            student_id: "student-dd".into(),
            payer_name: "佐藤 太郎".into(),
            payer_phone_number: "090-3333-4444".into(),
            payment_method: PaymentMethod::DirectDebit.as_str().into(),
        })?;
        store.insert_bank_account(&BankAccount {
            bank_account_id: "account-dd".into(),
            student_payment_detail_id: "detail-dd".into(),
            student_id: "student-dd".into(),
            bank_branch_id: "branch-1".into(),
            bank_account_number: "1234567".into(),
            bank_account_holder: "ｻﾄｳ ﾀﾛｳ".into(),
            bank_account_type: "SAVINGS_ACCOUNT".into(),
            is_verified: true,
        })?;

        let mut summary = SeedSummary {
            cs_payment_ids: Vec::new(),
            dd_payment_ids: Vec::new(),
        };
        let demo = [
            ("cs-1", "student-cs", PaymentMethod::ConvenienceStore, Decimal::new(1500, 0)),
            ("cs-2", "student-cs", PaymentMethod::ConvenienceStore, Decimal::new(32000, 0)),
            ("dd-1", "student-dd", PaymentMethod::DirectDebit, Decimal::new(45000, 0)),
        ];
        for (seq, (id, student_id, method, total)) in demo.into_iter().enumerate() {
            let invoice_id = format!("invoice-{id}");
            store.insert_invoice(&Invoice {
                invoice_id: invoice_id.clone(),
                student_id: student_id.into(),
                total,
                is_exported: false,
            })?;
            let payment_id = format!("payment-{id}");
            store.insert_payment(&Payment {
                payment_id: payment_id.clone(),
                invoice_id,
                student_id: student_id.into(),
                bulk_payment_id: Some("bulk-1".into()),
                payment_method: method.as_str().into(),
                payment_status: PAYMENT_PENDING.into(),
                payment_due_date: Some(due),
                payment_expiry_date: due + Duration::days(7),
                payment_sequence_number: seq as i64 + 1,
                amount: total,
                is_exported: false,
            })?;
            match method {
                PaymentMethod::ConvenienceStore => summary.cs_payment_ids.push(payment_id),
                PaymentMethod::DirectDebit => summary.dd_payment_ids.push(payment_id),
            }
        }
        Ok(summary)
    })
    .map_err(Into::into)
}
