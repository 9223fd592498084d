//! Validator tests: every rule reports its own message.

mod common;

use chrono::Utc;
use common::{bank, branch, partner_bank, partner_cs};
use payreq_core::{
    entities::{BankAccount, BillingAddress, Invoice, Payment, StudentPaymentDetail},
    error::{ErrorKind, GenError},
    types::{PaymentMethod, PAYMENT_PENDING},
    validator::{LengthCeilings, PaymentRequestValidator},
};
use rust_decimal_macros::dec;

fn message(result: Result<(), GenError>) -> String {
    match result {
        Err(GenError::Validation(msg)) => msg,
        other => panic!("expected a validation error, got {other:?}"),
    }
}

fn payment() -> Payment {
    Payment {
        payment_id: "payment-1".into(),
        invoice_id: "invoice-1".into(),
        student_id: "student-1".into(),
        bulk_payment_id: None,
        payment_method: PaymentMethod::ConvenienceStore.as_str().into(),
        payment_status: PAYMENT_PENDING.into(),
        payment_due_date: None,
        payment_expiry_date: Utc::now(),
        payment_sequence_number: 1,
        amount: dec!(1500),
        is_exported: false,
    }
}

fn invoice() -> Invoice {
    Invoice {
        invoice_id: "invoice-1".into(),
        student_id: "student-1".into(),
        total: dec!(1500),
        is_exported: false,
    }
}

fn account() -> BankAccount {
    BankAccount {
        bank_account_id: "account-1".into(),
        student_payment_detail_id: "detail-1".into(),
        student_id: "student-1".into(),
        bank_branch_id: "branch-1".into(),
        bank_account_number: "1234567".into(),
        bank_account_holder: "ｻﾄｳ ﾀﾛｳ".into(),
        bank_account_type: "SAVINGS_ACCOUNT".into(),
        is_verified: true,
    }
}

fn address() -> BillingAddress {
    BillingAddress {
        billing_address_id: "address-1".into(),
        student_payment_detail_id: "detail-1".into(),
        postal_code: "1500001".into(),
        prefecture_code: "13".into(),
        city: "渋谷区".into(),
        street1: "神宮前1".into(),
        street2: String::new(),
    }
}

// ── Payment / invoice ───────────────────────────────────────────

#[test]
fn valid_payment_and_invoice_pass() {
    let v = PaymentRequestValidator::default();
    v.validate_payment(&payment(), PaymentMethod::ConvenienceStore, false, LengthCeilings::CSV)
        .unwrap();
    v.validate_invoice(&invoice(), false, LengthCeilings::CSV).unwrap();
}

#[test]
fn payment_rules_report_their_messages() {
    let v = PaymentRequestValidator::default();
    let csv = LengthCeilings::CSV;

    let msg = message(v.validate_payment(&payment(), PaymentMethod::DirectDebit, false, csv));
    assert_eq!(msg, "The payment method is not equal to the given payment method parameter");

    let mut p = payment();
    p.payment_status = "PAYMENT_PAID".into();
    let msg = message(v.validate_payment(&p, PaymentMethod::ConvenienceStore, false, csv));
    assert_eq!(msg, "The payment status should be PENDING");

    let mut p = payment();
    p.is_exported = true;
    let msg = message(v.validate_payment(&p, PaymentMethod::ConvenienceStore, false, csv));
    assert_eq!(msg, "Payment isExported field should be false");

    let mut p = payment();
    p.payment_sequence_number = 123_456_789_012_345_678; // 18 digits
    let msg = message(v.validate_payment(&p, PaymentMethod::ConvenienceStore, false, csv));
    assert_eq!(msg, "The payment sequence number length exceeds the limit");
    // The same number fits a direct-debit record.
    p.payment_method = PaymentMethod::DirectDebit.as_str().into();
    v.validate_payment(&p, PaymentMethod::DirectDebit, false, LengthCeilings::TXT)
        .unwrap();
}

#[test]
fn invoice_total_ceiling_depends_on_format() {
    let v = PaymentRequestValidator::default();
    let mut inv = invoice();
    inv.total = dec!(12345678.90); // 8 digits of yen

    let msg = message(v.validate_invoice(&inv, false, LengthCeilings::CSV));
    assert_eq!(msg, "The invoice total length exceeds the limit");
    v.validate_invoice(&inv, false, LengthCeilings::TXT).unwrap();

    let mut exported = invoice();
    exported.is_exported = true;
    let msg = message(v.validate_invoice(&exported, false, LengthCeilings::CSV));
    assert_eq!(msg, "Invoice isExported field should be false");
}

// ── Student ─────────────────────────────────────────────────────

#[test]
fn student_payment_detail_rules() {
    let v = PaymentRequestValidator::default();
    assert_eq!(
        message(v.validate_student_payment_detail(None)),
        "There is no student payment detail"
    );

    let mut detail = StudentPaymentDetail {
        student_id: "student-1".into(),
        payment_method: "CONVENIENCE_STORE".into(),
        ..StudentPaymentDetail::default()
    };
    assert_eq!(
        message(v.validate_student_payment_detail(Some(&detail))),
        "The payer name in student payment detail is empty"
    );

    detail.payer_name = "山田".into();
    detail.payment_method.clear();
    assert_eq!(
        message(v.validate_student_payment_detail(Some(&detail))),
        "student: student-1 payment method in student payment detail is empty"
    );
}

#[test]
fn billing_address_street_is_optional_behind_flag() {
    let mut addr = address();
    addr.street1.clear();

    let strict = PaymentRequestValidator::new(false);
    assert_eq!(
        message(strict.validate_billing_address(Some(&addr))),
        "The student street1 is empty"
    );

    let relaxed = PaymentRequestValidator::new(true);
    relaxed.validate_billing_address(Some(&addr)).unwrap();

    assert_eq!(
        message(relaxed.validate_billing_address(None)),
        "There is no billing address"
    );
    addr.city.clear();
    assert_eq!(
        message(relaxed.validate_billing_address(Some(&addr))),
        "The student city is empty"
    );
}

// ── Bank ────────────────────────────────────────────────────────

#[test]
fn bank_account_rules() {
    let v = PaymentRequestValidator::default();
    v.validate_bank_account(Some(&account())).unwrap();

    assert_eq!(message(v.validate_bank_account(None)), "There is no bank account");

    let mut a = account();
    a.bank_account_number = "12345".into();
    assert_eq!(
        message(v.validate_bank_account(Some(&a))),
        "The bank account number can only accept 7 digit numbers."
    );

    let mut a = account();
    a.is_verified = false;
    assert_eq!(
        message(v.validate_bank_account(Some(&a))),
        "The bank account is not verified"
    );

    let mut a = account();
    a.bank_account_type = "TIME_DEPOSIT".into();
    let msg = message(v.validate_bank_account(Some(&a)));
    assert!(msg.starts_with("The bank account type doesn't have equivalent int value"));
}

#[test]
fn bank_and_branch_code_lengths() {
    let v = PaymentRequestValidator::default();
    v.validate_bank(Some(&bank("bank-1", "0001"))).unwrap();
    v.validate_bank_branch(Some(&branch("branch-1", "bank-1", "101"))).unwrap();

    let msg = message(v.validate_bank(Some(&bank("bank-1", "00001"))));
    assert!(msg.starts_with("The bank code length exceeds the limit"));
    let msg = message(v.validate_bank_branch(Some(&branch("branch-1", "bank-1", "1010"))));
    assert!(msg.starts_with("The bank branch code length exceeds the limit"));
}

#[test]
fn partner_bank_rules() {
    let v = PaymentRequestValidator::default();
    v.validate_partner_bank(&partner_bank("pb-1", "DemoBank", true)).unwrap();

    let mut pb = partner_bank("pb-1", "DemoBank", true);
    pb.account_number = "765432".into();
    assert_eq!(
        message(v.validate_partner_bank(&pb)),
        "The partner bank account number can only accept 7 digit numbers."
    );

    let mut pb = partner_bank("pb-1", "DemoBank", true);
    pb.consignor_code = "12345678901".into();
    assert!(message(v.validate_partner_bank(&pb))
        .starts_with("The partner bank consignor code length exceeds the limit"));

    let mut pb = partner_bank("pb-1", "DemoBank", true);
    pb.deposit_items = "UNKNOWN".into();
    assert!(message(v.validate_partner_bank(&pb))
        .starts_with("The partner bank deposit item name doesn't have equivalent int value"));
}

#[test]
fn partner_convenience_store_code_widths() {
    let v = PaymentRequestValidator::default();
    v.validate_partner_convenience_store(&partner_cs()).unwrap();

    let mut cs = partner_cs();
    cs.manufacturer_code = 12345;
    assert_eq!(
        message(v.validate_partner_convenience_store(&cs)),
        "The manufacturer_code of the partner CS should be 6 digits"
    );

    let mut cs = partner_cs();
    cs.company_code = 123456;
    assert_eq!(
        message(v.validate_partner_convenience_store(&cs)),
        "The company_code of the partner CS should be 5 digits"
    );
}

#[test]
fn validation_errors_are_not_retryable() {
    let v = PaymentRequestValidator::default();
    let err = v.validate_bank_account(None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationFailed);
    assert!(!err.is_retryable());
}
