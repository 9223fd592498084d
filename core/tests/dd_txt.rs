//! Direct-debit fixed-width layout tests.

mod common;

use common::{bank, branch, due_at, partner_bank};
use payreq_core::{
    entities::{BankAccount, BankRelationMap, Invoice, NewCustomerCodeHistory, Payment},
    error::GenError,
    format::{
        dd_txt::{DdTxtFormatter, RECORD_WIDTH},
        DdPaymentData,
    },
    types::{PaymentMethod, PAYMENT_PENDING},
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn record(key: &str, total: Decimal, sequence: i64, code: &str) -> DdPaymentData {
    DdPaymentData {
        payment: Payment {
            payment_id: format!("payment-{key}"),
            invoice_id: format!("invoice-{key}"),
            student_id: format!("student-{key}"),
            bulk_payment_id: None,
            payment_method: PaymentMethod::DirectDebit.as_str().into(),
            payment_status: PAYMENT_PENDING.into(),
            payment_due_date: Some(due_at()),
            payment_expiry_date: due_at(),
            payment_sequence_number: sequence,
            amount: total,
            is_exported: false,
        },
        invoice: Invoice {
            invoice_id: format!("invoice-{key}"),
            student_id: format!("student-{key}"),
            total,
            is_exported: false,
        },
        bank_account: BankAccount {
            bank_account_id: format!("account-{key}"),
            student_payment_detail_id: format!("detail-{key}"),
            student_id: format!("student-{key}"),
            bank_branch_id: "branch-1".into(),
            bank_account_number: "1234567".into(),
            bank_account_holder: "ｻﾄｳ ﾀﾛｳ".into(),
            bank_account_type: "SAVINGS_ACCOUNT".into(),
            is_verified: true,
        },
        related_bank: BankRelationMap {
            bank: bank("bank-1", "1"),
            bank_branch: branch("branch-1", "bank-1", "12"),
            partner_bank: partner_bank("partner-1", "DemoBank", true),
        },
        customer_code: Some(NewCustomerCodeHistory {
            new_customer_code_history_id: format!("history-{key}"),
            student_id: format!("student-{key}"),
            bank_account_number: "1234567".into(),
            new_customer_code: code.into(),
        }),
    }
}

fn render(records: &[DdPaymentData]) -> Vec<String> {
    let bytes = DdTxtFormatter::new(false).render(records).unwrap();
    let text = String::from_utf8(bytes).unwrap();
    assert!(!text.ends_with('\n'), "end record has no trailing newline");
    text.split('\n').map(str::to_string).collect()
}

#[test]
fn every_record_is_exactly_120_characters() {
    let lines = render(&[
        record("1", dec!(45000), 1, "1"),
        record("2", dec!(1200.75), 2, "0"),
    ]);
    assert_eq!(lines.len(), 5);
    for line in &lines {
        assert_eq!(line.chars().count(), RECORD_WIDTH, "{line:?}");
    }
    let kinds: String = lines.iter().filter_map(|l| l.chars().next()).collect();
    assert_eq!(kinds, "12289");
}

#[test]
fn header_carries_consignor_and_partner_bank() {
    let lines = render(&[record("1", dec!(45000), 1, "1")]);
    let header: Vec<char> = lines[0].chars().collect();
    let field = |from: usize, len: usize| header[from..from + len].iter().collect::<String>();

    assert_eq!(field(0, 4), "1910");
    assert_eq!(field(4, 10), "1234567890");
    assert!(field(14, 40).starts_with("ﾃﾞﾓｶﾞｸｴﾝ"));
    assert_eq!(field(54, 4), "1101");
    assert_eq!(field(58, 4), "0001");
    assert!(field(62, 15).starts_with("DemoBank"));
    assert_eq!(field(77, 3), "101");
    assert_eq!(field(95, 1), "1");
    assert_eq!(field(96, 7), "7654321");
}

#[test]
fn data_record_pads_codes_and_amount() {
    let lines = render(&[record("1", dec!(1200.75), 42, "1")]);
    let data: Vec<char> = lines[1].chars().collect();
    let field = |from: usize, len: usize| data[from..from + len].iter().collect::<String>();

    assert_eq!(field(0, 1), "2");
    assert_eq!(field(1, 4), "0001");
    assert_eq!(field(20, 3), "012");
    assert_eq!(field(42, 1), "1");
    assert_eq!(field(43, 7), "1234567");
    assert!(field(50, 30).starts_with("ｻﾄｳ ﾀﾛｳ"));
    assert_eq!(field(80, 10), "0000001200");
    assert_eq!(field(90, 1), "1");
    assert_eq!(field(91, 20).trim_end(), "42");
    assert_eq!(field(111, 1), "0");
}

#[test]
fn trailer_totals_count_and_amount() {
    let lines = render(&[
        record("1", dec!(45000), 1, "1"),
        record("2", dec!(1200.75), 2, "0"),
        record("3", dec!(300), 3, "0"),
    ]);
    let trailer = &lines[4];
    assert_eq!(&trailer[..1], "8");
    assert_eq!(&trailer[1..7], "000003");
    assert_eq!(&trailer[7..19], "000000046500");
    assert_eq!(&trailer[19..55], "0".repeat(36));
    assert_eq!(lines[5], format!("9{}", " ".repeat(119)));
}

#[test]
fn normalized_text_fields_become_half_width() {
    let mut r = record("1", dec!(1000), 1, "1");
    r.bank_account.bank_account_holder = "サトウ　タロウ".into();
    let bytes = DdTxtFormatter::new(true).render(&[r]).unwrap();
    let text = String::from_utf8(bytes).unwrap();
    let data: String = text.split('\n').nth(1).unwrap().chars().skip(50).take(30).collect();
    assert!(data.starts_with("ｻﾄｳ ﾀﾛｳ"), "{data:?}");
}

#[test]
fn missing_due_date_fails_the_header() {
    let mut r = record("1", dec!(1000), 1, "1");
    r.payment.payment_due_date = None;
    match DdTxtFormatter::new(false).render(&[r]) {
        Err(GenError::Validation(msg)) => assert_eq!(msg, "The payment due date is empty"),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn unassigned_customer_code_is_rejected() {
    let mut r = record("1", dec!(1000), 1, "1");
    r.customer_code = None;
    assert!(matches!(
        DdTxtFormatter::new(false).render(&[r]),
        Err(GenError::Validation(_))
    ));
}

#[test]
fn oversized_sequence_number_overflows() {
    let mut r = record("1", dec!(1000), 1, "1");
    r.payment.payment_sequence_number = i64::MAX; // 19 digits fit
    DdTxtFormatter::new(false).render(&[r.clone()]).unwrap();

    r.invoice.total = dec!(12345678901);
    let err = DdTxtFormatter::new(false).render(&[r]).unwrap_err();
    assert!(matches!(err, GenError::FormatOverflow { width: 10, actual: 11, .. }));
}
