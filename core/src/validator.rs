//! Business-rule checks for every entity that reaches a payment file.
//!
//! RULE: Each check returns the first violated rule only.
//! RULE: No I/O. Callers fetch, the validator judges.

use crate::{
    amount::{digit_len, exact_yen},
    entities::{
        Bank, BankAccount, BankBranch, BillingAddress, Invoice, PartnerBank,
        PartnerConvenienceStore, Payment, StudentPaymentDetail,
    },
    error::{GenError, GenResult},
    types::{deposit_item_code, FileFormat, PaymentMethod, PAYMENT_PENDING},
};

const BANK_CODE_LIMIT: usize = 4;
const BANK_BRANCH_CODE_LIMIT: usize = 3;
const CONSIGNOR_CODE_LIMIT: usize = 10;
const ACCOUNT_NUMBER_DIGITS: usize = 7;
const MANUFACTURER_CODE_DIGITS: usize = 6;
const COMPANY_CODE_DIGITS: usize = 5;

/// Column widths a payment and its invoice must fit for one file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthCeilings {
    pub sequence_number: usize,
    pub invoice_total: usize,
}

impl LengthCeilings {
    pub const CSV: LengthCeilings = LengthCeilings { sequence_number: 17, invoice_total: 7 };
    pub const TXT: LengthCeilings = LengthCeilings { sequence_number: 20, invoice_total: 10 };

    pub fn for_format(format: FileFormat) -> Self {
        match format {
            FileFormat::Csv => Self::CSV,
            FileFormat::Txt => Self::TXT,
        }
    }
}

fn fail<T>(msg: impl Into<String>) -> GenResult<T> {
    Err(GenError::validation(msg))
}

fn is_digits(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| b.is_ascii_digit())
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PaymentRequestValidator {
    /// Street line 1 may be empty.
    pub optional_street: bool,
}

impl PaymentRequestValidator {
    pub fn new(optional_street: bool) -> Self {
        Self { optional_street }
    }

    // ── Payment / invoice ───────────────────────────────────────

    pub fn validate_payment(
        &self,
        payment: &Payment,
        method: PaymentMethod,
        expected_exported: bool,
        ceilings: LengthCeilings,
    ) -> GenResult<()> {
        if payment.payment_method != method.as_str() {
            return fail("The payment method is not equal to the given payment method parameter");
        }
        if payment.payment_status != PAYMENT_PENDING {
            return fail("The payment status should be PENDING");
        }
        if payment.is_exported != expected_exported {
            return fail(format!("Payment isExported field should be {expected_exported}"));
        }
        if digit_len(payment.payment_sequence_number) > ceilings.sequence_number {
            return fail("The payment sequence number length exceeds the limit");
        }
        Ok(())
    }

    pub fn validate_invoice(
        &self,
        invoice: &Invoice,
        expected_exported: bool,
        ceilings: LengthCeilings,
    ) -> GenResult<()> {
        if invoice.is_exported != expected_exported {
            return fail(format!("Invoice isExported field should be {expected_exported}"));
        }
        if digit_len(exact_yen(invoice.total)?) > ceilings.invoice_total {
            return fail("The invoice total length exceeds the limit");
        }
        Ok(())
    }

    // ── Student ─────────────────────────────────────────────────

    pub fn validate_student_payment_detail(&self, detail: Option<&StudentPaymentDetail>) -> GenResult<()> {
        let Some(detail) = detail else {
            return fail("There is no student payment detail");
        };
        if detail.payer_name.is_empty() {
            return fail("The payer name in student payment detail is empty");
        }
        if detail.payment_method.is_empty() {
            return fail(format!(
                "student: {} payment method in student payment detail is empty",
                detail.student_id
            ));
        }
        Ok(())
    }

    pub fn validate_billing_address(&self, address: Option<&BillingAddress>) -> GenResult<()> {
        let Some(address) = address else {
            return fail("There is no billing address");
        };
        if address.postal_code.is_empty() {
            return fail("The student postal code is empty");
        }
        if address.prefecture_code.is_empty() {
            return fail("the student prefecture code is empty");
        }
        if address.city.is_empty() {
            return fail("The student city is empty");
        }
        if !self.optional_street && address.street1.is_empty() {
            return fail("The student street1 is empty");
        }
        Ok(())
    }

    pub fn validate_bank_account(&self, account: Option<&BankAccount>) -> GenResult<()> {
        let Some(account) = account else {
            return fail("There is no bank account");
        };
        if account.bank_account_number.is_empty() {
            return fail("The student bank account number is empty");
        }
        if account.bank_account_holder.is_empty() {
            return fail("The student bank account holder is empty");
        }
        if account.bank_account_type.is_empty() {
            return fail("The student bank account type is empty");
        }
        if !is_digits(&account.bank_account_number, ACCOUNT_NUMBER_DIGITS) {
            return fail("The bank account number can only accept 7 digit numbers.");
        }
        if !account.is_verified {
            return fail("The bank account is not verified");
        }
        if deposit_item_code(&account.bank_account_type).is_none() {
            return fail(
                "The bank account type doesn't have equivalent int value. Please check the student bank account.",
            );
        }
        Ok(())
    }

    // ── Bank master data ────────────────────────────────────────

    pub fn validate_bank_branch(&self, branch: Option<&BankBranch>) -> GenResult<()> {
        let Some(branch) = branch else {
            return fail("The bank branch does not exist");
        };
        if branch.bank_branch_code.is_empty() {
            return fail("The bank branch code is empty");
        }
        if branch.bank_branch_name.is_empty() {
            return fail("The bank branch name is empty");
        }
        if branch.bank_branch_code.chars().count() > BANK_BRANCH_CODE_LIMIT {
            return fail("The bank branch code length exceeds the limit. Please check the bank branch.");
        }
        Ok(())
    }

    pub fn validate_bank(&self, bank: Option<&Bank>) -> GenResult<()> {
        let Some(bank) = bank else {
            return fail("The bank does not exist");
        };
        if bank.bank_code.is_empty() {
            return fail("The bank code is empty");
        }
        if bank.bank_name.is_empty() {
            return fail("The bank name is empty");
        }
        if bank.bank_code.chars().count() > BANK_CODE_LIMIT {
            return fail("The bank code length exceeds the limit. Please check the bank.");
        }
        Ok(())
    }

    pub fn validate_partner_bank(&self, partner: &PartnerBank) -> GenResult<()> {
        let required = [
            (&partner.consignor_code, "The partner bank consignor code is empty"),
            (&partner.consignor_name, "The partner bank consignor name is empty"),
            (&partner.bank_number, "The partner bank number is empty"),
            (&partner.bank_name, "The partner bank name is empty"),
            (&partner.bank_branch_number, "The partner bank branch number is empty"),
            (&partner.bank_branch_name, "The partner bank branch name is empty"),
            (&partner.deposit_items, "The partner bank deposit item is empty"),
            (&partner.account_number, "The partner bank account number is empty"),
        ];
        if let Some((_, msg)) = required.iter().find(|(value, _)| value.is_empty()) {
            return fail(*msg);
        }

        if partner.bank_number.chars().count() > BANK_CODE_LIMIT {
            return fail("The partner bank number length exceeds the limit. Please check the default partner bank.");
        }
        if partner.bank_branch_number.chars().count() > BANK_BRANCH_CODE_LIMIT {
            return fail(
                "The partner bank branch number length exceeds the limit. Please check the default partner bank.",
            );
        }
        if !is_digits(&partner.account_number, ACCOUNT_NUMBER_DIGITS) {
            return fail("The partner bank account number can only accept 7 digit numbers.");
        }
        if partner.consignor_code.chars().count() > CONSIGNOR_CODE_LIMIT {
            return fail(
                "The partner bank consignor code length exceeds the limit. Please check the default partner bank.",
            );
        }
        if deposit_item_code(&partner.deposit_items).is_none() {
            return fail(
                "The partner bank deposit item name doesn't have equivalent int value. Please check the default partner bank.",
            );
        }
        Ok(())
    }

    // ── Convenience store ───────────────────────────────────────

    pub fn validate_partner_convenience_store(&self, cs: &PartnerConvenienceStore) -> GenResult<()> {
        if cs.company_name.is_empty() {
            return fail("The partner CS company name is empty");
        }
        if cs.manufacturer_code < 0 || digit_len(cs.manufacturer_code) != MANUFACTURER_CODE_DIGITS {
            return fail("The manufacturer_code of the partner CS should be 6 digits");
        }
        if cs.company_code < 0 || digit_len(cs.company_code) != COMPANY_CODE_DIGITS {
            return fail("The company_code of the partner CS should be 5 digits");
        }
        Ok(())
    }
}
