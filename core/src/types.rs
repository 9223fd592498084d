//! Shared primitive types used across the generation engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A stable, unique identifier for any persisted row.
pub type EntityId = String;

/// Identifier of the bulk payment request a generation run belongs to.
pub type RequestId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    ConvenienceStore,
    DirectDebit,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::ConvenienceStore => "CONVENIENCE_STORE",
            PaymentMethod::DirectDebit      => "DIRECT_DEBIT",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const PAYMENT_PENDING: &str = "PAYMENT_PENDING";
pub const BULK_PAYMENT_EXPORTED: &str = "BULK_PAYMENT_EXPORTED";

/// Ordinal table shared by partner-bank deposit items and student
/// bank-account types. The index is the one-digit code written to files.
pub const DEPOSIT_ITEMS: [&str; 3] = ["", "SAVINGS_ACCOUNT", "CHECKING_ACCOUNT"];

/// One-digit deposit-item code for a deposit item / account type name.
pub fn deposit_item_code(name: &str) -> Option<u8> {
    if name.is_empty() {
        return None;
    }
    DEPOSIT_ITEMS
        .iter()
        .rposition(|item| *item == name)
        .map(|index| index as u8)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Txt,
}

impl FileFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            FileFormat::Csv => "csv",
            FileFormat::Txt => "txt",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            FileFormat::Csv => "text/csv",
            FileFormat::Txt => "text/plain",
        }
    }
}
