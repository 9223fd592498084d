//! New-customer-code bookkeeping for direct-debit records.
//!
//! RULE: A (student, account number) pair is "new" ("1") exactly once.
//! RULE: A code of "0" never goes back to "1".

use crate::{
    entities::NewCustomerCodeHistory,
    error::{During, GenResult},
    store::PaymentStore,
};
use std::collections::HashSet;
use uuid::Uuid;

pub const NEW_CUSTOMER: &str = "1";
pub const EXISTING_CUSTOMER: &str = "0";

#[derive(Debug, Default)]
pub struct CustomerCodeAssigner {
    /// Account numbers that already carry a code for some student.
    known_accounts: HashSet<String>,
}

impl CustomerCodeAssigner {
    pub fn new(known_accounts: HashSet<String>) -> Self {
        Self { known_accounts }
    }

    /// Seed the known-account set from the store.
    pub fn load(store: &PaymentStore, account_numbers: &[String]) -> GenResult<Self> {
        let known_accounts = store
            .find_customer_codes_by_account_numbers(account_numbers)
            .during("find customer codes by account numbers")?
            .into_iter()
            .map(|h| h.bank_account_number)
            .collect();
        Ok(Self { known_accounts })
    }

    pub fn is_known_account(&self, account_number: &str) -> bool {
        self.known_accounts.contains(account_number)
    }

    /// Create or advance the history for one pair and return its
    /// current state.
    pub fn upsert(
        &mut self,
        store: &PaymentStore,
        student_id: &str,
        bank_account_number: &str,
    ) -> GenResult<NewCustomerCodeHistory> {
        let existing = store
            .find_customer_code(student_id, bank_account_number)
            .during("find customer code")?;

        match existing {
            None => {
                let code = if self.known_accounts.contains(bank_account_number) {
                    EXISTING_CUSTOMER
                } else {
                    NEW_CUSTOMER
                };
                let history = NewCustomerCodeHistory {
                    new_customer_code_history_id: Uuid::new_v4().to_string(),
                    student_id: student_id.to_string(),
                    bank_account_number: bank_account_number.to_string(),
                    new_customer_code: code.to_string(),
                };
                store
                    .create_customer_code(&history)
                    .during("create customer code")?;
                self.known_accounts.insert(bank_account_number.to_string());
                log::debug!("customer code {code} issued for student {student_id}");
                Ok(history)
            }
            Some(history) if history.new_customer_code == EXISTING_CUSTOMER => Ok(history),
            Some(mut history) => {
                store
                    .update_customer_code(&history.new_customer_code_history_id, EXISTING_CUSTOMER)
                    .during("update customer code")?;
                history.new_customer_code = EXISTING_CUSTOMER.to_string();
                Ok(history)
            }
        }
    }
}
