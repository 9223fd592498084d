//! Chooses one partner bank for each student bank branch.
//!
//! RULE: Rows are scanned in arrival order, per branch:
//!   - a branch with a single partner bank uses it, default or not;
//!   - the first default partner bank wins and later rows are ignored;
//!   - with no default at all, the last row scanned wins.
//! The last-wins rule depends on query order and is kept as is.

use crate::entities::BankRelationMap;
use crate::types::EntityId;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct BankRelationResolver;

impl BankRelationResolver {
    pub fn resolve(&self, rows: Vec<BankRelationMap>) -> HashMap<EntityId, BankRelationMap> {
        let mut chosen: HashMap<EntityId, BankRelationMap> = HashMap::new();
        for row in rows {
            let branch_id = row.bank_branch.bank_branch_id.clone();
            if let Some(existing) = chosen.get(&branch_id) {
                if existing.partner_bank.is_default {
                    continue;
                }
            }
            chosen.insert(branch_id, row);
        }
        chosen
    }
}
