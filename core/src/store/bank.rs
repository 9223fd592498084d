use super::{placeholders, PaymentStore};
use crate::{
    entities::{Bank, BankBranch, BankRelationMap, PartnerBank},
    error::GenResult,
};
use rusqlite::{params, params_from_iter};

impl PaymentStore {
    // ── Bank master data ────────────────────────────────────────

    pub fn insert_bank(&self, bank: &Bank) -> GenResult<()> {
        self.conn.execute(
            "INSERT INTO bank (bank_id, bank_code, bank_name, bank_name_phonetic)
             VALUES (?1, ?2, ?3, ?4)",
            params![bank.bank_id, bank.bank_code, bank.bank_name, bank.bank_name_phonetic],
        )?;
        Ok(())
    }

    pub fn insert_bank_branch(&self, branch: &BankBranch) -> GenResult<()> {
        self.conn.execute(
            "INSERT INTO bank_branch (
                bank_branch_id, bank_id, bank_branch_code, bank_branch_name, bank_branch_phonetic_name
            ) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                branch.bank_branch_id,
                branch.bank_id,
                branch.bank_branch_code,
                branch.bank_branch_name,
                branch.bank_branch_phonetic_name,
            ],
        )?;
        Ok(())
    }

    pub fn insert_partner_bank(&self, partner: &PartnerBank) -> GenResult<()> {
        self.conn.execute(
            "INSERT INTO partner_bank (
                partner_bank_id, consignor_code, consignor_name, bank_number, bank_name,
                bank_branch_number, bank_branch_name, deposit_items, account_number,
                is_default, record_limit
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                partner.partner_bank_id,
                partner.consignor_code,
                partner.consignor_name,
                partner.bank_number,
                partner.bank_name,
                partner.bank_branch_number,
                partner.bank_branch_name,
                partner.deposit_items,
                partner.account_number,
                partner.is_default,
                partner.record_limit,
            ],
        )?;
        Ok(())
    }

    /// Link a branch to a partner bank. Mapping order is the scan order
    /// seen by the bank relation resolver.
    pub fn insert_bank_mapping(
        &self,
        bank_mapping_id: &str,
        bank_branch_id: &str,
        partner_bank_id: &str,
    ) -> GenResult<()> {
        self.conn.execute(
            "INSERT INTO bank_mapping (bank_mapping_id, bank_branch_id, partner_bank_id)
             VALUES (?1, ?2, ?3)",
            params![bank_mapping_id, bank_branch_id, partner_bank_id],
        )?;
        Ok(())
    }

    /// Every (branch, bank, partner bank) row for the given branches,
    /// in mapping insertion order.
    pub fn find_related_bank_of_bank_branches(
        &self,
        bank_branch_ids: &[String],
    ) -> GenResult<Vec<BankRelationMap>> {
        if bank_branch_ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT bb.bank_branch_id, bb.bank_id, bb.bank_branch_code, bb.bank_branch_name,
                    bb.bank_branch_phonetic_name,
                    b.bank_id, b.bank_code, b.bank_name, b.bank_name_phonetic,
                    pb.partner_bank_id, pb.consignor_code, pb.consignor_name, pb.bank_number,
                    pb.bank_name, pb.bank_branch_number, pb.bank_branch_name, pb.deposit_items,
                    pb.account_number, pb.is_default, pb.record_limit
             FROM bank_mapping m
             JOIN bank_branch bb ON bb.bank_branch_id = m.bank_branch_id
             JOIN bank b ON b.bank_id = bb.bank_id
             JOIN partner_bank pb ON pb.partner_bank_id = m.partner_bank_id
             WHERE m.bank_branch_id IN ({})
             ORDER BY m.rowid ASC",
            placeholders(bank_branch_ids.len())
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(bank_branch_ids), |row| {
                Ok(BankRelationMap {
                    bank_branch: BankBranch {
                        bank_branch_id: row.get(0)?,
                        bank_id: row.get(1)?,
                        bank_branch_code: row.get(2)?,
                        bank_branch_name: row.get(3)?,
                        bank_branch_phonetic_name: row.get(4)?,
                    },
                    bank: Bank {
                        bank_id: row.get(5)?,
                        bank_code: row.get(6)?,
                        bank_name: row.get(7)?,
                        bank_name_phonetic: row.get(8)?,
                    },
                    partner_bank: PartnerBank {
                        partner_bank_id: row.get(9)?,
                        consignor_code: row.get(10)?,
                        consignor_name: row.get(11)?,
                        bank_number: row.get(12)?,
                        bank_name: row.get(13)?,
                        bank_branch_number: row.get(14)?,
                        bank_branch_name: row.get(15)?,
                        deposit_items: row.get(16)?,
                        account_number: row.get(17)?,
                        is_default: row.get(18)?,
                        record_limit: row.get(19)?,
                    },
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}
