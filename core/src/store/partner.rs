use super::PaymentStore;
use crate::{
    entities::{PartnerConvenienceStore, Prefecture},
    error::GenResult,
};
use rusqlite::{params, OptionalExtension};

impl PaymentStore {
    // ── Partner convenience store ───────────────────────────────

    pub fn insert_partner_convenience_store(&self, cs: &PartnerConvenienceStore) -> GenResult<()> {
        self.conn.execute(
            "INSERT INTO partner_convenience_store (
                partner_convenience_store_id, manufacturer_code, company_code, shop_code,
                company_name, company_tel_number, postal_code, address1, address2, messages_json
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                cs.partner_convenience_store_id,
                cs.manufacturer_code,
                cs.company_code,
                cs.shop_code,
                cs.company_name,
                cs.company_tel_number,
                cs.postal_code,
                cs.address1,
                cs.address2,
                serde_json::to_string(&cs.messages)?,
            ],
        )?;
        Ok(())
    }

    /// The partner's convenience store profile, if one is configured.
    pub fn find_partner_convenience_store(&self) -> GenResult<Option<PartnerConvenienceStore>> {
        let row = self
            .conn
            .query_row(
                "SELECT partner_convenience_store_id, manufacturer_code, company_code, shop_code,
                        company_name, company_tel_number, postal_code, address1, address2,
                        messages_json
                 FROM partner_convenience_store ORDER BY rowid ASC LIMIT 1",
                [],
                |row| {
                    let cs = PartnerConvenienceStore {
                        partner_convenience_store_id: row.get(0)?,
                        manufacturer_code: row.get(1)?,
                        company_code: row.get(2)?,
                        shop_code: row.get(3)?,
                        company_name: row.get(4)?,
                        company_tel_number: row.get(5)?,
                        postal_code: row.get(6)?,
                        address1: row.get(7)?,
                        address2: row.get(8)?,
                        messages: Vec::new(),
                    };
                    Ok((cs, row.get::<_, String>(9)?))
                },
            )
            .optional()?;

        match row {
            Some((mut cs, messages_json)) => {
                cs.messages = serde_json::from_str(&messages_json)?;
                Ok(Some(cs))
            }
            None => Ok(None),
        }
    }

    // ── Prefecture ──────────────────────────────────────────────

    pub fn insert_prefecture(&self, prefecture: &Prefecture) -> GenResult<()> {
        self.conn.execute(
            "INSERT INTO prefecture (prefecture_id, prefecture_code, name) VALUES (?1, ?2, ?3)",
            params![prefecture.prefecture_id, prefecture.prefecture_code, prefecture.name],
        )?;
        Ok(())
    }

    pub fn find_all_prefectures(&self) -> GenResult<Vec<Prefecture>> {
        let mut stmt = self.conn.prepare(
            "SELECT prefecture_id, prefecture_code, name FROM prefecture ORDER BY rowid ASC",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Prefecture {
                    prefecture_id: row.get(0)?,
                    prefecture_code: row.get(1)?,
                    name: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}
