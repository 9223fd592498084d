//! Bill breakdown printed in CSV message slots 9 to 24.

use super::{FieldNormalizer, Width};
use crate::{
    amount::format_currency,
    entities::{BillItem, InvoiceAdjustment},
    error::GenResult,
    text::{add_prefix_string_with_limit, limit_string},
};
use rust_decimal::Decimal;

pub const MESSAGE_WIDTH: usize = 24;
pub const MAX_BILLING_LINES: usize = 6;
pub const ADJUSTMENT_KEYWORD: &str = "調整";
pub const OTHERS_LABEL: &str = "その他";
pub const TOTAL_LABEL: &str = "合計";
pub const CURRENT_BILLING_LABEL: &str = "今回ご請求分";

#[derive(Debug, Clone, PartialEq)]
pub struct BillingLine {
    pub description: String,
    pub amount: Decimal,
}

fn product_name(description_json: &str) -> GenResult<String> {
    let value: serde_json::Value = serde_json::from_str(description_json)?;
    Ok(value
        .get("product_name")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string())
}

/// Bill items followed by invoice adjustments, in stored order.
pub fn overall_billing_lines(
    bill_items: &[BillItem],
    adjustments: &[InvoiceAdjustment],
) -> GenResult<Vec<BillingLine>> {
    let mut lines = Vec::with_capacity(bill_items.len() + adjustments.len());
    for item in bill_items {
        let name = product_name(&item.billing_item_description)?;
        let line = match item.adjustment_price {
            Some(price) => BillingLine {
                description: format!("{ADJUSTMENT_KEYWORD} {name}"),
                amount: price,
            },
            None => BillingLine {
                description: name,
                amount: item.final_price,
            },
        };
        lines.push(line);
    }
    lines.extend(adjustments.iter().map(|a| BillingLine {
        description: a.description.clone(),
        amount: a.amount,
    }));
    Ok(lines)
}

/// At most six lines: with more, the first five are kept and the rest
/// fold into one "その他" line. Always padded to six slots.
pub fn filter_billing_lines(mut lines: Vec<BillingLine>) -> Vec<Option<BillingLine>> {
    if lines.len() > MAX_BILLING_LINES {
        let rest = lines.split_off(MAX_BILLING_LINES - 1);
        lines.push(BillingLine {
            description: OTHERS_LABEL.to_string(),
            amount: rest.iter().map(|l| l.amount).sum(),
        });
    }
    let mut slots: Vec<Option<BillingLine>> = lines.into_iter().map(Some).collect();
    slots.resize(MAX_BILLING_LINES, None);
    slots
}

/// `1,500円` right-aligned in a 24-character slot.
pub fn currency_slot(amount: Decimal, normalizer: &FieldNormalizer) -> String {
    let text = format!("{}円", format_currency(amount.round_dp(2)));
    normalizer.apply(
        &add_prefix_string_with_limit(&text, " ", MESSAGE_WIDTH),
        Width::Full,
    )
}

pub fn label_slot(label: &str, normalizer: &FieldNormalizer) -> String {
    limit_string(&normalizer.apply(label, Width::Full), MESSAGE_WIDTH)
}

/// Description and amount slots for each line; empty lines print blank.
pub fn billing_message_slots(lines: &[Option<BillingLine>], normalizer: &FieldNormalizer) -> Vec<String> {
    let mut slots = Vec::with_capacity(lines.len() * 2);
    for line in lines {
        match line {
            Some(line) => {
                slots.push(label_slot(&line.description, normalizer));
                slots.push(currency_slot(line.amount, normalizer));
            }
            None => {
                slots.push(String::new());
                slots.push(String::new());
            }
        }
    }
    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn line(description: &str, amount: Decimal) -> BillingLine {
        BillingLine { description: description.to_string(), amount }
    }

    #[test]
    fn more_than_six_lines_collapse_into_others() {
        let lines: Vec<_> = (1..=8).map(|i| line(&format!("item{i}"), dec!(100))).collect();
        let filtered = filter_billing_lines(lines);
        assert_eq!(filtered.len(), 6);
        assert_eq!(filtered[4].as_ref().unwrap().description, "item5");
        let others = filtered[5].as_ref().unwrap();
        assert_eq!(others.description, OTHERS_LABEL);
        assert_eq!(others.amount, dec!(300));
    }

    #[test]
    fn short_lists_are_padded_with_blanks() {
        let filtered = filter_billing_lines(vec![line("tuition", dec!(1500))]);
        assert_eq!(filtered.len(), 6);
        assert!(filtered[1..].iter().all(Option::is_none));
    }

    #[test]
    fn currency_slot_is_right_aligned() {
        let slot = currency_slot(dec!(1500.00), &FieldNormalizer::new(false));
        assert_eq!(slot.chars().count(), MESSAGE_WIDTH);
        assert!(slot.ends_with("1,500円"));
        assert!(slot.starts_with(' '));
    }

    #[test]
    fn adjusted_bill_items_use_adjustment_price() {
        let items = vec![BillItem {
            bill_item_id: "b1".into(),
            invoice_id: "i1".into(),
            billing_item_description: r#"{"product_name":"Math"}"#.into(),
            final_price: dec!(1000),
            adjustment_price: Some(dec!(-200)),
        }];
        let lines = overall_billing_lines(&items, &[]).unwrap();
        assert_eq!(lines, vec![line("調整 Math", dec!(-200))]);
    }
}
