use bigdecimal::{BigDecimal, Zero};
use serde::Serialize;

use super::invoice::InvoiceItem;
use super::money::{decimal, serialize_money};

/// 由明细推导的合计, 精确十进制, 与求和顺序无关
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    #[serde(serialize_with = "serialize_money")]
    pub subtotal: BigDecimal,
    #[serde(serialize_with = "serialize_money")]
    pub tax_amount: BigDecimal,
    #[serde(serialize_with = "serialize_money")]
    pub total: BigDecimal,
}

impl Totals {
    pub fn from_items(items: &[InvoiceItem]) -> Self {
        let hundred = BigDecimal::from(100);
        let mut subtotal = BigDecimal::zero();
        let mut tax_amount = BigDecimal::zero();

        for item in items {
            let line = decimal(item.qty) * decimal(item.rate);
            tax_amount += &line * decimal(item.tax_percent) / &hundred;
            subtotal += line;
        }

        let total = &subtotal + &tax_amount;
        Self {
            subtotal,
            tax_amount,
            total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(qty: f64, rate: f64, tax: f64) -> InvoiceItem {
        InvoiceItem {
            id: format!("{qty}-{rate}-{tax}"),
            qty,
            rate,
            tax_percent: tax,
            amount: qty * rate,
            ..InvoiceItem::default()
        }
    }

    #[test]
    fn empty_items_total_zero() {
        let totals = Totals::from_items(&[]);
        assert!(totals.subtotal.is_zero());
        assert!(totals.total.is_zero());
    }

    #[test]
    fn sums_lines_and_tax() {
        let totals = Totals::from_items(&[item(2.0, 50.0, 5.0), item(1.0, 100.0, 0.0)]);
        assert_eq!(totals.subtotal, BigDecimal::from(200));
        assert_eq!(totals.tax_amount, BigDecimal::from(5));
        assert_eq!(totals.total, BigDecimal::from(205));
    }

    #[test]
    fn order_does_not_change_totals() {
        let mut items = vec![
            item(3.0, 0.1, 5.0),
            item(1.0, 0.2, 5.0),
            item(7.0, 19.99, 12.5),
            item(0.5, 1e6, 5.0),
        ];
        let forward = Totals::from_items(&items);
        items.reverse();
        let backward = Totals::from_items(&items);
        assert_eq!(forward, backward);
        assert_eq!(forward.total, &forward.subtotal + &forward.tax_amount);
        assert_eq!(forward.subtotal, decimal(0.3) + decimal(0.2) + decimal(139.93) + decimal(500000.0));
    }

    #[test]
    fn serializes_as_rounded_numbers() {
        let totals = Totals::from_items(&[item(1.0, 10.0, 5.0)]);
        let json = serde_json::to_value(&totals).unwrap();
        assert_eq!(json["subtotal"], 10.0);
        assert_eq!(json["taxAmount"], 0.5);
        assert_eq!(json["total"], 10.5);
    }
}
