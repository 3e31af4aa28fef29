use bigdecimal::{BigDecimal, Zero};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::money::{decimal, serialize_money};
use crate::models::SavedInvoice;
use crate::service::listing::{in_date_range, matches_search};

const TOP_CLIENTS: usize = 5;
const RECENT_ROWS: usize = 5;
const UNKNOWN: &str = "Unknown";

/// 看板过滤: 日期区间 + 发票号搜索
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DashboardFilter {
    pub start: Option<String>,
    pub end: Option<String>,
    pub q: Option<String>,
}

impl DashboardFilter {
    pub fn matches(&self, invoice: &SavedInvoice) -> bool {
        in_date_range(&invoice.date, self.start.as_deref(), self.end.as_deref())
            && matches_search(&[invoice.invoice_number.as_str()], self.q.as_deref().unwrap_or(""))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpis {
    #[serde(serialize_with = "serialize_money")]
    pub total_revenue: BigDecimal,
    pub invoice_count: usize,
    #[serde(serialize_with = "serialize_money")]
    pub average_value: BigDecimal,
    pub sent_count: usize,
    /// 百分比, 无发票时为 0
    pub sent_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: String,
    #[serde(serialize_with = "serialize_money")]
    pub amount: BigDecimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedValue {
    pub name: String,
    #[serde(serialize_with = "serialize_money")]
    pub value: BigDecimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusSlice {
    pub name: &'static str,
    pub value: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub kpis: Kpis,
    pub revenue_trend: Vec<TrendPoint>,
    pub top_clients: Vec<NamedValue>,
    pub status_split: Vec<StatusSlice>,
    pub recent: Vec<SavedInvoice>,
}

fn or_unknown(value: &str) -> String {
    if value.is_empty() {
        UNKNOWN.to_string()
    } else {
        value.to_string()
    }
}

/// 对已保存发票做聚合, 纯函数
pub fn build_dashboard(invoices: &[SavedInvoice], filter: &DashboardFilter) -> Dashboard {
    let rows: Vec<&SavedInvoice> = invoices.iter().filter(|inv| filter.matches(inv)).collect();

    let total_revenue = rows
        .iter()
        .fold(BigDecimal::zero(), |acc, inv| acc + decimal(inv.total));
    let invoice_count = rows.len();
    let average_value = if invoice_count > 0 {
        total_revenue.clone() / BigDecimal::from(invoice_count as u64)
    } else {
        BigDecimal::zero()
    };
    let sent_count = rows.iter().filter(|inv| inv.is_sent()).count();
    let sent_rate = if invoice_count > 0 {
        sent_count as f64 / invoice_count as f64 * 100.0
    } else {
        0.0
    };

    let mut by_date: BTreeMap<String, BigDecimal> = BTreeMap::new();
    let mut by_client: IndexMap<String, BigDecimal> = IndexMap::new();
    for inv in &rows {
        *by_date.entry(or_unknown(&inv.date)).or_insert_with(BigDecimal::zero) += decimal(inv.total);
        *by_client
            .entry(or_unknown(&inv.client_name))
            .or_insert_with(BigDecimal::zero) += decimal(inv.total);
    }

    let revenue_trend = by_date
        .into_iter()
        .map(|(date, amount)| TrendPoint { date, amount })
        .collect();

    let mut top_clients: Vec<NamedValue> = by_client
        .into_iter()
        .map(|(name, value)| NamedValue { name, value })
        .collect();
    top_clients.sort_by(|a, b| b.value.cmp(&a.value));
    top_clients.truncate(TOP_CLIENTS);

    tracing::debug!(
        "Dashboard built: {} of {} invoices, {} sent",
        invoice_count,
        invoices.len(),
        sent_count
    );

    Dashboard {
        kpis: Kpis {
            total_revenue,
            invoice_count,
            average_value,
            sent_count,
            sent_rate,
        },
        revenue_trend,
        top_clients,
        status_split: vec![
            StatusSlice {
                name: "Sent",
                value: sent_count,
            },
            StatusSlice {
                name: "Not Sent",
                value: invoice_count - sent_count,
            },
        ],
        recent: rows.into_iter().take(RECENT_ROWS).cloned().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn saved(number: &str, client: &str, date: &str, total: f64, status: &str) -> SavedInvoice {
        SavedInvoice {
            invoice_number: number.into(),
            client_name: client.into(),
            date: date.into(),
            total,
            email_status: status.into(),
            ..SavedInvoice::default()
        }
    }

    fn fixture() -> Vec<SavedInvoice> {
        vec![
            saved("INV-1", "Acme", "2024-03-01", 100.0, "yes"),
            saved("INV-2", "Globex", "2024-01-15", 250.5, "no"),
            saved("INV-3", "Acme", "2024-03-01", 0.1, "Sent"),
            saved("INV-4", "", "", 0.2, ""),
            saved("INV-5", "Initech", "2024-02-10", 40.0, "true"),
            saved("INV-6", "Hooli", "2024-02-11", 40.0, "no"),
            saved("INV-7", "Umbrella", "2024-02-12", 10.0, "no"),
        ]
    }

    #[test]
    fn empty_collection_is_all_zero() {
        let d = build_dashboard(&[], &DashboardFilter::default());
        assert_eq!(d.kpis.invoice_count, 0);
        assert!(d.kpis.average_value.is_zero());
        assert_eq!(d.kpis.sent_rate, 0.0);
        assert!(d.revenue_trend.is_empty());
        assert_eq!(d.status_split[1].value, 0);
    }

    #[test]
    fn kpis_sum_exactly() {
        let d = build_dashboard(&fixture(), &DashboardFilter::default());
        assert_eq!(d.kpis.invoice_count, 7);
        assert_eq!(d.kpis.total_revenue, decimal(440.8));
        assert_eq!(d.kpis.sent_count, 3);
        assert_eq!(d.status_split[0].value, 3);
        assert_eq!(d.status_split[1].value, 4);
        assert_eq!(d.recent.len(), 5);
        assert_eq!(d.recent[0].invoice_number, "INV-1");
    }

    #[test]
    fn trend_is_sorted_by_date_with_unknown_bucket() {
        let d = build_dashboard(&fixture(), &DashboardFilter::default());
        let dates: Vec<_> = d.revenue_trend.iter().map(|p| p.date.as_str()).collect();
        assert_eq!(
            dates,
            ["2024-01-15", "2024-02-10", "2024-02-11", "2024-02-12", "2024-03-01", "Unknown"]
        );
        assert_eq!(d.revenue_trend[4].amount, decimal(100.1));
    }

    #[test]
    fn top_clients_are_descending_and_capped() {
        let d = build_dashboard(&fixture(), &DashboardFilter::default());
        let names: Vec<_> = d.top_clients.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Globex", "Acme", "Initech", "Hooli", "Umbrella"]);
    }

    #[test]
    fn filter_by_range_and_number() {
        let filter = DashboardFilter {
            start: Some("2024-02-01".into()),
            end: Some("2024-02-11".into()),
            q: None,
        };
        let d = build_dashboard(&fixture(), &filter);
        assert_eq!(d.kpis.invoice_count, 2);
        assert_eq!(d.kpis.average_value, BigDecimal::from(40));
        assert_eq!(d.kpis.sent_rate, 50.0);

        let filter = DashboardFilter {
            q: Some("inv-2".into()),
            ..DashboardFilter::default()
        };
        let d = build_dashboard(&fixture(), &filter);
        assert_eq!(d.kpis.invoice_count, 1);
        assert_eq!(d.top_clients[0].name, "Globex");
    }
}
