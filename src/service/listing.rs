use serde::{Deserialize, Serialize};

use crate::models::SavedInvoice;

/// 邮件状态过滤
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Sent,
    Pending,
}

impl StatusFilter {
    pub fn matches(self, invoice: &SavedInvoice) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Sent => invoice.is_sent(),
            StatusFilter::Pending => !invoice.is_sent(),
        }
    }
}

/// 忽略大小写的子串匹配, 任一字段命中即可; 空查询全部命中
pub fn matches_search(fields: &[&str], query: &str) -> bool {
    let query = query.to_lowercase();
    if query.is_empty() {
        return true;
    }
    fields.iter().any(|f| f.to_lowercase().contains(&query))
}

/// 闭区间日期过滤, ISO 日期按字符串比较; 空边界不生效
pub fn in_date_range(date: &str, start: Option<&str>, end: Option<&str>) -> bool {
    if let Some(start) = start.filter(|s| !s.is_empty()) {
        if date < start {
            return false;
        }
    }
    if let Some(end) = end.filter(|s| !s.is_empty()) {
        if date > end {
            return false;
        }
    }
    true
}

/// 已保存发票列表查询参数
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InvoiceQuery {
    pub filter: StatusFilter,
    pub q: Option<String>,
    /// 1 起始, 缺省为第一页
    pub page: Option<usize>,
}

/// 状态 + 搜索过滤, 保持原顺序
pub fn filter_invoices(invoices: &[SavedInvoice], filter: StatusFilter, query: &str) -> Vec<SavedInvoice> {
    invoices
        .iter()
        .filter(|inv| filter.matches(inv))
        .filter(|inv| {
            matches_search(
                &[
                    inv.invoice_number.as_str(),
                    inv.client_name.as_str(),
                    inv.date.as_str(),
                    inv.notes.as_str(),
                ],
                query,
            )
        })
        .cloned()
        .collect()
}

/// 分页结果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub total_pages: usize,
    /// 当前页第一条的序号 (1 起始), 无数据时为 0
    pub from: usize,
    pub to: usize,
}

impl<T> Page<T> {
    pub fn summary(&self) -> String {
        format!("Showing {} to {} of {} entries", self.from, self.to, self.total)
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// 固定页大小分页, 页码夹取到 [1, total_pages]
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total = items.len();
    let total_pages = total.div_ceil(page_size);
    let page = page.clamp(1, total_pages.max(1));

    let start = (page - 1) * page_size;
    let end = (start + page_size).min(total);
    let slice = items.get(start..end).unwrap_or_default().to_vec();

    Page {
        items: slice,
        page,
        page_size,
        total,
        total_pages,
        from: if total == 0 { 0 } else { start + 1 },
        to: end,
    }
}

/// 列表视图: 过滤后分页
pub fn query_invoices(invoices: &[SavedInvoice], query: &InvoiceQuery, page_size: usize) -> Page<SavedInvoice> {
    let filtered = filter_invoices(invoices, query.filter, query.q.as_deref().unwrap_or(""));
    paginate(&filtered, query.page.unwrap_or(1), page_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn saved(number: &str, client: &str, date: &str, status: &str) -> SavedInvoice {
        SavedInvoice {
            invoice_number: number.into(),
            client_name: client.into(),
            date: date.into(),
            email_status: status.into(),
            ..SavedInvoice::default()
        }
    }

    fn fixture() -> Vec<SavedInvoice> {
        vec![
            saved("INV-001", "Acme", "2024-02-01", "yes"),
            saved("INV-002", "Globex", "2024-10-01", "no"),
            saved("INV-003", "acme hardware", "2024-03-15", " Sent "),
            saved("INV-004", "Initech", "2024-01-20", ""),
        ]
    }

    #[test]
    fn date_range_is_inclusive_and_lexical() {
        assert!("2024-02-01" < "2024-10-01");
        assert!(in_date_range("2024-02-01", Some("2024-02-01"), Some("2024-10-01")));
        assert!(in_date_range("2024-10-01", Some("2024-02-01"), Some("2024-10-01")));
        assert!(!in_date_range("2024-01-31", Some("2024-02-01"), None));
        assert!(!in_date_range("2024-10-02", None, Some("2024-10-01")));
        assert!(in_date_range("", Some(""), Some("")));
    }

    #[test]
    fn status_filter_uses_sent_rule() {
        let rows = fixture();
        let sent = filter_invoices(&rows, StatusFilter::Sent, "");
        assert_eq!(sent.len(), 2);
        let pending = filter_invoices(&rows, StatusFilter::Pending, "");
        assert_eq!(pending.len(), 2);
        assert_eq!(filter_invoices(&rows, StatusFilter::All, "").len(), 4);
    }

    #[test]
    fn search_is_case_insensitive_over_several_fields() {
        let rows = fixture();
        let hits = filter_invoices(&rows, StatusFilter::All, "ACME");
        assert_eq!(hits.len(), 2);
        let hits = filter_invoices(&rows, StatusFilter::All, "2024-10");
        assert_eq!(hits[0].invoice_number, "INV-002");
        let hits = filter_invoices(&rows, StatusFilter::Sent, "acme hard");
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn pagination_clamps_and_summarises() {
        let items: Vec<u32> = (1..=23).collect();
        let page = paginate(&items, 3, 10);
        assert_eq!(page.items, vec![21, 22, 23]);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.summary(), "Showing 21 to 23 of 23 entries");
        assert!(!page.has_next());

        let page = paginate(&items, 99, 10);
        assert_eq!(page.page, 3);
        let page = paginate(&items, 0, 10);
        assert_eq!(page.page, 1);
        assert_eq!(page.summary(), "Showing 1 to 10 of 23 entries");
        assert!(!page.has_previous());
    }

    #[test]
    fn empty_collection_paginates_to_nothing() {
        let page = paginate::<u32>(&[], 4, 10);
        assert!(page.items.is_empty());
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.summary(), "Showing 0 to 0 of 0 entries");
    }

    #[test]
    fn query_defaults_to_first_page() {
        let query: InvoiceQuery = serde_json::from_str(r#"{"filter":"pending"}"#).unwrap();
        let page = query_invoices(&fixture(), &query, 1);
        assert_eq!(page.page, 1);
        assert_eq!(page.total, 2);
        assert_eq!(page.items[0].invoice_number, "INV-002");
    }
}
