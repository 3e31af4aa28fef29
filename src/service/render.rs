use bigdecimal::BigDecimal;
use serde::Serialize;

use crate::models::money::{decimal, money, money_f64, percent};
use crate::models::{
    Decoration, HeaderLayout, InvoiceData, InvoiceStyle, PaperSize, TemplateName, Totals,
};
use crate::service::words::amount_in_words;

const CURRENCY: &str = "AED";

/// 渲染结果: 纯数据, HTML 由导出器生成
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceView {
    pub template: TemplateName,
    pub page: PageView,
    pub decoration: Vec<DecorationBar>,
    pub header: HeaderView,
    pub bill_to: PartyBlock,
    pub ship_to: PartyBlock,
    pub table: ItemTable,
    pub totals: Vec<TotalLine>,
    pub amount_in_words: Option<String>,
    pub details: Vec<LabeledValue>,
    pub notes: Option<String>,
    pub bank_details: Option<Vec<LabeledValue>>,
    pub terms: Option<Vec<String>>,
    pub signatures: Option<SignatureBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageView {
    pub paper: PaperSize,
    pub width_px: u32,
    pub min_height_px: u32,
    pub font_family: String,
    pub font_size: f64,
    pub header_size: f64,
    pub primary_color: String,
    pub accent_color: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BarPosition {
    Top,
    Bottom,
    Left,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecorationBar {
    pub position: BarPosition,
    pub thickness_px: u32,
    pub background: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledValue {
    pub label: &'static str,
    pub value: String,
}

fn labeled(label: &'static str, value: impl Into<String>) -> LabeledValue {
    LabeledValue {
        label,
        value: value.into(),
    }
}

/// 三种页眉布局, 互斥
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "layout", rename_all = "lowercase")]
pub enum HeaderView {
    Left(HeaderBlock),
    Center(HeaderBlock),
    Split(HeaderBlock),
}

impl HeaderView {
    pub fn block(&self) -> &HeaderBlock {
        match self {
            HeaderView::Left(b) | HeaderView::Center(b) | HeaderView::Split(b) => b,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderBlock {
    pub title: &'static str,
    pub show_logo: bool,
    pub company_name: String,
    pub tagline: String,
    pub company_lines: Vec<String>,
    pub meta: Vec<LabeledValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartyBlock {
    pub title: &'static str,
    pub name: Option<String>,
    pub lines: Vec<String>,
    pub vat: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemTable {
    pub bordered: bool,
    pub rows: Vec<ItemRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemRow {
    /// 显示序号, 从 1 开始
    pub ordinal: usize,
    pub description: String,
    pub qty: String,
    pub rate: String,
    pub tax: String,
    pub amount: String,
    pub shaded: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TotalLine {
    pub label: String,
    pub value: String,
    pub emphasis: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignatureBlock {
    pub authorized: Option<String>,
    pub customer: Option<String>,
    pub stamp: Option<String>,
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| value.to_string())
}

fn image(payload: &Option<String>) -> Option<String> {
    payload.as_deref().and_then(non_empty)
}

fn decoration(style: &InvoiceStyle) -> Vec<DecorationBar> {
    let p = &style.primary_color;
    let a = &style.accent_color;
    let bar = |position: BarPosition, thickness_px: u32, background: String| DecorationBar {
        position,
        thickness_px,
        background,
    };

    match style.template.decoration() {
        Decoration::None => Vec::new(),
        Decoration::TopGradientBar => {
            vec![bar(BarPosition::Top, 8, format!("linear-gradient(90deg, {p}, {a})"))]
        }
        Decoration::LeftAccentBar => vec![bar(BarPosition::Left, 12, p.clone())],
        Decoration::TopBottomAccentLines => vec![
            bar(BarPosition::Top, 4, a.clone()),
            bar(BarPosition::Bottom, 4, a.clone()),
        ],
        Decoration::TopGradientWash => {
            vec![bar(BarPosition::Top, 64, format!("linear-gradient(180deg, {p}15, transparent)"))]
        }
        Decoration::TriColorTopBar => {
            vec![bar(BarPosition::Top, 12, format!("linear-gradient(90deg, {p}, {a}, {p})"))]
        }
        Decoration::TopBottomDuoToneLines => vec![
            bar(BarPosition::Top, 4, format!("linear-gradient(90deg, {p}, {a})")),
            bar(BarPosition::Bottom, 4, format!("linear-gradient(90deg, {a}, {p})")),
        ],
    }
}

fn header(invoice: &InvoiceData, style: &InvoiceStyle) -> HeaderView {
    let company = &invoice.company;
    let short_meta = || {
        vec![
            labeled("Invoice #", invoice.invoice_number.clone()),
            labeled("Date", invoice.invoice_date.clone()),
            labeled("Due", invoice.due_date.clone()),
        ]
    };
    let stacked_lines = |vat_label: &str| {
        let mut lines = company.address.clone();
        lines.push(company.phone.clone());
        lines.push(format!("{}: {}", vat_label, company.vat_number));
        lines
    };
    let block = |title: &'static str, company_lines: Vec<String>, meta: Vec<LabeledValue>| HeaderBlock {
        title,
        show_logo: style.show_logo,
        company_name: company.name.clone(),
        tagline: company.tagline.clone(),
        company_lines,
        meta,
    };

    match style.header_layout {
        HeaderLayout::Left => HeaderView::Left(block(
            "TAX INVOICE",
            stacked_lines("VAT Number"),
            vec![
                labeled("Invoice Number", invoice.invoice_number.clone()),
                labeled("Invoice Date", invoice.invoice_date.clone()),
                labeled("Due Date", invoice.due_date.clone()),
            ],
        )),
        HeaderLayout::Center => HeaderView::Center(block(
            "TAX INVOICE",
            vec![
                format!("{} | {}", company.address.join(", "), company.phone),
                format!("VAT: {}", company.vat_number),
            ],
            short_meta(),
        )),
        HeaderLayout::Split => HeaderView::Split(block("INVOICE", stacked_lines("VAT"), short_meta())),
    }
}

fn item_table(invoice: &InvoiceData, style: &InvoiceStyle) -> ItemTable {
    let rows = invoice
        .items
        .iter()
        .enumerate()
        .map(|(idx, item)| ItemRow {
            ordinal: idx + 1,
            description: item.description.clone(),
            qty: item.qty.to_string(),
            rate: money_f64(item.rate),
            tax: format!("VAT {}", percent(item.tax_percent)),
            amount: money(&(decimal(item.qty) * decimal(item.rate))),
            shaded: idx % 2 == 0,
        })
        .collect();

    ItemTable {
        bordered: style.table_bordered,
        rows,
    }
}

fn total_lines(invoice: &InvoiceData, totals: &Totals) -> Vec<TotalLine> {
    let line = |label: String, value: &BigDecimal, emphasis: bool| TotalLine {
        label,
        value: format!("{} {}", CURRENCY, money(value)),
        emphasis,
    };
    let sum = &totals.subtotal + &totals.tax_amount;

    vec![
        line("Sub Total".to_string(), &totals.subtotal, false),
        line(format!("VAT ({})", percent(invoice.vat_percent)), &totals.tax_amount, false),
        line("Total".to_string(), &sum, false),
        line("Amount Due".to_string(), &totals.total, true),
    ]
}

/// (发票, 版式, 合计) -> 视图. 无副作用, 缺失字段按空渲染
pub fn render(invoice: &InvoiceData, style: &InvoiceStyle, totals: &Totals) -> InvoiceView {
    let (width_px, min_height_px) = style.paper_size.dimensions_px();

    let amount_in_words = style.show_amount_in_words.then(|| {
        amount_in_words(&totals.total).unwrap_or_else(|e| {
            tracing::debug!("amount in words unavailable ({}), using figures", e);
            format!("{} {}", CURRENCY, money(&totals.total))
        })
    });

    let details = [
        ("LPO No", &invoice.lpo_no),
        ("LPO Date", &invoice.lpo_date),
        ("Payment Terms", &invoice.payment_terms),
    ]
    .into_iter()
    .filter_map(|(label, value)| non_empty(value).map(|v| labeled(label, v)))
    .collect();

    let bank = &invoice.bank_details;
    let bank_details = style.show_bank_details.then(|| {
        vec![
            labeled("Account Name", bank.account_name.clone()),
            labeled("Bank Name", bank.bank_name.clone()),
            labeled("Beneficiary No", bank.beneficiary_no.clone()),
            labeled("IBAN Number", bank.iban_number.clone()),
        ]
    });

    let terms = (style.show_terms && !invoice.terms_and_conditions.is_empty())
        .then(|| invoice.terms_and_conditions.clone());

    let signatures = style.show_signature.then(|| SignatureBlock {
        authorized: image(&invoice.authorized_signature),
        customer: image(&invoice.customer_signature),
        stamp: image(&invoice.company_stamp),
    });

    InvoiceView {
        template: style.template,
        page: PageView {
            paper: style.paper_size,
            width_px,
            min_height_px,
            font_family: style.font_family.clone(),
            font_size: style.font_size,
            header_size: style.header_size,
            primary_color: style.primary_color.clone(),
            accent_color: style.accent_color.clone(),
        },
        decoration: decoration(style),
        header: header(invoice, style),
        bill_to: PartyBlock {
            title: "Bill To:",
            name: Some(invoice.bill_to.name.clone()),
            lines: invoice.bill_to.address.clone(),
            vat: non_empty(&invoice.bill_to.vat_number).map(|v| format!("VAT: {}", v)),
        },
        ship_to: PartyBlock {
            title: "Ship To:",
            name: None,
            lines: invoice.ship_to.address.clone(),
            vat: None,
        },
        table: item_table(invoice, style),
        totals: total_lines(invoice, totals),
        amount_in_words,
        details,
        notes: non_empty(&invoice.notes),
        bank_details,
        terms,
        signatures,
    }
}
