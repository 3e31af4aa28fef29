use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use super::totals::Totals;

/// 发票明细行, amount 始终由 qty × rate 推导
///
/// 反序列化经过 `ItemInput`, 输入里的 amount 被忽略并重算.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "ItemInput")]
pub struct InvoiceItem {
    pub id: String,
    pub description: String,
    pub qty: f64,
    pub rate: f64,
    pub tax_percent: f64,
    pub amount: f64,
}

impl InvoiceItem {
    /// 新增行: 数量 1, 单价 0, 税率取发票当前默认 VAT
    pub fn blank(tax_percent: f64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            description: String::new(),
            qty: 1.0,
            rate: 0.0,
            tax_percent,
            amount: 0.0,
        }
    }

    fn recompute_amount(&mut self) {
        self.amount = self.qty * self.rate;
    }
}

/// 明细行的输入形态, 不含 amount
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ItemInput {
    id: String,
    description: String,
    qty: f64,
    rate: f64,
    tax_percent: f64,
}

impl From<ItemInput> for InvoiceItem {
    fn from(input: ItemInput) -> Self {
        let mut item = InvoiceItem {
            id: input.id,
            description: input.description,
            qty: input.qty,
            rate: input.rate,
            tax_percent: input.tax_percent,
            amount: 0.0,
        };
        item.recompute_amount();
        item
    }
}

/// 明细行可编辑字段; amount 不在其中
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum ItemField {
    Description(String),
    Qty(f64),
    Rate(f64),
    TaxPercent(f64),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanyInfo {
    pub name: String,
    pub tagline: String,
    pub address: Vec<String>,
    pub phone: String,
    pub vat_number: String,
    pub email: String,
}

impl CompanyInfo {
    pub fn seeded() -> Self {
        Self {
            name: "Al Zajed Technologies LLC".to_string(),
            tagline: "Innovate | Integrate | Elevate".to_string(),
            address: vec![
                "Office 003, Building 290, Al Souq Al Kabeer".to_string(),
                "Bur Dubai, Dubai".to_string(),
            ],
            phone: "+971 4 2398707".to_string(),
            vat_number: "TRN 100535318800003".to_string(),
            email: "info@alzajed.com".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum CompanyField {
    Name(String),
    Tagline(String),
    Address(Vec<String>),
    Phone(String),
    VatNumber(String),
    Email(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientInfo {
    pub name: String,
    pub address: Vec<String>,
    pub vat_number: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum BillToField {
    Name(String),
    Address(Vec<String>),
    VatNumber(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShipToInfo {
    pub address: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum ShipToField {
    Address(Vec<String>),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BankDetails {
    pub account_name: String,
    pub bank_name: String,
    pub beneficiary_no: String,
    pub iban_number: String,
}

impl BankDetails {
    pub fn seeded() -> Self {
        Self {
            account_name: "Al Zajed Technologies LLC".to_string(),
            bank_name: "RAK Bank".to_string(),
            beneficiary_no: "0292 8854 9100 1".to_string(),
            iban_number: "AE 3004 0000 0292 8854 9100 1".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum BankField {
    AccountName(String),
    BankName(String),
    BeneficiaryNo(String),
    IbanNumber(String),
}

pub const DEFAULT_VAT_PERCENT: f64 = 5.0;

pub fn default_terms() -> Vec<String> {
    [
        "Received goods in good condition.",
        "No warranty for physical damaged items.",
        "Please call with 3 days of raising invoice for any dispute or clarifications.",
        "Cheques to be crossed in favour of Al Zajed Technologies LLC",
        "Warranty as per manufacturers Terms and Condition.",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// 发票表单数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvoiceData {
    pub invoice_number: String,
    pub invoice_date: String,
    pub due_date: String,
    pub company: CompanyInfo,
    pub bill_to: ClientInfo,
    pub ship_to: ShipToInfo,
    pub items: Vec<InvoiceItem>,
    pub lpo_no: String,
    pub lpo_date: String,
    pub payment_terms: String,
    pub notes: String,
    pub terms_and_conditions: Vec<String>,
    pub bank_details: BankDetails,
    pub vat_percent: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorized_signature: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_signature: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_stamp: Option<String>,
}

impl Default for InvoiceData {
    fn default() -> Self {
        let today = Utc::now().date_naive();
        let tomorrow = today + Duration::days(1);

        Self {
            invoice_number: "AZT/INV/2026/000106".to_string(),
            invoice_date: today.format("%Y-%m-%d").to_string(),
            due_date: tomorrow.format("%Y-%m-%d").to_string(),
            company: CompanyInfo::seeded(),
            bill_to: ClientInfo {
                name: String::new(),
                address: vec![String::new(), String::new()],
                vat_number: String::new(),
            },
            ship_to: ShipToInfo {
                address: vec![String::new(), String::new()],
            },
            items: vec![InvoiceItem::blank(DEFAULT_VAT_PERCENT)],
            lpo_no: String::new(),
            lpo_date: String::new(),
            payment_terms: String::new(),
            notes: String::new(),
            terms_and_conditions: default_terms(),
            bank_details: BankDetails::seeded(),
            vat_percent: DEFAULT_VAT_PERCENT,
            authorized_signature: None,
            customer_signature: None,
            company_stamp: None,
        }
    }
}

/// 整字段替换
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum InvoiceField {
    InvoiceNumber(String),
    InvoiceDate(String),
    DueDate(String),
    Company(CompanyInfo),
    BillTo(ClientInfo),
    ShipTo(ShipToInfo),
    LpoNo(String),
    LpoDate(String),
    PaymentTerms(String),
    Notes(String),
    TermsAndConditions(Vec<String>),
    BankDetails(BankDetails),
    VatPercent(f64),
    AuthorizedSignature(Option<String>),
    CustomerSignature(Option<String>),
    CompanyStamp(Option<String>),
}

impl InvoiceData {
    pub fn set(&mut self, field: InvoiceField) {
        match field {
            InvoiceField::InvoiceNumber(v) => self.invoice_number = v,
            InvoiceField::InvoiceDate(v) => self.invoice_date = v,
            InvoiceField::DueDate(v) => self.due_date = v,
            InvoiceField::Company(v) => self.company = v,
            InvoiceField::BillTo(v) => self.bill_to = v,
            InvoiceField::ShipTo(v) => self.ship_to = v,
            InvoiceField::LpoNo(v) => self.lpo_no = v,
            InvoiceField::LpoDate(v) => self.lpo_date = v,
            InvoiceField::PaymentTerms(v) => self.payment_terms = v,
            InvoiceField::Notes(v) => self.notes = v,
            InvoiceField::TermsAndConditions(v) => self.terms_and_conditions = v,
            InvoiceField::BankDetails(v) => self.bank_details = v,
            InvoiceField::VatPercent(v) => self.vat_percent = v,
            InvoiceField::AuthorizedSignature(v) => self.authorized_signature = v,
            InvoiceField::CustomerSignature(v) => self.customer_signature = v,
            InvoiceField::CompanyStamp(v) => self.company_stamp = v,
        }
    }

    pub fn set_company(&mut self, field: CompanyField) {
        let company = &mut self.company;
        match field {
            CompanyField::Name(v) => company.name = v,
            CompanyField::Tagline(v) => company.tagline = v,
            CompanyField::Address(v) => company.address = v,
            CompanyField::Phone(v) => company.phone = v,
            CompanyField::VatNumber(v) => company.vat_number = v,
            CompanyField::Email(v) => company.email = v,
        }
    }

    pub fn set_bill_to(&mut self, field: BillToField) {
        match field {
            BillToField::Name(v) => self.bill_to.name = v,
            BillToField::Address(v) => self.bill_to.address = v,
            BillToField::VatNumber(v) => self.bill_to.vat_number = v,
        }
    }

    pub fn set_ship_to(&mut self, field: ShipToField) {
        match field {
            ShipToField::Address(v) => self.ship_to.address = v,
        }
    }

    pub fn set_bank_details(&mut self, field: BankField) {
        let bank = &mut self.bank_details;
        match field {
            BankField::AccountName(v) => bank.account_name = v,
            BankField::BankName(v) => bank.bank_name = v,
            BankField::BeneficiaryNo(v) => bank.beneficiary_no = v,
            BankField::IbanNumber(v) => bank.iban_number = v,
        }
    }

    /// 追加空白行, 返回新行 id
    pub fn add_item(&mut self) -> String {
        let item = InvoiceItem::blank(self.vat_percent);
        let id = item.id.clone();
        self.items.push(item);
        id
    }

    /// 按 id 修改一行; qty/rate 变化时同步重算 amount. 未找到返回 false
    pub fn update_item(&mut self, id: &str, field: ItemField) -> bool {
        let Some(item) = self.items.iter_mut().find(|i| i.id == id) else {
            return false;
        };

        match field {
            ItemField::Description(v) => item.description = v,
            ItemField::Qty(v) => {
                item.qty = v;
                item.recompute_amount();
            }
            ItemField::Rate(v) => {
                item.rate = v;
                item.recompute_amount();
            }
            ItemField::TaxPercent(v) => item.tax_percent = v,
        }
        true
    }

    pub fn remove_item(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.id != id);
        self.items.len() != before
    }

    /// 合计不缓存, 每次从明细重算
    pub fn totals(&self) -> Totals {
        Totals::from_items(&self.items)
    }
}
