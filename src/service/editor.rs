use std::sync::Arc;

use crate::models::{
    BankField, BillToField, CompanyField, InvoiceData, InvoiceField, InvoiceStyle, ItemField,
    ShipToField, StyleField, TemplateName, Totals,
};
use crate::service::render::{render, InvoiceView};

/// 单个编辑会话: 持有一份发票与一份版式
///
/// 修改走 `Arc::make_mut`, 已取出的快照不受后续修改影响.
#[derive(Debug, Clone, Default)]
pub struct InvoiceEditor {
    invoice: Arc<InvoiceData>,
    style: Arc<InvoiceStyle>,
}

impl InvoiceEditor {
    pub fn new(invoice: InvoiceData, style: InvoiceStyle) -> Self {
        Self {
            invoice: Arc::new(invoice),
            style: Arc::new(style),
        }
    }

    pub fn invoice(&self) -> Arc<InvoiceData> {
        Arc::clone(&self.invoice)
    }

    pub fn style(&self) -> Arc<InvoiceStyle> {
        Arc::clone(&self.style)
    }

    pub fn update(&mut self, field: InvoiceField) {
        Arc::make_mut(&mut self.invoice).set(field);
    }

    pub fn update_company(&mut self, field: CompanyField) {
        Arc::make_mut(&mut self.invoice).set_company(field);
    }

    pub fn update_bill_to(&mut self, field: BillToField) {
        Arc::make_mut(&mut self.invoice).set_bill_to(field);
    }

    pub fn update_ship_to(&mut self, field: ShipToField) {
        Arc::make_mut(&mut self.invoice).set_ship_to(field);
    }

    pub fn update_bank_details(&mut self, field: BankField) {
        Arc::make_mut(&mut self.invoice).set_bank_details(field);
    }

    pub fn add_item(&mut self) -> String {
        Arc::make_mut(&mut self.invoice).add_item()
    }

    pub fn update_item(&mut self, id: &str, field: ItemField) -> bool {
        if !self.invoice.items.iter().any(|i| i.id == id) {
            tracing::debug!("update_item: no item with id {}", id);
            return false;
        }
        Arc::make_mut(&mut self.invoice).update_item(id, field)
    }

    pub fn remove_item(&mut self, id: &str) -> bool {
        if !self.invoice.items.iter().any(|i| i.id == id) {
            return false;
        }
        Arc::make_mut(&mut self.invoice).remove_item(id)
    }

    pub fn apply_preset(&mut self, name: TemplateName) {
        Arc::make_mut(&mut self.style).apply_preset(name);
    }

    pub fn update_style(&mut self, field: StyleField) {
        Arc::make_mut(&mut self.style).set(field);
    }

    pub fn totals(&self) -> Totals {
        self.invoice.totals()
    }

    pub fn render(&self) -> InvoiceView {
        render(&self.invoice, &self.style, &self.totals())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;

    #[test]
    fn snapshots_survive_later_edits() {
        let mut editor = InvoiceEditor::default();
        let id = editor.invoice().items[0].id.clone();
        editor.update_item(&id, ItemField::Rate(10.0));

        let before = editor.invoice();
        editor.update_item(&id, ItemField::Qty(3.0));
        editor.update(InvoiceField::Notes("changed".into()));

        assert_eq!(before.items[0].amount, 10.0);
        assert!(before.notes.is_empty());
        assert_eq!(editor.invoice().items[0].amount, 30.0);
        assert_eq!(editor.totals().subtotal, BigDecimal::from(30));
    }

    #[test]
    fn missing_ids_do_not_copy() {
        let mut editor = InvoiceEditor::default();
        let snapshot = editor.invoice();
        assert!(!editor.update_item("missing", ItemField::Qty(2.0)));
        assert!(!editor.remove_item("missing"));
        assert!(Arc::ptr_eq(&snapshot, &editor.invoice()));
    }

    #[test]
    fn style_edits_flow_into_render() {
        let mut editor = InvoiceEditor::default();
        editor.update_style(StyleField::FontSize(15.0));
        editor.apply_preset(TemplateName::Corporate);
        let view = editor.render();
        assert_eq!(view.template, TemplateName::Corporate);
        assert!(view.table.bordered);
        assert_eq!(view.page.font_size, 15.0);
        assert_eq!(view.decoration.len(), 1);
    }

    #[test]
    fn totals_track_items_without_invalidation() {
        let mut editor = InvoiceEditor::default();
        let first = editor.invoice().items[0].id.clone();
        editor.update_item(&first, ItemField::Rate(100.0));
        let second = editor.add_item();
        editor.update_item(&second, ItemField::Rate(50.0));
        editor.update_item(&second, ItemField::TaxPercent(0.0));
        assert_eq!(editor.totals().total, BigDecimal::from(155));

        editor.remove_item(&first);
        assert_eq!(editor.totals().total, BigDecimal::from(50));
    }
}
