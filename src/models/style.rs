use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 8 个模板预设
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateName {
    Classic,
    Modern,
    Minimal,
    Bold,
    Executive,
    Elegant,
    Corporate,
    Stripe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderLayout {
    Left,
    Center,
    Split,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperSize {
    A4,
    Letter,
}

impl PaperSize {
    /// 预览尺寸 (宽, 最小高), 单位 px
    pub fn dimensions_px(self) -> (u32, u32) {
        match self {
            PaperSize::A4 => (794, 1123),
            PaperSize::Letter => (816, 1056),
        }
    }
}

/// 模板装饰层, 纯视觉, 位于页眉之前
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Decoration {
    None,
    TopGradientBar,
    LeftAccentBar,
    TopBottomAccentLines,
    TopGradientWash,
    TriColorTopBar,
    TopBottomDuoToneLines,
}

/// 预设覆盖的四个字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplatePreset {
    pub primary_color: &'static str,
    pub accent_color: &'static str,
    pub header_layout: HeaderLayout,
    pub table_bordered: bool,
}

impl TemplateName {
    pub const ALL: [TemplateName; 8] = [
        TemplateName::Classic,
        TemplateName::Modern,
        TemplateName::Minimal,
        TemplateName::Bold,
        TemplateName::Executive,
        TemplateName::Elegant,
        TemplateName::Corporate,
        TemplateName::Stripe,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TemplateName::Classic => "classic",
            TemplateName::Modern => "modern",
            TemplateName::Minimal => "minimal",
            TemplateName::Bold => "bold",
            TemplateName::Executive => "executive",
            TemplateName::Elegant => "elegant",
            TemplateName::Corporate => "corporate",
            TemplateName::Stripe => "stripe",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TemplateName::Classic => "Classic",
            TemplateName::Modern => "Modern",
            TemplateName::Minimal => "Minimal",
            TemplateName::Bold => "Bold",
            TemplateName::Executive => "Executive",
            TemplateName::Elegant => "Elegant",
            TemplateName::Corporate => "Corporate",
            TemplateName::Stripe => "Stripe",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            TemplateName::Classic => "Clean traditional",
            TemplateName::Modern => "Gradient top bar",
            TemplateName::Minimal => "Ultra simple",
            TemplateName::Bold => "Left accent bar",
            TemplateName::Executive => "Navy & gold",
            TemplateName::Elegant => "Dark & luxe",
            TemplateName::Corporate => "Teal professional",
            TemplateName::Stripe => "Purple modern",
        }
    }

    pub fn preset(self) -> TemplatePreset {
        let (primary_color, accent_color, header_layout, table_bordered) = match self {
            TemplateName::Classic => ("#0a5e9c", "#1da5b8", HeaderLayout::Left, false),
            TemplateName::Modern => ("#2563eb", "#06b6d4", HeaderLayout::Left, false),
            TemplateName::Minimal => ("#374151", "#6b7280", HeaderLayout::Left, false),
            TemplateName::Bold => ("#dc2626", "#f59e0b", HeaderLayout::Left, true),
            TemplateName::Executive => ("#1e3a5f", "#c9a84c", HeaderLayout::Center, true),
            TemplateName::Elegant => ("#2d2d2d", "#8b6914", HeaderLayout::Split, false),
            TemplateName::Corporate => ("#0d9488", "#14b8a6", HeaderLayout::Left, true),
            TemplateName::Stripe => ("#635bff", "#a259ff", HeaderLayout::Left, false),
        };
        TemplatePreset {
            primary_color,
            accent_color,
            header_layout,
            table_bordered,
        }
    }

    pub fn decoration(self) -> Decoration {
        match self {
            TemplateName::Classic | TemplateName::Minimal => Decoration::None,
            TemplateName::Modern => Decoration::TopGradientBar,
            TemplateName::Bold => Decoration::LeftAccentBar,
            TemplateName::Executive => Decoration::TopBottomAccentLines,
            TemplateName::Elegant => Decoration::TopGradientWash,
            TemplateName::Corporate => Decoration::TriColorTopBar,
            TemplateName::Stripe => Decoration::TopBottomDuoToneLines,
        }
    }
}

impl fmt::Display for TemplateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown template: {0}")]
pub struct UnknownTemplate(pub String);

impl FromStr for TemplateName {
    type Err = UnknownTemplate;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        TemplateName::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| UnknownTemplate(s.to_string()))
    }
}

/// 模板目录项, 供选择器展示
#[derive(Debug, Clone, Serialize)]
pub struct TemplateEntry {
    pub value: TemplateName,
    pub label: &'static str,
    pub description: &'static str,
    pub color: &'static str,
}

pub fn template_catalog() -> Vec<TemplateEntry> {
    TemplateName::ALL
        .into_iter()
        .map(|t| TemplateEntry {
            value: t,
            label: t.label(),
            description: t.description(),
            color: t.preset().primary_color,
        })
        .collect()
}

/// 版式选项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvoiceStyle {
    pub template: TemplateName,
    pub primary_color: String,
    pub accent_color: String,
    pub font_family: String,
    pub font_size: f64,
    pub header_size: f64,
    pub show_logo: bool,
    pub show_bank_details: bool,
    pub show_terms: bool,
    pub show_amount_in_words: bool,
    pub show_signature: bool,
    pub paper_size: PaperSize,
    pub table_bordered: bool,
    pub header_layout: HeaderLayout,
}

impl Default for InvoiceStyle {
    fn default() -> Self {
        Self {
            template: TemplateName::Classic,
            primary_color: "#0a5e9c".to_string(),
            accent_color: "#1da5b8".to_string(),
            font_family: "Inter".to_string(),
            font_size: 13.0,
            header_size: 22.0,
            show_logo: true,
            show_bank_details: true,
            show_terms: true,
            show_amount_in_words: true,
            show_signature: true,
            paper_size: PaperSize::A4,
            table_bordered: false,
            header_layout: HeaderLayout::Left,
        }
    }
}

/// 单字段替换; 颜色不校验, 字号不夹取
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum StyleField {
    PrimaryColor(String),
    AccentColor(String),
    FontFamily(String),
    FontSize(f64),
    HeaderSize(f64),
    ShowLogo(bool),
    ShowBankDetails(bool),
    ShowTerms(bool),
    ShowAmountInWords(bool),
    ShowSignature(bool),
    PaperSize(PaperSize),
    TableBordered(bool),
    HeaderLayout(HeaderLayout),
}

impl InvoiceStyle {
    /// 切换模板: 只覆盖主色, 强调色, 页眉布局, 表格边框
    pub fn apply_preset(&mut self, name: TemplateName) {
        let preset = name.preset();
        self.template = name;
        self.primary_color = preset.primary_color.to_string();
        self.accent_color = preset.accent_color.to_string();
        self.header_layout = preset.header_layout;
        self.table_bordered = preset.table_bordered;
    }

    pub fn set(&mut self, field: StyleField) {
        match field {
            StyleField::PrimaryColor(v) => self.primary_color = v,
            StyleField::AccentColor(v) => self.accent_color = v,
            StyleField::FontFamily(v) => self.font_family = v,
            StyleField::FontSize(v) => self.font_size = v,
            StyleField::HeaderSize(v) => self.header_size = v,
            StyleField::ShowLogo(v) => self.show_logo = v,
            StyleField::ShowBankDetails(v) => self.show_bank_details = v,
            StyleField::ShowTerms(v) => self.show_terms = v,
            StyleField::ShowAmountInWords(v) => self.show_amount_in_words = v,
            StyleField::ShowSignature(v) => self.show_signature = v,
            StyleField::PaperSize(v) => self.paper_size = v,
            StyleField::TableBordered(v) => self.table_bordered = v,
            StyleField::HeaderLayout(v) => self.header_layout = v,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bold_preset_keeps_independent_fields() {
        let mut style = InvoiceStyle::default();
        style.set(StyleField::FontSize(17.0));
        style.set(StyleField::ShowTerms(false));
        style.set(StyleField::PaperSize(PaperSize::Letter));

        style.apply_preset(TemplateName::Bold);

        assert_eq!(style.template, TemplateName::Bold);
        assert!(style.table_bordered);
        assert_eq!(style.header_layout, HeaderLayout::Left);
        assert_eq!(style.primary_color, "#dc2626");
        assert_eq!(style.accent_color, "#f59e0b");
        assert_eq!(style.font_size, 17.0);
        assert!(!style.show_terms);
        assert_eq!(style.paper_size, PaperSize::Letter);
    }

    #[test]
    fn preset_overrides_manual_colors_and_layout() {
        let mut style = InvoiceStyle::default();
        style.set(StyleField::PrimaryColor("not-a-color".into()));
        style.set(StyleField::HeaderLayout(HeaderLayout::Split));
        style.apply_preset(TemplateName::Executive);
        assert_eq!(style.primary_color, "#1e3a5f");
        assert_eq!(style.header_layout, HeaderLayout::Center);
        assert!(style.table_bordered);
    }

    #[test]
    fn every_template_has_a_preset_and_decoration() {
        let plain: Vec<_> = TemplateName::ALL
            .into_iter()
            .filter(|t| t.decoration() == Decoration::None)
            .collect();
        assert_eq!(plain, vec![TemplateName::Classic, TemplateName::Minimal]);
        assert_eq!(template_catalog().len(), 8);
        assert_eq!("Stripe".parse::<TemplateName>().unwrap(), TemplateName::Stripe);
        assert!("neon".parse::<TemplateName>().is_err());
    }

    #[test]
    fn style_round_trips_with_wire_names() {
        let json = serde_json::json!({
            "template": "elegant",
            "paperSize": "letter",
            "headerLayout": "split",
            "fontSize": 11
        });
        let style: InvoiceStyle = serde_json::from_value(json).unwrap();
        assert_eq!(style.template, TemplateName::Elegant);
        assert_eq!(style.paper_size, PaperSize::Letter);
        assert_eq!(style.header_layout, HeaderLayout::Split);
        assert_eq!(style.font_size, 11.0);
        assert!(style.show_logo);
    }
}
