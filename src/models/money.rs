use bigdecimal::{BigDecimal, RoundingMode, ToPrimitive, Zero};
use serde::Serializer;
use std::str::FromStr;

/// f64 -> BigDecimal, 经最短十进制文本转换 (0.1 得到精确的 0.1)
pub fn decimal(value: f64) -> BigDecimal {
    if !value.is_finite() {
        return BigDecimal::zero();
    }
    BigDecimal::from_str(&value.to_string()).unwrap_or_else(|_| BigDecimal::zero())
}

/// 四舍五入到两位小数
pub fn round2(value: &BigDecimal) -> BigDecimal {
    value.with_scale_round(2, RoundingMode::HalfUp)
}

/// 金额显示, 固定两位小数
pub fn money(value: &BigDecimal) -> String {
    round2(value).to_string()
}

pub fn money_f64(value: f64) -> String {
    money(&decimal(value))
}

/// 百分比显示为整数加 "%"
pub fn percent(value: f64) -> String {
    if value.is_finite() {
        format!("{}%", value.round() as i64)
    } else {
        "0%".to_string()
    }
}

/// 两位小数后的 f64, 用于写回 webhook 的数值字段
pub fn to_f64_rounded(value: &BigDecimal) -> f64 {
    round2(value).to_f64().unwrap_or(0.0)
}

/// serde: BigDecimal 序列化为两位小数的 JSON 数字
pub fn serialize_money<S>(value: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_f64(to_f64_rounded(value))
}
