use bigdecimal::{BigDecimal, RoundingMode, ToPrimitive, Zero};

use crate::error::WordsError;

const ONES: [&str; 20] = [
    "", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten", "Eleven",
    "Twelve", "Thirteen", "Fourteen", "Fifteen", "Sixteen", "Seventeen", "Eighteen", "Nineteen",
];

const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

const SCALES: [&str; 4] = ["", "Thousand", "Million", "Billion"];

/// 支持的整数部分上限 (不含), 即 Billion 级别之上
const LIMIT: u64 = 1_000_000_000_000;

/// 0..=999 的英文拼写, 0 返回空串
fn hundreds(n: u64) -> String {
    match n {
        0 => String::new(),
        1..=19 => ONES[n as usize].to_string(),
        20..=99 => {
            let tens = TENS[(n / 10) as usize];
            match n % 10 {
                0 => tens.to_string(),
                ones => format!("{} {}", tens, ONES[ones as usize]),
            }
        }
        _ => {
            let head = format!("{} Hundred", ONES[(n / 100) as usize]);
            match n % 100 {
                0 => head,
                rest => format!("{} And {}", head, hundreds(rest)),
            }
        }
    }
}

/// 整数部分按千分组, 高位在前
fn integer_words(mut n: u64) -> String {
    let mut groups: Vec<String> = Vec::new();
    let mut scale = 0;
    while n > 0 {
        let chunk = n % 1000;
        if chunk > 0 {
            let words = hundreds(chunk);
            groups.push(match SCALES[scale] {
                "" => words,
                label => format!("{} {}", words, label),
            });
        }
        n /= 1000;
        scale += 1;
    }
    groups.reverse();
    groups.join(" ")
}

/// 金额转英文大写
///
/// 小数部分先四舍五入到分 (0.995 进位为 1 主单位), 非零时追加
/// `And <words> <minor>`. 整数部分为零时写作 `Zero <major>`.
pub fn number_to_words(amount: &BigDecimal, major: &str, minor: &str) -> Result<String, WordsError> {
    if *amount < BigDecimal::zero() {
        return Err(WordsError::Negative);
    }

    let cents = (amount.with_scale_round(2, RoundingMode::HalfUp) * BigDecimal::from(100))
        .with_scale(0)
        .to_u64()
        .ok_or(WordsError::OutOfRange)?;
    let (whole, fraction) = (cents / 100, cents % 100);
    if whole >= LIMIT {
        return Err(WordsError::OutOfRange);
    }

    let mut result = if whole == 0 {
        format!("Zero {}", major)
    } else {
        format!("{} {}", integer_words(whole), major)
    };
    if fraction > 0 {
        result.push_str(&format!(" And {} {}", hundreds(fraction), minor));
    }
    Ok(result)
}

/// 发票使用的迪拉姆/费尔斯写法
pub fn amount_in_words(amount: &BigDecimal) -> Result<String, WordsError> {
    number_to_words(amount, "Dirhams", "Fils")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::money::decimal;

    fn words(v: f64) -> String {
        amount_in_words(&decimal(v)).unwrap()
    }

    #[test]
    fn zero_and_simple_amounts() {
        assert_eq!(words(0.0), "Zero Dirhams");
        assert_eq!(words(105.5), "One Hundred And Five Dirhams And Fifty Fils");
        assert_eq!(words(1000.0), "One Thousand Dirhams");
        assert_eq!(words(19.0), "Nineteen Dirhams");
        assert_eq!(words(40.0), "Forty Dirhams");
    }

    #[test]
    fn scales_skip_empty_groups() {
        assert_eq!(words(1_000_001.0), "One Million One Dirhams");
        assert_eq!(
            words(2_300_045.07),
            "Two Million Three Hundred Thousand Forty Five Dirhams And Seven Fils"
        );
        assert_eq!(
            words(999_999_999_999.0),
            "Nine Hundred And Ninety Nine Billion Nine Hundred And Ninety Nine Million \
             Nine Hundred And Ninety Nine Thousand Nine Hundred And Ninety Nine Dirhams"
        );
    }

    #[test]
    fn fraction_rounds_to_whole_fils() {
        assert_eq!(words(0.5), "Zero Dirhams And Fifty Fils");
        assert_eq!(words(1.005), "One Dirhams And One Fils");
        assert_eq!(words(2.999), "Three Dirhams");
        assert_eq!(words(0.004), "Zero Dirhams");
    }

    #[test]
    fn custom_units() {
        let s = number_to_words(&decimal(3.25), "Dollars", "Cents").unwrap();
        assert_eq!(s, "Three Dollars And Twenty Five Cents");
    }

    #[test]
    fn rejects_out_of_range() {
        assert_eq!(amount_in_words(&decimal(-1.0)), Err(WordsError::Negative));
        assert_eq!(amount_in_words(&decimal(1e12)), Err(WordsError::OutOfRange));
        assert_eq!(amount_in_words(&decimal(1e30)), Err(WordsError::OutOfRange));
    }
}
