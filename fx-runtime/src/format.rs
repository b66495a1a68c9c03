//! # Format 模块
//!
//! 写入样式与文本时使用的数值格式化。

/// CSS 数值：整数不带小数点，`-0` 规整为 `0`
pub fn css_number(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    // -0.0 + 0.0 == +0.0
    format!("{}", value + 0.0)
}

/// 保留最多 `digits` 位小数
pub fn round_to(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (value * factor).round() / factor
}

pub fn px(value: f64) -> String {
    format!("{}px", css_number(value))
}

pub fn percent(value: f64) -> String {
    format!("{}%", css_number(value))
}

pub fn seconds(value: f64) -> String {
    format!("{}s", css_number(value))
}

/// 千位分组（`1234567` → `"1,234,567"`）
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    if value < 0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// 解析整数前缀：跳过前导空白，可选符号，随后尽可能多的十进制数字
///
/// `"1500+"` → `Some(1500)`，`"abc"` → `None`
pub fn parse_int_prefix(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = rest
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(rest.len(), |(i, _)| i);
    if end == 0 {
        return None;
    }

    let magnitude: i64 = rest[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// 解析有限浮点数
pub fn parse_finite(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
