//! # Format 模块
//!
//! 数值的本地化显示：千分位分组 + 小数位截断。
//!
//! 默认行为与浏览器 `en-US` 下的 `Number.prototype.toLocaleString()` 一致：
//!
//! ```text
//! 1250        -> "1,250"
//! -1234567    -> "-1,234,567"
//! 1250.75     -> "1,250.75"
//! 0.1234      -> "0.123"
//! NaN         -> "NaN"
//! ```

use serde::{Deserialize, Serialize};

/// 数值显示格式
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberFormat {
    /// 千分位分隔符
    #[serde(default = "default_group_separator")]
    pub group_separator: String,

    /// 小数点
    #[serde(default = "default_decimal_separator")]
    pub decimal_separator: String,

    /// 最多保留的小数位数（末尾的 0 会被去掉）
    #[serde(default = "default_max_fraction_digits")]
    pub max_fraction_digits: usize,
}

fn default_group_separator() -> String {
    ",".to_string()
}

fn default_decimal_separator() -> String {
    ".".to_string()
}

fn default_max_fraction_digits() -> usize {
    3
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            group_separator: default_group_separator(),
            decimal_separator: default_decimal_separator(),
            max_fraction_digits: default_max_fraction_digits(),
        }
    }
}

impl NumberFormat {
    /// 格式化数值
    pub fn format(&self, value: f64) -> String {
        if value.is_nan() {
            return "NaN".to_string();
        }
        if value.is_infinite() {
            return if value > 0.0 { "∞" } else { "-∞" }.to_string();
        }

        let rounded = format!("{:.*}", self.max_fraction_digits, value.abs());
        let (int_part, frac_part) = match rounded.split_once('.') {
            Some((int_part, frac_part)) => (int_part, frac_part.trim_end_matches('0')),
            None => (rounded.as_str(), ""),
        };

        // 舍入后为 0 的负数（含 -0.0）不带符号
        let is_zero = int_part.bytes().all(|b| b == b'0') && frac_part.is_empty();
        let mut out = String::with_capacity(rounded.len() + rounded.len() / 3 + 1);
        if value.is_sign_negative() && !is_zero {
            out.push('-');
        }
        out.push_str(&group_digits(int_part, &self.group_separator));
        if !frac_part.is_empty() {
            out.push_str(&self.decimal_separator);
            out.push_str(frac_part);
        }
        out
    }
}

/// 按三位一组插入分隔符
fn group_digits(digits: &str, separator: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + (len / 3) * separator.len());
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(ch);
    }
    out
}

/// 使用默认格式（`en-US`）格式化数值
pub fn format_grouped(value: f64) -> String {
    NumberFormat::default().format(value)
}
