//! # Parse 模块
//!
//! 解析统计项上携带的数值属性（如 `data-value="1,250"`）。
//!
//! ## 规则
//!
//! 1. 属性缺失或为空字符串时视为 `"0"`
//! 2. 去掉所有千分位逗号
//! 3. 跳过前导空白，取最长的合法数字前缀（`"12px"` -> 12，`"1e3"` -> 1000）
//! 4. 没有任何数字前缀时视为格式错误，由 [`MalformedValuePolicy`] 决定结果

use serde::{Deserialize, Serialize};

use crate::error::ValueParseError;

/// 格式错误数值的处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedValuePolicy {
    /// 保留 NaN，最终显示 `"NaN"`
    #[default]
    Propagate,
    /// 当作 0 处理
    Zero,
}

impl MalformedValuePolicy {
    /// 格式错误时使用的替代值
    pub fn fallback(&self) -> f64 {
        match self {
            Self::Propagate => f64::NAN,
            Self::Zero => 0.0,
        }
    }
}

/// 属性读取结果
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedAttribute {
    /// 最终采用的数值
    pub value: f64,
    /// 解析失败时的错误（值已按策略替换）
    pub error: Option<ValueParseError>,
}

/// 读取统计项的数值属性
///
/// 缺失或空字符串得到 0；格式错误时按 `policy` 替换，并在 `error` 中保留原因。
pub fn read_stat_attribute(raw: Option<&str>, policy: MalformedValuePolicy) -> ParsedAttribute {
    let raw = match raw {
        Some(raw) if !raw.is_empty() => raw,
        _ => {
            return ParsedAttribute {
                value: 0.0,
                error: None,
            };
        }
    };

    match parse_stat_value(raw) {
        Ok(value) => ParsedAttribute { value, error: None },
        Err(e) => ParsedAttribute {
            value: policy.fallback(),
            error: Some(e),
        },
    }
}

/// 解析带千分位逗号的数值字符串
pub fn parse_stat_value(raw: &str) -> Result<f64, ValueParseError> {
    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
    parse_float_prefix(&cleaned).ok_or_else(|| ValueParseError::Malformed {
        raw: raw.to_string(),
    })
}

/// 取字符串中最长的合法浮点数前缀
fn parse_float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let sign = if negative { -1.0 } else { 1.0 };

    if rest.starts_with("Infinity") {
        return Some(sign * f64::INFINITY);
    }

    let bytes = rest.as_bytes();
    let mut i = 0;

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let int_digits = &rest[int_start..i];

    let mut frac_digits = "";
    if i < bytes.len() && bytes[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        frac_digits = &rest[frac_start..j];
        i = j;
    }

    if int_digits.is_empty() && frac_digits.is_empty() {
        return None;
    }

    // 指数部分必须至少有一位数字，否则忽略
    let mut exponent = "";
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        let digits_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > digits_start {
            exponent = &rest[i + 1..j];
        }
    }

    let mut normalized = String::with_capacity(int_digits.len() + frac_digits.len() + 8);
    normalized.push_str(if int_digits.is_empty() { "0" } else { int_digits });
    normalized.push('.');
    normalized.push_str(if frac_digits.is_empty() { "0" } else { frac_digits });
    if !exponent.is_empty() {
        normalized.push('e');
        normalized.push_str(exponent);
    }

    normalized.parse::<f64>().ok().map(|v| sign * v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_and_grouped() {
        assert_eq!(parse_stat_value("0"), Ok(0.0));
        assert_eq!(parse_stat_value("42"), Ok(42.0));
        assert_eq!(parse_stat_value("1,250"), Ok(1250.0));
        assert_eq!(parse_stat_value("1,234,567.5"), Ok(1234567.5));
        assert_eq!(parse_stat_value("-3,000"), Ok(-3000.0));
    }

    #[test]
    fn test_prefix_rules() {
        assert_eq!(parse_stat_value("  12px"), Ok(12.0));
        assert_eq!(parse_stat_value(".5"), Ok(0.5));
        assert_eq!(parse_stat_value("7."), Ok(7.0));
        assert_eq!(parse_stat_value("1e3"), Ok(1000.0));
        assert_eq!(parse_stat_value("2e"), Ok(2.0));
        assert_eq!(parse_stat_value("2e+x"), Ok(2.0));
        assert_eq!(parse_stat_value("1.5.2"), Ok(1.5));
        assert_eq!(parse_stat_value("Infinity"), Ok(f64::INFINITY));
        assert_eq!(parse_stat_value("-Infinity"), Ok(f64::NEG_INFINITY));
    }

    #[test]
    fn test_malformed() {
        for raw in ["abc", "", "   ", "-", ".", "$100", "e5"] {
            assert_eq!(
                parse_stat_value(raw),
                Err(ValueParseError::Malformed {
                    raw: raw.to_string()
                }),
                "{raw:?}"
            );
        }
    }

    #[test]
    fn test_read_missing_attribute() {
        let parsed = read_stat_attribute(None, MalformedValuePolicy::Propagate);
        assert_eq!(parsed.value, 0.0);
        assert!(parsed.error.is_none());

        // 空字符串与缺失一样回退到 "0"
        let parsed = read_stat_attribute(Some(""), MalformedValuePolicy::Propagate);
        assert_eq!(parsed.value, 0.0);
        assert!(parsed.error.is_none());
    }

    #[test]
    fn test_read_malformed_attribute_policies() {
        let parsed = read_stat_attribute(Some("n/a"), MalformedValuePolicy::Propagate);
        assert!(parsed.value.is_nan());
        assert!(parsed.error.is_some());

        let parsed = read_stat_attribute(Some("n/a"), MalformedValuePolicy::Zero);
        assert_eq!(parsed.value, 0.0);
        assert!(parsed.error.is_some());
    }
}
