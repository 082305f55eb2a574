//! 数字输入解析与优先级步进

use std::fmt;
use serde::{Deserialize, Serialize};

use crate::error::{PatternError, PatternResult};

/// 数字输入框的原始值：可能已经是数字，也可能是用户输入的文本
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberInput {
    Number(i64),
    Text(String),
}

impl NumberInput {
    pub fn parse(&self) -> Option<i64> {
        match self {
            NumberInput::Number(n) => Some(*n),
            NumberInput::Text(s) => parse_number_input(s),
        }
    }
}

/// 按"前导整数"语义解析输入：
/// 跳过前导空白，可选正负号，读取连续数字，忽略其后内容；没有数字则返回 None。
/// 0x/0X 前缀按十六进制读取
pub fn parse_number_input(s: &str) -> Option<i64> {
    let trimmed = s.trim_start();
    let (negative, body) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let (radix, body) = match body.get(..2) {
        Some("0x") | Some("0X") => (16, &body[2..]),
        _ => (10, body),
    };

    let digits = body.bytes().take_while(|b| (*b as char).is_digit(radix)).count();
    if digits == 0 {
        return None;
    }

    // 溢出时饱和，与数字输入框的上下限处理保持一致
    let value = i64::from_str_radix(&body[..digits], radix).unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}

/// 下载优先级（1..=32）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Priority(u8);

impl Priority {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 32;
    /// 新建条目表单的默认优先级
    pub const DEFAULT: Priority = Priority(16);

    pub fn new(value: u8) -> PatternResult<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(PatternError::InvalidInput(format!(
                "优先级超出范围：{}（允许 {}-{}）",
                value,
                Self::MIN,
                Self::MAX
            )))
        }
    }

    /// 从文本输入解析，超出范围时截断到边界
    pub fn from_input(s: &str) -> Option<Self> {
        parse_number_input(s)
            .map(|v| Self(v.clamp(Self::MIN as i64, Self::MAX as i64) as u8))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// 加一，到上限后不再变化
    pub fn increment(self) -> Self {
        Self(self.0.saturating_add(1).min(Self::MAX))
    }

    /// 减一，到下限后不再变化
    pub fn decrement(self) -> Self {
        Self(self.0.saturating_sub(1).max(Self::MIN))
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u8> for Priority {
    type Error = PatternError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Priority> for u8 {
    fn from(p: Priority) -> Self {
        p.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 列表中按两位显示
        write!(f, "{:02}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_leading_integer() {
        assert_eq!(parse_number_input("42"), Some(42));
        assert_eq!(parse_number_input("  12abc"), Some(12));
        assert_eq!(parse_number_input("-7"), Some(-7));
        assert_eq!(parse_number_input("+3.9"), Some(3));
        assert_eq!(parse_number_input("abc"), None);
        assert_eq!(parse_number_input(""), None);
        assert_eq!(parse_number_input("-"), None);
    }

    #[test]
    fn test_parse_hex_prefix() {
        assert_eq!(parse_number_input("0x10"), Some(16));
        assert_eq!(parse_number_input(" -0x1f"), Some(-31));
        assert_eq!(parse_number_input("0X1g"), Some(1));
        assert_eq!(parse_number_input("0x"), None);
        assert_eq!(parse_number_input("0xg"), None);
        assert_eq!(Priority::from_input("0x10").map(Priority::value), Some(16));
    }

    #[test]
    fn test_number_input_variants() {
        assert_eq!(NumberInput::Number(5).parse(), Some(5));
        assert_eq!(NumberInput::Text("08".to_string()).parse(), Some(8));
        let parsed: NumberInput = serde_json::from_str("\"x\"").unwrap();
        assert_eq!(parsed.parse(), None);
    }

    #[test]
    fn test_priority_bounds() {
        assert!(Priority::new(0).is_err());
        assert!(Priority::new(33).is_err());
        let max = Priority::new(32).unwrap();
        assert_eq!(max.increment(), max);
        let min = Priority::new(1).unwrap();
        assert_eq!(min.decrement(), min);
        assert_eq!(Priority::new(16).unwrap().increment().value(), 17);
    }

    #[test]
    fn test_priority_from_input_clamps() {
        assert_eq!(Priority::from_input("99").map(Priority::value), Some(32));
        assert_eq!(Priority::from_input("0").map(Priority::value), Some(1));
        assert_eq!(Priority::from_input("x"), None);
    }

    #[test]
    fn test_priority_display_and_serde() {
        let p = Priority::new(7).unwrap();
        assert_eq!(p.to_string(), "07");
        assert_eq!(serde_json::to_string(&p).unwrap(), "7");
        assert!(serde_json::from_str::<Priority>("40").is_err());
        assert!(serde_json::from_str::<Priority>("0").is_err());
        assert_eq!(Priority::default().value(), 16);
    }
}
