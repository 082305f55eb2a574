//! 正则编译器核心
//! 负责将用户输入的正则（含 \p{Name} 脚本简写）编译为可执行模式

use std::borrow::Cow;
use once_cell::sync::Lazy;
use regex::{Captures, Regex, RegexBuilder};
use tracing::{debug, warn};

use super::pattern::CompiledPattern;
use crate::error::{PatternError, PatternResult};

/// 编译后正则的体积上限，防止恶意输入撑爆内存
const REGEX_SIZE_LIMIT: usize = 1 << 22;

/// 正则编译器
pub struct PatternCompiler;

impl PatternCompiler {
    /// 编译用户正则（多行 + Unicode 语义）
    pub fn compile(source: &str) -> PatternResult<CompiledPattern> {
        if source.is_empty() {
            return Err(PatternError::EmptyPattern);
        }
        Self::build(source)
    }

    /// 允许空正则的编译：空串编译为匹配任意文本的空表达式（任务列表标签使用）
    pub fn compile_allow_empty(source: &str) -> PatternResult<CompiledPattern> {
        Self::build(source)
    }

    fn build(source: &str) -> PatternResult<CompiledPattern> {
        // 1. 改写脚本简写
        let expanded = Self::expand_script_escapes(source);
        if let Cow::Owned(ref rewritten) = expanded {
            debug!("脚本简写已改写：{} -> {}", source, rewritten);
        }

        // 2. \d \w \b 收窄为 ASCII 语义
        let expanded = Self::expand_ascii_classes(&expanded).into_owned();

        // 3. 编译正则；crlf 让 ^ $ 同时把 \r 视为行结束
        let regex = RegexBuilder::new(&expanded)
            .multi_line(true)
            .crlf(true)
            .unicode(true)
            .size_limit(REGEX_SIZE_LIMIT)
            .build()
            .map_err(|e| {
                warn!("正则编译失败：{}，错误：{}", source, e);
                PatternError::CompileError {
                    pattern: source.to_string(),
                    message: e.to_string(),
                }
            })?;

        Ok(CompiledPattern::new(source.to_string(), regex))
    }

    /// 编译可能为空的正则：空字符串表示"尚未填写"，返回 None 而不是错误
    pub fn compile_optional(source: &str) -> PatternResult<Option<CompiledPattern>> {
        if source.is_empty() {
            return Ok(None);
        }
        Self::compile(source).map(Some)
    }

    /// 仅校验，不保留编译结果（保存条目前使用）
    pub fn validate(source: &str) -> PatternResult<()> {
        Self::compile(source).map(|_| ())
    }

    /// 将 \p{Han} 改写为 \p{Script=Han}
    /// 只处理名称为纯字母的形式；已带 Script= 或其他属性写法的原样保留，
    /// 被转义的反斜杠（\\p{Han}）不视为属性转义
    pub fn expand_script_escapes(source: &str) -> Cow<'_, str> {
        static SCRIPT_ESCAPE_REGEX: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"(\\+)p\{([A-Za-z]+)\}").unwrap()
        });

        SCRIPT_ESCAPE_REGEX.replace_all(source, |caps: &Captures| {
            let slashes = &caps[1];
            // 偶数个反斜杠说明 p 前面是字面量反斜杠
            if slashes.len() % 2 == 0 {
                caps[0].to_string()
            } else {
                format!("{}p{{Script={}}}", slashes, &caps[2])
            }
        })
    }

    /// 将 \d \D \w \W \b 改写为 ASCII 版本
    /// 字符类内部使用 POSIX 写法（[\d_] -> [[:digit:]_]）；\B 保持原样，
    /// UTF-8 模式下无 ASCII 版本的非单词边界
    pub fn expand_ascii_classes(source: &str) -> Cow<'_, str> {
        let mut out = String::with_capacity(source.len() + 16);
        let mut changed = false;
        let mut depth = 0usize;
        let mut chars = source.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '\\' => {
                    let Some(next) = chars.next() else {
                        out.push(c);
                        break;
                    };
                    let replacement = match (next, depth > 0) {
                        ('d', false) => Some("[[:digit:]]"),
                        ('D', false) => Some("[[:^digit:]]"),
                        ('w', false) => Some("[[:word:]]"),
                        ('W', false) => Some("[[:^word:]]"),
                        ('b', false) => Some("(?-u:\\b)"),
                        ('d', true) => Some("[:digit:]"),
                        ('D', true) => Some("[:^digit:]"),
                        ('w', true) => Some("[:word:]"),
                        ('W', true) => Some("[:^word:]"),
                        _ => None,
                    };
                    match replacement {
                        Some(r) => {
                            out.push_str(r);
                            changed = true;
                        }
                        None => {
                            out.push(c);
                            out.push(next);
                        }
                    }
                }
                '[' if depth > 0 && chars.peek() == Some(&':') => {
                    // POSIX 类原样复制到 :]
                    out.push(c);
                    let mut prev = c;
                    for p in chars.by_ref() {
                        out.push(p);
                        if prev == ':' && p == ']' {
                            break;
                        }
                        prev = p;
                    }
                }
                '[' => {
                    depth += 1;
                    out.push(c);
                    if chars.peek() == Some(&'^') {
                        out.push('^');
                        chars.next();
                    }
                    // 紧跟在 [ 或 [^ 之后的 ] 是字面量
                    if chars.peek() == Some(&']') {
                        out.push(']');
                        chars.next();
                    }
                }
                ']' if depth > 0 => {
                    depth -= 1;
                    out.push(c);
                }
                _ => out.push(c),
            }
        }

        if changed {
            Cow::Owned(out)
        } else {
            Cow::Borrowed(source)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_bare_script() {
        assert_eq!(PatternCompiler::expand_script_escapes(r"\p{Han}+"), r"\p{Script=Han}+");
        assert_eq!(
            PatternCompiler::expand_script_escapes(r"[\p{Hiragana}\p{Katakana}]"),
            r"[\p{Script=Hiragana}\p{Script=Katakana}]"
        );
    }

    #[test]
    fn test_expand_is_noop_on_qualified_forms() {
        for source in [r"\p{Script=Han}", r"\p{sc=Han}", r"\pL", r"\p{Script_Extensions=Han}"] {
            let expanded = PatternCompiler::expand_script_escapes(source);
            assert!(matches!(expanded, Cow::Borrowed(_)), "{}", source);
            assert_eq!(expanded, source);
        }
    }

    #[test]
    fn test_expand_is_idempotent() {
        let once = PatternCompiler::expand_script_escapes(r"(\p{Han}+) \p{Latin}").into_owned();
        let twice = PatternCompiler::expand_script_escapes(&once).into_owned();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_expand_skips_escaped_backslash() {
        assert_eq!(PatternCompiler::expand_script_escapes(r"\\p{Han}"), r"\\p{Han}");
        assert_eq!(PatternCompiler::expand_script_escapes(r"\\\p{Han}"), r"\\\p{Script=Han}");
    }

    #[test]
    fn test_compile_han_script() {
        let pattern = PatternCompiler::compile(r"^\p{Han}+$").unwrap();
        assert!(pattern.is_match("进击的巨人"));
        assert!(!pattern.is_match("Attack"));
        assert_eq!(pattern.expanded(), r"^\p{Script=Han}+$");
        assert_eq!(pattern.source(), r"^\p{Han}+$");
    }

    #[test]
    fn test_compile_multiline_anchors() {
        let pattern = PatternCompiler::compile(r"^S(\d+)$").unwrap();
        assert!(pattern.is_match("title\nS01\nfooter"));
    }

    #[test]
    fn test_compile_crlf_line_endings() {
        let pattern = PatternCompiler::compile(r"^S(\d+)$").unwrap();
        assert!(pattern.is_match("title\r\nS01\r\nend"));
        assert_eq!(pattern.exec("title\r\nS01\r\nend").get(1), Some("01"));
    }

    #[test]
    fn test_word_class_is_ascii() {
        let pattern = PatternCompiler::compile(r"\[(\w+)\]").unwrap();
        assert!(!pattern.is_match("[字幕组] 进击的巨人"));
        assert!(pattern.is_match("[Group_01] Show"));
        assert!(PatternCompiler::compile(r"^\W+$").unwrap().is_match("字幕组"));
    }

    #[test]
    fn test_digit_class_is_ascii() {
        let pattern = PatternCompiler::compile(r"E(\d+)").unwrap();
        assert!(!pattern.is_match("E１２"));
        assert!(pattern.is_match("E12"));
        assert!(PatternCompiler::compile(r"^\D$").unwrap().is_match("１"));
    }

    #[test]
    fn test_word_boundary_is_ascii() {
        // 汉字不算单词字符，因此 "字a" 中间存在边界
        let pattern = PatternCompiler::compile(r"\ba").unwrap();
        assert!(pattern.is_match("字a"));
        assert!(!pattern.is_match("ba"));
    }

    #[test]
    fn test_expand_ascii_classes() {
        assert_eq!(PatternCompiler::expand_ascii_classes(r"S(\d+)"), "S([[:digit:]]+)");
        assert_eq!(PatternCompiler::expand_ascii_classes(r"[\d_]"), "[[:digit:]_]");
        assert_eq!(PatternCompiler::expand_ascii_classes(r"[^\W]"), "[^[:^word:]]");
        assert_eq!(PatternCompiler::expand_ascii_classes(r"\bx\B"), r"(?-u:\b)x\B");
        // 转义的反斜杠后面不是类
        assert_eq!(PatternCompiler::expand_ascii_classes(r"\\d"), r"\\d");
        // ] 紧跟 [ 时是字面量，后面的 \d 仍在类内
        assert_eq!(PatternCompiler::expand_ascii_classes(r"[]\d]"), "[][:digit:]]");
        assert_eq!(PatternCompiler::expand_ascii_classes(r"[[:alpha:]\w]"), "[[:alpha:][:word:]]");

        let untouched = PatternCompiler::expand_ascii_classes(r"\p{Script=Han}+\s");
        assert!(matches!(untouched, Cow::Borrowed(_)));
    }

    #[test]
    fn test_digit_class_inside_brackets_compiles() {
        let pattern = PatternCompiler::compile(r"^[\d_]+$").unwrap();
        assert!(pattern.is_match("01_02"));
        assert!(!pattern.is_match("０１"));
    }

    #[test]
    fn test_compile_allow_empty() {
        let pattern = PatternCompiler::compile_allow_empty("").unwrap();
        assert!(pattern.is_match("anything"));
        assert!(PatternCompiler::compile_allow_empty("(").is_err());
    }

    #[test]
    fn test_compile_astral_code_points() {
        // 𠀀 位于辅助平面，必须按码点而非 UTF-16 码元匹配
        let pattern = PatternCompiler::compile(r"^\p{Han}$").unwrap();
        assert!(pattern.is_match("𠀀"));
    }

    #[test]
    fn test_compile_error_carries_diagnostic() {
        let err = PatternCompiler::compile(r"S(\d+").unwrap_err();
        match err {
            PatternError::CompileError { pattern, message } => {
                assert_eq!(pattern, r"S(\d+");
                assert!(!message.is_empty());
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_compile_unknown_script_fails() {
        assert!(PatternCompiler::compile(r"\p{Klingon}").is_err());
    }

    #[test]
    fn test_compile_empty() {
        assert!(matches!(PatternCompiler::compile(""), Err(PatternError::EmptyPattern)));
        assert!(PatternCompiler::compile_optional("").unwrap().is_none());
        assert!(PatternCompiler::compile_optional(r"\d").unwrap().is_some());
    }

    #[test]
    fn test_validate() {
        assert!(PatternCompiler::validate(r"(\d+)").is_ok());
        assert!(PatternCompiler::validate(r"[").is_err());
    }
}
