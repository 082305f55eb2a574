//! 编译后模式模型
//! 正则编译后的结构与单次匹配结果

use regex::Regex;

/// 编译后的正则模式（只能由 PatternCompiler 构造，存在即有效）
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    source: String,
    regex: Regex,
}

impl CompiledPattern {
    pub(crate) fn new(source: String, regex: Regex) -> Self {
        Self { source, regex }
    }

    /// 用户输入的原始正则
    pub fn source(&self) -> &str {
        &self.source
    }

    /// 改写后实际交给正则引擎的表达式
    pub fn expanded(&self) -> &str {
        self.regex.as_str()
    }

    /// 简单匹配判断
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// 执行一次匹配（仅最左侧第一处），未匹配时返回空结果
    pub fn exec<'t>(&self, text: &'t str) -> MatchResult<'t> {
        let Some(captures) = self.regex.captures(text) else {
            return MatchResult::empty();
        };

        // 未参与匹配的可选分组保留为空字符串，保证替换是全函数
        let groups = captures
            .iter()
            .map(|group| group.map_or("", |m| m.as_str()))
            .collect();

        MatchResult { groups }
    }

    /// 分组数量（含第 0 组）
    pub fn group_count(&self) -> usize {
        self.regex.captures_len()
    }
}

/// 单次匹配结果：下标 0 为整体匹配，1..N 为按声明顺序的捕获分组
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchResult<'t> {
    groups: Vec<&'t str>,
}

impl<'t> MatchResult<'t> {
    /// 未匹配
    pub fn empty() -> Self {
        Self { groups: Vec::new() }
    }

    pub fn is_matched(&self) -> bool {
        !self.groups.is_empty()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// 按下标取分组
    pub fn get(&self, index: usize) -> Option<&'t str> {
        self.groups.get(index).copied()
    }

    /// 按键取分组：键必须与下标的十进制字符串完全一致（"01" 不等于 "1"）
    pub fn lookup(&self, key: &str) -> Option<&'t str> {
        if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        if key.len() > 1 && key.starts_with('0') {
            return None;
        }
        key.parse::<usize>().ok().and_then(|index| self.get(index))
    }

    pub fn groups(&self) -> &[&'t str] {
        &self.groups
    }
}
