//! 匹配配置管理,存储新建/编辑条目表单中与匹配相关的所有输入

use std::path::Path;
use serde::{Deserialize, Serialize};

use crate::error::PatternResult;
use crate::utils::Priority;

/// 条目默认优先级（新建条目表单的初始值）
pub const DEFAULT_PRIORITY: Priority = Priority::DEFAULT;

/// 匹配配置（不可变值，由调用方在每次输入变化时重新构建并传入）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    // 主正则（支持 \p{Han} 简写）
    pub regexp: String,
    // 输出文件名模板
    pub pattern: String,
    // 二次校验模板，为空则不校验
    pub match_pattern: String,
    // 二次校验期望值
    pub match_content: String,
    // 条目默认优先级
    pub priority: Priority,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            regexp: String::new(),
            pattern: String::new(),
            match_pattern: String::new(),
            match_content: String::new(),
            priority: DEFAULT_PRIORITY,
        }
    }
}

impl MatchConfig {
    /// 是否启用二次校验
    pub fn has_secondary_check(&self) -> bool {
        !self.match_pattern.is_empty()
    }
}

/// 配置管理器
pub struct ConfigManager;

impl ConfigManager {
    /// 获取默认配置
    pub fn get_default() -> MatchConfig {
        MatchConfig::default()
    }

    /// 自定义配置
    pub fn custom() -> MatchConfigBuilder {
        MatchConfigBuilder::new()
    }

    /// 从JSON字符串加载（缺失字段使用默认值）
    pub fn from_json_str(json: &str) -> PatternResult<MatchConfig> {
        Ok(serde_json::from_str(json)?)
    }

    /// 从JSON文件加载
    pub fn from_json_file(path: &Path) -> PatternResult<MatchConfig> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }
}

/// 配置构建器（便于自定义配置）
#[derive(Debug, Clone)]
pub struct MatchConfigBuilder {
    config: MatchConfig,
}

impl Default for MatchConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: MatchConfig::default(),
        }
    }

    pub fn regexp(mut self, regexp: impl Into<String>) -> Self {
        self.config.regexp = regexp.into();
        self
    }

    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.config.pattern = pattern.into();
        self
    }

    pub fn match_pattern(mut self, match_pattern: impl Into<String>) -> Self {
        self.config.match_pattern = match_pattern.into();
        self
    }

    pub fn match_content(mut self, match_content: impl Into<String>) -> Self {
        self.config.match_content = match_content.into();
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.config.priority = priority;
        self
    }

    pub fn build(self) -> MatchConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_priority() {
        let config = ConfigManager::get_default();
        assert_eq!(config.priority.value(), 16);
        assert!(!config.has_secondary_check());
    }

    #[test]
    fn test_builder_sets_fields() {
        let config = ConfigManager::custom()
            .regexp(r"S(\d+)E(\d+)")
            .pattern("S${1}E${2}")
            .match_pattern("$1")
            .match_content("01")
            .priority(Priority::new(20).unwrap())
            .build();
        assert_eq!(config.regexp, r"S(\d+)E(\d+)");
        assert_eq!(config.pattern, "S${1}E${2}");
        assert!(config.has_secondary_check());
        assert_eq!(config.priority.value(), 20);
    }

    #[test]
    fn test_from_json_fills_missing_fields() {
        let config = ConfigManager::from_json_str(r#"{"regexp":"(\\d+)","pattern":"$1"}"#).unwrap();
        assert_eq!(config.regexp, r"(\d+)");
        assert_eq!(config.pattern, "$1");
        assert_eq!(config.match_pattern, "");
        assert_eq!(config.priority, DEFAULT_PRIORITY);
    }

    #[test]
    fn test_from_json_rejects_out_of_range_priority() {
        assert!(ConfigManager::from_json_str(r#"{"priority":0}"#).is_err());
        assert!(ConfigManager::from_json_str(r#"{"priority":200}"#).is_err());
        let config = ConfigManager::from_json_str(r#"{"priority":32}"#).unwrap();
        assert_eq!(config.priority.value(), 32);
    }

    #[test]
    fn test_from_json_rejects_malformed() {
        assert!(ConfigManager::from_json_str("{regexp").is_err());
    }
}
