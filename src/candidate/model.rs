//! 候选消息数据模型定义
//! 仅存储数据，无任何业务逻辑，支持序列化/反序列化

use std::fmt;
use serde::{Deserialize, Serialize};

use crate::utils::Priority;

/// 候选消息的身份键（同一身份的用户选择在重新匹配时保留）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CandidateKey {
    pub id: i64,
    pub msg_id: i64,
}

impl fmt::Display for CandidateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.id, self.msg_id)
    }
}

/// 排期服务返回的原始消息（只读输入）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCandidate {
    pub id: i64,
    #[serde(default)]
    pub item_id: i64,
    #[serde(default)]
    pub channel_id: i64,
    #[serde(default)]
    pub channel_name: String,
    #[serde(default)]
    pub size: i64,
    pub text: String,
    #[serde(default)]
    pub file_suffix: String,
    #[serde(default)]
    pub msg_id: i64,
    #[serde(default)]
    pub supports_streaming: bool,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub date: i64,
}

impl RawCandidate {
    /// 从 ID 和文本快速创建（其余字段取默认值）
    pub fn from_text(id: i64, text: impl Into<String>) -> Self {
        Self {
            id,
            item_id: 0,
            channel_id: 0,
            channel_name: String::new(),
            size: 0,
            text: text.into(),
            file_suffix: String::new(),
            msg_id: id,
            supports_streaming: false,
            link: String::new(),
            date: 0,
        }
    }

    pub fn key(&self) -> CandidateKey {
        CandidateKey {
            id: self.id,
            msg_id: self.msg_id,
        }
    }
}

/// 匹配后的候选消息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedCandidate {
    #[serde(flatten)]
    pub raw: RawCandidate,
    pub matched: bool,
    pub matched_text: String,
    // 与其他已匹配候选的目标文件名重复
    #[serde(default)]
    pub repeated: bool,
    pub selected: bool,
    // None 表示沿用条目的默认优先级
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

impl MatchedCandidate {
    /// 新出现的候选：默认选中，优先级沿用条目默认值
    pub fn fresh(raw: RawCandidate) -> Self {
        Self {
            raw,
            matched: false,
            matched_text: String::new(),
            repeated: false,
            selected: true,
            priority: None,
        }
    }

    pub fn key(&self) -> CandidateKey {
        self.raw.key()
    }

    /// 实际生效的优先级：候选自身设置优先，否则取渲染时表单的默认值
    pub fn effective_priority(&self, form_default: Priority) -> Priority {
        self.priority.unwrap_or(form_default)
    }

    /// 是否会被提交为下载任务
    pub fn is_chosen(&self) -> bool {
        self.matched && self.selected
    }
}

// ======== 为 MatchedCandidate 实现 Display trait（用于 CLI 输出） ========
impl fmt::Display for MatchedCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = match (self.matched, self.selected) {
            (true, true) => "[x]",
            (true, false) => "[ ]",
            (false, _) => " - ",
        };
        write!(f, "{} {} -> {}", mark, self.raw.text, self.matched_text)
    }
}

/// 订阅条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    #[serde(default)]
    pub channel_id: i64,
    pub name: String,
    pub regexp: String,
    pub pattern: String,
    #[serde(default)]
    pub date_start: i64,
    #[serde(default)]
    pub date_end: i64,
    #[serde(default)]
    pub process: i64,
    pub priority: Priority,
    #[serde(default)]
    pub target_path: String,
}

/// 下载任务
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub item_id: i64,
    pub msg_id: i64,
    pub text: String,
    #[serde(default)]
    pub size: i64,
    #[serde(default)]
    pub date: i64,
    pub priority: Priority,
    #[serde(default)]
    pub downloading: bool,
    #[serde(default)]
    pub downloaded: bool,
    #[serde(default)]
    pub fatal_error: bool,
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub error_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_deserialize_with_missing_fields() {
        let raw: RawCandidate =
            serde_json::from_str(r#"{"id":1,"text":"[Group] Show S01E07 1080p","msg_id":99}"#).unwrap();
        assert_eq!(raw.key(), CandidateKey { id: 1, msg_id: 99 });
        assert_eq!(raw.file_suffix, "");
    }

    #[test]
    fn test_matched_flattens_raw() {
        let mut matched = MatchedCandidate::fresh(RawCandidate::from_text(3, "a"));
        let json = serde_json::to_value(&matched).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["selected"], true);
        assert!(json.get("priority").is_none());

        matched.priority = Some(Priority::new(20).unwrap());
        let back: MatchedCandidate =
            serde_json::from_str(&serde_json::to_string(&matched).unwrap()).unwrap();
        assert_eq!(back, matched);
    }

    #[test]
    fn test_effective_priority() {
        let mut matched = MatchedCandidate::fresh(RawCandidate::from_text(1, "a"));
        let eight = Priority::new(8).unwrap();
        assert_eq!(matched.effective_priority(Priority::DEFAULT), Priority::DEFAULT);
        assert_eq!(matched.effective_priority(eight), eight);
        matched.priority = Some(Priority::new(20).unwrap());
        assert_eq!(matched.effective_priority(eight).value(), 20);
    }

    #[test]
    fn test_out_of_range_priority_rejected() {
        for priority in ["0", "33", "200"] {
            let json = format!(r#"{{"id":1,"text":"a","matched":true,"matched_text":"","selected":true,"priority":{}}}"#, priority);
            assert!(serde_json::from_str::<MatchedCandidate>(&json).is_err(), "{}", priority);
        }
        let json = r#"{"id":1,"text":"a","matched":true,"matched_text":"","selected":true,"priority":12}"#;
        let parsed: MatchedCandidate = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.priority.map(Priority::value), Some(12));
    }

    #[test]
    fn test_is_chosen_requires_match() {
        let mut matched = MatchedCandidate::fresh(RawCandidate::from_text(1, "a"));
        assert!(!matched.is_chosen());
        matched.matched = true;
        assert!(matched.is_chosen());
        matched.selected = false;
        assert!(!matched.is_chosen());
    }
}
