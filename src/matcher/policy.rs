//! 匹配策略核心：对一批候选消息执行主正则匹配、二次校验与文件名渲染
use std::time::Instant;
use tracing::debug;

use super::merger::SelectionMerger;
use crate::candidate::{MatchedCandidate, RawCandidate};
use crate::compiler::CompiledPattern;
use crate::config::MatchConfig;
use crate::utils::{Priority, TemplateSubstitutor};

/// 提交下载时的请求体
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DownloadRequest {
    pub channel_id: i64,
    pub message_id: i64,
    pub priority: Priority,
}

/// 匹配策略
pub struct MatchPolicy;

impl MatchPolicy {
    /// 重新推导候选列表
    ///
    /// - `pattern` 为 None（正则为空或编译失败）时不重新分类：
    ///   已有结果的候选原样保留，新出现的候选以未分类状态加入
    /// - 每个候选只执行一次匹配，主匹配失败的候选不会被二次校验提升
    /// - 未匹配的候选同样渲染 `matched_text`，方便调试正则
    /// - 用户的选中状态与优先级按候选身份保留
    pub fn derive_matches(
        candidates: &[RawCandidate],
        prior: Option<&[MatchedCandidate]>,
        pattern: Option<&CompiledPattern>,
        output_template: &str,
        match_pattern: &str,
        match_content: &str,
    ) -> Vec<MatchedCandidate> {
        let start = Instant::now();
        let prior = prior.unwrap_or(&[]);

        let Some(pattern) = pattern else {
            return Self::keep_previous(candidates, prior);
        };

        // 1. 分类并渲染
        let mut derived: Vec<MatchedCandidate> = candidates
            .iter()
            .map(|raw| Self::classify(raw, pattern, output_template, match_pattern, match_content))
            .collect();

        // 2. 保留用户设置
        let selections = SelectionMerger::collect(prior);
        let carried = SelectionMerger::carry_forward(&selections, &mut derived);

        // 3. 标记重复目标
        let repeated = SelectionMerger::mark_repeated(&mut derived);

        debug!(
            "候选匹配完成，耗时{:?}：共{}条，匹配{}条，保留用户设置{}条，目标重复{}条",
            start.elapsed(),
            derived.len(),
            derived.iter().filter(|c| c.matched).count(),
            carried,
            repeated
        );

        derived
    }

    /// 使用表单配置推导
    pub fn derive_with_config(
        candidates: &[RawCandidate],
        prior: Option<&[MatchedCandidate]>,
        pattern: Option<&CompiledPattern>,
        config: &MatchConfig,
    ) -> Vec<MatchedCandidate> {
        Self::derive_matches(
            candidates,
            prior,
            pattern,
            &config.pattern,
            &config.match_pattern,
            &config.match_content,
        )
    }

    /// 单个候选分类
    fn classify(
        raw: &RawCandidate,
        pattern: &CompiledPattern,
        output_template: &str,
        match_pattern: &str,
        match_content: &str,
    ) -> MatchedCandidate {
        let result = pattern.exec(&raw.text);

        let mut matched = result.is_matched();
        if matched && !match_pattern.is_empty() {
            matched = TemplateSubstitutor::render(match_pattern, &result) == match_content;
        }

        MatchedCandidate {
            matched,
            matched_text: TemplateSubstitutor::render(output_template, &result),
            ..MatchedCandidate::fresh(raw.clone())
        }
    }

    /// 正则不可用时保持上一轮结果
    fn keep_previous(candidates: &[RawCandidate], prior: &[MatchedCandidate]) -> Vec<MatchedCandidate> {
        candidates
            .iter()
            .map(|raw| {
                prior
                    .iter()
                    .find(|c| c.key() == raw.key())
                    .cloned()
                    .unwrap_or_else(|| MatchedCandidate::fresh(raw.clone()))
            })
            .collect()
    }

    /// 会被提交为下载任务的候选
    pub fn chosen(derived: &[MatchedCandidate]) -> Vec<&MatchedCandidate> {
        derived.iter().filter(|c| c.is_chosen()).collect()
    }

    /// 生成下载请求，优先级在此刻按表单默认值解析
    pub fn download_requests(derived: &[MatchedCandidate], form_default: Priority) -> Vec<DownloadRequest> {
        Self::chosen(derived)
            .into_iter()
            .map(|c| DownloadRequest {
                channel_id: c.raw.channel_id,
                message_id: c.raw.msg_id,
                priority: c.effective_priority(form_default),
            })
            .collect()
    }
}
