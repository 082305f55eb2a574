//! 匹配会话：持有新建条目弹窗中的候选列表，串行化每一次重新推导
//!
//! 推导过程"读取上一轮结果 -> 合并 -> 写回"在同一把锁内完成，
//! 渲染方只能拿到完整的快照，不会看到中间状态。

use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

use super::policy::{DownloadRequest, MatchPolicy};
use crate::candidate::{CandidateKey, MatchedCandidate, RawCandidate};
use crate::compiler::{CompiledPattern, PatternCompiler};
use crate::config::MatchConfig;
use crate::error::{PatternError, PatternResult};
use crate::utils::Priority;

#[derive(Debug, Default)]
struct SessionState {
    config: MatchConfig,
    pattern: Option<CompiledPattern>,
    compile_error: Option<String>,
    candidates: Vec<RawCandidate>,
    derived: Vec<MatchedCandidate>,
}

impl SessionState {
    fn rederive(&mut self) {
        self.derived = MatchPolicy::derive_with_config(
            &self.candidates,
            Some(self.derived.as_slice()),
            self.pattern.as_ref(),
            &self.config,
        );
    }

    fn find_mut(&mut self, key: CandidateKey) -> PatternResult<&mut MatchedCandidate> {
        self.derived
            .iter_mut()
            .find(|c| c.key() == key)
            .ok_or_else(|| PatternError::InvalidInput(format!("候选不存在：{}", key)))
    }
}

/// 匹配会话
#[derive(Debug, Default)]
pub struct MatchSession {
    state: Mutex<SessionState>,
}

impl MatchSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// 使用初始配置创建；正则无效时会话照常创建，错误可通过 compile_error 读取
    pub fn with_config(config: MatchConfig) -> Self {
        let session = Self::new();
        let _ = session.update_config(config);
        session
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(|poisoned: PoisonError<_>| {
            warn!("匹配会话锁已中毒，继续使用现有状态");
            poisoned.into_inner()
        })
    }

    /// 替换候选列表（排期数据重新拉取后调用）
    pub fn set_candidates(&self, candidates: Vec<RawCandidate>) {
        let mut state = self.lock();
        state.candidates = candidates;
        state.rederive();
    }

    /// 更新表单配置
    ///
    /// 正则编译失败时记录错误并返回，已有的分类结果保持不变；
    /// 正则为空视为尚未填写，不记录错误
    pub fn update_config(&self, config: MatchConfig) -> PatternResult<()> {
        let mut state = self.lock();

        let compiled = if state.config.regexp == config.regexp && state.pattern.is_some() {
            Ok(state.pattern.take())
        } else {
            PatternCompiler::compile_optional(&config.regexp)
        };

        let outcome = match compiled {
            Ok(pattern) => {
                state.pattern = pattern;
                state.compile_error = None;
                Ok(())
            }
            Err(e) => {
                state.pattern = None;
                state.compile_error = Some(e.field_message());
                Err(e)
            }
        };

        state.config = config;
        state.rederive();
        debug!("匹配配置已更新，候选{}条", state.derived.len());
        outcome
    }

    /// 当前正则的编译错误（用于表单字段提示）
    pub fn compile_error(&self) -> Option<String> {
        self.lock().compile_error.clone()
    }

    pub fn config(&self) -> MatchConfig {
        self.lock().config.clone()
    }

    /// 切换选中状态，仅已匹配的候选可以切换；返回切换后的状态
    pub fn toggle_selected(&self, key: CandidateKey) -> PatternResult<bool> {
        let mut state = self.lock();
        let candidate = state.find_mut(key)?;
        if !candidate.matched {
            return Err(PatternError::InvalidInput(format!("候选未匹配，不能选择：{}", key)));
        }
        candidate.selected = !candidate.selected;
        Ok(candidate.selected)
    }

    /// 设置或清除候选的优先级（None 表示沿用条目默认值）
    pub fn set_priority(&self, key: CandidateKey, priority: Option<Priority>) -> PatternResult<()> {
        let mut state = self.lock();
        let candidate = state.find_mut(key)?;
        candidate.priority = priority;
        Ok(())
    }

    /// 当前推导结果的完整快照
    pub fn snapshot(&self) -> Vec<MatchedCandidate> {
        self.lock().derived.clone()
    }

    /// 会被提交为下载任务的候选
    pub fn chosen(&self) -> Vec<MatchedCandidate> {
        MatchPolicy::chosen(&self.lock().derived)
            .into_iter()
            .cloned()
            .collect()
    }

    /// 生成下载请求，未单独设置优先级的候选使用当前表单默认值
    pub fn download_requests(&self) -> Vec<DownloadRequest> {
        let state = self.lock();
        MatchPolicy::download_requests(&state.derived, state.config.priority)
    }
}
