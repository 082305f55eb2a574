//! 用户选择合并工具
//! 负责在重新匹配时按候选身份保留用户手动设置的选中状态与优先级，并标记重复的目标文件名

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::candidate::{CandidateKey, MatchedCandidate};
use crate::utils::Priority;

/// 用户对单个候选的手动设置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub selected: bool,
    pub priority: Option<Priority>,
}

/// 选择合并工具
pub struct SelectionMerger;

impl SelectionMerger {
    /// 从上一轮结果中收集用户设置（同一身份重复出现时以首次为准）
    pub fn collect(prior: &[MatchedCandidate]) -> HashMap<CandidateKey, Selection> {
        let mut selections = HashMap::with_capacity(prior.len());
        for candidate in prior {
            if let Entry::Vacant(entry) = selections.entry(candidate.key()) {
                entry.insert(Selection {
                    selected: candidate.selected,
                    priority: candidate.priority,
                });
            }
        }
        selections
    }

    /// 把用户设置写回本轮结果，返回保留下来的条数
    pub fn carry_forward(
        selections: &HashMap<CandidateKey, Selection>,
        derived: &mut [MatchedCandidate],
    ) -> usize {
        let mut carried = 0;
        for candidate in derived.iter_mut() {
            if let Some(selection) = selections.get(&candidate.key()) {
                candidate.selected = selection.selected;
                candidate.priority = selection.priority;
                carried += 1;
            }
        }
        carried
    }

    /// 标记目标文件名与其他已匹配候选重复的项（未匹配的候选不参与）
    pub fn mark_repeated(derived: &mut [MatchedCandidate]) -> usize {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for candidate in derived.iter().filter(|c| c.matched) {
            *counts.entry(candidate.matched_text.clone()).or_insert(0) += 1;
        }

        let mut repeated = 0;
        for candidate in derived.iter_mut() {
            candidate.repeated = candidate.matched
                && counts.get(&candidate.matched_text).is_some_and(|&n| n > 1);
            if candidate.repeated {
                repeated += 1;
            }
        }
        repeated
    }
}
