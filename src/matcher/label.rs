//! 任务/条目预览名称渲染（下载列表、编辑条目预览共用）
use tracing::debug;

use crate::candidate::{Item, Task};
use crate::compiler::PatternCompiler;
use crate::utils::TemplateSubstitutor;

/// 条目正则无法编译时显示的占位文本
pub const LABEL_PLACEHOLDER: &str = "---";

/// 使用条目的正则与模板渲染一段文本
/// 空正则按空表达式编译（匹配任意文本），只有编译失败才显示占位文本
pub fn render_task_label(text: &str, item: &Item) -> String {
    match PatternCompiler::compile_allow_empty(&item.regexp) {
        Ok(pattern) => TemplateSubstitutor::substitute(text, &pattern, &item.pattern),
        Err(e) => {
            debug!("条目{}的正则不可用，显示占位文本：{}", item.id, e);
            LABEL_PLACEHOLDER.to_string()
        }
    }
}

/// 为一组任务批量渲染名称；同一条目的正则只编译一次
pub fn render_task_labels(tasks: &[Task], item: &Item) -> Vec<String> {
    let Ok(pattern) = PatternCompiler::compile_allow_empty(&item.regexp) else {
        return vec![LABEL_PLACEHOLDER.to_string(); tasks.len()];
    };
    tasks
        .iter()
        .map(|task| TemplateSubstitutor::substitute(&task.text, &pattern, &item.pattern))
        .collect()
}
