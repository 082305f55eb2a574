//! onest-pattern - 订阅条目正则匹配与文件名模板替换引擎

// 导出全局错误类型
pub use self::error::{PatternError, PatternResult};

// 导出配置模块
pub use self::config::{MatchConfig, ConfigManager, MatchConfigBuilder, DEFAULT_PRIORITY};

// 导出数据模型
pub use self::candidate::{CandidateKey, RawCandidate, MatchedCandidate, Item, Task};

// 导出编译模块核心接口
pub use self::compiler::{PatternCompiler, CompiledPattern, MatchResult};

// 导出工具模块核心接口
pub use self::utils::{TemplateSubstitutor, NumberInput, Priority, parse_number_input};

// 导出匹配模块核心接口
pub use self::matcher::{
    MatchPolicy,
    MatchSession,
    DownloadRequest,
    SelectionMerger,
    render_task_label,
    render_task_labels,
};

// 声明所有子模块
pub mod config;
pub mod error;
pub mod candidate;
pub mod compiler;
pub mod utils;
pub mod matcher;

/// 编译用户正则
pub fn compile(source: &str) -> PatternResult<CompiledPattern> {
    PatternCompiler::compile(source)
}

/// 匹配一次并渲染模板
pub fn substitute(text: &str, pattern: &CompiledPattern, template: &str) -> String {
    TemplateSubstitutor::substitute(text, pattern, template)
}

/// 推导候选列表
pub fn derive_matches(
    candidates: &[RawCandidate],
    prior: Option<&[MatchedCandidate]>,
    pattern: Option<&CompiledPattern>,
    output_template: &str,
    match_pattern: &str,
    match_content: &str,
) -> Vec<MatchedCandidate> {
    MatchPolicy::derive_matches(candidates, prior, pattern, output_template, match_pattern, match_content)
}
