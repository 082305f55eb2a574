//! 匹配模块：候选分类、用户选择合并、会话管理与名称渲染
pub mod merger;
pub mod policy;
pub mod session;
pub mod label;

// 导出核心接口
pub use self::merger::{Selection, SelectionMerger};
pub use self::policy::{DownloadRequest, MatchPolicy};
pub use self::session::MatchSession;
pub use self::label::{LABEL_PLACEHOLDER, render_task_label, render_task_labels};
