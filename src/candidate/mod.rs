//! 候选模块：候选消息、条目与任务的数据模型定义
pub mod model;

// 导出核心接口
pub use self::model::{CandidateKey, RawCandidate, MatchedCandidate, Item, Task};
