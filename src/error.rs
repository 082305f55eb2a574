//! 全局错误类型定义

use thiserror::Error;
use serde_json::Error as SerdeJsonError;
use std::io::Error as IoError;

#[derive(Error, Debug)]
pub enum PatternError {
    // 编译相关错误
    #[error("正则表达式为空")]
    EmptyPattern,
    #[error("正则编译失败：{message}")]
    CompileError {
        /// 用户输入的原始正则
        pattern: String,
        /// 正则引擎给出的诊断信息
        message: String,
    },

    // 交互相关错误
    #[error("无效输入：{0}")]
    InvalidInput(String),

    // 序列化/反序列化错误
    #[error("JSON解析失败：{0}")]
    JsonError(#[from] SerdeJsonError),

    // 基础错误
    #[error("IO操作失败：{0}")]
    IoError(#[from] IoError),
}

impl PatternError {
    /// 表单字段级别的提示文本（直接展示在正则输入框下方）
    pub fn field_message(&self) -> String {
        match self {
            PatternError::CompileError { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

// 全局Result类型
pub type PatternResult<T> = Result<T, PatternError>;
