//! 编译模块：将用户正则编译为可执行模式
pub mod pattern;
pub mod compiler;

pub use self::pattern::{CompiledPattern, MatchResult};
pub use self::compiler::PatternCompiler;
