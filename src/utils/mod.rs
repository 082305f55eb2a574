//! 工具模块：模板替换、数字输入解析
pub mod template;
pub mod number;

pub use self::template::TemplateSubstitutor;
pub use self::number::{NumberInput, Priority, parse_number_input};
