//! 模板替换工具模块
//! 负责根据正则匹配结果，把文件名模板中的占位符替换为对应分组内容
//! 支持 $1/$12 与 ${1} 两种分组引用格式，无法解析的占位符替换为空字符串

use crate::compiler::{CompiledPattern, MatchResult};

/// 模板替换工具类
pub struct TemplateSubstitutor;

impl TemplateSubstitutor {
    /// 对文本执行一次匹配并渲染模板
    ///
    /// # 参数
    /// - `text`: 待匹配文本（如消息标题）
    /// - `pattern`: 已编译的正则
    /// - `template`: 文件名模板
    ///
    /// # 返回值
    /// 替换后的字符串；未匹配时所有占位符都替换为空字符串
    pub fn substitute(text: &str, pattern: &CompiledPattern, template: &str) -> String {
        let result = pattern.exec(text);
        Self::render(template, &result)
    }

    /// 使用已有的匹配结果渲染模板
    ///
    /// 从左到右扫描：
    /// 1. `$` 后紧跟一个或多个 ASCII 数字：按位置引用
    /// 2. `${...}` ：花括号内文本作为键，与位置引用使用同一张下标表
    /// 3. 其余 `$` 原样输出
    pub fn render(template: &str, result: &MatchResult<'_>) -> String {
        let mut output = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(pos) = rest.find('$') {
            output.push_str(&rest[..pos]);
            let after = &rest[pos + 1..];

            // $数字
            let digits = after.bytes().take_while(|b| b.is_ascii_digit()).count();
            if digits > 0 {
                output.push_str(result.lookup(&after[..digits]).unwrap_or(""));
                rest = &after[digits..];
                continue;
            }

            // ${键}，键至少一个字符
            if let Some(braced) = after.strip_prefix('{') {
                if let Some(end) = braced.find('}').filter(|&end| end > 0) {
                    output.push_str(result.lookup(&braced[..end]).unwrap_or(""));
                    rest = &braced[end + 1..];
                    continue;
                }
            }

            // 普通字符 $
            output.push('$');
            rest = after;
        }

        output.push_str(rest);
        output
    }
}
