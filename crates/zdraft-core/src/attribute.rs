//! 属性值解析
//!
//! 标记中含有 `NUM` 或 `ID`（不区分大小写）的可变属性写入序号，
//! 其余可变属性照抄默认文本。常量属性不出现在结果中。

use crate::block::AttributeField;
use indexmap::IndexMap;

/// 序号最小宽度，不足补零
pub const SEQUENCE_WIDTH: usize = 2;

/// 标记是否表示序号字段
pub fn is_sequence_tag(tag: &str) -> bool {
    let upper = tag.to_uppercase();
    upper.contains("NUM") || upper.contains("ID")
}

/// 格式化序号（从 1 开始）
pub fn format_ordinal(ordinal: usize) -> String {
    format!("{:0width$}", ordinal, width = SEQUENCE_WIDTH)
}

/// 按字段顺序解析可变属性
pub fn resolve(fields: &[AttributeField], ordinal: usize) -> IndexMap<String, String> {
    fields
        .iter()
        .filter(|field| !field.is_constant)
        .map(|field| {
            let text = if is_sequence_tag(&field.tag) {
                format_ordinal(ordinal)
            } else {
                field.default_text.clone()
            };
            (field.tag.clone(), text)
        })
        .collect()
}
