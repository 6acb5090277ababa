//! 限定名解析
//!
//! 把用户给出的限定名字符串展开为有序的候选列表：
//! - 空字符串 -> `[""]`，即默认绑定；只含空白的字符串不算空
//! - 逗号分隔，逐段去除空白
//! - `type` 是默认绑定的别名
//! - 空段被丢弃，其余原样保留

/// 默认绑定的别名
pub const TYPE_ALIAS: &str = "type";

/// 字段标签中代表"使用字段自身名称"的关键字
pub const NAME_ALIAS: &str = "name";

/// 展开限定名为候选列表
pub fn expand_qualifier(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return vec![String::new()];
    }

    raw.split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(|segment| match segment {
            TYPE_ALIAS => String::new(),
            other => other.to_string(),
        })
        .collect()
}

/// 展开字段标签，`name` 替换为字段名
///
/// 标签为空（或只含分隔符）时回退到默认绑定。
pub fn expand_field_tag(tag: &str, field_name: &str) -> Vec<String> {
    let candidates: Vec<String> = tag
        .split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(|segment| match segment {
            TYPE_ALIAS => String::new(),
            NAME_ALIAS => field_name.to_string(),
            other => other.to_string(),
        })
        .collect();

    if candidates.is_empty() {
        vec![String::new()]
    } else {
        candidates
    }
}
