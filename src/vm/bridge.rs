//! VM桥接层：连接Slint UI与EditorState数据模型
//!
//! 注意：回调绑定在main.rs中实现，因为依赖于Slint生成的类型
//! 这里只提供公共常量和与UI无关的辅助函数

use crate::model::field_tree::FieldId;

// === 常量定义（消除魔法值） ===
pub const STATUS_READY: &str = "就绪";
pub const STATUS_FIELD_ADDED: &str = "已添加字段";
pub const STATUS_FIELD_DELETED: &str = "已删除字段";
pub const STATUS_SUBMITTED: &str = "已提交";
pub const STATUS_COPIED: &str = "已复制到剪贴板";
pub const STATUS_ERROR_PREFIX: &str = "错误: ";

pub const SUBMIT_DIALOG_TITLE: &str = "已提交的JSON";

/// 解析 UI 回传的字段ID字符串；无法解析时记录日志并返回 None
pub fn parse_row_id(raw: &str) -> Option<FieldId> {
    match raw.parse::<FieldId>() {
        Ok(id) => Some(id),
        Err(e) => {
            tracing::error!("无效的字段ID {:?}: {}", raw, e);
            None
        }
    }
}

/// 状态栏中的耗时信息
pub fn format_refresh_info(field_count: usize, row_count: usize, elapsed_ms: f64) -> String {
    format!("{} 个字段 / {} 行，刷新耗时: {:.2}ms", field_count, row_count, elapsed_ms)
}

/// 新旧行的 `(id, kind)` 序列一致时，列表可以原地更新而不重建列表项
pub fn same_row_shape<'a, O, N>(old: O, new: N) -> bool
where
    O: IntoIterator<Item = (&'a str, &'a str)>,
    N: IntoIterator<Item = (&'a str, &'a str)>,
{
    old.into_iter().eq(new)
}

/// 内容发生变化的行下标；调用前需保证两侧行数一致
pub fn changed_rows<T: PartialEq>(old: &[T], new: &[T]) -> Vec<usize> {
    old.iter()
        .zip(new)
        .enumerate()
        .filter(|(_, (o, n))| o != n)
        .map(|(i, _)| i)
        .collect()
}
