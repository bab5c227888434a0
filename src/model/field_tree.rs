//! 字段树（Field Tree）：字段节点定义与不可变的增/改/删操作
//!
//! 所有列表操作都不修改输入，而是返回新的列表。
//! 嵌套编辑通过祖先ID路径定位目标列表，再由叶到根逐层用 `Children` 更新重建。

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 字段唯一标识，由 [`IdAllocator`] 单调分配
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(pub u64);

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FieldId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(FieldId)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("未知字段类型: {0}")]
pub struct ParseFieldTypeError(pub String);

/// 字段类型（决定序列化方式以及 children 是否有意义）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    String,
    Number,
    Nested,
}

impl FieldType {
    /// UI 下拉框中的顺序
    pub const ALL: [FieldType; 3] = [FieldType::String, FieldType::Number, FieldType::Nested];

    pub fn label(self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Nested => "nested",
        }
    }

    /// 叶子字段在 JSON 中输出的类型标记；嵌套字段输出子对象，因此为 None
    pub fn marker(self) -> Option<&'static str> {
        match self {
            FieldType::String => Some("STRING"),
            FieldType::Number => Some("NUMBER"),
            FieldType::Nested => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FieldType {
    type Err = ParseFieldTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldType::ALL
            .into_iter()
            .find(|t| t.label() == s.trim())
            .ok_or_else(|| ParseFieldTypeError(s.to_string()))
    }
}

/// 字段结构树中的一个节点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub id: FieldId,
    /// 输出 JSON 的键名，允许为空
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// 保留属性，序列化时不使用
    pub required: bool,
    /// 始终存在，仅在 `Nested` 时参与序列化和渲染
    #[serde(default)]
    pub children: Vec<Field>,
}

impl Field {
    /// 新建字段：空名称、string 类型、非必填、无子字段
    pub fn new(id: FieldId) -> Self {
        Self {
            id,
            name: String::new(),
            field_type: FieldType::String,
            required: false,
            children: Vec::new(),
        }
    }

    pub fn is_nested(&self) -> bool {
        self.field_type == FieldType::Nested
    }
}

/// 对单个字段属性的替换
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    Name(String),
    Type(FieldType),
    Required(bool),
    Children(Vec<Field>),
}

impl FieldUpdate {
    /// 生成替换了对应属性的新字段
    fn applied_to(self, field: &Field) -> Field {
        match self {
            // 子列表整体替换时无需克隆旧的子树
            FieldUpdate::Children(children) => Field {
                id: field.id,
                name: field.name.clone(),
                field_type: field.field_type,
                required: field.required,
                children,
            },
            FieldUpdate::Name(name) => Field { name, ..field.clone() },
            FieldUpdate::Type(field_type) => Field { field_type, ..field.clone() },
            FieldUpdate::Required(required) => Field { required, ..field.clone() },
        }
    }
}

/// 单调递增的ID分配器
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: u64,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdAllocator {
    pub fn alloc(&mut self) -> FieldId {
        let id = FieldId(self.next);
        self.next += 1;
        id
    }
}

/// 从根列表到目标列表所经过的祖先字段ID；空路径表示根列表
pub type FieldPath = Vec<FieldId>;

/// 在列表末尾追加一个新字段
pub fn add_field(list: &[Field], id: FieldId) -> Vec<Field> {
    let mut out = Vec::with_capacity(list.len() + 1);
    out.extend_from_slice(list);
    out.push(Field::new(id));
    out
}

/// 替换列表中第一个匹配 `id` 的字段的某个属性；未找到时返回等值副本
pub fn update_field(list: &[Field], id: FieldId, update: FieldUpdate) -> Vec<Field> {
    let mut update = Some(update);
    list.iter()
        .map(|field| {
            if field.id == id {
                if let Some(update) = update.take() {
                    return update.applied_to(field);
                }
            }
            field.clone()
        })
        .collect()
}

/// 删除列表中所有匹配 `id` 的字段（连同其子树）；未找到时返回等值副本
pub fn delete_field(list: &[Field], id: FieldId) -> Vec<Field> {
    list.iter().filter(|field| field.id != id).cloned().collect()
}

/// 对 `path` 指向的列表执行 `op`，并逐层向上重建祖先的 children
///
/// 路径无法解析时返回根列表的等值副本，`op` 不会被调用。
pub fn replace_list_at<F>(root: &[Field], path: &[FieldId], op: F) -> Vec<Field>
where
    F: FnOnce(&[Field]) -> Vec<Field>,
{
    let Some((head, rest)) = path.split_first() else {
        return op(root);
    };
    let Some(parent) = root.iter().find(|field| field.id == *head) else {
        tracing::warn!("路径中的字段不存在: {}", head);
        return root.to_vec();
    };
    let children = replace_list_at(&parent.children, rest, op);
    update_field(root, *head, FieldUpdate::Children(children))
}

/// 按路径获取列表的只读视图
pub fn list_at<'a>(root: &'a [Field], path: &[FieldId]) -> Option<&'a [Field]> {
    let Some((head, rest)) = path.split_first() else {
        return Some(root);
    };
    let parent = root.iter().find(|field| field.id == *head)?;
    list_at(&parent.children, rest)
}

/// 在整棵树中查找字段（包括非嵌套字段保留的子树）
pub fn find_field(root: &[Field], id: FieldId) -> Option<&Field> {
    root.iter().find_map(|field| {
        if field.id == id {
            Some(field)
        } else {
            find_field(&field.children, id)
        }
    })
}

/// 返回包含 `id` 的那个列表的路径
pub fn path_to(root: &[Field], id: FieldId) -> Option<FieldPath> {
    fn walk(list: &[Field], id: FieldId, prefix: &mut FieldPath) -> bool {
        for field in list {
            if field.id == id {
                return true;
            }
            prefix.push(field.id);
            if walk(&field.children, id, prefix) {
                return true;
            }
            prefix.pop();
        }
        false
    }

    let mut prefix = Vec::new();
    walk(root, id, &mut prefix).then_some(prefix)
}

/// 整棵树的字段总数
pub fn count_fields(root: &[Field]) -> usize {
    root.iter().map(|field| 1 + count_fields(&field.children)).sum()
}

/// 检查整棵树中的ID是否唯一
pub fn has_unique_ids(root: &[Field]) -> bool {
    fn walk(list: &[Field], seen: &mut HashSet<FieldId>) -> bool {
        list.iter()
            .all(|field| seen.insert(field.id) && walk(&field.children, seen))
    }
    walk(root, &mut HashSet::new())
}
