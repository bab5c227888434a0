//! EditorState：编辑器唯一持有的字段树状态，以及按ID寻址的编辑入口

use serde_json::Value;
use thiserror::Error;

use crate::model::field_rows::{build_field_rows, FieldRow};
use crate::model::field_tree::{
    self, find_field, path_to, replace_list_at, Field, FieldId, FieldType, FieldUpdate, IdAllocator,
    ParseFieldTypeError,
};
use crate::model::serializer::{to_json, to_pretty_json};
use crate::utils::clipboard::{copy_json_to_clipboard, ClipboardError};

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("JSON序列化失败: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("剪贴板错误: {0}")]
    Clipboard(#[from] ClipboardError),
    #[error(transparent)]
    UnknownFieldType(#[from] ParseFieldTypeError),
}

/// 根列表的唯一持有者；每次编辑都整体替换根列表并重建行视图
#[derive(Debug, Default)]
pub struct EditorState {
    pub fields: Vec<Field>,
    pub rows: Vec<FieldRow>,
    /// 最近一次提交的 pretty JSON
    pub last_submitted: Option<String>,
    ids: IdAllocator,
}

impl EditorState {
    /// 使用已有字段树创建状态；`ids` 必须是生成这些字段的分配器
    pub fn with_fields(fields: Vec<Field>, ids: IdAllocator) -> Self {
        let rows = build_field_rows(&fields);
        Self {
            fields,
            rows,
            last_submitted: None,
            ids,
        }
    }

    /// 在根列表末尾添加字段
    pub fn add_root_field(&mut self) -> FieldId {
        let id = self.ids.alloc();
        let new_root = field_tree::add_field(&self.fields, id);
        self.replace_root(new_root);
        tracing::info!("添加根字段 {}", id);
        id
    }

    /// 在嵌套字段的子列表末尾添加字段；父字段不存在或不是嵌套类型时返回 None
    pub fn add_child_field(&mut self, parent: FieldId) -> Option<FieldId> {
        let Some(parent_field) = find_field(&self.fields, parent) else {
            tracing::warn!("父字段不存在: {}", parent);
            return None;
        };
        if !parent_field.is_nested() {
            tracing::warn!("字段 {} 不是嵌套类型，无法添加子字段", parent);
            return None;
        }
        let mut path = path_to(&self.fields, parent)?;
        path.push(parent);

        let id = self.ids.alloc();
        let new_root = replace_list_at(&self.fields, &path, |list| field_tree::add_field(list, id));
        self.replace_root(new_root);
        tracing::info!("在字段 {} 下添加子字段 {}", parent, id);
        Some(id)
    }

    /// 替换字段的某个属性；字段不存在时不做任何修改并返回 false
    pub fn update_field(&mut self, id: FieldId, update: FieldUpdate) -> bool {
        let Some(path) = path_to(&self.fields, id) else {
            tracing::warn!("更新的字段不存在: {}", id);
            return false;
        };
        let new_root = replace_list_at(&self.fields, &path, |list| field_tree::update_field(list, id, update));
        self.replace_root(new_root);
        true
    }

    pub fn rename_field(&mut self, id: FieldId, name: &str) -> bool {
        self.update_field(id, FieldUpdate::Name(name.to_string()))
    }

    /// 按 UI 下拉框的标签设置类型
    pub fn set_field_type(&mut self, id: FieldId, label: &str) -> Result<bool, EditorError> {
        let field_type: FieldType = label.parse()?;
        Ok(self.update_field(id, FieldUpdate::Type(field_type)))
    }

    pub fn set_field_required(&mut self, id: FieldId, required: bool) -> bool {
        self.update_field(id, FieldUpdate::Required(required))
    }

    /// 删除字段（连同子树）；字段不存在时返回 false
    pub fn delete_field(&mut self, id: FieldId) -> bool {
        let Some(path) = path_to(&self.fields, id) else {
            tracing::warn!("删除的字段不存在: {}", id);
            return false;
        };
        let new_root = replace_list_at(&self.fields, &path, |list| field_tree::delete_field(list, id));
        self.replace_root(new_root);
        tracing::info!("删除字段 {}", id);
        true
    }

    pub fn json_value(&self) -> Value {
        to_json(&self.fields)
    }

    /// 右侧预览使用的 pretty JSON
    pub fn preview_json(&self) -> Result<String, EditorError> {
        to_pretty_json(&self.fields)
    }

    /// 字段树本身（含ID、类型、必填、子字段）的紧凑 JSON，用于诊断日志
    pub fn dump_fields(&self) -> Result<String, EditorError> {
        Ok(serde_json::to_string(&self.fields)?)
    }

    /// 提交：生成 pretty JSON 并记录
    pub fn submit(&mut self) -> Result<String, EditorError> {
        let text = to_pretty_json(&self.fields)?;
        tracing::info!("提交JSON:\n{}", text);
        tracing::debug!("提交时的字段树: {}", self.dump_fields()?);
        self.last_submitted = Some(text.clone());
        Ok(text)
    }

    /// 复制最近一次提交的 JSON；尚未提交时复制当前预览
    pub fn copy_submitted(&self) -> Result<(), EditorError> {
        let text = match &self.last_submitted {
            Some(text) => text.clone(),
            None => self.preview_json()?,
        };
        copy_json_to_clipboard(&text)?;
        Ok(())
    }

    fn replace_root(&mut self, new_root: Vec<Field>) {
        self.fields = new_root;
        self.rows = build_field_rows(&self.fields);
    }
}
