//! 行视图（Field Rows）：将字段树按深度优先展平为 UI 列表行
//!
//! Slint 不支持递归组件，因此渲染器消费的是一个带深度的扁平列表。

use crate::model::field_tree::{Field, FieldId, FieldType};

/// 行类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// 字段编辑行：名称、类型、必填、删除
    Field,
    /// 嵌套字段子列表末尾的“添加子字段”行
    AddChild,
}

impl RowKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RowKind::Field => "field",
            RowKind::AddChild => "add",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldRow {
    /// 字段行为字段自身ID；添加行为所属嵌套字段的ID
    pub id: FieldId,
    pub kind: RowKind,
    pub name: String,
    pub field_type: FieldType,
    pub required: bool,
    /// 缩进层级
    pub depth: u32,
    /// 以下标表示的位置，如 `0.2.1`；添加行沿用所属字段的位置
    pub path: String,
    /// 子字段数量
    pub children: u32,
}

/// 从根列表构建全部行
pub fn build_field_rows(root: &[Field]) -> Vec<FieldRow> {
    fn walk(out: &mut Vec<FieldRow>, list: &[Field], prefix: &str, depth: u32) {
        for (idx, field) in list.iter().enumerate() {
            let path = if prefix.is_empty() {
                idx.to_string()
            } else {
                format!("{}.{}", prefix, idx)
            };
            out.push(FieldRow {
                id: field.id,
                kind: RowKind::Field,
                name: field.name.clone(),
                field_type: field.field_type,
                required: field.required,
                depth,
                path: path.clone(),
                children: field.children.len() as u32,
            });
            if field.is_nested() {
                walk(out, &field.children, &path, depth + 1);
                out.push(FieldRow {
                    id: field.id,
                    kind: RowKind::AddChild,
                    name: field.name.clone(),
                    field_type: field.field_type,
                    required: field.required,
                    depth: depth + 1,
                    path,
                    children: field.children.len() as u32,
                });
            }
        }
    }

    let mut out = Vec::new();
    walk(&mut out, root, "", 0);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(id: u64, name: &str, field_type: FieldType, children: Vec<Field>) -> Field {
        Field {
            name: name.to_string(),
            field_type,
            children,
            ..Field::new(FieldId(id))
        }
    }

    #[test]
    fn test_empty_tree_has_no_rows() {
        assert!(build_field_rows(&[]).is_empty());
    }

    #[test]
    fn test_flat_fields() {
        let tree = vec![
            field(1, "name", FieldType::String, vec![]),
            field(2, "age", FieldType::Number, vec![]),
        ];
        let rows = build_field_rows(&tree);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "name");
        assert_eq!(rows[0].path, "0");
        assert_eq!(rows[1].path, "1");
        assert!(rows.iter().all(|r| r.depth == 0 && r.kind == RowKind::Field));
    }

    #[test]
    fn test_nested_rows_order_and_add_slots() {
        let tree = vec![
            field(
                1,
                "user",
                FieldType::Nested,
                vec![
                    field(2, "profile", FieldType::Nested, vec![field(3, "nick", FieldType::String, vec![])]),
                    field(4, "age", FieldType::Number, vec![]),
                ],
            ),
            field(5, "tag", FieldType::String, vec![]),
        ];
        let rows = build_field_rows(&tree);

        let shape: Vec<(u64, RowKind, u32, &str)> = rows
            .iter()
            .map(|r| (r.id.0, r.kind, r.depth, r.path.as_str()))
            .collect();
        assert_eq!(
            shape,
            vec![
                (1, RowKind::Field, 0, "0"),
                (2, RowKind::Field, 1, "0.0"),
                (3, RowKind::Field, 2, "0.0.0"),
                (2, RowKind::AddChild, 2, "0.0"),
                (4, RowKind::Field, 1, "0.1"),
                (1, RowKind::AddChild, 1, "0"),
                (5, RowKind::Field, 0, "1"),
            ]
        );
        assert_eq!(rows[0].children, 2);
    }

    #[test]
    fn test_empty_nested_field_still_gets_add_row() {
        let rows = build_field_rows(&[field(1, "", FieldType::Nested, vec![])]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].kind, RowKind::AddChild);
        assert_eq!(rows[1].id, FieldId(1));
        assert_eq!(rows[1].depth, 1);
    }

    #[test]
    fn test_children_of_leaf_fields_are_not_rendered() {
        let tree = vec![field(1, "x", FieldType::String, vec![field(2, "kept", FieldType::String, vec![])])];
        let rows = build_field_rows(&tree);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].children, 1);
    }
}
