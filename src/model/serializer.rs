//! 序列化：将字段树转换为普通 JSON 对象

use serde_json::{Map, Value};

use crate::model::editor_state::EditorError;
use crate::model::field_tree::Field;

/// 递归生成 JSON 对象
///
/// 嵌套字段输出其子字段对象，其余字段输出大写的类型标记。
/// 同名键后写覆盖先写（键保留首次出现的位置）。
pub fn to_json(list: &[Field]) -> Value {
    let mut map = Map::with_capacity(list.len());
    for field in list {
        let value = match field.field_type.marker() {
            Some(marker) => Value::String(marker.to_string()),
            None => to_json(&field.children),
        };
        map.insert(field.name.clone(), value);
    }
    Value::Object(map)
}

/// 两空格缩进的 pretty JSON 文本
pub fn to_pretty_json(list: &[Field]) -> Result<String, EditorError> {
    Ok(serde_json::to_string_pretty(&to_json(list))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::field_tree::{FieldId, FieldType};
    use serde_json::json;

    fn leaf(id: u64, name: &str, field_type: FieldType) -> Field {
        Field {
            name: name.to_string(),
            field_type,
            ..Field::new(FieldId(id))
        }
    }

    fn nested(id: u64, name: &str, children: Vec<Field>) -> Field {
        Field {
            name: name.to_string(),
            field_type: FieldType::Nested,
            children,
            ..Field::new(FieldId(id))
        }
    }

    #[test]
    fn test_empty_list_is_empty_object() {
        assert_eq!(to_json(&[]), json!({}));
    }

    #[test]
    fn test_single_string_field() {
        assert_eq!(to_json(&[leaf(1, "x", FieldType::String)]), json!({"x": "STRING"}));
    }

    #[test]
    fn test_nested_field_with_child() {
        let tree = vec![nested(1, "a", vec![leaf(2, "b", FieldType::String)])];
        assert_eq!(to_json(&tree), json!({"a": {"b": "STRING"}}));
    }

    #[test]
    fn test_empty_nested_field_is_empty_object() {
        let tree = vec![nested(1, "meta", vec![]), leaf(2, "n", FieldType::Number)];
        assert_eq!(to_json(&tree), json!({"meta": {}, "n": "NUMBER"}));
    }

    #[test]
    fn test_children_of_leaf_fields_are_ignored() {
        let mut field = leaf(1, "x", FieldType::Number);
        field.children.push(leaf(2, "hidden", FieldType::String));
        assert_eq!(to_json(&[field]), json!({"x": "NUMBER"}));
    }

    #[test]
    fn test_required_flag_does_not_affect_output() {
        let mut field = leaf(1, "x", FieldType::String);
        field.required = true;
        assert_eq!(to_json(&[field]), json!({"x": "STRING"}));
    }

    #[test]
    fn test_duplicate_names_last_write_wins() {
        let tree = vec![
            leaf(1, "dup", FieldType::String),
            leaf(2, "other", FieldType::String),
            leaf(3, "dup", FieldType::Number),
            leaf(4, "", FieldType::String),
            nested(5, "", vec![]),
        ];
        let value = to_json(&tree);
        assert_eq!(value, json!({"dup": "NUMBER", "other": "STRING", "": {}}));

        // 键保留首次出现的位置
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["dup", "other", ""]);
    }

    #[test]
    fn test_integer_like_names_keep_list_order() {
        let tree = vec![leaf(1, "b", FieldType::String), leaf(2, "2", FieldType::Number), leaf(3, "1", FieldType::String)];
        let value = to_json(&tree);
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["b", "2", "1"]);
        assert_eq!(to_pretty_json(&tree).unwrap(), "{\n  \"b\": \"STRING\",\n  \"2\": \"NUMBER\",\n  \"1\": \"STRING\"\n}");
    }

    #[test]
    fn test_to_json_is_idempotent() {
        let tree = vec![nested(1, "a", vec![nested(2, "b", vec![leaf(3, "c", FieldType::Number)])])];
        assert_eq!(to_json(&tree), to_json(&tree));
    }

    #[test]
    fn test_pretty_json_uses_two_space_indent() {
        let tree = vec![nested(1, "a", vec![leaf(2, "b", FieldType::String)])];
        let text = to_pretty_json(&tree).unwrap();
        assert_eq!(text, "{\n  \"a\": {\n    \"b\": \"STRING\"\n  }\n}");
        assert_eq!(to_pretty_json(&[]).unwrap(), "{}");
    }
}
