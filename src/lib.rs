//! 字段结构编辑器库
//!
//! 提供字段树模型、不可变的增删改操作、JSON 生成以及 UI 行视图展平，
//! 遵循MVVM架构模式，Slint 界面只通过 EditorState 访问数据

pub mod model;
pub mod utils;
pub mod vm;

// 重新导出主要类型
pub use model::editor_state::{EditorError, EditorState};
pub use model::field_rows::{build_field_rows, FieldRow, RowKind};
pub use model::field_tree::{Field, FieldId, FieldType, FieldUpdate};
pub use model::serializer::{to_json, to_pretty_json};
