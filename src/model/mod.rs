pub mod editor_state;
pub mod field_rows;
pub mod field_tree;
pub mod performance;
pub mod serializer;
