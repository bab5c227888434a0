//! 性能基准测试模块
//!
//! 用于测量大字段树的 JSON 生成、行视图重建和深层编辑耗时，
//! 每次编辑都会整体重建根列表，这里确认该开销在交互可接受范围内。

use std::time::Instant;

use crate::model::editor_state::EditorState;
use crate::model::field_rows::build_field_rows;
use crate::model::field_tree::{count_fields, Field, FieldId, FieldType, IdAllocator};
use crate::model::serializer::to_json;

/// 性能测试结果
#[derive(Debug)]
pub struct PerformanceResult {
    pub operation: String,
    pub duration_ms: u128,
    pub success: bool,
    pub details: String,
}

impl PerformanceResult {
    pub fn new(operation: &str, duration_ms: u128, success: bool, details: &str) -> Self {
        Self {
            operation: operation.to_string(),
            duration_ms,
            success,
            details: details.to_string(),
        }
    }
}

/// 执行 `f` 并返回结果与耗时（毫秒，保留小数）
pub fn time_ms<T>(f: impl FnOnce() -> T) -> (T, f64) {
    let start = Instant::now();
    let value = f();
    (value, start.elapsed().as_secs_f64() * 1000.0)
}

/// 生成测试用字段树：每层 `width` 个字段，类型按 string/number/nested 轮换，
/// 嵌套字段向下展开直到 `depth` 层
pub fn generate_field_tree(depth: usize, width: usize, ids: &mut IdAllocator) -> Vec<Field> {
    (0..width)
        .map(|i| {
            let mut field = Field::new(ids.alloc());
            field.name = format!("field_{}", i);
            field.field_type = FieldType::ALL[i % FieldType::ALL.len()];
            if field.is_nested() && depth > 1 {
                field.children = generate_field_tree(depth - 1, width, ids);
            }
            field
        })
        .collect()
}

/// 沿着每层最后一个嵌套字段向下，返回最深处的第一个字段ID
pub fn deepest_field(root: &[Field]) -> Option<FieldId> {
    let mut list = root;
    let mut deepest = None;
    loop {
        deepest = list.first().map(|f| f.id).or(deepest);
        match list.iter().rev().find(|f| f.is_nested() && !f.children.is_empty()) {
            Some(nested) => list = &nested.children,
            None => return deepest,
        }
    }
}

/// 测试 JSON 生成性能
pub fn benchmark_to_json(root: &[Field]) -> PerformanceResult {
    let start = Instant::now();
    let value = to_json(root);
    let duration = start.elapsed();

    let keys = value.as_object().map_or(0, |m| m.len());
    PerformanceResult::new(
        "JSON生成",
        duration.as_millis(),
        value.is_object(),
        &format!("{} 个字段，根对象 {} 个键", count_fields(root), keys),
    )
}

/// 测试行视图重建性能
pub fn benchmark_row_build(root: &[Field]) -> PerformanceResult {
    let start = Instant::now();
    let rows = build_field_rows(root);
    let duration = start.elapsed();

    PerformanceResult::new(
        "行视图构建",
        duration.as_millis(),
        rows.len() >= root.len(),
        &format!("构建了 {} 行", rows.len()),
    )
}

/// 测试最深处字段重命名（含整条祖先链重建）的性能
pub fn benchmark_deep_rename(state: &mut EditorState) -> PerformanceResult {
    let Some(target) = deepest_field(&state.fields) else {
        return PerformanceResult::new("深层重命名", 0, false, "字段树为空");
    };

    let start = Instant::now();
    let found = state.rename_field(target, "renamed_deep");
    let duration = start.elapsed();

    PerformanceResult::new(
        "深层重命名",
        duration.as_millis(),
        found,
        &format!("目标字段 {}", target),
    )
}

/// 运行完整的性能测试套件
pub fn run_performance_suite(depth: usize, width: usize) -> Vec<PerformanceResult> {
    let mut ids = IdAllocator::default();
    let fields = generate_field_tree(depth, width, &mut ids);
    let mut state = EditorState::with_fields(fields, ids);
    tracing::info!("性能测试字段树: {} 个字段", count_fields(&state.fields));

    let results = vec![
        benchmark_to_json(&state.fields),
        benchmark_row_build(&state.fields),
        benchmark_deep_rename(&mut state),
    ];
    for r in &results {
        tracing::info!("{}: {}ms ({}) {}", r.operation, r.duration_ms, r.details, if r.success { "成功" } else { "失败" });
    }
    results
}
