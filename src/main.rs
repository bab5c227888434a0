//! 程序入口：初始化日志、加载 Slint UI，并绑定 VM 回调

use std::{cell::RefCell, rc::Rc};

use anyhow::Context;
use slint::{ComponentHandle, Model, ModelRc, VecModel};
use tracing_subscriber::fmt::SubscriberBuilder;

use field_tree_editor::model::field_tree::count_fields;
use field_tree_editor::model::performance::time_ms;
use field_tree_editor::vm::bridge::*;
use field_tree_editor::{EditorState, FieldRow};

slint::include_modules!();

// FieldRowData转换实现
impl From<&FieldRow> for FieldRowData {
    /// 将Rust FieldRow转换为Slint可用的数据结构
    fn from(row: &FieldRow) -> Self {
        Self {
            id: row.id.to_string().into(),
            kind: row.kind.as_str().into(),
            name: row.name.clone().into(),
            field_type: row.field_type.label().into(),
            required: row.required,
            depth: row.depth as i32,
            path: row.path.clone().into(),
            children: row.children as i32,
        }
    }
}

/// VM桥接器：管理UI与数据层的交互
struct ViewModelBridge {
    editor_state: Rc<RefCell<EditorState>>,
    /// 行模型原地更新，避免输入时列表项被重建而丢失焦点
    row_model: Rc<VecModel<FieldRowData>>,
}

impl ViewModelBridge {
    /// 创建新的VM桥接器并绑定所有回调
    fn new(app_window: &AppWindow, editor_state: Rc<RefCell<EditorState>>) -> Self {
        let bridge = Self {
            editor_state,
            row_model: Rc::new(VecModel::default()),
        };

        app_window.set_field_rows(ModelRc::from(bridge.row_model.clone()));
        bridge.setup_callbacks(app_window);
        bridge
    }

    /// 设置所有UI回调函数
    fn setup_callbacks(&self, app_window: &AppWindow) {
        // === 添加根字段 ===
        {
            let state = self.editor_state.clone();
            let rows = self.row_model.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_add_root_field(move || {
                if let Some(app_window) = app_window_weak.upgrade() {
                    let id = state.borrow_mut().add_root_field();
                    Self::refresh_view(&app_window, &state, &rows, &format!("{}: {}", STATUS_FIELD_ADDED, id));
                }
            });
        }

        // === 添加子字段 ===
        {
            let state = self.editor_state.clone();
            let rows = self.row_model.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_add_child_field(move |parent_id| {
                if let Some(app_window) = app_window_weak.upgrade() {
                    Self::handle_add_child(&app_window, &state, &rows, &parent_id);
                }
            });
        }

        // === 字段名编辑 ===
        {
            let state = self.editor_state.clone();
            let rows = self.row_model.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_field_name_edited(move |id, name| {
                let (Some(app_window), Some(id)) = (app_window_weak.upgrade(), parse_row_id(&id)) else {
                    return;
                };
                if state.borrow_mut().rename_field(id, &name) {
                    Self::refresh_view(&app_window, &state, &rows, &format!("字段 {} 已重命名", id));
                }
            });
        }

        // === 字段类型选择 ===
        {
            let state = self.editor_state.clone();
            let rows = self.row_model.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_field_type_selected(move |id, label| {
                if let Some(app_window) = app_window_weak.upgrade() {
                    Self::handle_type_selected(&app_window, &state, &rows, &id, &label);
                }
            });
        }

        // === 必填切换 ===
        {
            let state = self.editor_state.clone();
            let rows = self.row_model.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_field_required_toggled(move |id, required| {
                let (Some(app_window), Some(id)) = (app_window_weak.upgrade(), parse_row_id(&id)) else {
                    return;
                };
                if state.borrow_mut().set_field_required(id, required) {
                    let text = if required { "必填" } else { "非必填" };
                    Self::refresh_view(&app_window, &state, &rows, &format!("字段 {} 设为{}", id, text));
                }
            });
        }

        // === 删除字段 ===
        {
            let state = self.editor_state.clone();
            let rows = self.row_model.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_delete_field(move |id| {
                let (Some(app_window), Some(id)) = (app_window_weak.upgrade(), parse_row_id(&id)) else {
                    return;
                };
                if state.borrow_mut().delete_field(id) {
                    Self::refresh_view(&app_window, &state, &rows, &format!("{}: {}", STATUS_FIELD_DELETED, id));
                }
            });
        }

        // === 提交 ===
        {
            let state = self.editor_state.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_submit_pressed(move || {
                if let Some(app_window) = app_window_weak.upgrade() {
                    Self::handle_submit(&app_window, &state);
                }
            });
        }

        // === 复制提交结果 ===
        {
            let state = self.editor_state.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_copy_json_pressed(move || {
                if let Some(app_window) = app_window_weak.upgrade() {
                    match state.borrow().copy_submitted() {
                        Ok(()) => app_window.set_status_message(STATUS_COPIED.into()),
                        Err(e) => {
                            tracing::error!("复制失败: {}", e);
                            app_window.set_status_message(format!("{}{}", STATUS_ERROR_PREFIX, e).into());
                        }
                    }
                }
            });
        }

        // === 关闭对话框 ===
        {
            let app_window_weak = app_window.as_weak();
            app_window.on_close_message_dialog(move || {
                if let Some(app_window) = app_window_weak.upgrade() {
                    app_window.set_message_dialog_visible(false);
                }
            });
        }
    }

    /// 初始化UI状态
    fn initialize_ui(&self, app_window: &AppWindow) {
        Self::refresh_view(app_window, &self.editor_state, &self.row_model, STATUS_READY);
        app_window.set_message_dialog_visible(false);
    }

    fn handle_add_child(
        app_window: &AppWindow,
        state: &Rc<RefCell<EditorState>>,
        rows: &Rc<VecModel<FieldRowData>>,
        parent_id: &str,
    ) {
        let Some(parent) = parse_row_id(parent_id) else {
            return;
        };
        let added = state.borrow_mut().add_child_field(parent);
        match added {
            Some(id) => Self::refresh_view(app_window, state, rows, &format!("{}: {} (父字段 {})", STATUS_FIELD_ADDED, id, parent)),
            None => app_window.set_status_message(format!("{}字段 {} 无法添加子字段", STATUS_ERROR_PREFIX, parent).into()),
        }
    }

    fn handle_type_selected(
        app_window: &AppWindow,
        state: &Rc<RefCell<EditorState>>,
        rows: &Rc<VecModel<FieldRowData>>,
        id: &str,
        label: &str,
    ) {
        let Some(id) = parse_row_id(id) else {
            return;
        };
        let result = state.borrow_mut().set_field_type(id, label);
        match result {
            Ok(true) => Self::refresh_view(app_window, state, rows, &format!("字段 {} 类型: {}", id, label)),
            Ok(false) => {}
            Err(e) => {
                tracing::warn!("忽略类型修改: {}", e);
                app_window.set_status_message(format!("{}{}", STATUS_ERROR_PREFIX, e).into());
            }
        }
    }

    /// 提交：生成 pretty JSON 并在对话框中展示
    fn handle_submit(app_window: &AppWindow, state: &Rc<RefCell<EditorState>>) {
        let result = state.borrow_mut().submit();
        match result {
            Ok(text) => {
                app_window.set_message_dialog_title(SUBMIT_DIALOG_TITLE.into());
                app_window.set_message_dialog_text(text.into());
                app_window.set_message_dialog_visible(true);
                app_window.set_status_message(STATUS_SUBMITTED.into());
            }
            Err(e) => {
                tracing::error!("提交失败: {}", e);
                app_window.set_status_message(format!("{}{}", STATUS_ERROR_PREFIX, e).into());
            }
        }
    }

    /// 每次状态替换后重新推导行视图和 JSON 预览
    fn refresh_view(
        app_window: &AppWindow,
        state: &Rc<RefCell<EditorState>>,
        rows: &Rc<VecModel<FieldRowData>>,
        status: &str,
    ) {
        let state = state.borrow();

        let (preview, elapsed_ms) = time_ms(|| {
            let new_rows: Vec<FieldRowData> = state.rows.iter().map(FieldRowData::from).collect();
            Self::sync_rows(rows, new_rows);
            state.preview_json()
        });

        match preview {
            Ok(text) => app_window.set_json_preview(text.into()),
            Err(e) => {
                tracing::error!("预览生成失败: {}", e);
                app_window.set_json_preview("".into());
            }
        }

        tracing::debug!("视图刷新耗时: {:.2}ms", elapsed_ms);
        app_window.set_performance_info(format_refresh_info(count_fields(&state.fields), state.rows.len(), elapsed_ms).into());
        app_window.set_status_message(status.into());
    }

    /// 行结构未变时只更新变化的行，否则整体替换
    fn sync_rows(model: &VecModel<FieldRowData>, new_rows: Vec<FieldRowData>) {
        let old_rows: Vec<FieldRowData> = model.iter().collect();
        let same_shape = same_row_shape(
            old_rows.iter().map(|r| (r.id.as_str(), r.kind.as_str())),
            new_rows.iter().map(|r| (r.id.as_str(), r.kind.as_str())),
        );

        if !same_shape {
            model.set_vec(new_rows);
            return;
        }
        for i in changed_rows(&old_rows, &new_rows) {
            model.set_row_data(i, new_rows[i].clone());
        }
    }
}

fn main() -> anyhow::Result<()> {
    // 初始化日志输出
    let _ = SubscriberBuilder::default()
        .with_max_level(tracing::Level::INFO)
        .try_init();

    let app = AppWindow::new().context("UI 初始化失败")?;
    let state = Rc::new(RefCell::new(EditorState::default()));

    // 创建VM桥接器并绑定UI回调
    let bridge = ViewModelBridge::new(&app, state);
    bridge.initialize_ui(&app);

    tracing::info!("应用启动成功，UI已初始化");
    app.run().context("事件循环异常退出")?;
    Ok(())
}
