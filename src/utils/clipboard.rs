//! Clipboard: 提交后的 JSON 复制到系统剪贴板

use copypasta::{ClipboardContext, ClipboardProvider};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClipboardError {
    #[error("无法打开剪贴板: {0}")]
    Open(String),
    #[error("写入剪贴板失败: {0}")]
    Write(String),
}

/// 将 JSON 文本复制到系统剪贴板
pub fn copy_json_to_clipboard(json_text: &str) -> Result<(), ClipboardError> {
    let mut ctx = ClipboardContext::new().map_err(|e| ClipboardError::Open(e.to_string()))?;
    ctx.set_contents(json_text.to_owned())
        .map_err(|e| ClipboardError::Write(e.to_string()))?;
    tracing::debug!("已写入剪贴板 {} 字符", json_text.chars().count());
    Ok(())
}
