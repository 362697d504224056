//! Clipboard: 复制问卷回顾文本到系统剪贴板

use copypasta::{ClipboardContext, ClipboardProvider};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClipboardError {
    #[error("historique vide")]
    Empty,
    #[error("clipboard error: {0}")]
    Clip(String),
}

fn context() -> Result<ClipboardContext, ClipboardError> {
    ClipboardContext::new().map_err(|e| ClipboardError::Clip(e.to_string()))
}

/// 复制回顾文本；空回顾不会打开剪贴板
pub fn copy_recap(recap: &str) -> Result<(), ClipboardError> {
    if recap.trim().is_empty() {
        return Err(ClipboardError::Empty);
    }
    context()?
        .set_contents(recap.to_string())
        .map_err(|e| ClipboardError::Clip(e.to_string()))
}

#[cfg(test)]
fn read_clipboard() -> Result<String, ClipboardError> {
    context()?
        .get_contents()
        .map_err(|e| ClipboardError::Clip(e.to_string()))
}
