//! 视图计算：从 (文档, 遍历状态) 得到界面应显示的内容，不接触 UI 类型

use crate::model::data_core::{AppError, AppState};
use crate::model::traversal::{HistoryEntry, Traversal};
use crate::model::tree::{Node, TreeDocument};

/// 当前问题下的一个选项
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChoiceView {
    /// 可点击：进入下一个问题，按钮显示目标问题的文字
    Next { label: String, caption: String },
    /// 不可点击：直接列出的结果
    Outcome { label: String, text: String, link: Option<String> },
}

impl ChoiceView {
    pub fn label(&self) -> &str {
        match self {
            ChoiceView::Next { label, .. } | ChoiceView::Outcome { label, .. } => label,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    pub node_id: String,
    pub prompt: String,
    pub link: Option<String>,
    pub items: Vec<ChoiceView>,
    /// 已到达结果，按钮应禁用
    pub finished: bool,
}

impl QuestionView {
    /// 当前节点无法显示时使用：不保留任何旧选项，按钮全部禁用
    pub fn unavailable() -> Self {
        Self {
            node_id: String::new(),
            prompt: String::new(),
            link: None,
            items: Vec::new(),
            finished: true,
        }
    }
}

pub fn question_view(doc: &TreeDocument, traversal: &Traversal) -> Result<QuestionView, AppError> {
    let node = traversal.current_node(doc)?;

    let mut items = Vec::new();
    if let Some(choices) = node.choices() {
        for (label, target_id) in choices.iter() {
            let item = match doc.node(target_id)? {
                Node::Result { text, link } => ChoiceView::Outcome {
                    label: label.to_string(),
                    text: text.clone(),
                    link: link.clone(),
                },
                Node::Question { text, .. } => ChoiceView::Next {
                    label: label.to_string(),
                    caption: text.clone(),
                },
            };
            items.push(item);
        }
    }

    Ok(QuestionView {
        node_id: traversal.current().to_string(),
        prompt: node.text().to_string(),
        link: node.link().map(str::to_string),
        items,
        finished: traversal.is_finished(),
    })
}

pub fn history_line(entry: &HistoryEntry) -> String {
    match &entry.outcome {
        Some(outcome) => format!("- Question: {} -> {}", entry.text, outcome),
        None => format!("Q: {}", entry.text),
    }
}

/// 历史面板：每条记录一块
pub fn history_lines(history: &[HistoryEntry]) -> Vec<String> {
    history.iter().map(history_line).collect()
}

pub fn recap_text(history: &[HistoryEntry]) -> String {
    history_lines(history).join("\n\n")
}

/// 当前会话的问题视图；尚未加载问卷时返回 `State` 错误
pub fn current_view(state: &AppState) -> Result<QuestionView, AppError> {
    let session = state.session()?;
    question_view(&session.document, &session.traversal)
}

pub fn current_history_lines(state: &AppState) -> Vec<String> {
    state
        .session
        .as_ref()
        .map(|s| history_lines(s.traversal.history()))
        .unwrap_or_default()
}

pub fn current_recap_text(state: &AppState) -> String {
    state
        .session
        .as_ref()
        .map(|s| recap_text(s.traversal.history()))
        .unwrap_or_default()
}
