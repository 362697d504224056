//! AppState：应用核心状态（当前问卷会话）与统一错误类型

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::AppConfig;
use crate::model::category::Category;
use crate::model::traversal::{Transition, Traversal};
use crate::model::tree::TreeDocument;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO失败: {0}")]
    Io(#[from] std::io::Error),
    #[error("问卷数据格式错误: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("节点不存在: {0}")]
    Lookup(String),
    #[error("节点 {node} 没有选项 {label:?}")]
    UnknownChoice { node: String, label: String },
    #[error("决策树存在环: {from} -> {to}")]
    CyclicGraph { from: String, to: String },
    #[error("状态错误: {0}")]
    State(String),
}

/// 问卷来源：内置类别或用户选择的文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeSource {
    Category(Category),
    File(PathBuf),
}

impl TreeSource {
    pub fn window_title(&self) -> String {
        match self {
            TreeSource::Category(c) => c.window_title().to_string(),
            TreeSource::File(p) => {
                let name = p.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
                format!("Questionnaire – {}", name)
            }
        }
    }
}

/// 一次问卷会话：切换类别时整体替换
#[derive(Debug, Clone)]
pub struct Session {
    pub source: TreeSource,
    pub document: TreeDocument,
    pub traversal: Traversal,
}

impl Session {
    pub fn new(source: TreeSource, document: TreeDocument) -> Self {
        let traversal = Traversal::new(&document);
        Self { source, document, traversal }
    }
}

#[derive(Debug, Default)]
pub struct AppState {
    pub config: AppConfig,
    pub session: Option<Session>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self { config, session: None }
    }

    /// 加载内置类别；失败时保留原会话
    pub fn load_category(&mut self, category: Category) -> Result<(), AppError> {
        let path = self.config.category_path(category);
        self.load_from(&path, TreeSource::Category(category))
    }

    /// 加载任意问卷文件；失败时保留原会话
    pub fn load_file(&mut self, p: &Path) -> Result<(), AppError> {
        self.load_from(p, TreeSource::File(p.to_path_buf()))
    }

    fn load_from(&mut self, p: &Path, source: TreeSource) -> Result<(), AppError> {
        let document = TreeDocument::load_file(p)?;
        self.session = Some(Session::new(source, document));
        Ok(())
    }

    pub fn session(&self) -> Result<&Session, AppError> {
        self.session
            .as_ref()
            .ok_or_else(|| AppError::State("问卷尚未加载".into()))
    }

    fn session_mut(&mut self) -> Result<&mut Session, AppError> {
        self.session
            .as_mut()
            .ok_or_else(|| AppError::State("问卷尚未加载".into()))
    }

    pub fn restart(&mut self) -> Result<(), AppError> {
        let session = self.session_mut()?;
        session.traversal.reset(&session.document);
        tracing::info!("问卷已重新开始");
        Ok(())
    }

    pub fn choose(&mut self, label: &str) -> Result<Transition, AppError> {
        let session = self.session_mut()?;
        session.traversal.choose(&session.document, label)
    }

    pub fn window_title(&self) -> String {
        self.session
            .as_ref()
            .map(|s| s.source.window_title())
            .unwrap_or_else(|| "Questionnaire".to_string())
    }
}
