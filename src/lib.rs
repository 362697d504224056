//! 律师 / 公证人类别问卷工具库
//!
//! 提供决策树加载、逐步遍历、视图计算与决策树可视化导出功能
//! 遵循MVVM架构模式：model 为纯逻辑，vm 负责视图数据，UI 在二进制中绑定

pub mod config;
pub mod model;
pub mod utils;
pub mod vm;

// 重新导出主要类型
pub use model::data_core::{AppError, AppState};
pub use model::traversal::{HistoryEntry, Transition, Traversal};
pub use model::tree::{Node, TreeDocument};
