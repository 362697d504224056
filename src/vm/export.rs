//! 决策树导出：当前问卷 -> 图 -> vis-network 页面 -> 临时文件

use std::path::PathBuf;

use crate::model::data_core::{AppError, AppState};
use crate::model::graph::build_graph;
use crate::utils::fs::write_temp_html;
use crate::utils::html::render_network_html;

/// 导出整棵决策树为 HTML 页面，返回临时文件路径
pub fn export_tree_html(state: &AppState) -> Result<PathBuf, AppError> {
    let session = state.session()?;
    let graph = build_graph(&session.document)?;
    let html = render_network_html(&graph, &session.source.window_title())?;
    let path = write_temp_html(&html)?;
    tracing::info!("决策树已导出: {} ({} 个节点)", path.display(), graph.nodes.len());
    Ok(path)
}
