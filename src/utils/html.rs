//! 决策树的 vis-network 页面渲染
//!
//! 节点与边以 JSON 内嵌在页面脚本中，布局参数固定为自上而下的层级布局

use serde_json::{json, Value};

use crate::model::data_core::AppError;
use crate::model::graph::TreeGraph;

pub const VIS_NETWORK_SCRIPT: &str =
    "https://unpkg.com/vis-network@9.1.9/standalone/umd/vis-network.min.js";

/// 层级布局、禁用物理引擎、带箭头的平滑边
pub fn network_options() -> Value {
    json!({
        "layout": {
            "hierarchical": {
                "enabled": true,
                "levelSeparation": 300,
                "nodeSpacing": 350,
                "treeSpacing": 400,
                "direction": "UD",
                "sortMethod": "directed"
            }
        },
        "nodes": {
            "margin": 12,
            "widthConstraint": { "maximum": 350 },
            "font": { "size": 16, "multi": "html" }
        },
        "edges": {
            "arrows": { "to": { "enabled": true } },
            "smooth": {
                "type": "cubicBezier",
                "forceDirection": "vertical",
                "roundness": 0.4
            }
        },
        "interaction": {
            "hover": true,
            "navigationButtons": true,
            "keyboard": true
        },
        "physics": { "enabled": false }
    })
}

pub fn graph_data(graph: &TreeGraph) -> Value {
    let nodes: Vec<Value> = graph
        .nodes
        .iter()
        .map(|n| {
            json!({
                "id": n.id,
                "label": n.label,
                "shape": n.shape(),
                "color": n.color(),
                "level": n.level,
            })
        })
        .collect();
    let edges: Vec<Value> = graph
        .edges
        .iter()
        .map(|e| json!({ "from": e.from, "to": e.to }))
        .collect();
    json!({ "nodes": nodes, "edges": edges })
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// 内嵌到 <script> 中的 JSON 不含任何 `<`：JSON 中 `<` 只会出现在字符串里，改写为 `\u003c`
fn script_json(v: &Value) -> Result<String, AppError> {
    Ok(serde_json::to_string(v)?.replace('<', "\\u003c"))
}

pub fn render_network_html(graph: &TreeGraph, title: &str) -> Result<String, AppError> {
    let data = script_json(&graph_data(graph))?;
    let options = script_json(&network_options())?;
    let title = escape_html(title);

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="fr">
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{VIS_NETWORK_SCRIPT}"></script>
<style>
  html, body {{ margin: 0; padding: 0; background: #ffffff; }}
  #arbre {{ width: 100vw; height: 100vh; }}
</style>
</head>
<body>
<div id="arbre"></div>
<script>
  const data = {data};
  const options = {options};
  new vis.Network(
    document.getElementById("arbre"),
    {{ nodes: new vis.DataSet(data.nodes), edges: new vis.DataSet(data.edges) }},
    options
  );
</script>
</body>
</html>
"#
    ))
}
