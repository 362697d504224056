//! 决策树图导出：自然排序、层级计算、节点/边收集
//!
//! 所有遍历都用显式栈/队列完成，不做递归；从起始节点出发遇到回边时报告 `CyclicGraph`

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::sync::LazyLock;

use regex::Regex;

use crate::model::data_core::AppError;
use crate::model::tree::{Choices, TreeDocument};

static DIGIT_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").expect("固定正则"));

/// 标识中的数字段，按整数值比较（忽略前导零，不会溢出）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NaturalKey(Vec<String>);

impl NaturalKey {
    pub fn new(id: &str) -> Self {
        let runs = DIGIT_RUN
            .find_iter(id)
            .map(|m| {
                let digits = m.as_str().trim_start_matches('0');
                if digits.is_empty() { "0".to_string() } else { digits.to_string() }
            })
            .collect();
        Self(runs)
    }
}

impl Ord for NaturalKey {
    fn cmp(&self, other: &Self) -> Ordering {
        for (a, b) in self.0.iter().zip(&other.0) {
            let ord = a.len().cmp(&b.len()).then_with(|| a.cmp(b));
            if ord != Ordering::Equal {
                return ord;
            }
        }
        self.0.len().cmp(&other.0.len())
    }
}

impl PartialOrd for NaturalKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    NaturalKey::new(a).cmp(&NaturalKey::new(b))
}

/// 按自然顺序排列目标节点；数字段相同的保持书写顺序
pub fn sorted_targets(choices: &Choices) -> Vec<&str> {
    let mut targets: Vec<&str> = choices.targets().collect();
    targets.sort_by_cached_key(|t| NaturalKey::new(t));
    targets
}

fn children<'d>(doc: &'d TreeDocument, id: &str) -> Result<Vec<&'d str>, AppError> {
    Ok(doc
        .node(id)?
        .choices()
        .map(sorted_targets)
        .unwrap_or_default())
}

#[derive(Clone, Copy)]
enum Mark {
    Active,
    Done,
}

/// 三色深度优先检查：从起始节点可达的部分不能有环
pub fn ensure_acyclic(doc: &TreeDocument) -> Result<(), AppError> {
    let start = doc.start.as_str();
    let mut marks: HashMap<&str, Mark> = HashMap::new();
    let mut stack = vec![(start, children(doc, start)?, 0usize)];
    marks.insert(start, Mark::Active);

    while let Some((node_id, targets, next)) = stack.last_mut() {
        let Some(&child) = targets.get(*next) else {
            marks.insert(*node_id, Mark::Done);
            stack.pop();
            continue;
        };
        *next += 1;
        let parent = *node_id;

        match marks.get(child) {
            Some(Mark::Active) => {
                return Err(AppError::CyclicGraph {
                    from: parent.to_string(),
                    to: child.to_string(),
                })
            }
            Some(Mark::Done) => {}
            None => {
                let grandchildren = children(doc, child)?;
                marks.insert(child, Mark::Active);
                stack.push((child, grandchildren, 0));
            }
        }
    }
    Ok(())
}

/// 每个可达节点的最小深度（起始节点为 0）
pub fn compute_levels(doc: &TreeDocument) -> Result<BTreeMap<String, usize>, AppError> {
    ensure_acyclic(doc)?;

    let mut levels = BTreeMap::new();
    let mut queue = VecDeque::from([(doc.start.as_str(), 0usize)]);
    levels.insert(doc.start.clone(), 0);

    // 广度优先：首次发现即最浅深度
    while let Some((id, level)) = queue.pop_front() {
        for child in children(doc, id)? {
            if !levels.contains_key(child) {
                levels.insert(child.to_string(), level + 1);
                queue.push_back((child, level + 1));
            }
        }
    }
    Ok(levels)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphNodeKind {
    Question,
    Result,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub kind: GraphNodeKind,
    pub level: usize,
}

impl GraphNode {
    pub fn shape(&self) -> &'static str {
        match self.kind {
            GraphNodeKind::Question => "ellipse",
            GraphNodeKind::Result => "box",
        }
    }

    pub fn color(&self) -> &'static str {
        match self.kind {
            GraphNodeKind::Question => "lightblue",
            GraphNodeKind::Result => "lightgreen",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl TreeGraph {
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

fn graph_node(doc: &TreeDocument, id: &str, levels: &BTreeMap<String, usize>) -> Result<GraphNode, AppError> {
    let node = doc.node(id)?;
    Ok(GraphNode {
        id: id.to_string(),
        label: node.text().to_string(),
        kind: if node.is_result() { GraphNodeKind::Result } else { GraphNodeKind::Question },
        level: levels.get(id).copied().unwrap_or(0),
    })
}

/// 收集整棵树：每个标识一个节点，每条父子选项一条边
#[tracing::instrument(level = "debug", skip(doc), fields(start = %doc.start))]
pub fn build_graph(doc: &TreeDocument) -> Result<TreeGraph, AppError> {
    let levels = compute_levels(doc)?;
    let start = doc.start.as_str();

    let mut graph = TreeGraph::default();
    let mut added: HashSet<&str> = HashSet::from([start]);
    graph.nodes.push(graph_node(doc, start, &levels)?);
    let mut stack = vec![(start, children(doc, start)?, 0usize)];

    while let Some((node_id, targets, next)) = stack.last_mut() {
        let Some(&child) = targets.get(*next) else {
            stack.pop();
            continue;
        };
        *next += 1;
        let parent = *node_id;

        graph.edges.push(GraphEdge {
            from: parent.to_string(),
            to: child.to_string(),
        });
        if added.insert(child) {
            graph.nodes.push(graph_node(doc, child, &levels)?);
            stack.push((child, children(doc, child)?, 0));
        }
    }

    tracing::debug!("决策树图: {} 个节点, {} 条边", graph.nodes.len(), graph.edges.len());
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(json: &str) -> TreeDocument {
        TreeDocument::from_json_str(json).expect("测试文档解析失败")
    }

    #[test]
    fn test_natural_order() {
        let mut ids = vec!["Q2-10", "Q2-9", "Q2-1"];
        ids.sort_by(|a, b| natural_cmp(a, b));
        assert_eq!(ids, vec!["Q2-1", "Q2-9", "Q2-10"]);
    }

    #[test]
    fn test_natural_key_prefix_and_leading_zeros() {
        assert_eq!(natural_cmp("Q2", "Q2-1"), Ordering::Less);
        assert_eq!(natural_cmp("R007", "R7"), Ordering::Equal);
        assert_eq!(natural_cmp("fin", "Q1"), Ordering::Less);
        let huge = format!("Q{}", "9".repeat(40));
        let huger = format!("Q1{}", "0".repeat(40));
        assert_eq!(natural_cmp(&huge, &huger), Ordering::Less);
    }

    #[test]
    fn test_sorted_targets_is_stable_on_ties() {
        let choices = Choices::from([("a", "R1"), ("b", "Q1"), ("c", "Q0-5")]);
        assert_eq!(sorted_targets(&choices), vec!["Q0-5", "R1", "Q1"]);
    }

    #[test]
    fn test_levels_take_shallowest_path() {
        let d = doc(r#"{"start":"S","nodes":{
            "S":{"type":"question","text":"s","choices":{"a":"A","b":"B"}},
            "A":{"type":"question","text":"a","choices":{"b":"B"}},
            "B":{"type":"result","text":"b"}}}"#);

        let levels = compute_levels(&d).unwrap();
        assert_eq!(levels["S"], 0);
        assert_eq!(levels["A"], 1);
        assert_eq!(levels["B"], 1);
    }

    #[test]
    fn test_levels_skip_unreachable_nodes() {
        let d = doc(r#"{"start":"S","nodes":{
            "S":{"type":"question","text":"s","choices":{"a":"A"}},
            "A":{"type":"result","text":"a"},
            "orphelin":{"type":"result","text":"o"}}}"#);

        let levels = compute_levels(&d).unwrap();
        assert_eq!(levels.len(), 2);
        assert!(!levels.contains_key("orphelin"));
    }

    #[test]
    fn test_shared_child_added_once_with_two_edges() {
        let d = doc(r#"{"start":"Q1","nodes":{
            "Q1":{"type":"question","text":"un","choices":{"x":"Q2","y":"Q3"}},
            "Q2":{"type":"question","text":"deux","choices":{"x":"R1"}},
            "Q3":{"type":"question","text":"trois","choices":{"x":"R1"}},
            "R1":{"type":"result","text":"fin"}}}"#);

        let graph = build_graph(&d).unwrap();
        assert_eq!(graph.nodes.len(), 4);
        assert_eq!(graph.nodes.iter().filter(|n| n.id == "R1").count(), 1);
        assert_eq!(graph.edges.iter().filter(|e| e.to == "R1").count(), 2);
        assert_eq!(graph.edges.len(), 4);

        let r1 = graph.node("R1").unwrap();
        assert_eq!(r1.kind, GraphNodeKind::Result);
        assert_eq!((r1.shape(), r1.color()), ("box", "lightgreen"));
        assert_eq!(r1.level, 2);

        let q1 = graph.node("Q1").unwrap();
        assert_eq!((q1.shape(), q1.color(), q1.level), ("ellipse", "lightblue", 0));
    }

    #[test]
    fn test_nodes_follow_natural_preorder() {
        let d = doc(r#"{"start":"Q1","nodes":{
            "Q1":{"type":"question","text":"q","choices":{"c":"Q1-10","b":"Q1-9","a":"Q1-2"}},
            "Q1-2":{"type":"result","text":"2"},
            "Q1-9":{"type":"question","text":"9","choices":{"x":"R9"}},
            "R9":{"type":"result","text":"r9"},
            "Q1-10":{"type":"result","text":"10"}}}"#);

        let graph = build_graph(&d).unwrap();
        let ids: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["Q1", "Q1-2", "Q1-9", "R9", "Q1-10"]);
    }

    #[test]
    fn test_cycle_is_reported() {
        let d = doc(r#"{"start":"A","nodes":{
            "A":{"type":"question","text":"a","choices":{"x":"B"}},
            "B":{"type":"question","text":"b","choices":{"retour":"A","fin":"R"}},
            "R":{"type":"result","text":"r"}}}"#);

        let err = build_graph(&d).unwrap_err();
        assert!(matches!(err, AppError::CyclicGraph { ref from, ref to } if from == "B" && to == "A"));
        assert!(matches!(compute_levels(&d), Err(AppError::CyclicGraph { .. })));
    }

    #[test]
    fn test_self_loop_is_reported() {
        let d = doc(r#"{"start":"A","nodes":{"A":{"type":"question","text":"a","choices":{"encore":"A"}}}}"#);
        assert!(matches!(ensure_acyclic(&d), Err(AppError::CyclicGraph { ref from, ref to }) if from == "A" && to == "A"));
    }

    #[test]
    fn test_diamond_is_not_a_cycle() {
        let d = doc(r#"{"start":"S","nodes":{
            "S":{"type":"question","text":"s","choices":{"a":"A","b":"B"}},
            "A":{"type":"question","text":"a","choices":{"c":"C"}},
            "B":{"type":"question","text":"b","choices":{"c":"C"}},
            "C":{"type":"result","text":"c"}}}"#);
        assert!(ensure_acyclic(&d).is_ok());
    }

    #[test]
    fn test_missing_target_is_lookup_error() {
        let d = doc(r#"{"start":"S","nodes":{"S":{"type":"question","text":"s","choices":{"a":"absent"}}}}"#);
        assert!(matches!(build_graph(&d), Err(AppError::Lookup(id)) if id == "absent"));
    }
}
