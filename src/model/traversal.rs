//! 遍历引擎：记录当前节点与访问历史，按用户选择逐步前进

use crate::model::data_core::AppError;
use crate::model::tree::{Node, TreeDocument};

/// 到达结果节点时写入历史的标记
pub const OUTCOME_LABEL: &str = "Résultat";

/// 一条访问历史
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub node_id: String,
    pub text: String,
    /// 只有结果节点带有该标记
    pub outcome: Option<String>,
}

impl HistoryEntry {
    fn question(node_id: &str, text: &str) -> Self {
        Self {
            node_id: node_id.to_string(),
            text: text.to_string(),
            outcome: None,
        }
    }

    fn result(node_id: &str, text: &str) -> Self {
        Self {
            node_id: node_id.to_string(),
            text: text.to_string(),
            outcome: Some(OUTCOME_LABEL.to_string()),
        }
    }

    pub fn is_outcome(&self) -> bool {
        self.outcome.is_some()
    }
}

/// 一次选择的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// 进入下一个问题
    Continue { next: String },
    /// 到达结果，遍历结束
    Finished { result: String },
}

/// 遍历状态。`choose` 在所有查找成功后才修改状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Traversal {
    current: String,
    history: Vec<HistoryEntry>,
    finished: bool,
}

impl Traversal {
    pub fn new(doc: &TreeDocument) -> Self {
        Self {
            current: doc.start.clone(),
            history: Vec::new(),
            finished: false,
        }
    }

    /// 回到起始节点并清空历史
    pub fn reset(&mut self, doc: &TreeDocument) {
        self.current = doc.start.clone();
        self.history.clear();
        self.finished = false;
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn current_node<'d>(&self, doc: &'d TreeDocument) -> Result<&'d Node, AppError> {
        doc.node(&self.current)
    }

    /// 沿当前问题的 `label` 选项前进一步
    pub fn choose(&mut self, doc: &TreeDocument, label: &str) -> Result<Transition, AppError> {
        if self.finished {
            return Err(AppError::State("问卷已得出结果，请重新开始".into()));
        }

        let node = self.current_node(doc)?;
        let choices = node.choices().ok_or_else(|| {
            AppError::State(format!("当前节点 {} 是结果节点，没有可选项", self.current))
        })?;
        let target_id = choices.get(label).ok_or_else(|| AppError::UnknownChoice {
            node: self.current.clone(),
            label: label.to_string(),
        })?;
        let target = doc.node(target_id)?;

        self.history.push(HistoryEntry::question(&self.current, node.text()));

        if target.is_result() {
            self.history.push(HistoryEntry::result(target_id, target.text()));
            self.finished = true;
            tracing::info!("选择 {:?} 后到达结果 {}", label, target_id);
            Ok(Transition::Finished {
                result: target_id.to_string(),
            })
        } else {
            tracing::debug!("选择 {:?}: {} -> {}", label, self.current, target_id);
            self.current = target_id.to_string();
            Ok(Transition::Continue {
                next: self.current.clone(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> TreeDocument {
        TreeDocument::from_json_str(
            r#"{"start":"q1","nodes":{
                "q1":{"type":"question","text":"Are you a lawyer?","choices":{"yes":"r1","no":"q2"}},
                "q2":{"type":"question","text":"Are you a notary?","choices":{"yes":"r2","no":"r3"}},
                "r1":{"type":"result","text":"Go to Barreau"},
                "r2":{"type":"result","text":"Go to Notary registry"},
                "r3":{"type":"result","text":"No applicable category"}}}"#,
        )
        .expect("场景文档解析失败")
    }

    #[test]
    fn test_new_starts_at_start() {
        let doc = scenario();
        let t = Traversal::new(&doc);
        assert_eq!(t.current(), "q1");
        assert!(t.history().is_empty());
        assert!(!t.is_finished());
        assert_eq!(t.current_node(&doc).unwrap().text(), "Are you a lawyer?");
    }

    #[test]
    fn test_scenario_no_then_yes() {
        let doc = scenario();
        let mut t = Traversal::new(&doc);

        assert_eq!(t.choose(&doc, "no").unwrap(), Transition::Continue { next: "q2".into() });
        assert_eq!(t.current(), "q2");

        assert_eq!(t.choose(&doc, "yes").unwrap(), Transition::Finished { result: "r2".into() });
        // 到达结果后 current 不再更新
        assert_eq!(t.current(), "q2");
        assert!(t.is_finished());

        let expected = vec![
            HistoryEntry { node_id: "q1".into(), text: "Are you a lawyer?".into(), outcome: None },
            HistoryEntry { node_id: "q2".into(), text: "Are you a notary?".into(), outcome: None },
            HistoryEntry {
                node_id: "r2".into(),
                text: "Go to Notary registry".into(),
                outcome: Some("Résultat".into()),
            },
        ];
        assert_eq!(t.history(), expected.as_slice());
    }

    #[test]
    fn test_unknown_label_leaves_state_untouched() {
        let doc = scenario();
        let mut t = Traversal::new(&doc);
        let before = t.clone();

        let err = t.choose(&doc, "peut-être").unwrap_err();
        assert!(matches!(err, AppError::UnknownChoice { ref node, ref label } if node == "q1" && label == "peut-être"));
        assert_eq!(t, before);
    }

    #[test]
    fn test_missing_target_is_lookup_error_without_mutation() {
        let doc = TreeDocument::from_json_str(
            r#"{"start":"a","nodes":{"a":{"type":"question","text":"A","choices":{"x":"nulle-part"}}}}"#,
        )
        .unwrap();
        let mut t = Traversal::new(&doc);

        assert!(matches!(t.choose(&doc, "x"), Err(AppError::Lookup(id)) if id == "nulle-part"));
        assert!(t.history().is_empty());
        assert_eq!(t.current(), "a");
    }

    #[test]
    fn test_choose_after_result_is_rejected() {
        let doc = scenario();
        let mut t = Traversal::new(&doc);
        t.choose(&doc, "yes").unwrap();

        assert!(matches!(t.choose(&doc, "no"), Err(AppError::State(_))));
        assert_eq!(t.history().len(), 2);
    }

    #[test]
    fn test_start_on_result_node_has_no_choices() {
        let doc = TreeDocument::from_json_str(
            r#"{"start":"r","nodes":{"r":{"type":"result","text":"Fin"}}}"#,
        )
        .unwrap();
        let mut t = Traversal::new(&doc);
        assert!(matches!(t.choose(&doc, "x"), Err(AppError::State(_))));
    }

    #[test]
    fn test_reset_after_result() {
        let doc = scenario();
        let mut t = Traversal::new(&doc);
        t.choose(&doc, "no").unwrap();
        t.choose(&doc, "no").unwrap();
        assert!(t.is_finished());

        t.reset(&doc);
        assert_eq!(t.current(), "q1");
        assert!(t.history().is_empty());
        assert!(!t.is_finished());
        assert_eq!(t, Traversal::new(&doc));
    }
}
