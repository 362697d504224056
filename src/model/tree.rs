//! 决策树数据模型：问卷文档、节点与选项

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;

use crate::model::data_core::AppError;
use crate::utils::fs::read_json_file;

/// 问题节点的选项表：选项文字 -> 目标节点标识，保持文档中的书写顺序
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Choices(Vec<(String, String)>);

impl Choices {
    pub fn get(&self, label: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, target)| target.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(l, t)| (l.as_str(), t.as_str()))
    }

    /// 所有目标节点标识（按书写顺序，可能重复）
    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(_, t)| t.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn insert(&mut self, label: String, target: String) {
        // 重复的选项文字：保留首次出现的位置，目标以最后一次为准
        match self.0.iter_mut().find(|(l, _)| *l == label) {
            Some(slot) => slot.1 = target,
            None => self.0.push((label, target)),
        }
    }
}

impl<'de> Deserialize<'de> for Choices {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ChoicesVisitor;

        impl<'de> Visitor<'de> for ChoicesVisitor {
            type Value = Choices;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("选项文字到节点标识的映射")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Choices, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut choices = Choices::default();
                while let Some((label, target)) = map.next_entry::<String, String>()? {
                    choices.insert(label, target);
                }
                Ok(choices)
            }
        }

        deserializer.deserialize_map(ChoicesVisitor)
    }
}

impl<const N: usize> From<[(&str, &str); N]> for Choices {
    fn from(pairs: [(&str, &str); N]) -> Self {
        let mut choices = Choices::default();
        for (label, target) in pairs {
            choices.insert(label.to_string(), target.to_string());
        }
        choices
    }
}

/// 决策树节点，按 `type` 字段区分
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    Question {
        text: String,
        choices: Choices,
        #[serde(default)]
        link: Option<String>,
    },
    Result {
        text: String,
        #[serde(default)]
        link: Option<String>,
    },
}

impl Node {
    pub fn text(&self) -> &str {
        match self {
            Node::Question { text, .. } | Node::Result { text, .. } => text,
        }
    }

    pub fn link(&self) -> Option<&str> {
        match self {
            Node::Question { link, .. } | Node::Result { link, .. } => link.as_deref(),
        }
    }

    /// 结果节点没有选项，返回 None
    pub fn choices(&self) -> Option<&Choices> {
        match self {
            Node::Question { choices, .. } => Some(choices),
            Node::Result { .. } => None,
        }
    }

    pub fn is_result(&self) -> bool {
        matches!(self, Node::Result { .. })
    }
}

/// 问卷文档：起始节点 + 节点表。加载后只读
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TreeDocument {
    pub start: String,
    pub nodes: BTreeMap<String, Node>,
}

impl TreeDocument {
    /// 从JSON文本解析文档。只校验结构，不校验选项目标是否存在
    pub fn from_json_str(s: &str) -> Result<Self, AppError> {
        Ok(serde_json::from_str(s)?)
    }

    /// 从文件加载文档，悬空的选项目标只记录警告
    pub fn load_file(p: &Path) -> Result<Self, AppError> {
        let doc: TreeDocument = read_json_file(p)?;
        for (from, to) in doc.dangling_targets() {
            tracing::warn!("节点 {} 的选项指向不存在的节点 {} ({})", from, to, p.display());
        }
        tracing::info!("已加载问卷 {}: {} 个节点，起始节点 {}", p.display(), doc.nodes.len(), doc.start);
        Ok(doc)
    }

    pub fn node(&self, id: &str) -> Result<&Node, AppError> {
        self.nodes
            .get(id)
            .ok_or_else(|| AppError::Lookup(id.to_string()))
    }

    pub fn start_node(&self) -> Result<&Node, AppError> {
        self.node(&self.start)
    }

    /// 列出 (节点, 目标) 中目标不存在的选项
    pub fn dangling_targets(&self) -> Vec<(&str, &str)> {
        let mut dangling = Vec::new();
        for (id, node) in &self.nodes {
            let Some(choices) = node.choices() else { continue };
            for target in choices.targets() {
                if !self.nodes.contains_key(target) {
                    dangling.push((id.as_str(), target));
                }
            }
        }
        dangling
    }
}
