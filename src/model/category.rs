//! 问卷类别：每个类别对应一份决策树文档

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Barreau,
    Notaire,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Barreau, Category::Notaire];

    /// UI 回调中使用的键
    pub fn key(self) -> &'static str {
        match self {
            Category::Barreau => "barreau",
            Category::Notaire => "notaire",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Barreau => "Barreau",
            Category::Notaire => "Notaire",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            Category::Barreau => "barreau_vaudois.json",
            Category::Notaire => "notaire_vaudois.json",
        }
    }

    pub fn window_title(self) -> &'static str {
        match self {
            Category::Barreau => "Questionnaire Barreau Vaudois",
            Category::Notaire => "Questionnaire Notaire Vaudois",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
