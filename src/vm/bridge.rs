//! VM桥接层：连接Slint UI与AppState数据模型
//!
//! 注意：此模块的具体实现在main.rs中，因为依赖于Slint生成的类型
//! 这里只提供公共常量与提示文字

// === 常量定义（消除魔法值） ===
pub const STATUS_READY: &str = "Prêt";
pub const STATUS_LOADED: &str = "Questionnaire chargé";
pub const STATUS_RESTARTED: &str = "Questionnaire recommencé";
pub const STATUS_FINISHED: &str = "Résultat atteint";
pub const STATUS_COPIED: &str = "Récapitulatif copié dans le presse-papiers";
pub const STATUS_TREE_OPENED: &str = "Arbre décisionnel ouvert dans le navigateur";
pub const STATUS_ERROR_PREFIX: &str = "Erreur : ";

pub const ERROR_DIALOG_TITLE: &str = "Erreur";

/// 加载失败提示框正文
pub fn load_error_message(file: &str, error: &dyn std::fmt::Display) -> String {
    format!("Impossible de charger {}.\n\n{}", file, error)
}

/// 状态栏中的错误提示
pub fn error_status(error: &dyn std::fmt::Display) -> String {
    format!("{}{}", STATUS_ERROR_PREFIX, error)
}
