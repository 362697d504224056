//! 应用配置：全部为编译期默认值，不读取环境变量或命令行参数

use std::path::{Path, PathBuf};

use crate::model::category::Category;

/// 默认数据目录名
pub const DATA_DIR_NAME: &str = "data";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// 存放各类别问卷文档的目录
    pub data_dir: PathBuf,
    pub log_level: tracing::Level,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DATA_DIR_NAME),
            log_level: tracing::Level::INFO,
        }
    }
}

impl AppConfig {
    /// 依次尝试 `./data` 与可执行文件旁的 `data`，都不存在时退回默认值
    pub fn locate() -> Self {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(Path::to_path_buf));
        let candidates = std::iter::once(PathBuf::from(DATA_DIR_NAME))
            .chain(exe_dir.map(|d| d.join(DATA_DIR_NAME)));

        Self::locate_in(candidates)
    }

    fn locate_in(candidates: impl IntoIterator<Item = PathBuf>) -> Self {
        match candidates.into_iter().find(|c| c.is_dir()) {
            Some(data_dir) => {
                tracing::debug!("使用数据目录: {}", data_dir.display());
                Self { data_dir, ..Self::default() }
            }
            None => {
                tracing::warn!("未找到数据目录，使用默认路径 {}", DATA_DIR_NAME);
                Self::default()
            }
        }
    }

    pub fn category_path(&self, category: Category) -> PathBuf {
        self.data_dir.join(category.file_name())
    }
}
