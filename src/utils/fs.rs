//! IO helper: JSON 读取与导出页面的临时文件

use std::{fs::File, io::{BufReader, Write}, path::{Path, PathBuf}};

use serde::de::DeserializeOwned;

use crate::model::data_core::AppError;

/// 从文件读取JSON数据
pub fn read_json_file<T: DeserializeOwned>(p: &Path) -> Result<T, AppError> {
    let f = File::open(p)?;
    let rdr = BufReader::new(f);
    let v: T = serde_json::from_reader(rdr)?;
    Ok(v)
}

/// 将 HTML 写入一个保留的临时文件（进程退出后不删除，供浏览器打开）
pub fn write_temp_html(html: &str) -> Result<PathBuf, AppError> {
    let mut tmp = tempfile::Builder::new()
        .prefix("arbre_decisionnel_")
        .suffix(".html")
        .tempfile()?;
    tmp.write_all(html.as_bytes())?;
    let (_file, path) = tmp.keep().map_err(|e| AppError::Io(e.error))?;
    Ok(path)
}
