//! 把新的行列表按行差异写入长期存在的 VecModel，只通知真正变化的行

use slint::{Model, VecModel};

/// 返回发生变化的行数
pub fn sync_rows<T: Clone + PartialEq + 'static>(model: &VecModel<T>, rows: Vec<T>) -> usize {
    let mut changed = 0;
    let old_len = model.row_count();

    for (i, row) in rows.iter().enumerate() {
        if i < old_len {
            if model.row_data(i).as_ref() != Some(row) {
                model.set_row_data(i, row.clone());
                changed += 1;
            }
        } else {
            model.push(row.clone());
            changed += 1;
        }
    }
    // 从尾部删除多余的行
    for i in (rows.len()..old_len).rev() {
        model.remove(i);
        changed += 1;
    }
    changed
}
