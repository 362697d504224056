//! 程序入口：初始化日志，选择问卷类别，并把 Slint 界面绑定到问卷状态

use std::{cell::RefCell, path::PathBuf, rc::Rc};

use anyhow::Context;
use slint::{ComponentHandle, ModelRc, SharedString, VecModel};
use tracing_subscriber::fmt::SubscriberBuilder;

use questionnaire_vaudois::config::AppConfig;
use questionnaire_vaudois::model::category::Category;
use questionnaire_vaudois::model::data_core::{AppError, AppState};
use questionnaire_vaudois::model::traversal::Transition;
use questionnaire_vaudois::utils::{clipboard, launcher::{open_detached, SystemLauncher}};
use questionnaire_vaudois::vm::bridge::*;
use questionnaire_vaudois::vm::export::export_tree_html;
use questionnaire_vaudois::vm::model_sync::sync_rows;
use questionnaire_vaudois::vm::view::{current_history_lines, current_recap_text, current_view, ChoiceView, QuestionView};

slint::include_modules!();

// ChoiceItemData转换实现
impl From<&ChoiceView> for ChoiceItemData {
    /// 将视图选项转换为Slint可用的数据结构
    fn from(item: &ChoiceView) -> Self {
        match item {
            ChoiceView::Next { label, caption } => Self {
                key: label.as_str().into(),
                text: caption.as_str().into(),
                is_result: false,
                link: SharedString::default(),
            },
            ChoiceView::Outcome { label, text, link } => Self {
                key: label.as_str().into(),
                text: text.as_str().into(),
                is_result: true,
                link: link.as_deref().unwrap_or_default().into(),
            },
        }
    }
}

/// VM桥接器：管理UI与问卷状态的交互
#[derive(Clone)]
struct ViewModelBridge {
    app_state: Rc<RefCell<AppState>>,
    // 长期存在的列表模型，每次刷新只写入差异
    choices: Rc<VecModel<ChoiceItemData>>,
    history: Rc<VecModel<SharedString>>,
}

impl ViewModelBridge {
    /// 创建新的VM桥接器并绑定所有回调
    fn new(app_window: &AppWindow, app_state: Rc<RefCell<AppState>>) -> Self {
        let bridge = Self {
            app_state,
            choices: Rc::new(VecModel::default()),
            history: Rc::new(VecModel::default()),
        };
        app_window.set_choices(ModelRc::from(bridge.choices.clone()));
        app_window.set_history(ModelRc::from(bridge.history.clone()));
        app_window.set_status_message(STATUS_READY.into());

        bridge.setup_callbacks(app_window);
        bridge
    }

    /// 设置所有UI回调函数
    fn setup_callbacks(&self, app_window: &AppWindow) {
        // === 选项按钮 ===
        {
            let bridge = self.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_choose(move |key| {
                if let Some(app_window) = app_window_weak.upgrade() {
                    bridge.handle_choose(&app_window, &key);
                }
            });
        }

        // === 链接 ===
        app_window.on_open_link(|url| {
            open_detached(&SystemLauncher, &url);
        });

        // === 切换类别 ===
        {
            let bridge = self.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_switch_category(move |key| {
                if let Some(app_window) = app_window_weak.upgrade() {
                    bridge.handle_switch_category(&app_window, &key);
                }
            });
        }

        // === 打开其他问卷文件 ===
        {
            let bridge = self.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_open_file(move || {
                if let Some(app_window) = app_window_weak.upgrade() {
                    bridge.handle_open_file(&app_window);
                }
            });
        }

        // === 显示决策树 ===
        {
            let bridge = self.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_show_tree(move || {
                if let Some(app_window) = app_window_weak.upgrade() {
                    bridge.handle_show_tree(&app_window);
                }
            });
        }

        // === 重新开始 ===
        {
            let bridge = self.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_restart(move || {
                if let Some(app_window) = app_window_weak.upgrade() {
                    bridge.handle_restart(&app_window);
                }
            });
        }

        // === 复制回顾 ===
        {
            let bridge = self.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_copy_recap(move || {
                if let Some(app_window) = app_window_weak.upgrade() {
                    bridge.handle_copy_recap(&app_window);
                }
            });
        }

        app_window.on_quit(|| {
            if let Err(e) = slint::quit_event_loop() {
                tracing::error!("退出事件循环失败: {}", e);
            }
        });
    }

    /// 根据当前状态重新计算视图并写入界面
    fn refresh(&self, app_window: &AppWindow) {
        let state = self.app_state.borrow();
        app_window.set_window_title(state.window_title().into());

        // 视图无法计算时换成空视图，旧文档的选项一律清掉
        let view = current_view(&state).unwrap_or_else(|e| {
            app_window.set_status_message(error_status(&e).into());
            tracing::error!("视图计算失败: {}", e);
            QuestionView::unavailable()
        });

        app_window.set_prompt(view.prompt.as_str().into());
        app_window.set_prompt_link(view.link.as_deref().unwrap_or_default().into());
        app_window.set_finished(view.finished);
        let rows: Vec<ChoiceItemData> = view.items.iter().map(ChoiceItemData::from).collect();
        let changed = sync_rows(&self.choices, rows);
        tracing::debug!("节点 {}: {} 个选项行变化", view.node_id, changed);

        let lines: Vec<SharedString> = current_history_lines(&state).into_iter().map(Into::into).collect();
        sync_rows(&self.history, lines);
    }

    /// 处理选项点击
    fn handle_choose(&self, app_window: &AppWindow, key: &str) {
        let result = self.app_state.borrow_mut().choose(key);
        match result {
            Ok(Transition::Continue { next }) => {
                tracing::info!("进入节点 {}", next);
                app_window.set_status_message(SharedString::default());
            }
            Ok(Transition::Finished { result }) => {
                tracing::info!("到达结果 {}", result);
                app_window.set_status_message(STATUS_FINISHED.into());
            }
            Err(e) => {
                app_window.set_status_message(error_status(&e).into());
                tracing::error!("选择 {:?} 失败: {}", key, e);
                return;
            }
        }
        self.refresh(app_window);
    }

    /// 切换类别：失败时弹出错误框，保留当前问卷
    fn handle_switch_category(&self, app_window: &AppWindow, key: &str) {
        let Some(category) = Category::from_key(key) else {
            tracing::error!("未知类别: {}", key);
            return;
        };

        let result = self.app_state.borrow_mut().load_category(category);
        match result {
            Ok(()) => {
                tracing::info!("已切换到类别 {}", category);
                app_window.set_status_message(STATUS_LOADED.into());
                self.refresh(app_window);
            }
            Err(e) => {
                tracing::error!("类别 {} 加载失败: {}", category, e);
                app_window.set_status_message(error_status(&e).into());
                Self::show_error_dialog(&load_error_message(category.file_name(), &e));
            }
        }
    }

    /// 显示文件选择对话框
    fn show_file_dialog() -> Option<PathBuf> {
        use rfd::FileDialog;

        // 使用原生文件对话框选择JSON文件
        let file_path = FileDialog::new()
            .add_filter("Questionnaire JSON", &["json"])
            .add_filter("Tous les fichiers", &["*"])
            .set_title("Choisir un questionnaire")
            .pick_file();

        match file_path {
            Some(path) => {
                tracing::info!("用户选择了文件: {}", path.display());
                Some(path)
            }
            None => {
                tracing::info!("用户取消了文件选择");
                None
            }
        }
    }

    fn handle_open_file(&self, app_window: &AppWindow) {
        let Some(path) = Self::show_file_dialog() else {
            return;
        };

        let result = self.app_state.borrow_mut().load_file(&path);
        match result {
            Ok(()) => {
                app_window.set_status_message(STATUS_LOADED.into());
                self.refresh(app_window);
            }
            Err(e) => {
                tracing::error!("文件加载失败: {}", e);
                app_window.set_status_message(error_status(&e).into());
                Self::show_error_dialog(&load_error_message(&path.display().to_string(), &e));
            }
        }
    }

    /// 导出整棵树并交给浏览器
    fn handle_show_tree(&self, app_window: &AppWindow) {
        let exported = export_tree_html(&self.app_state.borrow());
        match exported {
            Ok(path) => {
                open_detached(&SystemLauncher, &path.to_string_lossy());
                app_window.set_status_message(STATUS_TREE_OPENED.into());
            }
            Err(e) => {
                tracing::error!("决策树导出失败: {}", e);
                app_window.set_status_message(error_status(&e).into());
                Self::show_error_dialog(&e.to_string());
            }
        }
    }

    fn handle_restart(&self, app_window: &AppWindow) {
        let result = self.app_state.borrow_mut().restart();
        match result {
            Ok(()) => app_window.set_status_message(STATUS_RESTARTED.into()),
            Err(e) => {
                app_window.set_status_message(error_status(&e).into());
                return;
            }
        }
        self.refresh(app_window);
    }

    fn handle_copy_recap(&self, app_window: &AppWindow) {
        let recap = current_recap_text(&self.app_state.borrow());

        match clipboard::copy_recap(&recap) {
            Ok(()) => {
                app_window.set_status_message(STATUS_COPIED.into());
                tracing::info!("回顾已复制到剪贴板，长度: {} 字符", recap.len());
            }
            Err(e) => {
                app_window.set_status_message(error_status(&e).into());
                tracing::error!("复制失败: {}", e);
            }
        }
    }

    /// 模态错误提示框
    fn show_error_dialog(message: &str) {
        rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Error)
            .set_title(ERROR_DIALOG_TITLE)
            .set_description(message)
            .set_buttons(rfd::MessageButtons::Ok)
            .show();
    }
}

fn main() -> anyhow::Result<()> {
    let config = AppConfig::locate();

    // 初始化日志输出
    let _ = SubscriberBuilder::default()
        .with_max_level(config.log_level)
        .try_init();

    let category_window = CategoryWindow::new().context("类别窗口初始化失败")?;
    let app_window = AppWindow::new().context("UI 初始化失败")?;
    let state = Rc::new(RefCell::new(AppState::new(config)));
    let bridge = ViewModelBridge::new(&app_window, state.clone());

    // 初始加载失败时退出事件循环并向上报告
    let startup_error: Rc<RefCell<Option<(Category, AppError)>>> = Rc::new(RefCell::new(None));
    {
        let startup_error = startup_error.clone();
        let category_weak = category_window.as_weak();
        let app_weak = app_window.as_weak();
        category_window.on_select(move |key| {
            let (Some(category_window), Some(app_window)) = (category_weak.upgrade(), app_weak.upgrade()) else {
                return;
            };
            let Some(category) = Category::from_key(&key) else {
                tracing::error!("未知类别: {}", key);
                return;
            };

            let loaded = state.borrow_mut().load_category(category);
            match loaded {
                Ok(()) => {
                    bridge.refresh(&app_window);
                    // 先显示主窗口再关闭选择窗口，避免事件循环因无窗口而结束
                    if let Err(e) = app_window.show() {
                        tracing::error!("主窗口显示失败: {}", e);
                    }
                    if let Err(e) = category_window.hide() {
                        tracing::error!("类别窗口关闭失败: {}", e);
                    }
                }
                Err(e) => {
                    *startup_error.borrow_mut() = Some((category, e));
                    if let Err(e) = slint::quit_event_loop() {
                        tracing::error!("退出事件循环失败: {}", e);
                    }
                }
            }
        });
    }

    category_window.show()?;
    tracing::info!("应用启动成功，等待选择类别");
    slint::run_event_loop()?;

    if let Some((category, e)) = startup_error.borrow_mut().take() {
        return Err(e).with_context(|| format!("无法加载 {}", category.file_name()));
    }
    Ok(())
}
