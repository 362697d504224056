//! 交给系统默认程序打开链接或文件，不等待结果

use std::io;
use std::process::{Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};

/// 打开 URL 或本地文件的抽象，便于测试时替换
pub trait Launcher {
    fn open(&self, target: &str) -> io::Result<()>;
}

/// 使用平台默认程序（浏览器 / 查看器）
#[derive(Debug, Default)]
pub struct SystemLauncher;

/// 平台对应的打开命令及参数
pub fn opener_command(target: &str) -> (&'static str, Vec<String>) {
    if cfg!(target_os = "windows") {
        (
            "rundll32",
            vec!["url.dll,FileProtocolHandler".to_string(), target.to_string()],
        )
    } else if cfg!(target_os = "macos") {
        ("open", vec![target.to_string()])
    } else {
        ("xdg-open", vec![target.to_string()])
    }
}

/// 启动子进程并交给后台线程等待退出，调用方不阻塞，也不会留下僵尸进程
fn spawn_reaped(cmd: &str, args: &[String]) -> io::Result<JoinHandle<io::Result<ExitStatus>>> {
    let mut child = Command::new(cmd)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    thread::Builder::new()
        .name("launcher-reaper".into())
        .spawn(move || child.wait())
}

impl Launcher for SystemLauncher {
    fn open(&self, target: &str) -> io::Result<()> {
        let (cmd, args) = opener_command(target);
        // 句柄直接丢弃，线程自行回收子进程
        spawn_reaped(cmd, &args)?;
        Ok(())
    }
}

/// 打开失败只记录日志，不向调用方报告
pub fn open_detached(launcher: &dyn Launcher, target: &str) {
    match launcher.open(target) {
        Ok(()) => tracing::info!("已请求系统打开: {}", target),
        Err(e) => tracing::warn!("无法打开 {}: {}", target, e),
    }
}
