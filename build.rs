fn main() {
    slint_build::compile("ui/app.slint").expect("Slint 界面编译失败");
}
