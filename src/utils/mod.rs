pub mod clipboard;
pub mod fs;
pub mod html;
pub mod launcher;
