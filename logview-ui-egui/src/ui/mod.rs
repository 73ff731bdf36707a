pub mod ansi;
pub mod selector;
pub mod viewer;
