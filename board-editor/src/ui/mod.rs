pub mod app;
pub mod input;
pub mod widgets;

pub use app::{run_app, EditorUi};
