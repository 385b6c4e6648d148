pub mod board;
pub mod prompt;
pub mod side_panel;

pub use board::BoardWidget;
pub use prompt::PromptWidget;
pub use side_panel::SidePanel;
