pub mod analysis;
pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod persistence;
pub mod recognition;
pub mod session;
pub mod store;
pub mod ui;

pub use app::{App, AppError};
pub use session::{EditMode, EditSession};
pub use store::{PositionStore, StoreError};
