//! Utility functions and helpers

pub mod cmd;
pub mod path;

pub use cmd::log_cmd;
pub use path::{expand_home, home_dir, parent_dir};
