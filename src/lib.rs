pub mod apps;
pub mod browser;
pub mod environment;
pub mod error;
pub mod installer;
pub mod kernel;
pub mod neofetch;
pub mod process;
pub mod shell;
pub mod system;
pub mod ui;
pub mod vfs;

pub use error::ShellError;
pub use system::{System, CLEAR_MARKER};
