// Library surface for headless/integration tests and reuse.
// The clap `Cli` stays in main.rs.
pub mod app_dirs;
pub mod bar;
pub mod config;
pub mod duration;
pub mod format;
pub mod history;
pub mod notify;
pub mod render;
pub mod runtime;
pub mod session;
pub mod style;
pub mod timer;
