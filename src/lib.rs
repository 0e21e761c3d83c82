// Library surface for the binary and for headless/integration tests.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod logging;
pub mod quotes;
pub mod runtime;
pub mod scheduler;
pub mod timer;
pub mod ui;
