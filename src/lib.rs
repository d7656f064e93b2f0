// Library surface for the binary and for headless/integration tests.
pub mod app;
pub mod app_dirs;
pub mod charset;
pub mod config;
pub mod exposure;
pub mod logging;
pub mod round;
pub mod runtime;
pub mod ui;
