pub mod app;
pub mod app_dirs;
pub mod clock;
pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod players;
pub mod rivals;
pub mod runtime;
pub mod session;
pub mod store;
pub mod texts;
pub mod time_series;
pub mod typing_policy;
pub mod ui;
