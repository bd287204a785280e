pub mod app;
pub mod calendar;
pub mod config;
pub mod errors;
pub mod form;
pub mod gemini;
pub mod handlers;
pub mod insight;
pub mod models;
pub mod state;
pub mod stats;
pub mod storage;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use state::AppState;
pub use storage::load_data;
