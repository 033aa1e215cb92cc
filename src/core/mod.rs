pub mod app_state;
pub mod config;
pub mod types;

pub use app_state::AppState;
