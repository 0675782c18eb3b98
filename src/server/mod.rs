pub mod app;
pub mod middleware;
pub mod routes;
pub mod views;

pub use app::{build_app, AppState};
