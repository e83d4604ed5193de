pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod guestbook;
pub mod handlers;
pub mod middleware;
pub mod store;

pub use app::{app, AppState};
