pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod mail;
pub mod middleware;
pub mod models;
pub mod report;
pub mod services;
pub mod supabase;

pub mod testing;

pub use app::{app, AppState};
